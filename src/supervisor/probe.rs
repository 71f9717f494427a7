//! TCP liveness probe for the auto-server port.

use std::time::Duration;

use tokio::net::TcpStream;

/// Checks whether something is accepting TCP connections on
/// `localhost:<port>`.
///
/// Returns `true` on a successful connect, `false` on refusal, timeout,
/// or any other I/O error. The connection is dropped immediately; the
/// probe has no side effects on the probed server.
pub async fn port_open(port: u16, timeout: Duration) -> bool {
    matches!(
        tokio::time::timeout(timeout, TcpStream::connect(("localhost", port))).await,
        Ok(Ok(_))
    )
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn detects_listening_port() {
        let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("no local addr");
        };

        assert!(port_open(addr.port(), Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn closed_port_reports_false_within_timeout() {
        // Bind and immediately drop to obtain a port nothing listens on.
        let port = {
            let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
                panic!("bind failed");
            };
            let Ok(addr) = listener.local_addr() else {
                panic!("no local addr");
            };
            addr.port()
        };

        let start = Instant::now();
        assert!(!port_open(port, Duration::from_secs(1)).await);
        assert!(start.elapsed() < Duration::from_secs(2));
    }
}
