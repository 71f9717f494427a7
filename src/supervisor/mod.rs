//! Auto-server process supervision.
//!
//! [`AutoServerSupervisor`] owns the lifecycle of the coordinate-automation
//! companion process: it probes the automation port, spawns the process
//! when the port is dark, and re-checks liveness on a fixed interval. The
//! child handle lives behind a lock inside the supervisor instance rather
//! than in module-level state, so callers share the supervisor via `Arc`.

pub mod probe;

use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::PlaygroundConfig;

/// Snapshot of supervisor state for status reporting.
#[derive(Debug, Clone)]
pub struct AutoServerState {
    /// PID of the supervised child, if one is currently held.
    pub pid: Option<u32>,
    /// Number of spawn attempts performed since startup.
    pub spawn_attempts: u32,
    /// When the supervisor last spawned the child.
    pub last_spawned_at: Option<DateTime<Utc>>,
    /// Whether the supervisor considers the auto-server "supposed to be
    /// running" (set once a start has been requested, successful or not).
    pub supervised: bool,
}

/// Supervises the auto-server companion process.
///
/// # Concurrency
///
/// One supervisor instance is shared via `Arc` between the monitor task,
/// the HTTP handlers, and the shutdown path. The child handle sits behind
/// a `tokio::sync::Mutex`; counters are atomics. There is no backoff:
/// repeated failures retry at the same fixed interval indefinitely, with
/// the attempt counter surfaced over HTTP so persistent failure is
/// observable.
#[derive(Debug)]
pub struct AutoServerSupervisor {
    port: u16,
    command: String,
    script: String,
    verbose: bool,
    probe_timeout: Duration,
    startup_grace: Duration,
    monitor_interval: Duration,
    child: Mutex<Option<Child>>,
    // Serializes probe -> spawn -> grace so concurrent callers cannot
    // both spawn a child.
    ensure_lock: Mutex<()>,
    supervised: AtomicBool,
    spawn_attempts: AtomicU32,
    last_spawned_at: Mutex<Option<DateTime<Utc>>>,
}

impl AutoServerSupervisor {
    /// Creates a supervisor from the playground configuration.
    #[must_use]
    pub fn new(config: &PlaygroundConfig) -> Self {
        Self {
            port: config.auto_server_port,
            command: config.auto_server_command.clone(),
            script: config.auto_server_script.clone(),
            verbose: config.verbose,
            probe_timeout: Duration::from_millis(config.probe_timeout_ms),
            startup_grace: Duration::from_millis(config.startup_grace_ms),
            monitor_interval: Duration::from_secs(config.monitor_interval_secs),
            child: Mutex::new(None),
            ensure_lock: Mutex::new(()),
            supervised: AtomicBool::new(false),
            spawn_attempts: AtomicU32::new(0),
            last_spawned_at: Mutex::new(None),
        }
    }

    /// Returns the port this supervisor probes.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Probes whether the auto-server port is accepting connections.
    ///
    /// Pure liveness check with no side effects.
    pub async fn is_running(&self) -> bool {
        probe::port_open(self.port, self.probe_timeout).await
    }

    /// Ensures the auto-server is up, spawning it if necessary.
    ///
    /// If the port is already live, this only marks the server as
    /// supervised. Otherwise it spawns the automation entry point, waits
    /// the startup grace period, and re-checks liveness. All failures are
    /// logged and reported as `false`; this method never crashes the
    /// gateway, and the monitor keeps retrying even when the very first
    /// attempt fails.
    ///
    /// Concurrent calls are serialized: only one probe/spawn/grace
    /// sequence runs at a time.
    pub async fn ensure_started(&self) -> bool {
        let _ensure = self.ensure_lock.lock().await;

        // Intent to run: the monitor retries from now on, whatever the
        // outcome of this attempt.
        self.supervised.store(true, Ordering::SeqCst);

        self.reap().await;

        if self.is_running().await {
            tracing::info!(port = self.port, "auto-server already running");
            return true;
        }

        tracing::info!(port = self.port, command = %self.command, "starting auto-server");

        match self.spawn_child() {
            Ok(child) => {
                let pid = child.id();
                let mut guard = self.child.lock().await;
                if let Some(mut old) = guard.take() {
                    // The previous child is alive but not serving its
                    // port; signal it before it becomes unreachable.
                    tracing::warn!(
                        port = self.port,
                        pid = ?old.id(),
                        "terminating unresponsive auto-server child"
                    );
                    terminate(&mut old);
                }
                *guard = Some(child);
                drop(guard);
                *self.last_spawned_at.lock().await = Some(Utc::now());
                self.spawn_attempts.fetch_add(1, Ordering::SeqCst);
                tracing::info!(port = self.port, ?pid, "auto-server spawned");
            }
            Err(err) => {
                self.spawn_attempts.fetch_add(1, Ordering::SeqCst);
                tracing::error!(port = self.port, error = %err, "failed to spawn auto-server");
                return false;
            }
        }

        tokio::time::sleep(self.startup_grace).await;

        if self.is_running().await {
            tracing::info!(port = self.port, "auto-server started");
            true
        } else {
            tracing::error!(port = self.port, "auto-server did not come up");
            false
        }
    }

    /// One health-check pass: if the server is supposed to be running but
    /// the port is unreachable, attempt a restart.
    pub async fn tick(&self) {
        if !self.supervised.load(Ordering::SeqCst) {
            return;
        }
        if self.is_running().await {
            return;
        }
        tracing::warn!(port = self.port, "auto-server appears to be down, restarting");
        self.ensure_started().await;
    }

    /// Spawns the recurring health-check task.
    ///
    /// Level-triggered: each interval re-checks liveness and retries
    /// [`Self::ensure_started`] on failure. The returned handle should be
    /// aborted on shutdown.
    pub fn spawn_monitor(self: Arc<Self>) -> JoinHandle<()> {
        let supervisor = self;
        let interval = supervisor.monitor_interval;
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                supervisor.tick().await;
            }
        })
    }

    /// Stops supervising and asks the child to terminate.
    ///
    /// Sends SIGTERM on Unix (best effort, no wait-for-exit); the child
    /// handle is taken out of the supervisor so the signal is delivered
    /// at most once. Safe to call when no child is held.
    pub async fn stop(&self) {
        self.supervised.store(false, Ordering::SeqCst);

        let child = self.child.lock().await.take();
        if let Some(mut child) = child {
            tracing::info!(port = self.port, pid = ?child.id(), "stopping auto-server");
            terminate(&mut child);
        }
    }

    /// Returns a snapshot of the supervisor state.
    pub async fn state(&self) -> AutoServerState {
        let pid = self.child.lock().await.as_ref().and_then(Child::id);
        AutoServerState {
            pid,
            spawn_attempts: self.spawn_attempts.load(Ordering::SeqCst),
            last_spawned_at: *self.last_spawned_at.lock().await,
            supervised: self.supervised.load(Ordering::SeqCst),
        }
    }

    /// Clears the child handle if the process has already exited, logging
    /// its exit status. Non-blocking.
    async fn reap(&self) {
        let mut guard = self.child.lock().await;
        if let Some(child) = guard.as_mut()
            && let Ok(Some(status)) = child.try_wait()
        {
            if status.success() {
                tracing::info!(port = self.port, "auto-server exited cleanly");
            } else {
                tracing::error!(port = self.port, %status, "auto-server exited");
            }
            *guard = None;
        }
    }

    /// Spawns the automation entry point with piped stdio and the debug
    /// environment the entry point expects.
    fn spawn_child(&self) -> Result<Child> {
        let debug = std::env::var("DEBUG")
            .unwrap_or_else(|_| default_debug_patterns(self.verbose).to_string());

        let mut child = Command::new(&self.command)
            .arg(&self.script)
            .arg(self.port.to_string())
            .env("DEBUG", debug)
            .env("PYTHONUNBUFFERED", "1")
            .env("PYTHONDONTWRITEBYTECODE", "1")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawning {} {}", self.command, self.script))?;

        // Forward child output through tracing so auto-server logs land
        // in the gateway's log stream.
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    tracing::info!(source = "auto-server", "{line}");
                }
            });
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    tracing::warn!(source = "auto-server", "{line}");
                }
            });
        }

        Ok(child)
    }
}

/// Sends a termination signal to the child.
#[cfg(unix)]
#[allow(unsafe_code)]
fn terminate(child: &mut Child) {
    let Some(pid) = child.id() else {
        return;
    };
    let Ok(pid) = i32::try_from(pid) else {
        return;
    };
    // SAFETY: kill(2) with a pid we spawned; no memory is involved.
    unsafe {
        libc::kill(pid, libc::SIGTERM);
    }
}

/// Sends a termination signal to the child.
#[cfg(not(unix))]
fn terminate(child: &mut Child) {
    if let Err(err) = child.start_kill() {
        tracing::warn!(error = %err, "failed to kill auto-server");
    }
}

/// `DEBUG` patterns handed to the automation entry point when the
/// gateway's own environment does not set any. Verbose mode opens every
/// namespace while still silencing express.
fn default_debug_patterns(verbose: bool) -> &'static str {
    if verbose {
        "ios:*,midscene:*,playground:*,*,-express:*"
    } else {
        "ios:*,midscene:*,playground:*,-express:*"
    }
}
