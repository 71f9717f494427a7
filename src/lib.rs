//! # mirror-playground
//!
//! Playground gateway and auto-server supervisor for mirrored iOS device
//! automation.
//!
//! The AI planning and screen-grounding engine lives out of tree; this
//! crate supplies the wiring around it: an HTTP surface for the
//! playground UI, a decorator that activates the screen-mirroring window
//! before every action, and a supervisor that keeps the coordinate
//! automation companion process (the "auto-server") alive on its port.
//!
//! ## Architecture
//!
//! ```text
//! Playground UI (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── MirrorActivation (service/)      POST /activate-mirror
//!     ├── AutoServerExecutor (service/)    POST /run
//!     │
//!     ├── AutoServerSupervisor (supervisor/)  spawn / probe / restart
//!     │
//!     └── Auto-server process (localhost:1412)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod error;
pub mod service;
pub mod supervisor;
