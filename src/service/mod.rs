//! Service layer: action execution pipeline.
//!
//! [`ActionExecutor`] abstracts over "something that performs a device
//! action"; [`AutoServerExecutor`] forwards to the auto-server, and
//! [`MirrorActivation`] layers the pre-action mirror activation on top.

pub mod activation;
pub mod executor;

pub use activation::MirrorActivation;
pub use executor::{ActionExecutor, AutoServerExecutor};
