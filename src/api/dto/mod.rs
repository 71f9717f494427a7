//! Data Transfer Objects for REST request/response serialization.

pub mod action_dto;
pub mod status_dto;

pub use action_dto::*;
pub use status_dto::*;
