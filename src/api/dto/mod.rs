//! Data Transfer Objects for REST request/response serialization.

pub mod poll_dto;

pub use poll_dto::*;
