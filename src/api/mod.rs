//! HTTP interface: DTOs, handlers and the router

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod router;

pub use router::{create_api_router, ApiState};
