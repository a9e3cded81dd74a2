//! # SmartPark
//!
//! Parking lot management: slot occupancy, per-record billing and
//! operator accounts, exposed over a REST API.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, types and errors
//! - **application**: The occupancy and billing engine plus inventory,
//!   identity and reporting services
//! - **infrastructure**: Storage backends (in-memory and JSON files)
//! - **auth**: JWT authentication and password hashing
//! - **api**: REST API with Swagger documentation

pub mod api;
pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{default_config_path, default_data_dir, AppConfig};

// Re-export the API router
pub use api::{create_api_router, ApiState};
