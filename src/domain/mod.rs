//! Core business entities and types

pub mod error;
pub mod payment;
pub mod record;
pub mod slot;
pub mod user;
pub mod vehicle;

pub use error::{DomainError, DomainResult};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use record::ParkingRecord;
pub use slot::{Slot, SlotStatus};
pub use user::{Actor, Role, User};
pub use vehicle::Vehicle;
