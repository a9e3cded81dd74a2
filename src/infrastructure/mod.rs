//! External concerns: persistence

pub mod storage;

pub use storage::{JsonStore, MemoryStore, Store};
