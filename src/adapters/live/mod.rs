//! Live adapters for real external interactions.

pub mod app;
pub mod clock;
pub mod entropy;
pub mod filesystem;
pub mod memory;
pub mod storage;
