//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the provisioner and the host
//! environment (persistent storage, randomness, time, the UI application,
//! disk).
//! Implementations live in `src/adapters/`.

pub mod app;
pub mod clock;
pub mod entropy;
pub mod filesystem;
pub mod storage;

pub use app::UiApp;
pub use clock::Clock;
pub use entropy::Entropy;
pub use filesystem::FileSystem;
pub use storage::KeyValueStore;

/// Error type returned across port boundaries.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;
