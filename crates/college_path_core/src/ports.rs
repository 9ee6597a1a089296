//! crates/college_path_core/src/ports.rs
//!
//! Defines the service contracts (traits) the core depends on. These traits
//! form the boundary of the hexagonal architecture, keeping the core
//! independent of where state is persisted and how passcodes are delivered.

use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Storage quota exceeded: {needed} bytes needed, quota is {quota} bytes")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable string-keyed storage, one value per key.
///
/// Every call completes synchronously: a successful `set` or `remove` has
/// reached durable storage before it returns.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> PortResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> PortResult<()>;

    /// Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> PortResult<()>;
}

#[async_trait]
pub trait OtpService: Send + Sync {
    /// Sends a one-time passcode to the given phone number.
    async fn send_code(&self, phone: &str) -> PortResult<()>;

    /// Checks a passcode the student entered for the given phone number.
    async fn verify_code(&self, phone: &str, code: &str) -> PortResult<bool>;
}
