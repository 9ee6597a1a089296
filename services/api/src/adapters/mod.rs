pub mod catalog;
pub mod file_store;
pub mod otp;

pub use catalog::{load_catalog, CatalogError};
pub use file_store::FileKeyValueStore;
pub use otp::SimulatedOtpAdapter;
