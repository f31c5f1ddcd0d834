pub mod analysis;
pub mod config;
pub mod conversation;
pub mod error;

// Re-export common error type
pub use error::VisaError;
