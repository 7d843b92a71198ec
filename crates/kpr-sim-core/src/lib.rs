pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "pricing")]
pub mod pricing;

#[cfg(feature = "amortization")]
pub mod tenor;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "sensitivity")]
pub mod sensitivity;

#[cfg(feature = "persistence")]
pub mod storage;

#[cfg(feature = "history")]
pub mod history;

#[cfg(feature = "catalogue")]
pub mod catalogue;

#[cfg(feature = "share")]
pub mod share;

pub use error::KprSimError;
pub use types::*;

/// Standard result type for all kpr-sim operations
pub type KprSimResult<T> = Result<T, KprSimError>;
