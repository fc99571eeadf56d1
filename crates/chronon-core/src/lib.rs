#![doc = "Core value types shared across the chronon workspace."]

pub mod config;
pub mod duration;
pub mod error;
pub mod timespec;

pub use config::*;
pub use duration::*;
pub use error::*;
pub use timespec::*;
