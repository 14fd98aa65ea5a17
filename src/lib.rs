#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod frame;
pub mod types;

#[cfg(feature = "alloc")]
pub mod buffer;
#[cfg(feature = "alloc")]
pub mod error;
#[cfg(feature = "alloc")]
pub mod format;
#[cfg(feature = "orientation")]
pub mod orientation;
#[cfg(feature = "std")]
pub mod platform;
#[cfg(feature = "std")]
pub mod queue;
#[cfg(feature = "alloc")]
pub mod sample;

// Re-exports
pub use frame::*;
pub use types::*;

#[cfg(feature = "alloc")]
pub use buffer::*;
#[cfg(feature = "alloc")]
pub use error::*;
#[cfg(feature = "alloc")]
pub use format::*;
#[cfg(feature = "orientation")]
pub use orientation::*;
#[cfg(feature = "std")]
pub use queue::*;
#[cfg(feature = "alloc")]
pub use sample::*;
