//! Bridges between Core Media / Core Video handles and this crate's types.
//!
//! Core Media exposes the audio refinement of a format description and the
//! pixel refinement of an image buffer as the same object type, so narrowing
//! real handles is a re-typing only. The import functions copy what the
//! pipeline needs into crate handles, which can then be narrowed safely.
//! [`queue::create_core_media_buffer_queue`] creates native queues for
//! code that hands samples back to Core Media.

pub mod frame;
pub mod media;
pub mod queue;
#[cfg(feature = "orientation")]
pub mod orientation;
