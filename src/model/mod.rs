//! Data model.
//!
//! Raw collector documents on the way in, per-document sentence files on the
//! way out.

mod document;
mod sentence;

pub use document::*;
pub use sentence::*;
