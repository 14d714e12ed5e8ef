//! Error handling for gbaview operations
//!
//! This module re-exports the error types used throughout the crate. Errors
//! are plain data: decompression and codec faults are converted into
//! [`GbaViewError`] variants at the decode boundary and never panic.

pub use crate::codec::CodecError;
pub use crate::common::GbaViewError;
pub use crate::common::Result;
