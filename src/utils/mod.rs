//! Utils Module - Helper Functions & Shared Utilities
//!
//! Constants, the EXIF decoder and logging setup.

pub mod constants;
pub mod decoder;
pub mod logging;

pub use constants::*;
pub use decoder::*;
pub use logging::*;
