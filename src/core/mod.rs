//! Core Module - EXIF GPS conversion
//!
//! Pure, stateless logic: numeric normalization, DMS to decimal conversion
//! and GPS block extraction. No I/O and no shared mutable state.

pub mod dms;
pub mod gps;
pub mod rational;
pub mod tags;

pub use dms::*;
pub use gps::*;
pub use rational::*;
pub use tags::*;
