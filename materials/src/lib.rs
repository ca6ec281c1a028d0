//! Materials: the optical-constant repository.
//!
//! Tabulated (wavelength, n, k) data per material, parsed from plain-text
//! sources, interpolated on lookup, and cached for the repository lifetime.

#[macro_use]
extern crate log;

mod library;
mod parse;
mod spectrum_data;

// Re-export
pub use library::*;
pub use parse::*;
pub use spectrum_data::*;
