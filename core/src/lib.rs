//! Core

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

// Re-export.
pub mod colorimetry;
pub mod error;
pub mod lamella;
pub mod material;
pub mod optics;
pub mod sampler;
pub mod spectrum;
pub mod stack;
