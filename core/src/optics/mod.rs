//! Optics: interface physics and the multilayer reflectance solver.

mod fresnel;
mod parratt;

// Re-export
pub use fresnel::*;
pub use parratt::*;
