//! Material

use crate::error::Result;
use crate::lamella::*;

/// Resolves material names to complex refractive indices at arbitrary
/// wavelengths. The optical-constant repository implements this; the sampler
/// drives it so the core stays independent of any particular data source.
///
/// Implementations must be safe to share across the sampler's worker threads.
pub trait OpticalConstants: Send + Sync {
    /// Returns the complex refractive index N = n + ik of a material at the
    /// given wavelength.
    ///
    /// * `material`  - Material name.
    /// * `lambda_nm` - The wavelength in nanometers.
    fn refractive_index(&self, material: &str, lambda_nm: Float) -> Result<ComplexFloat>;
}
