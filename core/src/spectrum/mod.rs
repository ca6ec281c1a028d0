//! Spectrum

mod cie;
mod common;

// Re-export
pub use cie::*;
pub use common::*;

use crate::lamella::Float;

/// A computed reflectance spectrum: ordered (wavelength, R) samples with
/// R in [0, 1]. The primary artifact of the engine, consumed by plotting
/// and colorimetry. Fully recomputed on any stack or parameter change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReflectanceSpectrum {
    /// The samples, sorted by strictly increasing wavelength.
    samples: Vec<Sample>,
}

impl ReflectanceSpectrum {
    /// Create a spectrum from samples sorted by strictly increasing
    /// wavelength.
    ///
    /// * `samples` - The samples.
    pub fn new(samples: Vec<Sample>) -> Self {
        debug_assert!(are_spectrum_samples_sorted(&samples));
        Self { samples }
    }

    /// Returns the samples.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the spectrum holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the lowest sampled wavelength.
    pub fn min_lambda(&self) -> Option<Float> {
        self.samples.first().map(|s| s.lambda)
    }

    /// Returns the highest sampled wavelength.
    pub fn max_lambda(&self) -> Option<Float> {
        self.samples.last().map(|s| s.lambda)
    }

    /// Reflectance at an arbitrary wavelength, linearly interpolated between
    /// the bracketing samples and clamped to the edge values outside the
    /// sampled range.
    ///
    /// * `lambda_nm` - The wavelength.
    pub fn value_at(&self, lambda_nm: Float) -> Float {
        interpolate_spectrum_samples(&self.samples, lambda_nm)
    }
}
