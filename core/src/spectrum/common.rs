//! Common.

use crate::lamella::*;

/// Stores a spectrum sample value at a given wavelenght.
#[derive(Copy, Clone, Default, Debug, PartialEq, PartialOrd)]
pub struct Sample {
    /// The wavelength in nanometers.
    pub lambda: Float,

    /// The sample value.
    pub value: Float,
}

impl Sample {
    /// Create a new `Sample`.
    ///
    /// * `lambda` - The wavelength.
    /// * `value`  - The sample value.
    pub fn new(lambda: Float, value: Float) -> Self {
        Self { lambda, value }
    }
}

/// Determines if given vector containing wavelengths is sorted in strictly
/// increasing order (no duplicates).
///
/// * `samples` - Vector containing samples.
pub fn are_spectrum_samples_sorted(samples: &[Sample]) -> bool {
    samples
        .windows(2)
        .all(|pair| pair[0].lambda < pair[1].lambda)
}

/// Returns the value of an SPD at a given wavelength by linearly interpolating
/// between the two sample values that bracket it. Wavelengths outside the
/// tabulated range return the nearest edge value; there is no extrapolation.
///
/// * `samples` - The sample values, sorted by strictly increasing wavelength.
/// * `l`       - Wavelength at which to interpolate the SPD.
pub fn interpolate_spectrum_samples(samples: &[Sample], l: Float) -> Float {
    let n = samples.len();

    if l <= samples[0].lambda {
        return samples[0].value;
    }
    if l >= samples[n - 1].lambda {
        return samples[n - 1].value;
    }

    let offset = find_interval(n, |index| samples[index].lambda <= l);

    debug_assert!(l >= samples[offset].lambda && l <= samples[offset + 1].lambda);

    let t = (l - samples[offset].lambda) / (samples[offset + 1].lambda - samples[offset].lambda);
    lerp(t, samples[offset].value, samples[offset + 1].value)
}
