//! CIE reference data: 1931 2° standard observer colour-matching functions
//! and the D65 illuminant spectral power distribution.
//!
//! The reference grid runs 380-780 nm in 5 nm steps (81 samples). The CMFs
//! are tabulated directly on the grid; D65 is published at 10 nm and is
//! resampled onto the grid once at startup. All of it is read-only for the
//! process lifetime.

use super::common::{interpolate_spectrum_samples, Sample};
use crate::lamella::Float;

/// Lower edge of the CIE reference grid in nanometers.
pub const CIE_LAMBDA_START: Float = 380.0;

/// Upper edge of the CIE reference grid in nanometers.
pub const CIE_LAMBDA_END: Float = 780.0;

/// Spacing of the CIE reference grid in nanometers.
pub const CIE_LAMBDA_STEP: Float = 5.0;

/// Number of samples on the CIE reference grid.
pub const CIE_SAMPLES: usize = 81;

/// Returns the wavelength of the i-th reference grid point.
///
/// * `i` - Grid index, in [0, CIE_SAMPLES).
#[inline(always)]
pub fn cie_lambda(i: usize) -> Float {
    CIE_LAMBDA_START + CIE_LAMBDA_STEP * i as Float
}

/// CIE 1931 2° standard observer x̄(λ) on the reference grid.
#[rustfmt::skip]
pub const CIE_X: [Float; CIE_SAMPLES] = [
    0.001368, 0.002236, 0.004243, 0.007650, 0.014310, 0.023190, 0.043510,
    0.077630, 0.134380, 0.214770, 0.283900, 0.328500, 0.348280, 0.348060,
    0.336200, 0.318700, 0.290800, 0.251100, 0.195360, 0.142100, 0.095640,
    0.057950, 0.032010, 0.014700, 0.004900, 0.002400, 0.009300, 0.029100,
    0.063270, 0.109600, 0.165500, 0.225750, 0.290400, 0.359700, 0.433450,
    0.512050, 0.594500, 0.678400, 0.762100, 0.842500, 0.916300, 0.978600,
    1.026300, 1.056700, 1.062200, 1.045600, 1.002600, 0.938400, 0.854450,
    0.751400, 0.642400, 0.541900, 0.447900, 0.360800, 0.283500, 0.218700,
    0.164900, 0.121200, 0.087400, 0.063600, 0.046770, 0.032900, 0.022700,
    0.015840, 0.011359, 0.008111, 0.005790, 0.004109, 0.002899, 0.002049,
    0.001440, 0.001000, 0.000690, 0.000476, 0.000332, 0.000235, 0.000166,
    0.000117, 0.000083, 0.000059, 0.000042,
];

/// CIE 1931 2° standard observer ȳ(λ) on the reference grid.
#[rustfmt::skip]
pub const CIE_Y: [Float; CIE_SAMPLES] = [
    0.000039, 0.000064, 0.000120, 0.000217, 0.000396, 0.000640, 0.001210,
    0.002180, 0.004000, 0.007300, 0.011600, 0.016840, 0.023000, 0.029800,
    0.038000, 0.048000, 0.060000, 0.073900, 0.090980, 0.112600, 0.139020,
    0.169300, 0.208020, 0.258600, 0.323000, 0.407300, 0.503000, 0.608200,
    0.710000, 0.793200, 0.862000, 0.914850, 0.954000, 0.980300, 0.994950,
    1.000000, 0.995000, 0.978600, 0.952000, 0.915400, 0.870000, 0.816300,
    0.757000, 0.694900, 0.631000, 0.566800, 0.503000, 0.441200, 0.381000,
    0.321000, 0.265000, 0.217000, 0.175000, 0.138200, 0.107000, 0.081600,
    0.061000, 0.044580, 0.032000, 0.023200, 0.017000, 0.011920, 0.008210,
    0.005723, 0.004102, 0.002929, 0.002091, 0.001484, 0.001047, 0.000740,
    0.000520, 0.000361, 0.000249, 0.000172, 0.000120, 0.000085, 0.000060,
    0.000042, 0.000030, 0.000021, 0.000015,
];

/// CIE 1931 2° standard observer z̄(λ) on the reference grid.
#[rustfmt::skip]
pub const CIE_Z: [Float; CIE_SAMPLES] = [
    0.006450, 0.010550, 0.020050, 0.036210, 0.067850, 0.110200, 0.207400,
    0.371300, 0.645600, 1.039050, 1.385600, 1.622960, 1.747060, 1.782600,
    1.772110, 1.744100, 1.669200, 1.528100, 1.287640, 1.041900, 0.812950,
    0.616200, 0.465180, 0.353300, 0.272000, 0.212300, 0.158200, 0.111700,
    0.078250, 0.057250, 0.042160, 0.029840, 0.020300, 0.013400, 0.008750,
    0.005750, 0.003900, 0.002750, 0.002100, 0.001800, 0.001650, 0.001400,
    0.001100, 0.001000, 0.000800, 0.000600, 0.000340, 0.000240, 0.000190,
    0.000100, 0.000050, 0.000030, 0.000020, 0.000010, 0.000000, 0.000000,
    0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000,
    0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000,
    0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000,
    0.000000, 0.000000, 0.000000, 0.000000,
];

/// CIE standard illuminant D65 relative SPD, published at 10 nm intervals
/// and normalized to 100 at 560 nm.
#[rustfmt::skip]
const D65_10NM: [(Float, Float); 41] = [
    (380.0,  49.9755), (390.0,  54.6482), (400.0,  82.7549), (410.0,  91.4860),
    (420.0,  93.4318), (430.0,  86.6823), (440.0, 104.8650), (450.0, 117.0080),
    (460.0, 117.8120), (470.0, 114.8610), (480.0, 115.9230), (490.0, 108.8110),
    (500.0, 109.3540), (510.0, 107.8020), (520.0, 104.7900), (530.0, 107.6890),
    (540.0, 104.4050), (550.0, 104.0460), (560.0, 100.0000), (570.0,  96.3342),
    (580.0,  95.7880), (590.0,  88.6856), (600.0,  90.0062), (610.0,  89.5991),
    (620.0,  87.6987), (630.0,  83.2886), (640.0,  83.6992), (650.0,  80.0268),
    (660.0,  80.1207), (670.0,  82.2778), (680.0,  78.2842), (690.0,  69.7213),
    (700.0,  71.6091), (710.0,  74.3490), (720.0,  61.6040), (730.0,  69.8856),
    (740.0,  75.0870), (750.0,  63.5927), (760.0,  46.4182), (770.0,  66.8054),
    (780.0,  63.3828),
];

lazy_static! {
    /// D65 illuminant SPD resampled onto the reference grid.
    pub static ref CIE_D65: [Float; CIE_SAMPLES] = {
        let table: Vec<Sample> = D65_10NM
            .iter()
            .map(|&(lambda, value)| Sample::new(lambda, value))
            .collect();

        let mut spd = [0.0; CIE_SAMPLES];
        for (i, v) in spd.iter_mut().enumerate() {
            *v = interpolate_spectrum_samples(&table, cie_lambda(i));
        }
        spd
    };

    /// Normalization constant Σ S(λ)·ȳ(λ)·Δλ. Dividing the tristimulus
    /// integrals by this maps a perfect white reflector (R ≡ 1) to Y = 1.0.
    pub static ref CIE_Y_NORMALIZATION: Float = (0..CIE_SAMPLES)
        .map(|i| CIE_D65[i] * CIE_Y[i] * CIE_LAMBDA_STEP)
        .sum();

    /// Chromaticity (x, y) of the illuminant itself; the white point a
    /// perfect reflector maps to, and the fallback for a zero-sum spectrum.
    pub static ref ILLUMINANT_WHITE_POINT: (Float, Float) = {
        let (x, y, z) = (0..CIE_SAMPLES).fold((0.0, 0.0, 0.0), |(sx, sy, sz), i| {
            (
                sx + CIE_D65[i] * CIE_X[i] * CIE_LAMBDA_STEP,
                sy + CIE_D65[i] * CIE_Y[i] * CIE_LAMBDA_STEP,
                sz + CIE_D65[i] * CIE_Z[i] * CIE_LAMBDA_STEP,
            )
        });
        let sum = x + y + z;
        (x / sum, y / sum)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn grid_shape() {
        assert_eq!(cie_lambda(0), CIE_LAMBDA_START);
        assert_eq!(cie_lambda(CIE_SAMPLES - 1), CIE_LAMBDA_END);
    }

    #[test]
    fn d65_hits_tabulated_knots() {
        // 560 nm is index 36 on the 5 nm grid and a knot of the 10 nm table.
        assert!(approx_eq!(Float, CIE_D65[36], 100.0, epsilon = 1e-9));
        assert!(approx_eq!(Float, CIE_D65[0], 49.9755, epsilon = 1e-9));
    }

    #[test]
    fn white_point_is_near_d65() {
        // CIE D65 chromaticity is (0.3127, 0.3290); a 5 nm Riemann sum over
        // the 2° observer lands within a small tolerance of it.
        let (x, y) = *ILLUMINANT_WHITE_POINT;
        assert!((x - 0.3127).abs() < 2e-3, "x = {x}");
        assert!((y - 0.3290).abs() < 2e-3, "y = {y}");
    }

    #[test]
    fn y_normalization_is_positive() {
        assert!(*CIE_Y_NORMALIZATION > 0.0);
    }
}
