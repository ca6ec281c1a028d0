//! Colorimetry: reflectance spectrum → CIE xy chromaticity and sRGB.
//!
//! Tristimulus values are simple Riemann sums over the CIE reference grid
//! (Δλ = 5 nm), normalized by Σ S·ȳ·Δλ so a perfect white reflector maps to
//! Y = 1.0 (the 1.0-scale convention used throughout).

use crate::error::{Error, Result};
use crate::lamella::*;
use crate::spectrum::*;

/// A displayable colour computed from a reflectance spectrum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorResult {
    /// CIE 1931 chromaticity x.
    pub x: Float,

    /// CIE 1931 chromaticity y.
    pub y: Float,

    /// Gamma-encoded sRGB channels, each clamped to [0, 1].
    pub rgb: [Float; 3],

    /// True when the linear RGB fell outside [0, 1] and required clamping
    /// before gamma encoding.
    pub out_of_gamut: bool,
}

impl ColorResult {
    /// The sRGB channels scaled to 8-bit [0, 255].
    pub fn rgb8(&self) -> [u8; 3] {
        self.rgb.map(|c| (c * 255.0).round() as u8)
    }
}

/// Converts XYZ (1.0-scale) to linear sRGB with the standard D65 matrix.
///
/// * `xyz` - The XYZ coefficients.
#[rustfmt::skip]
pub fn xyz_to_linear_srgb(xyz: &[Float; 3]) -> [Float; 3] {
    [
         3.2406 * xyz[0] - 1.5372 * xyz[1] - 0.4986 * xyz[2],
        -0.9689 * xyz[0] + 1.8758 * xyz[1] + 0.0415 * xyz[2],
         0.0557 * xyz[0] - 0.2040 * xyz[1] + 1.0570 * xyz[2],
    ]
}

/// Integrates a reflectance spectrum under the D65 illuminant against the
/// CIE 1931 colour-matching functions and converts the result to chromaticity
/// and gamma-encoded sRGB.
///
/// The spectrum must cover the full reference grid span; there is no
/// extrapolation beyond its sampled range. A spectrum integrating to zero
/// (total absorption) falls back to the illuminant's own white-point
/// chromaticity with a black sRGB triple.
///
/// * `spectrum` - The reflectance spectrum.
pub fn spectrum_to_xy_rgb(spectrum: &ReflectanceSpectrum) -> Result<ColorResult> {
    let min_nm = spectrum.min_lambda().unwrap_or(0.0);
    let max_nm = spectrum.max_lambda().unwrap_or(0.0);
    if min_nm > CIE_LAMBDA_START || max_nm < CIE_LAMBDA_END {
        return Err(Error::ColorimetryRange {
            min_nm,
            max_nm,
            required_min_nm: CIE_LAMBDA_START,
            required_max_nm: CIE_LAMBDA_END,
        });
    }

    // Riemann sum of R·S·CMF over the reference grid.
    let (x, y, z) = (0..CIE_SAMPLES).fold((0.0, 0.0, 0.0), |(sx, sy, sz), i| {
        let r = spectrum.value_at(cie_lambda(i));
        let s = CIE_D65[i] * CIE_LAMBDA_STEP;
        (
            sx + r * s * CIE_X[i],
            sy + r * s * CIE_Y[i],
            sz + r * s * CIE_Z[i],
        )
    });

    // Chromaticity, with the white-point fallback for total absorption.
    let sum = x + y + z;
    let (cx, cy) = if sum == 0.0 {
        *ILLUMINANT_WHITE_POINT
    } else {
        (x / sum, y / sum)
    };

    // Normalize so a perfect white reflector has Y = 1.0, then to linear sRGB.
    let norm = *CIE_Y_NORMALIZATION;
    let mut linear = xyz_to_linear_srgb(&[x / norm, y / norm, z / norm]);

    // Gamut clamp happens on the linear values, before gamma encoding.
    let mut out_of_gamut = false;
    for c in linear.iter_mut() {
        if *c < 0.0 || *c > 1.0 {
            out_of_gamut = true;
            *c = clamp(*c, 0.0, 1.0);
        }
    }

    let rgb = linear.map(|c| clamp(gamma_correct(c), 0.0, 1.0));

    Ok(ColorResult {
        x: cx,
        y: cy,
        rgb,
        out_of_gamut,
    })
}
