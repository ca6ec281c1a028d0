//! Fresnel interface terms for stratified media.
//!
//! All quantities are complex-valued. Past a critical angle the z-component
//! of the wave vector turns imaginary and the wave becomes evanescent; the
//! complex square root keeps that case on the decaying branch, so total
//! internal reflection falls out of the same arithmetic as ordinary
//! refraction.

use crate::lamella::*;

/// The z-component of the wave vector in a medium of complex index `n`:
/// kz = (2π/λ)·sqrt(n² − (n₀ sin θ₀)²). The conserved in-plane quantity
/// n₀ sin θ₀ encodes Snell's law across every interface.
///
/// * `n`            - Complex refractive index of the medium.
/// * `n0_sin_theta0` - In-plane invariant from the incidence medium.
/// * `lambda_nm`    - Wavelength in nanometers.
#[inline]
pub fn kz(n: ComplexFloat, n0_sin_theta0: Float, lambda_nm: Float) -> ComplexFloat {
    let s = ComplexFloat::new(n0_sin_theta0, 0.0);
    (TWO_PI / lambda_nm) * (n * n - s * s).sqrt()
}

/// The polarization-resolved admittance-like term entering the interface
/// coefficient: kz for s (TE), kz/n² for p (TM).
///
/// * `kz` - z-component of the wave vector in the medium.
/// * `n`  - Complex refractive index of the medium.
/// * `p_polarized` - True for p (TM), false for s (TE).
#[inline]
pub fn admittance(kz: ComplexFloat, n: ComplexFloat, p_polarized: bool) -> ComplexFloat {
    if p_polarized {
        kz / (n * n)
    } else {
        kz
    }
}

/// Fresnel amplitude reflection coefficient of a single interface between the
/// medium carrying `f_upper` and the medium below carrying `f_lower`.
///
/// * `f_upper` - Admittance term of the upper medium.
/// * `f_lower` - Admittance term of the lower medium.
#[inline]
pub fn fresnel_amplitude(f_upper: ComplexFloat, f_lower: ComplexFloat) -> ComplexFloat {
    (f_upper - f_lower) / (f_upper + f_lower)
}

/// Round-trip phase factor of a film: exp(i·2·kz·d). Zero thickness gives
/// exactly 1.
///
/// * `kz`           - z-component of the wave vector in the film.
/// * `thickness_nm` - Film thickness in nanometers.
#[inline]
pub fn phase_factor(kz: ComplexFloat, thickness_nm: Float) -> ComplexFloat {
    (ComplexFloat::i() * 2.0 * kz * thickness_nm).exp()
}
