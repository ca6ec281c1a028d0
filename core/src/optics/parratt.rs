//! Parratt recursion over a resolved layer stack.

use super::fresnel::*;
use crate::error::{Error, Result};
use crate::lamella::*;
use crate::stack::Polarization;

/// A stack resolved at a single wavelength: complex indices only, no material
/// names. The incidence medium and substrate are semi-infinite.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSlice {
    /// Complex index of the incidence medium.
    pub incidence: ComplexFloat,

    /// (complex index, thickness in nm) per film, ordered from the incidence
    /// side down.
    pub layers: Vec<(ComplexFloat, Float)>,

    /// Complex index of the substrate.
    pub substrate: ComplexFloat,
}

impl ResolvedSlice {
    /// Create a new `ResolvedSlice`.
    ///
    /// * `incidence` - Complex index of the incidence medium.
    /// * `layers`    - (complex index, thickness in nm) per film.
    /// * `substrate` - Complex index of the substrate.
    pub fn new(
        incidence: ComplexFloat,
        layers: Vec<(ComplexFloat, Float)>,
        substrate: ComplexFloat,
    ) -> Self {
        Self {
            incidence,
            layers,
            substrate,
        }
    }
}

/// Complex amplitude reflection coefficient at the top interface for a single
/// linear polarization. No validation; callers go through [`reflectance`].
///
/// The recursion walks from the substrate interface upward with an explicit
/// accumulator: r_j = a_j·(F_j + r_{j+1}) / (1 + F_j·r_{j+1}), seeded with
/// r_{N+1} = 0 below the substrate. a_j is the round-trip phase of layer j;
/// the incidence medium has no thickness, so a_0 = 1 and the accumulator ends
/// up being r_0 itself.
fn amplitude(
    slice: &ResolvedSlice,
    lambda_nm: Float,
    n0_sin_theta0: Float,
    p_polarized: bool,
) -> ComplexFloat {
    // Media from incidence down to substrate, with film thicknesses.
    let media = std::iter::once((slice.incidence, 0.0))
        .chain(slice.layers.iter().copied())
        .collect::<Vec<_>>();

    let f_of = |n: ComplexFloat| {
        let k = kz(n, n0_sin_theta0, lambda_nm);
        admittance(k, n, p_polarized)
    };

    let mut r = ComplexFloat::new(0.0, 0.0);
    let mut f_lower = f_of(slice.substrate);

    for &(n, thickness_nm) in media.iter().rev() {
        let f = f_of(n);
        let big_f = fresnel_amplitude(f, f_lower);
        let a = phase_factor(kz(n, n0_sin_theta0, lambda_nm), thickness_nm);
        r = a * (big_f + r) / (ComplexFloat::new(1.0, 0.0) + big_f * r);
        f_lower = f;
    }

    r
}

/// Reflectance R = |r|² of a resolved stack at one wavelength.
///
/// An empty stack reduces to the bare incidence/substrate Fresnel interface.
/// `Polarization::Mixed` averages the two linear polarizations.
///
/// * `slice`        - The stack resolved at `lambda_nm`.
/// * `lambda_nm`    - Wavelength in nanometers. Must be > 0.
/// * `angle_deg`    - Angle of incidence in degrees, in [0, 90).
/// * `polarization` - Requested polarization.
pub fn reflectance(
    slice: &ResolvedSlice,
    lambda_nm: Float,
    angle_deg: Float,
    polarization: Polarization,
) -> Result<Float> {
    if !(angle_deg >= 0.0 && angle_deg < 90.0) {
        return Err(Error::InvalidParameter {
            name: "angle_deg",
            value: angle_deg,
            expected: "an angle in [0, 90)",
        });
    }
    if !(lambda_nm > 0.0) || !lambda_nm.is_finite() {
        return Err(Error::InvalidParameter {
            name: "lambda_nm",
            value: lambda_nm,
            expected: "a wavelength > 0",
        });
    }
    for &(_, thickness_nm) in &slice.layers {
        if !(thickness_nm >= 0.0) || !thickness_nm.is_finite() {
            return Err(Error::InvalidParameter {
                name: "thickness_nm",
                value: thickness_nm,
                expected: "a finite value >= 0",
            });
        }
    }

    // Snell invariant from the incidence medium's real index.
    let n0_sin_theta0 = slice.incidence.re * angle_deg.to_radians().sin();

    let r = |p_polarized: bool| {
        let r = amplitude(slice, lambda_nm, n0_sin_theta0, p_polarized);
        r.norm_sqr()
    };

    let value = match polarization {
        Polarization::S => r(false),
        Polarization::P => r(true),
        Polarization::Mixed => 0.5 * (r(false) + r(true)),
    };

    // Guard the [0, 1] invariant against rounding at grazing configurations.
    Ok(clamp(value, 0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    fn real(n: Float) -> ComplexFloat {
        ComplexFloat::new(n, 0.0)
    }

    #[test]
    fn bare_substrate_is_single_interface_fresnel() {
        // R = |(n0 − n1)/(n0 + n1)|² at normal incidence for real indices.
        let slice = ResolvedSlice::new(real(1.0), vec![], real(1.5));
        let r = reflectance(&slice, 550.0, 0.0, Polarization::S).unwrap();
        assert!(approx_eq!(Float, r, 0.04, epsilon = 1e-12));
    }

    #[test]
    fn zero_thickness_layer_is_a_no_op() {
        let bare = ResolvedSlice::new(real(1.0), vec![], real(1.5));
        let padded = ResolvedSlice::new(real(1.0), vec![(real(2.0), 0.0)], real(1.5));
        for angle in [0.0, 30.0, 70.0] {
            for pol in [Polarization::S, Polarization::P] {
                let r0 = reflectance(&bare, 550.0, angle, pol).unwrap();
                let r1 = reflectance(&padded, 550.0, angle, pol).unwrap();
                assert!(approx_eq!(Float, r0, r1, epsilon = 1e-12));
            }
        }
    }

    #[test]
    fn s_and_p_coincide_at_normal_incidence() {
        let slice = ResolvedSlice::new(
            real(1.0),
            vec![
                (ComplexFloat::new(2.35, 0.01), 120.0),
                (real(1.46), 85.0),
            ],
            ComplexFloat::new(3.9, 0.02),
        );
        for lambda in [400.0, 550.0, 700.0] {
            let rs = reflectance(&slice, lambda, 0.0, Polarization::S).unwrap();
            let rp = reflectance(&slice, lambda, 0.0, Polarization::P).unwrap();
            assert!(approx_eq!(Float, rs, rp, epsilon = 1e-12));
        }
    }

    #[test]
    fn total_internal_reflection_is_complete() {
        // Glass into air beyond the ~41.8° critical angle, lossless.
        let slice = ResolvedSlice::new(real(1.5), vec![], real(1.0));
        for angle in [45.0, 60.0, 80.0] {
            for pol in [Polarization::S, Polarization::P] {
                let r = reflectance(&slice, 550.0, angle, pol).unwrap();
                assert!(approx_eq!(Float, r, 1.0, epsilon = 1e-9), "R = {r}");
            }
        }
    }

    #[test]
    fn mixed_is_the_polarization_average() {
        let slice = ResolvedSlice::new(real(1.0), vec![(real(2.0), 130.0)], real(1.5));
        let rs = reflectance(&slice, 550.0, 40.0, Polarization::S).unwrap();
        let rp = reflectance(&slice, 550.0, 40.0, Polarization::P).unwrap();
        let rm = reflectance(&slice, 550.0, 40.0, Polarization::Mixed).unwrap();
        assert!(approx_eq!(Float, rm, 0.5 * (rs + rp), epsilon = 1e-12));
    }

    #[test]
    fn single_layer_matches_airy_closed_form() {
        // n0=1.0, film n=2.0 d=100 nm, substrate n=1.5, λ=550 nm, θ=0, s-pol.
        let slice = ResolvedSlice::new(real(1.0), vec![(real(2.0), 100.0)], real(1.5));
        let r = reflectance(&slice, 550.0, 0.0, Polarization::S).unwrap();

        // Two-interface Airy formula: r = (r01 + r12·e^{2iβ})/(1 + r01·r12·e^{2iβ}).
        let r01 = (1.0 - 2.0) / (1.0 + 2.0);
        let r12 = (2.0 - 1.5) / (2.0 + 1.5);
        let beta = TWO_PI * 2.0 * 100.0 / 550.0;
        let phase = ComplexFloat::new(0.0, 2.0 * beta).exp();
        let airy = (real(r01) + r12 * phase) / (real(1.0) + r01 * r12 * phase);
        let expected = airy.norm_sqr();

        assert!(
            (r - expected).abs() / expected < 1e-6,
            "R = {r}, expected {expected}"
        );
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let slice = ResolvedSlice::new(real(1.0), vec![], real(1.5));
        assert!(matches!(
            reflectance(&slice, 550.0, 90.0, Polarization::S),
            Err(Error::InvalidParameter { name: "angle_deg", .. })
        ));
        assert!(matches!(
            reflectance(&slice, 0.0, 0.0, Polarization::S),
            Err(Error::InvalidParameter { name: "lambda_nm", .. })
        ));
        let bad = ResolvedSlice::new(real(1.0), vec![(real(2.0), -5.0)], real(1.5));
        assert!(matches!(
            reflectance(&bad, 550.0, 0.0, Polarization::S),
            Err(Error::InvalidParameter { name: "thickness_nm", .. })
        ));
    }

    proptest! {
        #[test]
        fn reflectance_conserves_energy(
            n_film in 1.0..3.0f64,
            k_film in 0.0..0.5f64,
            thickness in 0.0..500.0f64,
            n_sub in 1.0..4.0f64,
            k_sub in 0.0..1.0f64,
            angle in 0.0..89.9f64,
            lambda in 380.0..780.0f64,
        ) {
            let slice = ResolvedSlice::new(
                real(1.0),
                vec![(ComplexFloat::new(n_film, k_film), thickness)],
                ComplexFloat::new(n_sub, k_sub),
            );
            for pol in [Polarization::S, Polarization::P, Polarization::Mixed] {
                let r = reflectance(&slice, lambda, angle, pol).unwrap();
                prop_assert!((0.0..=1.0).contains(&r));
            }
        }
    }
}
