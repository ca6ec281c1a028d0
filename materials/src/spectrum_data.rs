//! Tabulated complex refractive index of a single material.

use itertools::Itertools;
use lamella_core::error::{Error, Result};
use lamella_core::lamella::*;

/// One tabulated row: wavelength plus the real and imaginary parts of the
/// refractive index.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct NkSample {
    /// The wavelength in nanometers.
    pub lambda_nm: Float,

    /// Real part of the refractive index.
    pub n: Float,

    /// Extinction coefficient (imaginary part).
    pub k: Float,
}

impl NkSample {
    /// Create a new `NkSample`.
    ///
    /// * `lambda_nm` - The wavelength in nanometers.
    /// * `n`         - Real part of the refractive index.
    /// * `k`         - Extinction coefficient.
    pub fn new(lambda_nm: Float, n: Float, k: Float) -> Self {
        Self { lambda_nm, n, k }
    }
}

/// The optical constants of one material: an immutable, strictly-increasing
/// wavelength table of (n, k) pairs, interpolated on lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialSpectrum {
    /// Material name the table is registered under.
    name: String,

    /// The rows, sorted by strictly increasing wavelength. At least two.
    samples: Vec<NkSample>,
}

impl MaterialSpectrum {
    /// Create a spectrum from tabulated rows, validating the invariants: at
    /// least two samples, wavelengths strictly increasing, all values finite.
    ///
    /// * `name`    - Material name.
    /// * `samples` - The tabulated rows.
    pub fn new(name: impl Into<String>, samples: Vec<NkSample>) -> Result<Self> {
        let name = name.into();

        if samples.len() < 2 {
            return Err(Error::DataFormat {
                name,
                reason: format!("{} sample(s); at least two are required", samples.len()),
            });
        }
        for s in &samples {
            if !(s.lambda_nm.is_finite() && s.n.is_finite() && s.k.is_finite()) {
                return Err(Error::DataFormat {
                    name,
                    reason: format!("non-finite value at {} nm", s.lambda_nm),
                });
            }
        }
        if let Some((a, b)) = samples
            .iter()
            .tuple_windows()
            .find(|(a, b)| a.lambda_nm >= b.lambda_nm)
        {
            return Err(Error::DataFormat {
                name,
                reason: format!(
                    "wavelengths must be strictly increasing ({} nm followed by {} nm)",
                    a.lambda_nm, b.lambda_nm
                ),
            });
        }

        Ok(Self { name, samples })
    }

    /// A wavelength-independent material, spanning the whole usable range.
    /// Used for the incidence medium (air, n=1, k=0) and for tests.
    ///
    /// * `name` - Material name.
    /// * `n`    - Real part of the refractive index.
    /// * `k`    - Extinction coefficient.
    pub fn constant(name: impl Into<String>, n: Float, k: Float) -> Self {
        Self {
            name: name.into(),
            samples: vec![NkSample::new(1.0, n, k), NkSample::new(1.0e7, n, k)],
        }
    }

    /// Returns the material name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tabulated rows.
    pub fn samples(&self) -> &[NkSample] {
        &self.samples
    }

    /// Returns the tabulated wavelength range in nanometers.
    pub fn lambda_range(&self) -> (Float, Float) {
        (
            self.samples[0].lambda_nm,
            self.samples[self.samples.len() - 1].lambda_nm,
        )
    }

    /// The complex refractive index N = n + ik at a wavelength, linearly
    /// interpolated between the bracketing rows. A tabulated wavelength
    /// returns its row exactly; outside the tabulated range the nearest edge
    /// row is returned (clamp, no extrapolation).
    ///
    /// * `lambda_nm` - The wavelength in nanometers.
    pub fn at(&self, lambda_nm: Float) -> ComplexFloat {
        let samples = &self.samples;
        let last = samples.len() - 1;

        if lambda_nm <= samples[0].lambda_nm {
            return ComplexFloat::new(samples[0].n, samples[0].k);
        }
        if lambda_nm >= samples[last].lambda_nm {
            return ComplexFloat::new(samples[last].n, samples[last].k);
        }

        let i = find_interval(samples.len(), |index| samples[index].lambda_nm <= lambda_nm);
        let (a, b) = (&samples[i], &samples[i + 1]);
        let t = (lambda_nm - a.lambda_nm) / (b.lambda_nm - a.lambda_nm);
        ComplexFloat::new(lerp(t, a.n, b.n), lerp(t, a.k, b.k))
    }
}
