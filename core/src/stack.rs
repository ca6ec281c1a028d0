//! Layer stacks and simulation parameters.

use crate::error::{Error, Result};
use crate::lamella::Float;
use std::fmt;

/// Polarization of the incident plane wave.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Polarization {
    /// s (TE): electric field perpendicular to the plane of incidence.
    #[default]
    S,

    /// p (TM): electric field parallel to the plane of incidence.
    P,

    /// Unpolarized light, averaged as (Rs + Rp) / 2.
    Mixed,
}

impl fmt::Display for Polarization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S => write!(f, "s"),
            Self::P => write!(f, "p"),
            Self::Mixed => write!(f, "mixed"),
        }
    }
}

/// A single film in the stack: a material reference and a physical thickness.
///
/// A thickness of 0 degenerates the layer to a no-op; it must not perturb the
/// stack's reflectance.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Material name, resolved against the optical-constant repository.
    pub material: String,

    /// Physical thickness in nanometers. Must be >= 0.
    pub thickness_nm: Float,
}

impl Layer {
    /// Create a new `Layer`.
    ///
    /// * `material`     - Material name.
    /// * `thickness_nm` - Physical thickness in nanometers.
    pub fn new(material: impl Into<String>, thickness_nm: Float) -> Self {
        Self {
            material: material.into(),
            thickness_nm,
        }
    }
}

/// An ordered film stack between an incidence medium and a semi-infinite
/// substrate. Light travels from the incidence medium through `layers[0]`,
/// `layers[1]`, ... into the substrate. The stack may be empty (bare
/// substrate); incidence medium and substrate are always present.
#[derive(Clone, Debug, PartialEq)]
pub struct Stack {
    /// Incidence medium material name (typically air).
    pub incidence: String,

    /// The films, ordered from the incidence side down.
    pub layers: Vec<Layer>,

    /// Substrate material name. Semi-infinite; no thickness.
    pub substrate: String,
}

impl Stack {
    /// Create a stack in air on the given substrate.
    ///
    /// * `layers`    - Films from the incidence side down.
    /// * `substrate` - Substrate material name.
    pub fn new(layers: Vec<Layer>, substrate: impl Into<String>) -> Self {
        Self {
            incidence: String::from("Air"),
            layers,
            substrate: substrate.into(),
        }
    }

    /// Create a bare substrate with no films.
    ///
    /// * `substrate` - Substrate material name.
    pub fn bare(substrate: impl Into<String>) -> Self {
        Self::new(vec![], substrate)
    }

    /// Replace the incidence medium.
    ///
    /// * `incidence` - Incidence medium material name.
    pub fn with_incidence(mut self, incidence: impl Into<String>) -> Self {
        self.incidence = incidence.into();
        self
    }

    /// Validates layer thicknesses.
    pub fn validate(&self) -> Result<()> {
        for layer in &self.layers {
            if !(layer.thickness_nm >= 0.0) || !layer.thickness_nm.is_finite() {
                return Err(Error::InvalidParameter {
                    name: "thickness_nm",
                    value: layer.thickness_nm,
                    expected: "a finite value >= 0",
                });
            }
        }
        Ok(())
    }
}

/// Parameters of a spectral reflectance computation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParameters {
    /// Angle of incidence in degrees, in [0, 90).
    pub angle_deg: Float,

    /// Requested polarization.
    pub polarization: Polarization,

    /// First wavelength of the sweep in nanometers.
    pub lambda_start_nm: Float,

    /// Last wavelength of the sweep in nanometers. Must exceed the start.
    pub lambda_end_nm: Float,

    /// Wavelength increment in nanometers. Must be > 0.
    pub lambda_step_nm: Float,
}

impl SimulationParameters {
    /// Parameters covering the visible range (380-780 nm, 5 nm step) at
    /// normal incidence.
    ///
    /// * `polarization` - Requested polarization.
    pub fn visible(polarization: Polarization) -> Self {
        Self {
            angle_deg: 0.0,
            polarization,
            lambda_start_nm: 380.0,
            lambda_end_nm: 780.0,
            lambda_step_nm: 5.0,
        }
    }

    /// Validates every field, naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        if !(self.angle_deg >= 0.0 && self.angle_deg < 90.0) {
            return Err(Error::InvalidParameter {
                name: "angle_deg",
                value: self.angle_deg,
                expected: "an angle in [0, 90)",
            });
        }
        if !(self.lambda_start_nm > 0.0) {
            return Err(Error::InvalidParameter {
                name: "lambda_start_nm",
                value: self.lambda_start_nm,
                expected: "a wavelength > 0",
            });
        }
        if !(self.lambda_end_nm > self.lambda_start_nm) {
            return Err(Error::InvalidParameter {
                name: "lambda_end_nm",
                value: self.lambda_end_nm,
                expected: "a wavelength > lambda_start_nm",
            });
        }
        if !(self.lambda_step_nm > 0.0) {
            return Err(Error::InvalidParameter {
                name: "lambda_step_nm",
                value: self.lambda_step_nm,
                expected: "a step > 0",
            });
        }
        Ok(())
    }
}

/// A thickness range for sweep mode, in nanometers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepRange {
    /// First thickness of the sweep.
    pub start_nm: Float,

    /// Last thickness of the sweep. Must exceed the start.
    pub end_nm: Float,

    /// Thickness increment. Must be > 0.
    pub step_nm: Float,
}

impl SweepRange {
    /// Create a new `SweepRange`.
    ///
    /// * `start_nm` - First thickness of the sweep.
    /// * `end_nm`   - Last thickness of the sweep.
    /// * `step_nm`  - Thickness increment.
    pub fn new(start_nm: Float, end_nm: Float, step_nm: Float) -> Self {
        Self {
            start_nm,
            end_nm,
            step_nm,
        }
    }

    /// Validates the range, naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        if !(self.start_nm >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "sweep start_nm",
                value: self.start_nm,
                expected: "a thickness >= 0",
            });
        }
        if !(self.end_nm > self.start_nm) {
            return Err(Error::InvalidParameter {
                name: "sweep end_nm",
                value: self.end_nm,
                expected: "a thickness > start_nm",
            });
        }
        if !(self.step_nm > 0.0) {
            return Err(Error::InvalidParameter {
                name: "sweep step_nm",
                value: self.step_nm,
                expected: "a step > 0",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_stack_has_no_layers() {
        let stack = Stack::bare("Si");
        assert!(stack.layers.is_empty());
        assert_eq!(stack.incidence, "Air");
        assert_eq!(stack.substrate, "Si");
        assert!(stack.validate().is_ok());
    }

    #[test]
    fn negative_thickness_is_rejected() {
        let stack = Stack::new(vec![Layer::new("SiO2", -1.0)], "Si");
        assert!(matches!(
            stack.validate(),
            Err(Error::InvalidParameter {
                name: "thickness_nm",
                ..
            })
        ));
    }

    #[test]
    fn parameter_validation_names_the_offender() {
        let mut params = SimulationParameters::visible(Polarization::S);
        assert!(params.validate().is_ok());

        params.angle_deg = 90.0;
        assert!(matches!(
            params.validate(),
            Err(Error::InvalidParameter {
                name: "angle_deg",
                ..
            })
        ));

        params.angle_deg = 0.0;
        params.lambda_step_nm = 0.0;
        assert!(matches!(
            params.validate(),
            Err(Error::InvalidParameter {
                name: "lambda_step_nm",
                ..
            })
        ));
    }

    #[test]
    fn sweep_range_validation() {
        assert!(SweepRange::new(0.0, 500.0, 5.0).validate().is_ok());
        assert!(SweepRange::new(100.0, 100.0, 5.0).validate().is_err());
        assert!(SweepRange::new(0.0, 500.0, 0.0).validate().is_err());
    }
}
