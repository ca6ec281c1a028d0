//! Error taxonomy shared across the engine.

use crate::lamella::Float;
use thiserror::Error;

/// Errors surfaced by the engine. Every variant names the offending value;
/// nothing is silently substituted or swallowed.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// No optical constants are registered under the requested name.
    #[error("no optical constants registered for material '{0}'")]
    DataNotFound(String),

    /// A material data source could not be parsed.
    #[error("malformed optical data for '{name}': {reason}")]
    DataFormat {
        /// Material name the source was registered under.
        name: String,

        /// What was wrong with the source.
        reason: String,
    },

    /// A simulation parameter is outside its valid range.
    #[error("invalid {name} {value}: expected {expected}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,

        /// The rejected value.
        value: Float,

        /// Description of the valid range.
        expected: &'static str,
    },

    /// A reflectance spectrum does not span the CIE reference grid.
    #[error(
        "reflectance spectrum covers [{min_nm} nm, {max_nm} nm] but colorimetry \
         requires [{required_min_nm} nm, {required_max_nm} nm]"
    )]
    ColorimetryRange {
        /// Lowest wavelength in the input spectrum.
        min_nm: Float,

        /// Highest wavelength in the input spectrum.
        max_nm: Float,

        /// Lower edge of the CIE reference grid.
        required_min_nm: Float,

        /// Upper edge of the CIE reference grid.
        required_max_nm: Float,
    },
}

/// Result type used across the engine.
pub type Result<T> = std::result::Result<T, Error>;
