//! Parser for plain-text optical-constant tables.

use crate::spectrum_data::{MaterialSpectrum, NkSample};
use lamella_core::error::{Error, Result};

/// Parses a whitespace-delimited table of (wavelength_nm, n, k) rows into a
/// `MaterialSpectrum`. Blank lines and lines starting with `#` are ignored;
/// every other line must hold exactly three numeric columns with strictly
/// increasing wavelengths.
///
/// * `name` - Material name the source is registered under.
/// * `text` - The source text.
pub fn parse_nk_table(name: &str, text: &str) -> Result<MaterialSpectrum> {
    let mut samples = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() != 3 {
            return Err(Error::DataFormat {
                name: String::from(name),
                reason: format!(
                    "line {}: expected 3 columns (wavelength_nm n k), found {}",
                    line_no + 1,
                    columns.len()
                ),
            });
        }

        let mut values = [0.0; 3];
        for (value, column) in values.iter_mut().zip(&columns) {
            *value = column.parse().map_err(|_| Error::DataFormat {
                name: String::from(name),
                reason: format!("line {}: non-numeric value '{}'", line_no + 1, column),
            })?;
        }

        samples.push(NkSample::new(values[0], values[1], values[2]));
    }

    MaterialSpectrum::new(name, samples)
}
