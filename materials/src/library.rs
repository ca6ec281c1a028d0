//! The material library: named optical-constant sources with a process-wide
//! cache.

use crate::parse::parse_nk_table;
use crate::spectrum_data::MaterialSpectrum;
use lamella_core::error::{Error, Result};
use lamella_core::lamella::*;
use lamella_core::material::OpticalConstants;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Bundled optical-constant tables, in the same three-column text format the
/// on-disk sources use.
#[rustfmt::skip]
const BUNDLED: [(&str, &str); 7] = [
    ("Al",    include_str!("../data/Al.txt")),
    ("Ge",    include_str!("../data/Ge.txt")),
    ("MgF2",  include_str!("../data/MgF2.txt")),
    ("Si",    include_str!("../data/Si.txt")),
    ("Si3N4", include_str!("../data/Si3N4.txt")),
    ("SiO2",  include_str!("../data/SiO2.txt")),
    ("TiO2",  include_str!("../data/TiO2.txt")),
];

/// Resolves material names to tabulated optical constants and caches every
/// loaded spectrum for the library lifetime.
///
/// Resolution order: "Air" (built-in, n=1, k=0), then `<data_dir>/<name>.txt`
/// when a data directory is configured, then the bundled tables. Loading is
/// idempotent; a second request for the same name returns the cached spectrum
/// without re-parsing, and the cache lock serializes concurrent first loads
/// so each source is parsed at most once.
pub struct MaterialLibrary {
    /// Optional directory of on-disk `<name>.txt` sources.
    data_dir: Option<PathBuf>,

    /// Loaded spectra keyed by material name.
    cache: Mutex<HashMap<String, Arc<MaterialSpectrum>>>,
}

impl MaterialLibrary {
    /// A library serving only the built-in and bundled materials.
    pub fn new() -> Self {
        Self {
            data_dir: None,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// A library that resolves names against a data directory first.
    ///
    /// * `data_dir` - Directory containing `<name>.txt` sources.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Names of the built-in and bundled materials.
    pub fn bundled_names() -> Vec<&'static str> {
        let mut names = vec!["Air"];
        names.extend(BUNDLED.iter().map(|(name, _)| *name));
        names
    }

    /// Loads (or returns the cached) spectrum for a material name.
    ///
    /// * `name` - Material name.
    pub fn load(&self, name: &str) -> Result<Arc<MaterialSpectrum>> {
        let mut cache = self.cache.lock().unwrap();
        if let Some(spectrum) = cache.get(name) {
            return Ok(Arc::clone(spectrum));
        }

        // Parse while holding the lock: concurrent first requests for the
        // same name wait here instead of parsing twice.
        let spectrum = Arc::new(self.read_source(name)?);
        cache.insert(String::from(name), Arc::clone(&spectrum));
        info!(
            "loaded optical constants for '{}' ({} samples)",
            name,
            spectrum.samples().len()
        );
        Ok(spectrum)
    }

    /// The interpolated complex refractive index of a material at a
    /// wavelength.
    ///
    /// * `name`      - Material name.
    /// * `lambda_nm` - The wavelength in nanometers.
    pub fn lookup(&self, name: &str, lambda_nm: Float) -> Result<ComplexFloat> {
        Ok(self.load(name)?.at(lambda_nm))
    }

    /// Reads and parses the source registered under a name.
    fn read_source(&self, name: &str) -> Result<MaterialSpectrum> {
        if name.eq_ignore_ascii_case("air") {
            return Ok(MaterialSpectrum::constant(name, 1.0, 0.0));
        }

        if let Some(dir) = &self.data_dir {
            let path = dir.join(format!("{name}.txt"));
            if path.is_file() {
                debug!("reading optical constants from {}", path.display());
                let text = std::fs::read_to_string(&path).map_err(|e| Error::DataFormat {
                    name: String::from(name),
                    reason: format!("cannot read {}: {e}", path.display()),
                })?;
                return parse_nk_table(name, &text);
            }
        }

        if let Some((_, text)) = BUNDLED
            .iter()
            .find(|(bundled, _)| bundled.eq_ignore_ascii_case(name))
        {
            return parse_nk_table(name, text);
        }

        Err(Error::DataNotFound(String::from(name)))
    }
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl OpticalConstants for MaterialLibrary {
    /// Returns the complex refractive index N = n + ik of a material at the
    /// given wavelength.
    ///
    /// * `material`  - Material name.
    /// * `lambda_nm` - The wavelength in nanometers.
    fn refractive_index(&self, material: &str, lambda_nm: Float) -> Result<ComplexFloat> {
        self.lookup(material, lambda_nm)
    }
}
