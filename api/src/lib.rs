//! Engine facade consumed by the presentation layer.
//!
//! Composes the optical-constant repository, the spectral sampler and the
//! colorimetry pipeline behind four operations: `load_material`,
//! `compute_spectrum`, `compute_color` and `sweep_thickness`. The engine
//! holds no state beyond the shared material library; every computation
//! returns a fresh, independently owned artifact.

#[macro_use]
extern crate log;

use lamella_core::colorimetry::{spectrum_to_xy_rgb, ColorResult};
use lamella_core::error::Result;
use lamella_core::lamella::Float;
use lamella_core::sampler::SpectralSampler;
use lamella_core::spectrum::ReflectanceSpectrum;
use lamella_core::stack::{SimulationParameters, Stack, SweepRange};
use lamella_materials::{MaterialLibrary, MaterialSpectrum};
use std::sync::Arc;

/// The thin-film reflectance and colour engine.
pub struct Engine {
    /// Shared optical-constant repository.
    library: Arc<MaterialLibrary>,

    /// Drives per-wavelength solves, serially or fanned out.
    sampler: SpectralSampler,
}

impl Engine {
    /// Create an engine computing on the calling thread.
    ///
    /// * `library` - The optical-constant repository.
    pub fn new(library: MaterialLibrary) -> Self {
        Self::with_threads(library, 1)
    }

    /// Create an engine fanning per-wavelength solves out over worker
    /// threads.
    ///
    /// * `library` - The optical-constant repository.
    /// * `threads` - Number of worker threads; clamped to at least 1.
    pub fn with_threads(library: MaterialLibrary, threads: usize) -> Self {
        Self {
            library: Arc::new(library),
            sampler: SpectralSampler::new(threads),
        }
    }

    /// Returns the underlying material library.
    pub fn library(&self) -> &MaterialLibrary {
        &self.library
    }

    /// Loads (or returns the cached) optical constants for a material.
    ///
    /// * `name` - Material name.
    pub fn load_material(&self, name: &str) -> Result<Arc<MaterialSpectrum>> {
        self.library.load(name)
    }

    /// Computes the reflectance spectrum of a stack.
    ///
    /// * `stack`  - The film stack.
    /// * `params` - Simulation parameters.
    pub fn compute_spectrum(
        &self,
        stack: &Stack,
        params: &SimulationParameters,
    ) -> Result<ReflectanceSpectrum> {
        debug!(
            "computing spectrum: {} layer(s) on {}, θ = {}°, {} polarization",
            stack.layers.len(),
            stack.substrate,
            params.angle_deg,
            params.polarization
        );
        self.sampler.sample(self.library.as_ref(), stack, params)
    }

    /// Converts a reflectance spectrum to chromaticity and sRGB.
    ///
    /// * `spectrum` - The reflectance spectrum.
    pub fn compute_color(&self, spectrum: &ReflectanceSpectrum) -> Result<ColorResult> {
        spectrum_to_xy_rgb(spectrum)
    }

    /// Sweeps one layer's thickness and returns the ordered (thickness,
    /// colour) sequence.
    ///
    /// * `stack`       - The film stack.
    /// * `layer_index` - Index of the swept layer.
    /// * `range`       - Thickness range in nanometers.
    /// * `params`      - Simulation parameters; the wavelength range must
    ///                   cover the CIE reference grid.
    pub fn sweep_thickness(
        &self,
        stack: &Stack,
        layer_index: usize,
        range: &SweepRange,
        params: &SimulationParameters,
    ) -> Result<Vec<(Float, ColorResult)>> {
        self.sampler
            .sweep(self.library.as_ref(), stack, layer_index, range, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use lamella_core::error::Error;
    use lamella_core::stack::{Layer, Polarization};

    fn engine() -> Engine {
        Engine::new(MaterialLibrary::new())
    }

    #[test]
    fn load_material_is_idempotent() {
        let engine = engine();
        let first = engine.load_material("SiO2").unwrap();
        let second = engine.load_material("SiO2").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn oxide_on_silicon_end_to_end() {
        let engine = engine();
        let stack = Stack::new(vec![Layer::new("SiO2", 300.0)], "Si");
        let params = SimulationParameters::visible(Polarization::Mixed);

        let spectrum = engine.compute_spectrum(&stack, &params).unwrap();
        assert_eq!(spectrum.len(), 81);
        for s in spectrum.samples() {
            assert!((0.0..=1.0).contains(&s.value));
        }
        // Thermal oxide interference modulates the spectrum visibly.
        let values: Vec<Float> = spectrum.samples().iter().map(|s| s.value).collect();
        let spread = values.iter().cloned().fold(Float::MIN, Float::max)
            - values.iter().cloned().fold(Float::MAX, Float::min);
        assert!(spread > 0.05, "spread = {spread}");

        let color = engine.compute_color(&spectrum).unwrap();
        assert!(color.x > 0.0 && color.y > 0.0 && color.x + color.y <= 1.0);
    }

    #[test]
    fn bare_substrate_spectrum_is_flat_for_constant_index() {
        // Air over a constant-index medium: no interference, flat R.
        let engine = engine();
        let stack = Stack::bare("MgF2");
        let params = SimulationParameters::visible(Polarization::S);

        let spectrum = engine.compute_spectrum(&stack, &params).unwrap();
        let first = spectrum.samples()[0].value;
        for s in spectrum.samples() {
            assert!((s.value - first).abs() < 2e-3);
        }
        // Fresnel at n = 1.387 (the 380 nm table value): R = (0.387/2.387)².
        assert!(approx_eq!(Float, first, 0.026286, epsilon = 1e-4));
    }

    #[test]
    fn sweep_thickness_returns_ordered_colours() {
        let engine = engine();
        let stack = Stack::new(vec![Layer::new("SiO2", 0.0)], "Si");
        let params = SimulationParameters::visible(Polarization::Mixed);
        let range = SweepRange::new(0.0, 500.0, 125.0);

        let swept = engine.sweep_thickness(&stack, 0, &range, &params).unwrap();
        assert_eq!(swept.len(), 5);
        for pair in swept.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
        // Growing oxide shifts the colour; successive entries differ.
        let (_, a) = swept[0];
        let (_, b) = swept[2];
        assert!((a.rgb[0] - b.rgb[0]).abs() + (a.rgb[1] - b.rgb[1]).abs() > 0.01);
    }

    #[test]
    fn missing_material_surfaces_as_data_not_found() {
        let engine = engine();
        let stack = Stack::new(vec![Layer::new("Kryptonite", 50.0)], "Si");
        let params = SimulationParameters::visible(Polarization::S);
        assert!(matches!(
            engine.compute_spectrum(&stack, &params),
            Err(Error::DataNotFound(name)) if name == "Kryptonite"
        ));
    }
}
