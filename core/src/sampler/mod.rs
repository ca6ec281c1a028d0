//! Spectral sampler: drives the solver across a wavelength range and sweeps
//! layer thicknesses into colour sequences.

use crate::colorimetry::{spectrum_to_xy_rgb, ColorResult};
use crate::error::{Error, Result};
use crate::lamella::*;
use crate::material::OpticalConstants;
use crate::optics::{reflectance, ResolvedSlice};
use crate::spectrum::{ReflectanceSpectrum, Sample};
use crate::stack::{SimulationParameters, Stack, SweepRange};
use std::sync::{Arc, Mutex};

/// Returns the sample positions covering [start, end] at the given step.
/// When the range divides evenly both endpoints are included; otherwise the
/// last step would overshoot and the final sample is clamped to `end`.
///
/// * `start` - First sample position.
/// * `end`   - Last sample position. Must exceed `start`.
/// * `step`  - Increment. Must be > 0.
pub fn sample_grid(start: Float, end: Float, step: Float) -> Vec<Float> {
    // Tolerance absorbs accumulated float error so an even division does not
    // yield a duplicated endpoint.
    let eps = step * 1e-9;

    let mut grid = Vec::with_capacity(((end - start) / step) as usize + 2);
    let mut i = 0usize;
    loop {
        let v = start + i as Float * step;
        if v >= end - eps {
            break;
        }
        grid.push(v);
        i += 1;
    }
    grid.push(end);
    grid
}

/// Samples reflectance spectra, optionally fanning the independent
/// per-wavelength calculations out over worker threads.
#[derive(Clone, Copy, Debug)]
pub struct SpectralSampler {
    /// Number of worker threads. 1 runs everything on the calling thread.
    threads: usize,
}

impl SpectralSampler {
    /// Create a new `SpectralSampler`.
    ///
    /// * `threads` - Number of worker threads; clamped to at least 1.
    pub fn new(threads: usize) -> Self {
        Self {
            threads: max(threads, 1),
        }
    }

    /// A sampler that computes on the calling thread only.
    pub fn serial() -> Self {
        Self::new(1)
    }

    /// Computes the reflectance spectrum of a stack over the parameter
    /// wavelength range. Samples are independent; they are computed in any
    /// order and reassembled in ascending wavelength order.
    ///
    /// * `constants` - Optical-constant resolver.
    /// * `stack`     - The film stack.
    /// * `params`    - Simulation parameters.
    pub fn sample(
        &self,
        constants: &dyn OpticalConstants,
        stack: &Stack,
        params: &SimulationParameters,
    ) -> Result<ReflectanceSpectrum> {
        params.validate()?;
        stack.validate()?;

        let grid = sample_grid(
            params.lambda_start_nm,
            params.lambda_end_nm,
            params.lambda_step_nm,
        );
        debug!(
            "sampling {} wavelengths in [{}, {}] nm on {} thread(s)",
            grid.len(),
            params.lambda_start_nm,
            params.lambda_end_nm,
            self.threads
        );

        let values = if self.threads == 1 || grid.len() < 2 {
            grid.iter()
                .map(|&lambda_nm| sample_one(constants, stack, params, lambda_nm))
                .collect::<Result<Vec<_>>>()?
        } else {
            self.sample_parallel(constants, stack, params, &grid)?
        };

        let samples = grid
            .iter()
            .zip(values)
            .map(|(&lambda, value)| Sample::new(lambda, value))
            .collect();
        Ok(ReflectanceSpectrum::new(samples))
    }

    /// Fan-out/fan-in over a bounded work queue: workers pull wavelength
    /// indices, write results into their slot, and the slots are collected in
    /// grid order afterwards. The first error encountered wins.
    fn sample_parallel(
        &self,
        constants: &dyn OpticalConstants,
        stack: &Stack,
        params: &SimulationParameters,
        grid: &[Float],
    ) -> Result<Vec<Float>> {
        let slots: Arc<Mutex<Vec<Option<Result<Float>>>>> =
            Arc::new(Mutex::new(vec![None; grid.len()]));

        crossbeam::scope(|scope| {
            let (tx, rx) = crossbeam_channel::bounded::<usize>(self.threads);

            for _ in 0..self.threads {
                let rxc = rx.clone();
                let slots = Arc::clone(&slots);
                scope.spawn(move |_| {
                    for i in rxc.iter() {
                        let result = sample_one(constants, stack, params, grid[i]);
                        let mut slots = slots.lock().unwrap();
                        slots[i] = Some(result);
                    }
                });
            }
            drop(rx); // Drop extra rx since we've cloned one for each worker.

            // Send work.
            for i in 0..grid.len() {
                tx.send(i).unwrap();
            }
        })
        .unwrap();

        let mut slots = slots.lock().unwrap();
        slots
            .drain(..)
            .map(|slot| slot.expect("every wavelength slot is filled"))
            .collect()
    }

    /// Sweeps one layer's thickness across a range and maps every resulting
    /// spectrum through colorimetry, producing the ordered (thickness,
    /// colour) sequence behind a colour chart. The parameter wavelength range
    /// must cover the CIE reference grid.
    ///
    /// * `constants`   - Optical-constant resolver.
    /// * `stack`       - The film stack.
    /// * `layer_index` - Index of the swept layer.
    /// * `range`       - Thickness range in nanometers.
    /// * `params`      - Simulation parameters.
    pub fn sweep(
        &self,
        constants: &dyn OpticalConstants,
        stack: &Stack,
        layer_index: usize,
        range: &SweepRange,
        params: &SimulationParameters,
    ) -> Result<Vec<(Float, ColorResult)>> {
        range.validate()?;
        if layer_index >= stack.layers.len() {
            return Err(Error::InvalidParameter {
                name: "layer_index",
                value: layer_index as Float,
                expected: "an index into the stack's layers",
            });
        }

        let thicknesses = sample_grid(range.start_nm, range.end_nm, range.step_nm);
        debug!(
            "sweeping layer {} over {} thicknesses",
            layer_index,
            thicknesses.len()
        );

        let mut swept = stack.clone();
        thicknesses
            .into_iter()
            .map(|thickness_nm| {
                swept.layers[layer_index].thickness_nm = thickness_nm;
                let spectrum = self.sample(constants, &swept, params)?;
                let color = spectrum_to_xy_rgb(&spectrum)?;
                Ok((thickness_nm, color))
            })
            .collect()
    }
}

impl Default for SpectralSampler {
    /// A serial sampler.
    fn default() -> Self {
        Self::serial()
    }
}

/// Resolves every medium of the stack at one wavelength and solves it.
fn sample_one(
    constants: &dyn OpticalConstants,
    stack: &Stack,
    params: &SimulationParameters,
    lambda_nm: Float,
) -> Result<Float> {
    let incidence = constants.refractive_index(&stack.incidence, lambda_nm)?;
    let layers = stack
        .layers
        .iter()
        .map(|layer| {
            let n = constants.refractive_index(&layer.material, lambda_nm)?;
            Ok((n, layer.thickness_nm))
        })
        .collect::<Result<Vec<_>>>()?;
    let substrate = constants.refractive_index(&stack.substrate, lambda_nm)?;

    let slice = ResolvedSlice::new(incidence, layers, substrate);
    reflectance(&slice, lambda_nm, params.angle_deg, params.polarization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::{Layer, Polarization};
    use float_cmp::approx_eq;
    use std::collections::HashMap;

    /// Fixed-index materials for tests.
    struct TestConstants(HashMap<&'static str, ComplexFloat>);

    impl TestConstants {
        fn new() -> Self {
            let mut map = HashMap::new();
            map.insert("Air", ComplexFloat::new(1.0, 0.0));
            map.insert("Film", ComplexFloat::new(2.0, 0.0));
            map.insert("Glass", ComplexFloat::new(1.5, 0.0));
            Self(map)
        }
    }

    impl OpticalConstants for TestConstants {
        fn refractive_index(&self, material: &str, _lambda_nm: Float) -> Result<ComplexFloat> {
            self.0
                .get(material)
                .copied()
                .ok_or_else(|| Error::DataNotFound(String::from(material)))
        }
    }

    #[test]
    fn grid_includes_both_endpoints_on_even_division() {
        let grid = sample_grid(400.0, 700.0, 100.0);
        assert_eq!(grid, vec![400.0, 500.0, 600.0, 700.0]);
    }

    #[test]
    fn grid_clamps_last_sample_on_uneven_division() {
        let grid = sample_grid(400.0, 650.0, 100.0);
        assert_eq!(grid, vec![400.0, 500.0, 600.0, 650.0]);
    }

    #[test]
    fn grid_handles_fractional_steps() {
        let grid = sample_grid(380.0, 780.0, 5.0);
        assert_eq!(grid.len(), 81);
        assert_eq!(*grid.first().unwrap(), 380.0);
        assert_eq!(*grid.last().unwrap(), 780.0);
    }

    #[test]
    fn spectrum_is_ordered_and_bounded() {
        let constants = TestConstants::new();
        let stack = Stack::new(vec![Layer::new("Film", 100.0)], "Glass");
        let params = SimulationParameters::visible(Polarization::S);

        let spectrum = SpectralSampler::serial()
            .sample(&constants, &stack, &params)
            .unwrap();
        assert_eq!(spectrum.len(), 81);
        for pair in spectrum.samples().windows(2) {
            assert!(pair[0].lambda < pair[1].lambda);
        }
        for s in spectrum.samples() {
            assert!((0.0..=1.0).contains(&s.value));
        }
    }

    #[test]
    fn parallel_matches_serial() {
        let constants = TestConstants::new();
        let stack = Stack::new(
            vec![Layer::new("Film", 140.0), Layer::new("Glass", 60.0)],
            "Glass",
        );
        let mut params = SimulationParameters::visible(Polarization::Mixed);
        params.angle_deg = 25.0;

        let serial = SpectralSampler::serial()
            .sample(&constants, &stack, &params)
            .unwrap();
        let parallel = SpectralSampler::new(4)
            .sample(&constants, &stack, &params)
            .unwrap();

        assert_eq!(serial.len(), parallel.len());
        for (a, b) in serial.samples().iter().zip(parallel.samples()) {
            assert_eq!(a.lambda, b.lambda);
            assert!(approx_eq!(Float, a.value, b.value, epsilon = 1e-15));
        }
    }

    #[test]
    fn unknown_material_propagates_data_not_found() {
        let constants = TestConstants::new();
        let stack = Stack::new(vec![Layer::new("Unobtainium", 10.0)], "Glass");
        let params = SimulationParameters::visible(Polarization::S);

        let err = SpectralSampler::serial()
            .sample(&constants, &stack, &params)
            .unwrap_err();
        assert_eq!(err, Error::DataNotFound(String::from("Unobtainium")));
    }

    #[test]
    fn sweep_is_ordered_by_thickness() {
        let constants = TestConstants::new();
        let stack = Stack::new(vec![Layer::new("Film", 0.0)], "Glass");
        let params = SimulationParameters::visible(Polarization::Mixed);
        let range = SweepRange::new(0.0, 300.0, 100.0);

        let swept = SpectralSampler::serial()
            .sweep(&constants, &stack, 0, &range, &params)
            .unwrap();
        assert_eq!(swept.len(), 4);
        let thicknesses: Vec<Float> = swept.iter().map(|(t, _)| *t).collect();
        assert_eq!(thicknesses, vec![0.0, 100.0, 200.0, 300.0]);
        for (_, color) in &swept {
            assert!(color.x > 0.0 && color.y > 0.0 && color.x + color.y <= 1.0);
        }
    }

    #[test]
    fn sweep_rejects_bad_layer_index() {
        let constants = TestConstants::new();
        let stack = Stack::bare("Glass");
        let params = SimulationParameters::visible(Polarization::S);
        let range = SweepRange::new(0.0, 100.0, 50.0);

        assert!(matches!(
            SpectralSampler::serial().sweep(&constants, &stack, 0, &range, &params),
            Err(Error::InvalidParameter { name: "layer_index", .. })
        ));
    }

    #[test]
    fn sweep_does_not_mutate_the_input_stack() {
        let constants = TestConstants::new();
        let stack = Stack::new(vec![Layer::new("Film", 55.0)], "Glass");
        let params = SimulationParameters::visible(Polarization::S);
        let range = SweepRange::new(0.0, 100.0, 50.0);

        SpectralSampler::serial()
            .sweep(&constants, &stack, 0, &range, &params)
            .unwrap();
        assert_eq!(stack.layers[0].thickness_nm, 55.0);
    }
}
