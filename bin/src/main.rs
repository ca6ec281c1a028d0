#[macro_use]
extern crate log;

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use lamella_api::Engine;
use lamella_core::lamella::Float;
use lamella_core::stack::{Layer, Polarization, SimulationParameters, Stack, SweepRange};
use lamella_materials::MaterialLibrary;
use std::time::Duration;

/// Command-line polarization selector.
#[derive(Copy, Clone, Debug, ValueEnum)]
enum PolarizationArg {
    /// s (TE) polarization.
    S,

    /// p (TM) polarization.
    P,

    /// Unpolarized light, (Rs + Rp) / 2.
    Mixed,
}

impl std::fmt::Display for PolarizationArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::S => write!(f, "s"),
            Self::P => write!(f, "p"),
            Self::Mixed => write!(f, "mixed"),
        }
    }
}

impl From<PolarizationArg> for Polarization {
    fn from(arg: PolarizationArg) -> Self {
        match arg {
            PolarizationArg::S => Polarization::S,
            PolarizationArg::P => Polarization::P,
            PolarizationArg::Mixed => Polarization::Mixed,
        }
    }
}

/// System wide options.
#[derive(Parser)]
#[clap(author, version, about = "Thin-film reflectance and colour simulator", long_about = None)]
struct Options {
    /// The film stack, from the incidence side down.
    #[clap(
        short = 's',
        long = "stack",
        value_name = "SPEC",
        default_value = "",
        help = "Film stack as 'Material:thickness_nm,...' (e.g. 'SiO2:300'); empty for a bare substrate."
    )]
    stack: String,

    /// Substrate material.
    #[clap(
        long = "substrate",
        value_name = "NAME",
        default_value = "Si",
        help = "Substrate material name."
    )]
    substrate: String,

    /// Incidence medium material.
    #[clap(
        long = "incidence",
        value_name = "NAME",
        default_value = "Air",
        help = "Incidence medium material name."
    )]
    incidence: String,

    /// Directory of additional <name>.txt optical-constant sources.
    #[clap(
        short = 'd',
        long = "data-dir",
        value_name = "DIR",
        help = "Directory of <name>.txt optical-constant sources; bundled data is used otherwise."
    )]
    data_dir: Option<String>,

    /// Angle of incidence in degrees.
    #[clap(
        short = 'a',
        long = "angle",
        value_name = "DEG",
        default_value_t = 0.0,
        help = "Angle of incidence in degrees, in [0, 90)."
    )]
    angle: Float,

    /// Requested polarization.
    #[clap(
        short = 'p',
        long = "polarization",
        value_enum,
        default_value_t = PolarizationArg::Mixed,
        help = "Polarization of the incident light."
    )]
    polarization: PolarizationArg,

    /// First wavelength in nanometers.
    #[clap(
        long = "lambda-start",
        value_name = "NM",
        default_value_t = 380.0,
        help = "First wavelength of the spectrum in nm."
    )]
    lambda_start: Float,

    /// Last wavelength in nanometers.
    #[clap(
        long = "lambda-end",
        value_name = "NM",
        default_value_t = 780.0,
        help = "Last wavelength of the spectrum in nm."
    )]
    lambda_end: Float,

    /// Wavelength step in nanometers.
    #[clap(
        long = "lambda-step",
        value_name = "NM",
        default_value_t = 5.0,
        help = "Wavelength step in nm."
    )]
    lambda_step: Float,

    /// Layer index for thickness-sweep mode.
    #[clap(
        long = "sweep-layer",
        value_name = "INDEX",
        help = "Sweep this layer's thickness instead of printing a spectrum."
    )]
    sweep_layer: Option<usize>,

    /// Thickness sweep as start:end:step in nanometers.
    #[clap(
        long = "sweep-range",
        value_name = "START:END:STEP",
        default_value = "0:500:5",
        help = "Thickness sweep range in nm, as start:end:step."
    )]
    sweep_range: String,

    /// Number of worker threads.
    #[clap(
        short = 't',
        long = "nthreads",
        value_name = "NUM",
        default_value_t = 1,
        help = "Use specified number of threads for sampling."
    )]
    n_threads: usize,

    /// Suppress the reflectance table; print the colour only.
    #[clap(long, help = "Suppress the reflectance table; print the colour only.")]
    quiet: bool,
}

impl Options {
    /// Returns the number of threads to use.
    fn threads(&self) -> usize {
        let max_threads = num_cpus::get();
        match self.n_threads {
            0 => {
                warn!("Invalid nthreads");
                1
            }
            n if n > max_threads => {
                warn!("Num threads > max logical CPUs {}", max_threads);
                max_threads
            }
            n => n,
        }
    }
}

fn main() {
    // Initialize `env_logger`.
    env_logger::init();

    let options = Options::parse();
    if let Err(e) = run(&options) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(options: &Options) -> Result<(), String> {
    let library = match &options.data_dir {
        Some(dir) => MaterialLibrary::with_data_dir(dir),
        None => MaterialLibrary::new(),
    };
    let engine = Engine::with_threads(library, options.threads());

    let stack = Stack::new(parse_stack(&options.stack)?, options.substrate.clone())
        .with_incidence(options.incidence.clone());
    let params = SimulationParameters {
        angle_deg: options.angle,
        polarization: options.polarization.into(),
        lambda_start_nm: options.lambda_start,
        lambda_end_nm: options.lambda_end,
        lambda_step_nm: options.lambda_step,
    };

    match options.sweep_layer {
        Some(layer_index) => sweep(&engine, &stack, layer_index, options, &params),
        None => spectrum(&engine, &stack, options, &params),
    }
}

/// Compute and print one spectrum and its colour.
fn spectrum(
    engine: &Engine,
    stack: &Stack,
    options: &Options,
    params: &SimulationParameters,
) -> Result<(), String> {
    let spectrum = engine
        .compute_spectrum(stack, params)
        .map_err(|e| e.to_string())?;

    if !options.quiet {
        println!("# lambda_nm  R");
        for s in spectrum.samples() {
            println!("{:10.2}  {:.6}", s.lambda, s.value);
        }
    }

    let color = engine.compute_color(&spectrum).map_err(|e| e.to_string())?;
    let [r, g, b] = color.rgb8();
    println!("x = {:.4}  y = {:.4}", color.x, color.y);
    println!(
        "sRGB = #{r:02X}{g:02X}{b:02X}{}",
        if color.out_of_gamut { "  (out of gamut)" } else { "" }
    );
    Ok(())
}

/// Sweep a layer thickness and print the colour sequence.
fn sweep(
    engine: &Engine,
    stack: &Stack,
    layer_index: usize,
    options: &Options,
    params: &SimulationParameters,
) -> Result<(), String> {
    let range = parse_sweep_range(&options.sweep_range)?;

    let progress = ProgressBar::new_spinner().with_message("Sweeping thickness");
    progress.set_style(ProgressStyle::default_spinner());
    progress.enable_steady_tick(Duration::from_millis(100));

    let swept = engine
        .sweep_thickness(stack, layer_index, &range, params)
        .map_err(|e| e.to_string())?;
    progress.finish_and_clear();

    println!("# thickness_nm  x  y  sRGB");
    for (thickness_nm, color) in swept {
        let [r, g, b] = color.rgb8();
        println!(
            "{:12.2}  {:.4}  {:.4}  #{r:02X}{g:02X}{b:02X}",
            thickness_nm, color.x, color.y
        );
    }
    Ok(())
}

/// Parses a stack description of the form "Material:thickness_nm,...".
fn parse_stack(spec: &str) -> Result<Vec<Layer>, String> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Ok(vec![]);
    }

    spec.split(',')
        .map(|entry| {
            let entry = entry.trim();
            let (material, thickness) = entry
                .split_once(':')
                .ok_or(format!("invalid layer '{entry}': expected Material:thickness_nm"))?;
            let thickness_nm: Float = thickness
                .trim()
                .parse()
                .map_err(|_| format!("invalid thickness in layer '{entry}'"))?;
            Ok(Layer::new(material.trim(), thickness_nm))
        })
        .collect()
}

/// Parses a sweep range of the form "start:end:step" in nanometers.
fn parse_sweep_range(spec: &str) -> Result<SweepRange, String> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("invalid sweep range '{spec}': expected start:end:step"));
    }
    let mut values = [0.0; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .trim()
            .parse()
            .map_err(|_| format!("invalid sweep range value '{part}'"))?;
    }
    Ok(SweepRange::new(values[0], values[1], values[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_layer_lists() {
        let layers = parse_stack("SiO2:300, TiO2:45.5").unwrap();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0], Layer::new("SiO2", 300.0));
        assert_eq!(layers[1], Layer::new("TiO2", 45.5));
        assert!(parse_stack("").unwrap().is_empty());
        assert!(parse_stack("SiO2").is_err());
        assert!(parse_stack("SiO2:abc").is_err());
    }

    #[test]
    fn parses_sweep_ranges() {
        let range = parse_sweep_range("0:500:5").unwrap();
        assert_eq!(range, SweepRange::new(0.0, 500.0, 5.0));
        assert!(parse_sweep_range("0:500").is_err());
        assert!(parse_sweep_range("a:b:c").is_err());
    }
}
