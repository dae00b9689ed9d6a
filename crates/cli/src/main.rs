//! texel CLI - windowed co-occurrence texture features

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use texel_algorithms::texture::{
    FeatureVolume, TextureFeature, TextureFeatureFilter, TextureParams, Window,
};
use texel_core::io::{read_volume, write_volume};
use texel_core::{BoundaryCondition, Offset, Volume};
use texel_parallel::{ProcessingMode, Progress};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "texel")]
#[command(author, version, about = "Windowed co-occurrence texture features", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about an image file
    Info {
        /// Input TIFF (single page = 2-D, page stack = 3-D)
        input: PathBuf,
    },
    /// Compute the eight Haralick features around every pixel
    Glcm {
        /// Input TIFF
        input: PathBuf,
        /// Output base path; one `<stem>_<feature>.tif` is written per feature
        output: PathBuf,
        /// Window radius: one value for all axes or one per axis ("2,2,1")
        #[arg(short, long, default_value = "10")]
        radius: String,
        /// Co-occurrence offset, repeatable ("1,0,0"); defaults to a unit step
        /// along the first axis
        #[arg(short, long = "offset")]
        offsets: Vec<String>,
        /// Histogram bins per axis
        #[arg(short, long, default_value = "64")]
        bins: usize,
        /// Lowest intensity counted
        #[arg(long, default_value = "0")]
        min: f64,
        /// Highest intensity counted
        #[arg(long, default_value = "255")]
        max: f64,
        /// Normalize the histogram before extracting features
        #[arg(short, long)]
        normalize: bool,
        /// Out-of-image reads: clamp, constant:V, periodic
        #[arg(long, default_value = "clamp")]
        boundary: String,
        /// Worker threads (default: all cores)
        #[arg(short, long)]
        threads: Option<usize>,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} px ({eta})")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

fn read_image(path: &Path) -> Result<Volume<f64>> {
    let pb = spinner("Reading image...");
    let volume: Volume<f64> = read_volume(path).context("Failed to read image")?;
    pb.finish_and_clear();
    info!("Input: {:?}", volume.shape());
    Ok(volume)
}

fn write_features(features: &FeatureVolume, output: &Path) -> Result<Vec<PathBuf>> {
    let pb = spinner("Writing features...");
    let mut written = Vec::with_capacity(TextureFeature::ALL.len());
    for feature in TextureFeature::ALL {
        let path = feature_path(output, feature);
        let component = features
            .component(feature)
            .with_context(|| format!("Failed to extract {}", feature.name()))?;
        write_volume(&component, &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Wrote {}", path.display());
        written.push(path);
    }
    pb.finish_and_clear();
    Ok(written)
}

/// `out/texture.tif` -> `out/texture_energy.tif`
fn feature_path(output: &Path, feature: TextureFeature) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "texture".to_string());
    output.with_file_name(format!("{}_{}.tif", stem, feature.name()))
}

fn done(name: &str, paths: &[PathBuf], elapsed: Duration) {
    println!("{} saved to:", name);
    for path in paths {
        println!("  {}", path.display());
    }
    println!("  Processing time: {:.2?}", elapsed);
}

fn parse_list<T: std::str::FromStr>(s: &str, what: &str) -> Result<Vec<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<T>()
                .with_context(|| format!("Invalid {} component '{}' in '{}'", what, part, s))
        })
        .collect()
}

fn parse_window(s: &str) -> Result<Window> {
    let radius: Vec<usize> = parse_list(s, "radius")?;
    match radius.as_slice() {
        [r] => Ok(Window::Uniform(*r)),
        _ => Ok(Window::PerAxis(radius)),
    }
}

fn parse_offsets(values: &[String], ndim: usize) -> Result<Vec<Offset>> {
    if values.is_empty() {
        let mut unit = vec![0isize; ndim];
        if let Some(first) = unit.first_mut() {
            *first = 1;
        }
        return Ok(vec![Offset::new(unit)]);
    }
    values
        .iter()
        .map(|v| parse_list::<isize>(v, "offset").map(Offset::new))
        .collect()
}

fn parse_boundary(s: &str) -> Result<BoundaryCondition> {
    let lower = s.to_lowercase();
    match lower.as_str() {
        "clamp" | "neumann" | "zero-flux" => Ok(BoundaryCondition::ZeroFluxNeumann),
        "periodic" | "wrap" => Ok(BoundaryCondition::Periodic),
        _ => match lower.strip_prefix("constant:") {
            Some(value) => {
                let value: f64 = value.trim().parse().context("Invalid constant value")?;
                Ok(BoundaryCondition::Constant(value))
            }
            None => anyhow::bail!(
                "Unknown boundary: {}. Use clamp, constant:V, or periodic.",
                s
            ),
        },
    }
}

fn processing_mode(threads: Option<usize>) -> ProcessingMode {
    match threads {
        None => ProcessingMode::Parallel,
        Some(0) | Some(1) => ProcessingMode::Sequential,
        Some(n) => ProcessingMode::ParallelWith(n),
    }
}

/// Run the filter on a scoped thread while the main thread drives the bar
fn run_with_progress(filter: TextureFeatureFilter, image: &Volume<f64>) -> Result<FeatureVolume> {
    let progress = Progress::new();
    let filter = filter.with_progress(progress.clone());
    let pb = bar(image.len());

    let result = std::thread::scope(|scope| {
        let worker = scope.spawn(|| filter.execute(image));
        while !worker.is_finished() {
            pb.set_position(progress.completed() as u64);
            std::thread::sleep(Duration::from_millis(100));
        }
        worker.join()
    });
    pb.finish_and_clear();

    let features = result
        .map_err(|_| anyhow::anyhow!("Texture worker panicked"))?
        .context("Failed to compute texture features")?;
    Ok(features)
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let volume = read_image(&input)?;
            let stats = volume.statistics();

            println!("File: {}", input.display());
            println!(
                "Dimensions: {:?} ({} pixels)",
                volume.shape(),
                volume.len()
            );
            println!("Spacing: {:?}", volume.spacing());
            println!("Origin: {:?}", volume.origin());
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            if !volume.is_empty() {
                println!(
                    "  Valid pixels: {} ({:.1}%)",
                    stats.valid_count,
                    100.0 * stats.valid_count as f64 / volume.len() as f64
                );
            }
        }

        // ── GLCM ─────────────────────────────────────────────────────
        Commands::Glcm {
            input,
            output,
            radius,
            offsets,
            bins,
            min,
            max,
            normalize,
            boundary,
            threads,
        } => {
            let image = read_image(&input)?;
            let params = TextureParams {
                window: parse_window(&radius)?,
                offsets: parse_offsets(&offsets, image.ndim())?,
                bins_per_axis: bins,
                min,
                max,
                normalize,
                boundary: parse_boundary(&boundary)?,
                mode: processing_mode(threads),
            };
            debug!("Parameters: {:?}", params);
            let filter = TextureFeatureFilter::new(params).context("Invalid texture parameters")?;

            let start = Instant::now();
            let features = run_with_progress(filter, &image)?;
            let elapsed = start.elapsed();

            let written = write_features(&features, &output)?;
            done("Texture features", &written, elapsed);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window() {
        assert_eq!(parse_window("3").unwrap(), Window::Uniform(3));
        assert_eq!(
            parse_window("2, 2,1").unwrap(),
            Window::PerAxis(vec![2, 2, 1])
        );
        assert!(parse_window("a").is_err());
    }

    #[test]
    fn test_parse_offsets() {
        let defaults = parse_offsets(&[], 3).unwrap();
        assert_eq!(defaults, vec![Offset::from([1, 0, 0])]);

        let given = parse_offsets(&["0,1,-1".to_string(), "1,1,0".to_string()], 3).unwrap();
        assert_eq!(given[0], Offset::from([0, 1, -1]));
        assert_eq!(given.len(), 2);
        assert!(parse_offsets(&["1,x".to_string()], 2).is_err());
    }

    #[test]
    fn test_parse_boundary() {
        assert_eq!(
            parse_boundary("clamp").unwrap(),
            BoundaryCondition::ZeroFluxNeumann
        );
        assert_eq!(
            parse_boundary("Periodic").unwrap(),
            BoundaryCondition::Periodic
        );
        assert_eq!(
            parse_boundary("constant:-2.5").unwrap(),
            BoundaryCondition::Constant(-2.5)
        );
        assert!(parse_boundary("mirror").is_err());
    }

    #[test]
    fn test_feature_path() {
        let path = feature_path(Path::new("out/texture.tif"), TextureFeature::Energy);
        assert_eq!(path, PathBuf::from("out/texture_energy.tif"));
    }

    #[test]
    fn test_processing_mode() {
        assert_eq!(processing_mode(None), ProcessingMode::Parallel);
        assert_eq!(processing_mode(Some(1)), ProcessingMode::Sequential);
        assert_eq!(processing_mode(Some(4)), ProcessingMode::ParallelWith(4));
    }
}
