use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rhisto::{Geometry, Histogram};

#[derive(Parser)]
#[command(name = "rhisto")]
#[command(about = "Color histograms laid out on locality-preserving color profiles")]
struct Cli {
    /// Bits per color channel: 8 for the full 4096x4096 grid, 2/4/6 for quick runs
    #[arg(short, long, global = true, default_value_t = 8)]
    depth: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save the default (bit-interleaved) profile
    DefaultProfile {
        /// Output profile image
        output: PathBuf,
    },
    /// Build an optimized profile from every image in a directory
    BuildProfile {
        /// Directory of sample images (not searched recursively)
        dir: PathBuf,

        /// Output profile image
        output: PathBuf,
    },
    /// Render the color histogram of images
    Render {
        /// Image files or directories of images
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output histogram image
        #[arg(short, long)]
        output: PathBuf,

        /// Profile image to lay the histogram out with (default profile if absent)
        #[arg(short, long)]
        profile: Option<PathBuf>,
    },
}

// Files of a directory, skipping subdirectories.
fn list_dir(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("could not open directory {}", dir.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn analyze_all(histogram: &mut Histogram, files: &[PathBuf]) {
    for (i, path) in files.iter().enumerate() {
        tracing::info!(file = i + 1, files = files.len(), path = %path.display(), "analyzing file");
        if let Err(e) = histogram.analyze_file(path) {
            tracing::warn!(%e, path = %path.display(), "skipping unreadable image");
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rhisto=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let geometry = Geometry::new(cli.depth)?;
    let mut histogram = Histogram::new(geometry);

    match cli.command {
        Commands::DefaultProfile { output } => {
            histogram.save_profile(&output)?;
        }
        Commands::BuildProfile { dir, output } => {
            let files = list_dir(&dir)?;
            analyze_all(&mut histogram, &files);
            histogram.optimize_profile()?;
            histogram.save_profile(&output)?;
        }
        Commands::Render { inputs, output, profile } => {
            if let Some(profile) = profile {
                histogram
                    .load_profile(&profile)
                    .with_context(|| format!("could not load profile {}", profile.display()))?;
            }
            let mut files = Vec::new();
            for input in inputs {
                if input.is_dir() {
                    files.extend(list_dir(&input)?);
                } else {
                    files.push(input);
                }
            }
            analyze_all(&mut histogram, &files);
            histogram.write_to_file(&output)?;
        }
    }

    Ok(())
}
