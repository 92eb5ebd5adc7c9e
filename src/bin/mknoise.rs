//! Render lattice noise to TGA/PNG, dump raw lattices, or time sampling.
//!
//! Run with: cargo run --bin mknoise -- render --fractal -o noise.tga

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mknoise::noise::Kernel;
use mknoise::{bench, render, BenchConfig, RenderConfig};

#[derive(Parser)]
#[command(name = "mknoise")]
#[command(about = "Generate lattice noise textures")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render interpolated noise or a fractal sum
    Render(RenderArgs),
    /// Write the raw lattice, one pixel per sample
    Lattice {
        #[arg(long, default_value = "128")]
        dim_length: u32,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(short, long, default_value = "lattice.tga")]
        output: PathBuf,
    },
    /// Time 2D sampling over a large pixel grid
    Bench {
        #[arg(long, default_value = "4096")]
        size: u32,

        #[arg(long, default_value = "10")]
        loops: u32,

        #[arg(long, default_value = "catmull-rom")]
        kernel: Kernel,

        /// Also write the last loop's image here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// JSON render config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long)]
    dim_length: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Lattice cells per pixel
    #[arg(long)]
    scale: Option<f32>,

    /// linear, catmull-rom or hermite
    #[arg(long)]
    kernel: Option<Kernel>,

    /// Use a fractal sum (default fbm unless tuned below)
    #[arg(long)]
    fractal: bool,

    #[arg(long)]
    octaves: Option<u32>,

    #[arg(long)]
    amplitude_ratio: Option<f32>,

    #[arg(long)]
    frequency_ratio: Option<f32>,

    #[arg(long)]
    offset: Option<f32>,

    #[arg(short, long, default_value = "noise.tga")]
    output: PathBuf,
}

impl RenderArgs {
    fn into_config(self) -> mknoise::Result<(RenderConfig, PathBuf)> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::from_json_file(path)?,
            None => RenderConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(dim_length) = self.dim_length {
            config.dim_length = dim_length;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if let Some(kernel) = self.kernel {
            config.kernel = kernel;
        }

        let tuned = self.octaves.is_some()
            || self.amplitude_ratio.is_some()
            || self.frequency_ratio.is_some()
            || self.offset.is_some();
        if self.fractal || tuned {
            let mut options = config.fractal.unwrap_or_default();
            if let Some(octaves) = self.octaves {
                options.octaves = octaves;
            }
            if let Some(ratio) = self.amplitude_ratio {
                options.amplitude_ratio = ratio;
            }
            if let Some(ratio) = self.frequency_ratio {
                options.frequency_ratio = ratio;
            }
            if let Some(offset) = self.offset {
                options.offset = offset;
            }
            config.fractal = Some(options);
        }

        config.validate()?;
        Ok((config, self.output))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Render(args) => {
            let (config, output) = args.into_config()?;
            let lattice = config.build_lattice()?;
            let buffer = render::render_noise(&lattice, &config)?;
            render::save(&buffer, &output)?;
            info!(
                seed = lattice.seed(),
                octaves = config.fractal.map(|o| o.octaves),
                "wrote {}",
                output.display()
            );
        }
        Command::Lattice { dim_length, seed, output } => {
            let config = RenderConfig {
                dim_length,
                seed,
                ..Default::default()
            };
            let lattice = config.build_lattice()?;
            let buffer = render::render_lattice(&lattice)?;
            render::save(&buffer, &output)?;
            info!(seed = lattice.seed(), "wrote {}", output.display());
        }
        Command::Bench { size, loops, kernel, output } => {
            let config = BenchConfig {
                width: size,
                height: size,
                loops,
                kernel,
                ..Default::default()
            };
            println!("Benchmarking started...");
            let report = bench::run(&config)?;
            println!("Average Seconds Spent: {:.6}.", report.average.as_secs_f64());
            println!("Max value: {:.6}", report.max_value);
            if let Some(path) = output {
                render::save(&report.image, &path)?;
                info!("wrote {}", path.display());
            }
        }
    }

    Ok(())
}
