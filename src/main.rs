use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spraywad::models::{clamp_sample_factor, AppConfig, CONFIG_ENV_VAR};
use spraywad::services::ConversionPipeline;

#[derive(Parser)]
#[command(name = "spraywad")]
#[command(about = "Convert images into GoldSrc spray decals (tempdecal.wad)")]
struct Cli {
    /// YAML configuration file (overrides SPRAYWAD_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an image into a spray container
    Convert {
        /// Source image (BMP, PNG, JPEG, GIF, TGA, ...)
        source: PathBuf,

        /// Directory the container is written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// File name of the container
        #[arg(short = 'n', long)]
        output_name: Option<String>,

        /// Also write an indexed PNG preview to this path
        #[arg(short, long)]
        preview: Option<PathBuf>,

        /// NeuQuant sampling factor, 1 (best) to 30 (fastest)
        #[arg(short, long)]
        sample_factor: Option<i32>,

        /// Print the conversion report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the contents of a spray container
    Inspect {
        /// Container to read
        wad: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the spray size an image of the given size is fitted to
    Fit {
        width: u32,
        height: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert {
            source,
            output_dir,
            output_name,
            preview,
            sample_factor,
            json,
        }) => {
            init_logging();
            let mut config = AppConfig::resolve(cli.config.as_deref());
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if let Some(name) = output_name {
                config.output_name = name;
            }
            if preview.is_some() {
                config.preview = preview;
            }
            if let Some(factor) = sample_factor {
                config.sample_factor = clamp_sample_factor(factor);
            }
            run_convert_command(&source, &config, json)
        }
        Some(Commands::Inspect { wad, json }) => {
            init_logging();
            run_inspect_command(&wad, json)
        }
        Some(Commands::Fit { width, height }) => {
            let (w, h) = spray_index::fit_dimensions(width, height);
            println!("{width}x{height} -> {w}x{h}");
            Ok(())
        }
        None => {
            run_status_command(cli.config.as_deref());
            Ok(())
        }
    }
}

/// Minimal logging for CLI
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spraywad=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn run_convert_command(source: &Path, config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let pipeline = ConversionPipeline::from_config(config);
    let report = pipeline
        .convert(source)
        .with_context(|| format!("Failed to convert {}", source.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} ({}x{}) -> {} ({}x{}, {} bytes)",
            report.source.display(),
            report.source_width,
            report.source_height,
            report.output.display(),
            report.width,
            report.height,
            report.bytes_written
        );
        println!("  Palette: {:?}", report.path);
        if report.transparent_pixels > 0 {
            println!("  Transparent pixels: {}", report.transparent_pixels);
        }
        if let Some(ref preview) = report.preview {
            println!("  Preview: {}", preview.display());
        }
    }
    Ok(())
}

fn run_inspect_command(wad: &Path, json: bool) -> anyhow::Result<()> {
    let data =
        std::fs::read(wad).with_context(|| format!("Failed to read {}", wad.display()))?;
    let lump = spray_index::parse_wad(&data)
        .with_context(|| format!("Failed to parse {}", wad.display()))?;

    let image = &lump.image;
    let mode = if image.gradient_decal() {
        "gradient"
    } else {
        "transparent"
    };
    let last = image.palette().get(spray_index::TRANSPARENT_INDEX);

    if json {
        let value = serde_json::json!({
            "name": lump.name,
            "width": image.width(),
            "height": image.height(),
            "mode": mode,
            "mip_levels": lump.mips.len() + 1,
            "palette_255": last,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("Lump:        {}", lump.name);
        println!("Size:        {}x{}", image.width(), image.height());
        println!("Mode:        {mode}");
        println!("Mip levels:  {}", lump.mips.len() + 1);
        println!("Palette 255: ({}, {}, {})", last[0], last[1], last[2]);
    }
    Ok(())
}

fn run_status_command(config_path: Option<&Path>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let env_config = std::env::var(CONFIG_ENV_VAR).ok();

    println!("Spraywad v{VERSION}");
    println!("GoldSrc spray converter\n");

    println!("Environment Variables:");
    println!(
        "  {CONFIG_ENV_VAR} = {}",
        env_config.as_deref().unwrap_or("(not set)")
    );

    println!("\nConfiguration:");
    let source = match config_path {
        Some(path) => path.display().to_string(),
        None => env_config.unwrap_or_else(|| "defaults".to_string()),
    };
    let config = AppConfig::resolve(config_path);
    println!("  Source:        {source}");
    println!("  Output:        {}", config.output_path().display());
    println!("  Sample factor: {}", config.sample_factor);
    println!(
        "  Preview:       {}",
        config
            .preview
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );

    println!("\nCommands:");
    println!("  spraywad convert <SOURCE>     Convert an image into a spray container");
    println!("  spraywad inspect <WAD>        Show the contents of a spray container");
    println!("  spraywad fit <WIDTH> <HEIGHT> Print the fitted spray size");
}
