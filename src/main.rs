use anyhow::Context;
use clap::Parser;
use listing_watermark::config::PipelineConfig;
use listing_watermark::raster::OutputFormat;
use listing_watermark::{MediaFile, WatermarkPipeline};
use std::path::{Path, PathBuf};

/// Listing Watermark - cover-fit a listing photo and stamp the watermark on it
#[derive(Parser, Debug)]
#[command(name = "listing-watermark")]
#[command(version, about, long_about = None)]
struct Args {
    /// Image to watermark
    input: PathBuf,

    /// Output path (default: <input stem>-watermarked.<ext> next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only cover-fit and re-encode, without drawing the watermark
    #[arg(long)]
    no_watermark: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if args.no_watermark {
        config.watermark.enabled = false;
    }

    listing_watermark::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!(
        config_file = ?args.config,
        width = config.output.width,
        height = config.output.height,
        watermark_enabled = config.watermark.enabled,
        watermark_source = %config.watermark.source,
        "Configuration loaded successfully"
    );

    let pipeline = WatermarkPipeline::from_config(config)?;

    let input = MediaFile::from_path(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let (output, outcome) = pipeline.apply_with_outcome(input).await?;

    let output_path = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input, &output.mime_type));
    output
        .write_to(&output_path)
        .await
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    tracing::info!(
        output = %output_path.display(),
        outcome = outcome.as_str(),
        "Wrote output file"
    );

    Ok(())
}

/// `<dir>/<stem>-watermarked.<ext>`, with the extension of the output type.
fn default_output_path(input: &Path, mime_type: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());

    let ext = OutputFormat::from_mime(mime_type)
        .map(|f| f.extension().to_string())
        .or_else(|| {
            input
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
        });

    let name = match ext {
        Some(ext) => format!("{stem}-watermarked.{ext}"),
        None => format!("{stem}-watermarked"),
    };
    input.with_file_name(name)
}
