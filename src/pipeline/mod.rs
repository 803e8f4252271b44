//! Watermarking pipeline: decode, cover-fit, watermark, encode.
//!
//! [`WatermarkPipeline::apply`] never destroys the caller's upload. Only a
//! source that cannot be decoded is an error; every other failure yields the
//! best output still available:
//!
//! | Condition                    | Result                          |
//! |------------------------------|---------------------------------|
//! | MIME type is not `image/*`   | input unchanged                 |
//! | source does not decode       | `PipelineError::SourceDecode`   |
//! | watermark cannot be loaded   | cover-fitted image, no mark     |
//! | surface cannot be acquired   | input unchanged                 |
//! | resize fails                 | input unchanged                 |
//! | encoder fails or is empty    | input unchanged                 |

pub mod file;

pub use file::MediaFile;

use bytes::Bytes;
use chrono::Utc;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::raster::{
    decode_image, EncoderFactory, EncoderProvider, EncoderQuality, ImageError, OutputFormat,
};
use crate::watermark::{
    composite_with_report, CompositeRequest, ImageDimensions, WatermarkCache, WatermarkStyle,
};

/// Why the input was returned unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    SurfaceUnavailable,
    CompositeFailed,
    EncodeFailed,
}

/// What a pipeline run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Input was not an image and passed through untouched.
    NotAnImage,
    /// Cover-fitted image with the watermark drawn.
    Watermarked,
    /// Cover-fitted image without a watermark (disabled, unavailable or no room).
    WatermarkSkipped,
    /// Original input returned after a recoverable failure.
    Unchanged(FallbackReason),
}

impl PipelineOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineOutcome::NotAnImage => "not_an_image",
            PipelineOutcome::Watermarked => "watermarked",
            PipelineOutcome::WatermarkSkipped => "watermark_skipped",
            PipelineOutcome::Unchanged(FallbackReason::SurfaceUnavailable) => {
                "unchanged_surface_unavailable"
            }
            PipelineOutcome::Unchanged(FallbackReason::CompositeFailed) => {
                "unchanged_composite_failed"
            }
            PipelineOutcome::Unchanged(FallbackReason::EncodeFailed) => "unchanged_encode_failed",
        }
    }
}

/// Watermarks uploaded photos.
///
/// Holds the configuration, the watermark asset cache and the encoder
/// provider. Cheap to share behind an `Arc` or a `static`; concurrent
/// `apply` calls only share the cached watermark.
pub struct WatermarkPipeline {
    config: PipelineConfig,
    watermark: WatermarkCache,
    encoders: Arc<dyn EncoderProvider>,
}

impl std::fmt::Debug for WatermarkPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkPipeline")
            .field("config", &self.config)
            .field("watermark", &self.watermark)
            .finish()
    }
}

impl Default for WatermarkPipeline {
    fn default() -> Self {
        // Defaults always pass validation
        Self::build(PipelineConfig::default())
    }
}

impl WatermarkPipeline {
    /// Validate `config` and create a pipeline from it.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Same as [`WatermarkPipeline::new`].
    pub fn from_config(config: PipelineConfig) -> Result<Self, PipelineError> {
        Self::new(config)
    }

    fn build(config: PipelineConfig) -> Self {
        let watermark = WatermarkCache::new(&config.watermark, config.limits.clone());
        Self {
            config,
            watermark,
            encoders: Arc::new(EncoderFactory),
        }
    }

    /// Replace the encoder provider.
    pub fn with_encoders(mut self, encoders: Arc<dyn EncoderProvider>) -> Self {
        self.encoders = encoders;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn watermark_cache(&self) -> &WatermarkCache {
        &self.watermark
    }

    /// Watermark `file`, returning the output file.
    pub async fn apply(&self, file: MediaFile) -> Result<MediaFile, PipelineError> {
        self.apply_with_outcome(file).await.map(|(file, _)| file)
    }

    /// Watermark `file`, also reporting which path the run took.
    pub async fn apply_with_outcome(
        &self,
        file: MediaFile,
    ) -> Result<(MediaFile, PipelineOutcome), PipelineError> {
        if !file.is_image() {
            tracing::debug!(
                name = %file.name,
                mime_type = %file.mime_type,
                "Not an image, passing through"
            );
            return Ok((file, PipelineOutcome::NotAnImage));
        }

        let started = Instant::now();
        let source = decode_image(&file.data, &self.config.limits).map_err(|e| {
            tracing::warn!(name = %file.name, error = %e, "Source image could not be decoded");
            PipelineError::SourceDecode(e)
        })?;

        let asset = if self.config.watermark.enabled {
            self.watermark.get().await
        } else {
            None
        };

        let output = &self.config.output;
        let canvas = ImageDimensions::new(output.width, output.height);
        let request = CompositeRequest {
            source: &source,
            watermark: asset.as_ref().map(|a| a.stripped.as_ref()),
            canvas,
            style: WatermarkStyle::for_canvas(&self.config.watermark, canvas.width),
            max_surface_pixels: output.max_surface_pixels,
        };

        let (raster, drawn) = match composite_with_report(&request) {
            Ok(result) => result,
            Err(e) => {
                let reason = match e {
                    ImageError::SurfaceUnavailable { .. } => FallbackReason::SurfaceUnavailable,
                    _ => FallbackReason::CompositeFailed,
                };
                return Ok(self.fall_back(file, reason, &e));
            }
        };

        let format = OutputFormat::resolve(output.mime_type.as_deref(), &file.mime_type);
        let encoder = self.encoders.encoder_for(format);
        let encoded = match encoder.encode(&raster, EncoderQuality::from_factor(output.quality)) {
            Ok(encoded) if !encoded.data.is_empty() => encoded,
            Ok(_) => {
                let e = ImageError::encode_failed(format.as_str(), "encoder produced no data");
                return Ok(self.fall_back(file, FallbackReason::EncodeFailed, &e));
            }
            Err(e) => return Ok(self.fall_back(file, FallbackReason::EncodeFailed, &e)),
        };

        let outcome = if drawn {
            PipelineOutcome::Watermarked
        } else {
            PipelineOutcome::WatermarkSkipped
        };

        tracing::info!(
            name = %file.name,
            source_width = source.width(),
            source_height = source.height(),
            output_width = raster.width(),
            output_height = raster.height(),
            mime_type = encoded.content_type,
            bytes = encoded.data.len(),
            outcome = outcome.as_str(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Watermark pipeline completed"
        );

        let output_file = MediaFile {
            name: file.name,
            mime_type: encoded.content_type.to_string(),
            data: Bytes::from(encoded.data),
            last_modified: Utc::now(),
        };

        Ok((output_file, outcome))
    }

    fn fall_back(
        &self,
        file: MediaFile,
        reason: FallbackReason,
        error: &ImageError,
    ) -> (MediaFile, PipelineOutcome) {
        let outcome = PipelineOutcome::Unchanged(reason);
        tracing::warn!(
            name = %file.name,
            outcome = outcome.as_str(),
            error = %error,
            "Returning original upload unchanged"
        );
        (file, outcome)
    }
}

static DEFAULT_PIPELINE: OnceLock<WatermarkPipeline> = OnceLock::new();

/// The process-wide pipeline built from the default configuration.
///
/// Its watermark asset is loaded at most once per process.
pub fn default_pipeline() -> &'static WatermarkPipeline {
    DEFAULT_PIPELINE.get_or_init(WatermarkPipeline::default)
}

/// Watermark `file` with the process-wide default pipeline.
pub async fn apply_watermark(file: MediaFile) -> Result<MediaFile, PipelineError> {
    default_pipeline().apply(file).await
}
