// Listing Watermark Library
//
// Cover-fits uploaded listing photos onto a fixed canvas and draws a
// background-stripped watermark with a drop shadow over them.

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod raster;
pub mod watermark;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pipeline::{
    apply_watermark, default_pipeline, FallbackReason, MediaFile, PipelineOutcome,
    WatermarkPipeline,
};
pub use raster::RasterImage;
