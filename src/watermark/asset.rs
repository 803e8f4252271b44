//! Watermark asset loading with a write-once cache.
//!
//! The watermark is fetched, decoded and background-stripped once, then
//! shared read-only through `Arc`s.
//!
//! # Supported Sources
//!
//! - `static/watermark.png` - plain filesystem path
//! - `file:///srv/assets/logo.png` - explicit file URL
//! - `https://cdn.example.com/logo.png` - fetched over HTTPS
//!
//! # Caching
//!
//! [`WatermarkCache`] holds a `tokio::sync::OnceCell`. Concurrent first
//! callers wait on the same initialization, so the flood fill runs at most
//! once. A failed load leaves the cell empty and the next call retries.
//!
//! # Example
//!
//! ```ignore
//! use listing_watermark::watermark::asset::WatermarkCache;
//!
//! let cache = WatermarkCache::new(&config.watermark, config.limits.clone());
//! if let Some(asset) = cache.get().await {
//!     draw(&asset.stripped);
//! }
//! ```

use super::background::remove_background;
use super::WatermarkError;
use crate::config::WatermarkConfig;
use crate::raster::{decode_image, DecodeLimits, RasterImage};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Parsed watermark location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatermarkSource {
    /// Local file.
    File(PathBuf),
    /// HTTPS URL.
    Https(String),
}

impl WatermarkSource {
    /// Parse a source string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSource` for an empty string, an empty `file://` path,
    /// or any scheme other than `file://` and `https://` (plain `http://`
    /// included).
    pub fn parse(source: &str) -> Result<Self, WatermarkError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(WatermarkError::InvalidSource(
                "Watermark source is empty".to_string(),
            ));
        }

        if let Some(path) = source.strip_prefix("file://") {
            if path.is_empty() {
                return Err(WatermarkError::InvalidSource(format!(
                    "Missing path in {source}"
                )));
            }
            Ok(WatermarkSource::File(PathBuf::from(path)))
        } else if source.starts_with("https://") {
            Ok(WatermarkSource::Https(source.to_string()))
        } else if source.contains("://") {
            Err(WatermarkError::InvalidSource(format!(
                "Unsupported source protocol: {source}. Use a path, file:// or https://"
            )))
        } else {
            Ok(WatermarkSource::File(PathBuf::from(source)))
        }
    }
}

impl std::fmt::Display for WatermarkSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatermarkSource::File(path) => write!(f, "{}", path.display()),
            WatermarkSource::Https(url) => f.write_str(url),
        }
    }
}

/// A decoded watermark and its background-removed derivative.
#[derive(Clone)]
pub struct WatermarkAsset {
    pub original: Arc<RasterImage>,
    /// What the compositor draws.
    pub stripped: Arc<RasterImage>,
}

impl std::fmt::Debug for WatermarkAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkAsset")
            .field(
                "dimensions",
                &(self.original.width(), self.original.height()),
            )
            .finish()
    }
}

impl WatermarkAsset {
    /// Decode raw bytes and strip the border-connected white background.
    pub fn from_bytes(
        data: &[u8],
        limits: &DecodeLimits,
        near_white_threshold: u8,
    ) -> Result<Self, WatermarkError> {
        let original =
            decode_image(data, limits).map_err(|e| WatermarkError::DecodeError(e.to_string()))?;
        let stripped = remove_background(&original, near_white_threshold);

        Ok(Self {
            original: Arc::new(original),
            stripped: Arc::new(stripped),
        })
    }
}

/// Loads the configured watermark once and hands out shared copies.
pub struct WatermarkCache {
    source: String,
    near_white_threshold: u8,
    fetch_timeout: Duration,
    limits: DecodeLimits,
    cache_enabled: bool,
    cell: OnceCell<WatermarkAsset>,
    http_client: OnceCell<reqwest::Client>,
}

impl std::fmt::Debug for WatermarkCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkCache")
            .field("source", &self.source)
            .field("cache_enabled", &self.cache_enabled)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl WatermarkCache {
    pub fn new(config: &WatermarkConfig, limits: DecodeLimits) -> Self {
        Self {
            source: config.source.clone(),
            near_white_threshold: config.near_white_threshold,
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
            limits,
            cache_enabled: config.cache,
            cell: OnceCell::new(),
            http_client: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether a successfully loaded asset is held.
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Load the asset, reusing the cached one when caching is enabled.
    ///
    /// # Errors
    ///
    /// Returns the fetch or decode error of this attempt. Nothing is cached
    /// on failure.
    pub async fn load(&self) -> Result<WatermarkAsset, WatermarkError> {
        if !self.cache_enabled {
            return self.fetch_and_prepare().await;
        }

        self.cell
            .get_or_try_init(|| self.fetch_and_prepare())
            .await
            .cloned()
    }

    /// Like [`load`](Self::load), but a failure is logged and reported as
    /// `None` so the caller can continue without a watermark.
    pub async fn get(&self) -> Option<WatermarkAsset> {
        match self.load().await {
            Ok(asset) => Some(asset),
            Err(e) => {
                tracing::warn!(
                    source = %self.source,
                    error_kind = e.kind(),
                    error = %e,
                    "Watermark unavailable, continuing without it"
                );
                None
            }
        }
    }

    async fn fetch_and_prepare(&self) -> Result<WatermarkAsset, WatermarkError> {
        let source = WatermarkSource::parse(&self.source)?;
        let bytes = match &source {
            WatermarkSource::File(path) => tokio::fs::read(path).await.map_err(|e| {
                WatermarkError::FetchError(format!("Failed to read {}: {e}", path.display()))
            })?,
            WatermarkSource::Https(url) => self.fetch_from_https(url).await?,
        };

        let asset = WatermarkAsset::from_bytes(&bytes, &self.limits, self.near_white_threshold)?;

        tracing::debug!(
            source = %source,
            width = asset.original.width(),
            height = asset.original.height(),
            "Loaded watermark asset"
        );

        Ok(asset)
    }

    async fn fetch_from_https(&self, url: &str) -> Result<Vec<u8>, WatermarkError> {
        let timeout = self.fetch_timeout;
        let client = self
            .http_client
            .get_or_try_init(|| async move {
                reqwest::Client::builder()
                    .timeout(timeout)
                    .build()
                    .map_err(|e| WatermarkError::ClientError(e.to_string()))
            })
            .await?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| WatermarkError::FetchError(format!("HTTP fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(WatermarkError::FetchError(format!(
                "HTTP request failed with status: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| WatermarkError::FetchError(format!("Failed to read HTTP body: {e}")))?;

        Ok(bytes.to_vec())
    }
}
