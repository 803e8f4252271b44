//! File-like value passed into and out of the pipeline.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::path::Path;

use crate::raster::format::mime_from_extension;

/// MIME type used when a file extension is not recognized.
pub const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// An uploaded or produced file: name, MIME type, bytes and timestamp.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub name: String,
    pub mime_type: String,
    pub data: Bytes,
    pub last_modified: DateTime<Utc>,
}

impl std::fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.data.len())
            .field("last_modified", &self.last_modified)
            .finish()
    }
}

impl MediaFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
            last_modified: Utc::now(),
        }
    }

    /// Whether the declared MIME type is `image/*`.
    pub fn is_image(&self) -> bool {
        self.mime_type
            .trim_start()
            .get(..6)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read a file from disk, taking the MIME type from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let modified = tokio::fs::metadata(path)
            .await?
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_from_extension(&name).unwrap_or(UNKNOWN_MIME_TYPE);

        Ok(Self {
            mime_type: mime_type.to_string(),
            name,
            data: Bytes::from(data),
            last_modified: modified,
        })
    }

    /// Write the bytes to `path`.
    pub async fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        tokio::fs::write(path, &self.data).await
    }
}
