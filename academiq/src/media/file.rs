//! Files sent to the backend.

use crate::net::errors::{ApiError, ApiResult};
use bytes::Bytes;
use reqwest::multipart::Part;
use std::path::Path;

/// Size of the chunks a streamed body is cut into (64 KiB)
pub const CHUNK_SIZE: usize = 64 * 1024;

/// In-memory file ready to be uploaded
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk, guessing its content type from the extension
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Io` if the file cannot be read
    pub async fn from_path(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = content_type_for(&file_name).to_string();
        Ok(Self::new(file_name, content_type, data))
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Multipart part carrying the whole file
    pub fn part(&self) -> ApiResult<Part> {
        self.part_with_body(reqwest::Body::from(self.data.clone()))
    }

    /// Multipart part carrying the file through `body`, e.g. a progress stream
    pub fn part_with_body(&self, body: reqwest::Body) -> ApiResult<Part> {
        Part::stream_with_length(body, self.len())
            .file_name(self.file_name.clone())
            .mime_str(&self.content_type)
            .map_err(|e| ApiError::InvalidRequest(format!("{}: {e}", self.file_name)))
    }

    /// Body streaming the file in chunks, calling `on_chunk` with the byte
    /// count of each chunk as it is handed to the connection.
    pub fn streaming_body<F>(&self, on_chunk: F) -> reqwest::Body
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        reqwest::Body::wrap_stream(chunk_stream(self.data.clone(), on_chunk))
    }
}

fn chunk_stream<F>(
    data: Bytes,
    on_chunk: F,
) -> impl futures_util::Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static
where
    F: Fn(u64) + Send + Sync + 'static,
{
    futures_util::stream::unfold((data, on_chunk), |(mut remaining, on_chunk)| async move {
        if remaining.is_empty() {
            return None;
        }
        let chunk = remaining.split_to(remaining.len().min(CHUNK_SIZE));
        on_chunk(chunk.len() as u64);
        Some((Ok(chunk), (remaining, on_chunk)))
    })
}

/// Content type for a file name, by extension
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    };

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for("lesson.MP4"), "video/mp4");
        assert_eq!(content_type_for("thumb.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("notes"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intro.webm");
        std::fs::write(&path, b"0123456789").unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name, "intro.webm");
        assert_eq!(file.content_type, "video/webm");
        assert_eq!(file.len(), 10);
    }

    #[tokio::test]
    async fn test_from_missing_path_is_io_error() {
        let err = UploadFile::from_path("/definitely/not/here.mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Io(_)));
    }

    #[test]
    fn test_invalid_mime_rejected() {
        let file = UploadFile::new("a.bin", "not a mime", vec![1u8]);
        assert!(matches!(file.part(), Err(ApiError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_chunk_stream_reports_every_byte() {
        use futures_util::StreamExt;

        let data = Bytes::from(vec![7u8; CHUNK_SIZE * 2 + 10]);
        let total = data.len() as u64;
        let sent = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&sent);

        let stream = chunk_stream(data, move |n| {
            counter.fetch_add(n, Ordering::Relaxed);
        });
        let chunks: Vec<_> = stream.collect().await;

        assert_eq!(chunks.len(), 3);
        let received: u64 = chunks.iter().map(|c| c.as_ref().unwrap().len() as u64).sum();
        assert_eq!(received, total);
        assert_eq!(sent.load(Ordering::Relaxed), total);
    }
}
