//! Upload (`rooms.upload/<roomId>`, streamed multipart) and download (`file-upload/<id>/<name>`).

use std::path::{Path, PathBuf};

use futures::StreamExt;
use rc_core::{
    decode, download_path, download_segments, ApiRequest, FileRef, Result, RocketChatError,
    UploadForm, UploadedFile,
};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};

use crate::client::RocketChatClient;

const DEFAULT_MIME: &str = "application/octet-stream";

/// What to upload and the optional message that carries it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadRequest {
    pub path: PathBuf,
    /// Overrides the MIME type guessed from the file extension.
    pub mime_type: Option<String>,
    pub message: Option<String>,
    pub description: Option<String>,
    pub thread_id: Option<String>,
}

impl UploadRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadedFile {
    pub path: PathBuf,
    pub bytes: u64,
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(default)]
    message: Option<UploadMessage>,
}

#[derive(Deserialize)]
struct UploadMessage {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    #[serde(default)]
    file: Option<FileRef>,
    #[serde(default)]
    files: Vec<FileRef>,
    #[serde(default)]
    attachments: Vec<Attachment>,
}

#[derive(Deserialize)]
struct Attachment {
    #[serde(default)]
    title_link: Option<String>,
}

/// MIME type from the file extension; unknown extensions are `application/octet-stream`.
pub fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "wav" => "audio/wav",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "odt" => "application/vnd.oasis.opendocument.text",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "csv" => "text/csv",
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "json" => "application/json",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "tar" => "application/x-tar",
        "7z" => "application/x-7z-compressed",
        _ => DEFAULT_MIME,
    }
}

/// Builds the file reference from an upload response. The server reports the file as
/// `message.file`, `message.files[0]`, or only through attachments depending on version.
fn uploaded_file(
    response: serde_json::Value,
    fallback_name: &str,
    mime_type: &str,
    size: u64,
) -> Result<UploadedFile> {
    let message = decode::body::<UploadResponse>(response)?
        .message
        .ok_or_else(|| RocketChatError::Decode("upload response has no message".to_string()))?;
    let file = message
        .file
        .or_else(|| message.files.into_iter().next())
        .ok_or_else(|| RocketChatError::Decode("upload response has no file reference".to_string()))?;

    let name = if file.name.is_empty() {
        fallback_name.to_string()
    } else {
        file.name
    };
    let url = message
        .attachments
        .into_iter()
        .find_map(|a| a.title_link)
        .unwrap_or_else(|| download_path(&file.id, &name));

    Ok(UploadedFile {
        id: file.id,
        name,
        mime_type: file.mime_type.unwrap_or_else(|| mime_type.to_string()),
        size,
        url,
        message_id: message.id,
    })
}

impl RocketChatClient {
    /// Uploads a local file to `room_id`. The file is streamed from disk.
    #[instrument(skip(self, request), fields(path = %request.path.display()))]
    pub async fn upload_file(&self, room_id: &str, request: &UploadRequest) -> Result<UploadedFile> {
        if room_id.trim().is_empty() {
            return Err(RocketChatError::validation("room id must not be empty"));
        }
        let metadata = tokio::fs::metadata(&request.path).await.map_err(|e| {
            RocketChatError::validation(format!("cannot read {}: {e}", request.path.display()))
        })?;
        if !metadata.is_file() {
            return Err(RocketChatError::validation(format!(
                "{} is not a regular file",
                request.path.display()
            )));
        }
        let file_name = request
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| RocketChatError::validation("file name must be valid UTF-8"))?
            .to_string();
        let mime_type = request
            .mime_type
            .clone()
            .unwrap_or_else(|| guess_mime(&request.path).to_string());

        let form = UploadForm {
            file_path: request.path.clone(),
            file_name: file_name.clone(),
            mime_type: Some(mime_type.clone()),
            message: request.message.clone(),
            description: request.description.clone(),
            thread_id: request.thread_id.clone(),
        };
        let response = self
            .transport
            .call(&format!("rooms.upload/{room_id}"), ApiRequest::upload(form))
            .await?;

        let uploaded = uploaded_file(response, &file_name, &mime_type, metadata.len())?;
        info!(room_id = %room_id, file_id = %uploaded.id, size = uploaded.size, "step: file uploaded");
        Ok(uploaded)
    }

    /// Streams `file-upload/<id>/<name>` to `dest`. A directory `dest` receives `<name>` inside it.
    #[instrument(skip(self))]
    pub async fn download_file(
        &self,
        file_id: &str,
        file_name: &str,
        dest: &Path,
    ) -> Result<DownloadedFile> {
        if file_id.trim().is_empty() || file_name.trim().is_empty() {
            return Err(RocketChatError::validation(
                "download requires both a file id and a file name",
            ));
        }

        let target = if tokio::fs::metadata(dest).await.is_ok_and(|m| m.is_dir()) {
            dest.join(file_name)
        } else {
            dest.to_path_buf()
        };
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut stream = self
            .transport
            .download(download_segments(file_id, file_name))
            .await?;
        let mut out = tokio::fs::File::create(&target).await?;
        let mut bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            out.write_all(&chunk).await?;
            bytes += chunk.len() as u64;
        }
        out.flush().await?;

        info!(file_id = %file_id, path = %target.display(), bytes, "step: file downloaded");
        Ok(DownloadedFile {
            path: target,
            bytes,
        })
    }

    /// Downloads a file returned by [`RocketChatClient::upload_file`].
    pub async fn download_uploaded(&self, file: &UploadedFile, dest: &Path) -> Result<DownloadedFile> {
        self.download_file(&file.id, &file.name, dest).await
    }
}
