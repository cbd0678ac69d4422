//! Files listed in rooms and file references produced by uploads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUploader {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Entry of `*.files`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomFile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub mime_type: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "user", default, skip_serializing_if = "Option::is_none")]
    pub uploader: Option<FileUploader>,
    #[serde(
        rename = "uploadedAt",
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl RoomFile {
    /// Uploader username, then uploader id, then `unknown`.
    pub fn uploader_key(&self) -> &str {
        self.uploader
            .as_ref()
            .and_then(|u| u.username.as_deref())
            .or(self.user_id.as_deref())
            .or_else(|| self.uploader.as_ref().map(|u| u.id.as_str()))
            .filter(|key| !key.is_empty())
            .unwrap_or("unknown")
    }
}

/// Result of an upload. `id` and `name` together address the file for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub url: String,
    /// Id of the message that carries the attachment, when the server returned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

/// Server path segments addressing uploaded content: `file-upload/<id>/<name>`.
pub fn download_segments(id: &str, name: &str) -> Vec<String> {
    vec!["file-upload".to_string(), id.to_string(), name.to_string()]
}

/// Server-relative URL of uploaded content, unescaped.
pub fn download_path(id: &str, name: &str) -> String {
    format!("/{}", download_segments(id, name).join("/"))
}

impl UploadedFile {
    pub fn download_segments(&self) -> Vec<String> {
        download_segments(&self.id, &self.name)
    }
}
