//! File analysis: coarse MIME families, uploader counts and sizes.

use std::collections::BTreeMap;

use rc_core::RoomFile;
use serde::Serialize;

/// Coarse MIME family. Declaration order is the classification priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Images,
    Videos,
    Audio,
    Pdf,
    Documents,
    Spreadsheets,
    Text,
    Archives,
    Other,
}

const DOCUMENT_MARKERS: &[&str] = &["word", "rtf", "opendocument.text"];
const SPREADSHEET_MARKERS: &[&str] = &["sheet", "excel", "csv"];
const ARCHIVE_MARKERS: &[&str] = &["zip", "rar", "tar", "7z", "compressed", "gzip"];

impl FileCategory {
    /// First matching rule wins.
    pub fn classify(mime_type: &str) -> Self {
        let mime = mime_type.to_ascii_lowercase();
        let any = |markers: &[&str]| markers.iter().any(|m| mime.contains(m));

        if mime.starts_with("image/") {
            Self::Images
        } else if mime.starts_with("video/") {
            Self::Videos
        } else if mime.starts_with("audio/") {
            Self::Audio
        } else if mime.contains("pdf") {
            Self::Pdf
        } else if any(DOCUMENT_MARKERS) {
            Self::Documents
        } else if any(SPREADSHEET_MARKERS) {
            Self::Spreadsheets
        } else if mime.starts_with("text/") {
            Self::Text
        } else if any(ARCHIVE_MARKERS) {
            Self::Archives
        } else {
            Self::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LargestFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileAnalysis {
    pub total: u64,
    pub total_size: u64,
    /// Rounded bytes; 0 for an empty listing.
    pub average_size: u64,
    pub by_category: BTreeMap<FileCategory, u64>,
    pub by_uploader: BTreeMap<String, u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largest: Option<LargestFile>,
}

pub fn analyze_files(files: &[RoomFile]) -> FileAnalysis {
    let mut by_category = BTreeMap::new();
    let mut by_uploader = BTreeMap::new();
    let mut total_size = 0u64;
    let mut largest: Option<&RoomFile> = None;

    for file in files {
        *by_category
            .entry(FileCategory::classify(&file.mime_type))
            .or_insert(0) += 1;
        *by_uploader
            .entry(file.uploader_key().to_string())
            .or_insert(0) += 1;
        total_size = total_size.saturating_add(file.size);
        if largest.map_or(true, |l| file.size > l.size) {
            largest = Some(file);
        }
    }

    let total = files.len() as u64;
    let average_size = if total == 0 {
        0
    } else {
        (total_size as f64 / total as f64).round() as u64
    };

    FileAnalysis {
        total,
        total_size,
        average_size,
        by_category,
        by_uploader,
        largest: largest.map(|f| LargestFile {
            id: f.id.clone(),
            name: f.name.clone(),
            mime_type: f.mime_type.clone(),
            size: f.size,
        }),
    }
}
