use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::catalogue::files::FileType;
use crate::error::KprSimError;
use crate::KprSimResult;

/// 20 MiB
pub const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: [&str; 4] =
    ["application/pdf", "image/jpeg", "image/png", "image/jpg"];

/// A file the salesperson picked for upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadCandidate {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    /// Display title; falls back to the file name when blank
    #[serde(default)]
    pub title: String,
    /// Comma-separated tags as typed
    #[serde(default)]
    pub tags_csv: String,
}

/// Validated upload: where the blob goes and the record to write for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPlan {
    pub title: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub tags: BTreeSet<String>,
    pub storage_path: String,
    pub updated_at: NaiveDate,
}

/// Split, trim and lowercase comma-separated tags, dropping empties.
pub fn parse_tags(csv: &str) -> BTreeSet<String> {
    csv.split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Guess a MIME type from a file extension.
pub fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

fn storage_path(file_name: &str, now: DateTime<Utc>) -> String {
    let safe_name = file_name.split_whitespace().collect::<Vec<_>>().join("_");
    format!(
        "sales_files/{}/{:02}/{}_{}",
        now.year(),
        now.month(),
        now.timestamp_millis(),
        safe_name
    )
}

/// Check an upload candidate and work out its storage path and record.
pub fn plan_upload(candidate: &UploadCandidate, now: DateTime<Utc>) -> KprSimResult<UploadPlan> {
    let file_name = candidate.file_name.trim();
    if file_name.is_empty() {
        return Err(KprSimError::InvalidInput {
            field: "file_name".into(),
            reason: "File name must not be empty".into(),
        });
    }

    let mime = candidate.mime_type.trim().to_ascii_lowercase();
    if !ALLOWED_MIME_TYPES.contains(&mime.as_str()) {
        return Err(KprSimError::UnsupportedFileType {
            mime_type: candidate.mime_type.clone(),
        });
    }

    if candidate.size_bytes > MAX_UPLOAD_BYTES {
        return Err(KprSimError::FileTooLarge {
            size_bytes: candidate.size_bytes,
            limit_bytes: MAX_UPLOAD_BYTES,
        });
    }

    let title = candidate.title.trim();
    let file_type = if mime == "application/pdf" {
        FileType::Pdf
    } else {
        FileType::Image
    };

    Ok(UploadPlan {
        title: if title.is_empty() {
            file_name.to_string()
        } else {
            title.to_string()
        },
        file_type,
        tags: parse_tags(&candidate.tags_csv),
        storage_path: storage_path(file_name, now),
        updated_at: now.date_naive(),
    })
}
