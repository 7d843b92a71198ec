//! Sales file records: the built-in seed catalogue, remote uploads and
//! salesperson-added links.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::KprSimError;
use crate::KprSimResult;

const DUMMY_PDF_URL: &str =
    "https://www.w3.org/WAI/ER/tests/xhtml/testfiles/resources/pdf/dummy.pdf";

/// Characters of the URL kept in a custom link's title.
const LINK_TITLE_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Image,
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesFile {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub url: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub updated_at: NaiveDate,
    /// Blob path for uploaded files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
    /// Link added locally by a salesperson
    #[serde(default)]
    pub is_custom: bool,
}

fn seed(
    id: &str,
    title: &str,
    file_type: FileType,
    url: &str,
    tags: &[&str],
    ymd: (i32, u32, u32),
) -> SalesFile {
    SalesFile {
        id: id.into(),
        title: title.into(),
        file_type,
        url: url.into(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        updated_at: NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).unwrap_or(NaiveDate::MIN),
        storage_path: None,
        is_custom: false,
    }
}

/// The built-in brochures, price list, promo sheet and photos.
pub fn seed_files() -> Vec<SalesFile> {
    vec![
        seed(
            "1",
            "Brosur Akasa Pure Living - E-Brochure 2024",
            FileType::Pdf,
            DUMMY_PDF_URL,
            &["brosur", "marketing"],
            (2024, 3, 15),
        ),
        seed(
            "2",
            "Price List - Cluster Akasa Signature (Q1 2024)",
            FileType::Pdf,
            DUMMY_PDF_URL,
            &["harga", "promo"],
            (2024, 3, 20),
        ),
        seed(
            "3",
            "Skema Promo Cashback & Free Provisi",
            FileType::Pdf,
            DUMMY_PDF_URL,
            &["promo"],
            (2024, 3, 18),
        ),
        seed(
            "4",
            "Site Plan - Akasa Pure Living Phase 2",
            FileType::Image,
            "https://picsum.photos/seed/akasa-siteplan/1200/800",
            &["unit", "layout"],
            (2024, 2, 10),
        ),
        seed(
            "5",
            "Foto Show Unit - Tipe 2BR (Furnished)",
            FileType::Image,
            "https://picsum.photos/seed/akasa-unit/1200/800",
            &["unit", "foto"],
            (2024, 2, 12),
        ),
    ]
}

/// Full catalogue: seed files, then remote uploads, then custom links.
pub fn merge(
    seed: Vec<SalesFile>,
    remote: Vec<SalesFile>,
    custom: Vec<SalesFile>,
) -> Vec<SalesFile> {
    let mut all = seed;
    all.extend(remote);
    all.extend(custom);
    all
}

/// A link saved by hand when uploading is not possible.
pub fn new_custom_link(url: &str, today: NaiveDate, now_millis: i64) -> KprSimResult<SalesFile> {
    let url = url.trim();
    if url.is_empty() {
        return Err(KprSimError::InvalidInput {
            field: "url".into(),
            reason: "Link URL must not be empty".into(),
        });
    }

    let head: String = url.chars().take(LINK_TITLE_CHARS).collect();
    Ok(SalesFile {
        id: format!("local-{now_millis}"),
        title: format!("Link: {head}..."),
        file_type: FileType::Link,
        url: url.to_string(),
        tags: BTreeSet::from(["custom".to_string()]),
        updated_at: today,
        storage_path: None,
        is_custom: true,
    })
}

/// What removing a file from the catalogue involves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DeletionPlan {
    /// Delete the blob at `storage_path`, then the document `id`
    RemoveBlobAndRecord { id: String, storage_path: String },
    /// Drop the link from the local custom link list
    RemoveCustomLink { id: String },
}

pub fn plan_deletion(file: &SalesFile) -> KprSimResult<DeletionPlan> {
    if let Some(path) = &file.storage_path {
        return Ok(DeletionPlan::RemoveBlobAndRecord {
            id: file.id.clone(),
            storage_path: path.clone(),
        });
    }
    if file.is_custom {
        return Ok(DeletionPlan::RemoveCustomLink {
            id: file.id.clone(),
        });
    }
    Err(KprSimError::InvalidInput {
        field: "id".into(),
        reason: format!("'{}' is a built-in file and cannot be deleted", file.title),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
    }

    #[test]
    fn test_seed_catalogue() {
        let files = seed_files();
        assert_eq!(files.len(), 5);
        assert_eq!(files.iter().filter(|f| f.file_type == FileType::Pdf).count(), 3);
        assert!(files.iter().all(|f| !f.is_custom && f.storage_path.is_none()));
    }

    #[test]
    fn test_custom_link_title_is_truncated() {
        let url = "https://drive.example.com/folder/price-list-2024-final.pdf";
        let link = new_custom_link(url, today(), 1711929600000).unwrap();
        assert_eq!(link.id, "local-1711929600000");
        assert_eq!(link.title, "Link: https://drive.example.com/fold...");
        assert_eq!(link.file_type, FileType::Link);
        assert!(link.tags.contains("custom"));
        assert!(link.is_custom);
    }

    #[test]
    fn test_blank_link_rejected() {
        assert!(new_custom_link("  ", today(), 0).is_err());
    }

    #[test]
    fn test_merge_order() {
        let link = new_custom_link("https://x.example", today(), 1).unwrap();
        let all = merge(seed_files(), vec![], vec![link.clone()]);
        assert_eq!(all.len(), 6);
        assert_eq!(all.last(), Some(&link));
    }

    #[test]
    fn test_deletion_plans() {
        let mut uploaded = seed_files().remove(0);
        uploaded.id = "doc-1".into();
        uploaded.storage_path = Some("sales_files/2024/03/1_a.pdf".into());
        assert_eq!(
            plan_deletion(&uploaded).unwrap(),
            DeletionPlan::RemoveBlobAndRecord {
                id: "doc-1".into(),
                storage_path: "sales_files/2024/03/1_a.pdf".into(),
            }
        );

        let link = new_custom_link("https://x.example", today(), 7).unwrap();
        assert_eq!(
            plan_deletion(&link).unwrap(),
            DeletionPlan::RemoveCustomLink {
                id: "local-7".into()
            }
        );

        assert!(plan_deletion(&seed_files()[1]).is_err());
    }

    #[test]
    fn test_record_shape_uses_type_key() {
        let json = serde_json::to_value(&seed_files()[3]).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["updated_at"], "2024-02-10");
    }
}
