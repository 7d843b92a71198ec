use serde::{Deserialize, Serialize};

use crate::catalogue::files::SalesFile;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Most recently updated first
    #[default]
    Newest,
    /// Title, case-insensitive A→Z
    Name,
}

/// Search box, tag chip and sort selector of the file browser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogueQuery {
    pub search: String,
    pub tag: Option<String>,
    pub sort: SortOrder,
}

/// Distinct tags in order of first appearance across files.
///
/// A file's own tags are a sorted set, so tags first seen on the same file
/// come out alphabetically.
pub fn all_tags(files: &[SalesFile]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in files.iter().flat_map(|f| f.tags.iter()) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

/// Files whose title contains the search text and that carry the tag, sorted.
pub fn filter_files(files: &[SalesFile], query: &CatalogueQuery) -> Vec<SalesFile> {
    let needle = query.search.trim().to_lowercase();

    let mut matched: Vec<SalesFile> = files
        .iter()
        .filter(|f| needle.is_empty() || f.title.to_lowercase().contains(&needle))
        .filter(|f| match &query.tag {
            Some(tag) => f.tags.contains(tag),
            None => true,
        })
        .cloned()
        .collect();

    match query.sort {
        SortOrder::Newest => matched.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortOrder::Name => {
            matched.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        }
    }
    matched
}
