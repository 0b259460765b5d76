//! Image references held by image blocks
//!
//! Image blocks store the public URL of a file in the storage bucket. When a
//! save drops image blocks, the files they pointed at become orphans; these
//! helpers find them and map their URLs back to storage paths.

use crate::document_model::{Block, BlockKind, Document};
use regex::Regex;
use std::collections::HashSet;

/// All image URLs in document order (section blocks before subsection blocks)
pub fn extract_image_urls(doc: &Document) -> Vec<String> {
    let mut urls = Vec::new();

    for section in &doc.sections {
        collect_from_blocks(&section.blocks, &mut urls);
        for subsection in &section.subsections {
            collect_from_blocks(&subsection.blocks, &mut urls);
        }
    }

    urls
}

fn collect_from_blocks(blocks: &[Block], urls: &mut Vec<String>) {
    urls.extend(
        blocks
            .iter()
            .filter(|block| block.kind == BlockKind::Image && !block.content.is_empty())
            .map(|block| block.content.clone()),
    );
}

/// URLs present in `old_urls` but missing from `new_urls`, in `old_urls` order
pub fn find_orphaned_images(old_urls: &[String], new_urls: &[String]) -> Vec<String> {
    let current: HashSet<&str> = new_urls.iter().map(String::as_str).collect();

    old_urls
        .iter()
        .filter(|url| !current.contains(url.as_str()))
        .cloned()
        .collect()
}

/// Images referenced by `old` that `new` no longer references
pub fn orphaned_between(old: &Document, new: &Document) -> Vec<String> {
    find_orphaned_images(&extract_image_urls(old), &extract_image_urls(new))
}

/// Storage path of a public file URL within `bucket`
///
/// `https://host/storage/v1/object/public/document-files/u1/d1/images/a.png`
/// maps to `u1/d1/images/a.png` for the `document-files` bucket.
///
/// # Returns
/// * `Some(String)` - Path after the bucket segment
/// * `None` - The URL does not point into the bucket
pub fn storage_path_from_url(url: &str, bucket: &str) -> Option<String> {
    let pattern = format!("{}/(.+)$", regex::escape(bucket));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            log::error!("Invalid storage bucket pattern for '{}': {}", bucket, e);
            return None;
        }
    };

    re.captures(url)
        .and_then(|caps| caps.get(1))
        .map(|path| path.as_str().to_string())
}
