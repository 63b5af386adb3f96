use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{ForgeError, Result};
use crate::models::{CollectionMetadata, NftMetadata};

/// In-memory zip archive for one collection export.
///
/// Images land under `assets/`, metadata records under `metadata/`, both
/// named by 1-based item index. Entries are added incrementally as items
/// become available; `finish` serializes the archive exactly once.
pub struct CollectionArchive {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    image_count: usize,
    metadata_count: usize,
}

impl CollectionArchive {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            image_count: 0,
            metadata_count: 0,
        }
    }

    fn options() -> FileOptions {
        FileOptions::default().compression_method(CompressionMethod::Deflated)
    }

    fn write_entry(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.zip
            .start_file(name, Self::options())
            .map_err(|e| ForgeError::ArchiveError(format!("Failed to add '{}': {}", name, e)))?;
        self.zip
            .write_all(bytes)
            .map_err(|e| ForgeError::ArchiveError(format!("Failed to write '{}': {}", name, e)))?;
        Ok(())
    }

    /// Stores image bytes for item `index` (0-based) as `assets/<index+1>.<ext>`.
    pub fn add_image(&mut self, index: usize, ext: &str, bytes: &[u8]) -> Result<()> {
        let name = format!("assets/{}.{}", index + 1, ext);
        self.write_entry(&name, bytes)?;
        self.image_count += 1;
        Ok(())
    }

    /// Stores the pretty-printed record for item `index` as `metadata/<index+1>.json`.
    pub fn add_item_metadata(&mut self, index: usize, record: &NftMetadata) -> Result<()> {
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| ForgeError::SerializationError(e.to_string()))?;
        let name = format!("metadata/{}.json", index + 1);
        self.write_entry(&name, json.as_bytes())?;
        self.metadata_count += 1;
        Ok(())
    }

    /// Stores the collection-level record as `metadata/collection.json`.
    pub fn add_collection_metadata(&mut self, record: &CollectionMetadata) -> Result<()> {
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| ForgeError::SerializationError(e.to_string()))?;
        self.write_entry("metadata/collection.json", json.as_bytes())?;
        self.metadata_count += 1;
        Ok(())
    }

    pub fn image_count(&self) -> usize {
        self.image_count
    }

    pub fn metadata_count(&self) -> usize {
        self.metadata_count
    }

    /// Serializes the complete archive. Consumes the builder; a finalize
    /// failure is the only fatal archive error.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let cursor = self
            .zip
            .finish()
            .map_err(|e| ForgeError::ArchiveError(format!("Failed to finalize archive: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

impl Default for CollectionArchive {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives the download filename from the collection name: lowercased,
/// whitespace runs collapsed to single dashes.
pub fn archive_filename(collection_name: &str) -> String {
    let slug = collection_name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("{}-collection.zip", slug)
}
