use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::errors::TagError;

/// Reverse lookup from barcode sequence to canonical cell name.
///
/// Built once from a tab-separated source whose column order is
/// (canonical-name, barcode-sequence): the second column is the key and the
/// first the value. The order the keys were first seen is kept in a side
/// list so the distance-1 fallback scan has an explicit, reproducible
/// iteration order instead of whatever the map happens to enumerate.
#[derive(Debug)]
pub struct Whitelist {
    map: HashMap<String, String>,
    order: Vec<String>,
}

impl Whitelist {
    /// Load a whitelist from `path`. Files ending in `.gz` are transparently
    /// decompressed.
    ///
    /// A line with fewer than two tab-separated columns is a fatal load
    /// error; no partial whitelist is returned, since a silently truncated
    /// map would misclassify barcodes downstream with no warning.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open whitelist {}", path.display()))?;
        let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
            Box::new(MultiGzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Self::from_reader(BufReader::new(reader))
    }

    /// Parse whitelist lines from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut map = HashMap::new();
        let mut order = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read whitelist line {}", idx + 1))?;
            let mut cols = line.splitn(3, '\t');
            let name = cols.next();
            let barcode = cols.next();
            let (name, barcode) = match (name, barcode) {
                (Some(n), Some(b)) => (n, b),
                _ => return Err(TagError::MalformedWhitelist { line: idx + 1 }.into()),
            };

            // Last line wins on duplicate barcodes; the scan order keeps the
            // position of the first occurrence.
            if map.insert(barcode.to_string(), name.to_string()).is_none() {
                order.push(barcode.to_string());
            }
        }

        Ok(Whitelist { map, order })
    }

    /// Exact lookup of an observed barcode.
    pub fn get(&self, barcode: &str) -> Option<&str> {
        self.map.get(barcode).map(String::as_str)
    }

    /// Barcode keys in first-insertion order, for the fallback scan.
    pub fn barcodes(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
