use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use log::info;
use crate::error::{LookupError, ScrapeError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipEntry {
    pub district: String,
    pub reason: LookupError,
}

/// Districts that could not be matched, in the order they failed.
#[derive(Debug, Clone, Default)]
pub struct SkipList {
    entries: Vec<SkipEntry>,
}

impl SkipList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure. A district already on the list is not added again.
    pub fn push(&mut self, district: &str, reason: LookupError) -> bool {
        let district = district.trim();
        if self.contains(district) {
            return false;
        }
        self.entries.push(SkipEntry {
            district: district.to_string(),
            reason,
        });
        true
    }

    pub fn contains(&self, district: &str) -> bool {
        self.entries.iter().any(|e| e.district == district.trim())
    }

    pub fn entries(&self) -> &[SkipEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One district name per line. An empty list still truncates the file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ScrapeError> {
        let path = path.as_ref();
        let output_err = |e: std::io::Error| ScrapeError::Output {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let mut writer = BufWriter::new(File::create(path).map_err(output_err)?);
        for entry in &self.entries {
            writeln!(writer, "{}", entry.district).map_err(output_err)?;
        }
        writer.flush().map_err(output_err)?;
        info!("Skipped items saved to {:?}", path);
        Ok(())
    }
}
