use crate::domain::ports::LedgerStore;
use crate::domain::record::PaymentRecord;
use crate::error::Result;
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Persistent ledger backed by a single JSON file.
///
/// Every mutation rewrites the whole list: the new contents go to a
/// temporary file in the same directory, then an atomic rename replaces
/// the ledger. A crash mid-write leaves the previous ledger intact rather
/// than a truncated file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_records(&self) -> Result<Vec<PaymentRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let bytes = std::fs::read(&self.path)?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn write_records(&self, records: &[PaymentRecord]) -> Result<()> {
        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = match dir {
            Some(dir) => tempfile::NamedTempFile::new_in(dir)?,
            None => tempfile::NamedTempFile::new_in(".")?,
        };
        serde_json::to_writer_pretty(&mut tmp, records)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<PaymentRecord>> {
        self.read_records()
    }

    async fn replace(&self, records: &[PaymentRecord]) -> Result<()> {
        self.write_records(records)
    }
}
