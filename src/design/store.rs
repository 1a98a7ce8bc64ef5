//! Where saved designs live. The storefront owns persistence; the workspace
//! only talks to this trait.

use super::DesignDocument;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("design not found: {0}")]
    NotFound(String),
}

pub trait DesignStore {
    /// Appends a design. A design with the same id is replaced in place.
    fn save(&mut self, doc: DesignDocument) -> Result<(), StoreError>;
    fn list(&self) -> &[DesignDocument];
    fn delete(&mut self, id: &str) -> Result<DesignDocument, StoreError>;

    fn get(&self, id: &str) -> Option<&DesignDocument> {
        self.list().iter().find(|doc| doc.id == id)
    }
}

fn upsert(designs: &mut Vec<DesignDocument>, doc: DesignDocument) {
    match designs.iter_mut().find(|existing| existing.id == doc.id) {
        Some(existing) => *existing = doc,
        None => designs.push(doc),
    }
}

fn remove(designs: &mut Vec<DesignDocument>, id: &str) -> Result<DesignDocument, StoreError> {
    let index = designs
        .iter()
        .position(|doc| doc.id == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    Ok(designs.remove(index))
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDesignStore {
    designs: Vec<DesignDocument>,
}

impl MemoryDesignStore {
    pub fn new() -> Self {
        Self {
            designs: Vec::new(),
        }
    }
}

impl DesignStore for MemoryDesignStore {
    fn save(&mut self, doc: DesignDocument) -> Result<(), StoreError> {
        upsert(&mut self.designs, doc);
        Ok(())
    }

    fn list(&self) -> &[DesignDocument] {
        &self.designs
    }

    fn delete(&mut self, id: &str) -> Result<DesignDocument, StoreError> {
        remove(&mut self.designs, id)
    }
}

/// Keeps every design in one JSON array on disk, rewritten after each change.
#[derive(Debug)]
pub struct JsonFileDesignStore {
    path: PathBuf,
    designs: Vec<DesignDocument>,
}

impl JsonFileDesignStore {
    /// Opens the store, starting empty when the file does not exist yet.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let designs = match std::fs::read_to_string(path) {
            Ok(json) if json.trim().is_empty() => Vec::new(),
            Ok(json) => serde_json::from_str(&json)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        log::debug!("Design store {:?} opened with {} designs", path, designs.len());
        Ok(Self {
            path: path.to_path_buf(),
            designs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `designs` to disk, then adopts it. On failure the in-memory
    /// list is left as it was.
    fn commit(&mut self, designs: Vec<DesignDocument>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&designs)?;
        std::fs::write(&self.path, json)?;
        self.designs = designs;
        Ok(())
    }
}

impl DesignStore for JsonFileDesignStore {
    fn save(&mut self, doc: DesignDocument) -> Result<(), StoreError> {
        let mut designs = self.designs.clone();
        upsert(&mut designs, doc);
        self.commit(designs)
    }

    fn list(&self) -> &[DesignDocument] {
        &self.designs
    }

    fn delete(&mut self, id: &str) -> Result<DesignDocument, StoreError> {
        let mut designs = self.designs.clone();
        let removed = remove(&mut designs, id)?;
        self.commit(designs)?;
        Ok(removed)
    }
}
