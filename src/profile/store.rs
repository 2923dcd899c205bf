//! Load/save boundary for profiles
//!
//! The engine never touches storage; callers inject one of these stores.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::FinancialProfile;
use crate::error::Result;

/// Read/write collaborator for a single saved profile
pub trait ProfileStore {
    /// Load the saved profile, or `None` when nothing has been saved yet
    fn load(&self) -> Result<Option<FinancialProfile>>;

    /// Replace the saved profile
    fn save(&self, profile: &FinancialProfile) -> Result<()>;
}

/// Profile kept as pretty-printed JSON in a file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self) -> Result<Option<FinancialProfile>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No saved profile at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let profile = serde_json::from_reader(BufReader::new(file))?;
        log::info!("Loaded profile from {}", self.path.display());
        Ok(Some(profile))
    }

    fn save(&self, profile: &FinancialProfile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, profile)?;
        writer.flush()?;
        log::info!("Saved profile to {}", self.path.display());
        Ok(())
    }
}

/// In-process store, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    profile: RwLock<Option<FinancialProfile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: FinancialProfile) -> Self {
        Self {
            profile: RwLock::new(Some(profile)),
        }
    }
}

impl ProfileStore for MemoryStore {
    fn load(&self) -> Result<Option<FinancialProfile>> {
        let guard = self.profile.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(guard.clone())
    }

    fn save(&self, profile: &FinancialProfile) -> Result<()> {
        let mut guard = self.profile.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(profile.clone());
        Ok(())
    }
}
