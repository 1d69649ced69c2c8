use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// store location relative to the home directory
pub const STORE_FILE: &str = ".config/xmv";

/// an (old, new) rename rule; `old` is the key in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternPair {
    pub old: String,
    pub new: String,
}

impl PatternPair {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }
}

/// on-disk layouts; the wrapped one is what older versions wrote
#[derive(Deserialize)]
#[serde(untagged)]
enum StoreFile {
    Wrapped {
        #[serde(alias = "Patterns")]
        patterns: BTreeMap<String, String>,
    },
    Flat(BTreeMap<String, String>),
}

impl From<StoreFile> for BTreeMap<String, String> {
    fn from(file: StoreFile) -> Self {
        match file {
            StoreFile::Wrapped { patterns } | StoreFile::Flat(patterns) => patterns,
        }
    }
}

/// the persisted mapping of old pattern to new pattern
#[derive(Debug, Clone)]
pub struct PatternStore {
    path: PathBuf,
    patterns: BTreeMap<String, String>,
}

/// `$HOME/.config/xmv`
pub fn default_store_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(STORE_FILE))
}

impl PatternStore {
    /// an empty store bound to `path`, nothing is written until `save`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            patterns: BTreeMap::new(),
        }
    }

    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read pattern store {}", path.display()))?;
        let file: StoreFile = serde_json::from_str(&raw)
            .with_context(|| format!("malformed pattern store {}", path.display()))?;

        Ok(Self {
            path,
            patterns: file.into(),
        })
    }

    /// rewrite the whole file with the current mapping
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }

        let json = serde_json::to_string_pretty(&self.patterns)?;
        fs::write(&self.path, json + "\n")
            .with_context(|| format!("failed to write pattern store {}", self.path.display()))
    }

    /// add or overwrite the rule keyed by `old`, returning the replaced target
    pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) -> Option<String> {
        self.patterns.insert(old.into(), new.into())
    }

    pub fn get(&self, old: &str) -> Option<&str> {
        self.patterns.get(old).map(String::as_str)
    }

    pub fn pairs(&self) -> impl Iterator<Item = PatternPair> + '_ {
        self.patterns
            .iter()
            .map(|(old, new)| PatternPair::new(old.as_str(), new.as_str()))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
