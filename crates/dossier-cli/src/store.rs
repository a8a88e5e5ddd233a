//! File-backed stores over a fixture directory.
//!
//! Layout: `<root>/experiments/<id>.json` holds one experiment detail
//! record, `<root>/arenas/<id>.json` one arena record, both in the loose
//! camelCase wire shape. Normalization happens downstream in the engine.

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;

use dossier_core::model::ExperimentListing;
use dossier_core::normalize::{RawArenaRecord, RawExperimentRecord};
use dossier_core::service::{ArenaStore, ExperimentStore};

#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn experiments_dir(&self) -> PathBuf {
        self.root.join("experiments")
    }

    fn arenas_dir(&self) -> PathBuf {
        self.root.join("arenas")
    }

    /// File stems of every `.json` entry in `dir`, sorted for deterministic
    /// ordering. A missing directory reads as empty.
    async fn json_stems(dir: &PathBuf) -> anyhow::Result<Vec<String>> {
        let mut stems = Vec::new();
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(_) => return Ok(stems),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.push(stem.to_string());
            }
        }
        stems.sort();
        Ok(stems)
    }
}

#[async_trait]
impl ExperimentStore for JsonDirStore {
    async fn list_experiments(&self) -> anyhow::Result<Vec<ExperimentListing>> {
        let dir = self.experiments_dir();
        let mut listings = Vec::new();
        for stem in Self::json_stems(&dir).await? {
            let path = dir.join(format!("{stem}.json"));
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let listing: ExperimentListing = serde_json::from_str(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            listings.push(listing);
        }
        Ok(listings)
    }

    async fn fetch_experiment(&self, id: &str) -> anyhow::Result<RawExperimentRecord> {
        let path = self.experiments_dir().join(format!("{id}.json"));
        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
    }
}

#[async_trait]
impl ArenaStore for JsonDirStore {
    async fn list_arenas(&self) -> anyhow::Result<Vec<String>> {
        Self::json_stems(&self.arenas_dir()).await
    }

    async fn fetch_arena(&self, id: &str) -> anyhow::Result<RawArenaRecord> {
        let path = self.arenas_dir().join(format!("{id}.json"));
        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
    }
}
