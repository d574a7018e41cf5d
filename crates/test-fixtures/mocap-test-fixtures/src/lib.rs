//! Shared motion-capture fixtures for integration tests.
//!
//! `fixtures/manifest.json` at the workspace root maps short names to files
//! under `fixtures/`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    tables: BTreeMap<String, String>,
    scenes: BTreeMap<String, String>,
}

#[derive(Clone, Copy)]
enum Kind {
    Table,
    Scene,
}

impl Kind {
    fn entries(self) -> &'static BTreeMap<String, String> {
        match self {
            Kind::Table => &MANIFEST.tables,
            Kind::Scene => &MANIFEST.scenes,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Kind::Table => "table",
            Kind::Scene => "scene",
        }
    }

    fn keys(self) -> Vec<String> {
        self.entries().keys().cloned().collect()
    }

    fn path(self, name: &str) -> Result<PathBuf> {
        let rel = self
            .entries()
            .get(name)
            .ok_or_else(|| anyhow!("no {} fixture named '{name}'", self.label()))?;
        Ok(Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(rel))
    }

    fn read(self, name: &str) -> Result<String> {
        let path = self.path(name)?;
        fs::read_to_string(&path)
            .with_context(|| format!("failed to read {} fixture {}", self.label(), path.display()))
    }
}

/// CSV motion tables.
pub mod tables {
    use super::*;

    pub fn keys() -> Vec<String> {
        Kind::Table.keys()
    }

    pub fn csv(name: &str) -> Result<String> {
        Kind::Table.read(name)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Kind::Table.path(name)
    }
}

/// Serialized playback scenes (JSON).
pub mod scenes {
    use super::*;

    pub fn keys() -> Vec<String> {
        Kind::Scene.keys()
    }

    pub fn json(name: &str) -> Result<String> {
        Kind::Scene.read(name)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let text = json(name)?;
        serde_json::from_str(&text).with_context(|| format!("failed to parse scene fixture {name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_manifest_entry_exists() {
        for name in tables::keys() {
            assert!(tables::path(&name).unwrap().is_file(), "missing table {name}");
        }
        for name in scenes::keys() {
            let value: serde_json::Value = scenes::load(&name).unwrap();
            assert!(value.is_object());
        }
    }

    #[test]
    fn unknown_names_are_errors() {
        assert!(tables::csv("nope").is_err());
    }
}
