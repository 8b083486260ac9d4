//! Named test inputs for the blueprint crates: blueprint documents, single
//! serialized property nodes and hand-written outlines. Names map to files
//! under `fixtures/` through `fixtures/manifest.json`.

use std::collections::HashMap;
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
    blueprints: HashMap<String, BlueprintFixture>,
    #[serde(rename = "property-nodes")]
    property_nodes: HashMap<String, String>,
    #[serde(default)]
    outlines: HashMap<String, String>,
}

/// A blueprint file, optionally with the asset files (relative to the
/// blueprint) a test must create before importing it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BlueprintFixture {
    Bare(String),
    WithAssets {
        path: String,
        #[serde(default)]
        assets: Vec<String>,
    },
}

impl BlueprintFixture {
    fn file(&self) -> &str {
        match self {
            BlueprintFixture::Bare(path) | BlueprintFixture::WithAssets { path, .. } => path,
        }
    }
}

fn fixture_file<'a>(files: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    files
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("no {kind} fixture named '{name}'"))
}

fn blueprint(name: &str) -> Result<&'static BlueprintFixture> {
    MANIFEST
        .blueprints
        .get(name)
        .ok_or_else(|| anyhow!("no blueprint fixture named '{name}'"))
}

fn read(rel: &str) -> Result<String> {
    let path: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../../fixtures")
        .join(rel);
    fs::read_to_string(&path).with_context(|| format!("reading fixture {}", path.display()))
}

pub mod blueprints {
    use super::*;

    /// Raw blueprint JSON, for the parse paths under test.
    pub fn json(name: &str) -> Result<String> {
        read(blueprint(name)?.file())
    }

    /// Files the fixture references, relative to the blueprint's folder.
    pub fn assets(name: &str) -> Result<Vec<String>> {
        Ok(match blueprint(name)? {
            BlueprintFixture::Bare(_) => Vec::new(),
            BlueprintFixture::WithAssets { assets, .. } => assets.clone(),
        })
    }
}

pub mod property_nodes {
    use super::*;

    /// One serialized property node, typed by the caller.
    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = fixture_file(&MANIFEST.property_nodes, "property node", name)?;
        let text = read(rel)?;
        serde_json::from_str(&text).with_context(|| format!("parsing property node {name}"))
    }
}

pub mod outlines {
    use super::*;

    /// Outline text as a person would write it.
    pub fn text(name: &str) -> Result<String> {
        read(fixture_file(&MANIFEST.outlines, "outline", name)?)
    }
}
