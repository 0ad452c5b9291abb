//! Fixture loading and management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// Entry point being exercised: `sscanf` or `scanset`.
    pub function: String,
    /// C11 / POSIX section the case pins down.
    pub reference: String,
    /// Input parameters, interpreted per `function`.
    pub inputs: serde_json::Value,
    /// Expected rendered output.
    pub expected_output: String,
    /// `strict`, `hardened` or `both`.
    pub mode: String,
}

/// A collection of fixture cases for one directive family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Family name, e.g. `scanf/integer`.
    pub family: String,
    /// Individual test cases.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let set = Self::from_json(&content)?;
        Ok(set)
    }
}

/// Fixture files under `path`, sorted. A plain file is returned as is.
pub fn fixture_paths(path: &Path) -> std::io::Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut paths: Vec<PathBuf> = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_set() {
        let set = FixtureSet::from_json(
            r#"{"version":"v1","family":"scanf/integer","cases":[
                {"name":"dec","function":"sscanf","reference":"C11 7.21.6.2p12",
                 "inputs":{"source":"1","format":"%d","slots":["long"]},
                 "expected_output":"count=1 consumed=1 heals=0 values=[1]","mode":"both"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(set.family, "scanf/integer");
        assert_eq!(set.cases.len(), 1);
        assert_eq!(set.cases[0].inputs["format"], "%d");
        let again = FixtureSet::from_json(&set.to_json().unwrap()).unwrap();
        assert_eq!(again.cases[0].name, "dec");
    }
}
