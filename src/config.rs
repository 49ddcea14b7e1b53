// src/config.rs

//! Named search profiles stored as JSON files in a profile directory.

use crate::game::search::SearchConfig;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_PROFILES_DIR: &str = "profiles";

fn profile_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.json", name))
}

pub fn save_profile(dir: &Path, name: &str, config: &SearchConfig) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(config)?;
    fs::File::create(profile_path(dir, name))?.write_all(json.as_bytes())
}

pub fn load_profile(dir: &Path, name: &str) -> io::Result<SearchConfig> {
    let json = fs::read_to_string(profile_path(dir, name))?;
    serde_json::from_str(&json).map_err(io::Error::from)
}

/// Profile names found in `dir`, sorted.
pub fn get_profiles(dir: &Path) -> io::Result<Vec<String>> {
    let mut profiles = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            if let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) {
                profiles.push(name.to_string());
            }
        }
    }
    profiles.sort();
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let profiles = dir.path().join("profiles");
        let config = SearchConfig {
            max_depth: 5,
            anti_repetition: true,
            ..SearchConfig::default()
        };

        save_profile(&profiles, "aggressive", &config).unwrap();
        save_profile(&profiles, "baseline", &SearchConfig::default()).unwrap();
        fs::write(profiles.join("notes.txt"), "not a profile").unwrap();

        assert_eq!(load_profile(&profiles, "aggressive").unwrap(), config);
        assert_eq!(get_profiles(&profiles).unwrap(), vec!["aggressive", "baseline"]);
    }

    #[test]
    fn test_missing_and_corrupt_profiles() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            load_profile(dir.path(), "missing").unwrap_err().kind(),
            io::ErrorKind::NotFound
        );

        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        assert!(load_profile(dir.path(), "broken").is_err());
    }
}
