// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;

pub const CONFIG_FILE: &str = "quizbank.toml";

/// Settings read from `quizbank.toml` in the collection root.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory, relative to the root, holding the `.csv` banks.
    pub banks_directory: String,
    /// SQLite file, relative to the root, holding the persisted state.
    pub database: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            banks_directory: "QuizBanks".to_string(),
            database: "quizbank.db".to_string(),
        }
    }
}

impl Config {
    /// Load the config from `root`, falling back to defaults when there is
    /// no config file.
    pub fn load(root: &Path) -> Fallible<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            log::debug!("No {CONFIG_FILE} found, using defaults.");
            return Ok(Self::default());
        }
        let content = read_to_string(&path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() -> Fallible<()> {
        let dir = tempdir()?;
        assert_eq!(Config::load(dir.path())?, Config::default());
        Ok(())
    }

    #[test]
    fn test_partial_file() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join(CONFIG_FILE), "banks_directory = \"banks\"\n")?;
        let config = Config::load(dir.path())?;
        assert_eq!(config.banks_directory, "banks");
        assert_eq!(config.database, "quizbank.db");
        Ok(())
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::parse("colour = \"red\"\n").is_err());
    }

    #[test]
    fn test_malformed_file_rejected() {
        assert!(Config::parse("banks_directory = ").is_err());
    }
}
