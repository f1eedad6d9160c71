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

use std::env::current_dir;
use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use walkdir::WalkDir;

use crate::bank::ParsedBank;
use crate::bank::parse_bank;
use crate::config::Config;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::session::Session;
use crate::store::SqliteStore;

/// The file extension of a bank source.
pub const BANK_EXTENSION: &str = ".csv";

/// A directory holding a config file, a folder of banks, and the database.
pub struct Collection {
    pub directory: PathBuf,
    pub config: Config,
}

impl Collection {
    pub fn new(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };
        let config = Config::load(&directory)?;
        Ok(Self { directory, config })
    }

    pub fn banks_directory(&self) -> PathBuf {
        self.directory.join(&self.config.banks_directory)
    }

    pub fn database_path(&self) -> PathBuf {
        self.directory.join(&self.config.database)
    }

    /// Open the persisted state of this collection.
    pub fn open_session(&self) -> Fallible<Session<SqliteStore>> {
        let db_path: PathBuf = self.database_path();
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        let store = SqliteStore::new(db_path)?;
        Ok(Session::open(store))
    }

    /// The names of the banks in this collection, sorted.
    pub fn bank_names(&self) -> Fallible<Vec<String>> {
        list_banks(&self.banks_directory())
    }

    /// Read the raw text of the named bank.
    pub fn read_bank(&self, name: &str) -> Fallible<String> {
        let path = self.banks_directory().join(format!("{name}{BANK_EXTENSION}"));
        if !path.is_file() {
            return fail(format!("bank not found: {name}"));
        }
        Ok(read_to_string(path)?)
    }

    /// Read and parse the named bank.
    pub fn load_bank(&self, name: &str) -> Fallible<ParsedBank> {
        let text = self.read_bank(name)?;
        log::debug!("Parsing bank {name}...");
        let start = Instant::now();
        let parsed = parse_bank(&text, name);
        let duration = start.elapsed().as_millis();
        log::debug!(
            "Parsed {} questions from {name} in {duration}ms ({} rows skipped).",
            parsed.questions.len(),
            parsed.skipped.len()
        );
        Ok(parsed)
    }
}

/// List the bank names in `directory`. A missing directory has no banks.
pub fn list_banks(directory: &Path) -> Fallible<Vec<String>> {
    if !directory.is_dir() {
        log::debug!("Bank directory {directory:?} does not exist.");
        return Ok(Vec::new());
    }
    let mut file_names = Vec::new();
    for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file() {
            if let Some(name) = entry.file_name().to_str() {
                file_names.push(name.to_string());
            }
        }
    }
    Ok(bank_names(file_names))
}

/// Keep the identifiers with the bank extension, with the extension
/// stripped, sorted.
pub fn bank_names(identifiers: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut names: Vec<String> = identifiers
        .into_iter()
        .filter_map(|id| id.strip_suffix(BANK_EXTENSION).map(str::to_string))
        .collect();
    names.sort();
    names
}
