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

use std::fs::copy;
use std::fs::create_dir_all;
use std::path::PathBuf;

use tempfile::TempDir;
use tempfile::tempdir;

use crate::error::Fallible;

/// Copy the banks in `./test/QuizBanks` into a fresh temporary collection.
/// The directory is deleted when the returned handle is dropped.
pub fn create_tmp_collection() -> Fallible<TempDir> {
    let source: PathBuf = PathBuf::from("./test/QuizBanks").canonicalize()?;
    let root: TempDir = tempdir()?;
    let target: PathBuf = root.path().join("QuizBanks");
    create_dir_all(&target)?;
    for entry in source.read_dir()? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            if let Some(file_name) = path.file_name() {
                copy(&path, target.join(file_name))?;
            }
        }
    }
    Ok(root)
}

pub fn collection_arg(root: &TempDir) -> Option<String> {
    Some(root.path().display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tmp_collection() -> Fallible<()> {
        let root = create_tmp_collection()?;
        assert!(root.path().join("QuizBanks").join("M1_week1.csv").exists());
        assert!(root.path().join("QuizBanks").join("M1_week2.csv").exists());
        Ok(())
    }
}
