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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::de::Error as _;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::question::Question;
use crate::types::timestamp::Timestamp;

/// Identifies a challenge: a digest of its bank, start time, and question
/// order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ChallengeId {
    inner: blake3::Hash,
}

impl ChallengeId {
    pub fn derive(bank: &str, started_at: Timestamp, questions: &[Question]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"Challenge");
        hasher.update(bank.as_bytes());
        hasher.update(b"\0");
        hasher.update(started_at.to_rfc3339().as_bytes());
        for question in questions {
            hasher.update(question.id().as_str().as_bytes());
            hasher.update(b"\0");
        }
        Self {
            inner: hasher.finalize(),
        }
    }

    pub fn to_hex(self) -> String {
        self.inner.to_hex().to_string()
    }

    pub fn from_hex(s: &str) -> Fallible<Self> {
        let inner =
            blake3::Hash::from_hex(s).map_err(|_| ErrorReport::new("invalid challenge id"))?;
        Ok(Self { inner })
    }
}

impl Display for ChallengeId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for ChallengeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ChallengeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        ChallengeId::from_hex(&string).map_err(|e| D::Error::custom(e.message().to_string()))
    }
}
