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

pub mod banks;
pub mod check;
pub mod drill;
pub mod manage;
pub mod mistakes;
pub mod stats;

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;

use crate::session::Session;
use crate::store::Store;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output.
    Text,
    /// JSON output.
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Print and clear any persistence warnings the session collected.
fn report_warnings<S: Store>(session: &mut Session<S>) {
    for warning in session.take_warnings() {
        eprintln!("warning: {}", warning.message());
    }
}
