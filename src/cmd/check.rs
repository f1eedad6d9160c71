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

use crate::bank::ParsedBank;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;

/// Parse one bank, or every bank, and report skipped rows.
pub fn check_banks(directory: Option<String>, bank: Option<String>) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let names = match bank {
        Some(bank) => vec![bank],
        None => coll.bank_names()?,
    };
    if names.is_empty() {
        return fail("no banks found.");
    }
    let mut skipped = 0;
    for name in names {
        let parsed: ParsedBank = coll.load_bank(&name)?;
        println!("{name}: {} questions", parsed.questions.len());
        for error in &parsed.skipped {
            println!("  skipped {error}");
        }
        skipped += parsed.skipped.len();
    }
    if skipped == 0 {
        println!("ok");
    }
    Ok(())
}
