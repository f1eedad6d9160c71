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

use crate::cmd::report_warnings;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::theme::Theme;

pub fn clear_mistakes(directory: Option<String>, bank: Option<String>) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let mut session = coll.open_session()?;
    let removed = session.clear_mistakes(bank.as_deref());
    report_warnings(&mut session);
    println!("Removed {removed} mistakes.");
    Ok(())
}

/// Erase all statistics and the active challenge. The theme is kept.
pub fn reset_data(directory: Option<String>) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let mut session = coll.open_session()?;
    session.reset_all();
    report_warnings(&mut session);
    println!("All progress erased.");
    Ok(())
}

pub fn theme(directory: Option<String>, set: Option<Theme>) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let mut session = coll.open_session()?;
    if let Some(theme) = set {
        session.set_theme(theme);
    }
    report_warnings(&mut session);
    println!("{}", session.theme());
    Ok(())
}
