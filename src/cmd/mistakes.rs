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

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::cmd::OutputFormat;
use crate::cmd::report_warnings;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::review::MistakeFilter;
use crate::review::MistakeSort;
use crate::review::filter_mistakes;
use crate::review::mistake_banks;
use crate::stats::MistakeRecord;
use crate::stats::UserStats;

pub fn print_mistakes(
    directory: Option<String>,
    sort: MistakeSort,
    search: Option<String>,
    banks: Vec<String>,
    format: OutputFormat,
) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let mut session = coll.open_session()?;
    report_warnings(&mut session);
    let filter = MistakeFilter {
        banks: banks.into_iter().collect(),
        search: search.unwrap_or_default(),
        sort,
    };
    let report = render_mistakes(session.stats(), &filter, format)?;
    print!("{report}");
    Ok(())
}

fn render_mistakes(stats: &UserStats, filter: &MistakeFilter, format: OutputFormat) -> Fallible<String> {
    let mistakes: Vec<&MistakeRecord> = filter_mistakes(stats, filter);
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&mistakes)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => render_text(&mistakes, &mistake_banks(stats)),
    }
}

fn render_text(mistakes: &[&MistakeRecord], banks: &BTreeSet<String>) -> Fallible<String> {
    let mut out = String::new();
    if mistakes.is_empty() {
        writeln!(out, "No mistakes to review.")?;
        return Ok(out);
    }
    for mistake in mistakes {
        writeln!(
            out,
            "[{}] {} (missed {}x, last {})",
            mistake.bank,
            mistake.question_text,
            mistake.error_count,
            mistake.timestamp.local_display()
        )?;
        writeln!(out, "  Your answer:    {}", mistake.user_answer)?;
        writeln!(out, "  Correct answer: {}", mistake.correct_answer)?;
    }
    writeln!(out)?;
    let banks: Vec<&str> = banks.iter().map(String::as_str).collect();
    writeln!(
        out,
        "{} shown. Banks with mistakes: {}",
        mistakes.len(),
        banks.join(", ")
    )?;
    Ok(out)
}
