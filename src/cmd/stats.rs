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

use std::fmt::Write;

use serde::Serialize;

use crate::cmd::OutputFormat;
use crate::cmd::report_warnings;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::review::BankBreakdown;
use crate::review::HistorySummary;
use crate::review::TimeRange;
use crate::review::bank_breakdown;
use crate::review::history_in_range;
use crate::review::summarize;
use crate::stats::ChallengeStats;
use crate::stats::UserStats;
use crate::types::timestamp::Timestamp;

/// How many history entries the text report lists.
const RECENT_LIMIT: usize = 10;

pub fn print_stats(directory: Option<String>, range: TimeRange, format: OutputFormat) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let mut session = coll.open_session()?;
    report_warnings(&mut session);
    let report = render_stats(session.stats(), range, Timestamp::now(), format)?;
    print!("{report}");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsReport<'a> {
    range: String,
    summary: HistorySummary,
    total_missed: usize,
    mistakes_count: usize,
    banks: Vec<BankBreakdown>,
    history: Vec<&'a ChallengeStats>,
}

fn render_stats(
    stats: &UserStats,
    range: TimeRange,
    now: Timestamp,
    format: OutputFormat,
) -> Fallible<String> {
    let history = history_in_range(stats, range, now);
    let report = StatsReport {
        range: range.to_string(),
        summary: summarize(&history),
        total_missed: history
            .iter()
            .map(|c| c.total_questions - c.correct_answers)
            .sum(),
        mistakes_count: stats.mistakes.len(),
        banks: bank_breakdown(&history),
        history,
    };
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&report)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => render_text(&report),
    }
}

fn render_text(report: &StatsReport) -> Fallible<String> {
    let mut out = String::new();
    let summary = &report.summary;
    writeln!(out, "Statistics ({})", report.range)?;
    writeln!(out, "  Challenges:        {}", summary.total_challenges)?;
    writeln!(out, "  Questions:         {}", summary.total_questions)?;
    writeln!(out, "  Correct:           {}", summary.total_correct_answers)?;
    writeln!(out, "  Missed:            {}", report.total_missed)?;
    writeln!(out, "  Accuracy:          {:.1}%", summary.accuracy)?;
    writeln!(
        out,
        "  Time per question: {:.1}s",
        summary.average_time_per_question
    )?;
    writeln!(out, "  Mistakes to review: {}", report.mistakes_count)?;
    if !report.banks.is_empty() {
        writeln!(out)?;
        writeln!(out, "By bank:")?;
        for bank in &report.banks {
            writeln!(
                out,
                "  {}: {} challenges, {} questions, {:.1}%",
                bank.bank, bank.total_challenges, bank.total_questions, bank.accuracy
            )?;
        }
    }
    if !report.history.is_empty() {
        writeln!(out)?;
        writeln!(out, "Recent challenges:")?;
        for entry in report.history.iter().take(RECENT_LIMIT) {
            writeln!(
                out,
                "  {}  {}  {}/{}  {:.0}s",
                entry.started_at.local_display(),
                entry.bank,
                entry.correct_answers,
                entry.total_questions,
                entry.duration
            )?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::challenge::Challenge;
    use crate::helper::collection_arg;
    use crate::helper::create_tmp_collection;
    use crate::types::question::Answer;
    use crate::types::question::Question;
    use crate::types::question::sample_question;

    fn at(seconds: i64) -> Timestamp {
        Timestamp::from_rfc3339("2025-11-11T09:00:00Z")
            .map(|t| t.plus_seconds(seconds))
            .unwrap()
    }

    fn played(bank: &str, start: i64, picks: &[&str]) -> UserStats {
        let questions: Vec<Question> = (1..=picks.len() as i64)
            .map(|i| sample_question(bank, i, "A.yes"))
            .collect();
        let mut rng = StdRng::seed_from_u64(1);
        let mut challenge = Challenge::start_at(bank, &questions, &mut rng, at(start));
        for pick in picks {
            challenge.answer(Answer::chosen(*pick));
            challenge.advance_at(at(start + 10));
        }
        let mut stats = UserStats::new();
        stats.record_challenge_at(&challenge, at(start + 10));
        stats
    }

    #[test]
    fn test_text_report() -> Fallible<()> {
        let stats = played("M1_week1", 0, &["A.yes", "B.no"]);
        let text = render_stats(&stats, TimeRange::All, at(60), OutputFormat::Text)?;
        assert!(text.contains("Statistics (all time)"));
        assert!(text.contains("Challenges:        1"));
        assert!(text.contains("Accuracy:          50.0%"));
        assert!(text.contains("Time per question: 5.0s"));
        assert!(text.contains("M1_week1: 1 challenges, 2 questions, 50.0%"));
        Ok(())
    }

    #[test]
    fn test_json_report() -> Fallible<()> {
        let stats = played("M1_week1", 0, &["A.yes", "A.yes"]);
        let json = render_stats(&stats, TimeRange::Week, at(60), OutputFormat::Json)?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(value["range"], "last 7 days");
        assert_eq!(value["summary"]["totalQuestions"], 2);
        assert_eq!(value["totalMissed"], 0);
        assert_eq!(value["history"].as_array().map(Vec::len), Some(1));
        Ok(())
    }

    #[test]
    fn test_range_excludes_old_challenges() -> Fallible<()> {
        let stats = played("M1_week1", 0, &["A.yes"]);
        let later = at(30 * 24 * 60 * 60);
        let text = render_stats(&stats, TimeRange::Week, later, OutputFormat::Text)?;
        assert!(text.contains("Challenges:        0"));
        assert!(!text.contains("Recent challenges:"));
        Ok(())
    }

    #[test]
    fn test_print_stats() -> Fallible<()> {
        let root = create_tmp_collection()?;
        print_stats(collection_arg(&root), TimeRange::All, OutputFormat::Json)
    }
}
