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

//! Read-only views over the mistake ledger and challenge history. Nothing
//! here mutates [`UserStats`].

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use serde::Serialize;

use crate::stats::ChallengeStats;
use crate::stats::MistakeRecord;
use crate::stats::UserStats;
use crate::types::timestamp::Timestamp;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MistakeSort {
    /// Most recently missed first.
    #[default]
    Recent,
    /// Most often missed first.
    Frequent,
    /// Grouped by bank name.
    Bank,
}

#[derive(Debug, Clone, Default)]
pub struct MistakeFilter {
    /// Banks to include. Empty means every bank.
    pub banks: BTreeSet<String>,
    /// Case-insensitive text to look for. Empty means no filtering.
    pub search: String,
    pub sort: MistakeSort,
}

/// The distinct banks that appear in the mistake ledger.
pub fn mistake_banks(stats: &UserStats) -> BTreeSet<String> {
    stats.mistakes.values().map(|m| m.bank.clone()).collect()
}

/// Select and order mistakes from the ledger.
pub fn filter_mistakes<'a>(stats: &'a UserStats, filter: &MistakeFilter) -> Vec<&'a MistakeRecord> {
    let needle = filter.search.to_lowercase();
    let mut mistakes: Vec<&MistakeRecord> = stats
        .mistakes
        .values()
        .filter(|m| filter.banks.is_empty() || filter.banks.contains(&m.bank))
        .filter(|m| needle.is_empty() || matches_search(m, &needle))
        .collect();

    // Recency is the base order, so ties in the other sorts stay recent-first.
    mistakes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    match filter.sort {
        MistakeSort::Recent => {}
        MistakeSort::Frequent => mistakes.sort_by(|a, b| b.error_count.cmp(&a.error_count)),
        MistakeSort::Bank => mistakes.sort_by(|a, b| a.bank.cmp(&b.bank)),
    }
    mistakes
}

fn matches_search(mistake: &MistakeRecord, needle: &str) -> bool {
    mistake.question_text.to_lowercase().contains(needle)
        || mistake.bank.to_lowercase().contains(needle)
        || mistake.options.concat().to_lowercase().contains(needle)
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TimeRange {
    /// Challenges started in the last seven days.
    Week,
    /// Challenges started in the last calendar month.
    Month,
    /// Every challenge.
    #[default]
    All,
}

impl TimeRange {
    /// The earliest start time included in the range, if bounded.
    pub fn cutoff(self, now: Timestamp) -> Option<Timestamp> {
        match self {
            TimeRange::Week => Some(now.minus_days(7)),
            TimeRange::Month => Some(now.minus_one_month()),
            TimeRange::All => None,
        }
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeRange::Week => write!(f, "last 7 days"),
            TimeRange::Month => write!(f, "last month"),
            TimeRange::All => write!(f, "all time"),
        }
    }
}

/// History entries in `range`, most recent start first.
pub fn history_in_range(
    stats: &UserStats,
    range: TimeRange,
    now: Timestamp,
) -> Vec<&ChallengeStats> {
    let cutoff = range.cutoff(now);
    let mut history: Vec<&ChallengeStats> = stats
        .challenges_history
        .iter()
        .filter(|c| cutoff.is_none_or(|cutoff| c.started_at >= cutoff))
        .collect();
    history.sort_by(|a, b| b.started_at.cmp(&a.started_at));
    history
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub total_challenges: usize,
    pub total_questions: usize,
    pub total_correct_answers: usize,
    /// Correct answers as a percentage of questions.
    pub accuracy: f64,
    /// Seconds per question.
    pub average_time_per_question: f64,
}

pub fn summarize(history: &[&ChallengeStats]) -> HistorySummary {
    let total_questions: usize = history.iter().map(|c| c.total_questions).sum();
    let total_correct_answers: usize = history.iter().map(|c| c.correct_answers).sum();
    let total_time: f64 = history.iter().map(|c| c.duration).sum();
    let (accuracy, average_time_per_question) = if total_questions == 0 {
        (0.0, 0.0)
    } else {
        (
            total_correct_answers as f64 / total_questions as f64 * 100.0,
            total_time / total_questions as f64,
        )
    };
    HistorySummary {
        total_challenges: history.len(),
        total_questions,
        total_correct_answers,
        accuracy,
        average_time_per_question,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankBreakdown {
    pub bank: String,
    pub total_challenges: usize,
    pub total_questions: usize,
    pub accuracy: f64,
}

/// Per-bank totals, sorted by bank name.
pub fn bank_breakdown(history: &[&ChallengeStats]) -> Vec<BankBreakdown> {
    let mut grouped: BTreeMap<&str, Vec<&ChallengeStats>> = BTreeMap::new();
    for entry in history {
        grouped.entry(entry.bank.as_str()).or_default().push(*entry);
    }
    grouped
        .into_iter()
        .map(|(bank, entries)| {
            let summary = summarize(&entries);
            BankBreakdown {
                bank: bank.to_string(),
                total_challenges: summary.total_challenges,
                total_questions: summary.total_questions,
                accuracy: summary.accuracy,
            }
        })
        .collect()
}
