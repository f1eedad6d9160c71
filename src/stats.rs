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

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::challenge::Challenge;
use crate::types::challenge_id::ChallengeId;
use crate::types::question::Answer;
use crate::types::question::QuestionId;
use crate::types::timestamp::Timestamp;

/// A summary of a finished challenge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeStats {
    pub id: ChallengeId,
    pub bank: String,
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
    /// Elapsed seconds between start and end.
    pub duration: f64,
    pub total_questions: usize,
    pub correct_answers: usize,
    /// Percentage of answered questions that were correct.
    pub accuracy: f64,
}

impl ChallengeStats {
    /// Summarize `challenge`. If it has no end time, `now` is used.
    pub fn from_challenge(challenge: &Challenge, now: Timestamp) -> Self {
        let ended_at = challenge.ended_at().unwrap_or(now);
        Self {
            id: challenge.id(),
            bank: challenge.bank().to_string(),
            started_at: challenge.started_at(),
            ended_at,
            duration: ended_at.seconds_since(challenge.started_at()),
            total_questions: challenge.total_count(),
            correct_answers: challenge.correct_count(),
            accuracy: challenge.accuracy(),
        }
    }
}

/// A question that has been answered incorrectly at least once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MistakeRecord {
    pub question_id: QuestionId,
    pub question_text: String,
    /// The answer given the first time the question was missed.
    pub user_answer: Answer,
    pub correct_answer: String,
    pub options: Vec<String>,
    pub bank: String,
    /// When the question was last missed.
    pub timestamp: Timestamp,
    pub error_count: usize,
}

/// Cumulative statistics over every recorded challenge.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_challenges: usize,
    pub total_questions: usize,
    pub total_correct_answers: usize,
    pub total_incorrect_answers: usize,
    /// Seconds per question across the whole history.
    pub average_time_per_question: f64,
    pub challenges_history: Vec<ChallengeStats>,
    /// The mistake ledger, keyed by question identity.
    pub mistakes: BTreeMap<QuestionId, MistakeRecord>,
}

impl UserStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentage of all questions that were answered correctly.
    pub fn total_accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.total_correct_answers as f64 / self.total_questions as f64 * 100.0
    }

    /// Total seconds spent across the history.
    pub fn total_spent_time(&self) -> f64 {
        self.challenges_history.iter().map(|c| c.duration).sum()
    }

    pub fn record_challenge(&mut self, challenge: &Challenge) -> ChallengeStats {
        self.record_challenge_at(challenge, Timestamp::now())
    }

    /// Fold a finished challenge into the totals, history, and mistake
    /// ledger. Mistakes are stamped with `now`.
    pub fn record_challenge_at(&mut self, challenge: &Challenge, now: Timestamp) -> ChallengeStats {
        let stats = ChallengeStats::from_challenge(challenge, now);
        self.challenges_history.push(stats.clone());

        self.total_challenges += 1;
        self.total_questions += challenge.total_count();
        self.total_correct_answers += challenge.correct_count();
        self.total_incorrect_answers += challenge.incorrect_count();

        self.update_average_time();
        self.fold_mistakes(challenge, now);
        log::debug!(
            "Recorded challenge on {}: {} challenges, {} mistakes in ledger.",
            stats.bank,
            self.total_challenges,
            self.mistakes.len()
        );
        stats
    }

    fn update_average_time(&mut self) {
        let questions: usize = self
            .challenges_history
            .iter()
            .map(|c| c.total_questions)
            .sum();
        self.average_time_per_question = if questions == 0 {
            0.0
        } else {
            self.total_spent_time() / questions as f64
        };
    }

    fn fold_mistakes(&mut self, challenge: &Challenge, now: Timestamp) {
        let missed = challenge
            .questions()
            .iter()
            .filter(|q| q.is_answered() && !q.is_correct());
        for question in missed {
            match self.mistakes.get_mut(question.id()) {
                Some(record) => {
                    record.timestamp = now;
                    record.error_count += 1;
                }
                None => {
                    let Some(user_answer) = question.user_answer() else {
                        continue;
                    };
                    let record = MistakeRecord {
                        question_id: question.id().clone(),
                        question_text: question.text().to_string(),
                        user_answer: user_answer.clone(),
                        correct_answer: question.correct_answer().to_string(),
                        options: question.options().to_vec(),
                        bank: challenge.bank().to_string(),
                        timestamp: now,
                        error_count: 1,
                    };
                    self.mistakes.insert(record.question_id.clone(), record);
                }
            }
        }
    }

    /// Remove the mistakes of one bank, or all of them.
    pub fn clear_mistakes(&mut self, bank: Option<&str>) -> usize {
        let before = self.mistakes.len();
        match bank {
            Some(bank) => self.mistakes.retain(|_, record| record.bank != bank),
            None => self.mistakes.clear(),
        }
        before - self.mistakes.len()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
