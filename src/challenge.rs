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

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde::Serialize;

use crate::types::challenge_id::ChallengeId;
use crate::types::question::Answer;
use crate::types::question::Question;
use crate::types::timestamp::Timestamp;

/// The outcome of moving forward in a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The current index moved to the next question.
    Moved,
    /// There was no next question, so the challenge was completed.
    Completed,
}

/// One attempt at the questions of a bank.
///
/// Navigation never fails: out-of-range moves are no-ops.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    id: ChallengeId,
    bank: String,
    started_at: Timestamp,
    ended_at: Option<Timestamp>,
    questions: Vec<Question>,
    current_index: usize,
    active: bool,
}

impl Challenge {
    pub fn start<R: Rng + ?Sized>(bank: &str, questions: &[Question], rng: &mut R) -> Self {
        Self::start_at(bank, questions, rng, Timestamp::now())
    }

    /// Start a challenge over a shuffled copy of `questions`, each
    /// re-stamped as belonging to `bank`.
    pub fn start_at<R: Rng + ?Sized>(
        bank: &str,
        questions: &[Question],
        rng: &mut R,
        started_at: Timestamp,
    ) -> Self {
        let mut questions: Vec<Question> = questions.iter().map(|q| q.restamp(bank)).collect();
        questions.shuffle(rng);
        let id = ChallengeId::derive(bank, started_at, &questions);
        log::debug!(
            "Starting challenge {} over {} questions from {bank}.",
            &id.to_hex()[..8],
            questions.len()
        );
        Self {
            id,
            bank: bank.to_string(),
            started_at,
            ended_at: None,
            questions,
            current_index: 0,
            active: true,
        }
    }

    pub fn id(&self) -> ChallengeId {
        self.id
    }

    pub fn bank(&self) -> &str {
        &self.bank
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<Timestamp> {
        self.ended_at
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn total_count(&self) -> usize {
        self.questions.len()
    }

    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_answered()).count()
    }

    pub fn correct_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_correct()).count()
    }

    pub fn incorrect_count(&self) -> usize {
        self.answered_count() - self.correct_count()
    }

    /// Percentage of answered questions that were correct.
    pub fn accuracy(&self) -> f64 {
        let answered = self.answered_count();
        if answered == 0 {
            return 0.0;
        }
        self.correct_count() as f64 / answered as f64 * 100.0
    }

    pub fn is_completed(&self) -> bool {
        self.answered_count() == self.total_count()
    }

    /// Fraction of questions answered, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let total = self.total_count();
        if total == 0 {
            return 0.0;
        }
        self.answered_count() as f64 / total as f64
    }

    pub fn first_unanswered(&self) -> Option<usize> {
        self.questions.iter().position(|q| !q.is_answered())
    }

    /// Record an answer to the current question, replacing any earlier
    /// one. Returns false if there is no current question.
    pub fn answer(&mut self, answer: Answer) -> bool {
        match self.questions.get_mut(self.current_index) {
            Some(question) => {
                question.set_answer(answer);
                true
            }
            None => false,
        }
    }

    pub fn mark_unknown(&mut self) -> bool {
        self.answer(Answer::Skipped)
    }

    pub fn advance(&mut self) -> Advance {
        self.advance_at(Timestamp::now())
    }

    /// Move to the next question, or complete the challenge when already
    /// at the last one.
    pub fn advance_at(&mut self, now: Timestamp) -> Advance {
        if self.current_index + 1 >= self.questions.len() {
            self.complete_at(now);
            return Advance::Completed;
        }
        self.current_index += 1;
        Advance::Moved
    }

    pub fn retreat(&mut self) -> bool {
        if self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        true
    }

    pub fn jump_to(&mut self, index: isize) -> bool {
        match usize::try_from(index) {
            Ok(index) if index < self.questions.len() => {
                self.current_index = index;
                true
            }
            _ => false,
        }
    }

    pub fn complete(&mut self) {
        self.complete_at(Timestamp::now())
    }

    /// End the challenge whether or not every question was answered.
    pub fn complete_at(&mut self, now: Timestamp) {
        self.active = false;
        self.ended_at = Some(now);
        log::debug!(
            "Challenge {} ended: {}/{} correct.",
            &self.id.to_hex()[..8],
            self.correct_count(),
            self.total_count()
        );
    }
}
