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
use serde::Serialize;

/// Label shown for a question the user explicitly skipped.
pub const SKIPPED_LABEL: &str = "unknown";

/// Identifies a question within a bank: `<bank>-<number>`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(bank: &str, number: i64) -> Self {
        Self(format!("{bank}-{number}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for QuestionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The user's response to a question.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Answer {
    /// The text of the option the user picked.
    Chosen(String),
    /// The user said they don't know.
    Skipped,
}

impl Answer {
    pub fn chosen(text: impl Into<String>) -> Self {
        Answer::Chosen(text.into())
    }
}

impl Display for Answer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Answer::Chosen(text) => write!(f, "{text}"),
            Answer::Skipped => write!(f, "{SKIPPED_LABEL}"),
        }
    }
}

/// The immutable facts of a question, as read from a bank row.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionContent {
    pub number: i64,
    pub grade: i64,
    pub module: i64,
    pub week: i64,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    id: QuestionId,
    bank: String,
    #[serde(flatten)]
    content: QuestionContent,
    user_answer: Option<Answer>,
}

impl Question {
    pub fn new(bank: impl Into<String>, content: QuestionContent) -> Self {
        let bank = bank.into();
        let id = QuestionId::new(&bank, content.number);
        Self {
            id,
            bank,
            content,
            user_answer: None,
        }
    }

    /// A fresh, unanswered copy of this question owned by `bank`.
    pub fn restamp(&self, bank: &str) -> Self {
        Self::new(bank, self.content.clone())
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn bank(&self) -> &str {
        &self.bank
    }

    pub fn content(&self) -> &QuestionContent {
        &self.content
    }

    pub fn text(&self) -> &str {
        &self.content.text
    }

    pub fn options(&self) -> &[String] {
        &self.content.options
    }

    pub fn correct_answer(&self) -> &str {
        &self.content.correct_answer
    }

    pub fn user_answer(&self) -> Option<&Answer> {
        self.user_answer.as_ref()
    }

    pub fn set_answer(&mut self, answer: Answer) {
        self.user_answer = Some(answer);
    }

    pub fn is_answered(&self) -> bool {
        self.user_answer.is_some()
    }

    /// Grading is an exact text match against the correct answer.
    pub fn is_correct(&self) -> bool {
        match &self.user_answer {
            Some(Answer::Chosen(text)) => *text == self.content.correct_answer,
            _ => false,
        }
    }
}

impl PartialEq for Question {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Question {}

#[cfg(test)]
pub(crate) fn sample_question(bank: &str, number: i64, correct: &str) -> Question {
    Question::new(
        bank,
        QuestionContent {
            number,
            grade: 5,
            module: 1,
            week: 1,
            text: format!("Question {number}?"),
            options: vec!["A.yes".to_string(), "B.no".to_string()],
            correct_answer: correct.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let q = sample_question("M1_week1", 7, "A.yes");
        assert_eq!(q.id().as_str(), "M1_week1-7");
        assert_eq!(q.bank(), "M1_week1");
    }

    #[test]
    fn test_grading() {
        let mut q = sample_question("bank", 1, "A.yes");
        assert!(!q.is_answered());
        assert!(!q.is_correct());
        q.set_answer(Answer::chosen("B.no"));
        assert!(q.is_answered());
        assert!(!q.is_correct());
        q.set_answer(Answer::chosen("A.yes"));
        assert!(q.is_correct());
        q.set_answer(Answer::Skipped);
        assert!(q.is_answered());
        assert!(!q.is_correct());
    }

    #[test]
    fn test_skipped_never_matches_even_if_correct_answer_is_the_label() {
        let mut q = sample_question("bank", 1, SKIPPED_LABEL);
        q.set_answer(Answer::Skipped);
        assert!(!q.is_correct());
        assert_eq!(Answer::Skipped.to_string(), SKIPPED_LABEL);
    }

    #[test]
    fn test_restamp() {
        let mut q = sample_question("old", 3, "A.yes");
        q.set_answer(Answer::chosen("A.yes"));
        let r = q.restamp("new");
        assert_eq!(r.id().as_str(), "new-3");
        assert_eq!(r.bank(), "new");
        assert!(!r.is_answered());
        assert_eq!(r.content(), q.content());
    }

    #[test]
    fn test_equality_by_identity() {
        let a = sample_question("bank", 1, "A.yes");
        let mut b = sample_question("bank", 1, "B.no");
        b.set_answer(Answer::Skipped);
        assert_eq!(a, b);
        assert_ne!(a, sample_question("bank", 2, "A.yes"));
    }

    #[test]
    fn test_json_roundtrip_keeps_answer() {
        let mut q = sample_question("bank", 1, "A.yes");
        q.set_answer(Answer::chosen("B.no"));
        let json = serde_json::to_string(&q).unwrap();
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), q.id());
        assert_eq!(back.content(), q.content());
        assert_eq!(back.user_answer(), Some(&Answer::chosen("B.no")));
    }
}
