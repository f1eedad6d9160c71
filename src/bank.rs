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

use std::collections::HashMap;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::csv::parse_line;
use crate::options::MIN_OPTIONS;
use crate::options::split_options;
use crate::types::question::Question;
use crate::types::question::QuestionContent;

/// The header of the unlabelled question number column.
const NUMBER_COLUMN: &str = "";

/// A data row that could not be turned into a question.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// One-based line number in the source text.
    pub line_num: usize,
    pub message: String,
}

impl Display for RowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line_num, self.message)
    }
}

/// The result of parsing a bank: the questions that were accepted, and
/// the rows that were skipped.
#[derive(Debug, Default)]
pub struct ParsedBank {
    pub questions: Vec<Question>,
    pub skipped: Vec<RowError>,
}

/// Parse the text of a bank.
///
/// The first non-blank line is the header. Malformed data rows are
/// skipped and reported in [`ParsedBank::skipped`].
pub fn parse_bank(text: &str, bank: &str) -> ParsedBank {
    let mut parsed = ParsedBank::default();
    let mut headers: Option<Vec<String>> = None;

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if headers.is_none() {
            headers = Some(parse_line(line));
            continue;
        }
        let Some(columns) = headers.as_deref() else {
            continue;
        };
        match parse_row(line, columns, bank) {
            Ok(question) => parsed.questions.push(question),
            Err(message) => {
                let error = RowError {
                    line_num: idx + 1,
                    message,
                };
                log::warn!("{bank}: skipping {error}");
                parsed.skipped.push(error);
            }
        }
    }

    parsed
}

fn parse_row(line: &str, headers: &[String], bank: &str) -> Result<Question, String> {
    let values = parse_line(line);
    if values.len() < headers.len() {
        return Err(format!(
            "expected {} columns, found {}",
            headers.len(),
            values.len()
        ));
    }
    let row: HashMap<&str, &str> = headers
        .iter()
        .map(String::as_str)
        .zip(values.iter().map(String::as_str))
        .collect();

    let number = int_field(&row, NUMBER_COLUMN, "number")?;
    let grade = int_field(&row, "grade", "grade")?;
    let module = int_field(&row, "module", "module")?;
    let week = int_field(&row, "week", "week")?;
    let text = text_field(&row, "question_stem")?;
    let choice = text_field(&row, "choice")?;
    let correct_answer = match row.get("correct_answer").or_else(|| row.get("answer")) {
        Some(value) => value.to_string(),
        None => return Err("missing required field correct_answer".to_string()),
    };

    let options = split_options(choice);
    if options.len() < MIN_OPTIONS {
        return Err(format!(
            "expected at least {MIN_OPTIONS} options, found {}",
            options.len()
        ));
    }

    let content = QuestionContent {
        number,
        grade,
        module,
        week,
        text: text.to_string(),
        options,
        correct_answer,
    };
    Ok(Question::new(bank, content))
}

fn text_field<'a>(row: &HashMap<&str, &'a str>, column: &str) -> Result<&'a str, String> {
    row.get(column)
        .copied()
        .ok_or_else(|| format!("missing required field {column}"))
}

fn int_field(row: &HashMap<&str, &str>, column: &str, name: &str) -> Result<i64, String> {
    let value = row
        .get(column)
        .ok_or_else(|| format!("missing required field {name}"))?;
    value
        .parse::<i64>()
        .map_err(|_| format!("field {name} is not a number: {value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = ",grade,module,week,question_stem,choice,correct_answer";

    #[test]
    fn test_parse_bank() {
        let text = format!(
            "{HEADER}\n1,5,1,1,What is 1+1?,A.1 B.2 C.3,B.2\n2,5,1,1,\"Pick x, y\",A.x B.y,A.x\n"
        );
        let parsed = parse_bank(&text, "M1_week1");
        assert!(parsed.skipped.is_empty());
        assert_eq!(parsed.questions.len(), 2);

        let q = &parsed.questions[0];
        assert_eq!(q.id().as_str(), "M1_week1-1");
        assert_eq!(q.bank(), "M1_week1");
        assert_eq!(q.content().grade, 5);
        assert_eq!(q.text(), "What is 1+1?");
        assert_eq!(q.options(), ["A.1", "B.2", "C.3"]);
        assert_eq!(q.correct_answer(), "B.2");
        assert!(!q.is_answered());

        assert_eq!(parsed.questions[1].text(), "Pick x, y");
    }

    #[test]
    fn test_answer_column_fallback() {
        let text = ",grade,module,week,question_stem,choice,answer\n1,5,1,1,Q?,A.x B.y,A.x";
        let parsed = parse_bank(text, "bank");
        assert_eq!(parsed.questions.len(), 1);
        assert_eq!(parsed.questions[0].correct_answer(), "A.x");
    }

    #[test]
    fn test_correct_answer_takes_precedence() {
        let text = ",grade,module,week,question_stem,choice,answer,correct_answer\n\
                    1,5,1,1,Q?,A.x B.y,A.x,B.y";
        let parsed = parse_bank(text, "bank");
        assert_eq!(parsed.questions[0].correct_answer(), "B.y");
    }

    #[test]
    fn test_missing_answer_columns() {
        let text = ",grade,module,week,question_stem,choice\n1,5,1,1,Q?,A.x B.y";
        let parsed = parse_bank(text, "bank");
        assert!(parsed.questions.is_empty());
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(
            parsed.skipped[0].message,
            "missing required field correct_answer"
        );
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let text = format!(
            "{HEADER}\n\
             x,5,1,1,Bad id?,A.x B.y,A.x\n\
             2,5,one,1,Bad module?,A.x B.y,A.x\n\
             3,5,1,1,Too few options?,A.x,A.x\n\
             4,5,1\n\
             5,5,1,1,Fine?,A.x B.y,B.y\n"
        );
        let parsed = parse_bank(&text, "bank");
        assert_eq!(parsed.questions.len(), 1);
        assert_eq!(parsed.questions[0].id().as_str(), "bank-5");
        let lines: Vec<usize> = parsed.skipped.iter().map(|e| e.line_num).collect();
        assert_eq!(lines, vec![2, 3, 4, 5]);
        assert_eq!(
            parsed.skipped[0].to_string(),
            "line 2: field number is not a number: \"x\""
        );
        assert_eq!(
            parsed.skipped[2].message,
            "expected at least 2 options, found 1"
        );
        assert_eq!(parsed.skipped[3].message, "expected 7 columns, found 3");
    }

    #[test]
    fn test_signed_and_wide_numbers() {
        let text = format!(
            "{HEADER}\n-1,5,1,1,Negative id?,A.x B.y,A.x\n2,5,1,5000000000,Big week?,A.x B.y,A.x\n"
        );
        let parsed = parse_bank(&text, "bank");
        assert!(parsed.skipped.is_empty());
        assert_eq!(parsed.questions.len(), 2);
        assert_eq!(parsed.questions[0].id().as_str(), "bank--1");
        assert_eq!(parsed.questions[0].content().number, -1);
        assert_eq!(parsed.questions[1].content().week, 5_000_000_000);
    }

    #[test]
    fn test_blank_lines_and_leading_blank_header() {
        let text = format!("\n\n{HEADER}\n\n1,5,1,1,Q?,A.x B.y,A.x\n   \n");
        let parsed = parse_bank(&text, "bank");
        assert_eq!(parsed.questions.len(), 1);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_crlf_lines() {
        let text = format!("{HEADER}\r\n1,5,1,1,Q?,A.x B.y,A.x\r\n");
        let parsed = parse_bank(&text, "bank");
        assert_eq!(parsed.questions.len(), 1);
        assert_eq!(parsed.questions[0].correct_answer(), "A.x");
    }

    #[test]
    fn test_empty_text() {
        let parsed = parse_bank("", "bank");
        assert!(parsed.questions.is_empty());
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_output_bounded_by_data_lines() {
        let text = format!(
            "{HEADER}\n1,5,1,1,Q?,A.x B.y,A.x\nnot a row\n2,5,1,1,Q?,A.x B.y,A.x\n"
        );
        let parsed = parse_bank(&text, "bank");
        assert!(parsed.questions.len() <= 3);
        assert_eq!(parsed.questions.len() + parsed.skipped.len(), 3);
        assert!(parsed.questions.iter().all(|q| q.options().len() >= 2));
    }
}
