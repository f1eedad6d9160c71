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

use std::io::BufRead;
use std::io::Write;
use std::io::stdin;
use std::io::stdout;

use rand::thread_rng;

use crate::challenge::Challenge;
use crate::cmd::report_warnings;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::session::Session;
use crate::stats::ChallengeStats;
use crate::store::Store;
use crate::types::question::Answer;
use crate::types::question::Question;

const HELP: &str = "\
Commands:
  A, B, ...   pick the option with that label
  1, 2, ...   pick the option at that position
  ?           mark the question as unknown
  n / p       next / previous question
  g N         go to question N
  f           finish (every question must be answered)
  f!          finish now, leaving the rest unanswered
  q           save and quit
  h           show this help";

pub fn drill(directory: Option<String>, bank: Option<String>) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let mut session = coll.open_session()?;
    report_warnings(&mut session);
    match bank {
        Some(bank) => {
            let parsed = coll.load_bank(&bank)?;
            for error in &parsed.skipped {
                eprintln!("skipped {error}");
            }
            session.start_challenge(&bank, &parsed.questions, &mut thread_rng())?;
        }
        None => {
            if session.current().is_none() {
                return fail("no challenge in progress, pass --bank to start one.");
            }
        }
    }
    let mut input = stdin().lock();
    let mut output = stdout().lock();
    run_drill(&mut session, &mut input, &mut output)?;
    report_warnings(&mut session);
    Ok(())
}

#[derive(Debug, PartialEq)]
enum Command {
    Pick(usize),
    Skip,
    Next,
    Previous,
    Jump(isize),
    Finish,
    ForceFinish,
    Quit,
    Help,
    Invalid,
}

fn parse_command(line: &str, options: &[String]) -> Command {
    let line = line.trim();
    match line {
        "?" => return Command::Skip,
        "n" => return Command::Next,
        "p" => return Command::Previous,
        "f" => return Command::Finish,
        "f!" => return Command::ForceFinish,
        "q" => return Command::Quit,
        "h" => return Command::Help,
        _ => {}
    }
    if let Some(rest) = line.strip_prefix("g ") {
        return match rest.trim().parse::<isize>() {
            Ok(n) => n.checked_sub(1).map_or(Command::Invalid, Command::Jump),
            Err(_) => Command::Invalid,
        };
    }
    if let Ok(n) = line.parse::<usize>() {
        if n >= 1 && n <= options.len() {
            return Command::Pick(n - 1);
        }
        return Command::Invalid;
    }
    let mut chars = line.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        let label = format!("{}.", c.to_ascii_uppercase());
        if let Some(idx) = options.iter().position(|o| o.starts_with(&label)) {
            return Command::Pick(idx);
        }
    }
    Command::Invalid
}

/// Run the active challenge against line-oriented input until it is
/// finished or the user quits.
pub fn run_drill<S: Store>(
    session: &mut Session<S>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Fallible<()> {
    writeln!(output, "Type h for help.")?;
    loop {
        let Some(challenge) = session.current() else {
            break;
        };
        let Some(question) = challenge.current_question() else {
            break;
        };
        render(challenge, question, output)?;
        let options = question.options().to_vec();
        let answered = question.is_answered();

        write!(output, "> ")?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            writeln!(output, "Progress saved.")?;
            break;
        }

        match parse_command(&line, &options) {
            Command::Pick(_) | Command::Skip if answered => {
                writeln!(output, "Already answered.")?;
            }
            Command::Pick(idx) => {
                session.answer(Answer::Chosen(options[idx].clone()));
                report_answer(session, output)?;
                advance(session, output)?;
            }
            Command::Skip => {
                session.mark_unknown();
                report_answer(session, output)?;
                advance(session, output)?;
            }
            Command::Next => advance(session, output)?,
            Command::Previous => {
                if !session.retreat() {
                    writeln!(output, "Already at the first question.")?;
                }
            }
            Command::Jump(idx) => {
                if !session.jump_to(idx) {
                    writeln!(output, "No such question.")?;
                }
            }
            Command::Finish => finish(session, output)?,
            Command::ForceFinish => {
                if let Some(stats) = session.complete_current() {
                    print_summary(&stats, output)?;
                }
            }
            Command::Quit => {
                writeln!(output, "Progress saved.")?;
                break;
            }
            Command::Help => writeln!(output, "{HELP}")?,
            Command::Invalid => writeln!(output, "Unrecognized input, type h for help.")?,
        }
    }
    Ok(())
}

fn render(challenge: &Challenge, question: &Question, output: &mut impl Write) -> Fallible<()> {
    writeln!(output)?;
    writeln!(
        output,
        "[{}/{}] {} answered, {} correct",
        challenge.current_index() + 1,
        challenge.total_count(),
        challenge.answered_count(),
        challenge.correct_count()
    )?;
    writeln!(output, "{}", question.text())?;
    for option in question.options() {
        let chosen = matches!(question.user_answer(), Some(Answer::Chosen(text)) if text == option);
        let marker = if chosen { "*" } else { " " };
        writeln!(output, " {marker} {option}")?;
    }
    if let Some(answer) = question.user_answer() {
        writeln!(output, "Your answer: {answer}")?;
    }
    Ok(())
}

fn report_answer<S: Store>(session: &Session<S>, output: &mut impl Write) -> Fallible<()> {
    let Some(question) = session.current().and_then(Challenge::current_question) else {
        return Ok(());
    };
    if question.is_correct() {
        writeln!(output, "Correct.")?;
    } else {
        writeln!(output, "Incorrect, the answer is {}.", question.correct_answer())?;
    }
    Ok(())
}

/// Move to the next question. Past the last question this is a finish
/// attempt, so a challenge with unanswered questions is never recorded.
fn advance<S: Store>(session: &mut Session<S>, output: &mut impl Write) -> Fallible<()> {
    let at_last = session
        .current()
        .is_some_and(|c| c.current_index() + 1 >= c.total_count());
    if at_last {
        return finish(session, output);
    }
    session.advance();
    Ok(())
}

/// Complete the challenge if every question is answered, otherwise go to
/// the first unanswered one.
fn finish<S: Store>(session: &mut Session<S>, output: &mut impl Write) -> Fallible<()> {
    match session.current().and_then(Challenge::first_unanswered) {
        Some(idx) => {
            session.jump_to(idx as isize);
            writeln!(output, "Question {} is unanswered.", idx + 1)?;
        }
        None => {
            if let Some(stats) = session.complete_current() {
                print_summary(&stats, output)?;
            }
        }
    }
    Ok(())
}

fn print_summary(stats: &ChallengeStats, output: &mut impl Write) -> Fallible<()> {
    writeln!(output)?;
    writeln!(output, "Challenge complete: {}", stats.bank)?;
    writeln!(
        output,
        "{}/{} correct ({:.1}% of answered), {:.0}s",
        stats.correct_answers, stats.total_questions, stats.accuracy, stats.duration
    )?;
    Ok(())
}
