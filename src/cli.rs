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

use clap::Parser;

use crate::cmd::OutputFormat;
use crate::cmd::banks::list_collection_banks;
use crate::cmd::check::check_banks;
use crate::cmd::drill::drill;
use crate::cmd::manage::clear_mistakes;
use crate::cmd::manage::reset_data;
use crate::cmd::manage::theme;
use crate::cmd::mistakes::print_mistakes;
use crate::cmd::stats::print_stats;
use crate::error::Fallible;
use crate::review::MistakeSort;
use crate::review::TimeRange;
use crate::types::theme::Theme;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// List the question banks in a collection.
    Banks {
        /// Path to the collection directory.
        directory: Option<String>,
    },
    /// Check that banks parse, reporting skipped rows.
    Check {
        /// The bank to check. Checks every bank if omitted.
        #[arg(long)]
        bank: Option<String>,
        /// Path to the collection directory.
        directory: Option<String>,
    },
    /// Run a challenge in the terminal.
    Drill {
        /// Start a new challenge on this bank. Resumes the active challenge
        /// if omitted.
        #[arg(long)]
        bank: Option<String>,
        /// Path to the collection directory.
        directory: Option<String>,
    },
    /// Print historical statistics.
    Stats {
        #[arg(long, value_enum, default_value_t = TimeRange::All)]
        range: TimeRange,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Path to the collection directory.
        directory: Option<String>,
    },
    /// Print the mistake ledger.
    Mistakes {
        #[arg(long, value_enum, default_value_t = MistakeSort::Recent)]
        sort: MistakeSort,
        /// Only show mistakes mentioning this text.
        #[arg(long)]
        search: Option<String>,
        /// Only show mistakes from these banks.
        #[arg(long)]
        bank: Vec<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Path to the collection directory.
        directory: Option<String>,
    },
    /// Remove mistakes from the ledger.
    ClearMistakes {
        /// Only remove mistakes from this bank.
        #[arg(long)]
        bank: Option<String>,
        /// Path to the collection directory.
        directory: Option<String>,
    },
    /// Erase all statistics and the active challenge.
    Reset {
        /// Path to the collection directory.
        directory: Option<String>,
    },
    /// Show or set the display theme.
    Theme {
        #[arg(long, value_enum)]
        set: Option<Theme>,
        /// Path to the collection directory.
        directory: Option<String>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Banks { directory } => list_collection_banks(directory),
        Command::Check { bank, directory } => check_banks(directory, bank),
        Command::Drill { bank, directory } => drill(directory, bank),
        Command::Stats {
            range,
            format,
            directory,
        } => print_stats(directory, range, format),
        Command::Mistakes {
            sort,
            search,
            bank,
            format,
            directory,
        } => print_mistakes(directory, sort, search, bank, format),
        Command::ClearMistakes { bank, directory } => clear_mistakes(directory, bank),
        Command::Reset { directory } => reset_data(directory),
        Command::Theme { set, directory } => theme(directory, set),
    }
}
