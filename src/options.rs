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

//! Splitting a packed choice string such as `A.one B.two` into options.

/// The smallest number of options a question may have.
pub const MIN_OPTIONS: usize = 2;

/// Split a packed choice string into labelled options.
///
/// A split happens immediately before every ASCII uppercase letter that
/// is followed by a period. Empty segments are dropped, then each segment
/// is trimmed.
///
/// This is a lexical heuristic: option text that itself contains a
/// sequence like `U.S.` is split at that point too.
pub fn split_options(packed: &str) -> Vec<String> {
    let mut segments: Vec<&str> = Vec::new();
    let mut start = 0;
    let mut chars = packed.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        let at_label = c.is_ascii_uppercase() && matches!(chars.peek(), Some((_, '.')));
        if at_label {
            segments.push(&packed[start..idx]);
            start = idx;
        }
    }
    segments.push(&packed[start..]);

    // Whitespace-only segments survive the emptiness filter and are
    // trimmed to empty strings afterwards.
    segments
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.trim().to_string())
        .collect()
}
