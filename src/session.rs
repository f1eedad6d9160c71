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
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::challenge::Advance;
use crate::challenge::Challenge;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::stats::ChallengeStats;
use crate::stats::UserStats;
use crate::store::Key;
use crate::store::Store;
use crate::types::question::Answer;
use crate::types::question::Question;
use crate::types::theme::Theme;
use crate::types::timestamp::Timestamp;

/// The application state: the active challenge, the cumulative statistics,
/// and the theme preference, saved to a [`Store`] after every mutation.
///
/// A failed save is logged and kept in [`Session::warnings`]; the
/// in-memory state stays authoritative.
pub struct Session<S: Store> {
    store: S,
    current: Option<Challenge>,
    stats: UserStats,
    theme: Theme,
    warnings: Vec<ErrorReport>,
}

impl<S: Store> Session<S> {
    /// Load every slot from `store`. Missing or unreadable slots fall back
    /// to their defaults.
    pub fn open(store: S) -> Self {
        let mut warnings = Vec::new();
        let current: Option<Challenge> = load_slot(&store, Key::CurrentChallenge, &mut warnings);
        let stats: UserStats =
            load_slot(&store, Key::UserStats, &mut warnings).unwrap_or_default();
        let theme: Theme = load_slot(&store, Key::Theme, &mut warnings).unwrap_or_default();
        Self {
            store,
            current,
            stats,
            theme,
            warnings,
        }
    }

    pub fn current(&self) -> Option<&Challenge> {
        self.current.as_ref()
    }

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn warnings(&self) -> &[ErrorReport] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<ErrorReport> {
        std::mem::take(&mut self.warnings)
    }

    /// Start a new challenge, replacing any active one.
    pub fn start_challenge<R: Rng + ?Sized>(
        &mut self,
        bank: &str,
        questions: &[Question],
        rng: &mut R,
    ) -> Fallible<&Challenge> {
        if questions.is_empty() {
            return fail(format!("bank is empty: {bank}"));
        }
        if let Some(previous) = &self.current {
            log::debug!("Discarding unfinished challenge on {}.", previous.bank());
        }
        let challenge = Challenge::start(bank, questions, rng);
        self.save_current_challenge(Some(&challenge));
        Ok(self.current.insert(challenge))
    }

    pub fn answer(&mut self, answer: Answer) -> bool {
        self.update_current(|c| c.answer(answer)).unwrap_or(false)
    }

    pub fn mark_unknown(&mut self) -> bool {
        self.answer(Answer::Skipped)
    }

    pub fn retreat(&mut self) -> bool {
        self.update_current(Challenge::retreat).unwrap_or(false)
    }

    pub fn jump_to(&mut self, index: isize) -> bool {
        self.update_current(|c| c.jump_to(index)).unwrap_or(false)
    }

    /// Move forward in the active challenge. When that completes the
    /// challenge, it is recorded and the active slot is cleared.
    pub fn advance(&mut self) -> Option<Advance> {
        self.advance_at(Timestamp::now())
    }

    pub fn advance_at(&mut self, now: Timestamp) -> Option<Advance> {
        let challenge = self.current.as_mut()?;
        let advance = challenge.advance_at(now);
        match advance {
            Advance::Moved => {
                let snapshot = self.current.clone();
                self.save_current_challenge(snapshot.as_ref());
            }
            Advance::Completed => {
                self.finish(now);
            }
        }
        Some(advance)
    }

    pub fn complete_current(&mut self) -> Option<ChallengeStats> {
        self.complete_current_at(Timestamp::now())
    }

    /// End the active challenge regardless of how many questions were
    /// answered, and record it.
    pub fn complete_current_at(&mut self, now: Timestamp) -> Option<ChallengeStats> {
        let challenge = self.current.as_mut()?;
        challenge.complete_at(now);
        self.finish(now)
    }

    fn finish(&mut self, now: Timestamp) -> Option<ChallengeStats> {
        let challenge = self.current.take()?;
        let summary = self.stats.record_challenge_at(&challenge, now);
        self.save_current_challenge(None);
        self.save_stats();
        Some(summary)
    }

    pub fn reset_all(&mut self) {
        self.current = None;
        self.stats.reset();
        self.save_current_challenge(None);
        self.save_stats();
    }

    pub fn clear_mistakes(&mut self, bank: Option<&str>) -> usize {
        let removed = self.stats.clear_mistakes(bank);
        self.save_stats();
        removed
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        let theme = self.theme;
        self.save_slot(Key::Theme, &theme);
    }

    fn update_current<T>(&mut self, f: impl FnOnce(&mut Challenge) -> T) -> Option<T> {
        let challenge = self.current.as_mut()?;
        let result = f(challenge);
        let snapshot = self.current.clone();
        self.save_current_challenge(snapshot.as_ref());
        Some(result)
    }

    fn save_current_challenge(&mut self, challenge: Option<&Challenge>) {
        match challenge {
            Some(challenge) => self.save_slot(Key::CurrentChallenge, challenge),
            None => {
                if let Err(e) = self.store.remove(Key::CurrentChallenge) {
                    self.warn(Key::CurrentChallenge, e);
                }
            }
        }
    }

    fn save_stats(&mut self) {
        let stats = self.stats.clone();
        self.save_slot(Key::UserStats, &stats);
    }

    fn save_slot<T: Serialize>(&mut self, key: Key, value: &T) {
        let result = serde_json::to_vec(value)
            .map_err(ErrorReport::from)
            .and_then(|blob| self.store.save(key, &blob));
        match result {
            Ok(()) => log::debug!("Saved {key}."),
            Err(e) => self.warn(key, e),
        }
    }

    fn warn(&mut self, key: Key, e: ErrorReport) {
        log::warn!("Failed to save {key}: {e}");
        self.warnings
            .push(ErrorReport::new(format!("failed to save {key}: {}", e.message())));
    }
}

fn load_slot<S: Store, T: DeserializeOwned>(
    store: &S,
    key: Key,
    warnings: &mut Vec<ErrorReport>,
) -> Option<T> {
    let blob = match store.load(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Failed to load {key}: {e}");
            warnings.push(ErrorReport::new(format!("failed to load {key}: {}", e.message())));
            return None;
        }
    };
    match serde_json::from_slice(&blob) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Discarding unreadable {key}: {e}");
            warnings.push(ErrorReport::new(format!("unreadable {key}: {e}")));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::store::MemoryStore;
    use crate::types::question::sample_question;

    fn questions(bank: &str, n: i64) -> Vec<Question> {
        (1..=n).map(|i| sample_question(bank, i, "A.yes")).collect()
    }

    fn open() -> Session<MemoryStore> {
        Session::open(MemoryStore::new())
    }

    /// A store whose saves always fail.
    #[derive(Default)]
    struct BrokenStore {
        inner: MemoryStore,
    }

    impl Store for BrokenStore {
        fn load(&self, key: Key) -> Fallible<Option<Vec<u8>>> {
            self.inner.load(key)
        }

        fn save(&mut self, _key: Key, _blob: &[u8]) -> Fallible<()> {
            fail("disk full")
        }

        fn remove(&mut self, _key: Key) -> Fallible<()> {
            fail("disk full")
        }
    }

    #[test]
    fn test_fresh_session() {
        let session = open();
        assert!(session.current().is_none());
        assert_eq!(session.stats(), &UserStats::new());
        assert_eq!(session.theme(), Theme::System);
        assert!(session.warnings().is_empty());
    }

    #[test]
    fn test_empty_bank_is_refused() {
        let mut session = open();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(session.start_challenge("empty", &[], &mut rng).is_err());
        assert!(session.current().is_none());
    }

    #[test]
    fn test_challenge_survives_reopen() -> Fallible<()> {
        let mut session = open();
        let mut rng = StdRng::seed_from_u64(1);
        session.start_challenge("M1_week1", &questions("src", 3), &mut rng)?;
        session.answer(Answer::chosen("A.yes"));
        assert_eq!(session.advance(), Some(Advance::Moved));
        session.mark_unknown();

        let reopened = Session::open(session.store);
        let challenge = reopened.current().unwrap();
        assert_eq!(challenge.bank(), "M1_week1");
        assert_eq!(challenge.current_index(), 1);
        assert_eq!(challenge.answered_count(), 2);
        assert_eq!(challenge.correct_count(), 1);
        assert!(challenge.is_active());
        Ok(())
    }

    #[test]
    fn test_natural_completion_records_and_clears() -> Fallible<()> {
        let mut session = open();
        let mut rng = StdRng::seed_from_u64(1);
        session.start_challenge("M1_week1", &questions("src", 2), &mut rng)?;
        session.answer(Answer::chosen("A.yes"));
        assert_eq!(session.advance(), Some(Advance::Moved));
        session.answer(Answer::chosen("B.no"));
        assert_eq!(session.advance(), Some(Advance::Completed));
        assert!(session.current().is_none());
        assert_eq!(session.advance(), None);

        let stats = session.stats();
        assert_eq!(stats.total_challenges, 1);
        assert_eq!(stats.total_questions, 2);
        assert_eq!(stats.total_correct_answers, 1);
        assert_eq!(stats.mistakes.len(), 1);

        let reopened = Session::open(session.store);
        assert!(reopened.current().is_none());
        assert_eq!(reopened.stats().total_challenges, 1);
        assert_eq!(reopened.stats().mistakes.len(), 1);
        Ok(())
    }

    #[test]
    fn test_forced_completion() -> Fallible<()> {
        let mut session = open();
        let mut rng = StdRng::seed_from_u64(1);
        session.start_challenge("M1_week1", &questions("src", 4), &mut rng)?;
        session.answer(Answer::chosen("B.no"));
        let summary = session.complete_current().unwrap();
        assert_eq!(summary.total_questions, 4);
        assert_eq!(summary.correct_answers, 0);
        assert_eq!(summary.accuracy, 0.0);
        assert!(session.current().is_none());
        assert_eq!(session.stats().total_incorrect_answers, 1);
        assert!(session.complete_current().is_none());
        Ok(())
    }

    #[test]
    fn test_navigation_without_challenge() {
        let mut session = open();
        assert!(!session.answer(Answer::chosen("A")));
        assert!(!session.mark_unknown());
        assert!(!session.retreat());
        assert!(!session.jump_to(0));
        assert_eq!(session.advance(), None);
    }

    #[test]
    fn test_reset_all() -> Fallible<()> {
        let mut session = open();
        let mut rng = StdRng::seed_from_u64(1);
        session.start_challenge("a", &questions("src", 1), &mut rng)?;
        session.answer(Answer::chosen("B.no"));
        session.complete_current();
        session.start_challenge("a", &questions("src", 1), &mut rng)?;
        session.reset_all();
        assert!(session.current().is_none());
        assert_eq!(session.stats(), &UserStats::new());
        session.reset_all();
        assert_eq!(session.stats(), &UserStats::new());

        let reopened = Session::open(session.store);
        assert!(reopened.current().is_none());
        assert_eq!(reopened.stats(), &UserStats::new());
        Ok(())
    }

    #[test]
    fn test_theme_persists() {
        let mut session = open();
        session.set_theme(Theme::Dark);
        let reopened = Session::open(session.store);
        assert_eq!(reopened.theme(), Theme::Dark);
    }

    #[test]
    fn test_failed_saves_keep_memory_state() -> Fallible<()> {
        let mut session = Session::open(BrokenStore::default());
        let mut rng = StdRng::seed_from_u64(1);
        session.start_challenge("a", &questions("src", 2), &mut rng)?;
        assert!(session.answer(Answer::chosen("A.yes")));
        assert_eq!(session.advance(), Some(Advance::Moved));
        assert_eq!(session.current().map(|c| c.answered_count()), Some(1));
        assert!(!session.warnings().is_empty());

        session.complete_current();
        assert_eq!(session.stats().total_challenges, 1);
        let warnings = session.take_warnings();
        assert!(warnings.iter().all(|w| w.message().contains("disk full")));
        assert!(session.warnings().is_empty());
        Ok(())
    }

    #[test]
    fn test_corrupt_blob_falls_back_to_default() -> Fallible<()> {
        let mut store = MemoryStore::new();
        store.save(Key::UserStats, b"not json")?;
        store.save(Key::Theme, b"\"dark\"")?;
        let session = Session::open(store);
        assert_eq!(session.stats(), &UserStats::new());
        assert_eq!(session.theme(), Theme::Dark);
        assert_eq!(session.warnings().len(), 1);
        Ok(())
    }

    #[test]
    fn test_clear_mistakes() -> Fallible<()> {
        let mut session = open();
        let mut rng = StdRng::seed_from_u64(1);
        session.start_challenge("a", &questions("src", 2), &mut rng)?;
        session.answer(Answer::chosen("B.no"));
        session.complete_current();
        session.start_challenge("b", &questions("src", 1), &mut rng)?;
        session.answer(Answer::chosen("B.no"));
        session.complete_current();
        assert_eq!(session.stats().mistakes.len(), 2);
        assert_eq!(session.clear_mistakes(Some("a")), 1);
        let reopened = Session::open(session.store);
        assert_eq!(reopened.stats().mistakes.len(), 1);
        Ok(())
    }
}
