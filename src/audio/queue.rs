use std::collections::VecDeque;

use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::model::Track;

pub const HISTORY_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlayMode {
    #[default]
    Order,
    Loop,
    Single,
    Shuffle,
}

impl PlayMode {
    pub fn next(self) -> Self {
        match self {
            PlayMode::Order => PlayMode::Loop,
            PlayMode::Loop => PlayMode::Single,
            PlayMode::Single => PlayMode::Shuffle,
            PlayMode::Shuffle => PlayMode::Order,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayMode::Order => "In order",
            PlayMode::Loop => "Loop all",
            PlayMode::Single => "Repeat one",
            PlayMode::Shuffle => "Shuffle",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            PlayMode::Order => "→",
            PlayMode::Loop => "⟳",
            PlayMode::Single => "①",
            PlayMode::Shuffle => "⤮",
        }
    }
}

/// Ordered tracks, the playing position and the positions visited so far.
/// `current` is `None` exactly when the queue is empty.
pub struct QueueManager {
    queue: Vec<Track>,
    current: Option<usize>,
    mode: PlayMode,
    history: VecDeque<usize>,
    rng: SmallRng,
}

impl Default for QueueManager {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueManager {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_rng(&mut rand::rng()))
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Self {
            queue: Vec::new(),
            current: None,
            mode: PlayMode::default(),
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            rng,
        }
    }

    /// Replaces the queue and positions it on `focus` (or the first track
    /// when `focus` is not part of it).
    pub fn set_queue(&mut self, tracks: Vec<Track>, focus: &Track) -> Option<usize> {
        self.history.clear();
        if tracks.is_empty() {
            self.queue.clear();
            self.current = None;
            return None;
        }

        let index = tracks.iter().position(|t| t.same_as(focus)).unwrap_or(0);
        self.queue = tracks;
        self.current = Some(index);
        self.history.push_back(index);
        self.current
    }

    /// Moves to the track that follows under the current mode. `None` means
    /// there is nothing to play next and nothing changed.
    pub fn next(&mut self) -> Option<usize> {
        let current = self.current?;
        let len = self.queue.len();

        let next = match self.mode {
            PlayMode::Single => current,
            PlayMode::Shuffle if len > 1 => {
                let pick = self.rng.random_range(0..len - 1);
                if pick >= current { pick + 1 } else { pick }
            }
            PlayMode::Shuffle => current,
            PlayMode::Loop => (current + 1) % len,
            PlayMode::Order if current + 1 < len => current + 1,
            PlayMode::Order => return None,
        };

        self.current = Some(next);
        self.remember(next);
        Some(next)
    }

    pub fn previous(&mut self) -> Option<usize> {
        let current = self.current?;

        if self.history.len() >= 2 {
            self.history.pop_back();
            let back = self.history.back().copied();
            if let Some(index) = back.filter(|i| *i < self.queue.len()) {
                self.current = Some(index);
                return self.current;
            }
        }

        let previous = match current.checked_sub(1) {
            Some(index) => index,
            None if self.mode == PlayMode::Loop => self.queue.len() - 1,
            None => 0,
        };
        self.current = Some(previous);
        self.history.clear();
        self.history.push_back(previous);
        self.current
    }

    /// Jumps straight to `index`, recording it as a visit.
    pub fn select(&mut self, index: usize) -> Option<usize> {
        if index >= self.queue.len() {
            return None;
        }
        self.current = Some(index);
        self.remember(index);
        self.current
    }

    pub fn cycle_mode(&mut self) -> PlayMode {
        self.mode = self.mode.next();
        self.mode
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.queue.get(i))
    }

    pub fn tracks(&self) -> &[Track] {
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn history(&self) -> impl Iterator<Item = usize> + '_ {
        self.history.iter().copied()
    }

    fn remember(&mut self, index: usize) {
        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Source;
    use proptest::prelude::*;

    fn tracks(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| Track {
                id: i.to_string(),
                name: format!("Track {i}"),
                artist: "Artist".into(),
                source: Source::Netease,
            })
            .collect()
    }

    fn queue_at(n: usize, start: usize, mode: PlayMode, seed: u64) -> QueueManager {
        let list = tracks(n);
        let focus = list[start].clone();
        let mut queue = QueueManager::with_seed(seed);
        queue.set_queue(list, &focus);
        while queue.mode() != mode {
            queue.cycle_mode();
        }
        queue
    }

    #[test]
    fn focus_is_found_by_identity() {
        let list = tracks(4);
        let mut queue = QueueManager::new();
        assert_eq!(queue.set_queue(list.clone(), &list[2]), Some(2));
        assert_eq!(queue.history().collect::<Vec<_>>(), vec![2]);

        let stranger = Track {
            source: Source::Kuwo,
            ..list[2].clone()
        };
        assert_eq!(queue.set_queue(list, &stranger), Some(0));
    }

    #[test]
    fn empty_queue_is_inert() {
        let mut queue = QueueManager::new();
        assert_eq!(queue.set_queue(Vec::new(), &tracks(1)[0]), None);
        assert_eq!(queue.next(), None);
        assert_eq!(queue.previous(), None);
        assert_eq!(queue.select(0), None);
        assert!(queue.current_track().is_none());
    }

    #[test]
    fn single_mode_repeats_and_single_track_shuffle_stays() {
        let mut queue = queue_at(3, 1, PlayMode::Single, 1);
        assert_eq!(queue.next(), Some(1));
        assert_eq!(queue.next(), Some(1));

        let mut queue = queue_at(1, 0, PlayMode::Shuffle, 1);
        assert_eq!(queue.next(), Some(0));
    }

    #[test]
    fn modes_cycle_in_order() {
        let mut queue = QueueManager::new();
        let seen: Vec<_> = (0..4).map(|_| queue.cycle_mode()).collect();
        assert_eq!(
            seen,
            vec![PlayMode::Loop, PlayMode::Single, PlayMode::Shuffle, PlayMode::Order]
        );
    }

    #[test]
    fn previous_without_history_wraps_only_in_loop() {
        let mut queue = queue_at(3, 0, PlayMode::Order, 1);
        assert_eq!(queue.previous(), Some(0));

        let mut queue = queue_at(3, 0, PlayMode::Loop, 1);
        assert_eq!(queue.previous(), Some(2));
        assert_eq!(queue.history().collect::<Vec<_>>(), vec![2]);
        assert_eq!(queue.previous(), Some(1));
    }

    #[test]
    fn history_is_bounded() {
        let mut queue = queue_at(2, 0, PlayMode::Loop, 1);
        for _ in 0..HISTORY_CAPACITY * 2 {
            queue.next();
        }
        assert_eq!(queue.history().count(), HISTORY_CAPACITY);
    }

    proptest! {
        #[test]
        fn loop_visits_every_index_once_per_cycle(len in 1usize..40, start_seed in any::<usize>()) {
            let start = start_seed % len;
            let mut queue = queue_at(len, start, PlayMode::Loop, 7);
            let mut visited: Vec<usize> = (0..len).filter_map(|_| queue.next()).collect();
            visited.sort_unstable();
            prop_assert_eq!(visited, (0..len).collect::<Vec<_>>());
            prop_assert_eq!(queue.current(), Some(start));
        }

        #[test]
        fn order_ends_exactly_at_the_last_index(len in 1usize..40, start_seed in any::<usize>()) {
            let start = start_seed % len;
            let mut queue = queue_at(len, start, PlayMode::Order, 7);
            let result = queue.next();
            prop_assert_eq!(result.is_none(), start == len - 1);
            if result.is_none() {
                prop_assert_eq!(queue.current(), Some(start));
            }
        }

        #[test]
        fn shuffle_never_repeats_the_current_index(len in 2usize..40, seed in any::<u64>()) {
            let mut queue = queue_at(len, 0, PlayMode::Shuffle, seed);
            for _ in 0..20 {
                let before = queue.current();
                let after = queue.next();
                prop_assert!(after.is_some());
                prop_assert_ne!(after, before);
                prop_assert!(after.unwrap() < len);
            }
        }

        #[test]
        fn previous_returns_to_the_last_visit(len in 3usize..40, steps in 2usize..10, seed in any::<u64>()) {
            let mut queue = queue_at(len, 0, PlayMode::Shuffle, seed);
            let mut visits = vec![0];
            for _ in 0..steps {
                visits.push(queue.next().unwrap());
            }
            prop_assert_eq!(queue.previous(), Some(visits[visits.len() - 2]));
            prop_assert_eq!(queue.previous(), Some(visits[visits.len() - 3]));
        }
    }
}
