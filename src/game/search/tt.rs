// src/game/search/tt.rs

use std::collections::{HashMap, VecDeque};

use shakmaty::Move;
use tracing::debug;

use crate::game::board::PositionKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtEntry {
    pub depth: u8,
    pub score: i32,
    pub best_move: Option<Move>,
}

/// Position-keyed cache of completed searches.
///
/// Entries persist across moves. Once the table grows past `max_entries`
/// the oldest inserted keys are evicted until `trim_to` remain.
pub struct TranspositionTable {
    table: HashMap<PositionKey, TtEntry>,
    order: VecDeque<PositionKey>,
    max_entries: usize,
    trim_to: usize,
}

impl TranspositionTable {
    pub fn new(max_entries: usize, trim_to: usize) -> Self {
        Self {
            table: HashMap::new(),
            order: VecDeque::new(),
            max_entries,
            trim_to: trim_to.min(max_entries),
        }
    }

    pub fn probe(&self, key: PositionKey) -> Option<&TtEntry> {
        self.table.get(&key)
    }

    /// Entry usable for a search of `depth` plies.
    pub fn lookup(&self, key: PositionKey, depth: u8) -> Option<&TtEntry> {
        self.probe(key).filter(|entry| entry.depth >= depth)
    }

    /// Inserts or overwrites the entry for `key`.
    pub fn store(&mut self, key: PositionKey, entry: TtEntry) {
        if self.table.insert(key, entry).is_none() {
            self.order.push_back(key);
        }
    }

    pub fn discard(&mut self, key: PositionKey) {
        if self.table.remove(&key).is_some() {
            self.order.retain(|&k| k != key);
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Evicts oldest entries when over capacity. Returns how many were dropped.
    pub fn trim(&mut self) -> usize {
        if self.table.len() <= self.max_entries {
            return 0;
        }
        let before = self.table.len();
        while self.table.len() > self.trim_to {
            match self.order.pop_front() {
                Some(key) => {
                    self.table.remove(&key);
                }
                None => break,
            }
        }
        let dropped = before - self.table.len();
        debug!(dropped, kept = self.table.len(), "trimmed transposition table");
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(depth: u8, score: i32) -> TtEntry {
        TtEntry {
            depth,
            score,
            best_move: None,
        }
    }

    #[test]
    fn test_lookup_respects_depth() {
        let mut tt = TranspositionTable::new(10, 5);
        let key = PositionKey(42);
        tt.store(key, entry(3, 17));

        assert_eq!(tt.lookup(key, 2).map(|e| e.score), Some(17));
        assert_eq!(tt.lookup(key, 3).map(|e| e.score), Some(17));
        assert!(tt.lookup(key, 4).is_none());
        assert!(tt.probe(key).is_some());
    }

    #[test]
    fn test_store_overwrites() {
        let mut tt = TranspositionTable::new(10, 5);
        let key = PositionKey(1);
        tt.store(key, entry(5, 10));
        tt.store(key, entry(2, -4));

        assert_eq!(tt.len(), 1);
        assert_eq!(tt.probe(key), Some(&entry(2, -4)));
    }

    #[test]
    fn test_trim_keeps_newest() {
        let mut tt = TranspositionTable::new(10, 4);
        for i in 0..10 {
            tt.store(PositionKey(i), entry(1, i as i32));
        }
        assert_eq!(tt.trim(), 0);

        tt.store(PositionKey(10), entry(1, 10));
        assert_eq!(tt.trim(), 7);
        assert_eq!(tt.len(), 4);
        for i in 0..7 {
            assert!(tt.probe(PositionKey(i)).is_none());
        }
        for i in 7..11 {
            assert!(tt.probe(PositionKey(i)).is_some());
        }
    }

    #[test]
    fn test_discard() {
        let mut tt = TranspositionTable::new(10, 4);
        tt.store(PositionKey(1), entry(1, 0));
        tt.store(PositionKey(2), entry(1, 0));
        tt.discard(PositionKey(1));

        assert_eq!(tt.len(), 1);
        assert!(tt.probe(PositionKey(1)).is_none());
        tt.discard(PositionKey(2));
        assert!(tt.is_empty());
    }
}
