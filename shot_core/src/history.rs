//! In-memory shot log, most recent first.

use crate::evaluator::ShotResult;
use std::collections::VecDeque;

#[derive(Debug, Default, Clone)]
pub struct History {
    shots: VecDeque<ShotResult>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a result. Its id is bumped past the newest entry if two shots
    /// land on the same millisecond, so ids stay unique and increasing.
    pub fn record(&mut self, result: ShotResult) -> &ShotResult {
        let result = match self.shots.front() {
            Some(head) if result.id() <= head.id() => {
                let id = head.id().saturating_add(1);
                result.with_id(id)
            }
            _ => result,
        };
        self.shots.push_front(result);
        &self.shots[0]
    }

    /// Remove every entry; returns how many were dropped.
    pub fn purge(&mut self) -> usize {
        let n = self.shots.len();
        self.shots.clear();
        tracing::info!(purged = n, "history purged");
        n
    }

    pub fn len(&self) -> usize {
        self.shots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    pub fn latest(&self) -> Option<&ShotResult> {
        self.shots.front()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &ShotResult> {
        self.shots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShotConfiguration;
    use crate::evaluator::evaluate;
    use chrono::Local;

    #[test]
    fn newest_first_with_unique_ids() {
        let cfg = ShotConfiguration::default();
        let at = Local::now();
        let mut h = History::new();
        h.record(evaluate(&cfg, 20.0, 36.0, at));
        h.record(evaluate(&cfg, 27.0, 36.0, at));
        h.record(evaluate(&cfg, 33.0, 36.0, at));

        assert_eq!(h.len(), 3);
        let times: Vec<f64> = h.iter().map(ShotResult::extraction_time_s).collect();
        assert_eq!(times, vec![33.0, 27.0, 20.0]);

        let ids: Vec<u64> = h.iter().map(ShotResult::id).collect();
        assert!(ids[0] > ids[1] && ids[1] > ids[2]);
    }

    #[test]
    fn purge_empties_regardless_of_length() {
        let mut h = History::new();
        assert_eq!(h.purge(), 0);
        let cfg = ShotConfiguration::default();
        for t in [10.0, 26.0, 40.0, 28.5] {
            h.record(evaluate(&cfg, t, 36.0, Local::now()));
        }
        assert_eq!(h.purge(), 4);
        assert!(h.is_empty());
        assert!(h.latest().is_none());
    }
}
