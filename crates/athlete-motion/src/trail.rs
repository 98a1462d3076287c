//! Fixed-capacity motion trail.

use std::collections::VecDeque;

use athlete_core::JointMap;

/// Trail depth of the full-size reference animation
pub const REFERENCE_TRAIL: usize = 5;

/// Trail depth of the compact thumbnail stickman
pub const COMPACT_TRAIL: usize = 6;

/// FIFO of recent frames; pushing past capacity evicts the oldest
#[derive(Debug, Clone, PartialEq)]
pub struct TrailBuffer<T = JointMap> {
    capacity: usize,
    entries: VecDeque<T>,
}

impl<T> TrailBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity + 1),
        }
    }

    pub fn push(&mut self, entry: T) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.entries.iter()
    }

    pub fn newest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Everything except the newest entry, oldest first
    pub fn ghosts(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter().take(self.entries.len().saturating_sub(1))
    }

    /// Ghosts paired with an opacity rising from 0 toward `max_alpha`,
    /// normalized by the number of ghosts
    pub fn faded(&self, max_alpha: f64) -> impl Iterator<Item = (f64, &T)> + '_ {
        let count = self.entries.len().saturating_sub(1).max(1) as f64;
        self.ghosts()
            .enumerate()
            .map(move |(i, entry)| (i as f64 / count * max_alpha, entry))
    }

    /// Ghosts paired with an opacity normalized by the buffer capacity, so a
    /// partially filled trail stays faint
    pub fn faded_by_capacity(&self, max_alpha: f64) -> impl Iterator<Item = (f64, &T)> + '_ {
        let capacity = self.capacity.max(1) as f64;
        self.ghosts()
            .enumerate()
            .map(move |(i, entry)| (i as f64 / capacity * max_alpha, entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest_past_capacity() {
        let mut trail = TrailBuffer::new(5);
        for i in 0..6 {
            trail.push(i);
        }
        assert_eq!(trail.len(), 5);
        assert!(!trail.iter().any(|&v| v == 0));
        assert_eq!(trail.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(trail.newest(), Some(&5));
    }

    #[test]
    fn test_ghosts_exclude_newest() {
        let mut trail = TrailBuffer::new(3);
        assert_eq!(trail.ghosts().count(), 0);
        trail.push('a');
        assert_eq!(trail.ghosts().count(), 0);
        trail.push('b');
        trail.push('c');
        assert_eq!(trail.ghosts().copied().collect::<String>(), "ab");
    }

    #[test]
    fn test_faded_opacity_strictly_increases() {
        let mut trail = TrailBuffer::new(5);
        for i in 0..5 {
            trail.push(i);
        }
        let alphas: Vec<f64> = trail.faded(0.22).map(|(a, _)| a).collect();
        assert_eq!(alphas.len(), 4);
        assert!(alphas.windows(2).all(|w| w[0] < w[1]));
        assert!(alphas.iter().all(|&a| (0.0..0.22).contains(&a)));
    }

    #[test]
    fn test_faded_by_capacity() {
        let mut trail = TrailBuffer::new(6);
        for i in 0..3 {
            trail.push(i);
        }
        let alphas: Vec<f64> = trail.faded_by_capacity(0.3).map(|(a, _)| a).collect();
        assert_eq!(alphas.len(), 2);
        assert_eq!(alphas[0], 0.0);
        assert!((alphas[1] - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut trail = TrailBuffer::new(0);
        trail.push(1);
        assert!(trail.is_empty());
    }
}
