use std::collections::VecDeque;

/// 60 samples at one poll every 30 seconds covers the last 30 minutes.
const WINDOW_CAPACITY: usize = 60;

/// Rolling buffer of the most recent prices, oldest first. Strict FIFO: the
/// window always holds exactly the last `WINDOW_CAPACITY` recorded samples,
/// however many have been recorded in total.
#[derive(Debug, Clone, Default)]
pub struct PriceHistory {
    samples: VecDeque<f64>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(WINDOW_CAPACITY),
        }
    }

    pub fn record(&mut self, price: f64) {
        self.samples.push_back(price);
        while self.samples.len() > WINDOW_CAPACITY {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == WINDOW_CAPACITY
    }

    /// Signed percentage change from the oldest to the newest sample.
    /// `None` until the window is full, or when the oldest sample is not a
    /// usable baseline (division undefined for a non-positive old price).
    pub fn percentage_change(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }

        let old = *self.samples.front()?;
        let new = *self.samples.back()?;
        if old <= 0.0 {
            return None;
        }

        Some((new - old) / old * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_never_exceeds_capacity() {
        let mut history = PriceHistory::new();
        for i in 0..100 {
            history.record(i as f64);
            assert!(history.len() <= 60);
        }
        assert_eq!(history.len(), 60);
    }

    #[test]
    fn window_holds_the_last_sixty_in_order() {
        let mut history = PriceHistory::new();
        for i in 0..100 {
            history.record(i as f64);
        }
        let held: Vec<f64> = history.samples.iter().copied().collect();
        let expected: Vec<f64> = (40..100).map(|i| i as f64).collect();
        assert_eq!(held, expected);
    }

    #[test]
    fn change_requires_a_full_window() {
        let mut history = PriceHistory::new();
        for _ in 0..59 {
            history.record(1.0);
            assert_eq!(history.percentage_change(), None);
        }
        history.record(1.0);
        assert!(history.is_full());
        assert_eq!(history.percentage_change(), Some(0.0));
    }

    #[test]
    fn change_is_none_for_non_positive_baseline() {
        let mut history = PriceHistory::new();
        history.record(0.0);
        for _ in 0..59 {
            history.record(1.0);
        }
        assert!(history.is_full());
        assert_eq!(history.percentage_change(), None);
    }

    #[test]
    fn fifteen_percent_rise() {
        let mut history = PriceHistory::new();
        for _ in 0..59 {
            history.record(100.0);
        }
        history.record(115.0);
        let change = history.percentage_change().unwrap();
        assert!((change - 15.0).abs() < 1e-9);
    }

    #[test]
    fn change_can_be_negative() {
        let mut history = PriceHistory::new();
        for _ in 0..59 {
            history.record(100.0);
        }
        history.record(80.0);
        let change = history.percentage_change().unwrap();
        assert!((change + 20.0).abs() < 1e-9);
    }
}
