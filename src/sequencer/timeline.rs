use std::time::Duration;

/// Deadline-ordered pending transitions. Entries with the same deadline fire
/// in the order they were scheduled.
#[derive(Debug, Clone)]
pub struct Timeline<T> {
    entries: Vec<(Duration, T)>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: PartialEq> Timeline<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at: Duration, timer: T) {
        let index = self.entries.partition_point(|(deadline, _)| *deadline <= at);
        self.entries.insert(index, (at, timer));
    }

    pub fn cancel(&mut self, timer: &T) {
        self.entries.retain(|(_, pending)| pending != timer);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.first().map(|(deadline, _)| *deadline)
    }

    /// Remove and return every timer due at or before `now` with its
    /// deadline, earliest first.
    pub fn drain_due(&mut self, now: Duration) -> Vec<(Duration, T)> {
        let due = self.entries.partition_point(|(deadline, _)| *deadline <= now);
        self.entries.drain(..due).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn drains_in_deadline_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(300), "c");
        timeline.schedule(ms(100), "a");
        timeline.schedule(ms(200), "b");
        assert_eq!(timeline.drain_due(ms(250)), vec![(ms(100), "a"), (ms(200), "b")]);
        assert_eq!(timeline.next_deadline(), Some(ms(300)));
        assert!(timeline.drain_due(ms(299)).is_empty());
        assert_eq!(timeline.drain_due(ms(300)), vec![(ms(300), "c")]);
        assert!(timeline.is_empty());
    }

    #[test]
    fn ties_keep_schedule_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(100), 1);
        timeline.schedule(ms(100), 2);
        assert_eq!(timeline.drain_due(ms(100)), vec![(ms(100), 1), (ms(100), 2)]);
    }

    #[test]
    fn cancel_removes_only_matching() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(100), "keep");
        timeline.schedule(ms(100), "drop");
        timeline.cancel(&"drop");
        assert_eq!(timeline.drain_due(ms(100)), vec![(ms(100), "keep")]);
    }
}
