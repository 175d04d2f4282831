use common::Clock;
use std::time::{Duration, Instant};

/// Deadline-based clock for a polling event loop. The loop asks how long it
/// may sleep with [`IntervalTimer::time_until_due`] and fires a step whenever
/// [`IntervalTimer::poll`] returns true.
#[derive(Debug, Default)]
pub struct IntervalTimer {
    interval: Option<Duration>,
    next_due: Option<Instant>,
}

impl IntervalTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_at(&mut self, interval: Duration, now: Instant) {
        self.interval = Some(interval);
        self.next_due = Some(now + interval);
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Returns true once per elapsed interval. Missed ticks are skipped
    /// rather than replayed in a burst.
    pub fn poll(&mut self, now: Instant) -> bool {
        let (Some(due), Some(interval)) = (self.next_due, self.interval) else {
            return false;
        };
        if now < due {
            return false;
        }

        let next = due + interval;
        self.next_due = Some(if next <= now { now + interval } else { next });
        true
    }
}

impl Clock for IntervalTimer {
    fn start(&mut self, interval: Duration) {
        self.start_at(interval, Instant::now());
    }

    fn reschedule(&mut self, interval: Duration) {
        self.start_at(interval, Instant::now());
    }

    fn stop(&mut self) {
        self.next_due = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(150);

    #[test]
    fn fires_once_per_interval() {
        let t0 = Instant::now();
        let mut timer = IntervalTimer::new();
        timer.start_at(TICK, t0);

        assert!(!timer.poll(t0));
        assert!(!timer.poll(t0 + Duration::from_millis(149)));
        assert!(timer.poll(t0 + TICK));
        assert!(!timer.poll(t0 + TICK));
        assert_eq!(timer.next_due(), Some(t0 + TICK * 2));
    }

    #[test]
    fn late_polls_skip_missed_ticks() {
        let t0 = Instant::now();
        let mut timer = IntervalTimer::new();
        timer.start_at(TICK, t0);

        let late = t0 + Duration::from_millis(1000);
        assert!(timer.poll(late));
        assert!(!timer.poll(late));
        assert_eq!(timer.next_due(), Some(late + TICK));
    }

    #[test]
    fn reports_remaining_time() {
        let t0 = Instant::now();
        let mut timer = IntervalTimer::new();
        assert_eq!(timer.time_until_due(t0), None);

        timer.start_at(TICK, t0);
        assert_eq!(timer.time_until_due(t0 + Duration::from_millis(100)), Some(Duration::from_millis(50)));
        assert_eq!(timer.time_until_due(t0 + Duration::from_millis(400)), Some(Duration::ZERO));
    }

    #[test]
    fn stop_disarms() {
        let t0 = Instant::now();
        let mut timer = IntervalTimer::new();
        timer.start_at(TICK, t0);
        timer.stop();

        assert!(!timer.is_running());
        assert!(!timer.poll(t0 + TICK * 3));
    }

    #[test]
    fn reschedule_uses_new_interval() {
        let mut timer = IntervalTimer::new();
        timer.start(TICK);
        timer.reschedule(Duration::from_millis(140));

        assert!(timer.is_running());
        assert_eq!(timer.interval(), Some(Duration::from_millis(140)));
    }
}
