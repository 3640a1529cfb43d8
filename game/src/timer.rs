use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Running,
    Paused,
    Expired,
}

/// Wall-clock session timer with pause accounting.
///
/// Every method takes `now` explicitly so callers control the clock and tests
/// never sleep. Elapsed time excludes paused spans and is frozen while paused.
/// `Expired` is terminal until the session is replaced.
#[derive(Debug, Clone, Copy)]
pub struct SessionTimer {
    started_at: Instant,
    paused_at: Option<Instant>,
    pause_offset: Duration,
    state: TimerState,
}

impl SessionTimer {
    pub fn start(now: Instant) -> Self {
        Self {
            started_at: now,
            paused_at: None,
            pause_offset: Duration::ZERO,
            state: TimerState::Running,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == TimerState::Paused
    }

    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }

    /// Only valid while running; a no-op otherwise (returns false).
    pub fn pause(&mut self, now: Instant) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.paused_at = Some(now);
        self.state = TimerState::Paused;
        true
    }

    /// Only valid while paused; the paused span is added to the offset so it
    /// never counts as play time.
    pub fn resume(&mut self, now: Instant) -> bool {
        if self.state != TimerState::Paused {
            return false;
        }
        if let Some(paused_at) = self.paused_at.take() {
            self.pause_offset += now.saturating_duration_since(paused_at);
        }
        self.state = TimerState::Running;
        true
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        let reference = match (self.state, self.paused_at) {
            (TimerState::Paused, Some(paused_at)) => paused_at,
            _ => now,
        };
        reference
            .saturating_duration_since(self.started_at)
            .saturating_sub(self.pause_offset)
    }

    /// Whole seconds, matching what the HUD displays.
    pub fn elapsed_secs(&self, now: Instant) -> u64 {
        self.elapsed(now).as_secs()
    }

    pub fn remaining(&self, now: Instant, limit: Duration) -> Duration {
        limit.saturating_sub(self.elapsed(now))
    }

    /// Latches `Expired` and returns true the first time elapsed play time
    /// reaches `limit` while running. Later calls return false.
    pub fn check_expired(&mut self, now: Instant, limit: Duration) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        if self.elapsed(now) >= limit {
            self.state = TimerState::Expired;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn paused_spans_do_not_count_as_play_time() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::start(t0);

        assert!(timer.pause(t0 + secs(10)));
        assert!(timer.resume(t0 + secs(30)));

        // 40 wall seconds minus the 20 paused.
        assert_eq!(timer.elapsed(t0 + secs(40)), secs(20));
    }

    #[test]
    fn elapsed_is_frozen_while_paused() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::start(t0);
        timer.pause(t0 + secs(5));

        assert_eq!(timer.elapsed(t0 + secs(5)), secs(5));
        assert_eq!(timer.elapsed(t0 + secs(500)), secs(5));
    }

    #[test]
    fn pause_and_resume_reject_wrong_states() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::start(t0);

        assert!(!timer.resume(t0 + secs(1)));
        assert!(timer.pause(t0 + secs(1)));
        assert!(!timer.pause(t0 + secs(2)));
        assert!(timer.resume(t0 + secs(3)));
        assert!(!timer.resume(t0 + secs(4)));
    }

    #[test]
    fn expiry_fires_once_and_latches() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::start(t0);
        let limit = secs(45);

        assert!(!timer.check_expired(t0 + secs(44), limit));
        assert!(timer.check_expired(t0 + secs(45), limit));
        assert!(timer.is_expired());
        assert!(!timer.check_expired(t0 + secs(46), limit));
        assert!(!timer.pause(t0 + secs(46)));
    }

    #[test]
    fn paused_timer_cannot_expire() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::start(t0);
        timer.pause(t0 + secs(1));
        assert!(!timer.check_expired(t0 + secs(100), secs(45)));
        assert_eq!(timer.state(), TimerState::Paused);
    }

    #[test]
    fn remaining_saturates_at_zero() {
        let t0 = Instant::now();
        let timer = SessionTimer::start(t0);
        assert_eq!(timer.remaining(t0 + secs(50), secs(45)), Duration::ZERO);
        assert_eq!(timer.remaining(t0 + secs(40), secs(45)), secs(5));
    }
}
