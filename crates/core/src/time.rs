use chrono::{DateTime, Duration, Utc};

//
// ─── CLOCK ─────────────────────────────────────────────────────────────────────
//

/// Time source for sessions; tests pin and advance it by hand.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that follows wall-clock time.
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    /// Returns a clock pinned at the given instant.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Moves a pinned clock forward. No effect on `Clock::System`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` pinned at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

/// Whole seconds between two instants, floored and clamped at zero.
#[must_use]
pub fn whole_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    u64::try_from(to.signed_duration_since(from).num_seconds()).unwrap_or(0)
}

//
// ─── ACTIVE TIMER ──────────────────────────────────────────────────────────────
//

/// Measures foreground time spent on one question.
///
/// Time only accrues while the page is visible. Every question boundary
/// (submit, skip, next, previous) calls [`ActiveTimer::lap`], which reports
/// the active time for the question just left and restarts the measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveTimer {
    accumulated: Duration,
    active_since: DateTime<Utc>,
    is_active: bool,
}

impl ActiveTimer {
    /// Starts measuring at `now` with the page visible.
    #[must_use]
    pub fn start(now: DateTime<Utc>) -> Self {
        Self {
            accumulated: Duration::zero(),
            active_since: now,
            is_active: true,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// The page went to the background: bank the running interval.
    pub fn hide(&mut self, now: DateTime<Utc>) {
        if !self.is_active {
            return;
        }
        self.accumulated += non_negative(now - self.active_since);
        self.is_active = false;
    }

    /// The page is visible again: start a fresh running interval.
    pub fn show(&mut self, now: DateTime<Utc>) {
        self.active_since = now;
        self.is_active = true;
    }

    /// Active time since the last boundary, without resetting.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        let running = if self.is_active {
            non_negative(now - self.active_since)
        } else {
            Duration::zero()
        };
        self.accumulated + running
    }

    /// Closes the current question: returns its active seconds (floored) and
    /// restarts accounting for the next one.
    pub fn lap(&mut self, now: DateTime<Utc>) -> u32 {
        let seconds = self.elapsed(now).num_seconds();
        self.accumulated = Duration::zero();
        self.active_since = now;
        u32::try_from(seconds).unwrap_or(u32::MAX)
    }
}

fn non_negative(delta: Duration) -> Duration {
    if delta < Duration::zero() {
        Duration::zero()
    } else {
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let mut clock = fixed_clock();
        clock.advance(Duration::seconds(90));
        assert_eq!(clock.now(), fixed_now() + Duration::seconds(90));
        assert!(clock.is_fixed());
    }

    #[test]
    fn system_clock_ignores_advance() {
        let mut clock = Clock::system();
        clock.advance(Duration::days(365));
        assert!(clock.now() < fixed_now() + Duration::days(3650));
    }

    #[test]
    fn hidden_intervals_are_excluded() {
        let t0 = fixed_now();
        let mut timer = ActiveTimer::start(t0);
        // 12s visible, 40s hidden, 7s visible
        timer.hide(t0 + Duration::seconds(12));
        timer.show(t0 + Duration::seconds(52));
        assert_eq!(timer.lap(t0 + Duration::seconds(59)), 19);
    }

    #[test]
    fn lap_resets_for_next_question() {
        let t0 = fixed_now();
        let mut timer = ActiveTimer::start(t0);
        assert_eq!(timer.lap(t0 + Duration::seconds(30)), 30);
        assert_eq!(timer.lap(t0 + Duration::seconds(35)), 5);
    }

    #[test]
    fn lap_while_hidden_only_counts_banked_time() {
        let t0 = fixed_now();
        let mut timer = ActiveTimer::start(t0);
        timer.hide(t0 + Duration::seconds(8));
        assert_eq!(timer.lap(t0 + Duration::seconds(100)), 8);
        assert!(!timer.is_active());
        // still hidden: nothing accrues until shown
        timer.show(t0 + Duration::seconds(130));
        assert_eq!(timer.lap(t0 + Duration::seconds(133)), 3);
    }

    #[test]
    fn repeated_hide_does_not_double_count() {
        let t0 = fixed_now();
        let mut timer = ActiveTimer::start(t0);
        timer.hide(t0 + Duration::seconds(10));
        timer.hide(t0 + Duration::seconds(20));
        assert_eq!(timer.elapsed(t0 + Duration::seconds(30)), Duration::seconds(10));
    }

    #[test]
    fn sub_second_time_is_floored() {
        let t0 = fixed_now();
        let mut timer = ActiveTimer::start(t0);
        assert_eq!(timer.lap(t0 + Duration::milliseconds(1_999)), 1);
    }

    #[test]
    fn backwards_clock_never_goes_negative() {
        let t0 = fixed_now();
        let mut timer = ActiveTimer::start(t0);
        assert_eq!(timer.lap(t0 - Duration::seconds(5)), 0);
        assert_eq!(whole_seconds(t0, t0 - Duration::seconds(5)), 0);
    }
}
