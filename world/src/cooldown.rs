//! Two-state cooldown machine shared by attack and stun capabilities.

use std::time::Duration;

/// Observable state of a cooldown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CooldownState {
    /// Timer is zero and the capability flag is clear.
    Idle,
    /// The capability fired and the timer is running.
    CoolingDown,
}

/// Elapsed/threshold pair owned by a single entity capability.
///
/// The capability flag itself lives on the entity; [`Cooldown::advance`]
/// receives it so the timer can clear it when the threshold is crossed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cooldown {
    elapsed: Duration,
    threshold: Duration,
}

impl Cooldown {
    /// Creates an idle cooldown with the provided threshold.
    #[must_use]
    pub const fn new(threshold: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            threshold,
        }
    }

    /// Time accumulated since the capability fired.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Duration the timer must exceed before the capability is available again.
    #[must_use]
    pub const fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Reports whether the timer sits at zero.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.elapsed.is_zero()
    }

    /// State of the machine given the current capability flag.
    #[must_use]
    pub fn state(&self, flag: bool) -> CooldownState {
        if flag || !self.elapsed.is_zero() {
            CooldownState::CoolingDown
        } else {
            CooldownState::Idle
        }
    }

    /// Advances the timer by one tick.
    ///
    /// While the flag is set or the timer is running, `dt` accumulates; once
    /// the timer exceeds the threshold it resets to zero and clears the flag.
    pub fn advance(&mut self, flag: &mut bool, dt: Duration) {
        if *flag || !self.elapsed.is_zero() {
            self.elapsed = self.elapsed.saturating_add(dt);
            if self.elapsed > self.threshold {
                self.elapsed = Duration::ZERO;
                *flag = false;
            }
        } else {
            self.elapsed = Duration::ZERO;
            *flag = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: Duration = Duration::from_millis(600);

    #[test]
    fn idle_cooldown_stays_idle() {
        let mut cooldown = Cooldown::new(THRESHOLD);
        let mut flag = false;
        cooldown.advance(&mut flag, Duration::from_millis(250));
        assert!(cooldown.is_ready());
        assert!(!flag);
        assert_eq!(cooldown.state(flag), CooldownState::Idle);
    }

    #[test]
    fn flag_starts_the_timer() {
        let mut cooldown = Cooldown::new(THRESHOLD);
        let mut flag = true;
        assert_eq!(cooldown.state(flag), CooldownState::CoolingDown);
        cooldown.advance(&mut flag, Duration::from_millis(100));
        assert_eq!(cooldown.elapsed(), Duration::from_millis(100));
        assert!(flag);
    }

    #[test]
    fn timer_keeps_running_after_flag_clears() {
        let mut cooldown = Cooldown::new(THRESHOLD);
        let mut flag = true;
        cooldown.advance(&mut flag, Duration::from_millis(100));
        flag = false;
        cooldown.advance(&mut flag, Duration::from_millis(100));
        assert_eq!(cooldown.elapsed(), Duration::from_millis(200));
        assert_eq!(cooldown.state(flag), CooldownState::CoolingDown);
    }

    #[test]
    fn reaching_the_threshold_exactly_is_not_enough() {
        let mut cooldown = Cooldown::new(THRESHOLD);
        let mut flag = true;
        cooldown.advance(&mut flag, Duration::from_millis(300));
        cooldown.advance(&mut flag, Duration::from_millis(300));
        assert_eq!(cooldown.elapsed(), THRESHOLD);
        assert!(flag);
    }

    #[test]
    fn crossing_the_threshold_resets_exactly_once() {
        let mut cooldown = Cooldown::new(THRESHOLD);
        let mut flag = true;
        cooldown.advance(&mut flag, Duration::from_millis(300));
        cooldown.advance(&mut flag, Duration::from_millis(300));
        cooldown.advance(&mut flag, Duration::from_millis(1));

        assert_eq!(cooldown.elapsed(), Duration::ZERO);
        assert!(!flag);
        assert_eq!(cooldown.state(flag), CooldownState::Idle);

        cooldown.advance(&mut flag, Duration::from_millis(300));
        assert_eq!(cooldown.elapsed(), Duration::ZERO);
        assert!(!flag);
    }
}
