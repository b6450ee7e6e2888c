use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown is stopped, nothing changed.
    Idle,
    /// One second passed, carries the new remaining time.
    Ticked(u32),
    /// Time ran out. Reported once, the countdown stops itself.
    Expired,
}

/// Countdown in whole seconds, advanced by the host once per [`crate::TICK_MS`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    limit: u32,
    remaining: u32,
    running: bool,
}

impl Countdown {
    pub const fn new(limit: u32) -> Self {
        Self {
            limit,
            remaining: limit,
            running: false,
        }
    }

    pub const fn limit(&self) -> u32 {
        self.limit
    }

    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Resets to the full limit and starts ticking.
    pub fn start(&mut self) {
        self.remaining = self.limit;
        self.run();
    }

    /// Starts ticking from the current remaining time.
    pub fn run(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.remaining = self.limit;
        self.running = false;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        if self.remaining == 0 {
            self.running = false;
            TickOutcome::Expired
        } else {
            self.remaining -= 1;
            TickOutcome::Ticked(self.remaining)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_then_expires_once() {
        let mut timer = Countdown::new(3);
        timer.start();

        assert_eq!(timer.tick(), TickOutcome::Ticked(2));
        assert_eq!(timer.tick(), TickOutcome::Ticked(1));
        assert_eq!(timer.tick(), TickOutcome::Ticked(0));
        assert_eq!(timer.tick(), TickOutcome::Expired);
        assert!(!timer.is_running());
        assert_eq!(timer.tick(), TickOutcome::Idle);
    }

    #[test]
    fn stopped_timer_does_not_tick() {
        let mut timer = Countdown::new(5);

        assert_eq!(timer.tick(), TickOutcome::Idle);
        assert_eq!(timer.remaining(), 5);
    }

    #[test]
    fn stop_preserves_and_run_resumes() {
        let mut timer = Countdown::new(10);
        timer.start();
        timer.tick();
        timer.tick();

        timer.stop();
        assert_eq!(timer.tick(), TickOutcome::Idle);
        assert_eq!(timer.remaining(), 8);

        timer.run();
        assert_eq!(timer.tick(), TickOutcome::Ticked(7));
    }

    #[test]
    fn stop_when_stopped_is_a_no_op() {
        let mut timer = Countdown::new(4);
        timer.stop();

        assert_eq!(timer, Countdown::new(4));
    }

    #[test]
    fn start_resets_remaining_time() {
        let mut timer = Countdown::new(3);
        timer.start();
        timer.tick();
        timer.tick();

        timer.start();
        assert_eq!(timer.remaining(), 3);
        assert!(timer.is_running());
    }

    #[test]
    fn reset_restores_limit_and_halts() {
        let mut timer = Countdown::new(3);
        timer.start();
        timer.tick();

        timer.reset();
        assert_eq!(timer.remaining(), 3);
        assert!(!timer.is_running());
    }

    #[test]
    fn zero_limit_expires_on_first_tick() {
        let mut timer = Countdown::new(0);
        timer.start();

        assert_eq!(timer.tick(), TickOutcome::Expired);
    }
}
