//! Focus timer with work and break modes.
//!
//! The timer does not own a thread. The host calls [`PomodoroTimer::tick`]
//! once per second while the widget is mounted and stops calling it on
//! teardown.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    #[default]
    Work,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub fn duration_secs(self) -> u32 {
        match self {
            TimerMode::Work => 25 * 60,
            TimerMode::ShortBreak => 5 * 60,
            TimerMode::LongBreak => 15 * 60,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Work => "업무",
            TimerMode::ShortBreak => "짧은 휴식",
            TimerMode::LongBreak => "긴 휴식",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroTimer {
    mode: TimerMode,
    remaining_secs: u32,
    active: bool,
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new(TimerMode::Work)
    }
}

impl PomodoroTimer {
    pub fn new(mode: TimerMode) -> Self {
        Self {
            mode,
            remaining_secs: mode.duration_secs(),
            active: false,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Switching mode pauses and refills the timer.
    pub fn set_mode(&mut self, mode: TimerMode) {
        *self = Self::new(mode);
    }

    pub fn toggle(&mut self) {
        self.active = !self.active;
    }

    pub fn reset(&mut self) {
        self.active = false;
        self.remaining_secs = self.mode.duration_secs();
    }

    /// Advances one second. Returns `true` on the tick that finishes the
    /// session; the timer pauses itself at zero.
    pub fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }
        if self.remaining_secs == 0 {
            self.active = false;
            return false;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            self.active = false;
            return true;
        }
        false
    }

    /// Remaining share of the session in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        f64::from(self.remaining_secs) / f64::from(self.mode.duration_secs())
    }

    /// `mm:ss`
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_paused_and_full() {
        let timer = PomodoroTimer::default();
        assert!(!timer.is_active());
        assert_eq!(timer.display(), "25:00");
        assert_eq!(timer.progress(), 1.0);
    }

    #[test]
    fn test_tick_only_when_active() {
        let mut timer = PomodoroTimer::new(TimerMode::ShortBreak);
        assert!(!timer.tick());
        assert_eq!(timer.remaining_secs(), 300);

        timer.toggle();
        timer.tick();
        assert_eq!(timer.display(), "04:59");
    }

    #[test]
    fn test_finishes_and_pauses() {
        let mut timer = PomodoroTimer::new(TimerMode::ShortBreak);
        timer.toggle();
        let mut finished = 0;
        for _ in 0..400 {
            if timer.tick() {
                finished += 1;
            }
        }
        assert_eq!(finished, 1);
        assert_eq!(timer.remaining_secs(), 0);
        assert!(!timer.is_active());
        assert_eq!(timer.display(), "00:00");
    }

    #[test]
    fn test_mode_switch_resets() {
        let mut timer = PomodoroTimer::default();
        timer.toggle();
        timer.tick();
        timer.set_mode(TimerMode::LongBreak);
        assert!(!timer.is_active());
        assert_eq!(timer.display(), "15:00");
        assert_eq!(timer.mode().label(), "긴 휴식");
    }

    #[test]
    fn test_reset_keeps_mode() {
        let mut timer = PomodoroTimer::new(TimerMode::LongBreak);
        timer.toggle();
        timer.tick();
        timer.reset();
        assert_eq!(timer.mode(), TimerMode::LongBreak);
        assert_eq!(timer.remaining_secs(), 900);
        assert!(!timer.is_active());
    }
}
