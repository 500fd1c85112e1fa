//! Game-loop side of gesture input.
//!
//! The service exposes a level (clenched or not); the game wants one jump
//! per physical clench. `JumpTrigger` does the rising-edge detection, merges
//! in the keyboard fallback and enforces a minimum interval between jumps.

use std::time::{Duration, Instant};

/// Minimum time between two jumps.
pub const DEFAULT_JUMP_COOLDOWN: Duration = Duration::from_millis(300);

/// What caused a jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpCause {
    Gesture,
    Keyboard,
}

/// Rising-edge detector over polled clench and key levels.
#[derive(Debug, Clone)]
pub struct JumpTrigger {
    last_clenched: bool,
    last_key_down: bool,
    cooldown: Duration,
    last_jump: Option<Instant>,
}

impl Default for JumpTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl JumpTrigger {
    pub fn new() -> Self {
        Self::with_cooldown(DEFAULT_JUMP_COOLDOWN)
    }

    pub fn with_cooldown(cooldown: Duration) -> Self {
        Self {
            last_clenched: false,
            last_key_down: false,
            cooldown,
            last_jump: None,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Poll once per rendered frame. Fires only on a false to true transition
    /// and only once the cooldown since the previous jump has passed.
    pub fn poll(&mut self, clenched: bool, key_down: bool, now: Instant) -> Option<JumpCause> {
        let fist_edge = clenched && !self.last_clenched;
        let key_edge = key_down && !self.last_key_down;
        self.last_clenched = clenched;
        self.last_key_down = key_down;

        let cause = if fist_edge {
            JumpCause::Gesture
        } else if key_edge {
            JumpCause::Keyboard
        } else {
            return None;
        };

        // An edge swallowed by the cooldown is gone, not deferred
        if let Some(last) = self.last_jump {
            if now.saturating_duration_since(last) <= self.cooldown {
                return None;
            }
        }

        self.last_jump = Some(now);
        Some(cause)
    }

    /// Re-arm against the current levels, e.g. on a game restart, so a
    /// clench held across the restart does not fire immediately.
    pub fn rearm(&mut self, clenched: bool, key_down: bool) {
        self.last_clenched = clenched;
        self.last_key_down = key_down;
        self.last_jump = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(start: Instant, ms: u64) -> Instant {
        start + Duration::from_millis(ms)
    }

    #[test]
    fn test_one_jump_per_clench() {
        let start = Instant::now();
        let mut trigger = JumpTrigger::new();
        let levels = [false, true, true, true, false, true, false];
        let jumps: Vec<Option<JumpCause>> = levels
            .iter()
            .enumerate()
            .map(|(i, &l)| trigger.poll(l, false, at(start, i as u64 * 200)))
            .collect();

        assert_eq!(
            jumps,
            vec![
                None,
                Some(JumpCause::Gesture),
                None,
                None,
                None,
                Some(JumpCause::Gesture),
                None
            ]
        );
    }

    #[test]
    fn test_keyboard_fallback() {
        let start = Instant::now();
        let mut trigger = JumpTrigger::new();
        assert_eq!(trigger.poll(false, true, start), Some(JumpCause::Keyboard));
        assert_eq!(trigger.poll(false, true, at(start, 400)), None);
        assert_eq!(trigger.poll(false, false, at(start, 500)), None);
        // Both edges in the same frame still produce a single jump
        assert_eq!(
            trigger.poll(true, true, at(start, 800)),
            Some(JumpCause::Gesture)
        );
    }

    #[test]
    fn test_bounce_inside_cooldown_jumps_once() {
        let start = Instant::now();
        let mut trigger = JumpTrigger::new();
        assert_eq!(trigger.poll(true, false, start), Some(JumpCause::Gesture));
        assert_eq!(trigger.poll(false, false, at(start, 100)), None);
        assert_eq!(trigger.poll(true, false, at(start, 200)), None);

        // Held through the end of the cooldown: the swallowed edge never fires
        assert_eq!(trigger.poll(true, false, at(start, 400)), None);
        assert_eq!(trigger.poll(false, false, at(start, 450)), None);
        assert_eq!(
            trigger.poll(true, false, at(start, 500)),
            Some(JumpCause::Gesture)
        );
    }

    #[test]
    fn test_cooldown_boundary_is_exclusive() {
        let start = Instant::now();
        let mut trigger = JumpTrigger::new();
        assert!(trigger.poll(false, true, start).is_some());
        trigger.poll(false, false, at(start, 10));
        assert_eq!(trigger.poll(false, true, at(start, 300)), None);

        trigger.poll(false, false, at(start, 300));
        assert_eq!(
            trigger.poll(false, true, at(start, 301)),
            Some(JumpCause::Keyboard)
        );
    }

    #[test]
    fn test_zero_cooldown_fires_every_edge() {
        let start = Instant::now();
        let mut trigger = JumpTrigger::with_cooldown(Duration::ZERO);
        assert!(trigger.poll(true, false, start).is_some());
        trigger.poll(false, false, at(start, 1));
        assert!(trigger.poll(true, false, at(start, 2)).is_some());
    }

    #[test]
    fn test_rearm_suppresses_held_clench() {
        let start = Instant::now();
        let mut trigger = JumpTrigger::new();
        assert!(trigger.poll(true, false, start).is_some());

        trigger.rearm(true, false);
        assert_eq!(trigger.poll(true, false, at(start, 10)), None);
        assert_eq!(trigger.poll(false, false, at(start, 20)), None);
        // Cooldown cleared by the restart
        assert_eq!(
            trigger.poll(true, false, at(start, 30)),
            Some(JumpCause::Gesture)
        );
    }
}
