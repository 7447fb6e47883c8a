use std::time::Duration;

/// How long the gate stays closed after letting an event through.
pub const CLICK_COOLDOWN: Duration = Duration::from_millis(1000);

/// Single-window debounce gate around word selection events.
///
/// The gate only guards event dispatch. Callers keep updating visuals while
/// it is closed. Whoever locks the gate is responsible for calling
/// [`ClickGate::unlock`] once [`CLICK_COOLDOWN`] has elapsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClickGate {
    locked: bool,
}

impl ClickGate {
    /// Creates an open gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether events are currently being dropped.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Runs `handler` and closes the gate if it is open. Returns `None` without
    /// running `handler` while closed.
    pub fn try_fire<R>(&mut self, handler: impl FnOnce() -> R) -> Option<R> {
        if self.locked {
            return None;
        }
        let result = handler();
        self.locked = true;
        Some(result)
    }

    /// Reopens the gate.
    pub fn unlock(&mut self) {
        self.locked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_starts_open() {
        assert!(!ClickGate::new().is_locked());
    }

    #[test]
    fn test_second_fire_is_dropped_until_unlock() {
        let mut gate = ClickGate::new();
        let mut calls = 0;

        assert_eq!(gate.try_fire(|| calls += 1), Some(()));
        assert!(gate.is_locked());
        assert_eq!(gate.try_fire(|| calls += 1), None);
        assert_eq!(calls, 1);

        gate.unlock();
        assert_eq!(gate.try_fire(|| calls += 1), Some(()));
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_handler_result_is_returned() {
        let mut gate = ClickGate::new();
        assert_eq!(gate.try_fire(|| "cat"), Some("cat"));
        assert_eq!(gate.try_fire(|| "sat"), None);
    }

    #[test]
    fn test_cooldown_is_one_second() {
        assert_eq!(CLICK_COOLDOWN, Duration::from_millis(1000));
    }
}
