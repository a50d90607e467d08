use super::prefs::PreferenceState;

/// A rise of at least this much over the rolling window triggers the bell.
pub const ALERT_THRESHOLD_PCT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertDecision {
    pub triggered: bool,
}

/// Stateless threshold check, evaluated fresh on every full-window tick.
/// No de-duplication: the bell re-fires each tick the condition holds.
pub struct AlertPolicy;

impl AlertPolicy {
    pub fn evaluate(change_pct: f64, prefs: &PreferenceState) -> AlertDecision {
        let triggered =
            change_pct >= ALERT_THRESHOLD_PCT && prefs.sound_enabled && !prefs.do_not_disturb;
        AlertDecision { triggered }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        let prefs = PreferenceState::default();
        assert!(AlertPolicy::evaluate(10.0, &prefs).triggered);
        assert!(!AlertPolicy::evaluate(9.999, &prefs).triggered);
    }

    #[test]
    fn sound_disabled_never_triggers() {
        let prefs = PreferenceState {
            sound_enabled: false,
            ..Default::default()
        };
        assert!(!AlertPolicy::evaluate(10.0, &prefs).triggered);
        assert!(!AlertPolicy::evaluate(50.0, &prefs).triggered);
    }

    #[test]
    fn do_not_disturb_never_triggers() {
        let prefs = PreferenceState {
            do_not_disturb: true,
            ..Default::default()
        };
        assert!(!AlertPolicy::evaluate(10.0, &prefs).triggered);
    }

    #[test]
    fn drops_never_trigger() {
        let prefs = PreferenceState::default();
        assert!(!AlertPolicy::evaluate(-15.0, &prefs).triggered);
        assert!(!AlertPolicy::evaluate(0.0, &prefs).triggered);
    }
}
