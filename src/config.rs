//! Player controller configuration.
use std::env;
use std::time::Duration;

/// Tunables for [`crate::controller::PlayerController`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ControllerConfig {
    /// Delay between an end-turn confirmation and notifying the coordinator.
    pub end_turn_delay: Duration,
    /// Refuse picking a target that is already selected.
    pub reject_duplicate_targets: bool,
    /// Refuse new card selections while a committed play is still animating.
    pub gate_while_resolving: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            end_turn_delay: Duration::from_millis(1000),
            reject_duplicate_targets: true,
            gate_while_resolving: true,
        }
    }
}

impl ControllerConfig {
    /// Defaults overridden by environment variables:
    /// - `CARD_COMBAT_END_TURN_DELAY_MS`
    /// - `CARD_COMBAT_ALLOW_DUPLICATE_TARGETS` (`true`/`false`)
    /// - `CARD_COMBAT_GATE_WHILE_RESOLVING` (`true`/`false`)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("CARD_COMBAT_END_TURN_DELAY_MS") {
            config.end_turn_delay = Duration::from_millis(ms);
        }
        if let Some(allow) = read_env::<bool>("CARD_COMBAT_ALLOW_DUPLICATE_TARGETS") {
            config.reject_duplicate_targets = !allow;
        }
        if let Some(gate) = read_env::<bool>("CARD_COMBAT_GATE_WHILE_RESOLVING") {
            config.gate_while_resolving = gate;
        }

        config
    }

    pub fn with_end_turn_delay(mut self, delay: Duration) -> Self {
        self.end_turn_delay = delay;
        self
    }

    pub fn with_duplicate_targets(mut self, allow: bool) -> Self {
        self.reject_duplicate_targets = !allow;
        self
    }

    pub fn with_resolution_gate(mut self, gate: bool) -> Self {
        self.gate_while_resolving = gate;
        self
    }
}

/// Read and parse an environment variable, ignoring unset or malformed values.
pub(crate) fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}
