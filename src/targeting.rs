//! Target-requirement completion and the accumulated target selection.

use crate::cards::TargetRequirement;
use crate::combatant::CombatantId;

/// Whether `picked` targets satisfy `requirement` with `remaining` live enemies.
///
/// `UpToFour` completes on the first input just like `All`; there is no
/// upper-bound check.
///
/// ```
/// use card_combat::cards::TargetRequirement;
/// use card_combat::targeting::is_complete;
///
/// assert!(!is_complete(TargetRequirement::TwoOrAll, 1, 3));
/// assert!(is_complete(TargetRequirement::TwoOrAll, 2, 3));
/// assert!(is_complete(TargetRequirement::TwoOrAll, 1, 1));
/// ```
pub fn is_complete(requirement: TargetRequirement, picked: usize, remaining: usize) -> bool {
    match requirement {
        TargetRequirement::SelfOnly => true,
        TargetRequirement::Single => picked == 1,
        TargetRequirement::TwoOrAll => picked == 2 || picked >= remaining,
        TargetRequirement::ThreeOrAll => picked == 3 || picked >= remaining,
        TargetRequirement::UpToFour | TargetRequirement::All => true,
    }
}

/// Ordered targets gathered while a card is pending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSelection {
    targets: Vec<CombatantId>,
}

impl TargetSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn contains(&self, id: CombatantId) -> bool {
        self.targets.contains(&id)
    }

    pub fn as_slice(&self) -> &[CombatantId] {
        &self.targets
    }

    /// Append `id`. With `allow_duplicates` unset, an id already present is
    /// refused and `false` returned.
    pub fn push(&mut self, id: CombatantId, allow_duplicates: bool) -> bool {
        if !allow_duplicates && self.contains(id) {
            return false;
        }
        self.targets.push(id);
        true
    }

    pub fn into_vec(self) -> Vec<CombatantId> {
        self.targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_needs_exactly_one() {
        assert!(!is_complete(TargetRequirement::Single, 0, 3));
        assert!(is_complete(TargetRequirement::Single, 1, 3));
        assert!(!is_complete(TargetRequirement::Single, 2, 3));
    }

    #[test]
    fn three_or_all_falls_back_to_remaining() {
        assert!(!is_complete(TargetRequirement::ThreeOrAll, 2, 5));
        assert!(is_complete(TargetRequirement::ThreeOrAll, 3, 5));
        assert!(is_complete(TargetRequirement::ThreeOrAll, 2, 2));
    }

    #[test]
    fn self_up_to_four_and_all_always_complete() {
        for r in [TargetRequirement::SelfOnly, TargetRequirement::UpToFour, TargetRequirement::All] {
            assert!(is_complete(r, 0, 4));
            assert!(is_complete(r, 1, 4));
        }
    }

    #[test]
    fn selection_keeps_order_and_refuses_duplicates() {
        let mut sel = TargetSelection::new();
        assert!(sel.push(CombatantId(2), false));
        assert!(sel.push(CombatantId(1), false));
        assert!(!sel.push(CombatantId(2), false));
        assert_eq!(sel.as_slice(), &[CombatantId(2), CombatantId(1)]);
        assert!(sel.push(CombatantId(2), true));
        assert_eq!(sel.len(), 3);
    }
}
