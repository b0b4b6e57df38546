//! The capability contract every battle participant satisfies, plus
//! [`Fighter`], a ready-made implementation.
//!
//! Combatants are never removed from an encounter when they die; a coordinator
//! asks [`Combatant::is_dead`] instead. Point budgets are unsigned and burning
//! saturates at zero.

use crate::cards::DamageType;
use crate::deck::Deck;
use crate::engine::Hand;
use bitflags::bitflags;
use std::collections::HashMap;
use std::fmt;

/// Identity of a combatant within one encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CombatantId(pub u32);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

bitflags! {
    /// Combatant categories, used to filter pointer picks.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Category: u8 {
        const PLAYER = 1 << 0;
        const ENEMY  = 1 << 1;
    }
}

/// What a combat coordinator needs from any participant to drive its turns.
pub trait Combatant {
    /// Reset point budgets to their maxima, apply over-time effects and tick
    /// status durations. Called by the coordinator once per turn start.
    fn begin_turn(&mut self);
    /// Apply resistances for `kind`, then reduce health.
    fn take_damage(&mut self, kind: DamageType, amount: f32);
    fn is_dead(&self) -> bool;
    /// Remaining action points this turn.
    fn action_points(&self) -> u32;
    /// Remaining movement points this turn.
    fn movement_points(&self) -> u32;
    fn deck(&self) -> &Deck;
    fn deck_mut(&mut self) -> &mut Deck;
    /// Reduce action points, stopping at zero.
    ///
    /// Only the coordinator burns points, after a play resolves.
    fn burn_action_points(&mut self, burn: u32);
    /// Reduce movement points, stopping at zero.
    fn burn_movement_points(&mut self, burn: u32);
}

/// Card movement hooks between a combatant's deck and its hand.
///
/// Discarding and returning cards have no behaviour yet; implementors may
/// override them.
pub trait CardHandler {
    fn draw_cards(&mut self, n: usize, hand: &mut dyn Hand);

    fn discard_cards(&mut self, _n: usize, _hand: &mut dyn Hand) {}

    fn return_cards(&mut self, _n: usize, _hand: &mut dyn Hand) {}
}

/// A damage-over-time effect applied at the start of each of the bearer's turns.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub struct StatusEffect {
    pub damage_type: DamageType,
    pub amount_per_turn: f32,
    pub turns_remaining: u32,
}

impl StatusEffect {
    pub fn damage_over_time(damage_type: DamageType, amount_per_turn: f32, turns: u32) -> Self {
        Self { damage_type, amount_per_turn, turns_remaining: turns }
    }
}

/// A plain combatant with health, point budgets and per-type resistances.
///
/// ```
/// use card_combat::combatant::{Combatant, Fighter};
/// use card_combat::deck::Deck;
///
/// let mut f = Fighter::new("Hero", 30.0, 2, 1, Deck::with_seed(Vec::new(), 0));
/// f.begin_turn();
/// f.burn_action_points(5);
/// assert_eq!(f.action_points(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Fighter {
    name: String,
    health: f32,
    max_health: f32,
    max_action_points: u32,
    max_movement_points: u32,
    action_points: u32,
    movement_points: u32,
    resistances: HashMap<DamageType, f32>,
    effects: Vec<StatusEffect>,
    deck: Deck,
}

impl Fighter {
    /// Create a fighter at full health. Points start at zero until the first
    /// [`Combatant::begin_turn`].
    pub fn new(
        name: impl Into<String>,
        max_health: f32,
        max_action_points: u32,
        max_movement_points: u32,
        deck: Deck,
    ) -> Self {
        let max_health = max_health.max(0.0);
        Self {
            name: name.into(),
            health: max_health,
            max_health,
            max_action_points,
            max_movement_points,
            action_points: 0,
            movement_points: 0,
            resistances: HashMap::new(),
            effects: Vec::new(),
            deck,
        }
    }

    /// Set the damage multiplier for `kind` (0.5 halves, 2.0 doubles).
    pub fn with_resistance(mut self, kind: DamageType, multiplier: f32) -> Self {
        self.resistances.insert(kind, multiplier.max(0.0));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn max_action_points(&self) -> u32 {
        self.max_action_points
    }

    pub fn max_movement_points(&self) -> u32 {
        self.max_movement_points
    }

    pub fn effects(&self) -> &[StatusEffect] {
        &self.effects
    }

    pub fn add_effect(&mut self, effect: StatusEffect) {
        if effect.turns_remaining > 0 {
            self.effects.push(effect);
        }
    }

    /// Damage multiplier for `kind`; 1.0 when unset.
    pub fn multiplier(&self, kind: DamageType) -> f32 {
        self.resistances.get(&kind).copied().unwrap_or(1.0)
    }
}

impl Combatant for Fighter {
    fn begin_turn(&mut self) {
        self.action_points = self.max_action_points;
        self.movement_points = self.max_movement_points;

        let ticking = std::mem::take(&mut self.effects);
        for mut effect in ticking {
            self.take_damage(effect.damage_type, effect.amount_per_turn);
            effect.turns_remaining -= 1;
            if effect.turns_remaining > 0 {
                self.effects.push(effect);
            }
        }
    }

    fn take_damage(&mut self, kind: DamageType, amount: f32) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        let dealt = amount * self.multiplier(kind);
        self.health = (self.health - dealt).max(0.0);
        if self.health <= 0.0 {
            tracing::debug!(name = %self.name, "fighter died");
        }
    }

    fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    fn action_points(&self) -> u32 {
        self.action_points
    }

    fn movement_points(&self) -> u32 {
        self.movement_points
    }

    fn deck(&self) -> &Deck {
        &self.deck
    }

    fn deck_mut(&mut self) -> &mut Deck {
        &mut self.deck
    }

    fn burn_action_points(&mut self, burn: u32) {
        self.action_points = self.action_points.saturating_sub(burn);
    }

    fn burn_movement_points(&mut self, burn: u32) {
        self.movement_points = self.movement_points.saturating_sub(burn);
    }
}
