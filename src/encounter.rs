//! A self-contained combat coordinator: one player against a line of enemies.
//!
//! Turn order each round is the player, then every living enemy. Enemies take
//! no actions on their turns; their turn start still ticks status effects.

use crate::cards::{CardData, DamageType, TargetRequirement};
use crate::combatant::{Category, Combatant, CombatantId, Fighter, StatusEffect};
use crate::engine::{CombatCoordinator, EndState, TurnToken};

/// Turns a poison hit keeps ticking for.
const POISON_TURNS: u32 = 2;

/// An enemy and its identity.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct EnemySlot {
    pub id: CombatantId,
    pub fighter: Fighter,
}

/// Who currently acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Phase {
    /// No round started yet.
    Setup,
    /// The player holds the turn for `round`.
    Player { round: u32 },
    /// The player ended its turn; enemies act on the next advance.
    Enemies { round: u32 },
    Over(EndState),
}

#[derive(Debug, Clone)]
pub struct Encounter {
    player: CombatantId,
    enemies: Vec<EnemySlot>,
    phase: Phase,
    round: u32,
    log: Vec<String>,
}

impl Encounter {
    /// Enemies get ids following the player's, wrapping past `u32::MAX`.
    pub fn new(player: CombatantId, enemies: Vec<Fighter>) -> Self {
        let enemies = enemies
            .into_iter()
            .zip(1u32..)
            .map(|(fighter, offset)| EnemySlot { id: CombatantId(player.0.wrapping_add(offset)), fighter })
            .collect();
        Self { player, enemies, phase: Phase::Setup, round: 0, log: Vec::new() }
    }

    pub fn player(&self) -> CombatantId {
        self.player
    }

    pub fn enemies(&self) -> &[EnemySlot] {
        &self.enemies
    }

    pub fn enemy(&self, id: CombatantId) -> Option<&Fighter> {
        self.enemies.iter().find(|e| e.id == id).map(|e| &e.fighter)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn outcome(&self) -> Option<EndState> {
        match self.phase {
            Phase::Over(result) => Some(result),
            _ => None,
        }
    }

    /// Category of a combatant in this encounter, if it belongs here.
    pub fn category(&self, id: CombatantId) -> Option<Category> {
        if id == self.player {
            return Some(Category::PLAYER);
        }
        self.enemy(id).map(|_| Category::ENEMY)
    }

    /// Move play forward. Starts the first round, runs enemy turns once the
    /// player has ended its turn, and returns the player's token whenever a
    /// new player turn begins.
    pub fn advance(&mut self, player: &mut dyn Combatant) -> Option<TurnToken> {
        match self.phase {
            Phase::Setup => self.start_round(player),
            Phase::Enemies { .. } => {
                self.run_enemy_turns();
                if self.check_outcome(player).is_some() {
                    return None;
                }
                self.start_round(player)
            }
            Phase::Player { .. } | Phase::Over(_) => None,
        }
    }

    /// The player flees; the encounter ends at once.
    pub fn flee(&mut self) {
        if self.outcome().is_none() {
            self.finish(EndState::Fled);
        }
    }

    fn start_round(&mut self, player: &mut dyn Combatant) -> Option<TurnToken> {
        self.round += 1;
        player.begin_turn();
        if self.check_outcome(player).is_some() {
            return None;
        }
        self.phase = Phase::Player { round: self.round };
        self.log.push(format!("Round {}: your turn", self.round));
        tracing::debug!(round = self.round, "player turn");
        Some(TurnToken { owner: self.player, round: self.round })
    }

    fn run_enemy_turns(&mut self) {
        for slot in self.enemies.iter_mut().filter(|e| !e.fighter.is_dead()) {
            slot.fighter.begin_turn();
            if slot.fighter.is_dead() {
                self.log.push(format!("{} succumbs", slot.fighter.name()));
            }
        }
    }

    fn check_outcome(&mut self, player: &dyn Combatant) -> Option<EndState> {
        if let Some(result) = self.outcome() {
            return Some(result);
        }
        let result = if player.is_dead() {
            EndState::Defeat
        } else if self.remaining_enemies() == 0 {
            EndState::Victory
        } else {
            return None;
        };
        self.finish(result);
        Some(result)
    }

    fn finish(&mut self, result: EndState) {
        self.phase = Phase::Over(result);
        self.log.push(format!("Encounter over: {result}"));
        tracing::info!(%result, round = self.round, "encounter finished");
    }

    fn strike(&mut self, id: CombatantId, kind: DamageType, power: f32) {
        let Some(slot) = self.enemies.iter_mut().find(|e| e.id == id && !e.fighter.is_dead()) else {
            return;
        };
        slot.fighter.take_damage(kind, power);
        if kind == DamageType::Poison && power > 0.0 {
            slot.fighter.add_effect(StatusEffect::damage_over_time(kind, power / 2.0, POISON_TURNS));
        }
        let line = if slot.fighter.is_dead() {
            format!("{} falls", slot.fighter.name())
        } else {
            format!("{} takes {kind} damage ({:.0} hp left)", slot.fighter.name(), slot.fighter.health())
        };
        self.log.push(line);
    }
}

impl CombatCoordinator for Encounter {
    fn play_card(&mut self, player: &mut dyn Combatant, targets: &[CombatantId], card: &CardData) {
        if self.outcome().is_some() {
            return;
        }
        self.log.push(format!("You play {}", card.name));
        match card.target {
            TargetRequirement::SelfOnly => {}
            TargetRequirement::All => {
                let ids: Vec<CombatantId> = self.enemies.iter().map(|e| e.id).collect();
                for id in ids {
                    self.strike(id, card.damage_type, card.power);
                }
            }
            _ => {
                for &id in targets {
                    self.strike(id, card.damage_type, card.power);
                }
            }
        }
        player.burn_action_points(card.action_cost);
        player.burn_movement_points(card.movement_cost);
        self.check_outcome(player);
    }

    fn remaining_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| !e.fighter.is_dead()).count()
    }

    fn end_turn(&mut self, token: TurnToken) {
        match self.phase {
            Phase::Player { round } if token.owner == self.player && token.round == round => {
                self.phase = Phase::Enemies { round };
            }
            _ => tracing::warn!(?token, phase = ?self.phase, "stale end-turn ignored"),
        }
    }
}
