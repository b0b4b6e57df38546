// Collaborator boundary for the player controller. The controller only talks
// to these traits, so a terminal UI, a game engine or a test double can supply
// hand storage, pointer picking, visuals and combat resolution.

use crate::cards::{Card, CardData, CardId};
use crate::combatant::{Category, Combatant, CombatantId};
use crate::deck::Deck;
use std::fmt;

/// How an encounter concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EndState {
    Victory,
    Defeat,
    Fled,
}

impl fmt::Display for EndState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EndState::Victory => "victory",
            EndState::Defeat => "defeat",
            EndState::Fled => "retreat",
        };
        f.write_str(s)
    }
}

/// Proof that a combatant currently owns the turn. Issued by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnToken {
    pub owner: CombatantId,
    pub round: u32,
}

/// Cards the player holds and can highlight.
pub trait Hand {
    /// Replace whatever the hand holds with a fresh draw from `deck`.
    fn draw_opening_hand(&mut self, deck: &mut Deck);
    fn add_cards(&mut self, cards: Vec<CardData>);
    /// The highlighted card, if any.
    fn selected_card(&self) -> Option<&Card>;
    fn remove_card(&mut self, id: CardId) -> Option<Card>;
    /// Empty the hand, returning every card it held.
    fn take_cards(&mut self) -> Vec<Card>;
    /// Stop highlight changes while targets are chosen.
    fn freeze(&mut self);
    fn unfreeze(&mut self);
    fn is_frozen(&self) -> bool;
}

/// Resolves what is under the pointer.
pub trait PointerPick {
    /// The combatant under the pointer whose category intersects `mask`.
    fn pick(&self, mask: Category) -> Option<CombatantId>;
}

/// Visual side effects requested by the controller.
pub trait Presentation {
    fn set_target_indicator(&mut self, visible: bool);
    /// Lift the pending card above the rest of the hand.
    fn raise_card(&mut self, card: CardId);
    /// Reparent a card removed from the hand into the active-play area.
    fn move_to_play_area(&mut self, card: &Card);
    fn start_play_animation(&mut self, card: CardId);
    fn play_animation_finished(&self, card: CardId) -> bool;
    fn show_points(&mut self, action_points: u32, movement_points: u32);
    fn encounter_ended(&mut self, _result: EndState) {}
}

/// The authority that applies card effects and runs turn order.
pub trait CombatCoordinator {
    /// Resolve a play. The coordinator burns the card's costs from `player`.
    fn play_card(&mut self, player: &mut dyn Combatant, targets: &[CombatantId], card: &CardData);
    fn remaining_enemies(&self) -> usize;
    /// The holder of `token` is done with its turn.
    fn end_turn(&mut self, token: TurnToken);
}

/// Borrowed collaborators for one controller call.
pub struct TurnContext<'a> {
    pub hand: &'a mut dyn Hand,
    pub picker: &'a dyn PointerPick,
    pub presentation: &'a mut dyn Presentation,
    pub coordinator: &'a mut dyn CombatCoordinator,
}

impl<'a> TurnContext<'a> {
    pub fn new(
        hand: &'a mut dyn Hand,
        picker: &'a dyn PointerPick,
        presentation: &'a mut dyn Presentation,
        coordinator: &'a mut dyn CombatCoordinator,
    ) -> Self {
        Self { hand, picker, presentation, coordinator }
    }
}

impl fmt::Debug for TurnContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurnContext")
            .field("hand_frozen", &self.hand.is_frozen())
            .field("remaining_enemies", &self.coordinator.remaining_enemies())
            .finish()
    }
}
