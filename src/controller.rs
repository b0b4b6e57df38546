//! Player turn controller.
//!
//! A small state machine that reads discrete inputs, checks them against the
//! player's point budget and the pending card's target requirement, and hands
//! finished plays to a [`CombatCoordinator`](crate::engine::CombatCoordinator).
//!
//! ```text
//! ChoosingCard --Select (affordable)--> ChoosingTargets
//! ChoosingTargets --Select (complete)--> ChoosingCard   (play committed)
//! ChoosingTargets --Deselect----------> ChoosingCard   (nothing played)
//! any --end_encounter--> EncounterOver                  (terminal)
//! ```
//!
//! Input is ignored unless the controller holds a [`TurnToken`].

use crate::cards::{Card, CardData, DamageType};
use crate::combatant::{CardHandler, Category, Combatant, CombatantId};
use crate::config::ControllerConfig;
use crate::deck::Deck;
use crate::engine::{EndState, Hand, TurnContext, TurnToken};
use crate::targeting::{is_complete, TargetSelection};
use std::time::Instant;

/// Discrete player inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    /// Confirm the highlighted card, or the entity under the pointer.
    Select,
    /// Abandon targeting.
    Deselect,
    /// Finish this turn.
    EndTurn,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerState {
    ChoosingCard,
    /// `pending` and `targets` exist only in this state.
    ChoosingTargets {
        pending: Card,
        targets: TargetSelection,
    },
    EncounterOver(EndState),
}

/// Why an input was ignored.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Rejection {
    #[error("the encounter is over")]
    EncounterOver,
    #[error("not this combatant's turn")]
    NotYourTurn,
    #[error("no card is highlighted")]
    NoCardSelected,
    #[error(
        "card costs {action_cost} AP / {movement_cost} MP, only {action_points} AP / {movement_points} MP left"
    )]
    Unaffordable { action_cost: u32, movement_cost: u32, action_points: u32, movement_points: u32 },
    #[error("a previous play is still resolving")]
    Resolving,
    #[error("no target under the pointer")]
    NoTarget,
    #[error("{0} is already targeted")]
    DuplicateTarget(CombatantId),
    #[error("not choosing targets")]
    NothingToCancel,
}

/// A committed play waiting for its animation before it reaches the coordinator.
#[derive(Debug, Clone, PartialEq)]
struct InFlightPlay {
    card: Card,
    targets: Vec<CombatantId>,
}

#[derive(Debug, Clone, Copy)]
struct PendingEndTurn {
    token: TurnToken,
    due: Instant,
}

/// Whether `combatant` has the points to play `card`.
pub fn can_afford(combatant: &dyn Combatant, card: &CardData) -> bool {
    card.action_cost <= combatant.action_points() && card.movement_cost <= combatant.movement_points()
}

/// Drives one player-owned combatant through card and target selection.
#[derive(Debug)]
pub struct PlayerController<C> {
    id: CombatantId,
    combatant: C,
    config: ControllerConfig,
    state: ControllerState,
    turn: Option<TurnToken>,
    pending_end_turn: Option<PendingEndTurn>,
    in_flight: Vec<InFlightPlay>,
    last_rejection: Option<Rejection>,
}

impl<C: Combatant> PlayerController<C> {
    pub fn new(id: CombatantId, combatant: C, config: ControllerConfig) -> Self {
        Self {
            id,
            combatant,
            config,
            state: ControllerState::ChoosingCard,
            turn: None,
            pending_end_turn: None,
            in_flight: Vec::new(),
            last_rejection: None,
        }
    }

    pub fn id(&self) -> CombatantId {
        self.id
    }

    pub fn combatant(&self) -> &C {
        &self.combatant
    }

    pub fn combatant_mut(&mut self) -> &mut C {
        &mut self.combatant
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn is_turn(&self) -> bool {
        self.turn.is_some()
    }

    pub fn turn_token(&self) -> Option<TurnToken> {
        self.turn
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, ControllerState::EncounterOver(_))
    }

    pub fn pending_card(&self) -> Option<&Card> {
        match &self.state {
            ControllerState::ChoosingTargets { pending, .. } => Some(pending),
            _ => None,
        }
    }

    pub fn targets(&self) -> &[CombatantId] {
        match &self.state {
            ControllerState::ChoosingTargets { targets, .. } => targets.as_slice(),
            _ => &[],
        }
    }

    /// Plays committed but not yet handed to the coordinator.
    pub fn resolving(&self) -> usize {
        self.in_flight.len()
    }

    pub fn end_turn_pending(&self) -> bool {
        self.pending_end_turn.is_some()
    }

    /// The reason the most recent input was ignored, cleared by the next accepted one.
    pub fn last_rejection(&self) -> Option<&Rejection> {
        self.last_rejection.as_ref()
    }

    pub fn can_play(&self, card: &CardData) -> bool {
        can_afford(&self.combatant, card)
    }

    /// Shuffle the owned deck and deal the opening hand. Resets any state left
    /// over from a previous encounter; unresolved plays and cards still held
    /// go back into the deck first.
    pub fn start_encounter(&mut self, hand: &mut dyn Hand) {
        self.state = ControllerState::ChoosingCard;
        self.turn = None;
        self.pending_end_turn = None;
        self.last_rejection = None;
        hand.unfreeze();

        let deck = self.combatant.deck_mut();
        for play in self.in_flight.drain(..) {
            deck.discard(play.card.into_data());
        }
        for card in hand.take_cards() {
            deck.discard(card.into_data());
        }
        deck.force_shuffle();
        hand.draw_opening_hand(deck);
        tracing::info!(combatant = %self.id, "encounter started");
    }

    /// Accept the turn. Tokens owned by another combatant are refused.
    pub fn grant_turn(&mut self, token: TurnToken, ctx: &mut TurnContext<'_>) -> bool {
        if self.is_over() {
            return false;
        }
        if token.owner != self.id {
            tracing::warn!(owner = %token.owner, combatant = %self.id, "refusing foreign turn token");
            return false;
        }
        self.turn = Some(token);
        self.refresh_points(ctx);
        tracing::debug!(combatant = %self.id, round = token.round, "turn granted");
        true
    }

    /// Forced turn change: drop the token, abandon targeting and forget any
    /// end-turn notification still waiting.
    pub fn revoke_turn(&mut self, ctx: &mut TurnContext<'_>) {
        if self.turn.take().is_some() || self.pending_end_turn.is_some() {
            tracing::debug!(combatant = %self.id, "turn revoked");
        }
        self.pending_end_turn = None;
        if matches!(self.state, ControllerState::ChoosingTargets { .. }) {
            self.finish_targeting(ctx);
        }
    }

    /// Enter the terminal state. Later calls are ignored.
    pub fn end_encounter(&mut self, result: EndState, ctx: &mut TurnContext<'_>) {
        if self.is_over() {
            return;
        }
        if matches!(self.state, ControllerState::ChoosingTargets { .. }) {
            self.finish_targeting(ctx);
        }
        self.turn = None;
        self.pending_end_turn = None;
        self.state = ControllerState::EncounterOver(result);
        ctx.presentation.encounter_ended(result);
        tracing::info!(combatant = %self.id, %result, "encounter over");
    }

    /// Feed one input. Returns `true` when it changed anything.
    pub fn handle_input(&mut self, action: InputAction, ctx: &mut TurnContext<'_>) -> bool {
        let outcome = self.dispatch(action, ctx);
        match outcome {
            Ok(()) => {
                self.last_rejection = None;
                true
            }
            Err(rejection) => {
                tracing::debug!(?action, %rejection, "input ignored");
                self.last_rejection = Some(rejection);
                false
            }
        }
    }

    /// Deliver finished plays and a due end-turn notification.
    pub fn tick(&mut self, ctx: &mut TurnContext<'_>) {
        self.tick_at(Instant::now(), ctx);
    }

    /// With the resolution gate on, a due end-turn waits until every play of
    /// the turn has resolved, so no cost lands on the next turn's budget.
    pub fn tick_at(&mut self, now: Instant, ctx: &mut TurnContext<'_>) {
        self.poll_resolutions(ctx);
        let held = self.config.gate_while_resolving && !self.in_flight.is_empty();
        if let Some(pending) = self.pending_end_turn {
            if now >= pending.due && !held {
                self.pending_end_turn = None;
                tracing::info!(combatant = %self.id, round = pending.token.round, "turn ended");
                ctx.coordinator.end_turn(pending.token);
            }
        }
    }

    fn dispatch(&mut self, action: InputAction, ctx: &mut TurnContext<'_>) -> Result<(), Rejection> {
        if self.is_over() {
            return Err(Rejection::EncounterOver);
        }
        if self.turn.is_none() {
            return Err(Rejection::NotYourTurn);
        }
        match action {
            InputAction::Select => match self.state {
                ControllerState::ChoosingCard => self.select_card(ctx),
                ControllerState::ChoosingTargets { .. } => self.select_target(ctx),
                ControllerState::EncounterOver(_) => Err(Rejection::EncounterOver),
            },
            InputAction::Deselect => {
                if !matches!(self.state, ControllerState::ChoosingTargets { .. }) {
                    return Err(Rejection::NothingToCancel);
                }
                self.finish_targeting(ctx);
                tracing::debug!(combatant = %self.id, "targeting cancelled");
                Ok(())
            }
            InputAction::EndTurn => self.request_end_turn(ctx),
        }
    }

    fn select_card(&mut self, ctx: &mut TurnContext<'_>) -> Result<(), Rejection> {
        if self.config.gate_while_resolving && !self.in_flight.is_empty() {
            return Err(Rejection::Resolving);
        }
        let card = ctx.hand.selected_card().cloned().ok_or(Rejection::NoCardSelected)?;
        if !self.can_play(card.data()) {
            return Err(Rejection::Unaffordable {
                action_cost: card.data().action_cost,
                movement_cost: card.data().movement_cost,
                action_points: self.combatant.action_points(),
                movement_points: self.combatant.movement_points(),
            });
        }

        ctx.hand.freeze();
        ctx.presentation.set_target_indicator(true);
        ctx.presentation.raise_card(card.id());
        tracing::debug!(card = %card.data().name, requirement = %card.data().target, "choosing targets");
        self.state = ControllerState::ChoosingTargets { pending: card, targets: TargetSelection::new() };
        Ok(())
    }

    fn select_target(&mut self, ctx: &mut TurnContext<'_>) -> Result<(), Rejection> {
        let allow_duplicates = !self.config.reject_duplicate_targets;
        let ControllerState::ChoosingTargets { pending, targets } = &mut self.state else {
            return Err(Rejection::NothingToCancel);
        };

        let picked = match ctx.picker.pick(Category::ENEMY) {
            Some(id) if targets.push(id, allow_duplicates) => Ok(id),
            Some(id) => Err(Rejection::DuplicateTarget(id)),
            None => Err(Rejection::NoTarget),
        };

        let remaining = ctx.coordinator.remaining_enemies();
        if is_complete(pending.data().target, targets.len(), remaining) {
            self.commit(ctx);
            return Ok(());
        }
        let id = picked?;
        tracing::debug!(enemy = %id, picked = targets.len(), remaining, "target added");
        Ok(())
    }

    fn commit(&mut self, ctx: &mut TurnContext<'_>) {
        let state = std::mem::replace(&mut self.state, ControllerState::ChoosingCard);
        let ControllerState::ChoosingTargets { pending, targets } = state else {
            self.state = state;
            return;
        };

        let card = ctx.hand.remove_card(pending.id()).unwrap_or(pending);
        ctx.presentation.move_to_play_area(&card);
        ctx.presentation.start_play_animation(card.id());
        tracing::info!(card = %card.data().name, targets = ?targets.as_slice(), "play committed");
        self.in_flight.push(InFlightPlay { card, targets: targets.into_vec() });

        self.finish_targeting(ctx);
        self.poll_resolutions(ctx);
    }

    /// Unfreeze the hand, hide the indicator and drop any pending card.
    fn finish_targeting(&mut self, ctx: &mut TurnContext<'_>) {
        ctx.hand.unfreeze();
        ctx.presentation.set_target_indicator(false);
        if !self.is_over() {
            self.state = ControllerState::ChoosingCard;
        }
    }

    fn poll_resolutions(&mut self, ctx: &mut TurnContext<'_>) {
        let mut i = 0;
        while i < self.in_flight.len() {
            if !ctx.presentation.play_animation_finished(self.in_flight[i].card.id()) {
                i += 1;
                continue;
            }
            let play = self.in_flight.remove(i);
            self.resolve(play, ctx);
        }
    }

    fn resolve(&mut self, play: InFlightPlay, ctx: &mut TurnContext<'_>) {
        let data = play.card.into_data();
        if self.is_over() {
            tracing::debug!(card = %data.name, "encounter over, play not resolved");
            self.combatant.deck_mut().discard(data);
            return;
        }
        ctx.coordinator.play_card(&mut self.combatant, &play.targets, &data);
        tracing::info!(card = %data.name, targets = play.targets.len(), "play resolved");
        self.combatant.deck_mut().discard(data);
        self.refresh_points(ctx);
    }

    fn request_end_turn(&mut self, ctx: &mut TurnContext<'_>) -> Result<(), Rejection> {
        let token = self.turn.take().ok_or(Rejection::NotYourTurn)?;
        if matches!(self.state, ControllerState::ChoosingTargets { .. }) {
            self.finish_targeting(ctx);
        }
        let due = Instant::now() + self.config.end_turn_delay;
        self.pending_end_turn = Some(PendingEndTurn { token, due });
        tracing::debug!(combatant = %self.id, delay = ?self.config.end_turn_delay, "end turn requested");
        Ok(())
    }

    fn refresh_points(&self, ctx: &mut TurnContext<'_>) {
        ctx.presentation.show_points(self.combatant.action_points(), self.combatant.movement_points());
    }
}

impl<C: Combatant> CardHandler for PlayerController<C> {
    fn draw_cards(&mut self, n: usize, hand: &mut dyn Hand) {
        let cards = self.combatant.deck_mut().draw(n);
        tracing::debug!(requested = n, drawn = cards.len(), "cards drawn");
        hand.add_cards(cards);
    }
}

impl<C: Combatant> Combatant for PlayerController<C> {
    fn begin_turn(&mut self) {
        self.combatant.begin_turn();
    }

    fn take_damage(&mut self, kind: DamageType, amount: f32) {
        self.combatant.take_damage(kind, amount);
    }

    fn is_dead(&self) -> bool {
        self.combatant.is_dead()
    }

    fn action_points(&self) -> u32 {
        self.combatant.action_points()
    }

    fn movement_points(&self) -> u32 {
        self.combatant.movement_points()
    }

    fn deck(&self) -> &Deck {
        self.combatant.deck()
    }

    fn deck_mut(&mut self) -> &mut Deck {
        self.combatant.deck_mut()
    }

    fn burn_action_points(&mut self, burn: u32) {
        self.combatant.burn_action_points(burn);
    }

    fn burn_movement_points(&mut self, burn: u32) {
        self.combatant.burn_movement_points(burn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, TargetRequirement};
    use crate::combatant::Fighter;
    use crate::engine::{CombatCoordinator, PointerPick, Presentation};
    use crate::hand::HandCards;
    use std::cell::Cell;

    #[derive(Default)]
    struct Pointer(Cell<Option<CombatantId>>);

    impl PointerPick for Pointer {
        fn pick(&self, mask: Category) -> Option<CombatantId> {
            if mask.contains(Category::ENEMY) {
                self.0.get()
            } else {
                None
            }
        }
    }

    #[derive(Default)]
    struct Screen {
        indicator: bool,
        hold_animations: bool,
        started: Vec<CardId>,
    }

    impl Presentation for Screen {
        fn set_target_indicator(&mut self, visible: bool) {
            self.indicator = visible;
        }
        fn raise_card(&mut self, _card: CardId) {}
        fn move_to_play_area(&mut self, _card: &Card) {}
        fn start_play_animation(&mut self, card: CardId) {
            self.started.push(card);
        }
        fn play_animation_finished(&self, _card: CardId) -> bool {
            !self.hold_animations
        }
        fn show_points(&mut self, _ap: u32, _mp: u32) {}
    }

    #[derive(Default)]
    struct Coordinator {
        remaining: usize,
        plays: Vec<(Vec<CombatantId>, String)>,
        ended: Vec<TurnToken>,
    }

    impl CombatCoordinator for Coordinator {
        fn play_card(&mut self, player: &mut dyn Combatant, targets: &[CombatantId], card: &CardData) {
            player.burn_action_points(card.action_cost);
            player.burn_movement_points(card.movement_cost);
            self.plays.push((targets.to_vec(), card.name.clone()));
        }
        fn remaining_enemies(&self) -> usize {
            self.remaining
        }
        fn end_turn(&mut self, token: TurnToken) {
            self.ended.push(token);
        }
    }

    const PLAYER: CombatantId = CombatantId(0);

    fn setup(cards: Vec<CardData>) -> (PlayerController<Fighter>, HandCards) {
        let mut fighter = Fighter::new("Hero", 30.0, 2, 1, Deck::with_seed(Vec::new(), 0));
        fighter.begin_turn();
        let controller = PlayerController::new(PLAYER, fighter, ControllerConfig::default());
        let mut hand = HandCards::new(0);
        hand.add_cards(cards);
        hand.select(0);
        (controller, hand)
    }

    fn token() -> TurnToken {
        TurnToken { owner: PLAYER, round: 1 }
    }

    #[test]
    fn input_ignored_without_turn() {
        let (mut pc, mut hand) = setup(vec![CardData::new("Strike", 1, 0, TargetRequirement::Single)]);
        let (pointer, mut screen, mut coord) = (Pointer::default(), Screen::default(), Coordinator::default());
        let mut ctx = TurnContext::new(&mut hand, &pointer, &mut screen, &mut coord);

        assert!(!pc.handle_input(InputAction::Select, &mut ctx));
        assert_eq!(pc.last_rejection(), Some(&Rejection::NotYourTurn));
        assert_eq!(pc.state(), &ControllerState::ChoosingCard);
    }

    #[test]
    fn foreign_token_refused() {
        let (mut pc, mut hand) = setup(Vec::new());
        let (pointer, mut screen, mut coord) = (Pointer::default(), Screen::default(), Coordinator::default());
        let mut ctx = TurnContext::new(&mut hand, &pointer, &mut screen, &mut coord);

        assert!(!pc.grant_turn(TurnToken { owner: CombatantId(7), round: 1 }, &mut ctx));
        assert!(!pc.is_turn());
    }

    #[test]
    fn unaffordable_card_stays_in_choosing_card() {
        let (mut pc, mut hand) = setup(vec![CardData::new("Lunge", 1, 2, TargetRequirement::Single)]);
        let (pointer, mut screen, mut coord) = (Pointer::default(), Screen::default(), Coordinator::default());
        let mut ctx = TurnContext::new(&mut hand, &pointer, &mut screen, &mut coord);
        pc.grant_turn(token(), &mut ctx);

        assert!(!pc.handle_input(InputAction::Select, &mut ctx));
        assert!(matches!(pc.last_rejection(), Some(Rejection::Unaffordable { movement_points: 1, .. })));
        assert!(!ctx.hand.is_frozen());
    }

    #[test]
    fn gate_blocks_selection_while_animation_runs() {
        let strike = CardData::new("Strike", 1, 0, TargetRequirement::Single);
        let (mut pc, mut hand) = setup(vec![strike.clone(), strike]);
        let pointer = Pointer::default();
        pointer.0.set(Some(CombatantId(1)));
        let mut screen = Screen { hold_animations: true, ..Screen::default() };
        let mut coord = Coordinator { remaining: 2, ..Coordinator::default() };

        {
            let mut ctx = TurnContext::new(&mut hand, &pointer, &mut screen, &mut coord);
            pc.grant_turn(token(), &mut ctx);
            assert!(pc.handle_input(InputAction::Select, &mut ctx));
            assert!(pc.handle_input(InputAction::Select, &mut ctx));
            assert_eq!(pc.state(), &ControllerState::ChoosingCard);
            assert_eq!(pc.resolving(), 1);

            assert!(!pc.handle_input(InputAction::Select, &mut ctx));
            assert_eq!(pc.last_rejection(), Some(&Rejection::Resolving));
        }
        assert!(coord.plays.is_empty());

        screen.hold_animations = false;
        let mut ctx = TurnContext::new(&mut hand, &pointer, &mut screen, &mut coord);
        pc.tick(&mut ctx);
        assert_eq!(pc.resolving(), 0);
        assert!(pc.handle_input(InputAction::Select, &mut ctx));
        drop(ctx);
        assert_eq!(coord.plays.len(), 1);
    }

    #[test]
    fn end_turn_waits_for_delay() {
        let (mut pc, mut hand) = setup(Vec::new());
        let (pointer, mut screen, mut coord) = (Pointer::default(), Screen::default(), Coordinator::default());
        let mut ctx = TurnContext::new(&mut hand, &pointer, &mut screen, &mut coord);
        pc.grant_turn(token(), &mut ctx);

        let before = Instant::now();
        assert!(pc.handle_input(InputAction::EndTurn, &mut ctx));
        assert!(!pc.is_turn());
        assert!(!pc.handle_input(InputAction::EndTurn, &mut ctx));

        pc.tick_at(before, &mut ctx);
        assert!(pc.end_turn_pending());
        pc.tick_at(Instant::now() + pc.config().end_turn_delay, &mut ctx);
        assert!(!pc.end_turn_pending());
        drop(ctx);
        assert_eq!(coord.ended, vec![token()]);
    }

    #[test]
    fn revoke_discards_pending_end_turn() {
        let (mut pc, mut hand) = setup(Vec::new());
        let (pointer, mut screen, mut coord) = (Pointer::default(), Screen::default(), Coordinator::default());
        let mut ctx = TurnContext::new(&mut hand, &pointer, &mut screen, &mut coord);
        pc.grant_turn(token(), &mut ctx);
        pc.handle_input(InputAction::EndTurn, &mut ctx);
        pc.revoke_turn(&mut ctx);
        pc.tick_at(Instant::now() + pc.config().end_turn_delay, &mut ctx);
        drop(ctx);
        assert!(coord.ended.is_empty());
    }

    #[test]
    fn restart_returns_unresolved_and_held_cards_to_deck() {
        let deck = Deck::with_seed(vec![CardData::new("Strike", 1, 0, TargetRequirement::Single); 6], 3);
        let mut fighter = Fighter::new("Hero", 10.0, 2, 1, deck);
        fighter.begin_turn();
        let mut pc = PlayerController::new(PLAYER, fighter, ControllerConfig::default());
        let mut hand = HandCards::new(3);
        pc.start_encounter(&mut hand);
        hand.select(0);

        let pointer = Pointer::default();
        pointer.0.set(Some(CombatantId(1)));
        let mut screen = Screen { hold_animations: true, ..Screen::default() };
        let mut coord = Coordinator { remaining: 2, ..Coordinator::default() };
        {
            let mut ctx = TurnContext::new(&mut hand, &pointer, &mut screen, &mut coord);
            pc.grant_turn(token(), &mut ctx);
            pc.handle_input(InputAction::Select, &mut ctx);
            pc.handle_input(InputAction::Select, &mut ctx);
            assert_eq!(pc.resolving(), 1);
            pc.end_encounter(EndState::Fled, &mut ctx);
        }
        assert_eq!(hand.len(), 2);

        pc.start_encounter(&mut hand);
        assert_eq!(pc.resolving(), 0);
        assert_eq!(hand.len(), 3);
        assert_eq!(pc.deck().len() + pc.deck().discard_len() + hand.len(), 6);
        assert!(coord.plays.is_empty());
    }

    #[test]
    fn draw_cards_moves_deck_into_hand() {
        let deck = Deck::with_seed(vec![CardData::new("Strike", 1, 0, TargetRequirement::Single); 4], 1);
        let mut pc = PlayerController::new(
            PLAYER,
            Fighter::new("Hero", 10.0, 1, 1, deck),
            ControllerConfig::default(),
        );
        let mut hand = HandCards::new(0);
        pc.draw_cards(3, &mut hand);
        pc.discard_cards(2, &mut hand);
        pc.return_cards(2, &mut hand);
        assert_eq!(hand.len(), 3);
        assert_eq!(pc.deck().len(), 1);
    }
}
