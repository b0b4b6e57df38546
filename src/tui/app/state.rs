use crate::cards::{parse_cards, DamageType, STARTER_DECK};
use crate::combatant::{CardHandler, Category, Combatant, CombatantId, Fighter};
use crate::config::{read_env, ControllerConfig};
use crate::controller::{InputAction, PlayerController};
use crate::deck::Deck;
use crate::encounter::Encounter;
use crate::engine::TurnContext;
use crate::hand::HandCards;
use std::time::Instant;

use super::{Board, Cursor};

const PLAYER: CombatantId = CombatantId(0);

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum KeyAction {
    CardNext,
    CardPrev,
    PointerNext,
    PointerPrev,
    Select,
    Deselect,
    EndTurn,
    Flee,
    NewEncounter,
    ToggleHelp,
    ToggleLog,
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub controller: PlayerController<Fighter>,
    pub hand: HandCards,
    pub encounter: Encounter,
    pub board: Board,
    pub cursor: Cursor,
    pub config: ControllerConfig,
    // Front-end settings
    pub opening_hand: usize,
    pub draw_per_turn: usize,
    pub seed: Option<u64>,
    help_open: bool,
    log_open: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ControllerConfig::default(), None)
    }
}

impl AppState {
    pub const LOG_PAGE_SIZE: usize = 20;

    pub fn new(config: ControllerConfig, seed: Option<u64>) -> Self {
        let mut app = Self {
            controller: Self::build_player(&config, seed),
            hand: HandCards::new(5),
            encounter: Self::build_enemies(),
            board: Board::default(),
            cursor: Cursor::default(),
            config,
            opening_hand: 5,
            draw_per_turn: 2,
            seed,
            help_open: false,
            log_open: false,
        };
        app.new_encounter();
        app
    }

    /// Configuration from the environment; `CARD_COMBAT_SEED` fixes shuffles.
    pub fn from_env() -> Self {
        Self::new(ControllerConfig::from_env(), read_env::<u64>("CARD_COMBAT_SEED"))
    }

    fn build_player(config: &ControllerConfig, seed: Option<u64>) -> PlayerController<Fighter> {
        let cards = match parse_cards(STARTER_DECK) {
            Ok(cards) => cards,
            Err(err) => {
                tracing::error!(%err, "starter deck failed to parse");
                Vec::new()
            }
        };
        let deck = match seed {
            Some(seed) => Deck::with_seed(cards, seed),
            None => Deck::new(cards),
        };
        PlayerController::new(PLAYER, Fighter::new("Hero", 40.0, 3, 2, deck), config.clone())
    }

    fn build_enemies() -> Encounter {
        let spare = || Deck::with_seed(Vec::new(), 0);
        Encounter::new(
            PLAYER,
            vec![
                Fighter::new("Goblin", 12.0, 1, 1, spare()),
                Fighter::new("Skeleton", 16.0, 1, 1, spare())
                    .with_resistance(DamageType::Poison, 0.0)
                    .with_resistance(DamageType::Holy, 2.0),
                Fighter::new("Slime", 10.0, 1, 1, spare())
                    .with_resistance(DamageType::Physical, 0.5)
                    .with_resistance(DamageType::Fire, 1.5),
            ],
        )
    }

    /// Reset everything and deal a fresh encounter.
    pub fn new_encounter(&mut self) {
        self.controller = Self::build_player(&self.config, self.seed);
        self.encounter = Self::build_enemies();
        self.hand = HandCards::new(self.opening_hand);
        self.board = Board::default();
        self.cursor = Cursor::default();
        self.controller.start_encounter(&mut self.hand);
        self.hand.select(0);
        self.sync_cursor();
        self.on_tick();
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn log_open(&self) -> bool {
        self.log_open
    }

    /// Why the last input did nothing, for the status bar.
    pub fn status_message(&self) -> Option<String> {
        self.controller.last_rejection().map(|r| r.to_string())
    }

    pub fn handle_input(&mut self, action: KeyAction) -> bool {
        match action {
            KeyAction::ToggleHelp => {
                self.log_open = false;
                self.help_open = !self.help_open;
                false
            }
            KeyAction::ToggleLog => {
                self.help_open = false;
                self.log_open = !self.log_open;
                false
            }
            KeyAction::CardNext => {
                self.hand.focus_next();
                false
            }
            KeyAction::CardPrev => {
                self.hand.focus_prev();
                false
            }
            KeyAction::PointerNext => {
                self.move_pointer(1);
                false
            }
            KeyAction::PointerPrev => {
                self.move_pointer(-1);
                false
            }
            KeyAction::Select => self.feed(InputAction::Select),
            KeyAction::Deselect => self.feed(InputAction::Deselect),
            KeyAction::EndTurn => self.feed(InputAction::EndTurn),
            KeyAction::Flee => {
                if self.controller.is_over() {
                    return false;
                }
                self.encounter.flee();
                self.sync_outcome();
                true
            }
            KeyAction::NewEncounter => {
                if !self.controller.is_over() {
                    return false;
                }
                self.new_encounter();
                true
            }
        }
    }

    /// Deliver finished plays and end-turn notices, then let the encounter
    /// move on and hand the player its next turn.
    pub fn on_tick(&mut self) {
        {
            let (controller, mut ctx) = self.split();
            controller.tick(&mut ctx);
        }
        self.board.prune(Instant::now());
        self.sync_outcome();

        if let Some(token) = self.encounter.advance(&mut self.controller) {
            if token.round > 1 {
                self.controller.draw_cards(self.draw_per_turn, &mut self.hand);
            }
            let (controller, mut ctx) = self.split();
            controller.grant_turn(token, &mut ctx);
        }
        self.sync_outcome();
        self.sync_cursor();
    }

    fn feed(&mut self, input: InputAction) -> bool {
        self.sync_cursor();
        let changed = {
            let (controller, mut ctx) = self.split();
            controller.handle_input(input, &mut ctx)
        };
        self.sync_outcome();
        changed
    }

    fn sync_outcome(&mut self) {
        if let Some(result) = self.encounter.outcome() {
            let (controller, mut ctx) = self.split();
            controller.end_encounter(result, &mut ctx);
        }
    }

    fn move_pointer(&mut self, delta: isize) {
        let n = self.encounter.enemies().len();
        if n == 0 {
            return;
        }
        let slot = (self.cursor.slot() as isize + delta).rem_euclid(n as isize) as usize;
        self.cursor.set(slot, None);
        self.sync_cursor();
    }

    fn sync_cursor(&mut self) {
        let slot = self.cursor.slot();
        let hovered = self
            .encounter
            .enemies()
            .get(slot)
            .filter(|e| !e.fighter.is_dead())
            .map(|e| (e.id, Category::ENEMY));
        self.cursor.set(slot, hovered);
    }

    fn split(&mut self) -> (&mut PlayerController<Fighter>, TurnContext<'_>) {
        let Self { controller, hand, encounter, board, cursor, .. } = self;
        (controller, TurnContext::new(hand, &*cursor, board, encounter))
    }
}
