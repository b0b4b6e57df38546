//! card-combat: player turn and targeting logic for a turn-based card battler
//!
//! Goals:
//! - Engine-independent: hand storage, pointer picking, visuals and combat
//!   resolution are traits in [`engine`]
//! - Invalid input is ignored, never an error; the reason is kept for display
//! - Point budgets never go negative
//!
//! ## Quick start: play a card at an enemy
//! ```
//! use card_combat::cards::{Card, CardData, CardId, TargetRequirement};
//! use card_combat::combatant::{Category, Combatant, CombatantId, Fighter};
//! use card_combat::config::ControllerConfig;
//! use card_combat::controller::{InputAction, PlayerController};
//! use card_combat::deck::Deck;
//! use card_combat::encounter::Encounter;
//! use card_combat::engine::{PointerPick, Presentation, TurnContext};
//! use card_combat::hand::HandCards;
//!
//! struct Aim(CombatantId);
//! impl PointerPick for Aim {
//!     fn pick(&self, mask: Category) -> Option<CombatantId> {
//!         mask.contains(Category::ENEMY).then_some(self.0)
//!     }
//! }
//!
//! struct NoVisuals;
//! impl Presentation for NoVisuals {
//!     fn set_target_indicator(&mut self, _: bool) {}
//!     fn raise_card(&mut self, _: CardId) {}
//!     fn move_to_play_area(&mut self, _: &Card) {}
//!     fn start_play_animation(&mut self, _: CardId) {}
//!     fn play_animation_finished(&self, _: CardId) -> bool { true }
//!     fn show_points(&mut self, _: u32, _: u32) {}
//! }
//!
//! let strike = CardData::new("Strike", 1, 0, TargetRequirement::Single);
//! let hero = Fighter::new("Hero", 30.0, 2, 1, Deck::with_seed(vec![strike; 5], 7));
//! let goblin = Fighter::new("Goblin", 10.0, 1, 1, Deck::with_seed(Vec::new(), 0));
//!
//! let mut player = PlayerController::new(CombatantId(0), hero, ControllerConfig::default());
//! let mut encounter = Encounter::new(CombatantId(0), vec![goblin]);
//! let mut hand = HandCards::new(3);
//! let (aim, mut visuals) = (Aim(CombatantId(1)), NoVisuals);
//!
//! player.start_encounter(&mut hand);
//! hand.select(0);
//! let token = encounter.advance(&mut player).unwrap();
//!
//! let mut ctx = TurnContext::new(&mut hand, &aim, &mut visuals, &mut encounter);
//! player.grant_turn(token, &mut ctx);
//! assert!(player.handle_input(InputAction::Select, &mut ctx)); // pick the card
//! assert!(player.handle_input(InputAction::Select, &mut ctx)); // pick the goblin
//! drop(ctx);
//! assert_eq!(hand.len(), 2);
//! assert_eq!(player.combatant().deck().discard_len(), 1);
//! ```
//!
//! ## TUI
//! Run the interactive TUI with:
//! ```sh
//! cargo run --bin card-combat
//! ```

pub mod cards;
pub mod combatant;
pub mod config;
pub mod controller;
pub mod deck;
pub mod encounter;
pub mod engine;
pub mod hand;
pub mod targeting;
pub mod tui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
