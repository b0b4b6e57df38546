use card_combat::cards::{CardData, DamageType, TargetRequirement};
use card_combat::combatant::{CardHandler, Category, Combatant, CombatantId, Fighter};
use card_combat::config::ControllerConfig;
use card_combat::controller::{InputAction, PlayerController};
use card_combat::deck::Deck;
use card_combat::encounter::{Encounter, Phase};
use card_combat::engine::{CombatCoordinator, EndState, TurnContext};
use card_combat::hand::HandCards;
use card_combat::tui::app::{Board, Cursor};
use std::time::Duration;

const PLAYER: CombatantId = CombatantId(0);

struct Table {
    pc: PlayerController<Fighter>,
    hand: HandCards,
    encounter: Encounter,
    board: Board,
    cursor: Cursor,
}

impl Table {
    fn new(deck: Vec<CardData>, enemies: Vec<Fighter>) -> Self {
        let hero = Fighter::new("Hero", 30.0, 3, 2, Deck::with_seed(deck, 11));
        let config = ControllerConfig::default().with_end_turn_delay(Duration::ZERO);
        let mut table = Self {
            pc: PlayerController::new(PLAYER, hero, config),
            hand: HandCards::new(4),
            encounter: Encounter::new(PLAYER, enemies),
            board: Board::new(Duration::ZERO),
            cursor: Cursor::default(),
        };
        table.pc.start_encounter(&mut table.hand);
        table.hand.select(0);
        table
    }

    fn step(&mut self) {
        {
            let mut ctx = TurnContext::new(&mut self.hand, &self.cursor, &mut self.board, &mut self.encounter);
            self.pc.tick(&mut ctx);
        }
        if let Some(result) = self.encounter.outcome() {
            let mut ctx = TurnContext::new(&mut self.hand, &self.cursor, &mut self.board, &mut self.encounter);
            self.pc.end_encounter(result, &mut ctx);
            return;
        }
        if let Some(token) = self.encounter.advance(&mut self.pc) {
            if token.round > 1 {
                self.pc.draw_cards(1, &mut self.hand);
            }
            let mut ctx = TurnContext::new(&mut self.hand, &self.cursor, &mut self.board, &mut self.encounter);
            self.pc.grant_turn(token, &mut ctx);
        }
    }

    fn aim(&mut self, id: CombatantId) {
        self.cursor.set(0, Some((id, Category::ENEMY)));
    }

    fn input(&mut self, action: InputAction) -> bool {
        let mut ctx = TurnContext::new(&mut self.hand, &self.cursor, &mut self.board, &mut self.encounter);
        self.pc.handle_input(action, &mut ctx)
    }
}

fn goblin(hp: f32) -> Fighter {
    Fighter::new("Goblin", hp, 1, 1, Deck::with_seed(Vec::new(), 0))
}

#[test]
fn opening_hand_and_first_turn() {
    let deck = vec![CardData::new("Strike", 1, 0, TargetRequirement::Single); 6];
    let mut t = Table::new(deck, vec![goblin(10.0)]);
    assert_eq!(t.hand.len(), 4);
    assert_eq!(t.pc.deck().len(), 2);

    t.step();
    assert!(t.pc.is_turn());
    assert_eq!(t.encounter.phase(), Phase::Player { round: 1 });
    assert_eq!(t.board.points(), (3, 2));
}

#[test]
fn strikes_until_victory() {
    let strike = CardData::new("Strike", 1, 0, TargetRequirement::Single).with_damage(DamageType::Physical, 6.0);
    let mut t = Table::new(vec![strike; 6], vec![goblin(10.0)]);
    t.step();
    t.aim(CombatantId(1));

    assert!(t.input(InputAction::Select));
    assert!(t.input(InputAction::Select));
    assert_eq!(t.encounter.enemy(CombatantId(1)).map(Fighter::health), Some(4.0));
    assert_eq!(t.board.points(), (2, 2));

    assert!(t.input(InputAction::Select));
    assert!(t.input(InputAction::Select));
    assert_eq!(t.encounter.outcome(), Some(EndState::Victory));

    t.step();
    assert!(t.pc.is_over());
    assert_eq!(t.board.result(), Some(EndState::Victory));
    assert_eq!(t.pc.deck().discard_len(), 2);
    assert!(!t.input(InputAction::Select));
}

#[test]
fn end_turn_starts_next_round_with_fresh_points() {
    let strike = CardData::new("Strike", 1, 0, TargetRequirement::Single).with_damage(DamageType::Physical, 1.0);
    let mut t = Table::new(vec![strike; 8], vec![goblin(20.0), goblin(20.0)]);
    t.step();
    t.aim(CombatantId(2));
    t.input(InputAction::Select);
    t.input(InputAction::Select);
    assert_eq!(t.pc.action_points(), 2);

    assert!(t.input(InputAction::EndTurn));
    assert_eq!(t.encounter.phase(), Phase::Player { round: 1 });
    t.step();
    assert_eq!(t.encounter.phase(), Phase::Player { round: 2 });
    assert!(t.pc.is_turn());
    assert_eq!(t.pc.action_points(), 3);
    assert_eq!(t.hand.len(), 4);
}

#[test]
fn all_cards_hit_every_enemy_and_count_remaining() {
    let nova = CardData::new("Nova", 2, 0, TargetRequirement::All).with_damage(DamageType::Frost, 5.0);
    let mut t = Table::new(vec![nova; 4], vec![goblin(5.0), goblin(8.0), goblin(5.0)]);
    t.step();
    t.aim(CombatantId(2));
    t.input(InputAction::Select);
    assert!(t.input(InputAction::Select));
    assert_eq!(t.encounter.remaining_enemies(), 1);
    assert!(t.encounter.log().iter().any(|l| l.contains("falls")));
}
