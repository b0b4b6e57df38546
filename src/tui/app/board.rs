use crate::cards::{Card, CardId};
use crate::combatant::{Category, CombatantId};
use crate::engine::{EndState, PointerPick, Presentation};
use std::time::{Duration, Instant};

/// A card sitting in the play area while its animation runs.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct PlayedCard {
    pub card: Card,
    pub started: Option<Instant>,
}

/// Terminal stand-in for the engine scene: target indicator, raised card,
/// play area and point labels.
#[derive(Debug)]
pub struct Board {
    target_indicator: bool,
    raised: Option<CardId>,
    play_area: Vec<PlayedCard>,
    action_points: u32,
    movement_points: u32,
    result: Option<EndState>,
    animation: Duration,
}

impl Board {
    pub fn new(animation: Duration) -> Self {
        Self {
            target_indicator: false,
            raised: None,
            play_area: Vec::new(),
            action_points: 0,
            movement_points: 0,
            result: None,
            animation,
        }
    }

    pub fn target_indicator(&self) -> bool {
        self.target_indicator
    }

    pub fn raised(&self) -> Option<CardId> {
        self.raised
    }

    pub fn play_area(&self) -> &[PlayedCard] {
        &self.play_area
    }

    pub fn points(&self) -> (u32, u32) {
        (self.action_points, self.movement_points)
    }

    pub fn result(&self) -> Option<EndState> {
        self.result
    }

    /// Drop played cards once they have lingered for twice the animation time.
    pub fn prune(&mut self, now: Instant) {
        let linger = self.animation * 2;
        self.play_area
            .retain(|p| p.started.map(|s| now.saturating_duration_since(s) < linger).unwrap_or(true));
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Duration::from_millis(400))
    }
}

impl Presentation for Board {
    fn set_target_indicator(&mut self, visible: bool) {
        self.target_indicator = visible;
        if !visible {
            self.raised = None;
        }
    }

    fn raise_card(&mut self, card: CardId) {
        self.raised = Some(card);
    }

    fn move_to_play_area(&mut self, card: &Card) {
        self.play_area.push(PlayedCard { card: card.clone(), started: None });
    }

    fn start_play_animation(&mut self, card: CardId) {
        if let Some(p) = self.play_area.iter_mut().find(|p| p.card.id() == card) {
            p.started = Some(Instant::now());
        }
    }

    fn play_animation_finished(&self, card: CardId) -> bool {
        match self.play_area.iter().find(|p| p.card.id() == card) {
            Some(PlayedCard { started: Some(s), .. }) => s.elapsed() >= self.animation,
            Some(PlayedCard { started: None, .. }) => false,
            None => true,
        }
    }

    fn show_points(&mut self, action_points: u32, movement_points: u32) {
        self.action_points = action_points;
        self.movement_points = movement_points;
    }

    fn encounter_ended(&mut self, result: EndState) {
        self.result = Some(result);
    }
}

/// Keyboard pointer over the enemy line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cursor {
    slot: usize,
    hovered: Option<(CombatantId, Category)>,
}

impl Cursor {
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn hovered(&self) -> Option<CombatantId> {
        self.hovered.map(|(id, _)| id)
    }

    pub fn set(&mut self, slot: usize, hovered: Option<(CombatantId, Category)>) {
        self.slot = slot;
        self.hovered = hovered;
    }
}

impl PointerPick for Cursor {
    fn pick(&self, mask: Category) -> Option<CombatantId> {
        self.hovered.filter(|(_, category)| category.intersects(mask)).map(|(id, _)| id)
    }
}
