use crate::cards::{Card, CardData, CardId};
use crate::deck::Deck;
use crate::engine::Hand;

/// An ordered hand with one optionally highlighted card.
///
/// Highlight changes are ignored while the hand is frozen.
///
/// ```
/// use card_combat::cards::{CardData, TargetRequirement};
/// use card_combat::engine::Hand;
/// use card_combat::hand::HandCards;
///
/// let mut hand = HandCards::new(5);
/// hand.add_cards(vec![CardData::new("Strike", 1, 0, TargetRequirement::Single)]);
/// hand.focus_next();
/// assert_eq!(hand.selected_card().map(|c| c.data().name.as_str()), Some("Strike"));
/// ```
#[derive(Debug, Clone)]
pub struct HandCards {
    cards: Vec<Card>,
    selected: Option<usize>,
    frozen: bool,
    opening_size: usize,
    next_id: u32,
}

impl HandCards {
    pub fn new(opening_size: usize) -> Self {
        Self { cards: Vec::new(), selected: None, frozen: false, opening_size, next_id: 0 }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn opening_size(&self) -> usize {
        self.opening_size
    }

    /// Highlight the card at `idx` (wrapping).
    pub fn select(&mut self, idx: usize) {
        if self.frozen || self.cards.is_empty() {
            return;
        }
        self.selected = Some(idx % self.cards.len());
    }

    pub fn focus_next(&mut self) {
        let next = match self.selected {
            Some(i) => i + 1,
            None => 0,
        };
        self.select(next);
    }

    pub fn focus_prev(&mut self) {
        let n = self.cards.len();
        if n == 0 {
            return;
        }
        let prev = match self.selected {
            Some(i) => (i + n - 1) % n,
            None => n - 1,
        };
        self.select(prev);
    }

    pub fn clear_selection(&mut self) {
        if !self.frozen {
            self.selected = None;
        }
    }

    fn allocate_id(&mut self) -> CardId {
        let id = CardId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}

impl Default for HandCards {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Hand for HandCards {
    fn draw_opening_hand(&mut self, deck: &mut Deck) {
        self.cards.clear();
        self.selected = None;
        let cards = deck.draw(self.opening_size);
        self.add_cards(cards);
    }

    fn take_cards(&mut self) -> Vec<Card> {
        self.selected = None;
        std::mem::take(&mut self.cards)
    }

    fn add_cards(&mut self, cards: Vec<CardData>) {
        for data in cards {
            let id = self.allocate_id();
            self.cards.push(Card::new(id, data));
        }
    }

    fn selected_card(&self) -> Option<&Card> {
        self.selected.and_then(|i| self.cards.get(i))
    }

    fn remove_card(&mut self, id: CardId) -> Option<Card> {
        let pos = self.cards.iter().position(|c| c.id() == id)?;
        let card = self.cards.remove(pos);
        self.selected = match self.selected {
            _ if self.cards.is_empty() => None,
            Some(i) if i > pos => Some(i - 1),
            Some(i) if i == pos => Some(pos.min(self.cards.len() - 1)),
            other => other,
        };
        Some(card)
    }

    fn freeze(&mut self) {
        self.frozen = true;
    }

    fn unfreeze(&mut self) {
        self.frozen = false;
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::TargetRequirement;

    fn data(name: &str) -> CardData {
        CardData::new(name, 1, 0, TargetRequirement::Single)
    }

    fn hand_of(names: &[&str]) -> HandCards {
        let mut hand = HandCards::new(3);
        hand.add_cards(names.iter().map(|n| data(n)).collect());
        hand
    }

    #[test]
    fn opening_hand_draws_configured_size() {
        let mut deck = Deck::with_seed(vec![data("a"); 10], 0);
        let mut hand = HandCards::new(4);
        hand.draw_opening_hand(&mut deck);
        assert_eq!(hand.len(), 4);
        assert_eq!(deck.len(), 6);
    }

    #[test]
    fn opening_hand_replaces_previous_cards() {
        let mut deck = Deck::with_seed(vec![data("a"); 5], 0);
        let mut hand = hand_of(&["old", "old", "old"]);
        hand.select(1);
        hand.draw_opening_hand(&mut deck);
        assert_eq!(hand.len(), 3);
        assert!(hand.cards().iter().all(|c| c.data().name == "a"));
        assert_eq!(hand.selected_index(), None);
    }

    #[test]
    fn take_cards_empties_hand() {
        let mut hand = hand_of(&["a", "b"]);
        hand.select(1);
        let taken = hand.take_cards();
        assert_eq!(taken.len(), 2);
        assert!(hand.is_empty());
        assert_eq!(hand.selected_card(), None);
    }

    #[test]
    fn ids_are_unique() {
        let hand = hand_of(&["a", "a", "a"]);
        let mut ids: Vec<_> = hand.cards().iter().map(|c| c.id()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn focus_wraps() {
        let mut hand = hand_of(&["a", "b", "c"]);
        hand.focus_prev();
        assert_eq!(hand.selected_index(), Some(2));
        hand.focus_next();
        assert_eq!(hand.selected_index(), Some(0));
    }

    #[test]
    fn frozen_hand_keeps_highlight() {
        let mut hand = hand_of(&["a", "b"]);
        hand.select(0);
        hand.freeze();
        hand.focus_next();
        hand.clear_selection();
        assert_eq!(hand.selected_index(), Some(0));
        hand.unfreeze();
        hand.focus_next();
        assert_eq!(hand.selected_index(), Some(1));
    }

    #[test]
    fn remove_adjusts_highlight() {
        let mut hand = hand_of(&["a", "b", "c"]);
        hand.select(2);
        let first = hand.cards()[0].id();
        assert!(hand.remove_card(first).is_some());
        assert_eq!(hand.selected_card().map(|c| c.data().name.as_str()), Some("c"));

        let last = hand.cards()[1].id();
        hand.remove_card(last);
        assert_eq!(hand.selected_index(), Some(0));

        let only = hand.cards()[0].id();
        hand.remove_card(only);
        assert_eq!(hand.selected_index(), None);
        assert!(hand.remove_card(only).is_none());
    }
}
