use crate::cards::CardData;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A combatant's deck: a draw pile and a discard pile.
///
/// The top of the draw pile is the end of the vector. When the draw pile runs
/// out mid-draw, the discard pile is shuffled back in.
#[derive(Debug, Clone)]
pub struct Deck {
    draw_pile: Vec<CardData>,
    discard_pile: Vec<CardData>,
    rng: ChaCha8Rng,
}

impl Deck {
    /// ```
    /// use card_combat::cards::{CardData, TargetRequirement};
    /// use card_combat::deck::Deck;
    ///
    /// let deck = Deck::new(vec![CardData::new("Strike", 1, 0, TargetRequirement::Single); 3]);
    /// assert_eq!(deck.len(), 3);
    /// ```
    pub fn new(cards: Vec<CardData>) -> Self {
        Self::with_seed(cards, rand::rng().random())
    }

    /// Create a deck whose shuffles are reproducible.
    pub fn with_seed(cards: Vec<CardData>, seed: u64) -> Self {
        Self { draw_pile: cards, discard_pile: Vec::new(), rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Cards left in the draw pile.
    pub fn len(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draw_pile.is_empty()
    }

    pub fn discard_len(&self) -> usize {
        self.discard_pile.len()
    }

    pub fn discard_pile(&self) -> &[CardData] {
        &self.discard_pile
    }

    /// Return the discard pile to the draw pile and shuffle everything.
    pub fn force_shuffle(&mut self) {
        self.draw_pile.append(&mut self.discard_pile);
        self.draw_pile.shuffle(&mut self.rng);
    }

    /// Draw up to `n` cards from the top of the draw pile.
    pub fn draw(&mut self, n: usize) -> Vec<CardData> {
        let mut drawn = Vec::with_capacity(n);
        while drawn.len() < n {
            if self.draw_pile.is_empty() {
                if self.discard_pile.is_empty() {
                    break;
                }
                self.force_shuffle();
            }
            match self.draw_pile.pop() {
                Some(card) => drawn.push(card),
                None => break,
            }
        }
        drawn
    }

    pub fn discard(&mut self, card: CardData) {
        self.discard_pile.push(card);
    }
}
