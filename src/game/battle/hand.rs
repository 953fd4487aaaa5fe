use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::{data::card_data::CardData, deck::Deck};

/// 전투 패
///
/// 턴마다 버리지 않고, 소모된 카드만 빼고 덱에서 채운다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<CardData>,
    capacity: usize,
}

impl Hand {
    pub fn new(capacity: usize) -> Self {
        Self {
            cards: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn cards(&self) -> &[CardData] {
        &self.cards
    }

    pub fn get(&self, index: usize) -> Option<&CardData> {
        self.cards.get(index)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// capacity 까지 채운다. 덱이 바닥나면 거기서 멈춤
    pub fn fill<R: Rng>(&mut self, deck: &mut Deck, rng: &mut R) -> Vec<CardData> {
        let mut drawn = Vec::new();
        while self.cards.len() < self.capacity {
            match deck.draw(rng) {
                Some(card) => {
                    self.cards.push(card.clone());
                    drawn.push(card);
                }
                None => break,
            }
        }
        drawn
    }

    /// 여러 인덱스를 한 번에 제거 (순서 무관)
    pub fn remove_indices(&mut self, indices: &[usize]) {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        for index in sorted.into_iter().rev() {
            if index < self.cards.len() {
                self.cards.remove(index);
            }
        }
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::data::card_data::{CardEffects, EffectKind};
    use rand::{rngs::StdRng, SeedableRng};

    fn analyze(id: u32) -> CardData {
        CardData {
            id,
            name: "Analyze".to_string(),
            detail: String::new(),
            effects: CardEffects {
                kind: EffectKind::Analyze,
                rank: None,
                value: None,
                random_range: None,
            },
        }
    }

    #[test]
    fn fill_stops_when_deck_runs_dry() {
        let mut deck = Deck::new((0..3).map(analyze).collect());
        let mut hand = Hand::new(5);
        let mut rng = StdRng::seed_from_u64(1);

        let drawn = hand.fill(&mut deck, &mut rng);
        assert_eq!(drawn.len(), 3);
        assert_eq!(hand.len(), 3);
    }

    #[test]
    fn remove_indices_keeps_others_in_order() {
        let mut deck = Deck::new((0..5).map(analyze).collect());
        let mut hand = Hand::new(5);
        let mut rng = StdRng::seed_from_u64(2);
        hand.fill(&mut deck, &mut rng);

        let before: Vec<u32> = hand.cards().iter().map(|c| c.id).collect();
        hand.remove_indices(&[3, 1]);
        let after: Vec<u32> = hand.cards().iter().map(|c| c.id).collect();
        assert_eq!(after, vec![before[0], before[2], before[4]]);
    }
}
