use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::game::{
    behavior::GameError,
    data::card_data::{CardData, CardKey},
    enums::Element,
    roll::{biased_random_int, random_int},
};

/// 덱 한 장과 그 상태 플래그
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub card: CardData,
    pub drawn: bool,
    pub used: bool,
}

impl DeckEntry {
    pub fn new(card: CardData) -> Self {
        Self {
            card,
            drawn: false,
            used: false,
        }
    }

    pub fn is_fresh(&self) -> bool {
        !self.drawn && !self.used
    }
}

/// 조회용 필터
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckFilter {
    All,
    /// 뽑지도 쓰지도 않은 카드
    Fresh,
    NotUsed,
    Used,
}

impl DeckFilter {
    fn matches(self, entry: &DeckEntry) -> bool {
        match self {
            DeckFilter::All => true,
            DeckFilter::Fresh => entry.is_fresh(),
            DeckFilter::NotUsed => !entry.used,
            DeckFilter::Used => entry.used,
        }
    }
}

/// 속성별 장수 (HUD 용)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementCounts {
    pub fire: usize,
    pub ice: usize,
    pub wind: usize,
    pub other: usize,
}

/// 카드 순서는 표시/정렬에만 의미가 있고 뽑기 확률과는 무관하다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    entries: Vec<DeckEntry>,
}

impl Deck {
    pub fn new(cards: Vec<CardData>) -> Self {
        Self {
            entries: cards.into_iter().map(DeckEntry::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DeckEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&DeckEntry> {
        self.entries.get(index)
    }

    pub fn add(&mut self, card: CardData) {
        self.entries.push(DeckEntry::new(card));
    }

    pub fn remove(&mut self, index: usize) -> Result<CardData, GameError> {
        if index >= self.entries.len() {
            return Err(GameError::OutOfBounds);
        }
        Ok(self.entries.remove(index).card)
    }

    /// id 오름차순 안정 정렬. 플래그는 카드를 따라간다.
    pub fn sort(&mut self) {
        self.entries.sort_by_key(|entry| entry.card.id);
    }

    // ============================================================
    // 상태 전이
    // ============================================================

    /// Fresh 카드 중 하나를 균등 추첨해 Drawn 으로 표시
    ///
    /// 범위 값이 있는 카드는 덱 전체의 같은 속성 장수로 치우친 값을 다시 굴린다.
    /// 뽑을 카드가 없으면 None.
    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> Option<CardData> {
        let fresh = self.indices(DeckFilter::Fresh);
        if fresh.is_empty() {
            return None;
        }
        let index = fresh[random_int(0, fresh.len() as i32 - 1, rng) as usize];

        let element = self.entries[index].card.element();
        let same_element = self.count_same_element(element) as u32;
        let entry = &mut self.entries[index];
        if let Some(range) = entry.card.effects.random_range {
            entry.card.effects.value = Some(biased_random_int(range.lo, range.hi, same_element, rng));
        }
        entry.drawn = true;

        debug!(
            "Drew card {} (value={:?}) from index {}",
            entry.card.id, entry.card.effects.value, index
        );
        Some(entry.card.clone())
    }

    /// 뽑혀 있고 아직 쓰지 않은 같은 id 카드를 Used 로 표시
    ///
    /// 여러 장이면 가장 뒤 인덱스. 일치하는 카드가 없으면 거부.
    pub fn use_card(&mut self, card_id: u32) -> Result<usize, GameError> {
        let index = self
            .entries
            .iter()
            .rposition(|entry| entry.card.id == card_id && entry.drawn && !entry.used)
            .ok_or(GameError::CardNotInHand)?;
        self.entries[index].used = true;
        Ok(index)
    }

    /// Used 카드 하나를 균등 추첨해 used 만 해제 (drawn 은 그대로)
    pub fn random_recover<R: Rng>(&mut self, rng: &mut R) -> Option<usize> {
        let used = self.indices(DeckFilter::Used);
        if used.is_empty() {
            return None;
        }
        let index = used[random_int(0, used.len() as i32 - 1, rng) as usize];
        self.entries[index].used = false;
        Some(index)
    }

    /// 전투 종료 정리. used 는 유지
    pub fn reset_all_draw(&mut self) {
        for entry in &mut self.entries {
            entry.drawn = false;
        }
    }

    // ============================================================
    // 조회
    // ============================================================

    pub fn indices(&self, filter: DeckFilter) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| filter.matches(entry))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn count(&self, filter: DeckFilter) -> usize {
        self.entries.iter().filter(|entry| filter.matches(entry)).count()
    }

    pub fn fresh_count(&self) -> usize {
        self.count(DeckFilter::Fresh)
    }

    pub fn not_used_count(&self) -> usize {
        self.count(DeckFilter::NotUsed)
    }

    pub fn used_count(&self) -> usize {
        self.count(DeckFilter::Used)
    }

    /// 같은 키(id + 범위) 장수
    pub fn count_in_deck(&self, key: &CardKey) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.card.key() == *key)
            .count()
    }

    /// 같은 속성 장수. 속성이 없는 카드끼리는 같은 부류로 센다.
    pub fn count_same_element(&self, element: Option<Element>) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.card.element() == element)
            .count()
    }

    pub fn count_used_same_element(&self, element: Option<Element>) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.used && entry.card.element() == element)
            .count()
    }

    pub fn element_counts(&self, filter: DeckFilter) -> ElementCounts {
        let mut counts = ElementCounts::default();
        for entry in self.entries.iter().filter(|entry| filter.matches(entry)) {
            match entry.card.element() {
                Some(Element::Fire) => counts.fire += 1,
                Some(Element::Ice) => counts.ice += 1,
                Some(Element::Wind) => counts.wind += 1,
                None => counts.other += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::data::card_data::{CardEffects, EffectKind, ValueRange};
    use rand::{rngs::StdRng, SeedableRng};

    fn card(id: u32, kind: EffectKind) -> CardData {
        CardData {
            id,
            name: format!("card {}", id),
            detail: String::new(),
            effects: CardEffects {
                kind,
                rank: Some(1),
                value: None,
                random_range: Some(ValueRange::new(2, 4)),
            },
        }
    }

    fn mixed_deck() -> Deck {
        Deck::new(vec![
            card(3, EffectKind::Attack(Element::Wind)),
            card(1, EffectKind::Attack(Element::Fire)),
            card(0, EffectKind::Analyze),
            card(1, EffectKind::Attack(Element::Fire)),
            card(2, EffectKind::Attack(Element::Ice)),
        ])
    }

    #[test]
    fn draw_exhausts_then_returns_none() {
        let mut deck = mixed_deck();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..5 {
            let drawn = deck.draw(&mut rng).unwrap();
            assert!(ValueRange::new(2, 4).contains(drawn.value()));
        }
        assert!(deck.draw(&mut rng).is_none());
        assert_eq!(deck.fresh_count(), 0);
        assert_eq!(deck.not_used_count(), 5);
    }

    #[test]
    fn use_card_refuses_without_drawn_match() {
        let mut deck = mixed_deck();
        assert_eq!(deck.use_card(1), Err(GameError::CardNotInHand));
        assert_eq!(deck.used_count(), 0);
    }

    #[test]
    fn use_card_picks_highest_matching_index() {
        let mut deck = mixed_deck();
        let mut rng = StdRng::seed_from_u64(2);
        while deck.draw(&mut rng).is_some() {}

        assert_eq!(deck.use_card(1), Ok(3));
        assert_eq!(deck.use_card(1), Ok(1));
        assert_eq!(deck.use_card(1), Err(GameError::CardNotInHand));
    }

    #[test]
    fn recover_clears_used_only() {
        let mut deck = mixed_deck();
        let mut rng = StdRng::seed_from_u64(3);
        while deck.draw(&mut rng).is_some() {}
        deck.use_card(0).unwrap();

        let recovered = deck.random_recover(&mut rng).unwrap();
        assert_eq!(recovered, 2);
        let entry = deck.entry(2).unwrap();
        assert!(entry.drawn && !entry.used);
        // 다시 draw 없이 use 가능
        assert_eq!(deck.use_card(0), Ok(2));
        assert!(Deck::new(vec![]).random_recover(&mut rng).is_none());
    }

    #[test]
    fn reset_all_draw_keeps_used() {
        let mut deck = mixed_deck();
        let mut rng = StdRng::seed_from_u64(4);
        while deck.draw(&mut rng).is_some() {}
        deck.use_card(2).unwrap();
        deck.reset_all_draw();

        assert_eq!(deck.used_count(), 1);
        assert_eq!(deck.fresh_count(), 4);
        assert_eq!(deck.indices(DeckFilter::Used), vec![4]);
    }

    #[test]
    fn sort_keeps_flags_attached() {
        let mut deck = mixed_deck();
        let mut rng = StdRng::seed_from_u64(5);
        while deck.draw(&mut rng).is_some() {}
        deck.use_card(3).unwrap(); // Wind, index 0

        deck.sort();
        let ids: Vec<u32> = deck.entries().iter().map(|e| e.card.id).collect();
        assert_eq!(ids, vec![0, 1, 1, 2, 3]);
        assert!(deck.entry(4).unwrap().used);
        assert_eq!(deck.used_count(), 1);
    }

    #[test]
    fn copy_is_deep() {
        let original = mixed_deck();
        let mut copy = original.clone();
        let mut rng = StdRng::seed_from_u64(6);
        copy.draw(&mut rng);
        copy.remove(0).unwrap();

        assert_eq!(original.len(), 5);
        assert_eq!(original.fresh_count(), 5);
    }

    #[test]
    fn element_queries() {
        let deck = mixed_deck();
        let counts = deck.element_counts(DeckFilter::All);
        assert_eq!(
            counts,
            ElementCounts {
                fire: 2,
                ice: 1,
                wind: 1,
                other: 1
            }
        );
        assert_eq!(deck.count_same_element(Some(Element::Fire)), 2);
        assert_eq!(deck.count_same_element(None), 1);
        assert_eq!(deck.count_in_deck(&card(1, EffectKind::Attack(Element::Fire)).key()), 2);
    }

    #[test]
    fn remove_out_of_range_fails() {
        let mut deck = mixed_deck();
        assert_eq!(deck.remove(9), Err(GameError::OutOfBounds));
    }
}
