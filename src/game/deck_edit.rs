use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::game::{
    behavior::GameError,
    data::card_data::{CardData, CardKey},
    deck::{Deck, DeckEntry},
    inventory::CardInventory,
};

/// 편집 화면의 보유 카드 한 종류
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub card: CardData,
    /// 덱 밖에 남아 있는 장수
    pub out_count: u32,
}

/// 덱 편집 세션
///
/// 열 때 덱을 스냅샷으로 잡아 두고, finish 에서 정확히 deck_size 장일 때만 확정한다.
/// 읽기 전용으로 열면 덱과 보유 목록을 보여 주기만 하고 모든 변경을 거부한다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEditor {
    snapshot: Deck,
    deck: Deck,
    inventory: CardInventory,
    pool: Vec<PoolEntry>,
    deck_size: usize,
    read_only: bool,
}

impl DeckEditor {
    /// 맵의 덱 편집 오브젝트를 밟았을 때: 편집 가능
    pub fn open(deck: &Deck, inventory: &CardInventory, deck_size: usize) -> Self {
        Self::open_with(deck, inventory, deck_size, false)
    }

    /// 탐색 중 덱 보기: 변경 불가
    pub fn open_read_only(deck: &Deck, inventory: &CardInventory, deck_size: usize) -> Self {
        Self::open_with(deck, inventory, deck_size, true)
    }

    fn open_with(deck: &Deck, inventory: &CardInventory, deck_size: usize, read_only: bool) -> Self {
        let mut editor = Self {
            snapshot: deck.clone(),
            deck: deck.clone(),
            inventory: inventory.clone(),
            pool: Vec::new(),
            deck_size,
            read_only,
        };
        editor.rebuild_pool();
        info!(
            "Deck edit opened: {} cards, {} kinds owned, read_only={}",
            deck.len(),
            editor.pool.len(),
            read_only
        );
        editor
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn ensure_editable(&self) -> Result<(), GameError> {
        if self.read_only {
            debug!("Deck edit rejected: read only");
            return Err(GameError::InvalidAction);
        }
        Ok(())
    }

    fn rebuild_pool(&mut self) {
        self.pool = self
            .inventory
            .entries()
            .iter()
            .map(|entry| PoolEntry {
                card: entry.card.clone(),
                out_count: entry
                    .count
                    .saturating_sub(self.deck.count_in_deck(&entry.key()) as u32),
            })
            .collect();
    }

    fn pool_entry_mut(&mut self, key: &CardKey) -> Option<&mut PoolEntry> {
        self.pool.iter_mut().find(|entry| entry.card.key() == *key)
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn pool(&self) -> &[PoolEntry] {
        &self.pool
    }

    /// 보유 목록에서 한 장을 덱에 넣는다
    pub fn add(&mut self, pool_index: usize) -> Result<(), GameError> {
        self.ensure_editable()?;
        let entry = self.pool.get_mut(pool_index).ok_or(GameError::OutOfBounds)?;
        if entry.out_count == 0 || self.deck.len() >= self.deck_size {
            return Err(GameError::InvalidAction);
        }
        entry.out_count -= 1;
        let card = entry.card.clone();
        debug!("Deck edit add {} ({} cards)", card.key(), self.deck.len() + 1);
        self.deck.add(card);
        Ok(())
    }

    /// 덱에서 한 장을 빼서 보유 목록으로 돌린다
    ///
    /// 보유 목록에 없는 카드면 덱은 그대로 두고 InvariantViolation.
    pub fn remove(&mut self, deck_index: usize) -> Result<(), GameError> {
        self.ensure_editable()?;
        let key = self
            .deck
            .entry(deck_index)
            .ok_or(GameError::OutOfBounds)?
            .card
            .key();
        let entry = self.pool_entry_mut(&key).ok_or_else(|| {
            GameError::invariant(format!("deck card {} missing from inventory", key))
        })?;
        entry.out_count += 1;
        self.deck.remove(deck_index)?;
        debug!("Deck edit remove {} ({} cards)", key, self.deck.len());
        Ok(())
    }

    /// 연 시점의 덱으로 되돌림
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.ensure_editable()?;
        self.deck = self.snapshot.clone();
        self.rebuild_pool();
        Ok(())
    }

    pub fn can_finish(&self) -> bool {
        self.deck.len() == self.deck_size
    }

    /// 확정된 덱 (id 순 정렬). 장수가 모자라면 거부
    pub fn finish(mut self) -> Result<Deck, Self> {
        if !self.can_finish() {
            return Err(self);
        }
        self.deck.sort();
        info!("Deck edit finished: {} cards", self.deck.len());
        Ok(self.deck)
    }

    /// 편집 중 덱 항목 (UI 용)
    pub fn entries(&self) -> &[DeckEntry] {
        self.deck.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::data::card_data::{CardEffects, EffectKind, ValueRange};

    fn card(id: u32) -> CardData {
        CardData {
            id,
            name: format!("card {}", id),
            detail: String::new(),
            effects: CardEffects {
                kind: EffectKind::Heal,
                rank: Some(1),
                value: None,
                random_range: Some(ValueRange::new(1, 2)),
            },
        }
    }

    fn setup(deck_len: usize, owned: u32) -> (Deck, CardInventory) {
        let deck = Deck::new((0..deck_len).map(|_| card(1)).collect());
        let mut inventory = CardInventory::new();
        inventory.add(&card(1), owned);
        inventory.add(&card(2), 2);
        (deck, inventory)
    }

    #[test]
    fn pool_counts_cards_outside_deck() {
        let (deck, inventory) = setup(3, 5);
        let editor = DeckEditor::open(&deck, &inventory, 5);
        assert_eq!(editor.pool()[0].out_count, 2);
        assert_eq!(editor.pool()[1].out_count, 2);
    }

    #[test]
    fn add_stops_at_deck_size_and_stock() {
        let (deck, inventory) = setup(3, 4);
        let mut editor = DeckEditor::open(&deck, &inventory, 5);
        editor.add(0).unwrap();
        assert_eq!(editor.add(0), Err(GameError::InvalidAction)); // 재고 없음
        editor.add(1).unwrap();
        assert_eq!(editor.add(1), Err(GameError::InvalidAction)); // 덱 가득
        assert_eq!(editor.add(9), Err(GameError::OutOfBounds));
        assert!(editor.can_finish());
    }

    #[test]
    fn remove_and_reset_restore_counts() {
        let (deck, inventory) = setup(5, 5);
        let mut editor = DeckEditor::open(&deck, &inventory, 5);
        editor.remove(0).unwrap();
        assert_eq!(editor.pool()[0].out_count, 1);
        assert!(!editor.can_finish());

        editor.reset().unwrap();
        assert_eq!(editor.deck().len(), 5);
        assert_eq!(editor.pool()[0].out_count, 0);
    }

    #[test]
    fn finish_requires_exact_size_and_sorts() {
        let (deck, inventory) = setup(4, 4);
        let mut editor = DeckEditor::open(&deck, &inventory, 5);
        let editor_back = editor.clone().finish().unwrap_err();
        assert_eq!(editor_back.deck().len(), 4);

        editor.add(1).unwrap();
        editor.remove(0).unwrap();
        editor.add(0).unwrap();
        let deck = editor.finish().unwrap();
        let ids: Vec<u32> = deck.entries().iter().map(|e| e.card.id).collect();
        assert_eq!(ids, vec![1, 1, 1, 1, 2]);
    }

    #[test]
    fn read_only_editor_rejects_every_change() {
        let (deck, inventory) = setup(5, 5);
        let mut editor = DeckEditor::open_read_only(&deck, &inventory, 5);
        assert!(editor.is_read_only());

        assert_eq!(editor.add(1), Err(GameError::InvalidAction));
        assert_eq!(editor.remove(0), Err(GameError::InvalidAction));
        assert_eq!(editor.reset(), Err(GameError::InvalidAction));
        assert_eq!(editor.deck().len(), 5);
        assert_eq!(editor.pool()[1].out_count, 2);

        let deck = editor.finish().unwrap();
        assert_eq!(deck.len(), 5);
    }

    #[test]
    fn remove_of_unowned_card_keeps_deck() {
        // 보유 목록에 없는 카드 3 이 덱에 섞인 상태
        let (mut deck, inventory) = setup(4, 4);
        deck.add(card(3));
        let mut editor = DeckEditor::open(&deck, &inventory, 5);

        let err = editor.remove(4).unwrap_err();

        assert!(matches!(err, GameError::InvariantViolation(_)));
        assert_eq!(editor.deck().len(), 5);
        assert_eq!(editor.deck().entry(4).unwrap().card.id, 3);
        assert_eq!(editor.remove(9), Err(GameError::OutOfBounds));
    }
}
