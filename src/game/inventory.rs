use serde::{Deserialize, Serialize};

use crate::game::{
    behavior::GameError,
    data::card_data::{CardData, CardKey},
};

/// 보유 카드 한 종류
///
/// card 는 덱에 넣을 때 복사할 대표 템플릿 (범위 포함, 값 미확정).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub card: CardData,
    pub count: u32,
}

impl InventoryEntry {
    pub fn key(&self) -> CardKey {
        self.card.key()
    }
}

/// (카드 id, 범위) 키별 보유 수량
///
/// JSON 으로 그대로 직렬화되도록 키 순서로 정렬된 목록으로 저장한다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInventory {
    entries: Vec<InventoryEntry>,
}

impl CardInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    pub fn count(&self, key: &CardKey) -> u32 {
        self.entries
            .iter()
            .find(|entry| entry.key() == *key)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }

    pub fn get(&self, key: &CardKey) -> Option<&InventoryEntry> {
        self.entries.iter().find(|entry| entry.key() == *key)
    }

    /// 카드 한 장 추가. 처음 보는 키면 값을 지운 템플릿으로 새 항목을 만든다.
    pub fn add(&mut self, card: &CardData, amount: u32) {
        let key = card.key();
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.key() == key) {
            entry.count += amount;
            return;
        }

        let mut template = card.clone();
        if template.effects.random_range.is_some() {
            template.effects.value = None;
        }
        let position = self
            .entries
            .iter()
            .position(|entry| entry.key() > key)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            position,
            InventoryEntry {
                card: template,
                count: amount,
            },
        );
    }

    pub fn remove(&mut self, key: &CardKey, amount: u32) -> Result<(), GameError> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.key() == *key)
            .ok_or_else(|| GameError::NotFound(format!("inventory {}", key)))?;
        let entry = &mut self.entries[index];
        if entry.count < amount {
            return Err(GameError::InvalidAction);
        }
        entry.count -= amount;
        if entry.count == 0 {
            self.entries.remove(index);
        }
        Ok(())
    }

    pub fn total(&self) -> u32 {
        self.entries.iter().map(|entry| entry.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        data::card_data::{CardEffects, EffectKind, ValueRange},
        enums::Element,
    };

    fn bolt(range: ValueRange, value: i32) -> CardData {
        CardData {
            id: 1,
            name: "Fire Bolt".to_string(),
            detail: String::new(),
            effects: CardEffects {
                kind: EffectKind::Attack(Element::Fire),
                rank: Some(1),
                value: Some(value),
                random_range: Some(range),
            },
        }
    }

    #[test]
    fn same_id_different_range_are_separate_entries() {
        let mut inventory = CardInventory::new();
        inventory.add(&bolt(ValueRange::new(2, 4), 3), 1);
        inventory.add(&bolt(ValueRange::new(2, 4), 2), 1);
        inventory.add(&bolt(ValueRange::new(5, 9), 6), 1);

        assert_eq!(inventory.entries().len(), 2);
        assert_eq!(inventory.count(&bolt(ValueRange::new(2, 4), 0).key()), 2);
        assert_eq!(inventory.count(&bolt(ValueRange::new(5, 9), 0).key()), 1);
        assert_eq!(inventory.total(), 3);
        // 저장된 템플릿은 값이 비어 있음
        assert_eq!(inventory.entries()[0].card.effects.value, None);
    }

    #[test]
    fn remove_drops_empty_entries() {
        let mut inventory = CardInventory::new();
        let card = bolt(ValueRange::new(2, 4), 3);
        inventory.add(&card, 2);
        inventory.remove(&card.key(), 2).unwrap();
        assert!(inventory.entries().is_empty());
        assert!(inventory.remove(&card.key(), 1).is_err());
    }
}
