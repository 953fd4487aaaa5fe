use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    config::PlayerConfig,
    game::{
        behavior::GameError,
        condition::Condition,
        data::card_data::{CardData, CardDatabase},
        deck::Deck,
        inventory::CardInventory,
    },
};

/// 런 전체에 걸쳐 유지되는 플레이어 상태
///
/// Clone 이 곧 깊은 복사. 게임오버 롤백용 스냅샷도 이걸로 만든다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerData {
    pub heart_point: i32,
    pub max_heart_point: Option<i32>,
    pub deck: Deck,
    pub inventory: CardInventory,
    pub condition: Condition,
}

impl PlayerData {
    pub fn new(heart_point: i32, max_heart_point: Option<i32>, deck: Deck) -> Self {
        Self {
            heart_point,
            max_heart_point,
            deck,
            inventory: CardInventory::new(),
            condition: Condition::new(),
        }
    }

    /// 설정의 초기 덱/인벤토리로 새 플레이어 생성
    pub fn new_initial<R: Rng>(
        cards: &CardDatabase,
        config: &PlayerConfig,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        let deck_cards = config
            .initial_deck
            .iter()
            .map(|id| cards.resolve(*id, rng))
            .collect::<Result<Vec<_>, _>>()?;

        let mut player = Self::new(
            config.initial_heart_point,
            Some(config.initial_max_heart_point),
            Deck::new(deck_cards),
        );
        for seed in &config.initial_inventory {
            let template = cards.template(seed.card_id)?;
            player.inventory.add(template, seed.count);
        }
        Ok(player)
    }

    /// 최대 체력을 넘지 않게 회복. 실제 회복량 반환
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.heart_point;
        let mut after = before + amount;
        if let Some(max) = self.max_heart_point {
            after = after.min(max.max(before));
        }
        self.heart_point = after;
        after - before
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.heart_point -= amount;
    }

    /// 클리어 보너스 등으로 최대 체력과 현재 체력을 함께 올림
    pub fn grow(&mut self, amount: i32) {
        if let Some(max) = self.max_heart_point.as_mut() {
            *max += amount;
        }
        self.heart_point += amount;
    }

    pub fn add_card(&mut self, card: &CardData) {
        self.inventory.add(card, 1);
    }

    /// 체력이 0 이하이거나 쓸 수 있는 카드가 없으면 쓰러짐
    pub fn is_fainted(&self) -> bool {
        self.heart_point <= 0 || self.deck.not_used_count() == 0
    }
}
