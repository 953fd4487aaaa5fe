use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::MapConfig,
    game::{
        behavior::GameError,
        data::{
            card_data::{CardData, CardDatabase, EffectKind},
            stage_data::StageData,
        },
        map::MoveRequest,
        roll::random_int,
    },
};

pub const MOVE_RIGHT_ID: u32 = 0;
pub const MOVE_UP_ID: u32 = 1;
pub const MOVE_DOWN_ID: u32 = 2;
pub const TELEPORT_ID: u32 = 3;
pub const REST_ID: u32 = 4;

/// 탐험 중 손에 든 맵 카드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapHand {
    cards: Vec<CardData>,
    capacity: usize,
}

impl MapHand {
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

    pub fn contains_id(&self, id: u32) -> bool {
        self.cards.iter().any(|card| card.id == id)
    }

    pub fn has_right_move(&self) -> bool {
        self.cards.iter().any(|card| card.kind().grants_right_move())
    }

    pub fn remove(&mut self, index: usize) -> Result<CardData, GameError> {
        if index >= self.cards.len() {
            return Err(GameError::CardNotInHand);
        }
        Ok(self.cards.remove(index))
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// capacity 까지 새 맵 카드로 채운다
    ///
    /// 휴식 카드가 만들어지면 스테이지의 휴식 카드 예산이 줄어든다.
    pub fn refill<R: Rng>(
        &mut self,
        catalog: &CardDatabase,
        stage: &mut StageData,
        config: &MapConfig,
        rng: &mut R,
    ) -> Result<Vec<CardData>, GameError> {
        let mut made = Vec::new();
        while self.cards.len() < self.capacity {
            let id = random_map_card_id(self, stage, config, rng);
            let card = catalog.resolve(id, rng)?;
            self.cards.push(card.clone());
            made.push(card);
        }
        Ok(made)
    }
}

/// 새 맵 카드 id 결정
///
/// 오른쪽으로 갈 카드가 없으면 무조건 0. 그 외엔 누적 임계값으로 최대 N 번 굴리고,
/// 끝까지 못 정하면 0.
pub fn random_map_card_id<R: Rng>(
    hand: &MapHand,
    stage: &mut StageData,
    config: &MapConfig,
    rng: &mut R,
) -> u32 {
    if !hand.has_right_move() {
        return MOVE_RIGHT_ID;
    }

    let thresholds = &config.card_thresholds;
    for _ in 0..config.card_generation_attempts {
        let roll = random_int(0, 100, rng);
        if roll <= thresholds.right {
            return MOVE_RIGHT_ID;
        } else if roll <= thresholds.up {
            if !hand.contains_id(MOVE_UP_ID) {
                return MOVE_UP_ID;
            }
        } else if roll <= thresholds.down {
            if !hand.contains_id(MOVE_DOWN_ID) {
                return MOVE_DOWN_ID;
            }
        } else if roll <= thresholds.teleport {
            return TELEPORT_ID;
        } else if roll <= thresholds.rest
            && !hand.contains_id(REST_ID)
            && stage.remaining_rest_cards > 0
        {
            stage.rest_card_count(1);
            debug!("Rest card made ({} left)", stage.remaining_rest_cards);
            return REST_ID;
        }
    }
    MOVE_RIGHT_ID
}

/// 맵 카드가 요구하는 이동. 휴식이면 None
pub fn move_request(card: &CardData) -> Option<MoveRequest> {
    match card.kind() {
        EffectKind::MoveRight => Some(MoveRequest::Right(card.value())),
        EffectKind::Teleport => Some(MoveRequest::Teleport(card.value())),
        EffectKind::MoveUp => Some(MoveRequest::Up),
        EffectKind::MoveDown => Some(MoveRequest::Down),
        _ => None,
    }
}
