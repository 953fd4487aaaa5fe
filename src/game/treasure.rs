use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    config::RunConfig,
    game::{
        behavior::GameError, data::card_data::CardData, endless::StageContent,
        roll::random_int,
    },
};

/// 보물에서 보이는 카드 후보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasureOffer {
    pub choices: Vec<CardData>,
}

impl TreasureOffer {
    /// 고른 카드를 꺼낸다. 제안은 소모됨
    pub fn claim(mut self, choice_index: usize) -> Result<CardData, GameError> {
        if choice_index >= self.choices.len() {
            return Err(GameError::OutOfBounds);
        }
        Ok(self.choices.swap_remove(choice_index))
    }
}

/// 보상 등급 (스테이지 드롭 랭크 + 레어 확률)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTable {
    pub rank: u8,
    pub rare_drop_rate: u32,
}

/// 후보 카드 id 하나를 굴린다
///
/// 공격 카드면 랭크가 확률로 한 단계 오른다. 보조 카드는 랭크 상승이 없다.
pub fn roll_treasure_id<R: Rng>(drop: DropTable, config: &RunConfig, rng: &mut R) -> u32 {
    let is_attack = random_int(0, 100, rng) > config.support_drop_threshold;
    let is_rank_up = random_int(0, 100, rng) < drop.rare_drop_rate as i32;

    if is_attack {
        let rank = if is_rank_up && drop.rank < config.max_rank {
            drop.rank + 1
        } else {
            drop.rank
        }
        .max(1);
        let base = 1 + (rank as i32 - 1) * 3;
        return (base + random_int(0, 2, rng)) as u32;
    }

    let mut support = vec![0, 10, 11];
    if drop.rank > 1 {
        support.extend([12, 13]);
    }
    if drop.rank > 2 {
        support.push(14);
    }
    support[random_int(0, support.len() as i32 - 1, rng) as usize]
}

/// 서로 다른 카드 N 장 제안
///
/// 자리마다 최대 treasure_attempts 번 재시도하고, 끝내 못 채우면 모인 만큼만.
pub fn roll_treasure(
    drop: DropTable,
    content: &dyn StageContent,
    stage_index: u32,
    config: &RunConfig,
    mut rng: &mut dyn RngCore,
) -> Result<TreasureOffer, GameError> {
    let mut ids: Vec<u32> = Vec::with_capacity(config.treasure_choices);
    'slots: for _ in 0..config.treasure_choices {
        for _ in 0..config.treasure_attempts {
            let id = roll_treasure_id(drop, config, &mut rng);
            if !ids.contains(&id) {
                ids.push(id);
                continue 'slots;
            }
        }
        warn!("Treasure slot gave up after {} tries", config.treasure_attempts);
        break;
    }

    let choices = ids
        .into_iter()
        .map(|id| content.battle_card(id, stage_index, &mut *rng))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        "Treasure offer (rank {}): {:?}",
        drop.rank,
        choices.iter().map(|c| c.id).collect::<Vec<_>>()
    );
    Ok(TreasureOffer { choices })
}
