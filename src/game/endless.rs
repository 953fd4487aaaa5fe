use std::collections::HashMap;

use rand::{Rng, RngCore};
use tracing::{debug, info};

use crate::{
    config::EndlessConfig,
    game::{
        behavior::GameError,
        data::{
            card_data::{CardData, EffectKind, ValueRange},
            stage_data::StageData,
            GameDataBase,
        },
        enemy::EnemyState,
        enums::{Element, GameMode, Tier},
        roll::{biased_random_int, ceil_div, random_int},
    },
};

// ============================================================
// 층 기반 수식 (floor 는 0 부터)
// ============================================================

pub fn tier_for_floor(floor: u32, config: &EndlessConfig) -> Tier {
    if floor >= config.strong_tier_floor {
        Tier::Strong
    } else if floor >= config.normal_tier_floor {
        Tier::Normal
    } else {
        Tier::Weak
    }
}

pub fn enemy_heart_point(floor: u32) -> i32 {
    let f = floor as i32;
    6 + 4 * f + ceil_div(f, 5)
}

pub fn enemy_attack_point(floor: u32) -> i32 {
    let f = floor as i32;
    f + ceil_div(f, 5)
}

/// 층에 맞춰 능력치를 계산한 적
///
/// id 접두어가 속성 이름이면 그 속성, 아니면 무작위 속성.
pub fn generate_enemy<R: Rng>(id: &str, floor: u32, rng: &mut R) -> EnemyState {
    let prefix = id.split('_').next().unwrap_or_default();
    let element = Element::from_prefix(prefix)
        .unwrap_or_else(|| Element::ALL[random_int(0, Element::ALL.len() as i32 - 1, rng) as usize]);
    EnemyState::new(
        id,
        Some(element),
        enemy_heart_point(floor),
        enemy_attack_point(floor),
    )
}

/// 깊은 층일수록 긴 쪽으로 치우친 스테이지 길이
pub fn stage_length<R: Rng>(floor: u32, config: &EndlessConfig, rng: &mut R) -> i32 {
    let count = ceil_div(floor as i32, config.length_bias_divisor).max(0) as u32;
    biased_random_int(config.length_min, config.length_max, count, rng)
}

/// 엔드리스 층 하나의 스테이지 데이터
pub fn generate_stage<R: Rng>(
    floor: u32,
    data: &GameDataBase,
    config: &EndlessConfig,
    rng: &mut R,
) -> Result<StageData, GameError> {
    let tier = tier_for_floor(floor, config);
    let pool = data.endless_pools.pool(tier);
    if pool.boss_ids.is_empty() || pool.enemy_ids.is_empty() {
        return Err(GameError::EmptyEligibleSet);
    }
    let boss_id = pool.boss_ids[random_int(0, pool.boss_ids.len() as i32 - 1, rng) as usize].clone();
    let reward = config.reward(tier);

    let stage = StageData {
        stage_index: floor + 1,
        enemy_ids: pool.enemy_ids.clone(),
        boss_id,
        to_goal_length: stage_length(floor, config, rng),
        drop_rank: reward.drop_rank,
        rare_drop_rate: reward.rare_drop_rate,
        remaining_rest_cards: reward.rest_cards,
    };
    info!(
        "Endless floor {} ({:?}): length={} boss={}",
        floor, tier, stage.to_goal_length, stage.boss_id
    );
    Ok(stage)
}

/// 랭크와 층으로 정해지는 카드 값 범위. 회복은 2/3 (올림)
pub fn rank_scaled_range(rank: u8, floor: u32, is_heal: bool) -> ValueRange {
    let rank = rank as i32;
    let lo = rank + ceil_div(rank, 2) + 3 * floor as i32;
    let hi = lo + 4;
    if is_heal {
        ValueRange::new(ceil_div(lo * 2, 3), ceil_div(hi * 2, 3))
    } else {
        ValueRange::new(lo, hi)
    }
}

/// 범위 값이 있는 카드만 층 기준 범위로 바꿔 굴린다
pub fn scale_battle_card<R: Rng>(template: &CardData, floor: u32, rng: &mut R) -> CardData {
    let mut card = template.clone();
    if card.effects.random_range.is_none() {
        return card;
    }
    let range = rank_scaled_range(card.rank(), floor, card.kind() == EffectKind::Heal);
    card.effects.random_range = Some(range);
    card.effects.value = Some(random_int(range.lo, range.hi, rng));
    card
}

// ============================================================
// 모드별 스테이지 구성
// ============================================================

/// 스테이지/적/전투 카드를 만들어 주는 쪽
///
/// 일반 모드는 테이블을 그대로, 엔드리스는 층 수식으로 만든다.
pub trait StageContent: Send {
    fn mode(&self) -> GameMode;

    /// None 이면 더 이상 스테이지가 없음 (클리어)
    fn stage(
        &mut self,
        stage_index: u32,
        rng: &mut dyn RngCore,
    ) -> Result<Option<StageData>, GameError>;

    fn enemy(
        &mut self,
        id: &str,
        stage_index: u32,
        rng: &mut dyn RngCore,
    ) -> Result<EnemyState, GameError>;

    fn battle_card(
        &self,
        id: u32,
        stage_index: u32,
        rng: &mut dyn RngCore,
    ) -> Result<CardData, GameError>;
}

pub struct NormalContent {
    data: GameDataBase,
}

impl NormalContent {
    pub fn new(data: GameDataBase) -> Self {
        Self { data }
    }
}

impl StageContent for NormalContent {
    fn mode(&self) -> GameMode {
        GameMode::Normal
    }

    fn stage(
        &mut self,
        stage_index: u32,
        _rng: &mut dyn RngCore,
    ) -> Result<Option<StageData>, GameError> {
        Ok(self.data.stage_data.get(stage_index))
    }

    fn enemy(
        &mut self,
        id: &str,
        _stage_index: u32,
        _rng: &mut dyn RngCore,
    ) -> Result<EnemyState, GameError> {
        self.data
            .enemy_data
            .template(id)
            .map(EnemyState::from_metadata)
    }

    fn battle_card(
        &self,
        id: u32,
        _stage_index: u32,
        mut rng: &mut dyn RngCore,
    ) -> Result<CardData, GameError> {
        self.data.battle_cards.resolve(id, &mut rng)
    }
}

pub struct EndlessContent {
    data: GameDataBase,
    config: EndlessConfig,
    cache: HashMap<String, EnemyState>,
    cached_stage: u32,
}

impl EndlessContent {
    pub fn new(data: GameDataBase, config: EndlessConfig) -> Self {
        Self {
            data,
            config,
            cache: HashMap::new(),
            cached_stage: 0,
        }
    }

    fn floor(stage_index: u32) -> u32 {
        stage_index.saturating_sub(1)
    }
}

impl StageContent for EndlessContent {
    fn mode(&self) -> GameMode {
        GameMode::Endless
    }

    fn stage(
        &mut self,
        stage_index: u32,
        mut rng: &mut dyn RngCore,
    ) -> Result<Option<StageData>, GameError> {
        self.cache.clear();
        self.cached_stage = stage_index;
        generate_stage(Self::floor(stage_index), &self.data, &self.config, &mut rng).map(Some)
    }

    /// 같은 층 안에서는 id 별로 한 번만 만든다
    fn enemy(
        &mut self,
        id: &str,
        stage_index: u32,
        mut rng: &mut dyn RngCore,
    ) -> Result<EnemyState, GameError> {
        if self.cached_stage != stage_index {
            self.cache.clear();
            self.cached_stage = stage_index;
        }
        if let Some(enemy) = self.cache.get(id) {
            return Ok(enemy.clone());
        }
        let enemy = generate_enemy(id, Self::floor(stage_index), &mut rng);
        debug!(
            "Endless enemy {} hp={} atk={}",
            id, enemy.heart_point, enemy.attack_point
        );
        self.cache.insert(id.to_string(), enemy.clone());
        Ok(enemy)
    }

    fn battle_card(
        &self,
        id: u32,
        stage_index: u32,
        mut rng: &mut dyn RngCore,
    ) -> Result<CardData, GameError> {
        let template = self.data.battle_cards.template(id)?;
        Ok(scale_battle_card(template, Self::floor(stage_index), &mut rng))
    }
}
