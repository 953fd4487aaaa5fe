use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::game::{
    behavior::GameError,
    data::{
        card_data::CardDatabase, endless_pools::EndlessPools, enemy_data::EnemyDatabase,
        stage_data::StageDatabase,
    },
};

// 전투 / 맵 카드 카탈로그
pub mod card_data;

// 엔드리스 모드 적/보스 후보 풀
pub mod endless_pools;

// 적 정보
pub mod enemy_data;

// 스테이지 테이블
pub mod stage_data;

/// 세션 시작 때 한 번 로드되고 이후 불변인 카탈로그 묶음
#[derive(Debug, Clone)]
pub struct GameDataBase {
    pub battle_cards: Arc<CardDatabase>,
    pub map_cards: Arc<CardDatabase>,
    pub enemy_data: Arc<EnemyDatabase>,
    pub stage_data: Arc<StageDatabase>,
    pub endless_pools: Arc<EndlessPools>,
}

/// RON 원문 묶음
pub struct RonSources<'a> {
    pub battle_cards: &'a str,
    pub map_cards: &'a str,
    pub enemies: &'a str,
    pub stages: &'a str,
    pub endless_pools: &'a str,
}

fn parse<T: DeserializeOwned>(name: &str, source: &str) -> Result<T, GameError> {
    ron::de::from_str(source).map_err(|e| GameError::DataLoad(format!("{}: {}", name, e)))
}

impl GameDataBase {
    pub fn new(
        battle_cards: CardDatabase,
        map_cards: CardDatabase,
        enemy_data: EnemyDatabase,
        stage_data: StageDatabase,
        endless_pools: EndlessPools,
    ) -> Self {
        Self {
            battle_cards: Arc::new(battle_cards),
            map_cards: Arc::new(map_cards),
            enemy_data: Arc::new(enemy_data),
            stage_data: Arc::new(stage_data),
            endless_pools: Arc::new(endless_pools),
        }
    }

    /// 컴파일 타임에 포함된 game_resources/data/*.ron 로드
    pub fn load_embedded() -> Result<Self, GameError> {
        Self::from_ron_strs(RonSources {
            battle_cards: include_str!("../../../game_resources/data/battle_cards.ron"),
            map_cards: include_str!("../../../game_resources/data/map_cards.ron"),
            enemies: include_str!("../../../game_resources/data/enemies.ron"),
            stages: include_str!("../../../game_resources/data/stages.ron"),
            endless_pools: include_str!("../../../game_resources/data/endless_pools.ron"),
        })
    }

    pub fn from_ron_strs(sources: RonSources<'_>) -> Result<Self, GameError> {
        let battle_cards: CardDatabase = parse("battle_cards.ron", sources.battle_cards)?;
        let map_cards: CardDatabase = parse("map_cards.ron", sources.map_cards)?;
        let enemy_data: EnemyDatabase = parse("enemies.ron", sources.enemies)?;
        let stage_data: StageDatabase = parse("stages.ron", sources.stages)?;
        let endless_pools: EndlessPools = parse("endless_pools.ron", sources.endless_pools)?;

        info!(
            "Catalog loaded: {} battle cards, {} map cards, {} enemies, {} stages",
            battle_cards.cards.len(),
            map_cards.cards.len(),
            enemy_data.enemies.len(),
            stage_data.stages.len()
        );

        Ok(Self::new(
            battle_cards,
            map_cards,
            enemy_data,
            stage_data,
            endless_pools,
        ))
    }
}
