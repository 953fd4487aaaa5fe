use serde::{Deserialize, Serialize};

/// 스테이지 테이블 한 줄
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageMetadata {
    pub enemy_ids: Vec<String>,
    pub boss_id: String,
    pub length: i32,
    pub drop_rank: u8,
    pub rare_drop_rate: u32,
    pub remaining_rest_cards: i32,
}

/// 진행 중인 스테이지 상태
///
/// 스테이지 진입 때 새로 만들어지고 나갈 때 버려진다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageData {
    pub stage_index: u32,
    pub enemy_ids: Vec<String>,
    pub boss_id: String,
    pub to_goal_length: i32,
    pub drop_rank: u8,
    pub rare_drop_rate: u32,
    pub remaining_rest_cards: i32,
}

impl StageData {
    pub fn from_metadata(stage_index: u32, meta: &StageMetadata) -> Self {
        Self {
            stage_index,
            enemy_ids: meta.enemy_ids.clone(),
            boss_id: meta.boss_id.clone(),
            to_goal_length: meta.length,
            drop_rank: meta.drop_rank,
            rare_drop_rate: meta.rare_drop_rate,
            remaining_rest_cards: meta.remaining_rest_cards,
        }
    }

    /// 오른쪽 이동량만큼 남은 거리 감소 (0 아래로 내려가지 않음)
    pub fn move_count(&mut self, distance_x: i32) {
        self.to_goal_length = (self.to_goal_length - distance_x).max(0);
    }

    pub fn rest_card_count(&mut self, made: i32) {
        self.remaining_rest_cards = (self.remaining_rest_cards - made).max(0);
    }

    pub fn is_goal_reached(&self) -> bool {
        self.to_goal_length == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDatabase {
    pub stages: Vec<StageMetadata>,
}

impl StageDatabase {
    pub fn new(stages: Vec<StageMetadata>) -> Self {
        Self { stages }
    }

    /// 1 부터 시작하는 스테이지 번호. 테이블 끝을 넘으면 None (게임 클리어)
    pub fn get(&self, stage_index: u32) -> Option<StageData> {
        let slot = stage_index.checked_sub(1)? as usize;
        self.stages
            .get(slot)
            .map(|meta| StageData::from_metadata(stage_index, meta))
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> StageMetadata {
        StageMetadata {
            enemy_ids: vec!["fire_0".to_string()],
            boss_id: "boss_0".to_string(),
            length: 10,
            drop_rank: 1,
            rare_drop_rate: 10,
            remaining_rest_cards: 2,
        }
    }

    #[test]
    fn counters_floor_at_zero() {
        let mut stage = StageData::from_metadata(1, &meta());
        stage.move_count(4);
        assert_eq!(stage.to_goal_length, 6);
        stage.move_count(9);
        assert_eq!(stage.to_goal_length, 0);
        assert!(stage.is_goal_reached());

        stage.rest_card_count(1);
        stage.rest_card_count(5);
        assert_eq!(stage.remaining_rest_cards, 0);
    }

    #[test]
    fn lookup_past_the_end_is_none() {
        let db = StageDatabase::new(vec![meta()]);
        assert!(db.get(1).is_some());
        assert!(db.get(2).is_none());
        assert!(db.get(0).is_none());
    }
}
