use serde::{Deserialize, Serialize};

use crate::game::enums::Tier;

/// 난이도 구간 하나의 적/보스 후보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPool {
    pub enemy_ids: Vec<String>,
    pub boss_ids: Vec<String>,
}

/// 엔드리스 모드 후보 풀 (weak / normal / strong)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndlessPools {
    pub weak: TierPool,
    pub normal: TierPool,
    pub strong: TierPool,
}

impl EndlessPools {
    pub fn pool(&self, tier: Tier) -> &TierPool {
        match tier {
            Tier::Weak => &self.weak,
            Tier::Normal => &self.normal,
            Tier::Strong => &self.strong,
        }
    }
}
