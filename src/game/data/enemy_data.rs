use serde::{Deserialize, Serialize};

use crate::game::{behavior::GameError, enums::Element};

/// 적 원본 데이터
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyMetadata {
    pub id: String,
    #[serde(default)]
    pub element: Option<Element>,
    pub heart_point: i32,
    pub attack_point: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyDatabase {
    pub enemies: Vec<EnemyMetadata>,
}

impl EnemyDatabase {
    pub fn new(enemies: Vec<EnemyMetadata>) -> Self {
        Self { enemies }
    }

    pub fn get_by_id(&self, id: &str) -> Option<&EnemyMetadata> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    pub fn template(&self, id: &str) -> Result<&EnemyMetadata, GameError> {
        self.get_by_id(id)
            .ok_or_else(|| GameError::NotFound(format!("enemy {}", id)))
    }
}
