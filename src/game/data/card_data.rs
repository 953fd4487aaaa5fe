use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::{behavior::GameError, enums::Element, roll::random_int};

/// 카드 값의 무작위 범위 (양 끝 포함)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueRange {
    pub lo: i32,
    pub hi: i32,
}

impl ValueRange {
    pub fn new(lo: i32, hi: i32) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, value: i32) -> bool {
        value >= self.lo && value <= self.hi
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}

/// 카드 효과 종류 (닫힌 합 타입)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Attack(Element),
    Heal,
    Charge,
    Analyze,
    Curse,
    Sleep,
    Dual,
    MoveRight,
    Teleport,
    MoveUp,
    MoveDown,
    Rest,
}

impl EffectKind {
    pub fn is_attack(self) -> bool {
        matches!(self, EffectKind::Attack(_))
    }

    pub fn is_map_action(self) -> bool {
        matches!(
            self,
            EffectKind::MoveRight
                | EffectKind::Teleport
                | EffectKind::MoveUp
                | EffectKind::MoveDown
                | EffectKind::Rest
        )
    }

    /// 오른쪽 이동을 주는 맵 카드인지
    pub fn grants_right_move(self) -> bool {
        matches!(self, EffectKind::MoveRight | EffectKind::Teleport)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEffects {
    pub kind: EffectKind,
    #[serde(default)]
    pub rank: Option<u8>,
    #[serde(default)]
    pub value: Option<i32>,
    #[serde(default)]
    pub random_range: Option<ValueRange>,
}

/// 카드 템플릿이자 인스턴스
///
/// 카탈로그의 템플릿은 읽기 전용이고, 덱/인벤토리는 복사본을 가진다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardData {
    pub id: u32,
    pub name: String,
    pub detail: String,
    pub effects: CardEffects,
}

impl CardData {
    pub fn kind(&self) -> EffectKind {
        self.effects.kind
    }

    pub fn element(&self) -> Option<Element> {
        match self.effects.kind {
            EffectKind::Attack(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_attack(&self) -> bool {
        self.effects.kind.is_attack()
    }

    pub fn is_dual(&self) -> bool {
        self.effects.kind == EffectKind::Dual
    }

    pub fn rank(&self) -> u8 {
        self.effects.rank.unwrap_or(0)
    }

    pub fn value(&self) -> i32 {
        self.effects.value.unwrap_or(0)
    }

    pub fn key(&self) -> CardKey {
        CardKey {
            id: self.id,
            range: self.effects.random_range,
        }
    }
}

/// 인벤토리 키. 같은 id 라도 범위가 다르면 다른 항목
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardKey {
    pub id: u32,
    pub range: Option<ValueRange>,
}

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.range {
            Some(range) => write!(f, "{}-{}", self.id, range),
            None => write!(f, "{}", self.id),
        }
    }
}

/// 템플릿을 복사하고, 범위가 있으면 균등 추첨한 값을 고정
pub fn resolve_uniform<R: Rng>(template: &CardData, rng: &mut R) -> CardData {
    let mut card = template.clone();
    if let Some(range) = card.effects.random_range {
        card.effects.value = Some(random_int(range.lo, range.hi, rng));
    }
    card
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDatabase {
    pub cards: Vec<CardData>,
}

impl CardDatabase {
    pub fn new(cards: Vec<CardData>) -> Self {
        Self { cards }
    }

    pub fn get_by_id(&self, id: u32) -> Option<&CardData> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn template(&self, id: u32) -> Result<&CardData, GameError> {
        self.get_by_id(id)
            .ok_or_else(|| GameError::NotFound(format!("card {}", id)))
    }

    /// 균등 추첨으로 인스턴스 생성
    pub fn resolve<R: Rng>(&self, id: u32, rng: &mut R) -> Result<CardData, GameError> {
        Ok(resolve_uniform(self.template(id)?, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn fire_bolt() -> CardData {
        CardData {
            id: 1,
            name: "Fire Bolt".to_string(),
            detail: "".to_string(),
            effects: CardEffects {
                kind: EffectKind::Attack(Element::Fire),
                rank: Some(1),
                value: None,
                random_range: Some(ValueRange::new(2, 4)),
            },
        }
    }

    #[test]
    fn resolve_copies_template_and_fixes_value() {
        let db = CardDatabase::new(vec![fire_bolt()]);
        let mut rng = StdRng::seed_from_u64(5);

        let card = db.resolve(1, &mut rng).unwrap();
        assert!(ValueRange::new(2, 4).contains(card.value()));
        // 템플릿은 그대로
        assert_eq!(db.get_by_id(1).unwrap().effects.value, None);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let db = CardDatabase::new(vec![fire_bolt()]);
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(
            db.resolve(42, &mut rng),
            Err(GameError::NotFound("card 42".to_string()))
        );
    }

    #[test]
    fn key_distinguishes_ranges() {
        let a = fire_bolt();
        let mut b = fire_bolt();
        b.effects.random_range = Some(ValueRange::new(5, 9));
        assert_ne!(a.key(), b.key());
        assert_eq!(a.key().to_string(), "1-2-4");
    }
}
