use serde::{Deserialize, Serialize};

/// 마법 속성
///
/// 상성은 순환 구조 (Fire 는 Ice 에, Ice 는 Wind 에, Wind 는 Fire 에 약함)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Ice,
    Wind,
}

impl Element {
    pub const ALL: [Element; 3] = [Element::Fire, Element::Ice, Element::Wind];

    /// 이 속성을 가진 대상이 약한 속성
    pub fn weakness(self) -> Element {
        match self {
            Element::Fire => Element::Ice,
            Element::Ice => Element::Wind,
            Element::Wind => Element::Fire,
        }
    }

    /// 공격 속성이 대상 속성의 약점을 찌르는지
    pub fn beats(self, target: Element) -> bool {
        target.weakness() == self
    }

    /// "fire_3" 같은 id 접두사에서 속성 추출
    pub fn from_prefix(prefix: &str) -> Option<Element> {
        match prefix {
            "fire" => Some(Element::Fire),
            "ice" => Some(Element::Ice),
            "wind" => Some(Element::Wind),
            _ => None,
        }
    }
}

/// 상태 이상 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConditionKind {
    Sleeped,
    Cursed,
    Analyzed,
    /// 턴 수가 아니라 저장된 위력. 소비될 때까지 유지
    Charged,
}

impl ConditionKind {
    pub fn is_timer(self) -> bool {
        !matches!(self, ConditionKind::Charged)
    }
}

/// 맵 위 오브젝트 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapObjectType {
    Player,
    Enemy,
    Treasure,
    DeckEdit,
}

/// 진행 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Normal,
    Endless,
}

/// 전투 대상
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Player,
    Enemy,
}

/// 엔드리스 모드 난이도 구간
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Weak,
    Normal,
    Strong,
}
