use serde::{Deserialize, Serialize};

use crate::game::{
    data::card_data::CardData,
    enemy::Actability,
    enums::{ConditionKind, Target},
};

pub mod hand;
pub mod resolver;
pub mod sequencer;

pub use hand::Hand;
pub use resolver::EffectResolver;
pub use sequencer::{Battle, BattlePhase, DualSelection};

/// 전투 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleResult {
    EnemyDefeated,
    PlayerFainted,
}

/// 특수 카드가 거부된 이유
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenyReason {
    /// charge 에 쓸 카드가 부족
    NotEnoughCards,
    /// dual 과 함께 낼 카드가 없음
    NoDualPartner,
}

/// 표시 레이어로 나가는 전투 기록
///
/// 코어는 기록을 남기고 바로 다음 상태로 진행한다. 연출 완료를 기다리지 않는다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    CardDrawn {
        card: CardData,
    },
    CardPlayed {
        card: CardData,
    },
    Damage {
        target: Target,
        amount: i32,
        was_weak: bool,
        quake: bool,
    },
    Healed {
        amount: i32,
        heart_point: i32,
    },
    StatusApplied {
        target: Target,
        condition: ConditionKind,
        turns: i32,
    },
    StatusResisted {
        target: Target,
        condition: ConditionKind,
    },
    StatusExpired {
        target: Target,
        condition: ConditionKind,
    },
    ChargeStored {
        power: i32,
        total: i32,
    },
    ChargeReleased {
        power: i32,
    },
    ActionDenied {
        card_id: u32,
        reason: DenyReason,
    },
    EnemyBlocked {
        reason: Actability,
    },
    /// dual 발동 중 추가 선택 요청. 선택 가능한 패 인덱스
    SelectionRequested {
        eligible: Vec<usize>,
    },
    SelectionCancelled,
    BattleEnded {
        result: BattleResult,
    },
}

/// 피해 연출의 화면 흔들림 여부. 음수(회복 표시)만 흔들지 않는다.
pub fn quake_for(amount: i32) -> bool {
    amount >= 0
}
