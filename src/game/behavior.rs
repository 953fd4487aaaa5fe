use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::game::{
    battle::{BattleEvent, BattleResult},
    data::card_data::CardData,
    map::MapEvent,
    player::PlayerData,
    session::SessionState,
};

/// UI 레이어에서 RunSession 으로 전달되는 플레이어 행동
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerBehavior {
    /// 선택지 화면 (타이틀 / 게임오버 / 클리어) 에서 항목 선택
    Choose { option_index: usize },

    // ============================================================
    // 맵 관련 행동
    // ============================================================
    /// 맵 패의 카드 사용
    PlayMapCard { hand_index: usize },

    /// 탐색 중 덱 보기 (읽기 전용)
    OpenDeckEdit,

    // ============================================================
    // 전투 관련 행동
    // ============================================================
    /// 전투 패의 카드 사용
    PlayBattleCard { hand_index: usize },

    /// dual 발동 중 추가 카드 선택
    SelectDualCard { hand_index: usize },

    /// dual 추가 선택 취소
    CancelSelection,

    // ============================================================
    // 보물 관련 행동
    // ============================================================
    ClaimTreasure { choice_index: usize },
    SkipTreasure,

    // ============================================================
    // 덱 편집 관련 행동
    // ============================================================
    AddToDeck { pool_index: usize },
    RemoveFromDeck { deck_index: usize },
    ResetDeckEdit,
    FinishDeckEdit,
}

/// 코어가 표시 레이어로 내보내는 결과 기록
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Battle(BattleEvent),
    Map(MapEvent),
    StageEntered { stage_index: u32, to_goal_length: i32 },
    TreasureOffered { choices: Vec<CardData> },
    CardObtained { card: CardData },
    DeckEditOpened { read_only: bool },
    DeckEditClosed { deck_len: usize },
    ClearBonus { amount: i32 },
}

/// 세션 경계 신호
///
/// 재시작/이어하기에 필요한 PlayerData 를 그대로 실어 보낸다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionSignal {
    BattleCompleted {
        player: PlayerData,
        result: BattleResult,
    },
    StageCleared {
        player: PlayerData,
        stage_index: u32,
    },
    /// 스테이지 시작 시점의 스냅샷
    PlayerFainted {
        snapshot: PlayerData,
        stage_index: u32,
    },
    RunCompleted {
        player: PlayerData,
    },
}

/// execute() 한 번의 응답
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorResult {
    pub state: SessionState,
    pub events: Vec<GameEvent>,
    pub signals: Vec<SessionSignal>,
}

impl BehaviorResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            state,
            events: Vec::new(),
            signals: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameError {
    /// 카탈로그 조회 실패
    NotFound(String),
    /// 뽑을 수 있는 카드가 없음
    EmptyDeck,
    /// 무작위 선택 대상이 비어 있음
    EmptyEligibleSet,
    /// 로직 버그. 조용히 넘기지 말 것
    InvariantViolation(String),
    InvalidAction, // 현재 상태에서 허용되지 않은 행동
    CardNotInHand,
    OutOfBounds,
    PhaseNotReady,
    DataLoad(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::NotFound(id) => write!(f, "NOT_FOUND: {}", id),
            GameError::EmptyDeck => write!(f, "EMPTY_DECK"),
            GameError::EmptyEligibleSet => write!(f, "EMPTY_ELIGIBLE_SET"),
            GameError::InvariantViolation(msg) => write!(f, "INVARIANT_VIOLATION: {}", msg),
            GameError::InvalidAction => write!(f, "INVALID_ACTION"),
            GameError::CardNotInHand => write!(f, "CARD_NOT_IN_HAND"),
            GameError::OutOfBounds => write!(f, "OUT_OF_BOUNDS"),
            GameError::PhaseNotReady => write!(f, "PHASE_NOT_READY"),
            GameError::DataLoad(msg) => write!(f, "DATA_LOAD: {}", msg),
        }
    }
}

impl std::error::Error for GameError {}

impl GameError {
    /// InvariantViolation 생성과 동시에 error 로그
    pub fn invariant(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        error!("invariant violated: {}", msg);
        GameError::InvariantViolation(msg)
    }
}

pub trait LogExt<T> {
    fn log_err(self, context: &str) -> Result<T, GameError>;
}

impl<T> LogExt<T> for Result<T, GameError> {
    fn log_err(self, context: &str) -> Result<T, GameError> {
        if let Err(e) = &self {
            warn!("{}: {}", context, e);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_screaming_codes() {
        assert_eq!(GameError::EmptyDeck.to_string(), "EMPTY_DECK");
        assert_eq!(
            GameError::NotFound("card 99".to_string()).to_string(),
            "NOT_FOUND: card 99"
        );
    }

    #[test]
    fn log_err_passes_value_through() {
        let ok: Result<u32, GameError> = Ok(3);
        assert_eq!(ok.log_err("ctx"), Ok(3));

        let err: Result<u32, GameError> = Err(GameError::OutOfBounds);
        assert_eq!(err.log_err("ctx"), Err(GameError::OutOfBounds));
    }
}
