// 전투 (패, 효과 해석, 턴 진행)
pub mod battle;

// 입력 / 이벤트 / 신호 / 에러 타입
pub mod behavior;

// 상태 이상 타이머
pub mod condition;

// 카탈로그
pub mod data;

// 덱 상태 머신
pub mod deck;

// 덱 편집
pub mod deck_edit;

// 시드 파생
pub mod determinism;

// 엔드리스 모드 생성기, 모드별 스테이지 구성
pub mod endless;

pub mod enemy;
pub mod enums;
pub mod inventory;

// 맵 격자, 배치, 맵 카드
pub mod map;

pub mod player;

// 타이틀 / 게임오버 / 클리어 선택지
pub mod prompt;

// 난수 유틸
pub mod roll;

// 런 진행
pub mod session;

// 보물 보상
pub mod treasure;
