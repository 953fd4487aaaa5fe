#![allow(dead_code)]

use forest_core::{
    config::GameBalanceConfig,
    game::{
        data::{
            card_data::{CardData, CardEffects, EffectKind},
            GameDataBase, RonSources,
        },
        deck::Deck,
        enemy::EnemyState,
        enums::{Element, MapObjectType},
        map::{cards::move_request, MoveRequest},
        player::PlayerData,
    },
    BehaviorResult, PlayerBehavior, RunSession, SessionState,
};

/// 컴파일 타임에 포함된 카탈로그
pub fn load_game_data() -> GameDataBase {
    GameDataBase::load_embedded().expect("embedded catalog must parse")
}

/// 카드 카탈로그는 그대로 두고 적/스테이지만 바꾼 데이터
pub fn load_game_data_with(enemies: &str, stages: &str) -> GameDataBase {
    GameDataBase::from_ron_strs(RonSources {
        battle_cards: include_str!("../../game_resources/data/battle_cards.ron"),
        map_cards: include_str!("../../game_resources/data/map_cards.ron"),
        enemies,
        stages,
        endless_pools: include_str!("../../game_resources/data/endless_pools.ron"),
    })
    .expect("custom catalog must parse")
}

// ============================================================
// 카드
// ============================================================

/// 값이 고정된 카드 (뽑을 때 다시 굴리지 않음)
pub fn fixed_card(id: u32, kind: EffectKind, value: Option<i32>) -> CardData {
    CardData {
        id,
        name: format!("card_{}", id),
        detail: String::new(),
        effects: CardEffects {
            kind,
            rank: Some(1),
            value,
            random_range: None,
        },
    }
}

pub fn attack(id: u32, element: Element, value: i32) -> CardData {
    fixed_card(id, EffectKind::Attack(element), Some(value))
}

pub fn heal(id: u32, value: i32) -> CardData {
    fixed_card(id, EffectKind::Heal, Some(value))
}

pub fn analyze(id: u32) -> CardData {
    fixed_card(id, EffectKind::Analyze, None)
}

pub fn dual(id: u32) -> CardData {
    fixed_card(id, EffectKind::Dual, None)
}

pub fn player_with(cards: Vec<CardData>, heart_point: i32) -> PlayerData {
    PlayerData::new(heart_point, Some(heart_point), Deck::new(cards))
}

pub fn plain_enemy(heart_point: i32, attack_point: i32) -> EnemyState {
    EnemyState::new("dummy", None, heart_point, attack_point)
}

// ============================================================
// 세션
// ============================================================

pub fn new_session(seed: u64) -> RunSession {
    RunSession::new(load_game_data(), GameBalanceConfig::default(), seed)
}

/// 시작 직후 맵 패의 오른쪽 이동 한 장으로 같은 줄의 적에 닿는 세션과 그 카드 위치
///
/// 시드를 바꿔 가며 찾는다.
pub fn session_with_enemy_in_reach(balance: GameBalanceConfig) -> (RunSession, usize) {
    for seed in 0..500 {
        let mut session = RunSession::new(load_game_data(), balance.clone(), seed);
        session
            .execute(PlayerBehavior::Choose { option_index: 0 })
            .expect("start must succeed");

        let map = session.map().expect("map must exist");
        let player = map.player_position();
        let reach = session
            .map_hand()
            .cards()
            .iter()
            .enumerate()
            .find_map(|(index, card)| match move_request(card) {
                Some(MoveRequest::Right(distance)) => map
                    .objects()
                    .iter()
                    .any(|o| {
                        o.kind == MapObjectType::Enemy
                            && o.position.y == player.y
                            && o.position.x > player.x
                            && o.position.x <= player.x + distance
                    })
                    .then_some(index),
                _ => None,
            });
        if let Some(hand_index) = reach {
            return (session, hand_index);
        }
    }
    panic!("no seed puts an enemy within one right move");
}

/// 적이 없는 긴 스테이지 하나짜리 데이터. 보상 오브젝트만 깔린다
pub fn load_reward_only_data() -> GameDataBase {
    load_game_data_with(
        r#"(enemies: [
            (id: "old_tree", heart_point: 1, attack_point: 1),
        ])"#,
        r#"(stages: [
            (enemy_ids: [], boss_id: "old_tree", length: 60, drop_rank: 1, rare_drop_rate: 0, remaining_rest_cards: 0),
        ])"#,
    )
}

/// 맵의 덱 편집 오브젝트를 밟아 편집 화면에 들어간 세션
pub fn session_in_map_deck_edit() -> RunSession {
    for seed in 0..100 {
        let mut session = RunSession::new(load_reward_only_data(), GameBalanceConfig::default(), seed);
        run_until(&mut session, 500, |s| s.state() == SessionState::DeckEdit);
        if session.state() == SessionState::DeckEdit {
            return session;
        }
    }
    panic!("no seed reaches a deck edit object");
}

/// 오른쪽 이동 → 텔레포트 → 위/아래 순으로 고르는 자동 진행 정책
pub fn auto_behavior(session: &RunSession) -> Option<PlayerBehavior> {
    use forest_core::game::battle::BattlePhase;

    let behavior = match session.state() {
        SessionState::Title => PlayerBehavior::Choose { option_index: 0 },
        SessionState::Exploring => {
            let cards = session.map_hand().cards();
            let find = |kind: EffectKind| cards.iter().position(|card| card.kind() == kind);

            let hand_index = find(EffectKind::MoveRight)
                .or_else(|| find(EffectKind::Teleport))
                .or_else(|| find(EffectKind::MoveUp))
                .or_else(|| find(EffectKind::MoveDown))
                .unwrap_or(0);
            PlayerBehavior::PlayMapCard { hand_index }
        }
        SessionState::Battle => {
            let battle = session.battle()?;
            match battle.phase() {
                BattlePhase::AwaitingSecondCardSelection(_) => PlayerBehavior::SelectDualCard {
                    hand_index: *battle.selectable().first()?,
                },
                _ => PlayerBehavior::PlayBattleCard {
                    hand_index: battle
                        .hand()
                        .cards()
                        .iter()
                        .position(CardData::is_attack)
                        .unwrap_or(0),
                },
            }
        }
        SessionState::Treasure => PlayerBehavior::ClaimTreasure { choice_index: 0 },
        SessionState::DeckEdit => PlayerBehavior::FinishDeckEdit,
        SessionState::GameOver | SessionState::Completed => return None,
    };
    Some(behavior)
}

/// 정책대로 until 이 참이 되거나 더 진행할 수 없을 때까지 실행
pub fn run_until<F>(session: &mut RunSession, max_steps: usize, until: F) -> Vec<BehaviorResult>
where
    F: Fn(&RunSession) -> bool,
{
    let mut results = Vec::new();
    for _ in 0..max_steps {
        if until(session) {
            break;
        }
        let Some(behavior) = auto_behavior(session) else {
            break;
        };
        let result = session
            .execute(behavior.clone())
            .unwrap_or_else(|e| panic!("{:?} failed: {}", behavior, e));
        results.push(result);
    }
    results
}
