mod common;

use common::{load_game_data, new_session, run_until};
use forest_core::{
    config::GameBalanceConfig,
    game::{
        endless::{generate_stage, EndlessContent, StageContent},
        enums::GameMode,
    },
    GameEvent, PlayerBehavior, SessionState,
};
use rand::{rngs::StdRng, SeedableRng};

/// 엔드리스 선택 시 1층 스테이지가 weak 풀과 구간 보상으로 만들어진다
#[test]
fn endless_run_starts_on_weak_floor() {
    // Given
    let mut session = new_session(5);
    let data = load_game_data();

    // When: 타이틀에서 두 번째 항목
    let result = session
        .execute(PlayerBehavior::Choose { option_index: 1 })
        .expect("endless start must succeed");

    // Then
    assert_eq!(result.state, SessionState::Exploring);
    assert_eq!(session.mode(), Some(GameMode::Endless));
    let stage = session.stage().expect("stage must be entered");
    assert_eq!(stage.stage_index, 1);
    assert!((20..=40).contains(&stage.to_goal_length));
    assert_eq!(stage.enemy_ids, data.endless_pools.weak.enemy_ids);
    assert!(data.endless_pools.weak.boss_ids.contains(&stage.boss_id));
    assert_eq!(stage.drop_rank, 1);
    assert!(result.events.contains(&GameEvent::StageEntered {
        stage_index: 1,
        to_goal_length: stage.to_goal_length,
    }));
}

/// 층이 깊어질수록 구간이 올라가고 보상 랭크도 따라간다
#[test]
fn deeper_floors_move_through_tiers() {
    let data = load_game_data();
    let config = GameBalanceConfig::default().endless;
    let mut rng = StdRng::seed_from_u64(17);

    let ranks: Vec<u8> = (0..9)
        .map(|floor| {
            generate_stage(floor, &data, &config, &mut rng)
                .expect("every tier has a pool")
                .drop_rank
        })
        .collect();

    assert_eq!(ranks, vec![1, 1, 1, 2, 2, 2, 3, 3, 3]);
}

/// 엔드리스 적은 층 수식으로 만들어지고 테이블 능력치를 쓰지 않는다
#[test]
fn endless_enemy_ignores_table_stats() {
    // Given: 테이블의 fire_2 는 체력 22
    let data = load_game_data();
    let table = data
        .enemy_data
        .get_by_id("fire_2")
        .expect("fire_2 must exist")
        .clone();
    let mut content = EndlessContent::new(data, GameBalanceConfig::default().endless);
    let mut rng = StdRng::seed_from_u64(23);

    // When: 4층 (floor 3)
    let enemy = content
        .enemy("fire_2", 4, &mut rng)
        .expect("enemy must be generated");

    // Then: 6 + 4*3 + ceil(3/5) = 19, 3 + 1 = 4
    assert_ne!(enemy.heart_point, table.heart_point);
    assert_eq!(enemy.heart_point, 19);
    assert_eq!(enemy.attack_point, 4);
    assert_eq!(enemy.element, table.element);
}

/// 엔드리스 런은 끝나지 않고, 스테이지는 1 씩 늘어난다
#[test]
fn endless_run_never_completes() {
    // Given
    let mut session = new_session(8);
    session
        .execute(PlayerBehavior::Choose { option_index: 1 })
        .expect("endless start must succeed");

    // When
    let results = run_until(&mut session, 400, |s| s.state() == SessionState::GameOver);

    // Then
    assert_ne!(session.state(), SessionState::Completed);
    let entered: Vec<u32> = results
        .iter()
        .flat_map(|result| result.events.iter())
        .filter_map(|event| match event {
            GameEvent::StageEntered { stage_index, .. } => Some(*stage_index),
            _ => None,
        })
        .collect();
    for pair in entered.windows(2) {
        assert_eq!(pair[1], pair[0] + 1);
    }
    assert!(entered.iter().all(|index| *index >= 2));
}
