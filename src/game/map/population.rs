use rand::Rng;
use tracing::{debug, warn};

use crate::{
    config::MapConfig,
    game::{
        enums::MapObjectType,
        map::{MapEvent, MapField, Position},
        roll::random_int,
    },
};

/// 빈 칸을 찾아 오브젝트를 뿌리는 공통 루프
///
/// 0 열은 제외. 배치 후 전체 오브젝트 수가 ceiling 에 닿으면 멈춘다.
fn populate<R, F>(
    field: &mut MapField,
    amount: i32,
    ceiling: usize,
    config: &MapConfig,
    rng: &mut R,
    mut pick: F,
) -> Vec<MapEvent>
where
    R: Rng,
    F: FnMut(&mut R) -> (MapObjectType, Option<String>),
{
    let mut events = Vec::new();
    let mut remaining = amount;
    if remaining <= 0 || field.objects().len() >= ceiling {
        return events;
    }

    for _ in 0..config.population_attempts {
        let position = Position::new(
            random_int(1, field.width - 1, rng),
            random_int(0, field.rows - 1, rng),
        );
        if field.is_occupied(position) {
            continue;
        }

        let (kind, enemy_id) = pick(rng);
        match field.place(kind, position, enemy_id) {
            Ok(_) => events.push(MapEvent::Spawned { kind, position }),
            Err(e) => {
                warn!("Population placement failed at {:?}: {}", position, e);
                continue;
            }
        }

        remaining -= 1;
        if remaining == 0 || field.objects().len() >= ceiling {
            break;
        }
    }
    events
}

/// 적 1~3 마리 배치. 적 id 는 스테이지 목록에서 균등 추첨
pub fn pop_enemies<R: Rng>(
    field: &mut MapField,
    enemy_ids: &[String],
    config: &MapConfig,
    rng: &mut R,
) -> Vec<MapEvent> {
    if enemy_ids.is_empty() {
        return Vec::new();
    }
    let amount = random_int(config.enemy_amount_min, config.enemy_amount_max, rng);
    let events = populate(field, amount, config.enemy_ceiling, config, rng, |rng| {
        let index = random_int(0, enemy_ids.len() as i32 - 1, rng) as usize;
        (MapObjectType::Enemy, Some(enemy_ids[index].clone()))
    });
    debug!("Spawned {} enemies (requested {})", events.len(), amount);
    events
}

/// 보상 1~3 개 배치. 2/3 확률로 보물, 나머지는 덱 편집
pub fn pop_rewards<R: Rng>(field: &mut MapField, config: &MapConfig, rng: &mut R) -> Vec<MapEvent> {
    let amount = random_int(config.reward_amount_min, config.reward_amount_max, rng);
    let events = populate(field, amount, config.reward_ceiling, config, rng, |rng| {
        let kind = if random_int(0, 2, rng) > 0 {
            MapObjectType::Treasure
        } else {
            MapObjectType::DeckEdit
        };
        (kind, None)
    });
    debug!("Spawned {} rewards (requested {})", events.len(), amount);
    events
}
