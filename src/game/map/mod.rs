use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::game::{
    behavior::GameError, data::card_data::CardData, determinism::uuid_v4_from_seed,
    enums::MapObjectType,
};

pub mod cards;
pub mod population;

const MAP_OBJECT_NAMESPACE: u64 = 0x4D41_504F_424A;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapObject {
    pub uuid: Uuid,
    pub kind: MapObjectType,
    pub position: Position,
    /// Enemy 일 때 적 id
    pub enemy_id: Option<String>,
}

/// 플레이어 이동 요청
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveRequest {
    Right(i32),
    Teleport(i32),
    Up,
    Down,
}

/// 겹친 칸에서 처리할 한 쌍 (상대는 이미 맵에서 제거된 상태)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapPair {
    pub partner: MapObject,
}

/// 표시 레이어로 나가는 맵 기록
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapEvent {
    MapCardPlayed { card: CardData },
    MapCardDrawn { card: CardData },
    PlayerMoved { from: Position, to: Position, teleport: bool },
    MoveRejected,
    Spawned { kind: MapObjectType, position: Position },
    Overlap { kind: MapObjectType, position: Position },
    Scrolled { amount: i32 },
    Pruned { count: usize },
    EnemiesAdvanced,
    Rested { turn: u32, healed: i32, recovered: bool },
}

/// 6열 x 3행 격자 위 오브젝트 관리
///
/// 플레이어는 항상 objects[0]. 왼쪽 밖(x < 0)으로 밀려난 오브젝트는 prune 으로 정리한다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapField {
    pub width: i32,
    pub rows: i32,
    objects: Vec<MapObject>,
    seed: u64,
    spawned: u64,
}

impl MapField {
    pub fn new(width: i32, rows: i32, player_start: Position, seed: u64) -> Self {
        let mut field = Self {
            width,
            rows,
            objects: Vec::new(),
            seed,
            spawned: 0,
        };
        let uuid = field.next_uuid();
        field.objects.push(MapObject {
            uuid,
            kind: MapObjectType::Player,
            position: player_start,
            enemy_id: None,
        });
        field
    }

    fn next_uuid(&mut self) -> Uuid {
        let uuid = uuid_v4_from_seed(self.seed, MAP_OBJECT_NAMESPACE, self.spawned);
        self.spawned += 1;
        uuid
    }

    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }

    pub fn player_position(&self) -> Position {
        self.objects[0].position
    }

    pub fn count(&self, kind: MapObjectType) -> usize {
        self.objects.iter().filter(|o| o.kind == kind).count()
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        position.x >= 0 && position.x < self.width && position.y >= 0 && position.y < self.rows
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.objects.iter().any(|o| o.position == position)
    }

    fn has_enemy_at(&self, position: Position) -> bool {
        self.objects
            .iter()
            .any(|o| o.kind == MapObjectType::Enemy && o.position == position)
    }

    /// 격자 안 임의 위치에 오브젝트 배치 (겹침 허용)
    pub fn place(
        &mut self,
        kind: MapObjectType,
        position: Position,
        enemy_id: Option<String>,
    ) -> Result<Uuid, GameError> {
        if kind == MapObjectType::Player {
            return Err(GameError::InvalidAction);
        }
        if !self.in_bounds(position) {
            return Err(GameError::OutOfBounds);
        }
        let uuid = self.next_uuid();
        self.objects.push(MapObject {
            uuid,
            kind,
            position,
            enemy_id,
        });
        Ok(uuid)
    }

    pub fn remove(&mut self, uuid: Uuid) -> Option<MapObject> {
        let index = self
            .objects
            .iter()
            .position(|o| o.uuid == uuid && o.kind != MapObjectType::Player)?;
        Some(self.objects.remove(index))
    }

    // ============================================================
    // 이동
    // ============================================================

    /// 오른쪽으로 distance 칸 갈 때 실제로 갈 수 있는 거리
    ///
    /// 들어갈 칸 x+1 ..= x+distance 를 훑고, x+k 에 적이 있으면 그 칸(k)에서 멈춘다.
    /// 적 칸을 넘어가지는 않고, 멈춘 칸의 겹침이 전투가 된다.
    pub fn valid_right_distance(&self, distance: i32) -> i32 {
        let from = self.player_position();
        for k in 1..=distance {
            if self.has_enemy_at(Position::new(from.x + k, from.y)) {
                return k;
            }
        }
        distance.max(0)
    }

    /// 플레이어 이동. 실제로 움직인 변위를 돌려준다
    ///
    /// 오른쪽 이동은 남은 거리를 넘지 않게 잘린다.
    pub fn move_player(&mut self, request: MoveRequest, to_goal_length: i32) -> Position {
        let from = self.player_position();
        let delta = match request {
            MoveRequest::Right(distance) => {
                let distance = self.valid_right_distance(distance);
                Position::new(distance.min(to_goal_length).max(0), 0)
            }
            MoveRequest::Teleport(distance) => {
                Position::new(distance.min(to_goal_length).max(0), 0)
            }
            MoveRequest::Up => Position::new(0, -1),
            MoveRequest::Down => Position::new(0, 1),
        };

        let to_y = from.y + delta.y;
        if to_y < 0 || to_y >= self.rows {
            debug!("Move {:?} rejected at row {}", request, from.y);
            return Position::new(0, 0);
        }

        let player = &mut self.objects[0];
        player.position.x += delta.x;
        player.position.y = to_y;
        delta
    }

    /// 적 전체 한 칸 왼쪽으로 (휴식 중)
    pub fn advance_enemies(&mut self) {
        for object in self
            .objects
            .iter_mut()
            .filter(|o| o.kind == MapObjectType::Enemy)
        {
            object.position.x -= 1;
        }
    }

    /// 모든 오브젝트를 왼쪽으로 밀기 (플레이어 포함)
    pub fn scroll_left(&mut self, amount: i32) {
        for object in &mut self.objects {
            object.position.x -= amount;
        }
    }

    /// 왼쪽 밖으로 나간 오브젝트 제거. 제거 수 반환
    pub fn prune_outside(&mut self) -> usize {
        let before = self.objects.len();
        self.objects
            .retain(|o| o.kind == MapObjectType::Player || o.position.x >= 0);
        before - self.objects.len()
    }

    /// 이동 후 화면 정렬 양
    ///
    /// 골이 보이면 골 칸이 오른쪽 끝에 오도록, 아니면 이동한 만큼.
    pub fn organize_amount(&self, moved_x: i32, to_goal_length: i32) -> i32 {
        if to_goal_length < self.width {
            (self.player_position().x + to_goal_length - (self.width - 1)).max(0)
        } else {
            moved_x
        }
    }

    // ============================================================
    // 겹침
    // ============================================================

    /// 같은 칸에 2개 이상 있는 그룹 (objects 인덱스)
    pub fn overlap_groups(&self) -> Vec<Vec<usize>> {
        let mut cells: BTreeMap<Position, Vec<usize>> = BTreeMap::new();
        for (index, object) in self.objects.iter().enumerate() {
            cells.entry(object.position).or_default().push(index);
        }
        cells.into_values().filter(|group| group.len() > 1).collect()
    }

    /// 플레이어가 낀 겹침에서 우선순위 가장 높은 상대를 찾아 맵에서 제거
    ///
    /// Enemy > Treasure > DeckEdit. 플레이어가 없는 겹침은 무시한다.
    pub fn take_overlap_pair(&mut self) -> Option<OverlapPair> {
        let partner_index = self.overlap_groups().into_iter().find_map(|group| {
            if !group
                .iter()
                .any(|i| self.objects[*i].kind == MapObjectType::Player)
            {
                return None;
            }
            [
                MapObjectType::Enemy,
                MapObjectType::Treasure,
                MapObjectType::DeckEdit,
            ]
            .into_iter()
            .find_map(|kind| group.iter().copied().find(|i| self.objects[*i].kind == kind))
        })?;

        let partner = self.objects.remove(partner_index);
        debug!("Overlap with {:?} at {:?}", partner.kind, partner.position);
        Some(OverlapPair { partner })
    }
}
