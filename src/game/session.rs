use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    config::GameBalanceConfig,
    game::{
        battle::{Battle, BattleEvent, BattleResult},
        behavior::{BehaviorResult, GameError, GameEvent, PlayerBehavior, SessionSignal},
        data::{card_data::EffectKind, stage_data::StageData, GameDataBase},
        deck_edit::DeckEditor,
        determinism::{seed_for_encounter, seed_for_stage},
        endless::{EndlessContent, NormalContent, StageContent},
        enums::{GameMode, MapObjectType},
        map::{
            cards::{move_request, MapHand},
            population::{pop_enemies, pop_rewards},
            MapEvent, MapField, MapObject, MoveRequest, Position,
        },
        player::PlayerData,
        prompt::{ChoicePrompt, PromptAction},
        roll::ceil_div,
        treasure::{roll_treasure, DropTable, TreasureOffer},
    },
};

/// 세션이 지금 받을 수 있는 입력의 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Title,
    Exploring,
    Battle,
    Treasure,
    DeckEdit,
    GameOver,
    Completed,
}

/// 외부 입력을 기다리느라 멈춘 맵 처리의 이어갈 지점
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resume {
    /// 이동 후 겹침 처리 → 골 확인 → 정리
    AfterMove { moved_x: i32, overlaps: u32 },
    /// 휴식 턴 진행 중
    Resting {
        turn: i32,
        total: i32,
        overlaps: u32,
        in_overlap: bool,
        fired: bool,
    },
    /// 보스전과 보상이 끝난 뒤 스테이지 클리어
    Goal,
}

/// 런 하나 (타이틀 → 스테이지들 → 게임오버/클리어)
///
/// 모든 변경은 execute 를 통해서만 일어난다. 스테이지마다 (run_seed, mode, stage) 로
/// RNG 를 다시 시드하므로 같은 시드와 같은 입력이면 같은 결과가 나온다.
pub struct RunSession {
    data: GameDataBase,
    balance: GameBalanceConfig,
    run_seed: u64,
    rng: StdRng,
    state: SessionState,
    prompt: Option<ChoicePrompt>,
    content: Option<Box<dyn StageContent>>,
    player: Option<PlayerData>,
    snapshot: Option<PlayerData>,
    stage: Option<StageData>,
    stage_seed: u64,
    encounter: u32,
    map: Option<MapField>,
    map_hand: MapHand,
    battle: Option<Battle>,
    treasure: Option<TreasureOffer>,
    editor: Option<DeckEditor>,
    pending: Option<Resume>,
}

impl RunSession {
    pub fn new(data: GameDataBase, balance: GameBalanceConfig, run_seed: u64) -> Self {
        let map_hand = MapHand::new(balance.map.hand_size);
        Self {
            data,
            balance,
            run_seed,
            rng: StdRng::seed_from_u64(run_seed),
            state: SessionState::Title,
            prompt: Some(ChoicePrompt::title_screen()),
            content: None,
            player: None,
            snapshot: None,
            stage: None,
            stage_seed: 0,
            encounter: 0,
            map: None,
            map_hand,
            battle: None,
            treasure: None,
            editor: None,
            pending: None,
        }
    }

    /// 전역 밸런스 설정으로 생성
    pub fn with_global_balance(data: GameDataBase, run_seed: u64) -> Self {
        Self::new(data, GameBalanceConfig::global().clone(), run_seed)
    }

    // ============================================================
    // 조회
    // ============================================================

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> Option<GameMode> {
        self.content.as_ref().map(|content| content.mode())
    }

    pub fn prompt(&self) -> Option<&ChoicePrompt> {
        self.prompt.as_ref()
    }

    /// 전투 중이면 전투가 들고 있는 플레이어
    pub fn player(&self) -> Option<&PlayerData> {
        match &self.battle {
            Some(battle) => Some(battle.player()),
            None => self.player.as_ref(),
        }
    }

    pub fn stage(&self) -> Option<&StageData> {
        self.stage.as_ref()
    }

    pub fn map(&self) -> Option<&MapField> {
        self.map.as_ref()
    }

    pub fn map_hand(&self) -> &MapHand {
        &self.map_hand
    }

    pub fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    pub fn treasure(&self) -> Option<&TreasureOffer> {
        self.treasure.as_ref()
    }

    pub fn editor(&self) -> Option<&DeckEditor> {
        self.editor.as_ref()
    }

    // ============================================================
    // 입력
    // ============================================================

    pub fn execute(&mut self, behavior: PlayerBehavior) -> Result<BehaviorResult, GameError> {
        let before = self.state;
        let mut result = BehaviorResult::new(before);

        match (before, behavior) {
            (
                SessionState::Title | SessionState::GameOver | SessionState::Completed,
                PlayerBehavior::Choose { option_index },
            ) => self.choose(option_index, &mut result)?,

            (SessionState::Exploring, PlayerBehavior::PlayMapCard { hand_index }) => {
                self.play_map_card(hand_index, &mut result)?
            }
            (SessionState::Exploring, PlayerBehavior::OpenDeckEdit) => {
                if self.pending.is_some() {
                    return Err(GameError::PhaseNotReady);
                }
                self.open_deck_edit(true, &mut result)?
            }

            (SessionState::Battle, PlayerBehavior::PlayBattleCard { hand_index }) => {
                let events = self.battle_mut()?.play_card(hand_index)?;
                self.after_battle_input(events, &mut result)?
            }
            (SessionState::Battle, PlayerBehavior::SelectDualCard { hand_index }) => {
                let events = self.battle_mut()?.select_card(hand_index)?;
                self.after_battle_input(events, &mut result)?
            }
            (SessionState::Battle, PlayerBehavior::CancelSelection) => {
                let events = self.battle_mut()?.cancel_selection()?;
                self.after_battle_input(events, &mut result)?
            }

            (SessionState::Treasure, PlayerBehavior::ClaimTreasure { choice_index }) => {
                self.claim_treasure(Some(choice_index), &mut result)?
            }
            (SessionState::Treasure, PlayerBehavior::SkipTreasure) => {
                self.claim_treasure(None, &mut result)?
            }

            (SessionState::DeckEdit, PlayerBehavior::AddToDeck { pool_index }) => {
                self.editor_mut()?.add(pool_index)?
            }
            (SessionState::DeckEdit, PlayerBehavior::RemoveFromDeck { deck_index }) => {
                self.editor_mut()?.remove(deck_index)?
            }
            (SessionState::DeckEdit, PlayerBehavior::ResetDeckEdit) => self.editor_mut()?.reset()?,
            (SessionState::DeckEdit, PlayerBehavior::FinishDeckEdit) => {
                self.finish_deck_edit(&mut result)?
            }

            (state, behavior) => {
                warn!("Rejected {:?} while {:?}", behavior, state);
                return Err(GameError::InvalidAction);
            }
        }

        if before != self.state {
            info!("Game state transition: {:?} -> {:?}", before, self.state);
        }
        result.state = self.state;
        Ok(result)
    }

    fn battle_mut(&mut self) -> Result<&mut Battle, GameError> {
        self.battle.as_mut().ok_or(GameError::PhaseNotReady)
    }

    fn editor_mut(&mut self) -> Result<&mut DeckEditor, GameError> {
        self.editor.as_mut().ok_or(GameError::PhaseNotReady)
    }

    fn stage_ref(&self) -> Result<&StageData, GameError> {
        self.stage.as_ref().ok_or(GameError::PhaseNotReady)
    }

    fn map_mut(&mut self) -> Result<&mut MapField, GameError> {
        self.map.as_mut().ok_or(GameError::PhaseNotReady)
    }

    fn player_mut(&mut self) -> Result<&mut PlayerData, GameError> {
        self.player.as_mut().ok_or(GameError::PhaseNotReady)
    }

    // ============================================================
    // 선택지 화면
    // ============================================================

    fn choose(&mut self, option_index: usize, result: &mut BehaviorResult) -> Result<(), GameError> {
        let action = self
            .prompt
            .as_ref()
            .ok_or(GameError::PhaseNotReady)?
            .choose(option_index)?;
        debug!("Prompt action {:?}", action);

        match action {
            PromptAction::StartNormal => {
                self.start_run(Box::new(NormalContent::new(self.data.clone())), result)
            }
            PromptAction::StartEndless => self.start_run(
                Box::new(EndlessContent::new(
                    self.data.clone(),
                    self.balance.endless.clone(),
                )),
                result,
            ),
            PromptAction::Continue => {
                let snapshot = self.snapshot.clone().ok_or(GameError::PhaseNotReady)?;
                let stage_index = self.stage_ref()?.stage_index;
                self.enter_stage(stage_index, snapshot, result)
            }
            PromptAction::ReturnToTitle => {
                self.reset_to_title();
                Ok(())
            }
        }
    }

    fn start_run(
        &mut self,
        content: Box<dyn StageContent>,
        result: &mut BehaviorResult,
    ) -> Result<(), GameError> {
        info!("Run start: mode={:?} seed={}", content.mode(), self.run_seed);
        self.content = Some(content);
        self.rng = StdRng::seed_from_u64(self.run_seed);
        let player = PlayerData::new_initial(&self.data.battle_cards, &self.balance.player, &mut self.rng)?;
        self.enter_stage(1, player, result)
    }

    fn reset_to_title(&mut self) {
        self.content = None;
        self.player = None;
        self.snapshot = None;
        self.stage = None;
        self.map = None;
        self.map_hand.clear();
        self.battle = None;
        self.treasure = None;
        self.editor = None;
        self.pending = None;
        self.prompt = Some(ChoicePrompt::title_screen());
        self.state = SessionState::Title;
    }

    // ============================================================
    // 스테이지
    // ============================================================

    fn enter_stage(
        &mut self,
        stage_index: u32,
        player: PlayerData,
        result: &mut BehaviorResult,
    ) -> Result<(), GameError> {
        let content = self.content.as_mut().ok_or(GameError::PhaseNotReady)?;
        self.stage_seed = seed_for_stage(self.run_seed, content.mode(), stage_index);
        self.rng = StdRng::seed_from_u64(self.stage_seed);
        self.encounter = 0;
        self.battle = None;
        self.treasure = None;
        self.editor = None;
        self.pending = None;

        let Some(mut stage) = content.stage(stage_index, &mut self.rng)? else {
            info!("No stage {}: run completed", stage_index);
            result.signals.push(SessionSignal::RunCompleted {
                player: player.clone(),
            });
            self.player = Some(player);
            self.map = None;
            self.map_hand.clear();
            self.prompt = Some(ChoicePrompt::game_clear());
            self.state = SessionState::Completed;
            return Ok(());
        };

        let map_config = &self.balance.map;
        let mut map = MapField::new(
            map_config.width,
            map_config.rows,
            Position::new(map_config.player_start_x, map_config.player_start_y),
            self.stage_seed,
        );
        let spawned = pop_enemies(&mut map, &stage.enemy_ids, map_config, &mut self.rng)
            .into_iter()
            .chain(pop_rewards(&mut map, map_config, &mut self.rng));
        result.events.push(GameEvent::StageEntered {
            stage_index,
            to_goal_length: stage.to_goal_length,
        });
        result.events.extend(spawned.map(GameEvent::Map));

        self.map_hand = MapHand::new(map_config.hand_size);
        let drawn = self
            .map_hand
            .refill(&self.data.map_cards, &mut stage, map_config, &mut self.rng)?;
        result
            .events
            .extend(drawn.into_iter().map(|card| GameEvent::Map(MapEvent::MapCardDrawn { card })));

        info!(
            "Stage {} entered: length={} enemies={} player_hp={}",
            stage_index,
            stage.to_goal_length,
            map.count(MapObjectType::Enemy),
            player.heart_point
        );
        self.snapshot = Some(player.clone());
        self.player = Some(player);
        self.stage = Some(stage);
        self.map = Some(map);
        self.prompt = None;
        self.state = SessionState::Exploring;
        Ok(())
    }

    fn clear_stage(&mut self, result: &mut BehaviorResult) -> Result<(), GameError> {
        let bonus = self.balance.run.clear_bonus;
        let stage_index = self.stage_ref()?.stage_index;
        let player = self.player_mut()?;
        player.grow(bonus);
        let player = player.clone();

        result.events.push(GameEvent::ClearBonus { amount: bonus });
        result.signals.push(SessionSignal::StageCleared {
            player: player.clone(),
            stage_index,
        });
        info!("Stage {} cleared (hp={})", stage_index, player.heart_point);
        self.enter_stage(stage_index + 1, player, result)
    }

    fn game_over(&mut self, result: &mut BehaviorResult) -> Result<(), GameError> {
        let snapshot = self
            .snapshot
            .clone()
            .ok_or_else(|| GameError::invariant("game over without stage snapshot"))?;
        let stage_index = self.stage_ref()?.stage_index;
        info!("Player fainted on stage {}", stage_index);

        result.signals.push(SessionSignal::PlayerFainted {
            snapshot,
            stage_index,
        });
        self.pending = None;
        self.battle = None;
        self.treasure = None;
        self.editor = None;
        self.prompt = Some(ChoicePrompt::game_over());
        self.state = SessionState::GameOver;
        Ok(())
    }

    // ============================================================
    // 맵
    // ============================================================

    fn play_map_card(&mut self, hand_index: usize, result: &mut BehaviorResult) -> Result<(), GameError> {
        if self.pending.is_some() {
            return Err(GameError::PhaseNotReady);
        }
        let card = self
            .map_hand
            .get(hand_index)
            .cloned()
            .ok_or(GameError::CardNotInHand)?;
        let request = move_request(&card);
        if request.is_none() && card.kind() != EffectKind::Rest {
            return Err(GameError::InvalidAction);
        }
        self.map_hand.remove(hand_index)?;
        result
            .events
            .push(GameEvent::Map(MapEvent::MapCardPlayed { card: card.clone() }));

        match request {
            Some(request) => {
                let to_goal = self.stage_ref()?.to_goal_length;
                let map = self.map_mut()?;
                let from = map.player_position();
                let delta = map.move_player(request, to_goal);
                let to = map.player_position();

                let rejected =
                    from == to && matches!(request, MoveRequest::Up | MoveRequest::Down);
                result.events.push(GameEvent::Map(if rejected {
                    MapEvent::MoveRejected
                } else {
                    MapEvent::PlayerMoved {
                        from,
                        to,
                        teleport: matches!(request, MoveRequest::Teleport(_)),
                    }
                }));

                if let Some(stage) = self.stage.as_mut() {
                    stage.move_count(delta.x);
                }
                self.pending = Some(Resume::AfterMove {
                    moved_x: delta.x,
                    overlaps: 0,
                });
            }
            None => {
                self.pending = Some(Resume::Resting {
                    turn: 0,
                    total: card.value(),
                    overlaps: 0,
                    in_overlap: false,
                    fired: false,
                });
            }
        }
        self.drive(result)
    }

    fn count_overlap(&self, overlaps: &mut u32) -> Result<(), GameError> {
        *overlaps += 1;
        if *overlaps > self.balance.map.overlap_failsafe {
            return Err(GameError::invariant(format!(
                "overlap resolution exceeded {} iterations",
                self.balance.map.overlap_failsafe
            )));
        }
        Ok(())
    }

    /// 멈춘 맵 처리를 외부 입력이 필요할 때까지 진행
    fn drive(&mut self, result: &mut BehaviorResult) -> Result<(), GameError> {
        self.state = SessionState::Exploring;
        while let Some(resume) = self.pending.take() {
            match resume {
                Resume::AfterMove {
                    moved_x,
                    mut overlaps,
                } => {
                    if let Some(pair) = self.map_mut()?.take_overlap_pair() {
                        self.count_overlap(&mut overlaps)?;
                        self.pending = Some(Resume::AfterMove { moved_x, overlaps });
                        self.launch_overlap(pair.partner, result)?;
                    } else if self.stage_ref()?.is_goal_reached() {
                        self.pending = Some(Resume::Goal);
                        let boss_id = self.stage_ref()?.boss_id.clone();
                        info!("Goal reached, boss {}", boss_id);
                        self.start_battle(&boss_id, true, result)?;
                    } else {
                        self.finish_map_action(moved_x, result)?;
                    }
                }
                Resume::Resting {
                    turn,
                    total,
                    overlaps,
                    in_overlap,
                    fired,
                } => self.step_rest(turn, total, overlaps, in_overlap, fired, result)?,
                Resume::Goal => self.clear_stage(result)?,
            }

            if self.state != SessionState::Exploring {
                return Ok(());
            }
        }
        Ok(())
    }

    /// 휴식 한 단계. 겹침 이벤트가 한 번이라도 일어난 턴이 끝나면 휴식도 끝난다
    fn step_rest(
        &mut self,
        turn: i32,
        total: i32,
        mut overlaps: u32,
        in_overlap: bool,
        fired: bool,
        result: &mut BehaviorResult,
    ) -> Result<(), GameError> {
        if in_overlap {
            if let Some(pair) = self.map_mut()?.take_overlap_pair() {
                self.count_overlap(&mut overlaps)?;
                self.pending = Some(Resume::Resting {
                    turn,
                    total,
                    overlaps,
                    in_overlap: true,
                    fired: true,
                });
                return self.launch_overlap(pair.partner, result);
            }

            let pruned = self.map_mut()?.prune_outside();
            if pruned > 0 {
                result.events.push(GameEvent::Map(MapEvent::Pruned { count: pruned }));
            }
            if fired {
                return self.finish_map_action(0, result);
            }
            self.pending = Some(Resume::Resting {
                turn: turn + 1,
                total,
                overlaps: 0,
                in_overlap: false,
                fired: false,
            });
            return Ok(());
        }

        if turn >= total {
            return self.finish_map_action(0, result);
        }

        let stage_index = self.stage_ref()?.stage_index;
        let amount = ceil_div(stage_index as i32, 2);
        let player = self.player.as_mut().ok_or(GameError::PhaseNotReady)?;
        let healed = player.heal(amount);
        let recovered = player.deck.random_recover(&mut self.rng).is_some();
        result.events.push(GameEvent::Map(MapEvent::Rested {
            turn: turn as u32 + 1,
            healed,
            recovered,
        }));

        self.map_mut()?.advance_enemies();
        result.events.push(GameEvent::Map(MapEvent::EnemiesAdvanced));

        self.pending = Some(Resume::Resting {
            turn,
            total,
            overlaps: 0,
            in_overlap: true,
            fired: false,
        });
        Ok(())
    }

    /// 맵 카드 한 장 처리의 마무리: 쓰러짐 확인, 화면 정렬, 재배치, 패 보충
    fn finish_map_action(&mut self, moved_x: i32, result: &mut BehaviorResult) -> Result<(), GameError> {
        if self.player.as_ref().is_some_and(PlayerData::is_fainted) {
            return self.game_over(result);
        }

        let map_config = &self.balance.map;
        let stage = self.stage.as_mut().ok_or(GameError::PhaseNotReady)?;
        let map = self.map.as_mut().ok_or(GameError::PhaseNotReady)?;

        if moved_x > 0 {
            let amount = map.organize_amount(moved_x, stage.to_goal_length);
            if amount > 0 {
                map.scroll_left(amount);
                result.events.push(GameEvent::Map(MapEvent::Scrolled { amount }));
            }
            let pruned = map.prune_outside();
            if pruned > 0 {
                result.events.push(GameEvent::Map(MapEvent::Pruned { count: pruned }));
            }
            if stage.to_goal_length > 0 {
                let spawned = pop_enemies(map, &stage.enemy_ids, map_config, &mut self.rng)
                    .into_iter()
                    .chain(pop_rewards(map, map_config, &mut self.rng));
                result.events.extend(spawned.map(GameEvent::Map));
            }
        }

        let drawn = self
            .map_hand
            .refill(&self.data.map_cards, stage, map_config, &mut self.rng)?;
        result
            .events
            .extend(drawn.into_iter().map(|card| GameEvent::Map(MapEvent::MapCardDrawn { card })));
        self.state = SessionState::Exploring;
        Ok(())
    }

    fn launch_overlap(&mut self, partner: MapObject, result: &mut BehaviorResult) -> Result<(), GameError> {
        result.events.push(GameEvent::Map(MapEvent::Overlap {
            kind: partner.kind,
            position: partner.position,
        }));
        match partner.kind {
            MapObjectType::Enemy => {
                let enemy_id = partner
                    .enemy_id
                    .ok_or_else(|| GameError::invariant("enemy map object without id"))?;
                self.start_battle(&enemy_id, false, result)
            }
            MapObjectType::Treasure => self.offer_treasure(false, result),
            MapObjectType::DeckEdit => self.open_deck_edit(false, result),
            MapObjectType::Player => Err(GameError::invariant("player overlapped with itself")),
        }
    }

    // ============================================================
    // 전투
    // ============================================================

    fn start_battle(
        &mut self,
        enemy_id: &str,
        is_boss: bool,
        result: &mut BehaviorResult,
    ) -> Result<(), GameError> {
        let stage_index = self.stage_ref()?.stage_index;
        let content = self.content.as_mut().ok_or(GameError::PhaseNotReady)?;
        let mut enemy = content.enemy(enemy_id, stage_index, &mut self.rng)?;
        if is_boss && content.mode() == GameMode::Endless {
            enemy.enhance(stage_index as i32);
        }

        let player = self.player.take().ok_or(GameError::PhaseNotReady)?;
        self.encounter += 1;
        let seed = seed_for_encounter(self.stage_seed, self.encounter);
        let (battle, events) = Battle::start(player, enemy, self.balance.battle.clone(), seed, is_boss);
        self.battle = Some(battle);
        self.state = SessionState::Battle;
        self.after_battle_input(events, result)
    }

    fn after_battle_input(
        &mut self,
        events: Vec<BattleEvent>,
        result: &mut BehaviorResult,
    ) -> Result<(), GameError> {
        result.events.extend(events.into_iter().map(GameEvent::Battle));
        if self.battle.as_ref().and_then(Battle::result).is_none() {
            return Ok(());
        }

        let battle = self.battle.take().ok_or(GameError::PhaseNotReady)?;
        let is_boss = battle.is_boss();
        let (player, outcome) = battle.into_outcome()?;
        result.signals.push(SessionSignal::BattleCompleted {
            player: player.clone(),
            result: outcome,
        });
        self.player = Some(player);

        match outcome {
            BattleResult::PlayerFainted => self.game_over(result),
            BattleResult::EnemyDefeated => self.offer_treasure(is_boss, result),
        }
    }

    // ============================================================
    // 보물 / 덱 편집
    // ============================================================

    fn offer_treasure(&mut self, is_boss: bool, result: &mut BehaviorResult) -> Result<(), GameError> {
        let stage = self.stage.as_ref().ok_or(GameError::PhaseNotReady)?;
        let drop = DropTable {
            rank: stage.drop_rank,
            rare_drop_rate: if is_boss {
                self.balance.run.boss_rare_drop_rate
            } else {
                stage.rare_drop_rate
            },
        };
        let content = self.content.as_deref().ok_or(GameError::PhaseNotReady)?;
        let offer = roll_treasure(drop, content, stage.stage_index, &self.balance.run, &mut self.rng)?;

        if offer.choices.is_empty() {
            warn!("Empty treasure offer, skipping");
            self.state = SessionState::Exploring;
            return self.drive(result);
        }
        result.events.push(GameEvent::TreasureOffered {
            choices: offer.choices.clone(),
        });
        self.treasure = Some(offer);
        self.state = SessionState::Treasure;
        Ok(())
    }

    fn claim_treasure(
        &mut self,
        choice_index: Option<usize>,
        result: &mut BehaviorResult,
    ) -> Result<(), GameError> {
        if let Some(index) = choice_index {
            let len = self.treasure.as_ref().map_or(0, |offer| offer.choices.len());
            if index >= len {
                return Err(GameError::OutOfBounds);
            }
        }
        let offer = self.treasure.take().ok_or(GameError::PhaseNotReady)?;
        if let Some(index) = choice_index {
            let card = offer.claim(index)?;
            self.player_mut()?.add_card(&card);
            info!("Treasure claimed: card {} ({})", card.id, card.key());
            result.events.push(GameEvent::CardObtained { card });
        }
        self.drive(result)
    }

    /// 탐색 중 덱 보기는 읽기 전용, 맵 오브젝트로 연 편집만 덱을 바꿀 수 있다
    fn open_deck_edit(&mut self, read_only: bool, result: &mut BehaviorResult) -> Result<(), GameError> {
        let deck_size = self.balance.run.deck_size;
        let player = self.player.as_ref().ok_or(GameError::PhaseNotReady)?;
        self.editor = Some(if read_only {
            DeckEditor::open_read_only(&player.deck, &player.inventory, deck_size)
        } else {
            DeckEditor::open(&player.deck, &player.inventory, deck_size)
        });
        result.events.push(GameEvent::DeckEditOpened { read_only });
        self.state = SessionState::DeckEdit;
        Ok(())
    }

    fn finish_deck_edit(&mut self, result: &mut BehaviorResult) -> Result<(), GameError> {
        let editor = self.editor.take().ok_or(GameError::PhaseNotReady)?;
        let deck = match editor.finish() {
            Ok(deck) => deck,
            Err(editor) => {
                self.editor = Some(editor);
                return Err(GameError::InvalidAction);
            }
        };
        result.events.push(GameEvent::DeckEditClosed {
            deck_len: deck.len(),
        });
        self.player_mut()?.deck = deck;
        self.drive(result)
    }
}
