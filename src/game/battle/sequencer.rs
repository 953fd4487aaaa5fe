use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    config::BattleConfig,
    game::{
        battle::{
            quake_for, BattleEvent, BattleResult, DenyReason, EffectResolver, Hand,
        },
        behavior::GameError,
        data::card_data::CardData,
        enemy::{Actability, EnemyState},
        enums::Target,
        player::PlayerData,
    },
};

/// dual 발동 중 선택 진행 상황
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualSelection {
    pub dual_index: usize,
    pub picks: Vec<usize>,
}

/// 외부에서 관찰 가능한 전투 상태
///
/// 플레이어 효과 해석 / 적 행동 / 결과 판정은 한 번의 호출 안에서 끝까지 진행된다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    AwaitingPlayerCard,
    AwaitingSecondCardSelection(DualSelection),
    BattleEnded(BattleResult),
}

/// 턴 내부 단계 (로그용)
#[derive(Debug, Clone, Copy)]
enum TurnStage {
    ResolvingPlayerEffect,
    ResolvingEnemyEffect,
    CheckingOutcome,
}

/// 전투 한 판
///
/// 시작할 때 PlayerData 를 넘겨받고, 끝나면 into_outcome 으로 돌려준다.
pub struct Battle {
    player: PlayerData,
    enemy: EnemyState,
    hand: Hand,
    phase: BattlePhase,
    config: BattleConfig,
    rng: StdRng,
    turn: u32,
    is_boss: bool,
}

impl Battle {
    pub fn start(
        player: PlayerData,
        enemy: EnemyState,
        config: BattleConfig,
        seed: u64,
        is_boss: bool,
    ) -> (Self, Vec<BattleEvent>) {
        info!(
            "Battle start: enemy={} hp={} atk={} boss={}",
            enemy.id, enemy.heart_point, enemy.attack_point, is_boss
        );
        let mut battle = Self {
            hand: Hand::new(config.hand_size),
            player,
            enemy,
            phase: BattlePhase::AwaitingPlayerCard,
            config,
            rng: StdRng::seed_from_u64(seed),
            turn: 1,
            is_boss,
        };

        let mut events: Vec<BattleEvent> = battle
            .hand
            .fill(&mut battle.player.deck, &mut battle.rng)
            .into_iter()
            .map(|card| BattleEvent::CardDrawn { card })
            .collect();

        if battle.player.is_fainted() {
            battle.end(BattleResult::PlayerFainted, &mut events);
        }
        (battle, events)
    }

    pub fn phase(&self) -> &BattlePhase {
        &self.phase
    }

    pub fn player(&self) -> &PlayerData {
        &self.player
    }

    pub fn enemy(&self) -> &EnemyState {
        &self.enemy
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn is_boss(&self) -> bool {
        self.is_boss
    }

    pub fn result(&self) -> Option<BattleResult> {
        match self.phase {
            BattlePhase::BattleEnded(result) => Some(result),
            _ => None,
        }
    }

    /// 전투가 끝났을 때만 플레이어를 돌려받을 수 있다
    pub fn into_outcome(self) -> Result<(PlayerData, BattleResult), GameError> {
        match self.phase {
            BattlePhase::BattleEnded(result) => Ok((self.player, result)),
            _ => Err(GameError::PhaseNotReady),
        }
    }

    // ============================================================
    // 입력
    // ============================================================

    /// 패의 카드 한 장을 낸다
    pub fn play_card(&mut self, hand_index: usize) -> Result<Vec<BattleEvent>, GameError> {
        if self.phase != BattlePhase::AwaitingPlayerCard {
            return Err(GameError::PhaseNotReady);
        }
        let card = self
            .hand
            .get(hand_index)
            .cloned()
            .ok_or(GameError::CardNotInHand)?;
        debug!("Turn {} {:?}: card {}", self.turn, TurnStage::ResolvingPlayerEffect, card.id);

        let mut events = Vec::new();
        if card.is_dual() {
            let eligible = self.first_pick_candidates(hand_index);
            if eligible.is_empty() {
                // 함께 낼 카드가 없으면 dual 만 소모되고 효과 없음
                self.player.deck.use_card(card.id)?;
                events.push(BattleEvent::CardPlayed { card: card.clone() });
                events.push(BattleEvent::ActionDenied {
                    card_id: card.id,
                    reason: DenyReason::NoDualPartner,
                });
                self.finish_turn(&[hand_index], &mut events);
                return Ok(events);
            }

            self.phase = BattlePhase::AwaitingSecondCardSelection(DualSelection {
                dual_index: hand_index,
                picks: Vec::new(),
            });
            events.push(BattleEvent::SelectionRequested { eligible });
            return Ok(events);
        }

        self.player.deck.use_card(card.id)?;
        events.push(BattleEvent::CardPlayed { card: card.clone() });
        let resolved = self.resolve(&card)?;
        events.extend(resolved);
        self.finish_turn(&[hand_index], &mut events);
        Ok(events)
    }

    /// dual 발동 중 추가 카드 선택
    pub fn select_card(&mut self, hand_index: usize) -> Result<Vec<BattleEvent>, GameError> {
        let mut selection = match &self.phase {
            BattlePhase::AwaitingSecondCardSelection(selection) => selection.clone(),
            _ => return Err(GameError::PhaseNotReady),
        };
        if !self.selection_candidates(&selection).contains(&hand_index) {
            warn!("Rejected dual pick {} (not eligible)", hand_index);
            return Err(GameError::InvalidAction);
        }
        selection.picks.push(hand_index);

        let mut events = Vec::new();
        if selection.picks.len() == 1 {
            let second = self.selection_candidates(&selection);
            if !second.is_empty() {
                self.phase = BattlePhase::AwaitingSecondCardSelection(selection);
                events.push(BattleEvent::SelectionRequested { eligible: second });
                return Ok(events);
            }
        }

        self.resolve_dual(selection, &mut events)?;
        Ok(events)
    }

    /// 선택 대기 취소. dual 카드는 소모되지 않는다
    pub fn cancel_selection(&mut self) -> Result<Vec<BattleEvent>, GameError> {
        match self.phase {
            BattlePhase::AwaitingSecondCardSelection(_) => {
                self.phase = BattlePhase::AwaitingPlayerCard;
                Ok(vec![BattleEvent::SelectionCancelled])
            }
            _ => Err(GameError::PhaseNotReady),
        }
    }

    /// 지금 선택 가능한 패 인덱스
    pub fn selectable(&self) -> Vec<usize> {
        match &self.phase {
            BattlePhase::AwaitingPlayerCard => (0..self.hand.len()).collect(),
            BattlePhase::AwaitingSecondCardSelection(selection) => {
                self.selection_candidates(selection)
            }
            BattlePhase::BattleEnded(_) => Vec::new(),
        }
    }

    // ============================================================
    // dual 선택 규칙
    // ============================================================

    fn first_pick_candidates(&self, dual_index: usize) -> Vec<usize> {
        self.hand
            .cards()
            .iter()
            .enumerate()
            .filter(|(index, card)| *index != dual_index && !card.is_dual())
            .map(|(index, _)| index)
            .collect()
    }

    /// 첫 선택은 dual 이 아닌 아무 카드, 두 번째는 첫 카드와 반대 부류(공격/비공격)만
    fn selection_candidates(&self, selection: &DualSelection) -> Vec<usize> {
        match selection.picks.first() {
            None => self.first_pick_candidates(selection.dual_index),
            Some(&first) if selection.picks.len() == 1 => {
                let first_is_attack = self
                    .hand
                    .get(first)
                    .map(CardData::is_attack)
                    .unwrap_or(false);
                self.first_pick_candidates(selection.dual_index)
                    .into_iter()
                    .filter(|index| *index != first)
                    .filter(|index| {
                        self.hand
                            .get(*index)
                            .is_some_and(|card| card.is_attack() != first_is_attack)
                    })
                    .collect()
            }
            Some(_) => Vec::new(),
        }
    }

    fn resolve_dual(
        &mut self,
        selection: DualSelection,
        events: &mut Vec<BattleEvent>,
    ) -> Result<(), GameError> {
        let dual = self
            .hand
            .get(selection.dual_index)
            .cloned()
            .ok_or(GameError::CardNotInHand)?;
        self.player.deck.use_card(dual.id)?;
        events.push(BattleEvent::CardPlayed { card: dual });

        for pick in &selection.picks {
            let card = self
                .hand
                .get(*pick)
                .cloned()
                .ok_or(GameError::CardNotInHand)?;
            self.player.deck.use_card(card.id)?;
            events.push(BattleEvent::CardPlayed { card: card.clone() });
            let resolved = self.resolve(&card)?;
            events.extend(resolved);
        }

        let mut consumed = selection.picks.clone();
        consumed.push(selection.dual_index);
        self.phase = BattlePhase::AwaitingPlayerCard;
        self.finish_turn(&consumed, events);
        Ok(())
    }

    // ============================================================
    // 턴 진행
    // ============================================================

    fn resolve(&mut self, card: &CardData) -> Result<Vec<BattleEvent>, GameError> {
        let resolver = EffectResolver::new(&self.config);
        resolver.resolve_player_card(card, &mut self.player, &mut self.enemy, &mut self.rng)
    }

    fn finish_turn(&mut self, consumed: &[usize], events: &mut Vec<BattleEvent>) {
        debug!("Turn {} {:?}", self.turn, TurnStage::ResolvingEnemyEffect);
        if !self.enemy.is_fainted() && !self.player.is_fainted() {
            match self.enemy.check_actable(&self.config, &mut self.rng) {
                Actability::Able => {
                    let amount = self.enemy.attack_point;
                    self.player.take_damage(amount);
                    events.push(BattleEvent::Damage {
                        target: Target::Player,
                        amount,
                        was_weak: false,
                        quake: quake_for(amount),
                    });
                }
                blocked => events.push(BattleEvent::EnemyBlocked { reason: blocked }),
            }
        }

        debug!("Turn {} {:?}", self.turn, TurnStage::CheckingOutcome);
        if self.enemy.is_fainted() {
            self.end(BattleResult::EnemyDefeated, events);
            return;
        }
        if self.player.is_fainted() {
            self.end(BattleResult::PlayerFainted, events);
            return;
        }

        // 적의 상태 타이머만 줄어든다
        for condition in self.enemy.condition.update_turn() {
            events.push(BattleEvent::StatusExpired {
                target: Target::Enemy,
                condition,
            });
        }

        self.hand.remove_indices(consumed);
        for card in self.hand.fill(&mut self.player.deck, &mut self.rng) {
            events.push(BattleEvent::CardDrawn { card });
        }
        self.turn += 1;
        self.phase = BattlePhase::AwaitingPlayerCard;
    }

    fn end(&mut self, result: BattleResult, events: &mut Vec<BattleEvent>) {
        info!(
            "Battle end: {:?} after {} turns (player_hp={}, enemy_hp={})",
            result, self.turn, self.player.heart_point, self.enemy.heart_point
        );
        self.player.deck.reset_all_draw();
        self.hand.clear();
        self.phase = BattlePhase::BattleEnded(result);
        events.push(BattleEvent::BattleEnded { result });
    }
}
