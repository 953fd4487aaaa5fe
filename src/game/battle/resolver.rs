use rand::Rng;
use tracing::debug;

use crate::{
    config::BattleConfig,
    game::{
        battle::{quake_for, BattleEvent, DenyReason},
        behavior::GameError,
        data::card_data::{CardData, EffectKind},
        enemy::{EnemyState, StatusOutcome},
        enums::{ConditionKind, Target},
        player::PlayerData,
    },
};

/// 카드 효과 해석기
///
/// 효과 종류마다 한 갈래씩, 빠짐없이 match 한다.
pub struct EffectResolver<'a> {
    config: &'a BattleConfig,
}

impl<'a> EffectResolver<'a> {
    pub fn new(config: &'a BattleConfig) -> Self {
        Self { config }
    }

    /// 플레이어가 낸 카드 한 장을 적/자신에게 적용
    ///
    /// 덱에서 카드를 Used 로 바꾸는 건 호출자 몫.
    pub fn resolve_player_card<R: Rng>(
        &self,
        card: &CardData,
        player: &mut PlayerData,
        enemy: &mut EnemyState,
        rng: &mut R,
    ) -> Result<Vec<BattleEvent>, GameError> {
        let mut events = Vec::new();
        match card.kind() {
            EffectKind::Attack(element) => {
                let charged = player.condition.take_charged();
                if charged > 0 {
                    events.push(BattleEvent::ChargeReleased { power: charged });
                }
                let raw = card.value() + charged;
                let report = enemy.damage(element, raw, self.config.weak_multiplier);
                debug!(
                    "Attack {:?} raw={} dealt={} weak={} enemy_hp={}",
                    element, raw, report.amount, report.was_weak, enemy.heart_point
                );
                events.push(BattleEvent::Damage {
                    target: Target::Enemy,
                    amount: report.amount,
                    was_weak: report.was_weak,
                    quake: quake_for(report.amount),
                });
            }
            EffectKind::Heal => {
                let amount = player.heal(card.value());
                events.push(BattleEvent::Healed {
                    amount,
                    heart_point: player.heart_point,
                });
            }
            EffectKind::Charge => self.resolve_charge(card, player, rng, &mut events)?,
            EffectKind::Analyze | EffectKind::Curse | EffectKind::Sleep => {
                match enemy.apply_effect(card.kind(), self.config, rng) {
                    StatusOutcome::Applied { condition, turns } => {
                        events.push(BattleEvent::StatusApplied {
                            target: Target::Enemy,
                            condition,
                            turns,
                        })
                    }
                    StatusOutcome::Resisted => events.push(BattleEvent::StatusResisted {
                        target: Target::Enemy,
                        condition: ConditionKind::Sleeped,
                    }),
                    StatusOutcome::NotApplicable => {
                        return Err(GameError::invariant(format!(
                            "status card {} had no target effect",
                            card.id
                        )))
                    }
                }
            }
            EffectKind::Dual => {
                return Err(GameError::invariant("dual card resolved without selection"));
            }
            EffectKind::MoveRight
            | EffectKind::Teleport
            | EffectKind::MoveUp
            | EffectKind::MoveDown
            | EffectKind::Rest => return Err(GameError::InvalidAction),
        }
        Ok(events)
    }

    /// 덱의 Fresh 카드 두 장을 뽑아 바로 소모하고, 값의 합을 위력으로 저장
    fn resolve_charge<R: Rng>(
        &self,
        card: &CardData,
        player: &mut PlayerData,
        rng: &mut R,
        events: &mut Vec<BattleEvent>,
    ) -> Result<(), GameError> {
        if player.deck.fresh_count() < self.config.charge_cost {
            events.push(BattleEvent::ActionDenied {
                card_id: card.id,
                reason: DenyReason::NotEnoughCards,
            });
            return Ok(());
        }

        let mut power = 0;
        for _ in 0..self.config.charge_cost {
            let sacrificed = player
                .deck
                .draw(rng)
                .ok_or_else(|| GameError::invariant("charge drew from a deck without fresh cards"))?;
            power += sacrificed.value();
            player.deck.use_card(sacrificed.id)?;
        }
        player.condition.add_charge(power);
        let total = player
            .condition
            .get(ConditionKind::Charged)
            .unwrap_or(power);
        events.push(BattleEvent::ChargeStored { power, total });
        Ok(())
    }
}
