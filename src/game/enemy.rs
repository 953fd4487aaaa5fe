use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    config::BattleConfig,
    game::{
        condition::Condition,
        data::{card_data::EffectKind, enemy_data::EnemyMetadata},
        enums::{ConditionKind, Element},
        roll::{ceil_div, percent_below, random_int},
    },
};

/// 적에게 준 피해 보고
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageReport {
    pub amount: i32,
    pub was_weak: bool,
}

/// 적 대상 보조 효과 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusOutcome {
    Applied { condition: ConditionKind, turns: i32 },
    /// 확률 실패 (카드는 소모됨)
    Resisted,
    /// 적에게 걸리는 효과가 아님
    NotApplicable,
}

/// 적 행동 가능 여부
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actability {
    Able,
    Sleeping,
    CurseBlocked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyState {
    pub id: String,
    pub element: Option<Element>,
    pub heart_point: i32,
    pub attack_point: i32,
    pub condition: Condition,
}

impl EnemyState {
    pub fn new(id: impl Into<String>, element: Option<Element>, heart_point: i32, attack_point: i32) -> Self {
        Self {
            id: id.into(),
            element,
            heart_point,
            attack_point,
            condition: Condition::new(),
        }
    }

    pub fn from_metadata(meta: &EnemyMetadata) -> Self {
        Self::new(meta.id.clone(), meta.element, meta.heart_point, meta.attack_point)
    }

    /// 약점 속성. 속성이 없으면 Fire 로 표시
    pub fn weak_element(&self) -> Element {
        self.element.map(Element::weakness).unwrap_or(Element::Fire)
    }

    /// 상성 또는 분석 상태면 약점 판정
    pub fn is_weak_to(&self, attacker: Element) -> bool {
        let by_element = self.element.is_some_and(|target| attacker.beats(target));
        by_element || self.condition.has_active(ConditionKind::Analyzed)
    }

    /// 피해 적용 후 실제 피해량 반환
    pub fn damage(&mut self, attacker: Element, raw: i32, weak_multiplier: i32) -> DamageReport {
        let was_weak = self.is_weak_to(attacker);
        let amount = if was_weak { raw * weak_multiplier } else { raw };
        self.heart_point -= amount;
        DamageReport { amount, was_weak }
    }

    pub fn apply_effect<R: Rng>(
        &mut self,
        kind: EffectKind,
        config: &BattleConfig,
        rng: &mut R,
    ) -> StatusOutcome {
        match kind {
            EffectKind::Analyze => {
                self.condition.add(ConditionKind::Analyzed, config.analyze_turns);
                StatusOutcome::Applied {
                    condition: ConditionKind::Analyzed,
                    turns: config.analyze_turns,
                }
            }
            EffectKind::Sleep => {
                if !percent_below(config.sleep_chance, rng) {
                    return StatusOutcome::Resisted;
                }
                let turns = random_int(config.sleep_turns_min, config.sleep_turns_max, rng);
                self.condition.add(ConditionKind::Sleeped, turns);
                StatusOutcome::Applied {
                    condition: ConditionKind::Sleeped,
                    turns,
                }
            }
            EffectKind::Curse => {
                self.condition.add(ConditionKind::Cursed, config.curse_turns);
                StatusOutcome::Applied {
                    condition: ConditionKind::Cursed,
                    turns: config.curse_turns,
                }
            }
            _ => StatusOutcome::NotApplicable,
        }
    }

    /// 행동 시점 판정. 잠듦이면 불가, 저주면 확률로 불가
    pub fn check_actable<R: Rng>(&self, config: &BattleConfig, rng: &mut R) -> Actability {
        if self.condition.has_active(ConditionKind::Sleeped) {
            return Actability::Sleeping;
        }
        if self.condition.has_active(ConditionKind::Cursed)
            && percent_below(config.curse_block_chance, rng)
        {
            return Actability::CurseBlocked;
        }
        Actability::Able
    }

    pub fn is_fainted(&self) -> bool {
        self.heart_point <= 0
    }

    /// 보스 강화
    pub fn enhance(&mut self, stage_count: i32) {
        self.heart_point = ceil_div(self.heart_point * 3, 2);
        self.attack_point = ceil_div(self.attack_point * 3, 2) + ceil_div(stage_count, 5);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameBalanceConfig;
    use rand::{rngs::StdRng, SeedableRng};

    fn battle_config() -> BattleConfig {
        GameBalanceConfig::default().battle
    }

    #[test]
    fn damage_doubles_on_weakness() {
        let mut enemy = EnemyState::new("fire_0", Some(Element::Fire), 10, 1);
        let report = enemy.damage(Element::Ice, 3, 2);
        assert_eq!(report, DamageReport { amount: 6, was_weak: true });
        assert_eq!(enemy.heart_point, 4);

        let report = enemy.damage(Element::Wind, 3, 2);
        assert_eq!(report, DamageReport { amount: 3, was_weak: false });
    }

    #[test]
    fn weakness_table_for_all_pairs() {
        for target in Element::ALL {
            let enemy = EnemyState::new("x", Some(target), 10, 1);
            for attacker in Element::ALL {
                assert_eq!(enemy.is_weak_to(attacker), attacker == target.weakness());
            }
            assert_eq!(enemy.weak_element(), target.weakness());
        }
    }

    #[test]
    fn analyzed_forces_weakness() {
        let config = battle_config();
        let mut rng = StdRng::seed_from_u64(1);
        let mut enemy = EnemyState::new("iron_1", None, 10, 1);
        assert!(!enemy.is_weak_to(Element::Fire));

        enemy.apply_effect(EffectKind::Analyze, &config, &mut rng);
        for attacker in Element::ALL {
            assert!(enemy.is_weak_to(attacker));
        }
        enemy.condition.update_turn();
        enemy.condition.update_turn();
        assert!(!enemy.is_weak_to(Element::Fire));
    }

    #[test]
    fn sleep_succeeds_about_half_the_time() {
        let config = battle_config();
        let mut rng = StdRng::seed_from_u64(11);
        let mut applied = 0;
        for _ in 0..1000 {
            let mut enemy = EnemyState::new("x", None, 10, 1);
            match enemy.apply_effect(EffectKind::Sleep, &config, &mut rng) {
                StatusOutcome::Applied { turns, .. } => {
                    assert!((2..=3).contains(&turns));
                    assert_eq!(enemy.check_actable(&config, &mut rng), Actability::Sleeping);
                    applied += 1;
                }
                StatusOutcome::Resisted => {
                    assert!(!enemy.condition.has_active(ConditionKind::Sleeped));
                }
                StatusOutcome::NotApplicable => panic!("sleep must apply or resist"),
            }
        }
        assert!((400..600).contains(&applied), "applied={}", applied);
    }

    #[test]
    fn curse_blocks_some_turns() {
        let config = battle_config();
        let mut rng = StdRng::seed_from_u64(21);
        let mut enemy = EnemyState::new("x", None, 10, 1);
        enemy.apply_effect(EffectKind::Curse, &config, &mut rng);
        assert_eq!(enemy.condition.get(ConditionKind::Cursed), Some(99));

        let blocked = (0..1000)
            .filter(|_| enemy.check_actable(&config, &mut rng) == Actability::CurseBlocked)
            .count();
        assert!((200..400).contains(&blocked), "blocked={}", blocked);
    }

    #[test]
    fn enhance_scales_with_ceil() {
        let mut enemy = EnemyState::new("boss_0", Some(Element::Fire), 7, 3);
        enemy.enhance(6);
        assert_eq!(enemy.heart_point, 11); // ceil(10.5)
        assert_eq!(enemy.attack_point, 5 + 2); // ceil(4.5) + ceil(6/5)
    }
}
