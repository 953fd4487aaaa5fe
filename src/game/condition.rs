use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::enums::ConditionKind;

/// 전투 참가자에게 붙는 상태 이상 묶음
///
/// 타이머형 상태는 남은 턴 수를, Charged 는 저장된 위력을 값으로 가진다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    values: BTreeMap<ConditionKind, i32>,
}

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    /// 덮어쓰기. 중첩되지 않음
    pub fn add(&mut self, kind: ConditionKind, turns: i32) {
        self.values.insert(kind, turns);
    }

    /// 타이머 1 감소, 0 이하가 되면 제거. Charged 는 건드리지 않는다.
    pub fn update_turn(&mut self) -> Vec<ConditionKind> {
        let mut expired = Vec::new();
        for (kind, value) in self.values.iter_mut() {
            if kind.is_timer() {
                *value -= 1;
                if *value <= 0 {
                    expired.push(*kind);
                }
            }
        }
        for kind in &expired {
            self.values.remove(kind);
        }
        expired
    }

    pub fn has_active(&self, kind: ConditionKind) -> bool {
        self.values.get(&kind).is_some_and(|v| *v > 0)
    }

    pub fn get(&self, kind: ConditionKind) -> Option<i32> {
        self.values.get(&kind).copied()
    }

    pub fn add_charge(&mut self, power: i32) {
        *self.values.entry(ConditionKind::Charged).or_insert(0) += power;
    }

    /// 저장된 위력을 꺼내고 비움
    pub fn take_charged(&mut self) -> i32 {
        self.values.remove(&ConditionKind::Charged).unwrap_or(0)
    }

    pub fn active(&self) -> impl Iterator<Item = (ConditionKind, i32)> + '_ {
        self.values
            .iter()
            .filter(|(_, v)| **v > 0)
            .map(|(k, v)| (*k, *v))
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_overwrites_existing_timer() {
        let mut condition = Condition::new();
        condition.add(ConditionKind::Sleeped, 3);
        condition.add(ConditionKind::Sleeped, 1);
        assert_eq!(condition.get(ConditionKind::Sleeped), Some(1));
    }

    #[test]
    fn sleeped_two_turns_expires_after_two_ticks() {
        let mut condition = Condition::new();
        condition.add(ConditionKind::Sleeped, 2);

        condition.update_turn();
        assert!(condition.has_active(ConditionKind::Sleeped));

        let expired = condition.update_turn();
        assert!(!condition.has_active(ConditionKind::Sleeped));
        assert_eq!(expired, vec![ConditionKind::Sleeped]);
        assert_eq!(condition.get(ConditionKind::Sleeped), None);
    }

    #[test]
    fn non_positive_timer_is_not_active() {
        let mut condition = Condition::new();
        condition.add(ConditionKind::Cursed, 0);
        assert!(!condition.has_active(ConditionKind::Cursed));
        condition.add(ConditionKind::Cursed, -2);
        assert!(!condition.has_active(ConditionKind::Cursed));
        assert_eq!(condition.active().count(), 0);
    }

    #[test]
    fn charged_survives_ticks_and_drains_once() {
        let mut condition = Condition::new();
        condition.add_charge(4);
        condition.add_charge(3);
        for _ in 0..5 {
            condition.update_turn();
        }
        assert!(condition.has_active(ConditionKind::Charged));
        assert_eq!(condition.take_charged(), 7);
        assert_eq!(condition.take_charged(), 0);
        assert!(!condition.has_active(ConditionKind::Charged));
    }
}
