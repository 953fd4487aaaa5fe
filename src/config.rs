use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::game::enums::Tier;

/// 게임 밸런스 설정 전체
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameBalanceConfig {
    pub battle: BattleConfig,
    pub map: MapConfig,
    pub player: PlayerConfig,
    pub run: RunConfig,
    pub endless: EndlessConfig,
}

/// 전투 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleConfig {
    pub hand_size: usize,
    pub weak_multiplier: i32,
    pub analyze_turns: i32,
    pub sleep_chance: u32, // 0~100
    pub sleep_turns_min: i32,
    pub sleep_turns_max: i32,
    pub curse_turns: i32,
    pub curse_block_chance: u32, // 0~100
    pub charge_cost: usize,
}

/// 맵 카드 생성 누적 임계값 (0~100 굴림과 비교)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapCardThresholds {
    pub right: i32,
    pub up: i32,
    pub down: i32,
    pub teleport: i32,
    pub rest: i32,
}

/// 맵 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub width: i32,
    pub rows: i32,
    pub player_start_x: i32,
    pub player_start_y: i32,
    pub hand_size: usize,
    pub population_attempts: u32,
    pub enemy_amount_min: i32,
    pub enemy_amount_max: i32,
    pub enemy_ceiling: usize,
    pub reward_amount_min: i32,
    pub reward_amount_max: i32,
    pub reward_ceiling: usize,
    pub overlap_failsafe: u32,
    pub card_generation_attempts: u32,
    pub card_thresholds: MapCardThresholds,
}

/// 초기 인벤토리 한 줄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySeed {
    pub card_id: u32,
    pub count: u32,
}

/// 새 플레이어 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub initial_heart_point: i32,
    pub initial_max_heart_point: i32,
    pub initial_deck: Vec<u32>,
    pub initial_inventory: Vec<InventorySeed>,
}

/// 런 진행 / 보상 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub deck_size: usize,
    pub clear_bonus: i32,
    pub treasure_choices: usize,
    pub treasure_attempts: u32,
    /// 0~100 굴림이 이 값보다 크면 공격 카드
    pub support_drop_threshold: i32,
    pub boss_rare_drop_rate: u32,
    pub max_rank: u8,
}

/// 구간별 보상 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRewardConfig {
    pub drop_rank: u8,
    pub rare_drop_rate: u32,
    pub rest_cards: i32,
}

/// 엔드리스 모드 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndlessConfig {
    pub length_min: i32,
    pub length_max: i32,
    pub length_bias_divisor: i32,
    pub normal_tier_floor: u32,
    pub strong_tier_floor: u32,
    pub weak: TierRewardConfig,
    pub normal: TierRewardConfig,
    pub strong: TierRewardConfig,
}

impl EndlessConfig {
    /// 구간별 보상
    pub fn reward(&self, tier: Tier) -> &TierRewardConfig {
        match tier {
            Tier::Weak => &self.weak,
            Tier::Normal => &self.normal,
            Tier::Strong => &self.strong,
        }
    }
}

fn check_percent(name: &str, value: u32) -> Result<(), String> {
    if value > 100 {
        return Err(format!("Invalid {}: {} (must be 0~100)", name, value));
    }
    Ok(())
}

fn check_range(name: &str, min: i32, max: i32) -> Result<(), String> {
    if min > max {
        return Err(format!("Invalid {}: {} > {}", name, min, max));
    }
    Ok(())
}

impl BattleConfig {
    pub fn validate(&self) -> Result<(), String> {
        check_percent("battle.sleep_chance", self.sleep_chance)?;
        check_percent("battle.curse_block_chance", self.curse_block_chance)?;
        check_range("battle.sleep_turns", self.sleep_turns_min, self.sleep_turns_max)?;
        if self.hand_size == 0 {
            return Err("Invalid battle.hand_size: 0".to_string());
        }
        Ok(())
    }
}

impl MapConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.width < 2 || self.rows < 1 {
            return Err(format!("Invalid map size: {}x{}", self.width, self.rows));
        }
        check_range("map.enemy_amount", self.enemy_amount_min, self.enemy_amount_max)?;
        check_range("map.reward_amount", self.reward_amount_min, self.reward_amount_max)?;
        let t = &self.card_thresholds;
        if !(t.right <= t.up && t.up <= t.down && t.down <= t.teleport && t.teleport <= t.rest) {
            return Err(format!("Invalid map.card_thresholds: {:?}", t));
        }
        Ok(())
    }
}

impl EndlessConfig {
    pub fn validate(&self) -> Result<(), String> {
        check_range("endless.length", self.length_min, self.length_max)?;
        if self.normal_tier_floor > self.strong_tier_floor {
            return Err("Invalid endless tier floors".to_string());
        }
        for tier in [&self.weak, &self.normal, &self.strong] {
            check_percent("endless.rare_drop_rate", tier.rare_drop_rate)?;
        }
        Ok(())
    }
}

/// 전역 게임 밸런스 설정 인스턴스
static GAME_BALANCE: Lazy<GameBalanceConfig> = Lazy::new(|| {
    GameBalanceConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load game balance config: {}. Using defaults.", e);
        GameBalanceConfig::default()
    })
});

impl GameBalanceConfig {
    /// 전역 설정 인스턴스 가져오기
    pub fn global() -> &'static GameBalanceConfig {
        &GAME_BALANCE
    }

    /// 설정 파일 로드
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = Self::find_config_file()?;
        let config_content = std::fs::read_to_string(&config_path)?;
        let config = Self::from_toml_str(&config_content)?;

        tracing::info!("Game balance config loaded from: {:?}", config_path);
        Ok(config)
    }

    /// TOML 파싱 + 검증
    pub fn from_toml_str(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: GameBalanceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.battle.validate()?;
        self.map.validate()?;
        self.endless.validate()?;
        check_percent("run.boss_rare_drop_rate", self.run.boss_rare_drop_rate)?;
        Ok(())
    }

    /// 설정 파일 위치 찾기
    fn find_config_file() -> Result<PathBuf, Box<dyn std::error::Error>> {
        // 1. 현재 작업 디렉토리
        let cwd = std::env::current_dir()?;
        let cwd_config = cwd.join("config/game_balance.toml");
        if cwd_config.exists() {
            return Ok(cwd_config);
        }

        // 2. 실행 파일 위치 기준
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let exe_config = exe_dir.join("config/game_balance.toml");
                if exe_config.exists() {
                    return Ok(exe_config);
                }
            }
        }

        Err("Config file not found, using built-in defaults".into())
    }
}

impl Default for GameBalanceConfig {
    /// 기본 설정값
    fn default() -> Self {
        Self {
            battle: BattleConfig {
                hand_size: 5,
                weak_multiplier: 2,
                analyze_turns: 2,
                sleep_chance: 50,
                sleep_turns_min: 2,
                sleep_turns_max: 3,
                curse_turns: 99,
                curse_block_chance: 30,
                charge_cost: 2,
            },
            map: MapConfig {
                width: 6,
                rows: 3,
                player_start_x: 0,
                player_start_y: 1,
                hand_size: 5,
                population_attempts: 100,
                enemy_amount_min: 1,
                enemy_amount_max: 3,
                enemy_ceiling: 3,
                reward_amount_min: 1,
                reward_amount_max: 3,
                reward_ceiling: 6,
                overlap_failsafe: 100,
                card_generation_attempts: 100,
                card_thresholds: MapCardThresholds {
                    right: 41,
                    up: 53,
                    down: 65,
                    teleport: 80,
                    rest: 100,
                },
            },
            player: PlayerConfig {
                initial_heart_point: 8,
                initial_max_heart_point: 8,
                initial_deck: vec![
                    0, 0, 0, 0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 10,
                ],
                initial_inventory: [(0, 4), (1, 5), (2, 5), (3, 5), (4, 1), (5, 1), (6, 1), (10, 1)]
                    .into_iter()
                    .map(|(card_id, count)| InventorySeed { card_id, count })
                    .collect(),
            },
            run: RunConfig {
                deck_size: 20,
                clear_bonus: 10,
                treasure_choices: 3,
                treasure_attempts: 100,
                support_drop_threshold: 15,
                boss_rare_drop_rate: 100,
                max_rank: 3,
            },
            endless: EndlessConfig {
                length_min: 20,
                length_max: 40,
                length_bias_divisor: 15,
                normal_tier_floor: 3,
                strong_tier_floor: 6,
                weak: TierRewardConfig {
                    drop_rank: 1,
                    rare_drop_rate: 10,
                    rest_cards: 2,
                },
                normal: TierRewardConfig {
                    drop_rank: 2,
                    rare_drop_rate: 15,
                    rest_cards: 3,
                },
                strong: TierRewardConfig {
                    drop_rank: 3,
                    rare_drop_rate: 0,
                    rest_cards: 3,
                },
            },
        }
    }
}

/// 편의 헬퍼 함수들
pub mod balance {
    use super::GameBalanceConfig;

    pub fn battle() -> &'static super::BattleConfig {
        &GameBalanceConfig::global().battle
    }

    pub fn map() -> &'static super::MapConfig {
        &GameBalanceConfig::global().map
    }

    pub fn player() -> &'static super::PlayerConfig {
        &GameBalanceConfig::global().player
    }

    pub fn run() -> &'static super::RunConfig {
        &GameBalanceConfig::global().run
    }

    pub fn endless() -> &'static super::EndlessConfig {
        &GameBalanceConfig::global().endless
    }
}
