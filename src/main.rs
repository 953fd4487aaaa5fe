use clap::Parser;
use forest_core::{
    config::balance,
    game::{battle::BattlePhase, data::card_data::EffectKind},
    setup_logger, GameDataBase, LogExt, PlayerBehavior, RunSession, SessionSignal, SessionState,
};
use tracing::info;

// main
#[derive(Parser)]
#[command(
    name = "forest_sim",                      // 프로그램 이름
    version = env!("CARGO_PKG_VERSION"),      // 버전
    about = env!("CARGO_PKG_DESCRIPTION"),    // 짧은 설명
    long_about = None,                        // 긴 설명 (None은 미사용)
)]
struct Args {
    /// 런 시드
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// 엔드리스 모드로 시작
    #[arg(long)]
    endless: bool,

    /// 입력 상한 (엔드리스는 끝나지 않으므로)
    #[arg(long = "max-turns", default_value_t = 2000)]
    max_turns: u32,
}

/// 가장 단순한 자동 진행 정책
fn next_behavior(session: &RunSession, endless: bool) -> Option<PlayerBehavior> {
    let behavior = match session.state() {
        SessionState::Title => PlayerBehavior::Choose {
            option_index: usize::from(endless),
        },
        SessionState::Exploring => {
            let hand = session.map_hand().cards();
            let hand_index = hand
                .iter()
                .position(|card| card.kind().grants_right_move())
                .unwrap_or(0);
            PlayerBehavior::PlayMapCard { hand_index }
        }
        SessionState::Battle => {
            let battle = session.battle()?;
            match battle.phase() {
                BattlePhase::AwaitingSecondCardSelection(_) => PlayerBehavior::SelectDualCard {
                    hand_index: *battle.selectable().first()?,
                },
                _ => {
                    let cards = battle.hand().cards();
                    let hand_index = cards
                        .iter()
                        .position(|card| card.kind() == EffectKind::Heal && battle.player().heart_point <= 3)
                        .or_else(|| cards.iter().position(|card| card.is_attack()))
                        .unwrap_or(0);
                    PlayerBehavior::PlayBattleCard { hand_index }
                }
            }
        }
        SessionState::Treasure => PlayerBehavior::ClaimTreasure { choice_index: 0 },
        SessionState::DeckEdit => PlayerBehavior::FinishDeckEdit,
        SessionState::GameOver | SessionState::Completed => return None,
    };
    Some(behavior)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logger();

    info!(
        "Balance: map {}x{}, hand {}, deck {}",
        balance::map().width,
        balance::map().rows,
        balance::battle().hand_size,
        balance::run().deck_size
    );
    if args.endless {
        let endless = balance::endless();
        info!(
            "Endless tiers: normal from floor {}, strong from floor {}",
            endless.normal_tier_floor, endless.strong_tier_floor
        );
    }

    let data = GameDataBase::load_embedded()?;
    let mut session = RunSession::with_global_balance(data, args.seed);
    let mut last_signal: Option<SessionSignal> = None;

    for turn in 0..args.max_turns {
        let Some(behavior) = next_behavior(&session, args.endless) else {
            break;
        };
        let result = session
            .execute(behavior.clone())
            .log_err(&format!("turn {} {:?}", turn, behavior))?;
        if let Some(signal) = result.signals.into_iter().last() {
            last_signal = Some(signal);
        }
    }

    info!("Simulation finished in state {:?}", session.state());
    println!("{}", serde_json::to_string_pretty(&last_signal)?);
    Ok(())
}
