use std::sync::Once;

use once_cell::sync::OnceCell;
use tracing::Level;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod game;

pub use game::{
    behavior::{BehaviorResult, GameError, GameEvent, LogExt, PlayerBehavior, SessionSignal},
    data::GameDataBase,
    session::{RunSession, SessionState},
};

static INIT: Once = Once::new();
static GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// logs/app.log 에 시간 단위로 나눠 기록
///
/// RUST_LOG 로 필터를 덧붙일 수 있고, 기본은 INFO. 여러 번 불려도 한 번만 초기화된다.
pub fn setup_logger() {
    INIT.call_once(|| {
        let file_appender = RollingFileAppender::new(Rotation::HOURLY, "logs", "app.log");

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let installed = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
            .with_thread_ids(true)
            .with_ansi(false)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .with_writer(non_blocking)
            .pretty()
            .try_init();

        if installed.is_ok() {
            let _ = GUARD.set(guard);
        }
    });
}
