//! Shared helpers for integration tests.

#![allow(dead_code)]

use once_cell::sync::OnceCell;
use stoppa::config::GameConfig;
use stoppa::game::{Game, HistoryVerb};
use tracing_subscriber::{fmt, EnvFilter};

static LOGGING: OnceCell<()> = OnceCell::new();

/// Install a test subscriber once. Level comes from `TEST_LOG`, then
/// `RUST_LOG`, then defaults to `warn`.
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt().with_env_filter(filter).with_test_writer().without_time().try_init().ok();
    });
}

/// Five human seats, no autoplay needed.
pub fn human_table(seed: u64) -> Game {
    init_logging();
    Game::new(GameConfig::with_humans(5).with_seed(seed)).unwrap()
}

/// Five agent seats.
pub fn agent_table(seed: u64, autoplay: bool) -> Game {
    init_logging();
    Game::new(GameConfig::with_humans(0).with_seed(seed).with_autoplay(autoplay)).unwrap()
}

pub fn wins(game: &Game) -> usize {
    game.history_recent(game.history_len())
        .iter()
        .filter(|e| e.verb == HistoryVerb::Win)
        .count()
}
