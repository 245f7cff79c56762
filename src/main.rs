#![warn(clippy::perf)]
#![warn(clippy::unwrap_used)]

use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing_unwrap::ResultExt;

use wordle_corner::{
    cli::Cli,
    config::AppConfig,
    console::Console,
    logging,
    storage::AnyStorage,
    wordle::{GameSessions, WordsList},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // tracing isn't up yet, so this one just bubbles out
    let config = AppConfig::load(cli.config.as_deref())?;
    logging::init_tracing(&config.logs.filter);

    info!("wordle-corner {}", env!("CARGO_PKG_VERSION"));

    let words = WordsList::load(&config.words.answers, &config.words.guesses)
        .expect_or_log("words lists should load");

    let storage = AnyStorage::connect(&config.storage)
        .await
        .expect_or_log("storage should open");

    let sessions = GameSessions::new(storage, words, config.leaderboard);
    let (server, channel, player) = cli.ids();
    info!(%server, %channel, %player, "reading messages from stdin");

    Console::new(sessions, server, channel, player)
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    Ok(())
}
