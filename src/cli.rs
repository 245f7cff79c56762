use std::path::PathBuf;

use crate::ids::{ChannelId, PlayerId, ServerId};

/// Play chat Wordle from a terminal. Each line of input is one chat message.
#[derive(clap::Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Config file; defaults to `wordle-corner.toml` if present.
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "local")]
    pub server: String,

    #[arg(long, default_value = "general")]
    pub channel: String,

    /// Who the first messages come from. Switch with `/player <name>`.
    #[arg(long, default_value = "player")]
    pub player: String,
}

impl Cli {
    pub fn ids(&self) -> (ServerId, ChannelId, PlayerId) {
        (
            ServerId::new(self.server.as_str()),
            ChannelId::new(self.channel.as_str()),
            PlayerId::new(self.player.as_str()),
        )
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::Cli;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["wordle-corner"]);
        let (server, channel, player) = cli.ids();

        assert_eq!(cli.config, None);
        assert_eq!(server.as_str(), "local");
        assert_eq!(channel.as_str(), "general");
        assert_eq!(player.as_str(), "player");
    }

    #[test]
    fn overrides() {
        let cli = Cli::parse_from([
            "wordle-corner",
            "-c",
            "/etc/wordle.toml",
            "--channel",
            "puzzles",
        ]);

        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("/etc/wordle.toml"))
        );
        assert_eq!(cli.channel, "puzzles");
    }
}
