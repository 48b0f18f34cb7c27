use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "issueboard")]
#[command(about = "Browse a GitHub repository's issues as a filterable board")]
#[command(version)]
pub struct Args {
    /// Path to config file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Repository owner
    #[arg(long, global = true)]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long, global = true)]
    pub repo: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write the board as static HTML pages
    Render {
        /// Output directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Browse the board in the terminal
    Browse,
}

impl Args {
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Render { out: None })
    }

    /// Applies command-line overrides on top of the loaded config.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(owner) = &self.owner {
            config.owner = Some(owner.clone());
        }
        if let Some(repo) = &self.repo {
            config.repo = Some(repo.clone());
        }
        if let Some(Command::Render { out: Some(out) }) = &self.command {
            config.output_dir = Some(out.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::{Args, Command};
    use crate::config::Config;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn defaults_to_render() {
        let args = Args::try_parse_from(["issueboard"]).expect("parse succeeds");
        assert_eq!(args.command(), Command::Render { out: None });
    }

    #[test]
    fn parses_browse() {
        let args = Args::try_parse_from(["issueboard", "browse"]).expect("parse succeeds");
        assert_eq!(args.command(), Command::Browse);
    }

    #[test]
    fn overrides_take_precedence_over_config() {
        let args = Args::try_parse_from([
            "issueboard",
            "render",
            "--out",
            "public",
            "--owner",
            "acme",
        ])
        .expect("parse succeeds");
        let config = args.apply(Config {
            owner: Some("someone".to_string()),
            repo: Some("board".to_string()),
            ..Config::default()
        });

        assert_eq!(config.owner(), "acme");
        assert_eq!(config.repo(), "board");
        assert_eq!(config.output_dir(), PathBuf::from("public"));
    }

    #[test]
    fn rejects_unknown_command() {
        assert!(Args::try_parse_from(["issueboard", "publish"]).is_err());
    }
}
