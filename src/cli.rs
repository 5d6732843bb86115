use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "adboard")]
#[command(author, version, about = "Telegram bot for moderated job ads", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (long polling)
    Run,

    /// Print the effective configuration and exit
    CheckConfig,

    /// Print a published ad by its code, with the phone line
    ShowAd {
        /// Ad code, e.g. E-12345
        code: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
