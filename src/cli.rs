use clap::{Parser, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
pub struct Opts {
    /// Billing settings for the month
    #[clap(short, long, default_value="settings.json",
        value_hint=ValueHint::FilePath)]
    pub settings: PathBuf,

    #[clap(subcommand)]
    pub subcommand: Command,
}

#[derive(Parser)]
pub enum Command {
    /// Generate the invoice and work report drafts for the configured month
    Generate,
}
