use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "rspec-cli")]
#[command(about = "Rhai suite runner CLI")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Run every suite document under a directory.
    Run(RunArgs),
    /// List the suites and tests without running them.
    List(ListArgs),
}

#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    #[arg(long = "suites-dir")]
    pub(crate) suites_dir: String,
    /// Regex over leaf test names; non-matching tests are pruned.
    #[arg(long = "filter")]
    pub(crate) filter: Option<String>,
    /// Seed for randomized child ordering. Unseeded runs derive one from
    /// the clock.
    #[arg(long = "seed")]
    pub(crate) seed: Option<u32>,
}

#[derive(Debug, Args)]
pub(crate) struct ListArgs {
    #[arg(long = "suites-dir")]
    pub(crate) suites_dir: String,
}
