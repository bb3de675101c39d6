use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sc-cli")]
#[command(about = "Scenario expression templates and assertion cases")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Execute one template and print its value as JSON.
    Render(RenderArgs),
    /// Run every `.case.json` file under a directory.
    Run(RunArgs),
}

#[derive(Debug, Args)]
pub(crate) struct RenderArgs {
    #[arg(long = "template")]
    pub(crate) template: String,
    /// JSON file exposed to the template as `vars`.
    #[arg(long = "vars")]
    pub(crate) vars: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    #[arg(long = "cases-dir")]
    pub(crate) cases_dir: String,
    #[arg(long = "fail-fast")]
    pub(crate) fail_fast: bool,
}
