use crate::demo::{run_demo, run_slots, run_validate, DemoArgs, SlotsArgs, ValidateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use opptak::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "opptak-api",
    about = "Run and exercise the recruitment period scheduler from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Check a period draft (JSON) against the period rules
    Validate(ValidateArgs),
    /// Print the interview slot grid for one working day
    Slots(SlotsArgs),
    /// Walk a sample period through validation, intake gating, and slot selection
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Validate(args) => run_validate(args),
        Command::Slots(args) => run_slots(args),
        Command::Demo(args) => run_demo(args),
    }
}
