use crate::demo::{run_demo, run_introduction_report, DemoArgs, IntroductionArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use muni_profile::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Municipal Profile Section Service",
    about = "Serve and preview municipal profile report sections from the command line",
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
    /// Build a report section and print it to stdout
    Section {
        #[command(subcommand)]
        command: SectionCommand,
    },
    /// Run an end-to-end CLI demo covering section builds and caching
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum SectionCommand {
    /// Build the introduction section for one municipality
    Introduction(IntroductionArgs),
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
        Command::Section {
            command: SectionCommand::Introduction(args),
        } => run_introduction_report(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
