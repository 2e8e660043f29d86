use crate::commands::{run_install, run_list};
use crate::server;
use clap::{Args, Parser, Subcommand};
use inquiry_form::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Workshop Inquiry Form",
    about = "Serve the workshop inquiry form and review its submissions",
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
    /// Create the submissions table if it does not exist, then exit
    Install,
    /// Inspect stored submissions
    Submissions {
        #[command(subcommand)]
        command: SubmissionsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SubmissionsCommand {
    /// Print every submission, newest first
    List,
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
        Command::Install => run_install(),
        Command::Submissions {
            command: SubmissionsCommand::List,
        } => run_list(),
    }
}
