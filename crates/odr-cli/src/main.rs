mod commands;
mod opts;
mod surface;
mod util;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::rc::{ListArgs, SetArgs, SetKnownArgs};
use opts::ApiOpts;

#[derive(Parser, Debug)]
#[command(name = "odr", version, about = "Modulator remote-control CLI")]
struct Cli {
    #[command(flatten)]
    opts: ApiOpts,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remote-control parameters
    #[command(subcommand)]
    Rc(RcCommand),
}

#[derive(Subcommand, Debug)]
enum RcCommand {
    /// List all controllables and their parameters
    List(ListArgs),

    /// Write one parameter of a controllable
    Set(SetArgs),

    /// Write a well-known parameter by name (txgain, rxgain, digital-gain, coeffile)
    SetKnown(SetKnownArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    util::load_dotenv()?;
    let cli = Cli::parse();
    util::setup_logging(cli.opts.verbose);
    let opts = &cli.opts;

    match cli.command {
        Command::Rc(cmd) => match cmd {
            RcCommand::List(args) => commands::rc::cmd_list(opts, &args).await,
            RcCommand::Set(args) => commands::rc::cmd_set(opts, &args).await,
            RcCommand::SetKnown(args) => commands::rc::cmd_set_known(opts, &args).await,
        },
    }
}
