use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod ports;
pub mod registers;
pub mod stream;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stream decoded samples from the board.
    Stream(StreamArgs),
    /// List serial ports visible to the host.
    Ports(PortsArgs),
    /// Dump the board's register settings.
    Registers(RegistersArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Stream(args) => stream::run(args, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Registers(args) => registers::run(args),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct StreamArgs {
    /// Serial port to open. Autodetected when omitted.
    #[arg(long, short = 'p')]
    pub port: Option<String>,
    /// Baud rate.
    #[arg(long, default_value_t = 115_200)]
    pub baud: u32,
    /// Exit after streaming N samples.
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct PortsArgs {
    /// Only show ports matching the board's USB bridge pattern.
    #[arg(long)]
    pub board_only: bool,
}

#[derive(Args, Debug)]
pub struct RegistersArgs {
    /// Serial port to open. Autodetected when omitted.
    #[arg(long, short = 'p')]
    pub port: Option<String>,
    /// Baud rate.
    #[arg(long, default_value_t = 115_200)]
    pub baud: u32,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Print extended build information.
    #[arg(long)]
    pub extended: bool,
}

/// Resolve an explicit port argument or fall back to autodetection.
pub fn resolve_port(port: Option<String>) -> CliResult<String> {
    match port {
        Some(port) => Ok(port),
        None => cytonlink_transport::find_board_port()
            .map_err(|err| crate::exit::transport_error("port autodetection failed", err)),
    }
}
