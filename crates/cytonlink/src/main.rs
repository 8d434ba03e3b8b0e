mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "cytonlink", version, about = "Biosignal acquisition board CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stream_subcommand() {
        let cli = Cli::try_parse_from([
            "cytonlink",
            "stream",
            "--port",
            "/dev/ttyUSB0",
            "--count",
            "250",
        ])
        .expect("stream args should parse");

        assert!(matches!(cli.command, Command::Stream(_)));
    }

    #[test]
    fn stream_defaults() {
        let cli = Cli::try_parse_from(["cytonlink", "stream"]).unwrap();
        let Command::Stream(args) = cli.command else {
            panic!("expected stream");
        };
        assert!(args.port.is_none());
        assert_eq!(args.baud, 115_200);
        assert!(args.count.is_none());
    }

    #[test]
    fn parses_ports_subcommand() {
        let cli = Cli::try_parse_from(["cytonlink", "ports"]).unwrap();
        assert!(matches!(cli.command, Command::Ports(_)));
    }

    #[test]
    fn parses_raw_format() {
        let cli = Cli::try_parse_from(["cytonlink", "--format", "raw", "stream"]).unwrap();
        assert!(matches!(cli.format, Some(OutputFormat::Raw)));
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["cytonlink", "--format", "xml", "ports"]).is_err());
    }

    #[test]
    fn global_log_level_parses() {
        let cli =
            Cli::try_parse_from(["cytonlink", "--log-level", "debug", "registers"]).unwrap();
        assert!(matches!(cli.log_level, LogLevel::Debug));
    }
}
