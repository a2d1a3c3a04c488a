//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tierlog_core::Severity;

#[derive(Parser)]
#[command(name = "tierlog")]
#[command(version, about = "Leveled logging with one rotating file per level")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (.toml, .yaml, .yml or .json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Service name, used as a directory under the log root
    #[arg(long, global = true)]
    pub service: Option<String>,

    /// Log root directory; leave unset to log to stderr
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Minimum level (debug, info, warn, error, dpanic, panic, fatal)
    #[arg(long, env = "TIERLOG_LEVEL", global = true)]
    pub level: Option<Severity>,

    /// Colored console output; DPanic entries fail the command
    #[arg(long, global = true)]
    pub development: bool,

    /// Increase verbosity of tierlog's own diagnostics (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output in JSON format instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write one entry and exit
    Emit(EmitArgs),

    /// Show which file each enabled level is written to
    Routes,

    /// Serve the log level endpoint
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct EmitArgs {
    /// Level of the entry
    #[arg(long, default_value = "info")]
    pub at: Severity,

    /// Message of the entry
    pub message: String,

    /// Extra field as key=value; values that parse as JSON keep their type
    #[arg(short, long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:9090")]
    pub bind: String,
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got {:?}", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_emit() {
        let cli = Cli::try_parse_from([
            "tierlog",
            "--dir",
            "/tmp/logs",
            "emit",
            "--at",
            "WARN",
            "disk full",
            "--field",
            "free=0",
            "-f",
            "mount=/data",
        ])
        .unwrap();

        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/logs")));
        let Commands::Emit(args) = cli.command else {
            panic!("expected emit");
        };
        assert_eq!(args.at, Severity::Warn);
        assert_eq!(args.message, "disk full");
        assert_eq!(
            args.fields,
            vec![
                ("free".to_string(), "0".to_string()),
                ("mount".to_string(), "/data".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("a=b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        assert!(Cli::try_parse_from(["tierlog", "emit", "--at", "loud", "x"]).is_err());
    }
}
