mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;
use grpcwire_frame::{FrameConfig, MAX_MESSAGE_SIZE};

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "grpcwire", version, about = "gRPC message framing CLI")]
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

    /// Largest message accepted or produced, in bytes (capped at 2147483647).
    #[arg(
        long,
        value_name = "BYTES",
        env = "GRPCWIRE_MAX_MESSAGE_SIZE",
        default_value_t = MAX_MESSAGE_SIZE,
        global = true
    )]
    max_message_size: usize,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let config = FrameConfig {
        max_message_size: cli.max_message_size,
    };
    let result = cmd::run(cli.command, format, &config).await;

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
    fn parses_encode_subcommand() {
        let cli = Cli::try_parse_from([
            "grpcwire",
            "encode",
            "--data",
            "hello",
            "--data",
            "world",
            "--output",
            "/tmp/out.bin",
        ])
        .expect("encode args should parse");

        match cli.command {
            Command::Encode(args) => {
                assert_eq!(args.data, vec!["hello".to_string(), "world".to_string()]);
                assert!(args.output.is_some());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_decode_subcommand_with_global_limit() {
        let cli = Cli::try_parse_from([
            "grpcwire",
            "decode",
            "/tmp/in.bin",
            "--count",
            "2",
            "--max-message-size",
            "1024",
        ])
        .expect("decode args should parse");

        assert_eq!(cli.max_message_size, 1024);
        assert!(matches!(cli.command, Command::Decode(ref args) if args.count == Some(2)));
    }

    #[test]
    fn default_limit_is_protocol_maximum() {
        let cli = Cli::try_parse_from(["grpcwire", "version"]).expect("version should parse");
        assert_eq!(cli.max_message_size, MAX_MESSAGE_SIZE);
    }

    #[test]
    fn rejects_conflicting_payload_args() {
        let err = Cli::try_parse_from([
            "grpcwire",
            "encode",
            "--json",
            "{\"x\":1}",
            "--data",
            "hello",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
