use clap::{Args, Subcommand};
use grpcwire_frame::FrameConfig;
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Frame payloads and write them out as a gRPC message stream.
    Encode(EncodeArgs),
    /// Read a gRPC message stream and print each message.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub async fn run(command: Command, format: OutputFormat, config: &FrameConfig) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, config).await,
        Command::Decode(args) => decode::run(args, format, config).await,
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Raw string payload (repeatable; one message each).
    #[arg(long, conflicts_with = "json")]
    pub data: Vec<String>,
    /// JSON payload, validated before framing (repeatable).
    #[arg(long)]
    pub json: Vec<String>,
    /// Read a payload from file (repeatable; framed after any --data values).
    #[arg(long, conflicts_with = "json")]
    pub file: Vec<PathBuf>,
    /// Write frames to this file instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Framed input file. Reads stdin when omitted.
    pub input: Option<PathBuf>,
    /// Stop after N messages.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
