use grpcwire_frame::{FrameConfig, FrameHeader, FrameWriter};
use tokio::io::{AsyncReadExt, AsyncWrite};

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, SUCCESS, USAGE};

pub async fn run(args: EncodeArgs, config: &FrameConfig) -> CliResult<i32> {
    let payloads = resolve_payloads(&args).await?;
    check_payloads(&payloads, config)?;

    match &args.output {
        Some(path) => {
            let file = tokio::fs::File::create(path).await.map_err(|err| {
                io_error(&format!("failed creating {}", path.display()), err)
            })?;
            write_messages(FrameWriter::with_config(file, config.clone()), &payloads).await?;
        }
        None => {
            let stdout = tokio::io::stdout();
            write_messages(FrameWriter::with_config(stdout, config.clone()), &payloads).await?;
        }
    }

    Ok(SUCCESS)
}

async fn write_messages<W>(mut writer: FrameWriter<W>, payloads: &[Vec<u8>]) -> CliResult<()>
where
    W: AsyncWrite + Unpin,
{
    for payload in payloads {
        writer
            .write_message(payload)
            .await
            .map_err(|err| frame_error("encode failed", err))?;
    }
    writer
        .shutdown()
        .await
        .map_err(|err| frame_error("encode failed", err))?;

    tracing::info!(messages = writer.messages_written(), "encoded messages");
    Ok(())
}

/// Reject the whole batch before `--output` is truncated or any frame is
/// written.
fn check_payloads(payloads: &[Vec<u8>], config: &FrameConfig) -> CliResult<()> {
    for (index, payload) in payloads.iter().enumerate() {
        FrameHeader::for_payload(payload.len(), config.effective_max())
            .map_err(|err| frame_error(&format!("encode failed for payload {index}"), err))?;
    }
    Ok(())
}

/// Collect payloads in output order: `--json`, then `--data`, then `--file`.
/// With none of them, stdin is read whole as a single payload.
async fn resolve_payloads(args: &EncodeArgs) -> CliResult<Vec<Vec<u8>>> {
    let mut payloads = Vec::new();

    for json in &args.json {
        serde_json::from_str::<serde_json::Value>(json)
            .map_err(|err| CliError::new(USAGE, format!("--json is not valid JSON: {err}")))?;
        payloads.push(json.as_bytes().to_vec());
    }
    for data in &args.data {
        payloads.push(data.as_bytes().to_vec());
    }
    for path in &args.file {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        payloads.push(bytes);
    }

    if payloads.is_empty() {
        let mut stdin = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut stdin)
            .await
            .map_err(|err| io_error("failed reading stdin", err))?;
        payloads.push(stdin);
    }

    Ok(payloads)
}
