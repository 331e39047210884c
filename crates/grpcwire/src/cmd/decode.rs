use std::io::{self, ErrorKind};

use grpcwire_frame::{FrameConfig, FrameReader};
use tokio::io::AsyncRead;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub async fn run(args: DecodeArgs, format: OutputFormat, config: &FrameConfig) -> CliResult<i32> {
    let mut stdout = io::stdout().lock();
    let printed = match &args.input {
        Some(path) => {
            let file = tokio::fs::File::open(path).await.map_err(|err| {
                io_error(&format!("failed opening {}", path.display()), err)
            })?;
            let reader = FrameReader::with_config(file, config.clone());
            decode_stream(reader, args.count, |index, payload| {
                print_message(&mut stdout, index, payload, format)
            })
            .await?
        }
        None => {
            let reader = FrameReader::with_config(tokio::io::stdin(), config.clone());
            decode_stream(reader, args.count, |index, payload| {
                print_message(&mut stdout, index, payload, format)
            })
            .await?
        }
    };

    tracing::info!(messages = printed, "decoded messages");
    Ok(SUCCESS)
}

/// Read messages until end-of-stream or `limit`, handing each to `sink`.
///
/// Messages already handed over stay emitted when a later frame fails. A
/// sink that reports a broken pipe ends the loop without an error.
async fn decode_stream<R, F>(
    mut reader: FrameReader<R>,
    limit: Option<usize>,
    mut sink: F,
) -> CliResult<u64>
where
    R: AsyncRead + Unpin,
    F: FnMut(u64, &[u8]) -> io::Result<()>,
{
    loop {
        if let Some(limit) = limit {
            if reader.messages_read() >= limit as u64 {
                break;
            }
        }

        let index = reader.messages_read();
        match reader.read_message().await {
            Ok(Some(payload)) => match sink(index, payload.as_ref()) {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                    tracing::debug!(index, "output closed, stopping decode");
                    break;
                }
                Err(err) => return Err(io_error("failed writing output", err)),
            },
            Ok(None) => break,
            Err(err) => {
                tracing::warn!(index, error = %err, "decode stopped");
                return Err(frame_error(&format!("decode failed at message {index}"), err));
            }
        }
    }

    Ok(reader.messages_read())
}
