//! Minimal echo loop over an in-memory duplex stream.
//!
//! One task reads messages and writes each one back; the client sends a few
//! payloads, closes its write half, and prints the echoes until end-of-stream.
//!
//! Run with:
//!   cargo run --example duplex-echo

use grpcwire::frame::{FrameReader, FrameWriter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (client, server) = tokio::io::duplex(64);

    let echo = tokio::spawn(async move {
        let (read_half, write_half) = tokio::io::split(server);
        let mut reader = FrameReader::new(read_half);
        let mut writer = FrameWriter::new(write_half);

        while let Some(payload) = reader.read_message().await? {
            eprintln!("Echoing {} bytes", payload.len());
            writer.write_message(&payload).await?;
        }
        writer.shutdown().await?;
        Ok::<_, grpcwire::frame::FrameError>(reader.messages_read())
    });

    let (read_half, write_half) = tokio::io::split(client);
    let mut writer = FrameWriter::new(write_half);
    for payload in ["hello", "", "world"] {
        writer.write_message(payload.as_bytes()).await?;
    }
    writer.shutdown().await?;

    let mut reader = FrameReader::new(read_half);
    while let Some(payload) = reader.read_message().await? {
        println!("{:?}", String::from_utf8_lossy(&payload));
    }

    let echoed = echo.await??;
    eprintln!("Echo task handled {echoed} messages");
    Ok(())
}
