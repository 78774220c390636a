//! Newline-delimited JSON payload source.
//!
//! Stands in for the pub/sub transport client: each non-blank line of the
//! reader is one payload handed to the [`Ingestor`].

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::decode::Ingestor;

/// Read payload lines until EOF or shutdown. Returns the number of lines read.
///
/// Lines are handed over as raw bytes, so a line that is not UTF-8 is
/// dropped by the decoder like any other malformed payload.
pub async fn read_lines<R>(
    mut reader: R,
    ingestor: Ingestor,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();
    let mut count = 0u64;

    loop {
        line.clear();
        tokio::select! {
            read = reader.read_until(b'\n', &mut line) => {
                if read? == 0 {
                    info!(lines = count, "payload source reached end of input");
                    break;
                }
                let payload = line.trim_ascii();
                if payload.is_empty() {
                    continue;
                }
                count += 1;
                ingestor.ingest(payload);
            }
            _ = shutdown.changed() => {
                debug!(lines = count, "payload source shutting down");
                break;
            }
        }
    }

    Ok(count)
}
