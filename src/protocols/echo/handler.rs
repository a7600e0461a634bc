//! Echo protocol handler for the Tokio runtime.

use bytes::BytesMut;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

use super::parser::find_line;

/// Read buffer size
const BUFFER_SIZE: usize = 4 * 1024;

/// Handle an echo protocol connection.
///
/// Every complete line is written back verbatim, delimiter included, as
/// soon as it has been read. Returns `Ok(())` when the peer closes the
/// connection; any bytes after the last `\n` are dropped at that point.
/// The stream is closed when this function returns, on every path.
pub async fn handle_connection<S>(mut stream: S) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buffer = BytesMut::with_capacity(BUFFER_SIZE);
    // Prefix of `buffer` already known to hold no delimiter
    let mut scanned = 0;

    loop {
        while let Some(len) = find_line(&buffer[scanned..]) {
            let line = buffer.split_to(scanned + len);
            scanned = 0;
            trace!(len = line.len(), "Echoing line");
            stream.write_all(&line).await?;
        }
        scanned = buffer.len();

        let n = stream.read_buf(&mut buffer).await?;
        if n == 0 {
            if buffer.is_empty() {
                trace!("Connection closed by client");
            } else {
                trace!(discarded = buffer.len(), "Connection closed mid-line");
            }
            return Ok(());
        }
    }
}
