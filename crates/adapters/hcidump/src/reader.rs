//! Frame reader over the text output of `hcidump -R`.
//!
//! Each inbound packet starts on a line beginning with `>`, followed by
//! space-separated hex bytes. Outbound (`<`) packets, headers and wrapped
//! continuation lines are skipped.

use std::io;

use nexus_app::ports::FrameReader;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::process::Child;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;

/// Decode one dump line into frame bytes.
///
/// Returns `None` for lines that are not inbound packets, and an error for
/// inbound lines with invalid hex.
pub fn parse_line(line: &str) -> Option<Result<Vec<u8>, hex::FromHexError>> {
    let body = line.strip_prefix('>')?;
    let digits: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    Some(hex::decode(digits))
}

/// Reads frames from any line-oriented dump stream.
///
/// When built with [`with_child`](Self::with_child) the process is owned by
/// the reader and killed when the reader is dropped.
pub struct HexDumpReader<R> {
    lines: LinesStream<R>,
    child: Option<Child>,
}

impl<R: AsyncBufRead> HexDumpReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            lines: LinesStream::new(input.lines()),
            child: None,
        }
    }

    #[must_use]
    pub fn with_child(mut self, child: Child) -> Self {
        self.child = Some(child);
        self
    }
}

impl<R> FrameReader for HexDumpReader<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    async fn next_frame(&mut self) -> io::Result<Option<Vec<u8>>> {
        while let Some(line) = self.lines.next().await {
            match parse_line(&line?) {
                Some(Ok(frame)) => return Ok(Some(frame)),
                Some(Err(err)) => tracing::debug!(error = %err, "skipping malformed dump line"),
                None => {}
            }
        }
        if let Some(child) = self.child.as_mut() {
            let _ = child.start_kill();
        }
        Ok(None)
    }
}
