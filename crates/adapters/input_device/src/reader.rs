//! Fixed-size record reader.

use std::io;

use nexus_app::ports::FrameReader;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::event::RECORD_SIZE;

/// Reads whole `input_event` records; a partial record at end of stream is
/// treated as end of stream.
pub struct RecordReader<R> {
    input: R,
}

impl<R> RecordReader<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R> FrameReader for RecordReader<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    async fn next_frame(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut record = vec![0; RECORD_SIZE];
        match self.input.read_exact(&mut record).await {
            Ok(_) => Ok(Some(record)),
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(err) => Err(err),
        }
    }
}
