// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local file transports.
//!
//! Files are opened on first use, not at construction, so building a plugin
//! set never touches the filesystem.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use tapline_config::model::FileOutputConfig;
use tapline_core::{Plugin, Readable, RelayError, TransportKind, Writable};

use crate::codec::{encode, read_frame};

/// Replays payloads from a recorded file.
pub struct FileInput {
    path: PathBuf,
    name: String,
    looped: bool,
    state: Mutex<ReadState>,
}

enum ReadState {
    Pending,
    Open {
        reader: BufReader<File>,
        /// Payloads read since the file was (re)opened.
        read: u64,
    },
    Closed,
}

impl FileInput {
    pub fn new(address: &str, looped: bool) -> Self {
        Self {
            path: PathBuf::from(address),
            name: format!("file-input:{address}"),
            looped,
            state: Mutex::new(ReadState::Pending),
        }
    }

    fn closed(&self) -> RelayError {
        RelayError::Closed {
            name: self.name.clone(),
        }
    }
}

#[async_trait]
impl Plugin for FileInput {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TransportKind {
        TransportKind::FileInput
    }

    async fn close(&self) -> Result<(), RelayError> {
        *self.state.lock().await = ReadState::Closed;
        Ok(())
    }
}

#[async_trait]
impl Readable for FileInput {
    /// At end of file a looping input starts over; otherwise it reports closed.
    async fn read_payload(&self) -> Result<Vec<u8>, RelayError> {
        let mut state = self.state.lock().await;
        loop {
            match &mut *state {
                ReadState::Closed => return Err(self.closed()),
                ReadState::Pending => {
                    let file = File::open(&self.path).await?;
                    debug!(path = %self.path.display(), "file input opened");
                    *state = ReadState::Open {
                        reader: BufReader::new(file),
                        read: 0,
                    };
                }
                ReadState::Open { reader, read } => match read_frame(reader).await? {
                    Some(payload) => {
                        *read += 1;
                        return Ok(payload);
                    }
                    // An empty file would loop forever.
                    None if self.looped && *read > 0 => *state = ReadState::Pending,
                    None => {
                        *state = ReadState::Closed;
                        return Err(self.closed());
                    }
                },
            }
        }
    }
}

/// Records payloads to a local file, one frame per payload.
pub struct FileOutput {
    path: PathBuf,
    name: String,
    config: Arc<FileOutputConfig>,
    state: Mutex<WriteState>,
}

enum WriteState {
    Pending,
    Open {
        writer: BufWriter<File>,
        written: u64,
        queued: usize,
        last_flush: Instant,
    },
    Closed,
}

impl FileOutput {
    pub fn new(address: &str, config: Arc<FileOutputConfig>) -> Self {
        Self {
            path: PathBuf::from(address),
            name: format!("file-output:{address}"),
            config,
            state: Mutex::new(WriteState::Pending),
        }
    }

    fn closed(&self) -> RelayError {
        RelayError::Closed {
            name: self.name.clone(),
        }
    }

    async fn open(&self) -> Result<WriteState, RelayError> {
        let mut options = OpenOptions::new();
        options.create(true);
        if self.config.append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        let file = options.open(&self.path).await?;
        let written = file.metadata().await?.len();
        debug!(path = %self.path.display(), append = self.config.append, "file output opened");
        Ok(WriteState::Open {
            writer: BufWriter::new(file),
            written,
            queued: 0,
            last_flush: Instant::now(),
        })
    }
}

#[async_trait]
impl Plugin for FileOutput {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TransportKind {
        TransportKind::FileOutput
    }

    async fn close(&self) -> Result<(), RelayError> {
        let mut state = self.state.lock().await;
        if let WriteState::Open { writer, .. } = &mut *state {
            writer.flush().await?;
        }
        *state = WriteState::Closed;
        Ok(())
    }
}

#[async_trait]
impl Writable for FileOutput {
    /// Buffered; flushed every `queue_limit` payloads or `flush_interval_ms`,
    /// whichever comes first. Once the file reaches `size_limit` further
    /// writes are refused.
    async fn write_payload(&self, payload: &[u8]) -> Result<usize, RelayError> {
        let mut state = self.state.lock().await;
        if matches!(*state, WriteState::Pending) {
            *state = self.open().await?;
        }
        let WriteState::Open {
            writer,
            written,
            queued,
            last_flush,
        } = &mut *state
        else {
            return Err(self.closed());
        };

        let frame = encode(payload);
        if let Some(limit) = self.config.size_limit
            && *written + frame.len() as u64 > limit
        {
            writer.flush().await?;
            debug!(path = %self.path.display(), limit, "file output reached size limit");
            *state = WriteState::Closed;
            return Err(self.closed());
        }

        writer.write_all(&frame).await?;
        *written += frame.len() as u64;
        *queued += 1;

        let interval = Duration::from_millis(self.config.flush_interval_ms);
        if *queued >= self.config.queue_limit || last_flush.elapsed() >= interval {
            writer.flush().await?;
            *queued = 0;
            *last_flush = Instant::now();
        }
        Ok(payload.len())
    }
}
