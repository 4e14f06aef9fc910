/// Snapshot provider so cached records survive a restart without waiting
/// for the next crawl. The service stores a snapshot after each completed
/// crawl and loads one at startup when configured.
use crate::types::PlayerRecord;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

pub trait SnapshotProvider: Send + Sync {
    fn load(&self) -> Result<Vec<PlayerRecord>, SnapshotError>;
    fn store(&self, records: &[PlayerRecord]) -> Result<(), SnapshotError>;
}

#[derive(Clone)]
enum Compression {
    #[allow(dead_code)]
    None,
    // zstd with compression level
    Zstd(i32),
}

struct Codec {
    compression: Compression,
    config: bincode::config::Configuration,
}

impl Codec {
    fn new(compression: Compression) -> Self {
        Codec {
            compression,
            config: bincode::config::standard(),
        }
    }

    fn write<W: Write>(&self, writer: &mut W, records: &[PlayerRecord]) -> Result<usize, SnapshotError> {
        match self.compression {
            Compression::None => {
                let size = bincode::serde::encode_into_std_write(records, writer, self.config)?;
                writer.flush()?;
                Ok(size)
            }
            Compression::Zstd(level) => {
                let mut encoder = zstd::stream::write::Encoder::new(writer, level)?;
                let size = bincode::serde::encode_into_std_write(records, &mut encoder, self.config)?;
                encoder.finish()?;
                Ok(size)
            }
        }
    }

    fn read<R: Read>(&self, mut reader: R) -> Result<Vec<PlayerRecord>, SnapshotError> {
        match self.compression {
            Compression::None => {
                let records = bincode::serde::decode_from_std_read(&mut reader, self.config)?;
                Ok(records)
            }
            Compression::Zstd(_) => {
                let mut decoder = zstd::stream::read::Decoder::new(reader)?;
                let records = bincode::serde::decode_from_std_read(&mut decoder, self.config)?;
                Ok(records)
            }
        }
    }
}

// No-op provider for tests and for running without persistence.
pub struct NoopSnapshotProvider {}

impl SnapshotProvider for NoopSnapshotProvider {
    fn load(&self) -> Result<Vec<PlayerRecord>, SnapshotError> {
        Ok(Vec::new())
    }

    fn store(&self, _records: &[PlayerRecord]) -> Result<(), SnapshotError> {
        Ok(())
    }
}

pub struct FilesystemSnapshotProvider {
    path: PathBuf,
    codec: Codec,
}

impl FilesystemSnapshotProvider {
    pub fn new(base_dir: &str, filename: &str) -> Self {
        FilesystemSnapshotProvider {
            path: Path::new(base_dir).join(filename),
            codec: Codec::new(Compression::Zstd(1)),
        }
    }
}

impl SnapshotProvider for FilesystemSnapshotProvider {
    fn load(&self) -> Result<Vec<PlayerRecord>, SnapshotError> {
        let file = File::open(&self.path)?;
        let reader = io::BufReader::new(file);
        self.codec.read(reader)
    }

    fn store(&self, records: &[PlayerRecord]) -> Result<(), SnapshotError> {
        let file = File::create(&self.path)?;
        let mut writer = io::BufWriter::new(file);
        let size = self.codec.write(&mut writer, records)?;

        tracing::info!(path = ?self.path, bytes = size, records = records.len(), "Stored player snapshot");

        Ok(())
    }
}
