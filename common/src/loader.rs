//! Reading and writing hit tables.
//!
//! A hit table is a sequence of JSON objects, one per record, each carrying
//! the integer fields `Run`, `Event`, `Wire` and `HitTime`. Records may be
//! separated by any whitespace, so both JSON-lines and concatenated objects
//! are accepted.
use crate::Hit;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot open hit file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed hit record {index}: {source}")]
    Parse {
        index: usize,
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Cannot create file {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Serialisation Error: {0}")]
    Serialise(#[from] serde_json::Error),
    #[error("IO Error: {0}")]
    IO(#[from] std::io::Error),
}

/// Reads at most `limit` hits from `reader`, in stream order.
pub fn read_hits<R: Read>(reader: R, limit: Option<usize>) -> Result<Vec<Hit>, LoadError> {
    serde_json::Deserializer::from_reader(reader)
        .into_iter::<Hit>()
        .take(limit.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(index, hit)| hit.map_err(|source| LoadError::Parse { index, source }))
        .collect()
}

pub fn load_hits(path: &Path, limit: Option<usize>) -> Result<Vec<Hit>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_owned(),
        source,
    })?;
    let hits = read_hits(BufReader::new(file), limit)?;
    info!("Loaded {} hits from {}", hits.len(), path.display());
    Ok(hits)
}

pub fn write_hits<W: Write>(mut writer: W, hits: &[Hit]) -> Result<(), WriteError> {
    for hit in hits {
        serde_json::to_writer(&mut writer, hit)?;
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_hits(path: &Path, hits: &[Hit]) -> Result<(), WriteError> {
    let file = File::create(path).map_err(|source| WriteError::Create {
        path: path.to_owned(),
        source,
    })?;
    write_hits(BufWriter::new(file), hits)?;
    debug!("Wrote {} hits to {}", hits.len(), path.display());
    Ok(())
}
