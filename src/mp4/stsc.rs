use super::r#box::{checked_entry_count, read_table, table_error, FourCC, FullBoxHeader};
use crate::errors::MediaParserResult;
use crate::streams::WindowedStream;
use byteorder::{BigEndian, ReadBytesExt};
use log::warn;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleToChunkEntry {
    /// 1-based index of the first chunk this run applies to
    pub first_chunk: u32,
    pub samples_per_chunk: u32,
    pub sample_description_index: u32,
}

/// Run-length mapping from chunks to the number of samples they hold
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SampleToChunkTable {
    pub entries: Vec<SampleToChunkEntry>,
}

impl SampleToChunkTable {
    /// Number of samples in the chunk at 0-based `chunk_index`.
    ///
    /// A run applies from its `first_chunk` until the next run starts, so the
    /// answer comes from the last entry whose `first_chunk` does not exceed the
    /// chunk's 1-based number. `None` when no entry covers the chunk.
    pub fn chunk_sample_count(&self, chunk_index: usize) -> Option<u32> {
        let chunk_number = chunk_index as u64 + 1;
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.first_chunk as u64 <= chunk_number)
            .map(|entry| entry.samples_per_chunk)
    }
}

/// Parse stsc (sample to chunk) box
pub fn parse_stsc(payload: &mut WindowedStream<'_>) -> MediaParserResult<SampleToChunkTable> {
    FullBoxHeader::read(payload, FourCC::STSC)?;
    let entry_count = payload
        .read_u32::<BigEndian>()
        .map_err(table_error(FourCC::STSC))?;
    let entry_count = checked_entry_count(payload, FourCC::STSC, entry_count, 12)?;

    let raw = read_table(payload, FourCC::STSC, entry_count * 3, |p, batch| {
        p.read_u32_into::<BigEndian>(batch)
    })?;

    let entries: Vec<SampleToChunkEntry> = raw
        .chunks_exact(3)
        .map(|entry| SampleToChunkEntry {
            first_chunk: entry[0],
            samples_per_chunk: entry[1],
            sample_description_index: entry[2],
        })
        .collect();

    if entries
        .windows(2)
        .any(|pair| pair[0].first_chunk >= pair[1].first_chunk)
    {
        warn!("stsc entries are not in ascending first_chunk order");
    }

    Ok(SampleToChunkTable { entries })
}
