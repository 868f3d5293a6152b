use super::r#box::{checked_entry_count, read_table, table_error, FourCC, FullBoxHeader};
use crate::errors::MediaParserResult;
use crate::streams::WindowedStream;
use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;

/// Sizes of every sample of a track, in bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SampleSizeTable {
    /// Every sample has the same size
    Constant { size: u32, sample_count: u32 },
    /// One entry per sample
    PerSample(Vec<u32>),
}

impl SampleSizeTable {
    pub fn sample_count(&self) -> u64 {
        match self {
            SampleSizeTable::Constant { sample_count, .. } => *sample_count as u64,
            SampleSizeTable::PerSample(sizes) => sizes.len() as u64,
        }
    }

    pub fn sample_size(&self, index: usize) -> Option<u32> {
        match self {
            SampleSizeTable::Constant { size, .. } => Some(*size),
            SampleSizeTable::PerSample(sizes) => sizes.get(index).copied(),
        }
    }

    /// Combined size of `count` samples starting at `first`.
    ///
    /// `None` when a per-sample table has fewer than `first + count` entries.
    pub fn sample_sizes(&self, first: usize, count: usize) -> Option<u64> {
        match self {
            SampleSizeTable::Constant { size, .. } => Some(*size as u64 * count as u64),
            SampleSizeTable::PerSample(sizes) => {
                let end = first.checked_add(count)?;
                let run = sizes.get(first..end)?;
                Some(run.iter().map(|&s| s as u64).sum())
            }
        }
    }

    pub fn total_size(&self) -> u64 {
        match self {
            SampleSizeTable::Constant { size, sample_count } => {
                *size as u64 * *sample_count as u64
            }
            SampleSizeTable::PerSample(sizes) => sizes.iter().map(|&s| s as u64).sum(),
        }
    }
}

/// Parse stsz (sample size) box
pub fn parse_stsz(payload: &mut WindowedStream<'_>) -> MediaParserResult<SampleSizeTable> {
    FullBoxHeader::read(payload, FourCC::STSZ)?;
    let sample_size = payload
        .read_u32::<BigEndian>()
        .map_err(table_error(FourCC::STSZ))?;
    let sample_count = payload
        .read_u32::<BigEndian>()
        .map_err(table_error(FourCC::STSZ))?;

    if sample_size != 0 {
        // All samples have the same size
        return Ok(SampleSizeTable::Constant {
            size: sample_size,
            sample_count,
        });
    }

    let count = checked_entry_count(payload, FourCC::STSZ, sample_count, 4)?;
    let sizes = read_table(payload, FourCC::STSZ, count, |p, batch| {
        p.read_u32_into::<BigEndian>(batch)
    })?;
    Ok(SampleSizeTable::PerSample(sizes))
}
