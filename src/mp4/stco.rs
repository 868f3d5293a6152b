use super::r#box::{checked_entry_count, read_table, table_error, FourCC, FullBoxHeader};
use crate::errors::{MediaParserResult, Mp4Error};
use crate::streams::WindowedStream;
use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;

/// Absolute file offsets of every chunk, from either `stco` or `co64`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ChunkOffsetTable {
    Offsets32(Vec<u32>),
    Offsets64(Vec<u64>),
}

impl ChunkOffsetTable {
    pub fn count(&self) -> usize {
        match self {
            ChunkOffsetTable::Offsets32(offsets) => offsets.len(),
            ChunkOffsetTable::Offsets64(offsets) => offsets.len(),
        }
    }

    pub fn offset(&self, index: usize) -> Option<u64> {
        match self {
            ChunkOffsetTable::Offsets32(offsets) => offsets.get(index).map(|&o| o as u64),
            ChunkOffsetTable::Offsets64(offsets) => offsets.get(index).copied(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.count()).filter_map(move |index| self.offset(index))
    }
}

/// Parse stco (32-bit) or co64 (64-bit) chunk offset box, chosen by `box_type`
pub fn parse_chunk_offsets(
    payload: &mut WindowedStream<'_>,
    box_type: FourCC,
) -> MediaParserResult<ChunkOffsetTable> {
    let entry_size = match box_type {
        FourCC::STCO => 4,
        FourCC::CO64 => 8,
        _ => return Err(Mp4Error::UnsupportedBoxVariant { box_type }.into()),
    };

    FullBoxHeader::read(payload, box_type)?;
    let entry_count = payload
        .read_u32::<BigEndian>()
        .map_err(table_error(box_type))?;
    let entry_count = checked_entry_count(payload, box_type, entry_count, entry_size)?;

    if box_type == FourCC::STCO {
        let offsets = read_table(payload, box_type, entry_count, |p, batch| {
            p.read_u32_into::<BigEndian>(batch)
        })?;
        Ok(ChunkOffsetTable::Offsets32(offsets))
    } else {
        let offsets = read_table(payload, box_type, entry_count, |p, batch| {
            p.read_u64_into::<BigEndian>(batch)
        })?;
        Ok(ChunkOffsetTable::Offsets64(offsets))
    }
}
