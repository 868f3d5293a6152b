use super::r#box::{
    checked_entry_count, read_box_header, table_error, BoxHeader, FourCC, FullBoxHeader,
    TABLE_BATCH,
};
use crate::errors::{MediaParserResult, Mp4Error};
use crate::streams::WindowedStream;
use byteorder::{BigEndian, ReadBytesExt};
use log::warn;
use serde::Serialize;

/// One sample description entry. Only the codec tag and declared size are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleEntry {
    pub format: FourCC,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SampleDescriptionBox {
    pub header: FullBoxHeader,
    pub entries: Vec<SampleEntry>,
}

impl SampleDescriptionBox {
    /// True when any entry uses one of `formats`. Non-matching entries are logged.
    pub fn matches_any(&self, formats: &[FourCC]) -> bool {
        matches_any(&self.entries, formats)
    }
}

pub(crate) fn matches_any(entries: &[SampleEntry], formats: &[FourCC]) -> bool {
    for entry in entries {
        if formats.contains(&entry.format) {
            return true;
        }
        warn!("Track of wrong type: {}", entry.format);
    }
    false
}

/// Parse stsd (sample description) box.
///
/// Each entry is itself a box; its header is recorded and its codec specific
/// payload skipped.
pub fn parse_stsd(payload: &mut WindowedStream<'_>) -> MediaParserResult<SampleDescriptionBox> {
    let header = FullBoxHeader::read(payload, FourCC::STSD)?;
    let entry_count = payload
        .read_u32::<BigEndian>()
        .map_err(table_error(FourCC::STSD))?;
    let entry_count = checked_entry_count(payload, FourCC::STSD, entry_count, BoxHeader::SIZE)?;

    let mut entries = Vec::with_capacity(entry_count.min(TABLE_BATCH));
    for index in 0..entry_count {
        let entry = read_box_header(payload).map_err(|e| {
            if e.is_end_of_stream() {
                Mp4Error::truncated_table(
                    FourCC::STSD,
                    format!("entry {} of {} missing", index + 1, entry_count),
                )
                .into()
            } else {
                e
            }
        })?;

        let mut entry_payload = WindowedStream::new(payload, entry.payload_size())?;
        if entry_payload.skip_to_end()? > 0 {
            return Err(Mp4Error::truncated_table(
                FourCC::STSD,
                format!("{} entry overruns the box", entry.box_type),
            )
            .into());
        }

        entries.push(SampleEntry {
            format: entry.box_type,
            size: entry.size,
        });
    }

    Ok(SampleDescriptionBox { header, entries })
}
