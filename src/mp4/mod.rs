pub mod r#box;
pub use r#box::{
    read_box_header, scan_boxes, write_box_header, BoxHeader, FourCC, FullBoxHeader, ScanControl,
};
pub mod hdlr;
pub use hdlr::{parse_hdlr, HandlerBox, TrackType};
pub mod stsd;
pub use stsd::{parse_stsd, SampleDescriptionBox, SampleEntry};
pub mod stsz;
pub use stsz::{parse_stsz, SampleSizeTable};
pub mod stsc;
pub use stsc::{parse_stsc, SampleToChunkEntry, SampleToChunkTable};
pub mod stco;
pub use stco::{parse_chunk_offsets, ChunkOffsetTable};
pub mod track;
pub use track::{find_audio_tracks, read_track, Track, TrackSummary};
pub mod dump; // Box tree logging for inspection
pub use dump::dump_boxes;

#[cfg(test)]
pub(crate) mod test_util;
