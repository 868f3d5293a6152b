use super::hdlr::{parse_hdlr, TrackType};
use super::r#box::{scan_boxes, FourCC, ScanControl};
use super::stco::{parse_chunk_offsets, ChunkOffsetTable};
use super::stsc::{parse_stsc, SampleToChunkTable};
use super::stsd::{matches_any, parse_stsd, SampleEntry};
use super::stsz::{parse_stsz, SampleSizeTable};
use crate::errors::{MediaParserResult, Mp4Error};
use crate::streams::SeekableStream;
use log::{debug, info, trace, warn};
use serde::Serialize;
use std::io::{self, Read, SeekFrom, Write};

/// One `trak` box, reduced to what is needed to locate its samples
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Track {
    pub handler_type: Option<TrackType>,
    pub sample_descriptions: Vec<SampleEntry>,
    pub sample_sizes: Option<SampleSizeTable>,
    pub sample_to_chunk: Option<SampleToChunkTable>,
    pub chunk_offsets: Option<ChunkOffsetTable>,
}

/// Serializable overview of a track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub index: usize,
    pub handler_type: Option<TrackType>,
    pub codecs: Vec<FourCC>,
    pub chunk_count: usize,
    pub sample_count: u64,
    pub total_bytes: u64,
}

impl Track {
    pub fn is_audio(&self) -> bool {
        self.handler_type == Some(TrackType::Sound)
    }

    pub fn codecs(&self) -> Vec<FourCC> {
        self.sample_descriptions.iter().map(|e| e.format).collect()
    }

    /// True when `desired` is empty or any sample description uses one of its codecs.
    pub fn matches_codecs(&self, desired: &[FourCC]) -> bool {
        desired.is_empty() || matches_any(&self.sample_descriptions, desired)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_offsets.as_ref().map_or(0, |t| t.count())
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_sizes.as_ref().map_or(0, |t| t.sample_count())
    }

    pub fn total_sample_bytes(&self) -> u64 {
        self.sample_sizes.as_ref().map_or(0, |t| t.total_size())
    }

    pub fn summary(&self, index: usize) -> TrackSummary {
        TrackSummary {
            index,
            handler_type: self.handler_type,
            codecs: self.codecs(),
            chunk_count: self.chunk_count(),
            sample_count: self.sample_count(),
            total_bytes: self.total_sample_bytes(),
        }
    }

    /// Copy every sample of the track, chunk by chunk in table order, from
    /// `source` into `sink`. Returns the number of bytes written.
    ///
    /// `source` must be the stream the track was parsed from, positioned however:
    /// chunk offsets are absolute.
    pub fn copy_samples<S, W>(&self, source: &mut S, sink: &mut W) -> MediaParserResult<u64>
    where
        S: SeekableStream + ?Sized,
        W: Write + ?Sized,
    {
        let sizes = self.sample_sizes.as_ref().ok_or(Mp4Error::MissingTable {
            box_type: FourCC::STSZ,
        })?;
        let chunks = self.sample_to_chunk.as_ref().ok_or(Mp4Error::MissingTable {
            box_type: FourCC::STSC,
        })?;
        let offsets = self.chunk_offsets.as_ref().ok_or(Mp4Error::MissingTable {
            box_type: FourCC::STCO,
        })?;

        let mut sample_index = 0usize;
        let mut total = 0u64;
        for (chunk_index, chunk_offset) in offsets.iter().enumerate() {
            let samples = chunks.chunk_sample_count(chunk_index).ok_or_else(|| {
                Mp4Error::inconsistent(format!(
                    "no sample-to-chunk entry covers chunk {}",
                    chunk_index + 1
                ))
            })? as usize;
            let chunk_size = sizes.sample_sizes(sample_index, samples).ok_or_else(|| {
                Mp4Error::inconsistent(format!(
                    "chunk {} needs samples {}..{} but only {} are sized",
                    chunk_index + 1,
                    sample_index,
                    sample_index + samples,
                    sizes.sample_count()
                ))
            })?;

            source.seek(SeekFrom::Start(chunk_offset))?;
            let copied = io::copy(&mut (&mut *source).take(chunk_size), &mut *sink)?;
            if copied < chunk_size {
                return Err(Mp4Error::TruncatedMedia {
                    chunk_index,
                    expected: chunk_size,
                    copied,
                }
                .into());
            }
            trace!(
                "Chunk {}: {} samples, {} bytes at offset {}",
                chunk_index,
                samples,
                chunk_size,
                chunk_offset
            );

            sample_index += samples;
            total += copied;
        }

        debug!(
            "Copied {} samples in {} chunks ({} bytes)",
            sample_index,
            offsets.count(),
            total
        );
        Ok(total)
    }
}

/// Find the audio tracks of a file.
///
/// Scans the top level for `moov` and reads every `trak` inside it. A track is
/// kept when its handler is `soun` and, if `desired_codecs` is not empty, one of
/// its sample descriptions uses a desired codec. Other tracks are dropped
/// without error.
pub fn find_audio_tracks(
    stream: &mut dyn SeekableStream,
    desired_codecs: &[FourCC],
) -> MediaParserResult<Vec<Track>> {
    let mut tracks = Vec::new();
    let mut found_moov = false;

    scan_boxes(stream, |header, payload| {
        if header.box_type != FourCC::MOOV {
            return Ok(ScanControl::Continue);
        }
        found_moov = true;
        scan_boxes(payload, |header, trak| {
            if header.box_type != FourCC::TRAK {
                return Ok(ScanControl::Continue);
            }
            let track = read_track(trak)?;
            if !track.is_audio() {
                debug!(
                    "Skipping {} track",
                    track
                        .handler_type
                        .map_or_else(|| "unknown".to_string(), |t| t.to_string())
                );
            } else if !track.matches_codecs(desired_codecs) {
                warn!(
                    "Dropping audio track with codecs {:?}, wanted {:?}",
                    track.codecs(),
                    desired_codecs
                );
            } else {
                tracks.push(track);
            }
            Ok(ScanControl::Continue)
        })?;
        Ok(ScanControl::Stop)
    })?;

    if !found_moov {
        warn!("No moov box found");
    }
    info!("Found {} audio tracks", tracks.len());
    Ok(tracks)
}

/// Read one `trak` payload into a [`Track`].
pub fn read_track(stream: &mut dyn SeekableStream) -> MediaParserResult<Track> {
    let mut track = Track::default();
    collect_track_boxes(stream, &mut track)?;
    Ok(track)
}

// mdia, minf and stbl each occur once per track and hold nothing the track needs
// beyond their children, so they are walked as if their children were siblings.
fn collect_track_boxes(
    stream: &mut dyn SeekableStream,
    track: &mut Track,
) -> MediaParserResult<()> {
    scan_boxes(stream, |header, payload| {
        match header.box_type {
            FourCC::MDIA | FourCC::MINF | FourCC::STBL => collect_track_boxes(payload, track)?,
            FourCC::HDLR => {
                let handler = parse_hdlr(payload)?;
                // QuickTime files carry a second, data handler inside minf.
                if track.handler_type.is_none() {
                    track.handler_type = Some(handler.handler_type);
                } else {
                    trace!("Ignoring nested {} handler", handler.handler_type);
                }
            }
            FourCC::STSD => track.sample_descriptions = parse_stsd(payload)?.entries,
            FourCC::STSZ => {
                set_once(&mut track.sample_sizes, parse_stsz(payload)?, FourCC::STSZ)
            }
            FourCC::STZ2 => {
                return Err(Mp4Error::UnsupportedBoxVariant {
                    box_type: FourCC::STZ2,
                }
                .into())
            }
            FourCC::STSC => {
                set_once(&mut track.sample_to_chunk, parse_stsc(payload)?, FourCC::STSC)
            }
            FourCC::STCO | FourCC::CO64 => set_once(
                &mut track.chunk_offsets,
                parse_chunk_offsets(payload, header.box_type)?,
                header.box_type,
            ),
            _ => {}
        }
        Ok(ScanControl::Continue)
    })
}

fn set_once<T>(slot: &mut Option<T>, value: T, box_type: FourCC) {
    if slot.is_some() {
        warn!("Duplicate {} box in track, keeping the first", box_type);
        return;
    }
    *slot = Some(value);
}
