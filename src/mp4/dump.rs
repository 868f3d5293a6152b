use super::hdlr::parse_hdlr;
use super::r#box::{scan_boxes, BoxHeader, FourCC, ScanControl};
use super::stco::parse_chunk_offsets;
use super::stsc::parse_stsc;
use super::stsd::parse_stsd;
use super::stsz::parse_stsz;
use crate::errors::{MediaParserResult, Mp4Error};
use crate::streams::{SeekableStream, WindowedStream};
use log::{debug, info, log_enabled, Level};
use std::io::Read;

/// Bytes of an unrecognized box shown at debug level
const HEX_PREVIEW_LEN: u64 = 128;

/// Log the box tree of `stream`, one line per box, indented by depth.
///
/// Containers on the path to the sample tables are walked; the index tables
/// themselves are decoded and summarized. Returns the number of boxes visited.
pub fn dump_boxes(stream: &mut dyn SeekableStream) -> MediaParserResult<usize> {
    let mut visited = 0;
    dump_level(stream, 0, &mut visited)?;
    info!("{} boxes", visited);
    Ok(visited)
}

fn dump_level(
    stream: &mut dyn SeekableStream,
    depth: usize,
    visited: &mut usize,
) -> MediaParserResult<()> {
    scan_boxes(stream, |header, payload| {
        *visited += 1;
        let indent = "  ".repeat(depth);
        info!(
            "{}📦 {} [size: {}, payload: {}]",
            indent,
            header.box_type,
            header.size,
            header.payload_size()
        );

        match header.box_type {
            FourCC::MOOV | FourCC::TRAK | FourCC::MDIA | FourCC::MINF | FourCC::STBL => {
                dump_level(payload, depth + 1, visited)?
            }
            FourCC::STZ2 => {
                return Err(Mp4Error::UnsupportedBoxVariant {
                    box_type: FourCC::STZ2,
                }
                .into())
            }
            _ => describe_leaf(header, payload, &indent)?,
        }
        Ok(ScanControl::Continue)
    })
}

fn describe_leaf(
    header: &BoxHeader,
    payload: &mut WindowedStream<'_>,
    indent: &str,
) -> MediaParserResult<()> {
    match header.box_type {
        FourCC::HDLR => {
            let handler = parse_hdlr(payload)?;
            info!("{}  handler: {}", indent, handler.handler_type);
        }
        FourCC::STSD => {
            let stsd = parse_stsd(payload)?;
            let formats: Vec<String> = stsd.entries.iter().map(|e| e.format.to_string()).collect();
            info!(
                "{}  {} sample descriptions: {}",
                indent,
                stsd.entries.len(),
                formats.join(", ")
            );
        }
        FourCC::STSZ => {
            let sizes = parse_stsz(payload)?;
            info!(
                "{}  {} samples, {} bytes",
                indent,
                sizes.sample_count(),
                sizes.total_size()
            );
        }
        FourCC::STSC => {
            let table = parse_stsc(payload)?;
            info!("{}  {} sample-to-chunk entries", indent, table.entries.len());
        }
        FourCC::STCO | FourCC::CO64 => {
            let offsets = parse_chunk_offsets(payload, header.box_type)?;
            info!("{}  {} chunk offsets", indent, offsets.count());
        }
        _ => {
            if log_enabled!(Level::Debug) {
                let mut preview = Vec::new();
                (&mut *payload)
                    .take(HEX_PREVIEW_LEN)
                    .read_to_end(&mut preview)?;
                debug!("{}  {}", indent, hex::encode(&preview));
            }
        }
    }
    Ok(())
}
