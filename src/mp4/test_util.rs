use super::r#box::write_box_header;
use crate::errors::MediaParserResult;
use crate::streams::WindowedStream;
use std::io::Cursor;

pub(crate) fn make_box(box_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    write_box_header(&mut buf, box_type, (payload.len() + 8) as u32);
    buf.extend_from_slice(payload);
    buf
}

/// Version byte and 24-bit flags followed by `body`.
pub(crate) fn full_box_payload(version: u8, flags: u32, body: &[u8]) -> Vec<u8> {
    let mut buf = vec![version];
    buf.extend_from_slice(&flags.to_be_bytes()[1..]);
    buf.extend_from_slice(body);
    buf
}

/// Run a payload parser against `data` as if it were a box payload.
pub(crate) fn with_window<T, F>(data: &[u8], parse: F) -> MediaParserResult<T>
where
    F: FnOnce(&mut WindowedStream<'_>) -> MediaParserResult<T>,
{
    let mut cursor = Cursor::new(data.to_vec());
    let mut window = WindowedStream::new(&mut cursor, data.len() as u64)?;
    parse(&mut window)
}

pub(crate) fn hdlr_box(handler: &[u8; 4]) -> Vec<u8> {
    let mut body = vec![0u8; 4];
    body.extend_from_slice(handler);
    body.extend_from_slice(&[0u8; 12]);
    body.push(0);
    make_box(b"hdlr", &full_box_payload(0, 0, &body))
}

pub(crate) fn stsd_box(formats: &[&[u8; 4]]) -> Vec<u8> {
    let mut body = (formats.len() as u32).to_be_bytes().to_vec();
    for format in formats {
        body.extend_from_slice(&make_box(format, &[0u8; 28]));
    }
    make_box(b"stsd", &full_box_payload(0, 0, &body))
}

pub(crate) fn stsz_box(constant: u32, count: u32, sizes: &[u32]) -> Vec<u8> {
    let mut body = constant.to_be_bytes().to_vec();
    body.extend_from_slice(&count.to_be_bytes());
    for size in sizes {
        body.extend_from_slice(&size.to_be_bytes());
    }
    make_box(b"stsz", &full_box_payload(0, 0, &body))
}

pub(crate) fn stsc_box(runs: &[(u32, u32)]) -> Vec<u8> {
    let mut body = (runs.len() as u32).to_be_bytes().to_vec();
    for &(first_chunk, samples_per_chunk) in runs {
        body.extend_from_slice(&first_chunk.to_be_bytes());
        body.extend_from_slice(&samples_per_chunk.to_be_bytes());
        body.extend_from_slice(&1u32.to_be_bytes());
    }
    make_box(b"stsc", &full_box_payload(0, 0, &body))
}

pub(crate) fn stco_box(offsets: &[u32]) -> Vec<u8> {
    let mut body = (offsets.len() as u32).to_be_bytes().to_vec();
    for offset in offsets {
        body.extend_from_slice(&offset.to_be_bytes());
    }
    make_box(b"stco", &full_box_payload(0, 0, &body))
}

pub(crate) fn co64_box(offsets: &[u64]) -> Vec<u8> {
    let mut body = (offsets.len() as u32).to_be_bytes().to_vec();
    for offset in offsets {
        body.extend_from_slice(&offset.to_be_bytes());
    }
    make_box(b"co64", &full_box_payload(0, 0, &body))
}

/// `trak/mdia/{hdlr, minf/stbl/<tables>}`
pub(crate) fn trak_box(handler: &[u8; 4], stbl_children: &[Vec<u8>]) -> Vec<u8> {
    let stbl = make_box(b"stbl", &stbl_children.concat());
    let minf = make_box(b"minf", &[make_box(b"smhd", &[0u8; 8]), stbl].concat());
    let mdia = make_box(
        b"mdia",
        &[make_box(b"mdhd", &[0u8; 24]), hdlr_box(handler), minf].concat(),
    );
    make_box(b"trak", &[make_box(b"tkhd", &[0u8; 84]), mdia].concat())
}
