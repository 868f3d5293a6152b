#![allow(dead_code)]

use mp4audio::mp4::write_box_header;

pub fn make_box(box_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    write_box_header(&mut buf, box_type, (payload.len() + 8) as u32);
    buf.extend_from_slice(payload);
    buf
}

fn full_box(box_type: &[u8; 4], body: &[u8]) -> Vec<u8> {
    make_box(box_type, &[&[0u8; 4][..], body].concat())
}

fn u32s(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

fn trak(
    handler: &[u8; 4],
    codec: &[u8; 4],
    sizes: &[u32],
    chunks: &[(u32, u32)],
    offsets: &[u32],
) -> Vec<u8> {
    let hdlr = full_box(b"hdlr", &[&[0u8; 4][..], handler, &[0u8; 13]].concat());
    let stsd = full_box(b"stsd", &[u32s(&[1]), make_box(codec, &[0u8; 28])].concat());
    let stsz = full_box(
        b"stsz",
        &[u32s(&[0, sizes.len() as u32]), u32s(sizes)].concat(),
    );
    let runs: Vec<u32> = chunks.iter().flat_map(|&(first, n)| [first, n, 1]).collect();
    let stsc = full_box(b"stsc", &[u32s(&[chunks.len() as u32]), u32s(&runs)].concat());
    let stco = full_box(b"stco", &[u32s(&[offsets.len() as u32]), u32s(offsets)].concat());

    let stbl = make_box(b"stbl", &[stsd, stsz, stsc, stco].concat());
    let minf = make_box(b"minf", &stbl);
    let mdia = make_box(b"mdia", &[hdlr, minf].concat());
    make_box(b"trak", &mdia)
}

/// A small movie with one `avc1` video track and two audio tracks, `mp4a`
/// and `Opus`, whose chunks are interleaved in `mdat`.
pub struct Fixture {
    pub file: Vec<u8>,
    pub aac: Vec<u8>,
    pub opus: Vec<u8>,
}

pub fn interleaved_movie() -> Fixture {
    let aac: Vec<u8> = (0..60u8).collect();
    let opus: Vec<u8> = (100..140u8).collect();
    let video = vec![0xEE; 50];

    // mdat payload: aac[0..30] video[0..50] opus[0..40] aac[30..60]
    let ftyp = make_box(b"ftyp", b"isom\0\0\0\0");
    let base = ftyp.len() as u32 + 8;
    let mdat = make_box(
        b"mdat",
        &[&aac[..30], &video[..], &opus[..], &aac[30..]].concat(),
    );

    let moov = make_box(
        b"moov",
        &[
            trak(b"vide", b"avc1", &[50], &[(1, 1)], &[base + 30]),
            trak(
                b"soun",
                b"mp4a",
                &[10, 20, 15, 15],
                &[(1, 2)],
                &[base, base + 120],
            ),
            trak(b"soun", b"Opus", &[40], &[(1, 1)], &[base + 80]),
        ]
        .concat(),
    );

    Fixture {
        file: [ftyp, mdat, moov].concat(),
        aac,
        opus,
    }
}
