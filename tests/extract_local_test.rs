mod common;

use common::interleaved_movie;
use mp4audio::{
    dump_boxes, extract_audio, find_audio_tracks, open_source, FourCC, MediaParserError, Mp4Error,
    TrackType,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_fixture(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_extract_all_audio_tracks_from_local_file() {
    let fixture = interleaved_movie();
    let file = write_fixture(&fixture.file);

    let mut out = Vec::new();
    let count = extract_audio(file.path().to_str().unwrap(), &[], &mut out).unwrap();

    assert_eq!(count, 2);
    assert_eq!(out, [fixture.aac, fixture.opus].concat());
}

#[test]
fn test_extract_selected_codec() {
    let fixture = interleaved_movie();
    let file = write_fixture(&fixture.file);
    let path = file.path().to_str().unwrap();

    let mut out = Vec::new();
    let count = extract_audio(path, &["Opus".parse().unwrap()], &mut out).unwrap();
    assert_eq!(count, 1);
    assert_eq!(out, fixture.opus);

    let mut none = Vec::new();
    let count = extract_audio(path, &["fLaC".parse().unwrap()], &mut none).unwrap();
    assert_eq!(count, 0);
    assert!(none.is_empty());
}

#[test]
fn test_track_summaries() {
    let fixture = interleaved_movie();
    let file = write_fixture(&fixture.file);

    let mut stream = open_source(file.path().to_str().unwrap()).unwrap();
    let tracks = find_audio_tracks(stream.as_mut(), &[]).unwrap();
    let summaries: Vec<_> = tracks
        .iter()
        .enumerate()
        .map(|(i, t)| t.summary(i))
        .collect();

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].handler_type, Some(TrackType::Sound));
    assert_eq!(summaries[0].codecs, vec![FourCC(*b"mp4a")]);
    assert_eq!(summaries[0].chunk_count, 2);
    assert_eq!(summaries[0].sample_count, 4);
    assert_eq!(summaries[0].total_bytes, 60);
    assert_eq!(summaries[1].codecs, vec![FourCC(*b"Opus")]);
    assert_eq!(summaries[1].total_bytes, 40);
    assert_eq!(stream.http_request_count(), 0);
}

#[test]
fn test_dump_local_file() {
    let fixture = interleaved_movie();
    let file = write_fixture(&fixture.file);

    let mut stream = open_source(file.path().to_str().unwrap()).unwrap();
    // ftyp, mdat, moov, and 3 x (trak, mdia, hdlr, minf, stbl, 4 tables)
    assert_eq!(dump_boxes(stream.as_mut()).unwrap(), 30);
}

#[test]
fn test_truncated_file_reports_truncated_media() {
    let fixture = interleaved_movie();
    let mut parse_stream = std::io::Cursor::new(fixture.file.clone());
    let tracks = find_audio_tracks(&mut parse_stream, &["mp4a".parse().unwrap()]).unwrap();

    // Keep only 10 bytes of the second mp4a chunk, which starts 120 bytes into mdat.
    let file = write_fixture(&fixture.file[..24 + 130]);
    let mut source = open_source(file.path().to_str().unwrap()).unwrap();
    let err = tracks[0]
        .copy_samples(source.as_mut(), &mut Vec::new())
        .unwrap_err();
    assert!(
        matches!(
            err,
            MediaParserError::Mp4(Mp4Error::TruncatedMedia {
                chunk_index: 1,
                expected: 30,
                copied: 10
            })
        ),
        "unexpected error {:?}",
        err
    );
}
