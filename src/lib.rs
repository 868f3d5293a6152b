pub mod mp4;
pub use mp4::{dump_boxes, find_audio_tracks, FourCC, Track, TrackSummary, TrackType};

pub mod streams;
pub use streams::{
    seekable_http_stream, seekable_stream, HttpStreamConfig, LocalSeekableStream,
    SeekableHttpStream, SeekableStream, WindowedStream,
};

pub mod errors;
pub use errors::{MediaParserError, MediaParserResult, Mp4Error, StreamError};

use log::info;
use regex::Regex;
use std::io::Write;
use std::sync::OnceLock;

/// True when `location` starts with a URL scheme such as `http://`.
pub fn is_url(location: &str) -> bool {
    static URL_SCHEME: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    URL_SCHEME
        .get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://"))
        .as_ref()
        .map_or(false, |re| re.is_match(location))
}

/// Open a URL as an HTTP range stream, anything else as a local file.
pub fn open_source(location: &str) -> MediaParserResult<Box<dyn SeekableStream>> {
    if is_url(location) {
        Ok(Box::new(SeekableHttpStream::new(location)?))
    } else {
        Ok(Box::new(LocalSeekableStream::open(location)?))
    }
}

/// Copy the samples of every audio track of `location` whose codec is in
/// `codecs` (all audio tracks when empty) into `sink`, one track after another.
/// Returns the number of tracks copied.
pub fn extract_audio<W: Write + ?Sized>(
    location: &str,
    codecs: &[FourCC],
    sink: &mut W,
) -> MediaParserResult<usize> {
    let mut stream = open_source(location)?;
    let tracks = find_audio_tracks(stream.as_mut(), codecs)?;

    for (index, track) in tracks.iter().enumerate() {
        let written = track.copy_samples(stream.as_mut(), sink)?;
        info!(
            "Track {} ({}): {} bytes",
            index,
            track
                .codecs()
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            written
        );
    }
    sink.flush()?;

    stream.print_stats();
    Ok(tracks.len())
}
