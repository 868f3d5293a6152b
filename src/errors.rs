use std::error::Error;
use std::fmt;
use std::io;

use crate::mp4::FourCC;

/// Enumeration of all possible errors that can occur while reading audio tracks
#[derive(Debug)]
pub enum MediaParserError {
    Mp4(Mp4Error),
    Stream(StreamError),
    Other(io::Error),
}

/// MP4 container specific errors
#[derive(Debug)]
pub enum Mp4Error {
    /// No further box header at this nesting level. Ends scans cleanly.
    EndOfStream,
    /// Size or type fields of a box header are inconsistent or truncated
    MalformedHeader { message: String },
    /// An index table declares more entries than its box can hold
    TruncatedTable { box_type: FourCC, message: String },
    /// A box variant that is recognized but not supported, e.g. `stz2`
    UnsupportedBoxVariant { box_type: FourCC },
    /// A chunk could not be read in full from the media data
    TruncatedMedia {
        chunk_index: usize,
        expected: u64,
        copied: u64,
    },
    /// A track lacks an index table required for sample copying
    MissingTable { box_type: FourCC },
    /// Index tables of a track disagree with each other
    InconsistentTables { message: String },
    /// A codec or box tag that is not exactly four bytes
    InvalidFourCC { value: String },
}

/// Errors raised by the seekable stream implementations
#[derive(Debug)]
pub enum StreamError {
    /// The requested seek origin is not supported by this stream
    UnsupportedSeekMode,
    /// The server answered a range request with a plain `200` and no `Accept-Ranges: bytes`
    RangeUnsupported,
    /// The server answered with an unexpected status
    ServerError { status: String },
    /// The server did not declare the length of the resource
    MissingContentLength,
    /// The request could not be sent or the response could not be read
    Request(String),
}

impl Mp4Error {
    pub fn malformed(message: impl Into<String>) -> Self {
        Mp4Error::MalformedHeader {
            message: message.into(),
        }
    }

    pub fn truncated_table(box_type: FourCC, message: impl Into<String>) -> Self {
        Mp4Error::TruncatedTable {
            box_type,
            message: message.into(),
        }
    }

    pub fn inconsistent(message: impl Into<String>) -> Self {
        Mp4Error::InconsistentTables {
            message: message.into(),
        }
    }
}

impl MediaParserError {
    /// True when the error is the clean end-of-stream signal.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, MediaParserError::Mp4(Mp4Error::EndOfStream))
    }

    /// Recover a crate error that travelled through an `io::Error`, e.g. out of a `Seek` impl.
    pub fn from_io(err: io::Error) -> Self {
        let wraps_parser_error = err
            .get_ref()
            .map(|inner| inner.is::<MediaParserError>())
            .unwrap_or(false);
        if !wraps_parser_error {
            return MediaParserError::Other(err);
        }
        let kind = err.kind();
        match err.into_inner().map(|inner| inner.downcast::<MediaParserError>()) {
            Some(Ok(parser_err)) => *parser_err,
            Some(Err(inner)) => MediaParserError::Other(io::Error::new(kind, inner)),
            None => MediaParserError::Other(io::Error::from(kind)),
        }
    }
}

impl fmt::Display for MediaParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaParserError::Other(err) => write!(f, "I/O error: {}", err),
            MediaParserError::Stream(err) => write!(f, "Stream error: {}", err),
            MediaParserError::Mp4(err) => write!(f, "MP4 error: {}", err),
        }
    }
}

impl fmt::Display for Mp4Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mp4Error::EndOfStream => write!(f, "end of stream"),
            Mp4Error::MalformedHeader { message } => write!(f, "malformed box header: {}", message),
            Mp4Error::TruncatedTable { box_type, message } => {
                write!(f, "truncated {} table: {}", box_type, message)
            }
            Mp4Error::UnsupportedBoxVariant { box_type } => {
                write!(f, "unsupported box variant: {}", box_type)
            }
            Mp4Error::TruncatedMedia {
                chunk_index,
                expected,
                copied,
            } => write!(
                f,
                "chunk {} truncated: expected {} bytes, copied {}",
                chunk_index, expected, copied
            ),
            Mp4Error::MissingTable { box_type } => {
                write!(f, "track has no {} table", box_type)
            }
            Mp4Error::InconsistentTables { message } => {
                write!(f, "inconsistent sample tables: {}", message)
            }
            Mp4Error::InvalidFourCC { value } => {
                write!(f, "{:?} is not a four character code", value)
            }
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::UnsupportedSeekMode => write!(f, "unsupported seek mode"),
            StreamError::RangeUnsupported => write!(f, "server does not support range requests"),
            StreamError::ServerError { status } => write!(f, "HTTP error: {}", status),
            StreamError::MissingContentLength => {
                write!(f, "Content-Length header not found or invalid")
            }
            StreamError::Request(message) => write!(f, "request failed: {}", message),
        }
    }
}

impl Error for MediaParserError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MediaParserError::Mp4(err) => Some(err),
            MediaParserError::Stream(err) => Some(err),
            MediaParserError::Other(err) => Some(err),
        }
    }
}
impl Error for Mp4Error {}
impl Error for StreamError {}

// Conversion implementations
impl From<io::Error> for MediaParserError {
    fn from(err: io::Error) -> Self {
        MediaParserError::from_io(err)
    }
}

impl From<StreamError> for MediaParserError {
    fn from(err: StreamError) -> Self {
        MediaParserError::Stream(err)
    }
}

impl From<Mp4Error> for MediaParserError {
    fn from(err: Mp4Error) -> Self {
        MediaParserError::Mp4(err)
    }
}

impl From<reqwest::Error> for MediaParserError {
    fn from(err: reqwest::Error) -> Self {
        MediaParserError::Stream(StreamError::Request(err.to_string()))
    }
}

// Conversion to io::Error for the Read/Seek boundary
impl From<MediaParserError> for io::Error {
    fn from(err: MediaParserError) -> Self {
        match err {
            MediaParserError::Other(err) => err,
            MediaParserError::Stream(StreamError::UnsupportedSeekMode) => io::Error::new(
                io::ErrorKind::Unsupported,
                MediaParserError::Stream(StreamError::UnsupportedSeekMode),
            ),
            other => io::Error::other(other),
        }
    }
}

impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> Self {
        MediaParserError::Stream(err).into()
    }
}

impl From<Mp4Error> for io::Error {
    fn from(err: Mp4Error) -> Self {
        MediaParserError::Mp4(err).into()
    }
}

// Type alias for Result with MediaParserError
pub type MediaParserResult<T> = Result<T, MediaParserError>;
