use super::r#box::{table_error, FourCC, FullBoxHeader};
use crate::errors::MediaParserResult;
use crate::streams::WindowedStream;
use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::fmt;
use std::io::Read;

/// Media kind declared by a track's handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TrackType {
    Sound,
    Video,
    Hint,
    /// Any other handler, preserved as-is
    Other(FourCC),
}

impl TrackType {
    pub fn fourcc(&self) -> FourCC {
        match self {
            TrackType::Sound => FourCC(*b"soun"),
            TrackType::Video => FourCC(*b"vide"),
            TrackType::Hint => FourCC(*b"hint"),
            TrackType::Other(fourcc) => *fourcc,
        }
    }
}

impl From<FourCC> for TrackType {
    fn from(fourcc: FourCC) -> Self {
        match fourcc.as_bytes() {
            b"soun" => TrackType::Sound,
            b"vide" => TrackType::Video,
            b"hint" => TrackType::Hint,
            _ => TrackType::Other(fourcc),
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fourcc())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerBox {
    pub header: FullBoxHeader,
    pub handler_type: TrackType,
}

/// Parse hdlr (handler reference) box.
///
/// Only the fields up to the handler type are read; the reserved words and the
/// handler name are left for the scanner to skip.
pub fn parse_hdlr(payload: &mut WindowedStream<'_>) -> MediaParserResult<HandlerBox> {
    let header = FullBoxHeader::read(payload, FourCC::HDLR)?;
    // pre_defined, or the component type in QuickTime files
    payload
        .read_u32::<BigEndian>()
        .map_err(table_error(FourCC::HDLR))?;
    let mut handler_type = [0u8; 4];
    payload
        .read_exact(&mut handler_type)
        .map_err(table_error(FourCC::HDLR))?;

    Ok(HandlerBox {
        header,
        handler_type: FourCC(handler_type).into(),
    })
}
