use crate::errors::{MediaParserError, MediaParserResult, Mp4Error};
use crate::streams::{SeekableStream, WindowedStream};
use byteorder::{BigEndian, ReadBytesExt};
use log::{trace, warn};
use serde::{Serialize, Serializer};
use std::fmt;
use std::io::{self, Read};
use std::str::FromStr;

/// Four character code naming a box type or a codec
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const MOOV: FourCC = FourCC(*b"moov");
    pub const TRAK: FourCC = FourCC(*b"trak");
    pub const MDIA: FourCC = FourCC(*b"mdia");
    pub const MINF: FourCC = FourCC(*b"minf");
    pub const STBL: FourCC = FourCC(*b"stbl");
    pub const HDLR: FourCC = FourCC(*b"hdlr");
    pub const STSD: FourCC = FourCC(*b"stsd");
    pub const STSZ: FourCC = FourCC(*b"stsz");
    pub const STZ2: FourCC = FourCC(*b"stz2");
    pub const STSC: FourCC = FourCC(*b"stsc");
    pub const STCO: FourCC = FourCC(*b"stco");
    pub const CO64: FourCC = FourCC(*b"co64");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Printable form, with non-ASCII bytes replaced by `.`
    pub fn as_str_lossy(&self) -> String {
        self.0
            .iter()
            .map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
            .collect()
    }
}

impl FromStr for FourCC {
    type Err = Mp4Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: [u8; 4] = s
            .as_bytes()
            .try_into()
            .map_err(|_| Mp4Error::InvalidFourCC {
                value: s.to_string(),
            })?;
        Ok(FourCC(bytes))
    }
}

impl From<[u8; 4]> for FourCC {
    fn from(bytes: [u8; 4]) -> Self {
        FourCC(bytes)
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

impl Serialize for FourCC {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_str_lossy())
    }
}

/// Box header information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxHeader {
    /// Size of the whole box, header included
    pub size: u64,
    pub box_type: FourCC,
    /// 8, or 16 when an extended 64-bit size follows the type
    pub header_size: u64,
}

impl BoxHeader {
    pub const SIZE: u64 = 8;
    pub const EXTENDED_SIZE: u64 = 16;

    /// Bytes following the header.
    pub fn payload_size(&self) -> u64 {
        self.size - self.header_size
    }
}

/// Returned by a scan visitor to continue with the next sibling or stop early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanControl {
    Continue,
    Stop,
}

/// Read a box header from an io source.
///
/// Fewer than 8 remaining bytes is reported as [`Mp4Error::EndOfStream`], which
/// callers treat as "no more boxes at this level". A truncated extended size, or a
/// declared size smaller than the header itself, is [`Mp4Error::MalformedHeader`].
pub fn read_box_header<R: Read + ?Sized>(r: &mut R) -> MediaParserResult<BoxHeader> {
    let mut head = [0u8; 8];
    let filled = read_up_to(r, &mut head)?;
    if filled < head.len() {
        if filled > 0 {
            trace!("Ignoring {} trailing bytes after the last box", filled);
        }
        return Err(Mp4Error::EndOfStream.into());
    }

    let size32 = u32::from_be_bytes([head[0], head[1], head[2], head[3]]);
    let box_type = FourCC([head[4], head[5], head[6], head[7]]);

    let (size, header_size) = if size32 == 1 {
        let size = r.read_u64::<BigEndian>().map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                Mp4Error::malformed(format!("{} box: truncated extended size", box_type)).into()
            } else {
                MediaParserError::from(e)
            }
        })?;
        (size, BoxHeader::EXTENDED_SIZE)
    } else {
        (size32 as u64, BoxHeader::SIZE)
    };

    if size < header_size {
        return Err(Mp4Error::malformed(format!(
            "{} box declares size {} below its {}-byte header",
            box_type, size, header_size
        ))
        .into());
    }

    Ok(BoxHeader {
        size,
        box_type,
        header_size,
    })
}

/// Write a box header to a vector
pub fn write_box_header(output: &mut Vec<u8>, box_type: &[u8; 4], size: u32) {
    output.extend_from_slice(&size.to_be_bytes());
    output.extend_from_slice(box_type);
}

/// Visit every sibling box at the current nesting level of `stream`.
///
/// Each visitor call receives the header and a window bounded to that box's
/// payload. Whatever the visitor consumed, the window is moved to its end before
/// the next header is read, so unknown or partially read boxes never disturb the
/// iteration. Running out of headers ends the scan successfully; visitor errors
/// abort it.
pub fn scan_boxes<F>(stream: &mut dyn SeekableStream, mut visitor: F) -> MediaParserResult<()>
where
    F: FnMut(&BoxHeader, &mut WindowedStream<'_>) -> MediaParserResult<ScanControl>,
{
    loop {
        let header = match read_box_header(&mut *stream) {
            Ok(header) => header,
            Err(e) if e.is_end_of_stream() => return Ok(()),
            Err(e) => return Err(e),
        };
        trace!("Box {} ({} bytes)", header.box_type, header.size);

        let mut payload = WindowedStream::new(&mut *stream, header.payload_size())?;
        let control = visitor(&header, &mut payload)?;

        let shortfall = payload.skip_to_end()?;
        if shortfall > 0 {
            warn!(
                "{} box declares {} payload bytes but its container ends {} bytes early",
                header.box_type,
                header.payload_size(),
                shortfall
            );
        }

        if control == ScanControl::Stop {
            return Ok(());
        }
    }
}

/// Version and flags prefix shared by the table boxes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FullBoxHeader {
    pub version: u8,
    pub flags: u32,
}

impl FullBoxHeader {
    pub fn read<R: Read + ?Sized>(r: &mut R, box_type: FourCC) -> MediaParserResult<Self> {
        let version = r.read_u8().map_err(table_error(box_type))?;
        let flags = r.read_u24::<BigEndian>().map_err(table_error(box_type))?;
        Ok(Self { version, flags })
    }
}

/// Map a short read inside a table box to [`Mp4Error::TruncatedTable`].
pub(crate) fn table_error(box_type: FourCC) -> impl Fn(io::Error) -> MediaParserError {
    move |e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Mp4Error::truncated_table(box_type, "box ended before its declared entries").into()
        } else {
            MediaParserError::from(e)
        }
    }
}

/// Check that `entry_count` records of `entry_size` bytes fit in what is left of
/// the box as declared.
pub(crate) fn checked_entry_count(
    payload: &WindowedStream<'_>,
    box_type: FourCC,
    entry_count: u32,
    entry_size: u64,
) -> MediaParserResult<usize> {
    let needed = entry_count as u64 * entry_size;
    if needed > payload.remaining() {
        return Err(Mp4Error::truncated_table(
            box_type,
            format!(
                "{} entries need {} bytes, only {} available",
                entry_count,
                needed,
                payload.remaining()
            ),
        )
        .into());
    }
    Ok(entry_count as usize)
}

/// Largest number of table values read or preallocated at once
pub(crate) const TABLE_BATCH: usize = 4096;

/// Read `count` fixed-size values in batches of at most [`TABLE_BATCH`].
///
/// A window's declared size is not backed by its parent, so `count` may still
/// exceed what the file holds. Memory only grows with the values actually read,
/// and a short box fails with [`Mp4Error::TruncatedTable`].
pub(crate) fn read_table<T, F>(
    payload: &mut WindowedStream<'_>,
    box_type: FourCC,
    count: usize,
    mut read_batch: F,
) -> MediaParserResult<Vec<T>>
where
    T: Copy + Default,
    F: FnMut(&mut WindowedStream<'_>, &mut [T]) -> io::Result<()>,
{
    let mut values = Vec::with_capacity(count.min(TABLE_BATCH));
    let mut batch = vec![T::default(); count.min(TABLE_BATCH)];
    while values.len() < count {
        let n = (count - values.len()).min(TABLE_BATCH);
        read_batch(payload, &mut batch[..n]).map_err(table_error(box_type))?;
        values.extend_from_slice(&batch[..n]);
    }
    Ok(values)
}

fn read_up_to<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
