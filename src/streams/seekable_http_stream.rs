use super::HttpStreamConfig;
use crate::errors::{MediaParserError, MediaParserResult, StreamError};
use log::{debug, info, warn};
use reqwest::{
    blocking::{Client, Response},
    header::{HeaderMap, ACCEPT_RANGES, CONTENT_RANGE, RANGE},
    StatusCode,
};
use std::io::{self, Read, Seek, SeekFrom};

/// A remote resource read through HTTP range requests, exposed as `Read + Seek`.
///
/// At most one response body is open at a time. Sequential reads drain that body;
/// short forward seeks discard bytes from it, and any other seek closes it and
/// issues a fresh `Range: bytes=<offset>-` request. Seeking to or past the end of
/// the resource closes the body without a new request, after which reads return 0.
/// If a request fails, the position is left where it was and the next read
/// requests it again.
pub struct SeekableHttpStream {
    url: String,
    client: Client,
    config: HttpStreamConfig,
    response: Option<Response>,
    position: u64,
    length: u64,
    http_request_count: u64,
    http_request_bytes_read: u64,
}

impl SeekableHttpStream {
    pub fn new(url: impl Into<String>) -> MediaParserResult<Self> {
        Self::with_config(url, HttpStreamConfig::default())
    }

    pub fn with_config(url: impl Into<String>, config: HttpStreamConfig) -> MediaParserResult<Self> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let client = builder.build()?;

        let mut stream = Self {
            url: url.into(),
            client,
            config,
            response: None,
            position: 0,
            length: 0,
            http_request_count: 0,
            http_request_bytes_read: 0,
        };

        let response = stream.get_range(0)?;
        stream.length = declared_length(response.status(), response.headers())
            .or_else(|| response.content_length())
            .ok_or(StreamError::MissingContentLength)?;
        stream.response = Some(response);

        info!("Opened {} ({} bytes)", stream.url, stream.length);
        Ok(stream)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Total length declared by the server.
    pub fn content_length(&self) -> u64 {
        self.length
    }

    /// Http request count function.
    pub fn http_request_count(&self) -> u64 {
        self.http_request_count
    }

    /// Http request bytes read function.
    pub fn http_request_bytes_read(&self) -> u64 {
        self.http_request_bytes_read
    }

    /// Print stats function.
    pub fn print_stats(&self) {
        info!("📊 Download Statistics:");
        info!("   🔢 HTTP Requests: {}", self.http_request_count);
        info!(
            "   📥 Total Downloaded: {} bytes ({:.2} KB, {:.2} MB)",
            self.http_request_bytes_read,
            self.http_request_bytes_read as f64 / 1024.0,
            self.http_request_bytes_read as f64 / 1024.0 / 1024.0
        );
        if self.length > 0 {
            let percentage = (self.http_request_bytes_read as f64 / self.length as f64) * 100.0;
            info!("   📊 Downloaded: {:.2}% of total file", percentage);
        }
    }

    fn get_range(&mut self, offset: u64) -> MediaParserResult<Response> {
        debug!("GET {} Range: bytes={}-", self.url, offset);
        let response = self
            .client
            .get(&self.url)
            .header(RANGE, format!("bytes={}-", offset))
            .send()?;

        self.http_request_count += 1;

        match response.status() {
            StatusCode::PARTIAL_CONTENT => Ok(response),
            StatusCode::OK => {
                if !accepts_byte_ranges(response.headers()) {
                    return Err(StreamError::RangeUnsupported.into());
                }
                warn!(
                    "Server responded with 200 on a range request for offset {}, continuing",
                    offset
                );
                let mut response = response;
                if offset > 0 {
                    // The body starts at byte 0, not at the requested offset.
                    let skipped = io::copy(&mut (&mut response).take(offset), &mut io::sink())?;
                    self.http_request_bytes_read += skipped;
                    if skipped < offset {
                        return Err(short_skip(offset, skipped).into());
                    }
                }
                Ok(response)
            }
            status => Err(StreamError::ServerError {
                status: status.to_string(),
            }
            .into()),
        }
    }

    fn seek_to(&mut self, pos: SeekFrom) -> MediaParserResult<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => offset,
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta).ok_or_else(|| {
                MediaParserError::Other(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "seek before the start of the stream",
                ))
            })?,
            SeekFrom::End(_) => return Err(StreamError::UnsupportedSeekMode.into()),
        };

        if target == self.position {
            return Ok(target);
        }

        let jump = target.saturating_sub(self.position);
        if jump > 0 && jump < self.config.small_jump_threshold {
            if let Some(response) = self.response.as_mut() {
                let skipped = io::copy(&mut response.take(jump), &mut io::sink())?;
                self.position += skipped;
                self.http_request_bytes_read += skipped;
                if skipped < jump {
                    // The body ended early; the next read requests the rest again.
                    self.response = None;
                    return Err(short_skip(jump, skipped).into());
                }
                return Ok(self.position);
            }
        }

        // Close the current body before opening another one.
        self.response = None;
        if target < self.length {
            self.response = Some(self.get_range(target)?);
            self.position = target;
        } else {
            self.position = target;
            debug!(
                "Seek to {} is at or past the end ({}), no request issued",
                target, self.length
            );
        }
        Ok(target)
    }
}

impl Read for SeekableHttpStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.response.is_none() {
            if self.position >= self.length {
                return Ok(0);
            }
            self.response = Some(self.get_range(self.position)?);
        }
        let Some(response) = self.response.as_mut() else {
            return Ok(0);
        };
        let n = response.read(buf)?;
        self.position += n as u64;
        self.http_request_bytes_read += n as u64;
        Ok(n)
    }
}

impl Seek for SeekableHttpStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.seek_to(pos).map_err(io::Error::from)
    }
}

fn accepts_byte_ranges(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT_RANGES)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("bytes"))
        .unwrap_or(false)
}

/// Total length from `Content-Range: bytes <from>-<to>/<total>` on a partial response.
fn declared_length(status: StatusCode, headers: &HeaderMap) -> Option<u64> {
    if status != StatusCode::PARTIAL_CONTENT {
        return None;
    }
    headers
        .get(CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.rsplit('/').next())
        .and_then(|total| total.trim().parse::<u64>().ok())
}

fn short_skip(wanted: u64, skipped: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!(
            "response body ended after skipping {} of {} bytes",
            skipped, wanted
        ),
    )
}
