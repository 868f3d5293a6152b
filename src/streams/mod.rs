pub mod config;
pub mod seekable_http_stream;
pub mod seekable_stream;
pub mod windowed_stream;


pub use config::HttpStreamConfig;
pub use seekable_http_stream::SeekableHttpStream;
pub use seekable_stream::{LocalSeekableStream, SeekableStream};
pub use windowed_stream::WindowedStream;
