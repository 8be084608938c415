//! Archive stream handling: codec detection, decoding and tar extraction.

pub(crate) mod common;
pub mod compression;
pub mod detect;
pub mod tar;

pub use compression::CompressionCodec;
