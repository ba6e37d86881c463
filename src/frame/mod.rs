//! LZ4 frame format: a self-describing container of blocks with optional
//! checksums and content size.

pub mod compress;
pub mod decompress;
pub mod header;
pub mod types;

pub use compress::{compress_frame, FrameWriter};
pub use decompress::{decompress_frame, FrameReader};
pub use header::{encode_header, header_checksum, read_header};
pub use types::{BlockSizeId, FrameInfo, FrameOptions, FRAME_MAGIC};
