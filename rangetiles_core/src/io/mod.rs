//! Byte-addressed input/output.
//!
//! `DataReaderTrait` is the byte-range source the archive engine sits on,
//! with file, HTTP and object-storage backends plus composable decorators
//! for block alignment, in-memory LRU caching and a chunked disk cache.
//! `DataWriterTrait` is the append-position output used by the archive
//! writer. The `ValueReader`/`ValueWriter` layer below them decodes and
//! encodes primitives, varints and protobuf fragments.

mod data_reader;
mod data_reader_blob;
mod data_reader_block_aligned;
mod data_reader_disk_cache;
mod data_reader_file;
mod data_reader_http;
mod data_reader_memory_cache;
mod data_reader_object_store;
mod data_writer;
mod data_writer_blob;
mod data_writer_file;
mod open;
mod value_reader;
mod value_reader_slice;
mod value_writer;
mod value_writer_blob;

pub use data_reader::*;
pub use data_reader_blob::*;
pub use data_reader_block_aligned::*;
pub use data_reader_disk_cache::*;
pub use data_reader_file::*;
pub use data_reader_http::*;
pub use data_reader_memory_cache::*;
pub use data_reader_object_store::*;
pub use data_writer::*;
pub use data_writer_blob::*;
pub use data_writer_file::*;
pub use open::*;
pub use value_reader::*;
pub use value_reader_slice::*;
pub use value_writer::*;
pub use value_writer_blob::*;
