//! Read and write operations.
pub mod byte_reader;
pub mod byte_writer;
pub mod error;
pub mod string_writer;
pub mod writer;
