//! Adapters module implementing the interfaces defined in Ports.

pub mod fs_reader;
pub mod fs_writer;
