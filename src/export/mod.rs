//! Export workflows: windowed session fetch, statistics, segment clients,
//! and the shared CSV writer.

pub mod clients;
pub mod csv_writer;
pub mod sessions;
pub mod stats;
pub mod windows;
