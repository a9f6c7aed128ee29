//! IO for simulator output and the exported network formats.

mod dot;
mod favites;
mod individual;
mod network;
mod transmission;

pub use dot::DotWriter;
pub use favites::{FavitesWriter, NetworkRow, read_network, read_network_file};
pub use individual::read_individuals;
pub use network::NetworkWriter;
pub use transmission::{filter_window, read_transmissions, round_times};

use std::fmt;

/// Errors reading simulator CSV output.
#[derive(Debug)]
pub enum ReadError {
    IoError(std::io::Error),
    CsvError(csv::Error),
    FieldError(String),
}

impl fmt::Display for ReadError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::IoError(error) => write!(formatter, "IO error: {}", error),
            ReadError::CsvError(error) => write!(formatter, "CSV error: {}", error),
            ReadError::FieldError(message) => write!(formatter, "field error: {}", message),
        }
    }
}

impl std::error::Error for ReadError {}
