//! FAVITES-style TSV export of the ordered transmission network.
//!
//! The network file lists `infector<TAB>infected<TAB>time` per event under
//! a synthetic root: seed cases hang off the root through a per-event fake
//! node, so the whole forest reads as one connected tree.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::Deserialize;

use super::ReadError;
use crate::core::event::{Infector, TransmissionEvent};

/// Writer for the two FAVITES inputs, `<stem>_transmission_network.tsv`
/// and `<stem>_sample_times.tsv`.
pub struct FavitesWriter<'a> {
    stem: &'a Path,
    /// Label of the synthetic root every seed chain hangs from.
    pub root_label: &'a str,
    /// Timestamp of the root itself.
    pub root_time: f64,
    /// Timestamp of the root-to-fake-node links.
    pub seed_link_time: f64,
}

impl<'a> FavitesWriter<'a> {
    pub fn new(stem: &'a Path) -> Self {
        Self {
            stem,
            root_label: "SUPERFAKER",
            root_time: 1968.0,
            seed_link_time: 1969.0,
        }
    }

    fn network_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_transmission_network.tsv", self.stem.display()))
    }

    fn sample_times_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_sample_times.tsv", self.stem.display()))
    }

    /// Write the transmission network for already ordered events.
    pub fn write_network(
        &self,
        events: &[TransmissionEvent],
        writer: &mut impl Write,
    ) -> io::Result<()> {
        writeln!(writer, "None\t{}\t{}", self.root_label, self.root_time)?;
        for (index, event) in events.iter().enumerate() {
            match event.infector {
                Infector::Case(infector) => {
                    writeln!(writer, "{}\t{}\t{}", infector, event.infected, event.time)?;
                }
                Infector::Seed => {
                    let fake = format!("Fake_{index}");
                    writeln!(writer, "{}\t{}\t{}", self.root_label, fake, self.seed_link_time)?;
                    writeln!(writer, "{}\t{}\t{}", fake, event.infected, event.time)?;
                }
            }
        }
        Ok(())
    }

    /// Sample infected individuals inside `start..=end` and write one
    /// `<id><TAB><time + 1>` line per sampled individual, in event order.
    pub fn write_sample_times(
        &self,
        events: &[TransmissionEvent],
        start: f64,
        end: f64,
        count: usize,
        rng: &mut impl Rng,
        writer: &mut impl Write,
    ) -> io::Result<()> {
        let eligible: Vec<&TransmissionEvent> = events
            .iter()
            .filter(|event| event.time >= start && event.time <= end)
            .collect();
        let mut picks =
            rand::seq::index::sample(rng, eligible.len(), count.min(eligible.len())).into_vec();
        picks.sort_unstable();
        for pick in picks {
            let event = eligible[pick];
            writeln!(writer, "{}\t{}", event.infected, event.time + 1.0)?;
        }
        Ok(())
    }

    /// Write both files next to each other under the configured stem.
    pub fn write_files(
        &self,
        events: &[TransmissionEvent],
        start_sampling: f64,
        end_sampling: f64,
        sampled_individuals: usize,
        rng: &mut impl Rng,
    ) -> io::Result<()> {
        let mut network = BufWriter::new(File::create(self.network_path())?);
        self.write_network(events, &mut network)?;
        network.flush()?;

        let mut samples = BufWriter::new(File::create(self.sample_times_path())?);
        self.write_sample_times(
            events,
            start_sampling,
            end_sampling,
            sampled_individuals,
            rng,
            &mut samples,
        )?;
        samples.flush()
    }
}

/// One row of an exported transmission-network TSV.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkRow {
    pub infector: String,
    pub infected: String,
    pub time: f64,
}

/// Parse the three-column headerless network format back in.
pub fn read_network(reader: impl io::Read) -> Result<Vec<NetworkRow>, ReadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_reader(reader);
    reader
        .deserialize()
        .map(|row| row.map_err(ReadError::CsvError))
        .collect()
}

pub fn read_network_file(path: &Path) -> Result<Vec<NetworkRow>, ReadError> {
    read_network(BufReader::new(File::open(path).map_err(ReadError::IoError)?))
}
