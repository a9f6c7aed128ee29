//! Per-patch transmission files.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use super::ReadError;
use crate::core::event::{Infector, PersonId, TransmissionEvent};

/// One row of a per-patch transmission file, by the simulator's column
/// names. Columns not listed here are ignored.
#[derive(Debug, Deserialize)]
struct TransmissionRecord {
    #[serde(rename = "IdInfector")]
    id_infector: i64,
    #[serde(rename = "IdInfected")]
    id_infected: i64,
    #[serde(rename = "TimeOfInfection")]
    time_of_infection: f64,
    #[serde(rename = "IsInfectorAcute")]
    is_infector_acute: i8,
    #[serde(rename = "IsInfectorOutsidePatch")]
    is_infector_outside_patch: i8,
}

impl TransmissionRecord {
    /// Resolve global ids for a record from the given patch's file.
    ///
    /// The infected individual lives in the file's patch. For patch 0 the
    /// outside-patch flag holds the infector's patch directly; for patch 1
    /// it is inverted. A negative infector id or flag marks a seed case.
    fn into_event(self, patch: i8) -> TransmissionEvent {
        let infector = if self.id_infector < 0 || self.is_infector_outside_patch < 0 {
            Infector::Seed
        } else {
            let infector_patch = match patch {
                0 => self.is_infector_outside_patch,
                _ => 1 - self.is_infector_outside_patch,
            };
            Infector::Case(PersonId::new(self.id_infector, infector_patch))
        };
        TransmissionEvent {
            infector,
            infected: PersonId::new(self.id_infected, patch),
            time: self.time_of_infection,
            acute: self.is_infector_acute == 1,
        }
    }
}

pub fn read_transmissions(path: &Path, patch: i8) -> Result<Vec<TransmissionEvent>, ReadError> {
    let reader = BufReader::new(File::open(path).map_err(ReadError::IoError)?);
    from_reader(reader, patch)
}

fn from_reader(reader: impl std::io::Read, patch: i8) -> Result<Vec<TransmissionEvent>, ReadError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(reader);
    reader
        .deserialize()
        .map(|record: Result<TransmissionRecord, csv::Error>| {
            record.map(|r| r.into_event(patch)).map_err(ReadError::CsvError)
        })
        .collect()
}

/// Keep events with `start < time <= end`.
pub fn filter_window(
    events: Vec<TransmissionEvent>,
    start: f64,
    end: f64,
) -> Vec<TransmissionEvent> {
    events
        .into_iter()
        .filter(|event| event.time > start && event.time <= end)
        .collect()
}

/// Round event times to the model's recorded resolution of 4 decimals.
pub fn round_times(events: &mut [TransmissionEvent]) {
    for event in events {
        event.time = (event.time * 1e4).round() / 1e4;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATCH0_CONTENT: &str = "\
IdInfected,IdInfector,TimeOfInfection,IsInfectorAcute,IsInfectorOutsidePatch,InfectorCD4
12,3,1987.25,1,0,500
13,7,1988.5,0,1,350
14,-1,1980.0,0,-1,0
";

    #[test]
    fn patch0_records_resolve_their_infector_patch() {
        let events = from_reader(PATCH0_CONTENT.as_bytes(), 0).unwrap();
        assert_eq!(events.len(), 3);

        assert_eq!(events[0].infected, PersonId::new(12, 0));
        assert_eq!(events[0].infector, Infector::Case(PersonId::new(3, 0)));
        assert!(events[0].acute);

        // infector from outside the patch lives in patch 1
        assert_eq!(events[1].infector, Infector::Case(PersonId::new(7, 1)));
        assert!(!events[1].acute);

        assert_eq!(events[2].infector, Infector::Seed);
    }

    #[test]
    fn patch1_records_invert_the_outside_flag() {
        let content = "\
IdInfected,IdInfector,TimeOfInfection,IsInfectorAcute,IsInfectorOutsidePatch
20,5,1991.0,0,0
21,6,1992.0,0,1
";
        let events = from_reader(content.as_bytes(), 1).unwrap();
        assert_eq!(events[0].infected, PersonId::new(20, 1));
        assert_eq!(events[0].infector, Infector::Case(PersonId::new(5, 1)));
        assert_eq!(events[1].infector, Infector::Case(PersonId::new(6, 0)));
    }

    #[test]
    fn window_is_half_open() {
        let events = from_reader(PATCH0_CONTENT.as_bytes(), 0).unwrap();
        let kept = filter_window(events, 1980.0, 1987.25);
        let times: Vec<f64> = kept.iter().map(|event| event.time).collect();
        assert_eq!(times, [1987.25]);
    }

    #[test]
    fn times_round_to_recorded_resolution() {
        let content = "IdInfected,IdInfector,TimeOfInfection,IsInfectorAcute,IsInfectorOutsidePatch\n\
                       1,2,1987.123456,0,0\n";
        let mut events = from_reader(content.as_bytes(), 0).unwrap();
        round_times(&mut events);
        assert_eq!(events[0].time, 1987.1235);
    }
}
