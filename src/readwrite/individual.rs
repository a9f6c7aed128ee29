//! Per-patch individual files.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use super::ReadError;
use crate::core::event::{Individual, PersonId};

/// One row of a per-patch individual file, by the simulator's column
/// names. Columns not listed here are ignored.
#[derive(Debug, Deserialize)]
struct IndividualRecord {
    #[serde(rename = "Id")]
    id: i64,
    #[serde(rename = "Sex")]
    sex: String,
    #[serde(rename = "DoB")]
    dob: f64,
    #[serde(rename = "DoD")]
    dod: f64,
    #[serde(rename = "HIV_pos")]
    hiv_pos: i8,
    #[serde(rename = "RiskGp")]
    risk_gp: String,
}

impl IndividualRecord {
    fn into_individual(self, patch: i8) -> Result<Individual, ReadError> {
        Ok(Individual {
            id: PersonId::new(self.id, patch),
            sex: self
                .sex
                .parse()
                .map_err(|err| ReadError::FieldError(format!("Sex '{}': {}", self.sex, err)))?,
            birth: self.dob,
            death: self.dod,
            hiv_positive: self.hiv_pos == 1,
            risk_group: self.risk_gp.parse().map_err(|err| {
                ReadError::FieldError(format!("RiskGp '{}': {}", self.risk_gp, err))
            })?,
        })
    }
}

pub fn read_individuals(path: &Path, patch: i8) -> Result<Vec<Individual>, ReadError> {
    let reader = BufReader::new(File::open(path).map_err(ReadError::IoError)?);
    from_reader(reader, patch)
}

fn from_reader(reader: impl std::io::Read, patch: i8) -> Result<Vec<Individual>, ReadError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(reader);
    reader
        .deserialize()
        .map(|record: Result<IndividualRecord, csv::Error>| {
            record.map_err(ReadError::CsvError)?.into_individual(patch)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{RiskGroup, Sex};

    #[test]
    fn records_parse_with_extra_columns_ignored() {
        let content = "\
Id,Sex,DoB,DoD,HIV_pos,RiskGp,t_diagnosed
101,M,1962.5,2030.0,1,H,1995.0
102,F,1970.0,2025.0,0,L,-1
";
        let individuals = from_reader(content.as_bytes(), 1).unwrap();
        assert_eq!(individuals.len(), 2);
        assert_eq!(individuals[0].id, PersonId::new(101, 1));
        assert_eq!(individuals[0].sex, Sex::Male);
        assert_eq!(individuals[0].risk_group, RiskGroup::High);
        assert!(individuals[0].hiv_positive);
        assert!(!individuals[1].hiv_positive);
        assert_eq!(individuals[1].birth, 1970.0);
    }

    #[test]
    fn bad_covariate_codes_are_reported() {
        let content = "Id,Sex,DoB,DoD,HIV_pos,RiskGp\n101,X,1962.5,2030.0,1,H\n";
        let err = from_reader(content.as_bytes(), 0).unwrap_err();
        assert!(matches!(err, ReadError::FieldError(_)));
    }
}
