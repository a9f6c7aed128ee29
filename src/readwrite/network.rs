//! Consolidated network export: one transmission table and one individual
//! table covering both patches, with global ids and merged covariates.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::cohort::Cohort;
use crate::core::event::{Individual, TransmissionEvent};

/// Row of the consolidated transmission table. Infector covariates are
/// empty for seed cases and individuals outside both files.
#[derive(Debug, Serialize)]
struct TransmissionRow {
    #[serde(rename = "PATCH_INFECTED")]
    patch_infected: i8,
    #[serde(rename = "PATCH_INFECTOR")]
    patch_infector: Option<i8>,
    #[serde(rename = "ID_INFECTED")]
    id_infected: String,
    #[serde(rename = "ID_INFECTOR")]
    id_infector: Option<String>,
    #[serde(rename = "DOB_INFECTED")]
    dob_infected: Option<f64>,
    #[serde(rename = "DOB_INFECTOR")]
    dob_infector: Option<f64>,
    #[serde(rename = "TimeOfInfection")]
    time_of_infection: f64,
    #[serde(rename = "AGE_INFECTED")]
    age_infected: Option<f64>,
    #[serde(rename = "AGE_INFECTOR")]
    age_infector: Option<f64>,
    #[serde(rename = "SEX_INFECTED")]
    sex_infected: Option<String>,
    #[serde(rename = "SEX_INFECTOR")]
    sex_infector: Option<String>,
    #[serde(rename = "IsInfectorAcute")]
    is_infector_acute: i8,
}

/// Row of the consolidated individual table.
#[derive(Debug, Serialize)]
struct IndividualRow {
    #[serde(rename = "Id")]
    id: i64,
    #[serde(rename = "ID")]
    global_id: String,
    #[serde(rename = "PATCH")]
    patch: i8,
    #[serde(rename = "SEX")]
    sex: String,
    #[serde(rename = "DoB")]
    dob: f64,
    #[serde(rename = "DoD")]
    dod: f64,
    #[serde(rename = "HIV_pos")]
    hiv_pos: i8,
    #[serde(rename = "RiskGp")]
    risk_gp: String,
    #[serde(rename = "TimeOfInfection")]
    time_of_infection: Option<f64>,
}

pub struct NetworkWriter<'a> {
    output_dir: &'a Path,
    stem: &'a str,
}

impl<'a> NetworkWriter<'a> {
    pub fn new(output_dir: &'a Path, stem: &'a str) -> Self {
        Self { output_dir, stem }
    }

    pub fn transmission_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("phylogenetic_transmission_{}.csv", self.stem))
    }

    pub fn individual_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("phylogenetic_individualdata_{}.csv", self.stem))
    }

    pub fn write_transmissions(
        &self,
        cohort: &Cohort,
        events: &[TransmissionEvent],
        writer: &mut impl Write,
    ) -> csv::Result<()> {
        let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
        for event in events {
            let infected = cohort.individual(event.infected);
            let infector_id = event.infector.case();
            let infector = infector_id.and_then(|id| cohort.individual(id));
            csv_writer.serialize(TransmissionRow {
                patch_infected: event.infected.patch,
                patch_infector: infector_id.map(|id| id.patch),
                id_infected: event.infected.to_string(),
                id_infector: infector_id.map(|id| id.to_string()),
                dob_infected: infected.map(|individual| individual.birth),
                dob_infector: infector.map(|individual| individual.birth),
                time_of_infection: event.time,
                age_infected: infected.map(|individual| event.time - individual.birth),
                age_infector: infector.map(|individual| event.time - individual.birth),
                sex_infected: infected.map(|individual| individual.sex.to_string()),
                sex_infector: infector.map(|individual| individual.sex.to_string()),
                is_infector_acute: event.acute as i8,
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_individuals(
        &self,
        individuals: &[Individual],
        events: &[TransmissionEvent],
        writer: &mut impl Write,
    ) -> csv::Result<()> {
        let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
        for individual in individuals {
            let infection_time = events
                .iter()
                .find(|event| event.infected == individual.id)
                .map(|event| event.time);
            csv_writer.serialize(IndividualRow {
                id: individual.id.id,
                global_id: individual.id.to_string(),
                patch: individual.id.patch,
                sex: individual.sex.to_string(),
                dob: individual.birth,
                dod: individual.death,
                hiv_pos: individual.hiv_positive as i8,
                risk_gp: individual.risk_group.to_string(),
                time_of_infection: infection_time,
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write both tables into the output directory.
    pub fn write_files(&self, cohort: &Cohort, events: &[TransmissionEvent]) -> io::Result<()> {
        std::fs::create_dir_all(self.output_dir)?;
        let mut transmissions = BufWriter::new(File::create(self.transmission_path())?);
        self.write_transmissions(cohort, events, &mut transmissions)
            .map_err(io::Error::other)?;

        let mut individual_file = BufWriter::new(File::create(self.individual_path())?);
        self.write_individuals(cohort.individuals(), events, &mut individual_file)
            .map_err(io::Error::other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{Infector, PersonId, RiskGroup, Sex};

    fn individual(id: i64, patch: i8, sex: Sex, birth: f64) -> Individual {
        Individual {
            id: PersonId::new(id, patch),
            sex,
            birth,
            death: 2030.0,
            hiv_positive: true,
            risk_group: RiskGroup::Medium,
        }
    }

    #[test]
    fn transmission_rows_merge_covariates_of_both_parties() {
        let individuals = vec![
            individual(1, 0, Sex::Male, 1960.0),
            individual(2, 1, Sex::Female, 1970.0),
        ];
        let events = vec![TransmissionEvent {
            infector: Infector::Case(PersonId::new(1, 0)),
            infected: PersonId::new(2, 1),
            time: 1990.0,
            acute: true,
        }];
        let cohort = Cohort::assemble(individuals, events.clone());

        let writer = NetworkWriter::new(Path::new("out"), "run1");
        let mut buffer = Vec::new();
        writer
            .write_transmissions(&cohort, &events, &mut buffer)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "PATCH_INFECTED,PATCH_INFECTOR,ID_INFECTED,ID_INFECTOR,DOB_INFECTED,DOB_INFECTOR,\
             TimeOfInfection,AGE_INFECTED,AGE_INFECTOR,SEX_INFECTED,SEX_INFECTOR,IsInfectorAcute"
        );
        assert_eq!(lines.next().unwrap(), "1,0,2_1,1_0,1970.0,1960.0,1990.0,20.0,30.0,F,M,1");
    }

    #[test]
    fn seed_cases_leave_infector_fields_empty() {
        let individuals = vec![individual(2, 0, Sex::Female, 1970.0)];
        let events = vec![TransmissionEvent {
            infector: Infector::Seed,
            infected: PersonId::new(2, 0),
            time: 1980.0,
            acute: false,
        }];
        let cohort = Cohort::assemble(individuals, events.clone());

        let writer = NetworkWriter::new(Path::new("out"), "run1");
        let mut buffer = Vec::new();
        writer
            .write_transmissions(&cohort, &events, &mut buffer)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("0,,2_0,,1970.0,,1980.0,10.0,,F,,0"));
    }

    #[test]
    fn individual_rows_carry_their_infection_time() {
        let individuals = vec![
            individual(1, 0, Sex::Male, 1960.0),
            individual(2, 0, Sex::Female, 1970.0),
        ];
        let events = vec![TransmissionEvent {
            infector: Infector::Case(PersonId::new(1, 0)),
            infected: PersonId::new(2, 0),
            time: 1990.0,
            acute: false,
        }];

        let writer = NetworkWriter::new(Path::new("out"), "run1");
        let mut buffer = Vec::new();
        writer
            .write_individuals(&individuals, &events, &mut buffer)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Id,ID,PATCH,SEX,DoB,DoD,HIV_pos,RiskGp,TimeOfInfection"
        );
        // individual 1 was never infected inside the window
        assert_eq!(lines.next().unwrap(), "1,1_0,0,M,1960.0,2030.0,1,M,");
        assert_eq!(lines.next().unwrap(), "2,2_0,0,F,1970.0,2030.0,1,M,1990.0");
    }
}
