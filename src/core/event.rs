//! Individuals and transmission events as they come out of the patch merge.

use std::str::FromStr;

use derive_more::Display;

/// Global identifier of an individual: the per-patch id combined with the
/// patch number, rendered the way the merged files spell it.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("{id}_{patch}")]
pub struct PersonId {
    pub id: i64,
    pub patch: i8,
}

impl PersonId {
    pub fn new(id: i64, patch: i8) -> Self {
        Self { id, patch }
    }
}

impl FromStr for PersonId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, patch) = s.rsplit_once('_').ok_or("expected <id>_<patch>")?;
        Ok(PersonId {
            id: id.parse().map_err(|_| "invalid individual id")?,
            patch: patch.parse().map_err(|_| "invalid patch number")?,
        })
    }
}

/// The transmitting side of an event. Index cases have no modeled infector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Infector {
    Seed,
    Case(PersonId),
}

impl Infector {
    /// The infecting individual, unless this is a seed case.
    pub fn case(&self) -> Option<PersonId> {
        match self {
            Infector::Seed => None,
            Infector::Case(id) => Some(*id),
        }
    }
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Sex {
    #[display("M")]
    Male,
    #[display("F")]
    Female,
}

impl FromStr for Sex {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Sex::Male),
            "F" => Ok(Sex::Female),
            _ => Err("unknown sex code"),
        }
    }
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum RiskGroup {
    #[display("L")]
    Low,
    #[display("M")]
    Medium,
    #[display("H")]
    High,
}

impl FromStr for RiskGroup {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(RiskGroup::Low),
            "M" => Ok(RiskGroup::Medium),
            "H" => Ok(RiskGroup::High),
            _ => Err("unknown risk group code"),
        }
    }
}

/// One transmission record after patch merging.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransmissionEvent {
    pub infector: Infector,
    pub infected: PersonId,
    /// Time of infection; recorded at limited resolution, so not unique.
    pub time: f64,
    /// Whether the infector was in the acute phase at transmission.
    pub acute: bool,
}

/// Covariates of one individual from the per-patch individual files.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Individual {
    pub id: PersonId,
    pub sex: Sex,
    pub birth: f64,
    pub death: f64,
    pub hiv_positive: bool,
    pub risk_group: RiskGroup,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_id_round_trips() {
        let id = PersonId::new(1542, 1);
        assert_eq!(id.to_string(), "1542_1");
        assert_eq!("1542_1".parse::<PersonId>().unwrap(), id);
    }

    #[test]
    fn person_id_parses_negative_ids() {
        assert_eq!("-1_-1".parse::<PersonId>().unwrap(), PersonId::new(-1, -1));
    }

    #[test]
    fn person_id_rejects_garbage() {
        assert!("1542".parse::<PersonId>().is_err());
        assert!("a_b".parse::<PersonId>().is_err());
    }

    #[test]
    fn covariate_codes_round_trip() {
        assert_eq!("M".parse::<Sex>().unwrap().to_string(), "M");
        assert_eq!("H".parse::<RiskGroup>().unwrap().to_string(), "H");
        assert!("X".parse::<RiskGroup>().is_err());
    }
}
