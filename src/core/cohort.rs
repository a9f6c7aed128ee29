//! Merged view over both patches: individuals in file order plus the
//! event list.

use std::collections::{HashMap, HashSet};

use super::event::{Individual, PersonId, TransmissionEvent};

pub struct Cohort {
    individuals: Vec<Individual>,
    index: HashMap<PersonId, usize>,
    events: Vec<TransmissionEvent>,
}

impl Cohort {
    pub fn assemble(individuals: Vec<Individual>, events: Vec<TransmissionEvent>) -> Self {
        let index = individuals
            .iter()
            .enumerate()
            .map(|(pos, individual)| (individual.id, pos))
            .collect();
        Self { individuals, index, events }
    }

    pub fn individual(&self, id: PersonId) -> Option<&Individual> {
        self.index.get(&id).map(|&pos| &self.individuals[pos])
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn events(&self) -> &[TransmissionEvent] {
        &self.events
    }

    /// HIV-positive individuals in one of `patches`, alive through the
    /// whole window and party to no transmission event. File order.
    pub fn singletons(&self, start: f64, end: f64, patches: &[i8]) -> Vec<&Individual> {
        let mut involved: HashSet<PersonId> = HashSet::new();
        for event in &self.events {
            involved.insert(event.infected);
            if let Some(infector) = event.infector.case() {
                involved.insert(infector);
            }
        }

        self.individuals
            .iter()
            .filter(|individual| {
                individual.hiv_positive
                    && individual.birth < start
                    && individual.death > end
                    && patches.contains(&individual.id.patch)
                    && !involved.contains(&individual.id)
            })
            .collect()
    }

    /// Log every pair where both parties share a sex. The model transmits
    /// heterosexually, so such records point at corrupt input.
    pub fn warn_same_sex_pairs(&self) -> usize {
        let mut flagged = 0;
        for event in &self.events {
            let Some(infector) = event.infector.case() else {
                continue;
            };
            if let (Some(a), Some(b)) = (self.individual(infector), self.individual(event.infected))
            {
                if a.sex == b.sex {
                    log::warn!(
                        "same sex transmission: infector {} infected {}",
                        infector,
                        event.infected
                    );
                    flagged += 1;
                }
            }
        }
        flagged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{Infector, RiskGroup, Sex};

    fn individual(id: i64, patch: i8, sex: Sex, birth: f64, death: f64, hiv: bool) -> Individual {
        Individual {
            id: PersonId::new(id, patch),
            sex,
            birth,
            death,
            hiv_positive: hiv,
            risk_group: RiskGroup::Medium,
        }
    }

    fn event(infector: i64, infected: i64, time: f64) -> TransmissionEvent {
        TransmissionEvent {
            infector: Infector::Case(PersonId::new(infector, 0)),
            infected: PersonId::new(infected, 0),
            time,
            acute: false,
        }
    }

    #[test]
    fn lookup_resolves_across_patches() {
        let cohort = Cohort::assemble(
            vec![
                individual(1, 0, Sex::Male, 1960.0, 2020.0, true),
                individual(1, 1, Sex::Female, 1970.0, 2020.0, false),
            ],
            Vec::new(),
        );
        assert_eq!(cohort.individual(PersonId::new(1, 1)).unwrap().sex, Sex::Female);
        assert!(cohort.individual(PersonId::new(2, 0)).is_none());
    }

    #[test]
    fn singletons_are_uninvolved_positive_and_alive() {
        let cohort = Cohort::assemble(
            vec![
                individual(1, 0, Sex::Male, 1960.0, 2020.0, true),
                individual(2, 0, Sex::Female, 1960.0, 2020.0, true),
                individual(3, 0, Sex::Male, 1960.0, 2020.0, true),
                // negative on HIV
                individual(4, 0, Sex::Female, 1960.0, 2020.0, false),
                // born inside the window
                individual(5, 0, Sex::Male, 1985.0, 2020.0, true),
                // dead before the window closes
                individual(6, 0, Sex::Female, 1960.0, 1995.0, true),
                // wrong patch
                individual(7, 1, Sex::Male, 1960.0, 2020.0, true),
            ],
            vec![event(1, 2, 1990.0)],
        );
        let singles = cohort.singletons(1980.0, 2000.0, &[0]);
        let ids: Vec<i64> = singles.iter().map(|individual| individual.id.id).collect();
        assert_eq!(ids, [3]);
    }

    #[test]
    fn same_sex_pairs_are_counted() {
        let cohort = Cohort::assemble(
            vec![
                individual(1, 0, Sex::Male, 1960.0, 2020.0, true),
                individual(2, 0, Sex::Male, 1960.0, 2020.0, true),
                individual(3, 0, Sex::Female, 1960.0, 2020.0, true),
            ],
            vec![event(1, 2, 1990.0), event(1, 3, 1991.0)],
        );
        assert_eq!(cohort.warn_same_sex_pairs(), 1);
    }
}
