//! Chronological consolidation of transmission events.
//!
//! The simulator records infection times at limited resolution, so many
//! events share one timestamp. Downstream consumers require that an
//! individual's own infection appears before any event in which that
//! individual acts as infector. Within each group of equal timestamps the
//! events therefore pass through a stable topological sort over that
//! precedence relation; across groups ascending time decides.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::event::{PersonId, TransmissionEvent};
use crate::errors::PhylographError;

/// Reorder `events` so that timestamps are non-decreasing and, within each
/// equal-timestamp bucket, every infector's own infection precedes the
/// events it causes. Events unrelated by that rule keep their original
/// relative order.
pub fn reorder(
    mut events: Vec<TransmissionEvent>,
) -> Result<Vec<TransmissionEvent>, PhylographError> {
    check_unique_infected(&events)?;

    // sort_by is stable: equal timestamps keep their input order
    events.sort_by(|a, b| a.time.total_cmp(&b.time));

    let mut ordered = Vec::with_capacity(events.len());
    let mut start = 0;
    while start < events.len() {
        let time = events[start].time;
        let mut end = start + 1;
        while end < events.len() && events[end].time.total_cmp(&time).is_eq() {
            end += 1;
        }
        order_bucket(&events[start..end], time, &mut ordered)?;
        start = end;
    }
    Ok(ordered)
}

fn check_unique_infected(events: &[TransmissionEvent]) -> Result<(), PhylographError> {
    let mut seen = HashSet::with_capacity(events.len());
    for event in events {
        if !seen.insert(event.infected) {
            return Err(PhylographError::DuplicateInfectedId(event.infected));
        }
    }
    Ok(())
}

/// Stable Kahn's sort over one equal-timestamp bucket.
///
/// An edge runs from the event infecting X to every event where X is the
/// infector. Infected ids are unique, so each event has at most one
/// predecessor. Ready events are emitted in original-index order.
fn order_bucket(
    bucket: &[TransmissionEvent],
    time: f64,
    out: &mut Vec<TransmissionEvent>,
) -> Result<(), PhylographError> {
    let by_infected: HashMap<PersonId, usize> = bucket
        .iter()
        .enumerate()
        .map(|(pos, event)| (event.infected, pos))
        .collect();

    let mut successors = vec![Vec::new(); bucket.len()];
    let mut predecessor = vec![None; bucket.len()];
    for (pos, event) in bucket.iter().enumerate() {
        if let Some(infector) = event.infector.case() {
            if let Some(&pred) = by_infected.get(&infector) {
                successors[pred].push(pos);
                predecessor[pos] = Some(pred);
            }
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = predecessor
        .iter()
        .enumerate()
        .filter(|(_, pred)| pred.is_none())
        .map(|(pos, _)| Reverse(pos))
        .collect();

    let mut emitted = vec![false; bucket.len()];
    let mut count = 0;
    while let Some(Reverse(pos)) = ready.pop() {
        out.push(bucket[pos]);
        emitted[pos] = true;
        count += 1;
        for &next in &successors[pos] {
            // `next` has no other predecessor, so it is ready now
            ready.push(Reverse(next));
        }
    }

    if count < bucket.len() {
        return Err(PhylographError::InconsistentCausalOrder {
            time,
            cycle: find_cycle(bucket, &predecessor, &emitted),
        });
    }
    Ok(())
}

/// Follow the unique predecessor links among the unresolved events until
/// one repeats; every unresolved event leads into such a cycle. Returns
/// the infected ids along the cycle, in infection-chain order.
fn find_cycle(
    bucket: &[TransmissionEvent],
    predecessor: &[Option<usize>],
    emitted: &[bool],
) -> Vec<PersonId> {
    let Some(start) = emitted.iter().position(|done| !done) else {
        return Vec::new();
    };

    let mut path: Vec<usize> = Vec::new();
    let mut index = HashMap::new();
    let mut pos = start;
    loop {
        if let Some(&at) = index.get(&pos) {
            let mut cycle: Vec<PersonId> =
                path[at..].iter().map(|&p| bucket[p].infected).collect();
            cycle.reverse();
            return cycle;
        }
        index.insert(pos, path.len());
        path.push(pos);
        match predecessor[pos] {
            Some(pred) => pos = pred,
            // unreachable: a predecessor-free event would have been emitted
            None => return path.iter().map(|&p| bucket[p].infected).collect(),
        }
    }
}
