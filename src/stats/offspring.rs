//! Offspring distribution of the transmission network: how many onward
//! infections each infected individual causes.

use std::collections::HashSet;

use itertools::Itertools;
use serde::Serialize;

use crate::readwrite::NetworkRow;

/// Per-run summary of the offspring distribution, one CSV row per run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffspringSummary {
    pub run: String,
    pub n: usize,
    pub mean: f64,
    pub variance: f64,
    pub q025: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub q975: f64,
}

/// Onward-transmission counts inside the analysis window, zero-padded.
///
/// Counts cover events after `start`. Individuals infected after `start`
/// and before `censor` who never appear as infector contribute a zero;
/// later infections are censored since their onward transmissions may fall
/// outside the observed period.
pub fn offspring_counts(rows: &[NetworkRow], start: f64, censor: f64) -> Vec<u64> {
    let in_window: Vec<&NetworkRow> = rows.iter().filter(|row| row.time > start).collect();

    let infectors: HashSet<&str> = in_window.iter().map(|row| row.infector.as_str()).collect();

    let mut counts: Vec<u64> = in_window
        .iter()
        .map(|row| row.infector.as_str())
        .counts()
        .into_values()
        .map(|count| count as u64)
        .collect();

    let zeros = in_window
        .iter()
        .filter(|row| row.time < censor && !infectors.contains(row.infected.as_str()))
        .count();
    counts.extend(std::iter::repeat_n(0, zeros));

    // counts() walks a HashMap, so pin the order down
    counts.sort_unstable();
    counts
}

/// Mean, population variance and the quantile spread of one run's counts.
pub fn summarize(run: &str, counts: &[u64]) -> OffspringSummary {
    let n = counts.len();
    let values: Vec<f64> = counts.iter().map(|&count| count as f64).collect();
    let mean = if n == 0 { 0.0 } else { values.iter().sum::<f64>() / n as f64 };
    let variance = if n == 0 {
        0.0
    } else {
        values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / n as f64
    };

    let mut sorted = values;
    sorted.sort_by(|a, b| a.total_cmp(b));

    OffspringSummary {
        run: run.to_string(),
        n,
        mean,
        variance,
        q025: quantile(&sorted, 0.025),
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        q975: quantile(&sorted, 0.975),
    }
}

/// Linearly interpolated quantile of an ascending-sorted sample.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted {
        [] => 0.0,
        [single] => *single,
        _ => {
            let position = (sorted.len() - 1) as f64 * q;
            let low = position.floor() as usize;
            let high = position.ceil() as usize;
            sorted[low] + (position - low as f64) * (sorted[high] - sorted[low])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(infector: &str, infected: &str, time: f64) -> NetworkRow {
        NetworkRow {
            infector: infector.to_string(),
            infected: infected.to_string(),
            time,
        }
    }

    #[test]
    fn counts_include_zero_offspring_individuals() {
        let rows = vec![
            row("1_0", "2_0", 1990.0),
            row("1_0", "3_0", 1992.0),
            row("2_0", "4_0", 1995.0),
            // 3_0 and 4_0 infect nobody
        ];
        let counts = offspring_counts(&rows, 1980.0, 2011.0);
        assert_eq!(counts, [0, 0, 1, 2]);
    }

    #[test]
    fn window_excludes_early_events_and_root_chains() {
        let rows = vec![
            row("None", "SUPERFAKER", 1968.0),
            row("SUPERFAKER", "Fake_0", 1969.0),
            row("Fake_0", "1_0", 1975.0),
            row("1_0", "2_0", 1990.0),
        ];
        let counts = offspring_counts(&rows, 1980.0, 2011.0);
        // only the 1990 event is inside the window; 2_0 has zero offspring
        assert_eq!(counts, [0, 1]);
    }

    #[test]
    fn late_infections_do_not_pad_zeros() {
        let rows = vec![row("1_0", "2_0", 1990.0), row("1_0", "3_0", 2015.0)];
        let counts = offspring_counts(&rows, 1980.0, 2011.0);
        // 3_0 was infected after the censor date, so no zero for it
        assert_eq!(counts, [0, 2]);
    }

    #[test]
    fn summary_matches_hand_computed_moments() {
        let summary = summarize("run1", &[0, 0, 1, 2, 2]);
        assert_eq!(summary.n, 5);
        assert_eq!(summary.mean, 1.0);
        assert_eq!(summary.variance, 0.8);
        assert_eq!(summary.median, 1.0);
        assert_eq!(summary.q25, 0.0);
        assert_eq!(summary.q75, 2.0);
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let sorted = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(quantile(&sorted, 0.5), 1.5);
        assert_eq!(quantile(&sorted, 0.0), 0.0);
        assert_eq!(quantile(&sorted, 1.0), 3.0);
    }

    #[test]
    fn empty_runs_summarize_to_zeros() {
        let summary = summarize("empty", &[]);
        assert_eq!(summary.n, 0);
        assert_eq!(summary.mean, 0.0);
        assert_eq!(summary.variance, 0.0);
    }
}
