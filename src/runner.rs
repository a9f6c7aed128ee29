//! Per-subcommand orchestration.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rand::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::args::{Args, Command, DotArgs, FavitesArgs, NetworkArgs, PatchInputs, StatsArgs};
use crate::config::Style;
use crate::core::{Cohort, TransmissionEvent, reorder};
use crate::readwrite::{
    DotWriter, FavitesWriter, NetworkWriter, filter_window, read_individuals, read_network_file,
    read_transmissions, round_times,
};
use crate::stats::{offspring_counts, summarize};

pub struct Runner {
    args: Args,
}

impl Runner {
    pub fn new(args: Args) -> Result<Runner> {
        Self::setup_logger(&args);
        Ok(Self { args })
    }

    pub fn start(&self) -> Result<()> {
        match &self.args.command {
            Command::Network(network_args) => self.run_network(network_args),
            Command::Favites(favites_args) => self.run_favites(favites_args),
            Command::Dot(dot_args) => self.run_dot(dot_args),
            Command::Stats(stats_args) => self.run_stats(stats_args),
        }
    }

    /// Setup logging level and sink
    fn setup_logger(args: &Args) {
        let log_level = match args.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        match &args.log_file {
            Some(log_file) => {
                simple_logging::log_to_file(log_file, log_level).unwrap_or_else(|_| {
                    eprintln!("Unable to open log file.");
                    std::process::exit(1);
                });
            }
            None => simple_logging::log_to_stderr(log_level),
        }
    }

    /// Read and merge the four per-patch files.
    fn load_cohort(inputs: &PatchInputs) -> Result<Cohort> {
        log::info!("Reading transmission files...");
        let mut events = read_transmissions(&inputs.trans_p0, 0)?;
        events.extend(read_transmissions(&inputs.trans_p1, 1)?);

        log::info!("Reading individual files...");
        let mut individuals = read_individuals(&inputs.indiv_p0, 0)?;
        individuals.extend(read_individuals(&inputs.indiv_p1, 1)?);

        log::info!(
            "Merged {} events over {} individuals.",
            events.len(),
            individuals.len()
        );
        Ok(Cohort::assemble(individuals, events))
    }

    /// Window, round and consolidate the cohort's events.
    fn ordered_events(cohort: &Cohort, start: f64, end: f64) -> Result<Vec<TransmissionEvent>> {
        let mut events = filter_window(cohort.events().to_vec(), start, end);
        round_times(&mut events);
        log::info!("Consolidating {} events...", events.len());
        Ok(reorder(events)?)
    }

    fn run_network(&self, args: &NetworkArgs) -> Result<()> {
        let cohort = Self::load_cohort(&args.inputs)?;
        cohort.warn_same_sex_pairs();

        let writer = NetworkWriter::new(&args.output_dir, &args.stem);
        writer.write_files(&cohort, cohort.events())?;
        log::info!(
            "Wrote {} and {}.",
            writer.transmission_path().display(),
            writer.individual_path().display()
        );
        Ok(())
    }

    fn run_favites(&self, args: &FavitesArgs) -> Result<()> {
        let cohort = Self::load_cohort(&args.inputs)?;
        cohort.warn_same_sex_pairs();
        let events = Self::ordered_events(&cohort, args.start_date, args.end_date)?;

        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        FavitesWriter::new(&args.outfilename).write_files(
            &events,
            args.start_sampling,
            args.end_sampling,
            args.sampled_individuals,
            &mut rng,
        )?;
        log::info!("Wrote FAVITES files under {}.", args.outfilename.display());
        Ok(())
    }

    fn run_dot(&self, args: &DotArgs) -> Result<()> {
        let cohort = Self::load_cohort(&args.inputs)?;
        cohort.warn_same_sex_pairs();
        let events = Self::ordered_events(&cohort, args.start_date, args.end_date)?;

        let mut style = match &args.style {
            Some(path) => {
                let style = Style::read_from_file(&path.to_string_lossy())?;
                log::info!("Loaded style\n{}", style);
                style
            }
            None => Style::default(),
        };
        style.colour_var = args.colour_var.clone();
        if let [width, height] = args.fig_size[..] {
            style.fig_width = width;
            style.fig_height = height;
        }

        let writer = DotWriter::new(&args.graph_name, &style);

        let time_aligned_path = format!("{}_time_aligned.dot", args.outfilename.display());
        let mut file = BufWriter::new(File::create(&time_aligned_path)?);
        writer.write_time_aligned(&cohort, &events, &mut file)?;
        file.flush()?;

        // the clustered file focuses on the requested patches
        let focus: Vec<TransmissionEvent> = events
            .iter()
            .filter(|event| args.patch.contains(&event.infected.patch))
            .cloned()
            .collect();
        let singletons = cohort.singletons(args.start_date, args.end_date, &args.patch);
        let clustered_path = format!("{}.dot", args.outfilename.display());
        let mut file = BufWriter::new(File::create(&clustered_path)?);
        writer.write_clustered(&cohort, &focus, &singletons, &mut file)?;
        file.flush()?;

        log::info!("Wrote {} and {}.", time_aligned_path, clustered_path);
        Ok(())
    }

    fn run_stats(&self, args: &StatsArgs) -> Result<()> {
        let bar = match args.disable_progress_bar {
            true => None,
            false => {
                let bar = ProgressBar::new(args.networks.len() as u64);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template(
                            "[{bar:40}] {pos:>7}/{len:7} [{elapsed_precise} / {duration_precise}] {msg}",
                        )
                        .expect("Unable to create template.")
                        .progress_chars("=> "),
                );
                Some(bar)
            }
        };

        let mut summaries = Vec::with_capacity(args.networks.len());
        for path in &args.networks {
            log::debug!("Reading {}...", path.display());
            let rows = read_network_file(path)?;
            let counts = offspring_counts(&rows, args.start_date, args.censor_date);
            let run = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            summaries.push(summarize(&run, &counts));
            if let Some(bar) = bar.as_ref() {
                bar.inc(1);
                bar.set_message(run);
            }
        }
        if let Some(bar) = bar {
            bar.finish_with_message("Done.");
        }

        let mut writer = csv::WriterBuilder::new().from_path(&args.output)?;
        for summary in &summaries {
            writer.serialize(summary)?;
        }
        writer.flush()?;
        log::info!(
            "Wrote {} summaries to {}.",
            summaries.len(),
            args.output.display()
        );
        Ok(())
    }
}
