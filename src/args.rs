use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Path to log file; logs go to stderr when absent.
    #[clap(long, global = true)]
    pub log_file: Option<String>,

    /// Verbosity of logging (-v: debug, -vv: trace).
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge per-patch transmission and individual files into one dataset.
    Network(NetworkArgs),
    /// Export the ordered transmission network as FAVITES input files.
    Favites(FavitesArgs),
    /// Render Graphviz dot files of the transmission network.
    Dot(DotArgs),
    /// Summarize offspring distributions across exported networks.
    Stats(StatsArgs),
}

/// The four per-patch files written by the simulator.
#[derive(ClapArgs, Debug, Clone)]
pub struct PatchInputs {
    /// Transmission file for patch 0.
    #[clap(long)]
    pub trans_p0: PathBuf,

    /// Transmission file for patch 1.
    #[clap(long)]
    pub trans_p1: PathBuf,

    /// Individual file for patch 0.
    #[clap(long)]
    pub indiv_p0: PathBuf,

    /// Individual file for patch 1.
    #[clap(long)]
    pub indiv_p1: PathBuf,
}

#[derive(ClapArgs, Debug)]
pub struct NetworkArgs {
    #[clap(flatten)]
    pub inputs: PatchInputs,

    /// Directory for the merged CSV files.
    #[clap(short, long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Stem shared by both output filenames.
    #[clap(long, default_value = "patchall")]
    pub stem: String,
}

#[derive(ClapArgs, Debug)]
pub struct FavitesArgs {
    #[clap(flatten)]
    pub inputs: PatchInputs,

    /// Start date at which to look at transmissions (exclusive).
    #[clap(long)]
    pub start_date: f64,

    /// End date at which to look at transmissions (inclusive).
    #[clap(long)]
    pub end_date: f64,

    /// Output filename stem (excluding the filetype suffix).
    #[clap(short, long, default_value = "output")]
    pub outfilename: PathBuf,

    /// Number of sampled individuals.
    #[clap(short = 'n', long, default_value_t = 50)]
    pub sampled_individuals: usize,

    /// When to start sampling individuals.
    #[clap(short = 's', long, default_value_t = 1990.0)]
    pub start_sampling: f64,

    /// When to end sampling individuals.
    #[clap(short = 'e', long, default_value_t = 2018.0)]
    pub end_sampling: f64,

    /// Seed for the sampling RNG; sampling is randomized when absent.
    #[clap(long)]
    pub seed: Option<u64>,
}

#[derive(ClapArgs, Debug)]
pub struct DotArgs {
    #[clap(flatten)]
    pub inputs: PatchInputs,

    /// Start date at which to look at transmissions (exclusive).
    #[clap(long)]
    pub start_date: f64,

    /// End date at which to look at transmissions (inclusive).
    #[clap(long)]
    pub end_date: f64,

    /// Output filename stem (excluding the filetype suffix).
    #[clap(short, long, default_value = "output")]
    pub outfilename: PathBuf,

    /// Graph name.
    #[clap(short = 'g', long, default_value = "transmissions")]
    pub graph_name: String,

    /// Which variable to use for colouring nodes (risk or sex).
    #[clap(short = 'c', long, default_value = "risk")]
    pub colour_var: String,

    /// Figure size in inches, width then height.
    #[clap(short = 'f', long, num_args = 2, default_values_t = [19.2, 10.8])]
    pub fig_size: Vec<f64>,

    /// Patch of infected individuals to focus on in the clustered file.
    #[clap(short, long, num_args = 1.., default_values_t = [0])]
    pub patch: Vec<i8>,

    /// Path to a YAML style file; built-in defaults apply when absent.
    #[clap(long)]
    pub style: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct StatsArgs {
    /// Exported transmission-network TSV files, one per run.
    #[clap(required = true)]
    pub networks: Vec<PathBuf>,

    /// Start of the analysis window (exclusive).
    #[clap(long, default_value_t = 1980.0)]
    pub start_date: f64,

    /// Individuals infected after this date no longer count as potential
    /// infectors.
    #[clap(long, default_value_t = 2011.0)]
    pub censor_date: f64,

    /// Output CSV of per-run summaries.
    #[clap(short, long, default_value = "offspring_summary.csv")]
    pub output: PathBuf,

    /// Do not show a progress bar.
    #[clap(long)]
    pub disable_progress_bar: bool,
}
