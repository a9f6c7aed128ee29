//! Graphviz export of the transmission network.
//!
//! Two renderings: a left-to-right digraph whose ranks follow infection
//! time (process with `dot`), and a clustered digraph grouping singleton
//! cases separately (process with `fdp`).

use std::io::{self, Write};

use itertools::Itertools;

use crate::config::Style;
use crate::core::cohort::Cohort;
use crate::core::event::{Individual, Infector, PersonId, TransmissionEvent};

const INDENT: &str = "    ";

pub struct DotWriter<'a> {
    graph_name: &'a str,
    style: &'a Style,
}

impl<'a> DotWriter<'a> {
    pub fn new(graph_name: &'a str, style: &'a Style) -> Self {
        Self { graph_name, style }
    }

    /// Digraph with an invisible timeline chain forcing one rank per
    /// recorded infection time. `events` must be in ascending time order.
    pub fn write_time_aligned(
        &self,
        cohort: &Cohort,
        events: &[TransmissionEvent],
        writer: &mut impl Write,
    ) -> io::Result<()> {
        let style = self.style;
        writeln!(writer, "digraph {} {{", self.graph_name)?;
        writeln!(writer, "{INDENT}rankdir=LR;")?;
        writeln!(writer, "{INDENT}ratio=\"fill\";")?;
        writeln!(writer, "{INDENT}overlap=false;")?;
        writeln!(writer, "{INDENT}margin=0;")?;
        writeln!(writer, "{INDENT}size=\"{},{}\";", style.fig_width, style.fig_height)?;
        writeln!(
            writer,
            "{INDENT}node [shape = circle, width=1.5, label=\"\", fixedsize=true, overlap=scalexy, splines=true];"
        )?;
        writeln!(
            writer,
            "{INDENT}edge [arrowhead = normal, label=\"\", color=\"{}\"];",
            style.edge_colour
        )?;

        self.write_timeline(events, writer)?;
        self.write_rank_groups(events, writer)?;

        for event in events {
            self.write_node(cohort, event.infected, writer)?;
            if let Infector::Case(infector) = event.infector {
                self.write_node(cohort, infector, writer)?;
                self.write_edge(event, infector, false, writer)?;
            }
        }
        writeln!(writer, "}}")
    }

    /// Digraph with the transmissions in one cluster and the singleton
    /// cases in another.
    pub fn write_clustered(
        &self,
        cohort: &Cohort,
        events: &[TransmissionEvent],
        singletons: &[&Individual],
        writer: &mut impl Write,
    ) -> io::Result<()> {
        let style = self.style;
        writeln!(writer, "digraph {} {{", self.graph_name)?;
        writeln!(writer, "{INDENT}size=\"{},{}\";", style.fig_width, style.fig_height)?;
        writeln!(
            writer,
            "{INDENT}node [shape = circle, label=\"\", overlap=scalexy, splines=true];"
        )?;
        writeln!(writer, "{INDENT}graph [fontsize = 144, resolution=300];")?;
        writeln!(
            writer,
            "{INDENT}edge [arrowhead = normal, label=\"\", color=\"{}\"];",
            style.edge_colour
        )?;

        writeln!(writer, "{INDENT}subgraph cluster_transmissions {{")?;
        writeln!(writer, "{INDENT}{INDENT}label=\"Transmissions\";")?;
        writeln!(writer, "{INDENT}{INDENT}color=white;")?;
        for event in events {
            self.write_node(cohort, event.infected, writer)?;
            if let Infector::Case(infector) = event.infector {
                self.write_node(cohort, infector, writer)?;
                self.write_edge(event, infector, true, writer)?;
            }
        }
        writeln!(writer, "{INDENT}}}")?;

        writeln!(writer, "{INDENT}subgraph cluster_singletons {{")?;
        writeln!(writer, "{INDENT}{INDENT}label=\"Singletons\";")?;
        writeln!(writer, "{INDENT}{INDENT}color=white;")?;
        for individual in singletons {
            writeln!(
                writer,
                "{INDENT}{INDENT}\"{}\" [style=filled, color={}, fillcolor=\"{}\"];",
                individual.id,
                style.outline_colour,
                style.fill_colour(Some(individual)),
            )?;
        }
        writeln!(writer, "{INDENT}}}")?;
        writeln!(writer, "}}")
    }

    /// Invisible chain of the distinct timestamps, so `dot` lays the ranks
    /// out left to right in time order.
    fn write_timeline(
        &self,
        events: &[TransmissionEvent],
        writer: &mut impl Write,
    ) -> io::Result<()> {
        writeln!(writer, "{INDENT}{{")?;
        writeln!(writer, "{INDENT}node [style=invis];")?;
        writeln!(writer, "{INDENT}edge [style=invis];")?;
        let mut times = events
            .iter()
            .map(|event| event.time)
            .dedup_by(|a, b| a.total_cmp(b).is_eq());
        if let Some(first) = times.next() {
            write!(writer, "{INDENT}{first}")?;
            for (count, time) in times.enumerate() {
                write!(writer, " -> {time}")?;
                if (count + 1) % 4 == 0 {
                    write!(writer, "\n{INDENT}")?;
                }
            }
            writeln!(writer, ";")?;
        }
        writeln!(writer, "{INDENT}}}")
    }

    fn write_rank_groups(
        &self,
        events: &[TransmissionEvent],
        writer: &mut impl Write,
    ) -> io::Result<()> {
        for (time, bucket) in &events.iter().chunk_by(|event| event.time) {
            write!(writer, "{INDENT}{{ rank = same; \"{time}\"; ")?;
            for event in bucket {
                write!(writer, "\"{}\"; ", event.infected)?;
            }
            writeln!(writer, "}}")?;
        }
        Ok(())
    }

    fn write_node(
        &self,
        cohort: &Cohort,
        id: PersonId,
        writer: &mut impl Write,
    ) -> io::Result<()> {
        writeln!(
            writer,
            "{INDENT}{INDENT}\"{}\" [style=filled, color={}, fillcolor=\"{}\"];",
            id,
            self.style.outline_colour,
            self.style.fill_colour(cohort.individual(id)),
        )
    }

    /// Acute-phase transmissions draw darker and thicker.
    fn write_edge(
        &self,
        event: &TransmissionEvent,
        infector: PersonId,
        clustered: bool,
        writer: &mut impl Write,
    ) -> io::Result<()> {
        let style = self.style;
        let penwidth = match (clustered, event.acute) {
            (false, false) => style.edge_penwidth,
            (false, true) => style.acute_edge_penwidth,
            (true, false) => style.cluster_edge_penwidth,
            (true, true) => style.cluster_acute_edge_penwidth,
        };
        let colour = if event.acute { &style.acute_edge_colour } else { &style.edge_colour };
        writeln!(
            writer,
            "{INDENT}{INDENT}\"{}\" -> \"{}\" [penwidth={}, color=\"{}\"];",
            infector, event.infected, penwidth, colour,
        )
    }
}
