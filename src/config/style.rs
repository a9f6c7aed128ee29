//! Dot output styling.
//!
//! All colours, penwidths and the figure size live in one explicit value
//! that can be loaded from a YAML file; defaults match the palette the
//! rendering has always used.

use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::core::event::{Individual, RiskGroup, Sex};

// Red/blues for risk groups, blue/red for male/female
const RISK_COLOURS: &[(&str, &str)] = &[("L", "#2c7bb6"), ("M", "#fdae61"), ("H", "#d7191c")];
const SEX_COLOURS: &[(&str, &str)] = &[("M", "#1f78b4"), ("F", "#e41a1c")];

const NEUTRAL: &str = "#778899"; // light slate grey

/// Built-in colour schemes, keyed by the grouping variable they colour by.
pub static COLOUR_SCHEMES: phf::Map<&'static str, &'static [(&'static str, &'static str)]> = phf_map! {
    "risk" => RISK_COLOURS,
    "sex" => SEX_COLOURS,
};

fn scheme_colour(scheme: &str, key: &str) -> Option<&'static str> {
    COLOUR_SCHEMES
        .get(scheme)?
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, colour)| *colour)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Style {
    /// Grouping variable for node fill: a key of [`COLOUR_SCHEMES`], or
    /// anything else for a uniform neutral fill.
    pub colour_var: String,
    pub risk_low: String,
    pub risk_medium: String,
    pub risk_high: String,
    pub male: String,
    pub female: String,
    pub neutral_colour: String,
    pub outline_colour: String,
    pub edge_colour: String,
    pub acute_edge_colour: String,
    pub edge_penwidth: f64,
    pub acute_edge_penwidth: f64,
    pub cluster_edge_penwidth: f64,
    pub cluster_acute_edge_penwidth: f64,
    pub fig_width: f64,
    pub fig_height: f64,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            colour_var: "risk".to_string(),
            risk_low: scheme_colour("risk", "L").unwrap_or(NEUTRAL).to_string(),
            risk_medium: scheme_colour("risk", "M").unwrap_or(NEUTRAL).to_string(),
            risk_high: scheme_colour("risk", "H").unwrap_or(NEUTRAL).to_string(),
            male: scheme_colour("sex", "M").unwrap_or(NEUTRAL).to_string(),
            female: scheme_colour("sex", "F").unwrap_or(NEUTRAL).to_string(),
            neutral_colour: NEUTRAL.to_string(),
            outline_colour: "seashell4".to_string(),
            edge_colour: "#919191".to_string(),
            acute_edge_colour: "#3B3B3B".to_string(),
            edge_penwidth: 20.0,
            acute_edge_penwidth: 30.0,
            cluster_edge_penwidth: 5.0,
            cluster_acute_edge_penwidth: 8.0,
            fig_width: 19.2,
            fig_height: 10.8,
        }
    }
}

#[derive(Debug)]
pub enum StyleError {
    IoError(std::io::Error),
    YamlError(serde_yaml::Error),
}

impl std::error::Error for StyleError {}

impl std::fmt::Display for StyleError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StyleError::IoError(error) => write!(formatter, "IO error: {}", error),
            StyleError::YamlError(error) => write!(formatter, "YAML error: {}", error),
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut output = vec![];
        self.write(&mut output).map_err(|_| std::fmt::Error)?;
        write!(formatter, "{}", String::from_utf8_lossy(&output))
    }
}

impl Style {
    /// Node fill for an individual under the configured grouping. Unknown
    /// individuals take the else-branch colour (high risk, female).
    pub fn fill_colour(&self, individual: Option<&Individual>) -> &str {
        match self.colour_var.as_str() {
            "risk" => match individual.map(|individual| individual.risk_group) {
                Some(RiskGroup::Low) => &self.risk_low,
                Some(RiskGroup::Medium) => &self.risk_medium,
                _ => &self.risk_high,
            },
            "sex" => match individual.map(|individual| individual.sex) {
                Some(Sex::Male) => &self.male,
                _ => &self.female,
            },
            _ => &self.neutral_colour,
        }
    }

    pub fn write(&self, writer: &mut dyn std::io::Write) -> Result<(), StyleError> {
        serde_yaml::to_writer(writer, self).map_err(StyleError::YamlError)
    }

    pub fn read(reader: &mut dyn std::io::Read) -> Result<Style, StyleError> {
        serde_yaml::from_reader(reader).map_err(StyleError::YamlError)
    }

    pub fn write_to_file(&self, filename: &str) -> Result<(), StyleError> {
        let file = fs::File::create(filename).map_err(StyleError::IoError)?;
        let mut writer = std::io::BufWriter::new(file);
        self.write(&mut writer)
    }

    pub fn read_from_file(filename: &str) -> Result<Style, StyleError> {
        let file = fs::File::open(filename).map_err(StyleError::IoError)?;
        let mut reader = std::io::BufReader::new(file);
        Self::read(&mut reader)
    }
}
