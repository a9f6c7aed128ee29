//! Configuration of the rendered output.

mod style;

pub use style::{COLOUR_SCHEMES, Style, StyleError};
