//! Terminal renderings of samples, correlograms and series.

pub mod terminal;

pub use terminal::{correlogram, histogram, sparkline};
