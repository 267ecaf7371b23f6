//! Seasonal decomposition.
//!
//! [`seasonal_decompose`] splits a series into trend, seasonal and residual
//! components using a centered moving average.

mod decompose;

pub use decompose::{
    seasonal_decompose, DecomposeConfig, DecomposeModel, Decomposition, ExtrapolateTrend,
};
