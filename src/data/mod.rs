//! Data loading: local delimited files and the NOAA CO2 table.

mod co2;
mod delimited;

pub use co2::{
    fetch_co2_table, parse_co2_table, read_co2_table, Co2Config, Co2Record, Co2Table,
    CO2_COLUMNS, DEFAULT_CO2_URL,
};
pub use delimited::{parse_delimited, read_delimited};
