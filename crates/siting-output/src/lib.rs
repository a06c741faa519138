//! `siting-output`: result assembly and export for the facility-siting
//! pipeline.
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ranking`] | `RankedTable`: candidates sorted by opening weight       |
//! | [`row`]     | `RankedSite`: one exported row                           |
//! | [`writer`]  | `ResultWriter` trait                                      |
//! | [`csv`]     | `CsvWriter`: `node,weight,rank,x,y`                      |
//! | [`persist`] | JSON snapshots of the distance matrix and population      |
//!
//! # Usage
//!
//! ```rust,ignore
//! use siting_output::{CsvWriter, RankedTable, ResultWriter};
//!
//! let table = RankedTable::assemble(&result, &network, config.facility_count)?;
//! let mut w = CsvWriter::with_delimiter(Path::new("sites.csv"), b';')?;
//! w.write_table(&table)?;
//! w.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod persist;
pub mod ranking;
pub mod row;
pub mod writer;


pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use ranking::RankedTable;
pub use row::RankedSite;
pub use writer::ResultWriter;
