//! The `ResultWriter` trait implemented by export backends.

use crate::{OutputResult, RankedTable};

/// Sink for a ranked result table.
pub trait ResultWriter {
    /// Write every row of `table` in rank order.
    fn write_table(&mut self, table: &RankedTable) -> OutputResult<()>;

    /// Flush and close the underlying handle.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
