//! CSV export backend.
//!
//! One header row `node,weight,rank,x,y`, then one row per candidate in rank
//! order.  The delimiter is configurable; the reference spreadsheets use `;`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{Writer, WriterBuilder};
use tracing::debug;

use crate::writer::ResultWriter;
use crate::{OutputResult, RankedTable};

const HEADER: [&str; 5] = ["node", "weight", "rank", "x", "y"];

/// Writes a [`RankedTable`] as delimited text.
pub struct CsvWriter<W: Write = File> {
    inner:    Writer<W>,
    finished: bool,
}

impl CsvWriter<File> {
    /// Create (or truncate) `path` with a comma delimiter and write the header.
    pub fn new(path: &Path) -> OutputResult<Self> {
        Self::with_delimiter(path, b',')
    }

    pub fn with_delimiter(path: &Path, delimiter: u8) -> OutputResult<Self> {
        debug!(path = %path.display(), "opening result CSV");
        Self::from_writer(File::create(path)?, delimiter)
    }
}

impl<W: Write> CsvWriter<W> {
    /// Wrap any `io::Write` sink and write the header.
    pub fn from_writer(sink: W, delimiter: u8) -> OutputResult<Self> {
        let mut inner = WriterBuilder::new().delimiter(delimiter).from_writer(sink);
        inner.write_record(HEADER)?;
        Ok(Self { inner, finished: false })
    }

    /// Flush and return the underlying sink.
    pub fn into_inner(mut self) -> OutputResult<W> {
        self.finish()?;
        self.inner
            .into_inner()
            .map_err(|e| crate::OutputError::Io(e.into_error()))
    }
}

impl<W: Write> ResultWriter for CsvWriter<W> {
    fn write_table(&mut self, table: &RankedTable) -> OutputResult<()> {
        for row in table.rows() {
            self.inner.write_record(&[
                row.node.0.to_string(),
                row.weight.to_string(),
                row.rank.to_string(),
                row.x.to_string(),
                row.y.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.inner.flush()?;
        Ok(())
    }
}
