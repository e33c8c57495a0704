use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::aggregate::FrequencyTable;
use crate::error::{Result, WinFreqError};

/// Write `<window>,<count>` rows in ascending window order, no header.
pub fn write_rows<W: Write>(writer: &mut W, table: &FrequencyTable) -> io::Result<()> {
    for (window, count) in table.sorted_rows() {
        writer.write_all(window)?;
        writeln!(writer, ",{}", count)?;
    }
    Ok(())
}

/// Export the frequency table to a CSV file
pub fn write_table(path: &Path, table: &FrequencyTable) -> Result<()> {
    let to_output_error = |source: io::Error| WinFreqError::Output {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_output_error)?;
    let mut writer = BufWriter::new(file);
    write_rows(&mut writer, table).map_err(to_output_error)?;
    writer.flush().map_err(to_output_error)?;

    tracing::info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}
