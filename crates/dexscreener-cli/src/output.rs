use std::io::Write;

use serde_json::Value;

use crate::error::CliError;

/// Writes `data` to stdout as a single JSON document.
pub fn render(data: &Value, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    write_json(&mut stdout, data, pretty)
}

fn write_json(writer: &mut impl Write, data: &Value, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, data)?;
    } else {
        serde_json::to_writer(&mut *writer, data)?;
    }
    writeln!(writer)?;
    Ok(())
}
