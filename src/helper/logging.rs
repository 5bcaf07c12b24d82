use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Result as IoResult, Write};
use std::path::Path;

use chrono::Local;

pub fn log_line(writer: &mut BufWriter<File>, message: &str) -> IoResult<()> {
    let now = Local::now().format("%Y-%m-%d %H:%M:%S");
    writeln!(writer, "[{}] {}", now, message)?;
    writer.flush()?;
    Ok(())
}

/// Append-only run log shared by all stages, mirrored to the console.
pub struct RunLogger {
    writer: BufWriter<File>,
}

impl RunLogger {
    pub fn open(path: &Path) -> IoResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(RunLogger {
            writer: BufWriter::new(file),
        })
    }

    /// Timestamped line in the run log only.
    pub fn line(&mut self, message: &str) -> IoResult<()> {
        log_line(&mut self.writer, message)
    }

    /// Run log plus stdout.
    pub fn note(&mut self, message: &str) -> IoResult<()> {
        println!("{}", message);
        self.line(message)
    }

    /// Run log plus stderr.
    pub fn warn(&mut self, message: &str) -> IoResult<()> {
        eprintln!("{}", message);
        self.line(message)
    }
}
