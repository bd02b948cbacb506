//! Purpose: Select the single destination the SQL script is written to.
//! Exports: `OutputTarget`, `STDOUT_SENTINEL`.
//! Role: Resolves `-o` once and hands emitters an explicit buffered writer.
//! Invariants: Files are opened write + truncate + create, never appended to.
//! Invariants: Opening happens once per run; the process stdout handle is never rebound.
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use tracing::debug;

use crate::core::error::{Error, ErrorKind};

pub const STDOUT_SENTINEL: &str = "-";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    pub fn from_arg(value: &str) -> Self {
        if value == STDOUT_SENTINEL {
            OutputTarget::Stdout
        } else {
            OutputTarget::File(PathBuf::from(value))
        }
    }

    pub fn open(&self) -> Result<Box<dyn Write>, Error> {
        match self {
            OutputTarget::Stdout => {
                debug!("writing sql to stdout");
                Ok(Box::new(BufWriter::new(io::stdout().lock())))
            }
            OutputTarget::File(path) => {
                let file = OpenOptions::new()
                    .write(true)
                    .truncate(true)
                    .create(true)
                    .open(path)
                    .map_err(|err| {
                        Error::new(ErrorKind::OutputOpen)
                            .with_message("failed to open output file")
                            .with_path(path)
                            .with_source(err)
                    })?;
                debug!(path = %path.display(), "writing sql to file");
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}
