//! Purpose: Run one DBF → SQL conversion end to end.
//! Exports: `Conversion`, `convert`.
//! Role: Glue between the loader, the output sink, and the SQL emitters.
//! Invariants: The table is fully loaded before the output target is opened.
//! Invariants: Any failure is terminal; nothing is retried.
use std::io::Write;
use std::path::PathBuf;

use time::OffsetDateTime;
use tracing::debug;

use crate::core::dbf;
use crate::core::error::{Error, ErrorKind};
use crate::output::OutputTarget;
use crate::sql::{self, Script};

#[derive(Clone, Debug)]
pub struct Conversion {
    pub input: PathBuf,
    pub output: OutputTarget,
    pub table_name: String,
    pub encoding: String,
    pub skip_deleted: bool,
}

pub fn convert(conversion: &Conversion, generated_at: OffsetDateTime) -> Result<(), Error> {
    let mut table = dbf::load(&conversion.input, &conversion.encoding)?;
    if conversion.skip_deleted {
        let dropped = table.retain_live();
        debug!(dropped, "skipped deleted records");
    }

    let mut out = conversion.output.open()?;
    let script = Script {
        table_name: &conversion.table_name,
        generated_at,
    };
    sql::write_script(&mut out, &script, &table)
        .and_then(|()| out.flush())
        .map_err(|err| write_error(&conversion.output, err))
}

fn write_error(target: &OutputTarget, err: std::io::Error) -> Error {
    let error = Error::new(ErrorKind::Write)
        .with_message("failed to write sql output")
        .with_source(err);
    match target {
        OutputTarget::Stdout => error,
        OutputTarget::File(path) => error.with_path(path),
    }
}
