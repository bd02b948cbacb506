// Leading `-- ` comment block describing the generated script.
use std::io::{self, Write};

use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

pub const GENERATOR: &str = "dbf2sql";

/// RFC-822 style layout, rendered in UTC.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let layout =
        format_description!("[day] [month repr:short] [year repr:last_two] [hour]:[minute] UTC");
    at.to_offset(UtcOffset::UTC)
        .format(layout)
        .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

pub fn write_header<W: Write + ?Sized>(
    out: &mut W,
    table_name: &str,
    field_count: usize,
    record_count: usize,
    generated_at: OffsetDateTime,
) -> io::Result<()> {
    write!(
        out,
        "-- Generated by {GENERATOR} on {}\n\
         -- table: {table_name}\n\
         -- {field_count} fields\n\
         -- {record_count} records\n\n",
        format_timestamp(generated_at)
    )
}
