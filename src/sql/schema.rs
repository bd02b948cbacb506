// `CREATE TABLE` emission and the DBF → SQL column type mapping.
use std::io::{self, Write};

use crate::core::table::{Field, FieldType};

pub fn column_type(field: &Field) -> String {
    match field.field_type {
        FieldType::Numeric => format!("DECIMAL({},{})", field.length, field.decimal_count),
        FieldType::Float => format!("FLOAT({},{})", field.length, field.decimal_count),
        FieldType::Character => format!("CHAR({})", field.length),
        FieldType::Date => "DATE".to_string(),
        FieldType::Logical => "BOOLEAN".to_string(),
    }
}

/// Columns appear in declared field order; identifiers are backtick-quoted verbatim.
pub fn write_create_table<W: Write + ?Sized>(
    out: &mut W,
    table_name: &str,
    fields: &[Field],
) -> io::Result<()> {
    writeln!(out, "CREATE TABLE `{table_name}` (")?;
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            out.write_all(b",\n")?;
        }
        write!(out, "\t`{}` {}", field.name, column_type(field))?;
    }
    out.write_all(b"\n);\n\n")
}
