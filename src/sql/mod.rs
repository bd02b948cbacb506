//! Purpose: Render a loaded DBF table as a MySQL-flavored SQL script.
//! Exports: `Script`, `write_script`, and the per-statement emitters.
//! Role: Pure formatting over an explicit writer; the caller owns the sink.
//! Invariants: Header, schema, and rows are written in that order, once.
//! Invariants: Schema columns and row values follow the table's declared field order.
mod header;
mod rows;
mod schema;

use std::io::{self, Write};

use time::OffsetDateTime;

use crate::core::table::Table;

pub use header::{GENERATOR, format_timestamp, write_header};
pub use rows::{quote_literal, write_insert};
pub use schema::{column_type, write_create_table};

#[derive(Clone, Debug)]
pub struct Script<'a> {
    pub table_name: &'a str,
    pub generated_at: OffsetDateTime,
}

pub fn write_script<W: Write + ?Sized>(out: &mut W, script: &Script<'_>, table: &Table) -> io::Result<()> {
    write_header(
        out,
        script.table_name,
        table.fields().len(),
        table.record_count(),
        script.generated_at,
    )?;
    write_create_table(out, script.table_name, table.fields())?;
    write_insert(out, script.table_name, table)
}

#[cfg(test)]
mod tests {
    use super::{Script, write_script};
    use crate::core::table::{Field, FieldType, Record, Table};
    use std::io::{self, Write};
    use time::macros::datetime;

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::StorageFull, "no space left"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn customers() -> Table {
        Table::new(
            vec![
                Field::new("NAME", FieldType::Character, 30, 0),
                Field::new("BALANCE", FieldType::Numeric, 10, 2),
            ],
            vec![Record::live(["O'Brien", "100.50"]), Record::live(["Smith", "0"])],
        )
    }

    fn render(table: &Table, name: &str) -> String {
        let script = Script {
            table_name: name,
            generated_at: datetime!(2026-10-19 09:30 UTC),
        };
        let mut out = Vec::new();
        write_script(&mut out, &script, table).expect("write");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn customers_script_matches_expected_output() {
        let expected = "\
-- Generated by dbf2sql on 19 Oct 26 09:30 UTC
-- table: CUSTOMERS
-- 2 fields
-- 2 records

CREATE TABLE `CUSTOMERS` (
\t`NAME` CHAR(30),
\t`BALANCE` DECIMAL(10,2)
);

INSERT INTO `CUSTOMERS` VALUES
\t('O''Brien','100.50'),
\t('Smith','0');

";
        assert_eq!(render(&customers(), "CUSTOMERS"), expected);
    }

    #[test]
    fn every_tuple_has_one_value_per_field() {
        let fields = vec![
            Field::new("A", FieldType::Character, 3, 0),
            Field::new("B", FieldType::Date, 8, 0),
            Field::new("C", FieldType::Logical, 1, 0),
        ];
        let records = (0..5)
            .map(|i| Record::live([format!("a{i}"), "20260101".to_string(), "T".to_string()]))
            .collect();
        let text = render(&Table::new(fields, records), "t");

        let create = text
            .split("CREATE TABLE")
            .nth(1)
            .and_then(|rest| rest.split(");").next())
            .expect("create");
        assert_eq!(create.matches("\n\t`").count(), 3);

        let tuples: Vec<&str> = text.lines().filter(|line| line.starts_with("\t('")).collect();
        assert_eq!(tuples.len(), 5);
        for tuple in tuples {
            assert_eq!(tuple.matches("','").count(), 2);
        }
    }

    #[test]
    fn writer_failure_is_returned() {
        let script = Script {
            table_name: "CUSTOMERS",
            generated_at: datetime!(2026-10-19 09:30 UTC),
        };
        let err = write_script(&mut FullDisk, &script, &customers()).expect_err("disk is full");
        assert_eq!(err.kind(), io::ErrorKind::StorageFull);
    }

    #[test]
    fn zero_record_table_keeps_empty_insert() {
        let table = Table::new(vec![Field::new("ID", FieldType::Numeric, 4, 0)], Vec::new());
        let text = render(&table, "empty");
        assert!(text.contains("-- 0 records\n"));
        assert!(text.ends_with("INSERT INTO `empty` VALUES\n;\n\n"));
    }
}
