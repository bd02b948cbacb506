// `INSERT ... VALUES` emission. Every cell becomes a quoted string literal.
use std::io::{self, Write};

use crate::core::table::Table;

/// Doubles embedded single quotes and wraps the text in single quotes.
pub fn quote_literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    quoted.push_str(&value.replace('\'', "''"));
    quoted.push('\'');
    quoted
}

/// A table without records still yields the statement, with no tuples.
pub fn write_insert<W: Write + ?Sized>(
    out: &mut W,
    table_name: &str,
    table: &Table,
) -> io::Result<()> {
    writeln!(out, "INSERT INTO `{table_name}` VALUES")?;
    for (index, record) in table.records().iter().enumerate() {
        if index > 0 {
            out.write_all(b",\n")?;
        }
        let values: Vec<String> = record.cells.iter().map(|cell| quote_literal(cell)).collect();
        write!(out, "\t({})", values.join(","))?;
    }
    out.write_all(b";\n\n")
}

#[cfg(test)]
mod tests {
    use super::{quote_literal, write_insert};
    use crate::core::table::{Field, FieldType, Record, Table};

    fn unquote(literal: &str) -> String {
        let inner = literal
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
            .expect("quoted");
        inner.replace("''", "'")
    }

    #[test]
    fn quote_doubles_single_quotes() {
        assert_eq!(quote_literal("O'Brien"), "'O''Brien'");
        assert_eq!(quote_literal(""), "''");
        assert_eq!(quote_literal("''"), "''''''");
    }

    #[test]
    fn quote_is_reversible() {
        for value in ["plain", "it's", "'lead", "trail'", "a''b", "'", "ñandú 'x'"] {
            let literal = quote_literal(value);
            let quotes_in = value.matches('\'').count();
            let quotes_out = literal.matches('\'').count() - 2;
            assert_eq!(quotes_out, quotes_in * 2, "value: {value}");
            assert_eq!(unquote(&literal), value);
        }
    }

    #[test]
    fn insert_emits_one_tuple_per_record() {
        let table = Table::new(
            vec![
                Field::new("NAME", FieldType::Character, 30, 0),
                Field::new("BALANCE", FieldType::Numeric, 10, 2),
            ],
            vec![Record::live(["O'Brien", "100.50"]), Record::live(["Smith", "0"])],
        );
        let mut out = Vec::new();
        write_insert(&mut out, "CUSTOMERS", &table).expect("write");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "INSERT INTO `CUSTOMERS` VALUES\n\t('O''Brien','100.50'),\n\t('Smith','0');\n\n"
        );
    }

    #[test]
    fn insert_without_records_has_no_tuples() {
        let table = Table::new(vec![Field::new("ID", FieldType::Numeric, 4, 0)], Vec::new());
        let mut out = Vec::new();
        write_insert(&mut out, "t", &table).expect("write");
        assert_eq!(String::from_utf8(out).expect("utf8"), "INSERT INTO `t` VALUES\n;\n\n");
    }
}
