// In-memory table model shared by the loader and the SQL emitters.

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldType {
    Numeric,
    Float,
    Character,
    Date,
    Logical,
}

impl FieldType {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            b'N' => Some(FieldType::Numeric),
            b'F' => Some(FieldType::Float),
            b'C' => Some(FieldType::Character),
            b'D' => Some(FieldType::Date),
            b'L' => Some(FieldType::Logical),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    pub length: u8,
    pub decimal_count: u8,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType, length: u8, decimal_count: u8) -> Self {
        Self {
            name: name.into(),
            field_type,
            length,
            decimal_count,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    pub deleted: bool,
    pub cells: Vec<String>,
}

impl Record {
    pub fn live<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            deleted: false,
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }
}

/// A fully loaded table. Every record carries exactly one cell per field,
/// in the declared field order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Table {
    fields: Vec<Field>,
    records: Vec<Record>,
}

impl Table {
    pub fn new(fields: Vec<Field>, records: Vec<Record>) -> Self {
        debug_assert!(records.iter().all(|r| r.cells.len() == fields.len()));
        Self { fields, records }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn cell(&self, record: usize, field: usize) -> Option<&str> {
        self.records
            .get(record)
            .and_then(|r| r.cells.get(field))
            .map(String::as_str)
    }

    /// Drops records carrying the deletion flag; returns how many were removed.
    pub fn retain_live(&mut self) -> usize {
        let before = self.records.len();
        self.records.retain(|record| !record.deleted);
        before - self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{Field, FieldType, Record, Table};

    #[test]
    fn type_codes_cover_every_variant() {
        let cases = [
            (b'N', FieldType::Numeric),
            (b'F', FieldType::Float),
            (b'C', FieldType::Character),
            (b'D', FieldType::Date),
            (b'L', FieldType::Logical),
        ];
        for (code, field_type) in cases {
            assert_eq!(FieldType::from_code(code), Some(field_type));
        }
        assert_eq!(FieldType::from_code(b'M'), None);
    }

    #[test]
    fn retain_live_drops_deleted_records() {
        let mut table = Table::new(
            vec![Field::new("NAME", FieldType::Character, 10, 0)],
            vec![
                Record::live(["a"]),
                Record {
                    deleted: true,
                    cells: vec!["b".to_string()],
                },
                Record::live(["c"]),
            ],
        );

        assert_eq!(table.retain_live(), 1);
        assert_eq!(table.record_count(), 2);
        assert_eq!(table.cell(1, 0), Some("c"));
        assert_eq!(table.cell(2, 0), None);
    }
}
