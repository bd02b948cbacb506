// DBF (dBase III family) table loader: header, field descriptors, fixed-width records.
use std::fs;
use std::path::Path;

use encoding::label::encoding_from_whatwg_label;
use encoding::{DecoderTrap, Encoding, EncodingRef};
use tracing::debug;

use crate::core::error::{Error, ErrorKind};
use crate::core::table::{Field, FieldType, Record, Table};

pub const HEADER_LEN: usize = 32;
pub const FIELD_DESCRIPTOR_LEN: usize = 32;
pub const FIELD_TERMINATOR: u8 = 0x0D;
pub const DELETED_FLAG: u8 = b'*';
pub const DEFAULT_ENCODING: &str = "UTF8";

const FIELD_NAME_LEN: usize = 11;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DbfHeader {
    pub version: u8,
    pub record_count: u32,
    pub header_len: u16,
    pub record_len: u16,
}

impl DbfHeader {
    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        if buf.len() < HEADER_LEN {
            return Err(Error::new(ErrorKind::Load).with_message("file too small for a DBF header"));
        }
        Ok(Self {
            version: buf[0],
            record_count: read_u32(buf, 4),
            header_len: read_u16(buf, 8),
            record_len: read_u16(buf, 10),
        })
    }
}

/// Resolves a WHATWG encoding label (case-insensitive, e.g. `UTF8`, `latin1`).
pub fn resolve_encoding(name: &str) -> Result<EncodingRef, Error> {
    encoding_from_whatwg_label(name).ok_or_else(|| {
        Error::new(ErrorKind::Load).with_message(format!("unsupported encoding '{name}'"))
    })
}

/// Reads the whole file and decodes it into a [`Table`].
pub fn load(path: &Path, encoding_name: &str) -> Result<Table, Error> {
    let encoding = resolve_encoding(encoding_name)?;
    let data = fs::read(path).map_err(|err| {
        Error::new(ErrorKind::Load)
            .with_message("failed to read DBF file")
            .with_path(path)
            .with_source(err)
    })?;
    let table = parse(&data, encoding).map_err(|err| err.with_path(path))?;
    debug!(
        path = %path.display(),
        encoding = encoding.name(),
        fields = table.fields().len(),
        records = table.record_count(),
        "loaded dbf table"
    );
    Ok(table)
}

pub fn parse(data: &[u8], encoding: EncodingRef) -> Result<Table, Error> {
    let header = DbfHeader::decode(data)?;
    debug!(
        version = header.version,
        records = header.record_count,
        header_len = header.header_len,
        record_len = header.record_len,
        "decoded dbf header"
    );
    let header_len = header.header_len as usize;
    let record_len = header.record_len as usize;
    if header_len > data.len() {
        return Err(Error::new(ErrorKind::Load).with_message("header length exceeds file size"));
    }

    let fields = parse_fields(data, header_len, encoding)?;

    let data_len: usize = fields.iter().map(|field| field.length as usize).sum();
    if data_len + 1 > record_len {
        return Err(Error::new(ErrorKind::Load).with_message(format!(
            "field lengths ({data_len}) exceed record length ({record_len})"
        )));
    }

    let record_count = header.record_count as usize;
    let body_end = record_count
        .checked_mul(record_len)
        .and_then(|body| body.checked_add(header_len))
        .ok_or_else(|| Error::new(ErrorKind::Load).with_message("record count overflows"))?;
    if body_end > data.len() {
        return Err(Error::new(ErrorKind::Load).with_message(format!(
            "file truncated: header declares {record_count} records"
        )));
    }

    let mut records = Vec::with_capacity(record_count);
    for index in 0..record_count {
        let start = header_len + index * record_len;
        let raw = &data[start..start + record_len];
        records.push(parse_record(raw, &fields, encoding));
    }

    Ok(Table::new(fields, records))
}

fn parse_fields(data: &[u8], header_len: usize, encoding: EncodingRef) -> Result<Vec<Field>, Error> {
    let mut fields = Vec::new();
    let mut offset = HEADER_LEN;
    while offset + FIELD_DESCRIPTOR_LEN <= header_len && data[offset] != FIELD_TERMINATOR {
        let raw = &data[offset..offset + FIELD_DESCRIPTOR_LEN];
        fields.push(parse_field(raw, encoding)?);
        offset += FIELD_DESCRIPTOR_LEN;
    }
    if offset >= header_len || data[offset] != FIELD_TERMINATOR {
        return Err(
            Error::new(ErrorKind::Load).with_message("field descriptor block is not terminated")
        );
    }
    Ok(fields)
}

fn parse_field(raw: &[u8], encoding: EncodingRef) -> Result<Field, Error> {
    let name_bytes = &raw[..FIELD_NAME_LEN];
    let name_end = name_bytes
        .iter()
        .position(|byte| *byte == 0)
        .unwrap_or(FIELD_NAME_LEN);
    let name = decode_text(&name_bytes[..name_end], encoding);

    let code = raw[11];
    let field_type = FieldType::from_code(code).ok_or_else(|| {
        Error::new(ErrorKind::Load)
            .with_message(format!(
                "unsupported field type '{}'",
                char::from(code).escape_default()
            ))
            .with_field(name.clone())
    })?;
    let length = raw[16];
    if length == 0 {
        return Err(Error::new(ErrorKind::Load)
            .with_message("field length is zero")
            .with_field(name));
    }

    Ok(Field {
        name,
        field_type,
        length,
        decimal_count: raw[17],
    })
}

fn parse_record(raw: &[u8], fields: &[Field], encoding: EncodingRef) -> Record {
    let mut cells = Vec::with_capacity(fields.len());
    let mut offset = 1;
    for field in fields {
        let end = offset + field.length as usize;
        cells.push(decode_text(&raw[offset..end], encoding));
        offset = end;
    }
    Record {
        deleted: raw[0] == DELETED_FLAG,
        cells,
    }
}

fn decode_text(bytes: &[u8], encoding: EncodingRef) -> String {
    // DecoderTrap::Replace does not return Err.
    let text = encoding
        .decode(bytes, DecoderTrap::Replace)
        .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned());
    text.trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .to_string()
}

fn read_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut out = [0u8; 4];
    out.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(out)
}
