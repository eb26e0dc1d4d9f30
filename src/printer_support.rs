//! Rendering helpers shared between the minimal grammar printer
//! (`printer.rs`) and the configurable pretty-printer (`pretty.rs`), so the
//! two never drift on how a bound, an encoding name or a time format is
//! spelled in source text.

use rust_decimal::Decimal;

use crate::schema::{BinaryEncoding, BoundOp, BoundedRange, TimeConstraint, TimeFormat, Uniqueness};

fn lead_op_str(op: BoundOp, is_min: bool) -> &'static str {
    match (op, is_min) {
        (BoundOp::MinInclusive, true) | (BoundOp::MaxInclusive, false) => "<=",
        (BoundOp::MinExclusive, true) | (BoundOp::MaxExclusive, false) => "<",
        _ => "<=",
    }
}

fn keyword_op_str(op: BoundOp) -> &'static str {
    match op {
        BoundOp::Exact => "==",
        BoundOp::MinInclusive => ">=",
        BoundOp::MinExclusive => ">",
        BoundOp::MaxInclusive => "<=",
        BoundOp::MaxExclusive => "<",
    }
}

pub fn print_int_range(range: &BoundedRange<i64>, keyword: &str) -> String {
    match (&range.min, &range.max) {
        (Some(min), Some(max)) => format!(
            "{} {} {keyword} {} {}",
            min.value,
            lead_op_str(min.op, true),
            lead_op_str(max.op, false),
            max.value
        ),
        (Some(min), None) => format!("{keyword} {} {}", keyword_op_str(min.op), min.value),
        (None, Some(max)) => format!("{keyword} {} {}", keyword_op_str(max.op), max.value),
        (None, None) => keyword.to_string(),
    }
}

pub fn print_decimal_range(range: &BoundedRange<Decimal>) -> String {
    match (&range.min, &range.max) {
        (Some(min), Some(max)) => format!(
            "{} {} value {} {}",
            min.value,
            lead_op_str(min.op, true),
            lead_op_str(max.op, false),
            max.value
        ),
        (Some(min), None) => format!("value {} {}", keyword_op_str(min.op), min.value),
        (None, Some(max)) => format!("value {} {}", keyword_op_str(max.op), max.value),
        (None, None) => "value".to_string(),
    }
}

pub fn print_byte_range(range: &BoundedRange<u64>) -> String {
    match (&range.min, &range.max) {
        (Some(min), Some(max)) => format!(
            "{} bytes {} size {} {} bytes",
            min.value,
            lead_op_str(min.op, true),
            lead_op_str(max.op, false),
            max.value
        ),
        (Some(min), None) => format!("size {} {} bytes", keyword_op_str(min.op), min.value),
        (None, Some(max)) => format!("size {} {} bytes", keyword_op_str(max.op), max.value),
        (None, None) => "size".to_string(),
    }
}

pub fn encoding_name(e: BinaryEncoding) -> &'static str {
    match e {
        BinaryEncoding::Hex => "hex",
        BinaryEncoding::Base64 => "base64",
        BinaryEncoding::Base32 => "base32",
        BinaryEncoding::Base58 => "base58",
        BinaryEncoding::Ascii85 => "ascii85",
    }
}

pub fn print_time_constraint(tc: &TimeConstraint) -> String {
    match tc {
        TimeConstraint::Named(f) => match f {
            TimeFormat::Iso8601 => "iso8601".to_string(),
            TimeFormat::Iso8601DateTime => "iso8601-datetime".to_string(),
            TimeFormat::Iso8601Date => "iso8601-date".to_string(),
            TimeFormat::Iso8601Time => "iso8601-time".to_string(),
            TimeFormat::Rfc3339 => "rfc3339".to_string(),
        },
        TimeConstraint::Pattern(p) => format!("{:?}", p),
    }
}

pub fn print_uniqueness(u: &Uniqueness) -> String {
    match u {
        Uniqueness::Simple => "unique".to_string(),
        Uniqueness::ByFields(fields) if fields.len() == 1 => format!("unique = {}", fields[0]),
        Uniqueness::ByFields(fields) => format!("unique = ({})", fields.join(", ")),
    }
}
