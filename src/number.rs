//! Arbitrary-precision decimal helpers shared by the `Numeric` schema variant
//! and the `Value::Number` variant.
//!
//! `rust_decimal::Decimal` (96-bit fixed point) stands in for a true
//! arbitrary-precision decimal here, the same pragmatic choice `vld` and
//! `serde_avro_fast` make elsewhere in the retrieval pack: it covers every
//! value JSON/YAML/CSV decoders realistically produce, implements `Ord`
//! directly (unlike `f64`), and round-trips through `serde_json` without the
//! float-vs-int ambiguity `regorus::Number` has to paper over with a custom
//! `Serialize` impl.

use rust_decimal::Decimal;

use crate::error::SchemaError;

/// Parse a decimal literal as it appears in schema source or a decoded value.
pub fn parse_decimal(text: &str) -> Result<Decimal, SchemaError> {
    text.parse::<Decimal>().map_err(|e| SchemaError::InvalidLiteral {
        kind: "decimal".to_string(),
        text: text.to_string(),
        message: e.to_string(),
    })
}

pub fn is_whole(value: &Decimal) -> bool {
    value.fract().is_zero()
}
