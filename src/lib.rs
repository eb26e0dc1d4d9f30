//! A universal schema engine: an algebraic schema intermediate
//! representation, a bidirectional concrete syntax, a value validator, and
//! friction-tracked translators to and from foreign schema dialects
//! (JSON Schema, XSD, Avro, Protocol Buffers).
//!
//! The pipeline is: [`parser::parse_schema`] turns source text into a
//! [`schema::ParsedSchema`]; [`resolver::resolve`] follows imports and
//! substitutes references to produce a [`schema::ResolvedSchema`];
//! [`validator::validate`] checks a [`value::Value`] against a [`Schema`];
//! [`printer::print_schema`] and [`pretty::print_document`] go back the
//! other way. The `translate` module carries schemas across dialect
//! boundaries, logging every bit of precision lost or invented along the
//! way into a [`friction::FrictionReport`].

pub mod error;
pub mod friction;
pub mod lexer;
pub mod number;
pub mod parser;
pub mod pretty;
pub mod printer;
pub mod printer_support;
pub mod resolver;
pub mod schema;
pub mod translate;
pub mod utils;
pub mod validator;
pub mod value;

pub use error::{Result, SchemaError};
pub use friction::{FrictionEntry, FrictionKind, FrictionReport};
pub use parser::{parse_schema, parse_schema_at};
pub use pretty::{print as print_schema_pretty, print_document, PrinterConfig};
pub use printer::{print_item_standalone, print_schema};
pub use resolver::{resolve, resolve_imports, resolve_references, FsSourceLoader, MapSourceLoader, SourceLoader};
pub use schema::{DefinitionMap, ObjectLabel, ParsedSchema, ResolvedSchema, Schema};
pub use validator::{summarize, validate, ValidationError, ValidationResult};
pub use value::Value;
