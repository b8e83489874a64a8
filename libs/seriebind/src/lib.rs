//! Type-directed binding between time-series query results and typed values.
//!
//! Decode: a [`Series`] (column schema, rows, result-level tags) fans out
//! into any [`Bind`] destination — scalars, records, sequences, string-keyed
//! maps, the dynamic [`Value`] holder, or nullable indirections — guided by
//! per-field annotations and an optional column filter. Encode: a [`Record`]
//! flattens into a [`Point`] (measurement, tags, fields, timestamp) for an
//! external write collaborator. Coercion between loose wire representations
//! is total and best-effort: a bad value degrades to the target's zero value
//! rather than failing the bind.

pub mod coerce;
pub mod decode;
pub mod encode;
pub mod error;
pub mod meta;
pub mod names;
pub mod record;
pub mod series;
pub mod value;

pub use seriebind_derive::Record;

pub use decode::{Bind, RowContext, bind_record, from_series};
pub use encode::to_point;
pub use error::BindError;
pub use meta::{FieldDescriptor, FieldMeta, Role};
pub use record::Record;
pub use series::{Point, Series};
pub use value::{ToValue, Value};
