//! Encode engine: flatten a record into a write point.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::coerce;
use crate::meta::Role;
use crate::record::Record;
use crate::series::Point;

/// Flatten `record` into a `Point`. Ignored fields are skipped; a field with
/// the `time` role, or literally named `time`, supplies the timestamp and
/// joins neither set; tag-marked fields are string-coerced into the tag set;
/// everything else lands raw in the field set. The timestamp defaults to the
/// wall clock at the point of call.
///
/// Never errors. `None` is reserved for inputs that expose no record shape,
/// which a `Record` bound rules out statically — callers still check.
pub fn to_point<R: Record>(record: &R) -> Option<Point> {
    let descriptors = R::descriptors();
    let mut tags = BTreeMap::new();
    let mut fields = BTreeMap::new();
    let mut timestamp = Utc::now();

    for (index, descriptor) in descriptors.iter().enumerate() {
        match descriptor.meta.role {
            Role::Ignore => continue,
            Role::Time => {
                timestamp = coerce::to_timestamp(&record.field_value(index));
                continue;
            }
            _ => {}
        }
        if descriptor.field == "time" {
            timestamp = coerce::to_timestamp(&record.field_value(index));
            continue;
        }

        let value = record.field_value(index);
        if descriptor.meta.role == Role::Tag {
            tags.insert(descriptor.column.clone(), coerce::to_string(&value));
        } else {
            fields.insert(descriptor.column.clone(), value);
        }
    }

    let measurement = record.measurement();
    tracing::trace!(
        measurement = %measurement,
        tags = tags.len(),
        fields = fields.len(),
        "encoded point"
    );
    Some(Point { measurement, tags, fields, timestamp })
}
