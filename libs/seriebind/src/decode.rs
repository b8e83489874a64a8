//! Decode engine and result materializer.
//!
//! One `bind` handler per destination shape, dispatched through the `Bind`
//! trait: scalars coerce a single resolved source value, records and maps
//! fan a row out by source name, sequences bind by position, the dynamic
//! holder keeps raw values, and nullable indirections allocate lazily and
//! recurse. Row fan-out (`bind_rows`) is a provided method overridden only
//! by the shapes that receive more than the first row.

use std::collections::{BTreeMap, HashMap};
use std::slice;

use chrono::{DateTime, Utc};

use crate::coerce;
use crate::error::BindError;
use crate::meta::Role;
use crate::record::Record;
use crate::series::{Series, column_index, empty_tags, is_selected};
use crate::value::Value;

// ═══════════════════════════════════════════════════════════════
//  Row context
// ═══════════════════════════════════════════════════════════════

/// One row of a result, as seen by a single bind call: the shared column
/// schema, this row's values, the result-level tags, and the caller's column
/// filter (empty = all columns, schema order).
pub struct RowContext<'a> {
    pub columns: &'a [String],
    pub values: &'a [Value],
    pub tags: &'a HashMap<String, String>,
    pub select: &'a [String],
}

impl<'a> RowContext<'a> {
    /// Single-entry context used when recursing into one matched field.
    pub fn single(column: &'a String, value: &'a Value) -> Self {
        Self {
            columns: slice::from_ref(column),
            values: slice::from_ref(value),
            tags: empty_tags(),
            select: &[],
        }
    }

    /// Resolve the one source value a scalar destination consumes: the head
    /// of the filter looked up column-first-then-tag, falling back to the
    /// sole value passed in.
    pub fn resolve(&self) -> Option<Value> {
        if self.columns.is_empty() {
            return None;
        }
        if let Some(name) = self.select.first() {
            if let Some(i) = column_index(name, self.columns) {
                if let Some(v) = self.values.get(i) {
                    return Some(v.clone());
                }
            } else if let Some(v) = self.tags.get(name.as_str()) {
                return Some(Value::String(v.clone()));
            }
        }
        self.values.first().cloned()
    }

    fn for_row<'b>(&'b self, row: &'b [Value]) -> RowContext<'b>
    where
        'a: 'b,
    {
        RowContext {
            columns: self.columns,
            values: row,
            tags: self.tags,
            select: self.select,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Bind — one handler per destination shape
// ═══════════════════════════════════════════════════════════════

/// A destination value the engine can populate in place.
pub trait Bind {
    /// Bind this destination from one row context.
    fn bind(&mut self, ctx: &RowContext<'_>) -> Result<(), BindError>;

    /// Fan a whole result into this destination. Singular shapes bind only
    /// the first row; extra rows are silently ignored.
    fn bind_rows(
        &mut self,
        columns: &[String],
        rows: &[Vec<Value>],
        tags: &HashMap<String, String>,
        select: &[String],
    ) -> Result<(), BindError> {
        match rows.first() {
            Some(row) => self.bind(&RowContext { columns, values: row.as_slice(), tags, select }),
            None => Ok(()),
        }
    }
}

macro_rules! bind_via {
    ($coercion:path => $($t:ty),*) => {$(
        impl Bind for $t {
            fn bind(&mut self, ctx: &RowContext<'_>) -> Result<(), BindError> {
                if let Some(v) = ctx.resolve() {
                    *self = $coercion(&v) as $t;
                }
                Ok(())
            }
        }
    )*};
}

bind_via!(coerce::to_i64 => i8, i16, i32, i64, isize);
bind_via!(coerce::to_i64 => u8, u16, u32, u64, usize);
bind_via!(coerce::to_f64 => f32, f64);

impl Bind for String {
    fn bind(&mut self, ctx: &RowContext<'_>) -> Result<(), BindError> {
        if let Some(v) = ctx.resolve() {
            *self = coerce::to_string(&v);
        }
        Ok(())
    }
}

impl Bind for DateTime<Utc> {
    fn bind(&mut self, ctx: &RowContext<'_>) -> Result<(), BindError> {
        if let Some(v) = ctx.resolve() {
            *self = coerce::to_timestamp(&v);
        }
        Ok(())
    }
}

/// Nullable indirection: allocate on first write, then recurse.
impl<T: Bind + Default> Bind for Option<T> {
    fn bind(&mut self, ctx: &RowContext<'_>) -> Result<(), BindError> {
        self.get_or_insert_with(T::default).bind(ctx)
    }

    fn bind_rows(
        &mut self,
        columns: &[String],
        rows: &[Vec<Value>],
        tags: &HashMap<String, String>,
        select: &[String],
    ) -> Result<(), BindError> {
        self.get_or_insert_with(T::default)
            .bind_rows(columns, rows, tags, select)
    }
}

impl<T: Bind> Bind for Box<T> {
    fn bind(&mut self, ctx: &RowContext<'_>) -> Result<(), BindError> {
        (**self).bind(ctx)
    }

    fn bind_rows(
        &mut self,
        columns: &[String],
        rows: &[Vec<Value>],
        tags: &HashMap<String, String>,
        select: &[String],
    ) -> Result<(), BindError> {
        (**self).bind_rows(columns, rows, tags, select)
    }
}

/// Ordered sequence. Within one row: a filter fixes length and order, each
/// position resolving by name (column first, else tag, else skipped); with
/// no filter, position *i* binds column *i* and tags are ignored. Across
/// rows: one slot per row.
impl<T: Bind + Default> Bind for Vec<T> {
    fn bind(&mut self, ctx: &RowContext<'_>) -> Result<(), BindError> {
        if !ctx.select.is_empty() {
            if self.len() < ctx.select.len() {
                self.resize_with(ctx.select.len(), T::default);
            }
            for (i, name) in ctx.select.iter().enumerate() {
                let tag_value;
                let value = match column_index(name, ctx.columns) {
                    Some(idx) => match ctx.values.get(idx) {
                        Some(v) => v,
                        None => continue,
                    },
                    None => match ctx.tags.get(name.as_str()) {
                        Some(v) => {
                            tag_value = Value::String(v.clone());
                            &tag_value
                        }
                        None => {
                            tracing::trace!(column = %name, "filter position matches neither column nor tag, skipping");
                            continue;
                        }
                    },
                };
                let sub = RowContext {
                    columns: slice::from_ref(name),
                    values: slice::from_ref(value),
                    tags: empty_tags(),
                    select: slice::from_ref(name),
                };
                self[i].bind(&sub)?;
            }
        } else {
            if self.len() < ctx.columns.len() {
                self.resize_with(ctx.columns.len(), T::default);
            }
            for (i, (column, value)) in ctx.columns.iter().zip(ctx.values).enumerate() {
                self[i].bind(&RowContext::single(column, value))?;
            }
        }
        Ok(())
    }

    fn bind_rows(
        &mut self,
        columns: &[String],
        rows: &[Vec<Value>],
        tags: &HashMap<String, String>,
        select: &[String],
    ) -> Result<(), BindError> {
        if self.len() < rows.len() {
            self.resize_with(rows.len(), T::default);
        }
        let ctx = RowContext { columns, values: &[], tags, select };
        for (slot, row) in self.iter_mut().zip(rows) {
            slot.bind(&ctx.for_row(row))?;
        }
        Ok(())
    }
}

fn bind_map_entries<T, F>(ctx: &RowContext<'_>, mut insert: F) -> Result<(), BindError>
where
    T: Bind + Default,
    F: FnMut(String, T),
{
    if ctx.columns.len() != ctx.values.len() {
        return Err(BindError::RowArityMismatch);
    }
    for (column, value) in ctx.columns.iter().zip(ctx.values) {
        if !is_selected(column, ctx.select) {
            continue;
        }
        let mut entry = T::default();
        entry.bind(&RowContext::single(column, value))?;
        insert(column.clone(), entry);
    }
    for (name, v) in ctx.tags {
        if !is_selected(name, ctx.select) {
            continue;
        }
        let value = Value::String(v.clone());
        let mut entry = T::default();
        entry.bind(&RowContext::single(name, &value))?;
        insert(name.clone(), entry);
    }
    Ok(())
}

macro_rules! bind_map {
    ($($map:ident),*) => {$(
        /// String-keyed mapping: each selected column/tag decodes a fresh
        /// element under the source name.
        impl<T: Bind + Default> Bind for $map<String, T> {
            fn bind(&mut self, ctx: &RowContext<'_>) -> Result<(), BindError> {
                bind_map_entries(ctx, |key, entry| {
                    self.insert(key, entry);
                })
            }
        }
    )*};
}

bind_map!(HashMap, BTreeMap);

/// Dynamically-typed holder. A single value (or single-name filter) is
/// assigned raw, without coercion; a wider context materializes as a
/// string-keyed map. Across rows: untouched for an empty result, direct for
/// one row, an array of per-row values otherwise.
impl Bind for Value {
    fn bind(&mut self, ctx: &RowContext<'_>) -> Result<(), BindError> {
        if ctx.values.len() == 1 || ctx.select.len() == 1 {
            if let Some(v) = ctx.resolve() {
                *self = v;
            }
            Ok(())
        } else {
            let mut map = BTreeMap::new();
            bind_map_entries::<Value, _>(ctx, |key, entry| {
                map.insert(key, entry);
            })?;
            *self = Value::Map(map);
            Ok(())
        }
    }

    fn bind_rows(
        &mut self,
        columns: &[String],
        rows: &[Vec<Value>],
        tags: &HashMap<String, String>,
        select: &[String],
    ) -> Result<(), BindError> {
        let ctx = RowContext { columns, values: &[], tags, select };
        match rows {
            [] => Ok(()),
            [row] => self.bind(&ctx.for_row(row)),
            _ => {
                let mut out = Vec::with_capacity(rows.len());
                for row in rows {
                    let mut item = Value::Null;
                    item.bind(&ctx.for_row(row))?;
                    out.push(item);
                }
                *self = Value::Array(out);
                Ok(())
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Record binding
// ═══════════════════════════════════════════════════════════════

/// Bind a record from one row: every selected column, then every selected
/// tag, is matched against the descriptor table — explicit source name
/// first, then the snake-case convention — and the matched field is bound
/// from a single-entry context. Ignored fields never match; on collisions
/// the last write wins, columns before tags.
pub fn bind_record<R: Record>(record: &mut R, ctx: &RowContext<'_>) -> Result<(), BindError> {
    if ctx.columns.len() != ctx.values.len() {
        return Err(BindError::RowArityMismatch);
    }

    let descriptors = R::descriptors();
    let find = |source: &str| -> Option<usize> {
        descriptors
            .iter()
            .position(|d| d.meta.role != Role::Ignore && d.meta.source.as_deref() == Some(source))
            .or_else(|| {
                descriptors.iter().position(|d| {
                    d.meta.role != Role::Ignore && d.meta.source.is_none() && d.column == source
                })
            })
    };

    for (column, value) in ctx.columns.iter().zip(ctx.values) {
        if !is_selected(column, ctx.select) {
            continue;
        }
        if let Some(index) = find(column) {
            record.bind_field(index, &RowContext::single(column, value))?;
        }
    }
    for (name, v) in ctx.tags {
        if !is_selected(name, ctx.select) {
            continue;
        }
        if let Some(index) = find(name) {
            let value = Value::String(v.clone());
            record.bind_field(index, &RowContext::single(name, &value))?;
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
//  Result materializer
// ═══════════════════════════════════════════════════════════════

/// Bind a whole query result into `dst`. A single-name filter must exist
/// among the result's columns or tags; otherwise the destination is left
/// untouched and `ColumnNotFound` is returned. Row fan-out is decided by
/// the destination shape (see `Bind::bind_rows`).
pub fn from_series<T: Bind>(dst: &mut T, series: &Series, select: &[String]) -> Result<(), BindError> {
    if let [name] = select {
        if !series.tags.contains_key(name.as_str()) && column_index(name, &series.columns).is_none() {
            return Err(BindError::ColumnNotFound(name.clone()));
        }
    }

    tracing::trace!(
        series = %series.name,
        rows = series.values.len(),
        columns = series.columns.len(),
        "binding series"
    );
    dst.bind_rows(&series.columns, &series.values, &series.tags, select)
}
