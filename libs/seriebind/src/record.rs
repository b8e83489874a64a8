use crate::decode::RowContext;
use crate::error::BindError;
use crate::meta::FieldDescriptor;
use crate::names::to_snake;
use crate::value::Value;

/// The record destination shape: a fixed set of named fields with metadata.
///
/// Implementations come from `#[derive(Record)]`, which builds the descriptor
/// table once per type (cached behind a `OnceLock`) and dispatches field
/// access by table index. The same table drives both directions: decode binds
/// through `bind_field`, encode reads through `field_value`.
pub trait Record: Sized {
    /// Parsed field metadata, in declaration order.
    fn descriptors() -> &'static [FieldDescriptor];

    /// Bind one field (by descriptor index) from a single-entry context.
    fn bind_field(&mut self, index: usize, ctx: &RowContext<'_>) -> Result<(), BindError>;

    /// Read one field (by descriptor index) as a wire value.
    fn field_value(&self, index: usize) -> Value;

    /// Measurement name for the encode path. Defaults to the snake-cased
    /// type name with any module path stripped.
    fn measurement(&self) -> String {
        let name = std::any::type_name::<Self>();
        let name = name.rsplit("::").next().unwrap_or(name);
        to_snake(name)
    }
}
