/// Decode/materialize error. Coercion never fails — only structural problems
/// surface here, and they abort the current call without rolling back rows
/// that were already populated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// Destination shape outside the supported set.
    #[error("unsupported destination shape: {0}")]
    ShapeMismatch(&'static str),

    /// A row's value count disagrees with the column count.
    #[error("columns size not equal values size")]
    RowArityMismatch,

    /// A single named column filter matches neither columns nor tags.
    #[error("column not exists: `{0}`")]
    ColumnNotFound(String),

    /// The destination rejected the write.
    #[error("destination is not assignable: {0}")]
    NotAssignable(&'static str),
}
