/// Settings consulted by [`create_column_with`](crate::column::create_column_with).
#[derive(Debug, Clone)]
pub struct ColumnOptions {
    pub(crate) low_cardinality_as_wrapped: bool,
    pub(crate) nullable_low_cardinality: bool,
}

impl Default for ColumnOptions {
    fn default() -> Self {
        ColumnOptions {
            low_cardinality_as_wrapped: false,
            nullable_low_cardinality: true,
        }
    }
}

impl ColumnOptions {
    /// Build `LowCardinality(T)` columns as plain `T` columns. The wire format
    /// is then the plain one, so only use this when the peer agrees.
    pub fn low_cardinality_as_wrapped(self, low_cardinality_as_wrapped: bool) -> Self {
        ColumnOptions {
            low_cardinality_as_wrapped,
            ..self
        }
    }

    /// Accept `LowCardinality(Nullable(T))`.
    pub fn nullable_low_cardinality(self, nullable_low_cardinality: bool) -> Self {
        ColumnOptions {
            nullable_low_cardinality,
            ..self
        }
    }
}
