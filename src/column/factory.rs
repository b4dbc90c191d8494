use super::{
    ColumnArray, ColumnDate, ColumnDate32, ColumnDateTime, ColumnDateTime64, ColumnDecimal,
    ColumnFixedString, ColumnFloat32, ColumnFloat64, ColumnIPv4, ColumnIPv6, ColumnInt128,
    ColumnInt16, ColumnInt32, ColumnInt64, ColumnInt8, ColumnLowCardinality, ColumnNullable,
    ColumnRef, ColumnString, ColumnTuple, ColumnUInt16, ColumnUInt32, ColumnUInt64, ColumnUInt8,
    ColumnUuid,
};
use crate::{
    error::{ColumnError, ColumnResult},
    observability::log_debug,
    option::ColumnOptions,
    types::Type,
};

/// Empty column for `ty` with default [`ColumnOptions`].
///
/// ```
/// use chcolumn::{create_column, Column, Type};
///
/// let ty: Type = "Array(Nullable(Decimal(10,5)))".parse().unwrap();
/// let column = create_column(&ty).unwrap();
/// assert_eq!(column.column_type(), &ty);
/// ```
pub fn create_column(ty: &Type) -> ColumnResult<ColumnRef> {
    create_column_with(ty, &ColumnOptions::default())
}

/// Empty column for `ty`.
pub fn create_column_with(ty: &Type, options: &ColumnOptions) -> ColumnResult<ColumnRef> {
    let column: ColumnRef = match ty {
        Type::Int8 => Box::new(ColumnInt8::new()),
        Type::Int16 => Box::new(ColumnInt16::new()),
        Type::Int32 => Box::new(ColumnInt32::new()),
        Type::Int64 => Box::new(ColumnInt64::new()),
        Type::Int128 => Box::new(ColumnInt128::new()),
        Type::UInt8 => Box::new(ColumnUInt8::new()),
        Type::UInt16 => Box::new(ColumnUInt16::new()),
        Type::UInt32 => Box::new(ColumnUInt32::new()),
        Type::UInt64 => Box::new(ColumnUInt64::new()),
        Type::Float32 => Box::new(ColumnFloat32::new()),
        Type::Float64 => Box::new(ColumnFloat64::new()),
        Type::String => Box::new(ColumnString::new()),
        Type::FixedString(width) => Box::new(ColumnFixedString::new(*width)?),
        Type::Date => Box::new(ColumnDate::new()),
        Type::Date32 => Box::new(ColumnDate32::new()),
        Type::DateTime { timezone: None } => Box::new(ColumnDateTime::new()),
        Type::DateTime {
            timezone: Some(tz),
        } => Box::new(ColumnDateTime::with_timezone(tz.as_str())),
        Type::DateTime64 {
            precision,
            timezone: None,
        } => Box::new(ColumnDateTime64::new(*precision)?),
        Type::DateTime64 {
            precision,
            timezone: Some(tz),
        } => Box::new(ColumnDateTime64::with_timezone(*precision, tz.as_str())?),
        Type::Decimal { precision, scale } => Box::new(ColumnDecimal::new(*precision, *scale)?),
        Type::Uuid => Box::new(ColumnUuid::new()),
        Type::IPv4 => Box::new(ColumnIPv4::new()),
        Type::IPv6 => Box::new(ColumnIPv6::new()),
        Type::Nullable(nested) => {
            Box::new(ColumnNullable::new(create_column_with(nested, options)?))
        }
        Type::Array(nested) => Box::new(ColumnArray::new(create_column_with(nested, options)?)),
        Type::Tuple(elements) => Box::new(ColumnTuple::new(
            elements
                .iter()
                .map(|element| create_column_with(element, options))
                .collect::<ColumnResult<Vec<_>>>()?,
        )?),
        Type::LowCardinality(nested) => {
            if nested.is_nullable() && !options.nullable_low_cardinality {
                return Err(ColumnError::InvalidArgument(format!(
                    "{ty} is disabled by the column options"
                )));
            }
            let dictionary = create_column_with(nested, options)?;
            if options.low_cardinality_as_wrapped {
                log_debug!(
                    component = "factory",
                    event = "low_cardinality_unwrapped",
                    column_type = %ty,
                );
                return Ok(dictionary);
            }
            Box::new(ColumnLowCardinality::new(dictionary)?)
        }
    };
    Ok(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;

    #[test]
    fn builds_every_type_name() {
        for name in [
            "Int8",
            "UInt64",
            "Int128",
            "Float32",
            "String",
            "FixedString(12)",
            "Date",
            "Date32",
            "DateTime('UTC')",
            "DateTime64(3)",
            "DateTime64(6, 'Europe/Berlin')",
            "Decimal(10,5)",
            "UUID",
            "IPv4",
            "IPv6",
            "Nullable(String)",
            "Array(Array(UInt8))",
            "Tuple(UInt8, Nullable(String))",
            "LowCardinality(String)",
            "LowCardinality(Nullable(FixedString(4)))",
        ] {
            let ty: Type = name.parse().unwrap();
            let column = create_column(&ty).unwrap();
            assert_eq!(column.column_type().name(), name);
            assert!(column.is_empty());
        }
    }

    #[test]
    fn concrete_types_match() {
        let column = create_column(&Type::decimal(20, 2).unwrap()).unwrap();
        let decimal = column.as_strict::<ColumnDecimal>().unwrap();
        assert_eq!((decimal.precision(), decimal.scale()), (20, 2));

        let column = create_column(&"Nullable(UInt32)".parse().unwrap()).unwrap();
        let nullable = column.as_strict::<ColumnNullable>().unwrap();
        assert!(nullable.nested().as_typed::<ColumnUInt32>().is_some());
    }

    #[test]
    fn zero_width_fixed_string_has_no_column() {
        assert!("Array(FixedString(0))".parse::<Type>().is_err());
        let ty = Type::array(Type::FixedString(0));
        assert!(matches!(
            create_column(&ty),
            Err(ColumnError::InvalidArgument(_))
        ));
    }

    #[test]
    fn low_cardinality_options() {
        let ty: Type = "LowCardinality(Nullable(String))".parse().unwrap();

        let wrapped = ColumnOptions::default().low_cardinality_as_wrapped(true);
        let column = create_column_with(&ty, &wrapped).unwrap();
        assert_eq!(column.column_type().name(), "Nullable(String)");

        let strict = ColumnOptions::default().nullable_low_cardinality(false);
        assert!(matches!(
            create_column_with(&ty, &strict),
            Err(ColumnError::InvalidArgument(_))
        ));
        let plain: Type = "LowCardinality(String)".parse().unwrap();
        assert!(create_column_with(&plain, &strict).is_ok());
    }
}
