use chcolumn::{
    column::{ColumnUInt32, ColumnUInt8},
    create_column, CodecError, Column, ColumnDecimal, ColumnError, ColumnFixedString,
    ColumnLowCardinality, ColumnNullable, ColumnString, ColumnUuid, Input, Output, Type, Uuid,
    Value,
};

#[test]
fn uint32_append_and_at() {
    let mut column = ColumnUInt32::new();
    for v in [1, 2, 3] {
        column.append(v);
    }
    assert_eq!(column.size(), 3);
    assert_eq!(column.at(1).unwrap(), 2);
    assert_eq!(
        column.at(3).unwrap_err(),
        ColumnError::OutOfRange { index: 3, size: 3 }
    );
}

#[test]
fn fixed_string_zero_pads() {
    let mut column = ColumnFixedString::new(12).unwrap();
    column.append("foobar").unwrap();

    let mut buf = Vec::new();
    column.save(&mut buf).unwrap();
    assert_eq!(buf, b"foobar\0\0\0\0\0\0");
    assert!(matches!(
        column.append("foobarfoobarX"),
        Err(ColumnError::InvalidWidth { width: 12, actual: 13 })
    ));
}

#[test]
fn decimal_stores_scaled_integer() {
    let mut column = ColumnDecimal::new(10, 5).unwrap();
    column.append_str("3.14159").unwrap();
    assert_eq!(column.raw_at(0).unwrap(), 314_159);
    assert_eq!(column.column_type().name(), "Decimal(10,5)");

    let mut buf = Vec::new();
    column.save(&mut buf).unwrap();
    assert_eq!(buf, 314_159i64.to_le_bytes());
}

#[test]
fn nullable_uint8_mask_and_placeholder() {
    let mut column = ColumnNullable::new(Box::new(ColumnUInt8::new()));
    column.append_value(Value::Null).unwrap();
    column.append_value(Value::UInt8(5)).unwrap();

    assert_eq!(column.nulls(), &[1, 0]);
    let nested = column.nested().as_strict::<ColumnUInt8>().unwrap();
    assert_eq!(nested.data(), &[0, 5]);

    let mut buf = Vec::new();
    column.save(&mut buf).unwrap();
    assert_eq!(buf, vec![1, 0, 0, 5]);
}

#[test]
fn empty_column_contract() {
    let column = create_column(&"Decimal(10,5)".parse().unwrap()).unwrap();
    assert_eq!(
        column.value_at(0).unwrap_err(),
        ColumnError::OutOfRange { index: 0, size: 0 }
    );
    let slice = column.slice(0, 0).unwrap();
    assert_eq!(slice.column_type(), column.column_type());
    assert_eq!(slice.size(), 0);
}

#[test]
fn clear_keeps_column_usable() {
    let mut column = ColumnString::new();
    column.append("a");
    column.clear();
    assert_eq!(column.column_type(), &Type::String);
    column.append("b");
    assert_eq!(column.at(0).unwrap(), b"b");
}

#[test]
fn strict_downcast_checks_concrete_type() {
    let column = create_column(&Type::Uuid).unwrap();
    assert!(column.as_strict::<ColumnUuid>().is_ok());
    assert!(matches!(
        column.as_strict::<ColumnString>(),
        Err(ColumnError::TypeMismatch { .. })
    ));
}

#[test]
fn uuid_wire_is_high_then_low() {
    let mut column = ColumnUuid::new();
    let uuid: Uuid = "01234567-89ab-cdef-0011-223344556677".parse().unwrap();
    column.append(uuid);

    let mut buf = Vec::new();
    column.save(&mut buf).unwrap();
    assert_eq!(&buf[..8], &0x0123_4567_89ab_cdefu64.to_le_bytes());
    assert_eq!(&buf[8..], &0x0011_2233_4455_6677u64.to_le_bytes());
}

#[test]
fn truncated_string_load_reports_codec_error() {
    let mut column = ColumnString::new();
    let bytes = [5u8, b'a', b'b'];
    let err = column.load(&mut &bytes[..], 1).unwrap_err();
    assert!(matches!(
        err,
        ColumnError::Codec(CodecError::Truncated { needed: 5, remaining: 2 })
    ));
    assert!(column.is_empty());
}

#[test]
fn bounded_output_overflows() {
    let mut column = ColumnUInt32::new();
    column.append(7);
    column.append(8);

    let mut small = [0u8; 6];
    let mut output: &mut [u8] = &mut small[..];
    let err = column.save(&mut output).unwrap_err();
    assert!(matches!(err, ColumnError::Codec(CodecError::Overflow { .. })));
}

#[test]
fn varint_codec_through_io_traits() {
    let mut buf = Vec::new();
    for value in [0u64, 127, 128, 300, u64::MAX] {
        buf.write_varint(value).unwrap();
    }
    assert_eq!(buf.len(), 1 + 1 + 2 + 2 + 10);

    let mut input = buf.as_slice();
    for expected in [0u64, 127, 128, 300, u64::MAX] {
        assert_eq!(input.read_varint().unwrap(), expected);
    }
    assert!(matches!(
        input.read_varint(),
        Err(CodecError::Truncated { .. })
    ));
}

#[test]
fn type_names_round_trip() {
    for name in [
        "Array(Nullable(Decimal(10,5)))",
        "LowCardinality(Nullable(String))",
        "Tuple(DateTime64(3, 'UTC'), Array(IPv6))",
    ] {
        let ty: Type = name.parse().unwrap();
        assert_eq!(ty.name(), name);
        assert_eq!(ty.to_string().parse::<Type>().unwrap(), ty);
    }
    assert_eq!(
        "Decimal64(4)".parse::<Type>().unwrap(),
        Type::decimal(18, 4).unwrap()
    );
    assert!(matches!(
        "Map(String, UInt8)".parse::<Type>(),
        Err(ColumnError::UnknownType(_))
    ));
}

#[test]
fn low_cardinality_dictionary_only_grows() {
    let mut column =
        ColumnLowCardinality::new(create_column(&Type::String).unwrap()).unwrap();
    for s in ["x", "y", "x", "z", "y"] {
        column.append(s).unwrap();
    }
    let dictionary = column.dictionary().size();
    let slots = column.indices().to_vec();

    column.append("x").unwrap();
    assert_eq!(column.dictionary().size(), dictionary);
    assert_eq!(&column.indices()[..5], slots.as_slice());
}
