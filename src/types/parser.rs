//! Recursive-descent parser for type names such as
//! `Array(Nullable(DateTime64(3, 'UTC')))`.

use super::Type;
use crate::error::{ColumnError, ColumnResult};

pub(super) fn parse_type(input: &str) -> ColumnResult<Type> {
    let mut parser = Parser { input, pos: 0 };
    let ty = parser.parse_type()?;
    parser.skip_whitespace();
    if parser.pos != input.len() {
        return Err(parser.error("trailing characters"));
    }
    Ok(ty)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, reason: &str) -> ColumnError {
        ColumnError::UnknownType(format!("{} ({reason} at {})", self.input, self.pos))
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> ColumnResult<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{c}'")))
        }
    }

    fn identifier(&mut self) -> ColumnResult<&'a str> {
        self.skip_whitespace();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected type name"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn number<T: std::str::FromStr>(&mut self) -> ColumnResult<T> {
        self.skip_whitespace();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let value = rest[..len]
            .parse()
            .map_err(|_| self.error("expected number"))?;
        self.pos += len;
        Ok(value)
    }

    fn quoted(&mut self) -> ColumnResult<String> {
        self.expect('\'')?;
        let rest = self.rest();
        let end = rest
            .find('\'')
            .ok_or_else(|| self.error("unterminated string"))?;
        self.pos += end + 1;
        Ok(rest[..end].to_string())
    }

    fn nested(&mut self) -> ColumnResult<Box<Type>> {
        self.expect('(')?;
        let nested = self.parse_type()?;
        self.expect(')')?;
        Ok(Box::new(nested))
    }

    fn parse_type(&mut self) -> ColumnResult<Type> {
        let name = self.identifier()?;
        let ty = match name {
            "Int8" => Type::Int8,
            "Int16" => Type::Int16,
            "Int32" => Type::Int32,
            "Int64" => Type::Int64,
            "Int128" => Type::Int128,
            "UInt8" => Type::UInt8,
            "UInt16" => Type::UInt16,
            "UInt32" => Type::UInt32,
            "UInt64" => Type::UInt64,
            "Float32" => Type::Float32,
            "Float64" => Type::Float64,
            "String" => Type::String,
            "Date" => Type::Date,
            "Date32" => Type::Date32,
            "UUID" => Type::Uuid,
            "IPv4" => Type::IPv4,
            "IPv6" => Type::IPv6,
            "FixedString" => {
                self.expect('(')?;
                let width = self.number()?;
                self.expect(')')?;
                Type::fixed_string(width)?
            }
            "DateTime" => {
                let timezone = if self.eat('(') {
                    let tz = self.quoted()?;
                    self.expect(')')?;
                    Some(tz)
                } else {
                    None
                };
                Type::DateTime { timezone }
            }
            "DateTime64" => {
                self.expect('(')?;
                let precision = self.number()?;
                let timezone = if self.eat(',') {
                    Some(self.quoted()?)
                } else {
                    None
                };
                self.expect(')')?;
                Type::datetime64(precision)?;
                Type::DateTime64 {
                    precision,
                    timezone,
                }
            }
            "Decimal" => {
                self.expect('(')?;
                let precision = self.number()?;
                self.expect(',')?;
                let scale = self.number()?;
                self.expect(')')?;
                Type::decimal(precision, scale)?
            }
            "Decimal32" | "Decimal64" | "Decimal128" => {
                let precision = match name {
                    "Decimal32" => 9,
                    "Decimal64" => 18,
                    _ => 38,
                };
                self.expect('(')?;
                let scale = self.number()?;
                self.expect(')')?;
                Type::decimal(precision, scale)?
            }
            "Nullable" => Type::Nullable(self.nested()?),
            "Array" => Type::Array(self.nested()?),
            "LowCardinality" => Type::LowCardinality(self.nested()?),
            "Tuple" => {
                self.expect('(')?;
                let mut elements = vec![self.parse_type()?];
                while self.eat(',') {
                    elements.push(self.parse_type()?);
                }
                self.expect(')')?;
                Type::Tuple(elements)
            }
            _ => return Err(self.error("unsupported type")),
        };
        Ok(ty)
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::ColumnError, types::Type};

    #[test]
    fn canonical_names_parse_back() {
        for name in [
            "UInt8",
            "Int128",
            "Float64",
            "FixedString(12)",
            "DateTime",
            "DateTime('Europe/Moscow')",
            "DateTime64(3)",
            "DateTime64(9, 'UTC')",
            "Decimal(10,5)",
            "UUID",
            "IPv4",
            "IPv6",
            "Nullable(UInt8)",
            "Array(Array(String))",
            "Tuple(UInt8, Nullable(String), Array(Date32))",
            "LowCardinality(Nullable(FixedString(4)))",
        ] {
            let ty: Type = name.parse().unwrap();
            assert_eq!(ty.name(), name);
        }
    }

    #[test]
    fn aliases_and_whitespace() {
        assert_eq!(
            " Decimal32( 4 ) ".parse::<Type>().unwrap(),
            Type::decimal(9, 4).unwrap()
        );
        assert_eq!(
            "Decimal128(2)".parse::<Type>().unwrap(),
            Type::decimal(38, 2).unwrap()
        );
        assert_eq!(
            "Decimal(10, 5)".parse::<Type>().unwrap(),
            Type::decimal(10, 5).unwrap()
        );
        assert_eq!(
            "Array( Nullable(Int8) )".parse::<Type>().unwrap(),
            Type::array(Type::nullable(Type::Int8))
        );
    }

    #[test]
    fn rejects_garbage() {
        for name in [
            "",
            "Map(String, UInt8)",
            "Array(UInt8",
            "FixedString(x)",
            "FixedString(0)",
            "UInt8 extra",
            "DateTime64(12)",
            "DateTime('UTC)",
        ] {
            let err = name.parse::<Type>().unwrap_err();
            assert!(
                matches!(
                    err,
                    ColumnError::UnknownType(_) | ColumnError::InvalidArgument(_)
                ),
                "{name}: {err:?}"
            );
        }
    }
}
