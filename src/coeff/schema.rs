//! Typed field declarations of a force kind and the per-type bundles built
//! from them.

use super::{CoeffValue, CoefficientTable};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Real,
    Integer,
}

/// A coefficient a force kind requires for every particle type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn real(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Real,
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
        }
    }
}

pub fn field_names(fields: &[FieldSpec]) -> Vec<&'static str> {
    fields.iter().map(|f| f.name).collect()
}

/// The required coefficients of one particle type, read out of a table.
#[derive(Debug, Clone)]
pub struct CoeffBundle<'a> {
    type_name: &'a str,
    fields: &'a [FieldSpec],
    values: Vec<CoeffValue>,
}

impl<'a> CoeffBundle<'a> {
    pub fn gather(table: &CoefficientTable, type_name: &'a str, fields: &'a [FieldSpec]) -> Result<Self> {
        let values = fields
            .iter()
            .map(|field| table.get(type_name, field.name))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            type_name,
            fields,
            values,
        })
    }

    pub fn type_name(&self) -> &str {
        self.type_name
    }

    pub fn real(&self, name: &str) -> Result<f64> {
        let (_, value) = self.lookup(name)?;
        Ok(value.as_real())
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        let (field, value) = self.lookup(name)?;
        if field.kind != FieldKind::Integer {
            return Err(self.kind_error(name, "declared as an integer field"));
        }
        value
            .as_int()
            .ok_or_else(|| self.kind_error(name, "an integer"))
    }

    /// Reads an integer field that must fit a 32-bit native slot.
    pub fn int32(&self, name: &str) -> Result<i32> {
        let value = self.int(name)?;
        i32::try_from(value).map_err(|_| self.kind_error(name, "a 32-bit integer"))
    }

    /// Reads a 32-bit integer field that the native side stores unsigned,
    /// rejecting values below `min`.
    pub fn int32_at_least(&self, name: &str, min: i32) -> Result<i32> {
        let value = self.int32(name)?;
        if value < min {
            let expected = match min {
                0 => "a non-negative integer",
                1 => "a positive integer",
                _ => "an integer within its allowed range",
            };
            return Err(self.kind_error(name, expected));
        }
        Ok(value)
    }

    fn lookup(&self, name: &str) -> Result<(&FieldSpec, CoeffValue)> {
        self.fields
            .iter()
            .zip(&self.values)
            .find(|(field, _)| field.name == name)
            .map(|(field, value)| (field, *value))
            .ok_or_else(|| Error::UndefinedCoefficient {
                type_name: self.type_name.to_string(),
                coeff: name.to_string(),
            })
    }

    fn kind_error(&self, name: &str, expected: &'static str) -> Error {
        Error::CoefficientKind {
            type_name: self.type_name.to_string(),
            coeff: name.to_string(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[FieldSpec] = &[FieldSpec::real("A"), FieldSpec::integer("i")];

    fn table() -> CoefficientTable {
        let mut table = CoefficientTable::new();
        let _ = table.set("A", [("A", CoeffValue::from(2)), ("i", 1.0.into())]);
        let _ = table.set("B", [("A", CoeffValue::from(1.0)), ("i", 0.5.into())]);
        table
    }

    #[test]
    fn reals_accept_integers_and_integers_accept_integral_reals() {
        let table = table();
        let bundle = CoeffBundle::gather(&table, "A", FIELDS).unwrap();
        assert_eq!(bundle.real("A").unwrap(), 2.0);
        assert_eq!(bundle.int32("i").unwrap(), 1);
    }

    #[test]
    fn fractional_integer_field_is_rejected() {
        let table = table();
        let bundle = CoeffBundle::gather(&table, "B", FIELDS).unwrap();
        assert!(matches!(
            bundle.int("i"),
            Err(Error::CoefficientKind { expected: "an integer", .. })
        ));
        assert!(matches!(bundle.int("A"), Err(Error::CoefficientKind { .. })));
    }

    #[test]
    fn lower_bound_is_enforced() {
        let mut table = CoefficientTable::new();
        let _ = table.set("A", [("A", 1.0), ("i", -1.0)]);
        let bundle = CoeffBundle::gather(&table, "A", FIELDS).unwrap();

        assert_eq!(bundle.int32_at_least("i", -1).unwrap(), -1);
        assert!(matches!(
            bundle.int32_at_least("i", 0),
            Err(Error::CoefficientKind { expected: "a non-negative integer", .. })
        ));
    }

    #[test]
    fn undeclared_field_is_a_bug() {
        let table = table();
        let bundle = CoeffBundle::gather(&table, "A", FIELDS).unwrap();
        let err = bundle.real("w").unwrap_err();
        assert!(err.is_bug());
    }

    #[test]
    fn gather_fails_for_unset_type() {
        let table = table();
        assert!(matches!(
            CoeffBundle::gather(&table, "C", FIELDS),
            Err(Error::UnknownType(_))
        ));
    }
}
