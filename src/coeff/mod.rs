//! Per-particle-type force coefficients.
//!
//! Coefficients are set by name for one or more particle types, may fall
//! back to defaults, and are validated against the registered particle types
//! only when a force needs them.
//!
//! ```
//! use forcectl::coeff::{CoeffValue, CoefficientTable};
//!
//! let mut coeff = CoefficientTable::new();
//! coeff.set_default("p", 3);
//! let _ = coeff.set("A", [("A", CoeffValue::from(1.0)), ("i", 1.into()), ("w", 0.02.into())]);
//! let _ = coeff.set(["A", "B"], [("w", 0.05)]);
//! assert_eq!(coeff.get("A", "p").unwrap(), CoeffValue::Int(3));
//! ```

pub mod schema;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::TypeSource;
use crate::diagnostics::Diagnostic;
use crate::error::{Error, Result};

pub use schema::{CoeffBundle, FieldKind, FieldSpec};

/// A single coefficient value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoeffValue {
    Int(i64),
    Real(f64),
}

impl CoeffValue {
    pub fn as_real(self) -> f64 {
        match self {
            CoeffValue::Int(v) => v as f64,
            CoeffValue::Real(v) => v,
        }
    }

    /// The value as an integer, if it is one or is a real with no fractional part.
    pub fn as_int(self) -> Option<i64> {
        match self {
            CoeffValue::Int(v) => Some(v),
            CoeffValue::Real(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Some(v as i64),
            CoeffValue::Real(_) => None,
        }
    }
}

impl fmt::Display for CoeffValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoeffValue::Int(v) => write!(f, "{v}"),
            CoeffValue::Real(v) => write!(f, "{v}"),
        }
    }
}

impl From<f64> for CoeffValue {
    fn from(v: f64) -> Self {
        CoeffValue::Real(v)
    }
}

impl From<f32> for CoeffValue {
    fn from(v: f32) -> Self {
        CoeffValue::Real(f64::from(v))
    }
}

impl From<i64> for CoeffValue {
    fn from(v: i64) -> Self {
        CoeffValue::Int(v)
    }
}

impl From<i32> for CoeffValue {
    fn from(v: i32) -> Self {
        CoeffValue::Int(i64::from(v))
    }
}

impl From<u32> for CoeffValue {
    fn from(v: u32) -> Self {
        CoeffValue::Int(i64::from(v))
    }
}

/// One particle type name or a list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSelection(Vec<String>);

impl TypeSelection {
    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for TypeSelection {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for TypeSelection {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<&[&str]> for TypeSelection {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|n| n.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for TypeSelection {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|n| n.to_string()).collect())
    }
}

impl From<Vec<String>> for TypeSelection {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<&[String]> for TypeSelection {
    fn from(names: &[String]) -> Self {
        Self(names.to_vec())
    }
}

/// Outcome of [`CoefficientTable::verify`].
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct Verification {
    invalid_types: Vec<String>,
    issues: Vec<Diagnostic>,
}

impl Verification {
    /// True only if every registered type has every required coefficient.
    pub fn is_valid(&self) -> bool {
        self.invalid_types.is_empty()
    }

    pub fn invalid_types(&self) -> &[String] {
        &self.invalid_types
    }

    pub fn issues(&self) -> &[Diagnostic] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Diagnostic> {
        self.issues
    }
}

type Coeffs = BTreeMap<String, CoeffValue>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoefficientTable {
    values: BTreeMap<String, Coeffs>,
    defaults: Coeffs,
}

impl CoefficientTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fallback used by any type that never sets `name`.
    ///
    /// Existing entries are untouched; the default is merged into an entry
    /// the next time that type is set.
    pub fn set_default(&mut self, name: impl Into<String>, value: impl Into<CoeffValue>) {
        self.defaults.insert(name.into(), value.into());
    }

    /// Sets named coefficients for one or more particle types.
    ///
    /// Names not given keep their previous value. Defaults fill any name the
    /// entry still lacks. Returns a diagnostic, and changes nothing, if no
    /// coefficients are given.
    #[must_use = "an empty call is only reported through the returned diagnostic"]
    pub fn set<T, I, K, V>(&mut self, types: T, coeffs: I) -> Option<Diagnostic>
    where
        T: Into<TypeSelection>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CoeffValue>,
    {
        let types = types.into();
        let coeffs: Vec<(String, CoeffValue)> = coeffs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        if coeffs.is_empty() {
            return Some(Diagnostic::EmptyCoefficientCall { types: types.0 });
        }

        for type_name in types.0 {
            let entry = self.values.entry(type_name).or_default();
            for (name, value) in &coeffs {
                entry.insert(name.clone(), *value);
            }
            for (name, value) in &self.defaults {
                entry.entry(name.clone()).or_insert(*value);
            }
        }
        None
    }

    pub fn get(&self, type_name: &str, name: &str) -> Result<CoeffValue> {
        let entry = self
            .values
            .get(type_name)
            .ok_or_else(|| Error::UnknownType(type_name.to_string()))?;
        entry
            .get(name)
            .copied()
            .ok_or_else(|| Error::UndefinedCoefficient {
                type_name: type_name.to_string(),
                coeff: name.to_string(),
            })
    }

    /// Checks that every registered particle type sets every required name.
    ///
    /// Names set for a type but not required are reported as possible typos.
    /// A registered type that was never set counts as missing everything.
    pub fn verify<S>(&self, source: &S, required: &[&str]) -> Result<Verification>
    where
        S: TypeSource + ?Sized,
    {
        let types = source
            .type_registry()
            .ok_or(Error::Uninitialized("verify force coefficients"))?;

        let mut verification = Verification::default();
        for type_name in types.iter() {
            let entry = self.values.get(type_name);

            let mut count = 0;
            for name in entry.into_iter().flat_map(|e| e.keys()) {
                if required.contains(&name.as_str()) {
                    count += 1;
                } else {
                    verification.issues.push(Diagnostic::UnknownCoefficient {
                        type_name: type_name.to_string(),
                        coeff: name.clone(),
                    });
                }
            }

            if count < required.len() {
                let missing = required
                    .iter()
                    .filter(|name| !entry.is_some_and(|e| e.contains_key(**name)))
                    .map(|name| name.to_string())
                    .collect();
                verification.issues.push(Diagnostic::MissingCoefficients {
                    type_name: type_name.to_string(),
                    missing,
                });
                verification.invalid_types.push(type_name.to_string());
            }
        }
        Ok(verification)
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn contains_type(&self, type_name: &str) -> bool {
        self.values.contains_key(type_name)
    }

    pub fn defaults(&self) -> impl Iterator<Item = (&str, CoeffValue)> {
        self.defaults.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
