use forcectl::coeff::{CoeffValue, CoefficientTable};
use forcectl::core::context::SimulationContext;
use forcectl::core::types::ParticleTypeRegistry;
use forcectl::diagnostics::Diagnostic;
use forcectl::Error;

const PERIODIC: &[&str] = &["A", "i", "w", "p"];

#[test]
fn test_default_fills_unset_coefficient() {
    let mut coeff = CoefficientTable::new();
    coeff.set_default("p", 3);
    let issue = coeff.set("A", [("A", CoeffValue::from(1.0)), ("i", 1.into()), ("w", 0.02.into())]);

    assert!(issue.is_none());
    assert_eq!(coeff.get("A", "p").unwrap(), CoeffValue::Int(3));
    assert_eq!(coeff.get("A", "w").unwrap(), CoeffValue::Real(0.02));
}

#[test]
fn test_multi_type_set_then_single_type_override() {
    let mut coeff = CoefficientTable::new();
    let _ = coeff.set(["A", "B"], [("A", 1.0)]);
    let _ = coeff.set("A", [("w", 0.5)]);

    assert_eq!(coeff.get("A", "A").unwrap().as_real(), 1.0);
    assert_eq!(coeff.get("A", "w").unwrap().as_real(), 0.5);
    assert_eq!(coeff.get("B", "A").unwrap().as_real(), 1.0);

    let err = coeff.get("B", "w").unwrap_err();
    assert!(matches!(err, Error::UndefinedCoefficient { .. }));
}

#[test]
fn test_defaults_never_override_explicit_values() {
    let mut coeff = CoefficientTable::new();
    let _ = coeff.set("A", [("w", 0.5)]);
    coeff.set_default("w", 0.9);
    let _ = coeff.set("A", [("A", 1.0)]);
    let _ = coeff.set("B", [("A", 2.0)]);

    assert_eq!(coeff.get("A", "w").unwrap(), CoeffValue::Real(0.5));
    assert_eq!(coeff.get("B", "w").unwrap(), CoeffValue::Real(0.9));
}

#[test]
fn test_later_set_overrides_earlier_value() {
    let mut coeff = CoefficientTable::new();
    let _ = coeff.set("A", [("A", 1.0)]);
    let _ = coeff.set("A", [("A", 2.5)]);
    assert_eq!(coeff.get("A", "A").unwrap().as_real(), 2.5);
}

#[test]
fn test_get_for_unknown_type_fails() {
    let coeff = CoefficientTable::new();
    assert!(matches!(coeff.get("C", "A"), Err(Error::UnknownType(_))));
}

#[test]
fn test_verify_reports_unconfigured_type() {
    let types = ParticleTypeRegistry::new(["A", "B"]).unwrap();
    let mut coeff = CoefficientTable::new();
    let _ = coeff.set("A", [("A", 1.0), ("i", 0.0), ("w", 0.02), ("p", 3.0)]);

    let verification = coeff.verify(&types, PERIODIC).unwrap();

    assert!(!verification.is_valid());
    assert_eq!(verification.invalid_types(), ["B"]);
    match verification.issues() {
        [Diagnostic::MissingCoefficients { type_name, missing }] => {
            assert_eq!(type_name, "B");
            assert_eq!(missing.len(), 4);
        }
        other => panic!("unexpected issues {other:?}"),
    }
}

#[test]
fn test_verify_warns_about_unused_names_without_failing() {
    let types = ParticleTypeRegistry::new(["A"]).unwrap();
    let mut coeff = CoefficientTable::new();
    let _ = coeff.set("A", [("A", 1.0), ("i", 0.0), ("w", 0.02), ("p", 3.0), ("sigma", 1.0)]);

    let verification = coeff.verify(&types, PERIODIC).unwrap();

    assert!(verification.is_valid());
    assert_eq!(
        verification.issues(),
        [Diagnostic::UnknownCoefficient {
            type_name: "A".into(),
            coeff: "sigma".into()
        }]
    );
}

#[test]
fn test_verify_names_only_the_missing_coefficients() {
    let types = ParticleTypeRegistry::new(["A"]).unwrap();
    let mut coeff = CoefficientTable::new();
    let _ = coeff.set("A", [("A", 1.0), ("w", 0.02)]);

    let verification = coeff.verify(&types, PERIODIC).unwrap();
    assert_eq!(
        verification.issues(),
        [Diagnostic::MissingCoefficients {
            type_name: "A".into(),
            missing: vec!["i".into(), "p".into()]
        }]
    );
}

#[test]
fn test_verify_before_initialization_fails() {
    let ctx = SimulationContext::default();
    let coeff = CoefficientTable::new();

    let err = coeff.verify(&ctx, PERIODIC).unwrap_err();
    assert!(matches!(err, Error::Uninitialized(_)));
}

#[test]
fn test_entries_for_unregistered_types_are_ignored() {
    let types = ParticleTypeRegistry::new(["A"]).unwrap();
    let mut coeff = CoefficientTable::new();
    let _ = coeff.set(["A", "Z"], [("A", 1.0), ("i", 0.0), ("w", 0.02), ("p", 3.0)]);

    assert!(coeff.verify(&types, PERIODIC).unwrap().is_valid());
}
