use forcectl::coeff::{CoeffValue, CoefficientTable};
use forcectl::config::ContextConfig;
use forcectl::core::context::SimulationContext;
use forcectl::core::particles::ParticleData;
use forcectl::core::types::ParticleTypeRegistry;
use forcectl::diagnostics::Diagnostic;
use forcectl::forces::external::PeriodicForce;
use forcectl::forces::constant::ConstantForce;
use forcectl::platform::compute::{ForceBuffer, ForceCompute, PeriodicEvaluator, PotentialExternal};
use forcectl::platform::exec::ExecutionConfig;
use forcectl::platform::record::{Scalar4, int_as_scalar};
use forcectl::Error;
use glam::Vec3;

fn particles(n: usize) -> ParticleData {
    let types = ParticleTypeRegistry::new(["A", "B"]).unwrap();
    let positions = (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            Vec3::new(10.0 * t - 5.0, 3.0 * (t * 7.0).sin(), -4.0 + 8.0 * t * t)
        })
        .collect();
    let type_ids = (0..n).map(|i| (i % 2) as u32).collect();
    ParticleData::new(types, Vec3::splat(10.0), positions, type_ids).unwrap()
}

fn context(execution: ExecutionConfig, n: usize) -> SimulationContext {
    let mut ctx = SimulationContext::new(ContextConfig {
        execution,
        ..ContextConfig::default()
    });
    ctx.initialize(particles(n)).unwrap();
    ctx
}

fn coefficients() -> CoefficientTable {
    let mut table = CoefficientTable::new();
    table.set_default("p", 2);
    let _ = table.set("A", [("A", 1.0), ("i", 0.0), ("w", 0.1)]);
    let _ = table.set("B", [("A", -0.5), ("i", 2.0), ("w", 0.05)]);
    table
}

fn record(i: i32, a: f32, w: f32, p: i32) -> Scalar4 {
    Scalar4::new(int_as_scalar(i), a, w, int_as_scalar(p))
}

#[test]
fn test_update_coeffs_pushes_records_in_type_order() {
    let mut ctx = context(ExecutionConfig::cpu(), 4);
    let handle = PeriodicForce::create(&mut ctx).unwrap();
    ctx.get_mut(handle).unwrap().set_coeff_table(coefficients());
    ctx.update_coeffs(handle).unwrap();

    // A standalone compute fed the expected records must agree
    let mut reference = PotentialExternal::<PeriodicEvaluator>::new(2);
    reference.set_params(0, record(0, 1.0, 0.1, 2)).unwrap();
    reference.set_params(1, record(2, -0.5, 0.05, 2)).unwrap();
    reference.compute(ctx.particles().unwrap());

    let forces = ctx.evaluate(0).unwrap();
    assert_eq!(&forces, reference.forces());
}

#[test]
fn test_integer_axis_selects_force_component() {
    let mut ctx = context(ExecutionConfig::cpu(), 16);
    let handle = PeriodicForce::create(&mut ctx).unwrap();
    let _ = ctx
        .get_mut(handle)
        .unwrap()
        .coeff_mut()
        .set(["A", "B"], [("A", 1.0), ("i", 1.0), ("w", 0.02), ("p", 3.0)]);

    let forces = ctx.evaluate(0).unwrap();
    assert!(forces.force.iter().all(|f| f.x == 0.0 && f.z == 0.0));
    assert!(forces.force.iter().any(|f| f.y != 0.0));
}

#[test]
fn test_serial_and_accelerated_backends_agree() {
    let mut serial = context(ExecutionConfig::cpu(), 1000);
    let mut accelerated = context(ExecutionConfig::accelerated(), 1000);

    for ctx in [&mut serial, &mut accelerated] {
        let handle = PeriodicForce::create(ctx).unwrap();
        ctx.get_mut(handle).unwrap().set_coeff_table(coefficients());
    }

    let a = serial.evaluate(0).unwrap();
    let b = accelerated.evaluate(0).unwrap();
    assert_eq!(a, b);
    assert!(a.total_energy().abs() > 0.0);
}

#[test]
fn test_missing_type_fails_update_with_error_report() {
    let mut ctx = context(ExecutionConfig::cpu(), 4);
    let handle = PeriodicForce::create(&mut ctx).unwrap();
    let _ = ctx
        .get_mut(handle)
        .unwrap()
        .coeff_mut()
        .set("A", [("A", 1.0), ("i", 0.0), ("w", 0.1), ("p", 2.0)]);

    let err = ctx.update_coeffs(handle).unwrap_err();
    match err {
        Error::MissingCoefficients { handle, types } => {
            assert_eq!(handle, "external_force0");
            assert_eq!(types, ["B"]);
        }
        other => panic!("unexpected error {other}"),
    }
    assert!(ctx.diagnostics().has_errors());
    assert!(matches!(
        ctx.diagnostics().issues(),
        [Diagnostic::MissingCoefficients { type_name, .. }] if type_name == "B"
    ));
}

#[test]
fn test_prepare_run_fails_fast_on_enabled_force() {
    let mut ctx = context(ExecutionConfig::cpu(), 4);
    PeriodicForce::create(&mut ctx).unwrap();

    assert!(matches!(ctx.evaluate(0), Err(Error::MissingCoefficients { .. })));
}

#[test]
fn test_disabled_force_is_neither_validated_nor_evaluated() {
    let mut ctx = context(ExecutionConfig::cpu(), 4);
    let handle = PeriodicForce::create(&mut ctx).unwrap();
    ctx.disable(handle).unwrap();

    let forces = ctx.evaluate(0).unwrap();
    assert!(forces.force.iter().all(|f| *f == Vec3::ZERO));
    assert_eq!(forces.total_energy(), 0.0);
}

#[test]
fn test_fractional_axis_is_a_kind_error() {
    let mut ctx = context(ExecutionConfig::cpu(), 2);
    let handle = PeriodicForce::create(&mut ctx).unwrap();
    let _ = ctx
        .get_mut(handle)
        .unwrap()
        .coeff_mut()
        .set(["A", "B"], [("A", 1.0), ("i", 0.5), ("w", 0.1), ("p", 2.0)]);

    let err = ctx.update_coeffs(handle).unwrap_err();
    assert!(matches!(err, Error::CoefficientKind { .. }));
    assert!(!err.is_bug());
}

#[test]
fn test_unknown_coefficient_only_warns() {
    let mut ctx = context(ExecutionConfig::cpu(), 2);
    let handle = PeriodicForce::create(&mut ctx).unwrap();
    let _ = ctx
        .get_mut(handle)
        .unwrap()
        .coeff_mut()
        .set(["A", "B"], [("A", 1.0), ("i", 0.0), ("w", 0.1), ("p", 2.0), ("q", 1.0)]);

    ctx.update_coeffs(handle).unwrap();
    assert_eq!(ctx.diagnostics().len(), 2);
    assert!(!ctx.diagnostics().has_errors());
}

#[test]
fn test_unknown_coefficient_warns_once_per_change() {
    let mut ctx = context(ExecutionConfig::cpu(), 4);
    let handle = PeriodicForce::create(&mut ctx).unwrap();
    let _ = ctx
        .get_mut(handle)
        .unwrap()
        .coeff_mut()
        .set(["A", "B"], [("A", 1.0), ("i", 0.0), ("w", 0.1), ("p", 2.0), ("sigma", 1.0)]);

    for step in 0..100 {
        ctx.evaluate(step).unwrap();
    }
    assert!(ctx.get(handle).unwrap().is_synced());
    assert_eq!(ctx.diagnostics().len(), 2);
    assert!(ctx
        .diagnostics()
        .issues()
        .iter()
        .all(|d| matches!(d, Diagnostic::UnknownCoefficient { coeff, .. } if coeff == "sigma")));

    // Changing the table verifies it again, once
    let _ = ctx.get_mut(handle).unwrap().coeff_mut().set("A", [("w", 0.2)]);
    assert!(!ctx.get(handle).unwrap().is_synced());
    for step in 100..110 {
        ctx.evaluate(step).unwrap();
    }
    assert_eq!(ctx.diagnostics().len(), 4);
}

#[test]
fn test_changed_coefficients_reach_the_compute() {
    let mut ctx = context(ExecutionConfig::cpu(), 8);
    let handle = PeriodicForce::create(&mut ctx).unwrap();
    ctx.get_mut(handle).unwrap().set_coeff_table(coefficients());
    let before = ctx.evaluate(0).unwrap();

    let _ = ctx.get_mut(handle).unwrap().coeff_mut().set(["A", "B"], [("A", 0.0)]);
    let after = ctx.evaluate(1).unwrap();
    assert_ne!(before, after);
    assert_eq!(after.total_energy(), 0.0);
}

#[test]
fn test_empty_set_through_context_is_reported() {
    let mut ctx = context(ExecutionConfig::cpu(), 2);
    let handle = PeriodicForce::create(&mut ctx).unwrap();

    ctx.set_coeffs(handle, "A", std::iter::empty::<(&str, CoeffValue)>()).unwrap();
    assert!(matches!(
        ctx.diagnostics().issues(),
        [Diagnostic::EmptyCoefficientCall { types }] if types == &["A"]
    ));

    ctx.set_coeffs(handle, ["A", "B"], [("A", 1.0), ("i", 0.0), ("w", 0.1), ("p", 2.0)]).unwrap();
    assert_eq!(ctx.diagnostics().len(), 1);
    assert_eq!(ctx.get(handle).unwrap().coeff().get("B", "p").unwrap(), CoeffValue::Real(2.0));
}

#[test]
fn test_per_handle_forces_add_up_to_net_force() {
    let mut ctx = context(ExecutionConfig::cpu(), 6);
    let periodic = PeriodicForce::create(&mut ctx).unwrap();
    ctx.get_mut(periodic).unwrap().set_coeff_table(coefficients());
    let push = ConstantForce::create(&mut ctx, Vec3::new(0.0, 0.0, 1.5)).unwrap();

    assert!(ctx.forces(periodic).unwrap().is_empty());
    let net = ctx.evaluate(0).unwrap();

    let own = ctx.get(periodic).unwrap().forces().unwrap();
    let pushed = ctx.forces(push).unwrap();
    assert_eq!(own.len(), 6);
    assert!(pushed.force.iter().all(|f| *f == Vec3::new(0.0, 0.0, 1.5)));

    let mut sum = ForceBuffer::zeroed(6);
    sum.accumulate(&own);
    sum.accumulate(&pushed);
    assert_eq!(sum, net);
}

#[test]
fn test_disabled_handle_keeps_its_last_forces() {
    let mut ctx = context(ExecutionConfig::cpu(), 4);
    let periodic = PeriodicForce::create(&mut ctx).unwrap();
    ctx.get_mut(periodic).unwrap().set_coeff_table(coefficients());
    let first = ctx.evaluate(0).unwrap();

    ctx.disable(periodic).unwrap();
    let net = ctx.evaluate(1).unwrap();
    assert_eq!(net.total_energy(), 0.0);
    assert_eq!(ctx.forces(periodic).unwrap(), first);
}
