// Recurrence engine tests: convergence to known values, checkpoint resumption and reduction
use env_logger::Env;
use num::{BigInt, Signed};
use proptest::prelude::*;
use ramanujan::core::calc_data::CalcData;
use ramanujan::core::cf_calc::{CfCalc, ConvergentPrecision};
use ramanujan::core::pcf::Pcf;
use ramanujan::numeric::{NamedConstant, Precision, Real};
use ramanujan::polynomial::degree;

fn init_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("debug")).is_test(true).try_init();
}

fn ints(values: &[i64]) -> Vec<BigInt> {
    values.iter().map(|&v| BigInt::from(v)).collect()
}

#[test]
fn test_golden_ratio_after_3000_steps() {
    init_logging();
    let mut calc = CfCalc::new(Pcf::from_coefficients(&[1], &[1]).unwrap());
    calc.advance_by(3000);

    let digits = match calc.precision() {
        Some(ConvergentPrecision::Digits(digits)) => digits,
        other => panic!("unexpected precision {:?}", other),
    };
    assert!(digits > 1000, "only {} digits", digits);

    let trusted = (digits - 5) as u32;
    let precision = Precision::from_digits(trusted + 20);
    let value = Real::from_rational(&calc.value().unwrap(), precision.bits());
    let phi = NamedConstant::Phi.value(precision);

    // |value - phi| * 10^trusted < 1
    let difference = (&value - &phi).abs();
    let scaled = difference.mantissa() * num::pow(BigInt::from(10), trusted as usize);
    assert!(scaled < (BigInt::from(1) << precision.bits()));
}

#[test]
fn test_resume_from_checkpoint() {
    let pcf = Pcf::from_coefficients(&[-1, 0, 0], &[3, 1]).unwrap();

    let mut whole = CfCalc::new(pcf.clone());
    whole.advance_by(1000);

    let mut first = CfCalc::new(pcf.clone());
    first.advance_by(30);
    let checkpoint = CalcData::from_slice(&first.data().to_vec()).unwrap();

    let mut resumed = CfCalc::resume(pcf, checkpoint, first.iteration(), first.log_reduction());
    resumed.advance_by(970);

    assert_eq!(resumed.iteration(), 1000);
    assert_eq!(resumed.data(), whole.data());
}

#[test]
fn test_reduce_keeps_value() {
    // a(n) = -n^2, b(n) = 3n + 1: continuants share large factorial factors
    let mut calc = CfCalc::new(Pcf::from_coefficients(&[-1, 0, 0], &[3, 1]).unwrap());
    calc.advance_by(300);
    let before = calc.value();
    let precision_before = calc.precision();

    let factor = calc.reduce();
    assert!(factor > BigInt::from(1));
    assert_eq!(calc.value(), before);
    assert_eq!(calc.precision(), precision_before);
}

#[test]
fn test_degree() {
    assert_eq!(degree(&ints(&[1, 2, 3, 4])).unwrap(), 3);
    assert_eq!(degree(&ints(&[3])).unwrap(), 0);
    assert_eq!(degree(&ints(&[0, 0, 1, 2])).unwrap(), 1);
    assert!(degree(&[]).is_err());
}

fn coefficients() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-5i64..=5, 1..=3).prop_filter("needs a non-zero coefficient", |c| c.iter().any(|&x| x != 0))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_resumption_matches_single_run(a in coefficients(), b in coefficients(), split in 0u64..120) {
        let pcf = Pcf::from_coefficients(&a, &b).unwrap();
        let mut whole = CfCalc::new(pcf.clone());
        whole.advance_by(120);

        let mut head = CfCalc::new(pcf.clone());
        head.advance_by(split);
        let mut tail = CfCalc::resume(pcf, head.data().clone(), head.iteration(), head.log_reduction());
        tail.advance_by(120 - split);

        prop_assert_eq!(tail.data(), whole.data());
    }

    #[test]
    fn prop_reduce_is_invisible(a in coefficients(), b in coefficients(), steps in 1u64..150) {
        let mut calc = CfCalc::new(Pcf::from_coefficients(&a, &b).unwrap());
        calc.advance_by(steps);
        let value = calc.value();
        let precision = calc.precision();
        let unreduced = calc.data().clone();

        let factor = calc.reduce();
        prop_assert_eq!(calc.value(), value);
        prop_assert_eq!(calc.precision(), precision);
        prop_assert_eq!(&calc.data().b1 * &factor, unreduced.b1.clone());
        prop_assert!(!calc.reduction().is_negative());
    }
}
