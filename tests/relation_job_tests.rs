// Batch job tests: evaluate continued fractions in a store, then search them for relations
use env_logger::Env;
use num::BigInt;
use ramanujan::config::SearchConfig;
use ramanujan::core::constant::{Constant, ConstantId, ConstantKind};
use ramanujan::core::convergence::Convergence;
use ramanujan::core::pcf::Pcf;
use ramanujan::core::store::{ConstantStore, MemoryStore};
use ramanujan::error::PcfError;
use ramanujan::jobs::{const_cf, poly_pslq, precision};
use ramanujan::numeric::{NamedConstant, Precision};
use ramanujan::relation_search::monomials::MonomialBasis;
use ramanujan::relation_search::relation::RelationKind;

fn ints(values: &[i64]) -> Vec<BigInt> {
    values.iter().map(|&v| BigInt::from(v)).collect()
}

fn test_config() -> SearchConfig {
    let mut config = SearchConfig::default();
    config.threads = Some(2);
    config.calculation.depth = 300;
    config.jobs.num_denom_factor = 1;
    config
}

fn insert_named<S: ConstantStore>(store: &mut S, constant: NamedConstant, digits: u32) -> ConstantId {
    let named = Constant::named(ConstantId(0), constant, Precision::from_digits(digits));
    store.insert(named.value, named.precision, named.kind)
}

/// e and pi, plus the fraction n / (n + n / (n + ...)) = 1 / (e - 1).
fn seeded_store() -> (MemoryStore, ConstantId, ConstantId) {
    let mut store = MemoryStore::new();
    let e = insert_named(&mut store, NamedConstant::E, 300);
    insert_named(&mut store, NamedConstant::Pi, 300);
    let pcf = Pcf::from_coefficients(&[1, 0], &[1, 0]).unwrap();
    let cf = store.insert(None, None, Constant::pcf(ConstantId(0), pcf).kind);
    (store, e, cf)
}

#[test]
fn test_precision_job_updates_store() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("debug")).is_test(true).try_init();
    let (mut store, _, cf) = seeded_store();
    // deg(a) = 0 against deg(b) = 1 fails the ratio filter and stays pending
    let skipped = store.insert(None, None, Constant::pcf(ConstantId(0), Pcf::from_coefficients(&[1], &[1, 1]).unwrap()).kind);
    let config = test_config();

    let counts = precision::run(&mut store, &config).unwrap();
    assert_eq!(counts.total(), 1);
    assert_eq!(counts.high, 1);

    let evaluated = store.constant(cf).unwrap();
    assert!(evaluated.value.as_deref().unwrap().starts_with("0.581976706869326424385"));
    assert!(evaluated.precision.unwrap() > 600);
    match &evaluated.kind {
        ConstantKind::PcfCanonical { depth, last_matrix, convergence, .. } => {
            assert_eq!(*depth, 300);
            assert!(last_matrix.is_some());
            assert_ne!(*convergence, Some(Convergence::Rational));
        }
        ConstantKind::Named { .. } => panic!("expected a continued fraction"),
    }
    assert!(store.constant(skipped).unwrap().value.is_none());

    // nothing left to do
    assert_eq!(precision::run(&mut store, &config).unwrap().total(), 0);
}

#[test]
fn test_precision_job_moves_past_zero_denominator() {
    let mut store = MemoryStore::new();
    // b(n) = n - 1 vanishes at n = 1
    let zero = store.insert(None, None, Constant::pcf(ConstantId(0), Pcf::from_coefficients(&[1], &[1, -1]).unwrap()).kind);
    let golden = store.insert(None, None, Constant::pcf(ConstantId(0), Pcf::from_coefficients(&[1], &[1]).unwrap()).kind);
    let mut config = test_config();
    config.calculation.depth = 1;
    config.jobs.bulk = 1;
    config.jobs.num_denom_factor = 0;

    let first = precision::run(&mut store, &config).unwrap();
    assert_eq!(first.no, 1);
    assert_eq!(store.constant(zero).unwrap().convergence(), Some(Convergence::ZeroDenom));
    assert!(store.constant(golden).unwrap().value.is_none());

    let second = precision::run(&mut store, &config).unwrap();
    assert_eq!(second.total(), 1);
    assert!(store.constant(golden).unwrap().value.is_some());

    assert_eq!(precision::run(&mut store, &config).unwrap().total(), 0);
    assert!(store.constant(zero).unwrap().value.is_none());
}

#[test]
fn test_poly_job_finds_mobius_relation() {
    let (mut store, e, cf) = seeded_store();
    let config = test_config();
    precision::run(&mut store, &config).unwrap();

    let relations = poly_pslq::run(&mut store, &config).unwrap();
    assert_eq!(relations.len(), 1);
    let relation = &relations[0];
    assert_eq!(relation.kind, RelationKind::PolynomialPslq);
    assert_eq!(relation.constants, vec![e, cf]);
    assert_eq!(relation.degree, (2, 1));
    // 1 + y - x y = 0 for x = e, y = 1 / (e - 1)
    assert_eq!(relation.coefficients, ints(&[1, 0, 1, -1]));
    assert_eq!(store.relations().len(), 1);

    // the stored relation covers the subset on a second pass
    assert!(poly_pslq::run(&mut store, &config).unwrap().is_empty());
    assert_eq!(store.relations().len(), 1);
}

#[test]
fn test_const_cf_job() {
    let (mut store, e, cf) = seeded_store();
    let config = test_config();
    precision::run(&mut store, &config).unwrap();

    let relations = const_cf::run(&mut store, &config).unwrap();
    assert_eq!(relations.len(), 1);
    assert_eq!(relations[0].kind, RelationKind::CfConst);
    assert_eq!(relations[0].constants, vec![e, cf]);
    // (0 e + 1) / (1 e - 1) = cf
    assert_eq!(relations[0].coefficients, ints(&[0, 1, 1, -1]));
}

#[test]
fn test_low_precision_is_skipped() {
    let mut store = MemoryStore::new();
    let pi = insert_named(&mut store, NamedConstant::Pi, 50);
    let catalan = insert_named(&mut store, NamedConstant::Catalan, 300);
    let constants: Vec<Constant> = [pi, catalan].iter().map(|&id| store.constant(id).unwrap()).collect();

    let basis = MonomialBasis::new(2, 2, 1);
    let err = poly_pslq::check_consts(&constants, &basis, &SearchConfig::default().pslq).unwrap_err();
    assert!(err.is_recoverable());
    assert!(matches!(err, PcfError::InsufficientPrecision { working: 45, .. }));
}

#[test]
fn test_store_survives_json() {
    let (mut store, _, cf) = seeded_store();
    precision::run(&mut store, &test_config()).unwrap();

    let path = std::env::temp_dir().join(format!("ramanujan_store_{}.json", std::process::id()));
    store.save(&path).unwrap();
    let loaded = MemoryStore::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.constants(), store.constants());
    assert_eq!(loaded.constant(cf).unwrap().precision, store.constant(cf).unwrap().precision);
}
