// src/jobs/poly_pslq.rs
//
// Scans subsets of named constants and continued fractions for polynomial relations.
//
// A subset of v constants is searched at degree (polydegree, innerdegree): every monomial of
// total degree at most polydegree in which no constant appears with an exponent above
// innerdegree. Degree (2, 1) over one named constant and one fraction is the classic Möbius
// search a + b x + c y + d x y = 0.

use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::HashMap;
use crate::config::{PslqConfig, SearchConfig};
use crate::core::constant::{Constant, ConstantId};
use crate::core::convergence::Convergence;
use crate::core::store::ConstantStore;
use crate::error::Result;
use crate::integer_math::combinatorics::Combinatorics;
use crate::jobs::partition;
use crate::relation_search::compression::compress_relation;
use crate::relation_search::monomials::MonomialBasis;
use crate::relation_search::null_vector::{working_precision, NullVectorSearch};
use crate::relation_search::relation::Relation;

/// Named constants with a value, artificial ones only when allowed.
pub fn named_candidates(constants: &[Constant], use_artificial: bool) -> Vec<Constant> {
    constants
        .iter()
        .filter(|c| c.is_named() && c.value.is_some())
        .filter(|c| use_artificial || !c.is_artificial())
        .cloned()
        .collect()
}

/// Evaluated continued fractions precise enough to search and not rational.
pub fn pcf_candidates(constants: &[Constant], config: &SearchConfig) -> Vec<Constant> {
    constants
        .iter()
        .filter(|c| c.as_pcf().is_some() && c.value.is_some())
        .filter(|c| c.precision.unwrap_or(0) > config.pslq.min_working_digits)
        .filter(|c| c.convergence() != Some(Convergence::Rational))
        .take(config.jobs.bulk)
        .cloned()
        .collect()
}

/// Runs the polynomial search over `constants`, which must be in ascending id order.
pub fn check_consts(constants: &[Constant], basis: &MonomialBasis, config: &PslqConfig) -> Result<Option<Relation>> {
    let ids: Vec<ConstantId> = constants.iter().map(|c| c.id).collect();
    info!("checking consts: {:?}", ids.iter().map(|id| id.0).collect::<Vec<_>>());

    let precisions: Vec<u32> = constants.iter().map(|c| c.precision.unwrap_or(0)).collect();
    let precision = working_precision(&precisions, config)?;
    let search = NullVectorSearch::from_config(precision, config);

    let mut values = Vec::with_capacity(constants.len());
    for constant in constants {
        match constant.real_value(search.bits())? {
            Some(value) => values.push(value),
            None => return Ok(None),
        }
    }

    Ok(search
        .polynomial(&values, basis)?
        .map(|coefficients| compress_relation(&coefficients, &ids, basis)))
}

/// Searches every subset built from `named` and the continued fractions of one partition.
/// Subsets answered by a relation in `existing`, or one found earlier in the run, are skipped.
pub fn execute(pcfs: &[Constant], named: &[Constant], existing: &[Relation], config: &SearchConfig) -> Vec<Relation> {
    let jobs = &config.jobs;
    let degree = (jobs.poly_degree, jobs.inner_degree);
    let named_subsets = Combinatorics::subsets(named, jobs.named_count, jobs.named_strict);
    let pcf_subsets = Combinatorics::subsets(pcfs, jobs.pcf_count, jobs.pcf_strict);
    info!(
        "checking against {} named and {} continued fraction constants at a time, using degree-{:?} relations",
        jobs.named_count, jobs.pcf_count, degree
    );

    let mut bases: HashMap<usize, MonomialBasis> = HashMap::new();
    let mut relations: Vec<Relation> = Vec::new();

    for pair in Combinatorics::cartesian_product(&[named_subsets, pcf_subsets]) {
        let mut subset: Vec<Constant> = pair.concat();
        if subset.is_empty() {
            continue;
        }
        subset.sort_by_key(|c| c.id);
        let ids: Vec<ConstantId> = subset.iter().map(|c| c.id).collect();

        let effective = MonomialBasis::effective_degree(subset.len(), degree);
        let covered = existing
            .iter()
            .chain(relations.iter())
            .any(|r| r.covers(&ids, effective));
        if covered {
            debug!("{:?} already covered by a known relation", ids);
            continue;
        }

        let basis = bases.entry(subset.len()).or_insert_with(|| {
            if effective != degree {
                info!("redundant degree detected! reducing to {:?} for {} constants", effective, subset.len());
            }
            MonomialBasis::new(subset.len(), effective.0, effective.1)
        });

        match check_consts(&subset, basis, &config.pslq) {
            Ok(Some(relation)) => {
                info!("found {}", relation);
                relations.push(relation);
            }
            Ok(None) => {}
            Err(err) if err.is_recoverable() => debug!("skipping {:?}: {}", ids, err),
            Err(err) => warn!("failed to check {:?}: {}", ids, err),
        }
    }

    info!("finished - found {} results", relations.len());
    relations
}

/// Partitions the continued fraction candidates across a worker pool, merges the relations
/// found and adds them to the store.
pub fn run<S: ConstantStore>(store: &mut S, config: &SearchConfig) -> Result<Vec<Relation>> {
    let constants = store.constants();
    let named = named_candidates(&constants, config.jobs.use_artificial);
    let pcfs = pcf_candidates(&constants, config);
    let existing = store.relations();
    info!("size of batch is {} continued fractions, {} named constants", pcfs.len(), named.len());

    let threads = config.thread_count();
    let partitions = if config.jobs.pcf_count == 0 {
        vec![Vec::new()]
    } else {
        partition::split(&pcfs, threads)
    };
    let pool = partition::thread_pool(threads)?;
    let found: Vec<Vec<Relation>> = pool.install(|| {
        partitions
            .par_iter()
            .map(|part| execute(part, &named, &existing, config))
            .collect()
    });

    let mut relations: Vec<Relation> = Vec::new();
    for relation in found.into_iter().flatten() {
        if !relations.iter().any(|r| r.same_relation(&relation)) {
            relations.push(relation);
        }
    }
    store.add_relations(relations.clone());
    info!("In total found {} relations", relations.len());
    Ok(relations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pcf::Pcf;
    use crate::numeric::named::NamedConstant;
    use crate::numeric::precision::Precision;

    #[test]
    fn test_candidates() {
        let precision = Precision::from_digits(30);
        let pi = Constant::named(ConstantId(1), NamedConstant::Pi, precision);
        let sqrt2 = Constant::named(ConstantId(2), NamedConstant::Sqrt2, precision);
        let pending = Constant::pcf(ConstantId(3), Pcf::from_coefficients(&[1], &[1]).unwrap());
        let constants = vec![pi, sqrt2, pending];

        let named: Vec<ConstantId> = named_candidates(&constants, false).iter().map(|c| c.id).collect();
        assert_eq!(named, vec![ConstantId(1)]);
        assert_eq!(named_candidates(&constants, true).len(), 2);
        assert!(pcf_candidates(&constants, &SearchConfig::default()).is_empty());
    }
}
