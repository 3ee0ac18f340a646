// src/jobs/const_cf.rs
//
// Möbius searches between one continued fraction and named constants:
// (a M + b) / (c M + d) = cf for one constant M, and the linear fractional form over several.

use log::{debug, info, warn};
use num::BigInt;
use rayon::prelude::*;
use crate::config::SearchConfig;
use crate::core::constant::{Constant, ConstantId, ConstantKind};
use crate::core::convergence::Convergence;
use crate::core::store::ConstantStore;
use crate::error::Result;
use crate::integer_math::combinatorics::Combinatorics;
use crate::jobs::partition;
use crate::jobs::poly_pslq::named_candidates;
use crate::numeric::real::Real;
use crate::relation_search::null_vector::{working_precision, NullVectorSearch};
use crate::relation_search::relation::{Relation, RelationKind};

/// (a M + b) / (c M + d) = cf. A constant equal to 1 adds nothing to the transform.
pub fn check_cf_to_const(cf: &Real, constant: &Real, search: &NullVectorSearch) -> Result<Option<Vec<BigInt>>> {
    if constant.is_one() {
        return Ok(None);
    }
    let result = search.mobius(constant, cf)?;
    if result.is_some() {
        info!("Found connection");
    }
    Ok(result)
}

/// The multi-constant form. Skipped when 1 is among the constants.
pub fn check_cf_to_consts(cf: &Real, constants: &[Real], search: &NullVectorSearch) -> Result<Option<Vec<BigInt>>> {
    if constants.iter().any(|c| c.is_one()) {
        return Ok(None);
    }
    let result = search.linear(constants, cf)?;
    if result.is_some() {
        info!("Found connection");
    }
    Ok(result)
}

/// The continued fraction's value at `bits`, taken from its checkpoint when it has one.
pub fn cf_value(constant: &Constant, bits: u32) -> Result<Option<Real>> {
    if let ConstantKind::PcfCanonical { last_matrix: Some(data), .. } = &constant.kind {
        if let Some(value) = Real::from_ratio(&data.a1, &data.b1, bits) {
            return Ok(Some(value));
        }
    }
    constant.real_value(bits)
}

/// Tries every `count` sized combination of `named` against one continued fraction.
pub fn check_cf(cf: &Constant, named: &[Constant], count: usize, config: &SearchConfig) -> Vec<Relation> {
    info!("checking cf: {}", cf.label());
    let kind = if count == 1 { RelationKind::CfConst } else { RelationKind::CfMultiConst };
    let mut relations = Vec::new();

    for mut consts in Combinatorics::subsets(named, count, true) {
        consts.sort_by_key(|c| c.id);
        let ids: Vec<ConstantId> = consts.iter().map(|c| c.id).collect();
        debug!("checking consts {:?} with cf {}", ids, cf.id);

        let mut precisions: Vec<u32> = consts.iter().map(|c| c.precision.unwrap_or(0)).collect();
        precisions.push(cf.precision.unwrap_or(0));

        let found = working_precision(&precisions, &config.pslq).and_then(|precision| {
            let search = NullVectorSearch::from_config(precision, &config.pslq);
            let bits = search.bits();
            let cf_real = match cf_value(cf, bits)? {
                Some(value) => value,
                None => return Ok(None),
            };
            let mut values = Vec::with_capacity(consts.len());
            for constant in &consts {
                match constant.real_value(bits)? {
                    Some(value) => values.push(value),
                    None => return Ok(None),
                }
            }
            if count == 1 {
                check_cf_to_const(&cf_real, &values[0], &search)
            } else {
                check_cf_to_consts(&cf_real, &values, &search)
            }
        });

        match found {
            Ok(Some(coefficients)) => {
                if !relations.is_empty() {
                    warn!("found connection to multiple constants. cf: {}", cf.id);
                }
                let mut participants = ids;
                participants.push(cf.id);
                relations.push(Relation::new(kind, (2, 1), coefficients, participants));
            }
            Ok(None) => {}
            Err(err) if err.is_recoverable() => debug!("skipping {:?} with cf {}: {}", ids, cf.id, err),
            Err(err) => warn!("failed to check {:?} with cf {}: {}", ids, cf.id, err),
        }
    }
    relations
}

/// Checks up to `jobs.bulk` evaluated continued fractions that pass the degree ratio filter
/// against `jobs.named_count` named constants at a time.
pub fn run<S: ConstantStore>(store: &mut S, config: &SearchConfig) -> Result<Vec<Relation>> {
    let jobs = &config.jobs;
    let constants = store.constants();
    let named = named_candidates(&constants, jobs.use_artificial);
    let cfs: Vec<Constant> = constants
        .iter()
        .filter(|c| {
            c.as_pcf()
                .map(|pcf| pcf.matches_degree_ratio(jobs.num_denom_factor, jobs.num_denom_strict))
                .unwrap_or(false)
        })
        .filter(|c| c.precision.unwrap_or(0) > config.pslq.min_working_digits)
        .filter(|c| c.convergence() != Some(Convergence::Rational))
        .take(jobs.bulk)
        .cloned()
        .collect();
    info!("checking {} cfs against {} constants at a time", cfs.len(), jobs.named_count);

    let threads = config.thread_count();
    let pool = partition::thread_pool(threads)?;
    let relations: Vec<Relation> = pool.install(|| {
        cfs.par_iter()
            .flat_map_iter(|cf| check_cf(cf, &named, jobs.named_count.max(1), config))
            .collect()
    });

    info!("finished - worked on {} cfs - found {} results", cfs.len(), relations.len());
    store.add_relations(relations.clone());
    Ok(relations)
}
