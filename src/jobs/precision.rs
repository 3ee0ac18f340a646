// src/jobs/precision.rs

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;
use crate::config::{CalculationConfig, SearchConfig};
use crate::core::cf_calc::CfCalc;
use crate::core::constant::{Constant, ConstantKind};
use crate::core::convergence::{classify, classify_resumed, Convergence};
use crate::core::store::ConstantStore;
use crate::error::Result;
use crate::jobs::partition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrecisionType {
    High,
    Low,
    No,
}

/// How many constants of a run fell in each precision class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PrecisionCounts {
    pub high: usize,
    pub low: usize,
    pub no: usize,
}

impl PrecisionCounts {
    pub fn record(&mut self, precision_type: PrecisionType) {
        match precision_type {
            PrecisionType::High => self.high += 1,
            PrecisionType::Low => self.low += 1,
            PrecisionType::No => self.no += 1,
        }
    }

    pub fn merge(mut self, other: PrecisionCounts) -> Self {
        self.high += other.high;
        self.low += other.low;
        self.no += other.no;
        self
    }

    pub fn total(&self) -> usize {
        self.high + self.low + self.no
    }
}

/// Evaluates a continued fraction constant to `config.depth`, resuming from its stored
/// checkpoint when it has one. `None` for a named constant.
pub fn update_pcf(constant: &Constant, config: &CalculationConfig) -> Option<Constant> {
    let (pcf, last_matrix, depth, log_reduction, samples) = match &constant.kind {
        ConstantKind::PcfCanonical { pcf, last_matrix, depth, log_reduction, samples, .. } => {
            (pcf, last_matrix, *depth, *log_reduction, samples)
        }
        ConstantKind::Named { .. } => return None,
    };

    let evaluation = match last_matrix {
        Some(data) => {
            debug!("{} resumes from depth {}", constant.id, depth);
            let mut calc = CfCalc::resume(pcf.clone(), data.clone(), depth, log_reduction);
            classify_resumed(&mut calc, samples.clone(), config)
        }
        None => classify(&mut CfCalc::new(pcf.clone()), config),
    };

    let mut updated = constant.clone();
    updated.value = evaluation.decimal_value(evaluation.precision.min(config.classification_digits));
    updated.precision = Some(evaluation.precision);
    updated.kind = ConstantKind::PcfCanonical {
        pcf: pcf.clone(),
        last_matrix: Some(evaluation.calc_data),
        depth: evaluation.depth,
        convergence: Some(evaluation.convergence),
        log_reduction: evaluation.log_reduction,
        samples: evaluation.samples,
    };
    Some(updated)
}

pub fn precision_type(constant: &Constant, precision_filter: u32) -> PrecisionType {
    if constant.convergence() == Some(Convergence::ZeroDenom) {
        return PrecisionType::No;
    }
    let precision = constant.precision.unwrap_or(0);
    if precision >= precision_filter {
        debug!("constant {} has high precision: {}", constant.id, precision);
        PrecisionType::High
    } else {
        debug!("constant {} has low precision: {}", constant.id, precision);
        PrecisionType::Low
    }
}

/// Evaluates one partition. Named constants in it are passed over.
pub fn execute(constants: &[Constant], config: &SearchConfig) -> (Vec<Constant>, PrecisionCounts) {
    let mut updated = Vec::with_capacity(constants.len());
    let mut counts = PrecisionCounts::default();

    for constant in constants {
        debug!("calculating for {}", constant.id);
        if constant.value.is_some() {
            debug!("{} has old value", constant.id);
        }
        let start = Instant::now();
        match update_pcf(constant, &config.calculation) {
            Some(result) => {
                debug!("calculation of {} took {:?}", constant.id, start.elapsed());
                counts.record(precision_type(&result, config.jobs.precision_filter));
                updated.push(result);
            }
            None => warn!("{} is not a continued fraction, skipping", constant.label()),
        }
    }

    info!("Done calculation of {} constants", updated.len());
    (updated, counts)
}

/// Evaluates up to `jobs.bulk` pending continued fractions on a worker pool and writes the
/// results back to the store.
pub fn run<S: ConstantStore>(store: &mut S, config: &SearchConfig) -> Result<PrecisionCounts> {
    let pending = store.pending_pcfs(config.jobs.bulk, config.jobs.num_denom_factor, config.jobs.num_denom_strict);
    info!("starting to calculate precision for {} cfs", pending.len());

    let threads = config.thread_count();
    let pool = partition::thread_pool(threads)?;
    let partitions = partition::split(&pending, threads);
    let results: Vec<(Vec<Constant>, PrecisionCounts)> =
        pool.install(|| partitions.par_iter().map(|part| execute(part, config)).collect());

    let mut counts = PrecisionCounts::default();
    for (updated, part_counts) in results {
        for constant in updated {
            if !store.update_constant(constant) {
                warn!("constant vanished from the store while it was evaluated");
            }
        }
        counts = counts.merge(part_counts);
    }

    info!(
        "calculated precision for {} consts, high: {}, low: {}, none: {}",
        counts.total(),
        counts.high,
        counts.low,
        counts.no
    );
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constant::ConstantId;
    use crate::core::pcf::Pcf;

    fn small_config() -> CalculationConfig {
        CalculationConfig {
            depth: 400,
            classification_digits: 300,
            ..CalculationConfig::default()
        }
    }

    #[test]
    fn test_update_pcf_stores_checkpoint() {
        let constant = Constant::pcf(ConstantId(1), Pcf::from_coefficients(&[1], &[1]).unwrap());
        let updated = update_pcf(&constant, &small_config()).unwrap();

        assert!(updated.value.as_deref().unwrap().starts_with("1.6180339887"));
        assert!(updated.precision.unwrap() > 150);
        match &updated.kind {
            ConstantKind::PcfCanonical { last_matrix, depth, convergence, .. } => {
                assert!(last_matrix.is_some());
                assert_eq!(*depth, 400);
                assert!(convergence.is_some());
            }
            ConstantKind::Named { .. } => panic!("expected a continued fraction"),
        }
        assert_eq!(precision_type(&updated, 50), PrecisionType::High);
    }

    #[test]
    fn test_resume_matches_fresh_run() {
        let full = CalculationConfig { depth: 1200, ..small_config() };
        let halfway = CalculationConfig { depth: 170, ..small_config() };
        // 4/pi, then two fractions whose class depends on the samples taken before depth 170
        for (a, b) in [(vec![1i64, 0, 0], vec![2i64, 1]), (vec![-2, -1, 0], vec![2, 0]), (vec![-2, 0, 0], vec![1, 0])] {
            let pcf = Pcf::from_coefficients(&a, &b).unwrap();
            let fresh = update_pcf(&Constant::pcf(ConstantId(1), pcf.clone()), &full).unwrap();

            let partial = update_pcf(&Constant::pcf(ConstantId(1), pcf), &halfway).unwrap();
            // through the stored form, as between two job runs
            let stored: Constant = serde_json::from_str(&serde_json::to_string(&partial).unwrap()).unwrap();
            let resumed = update_pcf(&stored, &full).unwrap();

            assert_eq!(resumed.value, fresh.value);
            assert_eq!(resumed.precision, fresh.precision);
            assert_eq!(resumed.convergence(), fresh.convergence());
            assert_eq!(resumed.kind, fresh.kind);
        }
    }

    #[test]
    fn test_zero_denominator_has_no_precision() {
        let pcf = Pcf::from_coefficients(&[1], &[1, -1]).unwrap();
        let config = CalculationConfig { depth: 1, ..small_config() };
        let updated = update_pcf(&Constant::pcf(ConstantId(2), pcf), &config).unwrap();
        assert_eq!(updated.value, None);
        assert_eq!(updated.precision, Some(0));
        assert_eq!(precision_type(&updated, 50), PrecisionType::No);
    }

    #[test]
    fn test_counts() {
        let mut counts = PrecisionCounts::default();
        counts.record(PrecisionType::High);
        counts.record(PrecisionType::No);
        let merged = counts.merge(PrecisionCounts { high: 0, low: 2, no: 0 });
        assert_eq!(merged, PrecisionCounts { high: 1, low: 2, no: 1 });
        assert_eq!(merged.total(), 4);
    }
}
