// src/core/convergence.rs

use log::debug;
use num::{BigInt, BigRational, Zero};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use crate::config::CalculationConfig;
use crate::core::calc_data::CalcData;
use crate::core::cf_calc::CfCalc;
use crate::error::PcfError;
use crate::integer_math::gcd::GCD;
use crate::numeric::precision::Precision;
use crate::numeric::real::Real;
use crate::relation_search::pslq::Pslq;

/// Guard bits for treating a value as numerically zero.
const ZERO_GUARD_BITS: u32 = 4;

/// How a continued fraction behaved at the depth it was evaluated to. Stored as an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum Convergence {
    ZeroDenom = 0,
    NoFr = 1,
    IndeterminateFr = 2,
    Fr = 3,
    Rational = 4,
}

impl Convergence {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            Convergence::ZeroDenom => "ZERO_DENOM",
            Convergence::NoFr => "NO_FR",
            Convergence::IndeterminateFr => "INDETERMINATE_FR",
            Convergence::Fr => "FR",
            Convergence::Rational => "RATIONAL",
        }
    }
}

impl From<Convergence> for i32 {
    fn from(convergence: Convergence) -> i32 {
        convergence.code()
    }
}

impl TryFrom<i32> for Convergence {
    type Error = PcfError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Convergence::ZeroDenom),
            1 => Ok(Convergence::NoFr),
            2 => Ok(Convergence::IndeterminateFr),
            3 => Ok(Convergence::Fr),
            4 => Ok(Convergence::Rational),
            other => Err(PcfError::InvalidConvergenceCode(other)),
        }
    }
}

impl Display for Convergence {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

/// Growth rate estimate log(gcd(A_n, B_n)) / n + deg(b) (1 - log n) on the unreduced continuants.
///
/// Factorial reduction makes the gcd grow like (n!)^deg(b), so the estimate levels off exactly
/// when the fraction reduces. Every factor taken out by `reduce`, before or after a checkpoint,
/// is folded back in.
pub fn fr_sample(calc: &CfCalc) -> f64 {
    let n = calc.iteration().max(1) as f64;
    let data = calc.data();
    let gcd = GCD::find_gcd_pair(&data.a1, &data.b1);
    let log_gcd = calc.log_reduction() + GCD::ln(&gcd);
    let degree = calc.pcf().b.degree() as f64;
    log_gcd / n + degree * (1.0 - n.ln())
}

/// FR when two consecutive samples are closer than `threshold`, NO_FR when some gap widens
/// compared to the one before it, INDETERMINATE_FR otherwise.
pub fn check_fr(samples: &[f64], threshold: f64) -> Convergence {
    if samples.windows(2).any(|w| (w[1] - w[0]).abs() < threshold) {
        return Convergence::Fr;
    }
    if samples.windows(3).any(|w| (w[1] - w[2]).abs() > (w[0] - w[1]).abs()) {
        return Convergence::NoFr;
    }
    Convergence::IndeterminateFr
}

fn is_almost_zero(value: &Real) -> bool {
    value.almost_eq(&Real::zero(value.bits()), ZERO_GUARD_BITS)
}

/// Whether p / q is rational to the eye of a two term integer relation search at `bits`.
pub fn check_rational(p: &BigInt, q: &BigInt, bits: u32, tolerance_digits: u32) -> bool {
    let value = match Real::from_ratio(p, q, bits) {
        Some(value) => value,
        None => return false,
    };
    if p.is_zero() || is_almost_zero(&value) {
        debug!("checking rational that is too close to 0 p={}, q={}", p, q);
        return true;
    }

    let ten_power = num::pow(BigInt::from(10), tolerance_digits as usize);
    let tolerance = match Real::from_ratio(&BigInt::from(1), &ten_power, bits) {
        Some(tolerance) => tolerance,
        None => return false,
    };
    match Pslq::new(bits).with_tolerance(tolerance).find_relation(&[value, Real::one(bits)]) {
        Ok(relation) => relation.is_some(),
        Err(err) => {
            debug!("rational check skipped: {}", err);
            false
        }
    }
}

/// Classifies a fraction with a non-zero denominator continuant.
pub fn check_convergence(p: &BigInt, q: &BigInt, samples: &[f64], config: &CalculationConfig) -> Convergence {
    let bits = Precision::from_digits(config.classification_digits).bits();
    if check_rational(p, q, bits, config.rational_tolerance_digits) {
        return Convergence::Rational;
    }
    check_fr(samples, config.fr_threshold)
}

/// Result of driving a continued fraction to its target depth.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// A_n / B_n, `None` for a zero denominator continuant.
    pub value: Option<BigRational>,
    /// Trusted decimal digits, 0 for a zero denominator.
    pub precision: u32,
    pub convergence: Convergence,
    /// The value was indistinguishable from zero and was stored as exactly 0.
    pub rounded: bool,
    /// Checkpoint to resume from.
    pub calc_data: CalcData,
    pub depth: u64,
    /// Log of the reduction applied up to `depth`.
    pub log_reduction: f64,
    /// Every growth rate sample taken up to `depth`.
    pub samples: Vec<f64>,
}

impl Evaluation {
    /// The value written out with `digits` decimals.
    pub fn decimal_value(&self, digits: u32) -> Option<String> {
        let bits = Precision::from_digits(digits).bits() + 8;
        self.value
            .as_ref()
            .map(|value| Real::from_rational(value, bits).to_decimal_string(digits))
    }
}

/// Advances `calc` to `config.depth`, sampling the growth rate every `calc_jump` steps and
/// reducing every `reduce_jump` steps, then classifies the result.
///
/// A calculation already at or past the target depth is classified as is.
pub fn classify(calc: &mut CfCalc, config: &CalculationConfig) -> Evaluation {
    classify_resumed(calc, Vec::new(), config)
}

/// Like [`classify`] for a calculation resumed from a checkpoint, `samples` being the ones
/// taken before it. The result matches an uninterrupted run to the same depth.
pub fn classify_resumed(calc: &mut CfCalc, mut samples: Vec<f64>, config: &CalculationConfig) -> Evaluation {
    while calc.iteration() < config.depth {
        calc.advance();
        let n = calc.iteration();
        if config.reduce_jump > 0 && n % config.reduce_jump == 0 {
            calc.reduce();
        }
        if config.calc_jump > 0 && n % config.calc_jump == 0 {
            let sample = fr_sample(calc);
            // A_n = B_n = 0 has no growth rate
            if sample.is_finite() {
                samples.push(sample);
            }
        }
    }

    let precision = match calc.precision() {
        Some(precision) => precision,
        None => {
            debug!("pcf {} has continuant denominator zero", calc.pcf());
            return Evaluation {
                value: None,
                precision: 0,
                convergence: Convergence::ZeroDenom,
                rounded: false,
                calc_data: calc.data().clone(),
                depth: calc.iteration(),
                log_reduction: calc.log_reduction(),
                samples,
            };
        }
    };

    let digits = precision.to_digits(config.infinite_precision).max(0);
    let precision = u32::try_from(digits).unwrap_or(u32::MAX);

    let mut value = calc.value();
    let mut rounded = false;
    let bits = Precision::from_digits(config.classification_digits).bits();
    if let Some(exact) = &value {
        if !exact.is_zero() && is_almost_zero(&Real::from_rational(exact, bits)) {
            debug!("rounding to 0");
            value = Some(BigRational::zero());
            rounded = true;
        }
    }

    let data = calc.data();
    let convergence = check_convergence(&data.a1, &data.b1, &samples, config);

    Evaluation {
        value,
        precision,
        convergence,
        rounded,
        calc_data: data.clone(),
        depth: calc.iteration(),
        log_reduction: calc.log_reduction(),
        samples,
    }
}
