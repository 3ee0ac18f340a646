// src/relation_search/relation.rs

use chrono::{DateTime, Utc};
use num::BigInt;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use crate::core::constant::ConstantId;
use crate::core::serialization::bigint_vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    #[serde(rename = "POLYNOMIAL_PSLQ")]
    PolynomialPslq,
    #[serde(rename = "PSLQ_CF_CONST")]
    CfConst,
    #[serde(rename = "PSLQ_CF_MULTI_CONST")]
    CfMultiConst,
}

impl RelationKind {
    pub fn name(self) -> &'static str {
        match self {
            RelationKind::PolynomialPslq => "POLYNOMIAL_PSLQ",
            RelationKind::CfConst => "PSLQ_CF_CONST",
            RelationKind::CfMultiConst => "PSLQ_CF_MULTI_CONST",
        }
    }
}

/// A verified integer relation between stored constants.
///
/// For polynomial relations `coefficients[i]` multiplies the i-th monomial of
/// `MonomialBasis::new(constants.len(), degree.0, degree.1)`. For continued fraction
/// relations the constants come first and the fraction last, and the coefficients are those of
/// the Möbius form (a M + b) / (c M + d) = cf and its multi-constant generalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relation {
    pub kind: RelationKind,
    /// (polydegree, innerdegree)
    pub degree: (usize, usize),
    #[serde(with = "bigint_vec")]
    pub coefficients: Vec<BigInt>,
    pub constants: Vec<ConstantId>,
    pub found_at: DateTime<Utc>,
}

impl Relation {
    pub fn new(kind: RelationKind, degree: (usize, usize), coefficients: Vec<BigInt>, constants: Vec<ConstantId>) -> Self {
        Relation {
            kind,
            degree,
            coefficients,
            constants,
            found_at: Utc::now(),
        }
    }

    /// Whether this relation already answers a search over `subset` at `degree`: every
    /// participant is in the subset and neither degree is larger.
    pub fn covers(&self, subset: &[ConstantId], degree: (usize, usize)) -> bool {
        self.constants.iter().all(|id| subset.contains(id))
            && self.degree.0 <= degree.0
            && self.degree.1 <= degree.1
    }

    /// Equality ignoring when the relation was found.
    pub fn same_relation(&self, other: &Relation) -> bool {
        self.kind == other.kind
            && self.degree == other.degree
            && self.coefficients == other.coefficients
            && self.constants == other.constants
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let coefficients: Vec<String> = self.coefficients.iter().map(|c| c.to_string()).collect();
        let constants: Vec<String> = self.constants.iter().map(|c| c.to_string()).collect();
        write!(
            f,
            "{} degree ({}, {}) [{}] over {}",
            self.kind.name(),
            self.degree.0,
            self.degree.1,
            coefficients.join(", "),
            constants.join(" ")
        )
    }
}
