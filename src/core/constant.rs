// src/core/constant.rs

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use crate::core::calc_data::CalcData;
use crate::core::convergence::Convergence;
use crate::core::pcf::Pcf;
use crate::error::Result;
use crate::numeric::named::NamedConstant;
use crate::numeric::precision::Precision;
use crate::numeric::real::Real;

/// Store assigned identifier. Relations list their participants in ascending id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstantId(pub u64);

impl Display for ConstantId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConstantKind {
    Named {
        name: String,
        description: String,
        artificial: bool,
    },
    PcfCanonical {
        pcf: Pcf,
        /// Recurrence state of the last evaluation.
        last_matrix: Option<CalcData>,
        depth: u64,
        convergence: Option<Convergence>,
        /// Log of the reduction applied to `last_matrix`.
        #[serde(default)]
        log_reduction: f64,
        /// Growth rate samples taken up to `depth`.
        #[serde(default)]
        samples: Vec<f64>,
    },
}

/// A number known to some precision: a named constant or a continued fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    pub id: ConstantId,
    /// Decimal expansion, unset until evaluated.
    pub value: Option<String>,
    /// Trusted digits of `value`.
    pub precision: Option<u32>,
    pub kind: ConstantKind,
}

impl Constant {
    /// A named constant evaluated to `precision`.
    pub fn named(id: ConstantId, constant: NamedConstant, precision: Precision) -> Self {
        let value = constant.guarded_value(precision).to_decimal_string(precision.digits());
        Constant {
            id,
            value: Some(value),
            precision: Some(precision.digits()),
            kind: ConstantKind::Named {
                name: constant.name().to_string(),
                description: constant.description().to_string(),
                artificial: constant.is_artificial(),
            },
        }
    }

    /// A continued fraction waiting for its first evaluation.
    pub fn pcf(id: ConstantId, pcf: Pcf) -> Self {
        Constant {
            id,
            value: None,
            precision: None,
            kind: ConstantKind::PcfCanonical {
                pcf,
                last_matrix: None,
                depth: 0,
                convergence: None,
                log_reduction: 0.0,
                samples: Vec::new(),
            },
        }
    }

    pub fn as_pcf(&self) -> Option<&Pcf> {
        match &self.kind {
            ConstantKind::PcfCanonical { pcf, .. } => Some(pcf),
            ConstantKind::Named { .. } => None,
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self.kind, ConstantKind::Named { .. })
    }

    pub fn is_artificial(&self) -> bool {
        matches!(self.kind, ConstantKind::Named { artificial: true, .. })
    }

    pub fn convergence(&self) -> Option<Convergence> {
        match &self.kind {
            ConstantKind::PcfCanonical { convergence, .. } => *convergence,
            ConstantKind::Named { .. } => None,
        }
    }

    /// The stored value parsed at `bits`, `None` while unevaluated.
    pub fn real_value(&self, bits: u32) -> Result<Option<Real>> {
        self.value.as_deref().map(|value| Real::parse(value, bits)).transpose()
    }

    pub fn label(&self) -> String {
        match &self.kind {
            ConstantKind::Named { name, .. } => format!("{} {}", self.id, name),
            ConstantKind::PcfCanonical { pcf, .. } => format!("{} [{}]", self.id, pcf),
        }
    }
}
