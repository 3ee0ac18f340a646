// src/core/store.rs

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::core::constant::{Constant, ConstantId, ConstantKind};
use crate::core::convergence::Convergence;
use crate::core::serialization::{load, save};
use crate::error::Result;
use crate::relation_search::relation::Relation;

/// Where constants and relations live between job runs.
pub trait ConstantStore {
    fn constants(&self) -> Vec<Constant>;

    fn constant(&self, id: ConstantId) -> Option<Constant>;

    /// Up to `limit` continued fractions without a value whose degrees pass the ratio filter.
    /// Fractions already found to have a zero denominator continuant are left out.
    fn pending_pcfs(&self, limit: usize, num_denom_factor: i64, strict: bool) -> Vec<Constant>;

    /// Adds a constant under a fresh id.
    fn insert(&mut self, value: Option<String>, precision: Option<u32>, kind: ConstantKind) -> ConstantId;

    /// Replaces the stored constant with the same id. Returns false for an unknown id.
    fn update_constant(&mut self, constant: Constant) -> bool;

    fn relations(&self) -> Vec<Relation>;

    fn add_relations(&mut self, relations: Vec<Relation>);
}

/// In-memory store, persisted as a single JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    next_id: u64,
    /// Sorted by id.
    constants: Vec<Constant>,
    relations: Vec<Relation>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store: MemoryStore = load::generic(path.as_ref())?;
        info!(
            "Loaded {} constants and {} relations from {}",
            store.constants.len(),
            store.relations.len(),
            path.as_ref().display()
        );
        Ok(store)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save::object(self, path)
    }

    fn position(&self, id: ConstantId) -> std::result::Result<usize, usize> {
        self.constants.binary_search_by_key(&id, |c| c.id)
    }
}

impl ConstantStore for MemoryStore {
    fn constants(&self) -> Vec<Constant> {
        self.constants.clone()
    }

    fn constant(&self, id: ConstantId) -> Option<Constant> {
        self.position(id).ok().map(|index| self.constants[index].clone())
    }

    fn pending_pcfs(&self, limit: usize, num_denom_factor: i64, strict: bool) -> Vec<Constant> {
        self.constants
            .iter()
            .filter(|c| c.value.is_none())
            .filter(|c| c.convergence() != Some(Convergence::ZeroDenom))
            .filter(|c| {
                c.as_pcf()
                    .map(|pcf| pcf.matches_degree_ratio(num_denom_factor, strict))
                    .unwrap_or(false)
            })
            .take(limit)
            .cloned()
            .collect()
    }

    fn insert(&mut self, value: Option<String>, precision: Option<u32>, kind: ConstantKind) -> ConstantId {
        self.next_id += 1;
        let id = ConstantId(self.next_id);
        self.constants.push(Constant {
            id,
            value,
            precision,
            kind,
        });
        debug!("Inserted constant {}", id);
        id
    }

    fn update_constant(&mut self, constant: Constant) -> bool {
        match self.position(constant.id) {
            Ok(index) => {
                self.constants[index] = constant;
                true
            }
            Err(_) => false,
        }
    }

    fn relations(&self) -> Vec<Relation> {
        self.relations.clone()
    }

    fn add_relations(&mut self, relations: Vec<Relation>) {
        for relation in relations {
            if self.relations.iter().any(|existing| existing.same_relation(&relation)) {
                debug!("Skipping duplicate relation {}", relation);
                continue;
            }
            self.relations.push(relation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pcf::Pcf;
    use crate::numeric::named::NamedConstant;
    use crate::numeric::precision::Precision;

    fn pcf_kind(a: &[i64], b: &[i64]) -> ConstantKind {
        Constant::pcf(ConstantId(0), Pcf::from_coefficients(a, b).unwrap()).kind
    }

    #[test]
    fn test_insert_and_update() {
        let mut store = MemoryStore::new();
        let first = store.insert(None, None, pcf_kind(&[1], &[1]));
        let second = store.insert(None, None, pcf_kind(&[-1, 0, 0], &[2, 1]));
        assert!(first < second);

        let mut constant = store.constant(second).unwrap();
        constant.value = Some("1.5".to_string());
        constant.precision = Some(60);
        assert!(store.update_constant(constant));
        assert_eq!(store.constant(second).unwrap().precision, Some(60));

        let missing = Constant::pcf(ConstantId(99), Pcf::from_coefficients(&[1], &[1]).unwrap());
        assert!(!store.update_constant(missing));
    }

    #[test]
    fn test_pending_filter() {
        let mut store = MemoryStore::new();
        let named = Constant::named(ConstantId(0), NamedConstant::Pi, Precision::from_digits(20));
        store.insert(named.value, named.precision, named.kind);
        let balanced = store.insert(None, None, pcf_kind(&[-1, 0, 0], &[2, 1]));
        store.insert(None, None, pcf_kind(&[1], &[1, 1]));

        let pending = store.pending_pcfs(10, 2, true);
        assert_eq!(pending.iter().map(|c| c.id).collect::<Vec<_>>(), vec![balanced]);
        assert_eq!(store.pending_pcfs(10, 0, true).len(), 2);
        assert_eq!(store.pending_pcfs(1, 0, true).len(), 1);
    }

    #[test]
    fn test_pending_skips_zero_denominator() {
        let mut store = MemoryStore::new();
        let zero = store.insert(None, None, pcf_kind(&[1], &[1, -1]));
        let golden = store.insert(None, None, pcf_kind(&[1], &[1]));

        let mut constant = store.constant(zero).unwrap();
        if let ConstantKind::PcfCanonical { convergence, .. } = &mut constant.kind {
            *convergence = Some(Convergence::ZeroDenom);
        }
        constant.precision = Some(0);
        assert!(store.update_constant(constant));

        let pending = store.pending_pcfs(1, 0, true);
        assert_eq!(pending.iter().map(|c| c.id).collect::<Vec<_>>(), vec![golden]);
    }
}
