// src/relation_search/compression.rs

use log::info;
use num::{BigInt, Zero};
use std::collections::BTreeSet;
use crate::core::constant::ConstantId;
use crate::relation_search::monomials::MonomialBasis;
use crate::relation_search::relation::{Relation, RelationKind};

/// Shrinks `degree` past the all-zero buckets at its top.
///
/// Buckets are indexed 0..=degree. Redundant buckets are walked from the highest down and
/// only a run contiguous with `degree` counts; the new degree sits just below that run.
fn shrink_degree(buckets: &[Vec<usize>], coefficients: &[BigInt], degree: usize) -> usize {
    let redundant: Vec<usize> = buckets
        .iter()
        .enumerate()
        .filter(|(_, indices)| indices.iter().all(|&i| coefficients[i].is_zero()))
        .map(|(d, _)| d)
        .collect();

    let lowest_in_run = redundant
        .iter()
        .rev()
        .enumerate()
        .take_while(|&(i, &d)| i + d == degree)
        .map(|(_, &d)| d)
        .last();

    match lowest_in_run {
        Some(d) => d.saturating_sub(1),
        None => degree,
    }
}

/// Removes what a raw polynomial relation does not use: variables whose every monomial has
/// a zero coefficient, then empty top levels of total degree and of per-variable exponent.
///
/// `constants[v]` is variable v of `basis`, and the result is expressed over the basis of the
/// surviving variables at the shrunk degree.
pub fn compress_relation(coefficients: &[BigInt], constants: &[ConstantId], basis: &MonomialBasis) -> Relation {
    info!("Original relation is {:?}", coefficients.iter().map(|c| c.to_string()).collect::<Vec<_>>());
    let exponents = basis.exponents();
    let mut removed: BTreeSet<usize> = BTreeSet::new();

    let mut surviving = Vec::with_capacity(constants.len());
    for (variable, id) in constants.iter().enumerate() {
        let indices: Vec<usize> = (0..exponents.len()).filter(|&i| exponents[i][variable] > 0).collect();
        if indices.iter().all(|&i| coefficients[i].is_zero()) {
            info!("Removing redundant variable #{}", variable);
            removed.extend(indices);
        } else {
            surviving.push(*id);
        }
    }

    let (poly_degree, inner_degree) = basis.degree();

    let by_total: Vec<Vec<usize>> = (0..=poly_degree)
        .map(|d| (0..exponents.len()).filter(|&i| exponents[i].iter().sum::<usize>() == d).collect())
        .collect();
    let poly_degree_left = shrink_degree(&by_total, coefficients, poly_degree);
    removed.extend(by_total.iter().skip(poly_degree_left + 1).flatten());

    let by_largest: Vec<Vec<usize>> = (0..=inner_degree)
        .map(|d| {
            (0..exponents.len())
                .filter(|&i| exponents[i].iter().copied().max().unwrap_or(0) == d)
                .collect()
        })
        .collect();
    let inner_degree_left = shrink_degree(&by_largest, coefficients, inner_degree);
    removed.extend(by_largest.iter().skip(inner_degree_left + 1).flatten());

    let degree = (poly_degree_left, inner_degree_left);
    info!("True degree is {:?}", degree);

    let compressed: Vec<BigInt> = coefficients
        .iter()
        .enumerate()
        .filter(|(i, _)| !removed.contains(i))
        .map(|(_, c)| c.clone())
        .collect();
    info!("Compressed relation is {:?}", compressed.iter().map(|c| c.to_string()).collect::<Vec<_>>());

    Relation::new(RelationKind::PolynomialPslq, degree, compressed, surviving)
}

/// Compresses a stored polynomial relation. Other kinds come back unchanged.
pub fn compress(relation: &Relation) -> Relation {
    if relation.kind != RelationKind::PolynomialPslq {
        return relation.clone();
    }
    let (poly_degree, inner_degree) = relation.degree;
    let basis = MonomialBasis::new(relation.constants.len(), poly_degree, inner_degree);
    if basis.len() != relation.coefficients.len() {
        return relation.clone();
    }
    let mut compressed = compress_relation(&relation.coefficients, &relation.constants, &basis);
    compressed.found_at = relation.found_at;
    compressed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Vec<BigInt> {
        values.iter().map(|&v| BigInt::from(v)).collect()
    }

    fn ids(values: &[u64]) -> Vec<ConstantId> {
        values.iter().map(|&v| ConstantId(v)).collect()
    }

    #[test]
    fn test_drops_unused_variable() {
        // basis 1, x, y, xy with a relation 2 - x
        let basis = MonomialBasis::new(2, 2, 1);
        let relation = compress_relation(&ints(&[2, -1, 0, 0]), &ids(&[4, 9]), &basis);
        assert_eq!(relation.constants, ids(&[4]));
        assert_eq!(relation.degree, (1, 1));
        assert_eq!(relation.coefficients, ints(&[2, -1]));
    }

    #[test]
    fn test_keeps_interior_zero_degree() {
        // basis 1, x, x^2 with 1 - x^2: the empty degree 1 bucket is interior
        let basis = MonomialBasis::new(1, 2, 2);
        let relation = compress_relation(&ints(&[1, 0, -1]), &ids(&[3]), &basis);
        assert_eq!(relation.degree, (2, 2));
        assert_eq!(relation.coefficients, ints(&[1, 0, -1]));
    }

    #[test]
    fn test_shrinks_contiguous_top_degrees() {
        // basis 1, x, x^2, x^3 with 2 - x
        let basis = MonomialBasis::new(1, 3, 3);
        let relation = compress_relation(&ints(&[2, -1, 0, 0]), &ids(&[5]), &basis);
        assert_eq!(relation.degree, (1, 1));
        assert_eq!(relation.coefficients, ints(&[2, -1]));
    }

    #[test]
    fn test_minimal_relation_unchanged() {
        let basis = MonomialBasis::new(2, 2, 1);
        let minimal = compress_relation(&ints(&[1, -2, 1, 3]), &ids(&[1, 2]), &basis);
        assert_eq!(minimal.coefficients, ints(&[1, -2, 1, 3]));
        let again = compress(&minimal);
        assert!(again.same_relation(&minimal));
        assert_eq!(again.found_at, minimal.found_at);
    }

    #[test]
    fn test_shrink_degree_run() {
        let coefficients = ints(&[1, 0, 0, 0]);
        let buckets = vec![vec![0], vec![1], vec![2], vec![3]];
        assert_eq!(shrink_degree(&buckets, &coefficients, 3), 0);
        let coefficients = ints(&[1, 0, 5, 0]);
        assert_eq!(shrink_degree(&buckets, &coefficients, 3), 2);
    }
}
