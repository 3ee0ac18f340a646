// src/relation_search/monomials.rs

use crate::integer_math::combinatorics::Combinatorics;
use crate::numeric::real::Real;

/// Monomials over `variables` values with total degree at most `poly_degree` and no exponent
/// above `inner_degree`.
///
/// Ordered by total degree, then lexicographically by the multiset of variable indices, so
/// with two variables and degree (2, 1) the basis is 1, x, y, xy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonomialBasis {
    variables: usize,
    poly_degree: usize,
    inner_degree: usize,
    exponents: Vec<Vec<usize>>,
}

impl MonomialBasis {
    pub fn new(variables: usize, poly_degree: usize, inner_degree: usize) -> Self {
        let mut exponents = Vec::new();
        for total in 0..=poly_degree {
            for indices in Combinatorics::combinations_with_replacement(variables, total) {
                let mut powers = vec![0usize; variables];
                for index in indices {
                    powers[index] += 1;
                }
                if powers.iter().all(|&p| p <= inner_degree) {
                    exponents.push(powers);
                }
            }
        }
        MonomialBasis {
            variables,
            poly_degree,
            inner_degree,
            exponents,
        }
    }

    /// A total degree above variables * inner_degree adds no monomials, clamp it.
    pub fn effective_degree(variables: usize, degree: (usize, usize)) -> (usize, usize) {
        let (poly_degree, inner_degree) = degree;
        (poly_degree.min(variables * inner_degree), inner_degree)
    }

    pub fn variables(&self) -> usize {
        self.variables
    }

    pub fn degree(&self) -> (usize, usize) {
        (self.poly_degree, self.inner_degree)
    }

    pub fn exponents(&self) -> &[Vec<usize>] {
        &self.exponents
    }

    pub fn len(&self) -> usize {
        self.exponents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exponents.is_empty()
    }

    /// Each monomial evaluated at `values`, all at the precision of `bits`.
    pub fn evaluate(&self, values: &[Real], bits: u32) -> Vec<Real> {
        self.exponents
            .iter()
            .map(|powers| {
                values
                    .iter()
                    .zip(powers)
                    .filter(|&(_, &power)| power > 0)
                    .fold(Real::one(bits), |product, (value, &power)| &product * &value.pow(power as u32))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::BigInt;

    #[test]
    fn test_bilinear_basis() {
        let basis = MonomialBasis::new(2, 2, 1);
        assert_eq!(basis.exponents(), &[vec![0, 0], vec![1, 0], vec![0, 1], vec![1, 1]]);
    }

    #[test]
    fn test_four_variable_count() {
        // 1 + 4 + 6 + 4 square-free monomials up to degree 3
        assert_eq!(MonomialBasis::new(4, 3, 1).len(), 15);
        assert_eq!(MonomialBasis::new(1, 2, 2).exponents(), &[vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_effective_degree() {
        assert_eq!(MonomialBasis::effective_degree(2, (3, 1)), (2, 1));
        assert_eq!(MonomialBasis::effective_degree(2, (2, 1)), (2, 1));
    }

    #[test]
    fn test_evaluate() {
        let bits = 64;
        let basis = MonomialBasis::new(2, 2, 1);
        let values = [Real::from_i64(3, bits), Real::from_i64(5, bits)];
        let evaluated: Vec<BigInt> = basis.evaluate(&values, bits).iter().map(|r| r.round()).collect();
        assert_eq!(evaluated, [1, 3, 5, 15].iter().map(|&v| BigInt::from(v)).collect::<Vec<_>>());
    }
}
