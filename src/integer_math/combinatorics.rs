// src/integer_math/combinatorics.rs

pub struct Combinatorics;

impl Combinatorics {
    /// Returns the Cartesian product of two or more lists
    pub fn cartesian_product<T: Clone>(sequences: &[Vec<T>]) -> Vec<Vec<T>> {
        let empty: Vec<Vec<T>> = vec![vec![]];

        sequences.iter().fold(empty, |first, second| {
            first.iter().flat_map(|a| {
                second.iter().map(move |b| {
                    let mut concat = a.clone();
                    concat.push(b.clone());
                    concat
                })
            }).collect()
        })
    }

    /// All `size`-element index combinations of `0..n`, in lexicographic order.
    pub fn combinations(n: usize, size: usize) -> Vec<Vec<usize>> {
        let mut result = Vec::new();
        let mut current = Vec::with_capacity(size);
        Self::extend_combinations(n, size, 0, false, &mut current, &mut result);
        result
    }

    /// All non-decreasing `size`-element index sequences over `0..n`, in lexicographic order.
    pub fn combinations_with_replacement(n: usize, size: usize) -> Vec<Vec<usize>> {
        let mut result = Vec::new();
        let mut current = Vec::with_capacity(size);
        Self::extend_combinations(n, size, 0, true, &mut current, &mut result);
        result
    }

    /// Picks `size` items from `items`, or every size in 1..=size when not strict.
    pub fn subsets<T: Clone>(items: &[T], size: usize, strict: bool) -> Vec<Vec<T>> {
        let sizes: Vec<usize> = if strict { vec![size] } else { (1..=size).collect() };
        sizes
            .into_iter()
            .flat_map(|k| Self::combinations(items.len(), k))
            .map(|indices| indices.into_iter().map(|i| items[i].clone()).collect())
            .collect()
    }

    fn extend_combinations(
        n: usize,
        size: usize,
        start: usize,
        with_replacement: bool,
        current: &mut Vec<usize>,
        result: &mut Vec<Vec<usize>>,
    ) {
        if current.len() == size {
            result.push(current.clone());
            return;
        }
        for i in start..n {
            current.push(i);
            let next = if with_replacement { i } else { i + 1 };
            Self::extend_combinations(n, size, next, with_replacement, current, result);
            current.pop();
        }
    }
}
