//! Cosine similarity over unit-normalized sparse rows.
//!
//! Rows produced by the weighting model already have unit length, so cosine
//! similarity is the plain dot product. Products are accumulated through
//! per-column postings in ascending column order, which makes `M[i][j]` and
//! `M[j][i]` the same sum of the same terms: the matrix is exactly symmetric.

use crate::vector::SparseVector;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::cmp::Reverse;

/// Row-aligned item vectors with a column-major posting view
#[derive(Debug, Clone)]
pub struct ItemMatrix {
    rows: Vec<SparseVector>,
    dim: usize,
    /// column -> [(row, weight)] in ascending row order
    postings: Vec<Vec<(u32, f32)>>,
}

impl ItemMatrix {
    pub fn new(rows: Vec<SparseVector>, dim: usize) -> Self {
        let mut postings: Vec<Vec<(u32, f32)>> = vec![Vec::new(); dim];
        for (row, vector) in rows.iter().enumerate() {
            for (column, weight) in vector.iter() {
                if let Some(list) = postings.get_mut(column as usize) {
                    list.push((row as u32, weight));
                }
            }
        }
        Self {
            rows,
            dim,
            postings,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn row(&self, index: usize) -> Option<&SparseVector> {
        self.rows.get(index)
    }

    /// Score one vector against every row, in row order.
    pub fn one_vs_all(&self, query: &SparseVector) -> Vec<f32> {
        let mut scores = vec![0.0f32; self.rows.len()];
        self.accumulate(query, &mut scores);
        for s in &mut scores {
            *s = s.clamp(0.0, 1.0);
        }
        scores
    }

    /// All-pairs cosine similarity.
    pub fn pairwise(&self) -> SimilarityMatrix {
        let n = self.rows.len();
        let mut data = vec![0.0f32; n * n];
        if n > 0 {
            data.par_chunks_mut(n).enumerate().for_each(|(i, out)| {
                self.accumulate(&self.rows[i], out);
                for s in out.iter_mut() {
                    *s = s.clamp(0.0, 1.0);
                }
                out[i] = 1.0;
            });
        }
        SimilarityMatrix { n, data }
    }

    fn accumulate(&self, query: &SparseVector, scores: &mut [f32]) {
        for (column, weight) in query.iter() {
            let Some(list) = self.postings.get(column as usize) else {
                continue;
            };
            for &(row, w) in list {
                scores[row as usize] += weight * w;
            }
        }
    }
}

/// Dense, row-major, square similarity matrix
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f32>,
}

impl SimilarityMatrix {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> Option<&[f32]> {
        (i < self.n).then(|| &self.data[i * self.n..(i + 1) * self.n])
    }
}

/// Top `n` `(row, score)` pairs by descending score.
///
/// The sort is stable, so equal scores keep their row order. `exclude` drops
/// one row (the query item itself for similar-item lookups).
pub fn rank_top_n(scores: &[f32], n: usize, exclude: Option<usize>) -> Vec<(usize, f32)> {
    if n == 0 {
        return Vec::new();
    }
    let mut ranked: Vec<(usize, f32)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|&(row, _)| Some(row) != exclude)
        .collect();
    ranked.sort_by_key(|&(_, score)| Reverse(OrderedFloat(score)));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(pairs: Vec<(u32, f32)>) -> SparseVector {
        SparseVector::from_pairs(pairs).normalized()
    }

    fn matrix() -> ItemMatrix {
        ItemMatrix::new(
            vec![
                unit(vec![(0, 1.0), (1, 1.0)]),
                unit(vec![(0, 1.0), (1, 1.0)]),
                unit(vec![(2, 1.0)]),
                unit(vec![(0, 0.3), (2, 0.7), (3, 0.2)]),
            ],
            4,
        )
    }

    #[test]
    fn test_pairwise_properties() {
        let sim = matrix().pairwise();
        assert_eq!(sim.len(), 4);
        for i in 0..4 {
            assert_eq!(sim.get(i, i), 1.0);
            for j in 0..4 {
                assert_eq!(sim.get(i, j), sim.get(j, i));
                assert!((0.0..=1.0).contains(&sim.get(i, j)));
            }
        }
        assert!((sim.get(0, 1) - 1.0).abs() < 1e-6);
        assert_eq!(sim.get(0, 2), 0.0);
    }

    #[test]
    fn test_pairwise_matches_direct_cosine() {
        let m = matrix();
        let sim = m.pairwise();
        for i in 0..m.len() {
            for j in 0..m.len() {
                if i == j {
                    continue;
                }
                let direct = m.row(i).unwrap().cosine_similarity(m.row(j).unwrap());
                assert!((sim.get(i, j) - direct).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_one_vs_all() {
        let m = matrix();
        let scores = m.one_vs_all(&unit(vec![(2, 1.0)]));
        assert_eq!(scores.len(), 4);
        assert_eq!(scores[0], 0.0);
        assert!((scores[2] - 1.0).abs() < 1e-6);
        assert!(scores[3] > 0.0 && scores[3] < 1.0);

        let none = m.one_vs_all(&SparseVector::zero());
        assert!(none.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_rank_is_stable() {
        let scores = [0.5, 0.9, 0.5, 0.1, 0.9];
        let ranked = rank_top_n(&scores, 4, None);
        let rows: Vec<usize> = ranked.iter().map(|&(r, _)| r).collect();
        assert_eq!(rows, vec![1, 4, 0, 2]);

        let ranked = rank_top_n(&scores, 10, Some(1));
        let rows: Vec<usize> = ranked.iter().map(|&(r, _)| r).collect();
        assert_eq!(rows, vec![4, 0, 2, 3]);

        assert!(rank_top_n(&scores, 0, None).is_empty());
    }

    #[test]
    fn test_empty_matrix() {
        let m = ItemMatrix::new(Vec::new(), 3);
        assert!(m.is_empty());
        assert!(m.pairwise().is_empty());
        assert!(m.one_vs_all(&unit(vec![(0, 1.0)])).is_empty());
    }
}
