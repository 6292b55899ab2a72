use serde::{Deserialize, Serialize};

/// A sparse vector of non-negative term weights.
///
/// Column indices are strictly increasing; `values[k]` is the weight of
/// column `indices[k]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SparseVector {
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl SparseVector {
    #[inline]
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build from unordered `(column, weight)` pairs.
    ///
    /// Pairs are sorted by column, duplicate columns summed, and zero weights
    /// dropped.
    #[must_use]
    pub fn from_pairs(mut pairs: Vec<(u32, f32)>) -> Self {
        pairs.sort_unstable_by_key(|&(col, _)| col);

        let mut indices: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f32> = Vec::with_capacity(pairs.len());
        for (col, weight) in pairs {
            if indices.last() == Some(&col) {
                if let Some(last) = values.last_mut() {
                    *last += weight;
                }
            } else {
                indices.push(col);
                values.push(weight);
            }
        }

        let mut v = Self { indices, values };
        v.prune();
        v
    }

    fn prune(&mut self) {
        if self.values.iter().all(|&w| w != 0.0) {
            return;
        }
        let (indices, values) = self
            .indices
            .iter()
            .zip(self.values.iter())
            .filter(|(_, &w)| w != 0.0)
            .map(|(&i, &w)| (i, w))
            .unzip();
        self.indices = indices;
        self.values = values;
    }

    /// Number of stored (non-zero) entries
    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    pub fn get(&self, column: u32) -> f32 {
        self.indices
            .binary_search(&column)
            .map(|k| self.values[k])
            .unwrap_or(0.0)
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        self.values.iter().map(|w| w * w).sum::<f32>().sqrt()
    }

    /// Dot product by merging the two sorted index lists
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut a, mut b) = (0, 0);
        let mut sum = 0.0;
        while a < self.indices.len() && b < other.indices.len() {
            match self.indices[a].cmp(&other.indices[b]) {
                std::cmp::Ordering::Less => a += 1,
                std::cmp::Ordering::Greater => b += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[a] * other.values[b];
                    a += 1;
                    b += 1;
                }
            }
        }
        sum
    }

    /// Cosine similarity; zero when either vector is all-zero
    pub fn cosine_similarity(&self, other: &SparseVector) -> f32 {
        let norm_a = self.norm();
        let norm_b = other.norm();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        self.dot(other) / (norm_a * norm_b)
    }

    /// Normalize the vector to unit L2 length; all-zero vectors stay zero
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > f32::EPSILON {
            let inv_norm = 1.0 / norm;
            for w in &mut self.values {
                *w *= inv_norm;
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut v = self.clone();
        v.normalize();
        v
    }
}
