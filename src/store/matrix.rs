use crate::error::{AppError, AppResult};

/// Dense, read-only N×N matrix of precomputed similarity scores
///
/// Stored row-major: entry `(i, j)` is the similarity of item `i` to item `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dimension: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Builds a matrix from rows, rejecting non-square input and non-finite scores
    pub fn from_rows(rows: Vec<Vec<f64>>) -> AppResult<Self> {
        let dimension = rows.len();
        let mut scores = Vec::with_capacity(dimension * dimension);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dimension {
                return Err(AppError::ShapeMismatch(format!(
                    "similarity matrix is not square: row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    dimension
                )));
            }
            if let Some(j) = row.iter().position(|score| !score.is_finite()) {
                return Err(AppError::SourceUnavailable(format!(
                    "similarity matrix has a non-finite score at ({}, {})",
                    i, j
                )));
            }
            scores.extend(row);
        }

        Ok(Self { dimension, scores })
    }

    /// Parses a JSON array of rows
    pub fn from_json(bytes: &[u8]) -> AppResult<Self> {
        let rows: Vec<Vec<f64>> = serde_json::from_slice(bytes).map_err(|e| {
            AppError::SourceUnavailable(format!("Failed to parse similarity matrix: {}", e))
        })?;
        Self::from_rows(rows)
    }

    /// Number of rows (and columns)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Scores of every other item against `index`, excluding the self pair
    pub fn peers(&self, index: usize) -> AppResult<impl Iterator<Item = (usize, f64)> + '_> {
        if index >= self.dimension {
            return Err(AppError::InvalidInput(format!(
                "index {} out of range for {} items",
                index, self.dimension
            )));
        }

        let start = index * self.dimension;
        let row = &self.scores[start..start + self.dimension];

        Ok(row
            .iter()
            .copied()
            .enumerate()
            .filter(move |(peer, _)| *peer != index))
    }
}
