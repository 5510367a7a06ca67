use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};

use super::{FitSummary, estimator_err, r_squared, to_matrix};
use crate::domain::errors::ForecastError;

const N_TREES: usize = 100;
const MAX_DEPTH: u16 = 10;
const MIN_SAMPLES_SPLIT: usize = 5;

type Tree = DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Bagged ensemble of regression trees.
///
/// smartcore's RandomForestRegressor keeps its trees private, so the bagging
/// lives here: each tree fits a bootstrap resample, out-of-bag rows provide
/// the generalization score, and per-tree predictions stay readable so the
/// forecaster can use the ensemble spread as an uncertainty signal.
///
/// Every bootstrap draw derives from the base seed, so a fixed seed gives an
/// identical ensemble regardless of how rayon schedules the tree fits.
pub struct ForestEstimator {
    seed: u64,
    trees: Vec<Tree>,
}

impl ForestEstimator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            trees: Vec::new(),
        }
    }

    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<FitSummary, ForecastError> {
        let n = y.len();
        let samples: Vec<Vec<usize>> = (0..N_TREES)
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(t as u64));
                (0..n).map(|_| rng.random_range(0..n)).collect()
            })
            .collect();

        let trees = samples
            .par_iter()
            .map(|indices| {
                let rows: Vec<Vec<f64>> = indices.iter().map(|&i| x[i].clone()).collect();
                let labels: Vec<f64> = indices.iter().map(|&i| y[i]).collect();
                let matrix = to_matrix(&rows)?;
                DecisionTreeRegressor::fit(
                    &matrix,
                    &labels,
                    DecisionTreeRegressorParameters::default()
                        .with_max_depth(MAX_DEPTH)
                        .with_min_samples_split(MIN_SAMPLES_SPLIT),
                )
                .map_err(estimator_err)
            })
            .collect::<Result<Vec<Tree>, ForecastError>>()?;

        let r2 = out_of_bag_r2(&trees, &samples, x, y)?;
        self.trees = trees;
        Ok(FitSummary { samples: n, r2 })
    }

    /// One prediction per tree for a single feature vector.
    pub fn predict_members(&self, features: &[f64]) -> Result<Vec<f64>, ForecastError> {
        if self.trees.is_empty() {
            return Err(ForecastError::Estimator {
                reason: "forest is not fitted".to_string(),
            });
        }
        let matrix = to_matrix(&[features.to_vec()])?;
        self.trees
            .iter()
            .map(|tree| {
                let out = tree.predict(&matrix).map_err(estimator_err)?;
                out.first()
                    .copied()
                    .ok_or_else(|| ForecastError::Estimator {
                        reason: "tree returned no prediction".to_string(),
                    })
            })
            .collect()
    }
}

/// Each row is scored only by trees whose bootstrap excluded it.
fn out_of_bag_r2(
    trees: &[Tree],
    samples: &[Vec<usize>],
    x: &[Vec<f64>],
    y: &[f64],
) -> Result<f64, ForecastError> {
    let n = y.len();
    let mut in_bag = vec![vec![false; n]; trees.len()];
    for (t, indices) in samples.iter().enumerate() {
        for &i in indices {
            in_bag[t][i] = true;
        }
    }

    let full = to_matrix(x)?;
    let per_tree: Vec<Vec<f64>> = trees
        .iter()
        .map(|tree| tree.predict(&full).map_err(estimator_err))
        .collect::<Result<_, _>>()?;

    let mut oob_actual = Vec::new();
    let mut oob_pred = Vec::new();
    for i in 0..n {
        let votes: Vec<f64> = (0..trees.len())
            .filter(|&t| !in_bag[t][i])
            .map(|t| per_tree[t][i])
            .collect();
        if !votes.is_empty() {
            oob_actual.push(y[i]);
            oob_pred.push(votes.iter().sum::<f64>() / votes.len() as f64);
        }
    }
    Ok(r_squared(&oob_actual, &oob_pred))
}
