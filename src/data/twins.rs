// ============================================================
// Layer 4 — TWINS Parser
// ============================================================
// Twin_data.csv holds one row per infant: 30 covariate columns
// followed by two potential-outcome columns (days until death for
// the lighter / heavier twin, 9999 meaning "survived the first
// year"). Only the potential outcomes are real; the treatment is
// simulated so that it depends on the covariates:
//
//   potential_y[i, k] = 1 if raw[i, 30 + k] < sentinel else 0
//   coef              ~ Uniform[-0.01, 0.01)          [d]
//   propensity        = sigmoid(x · coef + N(0, 0.01)) [n]
//   prob_t            = min(propensity / (2 · mean), 1)
//   t[i]              ~ Bernoulli(prob_t[i])
//   yf[i]             = potential_y[i, t[i]]
//   ycf[i]            = potential_y[i, 1 - t[i]]
//
// Dividing by twice the mean puts the average assignment
// probability at 0.5. Treated and control groups then differ
// systematically in x, which is the selection bias the benchmark
// is meant to contain.
//
// Draw order on the injected generator: d coefficients, then n
// noise values (skipped when noise_std is 0), then n Bernoulli
// draws in row order.
//
// Reference: ndarray-rand crate documentation
//            rand crate documentation (Bernoulli)

use std::path::Path;

use ndarray::{s, Array1, Array2, ArrayView2, Axis, Zip};
use ndarray_rand::rand_distr::{Normal, Uniform};
use ndarray_rand::RandomExt;
use rand::distributions::{Bernoulli, Distribution};
use rand::{Rng, RngCore};

use crate::data::table::read_numeric_table;
use crate::domain::error::DatasetError;
use crate::domain::record::UniformRecord;
use crate::domain::traits::DatasetParser;

/// File name of the TWINS table inside `<root>/TWINS/`
pub const TWINS_FILE: &str = "Twin_data.csv";

/// Covariate columns in the published TWINS table
pub const TWINS_COVARIATES: usize = 30;

/// Raw outcome value meaning "did not die within one year"
pub const MORTALITY_SENTINEL: f64 = 9999.0;

/// Simulated treatment assignment for one TWINS load.
#[derive(Debug, Clone)]
pub struct TreatmentAssignment {
    /// sigmoid(x · coef + noise), before rescaling
    pub propensity: Array1<f64>,
    /// propensity / (2 · mean(propensity)), before clipping
    pub rescaled: Array1<f64>,
    /// rescaled, clipped to at most 1
    pub prob_t: Array1<f64>,
    /// Bernoulli(prob_t) draws
    pub t: Array1<i64>,
}

/// Parser for the TWINS birth-record benchmark.
#[derive(Debug, Clone)]
pub struct TwinsParser {
    covariates: usize,
    sentinel:   f64,
    coef_bound: f64,
    noise_std:  f64,
}

impl Default for TwinsParser {
    fn default() -> Self {
        Self {
            covariates: TWINS_COVARIATES,
            sentinel:   MORTALITY_SENTINEL,
            coef_bound: 0.01,
            noise_std:  0.01,
        }
    }
}

impl TwinsParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Coefficients are drawn from [-bound, bound)
    pub fn with_coef_bound(mut self, bound: f64) -> Self {
        self.coef_bound = bound;
        self
    }

    /// Standard deviation of the score noise; 0 disables it
    pub fn with_noise_std(mut self, std: f64) -> Self {
        self.noise_std = std;
        self
    }

    /// Build a record from an already-read TWINS table.
    pub fn from_table<R: Rng + ?Sized>(
        &self,
        table:  &Array2<f64>,
        source: &Path,
        rng:    &mut R,
    ) -> Result<UniformRecord, DatasetError> {
        let expected = self.covariates + 2;
        if table.ncols() != expected {
            return Err(DatasetError::malformed(
                source,
                format!(
                    "expected {} covariates + 2 potential outcomes ({expected} columns), found {}",
                    self.covariates,
                    table.ncols()
                ),
            ));
        }

        let x           = table.slice(s![.., ..self.covariates]).to_owned();
        let potential_y = binarize_outcomes(table.slice(s![.., self.covariates..]), self.sentinel);

        let assignment = self.simulate_assignment(&x, rng)?;
        let (yf, ycf)  = realize_outcomes(&assignment.t, &potential_y);

        let clipped = assignment.rescaled.iter().filter(|&&p| p > 1.0).count();
        if clipped > 0 {
            tracing::warn!("{} of {} propensities clipped to 1", clipped, x.nrows());
        }

        tracing::info!(
            "TWINS: {} instances, {} treated (mean propensity {:.4}, mean prob_t {:.4})",
            x.nrows(),
            assignment.t.iter().filter(|&&v| v == 1).count(),
            assignment.propensity.mean().unwrap_or(0.0),
            assignment.prob_t.mean().unwrap_or(0.0),
        );

        UniformRecord::new("TWINS", assignment.t, yf, ycf, x)
    }

    /// Draw a covariate-dependent treatment for every row of `x`.
    pub fn simulate_assignment<R: Rng + ?Sized>(
        &self,
        x:   &Array2<f64>,
        rng: &mut R,
    ) -> Result<TreatmentAssignment, DatasetError> {
        let (n, d) = x.dim();
        if n == 0 {
            return Err(DatasetError::InvalidConfig(
                "cannot simulate treatment for an empty table".to_string(),
            ));
        }
        self.check_settings()?;

        let coef  = Array1::random_using(d, Uniform::new(-self.coef_bound, self.coef_bound), rng);
        let mut score = x.dot(&coef);
        if self.noise_std > 0.0 {
            let normal = Normal::new(0.0, self.noise_std)
                .map_err(|e| DatasetError::InvalidConfig(e.to_string()))?;
            score += &Array1::random_using(n, normal, rng);
        }

        let propensity         = score.mapv(sigmoid);
        let (rescaled, prob_t) = assignment_probability(&propensity)?;

        let mut t = Array1::<i64>::zeros(n);
        for (ti, &p) in t.iter_mut().zip(prob_t.iter()) {
            let draw = Bernoulli::new(p).map_err(|_| {
                DatasetError::InvalidConfig(format!("assignment probability {p} is not in [0, 1]"))
            })?;
            *ti = draw.sample(rng) as i64;
        }

        Ok(TreatmentAssignment {
            propensity,
            rescaled,
            prob_t,
            t,
        })
    }

    /// Both bounds must be finite; the coefficient range width too.
    fn check_settings(&self) -> Result<(), DatasetError> {
        let bound = self.coef_bound;
        if !(bound > 0.0 && (2.0 * bound).is_finite()) {
            return Err(DatasetError::InvalidConfig(format!(
                "coef_bound must be positive and finite, got {bound}"
            )));
        }
        if !(self.noise_std >= 0.0 && self.noise_std.is_finite()) {
            return Err(DatasetError::InvalidConfig(format!(
                "noise_std must be finite and >= 0, got {}",
                self.noise_std
            )));
        }
        Ok(())
    }
}

impl DatasetParser for TwinsParser {
    fn name(&self) -> &'static str {
        "TWINS"
    }

    fn parse(&self, dir: &Path, rng: &mut dyn RngCore) -> Result<UniformRecord, DatasetError> {
        let path  = dir.join(TWINS_FILE);
        let table = read_numeric_table(&path, true)?;
        self.from_table(&table, &path, rng)
    }
}

/// Logistic link
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Rescale propensities to average 0.5, then clip at 1.
///
/// Returns `(rescaled, prob_t)`; only `prob_t` is a valid probability.
/// A NaN propensity, or a mean of 0, leaves nothing to rescale.
pub fn assignment_probability(
    propensity: &Array1<f64>,
) -> Result<(Array1<f64>, Array1<f64>), DatasetError> {
    let mean = propensity.mean().unwrap_or(f64::NAN);
    if !(mean > 0.0 && mean.is_finite()) {
        return Err(DatasetError::NonFinite(format!(
            "mean propensity is {mean}; the covariates or score contain NaN or overflow"
        )));
    }

    let rescaled = propensity / (2.0 * mean);
    let prob_t   = rescaled.mapv(|p| p.min(1.0));
    Ok((rescaled, prob_t))
}

/// 1.0 where the raw value is below the sentinel, else 0.0.
pub fn binarize_outcomes(raw: ArrayView2<f64>, sentinel: f64) -> Array2<f64> {
    raw.mapv(|v| if v < sentinel { 1.0 } else { 0.0 })
}

/// Pick the factual and counterfactual column of `potential_y` per row.
pub fn realize_outcomes(t: &Array1<i64>, potential_y: &Array2<f64>) -> (Array1<f64>, Array1<f64>) {
    let y0 = potential_y.index_axis(Axis(1), 0);
    let y1 = potential_y.index_axis(Axis(1), 1);

    let yf = Zip::from(t)
        .and(&y0)
        .and(&y1)
        .map_collect(|&ti, &a, &b| if ti == 1 { b } else { a });
    let ycf = Zip::from(t)
        .and(&y0)
        .and(&y1)
        .map_collect(|&ti, &a, &b| if ti == 1 { a } else { b });

    (yf, ycf)
}
