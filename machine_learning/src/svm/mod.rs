mod kernel;
mod smo;

pub use kernel::{Gamma, Kernel, KernelSpec};
pub use smo::{BinaryModel, SmoParams};

use ndarray::{ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;

use crate::{MlErr, Result};

/// Iteration cap used when none is configured, same as libsvm's.
const DEFAULT_MAX_ITER: usize = 10_000_000;

/// One binary machine of the one-vs-one scheme, trained on the rows of `pos` and `neg`.
#[derive(Debug, Clone)]
struct Machine {
    pos: usize,
    neg: usize,
    model: BinaryModel,
}

#[derive(Debug, Clone)]
struct Fitted {
    kernel: Kernel,
    classes: Vec<usize>,
    n_features: usize,
    machines: Vec<Machine>,
}

/// C-support vector classifier. More than two classes are handled one-vs-one: a binary machine
/// per pair of classes, the prediction being the class with most votes (the lowest class wins
/// ties).
#[derive(Debug, Clone)]
pub struct Svc {
    c: f64,
    kernel: KernelSpec,
    tol: f64,
    max_iter: Option<usize>,
    fitted: Option<Fitted>,
}

impl Default for Svc {
    fn default() -> Self {
        Self {
            c: 1.0,
            kernel: KernelSpec::default(),
            tol: 1e-3,
            max_iter: None,
            fitted: None,
        }
    }
}

impl Svc {
    /// Creates a new `Svc`.
    ///
    /// # Arguments
    /// * `c` - Box constraint, must be positive.
    /// * `kernel` - The kernel specification.
    /// * `tol` - Stopping tolerance of the solver, must be positive.
    /// * `max_iter` - Iteration cap per binary machine.
    pub fn new(c: f64, kernel: KernelSpec, tol: f64, max_iter: Option<usize>) -> Result<Self> {
        if !(c > 0.0) {
            return Err(MlErr::InvalidSpec(format!("C must be positive, got {c}")));
        }

        if !(tol > 0.0) {
            return Err(MlErr::InvalidSpec(format!("tol must be positive, got {tol}")));
        }

        Ok(Self {
            c,
            kernel,
            tol,
            max_iter,
            fitted: None,
        })
    }

    /// Fits one binary machine per pair of classes.
    ///
    /// # Arguments
    /// * `x` - The training table.
    /// * `y` - The class code of each row.
    pub fn fit(&mut self, x: ArrayView2<f64>, y: &[usize]) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(MlErr::SizeMismatch {
                what: "svc labels",
                got: y.len(),
                expected: x.nrows(),
            });
        }

        let mut classes = y.to_vec();
        classes.sort_unstable();
        classes.dedup();

        if classes.len() < 2 {
            return Err(MlErr::TooFewClasses {
                got: classes.len(),
            });
        }

        let kernel = self.kernel.resolve(x);
        let params = SmoParams {
            c: self.c,
            tol: self.tol,
            max_iter: self
                .max_iter
                .unwrap_or_else(|| DEFAULT_MAX_ITER.max(100 * x.nrows())),
        };

        let pairs: Vec<(usize, usize)> = classes
            .iter()
            .enumerate()
            .flat_map(|(a, &pos)| classes[a + 1..].iter().map(move |&neg| (pos, neg)))
            .collect();

        let machines = pairs
            .into_par_iter()
            .map(|(pos, neg)| {
                let rows: Vec<usize> = (0..y.len())
                    .filter(|&r| y[r] == pos || y[r] == neg)
                    .collect();
                let signs: Vec<f64> = rows
                    .iter()
                    .map(|&r| if y[r] == pos { 1.0 } else { -1.0 })
                    .collect();

                let sub = x.select(Axis(0), &rows);
                let model = smo::solve(sub.view(), &signs, &kernel, params);
                Machine { pos, neg, model }
            })
            .collect();

        self.fitted = Some(Fitted {
            kernel,
            classes,
            n_features: x.ncols(),
            machines,
        });
        Ok(())
    }

    /// Predicts the class code of each row of `x`.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<usize>> {
        let fitted = self.fitted()?;

        if x.ncols() != fitted.n_features {
            return Err(MlErr::SizeMismatch {
                what: "svc input columns",
                got: x.ncols(),
                expected: fitted.n_features,
            });
        }

        Ok(x.rows().into_iter().map(|row| fitted.vote(row)).collect())
    }

    /// Decision value of every binary machine for one row, in `(pos, neg)` pair order.
    pub fn decision_function(&self, x: ArrayView1<f64>) -> Result<Vec<f64>> {
        let fitted = self.fitted()?;
        Ok(fitted
            .machines
            .iter()
            .map(|m| m.model.decision(&fitted.kernel, x))
            .collect())
    }

    /// Total amount of support vectors over every binary machine.
    pub fn n_support(&self) -> usize {
        self.fitted
            .as_ref()
            .map(|f| f.machines.iter().map(|m| m.model.n_support()).sum())
            .unwrap_or_default()
    }

    /// The resolved kernel, if fitted.
    pub fn kernel(&self) -> Option<&Kernel> {
        self.fitted.as_ref().map(|f| &f.kernel)
    }

    fn fitted(&self) -> Result<&Fitted> {
        self.fitted
            .as_ref()
            .ok_or(MlErr::NotFitted { stage: "svc" })
    }
}

impl Fitted {
    fn vote(&self, row: ArrayView1<f64>) -> usize {
        let mut votes = vec![0usize; self.classes.len()];
        let slot = |class| self.classes.iter().position(|&c| c == class).unwrap_or(0);

        for machine in &self.machines {
            let winner = if machine.model.decision(&self.kernel, row) > 0.0 {
                machine.pos
            } else {
                machine.neg
            };
            votes[slot(winner)] += 1;
        }

        let mut best = 0;
        for (idx, &count) in votes.iter().enumerate() {
            if count > votes[best] {
                best = idx;
            }
        }

        self.classes[best]
    }
}
