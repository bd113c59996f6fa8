//! Sequential minimal optimization for the dual of the binary C-SVC problem:
//!
//! ```text
//! min 1/2 a'Qa - e'a   s.t.   0 <= a_i <= C,   y'a = 0,   Q_ij = y_i y_j K(x_i, x_j)
//! ```
//!
//! Working pairs are chosen with second order information (maximal violating `i`, then the `j`
//! giving the largest decrease of the objective).

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use super::Kernel;

const TAU: f64 = 1e-12;

/// A fitted binary machine. Positive decision values vote for the `+1` class.
#[derive(Debug, Clone)]
pub struct BinaryModel {
    support_vectors: Array2<f64>,
    /// `alpha_i * y_i` of each support vector.
    coef: Array1<f64>,
    rho: f64,
    iterations: usize,
}

impl BinaryModel {
    pub fn decision(&self, kernel: &Kernel, x: ArrayView1<f64>) -> f64 {
        self.support_vectors
            .rows()
            .into_iter()
            .zip(&self.coef)
            .map(|(sv, coef)| coef * kernel.eval(sv, x))
            .sum::<f64>()
            - self.rho
    }

    pub fn n_support(&self) -> usize {
        self.coef.len()
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

/// Parameters shared by every binary sub-problem.
#[derive(Debug, Clone, Copy)]
pub struct SmoParams {
    pub c: f64,
    pub tol: f64,
    pub max_iter: usize,
}

struct Solver<'a> {
    y: &'a [f64],
    k: Array2<f64>,
    alpha: Vec<f64>,
    grad: Vec<f64>,
    c: f64,
}

impl Solver<'_> {
    fn q(&self, i: usize, j: usize) -> f64 {
        self.y[i] * self.y[j] * self.k[[i, j]]
    }

    fn is_upper(&self, t: usize) -> bool {
        self.alpha[t] >= self.c
    }

    fn is_lower(&self, t: usize) -> bool {
        self.alpha[t] <= 0.0
    }

    fn select_working_set(&self, tol: f64) -> Option<(usize, usize)> {
        let n = self.y.len();
        let mut gmax = f64::NEG_INFINITY;
        let mut i = None;

        for t in 0..n {
            let violation = if self.y[t] > 0.0 {
                (!self.is_upper(t)).then(|| -self.grad[t])
            } else {
                (!self.is_lower(t)).then(|| self.grad[t])
            };

            if let Some(v) = violation {
                if v >= gmax {
                    gmax = v;
                    i = Some(t);
                }
            }
        }

        let i = i?;
        let mut gmax2 = f64::NEG_INFINITY;
        let mut obj_min = f64::INFINITY;
        let mut j = None;

        for t in 0..n {
            let violation = if self.y[t] > 0.0 {
                (!self.is_lower(t)).then(|| self.grad[t])
            } else {
                (!self.is_upper(t)).then(|| -self.grad[t])
            };

            let Some(v) = violation else {
                continue;
            };

            if v >= gmax2 {
                gmax2 = v;
            }

            let grad_diff = gmax + v;
            if grad_diff > 0.0 {
                let quad = self.k[[i, i]] + self.k[[t, t]] - 2.0 * self.k[[i, t]];
                let quad = if quad > 0.0 { quad } else { TAU };
                let obj = -(grad_diff * grad_diff) / quad;

                if obj <= obj_min {
                    obj_min = obj;
                    j = Some(t);
                }
            }
        }

        if gmax + gmax2 < tol {
            return None;
        }

        j.map(|j| (i, j))
    }

    fn update(&mut self, i: usize, j: usize) {
        let c = self.c;
        let (old_i, old_j) = (self.alpha[i], self.alpha[j]);
        let q_ij = self.q(i, j);
        let (qd_i, qd_j) = (self.k[[i, i]], self.k[[j, j]]);
        let alpha = &mut self.alpha;

        if self.y[i] != self.y[j] {
            let quad = (qd_i + qd_j + 2.0 * q_ij).max(TAU);
            let delta = (-self.grad[i] - self.grad[j]) / quad;
            let diff = alpha[i] - alpha[j];
            alpha[i] += delta;
            alpha[j] += delta;

            if diff > 0.0 {
                if alpha[j] < 0.0 {
                    alpha[j] = 0.0;
                    alpha[i] = diff;
                }
            } else if alpha[i] < 0.0 {
                alpha[i] = 0.0;
                alpha[j] = -diff;
            }

            if diff > 0.0 {
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = c - diff;
                }
            } else if alpha[j] > c {
                alpha[j] = c;
                alpha[i] = c + diff;
            }
        } else {
            let quad = (qd_i + qd_j - 2.0 * q_ij).max(TAU);
            let delta = (self.grad[i] - self.grad[j]) / quad;
            let sum = alpha[i] + alpha[j];
            alpha[i] -= delta;
            alpha[j] += delta;

            if sum > c {
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = sum - c;
                }
            } else if alpha[j] < 0.0 {
                alpha[j] = 0.0;
                alpha[i] = sum;
            }

            if sum > c {
                if alpha[j] > c {
                    alpha[j] = c;
                    alpha[i] = sum - c;
                }
            } else if alpha[i] < 0.0 {
                alpha[i] = 0.0;
                alpha[j] = sum;
            }
        }

        let (delta_i, delta_j) = (self.alpha[i] - old_i, self.alpha[j] - old_j);
        for t in 0..self.y.len() {
            let step = self.q(t, i) * delta_i + self.q(t, j) * delta_j;
            self.grad[t] += step;
        }
    }

    fn rho(&self) -> f64 {
        let mut upper = f64::INFINITY;
        let mut lower = f64::NEG_INFINITY;
        let mut free = 0;
        let mut free_sum = 0.0;

        for t in 0..self.y.len() {
            let yg = self.y[t] * self.grad[t];
            let bound = if self.is_upper(t) {
                Some(self.y[t] < 0.0)
            } else if self.is_lower(t) {
                Some(self.y[t] > 0.0)
            } else {
                None
            };

            match bound {
                Some(true) => upper = upper.min(yg),
                Some(false) => lower = lower.max(yg),
                None => {
                    free += 1;
                    free_sum += yg;
                }
            }
        }

        if free > 0 {
            free_sum / free as f64
        } else {
            (upper + lower) / 2.0
        }
    }
}

fn gram(x: ArrayView2<f64>, kernel: &Kernel) -> Array2<f64> {
    let n = x.nrows();
    Array2::from_shape_fn((n, n), |(i, j)| kernel.eval(x.row(i), x.row(j)))
}

/// Solves one binary problem.
///
/// # Arguments
/// * `x` - The rows of both classes.
/// * `y` - `+1.0` or `-1.0` per row.
/// * `kernel` - The resolved kernel.
/// * `params` - Box constraint, stopping tolerance and iteration cap.
///
/// # Returns
/// The support vectors with their coefficients and the intercept.
pub fn solve(x: ArrayView2<f64>, y: &[f64], kernel: &Kernel, params: SmoParams) -> BinaryModel {
    let n = y.len();
    let mut solver = Solver {
        y,
        k: gram(x, kernel),
        alpha: vec![0.0; n],
        grad: vec![-1.0; n],
        c: params.c,
    };

    let mut iterations = 0;
    while iterations < params.max_iter {
        let Some((i, j)) = solver.select_working_set(params.tol) else {
            break;
        };

        solver.update(i, j);
        iterations += 1;
    }

    if iterations == params.max_iter {
        log::warn!("smo solver stopped after {iterations} iterations without converging");
    }

    let rho = solver.rho();
    let support: Vec<usize> = (0..n).filter(|&t| solver.alpha[t] > 0.0).collect();
    let coef = support.iter().map(|&t| solver.alpha[t] * y[t]).collect();

    BinaryModel {
        support_vectors: x.select(Axis(0), &support),
        coef,
        rho,
        iterations,
    }
}
