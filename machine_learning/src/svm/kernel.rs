use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// How the kernel coefficient is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gamma {
    /// `1 / (n_features * var(x))` over every value of the training table.
    #[default]
    Scale,
    /// `1 / n_features`.
    Auto,
    Value(f64),
}

impl Gamma {
    /// Resolves the coefficient against the training table.
    pub fn resolve(self, x: ArrayView2<f64>) -> f64 {
        let n_features = x.ncols().max(1) as f64;

        match self {
            Gamma::Scale => {
                let n = x.len() as f64;
                if n == 0.0 {
                    return 1.0;
                }

                let mean = x.sum() / n;
                let var = x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                if var == 0.0 { 1.0 } else { 1.0 / (n_features * var) }
            }
            Gamma::Auto => 1.0 / n_features,
            Gamma::Value(gamma) => gamma,
        }
    }
}

/// The specification of a kernel, before its coefficient is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelSpec {
    Linear,
    Rbf { gamma: Gamma },
    Poly { degree: i32, gamma: Gamma, coef0: f64 },
    Sigmoid { gamma: Gamma, coef0: f64 },
}

impl Default for KernelSpec {
    fn default() -> Self {
        Self::Rbf {
            gamma: Gamma::Scale,
        }
    }
}

impl KernelSpec {
    /// Builds the kernel, resolving gamma against the training table.
    pub fn resolve(&self, x: ArrayView2<f64>) -> Kernel {
        match *self {
            KernelSpec::Linear => Kernel::Linear,
            KernelSpec::Rbf { gamma } => Kernel::Rbf {
                gamma: gamma.resolve(x),
            },
            KernelSpec::Poly {
                degree,
                gamma,
                coef0,
            } => Kernel::Poly {
                degree,
                gamma: gamma.resolve(x),
                coef0,
            },
            KernelSpec::Sigmoid { gamma, coef0 } => Kernel::Sigmoid {
                gamma: gamma.resolve(x),
                coef0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kernel {
    Linear,
    Rbf { gamma: f64 },
    Poly { degree: i32, gamma: f64, coef0: f64 },
    Sigmoid { gamma: f64, coef0: f64 },
}

impl Kernel {
    pub fn eval(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
        match *self {
            Kernel::Linear => a.dot(&b),
            Kernel::Rbf { gamma } => {
                let dist: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum();
                (-gamma * dist).exp()
            }
            Kernel::Poly {
                degree,
                gamma,
                coef0,
            } => (gamma * a.dot(&b) + coef0).powi(degree),
            Kernel::Sigmoid { gamma, coef0 } => (gamma * a.dot(&b) + coef0).tanh(),
        }
    }
}
