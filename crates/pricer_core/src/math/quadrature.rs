//! Gauss-Legendre quadrature.
//!
//! An `n`-point rule integrates polynomials of degree `2n - 1` exactly on a
//! finite interval. Nodes are the roots of the Legendre polynomial `P_n`,
//! located by Newton iteration from the Chebyshev-like initial guess
//! `cos(pi (i - 1/4) / (n + 1/2))`.
//!
//! The rules used by the bivariate normal integral (6, 12 and 20 points) and
//! the Curran residual integral (64 points) are built once and shared through
//! [`GaussLegendre::shared`], keyed by [`SharedRule`].

use std::f64::consts::PI;
use std::sync::OnceLock;

use crate::types::PricingError;

const NEWTON_MAX_ITER: usize = 100;
const NEWTON_TOL: f64 = 1e-15;

static RULE_6: OnceLock<GaussLegendre> = OnceLock::new();
static RULE_12: OnceLock<GaussLegendre> = OnceLock::new();
static RULE_20: OnceLock<GaussLegendre> = OnceLock::new();
static RULE_64: OnceLock<GaussLegendre> = OnceLock::new();

/// Rule sizes kept in process-wide tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SharedRule {
    /// 6 points.
    Six,
    /// 12 points.
    Twelve,
    /// 20 points.
    Twenty,
    /// 64 points.
    SixtyFour,
}

impl SharedRule {
    /// Number of nodes in the rule.
    pub fn points(self) -> usize {
        match self {
            SharedRule::Six => 6,
            SharedRule::Twelve => 12,
            SharedRule::Twenty => 20,
            SharedRule::SixtyFour => 64,
        }
    }
}

/// An `n`-point Gauss-Legendre rule on `[-1, 1]`.
///
/// # Examples
///
/// ```rust
/// use pricer_core::math::quadrature::GaussLegendre;
///
/// let rule = GaussLegendre::new(5).unwrap();
/// // exact for degree <= 9
/// let value = rule.integrate(|x: f64| x.powi(8), -1.0, 1.0);
/// assert!((value - 2.0 / 9.0).abs() < 1e-14);
/// ```
#[derive(Clone, Debug)]
pub struct GaussLegendre {
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

impl GaussLegendre {
    /// Builds an `n`-point rule.
    ///
    /// # Errors
    ///
    /// `PricingError::InvalidConfiguration` if `n == 0`.
    pub fn new(n: usize) -> Result<Self, PricingError> {
        if n == 0 {
            return Err(PricingError::InvalidConfiguration(
                "Gauss-Legendre rule needs at least one node".to_string(),
            ));
        }
        Ok(Self::build(n))
    }

    /// Returns the lazily built, process-wide rule of the given size.
    pub fn shared(size: SharedRule) -> &'static GaussLegendre {
        let cell = match size {
            SharedRule::Six => &RULE_6,
            SharedRule::Twelve => &RULE_12,
            SharedRule::Twenty => &RULE_20,
            SharedRule::SixtyFour => &RULE_64,
        };
        cell.get_or_init(|| Self::build(size.points()))
    }

    fn build(n: usize) -> Self {
        let mut nodes = vec![0.0_f64; n];
        let mut weights = vec![0.0_f64; n];
        let nf = n as f64;

        for i in 0..n.div_ceil(2) {
            let mut z = (PI * (i as f64 + 0.75) / (nf + 0.5)).cos();
            for _ in 0..NEWTON_MAX_ITER {
                let (p, dp) = legendre_with_derivative(n, z);
                let dz = p / dp;
                z -= dz;
                if dz.abs() < NEWTON_TOL {
                    break;
                }
            }
            let (_, dp) = legendre_with_derivative(n, z);
            let w = 2.0 / ((1.0 - z * z) * dp * dp);

            nodes[i] = -z;
            nodes[n - 1 - i] = z;
            weights[i] = w;
            weights[n - 1 - i] = w;
        }

        Self { nodes, weights }
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; a rule has at least one node.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes on `[-1, 1]`, ascending.
    #[inline]
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Weights matching [`nodes`](Self::nodes).
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Integrates `f` over `[a, b]`.
    pub fn integrate<F>(&self, f: F, a: f64, b: f64) -> f64
    where
        F: Fn(f64) -> f64,
    {
        let half_width = 0.5 * (b - a);
        let mid = 0.5 * (b + a);

        let sum: f64 = self
            .nodes
            .iter()
            .zip(self.weights.iter())
            .map(|(&x, &w)| w * f(half_width * x + mid))
            .sum();

        half_width * sum
    }
}

/// Evaluates `(P_n(x), P_n'(x))` by the three-term recurrence.
fn legendre_with_derivative(n: usize, x: f64) -> (f64, f64) {
    let mut p_prev = 1.0;
    let mut p = x;
    for k in 2..=n {
        let kf = k as f64;
        let p_next = ((2.0 * kf - 1.0) * x * p - (kf - 1.0) * p_prev) / kf;
        p_prev = p;
        p = p_next;
    }
    if n == 1 {
        return (x, 1.0);
    }
    let dp = (n as f64) * (x * p - p_prev) / (x * x - 1.0);
    (p, dp)
}
