//! Process-wide analysis settings shared by all elements

use serde::{Deserialize, Serialize};

use crate::error::BeamResult;

/// Options that apply to every element unless its properties override them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Default Rayleigh mass-proportional coefficient
    pub rayleigh_alpha: Option<f64>,
    /// Default Rayleigh stiffness-proportional coefficient
    pub rayleigh_beta: Option<f64>,
    /// Maximum Newton iterations per load step
    pub max_iterations: usize,
    /// Convergence tolerance on the residual norm, relative to the load norm
    pub tolerance: f64,
    /// Number of equal load increments
    pub load_steps: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            rayleigh_alpha: None,
            rayleigh_beta: None,
            max_iterations: 30,
            tolerance: 1e-6,
            load_steps: 1,
        }
    }
}

impl AnalysisOptions {
    /// Options with no process-wide Rayleigh defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default Rayleigh coefficients
    pub fn with_rayleigh(mut self, alpha: f64, beta: f64) -> Self {
        self.rayleigh_alpha = Some(alpha);
        self.rayleigh_beta = Some(beta);
        self
    }

    /// Split the load into `steps` equal increments
    pub fn with_load_steps(mut self, steps: usize) -> Self {
        self.load_steps = steps.max(1);
        self
    }

    /// Set Newton iteration limit and tolerance
    pub fn with_convergence(mut self, max_iterations: usize, tolerance: f64) -> Self {
        self.max_iterations = max_iterations;
        self.tolerance = tolerance;
        self
    }

    /// Parse options from a JSON document
    pub fn from_json(json: &str) -> BeamResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
