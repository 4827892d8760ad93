//! Training result types

/// Summary of a training run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainResult {
    /// Epochs whose batch loop ran, fully or until a skip
    pub epochs_completed: usize,
    /// Optimizer steps taken
    pub steps: usize,
    /// Holdout loss of the final parameters
    pub final_loss: f32,
    /// Holdout error rate of the final parameters
    pub final_error: f32,
    /// Lowest holdout loss recorded during the run
    pub best_loss: Option<f32>,
    /// Whether a callback or cancellation ended the run before the last epoch
    pub stopped_early: bool,
    /// Total training time in seconds
    pub elapsed_secs: f64,
}
