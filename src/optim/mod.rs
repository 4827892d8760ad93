//! Optimizers for training

mod non_finite;
mod optimizer;
mod sgd;

pub use non_finite::NonFinitePolicy;
pub use optimizer::Optimizer;
pub use sgd::SGD;
