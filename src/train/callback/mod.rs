//! Callback system for training events
//!
//! Hooks fire at train begin/end, epoch begin/end, after every optimizer
//! step and after every holdout evaluation.
//!
//! # Example
//!
//! ```rust
//! use impulso::train::callback::{CallbackAction, CallbackContext, TrainerCallback};
//!
//! struct StopOnTarget(f32);
//!
//! impl TrainerCallback for StopOnTarget {
//!     fn on_evaluation(&mut self, ctx: &CallbackContext) -> CallbackAction {
//!         match ctx.eval {
//!             Some(record) if record.error_rate <= self.0 => CallbackAction::Stop,
//!             _ => CallbackAction::Continue,
//!         }
//!     }
//! }
//! ```

#![allow(clippy::field_reassign_with_default)]

mod cancel;
mod early_stopping;
mod manager;
mod progress;
mod traits;

pub use cancel::CancellationToken;
pub use early_stopping::EarlyStopping;
pub use manager::CallbackManager;
pub use progress::ProgressCallback;
pub use traits::{CallbackAction, CallbackContext, TrainerCallback};
