//! Declarative run configuration
//!
//! A [`RunSpec`] YAML file names the dataset, the evaluator and the
//! [`TrainConfig`](crate::train::TrainConfig). [`load_spec`] parses and
//! validates it; [`run_spec`] executes it.

mod cli;
mod loader;
mod run;
mod schema;
mod validate;

pub use cli::{apply_overrides, parse_args, Cli, Command, InfoArgs, TrainArgs, ValidateArgs};
pub use loader::{load_spec, parse_spec};
pub use run::{build_model, run_spec, train_from_yaml, RunReport};
pub use schema::{DataSpec, ModelKind, ModelSpec, OutputSpec, RunSpec};
pub use validate::{validate_layout, validate_spec};
