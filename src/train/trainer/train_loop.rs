//! Multi-epoch training loop

use super::core::Trainer;
use super::result::TrainResult;
use crate::data::{batch_ranges, Dataset, TrainingSet};
use crate::error::{Result, ValidationError};
use crate::train::callback::CallbackAction;
use crate::train::EvalRecord;
use std::time::Instant;
use tracing::{info, info_span, warn};

impl Trainer {
    /// Run `config.epochs` epochs of minibatch training on `train`
    ///
    /// Each epoch reshuffles the training rows, then takes one optimizer step
    /// per batch. After batch `j` of an epoch, when `j % print_period == 0`,
    /// the holdout set is scored and the record appended to the history.
    /// The run ends early only when a callback asks to stop or the
    /// cancellation token fires; both return `Ok` with `stopped_early` set.
    ///
    /// # Errors
    ///
    /// Dataset/model mismatches are rejected before the first step. Errors
    /// from a step (shape mismatch, non-finite gradient under the abort
    /// policy) end the run immediately.
    pub fn train(&mut self, train: &Dataset, holdout: &Dataset) -> Result<TrainResult> {
        self.check_datasets(train, holdout)?;

        let mut rows = TrainingSet::new(train.features().clone(), train.indicator_matrix()?)
            .ok_or(ValidationError::LengthMismatch {
                features: train.len(),
                labels: train.labels().len(),
            })?;
        let holdout_targets = holdout.indicator_matrix()?;
        let holdout_inputs = holdout.features().view();

        let epochs = self.config.epochs;
        let batch_size = self.config.batch_size;
        let drop_incomplete = self.config.drop_incomplete_batch;
        let print_period = self.config.print_period;
        let batches_per_epoch = batch_ranges(rows.len(), batch_size, drop_incomplete).len();

        info!(
            model = self.model.name(),
            train = train.len(),
            holdout = holdout.len(),
            epochs,
            batch_size,
            batches_per_epoch,
            "training started"
        );
        if drop_incomplete && rows.len() % batch_size != 0 {
            info!(
                dropped = rows.len() % batch_size,
                "incomplete final batch skipped every epoch"
            );
        }

        self.start_time = Some(Instant::now());
        let mut stopped_early = false;
        let mut epochs_completed: usize = 0;
        let mut last_loss = 0.0;

        let ctx = self.build_context(0, 0, batches_per_epoch, last_loss, None);
        if self.callbacks.on_train_begin(&ctx) != CallbackAction::Continue {
            stopped_early = true;
        }

        'epochs: for epoch in 0..epochs {
            if stopped_early {
                break;
            }
            let _span = info_span!("epoch", epoch).entered();

            let ctx = self.build_context(epoch, 0, batches_per_epoch, last_loss, None);
            match self.callbacks.on_epoch_begin(&ctx) {
                CallbackAction::Stop => {
                    stopped_early = true;
                    break;
                }
                CallbackAction::SkipEpoch => continue,
                CallbackAction::Continue => {}
            }

            rows.shuffle(&mut self.rng);

            for (j, range) in batch_ranges(rows.len(), batch_size, drop_incomplete)
                .into_iter()
                .enumerate()
            {
                if self.cancel.is_cancelled() {
                    info!(epoch, batch = j, "training cancelled");
                    stopped_early = true;
                    break 'epochs;
                }

                let outcome = self.train_step(&rows.batch(range))?;
                last_loss = outcome.loss;

                let ctx = self.build_context(epoch, j, batches_per_epoch, last_loss, None);
                match self.callbacks.on_step_end(&ctx) {
                    CallbackAction::Stop => {
                        stopped_early = true;
                        break 'epochs;
                    }
                    CallbackAction::SkipEpoch => break,
                    CallbackAction::Continue => {}
                }

                if j % print_period == 0 {
                    let score = self.evaluate(holdout_inputs, holdout_targets.view())?;
                    let record = EvalRecord {
                        iteration: epoch,
                        batch: j,
                        loss: score.loss,
                        error_rate: score.error_rate,
                    };
                    if !record.loss.is_finite() {
                        warn!(
                            iteration = epoch,
                            batch = j,
                            loss = record.loss,
                            "non-finite holdout loss"
                        );
                    }
                    self.record_evaluation(record);

                    let ctx =
                        self.build_context(epoch, j, batches_per_epoch, last_loss, Some(record));
                    match self.callbacks.on_evaluation(&ctx) {
                        CallbackAction::Stop => {
                            stopped_early = true;
                            break 'epochs;
                        }
                        CallbackAction::SkipEpoch => break,
                        CallbackAction::Continue => {}
                    }
                }
            }

            epochs_completed += 1;
            let ctx = self.build_context(
                epoch,
                batches_per_epoch,
                batches_per_epoch,
                last_loss,
                None,
            );
            if self.callbacks.on_epoch_end(&ctx) == CallbackAction::Stop {
                stopped_early = epoch + 1 < epochs;
                break;
            }
        }

        let final_score = self.evaluate(holdout_inputs, holdout_targets.view())?;
        let elapsed_secs = self.start_time.map_or(0.0, |t| t.elapsed().as_secs_f64());

        let ctx = self.build_context(
            epochs_completed.saturating_sub(1),
            batches_per_epoch,
            batches_per_epoch,
            last_loss,
            None,
        );
        self.callbacks.on_train_end(&ctx);

        info!(
            epochs_completed,
            steps = self.global_step,
            loss = final_score.loss,
            error_rate = final_score.error_rate,
            stopped_early,
            elapsed_secs,
            "training finished"
        );

        Ok(TrainResult {
            epochs_completed,
            steps: self.global_step,
            final_loss: final_score.loss,
            final_error: final_score.error_rate,
            best_loss: self.best_loss,
            stopped_early,
            elapsed_secs,
        })
    }

    /// Reject datasets that do not fit the model or the batch size
    fn check_datasets(&self, train: &Dataset, holdout: &Dataset) -> Result<()> {
        if train.is_empty() || holdout.is_empty() {
            return Err(ValidationError::EmptyDataset.into());
        }
        for data in [train, holdout] {
            if data.num_features() != self.model.num_features() {
                return Err(ValidationError::FeatureMismatch {
                    expected: self.model.num_features(),
                    actual: data.num_features(),
                }
                .into());
            }
            if data.num_classes() != self.model.num_classes() {
                return Err(ValidationError::ClassMismatch {
                    expected: self.model.num_classes(),
                    actual: data.num_classes(),
                }
                .into());
            }
        }
        if self.config.drop_incomplete_batch && self.config.batch_size > train.len() {
            return Err(ValidationError::BatchLargerThanTrainSet {
                batch_size: self.config.batch_size,
                samples: train.len(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::data::Dataset;
    use crate::error::{Error, ValidationError};
    use crate::model::{ForwardModel, ForwardPass, SoftmaxRegression};
    use crate::params::ParameterSet;
    use crate::train::callback::{
        CallbackAction, CallbackContext, EarlyStopping, TrainerCallback,
    };
    use crate::train::{TrainConfig, Trainer};
    use ndarray::{Array2, ArrayView2};
    use rand::RngCore;
    use std::sync::{Arc, Mutex};

    /// Two separable classes; feature 0 carries the label
    fn toy_dataset(n: usize) -> Dataset {
        let mut features = Array2::<f32>::zeros((n, 2));
        let mut labels = Vec::with_capacity(n);
        for i in 0..n {
            let label = i % 2;
            features[[i, 0]] = if label == 0 { -1.0 } else { 1.0 };
            features[[i, 1]] = i as f32 / n as f32;
            labels.push(label);
        }
        Dataset::new(features, labels, vec![2], 2).unwrap()
    }

    /// Dataset whose single feature is the row id, for tracking visits
    fn id_dataset(n: usize) -> Dataset {
        let features = Array2::from_shape_fn((n, 1), |(i, _)| i as f32);
        let labels = (0..n).map(|i| i % 2).collect();
        Dataset::new(features, labels, vec![1], 2).unwrap()
    }

    /// Softmax regression wrapper that logs the row ids it trains on
    struct Recording {
        inner: SoftmaxRegression,
        seen: Arc<Mutex<Vec<Vec<usize>>>>,
    }

    impl ForwardModel for Recording {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn num_features(&self) -> usize {
            1
        }

        fn num_classes(&self) -> usize {
            2
        }

        fn init_params(&self, rng: &mut dyn RngCore) -> crate::Result<ParameterSet> {
            self.inner.init_params(rng)
        }

        fn logits(
            &self,
            inputs: ArrayView2<'_, f32>,
            params: &ParameterSet,
        ) -> crate::Result<Array2<f32>> {
            self.inner.logits(inputs, params)
        }

        fn forward(
            &self,
            inputs: ArrayView2<'_, f32>,
            targets: ArrayView2<'_, f32>,
            params: &ParameterSet,
        ) -> crate::Result<ForwardPass> {
            let ids = inputs.column(0).iter().map(|&v| v as usize).collect();
            self.seen.lock().unwrap().push(ids);
            self.inner.forward(inputs, targets, params)
        }
    }

    fn recording_trainer(config: TrainConfig) -> (Trainer, Arc<Mutex<Vec<Vec<usize>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let model = Recording {
            inner: SoftmaxRegression::new(1, 2).unwrap(),
            seen: Arc::clone(&seen),
        };
        let trainer = Trainer::new(Box::new(model), config.with_seed(5)).unwrap();
        (trainer, seen)
    }

    #[test]
    fn test_each_sample_at_most_once_per_epoch() {
        let config = TrainConfig::new()
            .with_epochs(3)
            .with_batch_size(4)
            .with_print_period(100);
        let (mut trainer, seen) = recording_trainer(config);
        let result = trainer.train(&id_dataset(22), &id_dataset(4)).unwrap();

        let batches = seen.lock().unwrap().clone();
        // floor(22 / 4) = 5 full batches per epoch, remainder dropped
        assert_eq!(batches.len(), 15);
        assert!(batches.iter().all(|b| b.len() == 4));
        for epoch in batches.chunks(5) {
            let mut ids: Vec<usize> = epoch.iter().flatten().copied().collect();
            ids.sort_unstable();
            let before = ids.len();
            ids.dedup();
            assert_eq!(ids.len(), before, "sample repeated within an epoch");
            assert_eq!(ids.len(), 20);
        }
        assert_eq!(result.steps, 15);
        assert_eq!(result.epochs_completed, 3);
        assert!(!result.stopped_early);
    }

    #[test]
    fn test_remainder_batch_when_not_dropped() {
        let config = TrainConfig::new()
            .with_epochs(2)
            .with_batch_size(4)
            .with_drop_incomplete_batch(false);
        let (mut trainer, seen) = recording_trainer(config);
        trainer.train(&id_dataset(22), &id_dataset(4)).unwrap();

        let batches = seen.lock().unwrap().clone();
        assert_eq!(batches.len(), 12);
        for epoch in batches.chunks(6) {
            assert_eq!(epoch[5].len(), 2);
            let mut ids: Vec<usize> = epoch.iter().flatten().copied().collect();
            ids.sort_unstable();
            assert_eq!(ids, (0..22).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_evaluation_cadence() {
        let config = TrainConfig::new()
            .with_epochs(2)
            .with_batch_size(10)
            .with_print_period(3);
        let model = SoftmaxRegression::new(2, 2).unwrap();
        let mut trainer = Trainer::new(Box::new(model), config.with_seed(1)).unwrap();
        trainer.train(&toy_dataset(70), &toy_dataset(10)).unwrap();

        // 7 batches per epoch, evaluated at j = 0, 3, 6
        let positions: Vec<(usize, usize)> = trainer
            .history()
            .records()
            .iter()
            .map(|r| (r.iteration, r.batch))
            .collect();
        assert_eq!(positions, vec![(0, 0), (0, 3), (0, 6), (1, 0), (1, 3), (1, 6)]);
    }

    #[test]
    fn test_training_reduces_holdout_loss() {
        let config = TrainConfig::new()
            .with_epochs(5)
            .with_batch_size(20)
            .with_learning_rate(0.01)
            .with_print_period(1);
        let model = SoftmaxRegression::new(2, 2).unwrap();
        let mut trainer = Trainer::new(Box::new(model), config.with_seed(8)).unwrap();
        let result = trainer.train(&toy_dataset(200), &toy_dataset(40)).unwrap();

        let losses = trainer.history().losses();
        assert!(losses.last().unwrap() < losses.first().unwrap());
        assert_eq!(result.final_error, 0.0);
        assert!(result.best_loss.unwrap() <= losses[0]);
    }

    #[test]
    fn test_parameter_shapes_preserved() {
        let model = SoftmaxRegression::new(2, 2).unwrap();
        let config = TrainConfig::new().with_epochs(3).with_batch_size(8).with_seed(2);
        let mut trainer = Trainer::new(Box::new(model), config).unwrap();
        let shapes = trainer.params().shapes();
        trainer.train(&toy_dataset(50), &toy_dataset(10)).unwrap();
        assert_eq!(trainer.params().shapes(), shapes);
    }

    #[test]
    fn test_batch_larger_than_train_set() {
        let model = SoftmaxRegression::new(2, 2).unwrap();
        let config = TrainConfig::new().with_batch_size(500).with_seed(0);
        let mut trainer = Trainer::new(Box::new(model), config).unwrap();
        let err = trainer.train(&toy_dataset(50), &toy_dataset(10)).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::BatchLargerThanTrainSet { .. })
        ));
        assert_eq!(trainer.global_step(), 0);
    }

    #[test]
    fn test_feature_mismatch_rejected() {
        let model = SoftmaxRegression::new(3, 2).unwrap();
        let mut trainer =
            Trainer::new(Box::new(model), TrainConfig::new().with_seed(0)).unwrap();
        let err = trainer.train(&toy_dataset(50), &toy_dataset(10)).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_cancellation_stops_before_first_batch() {
        let model = SoftmaxRegression::new(2, 2).unwrap();
        let config = TrainConfig::new().with_batch_size(10).with_seed(0);
        let mut trainer = Trainer::new(Box::new(model), config).unwrap();
        trainer.cancellation_token().cancel();

        let result = trainer.train(&toy_dataset(50), &toy_dataset(10)).unwrap();
        assert!(result.stopped_early);
        assert_eq!(result.steps, 0);
        assert_eq!(result.epochs_completed, 0);
        assert!(trainer.history().is_empty());
    }

    struct CancelAfter {
        steps: usize,
        token: crate::train::callback::CancellationToken,
    }

    impl TrainerCallback for CancelAfter {
        fn on_step_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
            if ctx.global_step >= self.steps {
                self.token.cancel();
            }
            CallbackAction::Continue
        }
    }

    #[test]
    fn test_cancellation_mid_run() {
        let model = SoftmaxRegression::new(2, 2).unwrap();
        let config = TrainConfig::new().with_batch_size(10).with_epochs(5).with_seed(0);
        let mut trainer = Trainer::new(Box::new(model), config).unwrap();
        let token = trainer.cancellation_token();
        trainer.add_callback(CancelAfter { steps: 7, token });

        let result = trainer.train(&toy_dataset(50), &toy_dataset(10)).unwrap();
        assert!(result.stopped_early);
        assert_eq!(result.steps, 7);
        assert_eq!(result.epochs_completed, 1);
    }

    #[test]
    fn test_early_stopping_callback() {
        let model = SoftmaxRegression::new(2, 2).unwrap();
        let config = TrainConfig::new()
            .with_epochs(50)
            .with_batch_size(10)
            .with_print_period(1)
            .with_seed(4);
        let mut trainer = Trainer::new(Box::new(model), config).unwrap();
        // The first evaluation sets the baseline and nothing beats it by 1e9
        trainer.add_callback(EarlyStopping::new(1, 1e9));

        let result = trainer.train(&toy_dataset(50), &toy_dataset(10)).unwrap();
        assert!(result.stopped_early);
        assert_eq!(trainer.history().len(), 2);
        assert_eq!(result.steps, 2);
    }

    #[test]
    fn test_l2_shrinks_weights() {
        let train = toy_dataset(100);
        let holdout = toy_dataset(20);
        let base = TrainConfig::new()
            .with_epochs(5)
            .with_batch_size(10)
            .with_learning_rate(0.01)
            .with_seed(6);

        let mut plain = Trainer::new(
            Box::new(SoftmaxRegression::new(2, 2).unwrap()),
            base.clone(),
        )
        .unwrap();
        let mut reg = Trainer::new(
            Box::new(SoftmaxRegression::new(2, 2).unwrap()),
            base.with_l2(0.5),
        )
        .unwrap();
        plain.train(&train, &holdout).unwrap();
        reg.train(&train, &holdout).unwrap();

        assert!(reg.params().squared_norm() < plain.params().squared_norm());
    }

    #[test]
    fn test_into_parts_returns_history() {
        let model = SoftmaxRegression::new(2, 2).unwrap();
        let config = TrainConfig::new().with_epochs(1).with_batch_size(10).with_seed(0);
        let mut trainer = Trainer::new(Box::new(model), config).unwrap();
        trainer.train(&toy_dataset(30), &toy_dataset(10)).unwrap();
        let (params, history) = trainer.into_parts();
        assert_eq!(params.len(), 2);
        assert_eq!(history.len(), 1);
    }
}
