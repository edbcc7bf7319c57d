//! Walk-forward signal generation with periodic retraining.
//!
//! The driver retrains the miner on a trailing window every `step_size`
//! steps and emits one signal per step, holding a nonzero signal for
//! `hold_period` steps after each trigger. The recurrence over the retrain
//! schedule and the hold countdown makes this strictly sequential.
//!
//! Causality: the signal at step `i` depends only on data up to and
//! including index `i`; retraining at `i` sees only the trailing
//! `train_size` window ending at `i`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use motiflab_core::cluster::ClusterBackend;
use motiflab_core::miner::{self, MinerConfig, MinerError, MinerState};
use motiflab_core::pips::find_pips;
use motiflab_core::seeds::SeedHierarchy;

/// Configuration for one walk-forward run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkForwardConfig {
    pub miner: MinerConfig,
    /// Trailing window length for each retrain.
    pub train_size: usize,
    /// Steps between retrains.
    pub step_size: usize,
}

impl WalkForwardConfig {
    pub fn validate(&self) -> Result<(), WalkForwardError> {
        self.miner.validate()?;
        if self.train_size <= self.miner.lookback {
            return Err(WalkForwardError::InvalidConfig(format!(
                "train_size = {} must exceed lookback = {}",
                self.train_size, self.miner.lookback
            )));
        }
        if self.step_size == 0 {
            return Err(WalkForwardError::InvalidConfig(
                "step_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Errors from walk-forward runs.
#[derive(Debug, Error)]
pub enum WalkForwardError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("retraining failed at step {step}: {source}")]
    TrainingFailed {
        step: usize,
        #[source]
        source: MinerError,
    },
    #[error(transparent)]
    Miner(#[from] MinerError),
    #[error(transparent)]
    Pip(#[from] motiflab_core::pips::PipError),
}

/// Sequential walk-forward driver owning one miner.
#[derive(Debug)]
pub struct WalkForwardMiner<B: ClusterBackend> {
    config: WalkForwardConfig,
    backend: B,
    seeds: SeedHierarchy,
    state: Option<MinerState>,
    next_train: usize,
    train_count: u64,
    current_signal: f64,
    hold_remaining: usize,
}

impl<B: ClusterBackend> WalkForwardMiner<B> {
    pub fn new(
        config: WalkForwardConfig,
        backend: B,
        seed: u64,
    ) -> Result<Self, WalkForwardError> {
        config.validate()?;
        let next_train = config.train_size - 1;
        Ok(Self {
            config,
            backend,
            seeds: SeedHierarchy::new(seed),
            state: None,
            next_train,
            train_count: 0,
            current_signal: 0.0,
            hold_remaining: 0,
        })
    }

    /// Whether at least one retrain has completed.
    pub fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    /// The latest fitted state, if any.
    pub fn state(&self) -> Option<&MinerState> {
        self.state.as_ref()
    }

    /// Advance one step and emit the signal for index `i`.
    ///
    /// Must be called with strictly increasing `i` over one series.
    pub fn update_signal(&mut self, data: &[f64], i: usize) -> Result<f64, WalkForwardError> {
        if i >= self.next_train {
            let window = &data[i + 1 - self.config.train_size..=i];
            let seed = self.seeds.sub_seed("walk-forward-train", self.train_count);
            let state = miner::train(window, &self.config.miner, &self.backend, seed)
                .map_err(|source| WalkForwardError::TrainingFailed { step: i, source })?;
            self.state = Some(state);
            self.train_count += 1;
            self.next_train += self.config.step_size;
        }

        let Some(state) = &self.state else {
            return Ok(0.0);
        };

        if self.hold_remaining > 0 {
            self.hold_remaining -= 1;
        }
        if self.hold_remaining == 0 {
            self.current_signal = 0.0;
        }

        let lookback = self.config.miner.lookback;
        let window = &data[i + 1 - lookback..=i];
        let pips = find_pips(window, self.config.miner.n_pips, self.config.miner.distance)?;
        let prediction = state.predict(&pips.y);
        if prediction != 0.0 {
            self.current_signal = prediction;
            self.hold_remaining = self.config.miner.hold_period;
        }

        Ok(self.current_signal)
    }
}

/// Drive a fresh walk-forward miner across the whole series and collect one
/// signal per step, aligned with the input.
pub fn run_walk_forward<B: ClusterBackend>(
    data: &[f64],
    config: WalkForwardConfig,
    backend: B,
    seed: u64,
) -> Result<Vec<f64>, WalkForwardError> {
    let mut driver = WalkForwardMiner::new(config, backend, seed)?;
    (0..data.len())
        .map(|i| driver.update_signal(data, i))
        .collect()
}
