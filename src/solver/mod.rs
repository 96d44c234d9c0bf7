pub mod mcts;
pub mod random;

pub use self::mcts::{SearchNode, TreeSearchSolver};
pub use self::random::RandomSolver;

use crate::binding::KeyBinding;
use std::time::{Duration, Instant};
use tracing::info;

pub(crate) fn make_rng(seed: Option<u64>) -> fastrand::Rng {
    if let Some(s) = seed {
        fastrand::Rng::with_seed(s)
    } else {
        fastrand::Rng::new()
    }
}

/// Best `(loss, binding)` pair seen so far. Both halves always change together.
#[derive(Debug, Clone)]
pub struct BestTracker {
    loss: f64,
    binding: Option<KeyBinding>,
}

impl Default for BestTracker {
    fn default() -> Self {
        Self {
            loss: f64::INFINITY,
            binding: None,
        }
    }
}

impl BestTracker {
    /// Records `binding` if `loss` is strictly better. Returns whether it was.
    pub fn offer(&mut self, loss: f64, binding: &KeyBinding) -> bool {
        if loss < self.loss {
            self.loss = loss;
            self.binding = Some(binding.clone());
            true
        } else {
            false
        }
    }

    pub fn loss(&self) -> f64 {
        self.loss
    }

    pub fn binding(&self) -> Option<&KeyBinding> {
        self.binding.as_ref()
    }
}

/// A search strategy over complete key bindings.
pub trait Solver {
    /// Builds one complete binding and returns it with its loss.
    fn run_iteration(&mut self) -> (f64, KeyBinding);

    fn tracker(&self) -> &BestTracker;

    fn iterations(&self) -> usize;

    fn best_loss(&self) -> f64 {
        self.tracker().loss()
    }

    fn best_binding(&self) -> Option<&KeyBinding> {
        self.tracker().binding()
    }

    fn run_for_count(&mut self, count: usize) -> Option<(f64, &KeyBinding)> {
        for _ in 0..count {
            self.run_iteration();
        }
        info!(
            "Finished {} iterations, best loss {:.4}",
            count,
            self.best_loss()
        );
        self.best_binding().map(|b| (self.best_loss(), b))
    }

    /// Runs whole iterations until `limit` has elapsed. The deadline is only
    /// checked between iterations, so the last one may overrun it.
    fn run_for_duration(&mut self, limit: Duration) -> usize {
        let start = Instant::now();
        let mut completed = 0;
        while start.elapsed() < limit {
            self.run_iteration();
            completed += 1;
        }
        info!(
            "Ran {} iterations in {:.2}s, best loss {:.4}",
            completed,
            start.elapsed().as_secs_f32(),
            self.best_loss()
        );
        completed
    }
}
