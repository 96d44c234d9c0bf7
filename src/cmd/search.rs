use crate::reports;
use bindforge::binding::BindingProblem;
use bindforge::config::{Config, SolverKind};
use bindforge::error::{BfResult, BindForgeError};
use bindforge::solver::{RandomSolver, Solver, TreeSearchSolver};
use clap::Args;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub config: Config,
}

pub fn run(config: &Config, problem: Arc<BindingProblem>) -> BfResult<()> {
    let params = &config.search;
    let mut solver: Box<dyn Solver> = match params.solver {
        SolverKind::Random => Box::new(RandomSolver::new(problem, params.seed)),
        SolverKind::Tree => Box::new(TreeSearchSolver::with_params(
            problem,
            config.tree.clone(),
            params.seed,
        )),
    };

    info!("🔥 Running {} solver", params.solver);
    let start = Instant::now();

    match params.time_secs {
        Some(secs) => {
            solver.run_for_duration(Duration::from_secs(secs));
        }
        None => {
            solver.run_for_count(params.iterations);
        }
    }

    let best = solver.best_binding().ok_or_else(|| {
        BindForgeError::Validation("Search finished without a complete binding".to_string())
    })?;

    reports::print_binding_table(best);
    reports::print_loss_summary(best);
    println!(
        "Iterations: {} in {:.2}s",
        solver.iterations(),
        start.elapsed().as_secs_f32()
    );
    println!("Best loss: {}", solver.best_loss());
    Ok(())
}
