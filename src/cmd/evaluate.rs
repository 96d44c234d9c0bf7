use crate::reports;
use bindforge::binding::{BindingProblem, KeyBinding};
use bindforge::config::Config;
use bindforge::error::BfResult;
use bindforge::loader;
use clap::Args;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub config: Config,

    /// CSV of `ability,key` rows to score.
    #[arg(short, long)]
    pub binds: String,
}

pub fn run(args: &EvaluateArgs, problem: Arc<BindingProblem>) -> BfResult<()> {
    info!("🔎 Evaluating binding: {}", args.binds);
    let binds = loader::load_binds_from_path(&args.binds)?;

    let mut binding = KeyBinding::new(problem);
    binding.assign_from_data(&binds)?;

    reports::print_binding_table(&binding);
    match binding.loss() {
        Some(loss) => {
            reports::print_loss_summary(&binding);
            println!("Loss: {}", loss);
        }
        None => println!("Loss: undefined"),
    }
    Ok(())
}
