use bindforge::binding::{BindingProblem, ProblemParams};
use bindforge::config::Config;
use bindforge::error::{BfResult, BindForgeError};
use bindforge::geometry::KeyboardDefinition;
use bindforge::loader;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use std::sync::Arc;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, short, long, default_value = "data/abilities.csv")]
    abilities: String,

    #[arg(global = true, short, long, default_value = "data/combinations.csv")]
    combinations: String,

    #[arg(
        global = true,
        short = 'k',
        long,
        default_value = "data/keyboards/standard.json"
    )]
    keyboard: String,

    /// Comma separated key names abilities are measured from.
    #[arg(global = true, long, default_value = "A,S,D,F")]
    home: String,

    /// JSON config file; explicit command line flags take precedence.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Search(cmd::search::SearchArgs),
    Evaluate(cmd::evaluate::EvaluateArgs),
}

fn resolve_config(cli: &Cli, cli_config: &Config, sub_matches: &ArgMatches) -> BfResult<Config> {
    match &cli.config {
        Some(path) => {
            info!("⚖️  Loading config from: {}", path);
            let mut config = Config::load_from_file(path)?;
            config.merge_from_cli(cli_config, sub_matches);
            Ok(config)
        }
        None => Ok(cli_config.clone()),
    }
}

fn load_problem(cli: &Cli, config: &Config) -> BfResult<Arc<BindingProblem>> {
    info!("📂 Loading Keyboard: {}", cli.keyboard);
    let graph = KeyboardDefinition::load_from_file(&cli.keyboard)?
        .build()
        .generate_graph()?;

    info!("📂 Loading Abilities: {}", cli.abilities);
    let abilities = loader::load_abilities_from_path(&cli.abilities)?;

    info!("📂 Loading Combinations: {}", cli.combinations);
    let combinations = loader::load_combinations_from_path(&cli.combinations, &abilities)?;

    let home_names: Vec<&str> = cli
        .home
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if home_names.is_empty() {
        return Err(BindForgeError::Config("--home lists no keys".to_string()));
    }
    let home_nodes = graph.node_indices(&home_names)?;

    info!(
        "Graph: {} keys, {} abilities, {} combinations",
        graph.size(),
        abilities.len(),
        combinations.len()
    );

    ProblemParams::builder()
        .graph(graph)
        .abilities(abilities)
        .combinations(combinations)
        .home_nodes(home_nodes)
        .weights(config.loss.clone())
        .build()
        .into_problem()
        .map(Arc::new)
}

fn run(cli: &Cli, matches: &ArgMatches) -> BfResult<()> {
    let (cli_config, name) = match &cli.command {
        Commands::Search(args) => (&args.config, "search"),
        Commands::Evaluate(args) => (&args.config, "evaluate"),
    };
    let sub_matches = matches
        .subcommand_matches(name)
        .ok_or_else(|| BindForgeError::Config(format!("missing '{}' arguments", name)))?;

    let config = resolve_config(cli, cli_config, sub_matches)?;
    let problem = load_problem(cli, &config)?;

    match &cli.command {
        Commands::Search(_) => cmd::search::run(&config, problem),
        Commands::Evaluate(args) => cmd::evaluate::run(args, problem),
    }
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    info!("🚀 Initializing BindForge...");

    if let Err(e) = run(&cli, &matches) {
        error!("❌ {}", e);
        process::exit(1);
    }
}
