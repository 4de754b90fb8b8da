use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use pf_arch::{CompiledArchitecture, PropulsionResult};
use pf_graph::NodeKind;
use pf_project::{ProjectResult, RunOutcome};
use tracing::debug;

#[derive(Parser)]
#[command(name = "pf-cli")]
#[command(about = "PropFlow CLI - Propulsion architecture compiler and power-balance solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and compile a case file, then print its topology
    Validate {
        /// Path to the case YAML or JSON file
        case_path: PathBuf,
    },
    /// Solve the runs of a case
    Run {
        /// Path to the case YAML or JSON file
        case_path: PathBuf,
        /// Only solve this run
        #[arg(short, long)]
        run: Option<String>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the compiled graph in evaluation order
    Graph {
        /// Path to the case YAML or JSON file
        case_path: PathBuf,
        /// Number of analysis points to compile for
        #[arg(short, long, default_value_t = 1)]
        nodes: usize,
    },
}

fn main() -> ProjectResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Run {
            case_path,
            run,
            json,
        } => cmd_run(&case_path, run.as_deref(), json),
        Commands::Graph { case_path, nodes } => cmd_graph(&case_path, nodes),
    }
}

fn cmd_validate(case_path: &Path) -> ProjectResult<()> {
    println!("Validating case: {}", case_path.display());
    let case = pf_project::load(case_path)?;
    let compiled = pf_project::compile_case(&case, 1)?;

    println!("✓ {} is valid", case.name);
    print_topology(&compiled);
    println!("  Runs: {}", case.runs.len());
    for run in &case.runs {
        println!("    {} ({} points)", run.name, run.num_nodes);
    }
    Ok(())
}

fn print_topology(compiled: &CompiledArchitecture) {
    println!("  Lanes:");
    for lane in compiled.lanes() {
        println!("    thrust{} - {}", lane.index + 1, lane.kind);
    }
    match compiled.electric() {
        Some(electric) => println!("  Electrical layer: {}", electric.kind),
        None => println!("  Electrical layer: none"),
    }
    println!("  Nodes: {}", compiled.graph().nodes().len());
    println!("  Balances: {}", compiled.balances().len());
    for balance in compiled.balances() {
        println!("    {}", balance.element);
    }
}

fn cmd_run(case_path: &Path, run: Option<&str>, json: bool) -> ProjectResult<()> {
    let case = pf_project::load(case_path)?;
    debug!(case = %case.name, runs = case.runs.len(), "loaded case");
    let outcomes = pf_project::run_case(&case, run)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
        return Ok(());
    }

    println!("Case: {}", case.name);
    if outcomes.is_empty() {
        println!("No runs defined");
    }
    for outcome in &outcomes {
        print_outcome(outcome);
    }
    Ok(())
}

fn print_outcome(outcome: &RunOutcome) {
    let r: &PropulsionResult = &outcome.result;
    println!();
    println!(
        "Run: {} ({} iterations, residual {:.3e})",
        outcome.run, r.iterations, r.residual_norm
    );
    println!("  Fuel flow [kg/s]:   {}", series(&r.fuel_flow_kg_per_s, 5));
    println!("  Thrust [N]:         {}", series(&r.thrust_n, 1));
    println!("  SOC [-]:            {}", series(&r.soc, 4));
    println!("  System weight [kg]: {:.1}", r.propulsion_system_weight_kg);

    println!("  Lanes:");
    for lane in &r.lanes {
        println!("    thrust{} ({})", lane.lane, lane.kind);
        println!("      shaft power [kW]: {}", series(&lane.shaft_power_kw, 1));
        println!("      thrust [N]:       {}", series(&lane.thrust_n, 1));
        println!("      weight [kg]:      {:.1}", lane.weight_kg);
        if let Some(load) = &lane.elec_load_kw {
            println!("      elec load [kW]:   {}", series(load, 1));
        }
    }

    if !r.balances.is_empty() {
        println!("  Balances:");
        for b in &r.balances {
            println!("    {}: throttle {}", b.element, series(&b.throttle, 4));
        }
    }
}

fn series(values: &[f64], decimals: usize) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|v| format!("{v:.prec$}", prec = decimals))
        .collect();
    format!("[{}]", items.join(", "))
}

fn cmd_graph(case_path: &Path, nodes: usize) -> ProjectResult<()> {
    let case = pf_project::load(case_path)?;
    let compiled = pf_project::compile_case(&case, nodes)?;
    let graph = compiled.graph();

    println!("Evaluation order ({} nodes):", graph.evaluation_order().len());
    for (i, id) in graph.evaluation_order().iter().enumerate() {
        if let Some(node) = graph.node(*id) {
            println!("  {:>3}  {}", i + 1, node.name);
        }
    }

    let implicit: Vec<&str> = graph
        .nodes()
        .iter()
        .filter(|n| n.kind == NodeKind::Implicit)
        .map(|n| n.name.as_str())
        .collect();
    println!("Implicit nodes ({}):", implicit.len());
    for name in implicit {
        println!("  {name}");
    }
    println!("Unknowns: {}", compiled.unknown_count());
    println!("Feedback connections: {}", graph.feedback_count());
    Ok(())
}
