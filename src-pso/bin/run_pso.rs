use clap::{Parser, ValueEnum};
use ndarray::Array1;
use std::fmt::Write as FmtWrite;
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use swarmopt_pso::function_registry::FunctionRegistry;
use swarmopt_pso::{
    Init, Optimizer, PSOConfig, ParallelConfig, PSOReport, rowwise, run_recorded_pso,
};

const DEFAULT_BOUND: (f64, f64) = (-5.0, 5.0);

#[derive(Parser, Debug)]
#[command(
    name = "run_pso",
    about = "Optimize a benchmark function with global-best particle swarm optimization"
)]
struct Cli {
    /// Name of the benchmark function to optimize (use --list-functions to see available options)
    #[arg(long)]
    function: Option<String>,

    /// Dimensionality of the problem (defaults to the function's fixed dimension, or 2)
    #[arg(long)]
    dim: Option<usize>,

    /// Number of particles (overrides the config file)
    #[arg(long)]
    particles: Option<usize>,

    /// Number of iterations
    #[arg(long, default_value_t = 100)]
    iters: usize,

    /// Cognitive coefficient
    #[arg(long)]
    c1: Option<f64>,

    /// Social coefficient
    #[arg(long)]
    c2: Option<f64>,

    /// Inertia (momentum) coefficient
    #[arg(long)]
    m: Option<f64>,

    /// Initialization scheme for the swarm
    #[arg(long, value_enum)]
    init: Option<InitChoice>,

    /// Optional random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Report progress every N iterations (defaults to a tenth of the run)
    #[arg(long)]
    report_every: Option<usize>,

    /// 0 = silent, 1 = progress, 2 = detailed
    #[arg(long)]
    verbose: Option<u8>,

    /// JSON or YAML file with a base configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Let particles move freely instead of staying in the function's box
    #[arg(long)]
    no_bounds: bool,

    /// Write the per-iteration trace to CSV (default directory: $SWARMOPT_DIR/data_generated/records)
    #[arg(long, num_args = 0..=1)]
    record: Option<Option<PathBuf>>,

    /// Disable parallel evaluation of the particles
    #[arg(long)]
    no_parallel: bool,

    /// Number of threads for parallel evaluation (0 = use all available cores)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,

    /// List all available functions and exit
    #[arg(long)]
    list_functions: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum InitChoice {
    Random,
    LatinHypercube,
}

impl From<InitChoice> for Init {
    fn from(choice: InitChoice) -> Self {
        match choice {
            InitChoice::Random => Init::Random,
            InitChoice::LatinHypercube => Init::LatinHypercube,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();
    let registry = FunctionRegistry::new();

    if args.list_functions {
        list_available_functions(&registry);
        return;
    }

    let function_name = match &args.function {
        Some(name) => name.trim().to_lowercase(),
        None => {
            eprintln!("Error: --function must be provided unless --list-functions is used.");
            process::exit(2);
        }
    };

    let function = match registry.get(&function_name) {
        Some(f) => f,
        None => {
            eprintln!(
                "Error: function '{function_name}' not found. Use --list-functions to inspect available names."
            );
            process::exit(2);
        }
    };

    let fixed_dimension = registry.metadata(&function_name).and_then(|m| m.fixed_dimension);
    let dimension = args.dim.or(fixed_dimension).unwrap_or(2);
    if dimension == 0 {
        eprintln!("Error: problem dimension must be greater than zero.");
        process::exit(2);
    }

    let bounds = match registry.bounds(&function_name, dimension) {
        Some(b) => b,
        None if fixed_dimension.is_some() => {
            eprintln!(
                "Error: '{function_name}' is only defined in {} dimensions.",
                fixed_dimension.unwrap_or_default()
            );
            process::exit(2);
        }
        None => vec![DEFAULT_BOUND; dimension],
    };

    if args.iters == 0 {
        eprintln!("Error: --iters must be at least 1.");
        process::exit(2);
    }
    let report_every = args.report_every.unwrap_or((args.iters / 10).max(1));
    if report_every == 0 {
        eprintln!("Error: --report-every must be at least 1.");
        process::exit(2);
    }

    let config = build_config(&args, dimension, &bounds).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        process::exit(2);
    });

    log::info!(
        "Running PSO on '{}' ({}D) with {} particles for {} iterations...",
        function_name,
        dimension,
        config.n_particles,
        args.iters
    );

    let start = Instant::now();
    let objective = move |x: &Array1<f64>| function(x);
    let result = match &args.record {
        Some(dir) if !args.no_bounds => {
            let dir = match dir {
                Some(d) => d.clone(),
                None => swarmopt_env::get_records_dir().unwrap_or_else(|err| {
                    eprintln!("Error: {err}");
                    process::exit(2);
                }),
            };
            run_recorded_pso(
                &function_name,
                objective,
                &bounds,
                config,
                args.iters,
                Some(report_every),
                dir,
            )
            .map(|(report, _)| report)
        }
        Some(_) => {
            eprintln!("Error: --record needs the function's bounds; drop --no-bounds.");
            process::exit(2);
        }
        None => Optimizer::new(&config).and_then(|mut pso| {
            pso.optimize(rowwise(objective, config.parallel.clone()), args.iters, report_every)
        }),
    };

    let report = match result {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: optimization failed: {}", e);
            process::exit(if e.is_objective_error() { 1 } else { 2 });
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Error: cannot serialize report: {e}");
                process::exit(1);
            }
        }
    } else {
        print_summary(&report, start);
    }
}

/// Config file first, then command line overrides, then defaults for
/// whatever hyperparameter is still unset.
fn build_config(args: &Cli, dimension: usize, bounds: &[(f64, f64)]) -> Result<PSOConfig, String> {
    let mut config = match &args.config {
        Some(path) => PSOConfig::load(path).map_err(|e| format!("{}: {}", path.display(), e))?,
        None => PSOConfig::default(),
    };

    config.dims = dimension;
    config.bounds = if args.no_bounds {
        None
    } else {
        Some(swarmopt_pso::BoundsSpec {
            lower: bounds.iter().map(|b| b.0).collect(),
            upper: bounds.iter().map(|b| b.1).collect(),
        })
    };

    let hp = &mut config.hyperparameters;
    hp.c1 = args.c1.or(hp.c1).or(Some(0.5));
    hp.c2 = args.c2.or(hp.c2).or(Some(0.3));
    hp.m = args.m.or(hp.m).or(Some(0.9));

    if let Some(n) = args.particles {
        config.n_particles = n;
    }
    if let Some(init) = args.init {
        config.init = init.into();
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(verbose) = args.verbose {
        config.verbose = verbose;
    }
    if args.no_parallel || args.threads > 0 {
        config.parallel = ParallelConfig {
            enabled: !args.no_parallel,
            num_threads: if args.threads == 0 {
                None
            } else {
                Some(args.threads)
            },
        };
    }
    Ok(config)
}

fn print_summary(report: &PSOReport, start: Instant) {
    println!("\nOptimization completed in {:.2?}", start.elapsed());
    println!("Iterations: {} | Evaluations: {}", report.nit, report.nfev);
    println!("Best objective: {:.6e}", report.global_best_cost);

    let mut best_vector = String::new();
    for (idx, value) in report.global_best_position.iter().enumerate() {
        if idx > 0 {
            best_vector.push_str(", ");
        }
        let _ = write!(&mut best_vector, "{value:.6}");
    }
    println!("Best parameters: [{}]", best_vector);
}

fn list_available_functions(registry: &FunctionRegistry) {
    let names = registry.names();
    println!("Available test functions ({}):", names.len());
    for name in names {
        match registry.metadata(name) {
            Some(meta) => println!("- {name}: {}", meta.description),
            None => println!("- {name}"),
        }
    }
}
