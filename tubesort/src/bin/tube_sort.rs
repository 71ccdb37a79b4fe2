use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use tubesort::collector::ShortestCollector;
use tubesort::levels::{parse_level_arg, LevelArg};
use tubesort::mover::Step;
use tubesort::solver::Solver;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Finds the shortest ways to sort colored tiles into tubes", long_about = None)]
struct Args {
    /// Levels to solve as `<level>[:<steps>]`; level is "easy", "hard", "random" or a board file
    #[clap(required = true)]
    levels: Vec<String>,

    /// Maximum number of steps for levels that do not name one
    #[clap(short, long, default_value_t = 10)]
    steps: usize,

    /// Seed for random levels (defaults to OS entropy)
    #[clap(long)]
    seed: Option<u64>,

    /// Number of worker threads (0 = one per CPU)
    #[clap(short = 'j', long, default_value_t = 0)]
    threads: usize,

    /// Search on a single thread, reporting solutions as they are found
    #[clap(long)]
    sequential: bool,
}

fn format_steps(steps: &[Step]) -> String {
    let parts: Vec<String> = steps.iter().map(Step::to_string).collect();
    format!("[{}]", parts.join(", "))
}

fn solve_and_print(arg: &LevelArg, sequential: bool) -> tubesort::Result<()> {
    println!("-- Solving level \"{}\" --", arg.level.name());

    let solver = Solver::from_level(arg.level.as_ref())?;
    println!("{}\n", solver.game().to_colored_string());
    info!(
        level = arg.level.name(),
        max_steps = arg.max_steps,
        tubes = solver.game().tube_count(),
        "searching"
    );

    let collector = ShortestCollector::new();
    let stopper = |steps: &[Step]| steps.len() >= arg.max_steps || collector.exceeds(steps);
    let report = |steps: Vec<Step>| {
        let printed = format_steps(&steps);
        if collector.offer(steps) {
            println!("Possible solution: {}", printed);
        }
    };

    if sequential {
        let mut solutions = solver.solutions_until(stopper);
        for steps in solutions.by_ref() {
            report(steps);
        }
        let stats = solutions.stats();
        info!(
            expanded = stats.expanded,
            aborted = stats.aborted,
            dead_ends = stats.dead_ends,
            "search finished"
        );
    } else {
        solver.par_solve_until(stopper, report);
    }

    let best = collector.best();
    if best.is_empty() {
        println!("No solution found within {} steps.", arg.max_steps);
    } else {
        println!();
        for steps in &best {
            println!("Best solution: {}", format_steps(steps));
        }
    }
    println!();
    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tubesort=info"));
    fmt().with_env_filter(filter).with_target(true).compact().init();

    let args = Args::parse();

    if args.threads > 0 {
        if let Err(err) = rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
        {
            warn!("could not configure the thread pool: {}", err);
        }
    }

    let mut levels = Vec::with_capacity(args.levels.len());
    for level in &args.levels {
        match parse_level_arg(level, args.steps, args.seed) {
            Ok(parsed) => levels.push(parsed),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
    }

    for level in &levels {
        if let Err(e) = solve_and_print(level, args.sequential) {
            eprintln!("Failed to solve level \"{}\": {}", level.level.name(), e);
            std::process::exit(1);
        }
    }
}
