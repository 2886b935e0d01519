use clap::{Parser, Subcommand};
use std::path::PathBuf;

use opp_eval::config::Config;
use opp_eval::scoring::{ScoredUseCase, WeightSet, WeightsConfig};
use opp_eval::session::Session;

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 2;
const EXIT_ARGS: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// List use cases ranked by Priority Score (default if no subcommand)
    List {
        /// Tab-separated output for scripting
        #[arg(long, conflicts_with = "json")]
        tsv: bool,
        /// Ranked rows as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Show ratings and score breakdown for one use case
    Show {
        /// Rank of the use case (1-based, as shown in list)
        index: usize,
    },
    /// Top opportunities and a short narrative for a workshop readout
    Summary {
        /// Number of top opportunities (config top_n, else min(5, rows))
        #[arg(long)]
        top: Option<usize>,
    },
    /// Write the scored table as CSV
    Export {
        /// Destination file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Sort rows by Priority Score instead of table order
        #[arg(long)]
        ranked: bool,
    },
    /// Create a config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
        /// Write the defaults without prompting
        #[arg(short, long)]
        yes: bool,
    },
    /// Interactive session: edit ratings, tune weights, watch the ranking move
    Tui {
        /// Initial number of top opportunities on the Summary tab
        #[arg(long)]
        top: Option<usize>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "opp-eval")]
#[command(about = "Score and rank AI use cases by value and change readiness", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/opp-eval/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed CSV with use cases (built-in examples if omitted or missing)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Business Value weight
    #[arg(long, global = true)]
    w_value: Option<f64>,

    /// Technical Feasibility weight
    #[arg(long, global = true)]
    w_feasibility: Option<f64>,

    /// Data Readiness weight
    #[arg(long, global = true)]
    w_data: Option<f64>,

    /// Change Impact weight (penalty)
    #[arg(long, global = true)]
    w_change: Option<f64>,

    /// Risk weight (penalty)
    #[arg(long, global = true)]
    w_risk: Option<f64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn weight_overrides(&self) -> WeightsConfig {
        WeightsConfig {
            value: self.w_value,
            feasibility: self.w_feasibility,
            data: self.w_data,
            change: self.w_change,
            risk: self.w_risk,
        }
    }
}

fn print_errors(heading: &str, errors: &[String]) {
    eprintln!("{}:", heading);
    for error in errors {
        eprintln!("  - {}", error);
    }
}

/// Weights from config overlaid with command-line flags.
fn effective_weights(config: &Config, cli: &Cli) -> Result<WeightSet, Vec<String>> {
    let overrides = cli.weight_overrides();
    opp_eval::scoring::validate_weights(&overrides)?;

    let merged = config.weights.clone().unwrap_or_default().merge(&overrides);
    Ok(merged.resolve(&WeightSet::default()))
}

#[tokio::main]
async fn main() {
    let mut cli = Cli::parse();
    opp_eval::logging::init_logging(cli.verbose);

    let command = cli.command.take().unwrap_or(Commands::List {
        tsv: false,
        json: false,
    });

    // Init runs before config loading: it is how a broken config gets replaced
    if let Commands::Init { force, yes } = command {
        if let Err(e) = opp_eval::config::init::run_init_wizard(cli.config.clone(), yes, force) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match opp_eval::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = opp_eval::config::validate_config(&config) {
        print_errors("Config errors", &errors);
        std::process::exit(EXIT_CONFIG);
    }

    let weights = match effective_weights(&config, &cli) {
        Ok(w) => w,
        Err(errors) => {
            print_errors("Invalid weight flags", &errors);
            std::process::exit(EXIT_ARGS);
        }
    };

    let top_flag = match command {
        Commands::Summary { top } | Commands::Tui { top } => top,
        _ => None,
    };
    if top_flag == Some(0) {
        eprintln!("--top must be at least 1");
        std::process::exit(EXIT_ARGS);
    }

    // Load seed use cases (flag wins over config)
    let data_path = cli.data.clone().or_else(|| config.data_path.clone());
    let use_cases = match opp_eval::seed::load_seed(data_path.as_deref()) {
        Ok(u) => u,
        Err(e) => {
            eprintln!("Data error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    tracing::debug!(
        rows = use_cases.len(),
        weight_sum = weights.sum(),
        "session ready"
    );

    let session = Session::new(use_cases, weights);
    let top_n = top_flag
        .or(config.top_n)
        .unwrap_or_else(|| opp_eval::insights::default_top_n(session.len()));

    let use_colors = opp_eval::output::should_use_colors();

    match command {
        Commands::List { tsv, json } => {
            let ranked = session.ranked();
            if json {
                match opp_eval::output::format_json(&ranked) {
                    Ok(out) => println!("{}", out),
                    Err(e) => {
                        eprintln!("Failed to serialize: {:#}", e);
                        std::process::exit(EXIT_DATA);
                    }
                }
            } else if tsv {
                print!("{}", opp_eval::output::format_tsv(&ranked));
            } else {
                println!("{}", opp_eval::output::format_ranked_table(&ranked, use_colors));
            }
        }
        Commands::Show { index } => {
            let ranked = session.ranked();
            if index < 1 || index > ranked.len() {
                eprintln!(
                    "Invalid index {}. Valid range: 1-{}",
                    index,
                    ranked.len()
                );
                std::process::exit(EXIT_ARGS);
            }
            let row = &ranked[index - 1];
            match session.breakdown(row.index) {
                Some(breakdown) => println!(
                    "{}",
                    opp_eval::output::format_use_case_detail(row, &breakdown, use_colors)
                ),
                None => {
                    eprintln!("Use case {} not found", index);
                    std::process::exit(EXIT_ARGS);
                }
            }
        }
        Commands::Summary { .. } => {
            let ranked = session.ranked();
            let summary = opp_eval::insights::Summary::from_ranked(&ranked, top_n);
            println!("{}", opp_eval::output::format_summary(&summary, use_colors));
        }
        Commands::Export { output, ranked } => {
            let rows: Vec<ScoredUseCase> = if ranked {
                session.ranked().into_iter().map(|r| r.scored).collect()
            } else {
                session.scored()
            };
            let refs: Vec<&ScoredUseCase> = rows.iter().collect();

            let result = match output {
                Some(ref path) => opp_eval::seed::export_scored_csv(path, &refs).map(|_| {
                    eprintln!("Wrote {} rows to {}", refs.len(), path.display());
                }),
                None => opp_eval::seed::write_scored_csv(std::io::stdout().lock(), &refs),
            };
            if let Err(e) = result {
                eprintln!("Export failed: {:#}", e);
                std::process::exit(EXIT_DATA);
            }
        }
        Commands::Tui { .. } => {
            let app = opp_eval::tui::App::new(session, top_n);
            if let Err(e) = opp_eval::tui::run_tui(app).await {
                eprintln!("TUI error: {:#}", e);
                std::process::exit(EXIT_DATA);
            }
        }
        // Handled before config loading
        Commands::Init { .. } => {}
    }

    std::process::exit(EXIT_SUCCESS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_top_belongs_to_summary_and_tui() {
        let cli = Cli::try_parse_from(["opp-eval", "summary", "--top", "3"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Summary { top: Some(3) })));

        let cli = Cli::try_parse_from(["opp-eval", "tui", "--top", "2"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Tui { top: Some(2) })));

        assert!(Cli::try_parse_from(["opp-eval", "list", "--top", "3"]).is_err());
        assert!(Cli::try_parse_from(["opp-eval", "--top", "3", "summary"]).is_err());
    }

    #[test]
    fn test_weight_flags_stay_global() {
        let cli = Cli::try_parse_from(["opp-eval", "summary", "--w-risk", "4"]).unwrap();
        assert_eq!(cli.weight_overrides().risk, Some(4.0));
        assert_eq!(cli.weight_overrides().value, None);
    }

    #[test]
    fn test_effective_weights_flag_over_config() {
        let config = Config {
            weights: Some(WeightsConfig {
                value: Some(1.0),
                risk: Some(1.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let cli = Cli::try_parse_from(["opp-eval", "--w-risk", "4"]).unwrap();
        let weights = effective_weights(&config, &cli).unwrap();
        assert_eq!(weights.value, 1.0);
        assert_eq!(weights.risk, 4.0);
        assert_eq!(weights.feasibility, WeightSet::default().feasibility);

        let cli = Cli::try_parse_from(["opp-eval", "--w-data=-1"]).unwrap();
        assert!(effective_weights(&config, &cli).is_err());
    }
}
