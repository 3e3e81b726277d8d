use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use eyre::{Result, WrapErr};

use phisheye::batch::{run_batch_scan, BatchConfig, ReportFormat};
use phisheye::config::load_config;
use phisheye::noise::{NoNoise, NoiseSource, RngNoise};
use phisheye::{config_hash, Analysis, EnsembleConfig, EnsembleScorer, Verdict, VerdictPolicy};

#[derive(Parser)]
#[command(
    name = "phisheye",
    version,
    about = "Heuristic phishing classifier for URLs. Nothing is fetched; only the URL text is analyzed."
)]
struct Cli {
    #[command(flatten)]
    scoring: ScoringArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ScoringArgs {
    /// JSON file overriding weights, thresholds, policy or indicator lists
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verdict policy: three-class or two-class
    #[arg(long, global = true)]
    policy: Option<VerdictPolicy>,

    /// Seed the scoring noise for reproducible results
    #[arg(long, global = true, conflicts_with = "no_noise")]
    seed: Option<u64>,

    /// Disable scoring noise entirely
    #[arg(long, global = true)]
    no_noise: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a single URL
    Check {
        /// URL to analyze
        url: String,

        /// Output format: json or summary
        #[arg(long, default_value = "summary")]
        format: String,
    },

    /// Check every URL in a file (one per line)
    Batch {
        /// File with one URL per line; blank lines and # comments are skipped
        #[arg(long)]
        input: PathBuf,

        /// Output format: json, csv or summary
        #[arg(long, default_value = "summary")]
        format: ReportFormat,

        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Only report these verdicts (repeatable)
        #[arg(long)]
        filter: Vec<Verdict>,
    },
}

fn load_ensemble_config(args: &ScoringArgs) -> Result<EnsembleConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => EnsembleConfig::default(),
    };
    if let Some(policy) = args.policy {
        config.policy = policy;
    }
    Ok(config)
}

fn noise_source(args: &ScoringArgs) -> Box<dyn NoiseSource> {
    if args.no_noise {
        Box::new(NoNoise)
    } else if let Some(seed) = args.seed {
        Box::new(RngNoise::seeded(seed))
    } else {
        Box::new(RngNoise::thread())
    }
}

fn print_summary(analysis: &Analysis, hash: &str) {
    let result = &analysis.result;
    let features = &analysis.features;

    println!("URL Phishing Scan Results");
    println!("=========================");
    println!("URL: {}", analysis.url);
    println!();
    println!("Verdict:    {}", result.verdict.headline());
    println!("Policy:     {}", result.policy);
    println!("Confidence: {:.1}%", result.confidence * 100.0);
    println!("Reasoning:  {}", analysis.reasoning);
    println!();
    println!("Scores:");
    println!("  XGBOOST:   {:.1}%", result.scores.xgboost * 100.0);
    println!("  LOGISTIC:  {:.1}%", result.scores.logistic * 100.0);
    println!("  GAUSSIAN:  {:.1}%", result.scores.gaussian * 100.0);
    println!();
    println!("Features:");
    println!(
        "  length {} / host {} / https {}",
        features.url_length, features.domain_length, features.has_https
    );
    println!(
        "  dots {} / dashes {} / digits {} / subdomains {}",
        features.num_dots, features.num_dashes, features.num_digits, features.num_subdomains
    );
    println!(
        "  ip {} / suspicious tld {} / shortener {}",
        features.has_ip_address, features.has_suspicious_tld, features.has_url_shortener
    );
    println!("  entropy {:.3}", features.entropy);
    println!();
    println!("Config Hash: {}", hash);
}

fn cmd_check(scoring: &ScoringArgs, url: String, format: String) -> Result<i32> {
    let config = load_ensemble_config(scoring)?;
    let hash = config_hash(&config);
    let mut scorer = EnsembleScorer::with_noise(config, noise_source(scoring));
    scorer.initialize()?;

    let analysis = scorer.analyze(&url)?;

    match format.as_str() {
        "json" => {
            let result = serde_json::json!({
                "success": true,
                "analysis": analysis,
                "config_hash": hash,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => print_summary(&analysis, &hash),
    }

    if analysis.result.verdict.is_dangerous() {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn cmd_batch(
    scoring: &ScoringArgs,
    input: PathBuf,
    format: ReportFormat,
    output: Option<PathBuf>,
    filter: Vec<Verdict>,
) -> Result<()> {
    let config = load_ensemble_config(scoring)?;
    let mut scorer = EnsembleScorer::with_noise(config, noise_source(scoring));
    scorer.initialize()?;

    let batch = BatchConfig {
        input,
        format,
        output,
        filter,
    };
    run_batch_scan(&batch, &mut scorer).wrap_err("Batch scan failed")?;
    Ok(())
}

fn main() {
    // Logs go to stderr so stdout stays clean for reports.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,phisheye=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { url, format } => match cmd_check(&cli.scoring, url, format) {
            Ok(code) => {
                if code != 0 {
                    std::process::exit(code);
                }
                Ok(())
            }
            Err(e) => Err(e),
        },
        Commands::Batch {
            input,
            format,
            output,
            filter,
        } => cmd_batch(&cli.scoring, input, format, output, filter),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}
