use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use styleaudit::{
    default_output_path, load_config, plan_jobs, review_file, run_batch, task_ttl, AuditConfig,
    ConfigOrigin, DocumentValidator, FileStorage, InMemoryTaskStore, NoOpStorage, OutputFormat,
    ReviewSettings, ReviewStorage, RuleTable, TaskStore, ValidationOptions,
};

#[derive(Parser)]
#[command(name = "styleaudit")]
#[command(about = "Audit exported documents for heading numbering, heading fonts and indentation")]
struct Args {
    /// HTML export(s) to validate
    #[arg(short, long, num_args = 1.., required_unless_present = "show_config")]
    input: Vec<PathBuf>,

    /// Markdown rule table (id | scenario | description | example | operation)
    #[arg(short, long, required_unless_present = "show_config")]
    rules: Option<PathBuf>,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format: issues or report
    #[arg(short = 'f', long, default_value = "issues")]
    output_format: String,

    /// Output file path for a single input (if not specified, auto-generated based on input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write one review per input into this directory (forces batch mode)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Cache reviews as JSON files under this directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Skip cache and force fresh validation
    #[arg(long)]
    skip_cache: bool,

    /// Print per-stage timings
    #[arg(long)]
    profile: bool,

    /// Also write the parsed document beside each review as <name>_document.json (useful for authoring configs)
    #[arg(long)]
    dump_document: bool,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    show_config: bool,

    /// Raise the default log level to debug (RUST_LOG still wins)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    println!("🦀 styleaudit Document Validator");

    let (config, origin) = load_config(args.config.as_deref());
    match &origin {
        ConfigOrigin::File(path) => println!("📋 Loaded config from: {}", path.display()),
        ConfigOrigin::Default => println!("📋 Using default config"),
        ConfigOrigin::Fallback { path, error } => {
            println!("⚠️  Could not load config {}: {}", path.display(), error);
            println!("📋 Using default config");
        }
    }

    if args.show_config {
        println!("\n{}", config.to_yaml()?);
        return Ok(());
    }

    let rules_path = args.rules.as_deref().context("--rules is required")?;
    let rules = RuleTable::load(rules_path)
        .with_context(|| format!("Failed to load rule table {}", rules_path.display()))?;
    println!("📖 Loaded {} rules from: {}", rules.len(), rules_path.display());

    let format = OutputFormat::from_name(&args.output_format).unwrap_or_else(|| {
        println!(
            "⚠️  Unknown output format '{}', using default issues format",
            args.output_format
        );
        OutputFormat::Issues
    });
    let settings = ReviewSettings {
        options: ValidationOptions {
            skip_cache: args.skip_cache,
            profile: args.profile,
        },
        format,
        dump_document: args.dump_document,
    };

    let task_expiry = task_ttl(config.task_expiry_seconds);
    let validator = create_validator(config, rules, args.cache_dir.as_deref())?;

    let all_ok = if args.input.len() == 1 && args.output_dir.is_none() {
        run_single(&validator, &args.input[0], args.output.clone(), &settings)
    } else {
        if args.output.is_some() {
            println!("⚠️  --output is ignored with several inputs, use --output-dir");
        }
        run_many(&validator, &args, &settings, task_expiry)
    };

    if !all_ok {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Create DocumentValidator with file storage when a cache directory is given
fn create_validator(
    config: AuditConfig,
    rules: RuleTable,
    cache_dir: Option<&Path>,
) -> Result<DocumentValidator> {
    let storage: Box<dyn ReviewStorage> = match cache_dir {
        Some(dir) => {
            println!("🗄️  Using review cache: {}", dir.display());
            Box::new(
                FileStorage::new(dir)
                    .with_context(|| format!("Failed to open cache {}", dir.display()))?,
            )
        }
        None => Box::new(NoOpStorage::new()),
    };
    Ok(DocumentValidator::with_storage(config, rules, storage)?)
}

fn run_single(
    validator: &DocumentValidator,
    input: &Path,
    output: Option<PathBuf>,
    settings: &ReviewSettings,
) -> bool {
    if !input.exists() {
        println!("⚠️  Input document not found at: {}", input.display());
        println!("   Please check the file path.");
        return false;
    }

    println!("📄 Processing: {}", input.display());
    let output_path = output.unwrap_or_else(|| default_output_path(input, None));

    match review_file(validator, input, &output_path, settings) {
        Ok(outcome) => {
            println!("✅ Successfully validated document");
            if outcome.cached {
                println!("   (served from cache)");
            }
            println!("📊 Issues: {}", outcome.result.len());
            for (rule_id, count) in outcome.result.counts_by_rule() {
                println!("   - {}: {}", rule_id, count);
            }
            println!(
                "💾 {} format results saved to: {}",
                settings.format.name(),
                output_path.display()
            );
            outcome.profiler.print_summary();
            true
        }
        Err(e) => {
            eprintln!("❌ Validation failed: {e:#}");
            false
        }
    }
}

fn run_many(
    validator: &DocumentValidator,
    args: &Args,
    settings: &ReviewSettings,
    task_expiry: chrono::Duration,
) -> bool {
    let jobs = plan_jobs(&args.input, args.output_dir.as_deref());
    println!("📚 Batch mode: {} documents", jobs.len());

    let store = InMemoryTaskStore::new();
    let outcomes = run_batch(validator, &jobs, settings, &store);

    let swept = store.sweep_expired(chrono::Utc::now(), task_expiry);
    if swept > 0 {
        println!("🧹 Removed {} expired tasks", swept);
    }

    println!("\n📋 Task summary:");
    for outcome in &outcomes {
        let status = store
            .get(&outcome.task_id)
            .map(|record| format!("{:?}", record.status))
            .unwrap_or_else(|| "Expired".to_string());
        match (&outcome.issues, &outcome.error) {
            (Some(issues), _) => println!(
                "   ✅ [{}] {} → {} ({} issues{})",
                status,
                outcome.input.display(),
                outcome.output.display(),
                issues,
                if outcome.cached { ", cached" } else { "" }
            ),
            (None, error) => println!(
                "   ❌ [{}] {}: {}",
                status,
                outcome.input.display(),
                error.as_deref().unwrap_or("unknown error")
            ),
        }
    }

    let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
    println!(
        "\n📊 {} succeeded, {} failed",
        outcomes.len() - failed,
        failed
    );

    failed == 0
}
