use anyhow::Context;
use chrono::Local;
use clap::{Parser, ValueEnum};
use ruleval::{init_run_logging, EvalConfig, Evaluator, InductorKind, PrecomputedInductor, Task};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Evaluates generated relation paraphrases with BLEU, METEOR, ROUGE-L and self-BLEU.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Generative inductor (rule or comet)
    #[arg(long, default_value = "rule")]
    inductor: InductorKind,

    /// Group beam search decoding of the rule inductor
    #[arg(long)]
    group_beam: bool,

    /// Continued pretraining of the instance generator
    #[arg(long)]
    mlm_training: bool,

    /// Continued pretraining of the hypothesis generator
    #[arg(long)]
    bart_training: bool,

    /// If-then prompt template
    #[arg(long)]
    if_then: bool,

    /// Task to evaluate
    #[arg(long, default_value = "openrule155")]
    task: Task,

    /// Directory containing the task files
    #[arg(long, default_value = ".", env = "RULEVAL_DATA_DIR")]
    data_dir: PathBuf,

    /// Generations file. Defaults to generations/<variant>/<task>.jsonl under the data directory
    #[arg(long)]
    generations: Option<PathBuf>,

    /// Number of instances sampled by the inductor
    #[arg(long, default_value = "10")]
    k: usize,

    /// Maximum number of hypotheses per example
    #[arg(long, default_value = "10")]
    topk: usize,

    /// Directory of the log files
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Do not draw the progress bar over the rows of the task file
    #[arg(long)]
    no_progress: bool,

    /// Format of the report printed on stdout
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl Args {
    fn config(&self) -> EvalConfig {
        let builder = EvalConfig::builder()
            .data_dir(&self.data_dir)
            .task(self.task)
            .k(self.k)
            .topk(self.topk)
            .inductor(self.inductor)
            .group_beam(self.group_beam)
            .mlm_training(self.mlm_training)
            .bart_training(self.bart_training)
            .if_then(self.if_then)
            .progress(!self.no_progress);
        match &self.generations {
            Some(path) => builder.generations(path).build(),
            None => builder.build(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let log_file = init_run_logging(&args.log_dir, Local::now().naive_local())
        .with_context(|| format!("Could not set up logging in {}", args.log_dir.display()))?;

    let config = args.config();
    for line in config.to_string().lines() {
        info!("{}", line);
    }

    let generations = config.generations_path(config.task);
    let inductor = PrecomputedInductor::from_jsonl(&generations)?;
    info!(
        "Loaded {} generations of the {} inductor",
        inductor.len(),
        config.inductor.variant_name()
    );

    let report = Evaluator::new(inductor, config).run()?;
    match args.format {
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    info!("Log written to {}", log_file.display());
    Ok(())
}
