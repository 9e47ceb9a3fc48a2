use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::{info, warn};

use phrasefind::config::Config;
use phrasefind::model::download;
use phrasefind::model::vectors::WordVectors;
use phrasefind::search::tokenize::normalize_target;
use phrasefind::similarity::embedding::{make_embedding_similarity, EmbeddingSimilarity};
use phrasefind::similarity::set::SetMetric;
use phrasefind::similarity::traits::SimilarityMetric;

/// phrasefind: find the span of a text most similar to a short phrase.
///
/// Slides a window the length of the target over the text and keeps the
/// window that scores highest under the chosen similarity metric.
#[derive(Parser)]
#[command(name = "phrasefind", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the span of TEXT most similar to TARGET
    Search {
        /// The text to search within
        text: String,

        /// The phrase to search for
        target: String,

        /// Similarity metric used to score candidate windows
        #[arg(long, value_enum, default_value = "jaccard")]
        metric: MetricArg,

        /// Show the K best windows instead of only the best one
        #[arg(long)]
        top: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score two phrases against each other under every available metric
    Compare {
        /// First phrase
        a: String,

        /// Second phrase
        b: String,
    },

    /// Run the built-in demonstration texts under every available metric
    Demo,

    /// Download the fastText word vectors (~1.2 GB)
    DownloadModel {
        /// fastText language code (defaults to PHRASEFIND_LANG or "en")
        #[arg(long)]
        lang: Option<String>,
    },

    /// Show configuration and model status
    Status,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MetricArg {
    Jaccard,
    Dice,
    Simpson,
    /// Cosine similarity of mean fastText word vectors (needs download-model).
    /// Words missing from the .vec table get a zero vector rather than a
    /// subword-based one, so rankings can differ from fastText's .bin models.
    Fasttext,
}

/// The demonstration pairs: a sentence and the phrase to look for in it.
const DEMO_CASES: [(&str, &str); 4] = [
    ("Hello World, I'm so happy and enjoy today.", "hello world"),
    (
        "Google Drive, part of Google Workspace, is a safe place to back up and access all your files from any device",
        "google drive",
    ),
    (
        "Google Drive, part of Google Workspace, is a safe place to back up and access all your files from any device",
        "google workspace",
    ),
    (
        "Google Drive, part of Google Workspace:2020, is a safe place to back up and access all your files from any device",
        "google workspace",
    ),
];

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("phrasefind=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            text,
            target,
            metric,
            top,
            json,
        } => {
            let config = Config::load()?;
            let (name, scorer) = create_metric(metric, &config).await?;

            match top {
                Some(k) => {
                    let windows = phrasefind::top_windows(&text, &target, scorer.as_ref(), k)?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&windows)?);
                    } else {
                        phrasefind::output::terminal::display_ranked_windows(&name, &windows);
                    }
                }
                None => {
                    let best = phrasefind::best_window(&text, &target, scorer.as_ref())?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&best)?);
                    } else {
                        phrasefind::output::terminal::display_best_match(
                            &text, &target, &name, &best,
                        );
                    }
                }
            }
        }

        Commands::Compare { a, b } => {
            let config = Config::load()?;
            let xs = normalize_target(&a);
            let ys = normalize_target(&b);

            let mut scores: Vec<(String, f64)> = SetMetric::ALL
                .iter()
                .map(|m| (m.name().to_string(), m.compute(&xs, &ys)))
                .collect();

            if let Some(fasttext) = try_load_embedding(&config).await {
                scores.push(("fasttext".to_string(), fasttext.score(&xs, &ys)?));
            }

            phrasefind::output::terminal::display_comparison(&a, &b, &scores);
        }

        Commands::Demo => {
            let config = Config::load()?;

            let mut metrics: Vec<(String, Box<dyn SimilarityMetric>)> = SetMetric::ALL
                .iter()
                .map(|&m| (m.name().to_string(), Box::new(m) as Box<dyn SimilarityMetric>))
                .collect();
            if let Some(fasttext) = try_load_embedding(&config).await {
                metrics.push(("fasttext".to_string(), Box::new(fasttext)));
            }

            for (text, target) in DEMO_CASES {
                let results = metrics
                    .iter()
                    .map(|(name, metric)| {
                        phrasefind::similarity_search(text, target, metric.as_ref())
                            .map(|matched| (name.clone(), matched))
                    })
                    .collect::<phrasefind::Result<Vec<_>>>()?;
                phrasefind::output::terminal::display_demo_case(text, target, &results);
            }
        }

        Commands::DownloadModel { lang } => {
            let config = Config::load()?;
            let language = lang.unwrap_or_else(|| config.language.clone());

            println!("Downloading fastText word vectors ({language})...");
            println!("  Destination: {}", config.model_dir.display());

            let path = download::download_if_absent(&config.model_dir, &language).await?;

            println!("\n{}", "Word vectors ready.".bold());
            println!("  {}", path.display());
            println!("You can now run `phrasefind search --metric fasttext ...`.");
        }

        Commands::Status => {
            let config = Config::load()?;
            phrasefind::status::show(&config);
        }
    }

    Ok(())
}

/// Build the metric selected on the command line, loading word vectors if needed.
async fn create_metric(
    metric: MetricArg,
    config: &Config,
) -> Result<(String, Box<dyn SimilarityMetric>)> {
    let set_metric = match metric {
        MetricArg::Jaccard => SetMetric::Jaccard,
        MetricArg::Dice => SetMetric::Dice,
        MetricArg::Simpson => SetMetric::Simpson,
        MetricArg::Fasttext => {
            config.require_model()?;
            let embedding = load_embedding(config).await?;
            return Ok(("fasttext".to_string(), Box::new(embedding)));
        }
    };
    Ok((set_metric.name().to_string(), Box::new(set_metric)))
}

/// Load the configured word vectors and bind them into the embedding metric.
///
/// Parsing millions of rows is CPU-bound, so it runs on the blocking pool.
async fn load_embedding(config: &Config) -> Result<EmbeddingSimilarity<WordVectors>> {
    let path = config.resolved_model_path();
    let max_words = config.max_words;

    info!(path = %path.display(), "Loading word vectors");
    let vectors = tokio::task::spawn_blocking(move || WordVectors::load(&path, max_words))
        .await
        .context("spawn_blocking panicked")??;

    Ok(make_embedding_similarity(vectors))
}

/// Try to load the embedding metric for commands that can run without it.
/// Returns None (and says why) if the vectors are missing or fail to load.
async fn try_load_embedding(config: &Config) -> Option<EmbeddingSimilarity<WordVectors>> {
    if !config.model_available() {
        println!(
            "{}",
            "Tip: Run `phrasefind download-model` to include the fasttext metric.".dimmed()
        );
        return None;
    }

    match load_embedding(config).await {
        Ok(metric) => Some(metric),
        Err(e) => {
            warn!("Failed to load word vectors, skipping fasttext metric: {e:#}");
            None
        }
    }
}
