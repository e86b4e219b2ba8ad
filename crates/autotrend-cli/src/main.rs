use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod runner;
mod testers;

#[derive(Debug, Parser)]
#[command(name = "autotrend")]
#[command(about = "Trend-driven article generation pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch trends, generate articles, and store them as draft posts.
    Generate {
        /// Cap on posts created this run, overriding the configured value.
        #[arg(long)]
        max_posts: Option<usize>,
        /// Print the trends that would be processed and exit.
        #[arg(long)]
        dry_run: bool,
    },
    /// FAQ management.
    Faqs {
        #[command(subcommand)]
        command: FaqCommands,
    },
    /// Show recent generation log entries.
    Logs {
        #[arg(long, default_value_t = 1)]
        page: i64,
    },
    /// Apply pending database migrations.
    Migrate,
    /// Connectivity probes for the external services.
    Test {
        #[command(subcommand)]
        command: TestCommands,
    },
}

#[derive(Debug, Subcommand)]
enum FaqCommands {
    /// Generate FAQs for current trends without creating posts.
    Generate {
        #[arg(long, default_value_t = 3)]
        max_trends: usize,
    },
    /// List active FAQs, newest first.
    List {
        #[arg(long, default_value_t = 1)]
        page: i64,
    },
    /// Soft-delete an FAQ by id.
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
enum TestCommands {
    /// Probe the Gemini API with a one-line prompt.
    Gemini,
    /// Probe the OpenAI API with a one-line prompt.
    Openai,
    /// Probe the image search API.
    Pexels,
    /// Run the keyword filter against canned sample trends.
    Filter,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = autotrend_core::load_app_config_from_env()?;

    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    // Filter testing is pure; skip the pool for it.
    if matches!(
        cli.command,
        Commands::Test {
            command: TestCommands::Filter
        }
    ) {
        testers::run_test_filter(&config);
        return Ok(());
    }

    let pool =
        autotrend_db::connect_pool(&config.database_url, autotrend_db::PoolConfig::from_env())
            .await?;

    match cli.command {
        Commands::Generate { max_posts, dry_run } => {
            runner::run_generate(&pool, &config, max_posts, dry_run).await?;
        }
        Commands::Faqs { command } => match command {
            FaqCommands::Generate { max_trends } => {
                runner::run_generate_faqs(&pool, &config, max_trends).await?;
            }
            FaqCommands::List { page } => {
                let faqs = autotrend_db::list_faqs(&pool, page, 20).await?;
                let total = autotrend_db::count_faqs(&pool).await?;
                println!("{total} active FAQs (page {page}):");
                for faq in faqs {
                    println!("  [{}] {}", faq.id, faq.question);
                    println!("      {}", faq.answer);
                }
            }
            FaqCommands::Delete { id } => {
                autotrend_db::soft_delete_faq(&pool, id).await?;
                println!("FAQ {id} deleted");
            }
        },
        Commands::Logs { page } => {
            let logs = autotrend_db::list_generation_logs(&pool, page, 20).await?;
            println!("generation log (page {page}):");
            for log in logs {
                println!(
                    "  {} [{}] {}: {}",
                    log.created_at.format("%Y-%m-%d %H:%M"),
                    log.status,
                    log.trend_title,
                    log.message
                );
            }
        }
        Commands::Migrate => {
            let applied = autotrend_db::run_migrations(&pool).await?;
            println!("applied {applied} migrations");
        }
        Commands::Test { command } => match command {
            TestCommands::Gemini => testers::run_test_gemini(&config).await,
            TestCommands::Openai => testers::run_test_openai(&config).await,
            TestCommands::Pexels => testers::run_test_pexels(&config).await,
            // Handled before pool setup; kept for match exhaustiveness.
            TestCommands::Filter => testers::run_test_filter(&config),
        },
    }

    Ok(())
}
