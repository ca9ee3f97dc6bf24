//! srpa command-line interface.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use srpa::config::{load_settings, Settings};
use srpa::filters::parse_date;
use srpa::{
    ComparisonOperator, FilterBehaviour, FilterEdit, FilterName, Highlighter, LinkBuilder,
    QueryContext, ResultBlock, Selections,
};

#[derive(Parser)]
#[command(name = "srpa", version, about = "Search filter links and result highlighting")]
struct Cli {
    /// Override the search endpoint path
    #[arg(long, global = true, env = "SRPA_SEARCH_PATH")]
    search_path: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP adapter
    Serve {
        #[arg(long, env = "SRPA_HOST")]
        host: Option<String>,
        #[arg(short, long, env = "SRPA_PORT")]
        port: Option<u16>,
    },
    /// Print the href applying a filter to the current query
    Apply {
        /// Current query string
        #[arg(short, long, default_value = "")]
        query: String,
        /// has-value or without-value
        #[arg(short, long, default_value = "has-value")]
        behaviour: String,
        /// Filter label (informe, autor, date, ministerio, "área de gestión")
        #[arg(short, long)]
        filter: String,
        #[arg(short, long)]
        value: Option<String>,
        /// Date for the date filter (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// Comparison label (equal-to, different-to, greater-than, less-than)
        #[arg(short, long)]
        comparison: Option<String>,
    },
    /// Print the href removing a filter from the current query
    Remove {
        #[arg(short, long, default_value = "")]
        query: String,
        /// Wire name of the filter (e.g. autor, fecha, area)
        #[arg(short, long)]
        filter: String,
    },
    /// Print the href of another results page
    Page {
        #[arg(short, long, default_value = "")]
        query: String,
        page: u32,
    },
    /// Highlight terms in a piece of text
    Highlight {
        #[arg(short, long)]
        text: String,
        terms: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings().await;
    if let Some(ref path) = cli.search_path {
        settings.set_search_path(path);
    }

    run(cli.command, settings).await
}

async fn run(command: Commands, settings: Settings) -> anyhow::Result<()> {
    let links = LinkBuilder::new(settings.search_path.clone());

    match command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| settings.host.clone());
            let port = port.unwrap_or(settings.port);
            srpa::server::serve(&settings, &host, port).await?;
        }
        Commands::Apply {
            query,
            behaviour,
            filter,
            value,
            date,
            comparison,
        } => {
            let context = QueryContext::parse(&query)?;
            let behaviour: FilterBehaviour = behaviour.parse()?;
            let filter: FilterName = filter.parse()?;
            let comparison = comparison
                .map(|c| c.parse::<ComparisonOperator>())
                .transpose()?;

            // one comparison flag feeds whichever dropdown the filter uses
            let selections = Selections {
                value,
                date: date.as_deref().map(parse_date).transpose()?,
                comparison,
                date_comparison: comparison,
            };
            let edit = FilterEdit::from_selections(behaviour, filter, &selections)?;
            println!("{}", links.apply(&context, &edit));
        }
        Commands::Remove { query, filter } => {
            let context = QueryContext::parse(&query)?;
            println!("{}", links.remove(&context, &filter));
        }
        Commands::Page { query, page } => {
            let context = QueryContext::parse(&query)?;
            println!("{}", links.page(&context, page));
        }
        Commands::Highlight { text, terms } => {
            let highlighter = Highlighter::new(settings.highlight_config());
            let block = ResultBlock {
                id: "cli".to_string(),
                body: text,
                ..Default::default()
            };
            if let Some(result) = highlighter.highlight_result(&[block], "cli", &terms) {
                println!("{}", result.body);
            }
        }
    }

    Ok(())
}
