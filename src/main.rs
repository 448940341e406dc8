use anyhow::Result;
use b3scraper::{
    config::Config,
    fetch::HttpSource,
    schema::{self, supported_contracts},
    scrape, store, IntoBulletinDate,
};
use clap::{Parser, Subcommand};
use std::{io, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "b3scraper", version, about = "Scrape B3 derivatives daily bulletins")]
struct Cli {
    /// YAML config file (source URL, timeout, database, output dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape one contract over an inclusive date range
    Scrape {
        /// Contract code, e.g. DI1 (see `list`)
        contract: String,
        /// First date: mm/dd/yyyy, yyyy-mm-dd or yyyymmdd
        start: String,
        /// Last date (defaults to START)
        end: Option<String>,
        /// Upload to the configured database instead of printing
        #[arg(long, conflicts_with_all = ["parquet", "out"])]
        persist: bool,
        /// Write a parquet file to the configured output directory
        #[arg(long)]
        parquet: bool,
        /// Write a parquet file into DIR (implies --parquet)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// List supported contracts
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::List => {
            for (code, family) in supported_contracts() {
                println!("{}\t{}", code, family.as_str());
            }
            Ok(())
        }
        Command::Scrape {
            contract,
            start,
            end,
            persist,
            parquet,
            out,
        } => {
            // ─── 2) config + source ──────────────────────────────────────
            let config = Config::load(cli.config.as_deref())?;
            let source = HttpSource::new(&config.source.url, config.source.timeout())?;

            let start = start.into_bulletin_date()?;
            let end = match end {
                Some(e) => e.into_bulletin_date()?,
                None => start,
            };

            // ─── 3) scrape ───────────────────────────────────────────────
            let Some(table) = scrape(
                &source,
                &contract,
                start,
                end,
                persist,
                config.database.as_ref(),
            )
            .await?
            else {
                info!("uploaded");
                return Ok(());
            };

            // ─── 4) emit ─────────────────────────────────────────────────
            if parquet || out.is_some() {
                let code = schema::lookup(&contract)?.contract;
                let dir = out.unwrap_or(config.output_dir);
                let stem = format!(
                    "{}_{}_{}",
                    code,
                    start.format("%Y%m%d"),
                    end.format("%Y%m%d")
                );
                let path = store::write_table(&table, &dir, &stem)?;
                info!(path = %path.display(), rows = table.len(), "done");
            } else {
                table.write_tsv(io::stdout().lock())?;
            }
            Ok(())
        }
    }
}
