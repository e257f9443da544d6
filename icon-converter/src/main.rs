#![recursion_limit = "256"]

use anyhow::Context as _;
use clap::Parser;
use icon_converter::catalog::PgCatalog;
use icon_converter::store::build_store;
use icon_converter::Pipeline;

use self::cli::{Cli, Commands};

mod cli;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();

	if let Err(err) = binary_helper::init_logging(&cli.logging) {
		eprintln!("{:#}", err);
		std::process::exit(1);
	}

	if let Err(err) = start(cli).await {
		tracing::error!("{:#}", err);
		std::process::exit(1);
	}
}

async fn start(cli: Cli) -> anyhow::Result<()> {
	let pool = binary_helper::global::setup_database(&cli.database)?;
	let catalog = PgCatalog::new(pool);

	let command = cli.command.clone().unwrap_or_default();

	if let Commands::Migrate = command {
		return catalog.ensure_schema().await.context("failed to migrate catalog");
	}

	let store = build_store(cli.store, &cli.bucket, cli.store_root.clone())
		.await
		.context("failed to setup object store")?;

	tracing::info!(bucket = %cli.bucket.name, store = ?cli.store, "starting icon conversion");

	let pipeline = Pipeline::new(catalog, store, cli.converter.clone());

	match command {
		Commands::Pending { limit } => {
			let records = pipeline.pending(limit).await.context("failed to list pending icons")?;
			cli::display::records(&records, cli.json)
		}
		Commands::Convert { dry_run: true, limit } => {
			let actions = pipeline.plan(limit).await.context("failed to plan conversion")?;
			cli::display::plan(&actions, cli.json)
		}
		Commands::Convert { dry_run: false, limit } => {
			let cancel = binary_helper::signal::shutdown_token().context("failed to install signal handlers")?;
			let summary = pipeline.run(limit, &cancel).await.context("conversion aborted")?;
			cli::display::summary(&summary, cli.json)
		}
		Commands::Migrate => Ok(()),
	}
}
