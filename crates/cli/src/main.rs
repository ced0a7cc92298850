use anyhow::Context;
use clap::{Parser, Subcommand};

use bookstore_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Bookstore REST API
#[derive(Debug, Parser)]
#[command(name = "bookstore", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply migrations and serve the HTTP API until Ctrl-C
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Print the resolved configuration as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load bookstore settings")?;

    match cli.command {
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
        Command::Migrate => {
            bookstore_telemetry::init(&settings.telemetry)?;
            let registry = registry();
            let db = bookstore_db::connect(&settings.database).await?;
            let applied = bookstore_db::migrate(&db, &registry.collect_migrations()).await?;
            tracing::info!(applied, "migrations complete");
            db.close().await;
            Ok(())
        }
        Command::Serve => {
            bookstore_telemetry::init(&settings.telemetry)?;
            serve(&settings).await
        }
    }
}

fn registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    bookstore_app::modules::register_all(&mut registry);
    registry
}

async fn serve(settings: &Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "bookstore bootstrap starting"
    );

    let registry = registry();
    let db = bookstore_db::connect(&settings.database).await?;
    bookstore_db::migrate(&db, &registry.collect_migrations()).await?;

    let ctx = InitCtx { settings, db: &db };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = bookstore_http::start_server(&registry, settings, &db).await;

    registry.stop_modules().await?;
    db.close().await;
    served
}
