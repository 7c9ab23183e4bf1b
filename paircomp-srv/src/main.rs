//! paircomp-srv - Pairwise comparison survey server
//!
//! Serves the survey API: session opening via access codes, manifest and
//! method content retrieval, next-pair scheduling, vote submission and
//! offline vote-log sync.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use paircomp_common::api::auth::load_session_secret;
use paircomp_common::config;
use paircomp_common::content::ContentStore;
use paircomp_common::db::init::init_database;
use paircomp_common::manifest::Manifest;
use paircomp_common::tie::TiePolicy;
use paircomp_srv::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "paircomp-srv", about = "Pairwise comparison survey server")]
struct Args {
    /// Root folder holding the database, manifest and method content
    #[arg(long)]
    root_folder: Option<String>,

    /// Listen port
    #[arg(long, default_value_t = 5860)]
    port: u16,

    /// Provision N participants with fresh access codes, print them and
    /// exit
    #[arg(long)]
    provision: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Paircomp survey server (paircomp-srv) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref());
    config::ensure_root_folder(&root_folder)?;

    let db_path = config::database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    if let Some(count) = args.provision {
        for _ in 0..count {
            let participant = paircomp_srv::db::create_participant(&pool, None).await?;
            println!(
                "{}  {}",
                participant.participant_id, participant.access_code
            );
        }
        info!("Provisioned {} participant(s)", count);
        return Ok(());
    }

    let manifest = Manifest::load(&config::manifest_path(&root_folder))?;
    info!(
        "✓ Loaded manifest: {} components, {} methods",
        manifest.components.len(),
        manifest.methods.len()
    );

    let contents = ContentStore::load(&config::content_dir(&root_folder), &manifest)?;
    info!("✓ Loaded method content");

    let session_secret = load_session_secret(&pool).await?;
    info!("✓ Session secret ready");

    let state = AppState::new(pool, manifest, contents, TiePolicy::default(), session_secret);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", args.port)).await?;
    info!("paircomp-srv listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
