use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use env_flags::env_flags;
use once_cell::sync::OnceCell;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, Layer, Registry, prelude::*};

use launch_price_api::config::{UserConfig, expand_home, load_user_config, pick};
use launch_price_api::{ArtifactBundle, InferencePipeline, handler};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug, Clone, Copy)]
enum LogStyle {
    Json,
    Compact,
    Pretty,
    Full,
}

fn fmt_layer<W>(style: LogStyle, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = tracing_subscriber::fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer);
    match style {
        LogStyle::Json => base.json().boxed(),
        LogStyle::Compact => base.compact().boxed(),
        LogStyle::Pretty => base.pretty().boxed(),
        LogStyle::Full => base.boxed(),
    }
}

fn env_set(key: &str) -> bool {
    std::env::var_os(key).is_some()
}

fn init_tracing(home: &Path, user_cfg: Option<&UserConfig>) {
    env_flags! {
        /// Tracing filter, e.g. "info", "debug", or targets format.
        RUST_LOG: &str = "info";
        /// Preferred filter env (alias). If set, overrides RUST_LOG.
        TRACING_FILTER: &str = "";
        /// Pretty formatting for logs (ignored if TRACING_JSON or TRACING_COMPACT is true).
        TRACING_PRETTY: bool = false;
        /// Compact single-line formatting for logs (ignored if TRACING_JSON=true)
        TRACING_COMPACT: bool = true;
        /// JSON formatting for logs
        TRACING_JSON: bool = false;
        /// If true, also log to a daily file under LOG_DIR (default <home>/logs)
        LOG_TO_FILE: bool = false;
        /// Optional explicit log directory (absolute).
        LOG_DIR: &str = "";
    }

    let logging = user_cfg.and_then(|c| c.logging());

    let env_filter = if !(*TRACING_FILTER).is_empty() {
        (*TRACING_FILTER).to_string()
    } else {
        (*RUST_LOG).to_string()
    };
    let level = pick(
        env_set("TRACING_FILTER") || env_set("RUST_LOG"),
        env_filter,
        logging.and_then(|l| l.level.clone()),
    );
    let json = pick(env_set("TRACING_JSON"), *TRACING_JSON, logging.and_then(|l| l.json));
    let compact = pick(
        env_set("TRACING_COMPACT"),
        *TRACING_COMPACT,
        logging.and_then(|l| l.compact),
    );
    let pretty = pick(
        env_set("TRACING_PRETTY"),
        *TRACING_PRETTY,
        logging.and_then(|l| l.pretty),
    );
    let to_file = pick(env_set("LOG_TO_FILE"), *LOG_TO_FILE, logging.and_then(|l| l.to_file));
    let log_dir = if !(*LOG_DIR).is_empty() {
        Some(PathBuf::from((*LOG_DIR).to_string()))
    } else {
        logging.and_then(|l| l.dir.as_deref()).map(expand_home)
    };

    let style = if json {
        LogStyle::Json
    } else if compact {
        LogStyle::Compact
    } else if pretty {
        LogStyle::Pretty
    } else {
        LogStyle::Full
    };

    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    // The worker guard must outlive every log call, so it lives in a static.
    static FILE_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();
    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(style, std::io::stderr, true)];
    let mut dir_error = None;
    if to_file {
        let dir = log_dir.unwrap_or_else(|| home.join("logs"));
        match std::fs::create_dir_all(&dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(&dir, "launch-price-api.log");
                let (nb, guard) = tracing_appender::non_blocking(appender);
                let _ = FILE_GUARD.set(guard);
                layers.push(fmt_layer(style, nb, false));
            }
            Err(e) => dir_error = Some((dir, e)),
        }
    }

    if let Err(e) = tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
    {
        tracing::debug!("tracing already set: {:?}", e);
    }
    if let Some((dir, e)) = dir_error {
        tracing::warn!("failed to create log dir {}: {}", dir.display(), e);
    }
}

fn resolve_home() -> PathBuf {
    match std::env::var("LAUNCH_PRICE_HOME") {
        Ok(h) if !h.is_empty() => PathBuf::from(h),
        _ => match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home).join(".launch-price"),
            Err(_) => std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".launch-price"),
        },
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let home = resolve_home();
    let (user_cfg, cfg_error) = match load_user_config(&home) {
        Ok(cfg) => (cfg, None),
        Err(e) => (None, Some(e)),
    };

    init_tracing(&home, user_cfg.as_ref());
    if let Some(e) = cfg_error {
        tracing::warn!("ignoring unreadable config in {}: {:#}", home.display(), e);
    }

    env_flags! {
        /// Bind address
        HOST: &str = "0.0.0.0";
        /// Bind port
        PORT: u16 = 8000;
        /// Artifact bundle directory (manifest.toml, vocabularies, scaler, tree)
        ARTIFACTS_DIR: &str = "./artifacts";
    }

    let server = user_cfg.as_ref().and_then(|c| c.server());
    let host = pick(
        env_set("HOST"),
        (*HOST).to_string(),
        server.and_then(|s| s.host.clone()),
    );
    let port = pick(env_set("PORT"), *PORT, server.and_then(|s| s.port));
    let artifacts_dir = pick(
        env_set("ARTIFACTS_DIR"),
        expand_home(*ARTIFACTS_DIR),
        user_cfg.as_ref().and_then(|c| c.artifacts_dir()),
    );

    tracing::info!("starting launch-price-api {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("home={}", home.display());

    // No traffic is accepted unless every artifact loads.
    let bundle = ArtifactBundle::load(&artifacts_dir).map_err(|e| {
        tracing::error!("refusing to start: {}", e);
        e
    })?;
    let pipeline = Arc::new(InferencePipeline::from_bundle(bundle));
    tracing::info!(model_version = %pipeline.model_version(), "pipeline ready");

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("failed to bind {}:{}", host, port))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, handler::router(pipeline))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    tracing::info!("server stopped");
    Ok(())
}
