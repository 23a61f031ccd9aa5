use brrtrouter::config::{Cli, Config};
use brrtrouter::denylist::Denylist;
use brrtrouter::pool::ClientPool;
use brrtrouter::router::Router;
use brrtrouter::server::{AppService, HttpServer};
use brrtrouter::spec::load_spec_full;
use brrtrouter::validator_cache::ValidatorCache;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;
    init_logging(&config.log.level);

    let (routes, security_schemes, _title) = load_spec_full(
        cli.spec
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("spec path is not valid UTF-8"))?,
    )?;

    let validator_cache = ValidatorCache::new(true);
    validator_cache.precompile_schemas(&routes);
    let router = Router::new(routes);

    let denylist = match &config.denylist.tokens.file {
        Some(path) => Denylist::load(
            path,
            config.denylist.tokens.cookie_name.clone(),
            config.denylist.tokens.header_name.clone(),
        )?,
        None => Denylist::empty(
            config.denylist.tokens.cookie_name.clone(),
            config.denylist.tokens.header_name.clone(),
        ),
    };

    let pool = Arc::new(ClientPool::new(&config.server)?);
    let listen_addr = cli.listen_addr.unwrap_or_else(|| config.listen.addr.clone());

    let service = AppService::new(
        router,
        config,
        denylist,
        pool,
        validator_cache,
        security_schemes,
    )?;

    let server = HttpServer(service)
        .start(listen_addr.as_str())
        .map_err(|e| anyhow::anyhow!("failed to start server on {listen_addr}: {e}"))?;
    tracing::info!(addr = %listen_addr, "API firewall listening");

    install_shutdown_handler();

    server
        .join()
        .map_err(|e| anyhow::anyhow!("server task panicked: {e:?}"))?;
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(unix)]
fn install_shutdown_handler() {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = match Signals::new([SIGINT, SIGTERM]) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "failed to install signal handler");
            return;
        }
    };
    std::thread::spawn(move || {
        if signals.forever().next().is_some() {
            tracing::info!("shutdown signal received, exiting");
            std::process::exit(0);
        }
    });
}

#[cfg(not(unix))]
fn install_shutdown_handler() {}
