mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use mediabro::{config::ServerConfig, net, server, thumbs::Thumbnailer};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults from the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mediabro=trace,tower_http=debug".to_string()
        } else {
            "mediabro=info,tower_http=info".to_string()
        }
    });
    tracing_subscriber::fmt().with_env_filter(&env_filter).init();

    let domain = cli.domain.clone().unwrap_or_else(|| {
        net::lan_ipv4()
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string())
    });

    let config = ServerConfig::new(&cli.webroot, domain, cli.port, !cli.suppress_size)?;

    if !cli.no_browser {
        let url = config.serve_url();
        if let Err(e) = webbrowser::open(&url) {
            tracing::warn!("Could not open browser at {url}: {e}");
        }
    }

    let ctx = server::AppContext::new(config, Some(Thumbnailer::default()));

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(server::start_server(ctx))
}
