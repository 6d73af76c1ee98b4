use std::sync::Arc;

use bastion::config;
use bastion::server;

fn usage() -> ! {
    eprintln!("usage: bastion <path/bastion.conf>");
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let mut args = std::env::args().skip(1);
    let path = match (args.next(), args.next()) {
        (Some(path), None) => path,
        _ => usage(),
    };
    let Ok(text) = std::fs::read_to_string(&path) else {
        usage();
    };

    let servers = match config::build(&text) {
        Ok(servers) => servers,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Configuration OK, {} server block(s)", servers.len());

    let servers = Arc::new(servers);

    tokio::select! {
        res = server::listener::run(servers) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
