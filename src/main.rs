use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use lantern::config::Config;
use lantern::server;

#[derive(Parser)]
#[command(version, about = "Serves files from a static directory over HTTP/1.1")]
struct Cli {
    /// Path of a YAML configuration file.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Address to listen on, e.g. 0.0.0.0:3333.
    #[arg(short, long, value_name = "ADDR")]
    listen: Option<String>,
    /// Directory the files are served from.
    #[arg(long = "static", value_name = "PATH")]
    static_dir: Option<PathBuf>,
}

/// Accepts the single-dash `-static <path>` spelling as well.
fn args() -> impl Iterator<Item = OsString> {
    std::env::args_os().map(|arg| {
        if arg == "-static" {
            OsString::from("--static")
        } else {
            arg
        }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_from(args());

    let mut cfg = Config::load(cli.config.as_deref())?;
    if let Some(addr) = cli.listen {
        cfg.server.listen_addr = addr;
    }
    if let Some(root) = cli.static_dir {
        cfg.static_files.root = root;
    }
    cfg.validate()?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(cfg.log_level()?)
        .init();

    if !cfg.static_files.root.is_dir() {
        tracing::warn!(
            root = %cfg.static_files.root.display(),
            "Static root is not a directory, every request will be answered with 404"
        );
    }

    tokio::select! {
        res = server::listener::run(&cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
