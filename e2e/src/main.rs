//! miniprofile-proxy e2e test runner
//!
//! Starts a mock steamcommunity.com, spawns the built proxy pointed at it and
//! runs every registered case against the real binary.
//!
//!   cargo run                              # spawn the proxy build, run all tests
//!   cargo run -- --list                    # list tests by category
//!   cargo run -- --filter cors/            # one category
//!   cargo run -- --proxy-addr 127.0.0.1:3000 --mock-port 18080
//!                                          # use a running proxy whose upstream is the mock

mod client;
mod harness;
mod mock_steam;
mod runner;
mod tests;
mod types;

use clap::{Args, Parser};
use harness::{Harness, ProxyTarget};
use runner::{list_tests, run_tests};
use std::path::PathBuf;
use tests::all_tests;

#[derive(Parser)]
#[command(
    name = "e2e",
    about = "End-to-end tests for miniprofile-proxy",
    long_about = "Spawns the proxy binary against a mock Steam upstream, runs the tests, then kills it.\n\
                  With --proxy-addr an already-running proxy is used instead."
)]
struct Cli {
    /// List tests by category and exit
    #[arg(long)]
    list: bool,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args)]
struct RunArgs {
    /// Only run tests whose name contains this string (e.g. "errors/")
    #[arg(long, short)]
    filter: Option<String>,

    /// Port for the mock Steam upstream
    #[arg(long, default_value_t = 18080)]
    mock_port: u16,

    /// Use a running proxy at this address instead of spawning one
    #[arg(long, conflicts_with = "proxy_bin")]
    proxy_addr: Option<String>,

    /// Proxy binary to spawn [default: ../target/release, then ../target/debug]
    #[arg(long)]
    proxy_bin: Option<PathBuf>,

    /// Config for the spawned proxy; port and upstream URL are overridden
    #[arg(long, default_value = "test_configs/proxy.yaml")]
    proxy_config: PathBuf,

    /// Listen port for the spawned proxy
    #[arg(long, default_value_t = 18066)]
    proxy_port: u16,
}

impl RunArgs {
    fn proxy_target(&self) -> anyhow::Result<ProxyTarget> {
        if let Some(addr) = &self.proxy_addr {
            return Ok(ProxyTarget::Existing { addr: addr.clone() });
        }
        match &self.proxy_bin {
            Some(bin) => Ok(ProxyTarget::Spawn {
                bin: bin.clone(),
                config: self.proxy_config.clone(),
                port: self.proxy_port,
            }),
            None => ProxyTarget::spawn_default(self.proxy_config.clone(), self.proxy_port),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cases = all_tests();

    if cli.list {
        list_tests(&cases);
        return Ok(());
    }

    let harness = Harness::start(cli.run.mock_port, cli.run.proxy_target()?).await?;
    let summary = run_tests(&cases, harness.context(), cli.run.filter.as_deref()).await;
    harness.shutdown().await;

    if !summary.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}
