//! Test environment: the mock Steam upstream plus the proxy under test
//!
//! The proxy is either spawned from a built binary, pointed at the mock with
//! `--upstream-url`, or an already-running instance given by address.

use colored::Colorize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::{Child, Command};

use crate::client;
use crate::mock_steam;
use crate::runner::TestContext;
use crate::types::SharedUpstreamState;

/// Proxy binary candidates, tried in order
const PROXY_BIN_CANDIDATES: &[&str] = &["../target/release/miniprofile-proxy", "../target/debug/miniprofile-proxy"];

/// How the proxy under test is reached
pub enum ProxyTarget {
    /// Spawn this binary with the given config, listening on `port`
    Spawn { bin: PathBuf, config: PathBuf, port: u16 },
    /// Use a proxy that is already running; its upstream must be the mock port
    Existing { addr: String },
}

impl ProxyTarget {
    /// Spawn target using the first proxy build found next to this crate
    pub fn spawn_default(config: PathBuf, port: u16) -> anyhow::Result<Self> {
        let bin = PROXY_BIN_CANDIDATES
            .iter()
            .map(Path::new)
            .find(|p| p.exists())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No proxy binary found. Tried: {}\nBuild with: cd .. && cargo build --release",
                    PROXY_BIN_CANDIDATES.join(", ")
                )
            })?;
        println!("Using proxy binary: {}", bin.display().to_string().bright_cyan());
        Ok(Self::Spawn {
            bin: bin.to_path_buf(),
            config,
            port,
        })
    }
}

/// Running mock Steam and proxy, torn down by `shutdown` or on drop
pub struct Harness {
    mock_addr: String,
    mock_state: SharedUpstreamState,
    proxy_addr: String,
    proxy: Option<Child>,
}

impl Harness {
    /// Start the mock Steam upstream, then bring up the proxy and wait until it is healthy
    pub async fn start(mock_port: u16, target: ProxyTarget) -> anyhow::Result<Self> {
        println!("Starting mock Steam upstream on port {}...", mock_port);
        let mock_state = mock_steam::start(mock_port).await?;
        let mock_addr = format!("127.0.0.1:{}", mock_port);

        let (proxy_addr, proxy) = match target {
            ProxyTarget::Existing { addr } => (addr, None),
            ProxyTarget::Spawn { bin, config, port } => {
                let child = spawn_proxy(&bin, &config, port, &mock_addr)?;
                (format!("127.0.0.1:{}", port), Some(child))
            }
        };

        println!("Waiting for proxy at {}...", proxy_addr);
        wait_until_healthy(&proxy_addr).await?;
        println!("Proxy is ready!\n");

        Ok(Self {
            mock_addr,
            mock_state,
            proxy_addr,
            proxy,
        })
    }

    /// Context handed to each test case
    pub fn context(&self) -> TestContext {
        TestContext {
            proxy_addr: self.proxy_addr.clone(),
            upstream_addr: self.mock_addr.clone(),
            upstream_state: self.mock_state.clone(),
            http_client: client::build_client(),
        }
    }

    /// Stop a spawned proxy; an existing proxy is left running
    pub async fn shutdown(mut self) {
        if let Some(mut child) = self.proxy.take() {
            child.kill().await.ok();
        }
    }
}

/// Launch `miniprofile-proxy run`, overriding its port and upstream to match the harness
fn spawn_proxy(bin: &Path, config: &Path, port: u16, mock_addr: &str) -> anyhow::Result<Child> {
    let upstream_url = format!("http://{}", mock_addr);
    println!(
        "Spawning proxy: {} run --config {} --port {} --upstream-url {}",
        bin.display(),
        config.display(),
        port,
        upstream_url
    );

    Command::new(bin)
        .arg("run")
        .arg("--config")
        .arg(config)
        .arg("--port")
        .arg(port.to_string())
        .arg("--upstream-url")
        .arg(&upstream_url)
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| anyhow::anyhow!("Failed to spawn '{}': {}", bin.display(), e))
}

/// Poll `/health` with backoff until it answers `OK`
async fn wait_until_healthy(addr: &str) -> anyhow::Result<()> {
    let client = client::build_client();
    let health_url = format!("http://{}/health", addr);

    for attempt in 0..30 {
        tokio::time::sleep(Duration::from_millis(200 + attempt * 100)).await;
        let Ok(resp) = client.get(&health_url).send().await else {
            continue;
        };
        if resp.status().is_success() && resp.text().await.is_ok_and(|body| body == "OK") {
            return Ok(());
        }
    }

    Err(anyhow::anyhow!(
        "Proxy at {} never reported healthy. Is the binary correct?",
        addr
    ))
}
