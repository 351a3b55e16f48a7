//! Common test helpers and assertions

use crate::mock_steam::drain_requests;
use crate::runner::TestContext;
use crate::types::{ProxyResponse, ReceivedRequest};

// ─── Upstream inspection ──────────────────────────────────────────────────────

/// Drain the mock upstream log and require exactly one request
pub fn single_upstream_request(ctx: &TestContext) -> anyhow::Result<ReceivedRequest> {
    let mut reqs = drain_requests(&ctx.upstream_state);
    if reqs.len() != 1 {
        return Err(anyhow::anyhow!("Expected 1 upstream request, got {}: {:?}", reqs.len(), reqs));
    }
    Ok(reqs.remove(0))
}

/// Require that the proxy did not contact the upstream at all
pub fn assert_no_upstream_request(ctx: &TestContext) -> anyhow::Result<()> {
    let reqs = drain_requests(&ctx.upstream_state);
    assert_true(
        reqs.is_empty(),
        &format!("Proxy should not contact upstream, but sent: {:?}", reqs),
    )
}

// ─── Assertion helpers ────────────────────────────────────────────────────────

/// Assert the response status
pub fn assert_status(resp: &ProxyResponse, expected: u16) -> anyhow::Result<()> {
    if resp.status != expected {
        Err(anyhow::anyhow!("Expected {}, got {} (body: {:?})", expected, resp.status, resp.body))
    } else {
        Ok(())
    }
}

/// Assert a response header has exactly this value
pub fn assert_header(resp: &ProxyResponse, name: &str, expected: &str) -> anyhow::Result<()> {
    match resp.header(name) {
        Some(actual) => assert_eq_str(actual, expected, &format!("header {name}")),
        None => Err(anyhow::anyhow!("Missing header {name}")),
    }
}

/// Assert two strings are equal, with context on failure
pub fn assert_eq_str(actual: &str, expected: &str, label: &str) -> anyhow::Result<()> {
    if actual != expected {
        Err(anyhow::anyhow!("{label}: expected {:?} but got {:?}", expected, actual))
    } else {
        Ok(())
    }
}

/// Assert condition is true, with message
pub fn assert_true(cond: bool, msg: &str) -> anyhow::Result<()> {
    if !cond {
        Err(anyhow::anyhow!("{}", msg))
    } else {
        Ok(())
    }
}
