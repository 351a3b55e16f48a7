//! Test registry - all test cases are registered here

pub mod helpers;

use crate::runner::TestCase;

/// Build and return all test cases
///
/// Tests are grouped by category. Each test:
/// 1. Optionally queues a mock upstream response (what steamcommunity.com would return)
/// 2. Sends a request to the REAL proxy
/// 3. Validates the response and what the upstream received
pub fn all_tests() -> Vec<TestCase> {
    macro_rules! test {
        ($name:expr, $desc:expr, $func:path) => {
            TestCase {
                name: $name,
                description: $desc,
                run: Box::new(|ctx| Box::pin($func(ctx))),
            }
        };
    }

    vec![
        // ── Normalization & relay ─────────────────────────────────────────────
        test!(
            "basic/steam64_relayed",
            "Steam64 id is reduced to its 32-bit account id and the HTML relayed",
            basic::test_steam64_relayed
        ),
        test!(
            "basic/account_id_passthrough",
            "Plain 32-bit account ids are forwarded unchanged",
            basic::test_account_id_passthrough
        ),
        test!(
            "basic/percent_encoded_target",
            "Fully percent-encoded miniprofile URL is accepted",
            basic::test_percent_encoded_target
        ),
        test!(
            "basic/steamid_text_forms",
            "STEAM_X:Y:Z and [U:1:N] resolve to the same account",
            basic::test_steamid_text_forms
        ),
        test!(
            "basic/language_and_app_id",
            "l and appId are forwarded; language also sent as Steam_Language cookie",
            basic::test_language_and_app_id_forwarded
        ),
        test!(
            "basic/no_app_id_when_absent",
            "Upstream URL has no appid parameter when appId is absent",
            basic::test_no_app_id_when_absent
        ),
        test!(
            "basic/browser_user_agent",
            "Upstream request carries a browser User-Agent",
            basic::test_browser_user_agent
        ),
        test!(
            "basic/upstream_content_relayed",
            "Upstream headers and body bytes reach the client untouched",
            basic::test_upstream_content_relayed
        ),
        test!(
            "basic/head_without_body",
            "HEAD gets the GET headers and an empty body",
            basic::test_head_without_body
        ),
        test!(
            "basic/concurrent_requests",
            "Concurrent requests each get their own upstream fetch",
            basic::test_concurrent_requests
        ),
        test!(
            "basic/health",
            "/health answers OK without contacting the upstream",
            basic::test_health
        ),

        // ── CORS & caching ────────────────────────────────────────────────────
        test!(
            "cors/preflight_any_path",
            "OPTIONS on any path returns 204 with CORS headers",
            cors::test_preflight_any_path
        ),
        test!(
            "cors/headers_on_success",
            "Successful responses carry Access-Control-Allow-Origin: *",
            cors::test_cors_headers_on_success
        ),
        test!(
            "cors/cache_control_override",
            "Proxy Cache-Control replaces the upstream value",
            cors::test_cache_control_overrides_upstream
        ),

        // ── Errors ────────────────────────────────────────────────────────────
        test!(
            "errors/wrong_prefix",
            "Non-miniprofile URLs get 400 and no upstream call",
            errors::test_wrong_prefix_rejected
        ),
        test!(
            "errors/invalid_identifier",
            "Unparseable identifiers get 400 naming the token",
            errors::test_invalid_identifier_rejected
        ),
        test!(
            "errors/upstream_5xx",
            "Upstream 503 becomes 502 without leaking the upstream body",
            errors::test_upstream_error_mapped
        ),
        test!(
            "errors/upstream_404",
            "Upstream 404 becomes 502",
            errors::test_upstream_not_found_mapped
        ),
        test!(
            "errors/other_methods",
            "POST/PUT/DELETE get 405 with Allow: GET, HEAD, OPTIONS",
            errors::test_other_methods_rejected
        ),
    ]
}
