//! Test runner - executes cases in order and reports per category

use colored::Colorize;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use crate::types::SharedUpstreamState;

type CaseFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// A single test case, named `category/case`
pub struct TestCase {
    pub name: &'static str,
    pub description: &'static str,
    pub run: Box<dyn Fn(TestContext) -> CaseFuture + Send + Sync>,
}

impl TestCase {
    /// Category prefix of the name (`cors`, `errors`, `basic`)
    pub fn category(&self) -> &'static str {
        self.name.split_once('/').map_or(self.name, |(category, _)| category)
    }
}

/// Context passed to each test - proxy address and mock Steam state
#[derive(Clone)]
pub struct TestContext {
    pub proxy_addr: String,
    pub upstream_addr: String,
    pub upstream_state: SharedUpstreamState,
    pub http_client: reqwest::Client,
}

/// Pass/fail counts per category
#[derive(Debug, Default)]
pub struct Summary {
    by_category: BTreeMap<&'static str, (usize, usize)>,
    failures: Vec<&'static str>,
}

impl Summary {
    fn record(&mut self, case: &TestCase, passed: bool) {
        let counts = self.by_category.entry(case.category()).or_default();
        if passed {
            counts.0 += 1;
        } else {
            counts.1 += 1;
            self.failures.push(case.name);
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }

    fn print(&self) {
        println!("\n{}", "───────────────────────────────────────────────────".bright_blue());
        for (category, (passed, failed)) in &self.by_category {
            let line = format!("  {:<8} {} passed, {} failed", category, passed, failed);
            if *failed == 0 {
                println!("{}", line.green());
            } else {
                println!("{}", line.red());
            }
        }
        for name in &self.failures {
            println!("  {} {}", "✗".bright_red(), name);
        }

        let (passed, failed) = self
            .by_category
            .values()
            .fold((0, 0), |(p, f), (cp, cf)| (p + cp, f + cf));
        let total = format!("  Total:   {} passed, {} failed", passed, failed);
        if failed == 0 {
            println!("{}", total.bright_green().bold());
        } else {
            println!("{}", total.bright_red().bold());
        }
        println!("{}\n", "═══════════════════════════════════════════════════".bright_blue());
    }
}

/// Run matching cases sequentially, resetting the mock before each
pub async fn run_tests(cases: &[TestCase], ctx: TestContext, filter: Option<&str>) -> Summary {
    println!("\n{}", "═══════════════════════════════════════════════════".bright_blue());
    println!("{}", "  miniprofile-proxy End-to-End Tests".bright_white().bold());
    println!("{}", "═══════════════════════════════════════════════════".bright_blue());
    println!("  Proxy:   {}", ctx.proxy_addr.bright_cyan());
    println!("  Steam:   {}", ctx.upstream_addr.bright_cyan());

    let selected: Vec<&TestCase> = cases
        .iter()
        .filter(|c| filter.map_or(true, |f| c.name.contains(f)))
        .collect();
    println!("  Running: {} test(s)\n", selected.len().to_string().bright_cyan());

    let mut summary = Summary::default();
    for case in selected {
        {
            let mut state = ctx.upstream_state.lock().unwrap();
            state.response_queue.clear();
            state.received_requests.clear();
        }

        let start = Instant::now();
        print!("  {} {} ... ", "▶".bright_blue(), case.name.bright_white());

        let result = (case.run)(ctx.clone()).await;
        let duration_ms = start.elapsed().as_millis();

        match &result {
            Ok(()) => println!("{} ({duration_ms}ms)", "PASS".bright_green().bold()),
            Err(e) => {
                println!("{} ({duration_ms}ms)", "FAIL".bright_red().bold());
                println!("    {} {}", "Error:".bright_red(), e);
                for cause in e.chain().skip(1) {
                    println!("    {} {}", "Caused by:".yellow(), cause);
                }
            }
        }
        summary.record(case, result.is_ok());
    }

    summary.print();
    summary
}

/// Print the registered cases grouped by category
pub fn list_tests(cases: &[TestCase]) {
    let mut grouped: BTreeMap<&str, Vec<&TestCase>> = BTreeMap::new();
    for case in cases {
        grouped.entry(case.category()).or_default().push(case);
    }

    println!("\n{}", "Available tests:".bright_white().bold());
    for (category, cases) in grouped {
        println!("\n  {} ({})", category.bright_white().bold(), cases.len());
        for case in cases {
            println!("    {} - {}", case.name.bright_cyan(), case.description);
        }
    }
    println!();
}
