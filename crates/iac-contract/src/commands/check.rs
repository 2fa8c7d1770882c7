//! Parse deployment outputs and run the offline checks over them.

use super::{Context, OutputSource, load_blueprint_outputs, report_error};
use crate::checks::{CheckResult, CheckStatus, Expectations, run_checks};
use iac_contract_core::Framework;
use iac_contract_output::{OutputFormatter, dim, status_mark};
use serde::Serialize;

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct CheckReport {
    pub framework: String,
    pub source: String,
    pub results: Vec<CheckResult>,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl CheckReport {
    pub fn new(framework: Framework, source: String, results: Vec<CheckResult>) -> Self {
        let count = |status: CheckStatus| results.iter().filter(|r| r.status == status).count();
        Self {
            framework: framework.label().to_string(),
            source,
            passed: count(CheckStatus::Passed),
            failed: count(CheckStatus::Failed),
            skipped: count(CheckStatus::Skipped),
            results,
        }
    }

    pub fn ok(&self) -> bool {
        self.failed == 0
    }

    fn totals(&self) -> String {
        format!(
            "{} passed, {} failed, {} skipped",
            self.passed, self.failed, self.skipped
        )
    }
}

impl OutputFormatter for CheckReport {
    fn format_text(&self) -> String {
        let mut lines = Vec::new();
        for result in &self.results {
            lines.push(format!("{} {}", result.status.as_str(), result.name));
            for message in &result.messages {
                lines.push(format!("  {message}"));
            }
        }
        lines.push(format!("{}: {}", self.framework, self.totals()));
        lines.join("\n")
    }

    fn format_pretty(&self, colors: bool) -> String {
        let mut lines = Vec::new();
        for result in &self.results {
            let mark = match result.status {
                CheckStatus::Passed => status_mark(true, colors),
                CheckStatus::Failed => status_mark(false, colors),
                CheckStatus::Skipped => dim("-", colors),
            };
            lines.push(format!("{mark} {}", result.name));
            for message in &result.messages {
                lines.push(format!("    {}", dim(message, colors)));
            }
        }
        lines.push(String::new());
        lines.push(format!(
            "{} {} ({})",
            self.framework,
            self.totals(),
            dim(&self.source, colors)
        ));
        lines.join("\n")
    }
}

pub fn cmd_check(ctx: &Context, framework: Framework, source: OutputSource) -> i32 {
    let outputs = match load_blueprint_outputs(ctx, framework, &source) {
        Ok(outputs) => outputs,
        Err(err) => return report_error(&err),
    };
    let expect = Expectations::from(&ctx.config);
    let report = CheckReport::new(framework, source.describe(), run_checks(&outputs, &expect));
    report.print(&ctx.format);
    if report.ok() { 0 } else { 1 }
}
