//! Naming convention conversion.

use super::Context;
use clap::ValueEnum;
use iac_contract_casing::{camel_to_snake, snake_to_camel};
use iac_contract_output::{OutputFormatter, dim};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Case {
    /// camelCase → snake_case (Bicep → canonical)
    Snake,
    /// snake_case → camelCase (canonical → Bicep)
    Camel,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct Conversion {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct CaseReport {
    pub case: Case,
    pub names: Vec<Conversion>,
}

impl OutputFormatter for CaseReport {
    fn format_text(&self) -> String {
        self.names
            .iter()
            .map(|c| c.output.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_pretty(&self, colors: bool) -> String {
        self.names
            .iter()
            .map(|c| format!("{} {} {}", c.input, dim("→", colors), c.output))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn build_case_report(case: Case, names: &[String]) -> CaseReport {
    let convert: fn(&str) -> String = match case {
        Case::Snake => camel_to_snake,
        Case::Camel => snake_to_camel,
    };
    CaseReport {
        case,
        names: names
            .iter()
            .map(|name| Conversion {
                input: name.clone(),
                output: convert(name),
            })
            .collect(),
    }
}

pub fn cmd_case(ctx: &Context, case: Case, names: &[String]) -> i32 {
    build_case_report(case, names).print(&ctx.format);
    0
}
