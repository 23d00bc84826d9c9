use category_graph_core::{rabbit_hole, CategoryStore, RabbitHoleReport};
use serde_json::Value;

use crate::error::CliError;

pub fn run<S: CategoryStore>(store: &S) -> Result<RabbitHoleReport, CliError> {
    Ok(rabbit_hole(store)?)
}

pub fn to_json(report: &RabbitHoleReport) -> Result<Value, CliError> {
    Ok(serde_json::to_value(report)?)
}

/// Two-line human summary.
pub fn to_text(report: &RabbitHoleReport) -> String {
    let islands: Vec<String> = report
        .islands
        .iter()
        .map(|island| format!("{:?}", island))
        .collect();
    format!(
        "Longest rabbit hole: {:?} ({} hops)\nRabbit islands: {}",
        report.longest_path,
        report.hops(),
        islands.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use category_graph_core::analyze;

    #[test]
    fn test_text_summary() {
        let report = analyze(&[1, 2, 3], &[(1, 2)]).unwrap();
        assert_eq!(
            to_text(&report),
            "Longest rabbit hole: [1, 2] (1 hops)\nRabbit islands: [1, 2], [3]"
        );
    }
}
