//! Output formatting for records and scan reports.

use pim_show_core::Record;
use serde_json::Value;

use crate::report::ScanReport;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// Formats a record in the requested output format.
pub fn format_record(record: &Record, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(record)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(record).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(record_to_table(record)),
    }
}

/// Formats a scan report in the requested output format.
pub fn format_report(report: &ScanReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(report_to_table(report)),
    }
}

/// One `dotted.path = value` line per leaf, in record order.
fn record_to_table(record: &Record) -> String {
    let mut out = String::new();
    let mut path = Vec::new();
    for (key, value) in record.as_map() {
        path.push(key.as_str());
        write_leaves(&mut out, &mut path, value);
        path.pop();
    }
    out
}

fn write_leaves<'a>(out: &mut String, path: &mut Vec<&'a str>, value: &'a Value) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                path.push(key.as_str());
                write_leaves(out, path, child);
                path.pop();
            }
        }
        Value::String(text) => out.push_str(&format!("{} = {text}\n", path.join("."))),
        other => out.push_str(&format!("{} = {other}\n", path.join("."))),
    }
}

fn report_to_table(report: &ScanReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Command: {}  VRF: {}  Outcome: {}\n",
        report.command, report.vrf, report.outcome
    ));
    if let Some(ref detail) = report.failure_detail {
        out.push_str(&format!("  {detail}\n"));
    }
    out.push_str(&format!(
        "Lines: {} total, {} relevant, {} recognized ({:.0}% coverage)\n",
        report.total_lines,
        report.relevant_lines,
        report.recognized_lines,
        report.coverage() * 100.0
    ));

    if !report.rule_hits.is_empty() {
        out.push_str("\nRule hits:\n");
        let width = report.rule_hits.keys().map(String::len).max().unwrap_or(4);
        for (rule, hits) in &report.rule_hits {
            out.push_str(&format!("  {rule:<width$}  {hits}\n"));
        }
    }

    if !report.skipped_lines.is_empty() {
        out.push_str("\nSkipped lines:\n");
        for line in &report.skipped_lines {
            out.push_str(&format!("  {line}\n"));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use pim_show_core::{CommandKind, RecordBuilder};

    use super::*;

    fn sample_record() -> Record {
        let path = ["vrf", "default", "interface", "Gi1"];
        let mut builder = RecordBuilder::new();
        builder.set(&path, "pim_enabled", true);
        builder.set_int(&path, "dr_priority", "1").unwrap();
        builder.push(&path, "address", "FE80::1");
        builder.ensure(&["vrf", "default", "sm"]);
        builder.finish()
    }

    #[test]
    fn test_format_record_table() {
        let table = format_record(&sample_record(), OutputFormat::Table).unwrap();
        assert_eq!(
            table,
            "vrf.default.interface.Gi1.pim_enabled = true\n\
             vrf.default.interface.Gi1.dr_priority = 1\n\
             vrf.default.interface.Gi1.address = [\"FE80::1\"]\n\
             vrf.default.sm = {}\n"
        );
    }

    #[test]
    fn test_format_record_json_keeps_order() {
        let json = format_record(&sample_record(), OutputFormat::Json).unwrap();
        let pim = json.find("pim_enabled").unwrap();
        let prio = json.find("dr_priority").unwrap();
        let address = json.find("address").unwrap();
        assert!(pim < prio && prio < address);
    }

    #[test]
    fn test_format_record_yaml() {
        let yaml = format_record(&sample_record(), OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("pim_enabled: true"));
        assert!(yaml.contains("dr_priority: 1"));
    }

    #[test]
    fn test_format_report_table() {
        let mut report = ScanReport::new(CommandKind::RpMapping, "show ip pim rp mapping", "default");
        report.total_lines = 3;
        report.relevant_lines = 2;
        report.record_hit("Group".to_string());
        report.skipped_lines.push("PIM Group-to-RP Mappings".to_string());

        let table = format_report(&report, OutputFormat::Table).unwrap();
        assert!(table.starts_with("Command: show ip pim rp mapping  VRF: default  Outcome: empty\n"));
        assert!(table.contains("1 recognized (50% coverage)"));
        assert!(table.contains("  Group  1\n"));
        assert!(table.contains("  PIM Group-to-RP Mappings\n"));
    }

    #[test]
    fn test_format_report_json() {
        let report = ScanReport::new(CommandKind::Interface, "show ip pim interface", "VRF1");
        let json = format_report(&report, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["command_kind"], "interface");
        assert_eq!(value["vrf"], "VRF1");
        assert_eq!(value["outcome"], "empty");
    }
}
