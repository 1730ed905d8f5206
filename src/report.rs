use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

use crate::aggregate::TestDataMethod;
use crate::cli::OutputFormat;

pub fn write_report(
    snapshot: &BTreeMap<String, Vec<TestDataMethod>>,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let content = match format {
        OutputFormat::Text => render_text(snapshot),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(snapshot)?;
            json.push('\n');
            json
        }
    };

    if let Some(path) = output {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
    } else {
        print!("{content}");
    }

    Ok(())
}

pub fn render_text(snapshot: &BTreeMap<String, Vec<TestDataMethod>>) -> String {
    let mut out = String::new();
    for (feature, records) in snapshot {
        out.push_str(&format!("Feature: {feature}\n"));
        for record in records {
            out.push_str(&format!(
                "  [{}] {}#{} ({})\n",
                record.repo, record.class_name, record.method_name, record.path
            ));
            if !record.annotation_attrs.is_empty() {
                let attrs = record
                    .annotation_attrs
                    .iter()
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                out.push_str(&format!("    attrs: {attrs}\n"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> BTreeMap<String, Vec<TestDataMethod>> {
        let mut map = BTreeMap::new();
        map.insert(
            "checkout".to_string(),
            vec![TestDataMethod {
                repo: "automation_demo".to_string(),
                feature: "checkout".to_string(),
                class_name: "PayFlowTest".to_string(),
                method_name: "payWithCard".to_string(),
                annotation_attrs: vec![("priority".to_string(), "1".to_string())],
                path: "a/checkout/test/PayFlowTest.java".to_string(),
            }],
        );
        map.insert(
            "login".to_string(),
            vec![TestDataMethod {
                repo: "automation_demo".to_string(),
                feature: "login".to_string(),
                class_name: "SignInTest".to_string(),
                method_name: "signIn".to_string(),
                annotation_attrs: Vec::new(),
                path: "a/login/test/SignInTest.java".to_string(),
            }],
        );
        map
    }

    #[test]
    fn text_report_groups_by_feature_and_lists_attrs() {
        let text = render_text(&snapshot());
        let expected = "\
Feature: checkout
  [automation_demo] PayFlowTest#payWithCard (a/checkout/test/PayFlowTest.java)
    attrs: priority=1
Feature: login
  [automation_demo] SignInTest#signIn (a/login/test/SignInTest.java)
";
        assert_eq!(text, expected);
    }

    #[test]
    fn json_report_round_trips() {
        let json = serde_json::to_string_pretty(&snapshot()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["checkout"][0]["method_name"], "payWithCard");
        assert_eq!(value["checkout"][0]["annotation_attrs"][0][0], "priority");
        assert_eq!(value["login"][0]["annotation_attrs"], serde_json::json!([]));
    }
}
