//! Result lines for the calling pipeline.

use std::io::{self, Write};
use std::path::Path;

use crate::types::ReconciliationResult;

/// How result lines are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `api_id=...`
    #[default]
    KeyValue,
    /// `::set-output name=api_id::...`, for runners that still read the
    /// workflow command.
    SetOutput,
    /// One JSON object with the outcome and all outputs.
    Json,
}

/// Named outputs of a run, in reporting order.
pub fn outputs(result: &ReconciliationResult) -> [(&'static str, &str); 3] {
    [
        ("api_id", result.api_id.as_str()),
        ("api_version_name", result.version_name.as_str()),
        ("api_version_id", result.version_id.as_str()),
    ]
}

/// Write the outputs of `result` in `format`.
pub fn write_result<W: Write>(
    out: &mut W,
    result: &ReconciliationResult,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::KeyValue => {
            for (key, value) in outputs(result) {
                writeln!(out, "{}={}", key, value)?;
            }
        }
        OutputFormat::SetOutput => {
            for (key, value) in outputs(result) {
                writeln!(out, "::set-output name={}::{}", key, value)?;
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string(result).map_err(io::Error::other)?;
            writeln!(out, "{}", json)?;
        }
    }
    Ok(())
}

/// Append `key=value` lines to a step output file such as `$GITHUB_OUTPUT`.
pub fn append_output_file(path: &Path, result: &ReconciliationResult) -> io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    write_result(&mut file, result, OutputFormat::KeyValue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Outcome;
    use tempfile::TempDir;

    fn updated() -> ReconciliationResult {
        ReconciliationResult {
            outcome: Outcome::Updated,
            api_id: "api_1".into(),
            version_id: "apiversion_9".into(),
            version_name: "1.2.0".into(),
        }
    }

    fn render(format: OutputFormat) -> String {
        let mut out = Vec::new();
        write_result(&mut out, &updated(), format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn key_value_lines() {
        assert_eq!(
            render(OutputFormat::KeyValue),
            "api_id=api_1\napi_version_name=1.2.0\napi_version_id=apiversion_9\n"
        );
    }

    #[test]
    fn set_output_lines() {
        let text = render(OutputFormat::SetOutput);
        assert!(text.starts_with("::set-output name=api_id::api_1\n"));
        assert!(text.contains("::set-output name=api_version_id::apiversion_9\n"));
    }

    #[test]
    fn json_object() {
        let value: serde_json::Value =
            serde_json::from_str(&render(OutputFormat::Json)).unwrap();
        assert_eq!(value["outcome"], "updated");
        assert_eq!(value["api_id"], "api_1");
        assert_eq!(value["version_name"], "1.2.0");
    }

    #[test]
    fn output_file_is_appended() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "earlier=1\n").unwrap();

        append_output_file(&path, &updated()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("earlier=1\napi_id=api_1\n"));
    }
}
