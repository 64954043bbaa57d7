use crate::log::row::SampleRow;
use anyhow::{Context, anyhow, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const NANOS_PER_MS: f64 = 1_000_000.0;
const BYTES_PER_KB: f64 = 1024.0;

/// One line of the client's JSON log, reduced to the keys we read.
/// Everything else (timestamp, level, target, the spans stack, ...) is
/// ignored by serde.
#[derive(Debug, Deserialize)]
struct LogRecord {
    #[serde(default)]
    span: Option<SpanContext>,
    #[serde(default)]
    fields: EventFields,
}

/// Context recorded on the client's request-processing span.
#[derive(Debug, Deserialize)]
struct SpanContext {
    #[serde(default)]
    frame_count: Option<u64>,
    #[serde(default)]
    object_count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct EventFields {
    #[serde(default)]
    latency_in_nanos: Option<u64>,
    #[serde(default)]
    msg_len: Option<u64>,
}

/// List the `*.log` files directly inside `dir`, sorted by path.
///
/// No recursion. An empty result is not an error here; a run with no
/// samples fails later at the trend fit.
pub fn discover_log_files(dir: &str) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = Path::new(dir).join("*.log");
    let pattern = pattern.to_string_lossy();

    let mut files = Vec::new();
    for entry in glob::glob(&pattern).with_context(|| format!("bad glob pattern {}", pattern))? {
        files.push(entry?);
    }
    files.sort();
    Ok(files)
}

/// Parse one benchmark log file into latency samples.
///
/// Each line is a JSON object in the tracing flat-JSON shape:
///
/// {"span": {"frame_count": 17, "object_count": 120, ...},
///  "fields": {"latency_in_nanos": 5000000, "msg_len": 2048, ...}, ...}
///
/// A record is kept iff `fields.latency_in_nanos` is present; records
/// without it (request-send events, span lifecycle events) are skipped.
/// Kept records must carry the frame, object count and message length, and
/// every line must be well-formed JSON; anything else aborts the run with a
/// file:line diagnostic.
pub fn parse_log_file(path: &Path) -> anyhow::Result<Vec<SampleRow>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read log file {}", path.display()))?;

    let mut out = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let lno = lineno + 1;

        if line.trim().is_empty() {
            continue;
        }

        let record: LogRecord = serde_json::from_str(line)
            .with_context(|| format!("log parse error at {}:{}", path.display(), lno))?;

        let Some(latency_in_nanos) = record.fields.latency_in_nanos else {
            continue;
        };

        let span = record.span.ok_or_else(|| {
            anyhow!(
                "latency record without span context at {}:{}",
                path.display(),
                lno
            )
        })?;
        let frame = require(span.frame_count, "span.frame_count", path, lno)?;
        let object_count = require(span.object_count, "span.object_count", path, lno)?;
        let msg_len = require(record.fields.msg_len, "fields.msg_len", path, lno)?;

        out.push(SampleRow {
            frame,
            object_count,
            latency_ms: latency_in_nanos as f64 / NANOS_PER_MS,
            size_kb: msg_len as f64 / BYTES_PER_KB,
        });
    }

    Ok(out)
}

fn require(value: Option<u64>, key: &str, path: &Path, lno: usize) -> anyhow::Result<u64> {
    match value {
        Some(v) => Ok(v),
        None => bail!(
            "latency record missing {} at {}:{}",
            key,
            path.display(),
            lno
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn write_log(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_discovers_only_log_files_sorted() {
        let tmp = tempdir().unwrap();
        write_log(tmp.path(), "client_b.log", "");
        write_log(tmp.path(), "client_a.log", "");
        write_log(tmp.path(), "notes.txt", "");

        let files = discover_log_files(tmp.path().to_str().unwrap()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["client_a.log", "client_b.log"]);
    }

    #[test]
    fn test_discovery_does_not_recurse() {
        let tmp = tempdir().unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        write_log(&tmp.path().join("nested"), "inner.log", "");

        let files = discover_log_files(tmp.path().to_str().unwrap()).unwrap();
        assert_eq!(files, Vec::<PathBuf>::new());
    }

    #[test]
    fn test_parses_and_converts_units() {
        let tmp = tempdir().unwrap();
        let path = write_log(
            tmp.path(),
            "client.log",
            r#"{"span":{"frame_count":17,"object_count":120},"fields":{"latency_in_nanos":5000000,"msg_len":2048}}"#,
        );

        let rows = parse_log_file(&path).unwrap();
        assert_eq!(
            rows,
            vec![SampleRow {
                frame: 17,
                object_count: 120,
                latency_ms: 5.0,
                size_kb: 2.0,
            }]
        );
    }

    #[test]
    fn test_ignores_extra_keys() {
        let tmp = tempdir().unwrap();
        let path = write_log(
            tmp.path(),
            "client.log",
            r#"{"timestamp":"2023-01-12T09:14:03.123Z","level":"DEBUG","target":"netphys_client::client","span":{"frame_count":1,"object_count":4,"name":"process_requests"},"spans":[{"name":"process_requests"}],"fields":{"latency_in_nanos":1000000,"msg_len":1024,"response_type":"SimulationResult","message":"Received response"}}"#,
        );

        let rows = parse_log_file(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].latency_ms, 1.0);
        assert_eq!(rows[0].size_kb, 1.0);
    }

    #[test]
    fn test_skips_records_without_latency() {
        let tmp = tempdir().unwrap();
        // A request-send event (msg_len but no latency) and a bare event
        // with no span at all; neither contributes a sample.
        let path = write_log(
            tmp.path(),
            "client.log",
            concat!(
                r#"{"span":{"frame_count":1,"object_count":4},"fields":{"msg_len":512,"request_type":"Step"}}"#,
                "\n",
                r#"{"fields":{"message":"connected to server"}}"#,
                "\n",
                r#"{"span":{"frame_count":1,"object_count":4},"fields":{"latency_in_nanos":2000000,"msg_len":1024}}"#,
                "\n",
            ),
        );

        let rows = parse_log_file(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].latency_ms, 2.0);
    }

    #[test]
    fn test_skips_blank_lines() {
        let tmp = tempdir().unwrap();
        let path = write_log(
            tmp.path(),
            "client.log",
            "\n\n{\"span\":{\"frame_count\":1,\"object_count\":1},\"fields\":{\"latency_in_nanos\":1000000,\"msg_len\":1024}}\n\n",
        );

        let rows = parse_log_file(&path).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let tmp = tempdir().unwrap();
        let path = write_log(
            tmp.path(),
            "client.log",
            concat!(
                r#"{"span":{"frame_count":1,"object_count":1},"fields":{"latency_in_nanos":1000000,"msg_len":1024}}"#,
                "\n",
                "this is not json\n",
            ),
        );

        let err = parse_log_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains(":2"));
    }

    #[test]
    fn test_latency_record_without_span_is_fatal() {
        let tmp = tempdir().unwrap();
        let path = write_log(
            tmp.path(),
            "client.log",
            r#"{"fields":{"latency_in_nanos":1000000,"msg_len":1024}}"#,
        );

        let err = parse_log_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("span context"));
    }

    #[test]
    fn test_latency_record_missing_msg_len_is_fatal() {
        let tmp = tempdir().unwrap();
        let path = write_log(
            tmp.path(),
            "client.log",
            r#"{"span":{"frame_count":1,"object_count":1},"fields":{"latency_in_nanos":1000000}}"#,
        );

        let err = parse_log_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("fields.msg_len"));
    }
}
