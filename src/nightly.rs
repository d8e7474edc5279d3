//! # TPU Nightly Date Management
//!
//! Reads or rewrites the `.devYYYYMMDD` nightly date pinned on the
//! `torch` / `torchvision` / `torch_xla` lines of a TPU requirements file.
//! Backs the `tpu-nightly` companion binary.
//!
//! Only scoped lines are touched: a line participates when it starts
//! (after optional indentation) with `torch==`, `torchvision==`, or
//! `torch_xla`. Dates elsewhere in the file are left alone, and rewrites
//! are atomic (write to a sibling temp file, then rename into place).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};

/// Lines eligible for nightly-date handling.
static SCOPE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:torch(?:vision)?==|torch_xla)\b").expect("valid scope regex")
});

/// A `.devYYYYMMDD` nightly marker; the capture group is the date.
static DATE_PAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.dev([0-9]{8})").expect("valid date regex"));

/// Result of a detect or set operation, emitted as JSON by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct NightlyReport {
    /// The nightly date now in effect (detected or newly set).
    pub nightly_date: String,
    /// Whether any scoped line was rewritten.
    pub patched: bool,
    /// The requirements file that was inspected or rewritten.
    pub file: PathBuf,
}

/// Whether `value` is a `YYYYMMDD` date string.
pub fn is_valid_date(value: &str) -> bool {
    value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit())
}

/// The first `.devYYYYMMDD` date found on a scoped line, if any.
pub fn detect_first_date(text: &str) -> Option<&str> {
    text.lines().find_map(|line| {
        if SCOPE_LINE.is_match(line) {
            DATE_PAT
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
        } else {
            None
        }
    })
}

/// Rewrite `.devYYYYMMDD` to `.dev<nightly>` on scoped lines only,
/// preserving the presence or absence of a trailing newline. Returns the
/// rewritten text and the number of replacements made.
pub fn patch_dates(text: &str, nightly: &str) -> (String, usize) {
    let replacement = format!(".dev{}", nightly);
    let mut replaced = 0;
    let lines: Vec<String> = text
        .lines()
        .map(|line| {
            if SCOPE_LINE.is_match(line) {
                let hits = DATE_PAT.find_iter(line).count();
                if hits > 0 {
                    replaced += hits;
                    return DATE_PAT.replace_all(line, replacement.as_str()).into_owned();
                }
            }
            line.to_string()
        })
        .collect();

    let mut patched = lines.join("\n");
    if text.ends_with('\n') {
        patched.push('\n');
    }
    (patched, replaced)
}

/// Write `text` to `path` atomically via a sibling temp file and rename.
pub fn write_atomic(path: &Path, text: &str) -> Result<()> {
    let file_name = path.file_name().ok_or_else(|| {
        Error::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("not a writable file path: {}", path.display()),
        ))
    })?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, text)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Set `date` on all scoped lines of `file`. The file is only rewritten
/// when `write` is true and the patch changed something; the report's
/// `patched` flag reflects whether any scoped date matched either way.
pub fn set_date(file: &Path, date: &str, write: bool) -> Result<NightlyReport> {
    if !is_valid_date(date) {
        return Err(Error::InvalidNightlyDate {
            value: date.to_string(),
        });
    }

    let text = fs::read_to_string(file)?;
    let (patched_text, replaced) = patch_dates(&text, date);
    if write && patched_text != text {
        write_atomic(file, &patched_text)?;
    }

    Ok(NightlyReport {
        nightly_date: date.to_string(),
        patched: replaced > 0,
        file: file.to_path_buf(),
    })
}

/// Detect the nightly date currently pinned in `file`.
pub fn detect(file: &Path) -> Result<NightlyReport> {
    let text = fs::read_to_string(file)?;
    let date = detect_first_date(&text).ok_or_else(|| Error::NightlyDateNotFound {
        path: file.to_path_buf(),
    })?;

    Ok(NightlyReport {
        nightly_date: date.to_string(),
        patched: false,
        file: file.to_path_buf(),
    })
}

/// Write a shell exports file carrying the nightly date.
pub fn write_env_file(path: &Path, date: &str) -> Result<()> {
    fs::write(path, format!("export VLLM_NIGHTLY_DATE=\"{}\"\n", date))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const REQUIREMENTS: &str = "\
# TPU nightly pins
torch==2.5.0.dev20240901+cpu
torchvision==0.20.0.dev20240901+cpu
torch_xla[tpu] @ https://storage.example.com/torch_xla-2.5.0.dev20240901-wheel.whl
numpy==1.26.4
";

    #[test]
    fn test_is_valid_date() {
        assert!(is_valid_date("20240901"));
        assert!(!is_valid_date("2024-09-01"));
        assert!(!is_valid_date("2024090"));
        assert!(!is_valid_date("202409011"));
        assert!(!is_valid_date(""));
        assert!(!is_valid_date("2024090a"));
    }

    #[test]
    fn test_detect_first_date() {
        assert_eq!(detect_first_date(REQUIREMENTS), Some("20240901"));
    }

    #[test]
    fn test_detect_skips_unscoped_lines() {
        // A date on a non-torch line must not be picked up
        let text = "some-package==1.0.0.dev20230101\ntorch==2.5.0.dev20240901\n";
        assert_eq!(detect_first_date(text), Some("20240901"));
    }

    #[test]
    fn test_detect_skips_scoped_lines_without_date() {
        let text = "torch==2.5.0\ntorchvision==0.20.0.dev20240901\n";
        assert_eq!(detect_first_date(text), Some("20240901"));
    }

    #[test]
    fn test_detect_none_when_absent() {
        assert_eq!(detect_first_date("torch==2.5.0\nnumpy==1.26.4\n"), None);
    }

    #[test]
    fn test_patch_rewrites_scoped_lines_only() {
        let text =
            "other==1.0.dev20230101\ntorch==2.5.0.dev20240901\n# torch==2.4.0.dev20230101\n";
        let (patched, replaced) = patch_dates(text, "20241001");
        assert!(patched.contains("other==1.0.dev20230101"));
        assert!(patched.contains("torch==2.5.0.dev20241001"));
        assert!(patched.contains("# torch==2.4.0.dev20230101"));
        assert_eq!(replaced, 1);
    }

    #[test]
    fn test_patch_full_fixture() {
        let (patched, replaced) = patch_dates(REQUIREMENTS, "20241001");
        assert_eq!(replaced, 3);
        assert!(patched.contains("torch==2.5.0.dev20241001+cpu"));
        assert!(patched.contains("torchvision==0.20.0.dev20241001+cpu"));
        assert!(patched.contains("torch_xla-2.5.0.dev20241001-wheel.whl"));
        assert!(patched.contains("numpy==1.26.4"));
    }

    #[test]
    fn test_patch_preserves_trailing_newline() {
        let with_newline = "torch==2.5.0.dev20240901\n";
        let (patched, _) = patch_dates(with_newline, "20241001");
        assert!(patched.ends_with('\n'));

        let without_newline = "torch==2.5.0.dev20240901";
        let (patched, _) = patch_dates(without_newline, "20241001");
        assert!(!patched.ends_with('\n'));
    }

    #[test]
    fn test_patch_indented_scoped_line() {
        let (patched, replaced) = patch_dates("  torchvision==0.20.0.dev20240901\n", "20241001");
        assert_eq!(replaced, 1);
        assert!(patched.contains("  torchvision==0.20.0.dev20241001"));
    }

    #[test]
    fn test_set_date_rewrites_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("tpu.txt");
        fs::write(&file, REQUIREMENTS).unwrap();

        let report = set_date(&file, "20241001", true).unwrap();

        assert!(report.patched);
        assert_eq!(report.nightly_date, "20241001");
        let text = fs::read_to_string(&file).unwrap();
        assert!(text.contains(".dev20241001"));
        assert!(!text.contains(".dev20240901"));
        // No leftover temp file from the atomic write
        assert!(!temp_dir.path().join("tpu.txt.tmp").exists());
    }

    #[test]
    fn test_set_date_without_write_leaves_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("tpu.txt");
        fs::write(&file, REQUIREMENTS).unwrap();

        let report = set_date(&file, "20241001", false).unwrap();

        // Still reports what a write would have patched
        assert!(report.patched);
        assert_eq!(fs::read_to_string(&file).unwrap(), REQUIREMENTS);
    }

    #[test]
    fn test_set_date_same_date_reports_patched() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("tpu.txt");
        fs::write(&file, REQUIREMENTS).unwrap();

        // Matches were made even though the text is unchanged
        let report = set_date(&file, "20240901", true).unwrap();
        assert!(report.patched);
    }

    #[test]
    fn test_set_date_rejects_malformed_date() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("tpu.txt");
        fs::write(&file, REQUIREMENTS).unwrap();

        let err = set_date(&file, "2024-10-01", true).unwrap_err();
        assert!(matches!(err, Error::InvalidNightlyDate { .. }));
        assert_eq!(fs::read_to_string(&file).unwrap(), REQUIREMENTS);
    }

    #[test]
    fn test_detect_reports_current_date() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("tpu.txt");
        fs::write(&file, REQUIREMENTS).unwrap();

        let report = detect(&file).unwrap();
        assert_eq!(report.nightly_date, "20240901");
        assert!(!report.patched);
    }

    #[test]
    fn test_detect_fails_without_date() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("tpu.txt");
        fs::write(&file, "torch==2.5.0\n").unwrap();

        let err = detect(&file).unwrap_err();
        assert!(matches!(err, Error::NightlyDateNotFound { .. }));
    }

    #[test]
    fn test_write_env_file() {
        let temp_dir = TempDir::new().unwrap();
        let env_file = temp_dir.path().join("vllm_tpu.env");

        write_env_file(&env_file, "20241001").unwrap();

        assert_eq!(
            fs::read_to_string(&env_file).unwrap(),
            "export VLLM_NIGHTLY_DATE=\"20241001\"\n"
        );
    }

    #[test]
    fn test_report_serializes_to_expected_json() {
        let report = NightlyReport {
            nightly_date: "20240901".to_string(),
            patched: true,
            file: PathBuf::from("requirements/tpu.txt"),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"nightly_date\":\"20240901\""));
        assert!(json.contains("\"patched\":true"));
        assert!(json.contains("requirements/tpu.txt"));
    }
}
