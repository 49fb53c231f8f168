//! Golden files for the two texts a store writes to its daily log

use std::fs;
use std::path::{Path, PathBuf};

const UPDATE_VAR: &str = "TIMEKEEP_UPDATE_GOLDENS";
const TIMESTAMP_MASK: &str = "[<local time>]";
// YYYY-MM-DD HH:MM:SS
const TIMESTAMP_SHAPE: &[u8] = b"dddd-dd-dd dd:dd:dd";

/// Kind of text being compared; decides where the golden lives and how the
/// text is normalized first.
#[derive(Debug, Clone, Copy)]
pub enum Golden {
    /// CRLF report appended by `log()`. Local timestamps are masked.
    Report,
    /// Indented dump appended by `dump(true)`. Compared verbatim.
    Dump,
}

impl Golden {
    fn dir(self) -> &'static str {
        match self {
            Golden::Report => "reports",
            Golden::Dump => "dumps",
        }
    }

    fn normalize(self, text: &str) -> String {
        match self {
            Golden::Report => mask_timestamps(&text.replace("\r\n", "\n")),
            Golden::Dump => text.to_string(),
        }
    }
}

fn golden_path(kind: Golden, name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
        .join(kind.dir())
        .join(name)
}

/// Compare `actual` against `tests/snapshots/<kind>/<name>`, rewriting the
/// file instead when `TIMEKEEP_UPDATE_GOLDENS` is set.
pub fn assert_golden(kind: Golden, name: &str, actual: &str) {
    let path = golden_path(kind, name);
    let actual = kind.normalize(actual);

    if std::env::var_os(UPDATE_VAR).is_some() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create golden directory");
        }
        fs::write(&path, &actual).expect("write golden");
        return;
    }

    let expected = fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("golden {} not found", path.display()));
    assert_eq!(
        expected,
        actual,
        "{} differs; set {}=1 to regenerate",
        path.display(),
        UPDATE_VAR
    );
}

/// Replace every leading `[YYYY-MM-DD HH:MM:SS]` with a fixed marker.
pub fn mask_timestamps(report: &str) -> String {
    report
        .split_inclusive('\n')
        .map(|line| match line.strip_prefix('[') {
            Some(rest) if is_timestamp_then_bracket(rest.as_bytes()) => {
                format!("{}{}", TIMESTAMP_MASK, &rest[TIMESTAMP_SHAPE.len() + 1..])
            }
            _ => line.to_string(),
        })
        .collect()
}

fn is_timestamp_then_bracket(bytes: &[u8]) -> bool {
    bytes.len() > TIMESTAMP_SHAPE.len()
        && bytes[TIMESTAMP_SHAPE.len()] == b']'
        && TIMESTAMP_SHAPE
            .iter()
            .zip(bytes)
            .all(|(shape, byte)| match shape {
                b'd' => byte.is_ascii_digit(),
                other => other == byte,
            })
}
