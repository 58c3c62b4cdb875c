use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::bytes::Regex;
use tracing::debug;

/// Matches an RFC3339 timestamp prefix as emitted by container runtimes,
/// with or without microsecond precision.
static TIMESTAMP_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{6})?Z ").unwrap()
});

/// Backfill timestamps on raw log data.
///
/// Some display tools request logs with timestamps and split each line on the
/// first space to separate the timestamp from the content; untimestamped
/// logs then misrender with their beginnings cut off. When `enabled` and the
/// first line carries no timestamp prefix, every line (including empty
/// trailing ones) is prefixed with the Unix-epoch-zero timestamp and a
/// space, which fixes rendering without fabricating real timing. A first
/// line that already matches means the log is assumed timestamped throughout
/// and the data is returned unchanged.
pub fn normalize_timestamps(data: Vec<u8>, enabled: bool) -> Vec<u8> {
    if !enabled {
        return data;
    }

    let lines: Vec<&[u8]> = data.split(|&b| b == b'\n').collect();
    if TIMESTAMP_PREFIX.is_match(lines[0]) {
        return data;
    }

    debug!("adding timestamp prefix to logs");
    let stamp = zero_timestamp();
    let mut out = Vec::with_capacity(data.len() + lines.len() * (stamp.len() + 1));
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push(b'\n');
        }
        out.extend_from_slice(stamp.as_bytes());
        out.push(b' ');
        out.extend_from_slice(line);
    }
    out
}

/// Unix epoch zero in RFC3339, fractional digits trimmed: `1970-01-01T00:00:00Z`.
fn zero_timestamp() -> String {
    DateTime::<Utc>::UNIX_EPOCH.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timestamp_format() {
        assert_eq!(zero_timestamp(), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_disabled_is_a_noop() {
        let data = b"no timestamps here\n".to_vec();
        assert_eq!(normalize_timestamps(data.clone(), false), data);
    }

    #[test]
    fn test_prefixes_every_line() {
        let out = normalize_timestamps(b"hello\nworld".to_vec(), true);
        assert_eq!(
            out,
            b"1970-01-01T00:00:00Z hello\n1970-01-01T00:00:00Z world"
        );
    }

    #[test]
    fn test_prefixes_trailing_empty_line() {
        let out = normalize_timestamps(b"hello\n".to_vec(), true);
        assert_eq!(out, b"1970-01-01T00:00:00Z hello\n1970-01-01T00:00:00Z ");
    }

    #[test]
    fn test_already_timestamped_is_unchanged() {
        let data = b"2024-01-15T10:30:00Z started\nsecond line\n".to_vec();
        assert_eq!(normalize_timestamps(data.clone(), true), data);

        let micros = b"2024-01-15T10:30:00.123456Z started\n".to_vec();
        assert_eq!(normalize_timestamps(micros.clone(), true), micros);
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_timestamps(b"a\nb\n".to_vec(), true);
        let twice = normalize_timestamps(once.clone(), true);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_non_utf8_lines_are_preserved() {
        let data = vec![0xff, 0xfe, b'\n', b'x'];
        let out = normalize_timestamps(data, true);
        let mut expected = b"1970-01-01T00:00:00Z ".to_vec();
        expected.extend_from_slice(&[0xff, 0xfe]);
        expected.extend_from_slice(b"\n1970-01-01T00:00:00Z x");
        assert_eq!(out, expected);
    }
}
