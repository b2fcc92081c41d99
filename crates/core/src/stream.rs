//! Newline-delimited JSON bucket input.

use std::io::BufRead;

use crate::{Bucket, CoreError};

/// Iterate over buckets read from NDJSON, one bucket per line.
///
/// Blank lines are skipped. A malformed line yields an error for that line
/// only; iteration continues with the next one. A read error is yielded
/// once and ends the iteration.
pub fn read_buckets<R: BufRead>(reader: R) -> impl Iterator<Item = Result<Bucket, CoreError>> {
    let mut lines = reader.lines().enumerate();
    let mut failed = false;
    std::iter::from_fn(move || {
        if failed {
            return None;
        }
        loop {
            let (idx, line) = lines.next()?;
            match line {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => {
                    return Some(serde_json::from_str::<Bucket>(&line).map_err(|source| {
                        CoreError::Json {
                            line: idx + 1,
                            source,
                        }
                    }))
                }
                Err(e) => {
                    failed = true;
                    return Some(Err(CoreError::Io(e)));
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, BufReader, Read};

    #[test]
    fn reads_buckets_and_reports_bad_lines() {
        let input = concat!(
            r#"{"jobId":"j1","timestamp":"2016-03-01T10:00:00Z","anomalyScore":12.0}"#,
            "\n\n",
            "not json\n",
            r#"{"jobId":"j1","timestamp":"2016-03-01T10:05:00Z"}"#,
            "\n"
        );

        let results: Vec<_> = read_buckets(input.as_bytes()).collect();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().anomaly_score, 12.0);
        match &results[1] {
            Err(CoreError::Json { line, .. }) => assert_eq!(*line, 3),
            other => panic!("expected JSON error, got {other:?}"),
        }
        assert!(results[2].is_ok());
    }

    /// Reader whose every read fails, like a directory opened as a file.
    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "is a directory"))
        }
    }

    #[test]
    fn read_error_ends_the_stream() {
        let results: Vec<_> = read_buckets(BufReader::new(FailingReader)).take(10).collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(CoreError::Io(_))));
    }
}
