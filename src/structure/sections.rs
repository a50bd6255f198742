//! Section building: partition the document at header lines.

use crate::structure::headers::Header;
use serde::{Deserialize, Serialize};

/// A contiguous span from one header to the line before the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    pub line_count: usize,
}

/// Turn a line-ordered header list into sections.
///
/// Section `i` runs from `headers[i].line` to the line before
/// `headers[i + 1]`, and the last one runs to `total_lines`. No headers
/// means no sections; callers wanting a whole-document section must add it
/// themselves.
///
/// Two headers on the same line (structured markup allows this) give the
/// first of them an empty span: `end_line = start_line - 1` and
/// `line_count = 0`.
pub fn build_sections(headers: &[Header], total_lines: usize) -> Vec<Section> {
    headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let start_line = header.line;
            let end_line = headers
                .get(i + 1)
                .map_or(total_lines, |next| next.line.saturating_sub(1))
                .max(start_line.saturating_sub(1));
            Section {
                name: header.text.clone(),
                start_line,
                end_line,
                line_count: (end_line + 1).saturating_sub(start_line),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(line: usize, level: usize, text: &str) -> Header {
        Header {
            line,
            level,
            text: text.to_string(),
        }
    }

    #[test]
    fn no_headers_no_sections() {
        assert!(build_sections(&[], 100).is_empty());
    }

    #[test]
    fn three_headers_thirty_lines() {
        let headers = [header(1, 1, "A"), header(10, 2, "B"), header(20, 1, "C")];
        let sections = build_sections(&headers, 30);
        let spans: Vec<_> = sections
            .iter()
            .map(|s| (s.start_line, s.end_line, s.line_count))
            .collect();
        assert_eq!(spans, vec![(1, 9, 9), (10, 19, 10), (20, 30, 11)]);
        assert_eq!(sections[1].name, "B");
    }

    #[test]
    fn sections_partition_from_first_header() {
        let headers = [header(3, 1, "x"), header(4, 1, "y"), header(9, 2, "z")];
        let sections = build_sections(&headers, 12);
        assert_eq!(sections.len(), headers.len());
        for pair in sections.windows(2) {
            assert_eq!(pair[0].end_line + 1, pair[1].start_line);
        }
        assert_eq!(sections.last().unwrap().end_line, 12);
    }

    #[test]
    fn header_on_last_line() {
        let sections = build_sections(&[header(5, 1, "End")], 5);
        assert_eq!(sections[0].start_line, 5);
        assert_eq!(sections[0].end_line, 5);
        assert_eq!(sections[0].line_count, 1);
    }

    #[test]
    fn same_line_headers_do_not_underflow() {
        let headers = [header(2, 1, "A"), header(2, 2, "B")];
        let sections = build_sections(&headers, 4);
        assert_eq!(sections[0].line_count, 0);
        assert_eq!(sections[1].start_line, 2);
        assert_eq!(sections[1].end_line, 4);
    }
}
