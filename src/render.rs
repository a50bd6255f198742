//! Human-readable output for reports, PDF extractions and fetches.
//!
//! Every renderer returns a `String`; printing is left to the caller. The
//! display caps in [`ReportLimits`] apply here, with an `... and N more`
//! trailer when a list was cut.

use crate::analyze::{PdfInfo, UrlInspection};
use crate::config::ReportLimits;
use crate::extent::{Unit, Window};
use crate::pipeline::fetch::{FetchInfo, FetchMethod, FetchedContent};
use crate::pipeline::pdf::PdfExtraction;
use crate::report::{DocumentFormat, StructureReport};
use crate::sampling::SamplingPlan;
use std::fmt::Write;

const HEAVY_RULE_WIDTH: usize = 60;
const LIGHT_RULE_WIDTH: usize = 40;

fn heavy_rule() -> String {
    "=".repeat(HEAVY_RULE_WIDTH)
}

fn banner(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", heavy_rule());
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", heavy_rule());
}

fn heading(out: &mut String, title: &str) {
    let rule = "-".repeat(LIGHT_RULE_WIDTH);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", rule);
}

fn more(out: &mut String, total: usize, shown: usize, what: &str) {
    if total > shown {
        let _ = writeln!(out, "  ... and {} more {}", total - shown, what);
    }
}

/// Quote `s` for a POSIX shell when it contains anything unusual.
fn shell_quote(s: &str) -> String {
    let safe = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,+@%".contains(c));
    if safe {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

// ── Structure report ─────────────────────────────────────────────────────

/// Render a structure report for a terminal.
pub fn render_report(report: &StructureReport, limits: &ReportLimits) -> String {
    let mut out = String::new();
    banner(&mut out, "DOCUMENT STRUCTURE ANALYSIS");
    let _ = writeln!(out, "File: {}", report.identifier);
    let _ = writeln!(out, "Format: {}", report.format);
    match report.extent.unit {
        Unit::Pages => {
            let _ = writeln!(out, "Total pages: {}", report.extent.total);
        }
        _ => {
            let _ = writeln!(out, "Total lines: {}", report.extent.total);
        }
    }
    if let Some(counts) = report.counts {
        let _ = writeln!(out, "Total words: {}", counts.words);
        let _ = writeln!(out, "Total chars: {}", counts.chars);
    }

    if !report.toc.is_empty() {
        heading(&mut out, "TABLE OF CONTENTS");
        for entry in report.toc.iter().take(limits.display_toc) {
            let indent = "  ".repeat(entry.level.saturating_sub(1));
            match entry.page {
                Some(page) => {
                    let _ = writeln!(out, "{}{} (page {})", indent, entry.title, page);
                }
                None => {
                    let _ = writeln!(out, "{}{}", indent, entry.title);
                }
            }
        }
        more(&mut out, report.toc.len(), limits.display_toc, "entries");
    }

    if !report.headers.is_empty() {
        heading(&mut out, "DETECTED HEADERS");
        for h in report.headers.iter().take(limits.display_headers) {
            let indent = "  ".repeat(h.level.saturating_sub(1));
            let _ = writeln!(out, "Line {:>5}: {}{}", h.line, indent, h.text);
        }
        more(&mut out, report.headers.len(), limits.display_headers, "headers");
    }

    if !report.sections.is_empty() {
        heading(&mut out, "SECTIONS");
        for s in report.sections.iter().take(limits.display_sections) {
            let name: String = s.name.chars().take(limits.display_name_width).collect();
            let _ = writeln!(
                out,
                "Lines {:>5}-{:>5} ({:>4} lines): {}",
                s.start_line, s.end_line, s.line_count, name
            );
        }
        more(&mut out, report.sections.len(), limits.display_sections, "sections");
    }

    heading(&mut out, "RECOMMENDED SAMPLING STRATEGY");
    if report.extent.total == 0 {
        let _ = writeln!(out, "Document is empty; nothing to sample.");
        return out;
    }
    write_plan(&mut out, &report.sampling, report.extent.unit);

    heading(&mut out, "SUGGESTED COMMANDS");
    for line in suggested_commands(report) {
        let _ = writeln!(out, "{}", line);
    }
    out
}

fn write_plan(out: &mut String, plan: &SamplingPlan, unit: Unit) {
    for (label, window) in plan.named() {
        let _ = writeln!(out, "{}: {} {}", label, unit.label(), window);
    }
    if let Some(ref chunks) = plan.chunks {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}-Chunk division:", chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            let _ = writeln!(out, "  Chunk {}: {} {}", i + 1, unit.label(), chunk);
        }
    }
}

/// Shell commands that read the beginning, middle and end windows.
pub fn suggested_commands(report: &StructureReport) -> Vec<String> {
    let path = shell_quote(&report.identifier);
    let plan = &report.sampling;
    let picks = [
        ("# Beginning", plan.beginning),
        ("# Middle sample", plan.q50),
        ("# End", plan.end),
    ];

    let mut lines = Vec::with_capacity(6);
    for (i, (comment, window)) in picks.into_iter().enumerate() {
        lines.push(comment.to_string());
        let cmd = match report.format {
            DocumentFormat::Pdf => format!("docskim pdf {} --pages {}", path, window),
            DocumentFormat::Text(_) => match i {
                0 => format!("head -n {} {}", window.end, path),
                1 => format!("sed -n '{},{}p' {}", window.start, window.end, path),
                _ => format!("tail -n {} {}", window.len(), path),
            },
        };
        lines.push(cmd);
    }
    lines
}

// ── PDF ──────────────────────────────────────────────────────────────────

/// Collapse sorted page numbers into `1-3, 7, 9-10`.
pub fn compress_pages(pages: &[usize]) -> String {
    let mut runs: Vec<Window> = Vec::new();
    for &p in pages {
        match runs.last_mut() {
            Some(run) if run.end + 1 == p => run.end = p,
            _ => runs.push(Window::new(p, p)),
        }
    }
    runs.iter()
        .map(|w| {
            if w.start == w.end {
                w.start.to_string()
            } else {
                w.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render extracted PDF text with per-page banners and a summary.
pub fn render_extraction(ex: &PdfExtraction) -> String {
    let mut out = String::new();
    for page in &ex.pages {
        let _ = writeln!(out);
        banner(&mut out, &format!("PAGE {} of {}", page.page, ex.total_pages));
        let _ = writeln!(out, "{}", page.text);
        if page.truncated {
            let _ = writeln!(out, "[TRUNCATED]");
        }
    }
    if ex.limit_reached {
        let _ = writeln!(out);
        let _ = writeln!(out, "[OUTPUT LIMIT REACHED at {} chars]", ex.max_chars);
    }

    let emitted: Vec<usize> = ex.pages.iter().map(|p| p.page).collect();
    let _ = writeln!(out);
    banner(&mut out, "EXTRACTION SUMMARY");
    let listed = if emitted.is_empty() {
        "none".to_string()
    } else {
        compress_pages(&emitted)
    };
    let _ = writeln!(out, "Pages extracted: {}", listed);
    if emitted.len() < ex.selected.len() {
        let _ = writeln!(
            out,
            "Pages skipped (limit): {}",
            compress_pages(&ex.selected[emitted.len()..])
        );
    }
    let _ = writeln!(
        out,
        "Coverage: {:.1}% ({} of {} pages)",
        ex.coverage_percent(),
        emitted.len(),
        ex.total_pages
    );
    let _ = writeln!(out, "Characters output: ~{}", ex.char_count);
    out
}

/// Render PDF metadata and the page sampling plan.
pub fn render_pdf_info(info: &PdfInfo) -> String {
    let m = &info.metadata;
    let na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
    let mut out = String::new();
    let _ = writeln!(out, "PDF Info: {}", info.path);
    let _ = writeln!(out, "  Total pages: {}", m.page_count);
    let _ = writeln!(out, "  Title: {}", na(&m.title));
    let _ = writeln!(out, "  Author: {}", na(&m.author));
    let _ = writeln!(out, "  Subject: {}", na(&m.subject));
    let _ = writeln!(out, "  Creator: {}", na(&m.creator));
    let _ = writeln!(out, "  Producer: {}", na(&m.producer));
    let _ = writeln!(out);
    if m.page_count == 0 {
        let _ = writeln!(out, "Document has no pages; nothing to sample.");
        return out;
    }
    let _ = writeln!(out, "Suggested sampling strategy:");
    for (label, window) in info.sampling.named() {
        let _ = writeln!(out, "  {}: pages {}", label, window);
    }
    out
}

// ── URL ──────────────────────────────────────────────────────────────────

fn info_fields(info: &FetchInfo) -> Vec<(&'static str, String)> {
    let mut fields = vec![("url", info.url.clone())];
    if let Some(status) = info.status {
        fields.push(("status", status.to_string()));
    }
    if let Some(ref ct) = info.content_type {
        fields.push(("content_type", ct.clone()));
    }
    if let Some(len) = info.content_length {
        fields.push(("content_length", len.to_string()));
    }
    fields.push(("actual_length", info.raw_length.to_string()));
    if info.converted {
        fields.push(("converted", "HTML to text".to_string()));
        fields.push(("text_length", info.text_length.to_string()));
    }
    if let Some(start) = info.start_offset {
        fields.push(("start_offset", start.to_string()));
    }
    if info.truncated {
        fields.push(("truncated", "true".to_string()));
    }
    if info.method == FetchMethod::Curl {
        fields.push(("method", "curl".to_string()));
    }
    fields
}

/// Render fetched content behind a FETCH INFO block.
pub fn render_fetch(fetched: &FetchedContent) -> String {
    let mut out = String::new();
    banner(&mut out, "FETCH INFO");
    for (key, value) in info_fields(&fetched.info) {
        let _ = writeln!(out, "  {}: {}", key, value);
    }
    let _ = writeln!(out, "{}", heavy_rule());
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", fetched.content);
    if let Some(max) = fetched.info.max_chars {
        let _ = writeln!(out);
        let _ = writeln!(out, "[OUTPUT TRUNCATED at {} chars]", max);
    }
    out
}

/// Render URL info and `--start/--max-chars` sampling suggestions.
pub fn render_url_inspection(insp: &UrlInspection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "URL Info:");
    for (key, value) in info_fields(&insp.info) {
        let _ = writeln!(out, "  {}: {}", key, value);
    }
    let _ = writeln!(out);
    if insp.extent.total == 0 {
        let _ = writeln!(out, "Length unknown; nothing to sample.");
        return out;
    }
    let _ = writeln!(out, "Suggested sampling strategy:");
    // Anchored windows read `end - start` chars from offset `start`; the
    // beginning window reads from offset 0.
    let beginning = insp.sampling.beginning;
    let _ = writeln!(
        out,
        "  Beginning (10%): --start 0 --max-chars {}",
        beginning.len()
    );
    for (label, window) in insp.sampling.named().into_iter().skip(1) {
        let _ = writeln!(
            out,
            "  {}: --start {} --max-chars {}",
            label,
            window.start,
            window.end - window.start
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::analyze_text;
    use crate::config::AnalysisConfig;
    use crate::extent::Extent;
    use crate::pipeline::pdf::{PageText, PdfMetadata};
    use crate::report::TocEntry;
    use crate::sampling::{plan_extent, PaddingPolicy};

    fn numbered_text(headers: usize) -> String {
        (1..=headers)
            .flat_map(|i| [format!("# Heading {i}"), format!("body {i}")])
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn report_sections_and_trailers() {
        let report = analyze_text(&numbered_text(25), "notes.md", &AnalysisConfig::default()).unwrap();
        let out = render_report(&report, &ReportLimits::default());
        assert!(out.starts_with(&"=".repeat(60)));
        assert!(out.contains("DOCUMENT STRUCTURE ANALYSIS"));
        assert!(out.contains("Format: markdown"));
        assert!(out.contains("Total lines: 50"));
        assert!(out.contains("Line     1: Heading 1"));
        assert!(out.contains("  ... and 5 more headers"));
        assert!(out.contains("Lines     1-    2 (   2 lines): Heading 1"));
        assert!(out.contains("  ... and 10 more sections"));
        assert!(out.contains("Beginning (10%): lines 1-5"));
        assert!(out.contains("6-Chunk division:"));
        assert!(out.contains("head -n 5 notes.md"));
        assert!(out.contains("sed -n '25,50p' notes.md"));
        assert!(out.contains("tail -n 6 notes.md"));
    }

    #[test]
    fn header_levels_indent() {
        let report = analyze_text("# A\n### B\n", "x.md", &AnalysisConfig::default()).unwrap();
        let out = render_report(&report, &ReportLimits::default());
        assert!(out.contains("Line     2:     B"));
    }

    #[test]
    fn long_section_names_cut() {
        let name = "x".repeat(80);
        let report = analyze_text(&format!("# {name}\nbody"), "x.md", &AnalysisConfig::default()).unwrap();
        let out = render_report(&report, &ReportLimits::default());
        assert!(out.contains(&format!("lines): {}\n", "x".repeat(50))));
    }

    #[test]
    fn empty_document_has_no_commands() {
        let report = analyze_text("", "empty.txt", &AnalysisConfig::default()).unwrap();
        let out = render_report(&report, &ReportLimits::default());
        assert!(out.contains("nothing to sample"));
        assert!(!out.contains("SUGGESTED COMMANDS"));
    }

    #[test]
    fn pdf_report_uses_pages_and_toc() {
        let report = StructureReport {
            identifier: "my book.pdf".into(),
            format: DocumentFormat::Pdf,
            extent: Extent::pages(100),
            counts: None,
            headers: Vec::new(),
            sections: Vec::new(),
            toc: vec![
                TocEntry {
                    level: 1,
                    title: "Part I".into(),
                    page: Some(3),
                },
                TocEntry {
                    level: 2,
                    title: "Chapter 1".into(),
                    page: None,
                },
            ],
            sampling: plan_extent(100, &PaddingPolicy::pages(), 6).unwrap(),
        };
        let out = render_report(&report, &ReportLimits::default());
        assert!(out.contains("Total pages: 100"));
        assert!(!out.contains("Total words"));
        assert!(out.contains("Part I (page 3)"));
        assert!(out.contains("  Chapter 1\n"));
        assert!(out.contains("50% mark: pages 50-55"));
        assert!(out.contains("docskim pdf 'my book.pdf' --pages 1-10"));
    }

    #[test]
    fn shell_quoting() {
        assert_eq!(shell_quote("a/b.txt"), "a/b.txt");
        assert_eq!(shell_quote("it's here"), r"'it'\''s here'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn page_compression() {
        assert_eq!(compress_pages(&[1, 2, 3, 7, 9, 10]), "1-3, 7, 9-10");
        assert_eq!(compress_pages(&[4]), "4");
        assert_eq!(compress_pages(&[]), "");
    }

    #[test]
    fn extraction_output() {
        let ex = PdfExtraction {
            total_pages: 10,
            selected: vec![1, 2, 3],
            pages: vec![
                PageText {
                    page: 1,
                    text: "first".into(),
                    truncated: false,
                },
                PageText {
                    page: 2,
                    text: "sec".into(),
                    truncated: true,
                },
            ],
            limit_reached: true,
            char_count: 208,
            max_chars: 108,
        };
        let out = render_extraction(&ex);
        assert!(out.contains("PAGE 1 of 10"));
        assert!(out.contains("sec\n[TRUNCATED]"));
        assert!(out.contains("[OUTPUT LIMIT REACHED at 108 chars]"));
        assert!(out.contains("Pages extracted: 1-2"));
        assert!(out.contains("Pages skipped (limit): 3"));
        assert!(out.contains("Coverage: 20.0% (2 of 10 pages)"));
        assert!(out.contains("Characters output: ~208"));
    }

    #[test]
    fn pdf_info_output() {
        let info = PdfInfo {
            path: "a.pdf".into(),
            metadata: PdfMetadata {
                title: Some("Title".into()),
                page_count: 40,
                ..Default::default()
            },
            sampling: plan_extent(40, &PaddingPolicy::pages(), 6).unwrap(),
        };
        let out = render_pdf_info(&info);
        assert!(out.contains("  Title: Title"));
        assert!(out.contains("  Author: N/A"));
        assert!(out.contains("  Beginning (10%): pages 1-4"));
        assert!(out.contains("  End (10%): pages 36-40"));
    }

    fn fetch_info() -> FetchInfo {
        FetchInfo {
            url: "https://example.org/".into(),
            method: FetchMethod::Http,
            status: Some(200),
            content_type: Some("text/html".into()),
            content_length: None,
            raw_length: 5000,
            text_length: 1000,
            converted: true,
            start_offset: None,
            truncated: true,
            max_chars: Some(10),
        }
    }

    #[test]
    fn fetch_output() {
        let out = render_fetch(&FetchedContent {
            info: fetch_info(),
            content: "0123456789".into(),
        });
        assert!(out.starts_with(&format!("{}\nFETCH INFO", "=".repeat(60))));
        assert!(out.contains("  converted: HTML to text"));
        assert!(out.contains("  actual_length: 5000"));
        assert!(!out.contains("method"));
        assert!(out.contains("0123456789\n\n[OUTPUT TRUNCATED at 10 chars]"));
    }

    #[test]
    fn url_inspection_output() {
        let insp = UrlInspection {
            info: fetch_info(),
            extent: Extent::characters(1000),
            sampling: plan_extent(1000, &PaddingPolicy::characters(), 6).unwrap(),
        };
        let out = render_url_inspection(&insp);
        assert!(out.contains("  Beginning (10%): --start 0 --max-chars 100"));
        assert!(out.contains("  25% mark: --start 250 --max-chars 100"));
        assert!(out.contains("  50% mark: --start 500 --max-chars 100"));
        assert!(out.contains("  75% mark: --start 750 --max-chars 100"));
        assert!(out.contains("  End (10%): --start 900 --max-chars 100"));
    }
}
