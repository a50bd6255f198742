//! Sampling planner: which windows of a document to read first.
//!
//! ## Shape of a plan
//!
//! ```text
//! |beginning|.......|q25|.......|q50|.......|q75|.......|end|
//! |  chunk 1  |  chunk 2  |  chunk 3  |  ...  |  chunk N     |
//! ```
//!
//! The planner is one pure function over an integer total. The only place
//! unit semantics leak in is the [`PaddingPolicy`]: text lines, PDF pages
//! and fetched characters all want differently sized windows, so the policy
//! is injected rather than baked into three copies of the arithmetic.
//!
//! All arithmetic is integer floor division.

use crate::error::SkimError;
use crate::extent::{Unit, Window};
use serde::{Deserialize, Serialize};

/// Default number of uniform chunks in a plan.
pub const DEFAULT_CHUNK_COUNT: usize = 6;

/// How far a quartile window extends past its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pad {
    /// A fixed number of units after the anchor.
    Fixed(usize),
    /// `total / divisor` units after the anchor.
    Proportional { divisor: usize },
}

impl Pad {
    fn amount(&self, total: usize) -> usize {
        match *self {
            Pad::Fixed(n) => n,
            Pad::Proportional { divisor } => total / divisor.max(1),
        }
    }
}

/// Unit-specific window sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddingPolicy {
    pub pad: Pad,
    /// Upper bound on the beginning window's end, if any.
    pub beginning_cap: Option<usize>,
    /// Whether the plan carries the N-way chunk partition.
    pub chunked: bool,
}

impl PaddingPolicy {
    /// Text files: 50-line quartile windows, beginning capped at 100 lines.
    pub const fn lines() -> Self {
        Self {
            pad: Pad::Fixed(50),
            beginning_cap: Some(100),
            chunked: true,
        }
    }

    /// PDFs: 5-page quartile windows, beginning is a plain 10%.
    pub const fn pages() -> Self {
        Self {
            pad: Pad::Fixed(5),
            beginning_cap: None,
            chunked: true,
        }
    }

    /// Fetched text: every window is 10% of the document, no chunk list.
    pub const fn characters() -> Self {
        Self {
            pad: Pad::Proportional { divisor: 10 },
            beginning_cap: None,
            chunked: false,
        }
    }

    /// The default policy for a unit.
    pub const fn for_unit(unit: Unit) -> Self {
        match unit {
            Unit::Lines => Self::lines(),
            Unit::Pages => Self::pages(),
            Unit::Characters => Self::characters(),
        }
    }
}

/// A fixed-shape set of windows recommended for partial reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingPlan {
    pub beginning: Window,
    pub q25: Window,
    pub q50: Window,
    pub q75: Window,
    pub end: Window,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<Window>>,
}

impl SamplingPlan {
    /// The five named windows, labelled for reports.
    pub fn named(&self) -> [(&'static str, Window); 5] {
        [
            ("Beginning (10%)", self.beginning),
            ("25% mark", self.q25),
            ("50% mark", self.q50),
            ("75% mark", self.q75),
            ("End (10%)", self.end),
        ]
    }
}

/// Compute a sampling plan over `total` units.
///
/// # Errors
/// * [`SkimError::InvalidExtent`] if `total < 0`
/// * [`SkimError::InvalidConfig`] if `chunk_count == 0`
pub fn plan(
    total: i64,
    policy: &PaddingPolicy,
    chunk_count: usize,
) -> Result<SamplingPlan, SkimError> {
    let total = usize::try_from(total).map_err(|_| SkimError::InvalidExtent { total })?;
    plan_extent(total, policy, chunk_count)
}

/// [`plan`] for an already-validated total.
pub fn plan_extent(
    total: usize,
    policy: &PaddingPolicy,
    chunk_count: usize,
) -> Result<SamplingPlan, SkimError> {
    if chunk_count == 0 {
        return Err(SkimError::InvalidConfig("chunk count must be ≥ 1".into()));
    }

    let pad = policy.pad.amount(total);

    let beginning = if total > 10 {
        let tenth = total / 10;
        let end = policy.beginning_cap.map_or(tenth, |cap| tenth.min(cap));
        Window::clamped(1, end, total)
    } else {
        Window::clamped(1, total, total)
    };

    let quartile =
        |anchor: usize| Window::clamped(anchor, total.min(anchor.saturating_add(pad)), total);

    let chunks = policy.chunked.then(|| chunk(total, chunk_count));

    Ok(SamplingPlan {
        beginning,
        q25: quartile(total / 4),
        q50: quartile(total / 2),
        q75: quartile(total - total.div_ceil(4)),
        end: Window::clamped(total - total / 10, total, total),
        chunks,
    })
}

/// Split `[1, total]` into `chunk_count` contiguous windows.
///
/// Small documents (fewer units than chunks) collapse to one window. The
/// last window absorbs the division remainder; no rebalancing pass.
fn chunk(total: usize, chunk_count: usize) -> Vec<Window> {
    if total < chunk_count {
        return vec![Window::clamped(1, total, total)];
    }
    let size = (total / chunk_count).max(1);
    (0..chunk_count)
        .map(|i| {
            let start = i * size + 1;
            let end = if i + 1 == chunk_count {
                total
            } else {
                ((i + 1) * size).min(total)
            };
            Window::new(start, end)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(total: i64) -> SamplingPlan {
        plan(total, &PaddingPolicy::lines(), DEFAULT_CHUNK_COUNT).unwrap()
    }

    #[test]
    fn negative_total_is_rejected() {
        let err = plan(-5, &PaddingPolicy::lines(), 6).unwrap_err();
        assert!(matches!(err, SkimError::InvalidExtent { total: -5 }));
    }

    #[test]
    fn zero_chunk_count_is_rejected() {
        assert!(matches!(
            plan(10, &PaddingPolicy::pages(), 0),
            Err(SkimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_total_is_degenerate_not_an_error() {
        let p = lines(0);
        for (_, w) in p.named() {
            assert!(w.is_empty(), "{w:?}");
        }
        assert_eq!(p.chunks, Some(vec![Window::new(1, 0)]));
    }

    #[test]
    fn named_windows_in_bounds_for_small_and_large_totals() {
        for total in 1..=400 {
            for policy in [
                PaddingPolicy::lines(),
                PaddingPolicy::pages(),
                PaddingPolicy::characters(),
            ] {
                let p = plan(total, &policy, 6).unwrap();
                for (name, w) in p.named() {
                    assert!(
                        1 <= w.start && w.start <= w.end && w.end <= total as usize,
                        "{name} {w:?} total={total} policy={policy:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn chunks_partition_the_extent() {
        for total in 6..=300usize {
            let p = lines(total as i64);
            let chunks = p.chunks.unwrap();
            assert_eq!(chunks.len(), 6);
            assert_eq!(chunks[0].start, 1);
            assert_eq!(chunks.last().unwrap().end, total);
            for pair in chunks.windows(2) {
                assert_eq!(pair[0].end + 1, pair[1].start, "total={total}");
            }
        }
    }

    #[test]
    fn fewer_units_than_chunks_collapses_to_one() {
        for total in 1..6 {
            let p = lines(total);
            assert_eq!(p.chunks, Some(vec![Window::new(1, total as usize)]));
        }
    }

    #[test]
    fn eight_lines() {
        let p = lines(8);
        assert_eq!(p.beginning, Window::new(1, 8));
        let chunks = p.chunks.unwrap();
        assert_eq!(
            chunks,
            vec![
                Window::new(1, 1),
                Window::new(2, 2),
                Window::new(3, 3),
                Window::new(4, 4),
                Window::new(5, 5),
                Window::new(6, 8),
            ]
        );
    }

    #[test]
    fn line_policy_arithmetic() {
        let p = lines(2000);
        assert_eq!(p.beginning, Window::new(1, 100)); // capped
        assert_eq!(p.q25, Window::new(500, 550));
        assert_eq!(p.q50, Window::new(1000, 1050));
        assert_eq!(p.q75, Window::new(1500, 1550));
        assert_eq!(p.end, Window::new(1800, 2000));
        assert_eq!(p.chunks.unwrap()[1], Window::new(334, 666));
    }

    #[test]
    fn page_policy_has_no_beginning_cap() {
        let p = plan(2000, &PaddingPolicy::pages(), 6).unwrap();
        assert_eq!(p.beginning, Window::new(1, 200));
        assert_eq!(p.q50, Window::new(1000, 1005));
    }

    #[test]
    fn quartile_window_clamped_to_total() {
        let p = lines(120);
        assert_eq!(p.q75, Window::new(90, 120));
    }

    #[test]
    fn character_policy_is_proportional_and_unchunked() {
        let p = plan(10_000, &PaddingPolicy::characters(), 6).unwrap();
        assert_eq!(p.beginning, Window::new(1, 1000));
        assert_eq!(p.q25, Window::new(2500, 3500));
        assert_eq!(p.q75, Window::new(7500, 8500));
        assert_eq!(p.end, Window::new(9000, 10_000));
        assert!(p.chunks.is_none());
    }

    #[test]
    fn huge_totals_do_not_overflow() {
        let total = 7_000_000_000_000_000_000i64;
        let p = plan(total, &PaddingPolicy::pages(), 6).unwrap();
        let t = total as usize;
        assert_eq!(p.q75.start, t - t.div_ceil(4));
        assert_eq!(p.end.end, t);
        for (name, w) in p.named() {
            assert!(w.start <= w.end && w.end <= t, "{name} {w:?}");
        }
    }

    #[test]
    fn oversized_fixed_pad_saturates() {
        let policy = PaddingPolicy {
            pad: Pad::Fixed(usize::MAX),
            ..PaddingPolicy::lines()
        };
        let p = plan(100, &policy, 6).unwrap();
        assert_eq!(p.q25, Window::new(25, 100));
        assert_eq!(p.q75, Window::new(75, 100));
    }

    #[test]
    fn third_quartile_matches_floor_of_three_quarters() {
        for total in 0..=500usize {
            let p = plan_extent(total, &PaddingPolicy::pages(), 6).unwrap();
            let expected = (3 * total / 4).max(1);
            assert_eq!(p.q75.start, expected, "total={total}");
        }
    }

    #[test]
    fn custom_chunk_count() {
        let p = plan(100, &PaddingPolicy::lines(), 4).unwrap();
        let chunks = p.chunks.unwrap();
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[3], Window::new(76, 100));
    }

    #[test]
    fn chunks_omitted_from_json_for_characters() {
        let p = plan(50, &PaddingPolicy::characters(), 6).unwrap();
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("chunks").is_none());
        assert_eq!(json["beginning"]["start"], 1);
    }
}
