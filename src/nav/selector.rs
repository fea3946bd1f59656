use crate::config::NavConfig;
use crate::models::{LinkId, TargetKind};

/// A link whose target resolved this cycle, with the target's top offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub link: LinkId,
    pub kind: TargetKind,
    pub top: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Selection {
    pub active: Option<LinkId>,

    /// The winner is a schema/model link; the schema root menu must open.
    pub in_schema_section: bool,

    /// Scroll offset is above the top-of-page threshold.
    pub at_top: bool,
}

pub fn trigger_line(scroll_y: f64, header_offset: f64) -> f64 {
    scroll_y + header_offset
}

/// Picks the last section the reader has scrolled past.
///
/// `candidates` must be in document order; on equal offsets the earlier
/// link wins.
pub fn select_active(candidates: &[Candidate], scroll_y: f64, config: &NavConfig) -> Selection {
    if scroll_y < config.top_threshold {
        return Selection {
            at_top: true,
            ..Selection::default()
        };
    }

    let line = trigger_line(scroll_y, config.header_offset);
    let mut best: Option<&Candidate> = None;
    for c in candidates.iter().filter(|c| c.top <= line) {
        if best.map_or(true, |b| c.top > b.top) {
            best = Some(c);
        }
    }

    Selection {
        active: best.map(|b| b.link),
        in_schema_section: best.map_or(false, |b| b.kind.is_schema_family()),
        at_top: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(link: LinkId, kind: TargetKind, top: f64) -> Candidate {
        Candidate { link, kind, top }
    }

    #[test]
    fn test_trigger_line_includes_header_offset() {
        assert_eq!(trigger_line(1150.0, 55.0), 1205.0);
    }

    #[test]
    fn test_picks_closest_section_at_or_above_trigger_line() {
        let cfg = NavConfig::default();
        let cands = [
            c(0, TargetKind::DocSection, 400.0),
            c(1, TargetKind::DocSection, 1200.0),
            c(2, TargetKind::DocSection, 1800.0),
        ];
        let sel = select_active(&cands, 1150.0, &cfg);
        assert_eq!(sel.active, Some(1));
        assert!(!sel.at_top);
        assert!(!sel.in_schema_section);
    }

    #[test]
    fn test_exactly_on_trigger_line_qualifies() {
        let cfg = NavConfig::default();
        let sel = select_active(&[c(4, TargetKind::TagSection, 1205.0)], 1150.0, &cfg);
        assert_eq!(sel.active, Some(4));
    }

    #[test]
    fn test_equal_offsets_keep_document_order() {
        let cfg = NavConfig::default();
        let cands = [
            c(3, TargetKind::TagSection, 900.0),
            c(5, TargetKind::OperationSection, 900.0),
        ];
        assert_eq!(select_active(&cands, 1000.0, &cfg).active, Some(3));
    }

    #[test]
    fn test_nothing_scrolled_past_means_no_active_link() {
        let cfg = NavConfig::default();
        let sel = select_active(&[c(0, TargetKind::DocSection, 5000.0)], 300.0, &cfg);
        assert_eq!(sel, Selection::default());
    }

    #[test]
    fn test_below_threshold_is_top_of_page() {
        let cfg = NavConfig::default();
        let sel = select_active(&[c(0, TargetKind::DocSection, 0.0)], 50.0, &cfg);
        assert!(sel.at_top);
        assert_eq!(sel.active, None);
    }

    #[test]
    fn test_schema_winner_sets_flag_but_earlier_schema_does_not() {
        let cfg = NavConfig::default();
        let cands = [
            c(0, TargetKind::SchemaSection, 500.0),
            c(1, TargetKind::DocSection, 900.0),
        ];
        assert!(!select_active(&cands, 1000.0, &cfg).in_schema_section);

        let cands = [
            c(0, TargetKind::DocSection, 500.0),
            c(1, TargetKind::SectionRoot, 900.0),
        ];
        assert!(select_active(&cands, 1000.0, &cfg).in_schema_section);
    }
}
