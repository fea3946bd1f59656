/// Vertical extent of a box in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    pub top: f64,
    pub bottom: f64,
}

/// Layout of the active link relative to the scrollable sidebar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SidebarLayout {
    pub link: Band,
    pub sidebar: Band,
    /// Link's offset inside the sidebar's scroll content.
    pub link_offset_top: f64,
    pub link_height: f64,
    pub sidebar_height: f64,
}

/// Sidebar scroll offset that centers an out-of-view link, if it is out of view.
pub fn sidebar_scroll_target(layout: &SidebarLayout) -> Option<f64> {
    let above = layout.link.top < layout.sidebar.top;
    let below = layout.link.bottom > layout.sidebar.bottom;
    if !(above || below) {
        return None;
    }
    Some(layout.link_offset_top - layout.sidebar_height / 2.0 + layout.link_height / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(link_top: f64) -> SidebarLayout {
        SidebarLayout {
            link: Band {
                top: link_top,
                bottom: link_top + 30.0,
            },
            sidebar: Band {
                top: 60.0,
                bottom: 860.0,
            },
            link_offset_top: 1400.0,
            link_height: 30.0,
            sidebar_height: 800.0,
        }
    }

    #[test]
    fn test_visible_link_needs_no_scroll() {
        assert_eq!(sidebar_scroll_target(&layout(300.0)), None);
    }

    #[test]
    fn test_out_of_view_link_is_centered() {
        assert_eq!(sidebar_scroll_target(&layout(900.0)), Some(1015.0));
        assert_eq!(sidebar_scroll_target(&layout(10.0)), Some(1015.0));
    }
}
