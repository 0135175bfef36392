/// Everything the page derives from the current vertical scroll offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollEffects {
    pub show_scroll_top: bool,
    pub header_shadow: bool,
    /// `None` once the hero has scrolled out; the last transform is left in place.
    pub hero_offset: Option<f64>,
}

pub fn effects_at(
    offset: f64,
    viewport_height: f64,
    scroll_top_threshold: f64,
    parallax_speed: f64,
) -> ScrollEffects {
    ScrollEffects {
        show_scroll_top: offset > scroll_top_threshold,
        header_shadow: offset > 0.0,
        hero_offset: (offset < viewport_height).then(|| offset * parallax_speed),
    }
}

pub fn hero_transform(offset: f64) -> String {
    format!("translateY({}px)", offset)
}

/// `animation-delay` for the `index`th element of a staggered group.
pub fn animation_delay(index: usize, base_delay_secs: f64) -> String {
    format!("{}s", index as f64 * base_delay_secs)
}

/// One-way reveal record kept per watched element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Pending,
    Revealed,
}

impl Visibility {
    pub fn from_marked(marked: bool) -> Self {
        if marked {
            Visibility::Revealed
        } else {
            Visibility::Pending
        }
    }

    /// Returns `true` in the second slot only on the pending -> revealed edge.
    pub fn reveal(self) -> (Visibility, bool) {
        (Visibility::Revealed, self == Visibility::Pending)
    }

    pub fn observe(self, ratio: f64, threshold: f64) -> (Visibility, bool) {
        if ratio > 0.0 && ratio >= threshold {
            self.reveal()
        } else {
            (self, false)
        }
    }
}

/// Threshold an element can actually reach: one taller than the observed area
/// divided by the threshold never gets that ratio, so any intersection counts.
pub fn reachable_threshold(threshold: f64, element_height: f64, root_height: f64) -> f64 {
    if element_height <= 0.0 || root_height <= 0.0 {
        return threshold;
    }
    threshold.min(root_height / element_height)
}

/// Fraction of an element's height inside a viewport whose bottom edge is
/// pulled up by `bottom_margin`. Mirrors the ratio an IntersectionObserver
/// reports for a `0px 0px -Npx 0px` root margin.
pub fn visible_ratio(top: f64, height: f64, viewport_height: f64, bottom_margin: f64) -> f64 {
    if height <= 0.0 {
        return 0.0;
    }
    let visible_top = top.max(0.0);
    let visible_bottom = (top + height).min(viewport_height - bottom_margin);
    ((visible_bottom - visible_top) / height).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_top_toggles_exactly_past_threshold() {
        let at = |offset| effects_at(offset, 900.0, 300.0, 0.5).show_scroll_top;
        assert!(!at(0.0));
        assert!(!at(300.0));
        assert!(at(300.5));
        assert!(at(1200.0));
        // and back down
        assert!(!at(299.0));
    }

    #[test]
    fn header_shadow_only_at_nonzero_offset() {
        assert!(!effects_at(0.0, 900.0, 300.0, 0.5).header_shadow);
        assert!(effects_at(1.0, 900.0, 300.0, 0.5).header_shadow);
    }

    #[test]
    fn parallax_halves_offset_within_first_viewport() {
        assert_eq!(effects_at(0.0, 900.0, 300.0, 0.5).hero_offset, Some(0.0));
        assert_eq!(effects_at(400.0, 900.0, 300.0, 0.5).hero_offset, Some(200.0));
        assert_eq!(effects_at(900.0, 900.0, 300.0, 0.5).hero_offset, None);
        assert_eq!(effects_at(2000.0, 900.0, 300.0, 0.5).hero_offset, None);
        assert_eq!(hero_transform(200.0), "translateY(200px)");
        assert_eq!(hero_transform(12.5), "translateY(12.5px)");
    }

    #[test]
    fn stagger_delay_is_index_times_base() {
        assert_eq!(animation_delay(0, 0.15), "0s");
        assert_eq!(animation_delay(1, 0.15), "0.15s");
        assert_eq!(animation_delay(2, 0.1), "0.2s");
        assert_eq!(animation_delay(4, 0.25), "1s");
    }

    #[test]
    fn reveal_is_one_way() {
        let (state, revealed) = Visibility::Pending.observe(0.05, 0.1);
        assert_eq!((state, revealed), (Visibility::Pending, false));

        let (state, revealed) = state.observe(0.1, 0.1);
        assert_eq!((state, revealed), (Visibility::Revealed, true));

        let (state, revealed) = state.observe(0.0, 0.1);
        assert_eq!((state, revealed), (Visibility::Revealed, false));
        assert_eq!(Visibility::from_marked(true), Visibility::Revealed);
        assert_eq!(Visibility::Revealed.reveal(), (Visibility::Revealed, false));
    }

    #[test]
    fn zero_threshold_still_needs_some_intersection() {
        assert_eq!(Visibility::Pending.observe(0.0, 0.0).0, Visibility::Pending);
        assert_eq!(Visibility::Pending.observe(0.01, 0.0).0, Visibility::Revealed);
    }

    #[test]
    fn visible_ratio_accounts_for_bottom_margin() {
        // 100px element, viewport 800px shrunk to 750px
        assert_eq!(visible_ratio(745.0, 100.0, 800.0, 50.0), 0.05);
        assert!((visible_ratio(740.0, 100.0, 800.0, 50.0) - 0.1).abs() < 1e-9);
        assert_eq!(visible_ratio(760.0, 100.0, 800.0, 50.0), 0.0);
        assert_eq!(visible_ratio(100.0, 100.0, 800.0, 50.0), 1.0);
        assert_eq!(visible_ratio(-50.0, 100.0, 800.0, 50.0), 0.5);
        assert_eq!(visible_ratio(-200.0, 100.0, 800.0, 50.0), 0.0);
        assert_eq!(visible_ratio(10.0, 0.0, 800.0, 50.0), 0.0);
    }

    #[test]
    fn element_reveals_once_ten_percent_is_in_view() {
        let mut state = Visibility::Pending;
        let mut edges = 0;
        for top in [900.0, 760.0, 745.0, 740.0, 500.0, 900.0] {
            let (next, revealed) = state.observe(visible_ratio(top, 100.0, 800.0, 50.0), 0.1);
            state = next;
            edges += revealed as usize;
        }
        assert_eq!(state, Visibility::Revealed);
        assert_eq!(edges, 1);
    }

    #[test]
    fn tall_element_reveals_on_any_intersection() {
        // 10 000px block in a 750px root tops out at 7.5% visible
        let threshold = reachable_threshold(0.1, 10_000.0, 750.0);
        assert!((threshold - 0.075).abs() < 1e-9);

        let ratio = visible_ratio(0.0, 10_000.0, 800.0, 50.0);
        assert!(ratio < 0.1);
        assert_eq!(Visibility::Pending.observe(ratio, 0.1).0, Visibility::Pending);
        assert_eq!(Visibility::Pending.observe(ratio, threshold).0, Visibility::Revealed);
    }

    #[test]
    fn ordinary_elements_keep_the_configured_threshold() {
        assert_eq!(reachable_threshold(0.1, 100.0, 750.0), 0.1);
        assert_eq!(reachable_threshold(0.1, 0.0, 750.0), 0.1);
        assert_eq!(reachable_threshold(0.1, 100.0, 0.0), 0.1);
    }
}
