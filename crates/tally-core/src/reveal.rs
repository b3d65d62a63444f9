//! One-shot scroll reveal
//!
//! A [`ScrollReveal`] latches to visible the first time its target's
//! intersection ratio with the viewport meets the threshold, then stops
//! observing. [`IntersectionObserver`] drives a set of them from viewport
//! updates, the way a page drives its sections' entrance animations.

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use tracing::debug;

/// Fraction of a target that must be on screen, in (0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealThreshold(f32);

impl RevealThreshold {
    pub const DEFAULT: RevealThreshold = RevealThreshold(0.1);

    pub fn new(fraction: f32) -> Result<Self> {
        if fraction > 0.0 && fraction <= 1.0 {
            Ok(Self(fraction))
        } else {
            Err(anyhow!(
                "reveal threshold must be in (0, 1], got {}",
                fraction
            ))
        }
    }

    pub fn get(&self) -> f32 {
        self.0
    }
}

impl Default for RevealThreshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Visibility latch for a single target.
#[derive(Debug, Clone)]
pub struct ScrollReveal {
    threshold: RevealThreshold,
    visible: bool,
    observing: bool,
}

impl ScrollReveal {
    pub fn new(threshold: RevealThreshold) -> Self {
        Self {
            threshold,
            visible: false,
            observing: true,
        }
    }

    /// Feed one intersection sample. Returns true only on the call that
    /// flips the flag; every later sample is ignored.
    pub fn observe(&mut self, ratio: f32) -> bool {
        if !self.observing || self.visible {
            return false;
        }
        if ratio > 0.0 && ratio >= self.threshold.get() {
            self.visible = true;
            self.observing = false;
            return true;
        }
        false
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }
}

/// Vertical extent of a target in page rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub top: u32,
    pub height: u32,
}

impl RowSpan {
    pub fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }
}

/// The visible window onto the page.
///
/// `bottom_margin` shrinks the window from below so targets count as visible
/// only once they are a little way onto the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub offset: u32,
    pub height: u32,
    pub bottom_margin: u32,
}

impl Viewport {
    pub fn new(offset: u32, height: u32) -> Self {
        Self {
            offset,
            height,
            bottom_margin: 0,
        }
    }

    pub fn with_bottom_margin(mut self, rows: u32) -> Self {
        self.bottom_margin = rows;
        self
    }

    fn effective_bottom(&self) -> u32 {
        let height = self.height.saturating_sub(self.bottom_margin);
        self.offset.saturating_add(height)
    }
}

/// Share of `span` inside `viewport`, from 0.0 to 1.0.
pub fn intersection_ratio(span: RowSpan, viewport: Viewport) -> f32 {
    if span.height == 0 {
        return 0.0;
    }
    let top = span.top.max(viewport.offset);
    let bottom = span.bottom().min(viewport.effective_bottom());
    if bottom <= top {
        return 0.0;
    }
    (bottom - top) as f32 / span.height as f32
}

/// Tracks reveal state for a set of targets keyed by `K`.
#[derive(Debug, Clone)]
pub struct IntersectionObserver<K: Ord + Copy> {
    targets: BTreeMap<K, ScrollReveal>,
}

impl<K: Ord + Copy + std::fmt::Debug> IntersectionObserver<K> {
    pub fn new() -> Self {
        Self {
            targets: BTreeMap::new(),
        }
    }

    /// Start observing `key`. Re-observing an existing target keeps its
    /// state, so a revealed target never goes back to hidden.
    pub fn observe(&mut self, key: K, threshold: RevealThreshold) {
        self.targets
            .entry(key)
            .or_insert_with(|| ScrollReveal::new(threshold));
    }

    /// Forget every target. Nothing is revealed or sampled afterwards.
    pub fn disconnect(&mut self) {
        self.targets.clear();
    }

    pub fn is_visible(&self, key: K) -> bool {
        self.targets.get(&key).map_or(false, ScrollReveal::is_visible)
    }

    pub fn is_observing(&self, key: K) -> bool {
        self.targets.get(&key).map_or(false, ScrollReveal::is_observing)
    }

    /// Targets still waiting to be revealed.
    pub fn observed_count(&self) -> usize {
        self.targets.values().filter(|r| r.is_observing()).count()
    }

    /// Sample every observed target against `viewport`. Targets without a
    /// layout are skipped. Returns the keys revealed by this update, which
    /// are no longer observed afterwards.
    pub fn update(&mut self, viewport: Viewport, layout: impl Fn(K) -> Option<RowSpan>) -> Vec<K> {
        let mut revealed = Vec::new();
        for (key, reveal) in self.targets.iter_mut() {
            if !reveal.is_observing() {
                continue;
            }
            let Some(span) = layout(*key) else {
                continue;
            };
            let ratio = intersection_ratio(span, viewport);
            if reveal.observe(ratio) {
                debug!(key = ?key, ratio, "target revealed");
                revealed.push(*key);
            }
        }
        revealed
    }
}

impl<K: Ord + Copy + std::fmt::Debug> Default for IntersectionObserver<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_must_be_a_positive_fraction() {
        assert!(RevealThreshold::new(0.0).is_err());
        assert!(RevealThreshold::new(-0.5).is_err());
        assert!(RevealThreshold::new(1.01).is_err());
        assert!(RevealThreshold::new(f32::NAN).is_err());
        assert_eq!(RevealThreshold::new(1.0).unwrap().get(), 1.0);
        assert_eq!(RevealThreshold::default().get(), 0.1);
    }

    #[test]
    fn reveal_starts_hidden_and_latches_once() {
        let mut reveal = ScrollReveal::new(RevealThreshold::new(0.5).unwrap());
        assert!(!reveal.is_visible());

        assert!(!reveal.observe(0.2));
        assert!(!reveal.is_visible());

        assert!(reveal.observe(0.5));
        assert!(reveal.is_visible());
        assert!(!reveal.is_observing());

        // Later samples, including leaving the screen, change nothing.
        assert!(!reveal.observe(1.0));
        assert!(!reveal.observe(0.0));
        assert!(reveal.is_visible());
    }

    #[test]
    fn full_threshold_requires_a_fully_visible_target() {
        let mut reveal = ScrollReveal::new(RevealThreshold::new(1.0).unwrap());
        assert!(!reveal.observe(0.99));
        assert!(reveal.observe(1.0));
    }

    #[test]
    fn ratio_counts_rows_inside_the_viewport() {
        let viewport = Viewport::new(10, 20);
        assert_eq!(intersection_ratio(RowSpan { top: 0, height: 10 }, viewport), 0.0);
        assert_eq!(intersection_ratio(RowSpan { top: 5, height: 10 }, viewport), 0.5);
        assert_eq!(intersection_ratio(RowSpan { top: 12, height: 4 }, viewport), 1.0);
        assert_eq!(intersection_ratio(RowSpan { top: 30, height: 4 }, viewport), 0.0);
        assert_eq!(intersection_ratio(RowSpan { top: 12, height: 0 }, viewport), 0.0);
    }

    #[test]
    fn bottom_margin_delays_visibility() {
        let span = RowSpan { top: 18, height: 10 };
        let plain = Viewport::new(0, 20);
        let margined = plain.with_bottom_margin(2);
        assert_eq!(intersection_ratio(span, plain), 0.2);
        assert_eq!(intersection_ratio(span, margined), 0.0);
    }

    #[test]
    fn observer_reveals_each_target_once_and_unobserves_it() {
        let mut observer = IntersectionObserver::new();
        observer.observe("hero", RevealThreshold::default());
        observer.observe("about", RevealThreshold::default());
        let layout = |key: &str| match key {
            "hero" => Some(RowSpan { top: 0, height: 10 }),
            "about" => Some(RowSpan { top: 10, height: 30 }),
            _ => None,
        };

        let revealed = observer.update(Viewport::new(0, 10), layout);
        assert_eq!(revealed, vec!["hero"]);
        assert_eq!(observer.observed_count(), 1);

        let revealed = observer.update(Viewport::new(20, 10), layout);
        assert_eq!(revealed, vec!["about"]);

        // Scrolling back to the top reports nothing new and hides nothing.
        let revealed = observer.update(Viewport::new(0, 10), layout);
        assert!(revealed.is_empty());
        assert!(observer.is_visible("hero"));
        assert!(observer.is_visible("about"));
        assert_eq!(observer.observed_count(), 0);
    }

    #[test]
    fn target_without_layout_never_reveals() {
        let mut observer = IntersectionObserver::new();
        observer.observe(1u8, RevealThreshold::default());
        for offset in 0..50 {
            assert!(observer.update(Viewport::new(offset, 10), |_| None).is_empty());
        }
        assert!(!observer.is_visible(1));
        assert!(observer.is_observing(1));
    }

    #[test]
    fn disconnect_stops_all_callbacks() {
        let mut observer = IntersectionObserver::new();
        observer.observe(1u8, RevealThreshold::default());
        observer.observe(2u8, RevealThreshold::default());
        assert_eq!(observer.observed_count(), 2);

        observer.disconnect();
        assert_eq!(observer.observed_count(), 0);
        let everywhere = |_| Some(RowSpan { top: 0, height: 5 });
        assert!(observer.update(Viewport::new(0, 10), everywhere).is_empty());
        assert!(!observer.is_visible(1));
        assert!(!observer.is_observing(2));
    }

    #[test]
    fn re_observing_keeps_revealed_state() {
        let mut observer = IntersectionObserver::new();
        observer.observe(7u8, RevealThreshold::default());
        observer.update(Viewport::new(0, 10), |_| Some(RowSpan { top: 0, height: 5 }));
        observer.observe(7u8, RevealThreshold::default());
        assert!(observer.is_visible(7));
        assert!(!observer.is_observing(7));
    }
}
