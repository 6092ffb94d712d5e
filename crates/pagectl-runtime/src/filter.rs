#![forbid(unsafe_code)]

//! Filterable gallery with staged show/hide transitions.
//!
//! # Invariants
//!
//! 1. **One active control**: selecting a control marks it `active` and
//!    `aria-pressed="true"` and clears every other control.
//! 2. **Pure membership**: an item is shown iff the active filter is `"all"`
//!    or equals the item's category.
//! 3. **No pop on hide**: a hidden item first fades/shrinks and only leaves
//!    layout once the transition duration elapsed. Shown items enter layout
//!    first and fade in a moment later.
//! 4. **Latest selection wins**: each item owns one timer slot, so a newer
//!    selection supersedes a still-pending step from an older one.
//! 5. **Reduced motion**: the final visual state is applied in the same turn,
//!    with no timed step and no inline `transition` on the items.
//!
//! Every selection appends a polite, visually hidden status message naming
//! the visible count and the filter; it is removed after a fixed lifetime.

use std::collections::BTreeSet;

use pagectl_core::config::FilterConfig;
use pagectl_core::{AnnouncementId, DomOp, Patch, TransitionMode};

use crate::markup::{FilterButtonMarkup, GalleryItemMarkup};
use crate::turn::{TimerKey, Turn};

/// Filter value that matches every category.
pub const ALL: &str = "all";

/// Whether an item of `category` is shown under `filter`.
#[must_use]
pub fn matches(filter: &str, category: &str) -> bool {
    filter == ALL || filter == category
}

/// Screen-reader status text for a selection.
#[must_use]
pub fn announcement_text(filter: &str, count: usize) -> String {
    if filter == ALL {
        format!("Showing {count} items")
    } else {
        format!("Showing {count} {filter} items")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    FadeIn,
    Collapse,
}

#[derive(Debug, Clone)]
struct GalleryItem {
    markup: GalleryItemMarkup,
    shown: bool,
    staged: Option<Stage>,
}

/// What a selection produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub filter: String,
    pub visible: usize,
    pub announcement: AnnouncementId,
    pub text: String,
}

/// Filtered content view.
#[derive(Debug, Clone)]
pub struct FilterView {
    buttons: Vec<FilterButtonMarkup>,
    items: Vec<GalleryItem>,
    active: String,
    live: BTreeSet<AnnouncementId>,
    next_announcement: u64,
    /// Whether items currently carry the inline transition.
    transitions_declared: bool,
    config: FilterConfig,
}

impl FilterView {
    #[must_use]
    pub fn new(
        buttons: Vec<FilterButtonMarkup>,
        items: Vec<GalleryItemMarkup>,
        config: FilterConfig,
    ) -> Self {
        let active = buttons
            .iter()
            .find(|b| b.initially_active)
            .map_or_else(|| ALL.to_owned(), |b| b.filter.clone());
        let items = items
            .into_iter()
            .map(|markup| GalleryItem {
                shown: matches(&active, &markup.category),
                markup,
                staged: None,
            })
            .collect();
        Self {
            buttons,
            items,
            active,
            live: BTreeSet::new(),
            next_announcement: 0,
            transitions_declared: false,
            config,
        }
    }

    /// The view needs both controls and items to do anything.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.buttons.is_empty() && !self.items.is_empty()
    }

    #[must_use]
    pub fn active_filter(&self) -> &str {
        &self.active
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.items.iter().filter(|i| i.shown).count()
    }

    #[must_use]
    pub fn is_shown(&self, index: usize) -> Option<bool> {
        self.items.get(index).map(|i| i.shown)
    }

    /// Announcements currently in the document.
    #[must_use]
    pub fn live_announcements(&self) -> usize {
        self.live.len()
    }

    /// Mirror authored state into `aria-pressed` and, unless motion is
    /// reduced, give items the one authoritative transition declaration.
    pub fn init(&mut self, mode: TransitionMode, patch: &mut Patch) {
        if !self.is_enabled() {
            return;
        }
        for button in &self.buttons {
            patch.set_flag(button.node, "aria-pressed", button.initially_active);
        }
        self.declare_transitions(mode, patch);
    }

    /// Bring the items' inline transition in line with `mode`.
    fn declare_transitions(&mut self, mode: TransitionMode, patch: &mut Patch) {
        let animated = mode.is_animated();
        if animated == self.transitions_declared {
            return;
        }
        let transition = self.config.item_transition();
        for item in &self.items {
            if animated {
                patch.set_style(item.markup.node, "transition", transition.clone());
            } else {
                patch.clear_style(item.markup.node, "transition");
            }
        }
        self.transitions_declared = animated;
    }

    /// Control `index` was activated.
    pub fn select(
        &mut self,
        index: usize,
        mode: TransitionMode,
        turn: &mut Turn<'_>,
    ) -> Option<Selection> {
        if !self.is_enabled() {
            return None;
        }
        let filter = self.buttons.get(index)?.filter.clone();

        self.declare_transitions(mode, turn.patch());
        let patch = turn.patch();
        for (i, button) in self.buttons.iter().enumerate() {
            let on = i == index;
            patch.toggle_class(button.node, "active", on);
            patch.set_flag(button.node, "aria-pressed", on);
        }

        for (i, item) in self.items.iter_mut().enumerate() {
            let show = matches(&filter, &item.markup.category);
            item.shown = show;
            let node = item.markup.node;
            match (mode, show) {
                (TransitionMode::Instant, true) => {
                    turn.cancel(TimerKey::GalleryItem(i));
                    item.staged = None;
                    let patch = turn.patch();
                    patch.set_style(node, "display", "block");
                    patch.set_style(node, "opacity", "1");
                    patch.set_style(node, "transform", "scale(1)");
                }
                (TransitionMode::Instant, false) => {
                    turn.cancel(TimerKey::GalleryItem(i));
                    item.staged = None;
                    turn.patch().set_style(node, "display", "none");
                }
                (TransitionMode::Animated, true) => {
                    turn.patch().set_style(node, "display", "block");
                    item.staged = Some(Stage::FadeIn);
                    turn.schedule_in(TimerKey::GalleryItem(i), self.config.show_delay);
                }
                (TransitionMode::Animated, false) => {
                    let patch = turn.patch();
                    patch.set_style(node, "opacity", "0");
                    patch.set_style(node, "transform", "scale(0.95)");
                    item.staged = Some(Stage::Collapse);
                    turn.schedule_in(TimerKey::GalleryItem(i), self.config.transition);
                }
            }
        }
        self.active = filter.clone();

        let visible = self.visible_count();
        let text = announcement_text(&filter, visible);
        let id = AnnouncementId(self.next_announcement);
        self.next_announcement += 1;
        self.live.insert(id);
        turn.patch().push(DomOp::Announce {
            id,
            text: text.clone(),
        });
        turn.schedule_in(TimerKey::Announcement(id), self.config.announcement_lifetime);

        tracing::debug!(
            target: "pagectl.filter",
            filter = %filter,
            visible,
            animated = mode.is_animated(),
            "filter selected"
        );
        Some(Selection {
            filter,
            visible,
            announcement: id,
            text,
        })
    }

    /// The staged step of item `index` is due.
    pub fn on_item_timer(&mut self, index: usize, patch: &mut Patch) {
        let Some(item) = self.items.get_mut(index) else {
            return;
        };
        let node = item.markup.node;
        match item.staged.take() {
            Some(Stage::FadeIn) => {
                patch.set_style(node, "opacity", "1");
                patch.set_style(node, "transform", "scale(1)");
            }
            Some(Stage::Collapse) => patch.set_style(node, "display", "none"),
            None => {}
        }
    }

    /// Announcement `id` reached the end of its lifetime.
    pub fn on_announcement_expired(&mut self, id: AnnouncementId, patch: &mut Patch) {
        if self.live.remove(&id) {
            patch.push(DomOp::RemoveAnnouncement { id });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagectl_core::{NodeRef, TimerQueue};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn view(categories: &[&str]) -> FilterView {
        let buttons = ["all", "plumbing", "electrical"]
            .iter()
            .enumerate()
            .map(|(i, f)| FilterButtonMarkup {
                node: NodeRef(i as u32),
                filter: (*f).to_owned(),
                initially_active: i == 0,
            })
            .collect();
        let items = categories
            .iter()
            .enumerate()
            .map(|(i, c)| GalleryItemMarkup {
                node: NodeRef(100 + i as u32),
                category: (*c).to_owned(),
            })
            .collect();
        FilterView::new(buttons, items, FilterConfig::default())
    }

    #[test]
    fn announcement_wording() {
        assert_eq!(announcement_text("all", 5), "Showing 5 items");
        assert_eq!(announcement_text("roofs", 1), "Showing 1 roofs items");
    }

    #[test]
    fn plumbing_selection_shows_two_of_three() {
        let mut v = view(&["plumbing", "electrical", "plumbing"]);
        let mut timers = TimerQueue::new();
        let mut patch = Patch::new();
        let mut turn = Turn::new(Duration::ZERO, &mut patch, &mut timers);
        let sel = v.select(1, TransitionMode::Instant, &mut turn).unwrap();
        assert_eq!(sel.visible, 2);
        assert!(sel.text.contains('2'));
        assert_eq!(v.active_filter(), "plumbing");
        assert_eq!(v.is_shown(1), Some(false));
    }

    #[test]
    fn reduced_motion_applies_final_state_without_item_timers() {
        let mut v = view(&["plumbing", "electrical"]);
        let mut timers = TimerQueue::new();
        let mut patch = Patch::new();
        let mut turn = Turn::new(Duration::ZERO, &mut patch, &mut timers);
        v.select(2, TransitionMode::Instant, &mut turn);
        assert!(!timers.is_pending(&TimerKey::GalleryItem(0)));
        assert!(!timers.is_pending(&TimerKey::GalleryItem(1)));
        assert!(patch.ops().contains(&DomOp::SetStyle {
            node: NodeRef(100),
            property: "display",
            value: Some("none".into())
        }));
    }

    #[test]
    fn newer_selection_supersedes_pending_collapse() {
        let mut v = view(&["plumbing", "electrical"]);
        let mut timers = TimerQueue::new();
        let mut patch = Patch::new();

        let mut turn = Turn::new(Duration::ZERO, &mut patch, &mut timers);
        v.select(2, TransitionMode::Animated, &mut turn);
        assert_eq!(
            timers.deadline_of(&TimerKey::GalleryItem(0)),
            Some(Duration::from_millis(300))
        );

        let mut turn = Turn::new(Duration::from_millis(100), &mut patch, &mut timers);
        v.select(0, TransitionMode::Animated, &mut turn);
        assert_eq!(
            timers.deadline_of(&TimerKey::GalleryItem(0)),
            Some(Duration::from_millis(110))
        );

        let mut patch = Patch::new();
        v.on_item_timer(0, &mut patch);
        assert_eq!(
            patch.ops(),
            &[
                DomOp::SetStyle {
                    node: NodeRef(100),
                    property: "opacity",
                    value: Some("1".into())
                },
                DomOp::SetStyle {
                    node: NodeRef(100),
                    property: "transform",
                    value: Some("scale(1)".into())
                },
            ]
        );
    }

    #[test]
    fn disabled_without_items() {
        let mut v = view(&[]);
        let mut timers = TimerQueue::new();
        let mut patch = Patch::new();
        v.init(TransitionMode::Animated, &mut patch);
        let mut turn = Turn::new(Duration::ZERO, &mut patch, &mut timers);
        assert!(v.select(0, TransitionMode::Animated, &mut turn).is_none());
        assert!(patch.is_empty());
    }

    #[test]
    fn inline_transition_follows_motion_mode() {
        let transition = |patch: &Patch| {
            patch
                .ops()
                .iter()
                .filter_map(|op| match op {
                    DomOp::SetStyle {
                        node,
                        property: "transition",
                        value,
                    } => Some((node.0, value.clone())),
                    _ => None,
                })
                .collect::<Vec<_>>()
        };
        let mut v = view(&["plumbing", "electrical"]);
        let mut timers = TimerQueue::new();

        let mut patch = Patch::new();
        v.init(TransitionMode::Instant, &mut patch);
        assert!(transition(&patch).is_empty());

        let mut patch = Patch::new();
        let mut turn = Turn::new(Duration::ZERO, &mut patch, &mut timers);
        v.select(1, TransitionMode::Animated, &mut turn);
        let declared = Some("opacity 300ms ease, transform 300ms ease".to_owned());
        assert_eq!(
            transition(&patch),
            [(100, declared.clone()), (101, declared)]
        );

        let mut patch = Patch::new();
        let mut turn = Turn::new(Duration::from_millis(50), &mut patch, &mut timers);
        v.select(2, TransitionMode::Instant, &mut turn);
        assert_eq!(transition(&patch), [(100, None), (101, None)]);

        let mut patch = Patch::new();
        let mut turn = Turn::new(Duration::from_millis(60), &mut patch, &mut timers);
        v.select(0, TransitionMode::Instant, &mut turn);
        assert!(transition(&patch).is_empty());
    }
}
