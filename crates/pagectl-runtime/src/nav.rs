#![forbid(unsafe_code)]

//! Mobile menu and dropdown state.
//!
//! # States
//!
//! - Menu: `Closed` ↔ `Open`.
//! - Each dropdown independently: `Collapsed` ↔ `Expanded`.
//!
//! # Invariants
//!
//! 1. **Consistent open state**: entering `Open` sets `aria-expanded`, the
//!    close label, the panel's `active` class and the body scroll lock in the
//!    same patch; leaving it resets all four.
//! 2. **Idempotent close**: closing a closed menu emits nothing and moves no
//!    focus.
//! 3. **Focus trap**: opening moves focus to the first focusable element of
//!    the panel; while open, Tab wraps within the panel's rendered
//!    focusables. Escape-close returns focus to the menu button.
//! 4. **Mutual exclusion**: at most one dropdown is expanded. Dropdowns only
//!    react in narrow viewports; wide viewports keep default link navigation.
//!
//! # Failure Modes
//!
//! - No menu markup: every menu operation is a no-op.
//! - Empty panel: opening still locks scroll; no focus move happens.

use pagectl_core::config::NavConfig;
use pagectl_core::{DomOp, NodeRef, Patch};

use crate::event::Key;
use crate::markup::{DropdownMarkup, MenuMarkup};

/// Why the menu is being closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// A link inside the panel was activated in narrow mode.
    NavLink,
    /// Escape was pressed.
    Escape,
    /// A click landed outside the panel and button.
    OutsideClick,
    /// An in-page anchor jump started.
    AnchorNavigation,
}

#[derive(Debug, Clone)]
struct Dropdown {
    markup: DropdownMarkup,
    expanded: bool,
}

/// Navigation state machine.
#[derive(Debug, Clone)]
pub struct Navigation {
    menu: Option<MenuMarkup>,
    open: bool,
    dropdowns: Vec<Dropdown>,
    config: NavConfig,
}

impl Navigation {
    #[must_use]
    pub fn new(menu: Option<MenuMarkup>, dropdowns: Vec<DropdownMarkup>, config: NavConfig) -> Self {
        Self {
            menu,
            open: false,
            dropdowns: dropdowns
                .into_iter()
                .map(|markup| Dropdown {
                    markup,
                    expanded: false,
                })
                .collect(),
            config,
        }
    }

    /// Whether the menu subsystem has markup to drive.
    #[must_use]
    pub fn has_menu(&self) -> bool {
        self.menu.is_some()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn dropdown_count(&self) -> usize {
        self.dropdowns.len()
    }

    /// Index of the expanded dropdown, if any.
    #[must_use]
    pub fn expanded_dropdown(&self) -> Option<usize> {
        self.dropdowns.iter().position(|d| d.expanded)
    }

    #[must_use]
    pub fn is_expanded(&self, index: usize) -> bool {
        self.dropdowns.get(index).is_some_and(|d| d.expanded)
    }

    /// Flip the menu between open and closed.
    pub fn toggle(&mut self, patch: &mut Patch) {
        let Some(menu) = &self.menu else {
            return;
        };
        self.open = !self.open;
        render_menu(menu, self.open, &self.config, patch);
        if self.open
            && let Some(first) = menu.focusables.first()
        {
            patch.focus(*first);
        }
        tracing::debug!(target: "pagectl.nav", open = self.open, "menu toggled");
    }

    /// Close the menu if it is open. Returns `true` if state changed.
    pub fn close(&mut self, reason: CloseReason, patch: &mut Patch) -> bool {
        let Some(menu) = &self.menu else {
            return false;
        };
        if !self.open {
            return false;
        }
        self.open = false;
        render_menu(menu, false, &self.config, patch);
        if reason == CloseReason::Escape {
            patch.focus(menu.button);
        }
        tracing::debug!(target: "pagectl.nav", ?reason, "menu closed");
        true
    }

    /// A link inside the panel was activated.
    pub fn on_nav_link(&mut self, viewport_width: f64, patch: &mut Patch) {
        if self.config.is_narrow(viewport_width) {
            self.close(CloseReason::NavLink, patch);
        }
    }

    /// A document click; closes the menu when it landed outside.
    pub fn on_document_click(&mut self, inside_menu: bool, patch: &mut Patch) {
        if !inside_menu {
            self.close(CloseReason::OutsideClick, patch);
        }
    }

    /// Keyboard handling. `hidden` lists panel focusables the browser skips
    /// right now. Returns `true` if the default action must be prevented.
    pub fn on_key(
        &mut self,
        key: Key,
        focused: Option<NodeRef>,
        hidden: &[NodeRef],
        patch: &mut Patch,
    ) -> bool {
        match key {
            Key::Escape => {
                self.close(CloseReason::Escape, patch);
                false
            }
            Key::Tab { shift } => self.wrap_focus(shift, focused, hidden, patch),
            Key::Other => false,
        }
    }

    fn wrap_focus(
        &self,
        shift: bool,
        focused: Option<NodeRef>,
        hidden: &[NodeRef],
        patch: &mut Patch,
    ) -> bool {
        if !self.open {
            return false;
        }
        let Some(menu) = &self.menu else {
            return false;
        };
        let reachable: Vec<NodeRef> = menu
            .focusables
            .iter()
            .copied()
            .filter(|node| !hidden.contains(node))
            .collect();
        let (Some(&first), Some(&last)) = (reachable.first(), reachable.last()) else {
            return false;
        };
        let target = match (shift, focused) {
            (false, Some(f)) if f == last => first,
            (true, Some(f)) if f == first => last,
            // Focus escaped the panel (or is unknown): pull it back in.
            (false, f) if f.is_none_or(|f| !reachable.contains(&f)) => first,
            (true, f) if f.is_none_or(|f| !reachable.contains(&f)) => last,
            _ => return false,
        };
        patch.focus(target);
        true
    }

    /// Dropdown toggle `index` was activated. Returns `true` if default link
    /// navigation must be prevented.
    pub fn toggle_dropdown(&mut self, index: usize, viewport_width: f64, patch: &mut Patch) -> bool {
        if index >= self.dropdowns.len() || !self.config.is_narrow(viewport_width) {
            return false;
        }
        let was_expanded = self.dropdowns[index].expanded;
        for (i, dropdown) in self.dropdowns.iter_mut().enumerate() {
            if i != index {
                dropdown.expanded = false;
                render_dropdown(&dropdown.markup, false, patch);
            }
        }
        let target = &mut self.dropdowns[index];
        target.expanded = !was_expanded;
        render_dropdown(&target.markup, target.expanded, patch);
        tracing::debug!(
            target: "pagectl.nav",
            index,
            expanded = target.expanded,
            "dropdown toggled"
        );
        true
    }
}

fn render_menu(menu: &MenuMarkup, open: bool, config: &NavConfig, patch: &mut Patch) {
    patch.set_flag(menu.button, "aria-expanded", open);
    patch.set_attr(
        menu.button,
        "aria-label",
        if open {
            config.close_label.as_str()
        } else {
            config.open_label.as_str()
        },
    );
    patch.toggle_class(menu.panel, "active", open);
    patch.push(DomOp::LockBodyScroll(open));
}

fn render_dropdown(markup: &DropdownMarkup, expanded: bool, patch: &mut Patch) {
    patch.set_flag(markup.toggle, "aria-expanded", expanded);
    patch.toggle_class(markup.container, "active", expanded);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BUTTON: NodeRef = NodeRef(1);
    const PANEL: NodeRef = NodeRef(2);
    const LINK_A: NodeRef = NodeRef(3);
    const LINK_B: NodeRef = NodeRef(4);

    fn nav_with_dropdowns(n: u32) -> Navigation {
        let menu = MenuMarkup {
            button: BUTTON,
            panel: PANEL,
            focusables: vec![LINK_A, LINK_B],
        };
        let dropdowns = (0..n)
            .map(|i| DropdownMarkup {
                toggle: NodeRef(100 + i),
                container: NodeRef(200 + i),
            })
            .collect();
        Navigation::new(Some(menu), dropdowns, NavConfig::default())
    }

    #[test]
    fn toggle_open_sets_state_and_focuses_first_link() {
        let mut nav = nav_with_dropdowns(0);
        let mut patch = Patch::new();
        nav.toggle(&mut patch);
        assert!(nav.is_open());
        assert_eq!(
            patch.ops(),
            &[
                DomOp::SetAttr {
                    node: BUTTON,
                    name: "aria-expanded",
                    value: "true".into()
                },
                DomOp::SetAttr {
                    node: BUTTON,
                    name: "aria-label",
                    value: "Close menu".into()
                },
                DomOp::ToggleClass {
                    node: PANEL,
                    class: "active",
                    on: true
                },
                DomOp::LockBodyScroll(true),
                DomOp::Focus {
                    node: LINK_A,
                    prevent_scroll: false
                },
            ]
        );
    }

    #[test]
    fn escape_close_restores_focus_to_button() {
        let mut nav = nav_with_dropdowns(0);
        nav.toggle(&mut Patch::new());
        let mut patch = Patch::new();
        assert!(!nav.on_key(Key::Escape, Some(LINK_A), &[], &mut patch));
        assert!(!nav.is_open());
        assert_eq!(
            patch.ops().last(),
            Some(&DomOp::Focus {
                node: BUTTON,
                prevent_scroll: false
            })
        );
    }

    #[test]
    fn close_when_closed_is_a_no_op() {
        let mut nav = nav_with_dropdowns(0);
        let mut patch = Patch::new();
        assert!(!nav.close(CloseReason::Escape, &mut patch));
        nav.on_key(Key::Escape, None, &[], &mut patch);
        nav.on_key(Key::Escape, None, &[], &mut patch);
        assert!(patch.is_empty());
        assert!(!patch.moves_focus());
    }

    #[test]
    fn nav_link_only_closes_in_narrow_viewport() {
        let mut nav = nav_with_dropdowns(0);
        nav.toggle(&mut Patch::new());
        nav.on_nav_link(1024.0, &mut Patch::new());
        assert!(nav.is_open());
        nav.on_nav_link(768.0, &mut Patch::new());
        assert!(!nav.is_open());
    }

    #[test]
    fn outside_click_closes_inside_click_does_not() {
        let mut nav = nav_with_dropdowns(0);
        nav.toggle(&mut Patch::new());
        nav.on_document_click(true, &mut Patch::new());
        assert!(nav.is_open());
        let mut patch = Patch::new();
        nav.on_document_click(false, &mut patch);
        assert!(!nav.is_open());
        assert!(!patch.moves_focus());
    }

    #[test]
    fn tab_wraps_inside_open_panel() {
        let mut nav = nav_with_dropdowns(0);
        let mut patch = Patch::new();
        assert!(!nav.on_key(Key::Tab { shift: false }, Some(LINK_B), &[], &mut patch));
        assert!(patch.is_empty());

        nav.toggle(&mut Patch::new());
        let mut patch = Patch::new();
        assert!(nav.on_key(Key::Tab { shift: false }, Some(LINK_B), &[], &mut patch));
        assert_eq!(patch.ops_for(LINK_A).count(), 1);

        let mut patch = Patch::new();
        assert!(nav.on_key(Key::Tab { shift: true }, Some(LINK_A), &[], &mut patch));
        assert_eq!(patch.ops_for(LINK_B).count(), 1);

        let mut patch = Patch::new();
        assert!(!nav.on_key(Key::Tab { shift: false }, Some(LINK_A), &[], &mut patch));
        assert!(patch.is_empty());
    }

    #[test]
    fn tab_skips_hidden_trailing_focusable() {
        const COLLAPSED: NodeRef = NodeRef(5);
        let menu = MenuMarkup {
            button: BUTTON,
            panel: PANEL,
            focusables: vec![LINK_A, LINK_B, COLLAPSED],
        };
        let mut nav = Navigation::new(Some(menu), Vec::new(), NavConfig::default());
        nav.toggle(&mut Patch::new());

        let mut patch = Patch::new();
        assert!(nav.on_key(Key::Tab { shift: false }, Some(LINK_B), &[COLLAPSED], &mut patch));
        assert_eq!(
            patch.ops(),
            &[DomOp::Focus {
                node: LINK_A,
                prevent_scroll: false
            }]
        );

        let mut patch = Patch::new();
        assert!(nav.on_key(Key::Tab { shift: true }, Some(LINK_A), &[COLLAPSED], &mut patch));
        assert_eq!(patch.ops_for(LINK_B).count(), 1);

        // Once the dropdown expands the trailing link is the edge again.
        let mut patch = Patch::new();
        assert!(!nav.on_key(Key::Tab { shift: false }, Some(LINK_B), &[], &mut patch));
        assert!(patch.is_empty());
    }

    #[test]
    fn tab_with_every_focusable_hidden_is_left_alone() {
        let mut nav = nav_with_dropdowns(0);
        nav.toggle(&mut Patch::new());
        let mut patch = Patch::new();
        assert!(!nav.on_key(Key::Tab { shift: false }, Some(LINK_A), &[LINK_A, LINK_B], &mut patch));
        assert!(patch.is_empty());
    }

    #[test]
    fn dropdowns_are_mutually_exclusive() {
        let mut nav = nav_with_dropdowns(3);
        assert!(nav.toggle_dropdown(0, 500.0, &mut Patch::new()));
        assert_eq!(nav.expanded_dropdown(), Some(0));
        assert!(nav.toggle_dropdown(1, 500.0, &mut Patch::new()));
        assert!(!nav.is_expanded(0));
        assert!(nav.is_expanded(1));
        assert!(nav.toggle_dropdown(1, 500.0, &mut Patch::new()));
        assert_eq!(nav.expanded_dropdown(), None);
    }

    #[test]
    fn dropdown_is_inert_in_wide_viewport() {
        let mut nav = nav_with_dropdowns(2);
        let mut patch = Patch::new();
        assert!(!nav.toggle_dropdown(0, 1200.0, &mut patch));
        assert!(patch.is_empty());
        assert_eq!(nav.expanded_dropdown(), None);
        assert!(!nav.toggle_dropdown(9, 300.0, &mut patch));
    }

    #[test]
    fn missing_menu_markup_disables_menu() {
        let mut nav = Navigation::new(None, Vec::new(), NavConfig::default());
        let mut patch = Patch::new();
        nav.toggle(&mut patch);
        assert!(!nav.is_open());
        assert!(patch.is_empty());
    }
}
