#![forbid(unsafe_code)]

//! Disclosure accessibility: mirror `details[open]` into the summary.

use pagectl_core::Patch;

use crate::markup::FaqMarkup;

#[derive(Debug, Clone, Default)]
pub struct FaqList {
    items: Vec<FaqMarkup>,
}

impl FaqList {
    #[must_use]
    pub fn new(items: Vec<FaqMarkup>) -> Self {
        Self { items }
    }

    pub fn on_toggle(&self, index: usize, open: bool, patch: &mut Patch) {
        if let Some(summary) = self.items.get(index).and_then(|item| item.summary) {
            patch.set_flag(summary, "aria-expanded", open);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagectl_core::{DomOp, NodeRef};

    #[test]
    fn toggle_mirrors_into_summary() {
        let faq = FaqList::new(vec![
            FaqMarkup {
                details: NodeRef(1),
                summary: Some(NodeRef(2)),
            },
            FaqMarkup {
                details: NodeRef(3),
                summary: None,
            },
        ]);
        let mut patch = Patch::new();
        faq.on_toggle(0, true, &mut patch);
        faq.on_toggle(1, true, &mut patch);
        assert_eq!(
            patch.ops(),
            &[DomOp::SetAttr {
                node: NodeRef(2),
                name: "aria-expanded",
                value: "true".into()
            }]
        );
    }
}
