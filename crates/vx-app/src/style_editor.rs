//! State behind the style editor: which graph is being edited, which axes
//! element is selected, and the link token of the broadcasting graph.

use vx_core::{Real, Rgb};
use vx_style::{AxesChange, AxesElement, Font, GraphKind, GraphStyles, LinkToken};

use crate::error::AppResult;

#[derive(Debug)]
pub struct StyleEditor {
    active: GraphKind,
    element: AxesElement,
    link: Option<LinkToken>,
}

impl Default for StyleEditor {
    fn default() -> Self {
        Self {
            active: GraphKind::Dispersion,
            element: AxesElement::Title,
            link: None,
        }
    }
}

impl StyleEditor {
    pub fn active(&self) -> GraphKind {
        self.active
    }

    pub fn element(&self) -> AxesElement {
        self.element
    }

    pub fn is_linked(&self) -> bool {
        self.link.is_some()
    }

    pub fn select_element(&mut self, element: AxesElement) {
        self.element = element;
    }

    /// Edit `next` instead of the active graph: the previous graph stops
    /// broadcasting and `next` starts, if it connects styles.
    pub fn switch_graph(&mut self, styles: &mut GraphStyles, next: GraphKind) -> AppResult<()> {
        if let Some(token) = self.link.take() {
            styles.unlink_styles(token);
        }
        self.active = next;
        self.link = styles.link_styles(next)?;
        tracing::debug!(graph = ?next, linked = self.link.is_some(), "style editor switched graph");
        Ok(())
    }

    /// Apply axes edits to every graph (`true`) or only the active one.
    pub fn set_all_graphs(&mut self, styles: &mut GraphStyles, all: bool) -> AppResult<()> {
        if all {
            styles.set_connect_styles(self.active, true);
            if self.link.is_none() {
                self.link = styles.link_styles(self.active)?;
            }
        } else {
            if let Some(token) = self.link.take() {
                styles.unlink_styles(token);
            }
            styles.set_connect_styles(self.active, false);
        }
        Ok(())
    }

    pub fn color_change(&self, color: Rgb) -> AxesChange {
        AxesChange::Color(self.element, color)
    }

    pub fn font_change(&self, font: Font) -> AxesChange {
        AxesChange::Font(self.element, font)
    }

    pub fn width_change(&self, width: Real) -> AxesChange {
        AxesChange::Width(width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vx_style::LinkState;

    #[test]
    fn switching_moves_the_link() {
        let mut styles = GraphStyles::default();
        let mut editor = StyleEditor::default();

        editor.set_all_graphs(&mut styles, true).unwrap();
        assert!(editor.is_linked());

        editor
            .switch_graph(&mut styles, GraphKind::Absorption)
            .unwrap();
        assert_eq!(editor.active(), GraphKind::Absorption);
        assert!(matches!(
            styles.link_state(),
            LinkState::Linked {
                broadcaster: GraphKind::Absorption,
                ..
            }
        ));

        editor.set_all_graphs(&mut styles, false).unwrap();
        assert!(!editor.is_linked());
        assert_eq!(styles.link_state(), LinkState::Unlinked);

        // single-graph mode: switching links nothing
        editor
            .switch_graph(&mut styles, GraphKind::BandStructure)
            .unwrap();
        assert!(!editor.is_linked());
    }

    #[test]
    fn changes_target_the_selected_element() {
        let mut editor = StyleEditor::default();
        editor.select_element(AxesElement::Ticks);
        assert_eq!(
            editor.color_change(Rgb::ORANGE),
            AxesChange::Color(AxesElement::Ticks, Rgb::ORANGE)
        );
    }
}
