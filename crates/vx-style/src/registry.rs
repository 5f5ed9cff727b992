//! The three graph styles and cross-graph axes linking.
//!
//! At most one graph broadcasts its axes edits at a time. Linking hands out a
//! [`LinkToken`]; only that token ends the link.

use crate::axes::AxesChange;
use crate::graph::{GraphKind, GraphStyle};
use crate::{StyleError, StyleResult};

/// Revocation token for an axes link. Not `Clone`.
#[must_use = "dropping the token leaves the link active"]
#[derive(Debug, PartialEq, Eq)]
pub struct LinkToken {
    broadcaster: GraphKind,
    generation: u64,
}

impl LinkToken {
    pub fn broadcaster(&self) -> GraphKind {
        self.broadcaster
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Unlinked,
    Linked {
        broadcaster: GraphKind,
        generation: u64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphStyles {
    graphs: [GraphStyle; 3],
    link: LinkState,
    next_generation: u64,
}

impl Default for GraphStyles {
    /// Every graph starts linked to the other two, with broadcasting off.
    fn default() -> Self {
        let mut graphs = GraphKind::ALL.map(GraphStyle::new);
        for g in &mut graphs {
            let kind = g.kind();
            g.set_linked(GraphKind::ALL.into_iter().filter(|k| *k != kind).collect());
        }
        Self {
            graphs,
            link: LinkState::Unlinked,
            next_generation: 0,
        }
    }
}

impl GraphStyles {
    pub fn get(&self, kind: GraphKind) -> &GraphStyle {
        &self.graphs[kind.slot()]
    }

    pub fn get_mut(&mut self, kind: GraphKind) -> &mut GraphStyle {
        &mut self.graphs[kind.slot()]
    }

    pub fn link_state(&self) -> LinkState {
        self.link
    }

    pub fn set_linked_styles(&mut self, kind: GraphKind, linked: Vec<GraphKind>) {
        let linked = linked.into_iter().filter(|k| *k != kind).collect();
        self.get_mut(kind).set_linked(linked);
    }

    /// Set the connect flag on `kind` and every graph linked to it.
    pub fn set_connect_styles(&mut self, kind: GraphKind, connect: bool) {
        let linked = self.get(kind).linked().to_vec();
        self.get_mut(kind).set_connect_flag(connect);
        for other in linked {
            self.get_mut(other).set_connect_flag(connect);
        }
    }

    /// Start broadcasting `kind`'s axes edits to its linked graphs.
    ///
    /// Returns `Ok(None)` when `kind` does not connect styles, and
    /// [`StyleError::LinkBusy`] while another link is active.
    pub fn link_styles(&mut self, kind: GraphKind) -> StyleResult<Option<LinkToken>> {
        if let LinkState::Linked { broadcaster, .. } = self.link {
            return Err(StyleError::LinkBusy { broadcaster });
        }
        if !self.get(kind).connect_styles() {
            return Ok(None);
        }
        let generation = self.next_generation;
        self.next_generation += 1;
        self.link = LinkState::Linked {
            broadcaster: kind,
            generation,
        };
        tracing::debug!(graph = ?kind, "axes linked");
        Ok(Some(LinkToken {
            broadcaster: kind,
            generation,
        }))
    }

    /// End the link `token` started. Returns `false` for a stale token.
    pub fn unlink_styles(&mut self, token: LinkToken) -> bool {
        match self.link {
            LinkState::Linked {
                broadcaster,
                generation,
            } if broadcaster == token.broadcaster && generation == token.generation => {
                self.link = LinkState::Unlinked;
                tracing::debug!(graph = ?broadcaster, "axes unlinked");
                true
            }
            _ => false,
        }
    }

    /// Graphs an axes edit on `kind` reaches, `kind` first.
    pub fn axes_targets(&self, kind: GraphKind) -> Vec<GraphKind> {
        let mut targets = vec![kind];
        let broadcasting = matches!(
            self.link,
            LinkState::Linked { broadcaster, .. } if broadcaster == kind
        );
        if broadcasting && self.get(kind).connect_styles() {
            targets.extend(self.get(kind).linked().iter().copied());
        }
        targets
    }

    /// Apply an axes edit to `kind` and, while it broadcasts, to its linked
    /// graphs. Returns every graph that changed.
    pub fn apply_axes_change(
        &mut self,
        kind: GraphKind,
        change: &AxesChange,
    ) -> StyleResult<Vec<GraphKind>> {
        crate::axes::AxesStyle::validate(change)?;
        let targets = self.axes_targets(kind);
        for target in &targets {
            self.get_mut(*target).apply_axes(change)?;
        }
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axes::AxesElement;
    use vx_core::Rgb;

    #[test]
    fn default_links_the_other_graphs() {
        let styles = GraphStyles::default();
        assert_eq!(
            styles.get(GraphKind::Absorption).linked(),
            &[GraphKind::Dispersion, GraphKind::BandStructure]
        );
        assert!(!styles.get(GraphKind::Dispersion).connect_styles());
    }

    #[test]
    fn link_without_connect_is_noop() {
        let mut styles = GraphStyles::default();
        assert_eq!(styles.link_styles(GraphKind::Dispersion).unwrap(), None);
        assert_eq!(styles.link_state(), LinkState::Unlinked);
    }

    #[test]
    fn only_one_broadcaster() {
        let mut styles = GraphStyles::default();
        styles.set_connect_styles(GraphKind::Dispersion, true);
        let token = styles.link_styles(GraphKind::Dispersion).unwrap().unwrap();
        assert_eq!(
            styles.link_styles(GraphKind::Absorption),
            Err(StyleError::LinkBusy {
                broadcaster: GraphKind::Dispersion
            })
        );
        assert!(styles.unlink_styles(token));
        assert_eq!(styles.link_state(), LinkState::Unlinked);
    }

    #[test]
    fn stale_token_is_rejected() {
        let mut styles = GraphStyles::default();
        styles.set_connect_styles(GraphKind::Dispersion, true);
        let first = styles.link_styles(GraphKind::Dispersion).unwrap().unwrap();
        assert!(styles.unlink_styles(first));
        let second = styles.link_styles(GraphKind::Dispersion).unwrap().unwrap();
        let forged = LinkToken {
            broadcaster: GraphKind::Dispersion,
            generation: 0,
        };
        assert!(!styles.unlink_styles(forged));
        assert!(styles.unlink_styles(second));
    }

    #[test]
    fn broadcast_reaches_linked_graphs() {
        let mut styles = GraphStyles::default();
        let change = AxesChange::Color(AxesElement::Axes, Rgb::ORANGE);

        let hit = styles
            .apply_axes_change(GraphKind::Absorption, &change)
            .unwrap();
        assert_eq!(hit, vec![GraphKind::Absorption]);
        assert_eq!(
            styles.get(GraphKind::Dispersion).axes().axes_color,
            Rgb::LIGHT_GRAY
        );

        styles.set_connect_styles(GraphKind::Absorption, true);
        let _token = styles.link_styles(GraphKind::Absorption).unwrap().unwrap();
        let hit = styles
            .apply_axes_change(GraphKind::Absorption, &change)
            .unwrap();
        assert_eq!(hit.len(), 3);
        for kind in GraphKind::ALL {
            assert_eq!(styles.get(kind).axes().axes_color, Rgb::ORANGE);
        }
    }

    #[test]
    fn custom_link_list_limits_broadcast() {
        let mut styles = GraphStyles::default();
        styles.set_linked_styles(
            GraphKind::Dispersion,
            vec![GraphKind::Dispersion, GraphKind::BandStructure],
        );
        assert_eq!(
            styles.get(GraphKind::Dispersion).linked(),
            &[GraphKind::BandStructure]
        );

        styles.set_connect_styles(GraphKind::Dispersion, true);
        assert!(!styles.get(GraphKind::Absorption).connect_styles());
        let _token = styles.link_styles(GraphKind::Dispersion).unwrap().unwrap();
        let hit = styles
            .apply_axes_change(GraphKind::Dispersion, &AxesChange::Width(3.0))
            .unwrap();
        assert_eq!(hit, vec![GraphKind::Dispersion, GraphKind::BandStructure]);
        assert_eq!(styles.get(GraphKind::Absorption).axes().axes_width, 1.0);
    }

    #[test]
    fn broadcast_stops_when_connect_is_cleared() {
        let mut styles = GraphStyles::default();
        styles.set_connect_styles(GraphKind::Dispersion, true);
        let _token = styles.link_styles(GraphKind::Dispersion).unwrap().unwrap();
        styles.set_connect_styles(GraphKind::Dispersion, false);
        assert_eq!(
            styles.axes_targets(GraphKind::Dispersion),
            vec![GraphKind::Dispersion]
        );
    }

    #[test]
    fn invalid_change_touches_nothing() {
        let mut styles = GraphStyles::default();
        let before = styles.clone();
        let change = AxesChange::Font(AxesElement::Background, Default::default());
        assert!(
            styles
                .apply_axes_change(GraphKind::Dispersion, &change)
                .is_err()
        );
        assert_eq!(styles, before);
    }
}
