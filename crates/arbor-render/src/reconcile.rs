use arbor_core::OutlineNode;
use serde::{Deserialize, Serialize};

use crate::diff::{ScenePatch, diff_frames};
use crate::layout::layout_outline_with;
use crate::model::{Frame, LayoutNode, Point};
use crate::settings::RenderSettings;
use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use crate::view_state::ViewState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReconcileMode {
    /// Carry positions over from the previous frame.
    #[default]
    Incremental,
    /// After an explicit layout reset: nodes that did not exist before start at the origin
    /// instead of growing out of their parent.
    Reset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciled {
    pub frame: Frame,
    pub patch: ScenePatch,
}

/// Lays out `outline` and matches it against `previous` by node id.
///
/// Start positions (`x0`/`y0`) come from the previous frame: the node's own old position if
/// its id existed, else its parent's old position, else the origin. A node that was hidden
/// and is now shown starts from the ancestor that was hiding it.
pub fn reconcile(
    previous: Option<&Frame>,
    outline: &OutlineNode,
    view: &ViewState,
    settings: &RenderSettings,
    mode: ReconcileMode,
) -> Reconciled {
    reconcile_with(
        previous,
        outline,
        view,
        settings,
        mode,
        &DeterministicTextMeasurer::default(),
    )
}

pub fn reconcile_with(
    previous: Option<&Frame>,
    outline: &OutlineNode,
    view: &ViewState,
    settings: &RenderSettings,
    mode: ReconcileMode,
    measurer: &dyn TextMeasurer,
) -> Reconciled {
    let mut frame = layout_outline_with(outline, view, settings, measurer);

    if let Some(previous) = previous {
        keep_hidden_positions(&mut frame, previous, view);
        for node in frame.nodes.values_mut() {
            let start = match previous.node(&node.id) {
                Some(old) if node.visible && !old.visible => previous
                    .visible_ancestor(&node.id)
                    .map_or(old.position(), |a| a.position()),
                Some(old) => old.position(),
                None if mode == ReconcileMode::Reset => Point::ORIGIN,
                None => node
                    .parent
                    .as_deref()
                    .and_then(|p| previous.node(p))
                    .map_or(Point::ORIGIN, |p| p.position()),
            };
            node.x0 = start.x;
            node.y0 = start.y;
        }
    }

    let patch = diff_frames(previous, &frame);
    tracing::debug!(
        nodes = frame.nodes.len(),
        enter = patch.nodes.enter.len(),
        update = patch.nodes.update.len(),
        exit = patch.nodes.exit.len(),
        reset = mode == ReconcileMode::Reset,
        "reconciled frame"
    );
    Reconciled { frame, patch }
}

/// Hidden nodes without an override keep their place relative to the node hiding them.
/// Pre-order means a parent is placed before its children.
fn keep_hidden_positions(frame: &mut Frame, previous: &Frame, view: &ViewState) {
    let hidden: Vec<String> = frame
        .nodes
        .values()
        .filter(|n| !n.visible && view.override_for(&n.id).is_none())
        .map(|n| n.id.clone())
        .collect();
    for id in hidden {
        let Some(position) = hidden_position(frame, previous, &id) else {
            continue;
        };
        if let Some(node) = frame.node_mut(&id) {
            node.x = position.x;
            node.y = position.y;
        }
    }
}

/// Where `id` was last drawn, shifted by however far its visible ancestor moved since. A node
/// new to the frame sits on its parent.
fn hidden_position(frame: &Frame, previous: &Frame, id: &str) -> Option<Point> {
    let node = frame.node(id)?;
    let Some(old) = previous.node(id) else {
        return frame.node(node.parent.as_deref()?).map(LayoutNode::position);
    };
    let keeper = frame.visible_ancestor(id)?;
    let shift = previous
        .node(&keeper.id)
        .map_or(Point::ORIGIN, |was| Point::new(keeper.x - was.x, keeper.y - was.y));
    Some(old.position().offset(shift.x, shift.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::parse_outline;

    fn step(previous: Option<&Frame>, text: &str, view: &ViewState) -> Reconciled {
        reconcile(
            previous,
            &parse_outline(text),
            view,
            &RenderSettings::default(),
            ReconcileMode::Incremental,
        )
    }

    #[test]
    fn first_frame_enters_everything_from_the_origin() {
        let r = step(None, "# Root\n## A\n## B", &ViewState::new());
        assert_eq!(r.patch.nodes.enter.len(), 3);
        assert!(r.patch.nodes.update.is_empty());
        assert!(r.patch.nodes.enter.iter().all(|c| c.from == Point::ORIGIN));
        assert_eq!(r.patch.links.enter.len(), 2);
    }

    #[test]
    fn new_child_grows_from_its_parents_old_position() {
        let view = ViewState::new();
        let first = step(None, "# Root\n## A", &view);
        let second = step(Some(&first.frame), "# Root\n## A\n### A1", &view);
        let a_old = first.frame.node("root-a").unwrap().position();
        let a1 = second.frame.node("root-a-a1").unwrap();
        assert_eq!(a1.start_position(), a_old);
        assert_eq!(second.patch.nodes.enter.len(), 1);
        assert_eq!(second.patch.nodes.update.len(), 2);
    }

    #[test]
    fn removed_node_exits_towards_its_parent() {
        let view = ViewState::new();
        let first = step(None, "# Root\n## A\n### A1\n## B", &view);
        let second = step(Some(&first.frame), "# Root\n## B", &view);
        let exits: Vec<&str> = second.patch.nodes.exit.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(exits, ["root-a", "root-a-a1"]);
        for change in &second.patch.nodes.exit {
            assert_eq!(change.to, Point::ORIGIN); // the root stays at the origin
        }
        assert_eq!(second.patch.links.exit.len(), 2);
    }

    #[test]
    fn collapsed_children_keep_their_place_next_to_the_collapsed_node() {
        let mut view = ViewState::new();
        let text = "# Root\n## A\n### A1\n## B";
        let first = step(None, text, &view);
        let a1_drawn = first.frame.node("root-a-a1").unwrap().position();

        view.set_collapsed("root-a", true);
        let collapsed = step(Some(&first.frame), text, &view);
        let a1 = collapsed.frame.node("root-a-a1").unwrap();
        assert!(!a1.visible);
        assert_eq!(a1.position(), a1_drawn);

        // A node added under the collapsed one sits on its parent.
        let grown = step(
            Some(&collapsed.frame),
            "# Root\n## A\n### A1\n#### A1x\n## B",
            &view,
        );
        assert_eq!(grown.frame.node("root-a-a1").unwrap().position(), a1_drawn);
        assert_eq!(grown.frame.node("root-a-a1-a1x").unwrap().position(), a1_drawn);

        // A new sibling pushes A aside; its hidden subtree travels with it.
        let pushed = step(
            Some(&grown.frame),
            "# Root\n## A\n### A1\n#### A1x\n## B\n## C",
            &view,
        );
        let a_before = grown.frame.node("root-a").unwrap().position();
        let a_after = pushed.frame.node("root-a").unwrap().position();
        assert_ne!(a_before, a_after);
        let a1_after = pushed.frame.node("root-a-a1").unwrap().position();
        assert!((a1_after.x - a_after.x - (a1_drawn.x - a_before.x)).abs() < 1e-9);
        assert!((a1_after.y - a_after.y - (a1_drawn.y - a_before.y)).abs() < 1e-9);
    }

    #[test]
    fn expanded_children_grow_out_of_the_collapsed_node() {
        let mut view = ViewState::new();
        let first = step(None, "# Root\n## A\n### A1", &view);
        view.set_collapsed("root-a", true);
        let collapsed = step(Some(&first.frame), "# Root\n## A\n### A1", &view);
        view.set_collapsed("root-a", false);
        let expanded = step(Some(&collapsed.frame), "# Root\n## A\n### A1", &view);

        let a = collapsed.frame.node("root-a").unwrap().position();
        let a1 = expanded.frame.node("root-a-a1").unwrap();
        assert_eq!(a1.start_position(), a);
        assert_eq!(a1.position(), first.frame.node("root-a-a1").unwrap().position());
        let entered: Vec<&str> = expanded.patch.nodes.enter.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(entered, ["root-a-a1"]);
    }

    #[test]
    fn hidden_override_wins_over_the_last_drawn_position() {
        let mut view = ViewState::new();
        let first = step(None, "# Root\n## A\n### A1", &view);
        view.set_collapsed("root-a", true);
        view.set_override("root-a-a1", Point::new(900.0, 900.0));
        let collapsed = step(Some(&first.frame), "# Root\n## A\n### A1", &view);
        assert_eq!(
            collapsed.frame.node("root-a-a1").unwrap().position(),
            Point::new(900.0, 900.0)
        );
    }

    #[test]
    fn reset_mode_starts_new_nodes_at_the_origin() {
        let view = ViewState::new();
        let first = step(None, "# Root\n## A", &view);
        let r = reconcile(
            Some(&first.frame),
            &parse_outline("# Root\n## A\n### A1"),
            &view,
            &RenderSettings::default(),
            ReconcileMode::Reset,
        );
        assert_eq!(r.frame.node("root-a-a1").unwrap().start_position(), Point::ORIGIN);
        assert_eq!(
            r.frame.node("root-a").unwrap().start_position(),
            first.frame.node("root-a").unwrap().position()
        );
    }
}
