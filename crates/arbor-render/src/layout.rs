use arbor_core::OutlineNode;
use arbor_tidy::{NodeIndex, NodeSize, SiblingSeparation, Tree};
use indexmap::IndexMap;

use crate::color::branch_colors;
use crate::model::{Frame, LayoutLink, LayoutNode, Point};
use crate::settings::{LayoutSettings, Orientation, RenderSettings};
use crate::text::{DeterministicTextMeasurer, TextMeasurer, layout_label};
use crate::view_state::ViewState;

pub fn node_radius(depth: usize) -> f64 {
    match depth {
        0 => 12.0,
        1 => 8.0,
        _ => 6.0,
    }
}

/// Stroke width of the edge leading into a node at `depth`.
pub fn link_width(depth: usize) -> f64 {
    (3.5 - depth as f64).max(1.5)
}

struct Entry<'a> {
    node: &'a OutlineNode,
    parent: Option<usize>,
    depth: usize,
    collapsed: bool,
    tidy: Option<NodeIndex>,
}

/// Positions every node of `outline` given the collapse state and drag overrides in `view`.
///
/// Collapsed subtrees are removed before the tidy layout runs, so they take no room. `x0`/`y0`
/// are left at the origin; [`crate::reconcile`] fills them in from the previous frame.
pub fn layout_outline(outline: &OutlineNode, view: &ViewState, settings: &RenderSettings) -> Frame {
    layout_outline_with(outline, view, settings, &DeterministicTextMeasurer::default())
}

pub fn layout_outline_with(
    outline: &OutlineNode,
    view: &ViewState,
    settings: &RenderSettings,
    measurer: &dyn TextMeasurer,
) -> Frame {
    let mut tree = Tree::new();
    let mut entries: Vec<Entry<'_>> = Vec::with_capacity(outline.node_count());
    let mut stack: Vec<(&OutlineNode, Option<usize>, usize)> = vec![(outline, None, 0)];

    while let Some((node, parent, depth)) = stack.pop() {
        let parent_entry = parent.map(|p| &entries[p]);
        let tidy = match parent_entry {
            None => Some(tree.root()),
            Some(p) if p.collapsed => None,
            Some(p) => p.tidy.and_then(|t| tree.add_child(t).ok()),
        };
        let idx = entries.len();
        entries.push(Entry {
            node,
            parent,
            depth,
            collapsed: view.is_collapsed(&node.id) && !node.children.is_empty(),
            tidy,
        });
        for child in node.children.iter().rev() {
            stack.push((child, Some(idx), depth + 1));
        }
    }

    let tidy_positions = run_tidy(&tree, &settings.layout);

    let mut positions: Vec<Point> = Vec::with_capacity(entries.len());
    for entry in &entries {
        let fallback = match entry.tidy {
            Some(t) => tidy_positions[t],
            None => entry.parent.map_or(Point::ORIGIN, |p| positions[p]),
        };
        positions.push(view.override_for(&entry.node.id).unwrap_or(fallback));
    }

    let colors = branch_colors(outline, &settings.palette, &settings.theme);
    let mut nodes = IndexMap::with_capacity(entries.len());
    let mut links = Vec::new();
    for (idx, entry) in entries.iter().enumerate() {
        let node = entry.node;
        let child_ids: Vec<String> = node.children.iter().map(|c| c.id.clone()).collect();
        let (children, collapsed_children) = if entry.collapsed {
            (Vec::new(), child_ids)
        } else {
            (child_ids, Vec::new())
        };
        let color = colors
            .get(&node.id)
            .cloned()
            .unwrap_or_else(|| settings.theme.root_color.clone());
        let parent_id = entry.parent.map(|p| entries[p].node.id.clone());
        let visible = entry.tidy.is_some();

        if let Some(source) = parent_id.as_ref().filter(|_| visible) {
            links.push(LayoutLink {
                id: node.id.clone(),
                source: source.clone(),
                target: node.id.clone(),
                width: link_width(entry.depth),
                color: color.clone(),
            });
        }

        nodes.insert(
            node.id.clone(),
            LayoutNode {
                id: node.id.clone(),
                line_index: node.line_index,
                name: node.name.clone(),
                depth: entry.depth,
                parent: parent_id,
                label: layout_label(&node.name, entry.depth, !node.children.is_empty(), measurer),
                children,
                collapsed_children,
                x: positions[idx].x,
                y: positions[idx].y,
                x0: 0.0,
                y0: 0.0,
                visible,
                color,
                radius: node_radius(entry.depth),
                link_width: link_width(entry.depth),
            },
        );
    }

    Frame {
        root_id: outline.id.clone(),
        nodes,
        links,
    }
}

/// Tidy layout of the visible tree, mapped to diagram axes.
fn run_tidy(tree: &Tree, settings: &LayoutSettings) -> Vec<Point> {
    let separation = SiblingSeparation {
        siblings: settings.sibling_separation,
        cousins: settings.cousin_separation,
    };
    let [breadth, depth] = settings.node_size;
    let out = arbor_tidy::layout(tree, NodeSize::new(breadth, depth), &separation);
    out.positions
        .into_iter()
        .map(|p| match settings.orientation {
            Orientation::LeftToRight => Point::new(p.y, p.x),
            Orientation::TopToBottom => Point::new(p.x, p.y),
        })
        .collect()
}
