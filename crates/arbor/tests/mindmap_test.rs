use arbor::render::{Camera, Point, Viewport};
use arbor::{
    EditAction, EditRequest, GestureOutcome, MenuItem, MenuOutcome, MindMap, MindMapOptions,
};

const DOC: &str = "# Root\n## A\n### A1\n## B";

fn map(text: &str) -> MindMap {
    let mut map = MindMap::new(text, MindMapOptions::default());
    map.tick(10_000.0);
    map
}

fn position(map: &MindMap, id: &str) -> Point {
    map.frame().node(id).unwrap().position()
}

#[test]
fn click_on_a_parent_toggles_collapse() {
    let mut m = map(DOC);
    m.pointer_down(Some("root-a"));
    assert!(!m.pointer_move(1.0, 1.0));
    assert_eq!(
        m.pointer_up(),
        GestureOutcome::Click {
            node_id: "root-a".into(),
            toggled: Some(true)
        }
    );
    assert!(!m.frame().is_visible("root-a-a1"));
    assert!(m.view_state().is_collapsed("root-a"));

    m.pointer_down(Some("root-a"));
    m.pointer_up();
    assert!(m.frame().is_visible("root-a-a1"));
}

#[test]
fn click_on_a_leaf_is_a_no_op() {
    let mut m = map(DOC);
    let before = m.frame().clone();
    m.pointer_down(Some("root-b"));
    assert_eq!(
        m.pointer_up(),
        GestureOutcome::Click {
            node_id: "root-b".into(),
            toggled: None
        }
    );
    assert_eq!(m.frame(), &before);
}

#[test]
fn drag_moves_the_subtree_and_nothing_else() {
    let mut m = map(DOC);
    let a = position(&m, "root-a");
    let a1 = position(&m, "root-a-a1");
    let b = position(&m, "root-b");

    m.pointer_down(Some("root-a"));
    m.pointer_move(3.0, 0.0);
    assert_eq!(position(&m, "root-a"), a, "still under the threshold");
    assert!(m.pointer_move(7.0, 20.0));
    assert_eq!(m.pointer_up(), GestureOutcome::Drag { node_id: "root-a".into() });

    let view = m.view_state();
    assert_eq!(view.override_for("root-a"), Some(a.offset(10.0, 20.0)));
    assert_eq!(view.override_for("root-a-a1"), Some(a1.offset(10.0, 20.0)));
    assert_eq!(view.override_for("root-b"), None);
    assert_eq!(position(&m, "root-b"), b);
    assert!(!m.view_state().is_collapsed("root-a"), "a drag is not a click");
}

#[test]
fn drag_overrides_survive_unrelated_edits() {
    let mut m = map(DOC);
    let a = position(&m, "root-a");
    m.pointer_down(Some("root-a"));
    m.pointer_move(0.0, 50.0);
    m.pointer_up();

    m.apply_edit(&EditRequest::add_child(3, "B1")).unwrap();
    assert_eq!(m.text(), "# Root\n## A\n### A1\n## B\n### B1");
    assert_eq!(position(&m, "root-a"), a.offset(0.0, 50.0));
    assert!(m.frame().is_visible("root-b-b1"));
}

#[test]
fn hidden_descendant_overrides_follow_a_drag() {
    let mut m = map(DOC);
    m.pointer_down(Some("root-a-a1"));
    m.pointer_move(0.0, 30.0);
    m.pointer_up();
    let a1 = m.view_state().override_for("root-a-a1").unwrap();

    m.toggle_collapse("root-a");
    m.pointer_down(Some("root-a"));
    m.pointer_move(40.0, 0.0);
    m.pointer_up();
    assert_eq!(
        m.view_state().override_for("root-a-a1"),
        Some(a1.offset(40.0, 0.0))
    );

    m.toggle_collapse("root-a");
    assert_eq!(position(&m, "root-a-a1"), a1.offset(40.0, 0.0));
}

fn offset_from(m: &MindMap, parent: &str, child: &str) -> (f64, f64) {
    let p = position(m, parent);
    let c = position(m, child);
    (c.x - p.x, c.y - p.y)
}

fn drawn(m: &MindMap, id: &str) -> Point {
    m.scene().node(id).unwrap().position()
}

#[test]
fn dragging_a_collapsed_node_carries_children_it_never_dragged() {
    let mut m = map(DOC);
    let before = offset_from(&m, "root-a", "root-a-a1");

    m.toggle_collapse("root-a");
    m.tick(20_000.0);
    assert_eq!(m.view_state().override_for("root-a-a1"), None);
    m.pointer_down(Some("root-a"));
    m.pointer_move(0.0, 300.0);
    assert_eq!(m.pointer_up(), GestureOutcome::Drag { node_id: "root-a".into() });
    assert!(m.view_state().override_for("root-a-a1").is_some());

    m.toggle_collapse("root-a");
    let entering = m.last_patch().nodes.enter.iter().find(|c| c.id == "root-a-a1");
    assert_eq!(entering.unwrap().from, position(&m, "root-a"));
    m.tick(30_000.0);
    let after = offset_from(&m, "root-a", "root-a-a1");
    assert!((after.0 - before.0).abs() < 1e-9 && (after.1 - before.1).abs() < 1e-9);
    assert_eq!(drawn(&m, "root-a-a1"), position(&m, "root-a-a1"));
}

#[test]
fn drag_during_a_transition_starts_from_the_drawn_position() {
    let mut m = map(DOC);
    m.set_text("# Root\n## A\n### A1\n## B\n## C");
    m.tick(10_250.0);
    let from = drawn(&m, "root-b");
    assert_ne!(from, position(&m, "root-b"));

    m.pointer_down(Some("root-b"));
    m.pointer_move(0.0, 10.0);
    m.pointer_up();
    let dropped = from.offset(0.0, 10.0);
    assert_eq!(drawn(&m, "root-b"), dropped);
    assert_eq!(position(&m, "root-b"), dropped);
    assert_eq!(m.view_state().override_for("root-b"), Some(dropped));
    let link = m.scene().links.into_iter().find(|l| l.id == "root-b").unwrap();
    assert_eq!(link.target, dropped);

    m.tick(11_000.0);
    assert_eq!(drawn(&m, "root-b"), dropped);
}

#[test]
fn edit_during_a_transition_continues_from_the_drawn_position() {
    let mut m = map(DOC);
    m.set_text("# Root\n## A\n### A1\n## B\n## C");
    let first_target = position(&m, "root-b");
    m.tick(10_250.0);
    let midway = drawn(&m, "root-b");

    m.set_text(DOC);
    let second_target = position(&m, "root-b");
    let resumed = drawn(&m, "root-b");
    assert_eq!(resumed, midway);
    assert_ne!(resumed, first_target);
    assert_ne!(resumed, second_target);

    m.tick(10_500.0);
    let later = drawn(&m, "root-b");
    assert!((later.y - midway.y) * (second_target.y - later.y) > 0.0);
    assert!(!m.tick(10_750.0));
    assert_eq!(drawn(&m, "root-b"), second_target);
}

#[test]
fn collapse_during_a_transition_continues_from_the_drawn_position() {
    let doc = "# Root\n## A\n### A1\n### A2\n## B\n### B1\n### B2";
    let mut m = map(doc);
    let spread = position(&m, "root-b");
    m.toggle_collapse("root-a");
    let packed = position(&m, "root-b");
    assert_ne!(spread, packed);
    m.tick(10_250.0);
    let midway = drawn(&m, "root-b");

    assert_eq!(m.toggle_collapse("root-a"), Some(false));
    assert_eq!(position(&m, "root-b"), spread);
    assert_eq!(drawn(&m, "root-b"), midway);
    assert_ne!(midway, spread);
    assert_ne!(midway, packed);

    m.tick(10_750.0);
    assert_eq!(drawn(&m, "root-b"), spread);
}

#[test]
fn canvas_drag_pans_the_camera() {
    let mut m = map(DOC);
    let before = m.camera();
    m.pointer_down(None);
    m.pointer_move(10.0, -5.0);
    assert_eq!(m.pointer_up(), GestureOutcome::Pan);
    let after = m.camera();
    assert_eq!(after.translate_x, before.translate_x + 10.0);
    assert_eq!(after.translate_y, before.translate_y - 5.0);
}

#[test]
fn pin_dangles_after_rename_and_navigation_is_a_no_op() {
    let mut m = map("# Root\n## A\n## B");
    let pin = m.add_pin("root-a", "Alpha");
    assert!(m.navigate_to_pin(&pin));
    m.tick(20_000.0);

    m.apply_edit(&EditRequest::rename(1, "A2")).unwrap();
    let camera = m.camera_target();
    assert!(!m.navigate_to_pin(&pin));
    assert_eq!(m.camera_target(), camera);
    assert_eq!(m.list_pins(), [pin.clone()]);

    m.apply_edit(&EditRequest::rename(1, "A")).unwrap();
    assert!(m.navigate_to_pin(&pin));
}

#[test]
fn pin_under_a_collapsed_node_focuses_the_ancestor() {
    let mut m = map(DOC);
    let pin = m.add_pin("root-a-a1", "deep");
    m.toggle_collapse("root-a");
    assert!(m.navigate_to_pin(&pin));
    let focus_scale = m.settings().camera.focus_scale;
    assert_eq!(
        m.camera_target(),
        Camera::focus_on(position(&m, "root-a"), focus_scale)
    );
}

#[test]
fn remove_pin_clears_every_pin_on_the_node() {
    let mut m = map(DOC);
    m.add_pin("root-a", "one");
    m.add_pin("root-a", "two");
    m.add_pin("root-b", "three");
    assert_eq!(m.remove_pin("root-a"), 2);
    assert_eq!(m.list_pins().len(), 1);
}

#[test]
fn context_menu_lists_structural_and_view_actions() {
    let mut m = map(DOC);
    let menu = m.open_context_menu(Some("root-a"));
    assert_eq!(
        menu.items,
        [
            MenuItem::Rename,
            MenuItem::AddChild,
            MenuItem::Delete,
            MenuItem::Collapse,
            MenuItem::AddPin,
            MenuItem::ZoomIn,
            MenuItem::ZoomOut,
            MenuItem::Recenter
        ]
    );
    assert_eq!(menu.target.as_ref().unwrap().line_index, Some(1));

    let leaf = m.open_context_menu(Some("root-b"));
    assert!(!leaf.contains(MenuItem::Collapse) && !leaf.contains(MenuItem::Expand));

    m.add_pin("root-b", "b");
    let leaf = m.open_context_menu(Some("root-b"));
    assert!(leaf.contains(MenuItem::RemovePin));

    let canvas = m.open_context_menu(None);
    assert!(canvas.target.is_none());
    assert_eq!(canvas.items, MenuItem::VIEW);
}

#[test]
fn structural_choices_produce_requests_not_mutations() {
    let mut m = map(DOC);
    let menu = m.open_context_menu(Some("root-a"));
    assert_eq!(
        m.choose(&menu, MenuItem::Rename),
        MenuOutcome::NeedsText {
            action: EditAction::Rename,
            line_index: 1,
            suggested: "A".into()
        }
    );
    assert_eq!(
        m.choose(&menu, MenuItem::Delete),
        MenuOutcome::Edit(EditRequest::delete(1))
    );
    assert_eq!(m.text(), DOC);
    assert_eq!(m.choose(&menu, MenuItem::Expand), MenuOutcome::Ignored);
    assert_eq!(
        m.choose(&menu, MenuItem::Collapse),
        MenuOutcome::Toggled {
            node_id: "root-a".into(),
            collapsed: true
        }
    );
    assert_eq!(
        m.choose(&menu, MenuItem::AddPin),
        MenuOutcome::NeedsPinLabel {
            node_id: "root-a".into()
        }
    );
}

#[test]
fn synthetic_root_offers_no_text_edits() {
    let m = map("# One\n# Two");
    let root = m.frame().root_id.clone();
    let menu = m.open_context_menu(Some(&root));
    assert!(!menu.contains(MenuItem::Rename));
    assert!(!menu.contains(MenuItem::Delete));
    assert!(menu.contains(MenuItem::Collapse));
}

#[test]
fn zoom_is_clamped_and_the_last_camera_request_wins() {
    let mut m = map(DOC);
    let mut now = 10_000.0;
    for _ in 0..30 {
        m.zoom_in();
        now += 1_000.0;
        m.tick(now);
    }
    assert_eq!(m.camera().scale, m.settings().camera.max_scale);

    m.zoom_out();
    let recentered = m.recenter();
    assert_eq!(recentered, Camera::default_framing(Viewport::default()));
    assert_eq!(m.camera_target(), recentered);
    m.tick(now + 1_000.0);
    assert_eq!(m.camera(), recentered);
    assert_eq!(m.view_state().camera, recentered);
}

#[test]
fn exiting_nodes_are_drawn_until_their_transition_ends() {
    let mut m = map(DOC);
    m.apply_edit(&EditRequest::delete(3)).unwrap();
    assert!(m.scene().node("root-b").is_some());
    assert!(m.tick(10_250.0));
    let leaving = m.scene();
    let b = leaving.node("root-b").unwrap();
    assert!(b.opacity > 0.0 && b.opacity < 1.0);

    assert!(!m.tick(11_000.0));
    let scene = m.scene();
    assert!(scene.node("root-b").is_none());
    assert_eq!(scene.links.len(), 2);
}

#[test]
fn reset_layout_drops_overrides_and_reframes() {
    let mut m = map(DOC);
    m.pointer_down(Some("root-b"));
    m.pointer_move(0.0, 100.0);
    m.pointer_up();
    m.zoom_in();
    m.reset_layout();
    assert!(!m.view_state().has_overrides());
    assert_eq!(m.camera_target(), Camera::default_framing(m.viewport()));
    let fresh = map(DOC);
    assert_eq!(position(&m, "root-b"), position(&fresh, "root-b"));
}

#[test]
fn svg_output_and_export() {
    let m = map(DOC);
    let svg = m.render_svg();
    assert!(svg.starts_with(r#"<svg id="mindmap-svg""#));
    assert_eq!(svg.matches(r#"class="node""#).count(), 4);
    let exported = m.export_svg("#ffffff").unwrap();
    assert!(exported.contains(r##"fill="#ffffff""##));
}

#[test]
fn empty_document_renders_a_placeholder_without_links() {
    let m = map("");
    let scene = m.scene();
    assert_eq!(scene.nodes.len(), 1);
    assert!(scene.links.is_empty());
}
