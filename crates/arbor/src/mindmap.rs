//! The interactive controller: one document, its view state, pins and running animations.
//!
//! Time never advances on its own. Every method that starts an animation stamps it with the
//! clock last passed to [`MindMap::tick`].

use arbor_core::{ArborConfig, EditAction, EditRequest, OutlineNode, OutlineParser, line_label};
use arbor_render::diff::{LinkEnds, ScenePatch};
use arbor_render::export::{export_svg, plan_export};
use arbor_render::scene::{LINK_OPACITY, Scene, SceneLink, SceneNode};
use arbor_render::svg::{SvgOptions, render_scene_svg};
use arbor_render::{
    Animator, Camera, CameraAnimation, Easing, Frame, Interpolate, LayoutLink, LayoutNode, Point,
    ReconcileMode, RenderSettings, Transition, ViewState, Viewport, reconcile,
};
use indexmap::IndexMap;

use crate::Result;
use crate::interaction::{
    ContextMenu, Gesture, GestureOutcome, InteractionSettings, MenuItem, MenuOutcome, MenuTarget,
    PressTarget,
};
use crate::pins::{Pin, PinBoard};

#[derive(Debug, Clone, Default)]
pub struct MindMapOptions {
    pub parser: OutlineParser,
    pub settings: RenderSettings,
    pub interaction: InteractionSettings,
    pub viewport: Viewport,
}

impl MindMapOptions {
    pub fn from_config(config: &ArborConfig) -> Result<Self> {
        Ok(Self {
            parser: OutlineParser::from_config(config)?,
            settings: RenderSettings::from_config(config)?,
            interaction: InteractionSettings::from_config(config)?,
            viewport: Viewport::default(),
        })
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }
}

/// Animated state of a drawn node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeVisual {
    pub position: Point,
    pub opacity: f64,
}

impl Interpolate for NodeVisual {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self {
            position: self.position.interpolate(&to.position, t),
            opacity: self.opacity.interpolate(&to.opacity, t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct LinkVisual {
    ends: LinkEnds,
    opacity: f64,
}

impl Interpolate for LinkVisual {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self {
            ends: LinkEnds {
                source: self.ends.source.interpolate(&to.ends.source, t),
                target: self.ends.target.interpolate(&to.ends.target, t),
            },
            opacity: self.opacity.interpolate(&to.opacity, t),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MindMap {
    options: MindMapOptions,
    text: String,
    outline: OutlineNode,
    frame: Frame,
    view: ViewState,
    pins: PinBoard,
    viewport: Viewport,
    now_ms: f64,
    node_anim: Animator<String, NodeVisual>,
    link_anim: Animator<String, LinkVisual>,
    exiting_nodes: IndexMap<String, LayoutNode>,
    exiting_links: IndexMap<String, LayoutLink>,
    camera: CameraAnimation,
    gesture: Option<Gesture>,
    last_patch: ScenePatch,
}

impl MindMap {
    pub fn new(text: impl Into<String>, options: MindMapOptions) -> Self {
        let text = text.into();
        let outline = options.parser.parse(&text);
        let viewport = options.viewport;
        let camera = Camera::default_framing(viewport);
        let view = ViewState {
            camera,
            ..ViewState::default()
        };
        let reconciled = reconcile(
            None,
            &outline,
            &view,
            &options.settings,
            ReconcileMode::Incremental,
        );
        let mut map = Self {
            options,
            text,
            outline,
            frame: Frame::default(),
            view,
            pins: PinBoard::new(),
            viewport,
            now_ms: 0.0,
            node_anim: Animator::new(),
            link_anim: Animator::new(),
            exiting_nodes: IndexMap::new(),
            exiting_links: IndexMap::new(),
            camera: CameraAnimation::new(camera),
            gesture: None,
            last_patch: ScenePatch::default(),
        };
        map.install(reconciled.frame, reconciled.patch, None);
        map
    }

    pub fn from_config(text: impl Into<String>, config: &ArborConfig) -> Result<Self> {
        Ok(Self::new(text, MindMapOptions::from_config(config)?))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn outline(&self) -> &OutlineNode {
        &self.outline
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.options.settings
    }

    /// The patch produced by the most recent re-layout.
    pub fn last_patch(&self) -> &ScenePatch {
        &self.last_patch
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Replaces the source text and animates to the new layout.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.outline = self.options.parser.parse(&self.text);
        self.relayout(ReconcileMode::Incremental);
    }

    /// Applies a structural edit through the reference text collaborator.
    pub fn apply_edit(&mut self, request: &EditRequest) -> Result<()> {
        let text = arbor_core::apply_edit(&self.text, request)?;
        self.set_text(text);
        Ok(())
    }

    fn relayout(&mut self, mode: ReconcileMode) {
        let reconciled = reconcile(
            Some(&self.frame),
            &self.outline,
            &self.view,
            &self.options.settings,
            mode,
        );
        let previous = std::mem::take(&mut self.frame);
        self.install(reconciled.frame, reconciled.patch, Some(&previous));
    }

    /// Starts the transitions described by `patch` and makes `frame` current.
    fn install(&mut self, frame: Frame, patch: ScenePatch, previous: Option<&Frame>) {
        let now = self.now_ms;
        let duration = self.options.settings.animation.duration_ms;
        let easing = Easing::CubicInOut;

        for change in &patch.nodes.enter {
            self.exiting_nodes.shift_remove(&change.id);
            self.node_anim.start(
                change.id.clone(),
                NodeVisual {
                    position: change.from,
                    opacity: 0.0,
                },
                NodeVisual {
                    position: change.to,
                    opacity: 1.0,
                },
                now,
                duration,
                easing,
            );
        }
        for change in &patch.nodes.update {
            self.node_anim.start(
                change.id.clone(),
                NodeVisual {
                    position: change.from,
                    opacity: 1.0,
                },
                NodeVisual {
                    position: change.to,
                    opacity: 1.0,
                },
                now,
                duration,
                easing,
            );
        }
        for change in &patch.nodes.exit {
            if let Some(old) = previous.and_then(|p| p.node(&change.id)) {
                self.exiting_nodes.insert(change.id.clone(), old.clone());
            }
            self.node_anim.start(
                change.id.clone(),
                NodeVisual {
                    position: change.from,
                    opacity: 1.0,
                },
                NodeVisual {
                    position: change.to,
                    opacity: 0.0,
                },
                now,
                duration,
                easing,
            );
        }

        for change in &patch.links.enter {
            self.exiting_links.shift_remove(&change.id);
            self.link_anim.start(
                change.id.clone(),
                LinkVisual {
                    ends: change.from,
                    opacity: 0.0,
                },
                LinkVisual {
                    ends: change.to,
                    opacity: 1.0,
                },
                now,
                duration,
                easing,
            );
        }
        for change in &patch.links.update {
            self.link_anim.start(
                change.id.clone(),
                LinkVisual {
                    ends: change.from,
                    opacity: 1.0,
                },
                LinkVisual {
                    ends: change.to,
                    opacity: 1.0,
                },
                now,
                duration,
                easing,
            );
        }
        for change in &patch.links.exit {
            if let Some(old) = previous.and_then(|p| p.links.iter().find(|l| l.id == change.id)) {
                self.exiting_links.insert(change.id.clone(), old.clone());
            }
            self.link_anim.start(
                change.id.clone(),
                LinkVisual {
                    ends: change.from,
                    opacity: 1.0,
                },
                LinkVisual {
                    ends: change.to,
                    opacity: 0.0,
                },
                now,
                duration,
                easing,
            );
        }

        // Anything neither drawn nor leaving has no business holding a transition.
        let stale: Vec<String> = self
            .node_anim
            .keys()
            .filter(|id| !frame.is_visible(id) && !self.exiting_nodes.contains_key(*id))
            .cloned()
            .collect();
        for id in stale {
            self.node_anim.remove(&id);
        }
        let stale: Vec<String> = self
            .link_anim
            .keys()
            .filter(|id| {
                !frame.links.iter().any(|l| &l.id == *id) && !self.exiting_links.contains_key(*id)
            })
            .cloned()
            .collect();
        for id in stale {
            self.link_anim.remove(&id);
        }

        self.frame = frame;
        self.last_patch = patch;
    }

    /// Advances the clock. Finished exits are dropped and a finished camera move settles.
    /// Returns whether anything is still animating.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.now_ms = now_ms;

        let done: Vec<String> = self
            .exiting_nodes
            .keys()
            .filter(|id| {
                self.node_anim
                    .get(*id)
                    .is_none_or(|t| t.is_finished(now_ms))
            })
            .cloned()
            .collect();
        for id in done {
            self.exiting_nodes.shift_remove(&id);
            if !self.frame.is_visible(&id) {
                self.node_anim.remove(&id);
            }
        }
        let done: Vec<String> = self
            .exiting_links
            .keys()
            .filter(|id| {
                self.link_anim
                    .get(*id)
                    .is_none_or(|t| t.is_finished(now_ms))
            })
            .cloned()
            .collect();
        for id in done {
            self.exiting_links.shift_remove(&id);
            self.link_anim.remove(&id);
        }

        self.view.camera = self.camera.tick(now_ms);
        self.is_animating()
    }

    pub fn is_animating(&self) -> bool {
        self.node_anim.is_animating(self.now_ms)
            || self.link_anim.is_animating(self.now_ms)
            || self.camera.is_animating(self.now_ms)
    }

    /// Current, possibly mid-flight, camera.
    pub fn camera(&self) -> Camera {
        self.camera.value(self.now_ms)
    }

    /// Where the camera will rest once the current move completes.
    pub fn camera_target(&self) -> Camera {
        self.camera.target()
    }

    fn move_camera(&mut self, target: Camera, duration_ms: f64, easing: Easing) {
        self.camera
            .animate_to(target, self.now_ms, duration_ms, easing);
        self.view.camera = self.camera.value(self.now_ms);
    }

    pub fn zoom_in(&mut self) -> Camera {
        self.zoom_by(self.options.settings.camera.zoom_in_factor)
    }

    pub fn zoom_out(&mut self) -> Camera {
        self.zoom_by(self.options.settings.camera.zoom_out_factor)
    }

    fn zoom_by(&mut self, factor: f64) -> Camera {
        let cam = &self.options.settings.camera;
        let (min, max, duration) = (cam.min_scale, cam.max_scale, cam.zoom_duration_ms);
        let target = self.camera().scaled_by(factor, min, max);
        self.move_camera(target, duration, Easing::CubicInOut);
        target
    }

    pub fn recenter(&mut self) -> Camera {
        let target = Camera::default_framing(self.viewport);
        self.move_camera(
            target,
            self.options.settings.camera.zoom_duration_ms,
            Easing::CubicInOut,
        );
        target
    }

    /// Drops every drag override, lays the tree out from scratch and reframes the camera.
    pub fn reset_layout(&mut self) {
        self.view.clear_overrides();
        self.relayout(ReconcileMode::Reset);
        let target = Camera::default_framing(self.viewport);
        self.move_camera(
            target,
            self.options.settings.camera.reset_duration_ms,
            Easing::CubicInOut,
        );
    }

    /// Flips the collapse state of a node with children. `None` for leaves and unknown ids.
    pub fn toggle_collapse(&mut self, node_id: &str) -> Option<bool> {
        let has_children = self.frame.node(node_id).is_some_and(LayoutNode::has_children);
        if !has_children {
            return None;
        }
        let collapsed = self.view.toggle_collapsed(node_id);
        self.relayout(ReconcileMode::Incremental);
        Some(collapsed)
    }

    pub fn add_pin(&mut self, node_id: &str, label: impl Into<String>) -> Pin {
        self.pins.add(node_id, label)
    }

    /// Removes every pin on `node_id`.
    pub fn remove_pin(&mut self, node_id: &str) -> usize {
        self.pins.remove_node(node_id)
    }

    pub fn list_pins(&self) -> &[Pin] {
        self.pins.list()
    }

    pub fn pins(&self) -> &PinBoard {
        &self.pins
    }

    /// Focuses the camera on the pinned node, or on the collapsed ancestor hiding it.
    ///
    /// A pin whose node id is gone (for instance after a rename) is left alone and nothing
    /// happens.
    pub fn navigate_to_pin(&mut self, pin: &Pin) -> bool {
        let Some(node) = self.frame.visible_ancestor(&pin.node_id) else {
            tracing::debug!(pin = %pin.id, node = %pin.node_id, "pin target not in the current map");
            return false;
        };
        let cam = &self.options.settings.camera;
        let target = Camera::focus_on(node.position(), cam.focus_scale);
        let duration = cam.focus_duration_ms;
        self.move_camera(target, duration, Easing::CubicOut);
        true
    }

    /// Starts a gesture. Presses on hidden or unknown nodes are treated as canvas presses.
    pub fn pointer_down(&mut self, node_id: Option<&str>) {
        let target = match node_id.filter(|id| self.frame.is_visible(id)) {
            Some(id) => PressTarget::Node(id.to_string()),
            None => PressTarget::Canvas,
        };
        self.gesture = Some(Gesture::new(target));
    }

    /// Feeds a pointer movement in diagram units. Returns whether the gesture is now a drag.
    pub fn pointer_move(&mut self, dx: f64, dy: f64) -> bool {
        let threshold = self.options.interaction.drag_threshold;
        let Some(gesture) = self.gesture.as_mut() else {
            return false;
        };
        let was_dragging = gesture.is_dragging();
        let Some((dx, dy)) = gesture.moved(dx, dy, threshold) else {
            return false;
        };
        let target = gesture.target().clone();
        match target {
            PressTarget::Node(id) => {
                if !was_dragging {
                    tracing::trace!(node = %id, "drag start");
                }
                self.drag_subtree(&id, dx, dy);
            }
            PressTarget::Canvas => self.pan_by(dx, dy),
        }
        true
    }

    pub fn pointer_up(&mut self) -> GestureOutcome {
        let Some(gesture) = self.gesture.take() else {
            return GestureOutcome::None;
        };
        match (gesture.target().clone(), gesture.is_dragging()) {
            (PressTarget::Node(node_id), true) => {
                tracing::trace!(node = %node_id, travelled = gesture.travelled(), "drag end");
                GestureOutcome::Drag { node_id }
            }
            (PressTarget::Node(node_id), false) => {
                let toggled = self.toggle_collapse(&node_id);
                GestureOutcome::Click { node_id, toggled }
            }
            (PressTarget::Canvas, true) => GestureOutcome::Pan,
            (PressTarget::Canvas, false) => GestureOutcome::None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.as_ref().is_some_and(Gesture::is_dragging)
    }

    fn pan_by(&mut self, dx: f64, dy: f64) {
        let cam = self.camera();
        let panned = Camera::new(
            cam.translate_x + dx * cam.scale,
            cam.translate_y + dy * cam.scale,
            cam.scale,
        );
        self.camera.jump_to(panned);
        self.view.camera = panned;
    }

    /// Moves `node_id` and everything under it by `(dx, dy)` without a re-layout.
    ///
    /// Visible nodes move from where they are drawn at the current clock. Hidden descendants
    /// move with the visible ancestor hiding them. Every moved node, hidden or not, is stored
    /// as an override so a later expand shows the subtree as it was dragged.
    fn drag_subtree(&mut self, node_id: &str, dx: f64, dy: f64) {
        let now = self.now_ms;
        let ids = self.frame.subtree_ids(node_id);
        let mut shifts: IndexMap<&str, Point> = IndexMap::with_capacity(ids.len());
        for id in &ids {
            let drawn = self.node_anim.value(id, now).map(|v| v.position);
            let Some(node) = self.frame.node_mut(id) else {
                continue;
            };
            let (position, shift) = if node.visible {
                let to = drawn.unwrap_or(node.position()).offset(dx, dy);
                (to, Point::new(to.x - node.x, to.y - node.y))
            } else {
                let shift = node
                    .parent
                    .as_deref()
                    .and_then(|p| shifts.get(p))
                    .copied()
                    .unwrap_or(Point::new(dx, dy));
                (node.position().offset(shift.x, shift.y), shift)
            };
            node.x = position.x;
            node.y = position.y;
            self.view.set_override(id, position);
            if node.visible {
                self.node_anim.set(
                    id.clone(),
                    NodeVisual {
                        position,
                        opacity: 1.0,
                    },
                    now,
                );
            }
            shifts.insert(id.as_str(), shift);
        }

        for link in &self.frame.links {
            if !shifts.contains_key(link.target.as_str()) {
                continue;
            }
            let (Some(source), Some(target)) =
                (self.frame.node(&link.source), self.frame.node(&link.target))
            else {
                continue;
            };
            let target = target.position();
            let ends = |source| LinkVisual {
                ends: LinkEnds { source, target },
                opacity: 1.0,
            };
            // A parent still in flight keeps pulling its end of the link along.
            match self
                .node_anim
                .get(&link.source)
                .filter(|t| !t.is_finished(now))
            {
                Some(parent) => self.link_anim.insert(
                    link.id.clone(),
                    Transition::new(
                        ends(parent.from.position),
                        ends(parent.to.position),
                        parent.start_ms,
                        parent.duration_ms,
                        parent.easing,
                    ),
                ),
                None => self.link_anim.set(link.id.clone(), ends(source.position()), now),
            }
        }
    }

    pub fn open_context_menu(&self, node_id: Option<&str>) -> ContextMenu {
        let Some(node) = node_id.and_then(|id| self.frame.node(id)).filter(|n| n.visible) else {
            return ContextMenu::canvas();
        };
        let mut items = Vec::new();
        if node.line_index.is_some() {
            items.extend([MenuItem::Rename, MenuItem::AddChild, MenuItem::Delete]);
        }
        if node.has_children() {
            items.push(if node.collapsed() {
                MenuItem::Expand
            } else {
                MenuItem::Collapse
            });
        }
        items.push(if self.pins.has_pin(&node.id) {
            MenuItem::RemovePin
        } else {
            MenuItem::AddPin
        });
        items.extend(MenuItem::VIEW);
        ContextMenu {
            target: Some(MenuTarget {
                node_id: node.id.clone(),
                line_index: node.line_index,
            }),
            items,
        }
    }

    pub fn choose(&mut self, menu: &ContextMenu, item: MenuItem) -> MenuOutcome {
        if !menu.contains(item) {
            return MenuOutcome::Ignored;
        }
        match item {
            MenuItem::ZoomIn => return MenuOutcome::Camera(self.zoom_in()),
            MenuItem::ZoomOut => return MenuOutcome::Camera(self.zoom_out()),
            MenuItem::Recenter => return MenuOutcome::Camera(self.recenter()),
            _ => {}
        }
        let Some(target) = menu.target.as_ref() else {
            return MenuOutcome::Ignored;
        };
        let line = target.line_index;
        match (item, line) {
            (MenuItem::Rename, Some(line_index)) => MenuOutcome::NeedsText {
                action: EditAction::Rename,
                line_index,
                suggested: line_label(&self.text, line_index).unwrap_or_default(),
            },
            (MenuItem::AddChild, Some(line_index)) => MenuOutcome::NeedsText {
                action: EditAction::AddChild,
                line_index,
                suggested: String::new(),
            },
            (MenuItem::Delete, Some(line_index)) => {
                MenuOutcome::Edit(EditRequest::delete(line_index))
            }
            (MenuItem::Collapse | MenuItem::Expand, _) => {
                match self.toggle_collapse(&target.node_id) {
                    Some(collapsed) => MenuOutcome::Toggled {
                        node_id: target.node_id.clone(),
                        collapsed,
                    },
                    None => MenuOutcome::Ignored,
                }
            }
            (MenuItem::AddPin, _) => MenuOutcome::NeedsPinLabel {
                node_id: target.node_id.clone(),
            },
            (MenuItem::RemovePin, _) => MenuOutcome::PinsRemoved {
                node_id: target.node_id.clone(),
                count: self.remove_pin(&target.node_id),
            },
            _ => MenuOutcome::Ignored,
        }
    }

    /// What to draw at the current clock: live nodes first, then anything still leaving.
    pub fn scene(&self) -> Scene {
        let now = self.now_ms;
        let theme = &self.options.settings.theme;
        let mut nodes = Vec::new();
        for node in self.frame.visible_nodes() {
            let visual = self.node_anim.value(&node.id, now).unwrap_or(NodeVisual {
                position: node.position(),
                opacity: 1.0,
            });
            nodes.push(SceneNode::from_layout(
                node,
                visual.position,
                visual.opacity,
                theme,
                self.pins.has_pin(&node.id),
            ));
        }
        for (id, node) in &self.exiting_nodes {
            if let Some(visual) = self.node_anim.value(id, now) {
                nodes.push(SceneNode::from_layout(
                    node,
                    visual.position,
                    visual.opacity,
                    theme,
                    self.pins.has_pin(id),
                ));
            }
        }

        let mut links = Vec::new();
        for link in &self.frame.links {
            let visual = match self.link_anim.value(&link.id, now) {
                Some(v) => v,
                None => {
                    let (Some(s), Some(t)) =
                        (self.frame.node(&link.source), self.frame.node(&link.target))
                    else {
                        continue;
                    };
                    LinkVisual {
                        ends: LinkEnds {
                            source: s.position(),
                            target: t.position(),
                        },
                        opacity: 1.0,
                    }
                }
            };
            links.push(SceneLink::from_layout(
                link,
                visual.ends.source,
                visual.ends.target,
                LINK_OPACITY * visual.opacity,
            ));
        }
        for (id, link) in &self.exiting_links {
            if let Some(visual) = self.link_anim.value(id, now) {
                links.push(SceneLink::from_layout(
                    link,
                    visual.ends.source,
                    visual.ends.target,
                    LINK_OPACITY * visual.opacity,
                ));
            }
        }
        Scene { nodes, links }
    }

    /// The layout at rest, ignoring running animations.
    pub fn resting_scene(&self) -> Scene {
        Scene::from_frame(&self.frame, &self.options.settings.theme, |id| {
            self.pins.has_pin(id)
        })
    }

    pub fn render_svg(&self) -> String {
        let options = SvgOptions {
            viewport: self.viewport,
            orientation: self.options.settings.layout.orientation,
        };
        render_scene_svg(&self.scene(), &self.camera(), &options)
    }

    /// Standalone SVG of the resting layout on `background`; `None` when there is nothing to
    /// capture.
    pub fn export_svg(&self, background: &str) -> Option<String> {
        let scene = self.resting_scene();
        let plan = plan_export(&scene, background, &self.options.settings.export)?;
        Some(export_svg(
            &scene,
            &plan,
            self.options.settings.layout.orientation,
        ))
    }
}
