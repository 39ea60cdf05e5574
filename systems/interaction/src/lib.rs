#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pointer and keyboard interaction state machine.
//!
//! The controller owns the transient [`UiState`] and translates raw input into
//! [`Command`] batches for the world. It never mutates the map itself: drags
//! keep their target out of band and commit a single command on pointer-up,
//! and pans only ever touch the viewport.

mod modes;

use glam::Vec2;
use isomap_core::{Command, Event, GridSize, NodeCategory, NodeId, RegionId, TileCoord, TileRect};
use isomap_projection::{IsoProjection, Viewport, POINTER_ZOOM_RANGE, VIEW_ZOOM_RANGE};
use isomap_world::{query, World};
use tracing::debug;

/// Screen distance travelled by one arrow key press.
pub const ARROW_PAN_STEP: f32 = 48.0;

/// Zoom multiplier applied per wheel notch.
pub const WHEEL_ZOOM_FACTOR: f32 = 1.1;

/// Interaction behaviour governing how pointer input is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Select and drag single nodes.
    #[default]
    Cursor,
    /// Drag the viewport.
    Pan,
    /// Place nodes of the armed category.
    PlaceNode,
    /// Connect two nodes with successive clicks.
    Connector,
    /// Drag nodes or whole regions.
    DragItems,
    /// Draw a new user section.
    CreateSection,
}

/// Modifier keys held while a pointer event fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Alt / Option. Forces pan behaviour for the whole pointer gesture.
    pub alt: bool,
}

/// Keys the controller reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Cancels every in-progress interaction and returns to [`Mode::Cursor`].
    Escape,
    /// Removes the current selection.
    Delete,
    /// Same as [`Key::Delete`].
    Backspace,
    /// Pans the view up.
    ArrowUp,
    /// Pans the view down.
    ArrowDown,
    /// Pans the view left.
    ArrowLeft,
    /// Pans the view right.
    ArrowRight,
}

/// Raw input delivered by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    /// A pointer button was pressed.
    PointerDown {
        /// Pointer position in screen space.
        position: Vec2,
        /// Modifier keys held.
        modifiers: Modifiers,
    },
    /// The pointer moved.
    PointerMove {
        /// Pointer position in screen space.
        position: Vec2,
        /// Modifier keys held.
        modifiers: Modifiers,
    },
    /// A pointer button was released.
    PointerUp {
        /// Pointer position in screen space.
        position: Vec2,
        /// Modifier keys held.
        modifiers: Modifiers,
    },
    /// The wheel turned. Negative deltas zoom in.
    Wheel {
        /// Pointer position in screen space.
        position: Vec2,
        /// Vertical wheel delta.
        delta: f32,
    },
    /// A key was pressed.
    Key(Key),
}

/// Pointer gesture in progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// A node is being dragged.
    DragNode {
        /// Node being dragged.
        node: NodeId,
        /// Tile the node occupied when the drag started.
        origin: TileCoord,
        /// Screen position where the drag started.
        anchor: Vec2,
        /// Last valid destination under the pointer.
        preview: TileCoord,
    },
    /// A region is being dragged together with its nodes.
    DragRegion {
        /// Region being dragged.
        region: RegionId,
        /// Tile under the pointer when the drag started.
        origin: TileCoord,
        /// Tile currently under the pointer.
        preview: TileCoord,
    },
    /// The viewport is being dragged.
    Pan {
        /// Screen position where the pan started.
        anchor: Vec2,
        /// Viewport pan when the pan started.
        start_pan: Vec2,
    },
}

/// Drag destination the renderer should preview.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPreview {
    /// A node would land on `tile`.
    Node {
        /// Node being dragged.
        node: NodeId,
        /// Tile it would move to.
        tile: TileCoord,
    },
    /// A region would be translated by `(dx, dy)`.
    Region {
        /// Region being dragged.
        region: RegionId,
        /// Column delta.
        dx: i32,
        /// Row delta.
        dy: i32,
    },
}

/// Transient interaction and viewport state. Never persisted.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct UiState {
    /// Declared interaction mode.
    pub mode: Mode,
    /// Pan and zoom of the view.
    pub viewport: Viewport,
    /// Selected node.
    pub selected_node: Option<NodeId>,
    /// Tile under the pointer.
    pub hovered_tile: Option<TileCoord>,
    /// Category placed by [`Mode::PlaceNode`].
    pub placing_category: Option<NodeCategory>,
    /// First endpoint chosen in [`Mode::Connector`].
    pub connector_source: Option<NodeId>,
    /// Gesture in progress.
    pub gesture: Option<Gesture>,
    /// First corner of the section being drawn.
    pub section_anchor: Option<TileCoord>,
    /// Opposite corner of the section being drawn.
    pub section_corner: Option<TileCoord>,
    /// Selected region.
    pub selected_region: Option<RegionId>,
    /// Region whose caption is being edited.
    pub editing_region: Option<RegionId>,
}

impl UiState {
    /// Rectangle of the section being drawn, if any.
    #[must_use]
    pub fn section_preview(&self) -> Option<TileRect> {
        Some(TileRect::new(self.section_anchor?, self.section_corner?))
    }

    /// Destination of the drag in progress, if any.
    #[must_use]
    pub fn drag_preview(&self) -> Option<DragPreview> {
        match self.gesture? {
            Gesture::DragNode { node, preview, .. } => Some(DragPreview::Node {
                node,
                tile: preview,
            }),
            Gesture::DragRegion {
                region,
                origin,
                preview,
            } => {
                let (dx, dy) = modes::tile_delta(origin, preview);
                Some(DragPreview::Region { region, dx, dy })
            }
            Gesture::Pan { .. } => None,
        }
    }

    /// Reports whether a drag or pan gesture is in progress.
    #[must_use]
    pub const fn gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    fn cancel_interactions(&mut self) {
        self.selected_node = None;
        self.placing_category = None;
        self.connector_source = None;
        self.gesture = None;
        self.section_anchor = None;
        self.section_corner = None;
        self.selected_region = None;
        self.editing_region = None;
    }
}

/// Mode state machine turning raw input into world commands.
#[derive(Clone, Debug, Default)]
pub struct InteractionController {
    projection: IsoProjection,
    ui: UiState,
}

impl InteractionController {
    /// Creates a controller using the provided projection.
    #[must_use]
    pub fn new(projection: IsoProjection) -> Self {
        Self {
            projection,
            ui: UiState::default(),
        }
    }

    /// Read-only view of the interaction state.
    #[must_use]
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// Projection used to interpret pointer positions.
    #[must_use]
    pub fn projection(&self) -> &IsoProjection {
        &self.projection
    }

    /// Switches the declared mode, abandoning any gesture in progress.
    ///
    /// Leaving [`Mode::PlaceNode`] disarms the placement category and leaving
    /// [`Mode::Connector`] drops the pending source.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.ui.mode == mode {
            return;
        }
        debug!(from = ?self.ui.mode, to = ?mode, "interaction mode changed");
        self.ui.mode = mode;
        self.ui.gesture = None;
        self.ui.section_anchor = None;
        self.ui.section_corner = None;
        if mode != Mode::PlaceNode {
            self.ui.placing_category = None;
        }
        if mode != Mode::Connector {
            self.ui.connector_source = None;
        }
    }

    /// Arms `category` for placement and enters [`Mode::PlaceNode`].
    pub fn arm_placement(&mut self, category: NodeCategory) {
        self.set_mode(Mode::PlaceNode);
        self.ui.placing_category = Some(category);
    }

    /// Sets the zoom factor, clamped to the view range, keeping the pan.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.ui.viewport = self.ui.viewport.with_zoom(zoom, VIEW_ZOOM_RANGE);
    }

    /// Sets the screen offset of tile `(0, 0)`.
    pub fn set_pan(&mut self, pan: Vec2) {
        self.ui.viewport.pan = pan;
    }

    /// Zooms while keeping the content under `cursor` fixed.
    pub fn zoom_at_point(&mut self, cursor: Vec2, zoom: f32) {
        self.ui.viewport = self.ui.viewport.zoomed_at(cursor, zoom, POINTER_ZOOM_RANGE);
    }

    /// Zooms to `zoom` and pans so the grid center sits in the middle of a
    /// screen area of `viewport_size`.
    pub fn center_on_zoom(&mut self, grid: GridSize, viewport_size: Vec2, zoom: f32) {
        self.ui.viewport = self.projection.centered_on_grid(grid, viewport_size, zoom);
    }

    /// Selects a node, or clears the selection.
    pub fn select_node(&mut self, node: Option<NodeId>) {
        self.ui.selected_node = node;
    }

    /// Sets the hovered tile, or clears it.
    pub fn set_hovered_tile(&mut self, tile: Option<TileCoord>) {
        self.ui.hovered_tile = tile;
    }

    /// Selects a region, or clears the selection.
    pub fn select_region(&mut self, region: Option<RegionId>) {
        self.ui.selected_region = region;
    }

    /// Marks a region as being edited, or clears the mark.
    pub fn edit_region(&mut self, region: Option<RegionId>) {
        self.ui.editing_region = region;
    }

    /// Restores every field of the interaction state to its default.
    pub fn reset(&mut self) {
        self.ui = UiState::default();
    }

    /// Interprets one input event against the current map.
    pub fn handle(&mut self, input: Input, world: &World, out: &mut Vec<Command>) {
        match input {
            Input::PointerDown {
                position,
                modifiers,
            } => {
                let on_down = modes::handler(self.pointer_mode(modifiers.alt)).on_down;
                on_down(&mut self.context(world, out), position);
            }
            Input::PointerMove { position, .. } => {
                if !self.ui.gesture_active() {
                    self.ui.hovered_tile =
                        self.projection
                            .snap_within(position, self.ui.viewport, query::grid(world));
                }
                let on_move = modes::handler(self.pointer_mode(false)).on_move;
                on_move(&mut self.context(world, out), position);
            }
            Input::PointerUp { position, .. } => {
                let on_up = modes::handler(self.pointer_mode(false)).on_up;
                on_up(&mut self.context(world, out), position);
            }
            Input::Wheel { position, delta } => {
                if delta == 0.0 || !delta.is_finite() {
                    return;
                }
                let factor = if delta < 0.0 {
                    WHEEL_ZOOM_FACTOR
                } else {
                    WHEEL_ZOOM_FACTOR.recip()
                };
                self.zoom_at_point(position, self.ui.viewport.zoom * factor);
            }
            Input::Key(key) => self.handle_key(key, world, out),
        }
    }

    /// Reconciles interaction state with what the world reported.
    ///
    /// Removed nodes and regions are dropped from every selection, pending
    /// connector and gesture that referenced them.
    pub fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::NodeRemoved { node, .. } => self.forget_node(*node),
                Event::RegionRemoved { region } => self.forget_region(*region),
                Event::LayoutReplaced { .. } => {
                    self.ui.selected_node = None;
                    self.ui.connector_source = None;
                    self.ui.selected_region = None;
                    self.ui.editing_region = None;
                    if !matches!(self.ui.gesture, Some(Gesture::Pan { .. })) {
                        self.ui.gesture = None;
                    }
                }
                _ => {}
            }
        }
    }

    /// Mode whose handlers receive the next pointer event. A held pan
    /// modifier or a pan gesture in progress overrides the declared mode.
    fn pointer_mode(&self, pan_modifier: bool) -> Mode {
        if pan_modifier || matches!(self.ui.gesture, Some(Gesture::Pan { .. })) {
            Mode::Pan
        } else {
            self.ui.mode
        }
    }

    fn forget_node(&mut self, node: NodeId) {
        if self.ui.selected_node == Some(node) {
            self.ui.selected_node = None;
        }
        if self.ui.connector_source == Some(node) {
            self.ui.connector_source = None;
        }
        if matches!(self.ui.gesture, Some(Gesture::DragNode { node: dragged, .. }) if dragged == node)
        {
            self.ui.gesture = None;
        }
    }

    fn forget_region(&mut self, region: RegionId) {
        if self.ui.selected_region == Some(region) {
            self.ui.selected_region = None;
        }
        if self.ui.editing_region == Some(region) {
            self.ui.editing_region = None;
        }
        if matches!(self.ui.gesture, Some(Gesture::DragRegion { region: dragged, .. }) if dragged == region)
        {
            self.ui.gesture = None;
        }
    }

    fn handle_key(&mut self, key: Key, world: &World, out: &mut Vec<Command>) {
        match key {
            Key::Escape => {
                self.ui.cancel_interactions();
                self.set_mode(Mode::Cursor);
            }
            Key::Delete | Key::Backspace => {
                if let Some(node) = self.ui.selected_node {
                    let protected = query::node(world, node).map_or(false, |node| node.is_protected());
                    if !protected {
                        out.push(Command::RemoveNode { node });
                    }
                } else if let Some(region) = self.ui.selected_region {
                    out.push(Command::RemoveRegion { region });
                }
            }
            Key::ArrowUp => self.pan_by(Vec2::new(0.0, ARROW_PAN_STEP)),
            Key::ArrowDown => self.pan_by(Vec2::new(0.0, -ARROW_PAN_STEP)),
            Key::ArrowLeft => self.pan_by(Vec2::new(ARROW_PAN_STEP, 0.0)),
            Key::ArrowRight => self.pan_by(Vec2::new(-ARROW_PAN_STEP, 0.0)),
        }
    }

    fn pan_by(&mut self, delta: Vec2) {
        self.ui.viewport = self.ui.viewport.panned_by(delta);
    }

    fn context<'a>(&'a mut self, world: &'a World, out: &'a mut Vec<Command>) -> modes::Context<'a> {
        modes::Context {
            ui: &mut self.ui,
            world,
            projection: &self.projection,
            out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isomap_core::SequentialIds;

    fn world() -> World {
        World::with_id_source(GridSize::new(10, 10), Box::new(SequentialIds::new()))
    }

    #[test]
    fn escape_clears_every_pending_interaction() {
        let mut controller = InteractionController::default();
        controller.arm_placement(NodeCategory::Catalog);
        controller.ui.connector_source = Some(NodeId::new(3));
        controller.ui.section_anchor = Some(TileCoord::new(1, 1));
        controller.ui.section_corner = Some(TileCoord::new(2, 2));
        controller.ui.selected_node = Some(NodeId::new(4));
        let mut out = Vec::new();

        controller.handle(Input::Key(Key::Escape), &world(), &mut out);

        let ui = controller.ui();
        assert_eq!(ui.mode, Mode::Cursor);
        assert_eq!(ui.placing_category, None);
        assert_eq!(ui.connector_source, None);
        assert_eq!(ui.section_preview(), None);
        assert_eq!(ui.selected_node, None);
        assert!(out.is_empty());
    }

    #[test]
    fn set_mode_drops_mode_specific_state() {
        let mut controller = InteractionController::default();
        controller.arm_placement(NodeCategory::Finance);
        assert_eq!(controller.ui().mode, Mode::PlaceNode);
        assert_eq!(controller.ui().placing_category, Some(NodeCategory::Finance));

        controller.set_mode(Mode::Connector);
        assert_eq!(controller.ui().placing_category, None);
    }

    #[test]
    fn arrow_keys_pan_by_fixed_step() {
        let mut controller = InteractionController::default();
        let mut out = Vec::new();
        controller.handle(Input::Key(Key::ArrowRight), &world(), &mut out);
        controller.handle(Input::Key(Key::ArrowUp), &world(), &mut out);
        assert_eq!(controller.ui().viewport.pan, Vec2::new(-48.0, 48.0));
    }

    #[test]
    fn wheel_zooms_and_clamps() {
        let mut controller = InteractionController::default();
        let mut out = Vec::new();
        for _ in 0..40 {
            controller.handle(
                Input::Wheel {
                    position: Vec2::new(200.0, 100.0),
                    delta: -1.0,
                },
                &world(),
                &mut out,
            );
        }
        assert!((controller.ui().viewport.zoom - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn zoom_setter_uses_view_range() {
        let mut controller = InteractionController::default();
        controller.set_zoom(0.1);
        assert!((controller.ui().viewport.zoom - 0.3).abs() < f32::EPSILON);
        controller.zoom_at_point(Vec2::ZERO, 0.1);
        assert!((controller.ui().viewport.zoom - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn observe_forgets_removed_items() {
        let mut controller = InteractionController::default();
        controller.select_node(Some(NodeId::new(2)));
        controller.ui.connector_source = Some(NodeId::new(2));
        controller.select_region(Some(RegionId::new(5)));
        controller.edit_region(Some(RegionId::new(5)));

        controller.observe(&[
            Event::NodeRemoved {
                node: NodeId::new(2),
                connectors: Vec::new(),
            },
            Event::RegionRemoved {
                region: RegionId::new(5),
            },
        ]);

        assert_eq!(controller.ui(), &UiState::default());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut controller = InteractionController::default();
        controller.set_zoom(2.0);
        controller.set_pan(Vec2::new(10.0, 20.0));
        controller.set_hovered_tile(Some(TileCoord::new(1, 1)));
        controller.reset();
        assert_eq!(controller.ui(), &UiState::default());
    }
}
