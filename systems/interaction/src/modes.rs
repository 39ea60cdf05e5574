//! Pointer handlers for each interaction mode.
//!
//! Every [`Mode`] maps to one [`ModeHandler`] record. The pan modifier
//! borrows the [`Mode::Pan`] record for the length of one gesture.

use glam::Vec2;
use isomap_core::{Command, NodeId, Rgba, TileCoord, TileRect};
use isomap_projection::IsoProjection;
use isomap_world::{query, World};

use crate::{Gesture, Mode, UiState};

/// Caption given to sections drawn by hand.
pub(crate) const NEW_SECTION_LABEL: &str = "New Section";
const SECTION_FILL: Rgba = Rgba::from_rgba(0x94, 0xa3, 0xb8, 0x33);
const SECTION_STROKE: Rgba = Rgba::from_rgb(0x64, 0x74, 0x8b);

/// Everything a pointer handler may read or write.
pub(crate) struct Context<'a> {
    pub(crate) ui: &'a mut UiState,
    pub(crate) world: &'a World,
    pub(crate) projection: &'a IsoProjection,
    pub(crate) out: &'a mut Vec<Command>,
}

impl Context<'_> {
    fn tile_under(&self, position: Vec2) -> Option<TileCoord> {
        self.projection
            .snap_within(position, self.ui.viewport, query::grid(self.world))
    }

    fn node_under(&self, position: Vec2) -> Option<NodeId> {
        query::hit_test(self.world, position, self.ui.viewport, self.projection)
    }
}

type PointerFn = fn(&mut Context<'_>, Vec2);

/// Uniform pointer interface implemented by every mode.
#[derive(Clone, Copy)]
pub(crate) struct ModeHandler {
    pub(crate) on_down: PointerFn,
    pub(crate) on_move: PointerFn,
    pub(crate) on_up: PointerFn,
}

const CURSOR: ModeHandler = ModeHandler {
    on_down: cursor_down,
    on_move: drag_move,
    on_up: drag_up,
};

const PAN: ModeHandler = ModeHandler {
    on_down: pan_down,
    on_move: pan_move,
    on_up: pan_up,
};

const PLACE_NODE: ModeHandler = ModeHandler {
    on_down: place_down,
    on_move: ignore,
    on_up: ignore,
};

const CONNECTOR: ModeHandler = ModeHandler {
    on_down: connector_down,
    on_move: ignore,
    on_up: ignore,
};

const DRAG_ITEMS: ModeHandler = ModeHandler {
    on_down: drag_items_down,
    on_move: drag_move,
    on_up: drag_up,
};

const CREATE_SECTION: ModeHandler = ModeHandler {
    on_down: section_down,
    on_move: section_move,
    on_up: section_up,
};

/// Looks up the handler record of `mode`.
pub(crate) const fn handler(mode: Mode) -> ModeHandler {
    match mode {
        Mode::Cursor => CURSOR,
        Mode::Pan => PAN,
        Mode::PlaceNode => PLACE_NODE,
        Mode::Connector => CONNECTOR,
        Mode::DragItems => DRAG_ITEMS,
        Mode::CreateSection => CREATE_SECTION,
    }
}

fn ignore(_: &mut Context<'_>, _: Vec2) {}

fn pan_down(ctx: &mut Context<'_>, position: Vec2) {
    ctx.ui.gesture = Some(Gesture::Pan {
        anchor: position,
        start_pan: ctx.ui.viewport.pan,
    });
}

fn pan_move(ctx: &mut Context<'_>, position: Vec2) {
    if let Some(Gesture::Pan { anchor, start_pan }) = ctx.ui.gesture {
        ctx.ui.viewport.pan = start_pan + (position - anchor);
    }
}

fn pan_up(ctx: &mut Context<'_>, _: Vec2) {
    if matches!(ctx.ui.gesture, Some(Gesture::Pan { .. })) {
        ctx.ui.gesture = None;
    }
}

fn begin_node_drag(ctx: &mut Context<'_>, node: NodeId, position: Vec2) {
    let Some(tile) = query::node(ctx.world, node).map(|node| node.tile) else {
        return;
    };
    ctx.ui.selected_node = Some(node);
    ctx.ui.gesture = Some(Gesture::DragNode {
        node,
        origin: tile,
        anchor: position,
        preview: tile,
    });
}

fn cursor_down(ctx: &mut Context<'_>, position: Vec2) {
    match ctx.node_under(position) {
        Some(node) => begin_node_drag(ctx, node, position),
        None => {
            ctx.ui.selected_node = None;
            ctx.ui.selected_region = None;
        }
    }
}

fn drag_items_down(ctx: &mut Context<'_>, position: Vec2) {
    if let Some(node) = ctx.node_under(position) {
        begin_node_drag(ctx, node, position);
        return;
    }

    let Some(tile) = ctx.tile_under(position) else {
        ctx.ui.selected_region = None;
        return;
    };
    ctx.ui.selected_region = query::region_at(ctx.world, tile);
    if let Some(region) = ctx.ui.selected_region {
        ctx.ui.gesture = Some(Gesture::DragRegion {
            region,
            origin: tile,
            preview: tile,
        });
    }
}

fn drag_move(ctx: &mut Context<'_>, position: Vec2) {
    let target = ctx.tile_under(position);
    match ctx.ui.gesture.as_mut() {
        Some(Gesture::DragNode { node, preview, .. }) => {
            let Some(tile) = target else {
                return;
            };
            let own_tile = query::node(ctx.world, *node).map(|node| node.tile) == Some(tile);
            if own_tile || query::is_tile_free(ctx.world, tile) {
                *preview = tile;
            }
        }
        Some(Gesture::DragRegion { preview, .. }) => {
            if let Some(tile) = target {
                *preview = tile;
            }
        }
        Some(Gesture::Pan { .. }) | None => {}
    }
}

fn drag_up(ctx: &mut Context<'_>, _: Vec2) {
    match ctx.ui.gesture.take() {
        Some(Gesture::DragNode {
            node,
            origin,
            preview,
            ..
        }) if preview != origin => {
            ctx.out.push(Command::MoveNode {
                node,
                tile: preview,
            });
        }
        Some(Gesture::DragRegion {
            region,
            origin,
            preview,
        }) => {
            let (dx, dy) = tile_delta(origin, preview);
            if dx != 0 || dy != 0 {
                ctx.out.push(Command::MoveRegion { region, dx, dy });
            }
        }
        _ => {}
    }
}

fn place_down(ctx: &mut Context<'_>, position: Vec2) {
    let Some(category) = ctx.ui.placing_category else {
        return;
    };
    let Some(tile) = ctx.tile_under(position) else {
        return;
    };
    if query::is_tile_free(ctx.world, tile) {
        ctx.out.push(Command::AddNode {
            category,
            tile,
            label: None,
        });
    }
}

fn connector_down(ctx: &mut Context<'_>, position: Vec2) {
    match (ctx.ui.connector_source, ctx.node_under(position)) {
        (None, Some(node)) => ctx.ui.connector_source = Some(node),
        (Some(source), Some(target)) if source != target => {
            ctx.out.push(Command::AddConnector { source, target });
            ctx.ui.connector_source = None;
        }
        (Some(_), Some(_)) => {}
        (_, None) => ctx.ui.connector_source = None,
    }
}

fn section_down(ctx: &mut Context<'_>, position: Vec2) {
    let tile = ctx.tile_under(position);
    ctx.ui.section_anchor = tile;
    ctx.ui.section_corner = tile;
}

fn section_move(ctx: &mut Context<'_>, position: Vec2) {
    if ctx.ui.section_anchor.is_none() {
        return;
    }
    if let Some(tile) = ctx.tile_under(position) {
        ctx.ui.section_corner = Some(tile);
    }
}

fn section_up(ctx: &mut Context<'_>, _: Vec2) {
    let (Some(anchor), Some(corner)) = (ctx.ui.section_anchor.take(), ctx.ui.section_corner.take())
    else {
        return;
    };
    ctx.out.push(Command::AddRegion {
        label: NEW_SECTION_LABEL.to_owned(),
        bounds: TileRect::new(anchor, corner),
        fill: SECTION_FILL,
        stroke: SECTION_STROKE,
        user_created: true,
    });
}

/// Signed tile delta between two tiles.
pub(crate) fn tile_delta(from: TileCoord, to: TileCoord) -> (i32, i32) {
    let axis = |from: u32, to: u32| i32::try_from(i64::from(to) - i64::from(from)).unwrap_or(0);
    (axis(from.x(), to.x()), axis(from.y(), to.y()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pan_record_drags_the_viewport_from_its_baseline() {
        let world = World::new();
        let projection = IsoProjection::default();
        let mut ui = UiState::default();
        ui.viewport.pan = Vec2::new(10.0, 10.0);
        let mut out = Vec::new();
        let pan = handler(Mode::Pan);
        let mut ctx = Context {
            ui: &mut ui,
            world: &world,
            projection: &projection,
            out: &mut out,
        };

        (pan.on_down)(&mut ctx, Vec2::new(100.0, 100.0));
        (pan.on_move)(&mut ctx, Vec2::new(130.0, 90.0));
        assert_eq!(ctx.ui.viewport.pan, Vec2::new(40.0, 0.0));

        (pan.on_up)(&mut ctx, Vec2::new(130.0, 90.0));
        assert_eq!(ctx.ui.gesture, None);
        assert!(ctx.out.is_empty());
    }

    #[test]
    fn tile_delta_is_signed() {
        assert_eq!(tile_delta(TileCoord::new(5, 2), TileCoord::new(3, 6)), (-2, 4));
        assert_eq!(tile_delta(TileCoord::new(1, 1), TileCoord::new(1, 1)), (0, 0));
    }
}
