#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid router that plans connector routes around occupied tiles.
//!
//! Routing is a plain A* search with eight-directional movement. Orthogonal
//! steps cost `1`, diagonal steps cost `sqrt(2)`, and the heuristic is the
//! Manhattan distance to the goal. Manhattan distance can overestimate the
//! true cost once diagonal moves are allowed, so routes are not guaranteed to
//! be the shortest possible; they are the routes this heuristic produces.
//!
//! The open list is scanned linearly for the lowest f-score. At the grid sizes
//! the engine uses (roughly 1,500 tiles) this is cheap; a binary heap would be
//! needed if grids grow by orders of magnitude.

use isomap_core::{GridSize, Node, NodeId, TileCoord};

const STRAIGHT_COST: f32 = 1.0;
const DIAGONAL_COST: f32 = std::f32::consts::SQRT_2;

const DIRECTIONS: [(i32, i32, f32); 8] = [
    (0, -1, STRAIGHT_COST),
    (1, 0, STRAIGHT_COST),
    (0, 1, STRAIGHT_COST),
    (-1, 0, STRAIGHT_COST),
    (1, -1, DIAGONAL_COST),
    (1, 1, DIAGONAL_COST),
    (-1, 1, DIAGONAL_COST),
    (-1, -1, DIAGONAL_COST),
];

/// Dense set of impassable tiles sized to a grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Obstacles {
    grid: GridSize,
    blocked: Vec<bool>,
}

impl Obstacles {
    /// Creates an obstacle set with every tile passable.
    #[must_use]
    pub fn new(grid: GridSize) -> Self {
        Self {
            grid,
            blocked: vec![false; grid.tile_count()],
        }
    }

    /// Creates an obstacle set blocking each of the provided tiles.
    ///
    /// Tiles outside the grid are ignored.
    #[must_use]
    pub fn from_tiles<I>(grid: GridSize, tiles: I) -> Self
    where
        I: IntoIterator<Item = TileCoord>,
    {
        let mut obstacles = Self::new(grid);
        for tile in tiles {
            obstacles.block(tile);
        }
        obstacles
    }

    /// Blocks the tile of every node except the ones listed in `excluded`.
    #[must_use]
    pub fn from_nodes(grid: GridSize, nodes: &[Node], excluded: &[NodeId]) -> Self {
        Self::from_tiles(
            grid,
            nodes
                .iter()
                .filter(|node| !excluded.contains(&node.id))
                .map(|node| node.tile),
        )
    }

    /// Marks a tile as impassable.
    pub fn block(&mut self, tile: TileCoord) {
        if let Some(index) = self.grid.index(tile) {
            self.blocked[index] = true;
        }
    }

    /// Reports whether the tile is impassable. Tiles outside the grid always are.
    #[must_use]
    pub fn is_blocked(&self, tile: TileCoord) -> bool {
        self.grid
            .index(tile)
            .map_or(true, |index| self.blocked[index])
    }

    /// Dimensions of the grid the obstacle set covers.
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.grid
    }
}

#[derive(Clone, Copy, Debug)]
struct OpenEntry {
    tile: TileCoord,
    index: usize,
    f_score: f32,
}

/// Plans a tile-by-tile route from `start` to `end`.
///
/// `start` and `end` are always treated as passable, whatever the obstacle
/// set says. The returned route begins with `start` and ends with `end`; it is
/// empty when either endpoint lies outside the grid, when the open list runs
/// dry, or when the search exceeds `2 * width * height` iterations.
#[must_use]
pub fn find_path(obstacles: &Obstacles, start: TileCoord, end: TileCoord) -> Vec<TileCoord> {
    let grid = obstacles.grid();
    let (Some(start_index), Some(end_index)) = (grid.index(start), grid.index(end)) else {
        return Vec::new();
    };

    if start_index == end_index {
        return vec![start];
    }

    let tile_count = grid.tile_count();
    let mut g_scores = vec![f32::INFINITY; tile_count];
    let mut parents: Vec<Option<usize>> = vec![None; tile_count];
    let mut closed = vec![false; tile_count];
    let mut open = vec![OpenEntry {
        tile: start,
        index: start_index,
        f_score: heuristic(start, end),
    }];
    g_scores[start_index] = 0.0;

    let iteration_cap = tile_count.saturating_mul(2);
    let mut iterations = 0;

    while !open.is_empty() && iterations < iteration_cap {
        iterations += 1;

        let current = open.remove(lowest_f_score(&open));
        if current.index == end_index {
            return reconstruct(grid, &parents, start_index, end_index);
        }

        closed[current.index] = true;
        let current_g = g_scores[current.index];

        for (dx, dy, cost) in DIRECTIONS {
            let Some(neighbor) = current.tile.offset(dx, dy) else {
                continue;
            };
            let Some(neighbor_index) = grid.index(neighbor) else {
                continue;
            };
            if closed[neighbor_index] {
                continue;
            }
            if neighbor_index != end_index && obstacles.is_blocked(neighbor) {
                continue;
            }

            let tentative = current_g + cost;
            if tentative >= g_scores[neighbor_index] {
                continue;
            }

            g_scores[neighbor_index] = tentative;
            parents[neighbor_index] = Some(current.index);
            let f_score = tentative + heuristic(neighbor, end);

            match open.iter_mut().find(|entry| entry.index == neighbor_index) {
                Some(entry) => entry.f_score = f_score,
                None => open.push(OpenEntry {
                    tile: neighbor,
                    index: neighbor_index,
                    f_score,
                }),
            }
        }
    }

    Vec::new()
}

fn heuristic(from: TileCoord, to: TileCoord) -> f32 {
    from.manhattan_distance(to) as f32
}

fn lowest_f_score(open: &[OpenEntry]) -> usize {
    let mut best = 0;
    for (position, entry) in open.iter().enumerate().skip(1) {
        if entry.f_score < open[best].f_score {
            best = position;
        }
    }
    best
}

fn reconstruct(
    grid: GridSize,
    parents: &[Option<usize>],
    start_index: usize,
    end_index: usize,
) -> Vec<TileCoord> {
    let mut route = Vec::new();
    let mut cursor = Some(end_index);
    while let Some(index) = cursor {
        route.push(tile_at(grid, index));
        if index == start_index {
            break;
        }
        cursor = parents[index];
    }
    route.reverse();
    route
}

fn tile_at(grid: GridSize, index: usize) -> TileCoord {
    let width = usize::try_from(grid.width()).unwrap_or(1).max(1);
    let x = u32::try_from(index % width).unwrap_or(u32::MAX);
    let y = u32::try_from(index / width).unwrap_or(u32::MAX);
    TileCoord::new(x, y)
}
