//! Edit surface (§4.D): host-driven mutations, all funneled through
//! `Grid::set_cell`/`set_empty` so §3 invariants hold automatically.

use crate::domain::content::ContentRegistry;
use crate::domain::elements::{ElementId, EL_EMPTY};
use crate::error::EngineError;
use crate::grid::Grid;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub const FLOOD_FILL_CAP: usize = 200_000;

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushShape {
    Circle,
    Square,
    Line,
}

fn in_shape(dx: i32, dy: i32, radius: i32, shape: BrushShape) -> bool {
    match shape {
        BrushShape::Circle => dx * dx + dy * dy <= radius * radius,
        BrushShape::Square => dx.abs() <= radius && dy.abs() <= radius,
        BrushShape::Line => dy == 0 && dx.abs() <= radius,
    }
}

pub fn add_particle(grid: &mut Grid, content: &ContentRegistry, x: i32, y: i32, id: ElementId) -> bool {
    if !grid.in_bounds(x, y) {
        return false;
    }
    if grid.get_type(x, y) != EL_EMPTY {
        return false;
    }
    let temp = content.props(id).map(|p| p.default_temp).unwrap_or(20.0);
    let seed = crate::rng::palette_seed(x as u32, y as u32, 0);
    grid.set_cell(content, x, y, id, temp, seed);
    true
}

pub fn remove_particle(grid: &mut Grid, x: i32, y: i32) -> bool {
    if !grid.in_bounds(x, y) {
        return false;
    }
    if grid.get_type(x, y) == EL_EMPTY {
        return false;
    }
    grid.set_empty(x, y);
    true
}

pub fn add_particles_in_radius(
    grid: &mut Grid,
    content: &ContentRegistry,
    cx: i32,
    cy: i32,
    radius: i32,
    id: ElementId,
    shape: BrushShape,
) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if in_shape(dx, dy, radius, shape) {
                add_particle(grid, content, cx + dx, cy + dy, id);
            }
        }
    }
}

pub fn remove_particles_in_radius(grid: &mut Grid, cx: i32, cy: i32, radius: i32) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if in_shape(dx, dy, radius, BrushShape::Circle) {
                remove_particle(grid, cx + dx, cy + dy);
            }
        }
    }
}

/// `None` erases; `Some(id)` stamps that element (§4.D `id|erase`).
pub type StrokeBrush = Option<ElementId>;

fn stamp_point(grid: &mut Grid, content: &ContentRegistry, x: i32, y: i32, radius: i32, brush: StrokeBrush, shape: BrushShape) {
    match brush {
        Some(id) => add_particles_in_radius(grid, content, x, y, radius, id, shape),
        None => remove_particles_in_radius(grid, x, y, radius),
    }
}

fn bresenham_points(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<(i32, i32)> {
    let mut points = Vec::new();
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        points.push((x, y));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    points
}

/// Bridges consecutive ring events into a continuous stroke (§4.D, §4.E, P4).
/// `END_STROKE`/overflow clear `previous` so the next event starts fresh
/// instead of bridging a gap.
#[derive(Default)]
pub struct StrokeInterpolator {
    previous: Option<(i32, i32)>,
}

impl StrokeInterpolator {
    pub fn new() -> Self {
        Self { previous: None }
    }

    pub fn end_stroke(&mut self) {
        self.previous = None;
    }

    pub fn reset_on_overflow(&mut self) {
        self.previous = None;
    }

    /// Stamps every cell within `radius` of the Bresenham segment from the
    /// last observed point (if any) to `(x, y)`, then remembers `(x, y)`.
    pub fn extend_to(
        &mut self,
        grid: &mut Grid,
        content: &ContentRegistry,
        x: i32,
        y: i32,
        radius: i32,
        brush: StrokeBrush,
        shape: BrushShape,
    ) {
        match self.previous {
            Some((px, py)) => {
                for (sx, sy) in bresenham_points(px, py, x, y) {
                    stamp_point(grid, content, sx, sy, radius, brush, shape);
                }
            }
            None => stamp_point(grid, content, x, y, radius, brush, shape),
        }
        self.previous = Some((x, y));
    }
}

/// Reused visited-marker buffer for `flood_fill` so repeated fills don't
/// allocate (§4.D).
pub struct FloodFillScratch {
    visited: Vec<u32>,
    stamp: u32,
    width: u32,
    height: u32,
}

impl FloodFillScratch {
    pub fn new(width: u32, height: u32) -> Self {
        Self { visited: vec![0; (width * height) as usize], stamp: 1, width, height }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    fn next_stamp(&mut self) -> u32 {
        if self.width == 0 || self.height == 0 {
            return self.stamp;
        }
        self.stamp = self.stamp.wrapping_add(1);
        if self.stamp == 0 {
            self.visited.iter_mut().for_each(|v| *v = 0);
            self.stamp = 1;
        }
        self.stamp
    }
}

/// Floods the region 4-connected to `(x, y)` that shares its starting
/// element id, replacing it with `id`, capped at `FLOOD_FILL_CAP` cells.
pub fn flood_fill(
    grid: &mut Grid,
    content: &ContentRegistry,
    scratch: &mut FloodFillScratch,
    x: i32,
    y: i32,
    id: ElementId,
) -> usize {
    if !grid.in_bounds(x, y) {
        return 0;
    }
    if scratch.visited.len() != (grid.width() * grid.height()) as usize {
        scratch.resize(grid.width(), grid.height());
    }
    let target = grid.get_type(x, y);
    if target == id {
        return 0;
    }
    let stamp = scratch.next_stamp();

    let mut queue = std::collections::VecDeque::new();
    queue.push_back((x, y));
    let start_idx = grid.index(x as u32, y as u32);
    scratch.visited[start_idx] = stamp;

    let mut filled = 0usize;
    while let Some((cx, cy)) = queue.pop_front() {
        if filled >= FLOOD_FILL_CAP {
            break;
        }
        let seed = crate::rng::palette_seed(cx as u32, cy as u32, 0);
        let temp = grid.get_temp(cx, cy);
        grid.set_cell(content, cx, cy, id, temp, seed);
        filled += 1;

        for (nx, ny) in Grid::neighbors4(cx, cy) {
            let Some(ni) = grid.index_i(nx, ny) else { continue };
            if scratch.visited[ni] == stamp {
                continue;
            }
            if grid.types[ni] != target {
                continue;
            }
            scratch.visited[ni] = stamp;
            queue.push_back((nx, ny));
        }
    }
    filled
}

/// Places a rigid-looking stamp of `id` into the grid (§13 Open Question:
/// grid stamp only, no separate rigid-body dynamics).
pub fn spawn_rigid_stamp(
    grid: &mut Grid,
    content: &ContentRegistry,
    x: i32,
    y: i32,
    half_extent: i32,
    shape: BrushShape,
    id: ElementId,
) {
    add_particles_in_radius(grid, content, x, y, half_extent, id, shape);
}

pub fn save_snapshot(grid: &Grid) -> Vec<u8> {
    grid.save_snapshot()
}

pub fn load_snapshot(grid: &mut Grid, content: &ContentRegistry, bytes: &[u8]) -> Result<(), EngineError> {
    grid.load_snapshot(content, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::elements::EL_SAND;

    #[test]
    fn add_particle_refuses_occupied_cell() {
        let content = ContentRegistry::default_bundle();
        let mut grid = Grid::new(4, 4);
        assert!(add_particle(&mut grid, &content, 1, 1, EL_SAND));
        assert!(!add_particle(&mut grid, &content, 1, 1, EL_SAND));
    }

    #[test]
    fn circle_brush_is_euclidean_and_square_is_chebyshev() {
        let content = ContentRegistry::default_bundle();
        let mut circle = Grid::new(9, 9);
        add_particles_in_radius(&mut circle, &content, 4, 4, 2, EL_SAND, BrushShape::Circle);
        assert_eq!(circle.get_type(4, 2), EL_SAND); // straight up, distance 2
        assert_eq!(circle.get_type(2, 2), EL_EMPTY); // corner at distance sqrt(8) > 2

        let mut square = Grid::new(9, 9);
        add_particles_in_radius(&mut square, &content, 4, 4, 2, EL_SAND, BrushShape::Square);
        assert_eq!(square.get_type(2, 2), EL_SAND); // corner within Chebyshev radius 2
    }

    #[test]
    fn stroke_bridges_gap_between_two_points() {
        let content = ContentRegistry::default_bundle();
        let mut grid = Grid::new(20, 20);
        let mut stroke = StrokeInterpolator::new();
        stroke.extend_to(&mut grid, &content, 2, 2, 0, Some(EL_SAND), BrushShape::Circle);
        stroke.extend_to(&mut grid, &content, 10, 2, 0, Some(EL_SAND), BrushShape::Circle);
        for x in 2..=10 {
            assert_eq!(grid.get_type(x, 2), EL_SAND, "stroke should fill every cell between endpoints");
        }
    }

    #[test]
    fn end_stroke_prevents_bridging_the_next_segment() {
        let content = ContentRegistry::default_bundle();
        let mut grid = Grid::new(20, 20);
        let mut stroke = StrokeInterpolator::new();
        stroke.extend_to(&mut grid, &content, 2, 2, 0, Some(EL_SAND), BrushShape::Circle);
        stroke.end_stroke();
        stroke.extend_to(&mut grid, &content, 10, 2, 0, Some(EL_SAND), BrushShape::Circle);
        assert_eq!(grid.get_type(6, 2), EL_EMPTY, "no bridge should form across an ended stroke");
    }

    #[test]
    fn flood_fill_replaces_connected_region_and_respects_cap() {
        let content = ContentRegistry::default_bundle();
        let mut grid = Grid::new(10, 10);
        for x in 0..10u32 {
            for y in 0..10u32 {
                grid.set_cell(&content, x as i32, y as i32, EL_SAND, 20.0, 0);
            }
        }
        let mut scratch = FloodFillScratch::new(10, 10);
        let filled = flood_fill(&mut grid, &content, &mut scratch, 0, 0, EL_EMPTY);
        assert_eq!(filled, 100);
        assert_eq!(grid.get_type(9, 9), EL_EMPTY);
    }
}
