//! Stepper Phase 1 — movement (§4.C).

use crate::domain::content::ContentRegistry;
use crate::domain::elements::{Category, ElementId, EL_EMPTY};
use crate::grid::{Grid, CHUNK_SIZE};

pub fn run(grid: &mut Grid, content: &ContentRegistry, gravity: (f32, f32), tick: u64) {
    let p = (tick & 1) as u8;
    let gy: i32 = if gravity.1 >= 0.0 { 1 } else { -1 };

    let chunks_y = grid.chunks.chunks_y();
    let chunks_x = grid.chunks.chunks_x();

    let cy_range: Box<dyn Iterator<Item = u32>> = if gy > 0 {
        Box::new((0..chunks_y).rev())
    } else {
        Box::new(0..chunks_y)
    };

    for cy in cy_range {
        for cx in 0..chunks_x {
            if !grid.chunks.should_process(cx, cy) {
                continue;
            }

            let start_x = cx * CHUNK_SIZE;
            let start_y = cy * CHUNK_SIZE;
            let end_x = (start_x + CHUNK_SIZE).min(grid.width());
            let end_y = (start_y + CHUNK_SIZE).min(grid.height());

            let row_range: Box<dyn Iterator<Item = u32>> = if gy > 0 {
                Box::new((start_y..end_y).rev())
            } else {
                Box::new(start_y..end_y)
            };

            for y in row_range {
                let row_ltr = (y + p as u32) & 1 == 0;
                let col_range: Vec<u32> = if row_ltr {
                    (start_x..end_x).collect()
                } else {
                    (start_x..end_x).rev().collect()
                };

                for x in col_range {
                    step_cell(grid, content, x, y, gy, p);
                }
            }
        }
    }
}

fn step_cell(grid: &mut Grid, content: &ContentRegistry, x: u32, y: u32, gy: i32, p: u8) {
    if grid.is_updated(x, y) {
        return;
    }
    let id = grid.get_type(x as i32, y as i32);
    if id == EL_EMPTY {
        return;
    }
    let Some(props) = content.props(id).copied() else { return };
    use crate::domain::elements::FLAG_IGNORE_GRAVITY;
    if props.has_flag(FLAG_IGNORE_GRAVITY) {
        return;
    }

    match props.category {
        Category::Powder => move_powder(grid, content, x, y, id, props.density, gy, p),
        Category::Liquid => move_liquid(grid, content, x, y, id, props.density, props.dispersion, gy, p),
        Category::Gas => move_gas(grid, content, x, y, id, props.density, props.dispersion, gy, p),
        _ => {}
    }
}

fn can_enter(content: &ContentRegistry, mover_density: f32, target: ElementId) -> bool {
    if target == EL_EMPTY {
        return true;
    }
    match content.props(target) {
        Some(p) => matches!(p.category, Category::Powder | Category::Liquid | Category::Gas) && p.density < mover_density,
        None => false,
    }
}

fn try_swap(grid: &mut Grid, content: &ContentRegistry, x: u32, y: u32, nx: i32, ny: i32, mover_density: f32) -> bool {
    let Some(ni) = grid.index_i(nx, ny) else { return false };
    let target = grid.types[ni];
    if !can_enter(content, mover_density, target) {
        return false;
    }
    grid.swap(x, y, nx as u32, ny as u32);
    true
}

fn move_powder(grid: &mut Grid, content: &ContentRegistry, x: u32, y: u32, _id: ElementId, density: f32, gy: i32, p: u8) {
    let xi = x as i32;
    let yi = y as i32;

    if try_swap(grid, content, x, y, xi, yi + gy, density) {
        return;
    }

    let (first, second) = if p == 0 { (-1, 1) } else { (1, -1) };
    if try_swap(grid, content, x, y, xi + first, yi + gy, density) {
        return;
    }
    try_swap(grid, content, x, y, xi + second, yi + gy, density);
}

fn move_liquid(
    grid: &mut Grid,
    content: &ContentRegistry,
    x: u32,
    y: u32,
    _id: ElementId,
    density: f32,
    dispersion: u8,
    gy: i32,
    p: u8,
) {
    let xi = x as i32;
    let yi = y as i32;

    if try_swap(grid, content, x, y, xi, yi + gy, density) {
        return;
    }

    let (first, second) = if p == 0 { (-1, 1) } else { (1, -1) };
    if try_swap(grid, content, x, y, xi + first, yi + gy, density) {
        return;
    }
    if try_swap(grid, content, x, y, xi + second, yi + gy, density) {
        return;
    }

    lateral_flow(grid, content, x, y, density, dispersion, 0, p);
}

fn move_gas(
    grid: &mut Grid,
    content: &ContentRegistry,
    x: u32,
    y: u32,
    _id: ElementId,
    density: f32,
    dispersion: u8,
    gy: i32,
    p: u8,
) {
    let xi = x as i32;
    let yi = y as i32;
    let up = -gy;

    if try_swap(grid, content, x, y, xi, yi + up, density) {
        return;
    }

    let (first, second) = if p == 0 { (-1, 1) } else { (1, -1) };
    if try_swap(grid, content, x, y, xi + first, yi + up, density) {
        return;
    }
    if try_swap(grid, content, x, y, xi + second, yi + up, density) {
        return;
    }

    lateral_flow(grid, content, x, y, density, dispersion, 0, p);
}

/// Scans outward along the row up to `dispersion` cells, stopping at the
/// first obstruction, and jumps to the farthest reachable empty cell; ties
/// between left/right broken by parity.
fn lateral_flow(grid: &mut Grid, content: &ContentRegistry, x: u32, y: u32, density: f32, dispersion: u8, _reserved: i32, p: u8) {
    if dispersion == 0 {
        return;
    }
    let yi = y as i32;
    let (first_dir, second_dir): (i32, i32) = if p == 0 { (1, -1) } else { (-1, 1) };

    if scan_direction(grid, content, x, y, yi, density, dispersion, first_dir) {
        return;
    }
    scan_direction(grid, content, x, y, yi, density, dispersion, second_dir);
}

fn scan_direction(
    grid: &mut Grid,
    content: &ContentRegistry,
    x: u32,
    y: u32,
    yi: i32,
    density: f32,
    dispersion: u8,
    dir: i32,
) -> bool {
    let mut farthest: Option<i32> = None;
    for step in 1..=dispersion as i32 {
        let nx = x as i32 + dir * step;
        match grid.index_i(nx, yi) {
            Some(ni) if grid.types[ni] == EL_EMPTY => farthest = Some(nx),
            _ => break,
        }
    }
    match farthest {
        Some(nx) => try_swap(grid, content, x, y, nx, yi, density),
        None => false,
    }
}
