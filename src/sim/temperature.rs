//! Stepper Phase 2 (heat diffusion) and Phase 3 (phase change), §4.C.

use crate::domain::content::ContentRegistry;
use crate::domain::elements::EL_EMPTY;
use crate::grid::{Grid, CHUNK_SIZE};
use crate::rng::palette_seed;

/// Conductivity air exchanges with when acting as an empty/boundary neighbor.
const AIR_CONDUCTIVITY: u8 = 5;
const AIR_LERP_SPEED: f32 = 0.02;

fn conductivity(content: &ContentRegistry, id: crate::domain::elements::ElementId) -> u8 {
    if id == EL_EMPTY {
        AIR_CONDUCTIVITY
    } else {
        content.props(id).map(|p| p.heat_conductivity).unwrap_or(AIR_CONDUCTIVITY)
    }
}

/// Phase 2: conductivity-weighted blend of each cell with its 4-neighbors,
/// written through a double buffer so the result doesn't depend on scan
/// order. Sleeping chunks skip per-pixel work and instead lerp one scalar
/// toward ambient (lazy hydration, §11); every 4th frame an active chunk's
/// `virtual_temp` is resynced from its real air average so a chunk that goes
/// back to sleep resumes from the right baseline.
pub fn run_heat(grid: &mut Grid, content: &ContentRegistry, ambient: f32, tick: u64) {
    let chunks_x = grid.chunks.chunks_x();
    let chunks_y = grid.chunks.chunks_y();

    let mut next = grid.temperature.clone();

    for cy in 0..chunks_y {
        for cx in 0..chunks_x {
            if grid.chunks.is_sleeping(cx, cy) {
                grid.chunks.update_virtual_temp(cx, cy, ambient, AIR_LERP_SPEED);
                continue;
            }

            let start_x = cx * CHUNK_SIZE;
            let start_y = cy * CHUNK_SIZE;
            let end_x = (start_x + CHUNK_SIZE).min(grid.width());
            let end_y = (start_y + CHUNK_SIZE).min(grid.height());

            for y in start_y..end_y {
                for x in start_x..end_x {
                    diffuse_cell(grid, content, &mut next, x, y, ambient);
                }
            }

            if tick % 4 == 0 {
                let avg = grid.average_air_temp(cx, cy);
                grid.chunks.set_virtual_temp(cx, cy, avg);
            }
        }
    }

    grid.temperature = next;
}

fn diffuse_cell(grid: &Grid, content: &ContentRegistry, next: &mut [f32], x: u32, y: u32, ambient: f32) {
    let i = grid.index(x, y);
    let id = grid.types[i];
    let cond_self = conductivity(content, id);
    if cond_self == 0 {
        return;
    }

    let my_temp = grid.temperature[i];
    let mut total_delta = 0.0f32;

    for (nx, ny) in Grid::neighbors4(x as i32, y as i32) {
        let (neighbor_temp, cond_n) = if grid.in_bounds(nx, ny) {
            let ni = grid.index(nx as u32, ny as u32);
            (grid.temperature[ni], conductivity(content, grid.types[ni]))
        } else {
            (ambient, AIR_CONDUCTIVITY)
        };
        let rate = (cond_self.min(cond_n) as f32 / 100.0) * 0.5;
        total_delta += (neighbor_temp - my_temp) * rate;
    }

    next[i] = (my_temp + total_delta / 4.0).clamp(-273.0, 5000.0);
}

/// Phase 3: replace `type` with the phase-changed element at the same
/// temperature, refreshing color from the new element's palette.
pub fn run_phase_change(grid: &mut Grid, content: &ContentRegistry, tick: u64) {
    let chunks_x = grid.chunks.chunks_x();
    let chunks_y = grid.chunks.chunks_y();

    for cy in 0..chunks_y {
        for cx in 0..chunks_x {
            if !grid.chunks.should_process(cx, cy) {
                continue;
            }
            let start_x = cx * CHUNK_SIZE;
            let start_y = cy * CHUNK_SIZE;
            let end_x = (start_x + CHUNK_SIZE).min(grid.width());
            let end_y = (start_y + CHUNK_SIZE).min(grid.height());

            for y in start_y..end_y {
                for x in start_x..end_x {
                    let i = grid.index(x, y);
                    let id = grid.types[i];
                    if id == EL_EMPTY {
                        continue;
                    }
                    let temp = grid.temperature[i];
                    if let Some(new_id) = content.check_phase_change(id, temp) {
                        let seed = palette_seed(x, y, tick);
                        grid.set_cell(content, x as i32, y as i32, new_id, temp, seed);
                        grid.set_updated(x, y, true);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::elements::{EL_ICE, EL_WATER};

    #[test]
    fn ice_melts_above_zero() {
        let content = ContentRegistry::default_bundle();
        assert_eq!(content.check_phase_change(EL_ICE, 5.0), Some(EL_WATER));
        assert_eq!(content.check_phase_change(EL_ICE, -5.0), None);
    }

    #[test]
    fn heat_diffuses_toward_ambient_for_isolated_hot_cell() {
        let content = ContentRegistry::default_bundle();
        let mut grid = Grid::new(8, 8);
        grid.set_cell(&content, 4, 4, EL_WATER, 90.0, 0);
        for t in 0..50 {
            run_heat(&mut grid, &content, 20.0, t);
        }
        let i = grid.index(4, 4);
        assert!(grid.temperature[i] < 90.0);
    }
}
