//! Stepper Phase 4 — reactions (§4.C, P6 exclusivity).

use crate::domain::content::ContentRegistry;
use crate::domain::elements::{Reaction, EL_EMPTY};
use crate::grid::{Grid, CHUNK_SIZE};
use crate::rng::{cell_seed, palette_seed, unit_f32, xorshift32};

pub fn run(grid: &mut Grid, content: &ContentRegistry, tick: u64) {
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
                    react_cell(grid, content, x, y, tick);
                }
            }
        }
    }
}

fn react_cell(grid: &mut Grid, content: &ContentRegistry, x: u32, y: u32, tick: u64) {
    if grid.is_updated(x, y) {
        return;
    }
    let id = grid.get_type(x as i32, y as i32);
    if id == EL_EMPTY {
        return;
    }

    for (dir, (nx, ny)) in Grid::neighbors4(x as i32, y as i32).into_iter().enumerate() {
        let Some(ni) = grid.index_i(nx, ny) else { continue };
        let nid = grid.types[ni];

        let Some(reaction) = content.reaction(id, nid).copied() else { continue };

        let mut state = cell_seed(x, y, tick) ^ (dir as u32).wrapping_mul(0x2545_F491);
        let roll = unit_f32(xorshift32(&mut state));
        if roll >= (reaction.chance as f32) / 255.0 {
            continue;
        }

        apply_reaction(grid, content, x, y, nx as u32, ny as u32, id, &reaction, tick);
        return;
    }
}

fn apply_reaction(
    grid: &mut Grid,
    content: &ContentRegistry,
    x: u32,
    y: u32,
    nx: u32,
    ny: u32,
    _aggressor_id: crate::domain::elements::ElementId,
    reaction: &Reaction,
    tick: u64,
) {
    let temp_self = grid.get_temp(x as i32, y as i32);
    let temp_n = grid.get_temp(nx as i32, ny as i32);

    let seed = palette_seed(x, y, tick);
    grid.set_cell(content, x as i32, y as i32, reaction.source_becomes, temp_self, seed);

    let seed_n = palette_seed(nx, ny, tick);
    grid.set_cell(content, nx as i32, ny as i32, reaction.target_becomes, temp_n, seed_n);

    grid.set_updated(x, y, true);
    grid.set_updated(nx, ny, true);

    if reaction.spawn != EL_EMPTY {
        spawn_byproduct(grid, content, x, y, nx, ny, reaction.spawn, tick);
    }
}

/// Places `spawn_id` in a randomly chosen EMPTY neighbor of the reacting pair.
fn spawn_byproduct(
    grid: &mut Grid,
    content: &ContentRegistry,
    x: u32,
    y: u32,
    nx: u32,
    ny: u32,
    spawn_id: crate::domain::elements::ElementId,
    tick: u64,
) {
    let mut candidates: Vec<(i32, i32)> = Vec::with_capacity(16);
    for (cx, cy) in Grid::neighbors8(x as i32, y as i32).into_iter().chain(Grid::neighbors8(nx as i32, ny as i32)) {
        if let Some(ci) = grid.index_i(cx, cy) {
            if grid.types[ci] == EL_EMPTY {
                candidates.push((cx, cy));
            }
        }
    }
    if candidates.is_empty() {
        return;
    }

    let mut state = cell_seed(x, y, tick) ^ cell_seed(nx, ny, tick).rotate_left(7);
    let pick = (xorshift32(&mut state) as usize) % candidates.len();
    let (sx, sy) = candidates[pick];
    let seed = palette_seed(sx as u32, sy as u32, tick);
    let default_temp = content.props(spawn_id).map(|p| p.default_temp).unwrap_or(20.0);
    grid.set_cell(content, sx, sy, spawn_id, default_temp, seed);
    grid.set_updated(sx as u32, sy as u32, true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggressor_with_certain_chance_converts_victim() {
        let json = r#"{"elements":[
            {"id":0,"key":"base:empty","category":"utility","color":0,"density":null,"dispersion":0,"lifetime":0,"defaultTemp":20,"heatConductivity":5,"bounce":0,"friction":0,"flags":{}},
            {"id":1,"key":"base:acid","category":"liquid","color":4287619072,"density":1200,"dispersion":3,"lifetime":0,"defaultTemp":20,"heatConductivity":20,"bounce":0,"friction":0,"flags":{"corrosive":true}},
            {"id":2,"key":"base:stone","category":"solid","color":4286611584,"density":2700,"dispersion":0,"lifetime":0,"defaultTemp":20,"heatConductivity":20,"bounce":0,"friction":0.9,"flags":{}}
        ],"elementKeyToId":{},"reactions":[
            {"aggressorId":1,"victimId":2,"chance":1.0,"resultAggressorId":null,"resultVictimId":0,"spawnId":null}
        ]}"#;
        let content = ContentRegistry::from_bundle_json(json).unwrap();
        let mut grid = Grid::new(4, 4);
        grid.set_cell(&content, 0, 0, 1, 20.0, 0);
        grid.set_cell(&content, 1, 0, 2, 20.0, 0);
        run(&mut grid, &content, 0);
        assert_eq!(grid.get_type(1, 0), 0);
        assert_eq!(grid.get_type(0, 0), 0, "null resultAggressorId deletes the aggressor");
    }

    #[test]
    fn zero_chance_reaction_never_fires() {
        let json = r#"{"elements":[
            {"id":0,"key":"base:empty","category":"utility","color":0,"density":null,"dispersion":0,"lifetime":0,"defaultTemp":20,"heatConductivity":5,"bounce":0,"friction":0,"flags":{}},
            {"id":1,"key":"base:acid","category":"liquid","color":4287619072,"density":1200,"dispersion":3,"lifetime":0,"defaultTemp":20,"heatConductivity":20,"bounce":0,"friction":0,"flags":{"corrosive":true}},
            {"id":2,"key":"base:stone","category":"solid","color":4286611584,"density":2700,"dispersion":0,"lifetime":0,"defaultTemp":20,"heatConductivity":20,"bounce":0,"friction":0.9,"flags":{}}
        ],"elementKeyToId":{},"reactions":[
            {"aggressorId":1,"victimId":2,"chance":0.0,"resultAggressorId":null,"resultVictimId":0,"spawnId":null}
        ]}"#;
        let content = ContentRegistry::from_bundle_json(json).unwrap();
        let mut grid = Grid::new(4, 4);
        grid.set_cell(&content, 0, 0, 1, 20.0, 0);
        grid.set_cell(&content, 1, 0, 2, 20.0, 0);
        run(&mut grid, &content, 0);
        assert_eq!(grid.get_type(1, 0), 2);
    }
}
