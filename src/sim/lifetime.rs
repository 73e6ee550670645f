//! Stepper Phase 5 — lifetime decay and hot/cold ambient bias (§4.C).

use crate::domain::content::ContentRegistry;
use crate::domain::elements::{FLAG_COLD, FLAG_HOT, EL_EMPTY};
use crate::grid::{Grid, CHUNK_SIZE};

const HOT_COLD_BIAS_RATE: f32 = 0.1;

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
                    step_cell(grid, content, x, y, tick);
                }
            }
        }
    }
}

fn step_cell(grid: &mut Grid, content: &ContentRegistry, x: u32, y: u32, tick: u64) {
    let i = grid.index(x, y);
    let id = grid.types[i];
    if id == EL_EMPTY {
        return;
    }
    let Some(props) = content.props(id).copied() else { return };

    if props.lifetime > 0 {
        let life = &mut grid.life[i];
        if *life > 0 {
            *life -= 1;
        }
        if *life == 0 {
            let seed = crate::rng::palette_seed(x, y, tick);
            grid.set_cell(content, x as i32, y as i32, EL_EMPTY, props.default_temp, seed);
            return;
        }
    }

    if props.has_flag(FLAG_HOT) || props.has_flag(FLAG_COLD) {
        let temp = grid.temperature[i];
        let bias = (props.default_temp - temp) * HOT_COLD_BIAS_RATE;
        grid.set_temp(x, y, temp + bias);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifetime_one_decays_to_empty_next_tick() {
        let json = r#"{"elements":[
            {"id":0,"key":"base:empty","category":"utility","color":0,"density":null,"dispersion":0,"lifetime":0,"defaultTemp":20,"heatConductivity":5,"bounce":0,"friction":0,"flags":{}},
            {"id":1,"key":"base:spark","category":"energy","color":4294967040,"density":null,"dispersion":0,"lifetime":1,"defaultTemp":500,"heatConductivity":50,"bounce":0,"friction":0,"flags":{}}
        ],"elementKeyToId":{},"reactions":[]}"#;
        let content = ContentRegistry::from_bundle_json(json).unwrap();
        let mut grid = Grid::new(4, 4);
        grid.set_cell(&content, 1, 1, 1, 500.0, 0);
        run(&mut grid, &content, 0);
        assert_eq!(grid.get_type(1, 1), 0);
    }

    #[test]
    fn hot_element_biases_toward_default_temp() {
        let json = r#"{"elements":[
            {"id":0,"key":"base:empty","category":"utility","color":0,"density":null,"dispersion":0,"lifetime":0,"defaultTemp":20,"heatConductivity":5,"bounce":0,"friction":0,"flags":{}},
            {"id":1,"key":"base:lava","category":"liquid","color":4278190335,"density":3100,"dispersion":1,"lifetime":0,"defaultTemp":1200,"heatConductivity":60,"bounce":0,"friction":0,"flags":{"hot":true}}
        ],"elementKeyToId":{},"reactions":[]}"#;
        let content = ContentRegistry::from_bundle_json(json).unwrap();
        let mut grid = Grid::new(4, 4);
        grid.set_cell(&content, 1, 1, 1, 20.0, 0);
        run(&mut grid, &content, 0);
        let i = grid.index(1, 1);
        assert!(grid.temperature[i] > 20.0);
    }
}
