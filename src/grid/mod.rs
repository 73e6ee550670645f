//! Grid & chunk map (§4.B): owns cell arrays, chunk dirty bits and sleep
//! state, exposes raw views to the renderer via `crate::view_guard`.

pub mod chunks;

use crate::domain::content::ContentRegistry;
use crate::domain::elements::{ElementId, EL_EMPTY};

pub use chunks::{ChunkMap, CHUNK_SIZE};

/// Background color shown for empty cells (ABGR, matches the teacher's
/// `BG_COLOR` — RGB(10,10,10) at full alpha).
pub const BG_COLOR: u32 = 0xFF0A0A0A;

/// Structure-of-Arrays cell storage (§3.1).
pub struct Grid {
    width: u32,
    height: u32,
    size: usize,

    pub types: Vec<ElementId>,
    pub colors: Vec<u32>,
    pub temperature: Vec<f32>,
    /// Remaining lifetime ticks, out-of-band per §4.C Phase 5 (0 = infinite).
    pub life: Vec<u16>,
    /// Per-tick "visited" flag, swept to zero in stepper Phase 0.
    pub updated: Vec<u8>,

    pub chunks: ChunkMap,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            size,
            types: vec![EL_EMPTY; size],
            colors: vec![BG_COLOR; size],
            temperature: vec![20.0; size],
            life: vec![0; size],
            updated: vec![0; size],
            chunks: ChunkMap::new(width, height),
        }
    }

    /// Invariant C3: resizing always allocates new arrays, never in place.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Grid::new(width, height);
    }

    pub fn clear(&mut self) {
        let size = self.size;
        self.types = vec![EL_EMPTY; size];
        self.colors = vec![BG_COLOR; size];
        self.temperature = vec![20.0; size];
        self.life = vec![0; size];
        self.updated = vec![0; size];
        self.chunks = ChunkMap::new(self.width, self.height);
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    #[inline]
    pub fn index_i(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(self.index(x as u32, y as u32))
        } else {
            None
        }
    }

    #[inline]
    pub fn get_type(&self, x: i32, y: i32) -> ElementId {
        match self.index_i(x, y) {
            Some(i) => self.types[i],
            None => EL_EMPTY,
        }
    }

    #[inline]
    pub fn get_temp(&self, x: i32, y: i32) -> f32 {
        match self.index_i(x, y) {
            Some(i) => self.temperature[i],
            None => 20.0,
        }
    }

    #[inline]
    pub fn set_temp(&mut self, x: u32, y: u32, temp: f32) {
        let i = self.index(x, y);
        self.temperature[i] = temp.clamp(-273.0, 5000.0);
    }

    #[inline]
    pub fn is_updated(&self, x: u32, y: u32) -> bool {
        self.updated[self.index(x, y)] != 0
    }

    #[inline]
    pub fn set_updated(&mut self, x: u32, y: u32, v: bool) {
        let i = self.index(x, y);
        self.updated[i] = v as u8;
    }

    pub fn reset_updated(&mut self) {
        self.updated.iter_mut().for_each(|u| *u = 0);
    }

    /// §4.B `setCell`: no-op outside bounds; otherwise writes type/color/temp,
    /// refreshes the palette color and marks the covering chunk dirty.
    pub fn set_cell(
        &mut self,
        content: &ContentRegistry,
        x: i32,
        y: i32,
        id: ElementId,
        temp: f32,
        seed: u8,
    ) {
        let Some(i) = self.index_i(x, y) else { return };
        let color = content.color_with_variation(id, seed).unwrap_or(BG_COLOR);
        self.types[i] = id;
        self.colors[i] = if id == EL_EMPTY { BG_COLOR } else { color };
        self.temperature[i] = temp.clamp(-273.0, 5000.0);
        self.life[i] = content.props(id).map(|p| p.lifetime).unwrap_or(0);
        self.wake_chunk_at(x as u32, y as u32);
    }

    pub fn set_empty(&mut self, x: i32, y: i32) {
        let Some(i) = self.index_i(x, y) else { return };
        self.types[i] = EL_EMPTY;
        self.colors[i] = BG_COLOR;
        self.life[i] = 0;
        self.wake_chunk_at(x as u32, y as u32);
    }

    /// Swaps two cells' type/color/life/temperature and marks both chunks
    /// (and their neighbors, for boundary crossings) dirty.
    pub fn swap(&mut self, xa: u32, ya: u32, xb: u32, yb: u32) {
        let ia = self.index(xa, ya);
        let ib = self.index(xb, yb);
        self.types.swap(ia, ib);
        self.colors.swap(ia, ib);
        self.life.swap(ia, ib);
        self.temperature.swap(ia, ib);
        self.updated[ia] = 1;
        self.updated[ib] = 1;
        self.wake_chunk_at(xa, ya);
        self.wake_chunk_at(xb, yb);
    }

    /// Marks the chunk covering `(x, y)` and its edge-adjacent neighbors
    /// dirty, re-hydrating the per-pixel temperature of any chunk that was
    /// asleep and just woke (§11 lazy hydration) so Phase 2 heat diffusion
    /// doesn't resume from a stale array.
    fn wake_chunk_at(&mut self, x: u32, y: u32) {
        let (cx, cy) = self.chunks.chunk_coords(x, y);
        let woke_self = self.chunks.mark_dirty(x, y);
        let woken_neighbors = self.chunks.wake_neighbors(x, y);

        if woke_self {
            let virtual_temp = self.chunks.virtual_temp(cx, cy);
            self.hydrate_chunk(cx, cy, virtual_temp);
        }
        for (ncx, ncy) in woken_neighbors {
            let virtual_temp = self.chunks.virtual_temp(ncx, ncy);
            self.hydrate_chunk(ncx, ncy, virtual_temp);
        }
    }

    pub fn neighbors4(x: i32, y: i32) -> [(i32, i32); 4] {
        [(x, y - 1), (x, y + 1), (x - 1, y), (x + 1, y)]
    }

    pub fn neighbors8(x: i32, y: i32) -> [(i32, i32); 8] {
        [
            (x, y - 1),
            (x, y + 1),
            (x - 1, y),
            (x + 1, y),
            (x - 1, y - 1),
            (x + 1, y - 1),
            (x - 1, y + 1),
            (x + 1, y + 1),
        ]
    }

    /// Average temperature of EMPTY cells in a chunk — used to resync a
    /// sleeping chunk's `virtual_temp` (§11 lazy hydration).
    pub fn average_air_temp(&self, cx: u32, cy: u32) -> f32 {
        let start_x = cx * CHUNK_SIZE;
        let start_y = cy * CHUNK_SIZE;
        let end_x = (start_x + CHUNK_SIZE).min(self.width);
        let end_y = (start_y + CHUNK_SIZE).min(self.height);

        let mut sum = 0.0f32;
        let mut count = 0u32;
        for y in start_y..end_y {
            for x in start_x..end_x {
                let i = self.index(x, y);
                if self.types[i] == EL_EMPTY {
                    sum += self.temperature[i];
                    count += 1;
                }
            }
        }
        if count == 0 {
            20.0
        } else {
            sum / count as f32
        }
    }

    /// Fills every EMPTY cell of a chunk to `virtual_temp` — the "hydration"
    /// half of lazy hydration, run once when a chunk wakes up.
    pub fn hydrate_chunk(&mut self, cx: u32, cy: u32, virtual_temp: f32) {
        let start_x = cx * CHUNK_SIZE;
        let start_y = cy * CHUNK_SIZE;
        let end_x = (start_x + CHUNK_SIZE).min(self.width);
        let end_y = (start_y + CHUNK_SIZE).min(self.height);

        for y in start_y..end_y {
            for x in start_x..end_x {
                let i = self.index(x, y);
                if self.types[i] == EL_EMPTY {
                    self.temperature[i] = virtual_temp;
                }
            }
        }
    }

    pub fn types_view(&self) -> &[ElementId] {
        &self.types
    }

    pub fn colors_view(&self) -> &[u32] {
        &self.colors
    }

    pub fn temperature_view(&self) -> &[f32] {
        &self.temperature
    }

    /// §6.2: the snapshot is exactly the `type` array.
    pub fn save_snapshot(&self) -> Vec<u8> {
        self.types.clone()
    }

    /// §4.D `loadSnapshot`: recreates the world at the current dimensions
    /// and replays every non-EMPTY cell; color/temperature come from the
    /// content table's defaults (P7, §13 Open Question 3).
    pub fn load_snapshot(&mut self, content: &ContentRegistry, bytes: &[u8]) -> Result<(), crate::error::EngineError> {
        if bytes.len() != self.size {
            return Err(crate::error::EngineError::InvalidArgument(format!(
                "snapshot length {} does not match world size {}",
                bytes.len(),
                self.size
            )));
        }
        self.clear();
        for (i, &id) in bytes.iter().enumerate() {
            if id == EL_EMPTY {
                continue;
            }
            let x = (i as u32) % self.width;
            let y = (i as u32) / self.width;
            let temp = content.props(id).map(|p| p.default_temp).unwrap_or(20.0);
            self.set_cell(content, x as i32, y as i32, id, temp, 16);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_cell_out_of_bounds_is_noop() {
        let content = ContentRegistry::default_bundle();
        let mut g = Grid::new(4, 4);
        g.set_cell(&content, -1, 0, crate::domain::elements::EL_SAND, 20.0, 0);
        g.set_cell(&content, 4, 0, crate::domain::elements::EL_SAND, 20.0, 0);
        assert_eq!(g.types.iter().filter(|&&t| t != EL_EMPTY).count(), 0);
    }

    #[test]
    fn snapshot_round_trip_preserves_types() {
        let content = ContentRegistry::default_bundle();
        let mut g = Grid::new(4, 4);
        for x in 0..4u32 {
            for y in 0..4u32 {
                if (x + y) % 2 == 0 {
                    g.set_cell(&content, x as i32, y as i32, crate::domain::elements::EL_SAND, 20.0, 3);
                }
            }
        }
        let snap = g.save_snapshot();
        let mut g2 = Grid::new(4, 4);
        g2.load_snapshot(&content, &snap).unwrap();
        assert_eq!(g.types, g2.types);
    }

    #[test]
    fn waking_a_chunk_hydrates_its_stale_per_pixel_temperature() {
        let content = ContentRegistry::default_bundle();
        let mut g = Grid::new(CHUNK_SIZE, CHUNK_SIZE);

        // Put the chunk to sleep, then let it lerp its virtual_temp far away
        // from the per-pixel array, which stays frozen while asleep.
        for _ in 0..128 {
            g.chunks.begin_tick();
            g.chunks.end_tick();
        }
        assert!(g.chunks.is_sleeping(0, 0));
        g.chunks.set_virtual_temp(0, 0, 500.0);
        assert!(g.temperature.iter().all(|&t| t != 500.0));

        // A write into the chunk should wake it and re-hydrate every EMPTY
        // cell's stale `temperature` entry from the diverged virtual_temp.
        g.set_cell(&content, 5, 5, crate::domain::elements::EL_SAND, 20.0, 0);

        assert!(!g.chunks.is_sleeping(0, 0));
        for y in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                let i = g.index(x, y);
                if g.types[i] == EL_EMPTY {
                    assert_eq!(g.temperature[i], 500.0);
                }
            }
        }
    }
}
