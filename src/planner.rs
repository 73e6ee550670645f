//! Dirty-upload planner (§4.F): turns dirty chunks into a minimal set of
//! upload rectangles, or a full-frame fallback, for the renderer to read
//! back through the cell views (§4.J).
//!
//! Grounded on `grid::chunks::ChunkMap::collect_visual_dirty_chunks` /
//! `collect_merged_visual_dirty_rects` (the teacher's dirty bitset + row-run/
//! vertical-merge pass in `chunks.rs`), generalized into the plan/threshold
//! decision the teacher's `world.rs::collect_dirty_chunks` +
//! `get_dirty_list_ptr` leave to the JS renderer. Reads the accumulating
//! `visual_dirty_bits` rather than the per-tick `dirty_bits`, so a chunk
//! touched by an earlier sub-tick this frame is still reported even if a
//! later sub-tick in the same frame leaves it untouched — the caller is
//! expected to call `ChunkMap::clear_visual_dirty` once it has consumed the
//! returned plan (see `facade::Engine::plan_upload`).

use crate::grid::chunks::{ChunkMap, DirtyRect, CHUNK_SIZE};

pub const T_FULL_CHUNKS: f32 = 0.4;
pub const T_FULL_RECTS: f32 = 0.3;
pub const T_FULL_COVERAGE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadRect {
    pub x_offset: u32,
    pub y_offset: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPlan {
    FullFrame,
    Chunks(Vec<UploadRect>),
    Rects(Vec<UploadRect>),
}

impl UploadPlan {
    pub fn is_full_frame(&self) -> bool {
        matches!(self, UploadPlan::FullFrame)
    }

    pub fn rects(&self) -> &[UploadRect] {
        match self {
            UploadPlan::FullFrame => &[],
            UploadPlan::Chunks(r) | UploadPlan::Rects(r) => r,
        }
    }
}

fn clamp_rect(x_offset: u32, y_offset: u32, world_w: u32, world_h: u32) -> Option<UploadRect> {
    if x_offset >= world_w || y_offset >= world_h {
        return None;
    }
    let width = CHUNK_SIZE.min(world_w - x_offset);
    let height = CHUNK_SIZE.min(world_h - y_offset);
    if width == 0 || height == 0 {
        None
    } else {
        Some(UploadRect { x_offset, y_offset, width, height })
    }
}

fn dirty_rect_to_upload(r: DirtyRect, world_w: u32, world_h: u32) -> Option<UploadRect> {
    let x_offset = r.cx * CHUNK_SIZE;
    let y_offset = r.cy * CHUNK_SIZE;
    if x_offset >= world_w || y_offset >= world_h {
        return None;
    }
    let width = (r.cw * CHUNK_SIZE).min(world_w - x_offset);
    let height = (r.ch * CHUNK_SIZE).min(world_h - y_offset);
    if width == 0 || height == 0 {
        None
    } else {
        Some(UploadRect { x_offset, y_offset, width, height })
    }
}

/// Plan the minimal renderer upload for this frame.
///
/// `force_full` models both "renderer asked for a full re-upload" (context
/// restore, §6.5c) and the initial frame where every chunk starts dirty.
/// `merged_rects_enabled` is the tie-break config knob (§4.F): when both a
/// `Chunks` and a `Rects` plan would be valid, `Rects` only wins when this
/// is set.
pub fn plan(
    chunks: &ChunkMap,
    world_w: u32,
    world_h: u32,
    force_full: bool,
    merged_rects_enabled: bool,
) -> UploadPlan {
    let dirty = chunks.collect_visual_dirty_chunks();
    let total_chunks = chunks.chunk_count().max(1);

    if dirty.is_empty() && force_full {
        return UploadPlan::FullFrame;
    }

    if !merged_rects_enabled {
        let ratio = dirty.len() as f32 / total_chunks as f32;
        if ratio > T_FULL_CHUNKS {
            return UploadPlan::FullFrame;
        }
        let rects = dirty
            .iter()
            .filter_map(|&idx| {
                let cx = idx % chunks.chunks_x();
                let cy = idx / chunks.chunks_x();
                clamp_rect(cx * CHUNK_SIZE, cy * CHUNK_SIZE, world_w, world_h)
            })
            .collect();
        return UploadPlan::Chunks(rects);
    }

    let merged = chunks.collect_merged_visual_dirty_rects();
    let ratio = dirty.len() as f32 / total_chunks as f32;
    if ratio > T_FULL_RECTS {
        return UploadPlan::FullFrame;
    }

    let rects: Vec<UploadRect> = merged
        .into_iter()
        .filter_map(|r| dirty_rect_to_upload(r, world_w, world_h))
        .collect();

    let covered: u64 = rects.iter().map(|r| r.width as u64 * r.height as u64).sum();
    let world_area = world_w as u64 * world_h as u64;
    if world_area > 0 && covered as f64 / world_area as f64 > T_FULL_COVERAGE as f64 {
        return UploadPlan::FullFrame;
    }

    UploadPlan::Rects(rects)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_world_plans_full_frame_on_first_force() {
        let mut chunks = ChunkMap::new(64, 64);
        chunks.begin_tick();
        let plan = plan(&chunks, 64, 64, true, false);
        assert_eq!(plan, UploadPlan::FullFrame);
    }

    #[test]
    fn single_dirty_chunk_plans_one_clamped_rect() {
        // World is 100x100; the trailing chunk column/row only has 4 cells
        // (96..100) of a full 32-cell chunk, so its rect must be clamped.
        let mut chunks = ChunkMap::new(100, 100);
        chunks.clear_visual_dirty();
        chunks.begin_tick();
        chunks.mark_dirty(96, 96);
        let plan = plan(&chunks, 100, 100, false, false);
        match plan {
            UploadPlan::Chunks(rects) => {
                assert_eq!(rects.len(), 1);
                let r = rects[0];
                assert_eq!(r.x_offset, 96);
                assert_eq!(r.y_offset, 96);
                assert_eq!(r.width, 4);
                assert_eq!(r.height, 4);
            }
            other => panic!("expected Chunks plan, got {other:?}"),
        }
    }

    #[test]
    fn unaligned_world_clamps_the_lone_dirty_chunk_without_forcing_full_frame() {
        // 100 isn't a multiple of CHUNK_SIZE, but the dirty chunk here sits
        // well inside the world, so chunk_count() already accounts for the
        // partial trailing chunks in its ratio and no clamping is needed.
        let mut chunks = ChunkMap::new(100, 100);
        chunks.clear_visual_dirty();
        chunks.begin_tick();
        chunks.mark_dirty(0, 0);
        let plan = plan(&chunks, 100, 100, false, false);
        match plan {
            UploadPlan::Chunks(rects) => {
                assert_eq!(rects, vec![UploadRect { x_offset: 0, y_offset: 0, width: 32, height: 32 }]);
            }
            other => panic!("expected Chunks plan, got {other:?}"),
        }
    }

    #[test]
    fn high_dirty_ratio_promotes_to_full_frame() {
        let mut chunks = ChunkMap::new(128, 128);
        chunks.clear_visual_dirty();
        chunks.begin_tick();
        for cy in 0..2 {
            for cx in 0..4 {
                chunks.mark_dirty(cx * CHUNK_SIZE, cy * CHUNK_SIZE);
            }
        }
        let plan = plan(&chunks, 128, 128, false, false);
        assert_eq!(plan, UploadPlan::FullFrame);
    }

    #[test]
    fn merged_rects_mode_coalesces_a_horizontal_run() {
        let mut chunks = ChunkMap::new(128, 128);
        chunks.clear_visual_dirty();
        chunks.begin_tick();
        chunks.mark_dirty(0, 0);
        chunks.mark_dirty(CHUNK_SIZE, 0);
        let plan = plan(&chunks, 128, 128, false, true);
        match plan {
            UploadPlan::Rects(rects) => {
                assert_eq!(rects.len(), 1);
                assert_eq!(rects[0], UploadRect { x_offset: 0, y_offset: 0, width: 64, height: 32 });
            }
            other => panic!("expected Rects plan, got {other:?}"),
        }
    }
}
