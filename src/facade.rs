//! Host-facing facade (§4.H, §6.5): the single value that owns the grid,
//! content table, stepper, edit surface, ring, planner and frame driver,
//! and the surface the host actually calls. Mirrors the teacher's
//! `World` (`world.rs`): a constructor, plain getters/setters, and pointer
//! exports for the renderer (§9 "make the engine an explicit value with a
//! lifetime" instead of a module-level singleton).
//!
//! Pointer-returning getters (`types_ptr`, `ring_buffer_ptr`, …) are kept
//! unconditional like the teacher's — they are only meaningful from JS
//! against the wasm32 linear memory, but compile to ordinary raw-pointer
//! accessors on any target so the facade stays testable natively.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::config::{RenderMode, RuntimeConfig};
use crate::domain::content::ContentRegistry;
use crate::edit::{self, BrushShape, FloodFillScratch, StrokeInterpolator};
use crate::frame::FrameDriver;
use crate::grid::Grid;
use crate::planner::{self, UploadPlan};
use crate::protocol::{BundlePhase, BundleStatus, EngineEvent, EngineState, HostRequest, PROTOCOL_VERSION};
use crate::ring::{BrushEvent, InputRing};
use crate::sim::Stepper;
use crate::transform::Transform;
use crate::view_guard::{CellViews, ViewGuard};

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub struct Engine {
    grid: Grid,
    content: ContentRegistry,
    stepper: Stepper,
    config: RuntimeConfig,
    ring: InputRing,
    stroke: StrokeInterpolator,
    fill_scratch: FloodFillScratch,
    frame: FrameDriver,
    view_guard: ViewGuard,
    transform: Transform,
    state: EngineState,
    bundle_status: (BundlePhase, BundleStatus, Option<String>),
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
impl Engine {
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(constructor))]
    pub fn new(width: u32, height: u32, viewport_w: u32, viewport_h: u32) -> Engine {
        let content = ContentRegistry::default_bundle();
        let fill_scratch = FloodFillScratch::new(width, height);
        Engine {
            grid: Grid::new(width, height),
            content,
            stepper: Stepper::new(),
            config: RuntimeConfig { world_w: width, world_h: height, ..RuntimeConfig::default() },
            ring: InputRing::new(),
            stroke: StrokeInterpolator::new(),
            fill_scratch,
            frame: FrameDriver::new(),
            view_guard: ViewGuard::new(),
            transform: Transform::new(width, height, viewport_w, viewport_h),
            state: EngineState::Ready,
            bundle_status: (BundlePhase::Init, BundleStatus::Loaded, None),
        }
    }

    pub fn state_is_crashed(&self) -> bool {
        self.state == EngineState::Crashed
    }

    pub fn state_is_dead(&self) -> bool {
        self.state == EngineState::Dead
    }

    // === §6.5 renderer interface: pointer/len views, guarded by §4.J ===

    pub fn types_ptr(&self) -> *const u8 {
        self.grid.types_view().as_ptr()
    }

    pub fn colors_ptr(&self) -> *const u32 {
        self.grid.colors_view().as_ptr()
    }

    pub fn temperature_ptr(&self) -> *const f32 {
        self.grid.temperature_view().as_ptr()
    }

    pub fn cell_count(&self) -> usize {
        self.grid.len()
    }

    // === §4.E input ring ===

    pub fn ring_buffer_ptr(&self) -> *const i32 {
        self.ring.buffer_ptr()
    }

    pub fn ring_buffer_len(&self) -> usize {
        self.ring.buffer_len()
    }

    /// Drains the ring into the edit surface, resetting the stroke
    /// interpolator on overflow (§4.E consumer contract, P5).
    pub fn drain_ring(&mut self) {
        let (events, overflowed) = self.ring.drain();
        if overflowed {
            self.stroke.reset_on_overflow();
        }
        self.frame.note_ring_drain(&self.ring, overflowed);
        for ev in events {
            self.apply_ring_event(ev);
        }
    }

    fn apply_ring_event(&mut self, ev: BrushEvent) {
        match ev {
            BrushEvent::EndStroke => self.stroke.end_stroke(),
            BrushEvent::Erase { x, y, radius } => {
                self.stroke.extend_to(&mut self.grid, &self.content, x, y, radius, None, self.config.brush_shape)
            }
            BrushEvent::Brush { x, y, element, radius } => self.stroke.extend_to(
                &mut self.grid,
                &self.content,
                x,
                y,
                radius,
                Some(element),
                self.config.brush_shape,
            ),
        }
    }

    // === §4.G frame driver ===

    /// Drives one host animation frame: drains input, ticks the stepper up
    /// to `MAX_STEPS_PER_FRAME` times, and returns the number of ticks run.
    pub fn advance_frame(&mut self, dt_ms: f32) -> u32 {
        self.drain_ring();
        self.frame.record_fps_sample(dt_ms);

        if self.state != EngineState::Running {
            return 0;
        }

        let steps = self.frame.advance(dt_ms, self.config.speed);
        for _ in 0..steps {
            if self.stepper.tick(&mut self.grid, &self.content).is_err() {
                self.state = EngineState::Crashed;
                break;
            }
        }
        steps
    }

    /// Builds this frame's upload plan and consumes the accumulated
    /// visual-dirty bits: the host is expected to call this once per
    /// rendered frame, after possibly running several stepper sub-ticks
    /// (§4.G), and to actually perform the upload before the next call.
    pub fn plan_upload(&mut self, force_full: bool) -> UploadPlanHandle {
        let plan = planner::plan(
            &self.grid.chunks,
            self.grid.width(),
            self.grid.height(),
            force_full,
            self.config.merged_rects_enabled,
        );
        self.grid.chunks.clear_visual_dirty();
        UploadPlanHandle(plan)
    }

    // === §4.D edit surface (direct flat calls, as a fallback without a ring) ===

    pub fn add_particle(&mut self, x: i32, y: i32, element: u8) -> bool {
        edit::add_particle(&mut self.grid, &self.content, x, y, element)
    }

    pub fn add_particles_in_radius(&mut self, cx: i32, cy: i32, radius: i32, element: u8, shape: BrushShape) {
        edit::add_particles_in_radius(&mut self.grid, &self.content, cx, cy, radius, element, shape)
    }

    pub fn remove_particle(&mut self, x: i32, y: i32) -> bool {
        edit::remove_particle(&mut self.grid, x, y)
    }

    pub fn remove_particles_in_radius(&mut self, cx: i32, cy: i32, radius: i32) {
        edit::remove_particles_in_radius(&mut self.grid, cx, cy, radius)
    }

    pub fn flood_fill(&mut self, x: i32, y: i32, element: u8) -> usize {
        edit::flood_fill(&mut self.grid, &self.content, &mut self.fill_scratch, x, y, element)
    }

    pub fn spawn_rigid_stamp(&mut self, x: i32, y: i32, half_extent: i32, shape: BrushShape, element: u8) {
        edit::spawn_rigid_stamp(&mut self.grid, &self.content, x, y, half_extent, shape, element)
    }

    pub fn save_snapshot(&self) -> Vec<u8> {
        edit::save_snapshot(&self.grid)
    }

    pub fn clear(&mut self) {
        self.grid.clear();
        self.stepper = Stepper::new();
    }

    // === §4.I transform ===

    pub fn world_to_screen(&self, wx: i32, wy: i32) -> Vec<i32> {
        let (sx, sy) = self.transform.world_to_screen(wx, wy);
        vec![sx, sy]
    }

    pub fn screen_to_world(&self, sx: i32, sy: i32) -> Vec<i32> {
        let (wx, wy) = self.transform.screen_to_world(sx, sy);
        vec![wx, wy]
    }

    // === §4.H typed request/response dispatch ===

    pub fn handle_request_json(&mut self, json: &str) -> String {
        let event = match crate::protocol::parse_request(json) {
            Ok(req) => self.handle_request(req),
            Err(e) => EngineEvent::Error { message: e.to_string() },
        };
        serde_json::to_string(&event).unwrap_or_else(|_| "{\"type\":\"Error\"}".to_string())
    }

    fn handle_request(&mut self, req: HostRequest) -> EngineEvent {
        if !self.state.can_receive(&req) {
            return EngineEvent::Error { message: format!("request rejected in state {:?}", self.state) };
        }

        match req {
            HostRequest::Init { protocol_version, width, height, viewport_w, viewport_h } => {
                if let Err(e) = crate::protocol::check_protocol_version(protocol_version) {
                    return EngineEvent::Error { message: e.to_string() };
                }
                *self = Engine::new(width, height, viewport_w, viewport_h);
                self.frame.bump_loop_token();
                EngineEvent::Ready {
                    protocol_version: PROTOCOL_VERSION,
                    width,
                    height,
                    webgl: true,
                    shared_input: true,
                }
            }
            HostRequest::Play => {
                self.state = EngineState::Running;
                EngineEvent::Stats(self.frame.last_stats().clone())
            }
            HostRequest::Pause => {
                self.state = EngineState::Paused;
                EngineEvent::Stats(self.frame.last_stats().clone())
            }
            HostRequest::Step => {
                if self.stepper.tick(&mut self.grid, &self.content).is_err() {
                    self.state = EngineState::Crashed;
                    return EngineEvent::Crash { message: "stepper trapped".into(), can_recover: true };
                }
                EngineEvent::Stats(self.frame.last_stats().clone())
            }
            HostRequest::Clear => {
                self.clear();
                EngineEvent::Stats(self.frame.last_stats().clone())
            }
            HostRequest::Resize { width, height } => {
                self.grid.resize(width, height);
                self.config.world_w = width;
                self.config.world_h = height;
                self.transform.world_w = width;
                self.transform.world_h = height;
                EngineEvent::Stats(self.frame.last_stats().clone())
            }
            HostRequest::SetViewport { width, height } => {
                self.transform.viewport_w = width;
                self.transform.viewport_h = height;
                EngineEvent::Stats(self.frame.last_stats().clone())
            }
            HostRequest::Transform { zoom, pan_x, pan_y } => {
                self.transform.set_zoom(zoom);
                self.transform.pan_x = pan_x;
                self.transform.pan_y = pan_y;
                EngineEvent::Stats(self.frame.last_stats().clone())
            }
            HostRequest::Settings { gravity, ambient_temperature, speed } => {
                if let Some(g) = gravity {
                    self.config.set_gravity(g);
                    self.stepper.gravity = self.config.gravity;
                }
                if let Some(t) = ambient_temperature {
                    self.config.set_ambient_temperature(t);
                    self.stepper.ambient_temperature = self.config.ambient_temperature;
                }
                if let Some(s) = speed {
                    self.config.set_speed(s);
                }
                EngineEvent::Stats(self.frame.last_stats().clone())
            }
            HostRequest::SetRenderMode { thermal } => {
                self.config.render_mode = if thermal { RenderMode::Thermal } else { RenderMode::Normal };
                EngineEvent::Stats(self.frame.last_stats().clone())
            }
            HostRequest::Input { x, y, radius, element_id, erase, shape } => {
                let brush = if erase { None } else { Some(element_id) };
                self.stroke.extend_to(&mut self.grid, &self.content, x, y, radius, brush, shape);
                EngineEvent::Stats(self.frame.last_stats().clone())
            }
            HostRequest::InputEnd => {
                self.stroke.end_stroke();
                EngineEvent::Stats(self.frame.last_stats().clone())
            }
            HostRequest::Fill { x, y, element_id } => {
                edit::flood_fill(&mut self.grid, &self.content, &mut self.fill_scratch, x, y, element_id);
                EngineEvent::Stats(self.frame.last_stats().clone())
            }
            HostRequest::SpawnRigidBody { x, y, size, shape, element_id } => {
                edit::spawn_rigid_stamp(&mut self.grid, &self.content, x, y, size, shape, element_id);
                EngineEvent::Stats(self.frame.last_stats().clone())
            }
            HostRequest::Pipette { id, x, y } => {
                let t = self.grid.get_type(x, y);
                let element_id = if t == crate::domain::elements::EL_EMPTY { None } else { Some(t) };
                EngineEvent::PipetteResult { id, element_id }
            }
            HostRequest::Snapshot { id } => {
                EngineEvent::SnapshotResult { id, buffer: Some(edit::save_snapshot(&self.grid)) }
            }
            HostRequest::LoadSnapshot { buffer } => match edit::load_snapshot(&mut self.grid, &self.content, &buffer) {
                Ok(()) => EngineEvent::Stats(self.frame.last_stats().clone()),
                Err(e) => EngineEvent::Error { message: e.to_string() },
            },
            HostRequest::LoadContentBundle { json } => self.load_content_bundle(json),
        }
    }

    fn load_content_bundle(&mut self, json: String) -> EngineEvent {
        self.bundle_status = (BundlePhase::Reload, BundleStatus::Loading, None);
        match ContentRegistry::from_bundle_json(&json) {
            Ok(registry) => {
                self.content = registry;
                self.bundle_status = (BundlePhase::Reload, BundleStatus::Loaded, None);
                EngineEvent::ContentManifest { json: self.content.manifest_json() }
            }
            Err(e) => {
                crate::log::error(&e.to_string());
                self.bundle_status = (BundlePhase::Reload, BundleStatus::Error, Some(e.to_string()));
                EngineEvent::ContentBundleStatus {
                    phase: BundlePhase::Reload,
                    status: BundleStatus::Error,
                    message: Some(e.to_string()),
                }
            }
        }
    }
}

/// Plain (non-FFI) view-guard helpers: `CellViews` carries raw pointers and
/// cannot cross the `wasm_bindgen` boundary directly, so callers within the
/// crate (and native tests) use these, while JS reconstructs the same
/// triple from the primitive `*_ptr`/`cell_count` getters above (§4.J).
impl Engine {
    pub fn current_views(&self) -> CellViews {
        CellViews {
            types_ptr: self.types_ptr(),
            colors_ptr: self.colors_ptr(),
            temperature_ptr: self.temperature_ptr(),
            len: self.cell_count(),
        }
    }

    pub fn refresh_views(&mut self) -> CellViews {
        let v = self.current_views();
        self.view_guard.refresh(v)
    }

    pub fn views_are_stale(&self) -> bool {
        self.view_guard.is_stale(self.current_views())
    }
}

/// Opaque wrapper so `UploadPlan` (which holds heap-allocated rect lists)
/// can cross the wasm boundary as a single value.
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub struct UploadPlanHandle(UploadPlan);

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
impl UploadPlanHandle {
    pub fn is_full_frame(&self) -> bool {
        self.0.is_full_frame()
    }

    pub fn rect_count(&self) -> usize {
        self.0.rects().len()
    }

    pub fn rect_at(&self, index: usize) -> Vec<u32> {
        match self.0.rects().get(index) {
            Some(r) => vec![r.x_offset, r.y_offset, r.width, r.height],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_request_resets_the_engine_to_ready() {
        let mut engine = Engine::new(64, 64, 64, 64);
        let json = serde_json::to_string(&HostRequest::Init {
            protocol_version: PROTOCOL_VERSION,
            width: 32,
            height: 32,
            viewport_w: 32,
            viewport_h: 32,
        })
        .unwrap();
        let resp = engine.handle_request_json(&json);
        assert!(resp.contains("Ready"));
        assert_eq!(engine.grid.width(), 32);
    }

    #[test]
    fn play_then_step_advances_the_tick_counter() {
        let mut engine = Engine::new(8, 8, 8, 8);
        engine.handle_request(HostRequest::Play);
        engine.add_particle(2, 0, crate::domain::elements::EL_SAND);
        engine.advance_frame(crate::frame::BASE_STEP_MS);
        assert_eq!(engine.grid.get_type(2, 1), crate::domain::elements::EL_SAND);
    }

    #[test]
    fn pipette_reports_empty_for_an_untouched_cell() {
        let mut engine = Engine::new(4, 4, 4, 4);
        match engine.handle_request(HostRequest::Pipette { id: 1, x: 0, y: 0 }) {
            EngineEvent::PipetteResult { id, element_id } => {
                assert_eq!(id, 1);
                assert_eq!(element_id, None);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn snapshot_round_trips_through_the_request_protocol() {
        let mut engine = Engine::new(4, 4, 4, 4);
        engine.add_particle(1, 1, crate::domain::elements::EL_SAND);
        let buffer = match engine.handle_request(HostRequest::Snapshot { id: 7 }) {
            EngineEvent::SnapshotResult { buffer: Some(b), .. } => b,
            other => panic!("unexpected: {other:?}"),
        };
        engine.clear();
        assert_eq!(engine.grid.get_type(1, 1), crate::domain::elements::EL_EMPTY);
        engine.handle_request(HostRequest::LoadSnapshot { buffer });
        assert_eq!(engine.grid.get_type(1, 1), crate::domain::elements::EL_SAND);
    }

    #[test]
    fn unknown_request_before_init_is_rejected() {
        let mut engine = Engine::new(4, 4, 4, 4);
        engine.state = EngineState::Init;
        match engine.handle_request(HostRequest::Play) {
            EngineEvent::Error { .. } => {}
            other => panic!("unexpected: {other:?}"),
        }
    }
}
