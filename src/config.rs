//! Runtime configuration (§6.6): recognized options and their defaults,
//! constructed once at `INIT` and mutated only through `SETTINGS`/
//! `SET_RENDER_MODE` (§4.H), following the teacher's `World::new` pattern
//! of hardcoded defaults (`gravity_y: 1.0`, `ambient_temperature: 20.0`)
//! generalized into one struct instead of scattered literals.

use crate::edit::BrushShape;

pub const DEFAULT_WORLD_W: u32 = 768;
pub const DEFAULT_WORLD_H: u32 = 576;
pub const DEFAULT_BRUSH_SIZE: i32 = 10;
pub const MIN_BRUSH_SIZE: i32 = 1;
pub const MAX_BRUSH_SIZE: i32 = 50;
pub const MIN_SPEED: f32 = 0.1;
pub const MAX_SPEED: f32 = 8.0;
pub const MIN_GRAVITY_COMPONENT: f32 = -50.0;
pub const MAX_GRAVITY_COMPONENT: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Normal,
    Thermal,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub world_w: u32,
    pub world_h: u32,
    pub brush_size: i32,
    pub brush_shape: BrushShape,
    pub speed: f32,
    pub gravity: (f32, f32),
    pub ambient_temperature: f32,
    pub render_mode: RenderMode,
    pub debug_dirty: bool,
    pub merged_rects_enabled: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            world_w: DEFAULT_WORLD_W,
            world_h: DEFAULT_WORLD_H,
            brush_size: DEFAULT_BRUSH_SIZE,
            brush_shape: BrushShape::Circle,
            speed: 1.0,
            gravity: (0.0, 9.8),
            ambient_temperature: 20.0,
            render_mode: RenderMode::Normal,
            debug_dirty: false,
            merged_rects_enabled: false,
        }
    }
}

impl RuntimeConfig {
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    pub fn set_gravity(&mut self, gravity: (f32, f32)) {
        self.gravity = (
            gravity.0.clamp(MIN_GRAVITY_COMPONENT, MAX_GRAVITY_COMPONENT),
            gravity.1.clamp(MIN_GRAVITY_COMPONENT, MAX_GRAVITY_COMPONENT),
        );
    }

    pub fn set_ambient_temperature(&mut self, temp: f32) {
        self.ambient_temperature = temp.clamp(-273.0, 5000.0);
    }

    pub fn set_brush_size(&mut self, size: i32) {
        self.brush_size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_medium_world_size_preset() {
        let cfg = RuntimeConfig::default();
        assert_eq!((cfg.world_w, cfg.world_h), (768, 576));
        assert_eq!(cfg.brush_size, 10);
    }

    #[test]
    fn speed_and_gravity_setters_clamp_to_spec_ranges() {
        let mut cfg = RuntimeConfig::default();
        cfg.set_speed(100.0);
        assert_eq!(cfg.speed, MAX_SPEED);
        cfg.set_gravity((-999.0, 999.0));
        assert_eq!(cfg.gravity, (MIN_GRAVITY_COMPONENT, MAX_GRAVITY_COMPONENT));
    }
}
