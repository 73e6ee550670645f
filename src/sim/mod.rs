//! The per-tick stepper (§4.C): movement, heat, phase change, reactions,
//! lifetime, then chunk sleep bookkeeping.

pub mod lifetime;
pub mod movement;
pub mod reactions;
pub mod temperature;

use std::panic::{self, AssertUnwindSafe};

use crate::domain::content::ContentRegistry;
use crate::error::EngineError;
use crate::grid::Grid;

/// Gravity as a unit-ish vector; only the sign of `.1` selects fall direction
/// (§13 Open Question: movement ordering follows this pinned axis).
pub type Gravity = (f32, f32);

pub struct Stepper {
    pub tick: u64,
    pub gravity: Gravity,
    pub ambient_temperature: f32,
    crashed: Option<String>,
}

impl Stepper {
    pub fn new() -> Self {
        Self { tick: 0, gravity: (0.0, 1.0), ambient_temperature: 20.0, crashed: None }
    }

    pub fn is_crashed(&self) -> bool {
        self.crashed.is_some()
    }

    pub fn crash_message(&self) -> Option<&str> {
        self.crashed.as_deref()
    }

    /// Runs one full tick. Once crashed, a stepper refuses further ticks
    /// until the host rebuilds the world (§10.2 error-kind table).
    pub fn tick(&mut self, grid: &mut Grid, content: &ContentRegistry) -> Result<(), EngineError> {
        if let Some(msg) = &self.crashed {
            return Err(EngineError::RuntimeTrap { message: msg.clone() });
        }

        let tick = self.tick;
        let gravity = self.gravity;
        let ambient = self.ambient_temperature;

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            run_phases(grid, content, gravity, ambient, tick);
        }));

        match result {
            Ok(()) => {
                self.tick = self.tick.wrapping_add(1);
                Ok(())
            }
            Err(payload) => {
                let message = panic_message(payload);
                self.crashed = Some(message.clone());
                Err(EngineError::RuntimeTrap { message })
            }
        }
    }
}

impl Default for Stepper {
    fn default() -> Self {
        Self::new()
    }
}

fn run_phases(grid: &mut Grid, content: &ContentRegistry, gravity: Gravity, ambient: f32, tick: u64) {
    // Phase 0: prologue.
    grid.reset_updated();
    grid.chunks.begin_tick();

    // Phase 1: movement.
    movement::run(grid, content, gravity, tick);

    // Phase 2: heat diffusion.
    temperature::run_heat(grid, content, ambient, tick);

    // Phase 3: phase change.
    temperature::run_phase_change(grid, content, tick);

    // Phase 4: reactions.
    reactions::run(grid, content, tick);

    // Phase 5: lifetime / defaults.
    lifetime::run(grid, content, tick);

    // Phase 6: chunk sleep bookkeeping.
    grid.chunks.end_tick();
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "stepper panicked with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::elements::EL_SAND;

    #[test]
    fn sand_falls_one_row_per_tick_over_empty_space() {
        let content = ContentRegistry::default_bundle();
        let mut grid = Grid::new(4, 4);
        grid.set_cell(&content, 1, 0, EL_SAND, 20.0, 0);
        let mut stepper = Stepper::new();
        stepper.tick(&mut grid, &content).unwrap();
        assert_eq!(grid.get_type(1, 0), 0);
        assert_eq!(grid.get_type(1, 1), EL_SAND);
    }

    #[test]
    fn tick_counter_advances_and_stays_fresh_after_many_ticks() {
        let content = ContentRegistry::default_bundle();
        let mut grid = Grid::new(8, 8);
        let mut stepper = Stepper::new();
        for _ in 0..50 {
            stepper.tick(&mut grid, &content).unwrap();
        }
        assert_eq!(stepper.tick, 50);
        assert!(!stepper.is_crashed());
    }
}
