//! Particula Engine — deterministic 2D falling-sand simulation core.
//!
//! Layout:
//! - `error`     - shared error kinds (§10.2)
//! - `log`       - console/stderr logging bridge (§10.1)
//! - `rng`       - deterministic per-cell/tick randomness
//! - `domain`    - element ids, properties and the content table (§4.A)
//! - `grid`      - SoA cell storage and chunk spatial index (§4.B)
//! - `sim`       - the per-tick stepper (§4.C)
//! - `edit`      - brush/fill/stamp/snapshot edit surface (§4.D)
//! - `ring`      - lock-free SPSC input ring (§4.E)
//! - `planner`   - dirty-upload planner (§4.F)
//! - `frame`     - fixed-timestep frame driver (§4.G)
//! - `protocol`  - host boundary request/response types (§4.H)
//! - `transform` - screen/world coordinate model (§4.I)
//! - `view_guard`- memory-view staleness guard (§4.J)
//! - `config`    - runtime configuration defaults (§6.6)
//! - `facade`    - the host-facing `Engine` value wiring the above together

pub mod config;
pub mod domain;
pub mod edit;
pub mod error;
pub mod facade;
pub mod frame;
pub mod grid;
pub mod log;
pub mod planner;
pub mod protocol;
pub mod ring;
pub mod rng;
pub mod sim;
pub mod transform;
pub mod view_guard;

pub use facade::Engine;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
