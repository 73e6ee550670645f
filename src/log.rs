//! Thin console logging, mirroring the teacher's direct `web_sys::console` calls
//! at call sites instead of pulling in a logging crate the teacher never used.

#[cfg(target_arch = "wasm32")]
pub fn info(msg: &str) {
    web_sys::console::log_1(&msg.into());
}

#[cfg(target_arch = "wasm32")]
pub fn warn(msg: &str) {
    web_sys::console::warn_1(&msg.into());
}

#[cfg(target_arch = "wasm32")]
pub fn error(msg: &str) {
    web_sys::console::error_1(&msg.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn info(msg: &str) {
    eprintln!("[particula] {msg}");
}

#[cfg(not(target_arch = "wasm32"))]
pub fn warn(msg: &str) {
    eprintln!("[particula:warn] {msg}");
}

#[cfg(not(target_arch = "wasm32"))]
pub fn error(msg: &str) {
    eprintln!("[particula:error] {msg}");
}
