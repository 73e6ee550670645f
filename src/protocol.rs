//! Host boundary protocol (§4.H): the versioned, typed request/response
//! contract between the host and the engine, plus the engine's lifecycle
//! state machine.
//!
//! The teacher exposes this surface as a flat list of `#[wasm_bindgen] pub
//! fn` methods on `World` (`add_particle`, `set_gravity`, `step`, the
//! `*_ptr`/`*_len` getters) rather than a tagged message enum — the host
//! calls directly into WASM exports instead of posting structured
//! messages. This module keeps that same one-verb-per-operation surface
//! (§6.3 "structured values") but expressed as `serde`-tagged enums so the
//! request/response shape and the engine's lifecycle transitions (§4.H
//! "Lifecycle") are checked once, in one place, instead of scattered across
//! the exported function list.

use serde::{Deserialize, Serialize};

use crate::edit::BrushShape;
use crate::error::EngineError;

pub const PROTOCOL_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Init,
    Ready,
    Running,
    Paused,
    Crashed,
    Dead,
}

impl EngineState {
    /// Only `Init` is reachable from every non-`Dead` state (§4.H
    /// Lifecycle: `INIT -> READY -> RUNNING <-> PAUSED -> CRASHED|DEAD`).
    pub fn can_receive(self, msg: &HostRequest) -> bool {
        if self == EngineState::Dead {
            return false;
        }
        match msg {
            HostRequest::Init { .. } => true,
            _ => self != EngineState::Init,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostRequest {
    Init { protocol_version: u32, width: u32, height: u32, viewport_w: u32, viewport_h: u32 },
    Play,
    Pause,
    Step,
    Clear,
    Resize { width: u32, height: u32 },
    SetViewport { width: u32, height: u32 },
    Transform { zoom: f32, pan_x: f32, pan_y: f32 },
    Settings { gravity: Option<(f32, f32)>, ambient_temperature: Option<f32>, speed: Option<f32> },
    SetRenderMode { thermal: bool },
    Input { x: i32, y: i32, radius: i32, element_id: u8, erase: bool, shape: BrushShape },
    InputEnd,
    Fill { x: i32, y: i32, element_id: u8 },
    SpawnRigidBody { x: i32, y: i32, size: i32, shape: BrushShape, element_id: u8 },
    Pipette { id: u32, x: i32, y: i32 },
    Snapshot { id: u32 },
    LoadSnapshot { buffer: Vec<u8> },
    LoadContentBundle { json: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum EngineEvent {
    Ready { protocol_version: u32, width: u32, height: u32, webgl: bool, shared_input: bool },
    Stats(crate::frame::FrameStats),
    Error { message: String },
    Crash { message: String, can_recover: bool },
    PipetteResult { id: u32, element_id: Option<u8> },
    SnapshotResult { id: u32, buffer: Option<Vec<u8>> },
    ContentManifest { json: String },
    ContentBundleStatus { phase: BundlePhase, status: BundleStatus, message: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BundlePhase {
    Init,
    Reload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleStatus {
    Loading,
    Loaded,
    Error,
}

/// Per-request-kind timeout, in milliseconds (§4.H "per-kind timeouts").
/// A pending request the host hasn't resolved within this window resolves
/// to `null` on the host side and is forgotten on the engine side (§7).
pub fn timeout_ms(request: &HostRequest) -> Option<u32> {
    match request {
        HostRequest::Pipette { .. } => Some(1_000),
        HostRequest::Snapshot { .. } => Some(5_000),
        _ => None,
    }
}

/// Strict-mode unknown-message handling (§4.H): deserialization failures
/// are reported as `ProtocolMismatch`/`UnknownMessage` rather than panicking.
pub fn parse_request(json: &str) -> Result<HostRequest, EngineError> {
    serde_json::from_str(json).map_err(|e| EngineError::UnknownMessage { tag: e.to_string() })
}

pub fn check_protocol_version(got: u32) -> Result<(), EngineError> {
    if got != PROTOCOL_VERSION {
        Err(EngineError::ProtocolMismatch { expected: PROTOCOL_VERSION, got })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_receivable_from_every_non_dead_state() {
        let init = HostRequest::Init { protocol_version: 1, width: 4, height: 4, viewport_w: 4, viewport_h: 4 };
        for state in [EngineState::Init, EngineState::Ready, EngineState::Running, EngineState::Paused, EngineState::Crashed] {
            assert!(state.can_receive(&init));
        }
        assert!(!EngineState::Dead.can_receive(&init));
    }

    #[test]
    fn non_init_messages_are_rejected_before_init() {
        assert!(!EngineState::Init.can_receive(&HostRequest::Play));
    }

    #[test]
    fn pipette_and_snapshot_have_distinct_timeouts() {
        assert_eq!(timeout_ms(&HostRequest::Pipette { id: 0, x: 0, y: 0 }), Some(1_000));
        assert_eq!(timeout_ms(&HostRequest::Snapshot { id: 0 }), Some(5_000));
        assert_eq!(timeout_ms(&HostRequest::Play), None);
    }

    #[test]
    fn protocol_mismatch_is_detected() {
        assert!(check_protocol_version(PROTOCOL_VERSION).is_ok());
        assert!(matches!(
            check_protocol_version(PROTOCOL_VERSION + 1),
            Err(EngineError::ProtocolMismatch { .. })
        ));
    }

    #[test]
    fn unknown_json_message_reports_unknown_message() {
        assert!(matches!(parse_request("{\"type\":\"NOT_A_THING\"}"), Err(EngineError::UnknownMessage { .. })));
    }

    #[test]
    fn a_valid_request_round_trips_through_json() {
        let req = HostRequest::Settings { gravity: Some((0.0, 9.8)), ambient_temperature: None, speed: Some(2.0) };
        let json = serde_json::to_string(&req).unwrap();
        let parsed = parse_request(&json).unwrap();
        match parsed {
            HostRequest::Settings { gravity, speed, .. } => {
                assert_eq!(gravity, Some((0.0, 9.8)));
                assert_eq!(speed, Some(2.0));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
