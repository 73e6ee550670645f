//! Input ring (§4.E): lock-free SPSC ring carrying brush events from the
//! host thread into the engine thread, backed by a flat `i32` buffer the
//! host can also address directly (e.g. a `SharedArrayBuffer` view) —
//! exposed the way the teacher exposes its cell arrays, through a raw
//! pointer getter (`world.rs::types_ptr`/`types_len`), generalized to a
//! writable shared region instead of a read-only one.

use std::sync::atomic::{AtomicI32, Ordering};

/// Event slots in the ring; one slot is always kept empty to distinguish
/// full from empty.
pub const CAPACITY: usize = 100;
const INTS_PER_EVENT: usize = 4;
const HEADER_INTS: usize = 3;
pub const BUFFER_LEN: usize = HEADER_INTS + CAPACITY * INTS_PER_EVENT;

pub const EVENT_ERASE: i32 = 0;
pub const BRUSH_BASE: i32 = 100;
// `element` is a `u8`, so `Brush` kinds occupy [BRUSH_BASE, BRUSH_BASE + 255].
// These sentinels must stay outside that range or they collide with real
// element ids near the top of the u8 range.
pub const EVENT_END_STROKE: i32 = BRUSH_BASE + 256;
pub const EVENT_NONE: i32 = BRUSH_BASE + 257;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushEvent {
    Erase { x: i32, y: i32, radius: i32 },
    Brush { x: i32, y: i32, element: u8, radius: i32 },
    EndStroke,
}

impl BrushEvent {
    fn encode(self) -> (i32, i32, i32, i32) {
        match self {
            BrushEvent::Erase { x, y, radius } => (x, y, EVENT_ERASE, radius),
            BrushEvent::Brush { x, y, element, radius } => (x, y, BRUSH_BASE + element as i32, radius),
            BrushEvent::EndStroke => (0, 0, EVENT_END_STROKE, 0),
        }
    }

    fn decode(x: i32, y: i32, kind: i32, val: i32) -> Option<Self> {
        match kind {
            EVENT_NONE => None,
            EVENT_ERASE => Some(BrushEvent::Erase { x, y, radius: val }),
            EVENT_END_STROKE => Some(BrushEvent::EndStroke),
            k if k >= BRUSH_BASE && k <= BRUSH_BASE + 255 => {
                Some(BrushEvent::Brush { x, y, element: (k - BRUSH_BASE) as u8, radius: val })
            }
            _ => None,
        }
    }
}

/// Owns the flat backing buffer. Layout: `[writeHead, readHead,
/// overflowFlag, event0.x, event0.y, event0.type, event0.val, event1.x, …]`.
pub struct InputRing {
    buf: Vec<AtomicI32>,
}

impl InputRing {
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(BUFFER_LEN);
        for _ in 0..BUFFER_LEN {
            buf.push(AtomicI32::new(0));
        }
        Self { buf }
    }

    pub fn buffer_ptr(&self) -> *const i32 {
        self.buf.as_ptr() as *const i32
    }

    pub fn buffer_len(&self) -> usize {
        BUFFER_LEN
    }

    fn write_head(&self) -> usize {
        self.buf[0].load(Ordering::Acquire) as usize
    }

    fn read_head(&self) -> usize {
        self.buf[1].load(Ordering::Acquire) as usize
    }

    fn overflow(&self) -> bool {
        self.buf[2].load(Ordering::Acquire) != 0
    }

    fn slot_offset(idx: usize) -> usize {
        HEADER_INTS + (idx % CAPACITY) * INTS_PER_EVENT
    }

    /// Producer side: returns `false` (and sets the overflow flag) if the
    /// ring is full rather than overwriting unread events.
    pub fn push(&self, event: BrushEvent) -> bool {
        let write = self.write_head();
        let read = self.read_head();
        let next = (write + 1) % CAPACITY;
        if next == read {
            self.buf[2].store(1, Ordering::Release);
            return false;
        }

        let (x, y, kind, val) = event.encode();
        let off = Self::slot_offset(write);
        self.buf[off].store(x, Ordering::Relaxed);
        self.buf[off + 1].store(y, Ordering::Relaxed);
        self.buf[off + 2].store(kind, Ordering::Relaxed);
        self.buf[off + 3].store(val, Ordering::Relaxed);

        self.buf[0].store(next as i32, Ordering::Release);
        true
    }

    /// Consumer side: drains every event published since the last drain,
    /// returning `(events, overflow_occurred)`. `overflow_occurred` tells
    /// the caller (the edit surface) to reset its stroke interpolator
    /// (§4.E consumer contract, P5).
    pub fn drain(&self) -> (Vec<BrushEvent>, bool) {
        let write = self.write_head();
        let mut read = self.read_head();
        let mut events = Vec::new();

        while read != write {
            let off = Self::slot_offset(read);
            let x = self.buf[off].load(Ordering::Relaxed);
            let y = self.buf[off + 1].load(Ordering::Relaxed);
            let kind = self.buf[off + 2].load(Ordering::Relaxed);
            let val = self.buf[off + 3].load(Ordering::Relaxed);
            if let Some(ev) = BrushEvent::decode(x, y, kind, val) {
                events.push(ev);
            }
            read = (read + 1) % CAPACITY;
        }
        self.buf[1].store(read as i32, Ordering::Release);

        let overflowed = self.overflow();
        if overflowed {
            self.buf[2].store(0, Ordering::Release);
        }
        (events, overflowed)
    }
}

impl Default for InputRing {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_brush_event() {
        let ring = InputRing::new();
        assert!(ring.push(BrushEvent::Brush { x: 3, y: 4, element: 2, radius: 5 }));
        let (events, overflow) = ring.drain();
        assert!(!overflow);
        assert_eq!(events, vec![BrushEvent::Brush { x: 3, y: 4, element: 2, radius: 5 }]);
    }

    #[test]
    fn high_element_ids_do_not_collide_with_sentinels() {
        let ring = InputRing::new();
        ring.push(BrushEvent::Brush { x: 0, y: 0, element: 254, radius: 1 });
        ring.push(BrushEvent::Brush { x: 1, y: 0, element: 255, radius: 1 });
        let (events, _) = ring.drain();
        assert_eq!(
            events,
            vec![
                BrushEvent::Brush { x: 0, y: 0, element: 254, radius: 1 },
                BrushEvent::Brush { x: 1, y: 0, element: 255, radius: 1 },
            ]
        );
    }

    #[test]
    fn end_stroke_sentinel_round_trips() {
        let ring = InputRing::new();
        ring.push(BrushEvent::Brush { x: 0, y: 0, element: 1, radius: 1 });
        ring.push(BrushEvent::EndStroke);
        let (events, _) = ring.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], BrushEvent::EndStroke);
    }

    #[test]
    fn filling_the_ring_sets_overflow_and_rejects_further_pushes() {
        let ring = InputRing::new();
        for i in 0..(CAPACITY - 1) {
            assert!(ring.push(BrushEvent::Brush { x: i as i32, y: 0, element: 1, radius: 1 }));
        }
        assert!(!ring.push(BrushEvent::Brush { x: 99, y: 0, element: 1, radius: 1 }));
        let (events, overflow) = ring.drain();
        assert_eq!(events.len(), CAPACITY - 1);
        assert!(overflow);
    }

    #[test]
    fn overflow_flag_clears_after_drain_and_does_not_repeat() {
        let ring = InputRing::new();
        for i in 0..(CAPACITY - 1) {
            ring.push(BrushEvent::Brush { x: i as i32, y: 0, element: 1, radius: 1 });
        }
        ring.push(BrushEvent::Brush { x: 0, y: 0, element: 1, radius: 1 });
        let (_, overflow) = ring.drain();
        assert!(overflow);
        ring.push(BrushEvent::EndStroke);
        let (_, overflow2) = ring.drain();
        assert!(!overflow2);
    }
}
