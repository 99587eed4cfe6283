//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (millisecond clock behind the [`Clock`] trait)
//! - Seeding (entropy for runs started without an explicit seed)

/// Source of millisecond timestamps for cooldowns and run timing.
///
/// The simulation never reads time itself; [`crate::Game`] samples its clock
/// once per tick and passes the reading down.
pub trait Clock {
    fn now_ms(&mut self) -> f64;
}

/// Deterministic clock advancing one fixed frame per reading.
///
/// The first reading is 0, then `frame_ms`, `2 * frame_ms` and so on.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_ms: f64,
    frames: u64,
}

impl FrameClock {
    pub fn new(frame_ms: f64) -> Self {
        Self {
            frame_ms,
            frames: 0,
        }
    }
}

impl Clock for FrameClock {
    fn now_ms(&mut self) -> f64 {
        let now = self.frames as f64 * self.frame_ms;
        self.frames += 1;
        now
    }
}

/// Wall clock (milliseconds since construction natively, epoch ms on web)
#[derive(Debug, Clone)]
pub struct SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    origin: std::time::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            origin: std::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    #[cfg(target_arch = "wasm32")]
    fn now_ms(&mut self) -> f64 {
        js_sys::Date::now()
    }
}

/// A seed for runs started without one
#[cfg(target_arch = "wasm32")]
pub fn entropy_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// A seed for runs started without one
#[cfg(not(target_arch = "wasm32"))]
pub fn entropy_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
