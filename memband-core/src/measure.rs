//! Wall-Clock Timing
//!
//! Brackets a timed transfer with a monotonic timestamp and, where the
//! platform has one, a raw cycle counter read (RDTSCP on x86_64,
//! CNTVCT_EL0 on AArch64).

use std::time::Duration;

/// Read the CPU cycle/tick counter (platform-specific).
#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn read_cycles() -> u64 {
    // SAFETY: RDTSCP is available on all x86_64 CPUs since ~2006 and waits
    // for prior instructions to retire before reading the counter.
    unsafe {
        let mut _aux: u32 = 0;
        std::arch::x86_64::__rdtscp(&mut _aux)
    }
}

/// Read the virtual counter timer on AArch64.
#[cfg(target_arch = "aarch64")]
#[inline(always)]
fn read_cycles() -> u64 {
    let cnt: u64;
    // SAFETY: CNTVCT_EL0 is readable from EL0 on all AArch64 implementations.
    unsafe {
        std::arch::asm!("mrs {}, cntvct_el0", out(reg) cnt, options(nostack, nomem));
    }
    cnt
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline(always)]
fn read_cycles() -> u64 {
    0
}

/// Whether this platform provides real cycle counters.
pub const HAS_CYCLE_COUNTER: bool = cfg!(target_arch = "x86_64") || cfg!(target_arch = "aarch64");

/// One elapsed-time sample produced by a single timed transfer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Elapsed wall-clock seconds, truncated to microsecond resolution
    pub seconds: f64,
    /// Counter ticks across the same span (0 without a cycle counter)
    pub cycles: u64,
}

impl Measurement {
    /// Build a measurement from a raw duration, truncating to whole microseconds.
    pub fn from_elapsed(elapsed: Duration, cycles: u64) -> Self {
        Self {
            seconds: elapsed.as_micros() as f64 / 1_000_000.0,
            cycles,
        }
    }
}

/// Timer bracketing exactly one transfer
pub struct Timer {
    start: std::time::Instant,
    cycles_start: u64,
}

impl Timer {
    /// Capture the start timestamp
    #[inline(always)]
    pub fn start() -> Self {
        let cycles_start = read_cycles();
        Self {
            start: std::time::Instant::now(),
            cycles_start,
        }
    }

    /// Capture the end timestamp and return the sample
    #[inline(always)]
    pub fn stop(self) -> Measurement {
        let elapsed = self.start.elapsed();
        let cycles = read_cycles().saturating_sub(self.cycles_start);
        Measurement::from_elapsed(elapsed, cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer() {
        let timer = Timer::start();
        std::thread::sleep(Duration::from_millis(10));
        let m = timer.stop();

        assert!(m.seconds >= 0.005);
        assert!(m.seconds < 1.0);
    }

    #[test]
    fn test_microsecond_truncation() {
        let m = Measurement::from_elapsed(Duration::from_nanos(1_234_567_891), 0);
        assert_eq!(m.seconds, 1.234567);

        let m = Measurement::from_elapsed(Duration::from_nanos(999), 0);
        assert_eq!(m.seconds, 0.0);
    }

    #[test]
    fn test_cycle_counter() {
        if HAS_CYCLE_COUNTER {
            let a = read_cycles();
            let b = read_cycles();
            assert!(b >= a, "cycle counter should be monotonic");
        }
    }
}
