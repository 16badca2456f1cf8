use super::{Clock, SystemClock};

/// Frame pacer.
///
/// Measures how long the previous frame kept the loop busy, sleeps away the rest
/// of the frame budget, and reports the real elapsed time as delta-time.
///
/// All stored values are in microseconds. A clock that jumps backwards (reset or
/// wraparound) is treated as a new baseline: busy time and delta-time read as zero
/// for that frame.
#[derive(Debug, Clone)]
pub struct FpsControl<C: Clock = SystemClock> {
    clock: C,
    last_time: u64,
    busy_time: u64,
    sleep_time: u64,
}

impl FpsControl<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for FpsControl<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FpsControl<C> {
    /// Creates a pacer driven by `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            last_time: 0,
            busy_time: 0,
            sleep_time: 0,
        }
    }

    /// Re-baselines the frame timestamp.
    ///
    /// Call before entering a render loop so the first frame does not account
    /// for time spent outside of it.
    pub fn reset(&mut self) {
        self.last_time = self.clock.now_us();
    }

    /// Paces the current frame to `fps_limit` and returns the delta-time in seconds.
    ///
    /// Limits below 1 fps are treated as 1 fps.
    pub fn limit(&mut self, fps_limit: f32) -> f32 {
        let frametime_min = (1_000_000.0 / fps_limit.max(1.0)) as u64;

        let now = self.clock.now_us();
        self.busy_time = now.saturating_sub(self.last_time);

        if self.busy_time < frametime_min {
            self.sleep_time = frametime_min - self.busy_time;
            self.clock.sleep_us(self.sleep_time);
        } else {
            self.sleep_time = 0;
        }

        // Read the clock again: actual sleep duration is not guaranteed.
        let now = self.clock.now_us();
        let dtime = now.saturating_sub(self.last_time) as f32 / 1_000_000.0;

        self.last_time = now;
        dtime
    }

    /// Busy time of the last paced frame in milliseconds.
    #[inline]
    pub fn busy_ms(&self) -> u64 {
        self.busy_time / 1000
    }

    #[inline]
    pub fn busy_us(&self) -> u64 {
        self.busy_time
    }

    #[inline]
    pub fn sleep_us(&self) -> u64 {
        self.sleep_time
    }

    #[inline]
    pub fn last_time_us(&self) -> u64 {
        self.last_time
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Manually advanced clock; sleeping advances time exactly.
    #[derive(Default)]
    struct FakeClock {
        now: Cell<u64>,
        slept: Cell<u64>,
    }

    impl FakeClock {
        fn at(us: u64) -> Self {
            let c = Self::default();
            c.now.set(us);
            c
        }

        fn advance(&self, us: u64) {
            self.now.set(self.now.get() + us);
        }

        fn set(&self, us: u64) {
            self.now.set(us);
        }
    }

    impl Clock for FakeClock {
        fn now_us(&self) -> u64 {
            self.now.get()
        }

        fn sleep_us(&self, us: u64) {
            self.slept.set(self.slept.get() + us);
            self.advance(us);
        }
    }

    fn pacer_at(us: u64) -> FpsControl<FakeClock> {
        let mut fps = FpsControl::with_clock(FakeClock::at(us));
        fps.reset();
        fps
    }

    // ── pacing ────────────────────────────────────────────────────────────

    #[test]
    fn reset_rebaselines_timestamp() {
        let fps = pacer_at(42_000);
        assert_eq!(fps.last_time_us(), 42_000);
    }

    #[test]
    fn sleeps_remaining_frame_budget() {
        let mut fps = pacer_at(1_000);
        fps.clock().advance(4_000);

        let dtime = fps.limit(100.0);

        assert_eq!(fps.busy_us(), 4_000);
        assert_eq!(fps.sleep_us(), 6_000);
        assert_eq!(fps.clock().slept.get(), 6_000);
        assert!((dtime - 0.01).abs() < 1e-6);
    }

    #[test]
    fn over_budget_frame_does_not_sleep() {
        let mut fps = pacer_at(0);
        fps.clock().advance(50_000);

        let dtime = fps.limit(60.0);

        assert_eq!(fps.sleep_us(), 0);
        assert_eq!(fps.clock().slept.get(), 0);
        assert_eq!(fps.busy_ms(), 50);
        assert!((dtime - 0.05).abs() < 1e-6);
    }

    #[test]
    fn consecutive_frames_use_previous_timestamp() {
        let mut fps = pacer_at(0);
        fps.clock().advance(20_000);
        fps.limit(30.0);
        let after_first = fps.last_time_us();

        fps.clock().advance(40_000);
        let dtime = fps.limit(30.0);

        assert_eq!(fps.busy_us(), 40_000);
        assert_eq!(fps.last_time_us(), after_first + 40_000);
        assert!((dtime - 0.04).abs() < 1e-6);
    }

    #[test]
    fn limit_below_one_fps_is_clamped() {
        let mut fps = pacer_at(0);
        fps.limit(0.0);
        assert_eq!(fps.sleep_us(), 1_000_000);

        fps.limit(-30.0);
        assert_eq!(fps.sleep_us(), 1_000_000);
    }

    // ── clock jumps ───────────────────────────────────────────────────────

    #[test]
    fn clock_going_backwards_reports_zero_busy_time() {
        let mut fps = pacer_at(1_000_000);
        fps.clock().set(10);

        fps.limit(1000.0);

        assert_eq!(fps.busy_us(), 0);
        assert_eq!(fps.sleep_us(), 1_000);
    }

    #[test]
    fn clock_wrap_yields_zero_dtime_and_new_baseline() {
        let mut fps = pacer_at(5_000_000);
        fps.clock().set(0);

        let dtime = fps.limit(1000.0);
        assert_eq!(dtime, 0.0);
        assert_eq!(fps.last_time_us(), 1_000);

        fps.clock().advance(500);
        let dtime = fps.limit(1000.0);
        assert!(dtime > 0.0);
    }

    #[test]
    fn never_reports_negative_values() {
        let mut fps = pacer_at(0);
        let jumps: [i64; 6] = [3_000, -2_000, 70_000, -500_000, 16_000, 0];

        for jump in jumps {
            let now = fps.clock().now_us() as i64;
            fps.clock().set((now + jump).max(0) as u64);
            let dtime = fps.limit(60.0);
            assert!(dtime >= 0.0);
            assert!(fps.busy_us() < u64::MAX / 2);
            assert!(fps.sleep_us() <= 1_000_000 / 60 + 1);
        }
    }
}
