//! Periodic recomputation of the terminator polygon.
//!
//! The host owns one "current polygon" and replaces it wholesale whenever the
//! refresh interval has elapsed. Time comes from a [`Clock`], so tests can
//! drive the schedule with an injected instant instead of the wall clock.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use aether_astro::UtcInstant;

use crate::error::TerminatorError;
use crate::polygon::{TerminatorOptions, TerminatorPolygon, build_terminator_polygon};

/// Interval between recomputations when nothing else is configured.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Upper bound on a single sleep in [`run_blocking`], so the stop flag is
/// noticed promptly.
const MAX_SLEEP: Duration = Duration::from_secs(1);

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> UtcInstant;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UtcInstant {
        UtcInstant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<UtcInstant>,
}

impl FixedClock {
    pub fn new(now: UtcInstant) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: UtcInstant) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) -> Result<(), TerminatorError> {
        let next = self.now.get().offset_seconds(by.as_secs_f64())?;
        self.now.set(next);
        Ok(())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> UtcInstant {
        self.now.get()
    }
}

/// How often the polygon is recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    pub interval: Duration,
}

impl Default for RefreshSchedule {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

/// Result of a [`TerminatorRefresher::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new polygon replaced the previous one.
    Updated,
    /// The interval has not elapsed yet.
    Unchanged,
}

/// Owns the latest terminator polygon and recomputes it on schedule.
pub struct TerminatorRefresher<C: Clock> {
    clock: C,
    options: TerminatorOptions,
    schedule: RefreshSchedule,
    current: Option<TerminatorPolygon>,
    updates: u64,
}

impl<C: Clock> TerminatorRefresher<C> {
    pub fn new(
        clock: C,
        options: TerminatorOptions,
        schedule: RefreshSchedule,
    ) -> Result<Self, TerminatorError> {
        options.validate()?;
        Ok(Self {
            clock,
            options,
            schedule,
            current: None,
            updates: 0,
        })
    }

    /// Recompute if nothing has been computed yet, the interval has elapsed,
    /// or the clock went backwards.
    pub fn poll(&mut self) -> Result<RefreshOutcome, TerminatorError> {
        let now = self.clock.now();
        if !self.is_due(now) {
            return Ok(RefreshOutcome::Unchanged);
        }
        self.recompute(now)?;
        Ok(RefreshOutcome::Updated)
    }

    /// Recompute unconditionally.
    pub fn force_refresh(&mut self) -> Result<&TerminatorPolygon, TerminatorError> {
        let now = self.clock.now();
        self.recompute(now)
    }

    fn recompute(&mut self, now: UtcInstant) -> Result<&TerminatorPolygon, TerminatorError> {
        let polygon = build_terminator_polygon(now, &self.options)?;
        self.updates += 1;
        log::debug!("terminator refresh #{} at {now}", self.updates);
        let polygon: &TerminatorPolygon = self.current.insert(polygon);
        Ok(polygon)
    }

    /// Time since the current polygon was computed. `None` when there is no
    /// polygon yet or the clock moved backwards.
    fn elapsed(&self, now: UtcInstant) -> Option<Duration> {
        let polygon = self.current.as_ref()?;
        (now.datetime() - polygon.instant.datetime()).to_std().ok()
    }

    fn is_due(&self, now: UtcInstant) -> bool {
        match self.elapsed(now) {
            None => true,
            Some(elapsed) => elapsed >= self.schedule.interval,
        }
    }

    /// Time left until the next poll would recompute. Zero when already due.
    pub fn time_until_due(&self) -> Duration {
        match self.elapsed(self.clock.now()) {
            None => Duration::ZERO,
            Some(elapsed) => self.schedule.interval.saturating_sub(elapsed),
        }
    }

    pub fn current(&self) -> Option<&TerminatorPolygon> {
        self.current.as_ref()
    }

    /// Number of polygons computed so far.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn schedule(&self) -> RefreshSchedule {
        self.schedule
    }

    pub fn options(&self) -> TerminatorOptions {
        self.options
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

/// Drive `refresher` on the calling thread until `stop` is set or
/// `max_ticks` polygons have been produced. Returns the number produced.
///
/// `on_update` sees every new polygon exactly once.
pub fn run_blocking<C: Clock>(
    refresher: &mut TerminatorRefresher<C>,
    stop: &AtomicBool,
    max_ticks: Option<u64>,
    mut on_update: impl FnMut(&TerminatorPolygon),
) -> Result<u64, TerminatorError> {
    let mut ticks = 0u64;

    while !stop.load(Ordering::Relaxed) {
        if refresher.poll()? == RefreshOutcome::Updated {
            if let Some(polygon) = refresher.current() {
                on_update(polygon);
            }
            ticks += 1;
            if max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }
        }
        std::thread::sleep(refresher.time_until_due().min(MAX_SLEEP));
    }

    Ok(ticks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> UtcInstant {
        UtcInstant::parse("2024-06-21T00:00:00Z").unwrap()
    }

    fn refresher(clock: FixedClock) -> TerminatorRefresher<FixedClock> {
        TerminatorRefresher::new(clock, TerminatorOptions::default(), RefreshSchedule::default())
            .unwrap()
    }

    #[test]
    fn test_first_poll_computes() {
        let mut r = refresher(FixedClock::new(start()));
        assert!(r.current().is_none());
        assert_eq!(r.poll().unwrap(), RefreshOutcome::Updated);
        assert_eq!(r.current().unwrap().instant, start());
        assert_eq!(r.updates(), 1);
    }

    #[test]
    fn test_poll_waits_for_interval() {
        let mut r = refresher(FixedClock::new(start()));
        r.poll().unwrap();

        r.clock().advance(Duration::from_secs(59)).unwrap();
        assert_eq!(r.poll().unwrap(), RefreshOutcome::Unchanged);
        assert_eq!(r.current().unwrap().instant, start());

        r.clock().advance(Duration::from_secs(1)).unwrap();
        assert_eq!(r.poll().unwrap(), RefreshOutcome::Updated);
        assert_eq!(r.updates(), 2);
    }

    #[test]
    fn test_new_polygon_replaces_previous() {
        let mut r = refresher(FixedClock::new(start()));
        r.poll().unwrap();
        let first = r.current().unwrap().clone();

        r.clock().advance(Duration::from_secs(3600)).unwrap();
        r.poll().unwrap();
        let second = r.current().unwrap();
        assert_ne!(first.instant, second.instant);
        assert_ne!(first.samples, second.samples);
    }

    #[test]
    fn test_clock_going_backwards_recomputes() {
        let mut r = refresher(FixedClock::new(start()));
        r.poll().unwrap();
        r.clock().set(start().offset_seconds(-5.0).unwrap());
        assert_eq!(r.poll().unwrap(), RefreshOutcome::Updated);
    }

    #[test]
    fn test_force_refresh_ignores_schedule() {
        let mut r = refresher(FixedClock::new(start()));
        r.poll().unwrap();
        r.force_refresh().unwrap();
        assert_eq!(r.updates(), 2);
    }

    #[test]
    fn test_time_until_due() {
        let mut r = refresher(FixedClock::new(start()));
        assert_eq!(r.time_until_due(), Duration::ZERO);
        r.poll().unwrap();
        r.clock().advance(Duration::from_secs(45)).unwrap();
        let left = r.time_until_due();
        assert!(
            (left.as_secs_f64() - 15.0).abs() < 1e-3,
            "expected ~15s, got {left:?}"
        );
    }

    #[test]
    fn test_time_until_due_with_huge_interval() {
        let schedule = RefreshSchedule {
            interval: Duration::from_secs(u64::MAX),
        };
        let clock = FixedClock::new(start());
        let mut r = TerminatorRefresher::new(clock, TerminatorOptions::default(), schedule).unwrap();
        r.poll().unwrap();
        assert_eq!(r.time_until_due(), Duration::from_secs(u64::MAX));

        r.clock().advance(Duration::from_secs(3600)).unwrap();
        assert_eq!(r.poll().unwrap(), RefreshOutcome::Unchanged);
        assert_eq!(
            r.time_until_due(),
            Duration::from_secs(u64::MAX) - Duration::from_secs(3600)
        );
    }

    #[test]
    fn test_time_until_due_after_clock_goes_backwards() {
        let mut r = refresher(FixedClock::new(start()));
        r.poll().unwrap();
        r.clock().set(start().offset_seconds(-10.0).unwrap());
        assert_eq!(r.time_until_due(), Duration::ZERO);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let result = TerminatorRefresher::new(
            FixedClock::new(start()),
            TerminatorOptions::with_resolution(0),
            RefreshSchedule::default(),
        );
        assert!(matches!(result, Err(TerminatorError::InvalidResolution(0))));
    }

    #[test]
    fn test_run_blocking_stops_after_max_ticks() {
        let mut r = TerminatorRefresher::new(
            SystemClock,
            TerminatorOptions::with_resolution(1),
            RefreshSchedule {
                interval: Duration::from_millis(5),
            },
        )
        .unwrap();
        let stop = AtomicBool::new(false);
        let mut seen = Vec::new();
        let ticks = run_blocking(&mut r, &stop, Some(3), |p| seen.push(p.instant)).unwrap();
        assert_eq!(ticks, 3);
        assert_eq!(seen.len(), 3);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_run_blocking_honors_stop_flag() {
        let mut r = refresher(FixedClock::new(start()));
        let stop = AtomicBool::new(true);
        let ticks = run_blocking(&mut r, &stop, None, |_| {}).unwrap();
        assert_eq!(ticks, 0);
        assert!(r.current().is_none());
    }
}
