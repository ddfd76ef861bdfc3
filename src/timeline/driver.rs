use std::cell::RefCell;
use std::rc::{Rc, Weak};
use gloo_timers::callback::Interval;
use serde::Serialize;
use crate::logging::log;
use crate::time::Timestamp;
use super::playback::{PlaybackEngine, PlaybackState};
use super::range::TimeRange;

/// Source of repeating ticks. Dropping the returned handle cancels the timer.
pub trait TickScheduler {
    type Handle: 'static;

    fn every(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> Self::Handle;
}

/// Browser timer backed by `setInterval`
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooScheduler;

impl TickScheduler for GlooScheduler {
    type Handle = Interval;

    fn every(&self, period_ms: u32, mut tick: Box<dyn FnMut()>) -> Interval {
        Interval::new(period_ms, move || tick())
    }
}

/// Snapshot handed to the renderer after every state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackStatus {
    pub state: PlaybackState,
    pub simulated_time: Option<Timestamp>,
    pub is_playing: bool,
    pub generation: u64,
}

type Listener = Rc<dyn Fn(PlaybackStatus)>;

struct DriverState<H> {
    engine: PlaybackEngine,
    ticker: Option<H>,
    generation: u64,
    disposed: bool,
    listener: Option<Listener>,
}

impl<H> DriverState<H> {
    fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            state: self.engine.state(),
            simulated_time: self.engine.simulated_time(),
            is_playing: self.engine.is_playing(),
            generation: self.generation,
        }
    }
}

/// Owns a [`PlaybackEngine`] together with the timer that advances it
///
/// At most one tick handle is held at a time. It is released on pause, reset,
/// when playback finishes, when a range replacement stops the engine, and on
/// dispose/drop. Every tick carries the generation it was scheduled under and
/// is ignored once the driver has moved on.
pub struct PlaybackDriver<S: TickScheduler> {
    scheduler: S,
    period_ms: u32,
    state: Rc<RefCell<DriverState<S::Handle>>>,
}

impl<S: TickScheduler> PlaybackDriver<S> {
    #[must_use]
    pub fn new(scheduler: S, engine: PlaybackEngine, period_ms: u32) -> Self {
        Self {
            scheduler,
            period_ms: period_ms.max(1),
            state: Rc::new(RefCell::new(DriverState {
                engine,
                ticker: None,
                generation: 0,
                disposed: false,
                listener: None,
            })),
        }
    }

    /// Register the callback that receives a status after each change
    pub fn set_listener(&self, listener: impl Fn(PlaybackStatus) + 'static) {
        self.state.borrow_mut().listener = Some(Rc::new(listener));
    }

    #[must_use]
    pub fn status(&self) -> PlaybackStatus {
        self.state.borrow().status()
    }

    #[must_use]
    pub fn range(&self) -> TimeRange {
        self.state.borrow().engine.range()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.state.borrow().disposed
    }

    pub fn start(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.disposed || !state.engine.start() {
                return;
            }
            if state.ticker.is_none() {
                state.ticker = Some(self.schedule(state.generation));
            }
        }
        self.notify();
    }

    pub fn pause(&self) {
        let released = {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                return;
            }
            state.engine.pause();
            state.ticker.take()
        };
        drop(released);
        self.notify();
    }

    pub fn reset(&self) {
        let released = {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                return;
            }
            state.engine.reset();
            state.ticker.take()
        };
        drop(released);
        self.notify();
    }

    pub fn seek(&self, time: Timestamp) {
        {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                return;
            }
            state.engine.seek(time);
        }
        self.notify();
    }

    /// Apply a freshly derived range
    ///
    /// Starts a new generation, so ticks scheduled before the replacement are
    /// ignored. If the engine keeps running, the timer is re-armed under the
    /// new generation.
    pub fn replace_range(&self, range: TimeRange) {
        let released = {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                return;
            }
            state.generation += 1;
            state.engine.replace_range(range);
            let released = state.ticker.take();
            if state.engine.is_playing() {
                state.ticker = Some(self.schedule(state.generation));
            }
            log!("Playback range replaced, generation {}", state.generation);
            released
        };
        drop(released);
        self.notify();
    }

    /// Stop all future ticks for good. Controls become no-ops afterwards.
    pub fn dispose(&self) {
        let released = match self.state.try_borrow_mut() {
            Ok(mut state) => {
                state.disposed = true;
                state.generation += 1;
                state.listener = None;
                state.ticker.take()
            }
            Err(_) => None,
        };
        drop(released);
    }

    fn schedule(&self, generation: u64) -> S::Handle {
        let weak = Rc::downgrade(&self.state);
        self.scheduler
            .every(self.period_ms, Box::new(move || on_tick(&weak, generation)))
    }

    fn notify(&self) {
        let (status, listener) = {
            let state = self.state.borrow();
            (state.status(), state.listener.clone())
        };
        if let Some(listener) = listener {
            listener(status);
        }
    }
}

impl<S: TickScheduler> Drop for PlaybackDriver<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn on_tick<H>(state: &Weak<RefCell<DriverState<H>>>, generation: u64) {
    let Some(state) = state.upgrade() else {
        return;
    };

    let (status, listener, released) = {
        let Ok(mut guard) = state.try_borrow_mut() else {
            return;
        };
        if guard.disposed || guard.generation != generation {
            return;
        }
        guard.engine.tick();
        let released = if guard.engine.is_playing() {
            None
        } else {
            log!("Playback finished at {:?}", guard.engine.simulated_time());
            guard.ticker.take()
        };
        (guard.status(), guard.listener.clone(), released)
    };

    drop(released);
    if let Some(listener) = listener {
        listener(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use crate::timeline::playback::FinishedPolicy;

    const START: Timestamp = 1_757_505_600_000;

    type Callback = Rc<RefCell<Box<dyn FnMut()>>>;

    /// Scheduler whose ticks are fired by hand
    #[derive(Clone, Default)]
    struct ManualScheduler {
        timers: Rc<RefCell<Vec<(Rc<Cell<bool>>, Callback)>>>,
    }

    struct ManualHandle(Rc<Cell<bool>>);

    impl Drop for ManualHandle {
        fn drop(&mut self) {
            self.0.set(false);
        }
    }

    impl TickScheduler for ManualScheduler {
        type Handle = ManualHandle;

        fn every(&self, _period_ms: u32, tick: Box<dyn FnMut()>) -> ManualHandle {
            let active = Rc::new(Cell::new(true));
            self.timers
                .borrow_mut()
                .push((Rc::clone(&active), Rc::new(RefCell::new(tick))));
            ManualHandle(active)
        }
    }

    impl ManualScheduler {
        fn callbacks(&self, include_cancelled: bool) -> Vec<Callback> {
            self.timers
                .borrow()
                .iter()
                .filter(|(active, _)| include_cancelled || active.get())
                .map(|(_, tick)| Rc::clone(tick))
                .collect()
        }

        fn fire(&self) {
            for tick in self.callbacks(false) {
                (tick.borrow_mut())();
            }
        }

        /// Fire every callback ever scheduled, as a late timer would
        fn fire_stale(&self) {
            for tick in self.callbacks(true) {
                (tick.borrow_mut())();
            }
        }

        fn active(&self) -> usize {
            self.timers.borrow().iter().filter(|(active, _)| active.get()).count()
        }
    }

    fn driver(end_offset: i64) -> (PlaybackDriver<ManualScheduler>, ManualScheduler) {
        let scheduler = ManualScheduler::default();
        let range = TimeRange { start: START, end: START + end_offset };
        let engine = PlaybackEngine::new(range, 1000, FinishedPolicy::Restart);
        (PlaybackDriver::new(scheduler.clone(), engine, 1000), scheduler)
    }

    #[test]
    fn test_start_schedules_single_timer() {
        let (driver, scheduler) = driver(10_000);
        driver.start();
        driver.start();
        assert_eq!(scheduler.active(), 1);
        assert!(driver.status().is_playing);
    }

    #[test]
    fn test_ticks_advance_engine() {
        let (driver, scheduler) = driver(10_000);
        driver.start();
        scheduler.fire();
        scheduler.fire();
        assert_eq!(driver.status().simulated_time, Some(START + 2000));
    }

    #[test]
    fn test_pause_cancels_timer_and_keeps_cursor() {
        let (driver, scheduler) = driver(10_000);
        driver.start();
        scheduler.fire();
        driver.pause();
        assert_eq!(scheduler.active(), 0);

        scheduler.fire_stale();
        assert_eq!(driver.status().simulated_time, Some(START + 1000));
        assert_eq!(driver.status().state, PlaybackState::Stopped);
    }

    #[test]
    fn test_finishing_releases_timer() {
        let (driver, scheduler) = driver(1500);
        driver.start();
        scheduler.fire();
        scheduler.fire();

        let status = driver.status();
        assert_eq!(status.state, PlaybackState::Finished);
        assert!(!status.is_playing);
        assert_eq!(status.simulated_time, Some(START + 1500));
        assert_eq!(scheduler.active(), 0);

        // Late ticks from the released timer leave the finished engine alone
        for _ in 0..5 {
            scheduler.fire_stale();
        }
        let status = driver.status();
        assert_eq!(status.state, PlaybackState::Finished);
        assert!(!status.is_playing);
        assert_eq!(status.simulated_time, Some(START + 1500));
    }

    #[test]
    fn test_replace_range_ignores_old_ticks() {
        let (driver, scheduler) = driver(60_000);
        driver.start();
        scheduler.fire();

        let wider = TimeRange { start: START, end: START + 120_000 };
        driver.replace_range(wider);
        assert_eq!(driver.range(), wider);
        assert_eq!(scheduler.active(), 1);

        // The pre-replacement callback must not advance the engine
        let stale = scheduler.callbacks(true)[0].clone();
        (stale.borrow_mut())();
        assert_eq!(driver.status().simulated_time, Some(START + 1000));

        scheduler.fire();
        assert_eq!(driver.status().simulated_time, Some(START + 2000));
    }

    #[test]
    fn test_replace_range_reset_stops_timer() {
        let (driver, scheduler) = driver(60_000);
        driver.start();
        scheduler.fire();

        driver.replace_range(TimeRange { start: START + 30_000, end: START + 90_000 });
        assert_eq!(scheduler.active(), 0);
        assert_eq!(driver.status().simulated_time, None);

        scheduler.fire_stale();
        assert_eq!(driver.status().simulated_time, None);
    }

    #[test]
    fn test_dispose_blocks_ticks_and_controls() {
        let (driver, scheduler) = driver(60_000);
        driver.start();
        driver.dispose();
        assert!(driver.is_disposed());
        assert_eq!(scheduler.active(), 0);

        scheduler.fire_stale();
        assert_eq!(driver.status().simulated_time, Some(START));

        driver.start();
        assert_eq!(scheduler.active(), 0);
    }

    #[test]
    fn test_drop_cancels_timer() {
        let (driver, scheduler) = driver(60_000);
        driver.start();
        drop(driver);
        assert_eq!(scheduler.active(), 0);

        // The tick closure only holds a weak reference, so this is a no-op
        scheduler.fire_stale();
    }

    #[test]
    fn test_listener_receives_every_change() {
        let (driver, scheduler) = driver(1500);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        driver.set_listener(move |status| sink.borrow_mut().push(status.simulated_time));

        driver.start();
        scheduler.fire();
        scheduler.fire();

        assert_eq!(
            *seen.borrow(),
            vec![Some(START), Some(START + 1000), Some(START + 1500)]
        );
    }

    #[test]
    fn test_listener_may_call_back_into_driver() {
        let (driver, scheduler) = driver(10_000);
        let driver = Rc::new(driver);
        let weak = Rc::downgrade(&driver);
        driver.set_listener(move |status| {
            if status.is_playing && status.simulated_time == Some(START + 2000) {
                if let Some(driver) = weak.upgrade() {
                    driver.pause();
                }
            }
        });

        driver.start();
        scheduler.fire();
        scheduler.fire();
        assert_eq!(driver.status().state, PlaybackState::Stopped);
        assert_eq!(scheduler.active(), 0);
    }

    #[test]
    fn test_seek_moves_cursor_without_timer() {
        let (driver, scheduler) = driver(10_000);
        driver.seek(START + 4000);
        assert_eq!(driver.status().simulated_time, Some(START + 4000));
        assert_eq!(scheduler.active(), 0);

        driver.reset();
        assert_eq!(driver.status().simulated_time, None);
    }
}
