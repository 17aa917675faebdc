use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Everything the game loop reacts to: a keypress, a terminal resize, or a
/// tick carrying the game time that has passed since the previous tick.
#[derive(Clone, Debug)]
pub enum LoopEvent {
    Key(KeyEvent),
    Resize,
    Tick(Duration),
}

/// Source of terminal events. Swapped out for a channel-backed fake in the
/// headless tests.
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event; Err(Timeout) means
    /// nothing arrived.
    fn recv_timeout(&self, timeout: Duration) -> Result<LoopEvent, RecvTimeoutError>;
}

/// Production source reading crossterm events on a background thread.
pub struct CrosstermEventSource {
    rx: Receiver<LoopEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    // Only presses count; repeats and releases would turn
                    // one keystroke into several answers.
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if tx.send(LoopEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(LoopEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<LoopEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Clock behind the tick stream: how long the runner waits for input before
/// synthesizing a tick, and how much game time that tick carries. The reward
/// chains live on these ticks, so the interval bounds the timer jitter.
pub trait Ticker: Send + 'static {
    fn interval(&self) -> Duration;

    /// Game time stamped onto the next tick. Called once per tick.
    fn elapsed(&mut self) -> Duration;
}

/// Wall-clock ticker: each tick carries the real time since the previous
/// one, so scheduled actions stay on schedule however late a tick fires.
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
    last_tick: Instant,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: Instant::now(),
        }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }

    fn elapsed(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now - self.last_tick;
        self.last_tick = now;
        dt
    }
}

/// Ticker that stamps the same fixed game-time step on every tick regardless
/// of wall time, so timed chains that take seconds on screen resolve in
/// milliseconds under test.
#[derive(Clone, Copy, Debug)]
pub struct SteppedTicker {
    interval: Duration,
    step: Duration,
}

impl SteppedTicker {
    pub fn new(interval: Duration, step: Duration) -> Self {
        Self { interval, step }
    }
}

impl Ticker for SteppedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }

    fn elapsed(&mut self) -> Duration {
        self.step
    }
}

/// Channel-fed source for driving the game without a terminal.
pub struct TestEventSource {
    rx: Receiver<LoopEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<LoopEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<LoopEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the game one event at a time.
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to one tick interval and returns the next event. A quiet
    /// interval becomes a tick already stamped with the ticker's elapsed
    /// time, so the loop feeds it straight into the game clock.
    pub fn step(&mut self) -> LoopEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                LoopEvent::Tick(self.ticker.elapsed())
            }
        }
    }
}
