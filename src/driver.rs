//! Benchmark driver: the adaptive trial loop and the five measurement modes.
//!
//! All modes share one control algorithm: run trials until the accumulated
//! elapsed time meets a fixed wall-clock budget, then report
//! `size * trials / elapsed` so results are comparable across sizes. They
//! differ only in which phase of a trial sits inside the timed window.

use std::cell::Cell;
use std::fmt;
use std::hint::black_box;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use rand::{Rng, SeedableRng};

use crate::pattern::{AccessPattern, BenchRng};
use crate::signal::{Connection, Subject};
use crate::timer::BenchTimer;

/// The five measurement modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Allocation of a hub plus N subscribers.
    Construction,
    /// Teardown of a hub and N connected subscribers.
    Destruction,
    /// Registering N subscribers to one hub.
    Connection,
    /// One broadcast to N already-connected subscribers.
    Emission,
    /// Connect plus broadcast together, amortized over steady-state cycles.
    Combined,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Construction,
        Mode::Destruction,
        Mode::Connection,
        Mode::Emission,
        Mode::Combined,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Construction => "construction",
            Mode::Destruction => "destruction",
            Mode::Connection => "connection",
            Mode::Emission => "emission",
            Mode::Combined => "combined",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "construction" => Ok(Mode::Construction),
            "destruction" => Ok(Mode::Destruction),
            "connection" => Ok(Mode::Connection),
            "emission" => Ok(Mode::Emission),
            "combined" => Ok(Mode::Combined),
            other => Err(format!(
                "unknown mode '{other}' (expected construction, destruction, \
                 connection, emission or combined)"
            )),
        }
    }
}

/// Running totals for one mode invocation.
///
/// The trial counter starts at one, matching the loop convention that the
/// trial crossing the budget threshold still counts; the metric can then
/// never divide by a zero count even when the very first trial blows the
/// budget.
#[derive(Debug, Clone, Copy)]
pub struct Accumulator {
    trials: u64,
    elapsed: Duration,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            trials: 1,
            elapsed: Duration::ZERO,
        }
    }

    fn record(&mut self, dt: Duration) {
        self.elapsed += dt;
        self.trials += 1;
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Normalized metric: elementary operations per second,
    /// `(n * trials) / elapsed`.
    ///
    /// A size of zero reports 0.0 rather than NaN, and a zero elapsed total
    /// reports 0.0 rather than infinity; the harness is diagnostic, not a
    /// correctness-critical path.
    pub fn throughput(&self, n: usize) -> f64 {
        if n == 0 {
            return 0.0;
        }
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        (n as f64) * (self.trials as f64) / secs
    }
}

/// Phase-isolated trial loop.
///
/// `trial` performs one full setup/measure/teardown cycle and returns the
/// duration of just its measured window. Trials repeat until the accumulated
/// measured time meets `limit`; at least one trial always runs, so a zero
/// budget degenerates to a single-trial measurement.
pub fn run_trials<F>(limit: Duration, mut trial: F) -> Accumulator
where
    F: FnMut() -> Duration,
{
    let mut acc = Accumulator::new();
    loop {
        acc.record(trial());
        if acc.elapsed >= limit {
            break;
        }
    }
    acc
}

/// Continuous trial loop: one timer runs across all trials and is never
/// reset between them, so everything a trial does is attributed to the
/// measured cost. Used by Combined mode.
pub fn run_trials_continuous<F>(limit: Duration, timer: &mut BenchTimer, mut trial: F) -> Accumulator
where
    F: FnMut(),
{
    let mut acc = Accumulator::new();
    timer.restart();
    loop {
        trial();
        acc.trials += 1;
        if timer.elapsed() >= limit {
            break;
        }
    }
    acc.elapsed = timer.elapsed();
    acc
}

/// One subscriber: a bag of connection handles plus a sink its bound handler
/// writes into, keeping the per-notification work observable.
struct Subscriber {
    reg: Vec<Connection<BenchRng>>,
    sink: Rc<Cell<u64>>,
}

impl Subscriber {
    fn new() -> Self {
        Self {
            reg: Vec::new(),
            sink: Rc::new(Cell::new(0)),
        }
    }

    fn connect_to(&mut self, subject: &Subject<BenchRng>) {
        let sink = Rc::clone(&self.sink);
        self.reg.push(subject.connect(move |rng: &mut BenchRng| {
            sink.set(sink.get() ^ black_box(rng.gen::<u64>()));
        }));
    }
}

fn subscriber_set(n: usize) -> Vec<Subscriber> {
    (0..n).map(|_| Subscriber::new()).collect()
}

/// Runs the five modes for one benchmark session (fixed seed and budget).
pub struct Driver {
    rng: BenchRng,
    timer: BenchTimer,
    limit: Duration,
}

impl Driver {
    pub fn new(seed: u64, limit: Duration) -> Self {
        Self {
            rng: BenchRng::seed_from_u64(seed),
            timer: BenchTimer::new(),
            limit,
        }
    }

    pub fn run(&mut self, mode: Mode, n: usize) -> f64 {
        match mode {
            Mode::Construction => self.construction(n),
            Mode::Destruction => self.destruction(n),
            Mode::Connection => self.connection(n),
            Mode::Emission => self.emission(n),
            Mode::Combined => self.combined(n),
        }
    }

    /// Timed region: allocating one hub plus N subscribers. No connections
    /// are made and no access pattern is needed; teardown is untimed.
    pub fn construction(&mut self, n: usize) -> f64 {
        let timer = &mut self.timer;
        let acc = run_trials(self.limit, || {
            timer.restart();
            let subject: Subject<BenchRng> = Subject::new();
            let subscribers = subscriber_set(n);
            let dt = timer.elapsed();
            black_box((subject, subscribers));
            dt
        });
        acc.throughput(n)
    }

    /// Timed region: scope exit of a fully-connected hub and its N
    /// subscribers, including severing the N live connections. Setup runs
    /// outside the window; the pattern is reshuffled every trial.
    pub fn destruction(&mut self, n: usize) -> f64 {
        let limit = self.limit;
        let (rng, timer) = (&mut self.rng, &mut self.timer);
        let mut pattern = AccessPattern::identity(n);

        let acc = run_trials(limit, || {
            pattern.reshuffle(rng);
            {
                let subject: Subject<BenchRng> = Subject::new();
                let mut subscribers = subscriber_set(n);
                for &index in pattern.indices() {
                    subscribers[index].connect_to(&subject);
                }
                timer.restart();
                // subscribers and subject unwind here, inside the window
            }
            timer.elapsed()
        });
        acc.throughput(n)
    }

    /// Timed region: exactly the loop registering N subscribers with one
    /// pre-existing hub, in freshly reshuffled pattern order. Allocation
    /// before and teardown after the window are untimed.
    pub fn connection(&mut self, n: usize) -> f64 {
        let limit = self.limit;
        let (rng, timer) = (&mut self.rng, &mut self.timer);
        let mut pattern = AccessPattern::identity(n);

        let acc = run_trials(limit, || {
            pattern.reshuffle(rng);
            let subject: Subject<BenchRng> = Subject::new();
            let mut subscribers = subscriber_set(n);

            timer.restart();
            for &index in pattern.indices() {
                subscribers[index].connect_to(&subject);
            }
            timer.elapsed()
        });
        acc.throughput(n)
    }

    /// Timed region: one broadcast to N connected subscribers. Emission is
    /// order-independent, but the pattern is still reshuffled per trial so
    /// subscriber layout varies between trials.
    pub fn emission(&mut self, n: usize) -> f64 {
        let limit = self.limit;
        let (rng, timer) = (&mut self.rng, &mut self.timer);
        let mut pattern = AccessPattern::identity(n);

        let acc = run_trials(limit, || {
            pattern.reshuffle(rng);
            let subject: Subject<BenchRng> = Subject::new();
            let mut subscribers = subscriber_set(n);
            for &index in pattern.indices() {
                subscribers[index].connect_to(&subject);
            }

            timer.restart();
            subject.broadcast(rng);
            timer.elapsed()
        });
        acc.throughput(n)
    }

    /// Steady-state connect-plus-broadcast cost. The pattern is shuffled
    /// once up front and reused across trials, and the timer runs
    /// continuously, so the loop carries no shuffle overhead and the trial
    /// crossing the budget still counts.
    pub fn combined(&mut self, n: usize) -> f64 {
        let limit = self.limit;
        let (rng, timer) = (&mut self.rng, &mut self.timer);
        let pattern = AccessPattern::shuffled(n, rng);

        let acc = run_trials_continuous(limit, timer, || {
            let subject: Subject<BenchRng> = Subject::new();
            let mut subscribers = subscriber_set(n);
            for &index in pattern.indices() {
                subscribers[index].connect_to(&subject);
            }
            subject.broadcast(rng);
        });
        acc.throughput(n)
    }
}
