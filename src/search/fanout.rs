// src/search/fanout.rs

//! Concurrent fan-out over an element's candidate ingredient pairs
//!
//! Each fan-out point gets its own worker pool. Workers pull one job at a
//! time from a shared queue, resolve it (possibly fanning out again one level
//! down) and push finished items into a bounded results channel. The calling
//! thread collects until the quota is met, then cancels the pool.
//!
//! # Cancellation
//!
//! A [`CancelToken`] is created per fan-out point as a child of the caller's
//! token, so cancelling an outer pool also stops every nested pool below it.
//! Workers check the token before taking a job and before every send.
//!
//! # Thread budget
//!
//! Nested pools would otherwise multiply thread counts with recipe depth.
//! A [`WorkerBudget`] caps live worker threads across a whole search; when
//! it is exhausted a fan-out point runs its jobs inline on the calling
//! thread with the same quota and cancellation behaviour.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use tracing::{debug, trace};

/// Upper bound on buffered results per fan-out point
const RESULT_CHANNEL_CAPACITY: usize = 256;

/// Cooperative cancellation signal, linked to its parent
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    parent: Option<Arc<CancelToken>>,
}

impl CancelToken {
    /// Create a root token
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a token that is also cancelled whenever `self` is
    pub fn child(&self) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            parent: Some(Arc::new(self.clone())),
        }
    }

    /// Signal cancellation to this token and all of its children
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Check this token and every ancestor
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self
                .parent
                .as_ref()
                .is_some_and(|parent| parent.is_cancelled())
    }
}

/// Search-wide cap on live fan-out worker threads
#[derive(Debug)]
pub struct WorkerBudget {
    limit: usize,
    live: AtomicUsize,
    spawned: AtomicUsize,
}

impl WorkerBudget {
    /// Allow at most `limit` worker threads alive at once
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            live: AtomicUsize::new(0),
            spawned: AtomicUsize::new(0),
        }
    }

    /// Reserve up to `wanted` threads; the lease may grant fewer, even zero
    pub fn acquire(&self, wanted: usize) -> BudgetLease<'_> {
        let mut live = self.live.load(Ordering::Relaxed);
        loop {
            let granted = wanted.min(self.limit.saturating_sub(live));
            if granted == 0 {
                return BudgetLease { budget: self, granted: 0 };
            }
            match self.live.compare_exchange_weak(
                live,
                live + granted,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    self.spawned.fetch_add(granted, Ordering::Relaxed);
                    return BudgetLease { budget: self, granted };
                }
                Err(current) => live = current,
            }
        }
    }

    /// Threads currently reserved
    pub fn live(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }

    /// Threads granted over the budget's lifetime
    pub fn spawned(&self) -> usize {
        self.spawned.load(Ordering::Relaxed)
    }
}

/// Reserved worker threads, returned to the budget on drop
#[derive(Debug)]
pub struct BudgetLease<'a> {
    budget: &'a WorkerBudget,
    granted: usize,
}

impl BudgetLease<'_> {
    /// Number of threads this lease allows
    pub fn granted(&self) -> usize {
        self.granted
    }
}

impl Drop for BudgetLease<'_> {
    fn drop(&mut self) {
        if self.granted > 0 {
            self.budget.live.fetch_sub(self.granted, Ordering::AcqRel);
        }
    }
}

enum Sink<'e, T> {
    Channel(flume::Sender<T>),
    Inline { out: &'e Mutex<Vec<T>>, quota: usize },
}

/// Handle workers use to hand finished items to the collector
pub struct Emitter<'e, T> {
    sink: Sink<'e, T>,
    cancel: &'e CancelToken,
}

impl<T> Emitter<'_, T> {
    /// Deliver one item; `false` means stop producing
    pub fn emit(&self, item: T) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        match &self.sink {
            // Fails once the collector has met its quota and dropped the receiver
            Sink::Channel(tx) => tx.send(item).is_ok() && !self.cancel.is_cancelled(),
            Sink::Inline { out, quota } => {
                let mut out = out.lock();
                out.push(item);
                if out.len() >= *quota {
                    self.cancel.cancel();
                    return false;
                }
                true
            }
        }
    }
}

/// Items gathered by one fan-out point
#[derive(Debug)]
pub struct FanOutOutcome<T> {
    pub items: Vec<T>,
    /// An outer pool cancelled this one; `items` is an arbitrary subset
    pub interrupted: bool,
}

/// Runs jobs on a bounded per-call worker pool
#[derive(Debug, Clone, Copy)]
pub struct FanOut<'a> {
    budget: &'a WorkerBudget,
}

impl<'a> FanOut<'a> {
    /// Create a scheduler drawing threads from `budget`
    pub fn new(budget: &'a WorkerBudget) -> Self {
        Self { budget }
    }

    /// Run `work` over `jobs` with up to `pool_size` workers, keeping at most `quota` items
    ///
    /// `work` receives the pool's own cancel token so it can pass it to any
    /// nested fan-out. Item order follows completion order and is not
    /// deterministic when threads are used.
    pub fn run<J, T, F>(
        &self,
        label: &str,
        pool_size: usize,
        jobs: Vec<J>,
        quota: usize,
        parent: &CancelToken,
        work: F,
    ) -> FanOutOutcome<T>
    where
        J: Send,
        T: Send,
        F: Fn(J, &Emitter<'_, T>, &CancelToken) + Sync,
    {
        if quota == 0 || jobs.is_empty() || parent.is_cancelled() {
            return FanOutOutcome {
                items: Vec::new(),
                interrupted: parent.is_cancelled(),
            };
        }

        let token = parent.child();
        let lease = self.budget.acquire(pool_size.min(jobs.len()));

        let items = if lease.granted() == 0 {
            trace!("Worker budget exhausted, resolving {} inline", label);
            Self::run_inline(jobs, quota, &token, &work)
        } else {
            debug!(
                "Fanning out {} over {} pairs with {} workers",
                label,
                jobs.len(),
                lease.granted()
            );
            Self::run_threaded(lease.granted(), jobs, quota, &token, &work)
        };
        drop(lease);

        let interrupted = parent.is_cancelled();
        if interrupted {
            debug!("Fan-out for {} interrupted by an outer cancellation", label);
        }
        FanOutOutcome { items, interrupted }
    }

    fn run_inline<J, T, F>(jobs: Vec<J>, quota: usize, token: &CancelToken, work: &F) -> Vec<T>
    where
        F: Fn(J, &Emitter<'_, T>, &CancelToken),
    {
        let out = Mutex::new(Vec::new());
        let emitter = Emitter {
            sink: Sink::Inline { out: &out, quota },
            cancel: token,
        };
        for job in jobs {
            if token.is_cancelled() {
                break;
            }
            work(job, &emitter, token);
        }
        drop(emitter);
        out.into_inner()
    }

    fn run_threaded<J, T, F>(
        workers: usize,
        jobs: Vec<J>,
        quota: usize,
        token: &CancelToken,
        work: &F,
    ) -> Vec<T>
    where
        J: Send,
        T: Send,
        F: Fn(J, &Emitter<'_, T>, &CancelToken) + Sync,
    {
        let (job_tx, job_rx) = flume::bounded(jobs.len());
        for job in jobs {
            // Capacity equals the job count, so this never blocks
            if job_tx.send(job).is_err() {
                break;
            }
        }
        drop(job_tx);

        let (result_tx, result_rx) = flume::bounded(quota.min(RESULT_CHANNEL_CAPACITY));

        thread::scope(|s| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                s.spawn(move || {
                    let emitter = Emitter {
                        sink: Sink::Channel(result_tx),
                        cancel: token,
                    };
                    while !token.is_cancelled() {
                        // Errors once the queue is drained
                        let Ok(job) = job_rx.recv() else {
                            break;
                        };
                        work(job, &emitter, token);
                    }
                });
            }
            drop(result_tx);

            let mut items = Vec::new();
            for item in result_rx.iter() {
                items.push(item);
                if items.len() >= quota {
                    token.cancel();
                    break;
                }
            }
            // Unblocks any worker still waiting to send
            drop(result_rx);
            items
        })
    }
}
