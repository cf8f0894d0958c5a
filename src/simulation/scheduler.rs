//! Discrete-event scheduler
//!
//! Single-threaded cooperative process model. Every process is a small state
//! machine that is resumed by the scheduler, mutates the shared state it is
//! handed, and then either asks to be resumed after a delay or finishes.
//! Only one process runs at a time, so shared state needs no locking.
//!
//! Pending resumptions are ordered by `(time, sequence)`. The sequence number
//! grows with every scheduling request, so two resumptions due at the same
//! instant run in the order they were requested.

use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use super::types::SimTime;

/// What a process wants after being resumed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Resume again after this many seconds
    Timeout(SimTime),
    /// The process is finished and is dropped
    Done,
}

/// A cooperatively scheduled process operating on shared state `S`
pub trait Process<S> {
    fn resume(&mut self, ctx: &mut Context<'_, S>) -> Step;
}

/// Handle given to a process while it runs
pub struct Context<'a, S> {
    now: SimTime,
    pub state: &'a mut S,
    spawned: &'a mut VecDeque<Box<dyn Process<S>>>,
}

impl<S> Context<'_, S> {
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Register a new process. It starts at the current instant, right after
    /// the calling process suspends.
    pub fn spawn(&mut self, process: impl Process<S> + 'static) {
        self.spawned.push_back(Box::new(process));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Resumption {
    time: OrderedFloat<SimTime>,
    sequence: u64,
    process: ProcessId,
}

impl Ord for Resumption {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the BinaryHeap pops the earliest (time, sequence) first.
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Resumption {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Virtual clock plus the queue of suspended processes
pub struct Scheduler<S> {
    now: SimTime,
    next_sequence: u64,
    queue: BinaryHeap<Resumption>,
    processes: Vec<Option<Box<dyn Process<S>>>>,
    free_slots: Vec<usize>,
    spawned: VecDeque<Box<dyn Process<S>>>,
}

impl<S> Scheduler<S> {
    pub fn new(start_time: SimTime) -> Self {
        Self {
            now: start_time,
            next_sequence: 0,
            queue: BinaryHeap::new(),
            processes: Vec::new(),
            free_slots: Vec::new(),
            spawned: VecDeque::new(),
        }
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Number of resumptions waiting in the queue
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of processes that have not finished yet
    pub fn live_processes(&self) -> usize {
        self.processes.iter().filter(|p| p.is_some()).count()
    }

    /// Register a process and run it up to its first suspension now
    pub fn spawn(&mut self, state: &mut S, process: impl Process<S> + 'static) {
        self.spawned.push_back(Box::new(process));
        self.start_spawned(state);
    }

    /// Resume processes in `(time, sequence)` order until the next resumption
    /// lies beyond `until`. Resumptions due exactly at `until` still run;
    /// anything later stays suspended. Schedulers with an exclusive `until`
    /// would leave those boundary resumptions pending instead.
    pub fn run(&mut self, state: &mut S, until: SimTime) {
        while self
            .queue
            .peek()
            .is_some_and(|next| next.time.into_inner() <= until)
        {
            let Some(next) = self.queue.pop() else {
                break;
            };
            self.now = next.time.into_inner();
            self.resume(next.process, state);
            self.start_spawned(state);
        }

        if until > self.now {
            self.now = until;
        }
    }

    fn start_spawned(&mut self, state: &mut S) {
        while let Some(process) = self.spawned.pop_front() {
            let id = match self.free_slots.pop() {
                Some(slot) => {
                    self.processes[slot] = Some(process);
                    ProcessId(slot)
                }
                None => {
                    self.processes.push(Some(process));
                    ProcessId(self.processes.len() - 1)
                }
            };
            self.resume(id, state);
        }
    }

    fn resume(&mut self, id: ProcessId, state: &mut S) {
        let Some(mut process) = self.processes[id.0].take() else {
            debug_assert!(false, "resumed a finished process");
            return;
        };

        let mut ctx = Context {
            now: self.now,
            state,
            spawned: &mut self.spawned,
        };

        match process.resume(&mut ctx) {
            Step::Timeout(delay) => {
                self.processes[id.0] = Some(process);
                self.schedule(id, delay);
            }
            Step::Done => self.free_slots.push(id.0),
        }
    }

    fn schedule(&mut self, process: ProcessId, delay: SimTime) {
        debug_assert!(
            delay.is_finite() && delay >= 0.0,
            "timeout must be a finite, non-negative delay, got {delay}"
        );
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queue.push(Resumption {
            time: OrderedFloat(self.now + delay),
            sequence,
            process,
        });
    }
}
