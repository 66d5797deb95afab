use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Process-local I/O and execution counters, conceptually borrowed by every
/// reader/writer/executor that touches a single join or conversion run.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub block_reads: usize,
    pub block_writes: usize,
    pub output_records: usize,
    pub elapsed_time: Duration,
    pub memory_usage: usize,
}

/// Shared handle to a `Statistics` block. Single-threaded cooperative
/// execution (spec.md §5) makes `Rc<RefCell<..>>` the right tool here — no
/// reader or writer ever touches it from more than one thread, so the
/// atomics and locking of `Arc<Mutex<..>>` would be pure overhead.
pub type SharedStats = Rc<RefCell<Statistics>>;

pub fn new_shared_stats() -> SharedStats {
    Rc::new(RefCell::new(Statistics::default()))
}
