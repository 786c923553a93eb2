use std::sync::Mutex;

/// Default pool budget in bytes, sized for typical small JSON/text payloads.
pub const DEFAULT_POOL_BUDGET: usize = 4096;

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[derive(Debug, Default)]
struct PoolState {
    /// Pooled buffers, sorted ascending by size for best-fit checkout.
    buffers: Vec<Vec<u8>>,
    pooled_bytes: usize,
}

/// Bounded cache of reusable byte buffers shared by all in-flight requests.
///
/// `checkout` hands out the smallest pooled buffer that satisfies the
/// request, allocating a fresh one when nothing fits; a freshly allocated
/// buffer is not counted against the budget until it is released. `release`
/// evicts the largest pooled buffers first when the budget would overflow,
/// keeping the steady-state footprint biased toward small buffers.
///
/// Buffer contents carry no guarantee across reuse; callers must only trust
/// bytes they explicitly wrote or read. The critical section is
/// bookkeeping-only, so concurrent workers never block on each other's I/O.
#[derive(Debug)]
pub struct BufferPool {
    state: Mutex<PoolState>,
    budget: usize,
}

impl BufferPool {
    pub fn new(budget: usize) -> Self {
        Self {
            state: Mutex::new(PoolState::default()),
            budget,
        }
    }

    /// Returns a buffer of at least `min_size` bytes, owned exclusively by
    /// the caller until it is released back.
    pub fn checkout(&self, min_size: usize) -> Vec<u8> {
        let mut state = lock_unpoisoned(&self.state);
        let position = state
            .buffers
            .iter()
            .position(|buffer| buffer.len() >= min_size);
        if let Some(position) = position {
            let buffer = state.buffers.remove(position);
            state.pooled_bytes -= buffer.len();
            return buffer;
        }
        drop(state);
        vec![0; min_size]
    }

    /// Returns a buffer to the pool for reuse.
    ///
    /// A buffer larger than the whole budget is dropped outright; otherwise
    /// the largest pooled buffers are evicted until the newcomer fits.
    pub fn release(&self, buffer: Vec<u8>) {
        if buffer.len() > self.budget || buffer.is_empty() {
            return;
        }
        let mut state = lock_unpoisoned(&self.state);
        while state.pooled_bytes + buffer.len() > self.budget {
            if let Some(evicted) = state.buffers.pop() {
                state.pooled_bytes -= evicted.len();
            } else {
                break;
            }
        }
        state.pooled_bytes += buffer.len();
        let position = state
            .buffers
            .partition_point(|pooled| pooled.len() <= buffer.len());
        state.buffers.insert(position, buffer);
    }

    /// Total bytes currently held by the pool.
    pub fn pooled_bytes(&self) -> usize {
        lock_unpoisoned(&self.state).pooled_bytes
    }

    /// Number of buffers currently held by the pool.
    pub fn pooled_buffers(&self) -> usize {
        lock_unpoisoned(&self.state).buffers.len()
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_BUDGET)
    }
}
