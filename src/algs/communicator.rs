//! Thin façade over intra-process (thread group) or inter-process (MPI)
//! message passing.
//!
//! Messages are *contiguous byte slices*. The only point-to-point primitive
//! is a blocking paired send/receive in which either half may be absent
//! (`None`), the moral equivalent of `MPI_PROC_NULL`: an absent half neither
//! blocks nor errors. Collectives are a full barrier and an `f64` sum
//! all-reduce.
//!
//! Inside a [`LocalComm`] group a rank that panics or returns early is
//! marked as departed; peers blocked on it get [`HeatError::Comm`] instead
//! of waiting forever.

use crate::algs::wire::{self, REDUCE_TAG};
use crate::heat_error::HeatError;
use bytes::Bytes;
use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Blocking communication interface shared by every backend.
pub trait Communicator {
    /// This process' rank in `[0, size)`.
    fn rank(&self) -> usize;
    /// Number of ranks in the group.
    fn size(&self) -> usize;
    /// Block until every rank in the group has called `barrier`.
    fn barrier(&self) -> Result<(), HeatError>;

    /// Send `send` to `dest` and receive exactly `recv.len()` bytes from
    /// `source`, as one paired operation. A `None` peer skips that half.
    fn send_recv(
        &self,
        dest: Option<usize>,
        send: &[u8],
        source: Option<usize>,
        recv: &mut [u8],
        tag: u16,
    ) -> Result<(), HeatError>;

    /// Element-wise sum of `local` over all ranks, returned on every rank.
    ///
    /// The default gathers to rank 0 in rank order and fans the total back
    /// out, so every backend yields the same rounding.
    fn all_reduce_sum(&self, local: &[f64]) -> Result<Vec<f64>, HeatError> {
        let mut total = local.to_vec();
        if self.size() == 1 {
            return Ok(total);
        }
        if self.rank() == 0 {
            let mut part = vec![0.0f64; local.len()];
            for peer in 1..self.size() {
                self.send_recv(None, &[], Some(peer), wire::as_bytes_mut(&mut part), REDUCE_TAG)?;
                for (t, p) in total.iter_mut().zip(&part) {
                    *t += *p;
                }
            }
            for peer in 1..self.size() {
                self.send_recv(Some(peer), wire::as_bytes(&total), None, &mut [], REDUCE_TAG)?;
            }
        } else {
            self.send_recv(Some(0), wire::as_bytes(local), None, &mut [], REDUCE_TAG)?;
            self.send_recv(None, &[], Some(0), wire::as_bytes_mut(&mut total), REDUCE_TAG)?;
        }
        Ok(total)
    }
}

/// Single-rank comm for serial runs and unit tests.
#[derive(Clone, Debug, Default)]
pub struct NoComm;

impl Communicator for NoComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn barrier(&self) -> Result<(), HeatError> {
        Ok(())
    }

    fn send_recv(
        &self,
        dest: Option<usize>,
        _send: &[u8],
        source: Option<usize>,
        _recv: &mut [u8],
        _tag: u16,
    ) -> Result<(), HeatError> {
        // A lone rank has no peers; naming one is a topology bug.
        match dest.or(source) {
            Some(peer) => Err(HeatError::InvalidRank { rank: peer, size: 1 }),
            None => Ok(()),
        }
    }
}

// --- LocalComm: intra-process, one thread per rank ---
type Key = (usize, usize, u16); // (src, dst, tag)

struct Shared {
    size: usize,
    mailbox: DashMap<Key, VecDeque<Bytes>>,
    // Only guards wakeups and barrier counts; the mailbox shards on its own.
    state: Mutex<GroupState>,
    wake: Condvar,
}

struct GroupState {
    waiting: usize,
    generation: u64,
    departed: Vec<bool>,
    first_panic: Option<usize>,
}

impl GroupState {
    fn any_departed(&self) -> bool {
        self.departed.iter().any(|d| *d)
    }
}

impl Shared {
    fn depart(&self, rank: usize, panicked: bool) {
        {
            let mut st = self.state.lock();
            st.departed[rank] = true;
            if panicked && st.first_panic.is_none() {
                st.first_panic = Some(rank);
            }
        }
        self.wake.notify_all();
    }
}

/// One rank's handle into an in-process group.
///
/// Sends are buffered, receives block until a matching message exists.
/// Messages between a given `(src, dst, tag)` are delivered FIFO.
#[derive(Clone)]
pub struct LocalComm {
    rank: usize,
    shared: Arc<Shared>,
}

impl std::fmt::Debug for LocalComm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalComm")
            .field("rank", &self.rank)
            .field("size", &self.shared.size)
            .finish()
    }
}

impl LocalComm {
    /// Create the `size` handles of a fresh group, in rank order.
    ///
    /// # Panics
    /// Panics if `size == 0`.
    pub fn group(size: usize) -> Vec<LocalComm> {
        assert!(size > 0, "a process group needs at least one rank");
        let shared = Arc::new(Shared {
            size,
            mailbox: DashMap::new(),
            state: Mutex::new(GroupState {
                waiting: 0,
                generation: 0,
                departed: vec![false; size],
                first_panic: None,
            }),
            wake: Condvar::new(),
        });
        (0..size)
            .map(|rank| LocalComm {
                rank,
                shared: Arc::clone(&shared),
            })
            .collect()
    }

    /// Run `f` once per rank on its own scoped thread; results come back in
    /// rank order.
    ///
    /// When a rank finishes, by returning or panicking, it leaves the group
    /// and peers still waiting on it are released with an error. If any rank
    /// panicked, the first panic is re-raised on the caller once every rank
    /// has stopped.
    pub fn run_group<F, R>(size: usize, f: F) -> Vec<R>
    where
        F: Fn(LocalComm) -> R + Sync,
        R: Send,
    {
        let comms = Self::group(size);
        let shared = Arc::clone(&comms[0].shared);
        let f = &f;
        let outcomes: Vec<std::thread::Result<R>> = std::thread::scope(|s| {
            let handles: Vec<_> = comms
                .into_iter()
                .map(|comm| {
                    s.spawn(move || {
                        let rank = comm.rank;
                        let group = Arc::clone(&comm.shared);
                        let out = panic::catch_unwind(AssertUnwindSafe(|| f(comm)));
                        group.depart(rank, out.is_err());
                        out
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(Err))
                .collect()
        });

        let first_panic = shared.state.lock().first_panic;
        let mut results = Vec::with_capacity(size);
        let mut reraise = None;
        for (rank, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(r) => results.push(r),
                Err(payload) => {
                    if reraise.is_none() || first_panic == Some(rank) {
                        reraise = Some(payload);
                    }
                }
            }
        }
        if let Some(payload) = reraise {
            panic::resume_unwind(payload);
        }
        results
    }

    fn check_peer(&self, peer: usize) -> Result<(), HeatError> {
        if peer < self.shared.size {
            Ok(())
        } else {
            Err(HeatError::InvalidRank {
                rank: peer,
                size: self.shared.size,
            })
        }
    }

    fn post(&self, dst: usize, tag: u16, buf: &[u8]) {
        self.shared
            .mailbox
            .entry((self.rank, dst, tag))
            .or_default()
            .push_back(Bytes::copy_from_slice(buf));
        // A receiver holds the lock from its mailbox check until it waits,
        // so taking it here orders this notify after that wait.
        drop(self.shared.state.lock());
        self.shared.wake.notify_all();
    }

    fn take(&self, src: usize, tag: u16) -> Result<Bytes, HeatError> {
        let key = (src, self.rank, tag);
        let mut st = self.shared.state.lock();
        loop {
            let msg = self
                .shared
                .mailbox
                .get_mut(&key)
                .and_then(|mut queue| queue.pop_front());
            if let Some(bytes) = msg {
                return Ok(bytes);
            }
            if st.departed[src] {
                return Err(HeatError::Comm(format!(
                    "rank {src} left the group before sending tag {tag:#06x} to rank {}",
                    self.rank
                )));
            }
            self.shared.wake.wait(&mut st);
        }
    }

    fn wait_barrier(&self) -> Result<(), HeatError> {
        let mut st = self.shared.state.lock();
        let generation = st.generation;
        st.waiting += 1;
        if st.waiting == self.shared.size {
            st.waiting = 0;
            st.generation += 1;
            drop(st);
            self.shared.wake.notify_all();
            return Ok(());
        }
        loop {
            if st.generation != generation {
                return Ok(());
            }
            if st.any_departed() {
                st.waiting -= 1;
                return Err(HeatError::Comm(format!(
                    "rank {} reached a barrier another rank will never reach",
                    self.rank
                )));
            }
            self.shared.wake.wait(&mut st);
        }
    }
}

impl Communicator for LocalComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.shared.size
    }

    fn barrier(&self) -> Result<(), HeatError> {
        self.wait_barrier()
    }

    fn send_recv(
        &self,
        dest: Option<usize>,
        send: &[u8],
        source: Option<usize>,
        recv: &mut [u8],
        tag: u16,
    ) -> Result<(), HeatError> {
        if let Some(dst) = dest {
            self.check_peer(dst)?;
            self.post(dst, tag, send);
        }
        if let Some(src) = source {
            self.check_peer(src)?;
            let msg = self.take(src, tag)?;
            wire::expect_exact_len(msg.len(), recv.len())?;
            recv.copy_from_slice(&msg);
        }
        Ok(())
    }
}

// --- MPI backend (feature = "mpi-support") ---
#[cfg(feature = "mpi-support")]
mod mpi_backend {
    use super::Communicator;
    use crate::heat_error::HeatError;
    use mpi::collective::SystemOperation;
    use mpi::environment::Universe;
    use mpi::point_to_point::send_receive_into_with_tags;
    use mpi::topology::SimpleCommunicator;
    use mpi::traits::Communicator as _;
    use mpi::traits::*;

    /// World communicator of an MPI job. MPI is finalized when this drops.
    pub struct MpiComm {
        world: SimpleCommunicator,
        rank: usize,
        size: usize,
        _universe: Universe,
    }

    impl MpiComm {
        pub fn new() -> Result<Self, HeatError> {
            let universe = mpi::initialize()
                .ok_or_else(|| HeatError::Comm("MPI was already initialized".into()))?;
            let world = universe.world();
            let rank = world.rank() as usize;
            let size = world.size() as usize;
            Ok(Self {
                world,
                rank,
                size,
                _universe: universe,
            })
        }
    }

    impl Communicator for MpiComm {
        fn rank(&self) -> usize {
            self.rank
        }

        fn size(&self) -> usize {
            self.size
        }

        fn barrier(&self) -> Result<(), HeatError> {
            self.world.barrier();
            Ok(())
        }

        fn send_recv(
            &self,
            dest: Option<usize>,
            send: &[u8],
            source: Option<usize>,
            recv: &mut [u8],
            tag: u16,
        ) -> Result<(), HeatError> {
            let tag = i32::from(tag);
            match (dest, source) {
                (Some(d), Some(s)) => {
                    let to = self.world.process_at_rank(d as i32);
                    let from = self.world.process_at_rank(s as i32);
                    send_receive_into_with_tags(send, &to, tag, recv, &from, tag);
                }
                (Some(d), None) => {
                    self.world.process_at_rank(d as i32).send_with_tag(send, tag);
                }
                (None, Some(s)) => {
                    self.world
                        .process_at_rank(s as i32)
                        .receive_into_with_tag(recv, tag);
                }
                (None, None) => {}
            }
            Ok(())
        }

        fn all_reduce_sum(&self, local: &[f64]) -> Result<Vec<f64>, HeatError> {
            let mut total = vec![0.0f64; local.len()];
            self.world
                .all_reduce_into(local, &mut total[..], SystemOperation::sum());
            Ok(total)
        }
    }
}

#[cfg(feature = "mpi-support")]
pub use mpi_backend::MpiComm;
