use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::config::EvictionPolicyKind;
use crate::error::{Result, VmError};
use crate::translation::{FrameNumber, PageNumber};

/// Replacement policy state.
///
/// Every variant answers the same four calls: `on_load` when a page becomes
/// resident, `on_access` on every hit, `select_victim` when no frame is free
/// and `on_evict` once the victim is gone. `now` is the manager's logical
/// clock, which advances once per byte read or written.
#[derive(Debug, Clone)]
pub enum EvictionPolicy {
    None,
    Fifo {
        queue: VecDeque<PageNumber>,
    },
    Lru {
        /// (last access, page); the first element is the victim.
        order: BTreeSet<(u64, PageNumber)>,
        last_access: HashMap<PageNumber, u64>,
    },
}

impl EvictionPolicy {
    pub fn new(kind: EvictionPolicyKind) -> Self {
        match kind {
            EvictionPolicyKind::None => EvictionPolicy::None,
            EvictionPolicyKind::Fifo => EvictionPolicy::Fifo {
                queue: VecDeque::new(),
            },
            EvictionPolicyKind::Lru => EvictionPolicy::Lru {
                order: BTreeSet::new(),
                last_access: HashMap::new(),
            },
        }
    }

    pub fn kind(&self) -> EvictionPolicyKind {
        match self {
            EvictionPolicy::None => EvictionPolicyKind::None,
            EvictionPolicy::Fifo { .. } => EvictionPolicyKind::Fifo,
            EvictionPolicy::Lru { .. } => EvictionPolicyKind::Lru,
        }
    }

    pub fn evicts(&self) -> bool {
        !matches!(self, EvictionPolicy::None)
    }

    pub fn on_load(&mut self, page: PageNumber, _frame: FrameNumber, now: u64) {
        match self {
            EvictionPolicy::None => {}
            EvictionPolicy::Fifo { queue } => queue.push_back(page),
            EvictionPolicy::Lru { .. } => self.touch(page, now),
        }
    }

    pub fn on_access(&mut self, page: PageNumber, now: u64) {
        if let EvictionPolicy::Lru { .. } = self {
            self.touch(page, now);
        }
    }

    fn touch(&mut self, page: PageNumber, now: u64) {
        if let EvictionPolicy::Lru { order, last_access } = self {
            if let Some(previous) = last_access.insert(page, now) {
                order.remove(&(previous, page));
            }
            order.insert((now, page));
        }
    }

    /// The page that should leave memory next. Tracking is unchanged until
    /// `on_evict` is called for it.
    pub fn select_victim(&self) -> Result<PageNumber> {
        let victim = match self {
            EvictionPolicy::None => None,
            EvictionPolicy::Fifo { queue } => queue.front().copied(),
            EvictionPolicy::Lru { order, .. } => order.first().map(|&(_, page)| page),
        };
        victim.ok_or(VmError::NoVictimAvailable)
    }

    pub fn on_evict(&mut self, page: PageNumber) {
        match self {
            EvictionPolicy::None => {}
            EvictionPolicy::Fifo { queue } => {
                if queue.front() == Some(&page) {
                    queue.pop_front();
                } else if let Some(position) = queue.iter().position(|&p| p == page) {
                    queue.remove(position);
                }
            }
            EvictionPolicy::Lru { order, last_access } => {
                if let Some(stamp) = last_access.remove(&page) {
                    order.remove(&(stamp, page));
                }
            }
        }
    }

    /// Number of resident pages the policy is tracking.
    pub fn tracked(&self) -> usize {
        match self {
            EvictionPolicy::None => 0,
            EvictionPolicy::Fifo { queue } => queue.len(),
            EvictionPolicy::Lru { last_access, .. } => last_access.len(),
        }
    }
}
