// regstack.rs - Backtrack stack: typed frames, pop policy and stack pool.
//
// The VM keeps every choice point and every undo record on one growable
// array. Popping to a resumption frame replays the undo records it passes
// (capture markers, repeat counters) according to the program's pop level.

use std::sync::Mutex;

use crate::regint::{StackPopLevel, INIT_MATCH_STACK_SIZE};

/// Current boundary of a capture group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemPtr {
    /// Not matched yet, or cleared.
    Invalid,
    /// Byte offset into the subject.
    Pos(usize),
}

impl MemPtr {
    #[inline]
    pub fn pos(self) -> Option<usize> {
        match self {
            MemPtr::Invalid => None,
            MemPtr::Pos(p) => Some(p),
        }
    }
}

/// One backtrack frame.
#[derive(Clone, Debug)]
pub enum StackEntry {
    /// Choice point: resume at `pcode` with the scan position `pstr`.
    Alt { pcode: usize, pstr: usize },
    /// Positive lookahead marker; `PopPos` returns to `pstr`.
    Pos { pstr: usize },
    /// Negative lookahead: resumed when the body fails.
    PosNot { pcode: usize, pstr: usize },
    /// Atomic group marker.
    StopBt,
    /// Negative lookbehind: resumed when the body fails.
    LookBehindNot { pcode: usize, pstr: usize },
    /// Undo record for a group start (and the end it invalidated).
    MemStart {
        num: usize,
        prev_start: MemPtr,
        prev_end: MemPtr,
    },
    /// Undo record for a group end.
    MemEnd {
        num: usize,
        prev_start: MemPtr,
        prev_end: MemPtr,
    },
    /// Counted loop state, updated in place by `RepeatInc*`.
    Repeat {
        id: usize,
        pcode: usize,
        count: i32,
        pstr: usize,
    },
    /// Undo record for one loop increment of the `Repeat` frame at `si`.
    RepeatInc { si: usize, slast: usize },
    EmptyCheckStart { id: usize, pstr: usize },
    /// Dead frame left behind by a committed lookahead or atomic group.
    Void,
}

impl StackEntry {
    /// Frames discarded when a lookahead or atomic group commits.
    #[inline]
    fn is_void_target(&self) -> bool {
        matches!(
            self,
            StackEntry::Alt { .. }
                | StackEntry::PosNot { .. }
                | StackEntry::LookBehindNot { .. }
                | StackEntry::Pos { .. }
                | StackEntry::StopBt
        )
    }
}

/// Backtrack stack of one match attempt.
#[derive(Debug)]
pub struct MatchStack {
    entries: Vec<StackEntry>,
}

impl Default for MatchStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchStack {
    pub fn new() -> Self {
        MatchStack {
            entries: Vec::with_capacity(INIT_MATCH_STACK_SIZE),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn push(&mut self, entry: StackEntry) {
        self.entries.push(entry);
    }

    #[inline]
    pub fn push_alt(&mut self, pcode: usize, pstr: usize) {
        self.entries.push(StackEntry::Alt { pcode, pstr });
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<&StackEntry> {
        self.entries.get(i)
    }

    #[inline]
    pub fn get_mut(&mut self, i: usize) -> Option<&mut StackEntry> {
        self.entries.get_mut(i)
    }

    /// Drop the top frame without replaying it.
    #[inline]
    pub fn pop_one(&mut self) {
        self.entries.pop();
    }

    /// Pop to the most recent resumption frame and return its
    /// `(pcode, pstr)`. Undo records passed on the way are replayed as far
    /// as `level` requires.
    pub fn pop(
        &mut self,
        level: StackPopLevel,
        mem_start: &mut [MemPtr],
        mem_end: &mut [MemPtr],
    ) -> Option<(usize, usize)> {
        loop {
            let entry = self.entries.pop()?;
            match entry {
                StackEntry::Alt { pcode, pstr }
                | StackEntry::PosNot { pcode, pstr }
                | StackEntry::LookBehindNot { pcode, pstr } => return Some((pcode, pstr)),
                StackEntry::MemStart {
                    num,
                    prev_start,
                    prev_end,
                } if level != StackPopLevel::Free => {
                    mem_start[num] = prev_start;
                    mem_end[num] = prev_end;
                }
                StackEntry::MemEnd {
                    num,
                    prev_start,
                    prev_end,
                } if level == StackPopLevel::All => {
                    mem_start[num] = prev_start;
                    mem_end[num] = prev_end;
                }
                StackEntry::RepeatInc { si, slast } if level == StackPopLevel::All => {
                    if let Some(StackEntry::Repeat { count, pstr, .. }) = self.entries.get_mut(si) {
                        *count -= 1;
                        *pstr = slast;
                    }
                }
                _ => {}
            }
        }
    }

    /// Pop through the innermost frame matching `is_mark`, replaying every
    /// undo record on the way. Used when a negative lookaround body
    /// succeeds.
    pub fn pop_til(
        &mut self,
        is_mark: impl Fn(&StackEntry) -> bool,
        mem_start: &mut [MemPtr],
        mem_end: &mut [MemPtr],
    ) -> bool {
        while let Some(entry) = self.entries.pop() {
            if is_mark(&entry) {
                return true;
            }
            match entry {
                StackEntry::MemStart {
                    num,
                    prev_start,
                    prev_end,
                }
                | StackEntry::MemEnd {
                    num,
                    prev_start,
                    prev_end,
                } => {
                    mem_start[num] = prev_start;
                    mem_end[num] = prev_end;
                }
                StackEntry::RepeatInc { si, slast } => {
                    if let Some(StackEntry::Repeat { count, pstr, .. }) = self.entries.get_mut(si) {
                        *count -= 1;
                        *pstr = slast;
                    }
                }
                _ => {}
            }
        }
        false
    }

    /// Discard every choice point above the innermost frame matching
    /// `is_mark`, the mark included. Undo records stay in place. Returns
    /// the mark.
    pub fn void_to(&mut self, is_mark: impl Fn(&StackEntry) -> bool) -> Option<StackEntry> {
        for i in (0..self.entries.len()).rev() {
            if is_mark(&self.entries[i]) {
                return Some(std::mem::replace(&mut self.entries[i], StackEntry::Void));
            }
            if self.entries[i].is_void_target() {
                self.entries[i] = StackEntry::Void;
            }
        }
        None
    }

    /// Start position of the innermost null check `id`.
    pub fn empty_check_start(&self, id: usize) -> Option<usize> {
        self.entries.iter().rev().find_map(|e| match *e {
            StackEntry::EmptyCheckStart { id: eid, pstr } if eid == id => Some(pstr),
            _ => None,
        })
    }

    /// Index of the innermost `Repeat` frame of loop `id`.
    pub fn latest_repeat(&self, id: usize) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|e| matches!(*e, StackEntry::Repeat { id: rid, .. } if rid == id))
    }
}

// ============================================================================
// Pool
// ============================================================================

const MAX_POOLED_STACKS: usize = 8;

/// Free list of match stacks. A stack is checked out by exactly one match
/// attempt and handed back cleared.
#[derive(Debug, Default)]
pub struct StackPool {
    free: Mutex<Vec<MatchStack>>,
}

impl StackPool {
    pub fn new() -> Self {
        StackPool {
            free: Mutex::new(Vec::new()),
        }
    }

    /// Check out a stack, reusing a released one when available.
    pub fn acquire(&self) -> MatchStack {
        let stack = match self.free.lock() {
            Ok(mut free) => free.pop(),
            Err(poisoned) => poisoned.into_inner().pop(),
        };
        stack.unwrap_or_default()
    }

    pub fn release(&self, mut stack: MatchStack) {
        stack.clear();
        let mut free = match self.free.lock() {
            Ok(free) => free,
            Err(poisoned) => poisoned.into_inner(),
        };
        if free.len() < MAX_POOLED_STACKS {
            free.push(stack);
        }
    }

    /// Number of stacks waiting for reuse.
    pub fn idle(&self) -> usize {
        match self.free.lock() {
            Ok(free) => free.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}
