// regint.rs - Internal types: OpCode, Operation, BitSet, MemStatus and the
// compiled Program.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::regdef::RegexOptions;
use crate::regparse_types::CharClass;
use crate::regsearch::SearchOptimizer;

// === Config Constants ===
pub const INIT_MATCH_STACK_SIZE: usize = 160;
pub const QUANTIFIER_EXPAND_LIMIT_SIZE: i32 = 50;

// === Internal Constants ===
pub const CHAR_MAP_SIZE: usize = 256;
pub const INFINITE_LEN: usize = usize::MAX;
pub const INFINITE_REPEAT: i32 = -1;

#[inline]
pub fn is_infinite_repeat(n: i32) -> bool {
    n == INFINITE_REPEAT
}

// === Bytecode Types ===
pub type RelAddrType = i32;
pub type MemNumType = usize;

// === MemStatus (bit status for captures) ===
//
// Bit n stands for group n. Groups past the word width share bit 0,
// which then reads as "all on".
pub type MemStatusType = u32;

pub const MEM_STATUS_BITS_NUM: usize = 32;

#[inline]
pub fn mem_status_on_all(stats: &mut MemStatusType) {
    *stats = !0u32;
}

#[inline]
pub fn mem_status_at0(stats: MemStatusType, n: usize) -> bool {
    if n > 0 && n < MEM_STATUS_BITS_NUM {
        (stats & (1u32 << n)) != 0
    } else {
        (stats & 1) != 0
    }
}

#[inline]
pub fn mem_status_on(stats: &mut MemStatusType, n: usize) {
    if n < MEM_STATUS_BITS_NUM {
        if n != 0 {
            *stats |= 1u32 << n;
        }
    } else {
        *stats |= 1;
    }
}

// === BitSet (256 bits for single-byte code points) ===
pub const SINGLE_BYTE_SIZE: usize = 256;
pub const BITS_IN_ROOM: usize = 32;
pub const BITSET_REAL_SIZE: usize = SINGLE_BYTE_SIZE / BITS_IN_ROOM;
pub type Bits = u32;
pub type BitSet = [Bits; BITSET_REAL_SIZE];

#[inline]
pub fn bs_room(pos: usize) -> usize {
    pos >> 5
}

#[inline]
pub fn bs_bit(pos: usize) -> u32 {
    1u32 << (pos & 0x1f)
}

#[inline]
pub fn bitset_at(bs: &BitSet, pos: usize) -> bool {
    (bs[bs_room(pos)] & bs_bit(pos)) != 0
}

#[inline]
pub fn bitset_set_bit(bs: &mut BitSet, pos: usize) {
    bs[bs_room(pos)] |= bs_bit(pos);
}

#[inline]
pub fn bitset_clear_bit(bs: &mut BitSet, pos: usize) {
    bs[bs_room(pos)] &= !bs_bit(pos);
}

pub fn bitset_set_range(bs: &mut BitSet, from: usize, to: usize) {
    for pos in from..=to.min(SINGLE_BYTE_SIZE - 1) {
        bitset_set_bit(bs, pos);
    }
}

pub fn bitset_invert(bs: &mut BitSet) {
    for room in bs.iter_mut() {
        *room = !*room;
    }
}

pub fn bitset_or(dest: &mut BitSet, src: &BitSet) {
    for (d, s) in dest.iter_mut().zip(src.iter()) {
        *d |= *s;
    }
}

pub fn bitset_is_empty(bs: &BitSet) -> bool {
    bs.iter().all(|&room| room == 0)
}

pub fn bitset_count(bs: &BitSet) -> usize {
    bs.iter().map(|room| room.count_ones() as usize).sum()
}

// === Code Range ===

/// Inclusive code point interval. Class range tables are sorted and disjoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct CodeRange {
    pub from: u32,
    pub to: u32,
}

// === OpCode Enum ===
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    Finish = 0,
    End = 1,
    Str1 = 2,
    Str2 = 3,
    Str3 = 4,
    Str4 = 5,
    Str5 = 6,
    StrN = 7,
    Str1Ic = 8,
    StrNIc = 9,
    CClass = 10,
    CClassMb = 11,
    CClassMix = 12,
    CClassNot = 13,
    CClassMbNot = 14,
    CClassMixNot = 15,
    CClassNode = 16,
    AnyChar = 17,
    AnyCharMl = 18,
    AnyCharStar = 19,
    AnyCharMlStar = 20,
    AnyCharStarPeekNext = 21,
    AnyCharMlStarPeekNext = 22,
    Word = 23,
    NoWord = 24,
    WordBoundary = 25,
    NoWordBoundary = 26,
    WordBegin = 27,
    WordEnd = 28,
    BeginBuf = 29,
    EndBuf = 30,
    BeginLine = 31,
    EndLine = 32,
    SemiEndBuf = 33,
    BeginPosition = 34,
    BackRef1 = 35,
    BackRef2 = 36,
    BackRefN = 37,
    BackRefNIc = 38,
    BackRefMulti = 39,
    BackRefMultiIc = 40,
    MemStart = 41,
    MemStartPush = 42,
    MemEnd = 43,
    MemEndPush = 44,
    MemClear = 45,
    Fail = 46,
    Jump = 47,
    Push = 48,
    Pop = 49,
    PushOrJumpExact1 = 50,
    PushIfPeekNext = 51,
    Repeat = 52,
    RepeatNg = 53,
    RepeatInc = 54,
    RepeatIncNg = 55,
    RepeatIncSg = 56,
    RepeatIncNgSg = 57,
    EmptyCheckStart = 58,
    EmptyCheckEnd = 59,
    EmptyCheckEndMemst = 60,
    PushPos = 61,
    PopPos = 62,
    PushPosNot = 63,
    FailPos = 64,
    PushStopBt = 65,
    PopStopBt = 66,
    LookBehind = 67,
    PushLookBehindNot = 68,
    FailLookBehindNot = 69,
}

impl OpCode {
    /// Opcodes allowed right after `EmptyCheckEnd`: the instruction an
    /// empty iteration skips.
    #[inline]
    pub fn is_empty_check_skip_target(self) -> bool {
        matches!(
            self,
            OpCode::Jump
                | OpCode::Push
                | OpCode::RepeatInc
                | OpCode::RepeatIncNg
                | OpCode::RepeatIncSg
                | OpCode::RepeatIncNgSg
        )
    }

    #[inline]
    pub fn is_str(self) -> bool {
        matches!(
            self,
            OpCode::Str1 | OpCode::Str2 | OpCode::Str3 | OpCode::Str4 | OpCode::Str5 | OpCode::StrN
        )
    }
}

// === Stack Pop Level ===
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackPopLevel {
    Free,
    MemStart,
    All,
}

// === Optimize Type ===
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptimizeType {
    None,
    Str,
    StrIc,
    StrFast,
    Map,
}

// === Operation (Bytecode Instruction) ===
//
// Every operation occupies one slot; relative addresses count slots from
// the operation itself.
#[derive(Clone, Debug)]
pub struct Operation {
    pub opcode: OpCode,
    pub payload: OperationPayload,
}

#[derive(Clone, Debug)]
pub enum OperationPayload {
    None,
    /// Inline bytes for `Str1`..`Str5`; the opcode gives the length.
    Exact {
        s: [u8; 5],
    },
    /// Run stored in the template table.
    ExactN {
        tmpl: usize,
        offset: usize,
        len: usize,
    },
    ExactIc {
        c: u32,
    },
    CClass {
        bs: Box<BitSet>,
    },
    CClassMb {
        ranges: Box<[CodeRange]>,
    },
    CClassMix {
        bs: Box<BitSet>,
        ranges: Box<[CodeRange]>,
    },
    CClassNode {
        class: usize,
    },
    AnyCharStarPeekNext {
        c: u8,
    },
    BackRefN {
        n: MemNumType,
    },
    BackRefMulti {
        ns: Box<[MemNumType]>,
    },
    Memory {
        num: MemNumType,
    },
    MemClear {
        from: MemNumType,
        to: MemNumType,
    },
    Jump {
        addr: RelAddrType,
    },
    Push {
        addr: RelAddrType,
    },
    PushOrJumpExact1 {
        addr: RelAddrType,
        c: u8,
    },
    PushIfPeekNext {
        addr: RelAddrType,
        c: u8,
    },
    Repeat {
        id: usize,
        addr: RelAddrType,
    },
    RepeatInc {
        id: usize,
    },
    EmptyCheck {
        id: usize,
    },
    PushPosNot {
        addr: RelAddrType,
    },
    LookBehind {
        len: usize,
    },
    PushLookBehindNot {
        addr: RelAddrType,
        len: usize,
    },
}

// === RepeatRange ===
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepeatRange {
    pub lower: i32,
    pub upper: i32,
}

// === Program (compiled regex) ===

/// Immutable result of compilation: bytecode, literal templates, the
/// repeat-range table, shared classes and search metadata. A `Program` is
/// `Send + Sync` and may be matched from many threads at once; every match
/// attempt brings its own stack.
#[derive(Clone, Debug)]
pub struct Program {
    // bytecode
    pub(crate) ops: Vec<Operation>,
    pub(crate) templates: Vec<Box<[u8]>>,
    pub(crate) repeat_range: Vec<RepeatRange>,
    pub(crate) classes: Vec<CharClass>,

    // capture info
    pub(crate) num_mem: usize,
    pub(crate) num_repeat: usize,
    pub(crate) num_empty_check: usize,
    pub(crate) push_mem_start: MemStatusType,
    pub(crate) push_mem_end: MemStatusType,
    pub(crate) stack_pop_level: StackPopLevel,
    pub(crate) name_table: HashMap<String, SmallVec<[usize; 2]>>,

    // metadata
    pub(crate) options: RegexOptions,

    // optimization
    pub(crate) optimizer: SearchOptimizer,
}

impl Program {
    pub(crate) fn new(options: RegexOptions) -> Self {
        Program {
            ops: Vec::new(),
            templates: Vec::new(),
            repeat_range: Vec::new(),
            classes: Vec::new(),
            num_mem: 0,
            num_repeat: 0,
            num_empty_check: 0,
            push_mem_start: 0,
            push_mem_end: 0,
            stack_pop_level: StackPopLevel::Free,
            name_table: HashMap::new(),
            options,
            optimizer: SearchOptimizer::none(),
        }
    }

    /// Number of capture groups, excluding the whole-match slot 0.
    #[inline]
    pub fn num_captures(&self) -> usize {
        self.num_mem
    }

    #[inline]
    pub fn options(&self) -> RegexOptions {
        self.options
    }

    #[inline]
    pub fn optimizer(&self) -> &SearchOptimizer {
        &self.optimizer
    }

    #[inline]
    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    #[inline]
    pub fn templates(&self) -> &[Box<[u8]>] {
        &self.templates
    }

    #[inline]
    pub fn repeat_ranges(&self) -> &[RepeatRange] {
        &self.repeat_range
    }

    #[inline]
    pub fn stack_pop_level(&self) -> StackPopLevel {
        self.stack_pop_level
    }

    /// Group numbers carrying `name`, in pattern order.
    pub fn name_to_group_numbers(&self, name: &str) -> Option<&[usize]> {
        self.name_table.get(name).map(|v| v.as_slice())
    }

    /// Iterates `(name, group numbers)` pairs in no particular order.
    pub fn names(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.name_table
            .iter()
            .map(|(name, nums)| (name.as_str(), nums.as_slice()))
    }

    #[inline]
    pub(crate) fn template(&self, tmpl: usize, offset: usize, len: usize) -> &[u8] {
        &self.templates[tmpl][offset..offset + len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitset_ops() {
        let mut bs: BitSet = [0; BITSET_REAL_SIZE];
        assert!(bitset_is_empty(&bs));
        bitset_set_range(&mut bs, b'a' as usize, b'z' as usize);
        assert!(bitset_at(&bs, b'm' as usize));
        assert!(!bitset_at(&bs, b'A' as usize));
        assert_eq!(bitset_count(&bs), 26);
        bitset_clear_bit(&mut bs, b'm' as usize);
        assert_eq!(bitset_count(&bs), 25);
        bitset_invert(&mut bs);
        assert_eq!(bitset_count(&bs), 256 - 25);
        assert!(bitset_at(&bs, b'm' as usize));
    }

    #[test]
    fn bitset_or_merges() {
        let mut a: BitSet = [0; BITSET_REAL_SIZE];
        let mut b: BitSet = [0; BITSET_REAL_SIZE];
        bitset_set_bit(&mut a, 1);
        bitset_set_bit(&mut b, 200);
        bitset_or(&mut a, &b);
        assert!(bitset_at(&a, 1));
        assert!(bitset_at(&a, 200));
    }

    #[test]
    fn mem_status_overflow_uses_bit0() {
        let mut st: MemStatusType = 0;
        mem_status_on(&mut st, 3);
        assert!(mem_status_at0(st, 3));
        assert!(!mem_status_at0(st, 4));
        mem_status_on(&mut st, 40);
        assert!(mem_status_at0(st, 40));
        assert!(mem_status_at0(st, 77));
        let mut all = 0;
        mem_status_on_all(&mut all);
        assert!(mem_status_at0(all, 9));
    }

    #[test]
    fn empty_check_skip_targets() {
        assert!(OpCode::Jump.is_empty_check_skip_target());
        assert!(OpCode::RepeatIncNgSg.is_empty_check_skip_target());
        assert!(!OpCode::Str1.is_empty_check_skip_target());
    }
}
