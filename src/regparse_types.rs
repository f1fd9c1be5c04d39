// regparse_types.rs - Pattern AST consumed by the compiler.
//
// A parser (not part of this crate) builds an `Ast`: a node tree plus an
// arena of character classes referenced by `ClassId`. Analysis fields on
// the nodes (`regnum`, `emptiness`, `char_len`, ...) start at their
// defaults and are filled in by the compiler's setup pass.

use smallvec::SmallVec;

use crate::regint::*;
use crate::unicode::is_in_code_range;

// === Body Empty Type ===
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyEmptyType {
    NotEmpty,
    MayBeEmpty,
    MayBeEmptyMem,
}

// === Anchor Type ===
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorType {
    BeginBuf,
    EndBuf,
    SemiEndBuf,
    BeginLine,
    EndLine,
    /// `^`: begin-buf, or begin-line under MULTILINE.
    Caret,
    /// `$`: semi-end-buf, or end-line under MULTILINE. Semi-end-buf also
    /// matches before a final newline; use `EndBuf` for end-of-input only.
    Dollar,
    BeginPosition,
    WordBoundary,
    NoWordBoundary,
    WordBegin,
    WordEnd,
    PrecRead,
    PrecReadNot,
    LookBehind,
    LookBehindNot,
}

impl AnchorType {
    #[inline]
    pub fn has_body(self) -> bool {
        matches!(
            self,
            AnchorType::PrecRead
                | AnchorType::PrecReadNot
                | AnchorType::LookBehind
                | AnchorType::LookBehindNot
        )
    }
}

// === Class arena handle ===
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub usize);

// === Node ===

#[derive(Clone, Debug)]
pub enum Node {
    /// Matches the empty string.
    Empty,
    String(StrNode),
    CClass(ClassId),
    CType(CtypeNode),
    AnyChar,
    BackRef(BackRefNode),
    Quant(Box<QuantNode>),
    Bag(Box<BagNode>),
    Anchor(Box<AnchorNode>),
    List(Vec<Node>),
    Alt(Vec<Node>),
}

#[derive(Clone, Debug)]
pub struct StrNode {
    pub s: Vec<u8>,
    pub ignore_case: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct CtypeNode {
    pub not: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackRefTarget {
    Number(usize),
    Name(String),
}

#[derive(Clone, Debug)]
pub struct BackRefNode {
    pub target: BackRefTarget,
    pub ignore_case: bool,
    /// Resolved group numbers.
    pub back_refs: SmallVec<[usize; 2]>,
}

#[derive(Clone, Debug)]
pub struct QuantNode {
    pub body: Node,
    pub lower: i32,
    pub upper: i32,
    pub greedy: bool,
    pub emptiness: BodyEmptyType,
    pub head_exact: Option<u8>,
    pub next_head_exact: Option<u8>,
    /// Inside another quantifier's body.
    pub in_repeat: bool,
    /// Body holds a backreferenced group.
    pub include_referred: bool,
}

#[derive(Clone, Debug)]
pub enum BagData {
    Memory { name: Option<String>, regnum: usize },
    StopBacktrack,
}

#[derive(Clone, Debug)]
pub struct BagNode {
    pub body: Node,
    pub data: BagData,
}

impl BagNode {
    /// Group number; 0 for a non-capturing bag.
    pub fn regnum(&self) -> usize {
        match &self.data {
            BagData::Memory { regnum, .. } => *regnum,
            BagData::StopBacktrack => 0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AnchorNode {
    pub anchor_type: AnchorType,
    pub body: Option<Node>,
    /// Character length of a lookbehind body.
    pub char_len: usize,
}

// === Node constructors ===

impl Node {
    pub fn str(s: &str) -> Node {
        Node::String(StrNode {
            s: s.as_bytes().to_vec(),
            ignore_case: false,
        })
    }

    pub fn str_ic(s: &str) -> Node {
        Node::String(StrNode {
            s: s.as_bytes().to_vec(),
            ignore_case: true,
        })
    }

    pub fn list(nodes: Vec<Node>) -> Node {
        Node::List(nodes)
    }

    pub fn alt(nodes: Vec<Node>) -> Node {
        Node::Alt(nodes)
    }

    pub fn cclass(id: ClassId) -> Node {
        Node::CClass(id)
    }

    pub fn word() -> Node {
        Node::CType(CtypeNode { not: false })
    }

    pub fn not_word() -> Node {
        Node::CType(CtypeNode { not: true })
    }

    pub fn any() -> Node {
        Node::AnyChar
    }

    pub fn quant(body: Node, lower: i32, upper: i32, greedy: bool) -> Node {
        Node::Quant(Box::new(QuantNode {
            body,
            lower,
            upper,
            greedy,
            emptiness: BodyEmptyType::NotEmpty,
            head_exact: None,
            next_head_exact: None,
            in_repeat: false,
            include_referred: false,
        }))
    }

    pub fn star(body: Node) -> Node {
        Node::quant(body, 0, INFINITE_REPEAT, true)
    }

    pub fn plus(body: Node) -> Node {
        Node::quant(body, 1, INFINITE_REPEAT, true)
    }

    pub fn opt(body: Node) -> Node {
        Node::quant(body, 0, 1, true)
    }

    /// Unnamed group; whether it captures depends on the compile options.
    pub fn group(body: Node) -> Node {
        Node::Bag(Box::new(BagNode {
            body,
            data: BagData::Memory {
                name: None,
                regnum: 0,
            },
        }))
    }

    pub fn named(name: &str, body: Node) -> Node {
        Node::Bag(Box::new(BagNode {
            body,
            data: BagData::Memory {
                name: Some(name.to_string()),
                regnum: 0,
            },
        }))
    }

    pub fn atomic(body: Node) -> Node {
        Node::Bag(Box::new(BagNode {
            body,
            data: BagData::StopBacktrack,
        }))
    }

    /// Possessive quantifier: an atomic group around a greedy one.
    pub fn possessive(body: Node, lower: i32, upper: i32) -> Node {
        Node::atomic(Node::quant(body, lower, upper, true))
    }

    pub fn anchor(anchor_type: AnchorType) -> Node {
        Node::Anchor(Box::new(AnchorNode {
            anchor_type,
            body: None,
            char_len: 0,
        }))
    }

    /// Lookahead or lookbehind around `body`.
    pub fn look(anchor_type: AnchorType, body: Node) -> Node {
        Node::Anchor(Box::new(AnchorNode {
            anchor_type,
            body: Some(body),
            char_len: 0,
        }))
    }

    pub fn backref(n: usize) -> Node {
        Node::BackRef(BackRefNode {
            target: BackRefTarget::Number(n),
            ignore_case: false,
            back_refs: SmallVec::new(),
        })
    }

    pub fn backref_ic(n: usize) -> Node {
        Node::BackRef(BackRefNode {
            target: BackRefTarget::Number(n),
            ignore_case: true,
            back_refs: SmallVec::new(),
        })
    }

    pub fn backref_name(name: &str) -> Node {
        Node::BackRef(BackRefNode {
            target: BackRefTarget::Name(name.to_string()),
            ignore_case: false,
            back_refs: SmallVec::new(),
        })
    }

    pub fn is_empty_node(&self) -> bool {
        matches!(self, Node::Empty)
    }
}

// === Character class ===

/// Set of code points: a bitmap for code points below 256 and a sorted,
/// disjoint range list above.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharClass {
    pub bs: BitSet,
    pub ranges: Vec<CodeRange>,
    pub not: bool,
    pub ignore_case: bool,
}

impl CharClass {
    pub fn new() -> Self {
        CharClass {
            bs: [0; BITSET_REAL_SIZE],
            ranges: Vec::new(),
            not: false,
            ignore_case: false,
        }
    }

    pub fn from_ranges(ranges: &[(char, char)]) -> Self {
        let mut cc = CharClass::new();
        for &(from, to) in ranges {
            cc.add_range(from as u32, to as u32);
        }
        cc
    }

    pub fn from_chars(s: &str) -> Self {
        let mut cc = CharClass::new();
        for c in s.chars() {
            cc.add_code(c as u32);
        }
        cc
    }

    pub fn negated(mut self) -> Self {
        self.not = !self.not;
        self
    }

    pub fn case_insensitive(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    pub fn add_code(&mut self, code: u32) {
        self.add_range(code, code);
    }

    pub fn add_range(&mut self, from: u32, to: u32) {
        if from > to {
            return;
        }
        if from < SINGLE_BYTE_SIZE as u32 {
            bitset_set_range(&mut self.bs, from as usize, to as usize);
        }
        if to >= SINGLE_BYTE_SIZE as u32 {
            let from = from.max(SINGLE_BYTE_SIZE as u32);
            self.add_mb_range(from, to);
        }
    }

    fn add_mb_range(&mut self, from: u32, to: u32) {
        let mut from = from;
        let mut to = to;
        // Absorb every range that overlaps or touches [from, to].
        let mut kept = Vec::with_capacity(self.ranges.len() + 1);
        for r in self.ranges.drain(..) {
            if r.to.saturating_add(1) < from || to.saturating_add(1) < r.from {
                kept.push(r);
            } else {
                from = from.min(r.from);
                to = to.max(r.to);
            }
        }
        let pos = kept.partition_point(|r| r.from < from);
        kept.insert(pos, CodeRange { from, to });
        self.ranges = kept;
    }

    /// Membership before applying the negation flag.
    pub fn contains_raw(&self, code: u32) -> bool {
        if code < SINGLE_BYTE_SIZE as u32 {
            bitset_at(&self.bs, code as usize)
        } else {
            is_in_code_range(&self.ranges, code)
        }
    }

    pub fn contains(&self, code: u32) -> bool {
        self.contains_raw(code) != self.not
    }

    pub fn has_mb(&self) -> bool {
        !self.ranges.is_empty()
    }

    pub fn has_sb(&self) -> bool {
        !bitset_is_empty(&self.bs)
    }
}

impl Default for CharClass {
    fn default() -> Self {
        Self::new()
    }
}

// === Ast ===

/// Parsed pattern: the root node and the class arena its `CClass` nodes
/// point into.
#[derive(Clone, Debug)]
pub struct Ast {
    pub root: Node,
    pub classes: Vec<CharClass>,
}

impl Ast {
    pub fn new(root: Node) -> Self {
        Ast {
            root,
            classes: Vec::new(),
        }
    }

    pub fn add_class(&mut self, cc: CharClass) -> ClassId {
        self.classes.push(cc);
        ClassId(self.classes.len() - 1)
    }

    pub fn class(&self, id: ClassId) -> &CharClass {
        &self.classes[id.0]
    }
}

impl From<Node> for Ast {
    fn from(root: Node) -> Self {
        Ast::new(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_bitmap_and_ranges() {
        let mut cc = CharClass::from_ranges(&[('a', 'f')]);
        cc.add_range(0xf0, 0x120);
        assert!(cc.contains('c' as u32));
        assert!(cc.contains(0xff));
        assert!(cc.contains(0x100));
        assert!(cc.contains(0x120));
        assert!(!cc.contains(0x121));
        assert_eq!(cc.ranges, vec![CodeRange { from: 0x100, to: 0x120 }]);
    }

    #[test]
    fn ranges_merge_when_touching() {
        let mut cc = CharClass::new();
        cc.add_range(0x400, 0x40f);
        cc.add_range(0x300, 0x30f);
        cc.add_range(0x410, 0x41f);
        cc.add_range(0x305, 0x3ff);
        assert_eq!(cc.ranges, vec![CodeRange { from: 0x300, to: 0x41f }]);
    }

    #[test]
    fn negated_class() {
        let cc = CharClass::from_chars("xy").negated();
        assert!(!cc.contains('x' as u32));
        assert!(cc.contains('z' as u32));
        assert!(cc.contains(0x3000));
        assert!(cc.contains_raw('y' as u32));
    }

    #[test]
    fn arena_handles() {
        let mut ast = Ast::new(Node::Empty);
        let a = ast.add_class(CharClass::from_chars("a"));
        let b = ast.add_class(CharClass::from_chars("b"));
        assert_ne!(a, b);
        assert!(ast.class(b).contains('b' as u32));
    }

    #[test]
    fn anchor_bodies() {
        assert!(AnchorType::LookBehindNot.has_body());
        assert!(!AnchorType::Caret.has_body());
    }
}
