// regcomp.rs - Compiler: converts the AST into bytecode.
//
// A setup pass annotates the tree (emptiness of loop bodies, lookbehind
// lengths, literal peeks, automatic possessive loops). Code generation then
// runs two passes over the same node visitor: the length pass sizes every
// subtree so relative jumps are known before the emit pass writes them.
// Structure: operation management -> string -> class -> quantifier -> bag
// -> anchor -> tree -> setup pass -> optimizer -> entry point.

use std::mem;

use memchr::memmem;

use crate::error::RegexError;
use crate::regdef::{RegexOptions, REPEAT_INFINITE_CAP};
use crate::regenc::*;
use crate::regenv::CompileEnv;
use crate::regerror::*;
use crate::regint::*;
use crate::regparse_types::*;
use crate::regsearch::{AnchorFlags, SearchOptimizer};
use crate::unicode::{apply_all_case_fold, fold_equivalents};

// Every operation is one slot.
const SIZE_INC: i32 = 1;
const OPSIZE_JUMP: i32 = 1;
const OPSIZE_PUSH: i32 = 1;
const OPSIZE_POP: i32 = 1;
const OPSIZE_MEM_CLEAR: i32 = 1;
const OPSIZE_EMPTY_CHECK_START: i32 = 1;
const OPSIZE_EMPTY_CHECK_END: i32 = 1;
const OPSIZE_REPEAT: i32 = 1;
const OPSIZE_REPEAT_INC: i32 = 1;
const OPSIZE_ANYCHAR_STAR: i32 = 1;

const MAX_REPEAT_NUM: i32 = 100_000;

// Setup-pass state bits.
const IN_ALT: u32 = 1 << 0;
const IN_NOT: u32 = 1 << 1;
const IN_REPEAT: u32 = 1 << 2;
const IN_VAR_REPEAT: u32 = 1 << 3;

// ============================================================================
// Operation management
// ============================================================================

fn add_op(reg: &mut Program, opcode: OpCode, payload: OperationPayload) {
    reg.ops.push(Operation { opcode, payload });
}

#[inline]
fn add_opcode(reg: &mut Program, opcode: OpCode) {
    add_op(reg, opcode, OperationPayload::None);
}

#[inline]
fn add_jump(reg: &mut Program, addr: RelAddrType) {
    add_op(reg, OpCode::Jump, OperationPayload::Jump { addr });
}

#[inline]
fn add_push(reg: &mut Program, addr: RelAddrType) {
    add_op(reg, OpCode::Push, OperationPayload::Push { addr });
}

/// Reference `s` through the template table, reusing an existing template
/// that already contains it.
fn add_template(reg: &mut Program, s: &[u8]) -> OperationPayload {
    for (tmpl, t) in reg.templates.iter().enumerate() {
        if let Some(offset) = memmem::find(t, s) {
            return OperationPayload::ExactN {
                tmpl,
                offset,
                len: s.len(),
            };
        }
    }
    reg.templates.push(s.into());
    OperationPayload::ExactN {
        tmpl: reg.templates.len() - 1,
        offset: 0,
        len: s.len(),
    }
}

// ============================================================================
// Utility functions
// ============================================================================

/// Add two lengths, saturating at INFINITE_LEN.
fn distance_add(d1: usize, d2: usize) -> usize {
    if d1 == INFINITE_LEN || d2 == INFINITE_LEN {
        INFINITE_LEN
    } else {
        d1.checked_add(d2).unwrap_or(INFINITE_LEN)
    }
}

/// Multiply a length by a repeat count, saturating at INFINITE_LEN.
fn distance_multiply(d: usize, m: i32) -> usize {
    if m == 0 || d == 0 {
        return 0;
    }
    if d == INFINITE_LEN {
        return INFINITE_LEN;
    }
    d.checked_mul(m as usize).unwrap_or(INFINITE_LEN)
}

#[inline]
fn str_ignore_case(sn: &StrNode, env: &CompileEnv) -> bool {
    sn.ignore_case || env.ignore_case()
}

/// True when some character of `s` has case partners.
fn has_fold_partners(s: &[u8], unicode: bool) -> bool {
    let mut p = 0;
    while p < s.len() {
        if !fold_equivalents(mbc_to_code(s, p), unicode).is_empty() {
            return true;
        }
        p += mbc_enc_len(s[p]);
    }
    false
}

/// Literal compiled with case folding.
#[inline]
fn is_folded_str(sn: &StrNode, env: &CompileEnv) -> bool {
    str_ignore_case(sn, env) && has_fold_partners(&sn.s, env.unicode_fold())
}

/// Body that matches without pushing backtrack frames.
fn is_simple_node(node: &Node) -> bool {
    match node {
        Node::String(sn) => !sn.s.is_empty(),
        Node::CClass(_) | Node::CType(_) => true,
        _ => false,
    }
}

/// `(?>x*)` with `x` backtrack-free: compiled as a push/pop loop.
fn is_stop_bt_simple_repeat(bag: &BagNode) -> Option<&QuantNode> {
    if !matches!(bag.data, BagData::StopBacktrack) {
        return None;
    }
    match &bag.body {
        Node::Quant(qn)
            if qn.greedy
                && is_infinite_repeat(qn.upper)
                && (is_simple_node(&qn.body) || matches!(qn.body, Node::AnyChar)) =>
        {
            Some(qn)
        }
        _ => None,
    }
}

fn is_anychar_star(qn: &QuantNode) -> bool {
    qn.greedy && is_infinite_repeat(qn.upper) && matches!(qn.body, Node::AnyChar)
}

/// Half-open range of capture groups inside `node`.
fn find_enclosed_capture_groups(node: &Node) -> Option<(usize, usize)> {
    fn walk(node: &Node, range: &mut Option<(usize, usize)>) {
        match node {
            Node::List(nodes) | Node::Alt(nodes) => nodes.iter().for_each(|n| walk(n, range)),
            Node::Quant(qn) => walk(&qn.body, range),
            Node::Bag(bn) => {
                let regnum = bn.regnum();
                if regnum != 0 {
                    *range = Some(match *range {
                        Some((from, to)) => (from.min(regnum), to.max(regnum + 1)),
                        None => (regnum, regnum + 1),
                    });
                }
                walk(&bn.body, range);
            }
            Node::Anchor(an) => {
                if let Some(body) = &an.body {
                    walk(body, range);
                }
            }
            _ => {}
        }
    }
    let mut range = None;
    walk(node, &mut range);
    range
}

fn includes_referred(node: &Node, env: &CompileEnv) -> bool {
    match node {
        Node::List(nodes) | Node::Alt(nodes) => nodes.iter().any(|n| includes_referred(n, env)),
        Node::Quant(qn) => includes_referred(&qn.body, env),
        Node::Bag(bn) => {
            let regnum = bn.regnum();
            (regnum != 0 && mem_status_at0(env.backrefed_mem, regnum))
                || includes_referred(&bn.body, env)
        }
        Node::Anchor(an) => an.body.as_ref().is_some_and(|b| includes_referred(b, env)),
        _ => false,
    }
}

// ============================================================================
// Byte length analysis
// ============================================================================

fn class_byte_range(cc: &CharClass) -> (usize, usize) {
    if cc.not {
        return (1, MAX_ENC_LEN);
    }
    let has_ascii = (0..128).any(|c| bitset_at(&cc.bs, c));
    let has_latin1 = (128..SINGLE_BYTE_SIZE).any(|c| bitset_at(&cc.bs, c));
    let min = if has_ascii {
        1
    } else if has_latin1 {
        2
    } else {
        cc.ranges.first().map_or(1, |r| code_to_mbclen(r.from))
    };
    let max = match cc.ranges.last() {
        Some(r) => code_to_mbclen(r.to),
        None if has_latin1 => 2,
        None => 1,
    };
    (min, max)
}

/// Byte lengths of a case-folded literal: each character may match a
/// partner of a different encoded length.
fn ic_byte_range(s: &[u8], unicode: bool) -> (usize, usize) {
    let (mut min, mut max) = (0, 0);
    let mut p = 0;
    while p < s.len() {
        let len = mbc_enc_len(s[p]);
        let (mut lo, mut hi) = (len, len);
        for c in fold_equivalents(mbc_to_code(s, p), unicode) {
            let l = code_to_mbclen(c);
            lo = lo.min(l);
            hi = hi.max(l);
        }
        min += lo;
        max += hi;
        p += len;
    }
    (min, max)
}

/// Shortest match of `node` in bytes.
fn node_min_len(node: &Node, env: &CompileEnv) -> usize {
    match node {
        Node::Empty | Node::Anchor(_) | Node::BackRef(_) => 0,
        Node::String(sn) => {
            if str_ignore_case(sn, env) {
                ic_byte_range(&sn.s, env.unicode_fold()).0
            } else {
                sn.s.len()
            }
        }
        Node::CClass(id) => env.class(*id).map_or(1, |cc| class_byte_range(cc).0),
        Node::CType(_) | Node::AnyChar => 1,
        Node::Quant(qn) => distance_multiply(node_min_len(&qn.body, env), qn.lower),
        Node::Bag(bn) => node_min_len(&bn.body, env),
        Node::List(nodes) => nodes
            .iter()
            .fold(0, |acc, n| distance_add(acc, node_min_len(n, env))),
        Node::Alt(nodes) => nodes.iter().map(|n| node_min_len(n, env)).min().unwrap_or(0),
    }
}

/// Longest match of `node` in bytes, INFINITE_LEN when unbounded.
fn node_max_len(node: &Node, env: &CompileEnv) -> usize {
    match node {
        Node::Empty | Node::Anchor(_) => 0,
        Node::BackRef(_) => INFINITE_LEN,
        Node::String(sn) => {
            if str_ignore_case(sn, env) {
                ic_byte_range(&sn.s, env.unicode_fold()).1
            } else {
                sn.s.len()
            }
        }
        Node::CClass(id) => env.class(*id).map_or(MAX_ENC_LEN, |cc| class_byte_range(cc).1),
        Node::CType(ct) => {
            if ct.not {
                MAX_ENC_LEN
            } else {
                1
            }
        }
        Node::AnyChar => MAX_ENC_LEN,
        Node::Quant(qn) => {
            let body = node_max_len(&qn.body, env);
            if qn.upper == 0 || body == 0 {
                0
            } else if is_infinite_repeat(qn.upper) {
                INFINITE_LEN
            } else {
                distance_multiply(body, qn.upper)
            }
        }
        Node::Bag(bn) => node_max_len(&bn.body, env),
        Node::List(nodes) => nodes
            .iter()
            .fold(0, |acc, n| distance_add(acc, node_max_len(n, env))),
        Node::Alt(nodes) => nodes.iter().map(|n| node_max_len(n, env)).max().unwrap_or(0),
    }
}

/// Fixed character length of a lookbehind body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CharLen {
    Fixed(usize),
    /// Top-level alternatives are fixed but differ from each other.
    TopAltVarLen,
    VarLen,
}

fn char_length_tree(node: &Node, top: bool) -> CharLen {
    match node {
        Node::Empty | Node::Anchor(_) => CharLen::Fixed(0),
        Node::String(sn) => CharLen::Fixed(strlen(&sn.s, 0, sn.s.len())),
        Node::CClass(_) | Node::CType(_) | Node::AnyChar => CharLen::Fixed(1),
        Node::BackRef(_) => CharLen::VarLen,
        Node::Quant(qn) => {
            if qn.lower != qn.upper {
                return CharLen::VarLen;
            }
            match char_length_tree(&qn.body, false) {
                CharLen::Fixed(n) => CharLen::Fixed(n * qn.lower as usize),
                _ => CharLen::VarLen,
            }
        }
        Node::Bag(bn) => match char_length_tree(&bn.body, false) {
            CharLen::Fixed(n) => CharLen::Fixed(n),
            _ => CharLen::VarLen,
        },
        Node::List(nodes) => {
            let mut len = 0;
            for n in nodes {
                match char_length_tree(n, false) {
                    CharLen::Fixed(l) => len += l,
                    _ => return CharLen::VarLen,
                }
            }
            CharLen::Fixed(len)
        }
        Node::Alt(nodes) => {
            let mut first: Option<usize> = None;
            let mut varies = false;
            for n in nodes {
                match char_length_tree(n, false) {
                    CharLen::Fixed(l) => match first {
                        None => first = Some(l),
                        Some(f) if f != l => varies = true,
                        _ => {}
                    },
                    _ => return CharLen::VarLen,
                }
            }
            match (first, varies) {
                (_, true) if top => CharLen::TopAltVarLen,
                (_, true) => CharLen::VarLen,
                (Some(l), false) => CharLen::Fixed(l),
                (None, false) => CharLen::Fixed(0),
            }
        }
    }
}

// ============================================================================
// String compilation
// ============================================================================

fn compile_length_string_node(sn: &StrNode) -> i32 {
    if sn.s.is_empty() {
        0
    } else {
        SIZE_INC
    }
}

fn compile_string_node(sn: &StrNode, reg: &mut Program, env: &CompileEnv) {
    let s = sn.s.as_slice();
    if s.is_empty() {
        return;
    }

    if is_folded_str(sn, env) {
        if mbc_enc_len(s[0]) >= s.len() {
            add_op(
                reg,
                OpCode::Str1Ic,
                OperationPayload::ExactIc {
                    c: mbc_to_code(s, 0),
                },
            );
        } else {
            let payload = add_template(reg, s);
            add_op(reg, OpCode::StrNIc, payload);
        }
        return;
    }

    let opcode = match s.len() {
        1 => OpCode::Str1,
        2 => OpCode::Str2,
        3 => OpCode::Str3,
        4 => OpCode::Str4,
        5 => OpCode::Str5,
        _ => OpCode::StrN,
    };
    if opcode == OpCode::StrN {
        let payload = add_template(reg, s);
        add_op(reg, opcode, payload);
    } else {
        let mut buf = [0u8; 5];
        buf[..s.len()].copy_from_slice(s);
        add_op(reg, opcode, OperationPayload::Exact { s: buf });
    }
}

// ============================================================================
// Character class compilation
// ============================================================================

fn compile_cclass_node(id: ClassId, reg: &mut Program, env: &mut CompileEnv) -> Result<(), RegexError> {
    let Some(cc) = env.classes.get(id.0) else {
        return Err(RegexError::bug(REGERR_TYPE_BUG));
    };

    if env.is_shared_class(id) {
        let class = match env.class_slots[id.0] {
            Some(slot) => slot,
            None => {
                reg.classes.push(cc.clone());
                let slot = reg.classes.len() - 1;
                env.class_slots[id.0] = Some(slot);
                slot
            }
        };
        add_op(reg, OpCode::CClassNode, OperationPayload::CClassNode { class });
        return Ok(());
    }

    let (opcode, payload) = if !cc.has_mb() {
        (
            if cc.not { OpCode::CClassNot } else { OpCode::CClass },
            OperationPayload::CClass {
                bs: Box::new(cc.bs),
            },
        )
    } else if !cc.has_sb() {
        (
            if cc.not { OpCode::CClassMbNot } else { OpCode::CClassMb },
            OperationPayload::CClassMb {
                ranges: cc.ranges.clone().into_boxed_slice(),
            },
        )
    } else {
        (
            if cc.not { OpCode::CClassMixNot } else { OpCode::CClassMix },
            OperationPayload::CClassMix {
                bs: Box::new(cc.bs),
                ranges: cc.ranges.clone().into_boxed_slice(),
            },
        )
    };
    add_op(reg, opcode, payload);
    Ok(())
}

/// Close a class under case folding.
fn fold_class(mut cc: CharClass, unicode: bool) -> CharClass {
    let raw = cc.clone();
    apply_all_case_fold(unicode, |from, to| {
        if raw.contains_raw(from) {
            for &c in to {
                cc.add_code(c);
            }
        }
    });
    cc
}

// ============================================================================
// Backreference compilation
// ============================================================================

fn compile_backref_node(br: &BackRefNode, reg: &mut Program, env: &CompileEnv) -> Result<(), RegexError> {
    let ignore_case = br.ignore_case || env.ignore_case();
    match br.back_refs.as_slice() {
        [] => Err(RegexError::bug(REGERR_PARSER_BUG)),
        &[n] => {
            let (opcode, payload) = match n {
                _ if ignore_case => (OpCode::BackRefNIc, OperationPayload::BackRefN { n }),
                1 => (OpCode::BackRef1, OperationPayload::None),
                2 => (OpCode::BackRef2, OperationPayload::None),
                _ => (OpCode::BackRefN, OperationPayload::BackRefN { n }),
            };
            add_op(reg, opcode, payload);
            Ok(())
        }
        ns => {
            // Latest group of the name is tried first.
            let ns: Box<[MemNumType]> = ns.iter().rev().copied().collect();
            let opcode = if ignore_case {
                OpCode::BackRefMultiIc
            } else {
                OpCode::BackRefMulti
            };
            add_op(reg, opcode, OperationPayload::BackRefMulti { ns });
            Ok(())
        }
    }
}

// ============================================================================
// Quantifier compilation
// ============================================================================

fn add_mem_clear(reg: &mut Program, groups: Option<(usize, usize)>) {
    if let Some((from, to)) = groups {
        add_op(reg, OpCode::MemClear, OperationPayload::MemClear { from, to });
    }
}

fn compile_length_tree_with_mem_clear(node: &Node, env: &CompileEnv) -> Result<i32, RegexError> {
    let tlen = compile_length_tree(node, env)?;
    Ok(match find_enclosed_capture_groups(node) {
        Some(_) => tlen + OPSIZE_MEM_CLEAR,
        None => tlen,
    })
}

fn compile_tree_with_mem_clear(node: &Node, reg: &mut Program, env: &mut CompileEnv) -> Result<(), RegexError> {
    add_mem_clear(reg, find_enclosed_capture_groups(node));
    compile_tree(node, reg, env)
}

/// Compile a node N times (for expanding small-count quantifiers).
fn compile_tree_n_times_with_mem_clear(
    node: &Node,
    n: i32,
    reg: &mut Program,
    env: &mut CompileEnv,
) -> Result<(), RegexError> {
    let groups = find_enclosed_capture_groups(node);
    for _ in 0..n {
        add_mem_clear(reg, groups);
        compile_tree(node, reg, env)?;
    }
    Ok(())
}

/// Compile a loop body wrapped with an empty-match check if needed.
fn compile_tree_empty_check_with_mem_clear(
    node: &Node,
    emptiness: BodyEmptyType,
    reg: &mut Program,
    env: &mut CompileEnv,
) -> Result<(), RegexError> {
    add_mem_clear(reg, find_enclosed_capture_groups(node));
    if emptiness == BodyEmptyType::NotEmpty {
        return compile_tree(node, reg, env);
    }

    let id = env.new_empty_check_id();
    add_op(reg, OpCode::EmptyCheckStart, OperationPayload::EmptyCheck { id });
    compile_tree(node, reg, env)?;
    let opcode = match emptiness {
        BodyEmptyType::MayBeEmptyMem => OpCode::EmptyCheckEndMemst,
        _ => OpCode::EmptyCheckEnd,
    };
    add_op(reg, opcode, OperationPayload::EmptyCheck { id });
    Ok(())
}

fn mod_tlen(qn: &QuantNode, tlen: i32) -> i32 {
    if qn.emptiness != BodyEmptyType::NotEmpty {
        tlen + OPSIZE_EMPTY_CHECK_START + OPSIZE_EMPTY_CHECK_END
    } else {
        tlen
    }
}

/// Unrolled `{lower,upper}`: one push per optional iteration.
fn small_range_expanded_length(qn: &QuantNode, tlen: i32, mod_tlen: i32) -> i64 {
    let n = (qn.upper - qn.lower) as i64;
    let needs_jumps = qn.emptiness == BodyEmptyType::MayBeEmpty;
    qn.lower as i64 * tlen as i64
        + n * (OPSIZE_PUSH + mod_tlen + if needs_jumps { 2 * OPSIZE_JUMP } else { 0 }) as i64
}

/// Strategy chosen for a quantifier; the length and emit passes share it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum QuantShape {
    Nothing,
    AnyCharStar,
    InfiniteLoop,
    ReferredSkip,
    SmallRange,
    LazyOptional,
    RangeRepeat,
}

fn quantifier_shape(qn: &QuantNode, tlen: i32) -> QuantShape {
    let infinite = is_infinite_repeat(qn.upper);
    let greedy = qn.greedy || qn.lower == qn.upper;
    let limit = QUANTIFIER_EXPAND_LIMIT_SIZE as i64;

    if tlen == 0 {
        return QuantShape::Nothing;
    }
    if qn.upper == 0 {
        return if qn.include_referred {
            QuantShape::ReferredSkip
        } else {
            QuantShape::Nothing
        };
    }
    if is_anychar_star(qn) && tlen as i64 * qn.lower as i64 <= limit {
        return QuantShape::AnyCharStar;
    }
    if infinite
        && ((qn.lower == 1 && qn.emptiness == BodyEmptyType::NotEmpty)
            || tlen as i64 * qn.lower as i64 <= limit)
    {
        return QuantShape::InfiniteLoop;
    }
    if !infinite
        && greedy
        && (qn.upper == 1 || small_range_expanded_length(qn, tlen, mod_tlen(qn, tlen)) <= limit)
    {
        return QuantShape::SmallRange;
    }
    if !greedy && qn.upper == 1 && qn.lower == 0 {
        return QuantShape::LazyOptional;
    }
    QuantShape::RangeRepeat
}

/// Calculate bytecode length for a quantifier node.
fn compile_length_quantifier_node(qn: &QuantNode, env: &CompileEnv) -> Result<i32, RegexError> {
    let tlen = compile_length_tree_with_mem_clear(&qn.body, env)?;
    let mod_tlen = mod_tlen(qn, tlen);

    Ok(match quantifier_shape(qn, tlen) {
        QuantShape::Nothing => 0,
        QuantShape::AnyCharStar => tlen * qn.lower + OPSIZE_ANYCHAR_STAR,
        QuantShape::InfiniteLoop => {
            let prefix = if qn.lower == 1
                && qn.emptiness == BodyEmptyType::NotEmpty
                && tlen > QUANTIFIER_EXPAND_LIMIT_SIZE
            {
                OPSIZE_JUMP
            } else {
                tlen * qn.lower
            };
            // greedy: PUSH body JUMP; lazy: JUMP body PUSH
            prefix + OPSIZE_PUSH + mod_tlen + OPSIZE_JUMP
        }
        QuantShape::ReferredSkip => OPSIZE_JUMP + tlen,
        QuantShape::SmallRange => small_range_expanded_length(qn, tlen, mod_tlen) as i32,
        QuantShape::LazyOptional => OPSIZE_PUSH + OPSIZE_JUMP + tlen,
        QuantShape::RangeRepeat => OPSIZE_REPEAT + tlen + OPSIZE_REPEAT_INC,
    })
}

/// Compile a quantifier node to bytecode.
fn compile_quantifier_node(qn: &QuantNode, reg: &mut Program, env: &mut CompileEnv) -> Result<(), RegexError> {
    let tlen = compile_length_tree_with_mem_clear(&qn.body, env)?;
    let mod_tlen = mod_tlen(qn, tlen);
    let body = &qn.body;

    match quantifier_shape(qn, tlen) {
        QuantShape::Nothing => {}

        QuantShape::AnyCharStar => {
            compile_tree_n_times_with_mem_clear(body, qn.lower, reg, env)?;
            let ml = reg.options.contains(RegexOptions::DOTALL);
            match qn.next_head_exact {
                Some(c) => {
                    let opcode = if ml {
                        OpCode::AnyCharMlStarPeekNext
                    } else {
                        OpCode::AnyCharStarPeekNext
                    };
                    add_op(reg, opcode, OperationPayload::AnyCharStarPeekNext { c });
                }
                None => add_opcode(
                    reg,
                    if ml { OpCode::AnyCharMlStar } else { OpCode::AnyCharStar },
                ),
            }
        }

        QuantShape::InfiniteLoop => {
            // A non-empty body with lower bound 1 enters the loop past its
            // exit branch instead of being copied once.
            if qn.lower == 1
                && qn.emptiness == BodyEmptyType::NotEmpty
                && tlen > QUANTIFIER_EXPAND_LIMIT_SIZE
            {
                add_jump(reg, SIZE_INC + OPSIZE_PUSH);
            } else {
                compile_tree_n_times_with_mem_clear(body, qn.lower, reg, env)?;
            }

            if qn.greedy {
                let addr = SIZE_INC + mod_tlen + OPSIZE_JUMP;
                match (qn.head_exact, qn.next_head_exact) {
                    (Some(c), _) => add_op(
                        reg,
                        OpCode::PushOrJumpExact1,
                        OperationPayload::PushOrJumpExact1 { addr, c },
                    ),
                    (None, Some(c)) => add_op(
                        reg,
                        OpCode::PushIfPeekNext,
                        OperationPayload::PushIfPeekNext { addr, c },
                    ),
                    (None, None) => add_push(reg, addr),
                }
                compile_tree_empty_check_with_mem_clear(body, qn.emptiness, reg, env)?;
                add_jump(reg, -(mod_tlen + OPSIZE_PUSH));
            } else {
                add_jump(reg, mod_tlen + SIZE_INC);
                compile_tree_empty_check_with_mem_clear(body, qn.emptiness, reg, env)?;
                add_push(reg, -mod_tlen);
            }
        }

        QuantShape::ReferredSkip => {
            add_jump(reg, tlen + SIZE_INC);
            compile_tree_with_mem_clear(body, reg, env)?;
        }

        QuantShape::SmallRange => {
            let n = qn.upper - qn.lower;
            compile_tree_n_times_with_mem_clear(body, qn.lower, reg, env)?;

            // A skipped empty iteration falls onto the second jump and
            // leaves the remaining optional iterations.
            let needs_jumps = qn.emptiness == BodyEmptyType::MayBeEmpty;
            let unit = OPSIZE_PUSH + mod_tlen + if needs_jumps { 2 * OPSIZE_JUMP } else { 0 };
            for i in 0..n {
                add_push(reg, (n - i) * unit);
                compile_tree_empty_check_with_mem_clear(body, qn.emptiness, reg, env)?;
                if needs_jumps {
                    add_jump(reg, SIZE_INC + OPSIZE_JUMP);
                    add_jump(reg, (n - i - 1) * unit + SIZE_INC);
                }
            }
        }

        QuantShape::LazyOptional => {
            add_push(reg, SIZE_INC + OPSIZE_JUMP);
            add_jump(reg, tlen + SIZE_INC);
            compile_tree_with_mem_clear(body, reg, env)?;
        }

        QuantShape::RangeRepeat => {
            let id = entry_repeat_range(reg, env, qn.lower, qn.upper);
            let opcode = if qn.greedy { OpCode::Repeat } else { OpCode::RepeatNg };
            add_op(
                reg,
                opcode,
                OperationPayload::Repeat {
                    id,
                    addr: SIZE_INC + tlen + OPSIZE_REPEAT_INC,
                },
            );
            compile_tree_with_mem_clear(body, reg, env)?;
            let opcode = match (qn.greedy, qn.in_repeat) {
                (true, false) => OpCode::RepeatInc,
                (false, false) => OpCode::RepeatIncNg,
                (true, true) => OpCode::RepeatIncSg,
                (false, true) => OpCode::RepeatIncNgSg,
            };
            add_op(reg, opcode, OperationPayload::RepeatInc { id });
        }
    }
    Ok(())
}

fn entry_repeat_range(reg: &mut Program, env: &mut CompileEnv, lower: i32, upper: i32) -> usize {
    let id = env.new_repeat_id();
    let upper = if is_infinite_repeat(upper) {
        REPEAT_INFINITE_CAP
    } else {
        upper
    };
    reg.repeat_range.push(RepeatRange { lower, upper });
    id
}

// ============================================================================
// Bag (group) compilation
// ============================================================================

/// Calculate bytecode length for a bag node.
fn compile_length_bag_node(bag: &BagNode, env: &CompileEnv) -> Result<i32, RegexError> {
    if let Some(qn) = is_stop_bt_simple_repeat(bag) {
        let tlen = compile_length_tree(&qn.body, env)?;
        return Ok(tlen * qn.lower + OPSIZE_PUSH + tlen + OPSIZE_POP + OPSIZE_JUMP);
    }

    let tlen = compile_length_tree(&bag.body, env)?;
    Ok(match bag.data {
        BagData::Memory { regnum: 0, .. } => tlen,
        // MEM_START + body + MEM_END, PUSH_STOP_BT + body + POP_STOP_BT
        _ => tlen + 2,
    })
}

fn compile_bag_node(bag: &BagNode, reg: &mut Program, env: &mut CompileEnv) -> Result<(), RegexError> {
    match bag.data {
        BagData::Memory { regnum: 0, .. } => compile_tree(&bag.body, reg, env),
        BagData::Memory { regnum, .. } => {
            let opcode = if mem_status_at0(env.bt_mem_start, regnum) {
                OpCode::MemStartPush
            } else {
                OpCode::MemStart
            };
            add_op(reg, opcode, OperationPayload::Memory { num: regnum });
            compile_tree(&bag.body, reg, env)?;
            let opcode = if mem_status_at0(env.bt_mem_end, regnum) {
                OpCode::MemEndPush
            } else {
                OpCode::MemEnd
            };
            add_op(reg, opcode, OperationPayload::Memory { num: regnum });
            Ok(())
        }
        BagData::StopBacktrack => {
            if let Some(qn) = is_stop_bt_simple_repeat(bag) {
                let tlen = compile_length_tree(&qn.body, env)?;
                for _ in 0..qn.lower {
                    compile_tree(&qn.body, reg, env)?;
                }
                add_push(reg, SIZE_INC + tlen + OPSIZE_POP + OPSIZE_JUMP);
                compile_tree(&qn.body, reg, env)?;
                add_opcode(reg, OpCode::Pop);
                add_jump(reg, -(OPSIZE_PUSH + tlen + OPSIZE_POP));
                return Ok(());
            }
            add_opcode(reg, OpCode::PushStopBt);
            compile_tree(&bag.body, reg, env)?;
            add_opcode(reg, OpCode::PopStopBt);
            Ok(())
        }
    }
}

// ============================================================================
// Anchor compilation
// ============================================================================

fn compile_length_anchor_node(an: &AnchorNode, env: &CompileEnv) -> Result<i32, RegexError> {
    let tlen = match &an.body {
        Some(body) => compile_length_tree(body, env)?,
        None => 0,
    };
    Ok(match an.anchor_type {
        AnchorType::PrecRead => SIZE_INC + tlen + SIZE_INC,
        AnchorType::PrecReadNot => SIZE_INC + tlen + SIZE_INC,
        AnchorType::LookBehind => SIZE_INC + tlen,
        AnchorType::LookBehindNot => SIZE_INC + tlen + SIZE_INC,
        _ => SIZE_INC,
    })
}

fn compile_anchor_node(an: &AnchorNode, reg: &mut Program, env: &mut CompileEnv) -> Result<(), RegexError> {
    let multiline = reg.options.contains(RegexOptions::MULTILINE);
    let opcode = match an.anchor_type {
        AnchorType::BeginBuf => OpCode::BeginBuf,
        AnchorType::EndBuf => OpCode::EndBuf,
        AnchorType::SemiEndBuf => OpCode::SemiEndBuf,
        AnchorType::BeginLine => OpCode::BeginLine,
        AnchorType::EndLine => OpCode::EndLine,
        AnchorType::Caret if multiline => OpCode::BeginLine,
        AnchorType::Caret => OpCode::BeginBuf,
        AnchorType::Dollar if multiline => OpCode::EndLine,
        AnchorType::Dollar => OpCode::SemiEndBuf,
        AnchorType::BeginPosition => OpCode::BeginPosition,
        AnchorType::WordBoundary => OpCode::WordBoundary,
        AnchorType::NoWordBoundary => OpCode::NoWordBoundary,
        AnchorType::WordBegin => OpCode::WordBegin,
        AnchorType::WordEnd => OpCode::WordEnd,
        AnchorType::PrecRead
        | AnchorType::PrecReadNot
        | AnchorType::LookBehind
        | AnchorType::LookBehindNot => {
            let Some(body) = &an.body else {
                return Err(RegexError::bug(REGERR_PARSER_BUG));
            };
            return compile_look_node(an, body, reg, env);
        }
    };
    add_opcode(reg, opcode);
    Ok(())
}

fn compile_look_node(
    an: &AnchorNode,
    body: &Node,
    reg: &mut Program,
    env: &mut CompileEnv,
) -> Result<(), RegexError> {
    match an.anchor_type {
        AnchorType::PrecRead => {
            add_opcode(reg, OpCode::PushPos);
            compile_tree(body, reg, env)?;
            add_opcode(reg, OpCode::PopPos);
        }
        AnchorType::PrecReadNot => {
            let tlen = compile_length_tree(body, env)?;
            add_op(
                reg,
                OpCode::PushPosNot,
                OperationPayload::PushPosNot {
                    addr: SIZE_INC + tlen + SIZE_INC,
                },
            );
            compile_tree(body, reg, env)?;
            add_opcode(reg, OpCode::FailPos);
        }
        AnchorType::LookBehind => {
            add_op(
                reg,
                OpCode::LookBehind,
                OperationPayload::LookBehind { len: an.char_len },
            );
            compile_tree(body, reg, env)?;
        }
        _ => {
            let tlen = compile_length_tree(body, env)?;
            add_op(
                reg,
                OpCode::PushLookBehindNot,
                OperationPayload::PushLookBehindNot {
                    addr: SIZE_INC + tlen + SIZE_INC,
                    len: an.char_len,
                },
            );
            compile_tree(body, reg, env)?;
            add_opcode(reg, OpCode::FailLookBehindNot);
        }
    }
    Ok(())
}

// ============================================================================
// Tree compilation
// ============================================================================

/// Number of operation slots `node` compiles to.
fn compile_length_tree(node: &Node, env: &CompileEnv) -> Result<i32, RegexError> {
    Ok(match node {
        Node::Empty => 0,
        Node::List(nodes) => {
            let mut len = 0;
            for n in nodes {
                len += compile_length_tree(n, env)?;
            }
            len
        }
        Node::Alt(nodes) => {
            let mut len = 0;
            for n in nodes {
                len += compile_length_tree(n, env)?;
            }
            len + (OPSIZE_PUSH + OPSIZE_JUMP) * (nodes.len().saturating_sub(1) as i32)
        }
        Node::String(sn) => compile_length_string_node(sn),
        Node::CClass(_) | Node::CType(_) | Node::AnyChar | Node::BackRef(_) => SIZE_INC,
        Node::Quant(qn) => compile_length_quantifier_node(qn, env)?,
        Node::Bag(bn) => compile_length_bag_node(bn, env)?,
        Node::Anchor(an) => compile_length_anchor_node(an, env)?,
    })
}

/// Emit the bytecode of `node`; consistent with `compile_length_tree`.
fn compile_tree(node: &Node, reg: &mut Program, env: &mut CompileEnv) -> Result<(), RegexError> {
    match node {
        Node::Empty => {}
        Node::List(nodes) => {
            for n in nodes {
                compile_tree(n, reg, env)?;
            }
        }
        Node::Alt(nodes) => {
            let total = compile_length_tree(node, env)?;
            let end = reg.ops.len() as i32 + total;
            let last = nodes.len().saturating_sub(1);
            for (i, n) in nodes.iter().enumerate() {
                if i == last {
                    compile_tree(n, reg, env)?;
                    break;
                }
                let len = compile_length_tree(n, env)?;
                add_push(reg, SIZE_INC + len + OPSIZE_JUMP);
                compile_tree(n, reg, env)?;
                let here = reg.ops.len() as i32;
                add_jump(reg, end - here);
            }
        }
        Node::String(sn) => compile_string_node(sn, reg, env),
        Node::CClass(id) => compile_cclass_node(*id, reg, env)?,
        Node::CType(ct) => add_opcode(reg, if ct.not { OpCode::NoWord } else { OpCode::Word }),
        Node::AnyChar => {
            let opcode = if reg.options.contains(RegexOptions::DOTALL) {
                OpCode::AnyCharMl
            } else {
                OpCode::AnyChar
            };
            add_opcode(reg, opcode);
        }
        Node::BackRef(br) => compile_backref_node(br, reg, env)?,
        Node::Quant(qn) => compile_quantifier_node(qn, reg, env)?,
        Node::Bag(bn) => compile_bag_node(bn, reg, env)?,
        Node::Anchor(an) => compile_anchor_node(an, reg, env)?,
    }
    Ok(())
}

// ============================================================================
// Setup pass
// ============================================================================

fn check_repeat_range(lower: i32, upper: i32) -> Result<(), RegexError> {
    if lower < 0 || (upper < 0 && !is_infinite_repeat(upper)) {
        return Err(RegexError::pattern(REGERR_INVALID_REPEAT_RANGE_PATTERN, None));
    }
    if lower > MAX_REPEAT_NUM || upper > MAX_REPEAT_NUM {
        return Err(RegexError::pattern(REGERR_TOO_BIG_NUMBER_FOR_REPEAT_RANGE, None));
    }
    if !is_infinite_repeat(upper) && upper < lower {
        return Err(RegexError::pattern(
            REGERR_UPPER_SMALLER_THAN_LOWER_IN_REPEAT_RANGE,
            None,
        ));
    }
    Ok(())
}

/// First thing a node must match, if it is a literal, class or word type.
enum HeadValue<'a> {
    Str(&'a StrNode),
    Class(&'a CharClass),
    Ctype { not: bool },
}

fn get_head_value<'a>(node: &'a Node, exact: bool, env: &'a CompileEnv) -> Option<HeadValue<'a>> {
    match node {
        Node::String(sn) => {
            if sn.s.is_empty() || (exact && str_ignore_case(sn, env)) {
                None
            } else {
                Some(HeadValue::Str(sn))
            }
        }
        Node::CClass(id) if !exact => env.class(*id).map(HeadValue::Class),
        Node::CType(ct) if !exact => Some(HeadValue::Ctype { not: ct.not }),
        Node::Quant(qn) if qn.lower > 0 => get_head_value(&qn.body, exact, env),
        Node::List(nodes) => nodes.first().and_then(|n| get_head_value(n, exact, env)),
        Node::Bag(bn) => get_head_value(&bn.body, exact, env),
        Node::Anchor(an) if an.anchor_type == AnchorType::PrecRead => {
            an.body.as_ref().and_then(|b| get_head_value(b, exact, env))
        }
        _ => None,
    }
}

/// First byte of the case-sensitive literal `node` starts with.
fn head_exact_byte(node: &Node, env: &CompileEnv) -> Option<u8> {
    match get_head_value(node, true, env)? {
        HeadValue::Str(sn) => Some(sn.s[0]),
        _ => None,
    }
}

/// First character of a case-sensitive literal.
fn exact_head_code(sn: &StrNode, env: &CompileEnv) -> Option<CodePoint> {
    if str_ignore_case(sn, env) {
        None
    } else {
        Some(mbc_to_code(&sn.s, 0))
    }
}

/// True when no character can start both `x` and `y`.
fn is_not_included(x: &HeadValue, y: &HeadValue, env: &CompileEnv) -> bool {
    match (x, y) {
        (HeadValue::Str(a), HeadValue::Str(b)) => match (exact_head_code(a, env), exact_head_code(b, env)) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        },
        (HeadValue::Class(cc), HeadValue::Str(sn)) | (HeadValue::Str(sn), HeadValue::Class(cc)) => {
            exact_head_code(sn, env).is_some_and(|c| !cc.contains(c))
        }
        (HeadValue::Ctype { not }, HeadValue::Str(sn))
        | (HeadValue::Str(sn), HeadValue::Ctype { not }) => {
            exact_head_code(sn, env).is_some_and(|c| is_code_word(c) == *not)
        }
        (HeadValue::Ctype { not: a }, HeadValue::Ctype { not: b }) => a != b,
        _ => false,
    }
}

/// Annotate `node` from the node that follows it in a sequence: peek
/// literals for loops, and `x*y` -> `(?>x*)y` when `x` and `y` are disjoint.
fn next_setup(node: &mut Node, next: &Node, env: &CompileEnv) {
    let possessive = match node {
        Node::Quant(qn) if qn.greedy && is_infinite_repeat(qn.upper) => {
            qn.next_head_exact = head_exact_byte(next, env);
            qn.lower <= 1
                && is_simple_node(&qn.body)
                && match (
                    get_head_value(&qn.body, false, env),
                    get_head_value(next, false, env),
                ) {
                    (Some(x), Some(y)) => is_not_included(&x, &y, env),
                    _ => false,
                }
        }
        Node::Bag(bn) if matches!(bn.data, BagData::Memory { .. }) => {
            next_setup(&mut bn.body, next, env);
            false
        }
        _ => false,
    };
    if possessive {
        let qn = mem::replace(node, Node::Empty);
        *node = Node::atomic(qn);
    }
}

/// Split `(?<=a|bc)` into `(?<=a)|(?<=bc)` and `(?<!a|bc)` into
/// `(?<!a)(?<!bc)`.
fn divide_look_behind_alternatives(node: &mut Node) -> Result<(), RegexError> {
    let Node::Anchor(an) = node else {
        return Err(RegexError::bug(REGERR_PARSER_BUG));
    };
    let anchor_type = an.anchor_type;
    let Some(Node::Alt(branches)) = an.body.take() else {
        return Err(RegexError::pattern(REGERR_INVALID_LOOK_BEHIND_PATTERN, None));
    };
    let looks: Vec<Node> = branches
        .into_iter()
        .map(|b| Node::look(anchor_type, b))
        .collect();
    *node = if anchor_type == AnchorType::LookBehind {
        Node::Alt(looks)
    } else {
        Node::List(looks)
    };
    Ok(())
}

fn setup_look_behind(an: &mut AnchorNode) -> Result<bool, RegexError> {
    let Some(body) = &an.body else {
        return Err(RegexError::bug(REGERR_PARSER_BUG));
    };
    match char_length_tree(body, true) {
        CharLen::Fixed(len) => {
            an.char_len = len;
            Ok(false)
        }
        CharLen::TopAltVarLen => Ok(true),
        CharLen::VarLen => Err(RegexError::pattern(REGERR_INVALID_LOOK_BEHIND_PATTERN, None)),
    }
}

fn setup_tree(node: &mut Node, env: &mut CompileEnv, state: u32) -> Result<(), RegexError> {
    match node {
        Node::List(nodes) => {
            for n in nodes.iter_mut() {
                setup_tree(n, env, state)?;
            }
            for i in 1..nodes.len() {
                let (prev, rest) = nodes.split_at_mut(i);
                next_setup(&mut prev[i - 1], &rest[0], env);
            }
        }
        Node::Alt(nodes) => {
            for n in nodes.iter_mut() {
                setup_tree(n, env, state | IN_ALT)?;
            }
        }
        Node::Quant(qn) => {
            check_repeat_range(qn.lower, qn.upper)?;
            if state & IN_REPEAT != 0 {
                qn.in_repeat = true;
            }
            let mut body_state = state | IN_REPEAT;
            if qn.lower != qn.upper {
                body_state |= IN_VAR_REPEAT;
            }
            setup_tree(&mut qn.body, env, body_state)?;

            if (is_infinite_repeat(qn.upper) || qn.upper >= 1) && node_min_len(&qn.body, env) == 0 {
                qn.emptiness = if find_enclosed_capture_groups(&qn.body).is_some() {
                    BodyEmptyType::MayBeEmptyMem
                } else {
                    BodyEmptyType::MayBeEmpty
                };
            }
            qn.include_referred = includes_referred(&qn.body, env);
            if qn.greedy && qn.emptiness == BodyEmptyType::NotEmpty {
                qn.head_exact = match &mut qn.body {
                    Node::Quant(inner) => inner.head_exact.take(),
                    body => head_exact_byte(body, env),
                };
            }
        }
        Node::Bag(bn) => {
            let regnum = bn.regnum();
            if regnum != 0 && state & (IN_ALT | IN_NOT | IN_VAR_REPEAT) != 0 {
                mem_status_on(&mut env.bt_mem_start, regnum);
            }
            setup_tree(&mut bn.body, env, state)?;
        }
        Node::Anchor(an) => match an.anchor_type {
            AnchorType::PrecRead => {
                if let Some(body) = an.body.as_mut() {
                    setup_tree(body, env, state)?;
                }
            }
            AnchorType::PrecReadNot => {
                if let Some(body) = an.body.as_mut() {
                    setup_tree(body, env, state | IN_NOT)?;
                }
            }
            AnchorType::LookBehind | AnchorType::LookBehindNot => {
                if setup_look_behind(an)? {
                    divide_look_behind_alternatives(node)?;
                    return setup_tree(node, env, state);
                }
                let body_state = if an.anchor_type == AnchorType::LookBehindNot {
                    state | IN_NOT
                } else {
                    state
                };
                if let Some(body) = an.body.as_mut() {
                    setup_tree(body, env, body_state)?;
                }
            }
            _ => {}
        },
        _ => {}
    }
    Ok(())
}

// ============================================================================
// Optimizer derivation
// ============================================================================

/// Sequence elements every match passes through, in order.
fn flatten_sequence<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    match node {
        Node::List(nodes) => nodes.iter().for_each(|n| flatten_sequence(n, out)),
        Node::Bag(bn) => flatten_sequence(&bn.body, out),
        _ => out.push(node),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HeadInfo {
    /// Every match of the node starts with one of the collected bytes.
    Consumes,
    /// The node may match the empty string.
    MayBeEmpty,
    Unknown,
}

fn add_code_lead_bytes(map: &mut [bool; CHAR_MAP_SIZE], from: CodePoint, to: CodePoint) {
    for b in code_to_lead_byte(from)..=code_to_lead_byte(to) {
        map[b as usize] = true;
    }
}

/// Collect the lead bytes `node` can start with.
fn lead_bytes(node: &Node, env: &CompileEnv, map: &mut [bool; CHAR_MAP_SIZE]) -> HeadInfo {
    match node {
        Node::Empty | Node::Anchor(_) => HeadInfo::MayBeEmpty,
        Node::AnyChar | Node::BackRef(_) => HeadInfo::Unknown,
        Node::String(sn) => {
            if sn.s.is_empty() {
                return HeadInfo::MayBeEmpty;
            }
            let c = mbc_to_code(&sn.s, 0);
            map[sn.s[0] as usize] = true;
            if str_ignore_case(sn, env) {
                for e in fold_equivalents(c, env.unicode_fold()) {
                    add_code_lead_bytes(map, e, e);
                }
            }
            HeadInfo::Consumes
        }
        Node::CClass(id) => match env.class(*id) {
            Some(cc) if !cc.not => {
                for c in 0..SINGLE_BYTE_SIZE {
                    if bitset_at(&cc.bs, c) {
                        add_code_lead_bytes(map, c as CodePoint, c as CodePoint);
                    }
                }
                for r in cc.ranges.iter() {
                    add_code_lead_bytes(map, r.from, r.to);
                }
                HeadInfo::Consumes
            }
            _ => HeadInfo::Unknown,
        },
        Node::CType(ct) => {
            if ct.not {
                return HeadInfo::Unknown;
            }
            for b in 0..128u8 {
                if is_code_word(b as CodePoint) {
                    map[b as usize] = true;
                }
            }
            HeadInfo::Consumes
        }
        Node::Quant(qn) => {
            if qn.upper == 0 {
                return HeadInfo::MayBeEmpty;
            }
            match lead_bytes(&qn.body, env, map) {
                HeadInfo::Consumes if qn.lower == 0 => HeadInfo::MayBeEmpty,
                info => info,
            }
        }
        Node::Bag(bn) => lead_bytes(&bn.body, env, map),
        Node::List(nodes) => {
            for n in nodes {
                match lead_bytes(n, env, map) {
                    HeadInfo::MayBeEmpty => continue,
                    info => return info,
                }
            }
            HeadInfo::MayBeEmpty
        }
        Node::Alt(nodes) => {
            let mut result = HeadInfo::Consumes;
            for n in nodes {
                match lead_bytes(n, env, map) {
                    HeadInfo::Unknown => return HeadInfo::Unknown,
                    HeadInfo::MayBeEmpty => result = HeadInfo::MayBeEmpty,
                    HeadInfo::Consumes => {}
                }
            }
            result
        }
    }
}

fn set_optimize_info(root: &Node, env: &CompileEnv) -> SearchOptimizer {
    let mut items = Vec::new();
    flatten_sequence(root, &mut items);

    let multiline = env.options.contains(RegexOptions::MULTILINE);
    let mut anchor = AnchorFlags::empty();
    let (mut dmin, mut dmax) = (0usize, 0usize);
    // (literal, folded, dist_min, dist_max)
    let mut best: Option<(&StrNode, bool, usize, usize)> = None;

    for item in items {
        match item {
            Node::Anchor(an) if dmax == 0 => match an.anchor_type {
                AnchorType::BeginBuf => anchor |= AnchorFlags::BEGIN_BUF,
                AnchorType::Caret if !multiline => anchor |= AnchorFlags::BEGIN_BUF,
                AnchorType::BeginLine | AnchorType::Caret => anchor |= AnchorFlags::BEGIN_LINE,
                _ => {}
            },
            Node::String(sn) if !sn.s.is_empty() => {
                let folded = is_folded_str(sn, env);
                let better = match best {
                    None => true,
                    Some((b, b_folded, _, _)) => {
                        (b_folded && !folded) || (b_folded == folded && sn.s.len() > b.s.len())
                    }
                };
                if better {
                    best = Some((sn, folded, dmin, dmax));
                }
            }
            _ => {}
        }
        dmin = distance_add(dmin, node_min_len(item, env));
        dmax = distance_add(dmax, node_max_len(item, env));
    }

    let opt = match best {
        Some((sn, false, lo, hi)) => SearchOptimizer::literal(&sn.s, lo, hi),
        Some((sn, true, lo, hi)) => SearchOptimizer::literal_ic(&sn.s, lo, hi, env.unicode_fold()),
        None => {
            let mut map = [false; CHAR_MAP_SIZE];
            match lead_bytes(root, env, &mut map) {
                HeadInfo::Consumes => SearchOptimizer::lead_map(map),
                _ => SearchOptimizer::none(),
            }
        }
    };
    opt.with_anchor(anchor)
}

// ============================================================================
// Entry point
// ============================================================================

/// Compile a pattern AST into an immutable [`Program`].
pub fn compile(ast: Ast, options: RegexOptions) -> Result<Program, RegexError> {
    let Ast { mut root, classes } = ast;
    let mut env = CompileEnv::new(options, classes.len())?;
    env.assign_groups(&mut root)?;

    let unicode = env.unicode_fold();
    let ignore_case = env.ignore_case();
    env.classes = classes
        .into_iter()
        .map(|cc| {
            if cc.ignore_case || ignore_case {
                fold_class(cc, unicode)
            } else {
                cc
            }
        })
        .collect();

    setup_tree(&mut root, &mut env, 0)?;
    env.bt_mem_start |= env.backrefed_mem;
    env.bt_mem_end |= env.backrefed_mem;
    if options.is_find_condition() {
        mem_status_on_all(&mut env.bt_mem_end);
    }

    let mut reg = Program::new(options);
    let len = compile_length_tree(&root, &env)?;
    reg.ops.reserve(len as usize + 2);
    compile_tree(&root, &mut reg, &mut env)?;
    if reg.ops.len() != len as usize {
        return Err(RegexError::bug(REGERR_UNEXPECTED_BYTECODE));
    }
    add_opcode(&mut reg, OpCode::End);
    add_opcode(&mut reg, OpCode::Finish);

    reg.num_mem = env.num_mem;
    reg.num_repeat = env.num_repeat;
    reg.num_empty_check = env.num_empty_check;
    reg.push_mem_start = env.bt_mem_start;
    reg.push_mem_end = env.bt_mem_end;
    reg.stack_pop_level = if env.num_repeat > 0 || env.bt_mem_end != 0 {
        StackPopLevel::All
    } else if env.bt_mem_start != 0 {
        StackPopLevel::MemStart
    } else {
        StackPopLevel::Free
    };
    reg.optimizer = set_optimize_info(&root, &env);
    reg.name_table = mem::take(&mut env.name_table);
    Ok(reg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opcodes(prog: &Program) -> Vec<OpCode> {
        prog.ops.iter().map(|op| op.opcode).collect()
    }

    fn compile_node(node: Node) -> Program {
        compile(Ast::new(node), RegexOptions::empty()).unwrap()
    }

    fn jump_targets_in_range(prog: &Program) {
        for (p, op) in prog.ops.iter().enumerate() {
            let addr = match op.payload {
                OperationPayload::Jump { addr }
                | OperationPayload::Push { addr }
                | OperationPayload::PushOrJumpExact1 { addr, .. }
                | OperationPayload::PushIfPeekNext { addr, .. }
                | OperationPayload::Repeat { addr, .. }
                | OperationPayload::PushPosNot { addr }
                | OperationPayload::PushLookBehindNot { addr, .. } => addr,
                _ => continue,
            };
            let target = p as i32 + addr;
            assert!(target >= 0 && (target as usize) < prog.ops.len(), "op {} -> {}", p, target);
        }
    }

    #[test]
    fn alternation_layout() {
        let prog = compile_node(Node::alt(vec![Node::str("a"), Node::str("b")]));
        use OpCode::*;
        assert_eq!(opcodes(&prog), vec![Push, Str1, Jump, Str1, End, Finish]);
        assert!(matches!(prog.ops[0].payload, OperationPayload::Push { addr: 3 }));
        assert!(matches!(prog.ops[2].payload, OperationPayload::Jump { addr: 2 }));
    }

    #[test]
    fn star_uses_head_exact_push() {
        let prog = compile_node(Node::star(Node::str("a")));
        use OpCode::*;
        assert_eq!(opcodes(&prog), vec![PushOrJumpExact1, Str1, Jump, End, Finish]);
        assert!(matches!(
            prog.ops[0].payload,
            OperationPayload::PushOrJumpExact1 { addr: 3, c: b'a' }
        ));
        assert!(matches!(prog.ops[2].payload, OperationPayload::Jump { addr: -2 }));
    }

    #[test]
    fn disjoint_follower_makes_loop_possessive() {
        let prog = compile_node(Node::list(vec![Node::star(Node::str("a")), Node::str("b")]));
        use OpCode::*;
        assert_eq!(opcodes(&prog), vec![Push, Str1, Pop, Jump, Str1, End, Finish]);
        jump_targets_in_range(&prog);
    }

    #[test]
    fn peek_next_for_overlapping_follower() {
        let prog = compile_node(Node::list(vec![Node::star(Node::any()), Node::str("x")]));
        assert_eq!(prog.ops[0].opcode, OpCode::AnyCharStarPeekNext);
        assert!(matches!(
            prog.ops[0].payload,
            OperationPayload::AnyCharStarPeekNext { c: b'x' }
        ));
    }

    #[test]
    fn empty_loop_bodies_are_checked() {
        let prog = compile_node(Node::star(Node::star(Node::str("a"))));
        assert!(opcodes(&prog).contains(&OpCode::EmptyCheckEnd));
        assert_eq!(prog.num_empty_check, 1);

        let prog = compile_node(Node::star(Node::group(Node::star(Node::str("a")))));
        let ops = opcodes(&prog);
        assert!(ops.contains(&OpCode::EmptyCheckEndMemst));
        assert!(ops.contains(&OpCode::MemClear));
        assert!(ops.contains(&OpCode::MemStartPush));
        jump_targets_in_range(&prog);
    }

    #[test]
    fn small_range_is_unrolled() {
        let prog = compile_node(Node::quant(Node::str("a"), 2, 5, true));
        use OpCode::*;
        assert_eq!(
            opcodes(&prog),
            vec![Str1, Str1, Push, Str1, Push, Str1, Push, Str1, End, Finish]
        );
        assert!(matches!(prog.ops[2].payload, OperationPayload::Push { addr: 6 }));
        assert_eq!(prog.num_repeat, 0);
    }

    #[test]
    fn large_range_uses_repeat() {
        let prog = compile_node(Node::quant(Node::str("ab"), 2, 100, true));
        use OpCode::*;
        assert_eq!(opcodes(&prog), vec![Repeat, Str2, RepeatInc, End, Finish]);
        assert_eq!(prog.repeat_range, vec![RepeatRange { lower: 2, upper: 100 }]);
        assert_eq!(prog.stack_pop_level, StackPopLevel::All);

        let nested = Node::star(Node::list(vec![
            Node::str("x"),
            Node::quant(Node::str("ab"), 2, 100, false),
        ]));
        let prog = compile_node(nested);
        assert!(opcodes(&prog).contains(&RepeatIncNgSg));
        jump_targets_in_range(&prog);
    }

    #[test]
    fn lazy_optional_and_zero_upper() {
        let prog = compile_node(Node::quant(Node::str("a"), 0, 1, false));
        use OpCode::*;
        assert_eq!(opcodes(&prog), vec![Push, Jump, Str1, End, Finish]);

        let prog = compile_node(Node::quant(Node::str("a"), 0, 0, true));
        assert_eq!(opcodes(&prog), vec![End, Finish]);
    }

    #[test]
    fn referred_group_kept_under_zero_upper() {
        let node = Node::list(vec![
            Node::quant(Node::group(Node::str("a")), 0, 0, true),
            Node::backref(1),
        ]);
        let prog = compile_node(node);
        use OpCode::*;
        assert_eq!(
            opcodes(&prog),
            vec![Jump, MemClear, MemStartPush, Str1, MemEndPush, BackRef1, End, Finish]
        );
        jump_targets_in_range(&prog);
    }

    #[test]
    fn strings_and_templates() {
        let prog = compile_node(Node::list(vec![
            Node::str("abcdefgh"),
            Node::alt(vec![Node::str("cdefg"), Node::str("bcdefg")]),
        ]));
        assert_eq!(prog.ops[0].opcode, OpCode::StrN);
        // "bcdefg" reuses the first template.
        assert_eq!(prog.templates.len(), 1);
        let n = prog.ops.iter().filter(|op| op.opcode == OpCode::Str5).count();
        assert_eq!(n, 1);
    }

    #[test]
    fn case_folded_strings() {
        let opts = RegexOptions::IGNORECASE;
        let prog = compile(Ast::new(Node::str("a")), opts).unwrap();
        assert_eq!(prog.ops[0].opcode, OpCode::Str1Ic);
        let prog = compile(Ast::new(Node::str("ab")), opts).unwrap();
        assert_eq!(prog.ops[0].opcode, OpCode::StrNIc);
        // No case partners: plain exact match.
        let prog = compile(Ast::new(Node::str("12")), opts).unwrap();
        assert_eq!(prog.ops[0].opcode, OpCode::Str2);
    }

    #[test]
    fn shared_class_is_stored_once() {
        let mut ast = Ast::new(Node::Empty);
        let digits = ast.add_class(CharClass::from_ranges(&[('0', '9')]));
        let greek = ast.add_class(CharClass::from_ranges(&[('α', 'ω')]));
        ast.root = Node::list(vec![
            Node::cclass(digits),
            Node::cclass(greek),
            Node::cclass(digits),
        ]);
        let prog = compile(ast, RegexOptions::empty()).unwrap();
        use OpCode::*;
        assert_eq!(opcodes(&prog), vec![CClassNode, CClassMb, CClassNode, End, Finish]);
        assert_eq!(prog.classes.len(), 1);
    }

    #[test]
    fn ignore_case_class_is_folded() {
        let mut ast = Ast::new(Node::Empty);
        let id = ast.add_class(CharClass::from_chars("aσ").case_insensitive());
        ast.root = Node::cclass(id);
        let prog = compile(ast, RegexOptions::empty()).unwrap();
        match &prog.ops[0].payload {
            OperationPayload::CClassMix { bs, ranges } => {
                assert!(bitset_at(bs, b'A' as usize));
                assert!(crate::unicode::is_in_code_range(ranges, 0x03a3));
                assert!(crate::unicode::is_in_code_range(ranges, 0x03c2));
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn lookbehind_lengths() {
        let node = Node::look(AnchorType::LookBehind, Node::str("ab"));
        let prog = compile_node(node);
        assert!(matches!(prog.ops[0].payload, OperationPayload::LookBehind { len: 2 }));

        let node = Node::look(
            AnchorType::LookBehindNot,
            Node::alt(vec![Node::str("a"), Node::str("bc")]),
        );
        let prog = compile_node(node);
        use OpCode::*;
        assert_eq!(
            opcodes(&prog),
            vec![
                PushLookBehindNot,
                Str1,
                FailLookBehindNot,
                PushLookBehindNot,
                Str2,
                FailLookBehindNot,
                End,
                Finish
            ]
        );

        let node = Node::look(AnchorType::LookBehind, Node::star(Node::str("a")));
        let err = compile(Ast::new(node), RegexOptions::empty()).unwrap_err();
        assert_eq!(err.code(), REGERR_INVALID_LOOK_BEHIND_PATTERN);
    }

    #[test]
    fn bad_repeat_ranges() {
        let err = compile(Ast::new(Node::quant(Node::str("a"), 3, 2, true)), RegexOptions::empty())
            .unwrap_err();
        assert_eq!(err.code(), REGERR_UPPER_SMALLER_THAN_LOWER_IN_REPEAT_RANGE);
        let err = compile(
            Ast::new(Node::quant(Node::str("a"), 0, 200_000, true)),
            RegexOptions::empty(),
        )
        .unwrap_err();
        assert_eq!(err.code(), REGERR_TOO_BIG_NUMBER_FOR_REPEAT_RANGE);
    }

    #[test]
    fn pop_levels() {
        assert_eq!(compile_node(Node::str("a")).stack_pop_level, StackPopLevel::Free);
        let alt_group = Node::alt(vec![Node::group(Node::str("a")), Node::str("b")]);
        assert_eq!(compile_node(alt_group).stack_pop_level, StackPopLevel::MemStart);
        let longest = compile(Ast::new(Node::group(Node::str("a"))), RegexOptions::FIND_LONGEST)
            .unwrap();
        assert_eq!(longest.stack_pop_level, StackPopLevel::All);
    }

    #[test]
    fn optimizer_choice() {
        let prog = compile_node(Node::list(vec![
            Node::star(Node::any()),
            Node::str("x"),
            Node::str("needle"),
        ]));
        assert_eq!(prog.optimizer.kind(), OptimizeType::StrFast);
        assert_eq!(prog.optimizer.exact(), b"needle");
        assert_eq!(prog.optimizer.dist_range(), (1, INFINITE_LEN));

        let prog = compile_node(Node::list(vec![
            Node::anchor(AnchorType::Caret),
            Node::alt(vec![Node::str("ab"), Node::word()]),
        ]));
        assert_eq!(prog.optimizer.kind(), OptimizeType::Map);
        assert!(prog.optimizer.anchor().contains(AnchorFlags::BEGIN_BUF));
        assert!(prog.optimizer.is_lead_byte(b'Z'));
        assert!(!prog.optimizer.is_lead_byte(b'-'));

        let prog = compile_node(Node::star(Node::str("a")));
        assert_eq!(prog.optimizer.kind(), OptimizeType::None);
    }

    #[test]
    fn length_pass_matches_emit_pass() {
        let mut ast = Ast::new(Node::Empty);
        let vowels = ast.add_class(CharClass::from_chars("aeiou"));
        ast.root = Node::list(vec![
            Node::quant(Node::group(Node::cclass(vowels)), 1, 30, true),
            Node::quant(Node::alt(vec![Node::str("xy"), Node::Empty]), 0, 3, true),
            Node::possessive(Node::cclass(vowels), 2, INFINITE_REPEAT),
            Node::look(AnchorType::PrecReadNot, Node::str("q")),
            Node::quant(Node::str("z"), 1, INFINITE_REPEAT, false),
        ]);
        let prog = compile(ast, RegexOptions::empty()).unwrap();
        jump_targets_in_range(&prog);
        assert_eq!(prog.ops.last().map(|op| op.opcode), Some(OpCode::Finish));
    }
}
