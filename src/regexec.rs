// regexec.rs - VM executor: bytecode interpreter and search driver.
//
// Structure: match state -> text helpers -> ByteCodeMachine::match_at
// (opcode dispatch) -> match_at / search drivers.

use crate::error::RegexError;
use crate::regdef::{Region, RegexOptions};
use crate::regenc::*;
use crate::regerror::*;
use crate::regint::*;
use crate::regsearch::AnchorFlags;
use crate::regstack::{MatchStack, MemPtr, StackEntry, StackPool};
use crate::unicode::is_fold_equal;

// ============================================================================
// MatchArg - runtime match state shared by the attempts of one search
// ============================================================================

pub struct MatchArg<'r> {
    pub options: RegexOptions,
    pub region: Option<&'r mut Region>,
    /// Search start, the position `BeginPosition` tests against.
    pub start: usize,
    /// Longest match so far under FIND_LONGEST.
    pub best_len: Option<usize>,
    pub best_s: usize,
}

impl<'r> MatchArg<'r> {
    pub fn new(
        reg: &Program,
        options: RegexOptions,
        region: Option<&'r mut Region>,
        start: usize,
    ) -> Self {
        MatchArg {
            options: options | reg.options,
            region,
            start,
            best_len: None,
            best_s: 0,
        }
    }

    fn reset_region(&mut self, num_regs: usize) {
        if let Some(region) = self.region.as_deref_mut() {
            region.resize(num_regs);
            region.clear();
        }
    }
}

// ============================================================================
// Text helpers
// ============================================================================

#[inline]
fn rel(p: usize, addr: RelAddrType) -> usize {
    (p as isize + addr as isize) as usize
}

/// Character at `s` with its byte length, when it lies inside `range`.
#[inline]
fn char_at(text: &[u8], s: usize, range: usize) -> Option<(CodePoint, usize)> {
    if s >= range {
        return None;
    }
    let n = mbc_enc_len(text[s]);
    if s + n > range {
        return None;
    }
    Some((mbc_to_code(text, s), n))
}

#[inline]
fn exact_at(text: &[u8], s: usize, range: usize, lit: &[u8]) -> bool {
    s + lit.len() <= range && &text[s..s + lit.len()] == lit
}

/// Compare `pat` against the text at `s` character by character under case
/// folding. Returns the end of the matched text.
fn fold_match(pat: &[u8], text: &[u8], s: usize, range: usize, unicode: bool) -> Option<usize> {
    let mut p = 0;
    let mut s = s;
    while p < pat.len() {
        let (c, n) = char_at(text, s, range)?;
        if !is_fold_equal(mbc_to_code(pat, p), c, unicode) {
            return None;
        }
        p += mbc_enc_len(pat[p]);
        s += n;
    }
    Some(s)
}

#[inline]
fn unexpected() -> RegexError {
    RegexError::bug(REGERR_UNEXPECTED_BYTECODE)
}

// ============================================================================
// ByteCodeMachine
// ============================================================================

/// Backtracking interpreter bound to one program and one subject.
pub struct ByteCodeMachine<'a> {
    reg: &'a Program,
    text: &'a [u8],
    stack: MatchStack,
    mem_start: Vec<MemPtr>,
    mem_end: Vec<MemPtr>,
    /// Stack index of the live `Repeat` frame per loop id.
    repeat_stk: Vec<usize>,
}

impl<'a> ByteCodeMachine<'a> {
    pub fn new(reg: &'a Program, text: &'a [u8], stack: MatchStack) -> Self {
        ByteCodeMachine {
            reg,
            text,
            stack,
            mem_start: vec![MemPtr::Invalid; reg.num_mem + 1],
            mem_end: vec![MemPtr::Invalid; reg.num_mem + 1],
            repeat_stk: vec![0; reg.num_repeat],
        }
    }

    /// Give the stack back for pooling.
    pub fn into_stack(self) -> MatchStack {
        self.stack
    }

    fn group_span(&self, n: usize) -> Option<(usize, usize)> {
        match (self.mem_start.get(n)?.pos(), self.mem_end.get(n)?.pos()) {
            (Some(b), Some(e)) if b <= e => Some((b, e)),
            _ => None,
        }
    }

    /// Match the text of group `n` at `s`. An unset group matches empty.
    fn backref_at(&self, n: usize, s: usize, range: usize, ic: bool, unicode: bool) -> Option<usize> {
        let Some((b, e)) = self.group_span(n) else {
            return Some(s);
        };
        let pat = &self.text[b..e];
        if ic {
            fold_match(pat, self.text, s, range, unicode)
        } else if exact_at(self.text, s, range, pat) {
            Some(s + pat.len())
        } else {
            None
        }
    }

    fn fill_region(&self, msa: &mut MatchArg<'_>, sstart: usize, s: usize) {
        if msa.options.contains(RegexOptions::POSIX_REGION) {
            return;
        }
        let Some(region) = msa.region.as_deref_mut() else {
            return;
        };
        region.resize(self.reg.num_mem + 1);
        region.beg[0] = sstart as i32;
        region.end[0] = s as i32;
        for i in 1..=self.reg.num_mem {
            match self.group_span(i) {
                Some((b, e)) => {
                    region.beg[i] = b as i32;
                    region.end[i] = e as i32;
                }
                None => {
                    region.beg[i] = crate::regdef::REGION_NOTPOS;
                    region.end[i] = crate::regdef::REGION_NOTPOS;
                }
            }
        }
    }

    fn mem_clear(&mut self, from: usize, to: usize) {
        for num in from..to.min(self.mem_start.len()) {
            if mem_status_at0(self.reg.push_mem_start, num) {
                self.stack.push(StackEntry::MemStart {
                    num,
                    prev_start: self.mem_start[num],
                    prev_end: self.mem_end[num],
                });
            }
            self.mem_start[num] = MemPtr::Invalid;
            if mem_status_at0(self.reg.push_mem_end, num) {
                self.stack.push(StackEntry::MemEnd {
                    num,
                    prev_start: self.mem_start[num],
                    prev_end: self.mem_end[num],
                });
            }
            self.mem_end[num] = MemPtr::Invalid;
        }
    }

    /// Run the program anchored at `sstart`, reading no further than
    /// `range`. Returns the match length; `None` is an ordinary mismatch.
    pub fn match_at(
        &mut self,
        msa: &mut MatchArg<'_>,
        range: usize,
        sstart: usize,
    ) -> Result<Option<usize>, RegexError> {
        let reg = self.reg;
        let text = self.text;
        let end = text.len();
        let range = range.min(end);
        let options = msa.options;
        let unicode = options.contains(RegexOptions::UNICODE);
        let pop_level = reg.stack_pop_level;
        let finish = reg.ops.len().saturating_sub(1);

        self.stack.clear();
        self.mem_start.fill(MemPtr::Invalid);
        self.mem_end.fill(MemPtr::Invalid);
        // Bottom frame: running out of alternatives lands on Finish.
        self.stack.push_alt(finish, sstart);

        let mut p: usize = 0;
        let mut s: usize = sstart;
        let mut best: Option<usize> = None;

        loop {
            let Some(op) = reg.ops.get(p) else {
                return Err(RegexError::bug(REGERR_UNDEFINED_BYTECODE));
            };
            let mut goto_fail = false;

            match op.opcode {
                OpCode::Finish => return Ok(best),

                OpCode::End => {
                    let n = s - sstart;
                    if n == 0 && options.contains(RegexOptions::FIND_NOT_EMPTY) {
                        goto_fail = true;
                    } else if options.contains(RegexOptions::FIND_LONGEST) {
                        if msa.best_len.map_or(true, |b| n > b) {
                            msa.best_len = Some(n);
                            msa.best_s = sstart;
                            best = Some(n);
                            self.fill_region(msa, sstart, s);
                        }
                        // Nothing longer fits once the read bound is reached.
                        if s < range {
                            goto_fail = true;
                        } else {
                            return Ok(best);
                        }
                    } else {
                        self.fill_region(msa, sstart, s);
                        return Ok(Some(n));
                    }
                }

                // ============================================================
                // Literals
                // ============================================================
                OpCode::Str1 | OpCode::Str2 | OpCode::Str3 | OpCode::Str4 | OpCode::Str5 => {
                    let OperationPayload::Exact { s: ref lit } = op.payload else {
                        return Err(unexpected());
                    };
                    let n = match op.opcode {
                        OpCode::Str1 => 1,
                        OpCode::Str2 => 2,
                        OpCode::Str3 => 3,
                        OpCode::Str4 => 4,
                        _ => 5,
                    };
                    if exact_at(text, s, range, &lit[..n]) {
                        s += n;
                        p += 1;
                    } else {
                        goto_fail = true;
                    }
                }

                OpCode::StrN => {
                    let OperationPayload::ExactN { tmpl, offset, len } = op.payload else {
                        return Err(unexpected());
                    };
                    if exact_at(text, s, range, reg.template(tmpl, offset, len)) {
                        s += len;
                        p += 1;
                    } else {
                        goto_fail = true;
                    }
                }

                OpCode::Str1Ic => {
                    let OperationPayload::ExactIc { c } = op.payload else {
                        return Err(unexpected());
                    };
                    match char_at(text, s, range) {
                        Some((code, n)) if is_fold_equal(c, code, unicode) => {
                            s += n;
                            p += 1;
                        }
                        _ => goto_fail = true,
                    }
                }

                OpCode::StrNIc => {
                    let OperationPayload::ExactN { tmpl, offset, len } = op.payload else {
                        return Err(unexpected());
                    };
                    match fold_match(reg.template(tmpl, offset, len), text, s, range, unicode) {
                        Some(e) => {
                            s = e;
                            p += 1;
                        }
                        None => goto_fail = true,
                    }
                }

                // ============================================================
                // Character classes
                // ============================================================
                OpCode::CClass | OpCode::CClassNot => {
                    let OperationPayload::CClass { ref bs } = op.payload else {
                        return Err(unexpected());
                    };
                    match char_at(text, s, range) {
                        Some((c, n)) => {
                            let hit = (c as usize) < SINGLE_BYTE_SIZE && bitset_at(bs, c as usize);
                            if hit == (op.opcode == OpCode::CClass) {
                                s += n;
                                p += 1;
                            } else {
                                goto_fail = true;
                            }
                        }
                        None => goto_fail = true,
                    }
                }

                OpCode::CClassMb | OpCode::CClassMbNot => {
                    let OperationPayload::CClassMb { ref ranges } = op.payload else {
                        return Err(unexpected());
                    };
                    match char_at(text, s, range) {
                        Some((c, n)) => {
                            let hit = crate::unicode::is_in_code_range(ranges, c);
                            if hit == (op.opcode == OpCode::CClassMb) {
                                s += n;
                                p += 1;
                            } else {
                                goto_fail = true;
                            }
                        }
                        None => goto_fail = true,
                    }
                }

                OpCode::CClassMix | OpCode::CClassMixNot => {
                    let OperationPayload::CClassMix { ref bs, ref ranges } = op.payload else {
                        return Err(unexpected());
                    };
                    match char_at(text, s, range) {
                        Some((c, n)) => {
                            let hit = if (c as usize) < SINGLE_BYTE_SIZE {
                                bitset_at(bs, c as usize)
                            } else {
                                crate::unicode::is_in_code_range(ranges, c)
                            };
                            if hit == (op.opcode == OpCode::CClassMix) {
                                s += n;
                                p += 1;
                            } else {
                                goto_fail = true;
                            }
                        }
                        None => goto_fail = true,
                    }
                }

                OpCode::CClassNode => {
                    let OperationPayload::CClassNode { class } = op.payload else {
                        return Err(unexpected());
                    };
                    let Some(cc) = reg.classes.get(class) else {
                        return Err(unexpected());
                    };
                    match char_at(text, s, range) {
                        Some((c, n)) if cc.contains(c) => {
                            s += n;
                            p += 1;
                        }
                        _ => goto_fail = true,
                    }
                }

                // ============================================================
                // Any character
                // ============================================================
                OpCode::AnyChar => match char_at(text, s, range) {
                    Some((c, n)) if !is_code_newline(c) => {
                        s += n;
                        p += 1;
                    }
                    _ => goto_fail = true,
                },

                OpCode::AnyCharMl => match char_at(text, s, range) {
                    Some((_, n)) => {
                        s += n;
                        p += 1;
                    }
                    None => goto_fail = true,
                },

                OpCode::AnyCharStar | OpCode::AnyCharMlStar => {
                    let ml = op.opcode == OpCode::AnyCharMlStar;
                    while s < range {
                        self.stack.push_alt(p + 1, s);
                        match char_at(text, s, range) {
                            Some((c, n)) if ml || !is_code_newline(c) => s += n,
                            _ => {
                                goto_fail = true;
                                break;
                            }
                        }
                    }
                    if !goto_fail {
                        p += 1;
                    }
                }

                OpCode::AnyCharStarPeekNext | OpCode::AnyCharMlStarPeekNext => {
                    let OperationPayload::AnyCharStarPeekNext { c: peek } = op.payload else {
                        return Err(unexpected());
                    };
                    let ml = op.opcode == OpCode::AnyCharMlStarPeekNext;
                    while s < range {
                        if text[s] == peek {
                            self.stack.push_alt(p + 1, s);
                        }
                        match char_at(text, s, range) {
                            Some((c, n)) if ml || !is_code_newline(c) => s += n,
                            _ => {
                                goto_fail = true;
                                break;
                            }
                        }
                    }
                    if !goto_fail {
                        p += 1;
                    }
                }

                // ============================================================
                // Word types and anchors
                // ============================================================
                OpCode::Word => {
                    if s < range && is_code_word(text[s] as CodePoint) {
                        s += 1;
                        p += 1;
                    } else {
                        goto_fail = true;
                    }
                }

                OpCode::NoWord => match char_at(text, s, range) {
                    Some((c, n)) if !is_code_word(c) => {
                        s += n;
                        p += 1;
                    }
                    _ => goto_fail = true,
                },

                OpCode::WordBoundary
                | OpCode::NoWordBoundary
                | OpCode::WordBegin
                | OpCode::WordEnd => {
                    let before = is_word_before(text, 0, s);
                    let at = is_word_at(text, s, end);
                    let ok = match op.opcode {
                        OpCode::WordBoundary => before != at,
                        OpCode::NoWordBoundary => before == at,
                        OpCode::WordBegin => !before && at,
                        _ => before && !at,
                    };
                    if ok {
                        p += 1;
                    } else {
                        goto_fail = true;
                    }
                }

                OpCode::BeginBuf => {
                    if s == 0 && !options.contains(RegexOptions::NOTBOL) {
                        p += 1;
                    } else {
                        goto_fail = true;
                    }
                }

                OpCode::EndBuf => {
                    if s == end && !options.contains(RegexOptions::NOTEOL) {
                        p += 1;
                    } else {
                        goto_fail = true;
                    }
                }

                OpCode::BeginLine => {
                    let ok = if s == 0 {
                        !options.contains(RegexOptions::NOTBOL)
                    } else {
                        is_newline_before(text, 0, s)
                    };
                    if ok {
                        p += 1;
                    } else {
                        goto_fail = true;
                    }
                }

                OpCode::EndLine => {
                    let ok = if s == end {
                        !options.contains(RegexOptions::NOTEOL)
                    } else {
                        is_newline_at(text, s, end)
                    };
                    if ok {
                        p += 1;
                    } else {
                        goto_fail = true;
                    }
                }

                OpCode::SemiEndBuf => {
                    let at_end = s == end
                        || (is_newline_at(text, s, end) && s + mbc_enc_len(text[s]) == end);
                    if at_end && !options.contains(RegexOptions::NOTEOL) {
                        p += 1;
                    } else {
                        goto_fail = true;
                    }
                }

                OpCode::BeginPosition => {
                    if s == msa.start {
                        p += 1;
                    } else {
                        goto_fail = true;
                    }
                }

                // ============================================================
                // Backreferences
                // ============================================================
                OpCode::BackRef1 | OpCode::BackRef2 | OpCode::BackRefN | OpCode::BackRefNIc => {
                    let n = match (op.opcode, &op.payload) {
                        (OpCode::BackRef1, _) => 1,
                        (OpCode::BackRef2, _) => 2,
                        (_, OperationPayload::BackRefN { n }) => *n,
                        _ => return Err(unexpected()),
                    };
                    let ic = op.opcode == OpCode::BackRefNIc;
                    match self.backref_at(n, s, range, ic, unicode) {
                        Some(e) => {
                            s = e;
                            p += 1;
                        }
                        None => goto_fail = true,
                    }
                }

                OpCode::BackRefMulti | OpCode::BackRefMultiIc => {
                    let OperationPayload::BackRefMulti { ref ns } = op.payload else {
                        return Err(unexpected());
                    };
                    let ic = op.opcode == OpCode::BackRefMultiIc;
                    // First set group whose text matches; fails when none is set.
                    let matched = ns
                        .iter()
                        .filter(|&&n| self.group_span(n).is_some())
                        .find_map(|&n| self.backref_at(n, s, range, ic, unicode));
                    match matched {
                        Some(e) => {
                            s = e;
                            p += 1;
                        }
                        None => goto_fail = true,
                    }
                }

                // ============================================================
                // Capture markers
                // ============================================================
                OpCode::MemStart => {
                    let OperationPayload::Memory { num } = op.payload else {
                        return Err(unexpected());
                    };
                    self.mem_start[num] = MemPtr::Pos(s);
                    p += 1;
                }

                OpCode::MemStartPush => {
                    let OperationPayload::Memory { num } = op.payload else {
                        return Err(unexpected());
                    };
                    self.stack.push(StackEntry::MemStart {
                        num,
                        prev_start: self.mem_start[num],
                        prev_end: self.mem_end[num],
                    });
                    self.mem_start[num] = MemPtr::Pos(s);
                    self.mem_end[num] = MemPtr::Invalid;
                    p += 1;
                }

                OpCode::MemEnd => {
                    let OperationPayload::Memory { num } = op.payload else {
                        return Err(unexpected());
                    };
                    self.mem_end[num] = MemPtr::Pos(s);
                    p += 1;
                }

                OpCode::MemEndPush => {
                    let OperationPayload::Memory { num } = op.payload else {
                        return Err(unexpected());
                    };
                    self.stack.push(StackEntry::MemEnd {
                        num,
                        prev_start: self.mem_start[num],
                        prev_end: self.mem_end[num],
                    });
                    self.mem_end[num] = MemPtr::Pos(s);
                    p += 1;
                }

                OpCode::MemClear => {
                    let OperationPayload::MemClear { from, to } = op.payload else {
                        return Err(unexpected());
                    };
                    self.mem_clear(from, to);
                    p += 1;
                }

                // ============================================================
                // Control flow
                // ============================================================
                OpCode::Fail => goto_fail = true,

                OpCode::Jump => {
                    let OperationPayload::Jump { addr } = op.payload else {
                        return Err(unexpected());
                    };
                    p = rel(p, addr);
                }

                OpCode::Push => {
                    let OperationPayload::Push { addr } = op.payload else {
                        return Err(unexpected());
                    };
                    self.stack.push_alt(rel(p, addr), s);
                    p += 1;
                }

                OpCode::Pop => {
                    self.stack.pop_one();
                    p += 1;
                }

                OpCode::PushOrJumpExact1 => {
                    let OperationPayload::PushOrJumpExact1 { addr, c } = op.payload else {
                        return Err(unexpected());
                    };
                    if s < range && text[s] == c {
                        self.stack.push_alt(rel(p, addr), s);
                        p += 1;
                    } else {
                        p = rel(p, addr);
                    }
                }

                OpCode::PushIfPeekNext => {
                    let OperationPayload::PushIfPeekNext { addr, c } = op.payload else {
                        return Err(unexpected());
                    };
                    if s < range && text[s] == c {
                        self.stack.push_alt(rel(p, addr), s);
                    }
                    p += 1;
                }

                // ============================================================
                // Counted loops
                // ============================================================
                OpCode::Repeat | OpCode::RepeatNg => {
                    let OperationPayload::Repeat { id, addr } = op.payload else {
                        return Err(unexpected());
                    };
                    let Some(rr) = reg.repeat_range.get(id) else {
                        return Err(unexpected());
                    };
                    self.repeat_stk[id] = self.stack.len();
                    self.stack.push(StackEntry::Repeat {
                        id,
                        pcode: p + 1,
                        count: 0,
                        pstr: s,
                    });
                    if rr.lower == 0 {
                        if op.opcode == OpCode::Repeat {
                            self.stack.push_alt(rel(p, addr), s);
                            p += 1;
                        } else {
                            self.stack.push_alt(p + 1, s);
                            p = rel(p, addr);
                        }
                    } else {
                        p += 1;
                    }
                }

                OpCode::RepeatInc
                | OpCode::RepeatIncNg
                | OpCode::RepeatIncSg
                | OpCode::RepeatIncNgSg => {
                    let OperationPayload::RepeatInc { id } = op.payload else {
                        return Err(unexpected());
                    };
                    let Some(&rr) = reg.repeat_range.get(id) else {
                        return Err(unexpected());
                    };
                    let si = match op.opcode {
                        OpCode::RepeatIncSg | OpCode::RepeatIncNgSg => self
                            .stack
                            .latest_repeat(id)
                            .ok_or_else(|| RegexError::bug(REGERR_STACK_BUG))?,
                        _ => self.repeat_stk[id],
                    };
                    let Some(StackEntry::Repeat {
                        count,
                        pstr,
                        pcode,
                        ..
                    }) = self.stack.get_mut(si)
                    else {
                        return Err(RegexError::bug(REGERR_STACK_BUG));
                    };

                    if *pstr == s && *count >= rr.lower {
                        // Empty iteration past the minimum.
                        goto_fail = true;
                    } else {
                        let slast = *pstr;
                        *count += 1;
                        *pstr = s;
                        let count = *count;
                        let pcode = *pcode;
                        let greedy = matches!(op.opcode, OpCode::RepeatInc | OpCode::RepeatIncSg);

                        if greedy {
                            if count >= rr.upper {
                                p += 1;
                            } else if count >= rr.lower {
                                self.stack.push_alt(p + 1, s);
                                p = pcode;
                            } else {
                                p = pcode;
                            }
                            self.stack.push(StackEntry::RepeatInc { si, slast });
                        } else if count < rr.upper {
                            self.stack.push(StackEntry::RepeatInc { si, slast });
                            if count >= rr.lower {
                                self.stack.push_alt(pcode, s);
                                p += 1;
                            } else {
                                p = pcode;
                            }
                        } else {
                            self.stack.push(StackEntry::RepeatInc { si, slast });
                            p += 1;
                        }
                    }
                }

                // ============================================================
                // Null checks
                // ============================================================
                OpCode::EmptyCheckStart => {
                    let OperationPayload::EmptyCheck { id } = op.payload else {
                        return Err(unexpected());
                    };
                    self.stack.push(StackEntry::EmptyCheckStart { id, pstr: s });
                    p += 1;
                }

                OpCode::EmptyCheckEnd => {
                    let OperationPayload::EmptyCheck { id } = op.payload else {
                        return Err(unexpected());
                    };
                    let start = self
                        .stack
                        .empty_check_start(id)
                        .ok_or_else(|| RegexError::bug(REGERR_STACK_BUG))?;
                    if start == s {
                        // Skip the loop-back instruction.
                        match reg.ops.get(p + 1) {
                            Some(next) if next.opcode.is_empty_check_skip_target() => p += 2,
                            _ => return Err(unexpected()),
                        }
                    } else {
                        p += 1;
                    }
                }

                OpCode::EmptyCheckEndMemst => {
                    let OperationPayload::EmptyCheck { id } = op.payload else {
                        return Err(unexpected());
                    };
                    let start = self
                        .stack
                        .empty_check_start(id)
                        .ok_or_else(|| RegexError::bug(REGERR_STACK_BUG))?;
                    if start == s {
                        goto_fail = true;
                    } else {
                        p += 1;
                    }
                }

                // ============================================================
                // Lookaround and atomic groups
                // ============================================================
                OpCode::PushPos => {
                    self.stack.push(StackEntry::Pos { pstr: s });
                    p += 1;
                }

                OpCode::PopPos => match self.stack.void_to(|e| matches!(e, StackEntry::Pos { .. })) {
                    Some(StackEntry::Pos { pstr }) => {
                        s = pstr;
                        p += 1;
                    }
                    _ => return Err(RegexError::bug(REGERR_STACK_BUG)),
                },

                OpCode::PushPosNot => {
                    let OperationPayload::PushPosNot { addr } = op.payload else {
                        return Err(unexpected());
                    };
                    self.stack.push(StackEntry::PosNot {
                        pcode: rel(p, addr),
                        pstr: s,
                    });
                    p += 1;
                }

                OpCode::FailPos => {
                    self.stack.pop_til(
                        |e| matches!(e, StackEntry::PosNot { .. }),
                        &mut self.mem_start,
                        &mut self.mem_end,
                    );
                    goto_fail = true;
                }

                OpCode::PushStopBt => {
                    self.stack.push(StackEntry::StopBt);
                    p += 1;
                }

                OpCode::PopStopBt => {
                    if self.stack.void_to(|e| matches!(e, StackEntry::StopBt)).is_none() {
                        return Err(RegexError::bug(REGERR_STACK_BUG));
                    }
                    p += 1;
                }

                OpCode::LookBehind => {
                    let OperationPayload::LookBehind { len } = op.payload else {
                        return Err(unexpected());
                    };
                    match step_back(text, 0, s, len) {
                        Some(back) => {
                            s = back;
                            p += 1;
                        }
                        None => goto_fail = true,
                    }
                }

                OpCode::PushLookBehindNot => {
                    let OperationPayload::PushLookBehindNot { addr, len } = op.payload else {
                        return Err(unexpected());
                    };
                    match step_back(text, 0, s, len) {
                        Some(back) => {
                            self.stack.push(StackEntry::LookBehindNot {
                                pcode: rel(p, addr),
                                pstr: s,
                            });
                            s = back;
                            p += 1;
                        }
                        // Too close to the start for the body to match.
                        None => p = rel(p, addr),
                    }
                }

                OpCode::FailLookBehindNot => {
                    self.stack.pop_til(
                        |e| matches!(e, StackEntry::LookBehindNot { .. }),
                        &mut self.mem_start,
                        &mut self.mem_end,
                    );
                    goto_fail = true;
                }
            }

            if goto_fail {
                match self.stack.pop(pop_level, &mut self.mem_start, &mut self.mem_end) {
                    Some((pcode, pstr)) => {
                        p = pcode;
                        s = pstr;
                    }
                    None => return Ok(best),
                }
            }
        }
    }
}

// ============================================================================
// Drivers
// ============================================================================

/// Anchored match at `at`. Returns the match length.
pub fn match_at(
    reg: &Program,
    text: &[u8],
    at: usize,
    region: Option<&mut Region>,
    options: RegexOptions,
    pool: &StackPool,
) -> Result<Option<usize>, RegexError> {
    if at > text.len() {
        return Err(RegexError::InvalidArgument);
    }
    let mut msa = MatchArg::new(reg, options, region, at);
    msa.reset_region(reg.num_mem + 1);

    let mut vm = ByteCodeMachine::new(reg, text, pool.acquire());
    let result = vm.match_at(&mut msa, text.len(), at);
    pool.release(vm.into_stack());

    let r = result?;
    if msa.options.contains(RegexOptions::FIND_LONGEST) {
        return Ok(msa.best_len);
    }
    Ok(r)
}

/// Search `text` for a match starting between `start` and `range`
/// (inclusive). Searches forward when `start <= range`, backward
/// otherwise. Returns the byte span of the match.
pub fn search(
    reg: &Program,
    text: &[u8],
    start: usize,
    range: usize,
    region: Option<&mut Region>,
    options: RegexOptions,
    pool: &StackPool,
) -> Result<Option<(usize, usize)>, RegexError> {
    if start > text.len() || range > text.len() {
        return Err(RegexError::InvalidArgument);
    }
    let mut msa = MatchArg::new(reg, options, region, start);
    msa.reset_region(reg.num_mem + 1);

    let mut vm = ByteCodeMachine::new(reg, text, pool.acquire());
    let result = if start <= range {
        forward_search(&mut vm, &mut msa, start, range)
    } else {
        backward_search(&mut vm, &mut msa, start, range)
    };
    pool.release(vm.into_stack());
    result
}

/// Whether a match may start at `s` given the anchors every match has.
#[inline]
fn start_allowed(anchor: AnchorFlags, text: &[u8], s: usize) -> bool {
    if anchor.contains(AnchorFlags::BEGIN_LINE) {
        s == 0 || is_newline_before(text, 0, s)
    } else {
        true
    }
}

fn longest_result(msa: &MatchArg<'_>) -> Option<(usize, usize)> {
    msa.best_len.map(|len| (msa.best_s, msa.best_s + len))
}

fn forward_search(
    vm: &mut ByteCodeMachine<'_>,
    msa: &mut MatchArg<'_>,
    start: usize,
    range: usize,
) -> Result<Option<(usize, usize)>, RegexError> {
    let reg = vm.reg;
    let text = vm.text;
    let end = text.len();
    let opt = &reg.optimizer;
    let anchor = opt.anchor();
    let longest = msa.options.contains(RegexOptions::FIND_LONGEST);

    let mut range = range;
    if anchor.contains(AnchorFlags::BEGIN_BUF) {
        if start > 0 {
            return Ok(None);
        }
        range = 0;
    }

    let mut s = start;
    while let Some((low, high)) = opt.forward_range(text, s, end, range) {
        s = s.max(low);
        while s <= high {
            if start_allowed(anchor, text, s) {
                if let Some(len) = vm.match_at(msa, end, s)? {
                    if !longest {
                        return Ok(Some((s, s + len)));
                    }
                }
            }
            if s >= end {
                return Ok(longest_result(msa));
            }
            s += mbc_enc_len(text[s]);
        }
        if s > range {
            break;
        }
    }
    Ok(longest_result(msa))
}

fn backward_search(
    vm: &mut ByteCodeMachine<'_>,
    msa: &mut MatchArg<'_>,
    start: usize,
    range: usize,
) -> Result<Option<(usize, usize)>, RegexError> {
    let reg = vm.reg;
    let text = vm.text;
    let end = text.len();
    let opt = &reg.optimizer;
    let anchor = opt.anchor();
    let longest = msa.options.contains(RegexOptions::FIND_LONGEST);

    let mut s = left_adjust_char_head(text, 0, start);
    if anchor.contains(AnchorFlags::BEGIN_BUF) {
        if range > 0 {
            return Ok(None);
        }
        s = 0;
    }

    while let Some((low, high)) = opt.backward_range(text, range, s, end) {
        let mut t = high.min(s);
        loop {
            if start_allowed(anchor, text, t) {
                if let Some(len) = vm.match_at(msa, end, t)? {
                    if !longest {
                        return Ok(Some((t, t + len)));
                    }
                }
            }
            if t <= low {
                break;
            }
            match get_prev_char_head(text, 0, t) {
                Some(prev) => t = prev,
                None => break,
            }
        }
        match get_prev_char_head(text, 0, t) {
            Some(prev) if t > range && prev >= range => s = prev,
            _ => break,
        }
    }
    Ok(longest_result(msa))
}

// ============================================================================
// Tests
// ============================================================================
