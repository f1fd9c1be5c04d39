// regsearch.rs - Search optimizer: candidate start offsets for the driver.
//
// The compiler picks one strategy from the pattern's shape: a mandatory
// literal (plain, case-folded or Horspool with skip tables), a lead-byte
// map, or nothing. Every strategy over-approximates: a returned window may
// hold no match, but no match start is ever skipped.

use bitflags::bitflags;
use memchr::memmem;

use crate::regenc::*;
use crate::regint::*;
use crate::unicode::is_fold_equal;

bitflags! {
    /// Position constraints on the start of every match.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct AnchorFlags: u32 {
        /// Match starts at offset 0.
        const BEGIN_BUF  = 1 << 0;
        /// Match starts at offset 0 or right after a line terminator.
        const BEGIN_LINE = 1 << 1;
    }
}

/// Literals shorter than this are scanned with `memmem` rather than the
/// skip-table search.
const STR_FAST_MIN_LEN: usize = 3;

#[derive(Clone, Debug)]
pub struct SearchOptimizer {
    kind: OptimizeType,
    anchor: AnchorFlags,
    exact: Box<[u8]>,
    ic_unicode: bool,
    skip: Box<[usize; CHAR_MAP_SIZE]>,
    skip_back: Box<[usize; CHAR_MAP_SIZE]>,
    map: Box<[bool; CHAR_MAP_SIZE]>,
    /// Byte distance from the match start to the literal.
    dist_min: usize,
    dist_max: usize,
}

impl Default for SearchOptimizer {
    fn default() -> Self {
        Self::none()
    }
}

impl SearchOptimizer {
    /// No pre-filtering: every offset is a candidate.
    pub fn none() -> Self {
        SearchOptimizer {
            kind: OptimizeType::None,
            anchor: AnchorFlags::empty(),
            exact: Box::default(),
            ic_unicode: false,
            skip: Box::new([0; CHAR_MAP_SIZE]),
            skip_back: Box::new([0; CHAR_MAP_SIZE]),
            map: Box::new([false; CHAR_MAP_SIZE]),
            dist_min: 0,
            dist_max: 0,
        }
    }

    /// A literal that every match contains, `dist_min..=dist_max` bytes
    /// after the match start.
    pub(crate) fn literal(exact: &[u8], dist_min: usize, dist_max: usize) -> Self {
        let mut opt = SearchOptimizer::none();
        if exact.is_empty() {
            return opt;
        }
        opt.exact = exact.into();
        opt.dist_min = dist_min;
        opt.dist_max = dist_max;
        if exact.len() >= STR_FAST_MIN_LEN {
            opt.kind = OptimizeType::StrFast;
            opt.set_skip_tables();
        } else {
            opt.kind = OptimizeType::Str;
        }
        opt
    }

    /// Case-insensitive literal; compared character by character.
    pub(crate) fn literal_ic(exact: &[u8], dist_min: usize, dist_max: usize, unicode: bool) -> Self {
        let mut opt = SearchOptimizer::none();
        if exact.is_empty() {
            return opt;
        }
        opt.kind = OptimizeType::StrIc;
        opt.exact = exact.into();
        opt.ic_unicode = unicode;
        opt.dist_min = dist_min;
        opt.dist_max = dist_max;
        opt
    }

    /// Lead bytes a match can start with.
    pub(crate) fn lead_map(map: [bool; CHAR_MAP_SIZE]) -> Self {
        let mut opt = SearchOptimizer::none();
        opt.kind = OptimizeType::Map;
        opt.map = Box::new(map);
        opt
    }

    pub(crate) fn with_anchor(mut self, anchor: AnchorFlags) -> Self {
        self.anchor = anchor;
        self
    }

    fn set_skip_tables(&mut self) {
        let n = self.exact.len();
        self.skip.fill(n);
        for (i, &b) in self.exact[..n - 1].iter().enumerate() {
            self.skip[b as usize] = n - 1 - i;
        }
        self.skip_back.fill(n);
        for (i, &b) in self.exact.iter().enumerate().skip(1).rev() {
            self.skip_back[b as usize] = i;
        }
    }

    #[inline]
    pub fn kind(&self) -> OptimizeType {
        self.kind
    }

    #[inline]
    pub fn anchor(&self) -> AnchorFlags {
        self.anchor
    }

    #[inline]
    pub fn exact(&self) -> &[u8] {
        &self.exact
    }

    #[inline]
    pub fn dist_range(&self) -> (usize, usize) {
        (self.dist_min, self.dist_max)
    }

    /// Whether `b` may start a match; meaningful for the map strategy.
    #[inline]
    pub fn is_lead_byte(&self, b: u8) -> bool {
        self.map[b as usize]
    }

    // === Forward ===

    /// Lowest candidate match start in `from..=limit`, reading no further
    /// than `to`.
    pub fn search(&self, text: &[u8], from: usize, to: usize, limit: usize) -> Option<usize> {
        self.forward_range(text, from, to, limit).map(|(low, _)| low)
    }

    /// Candidate window `[low, high]`: no match starts in `from..low`, and
    /// offsets past `high` need a new search.
    pub(crate) fn forward_range(
        &self,
        text: &[u8],
        from: usize,
        to: usize,
        limit: usize,
    ) -> Option<(usize, usize)> {
        let to = to.min(text.len());
        if from > limit {
            return None;
        }
        match self.kind {
            OptimizeType::None => Some((from, limit)),
            OptimizeType::Map => {
                let end = to.min(limit.saturating_add(1));
                map_search(&self.map, text, from, end).map(|p| (p, p))
            }
            OptimizeType::Str | OptimizeType::StrFast | OptimizeType::StrIc => {
                let q_from = from.checked_add(self.dist_min)?;
                if q_from > to {
                    return None;
                }
                let q_limit = limit.saturating_add(self.dist_max);
                let q = self.find_literal(text, q_from, to, q_limit)?;
                let low = if self.dist_max == INFINITE_LEN {
                    from
                } else {
                    left_adjust_char_head(text, 0, q - self.dist_max.min(q)).max(from)
                };
                let high = (q - self.dist_min).min(limit);
                if low > high {
                    return None;
                }
                Some((low, high))
            }
        }
    }

    /// First literal occurrence starting in `q_from..=q_limit` and ending by `to`.
    fn find_literal(&self, text: &[u8], q_from: usize, to: usize, q_limit: usize) -> Option<usize> {
        let n = self.exact.len();
        match self.kind {
            OptimizeType::Str => {
                let end = to.min(q_limit.saturating_add(n));
                if q_from + n > end {
                    return None;
                }
                memmem::find(&text[q_from..end], &self.exact).map(|i| q_from + i)
            }
            OptimizeType::StrFast => {
                let end = to.min(q_limit.saturating_add(n));
                bm_search(&self.exact, &self.skip, text, q_from, end)
            }
            _ => {
                let mut q = right_adjust_char_head(text, 0, q_from);
                while q < to && q <= q_limit {
                    if ic_match_at(&self.exact, text, q, to, self.ic_unicode) {
                        return Some(q);
                    }
                    q += mbc_enc_len(text[q]);
                }
                None
            }
        }
    }

    // === Backward ===

    /// Highest candidate match start in `range..=start`, reading no further
    /// than `to`.
    pub fn search_backward(
        &self,
        text: &[u8],
        range: usize,
        start: usize,
        to: usize,
    ) -> Option<usize> {
        self.backward_range(text, range, start, to).map(|(_, high)| high)
    }

    /// Candidate window `[low, high]` for a backward scan: no match starts
    /// in `high+1..=start`, and offsets below `low` need a new search.
    pub(crate) fn backward_range(
        &self,
        text: &[u8],
        range: usize,
        start: usize,
        to: usize,
    ) -> Option<(usize, usize)> {
        let to = to.min(text.len());
        if start < range {
            return None;
        }
        match self.kind {
            OptimizeType::None => Some((range, start)),
            OptimizeType::Map => map_search_backward(&self.map, text, range, start.min(to))
                .map(|p| (p, p)),
            OptimizeType::Str | OptimizeType::StrFast | OptimizeType::StrIc => {
                let q_low = range.checked_add(self.dist_min)?;
                let mut q_high = start.saturating_add(self.dist_max);
                loop {
                    let q = self.find_literal_backward(text, q_low, q_high, to)?;
                    let high = left_adjust_char_head(text, 0, (q - self.dist_min).min(start));
                    let low = if self.dist_max == INFINITE_LEN {
                        range
                    } else {
                        right_adjust_char_head(text, 0, q.saturating_sub(self.dist_max)).max(range)
                    };
                    if low <= high {
                        return Some((low, high));
                    }
                    // No character boundary in the window; try an earlier occurrence.
                    q_high = q.checked_sub(1)?;
                }
            }
        }
    }

    /// Last literal occurrence starting in `q_low..=q_high` and ending by `to`.
    fn find_literal_backward(
        &self,
        text: &[u8],
        q_low: usize,
        q_high: usize,
        to: usize,
    ) -> Option<usize> {
        let n = self.exact.len();
        match self.kind {
            OptimizeType::Str => {
                let end = to.min(q_high.saturating_add(n));
                if q_low + n > end {
                    return None;
                }
                memmem::rfind(&text[q_low..end], &self.exact).map(|i| q_low + i)
            }
            OptimizeType::StrFast => {
                bm_search_backward(&self.exact, &self.skip_back, text, q_low, q_high, to)
            }
            _ => {
                if q_low >= to {
                    return None;
                }
                let mut q = left_adjust_char_head(text, 0, q_high.min(to - 1));
                loop {
                    if q < q_low {
                        return None;
                    }
                    if ic_match_at(&self.exact, text, q, to, self.ic_unicode) {
                        return Some(q);
                    }
                    q = get_prev_char_head(text, 0, q)?;
                }
            }
        }
    }
}

// ============================================================================
// Scanners
// ============================================================================

/// Horspool search: first occurrence of `target` in `text[from..end]`.
fn bm_search(
    target: &[u8],
    skip: &[usize; CHAR_MAP_SIZE],
    text: &[u8],
    from: usize,
    end: usize,
) -> Option<usize> {
    let n = target.len();
    let tail = n - 1;
    let mut s = from;
    while s + n <= end {
        let mut t = tail;
        while text[s + t] == target[t] {
            if t == 0 {
                return Some(s);
            }
            t -= 1;
        }
        s += skip[text[s + tail] as usize];
    }
    None
}

/// Backward Horspool: last occurrence starting in `low..=high` and ending
/// by `end`. The shift is keyed on the window's first byte.
fn bm_search_backward(
    target: &[u8],
    skip_back: &[usize; CHAR_MAP_SIZE],
    text: &[u8],
    low: usize,
    high: usize,
    end: usize,
) -> Option<usize> {
    let n = target.len();
    if end < n {
        return None;
    }
    let mut s = high.min(end - n);
    loop {
        if s < low {
            return None;
        }
        if text[s..s + n] == *target {
            return Some(s);
        }
        let shift = skip_back[text[s] as usize];
        if s < shift {
            return None;
        }
        s -= shift;
    }
}

fn map_search(map: &[bool; CHAR_MAP_SIZE], text: &[u8], from: usize, end: usize) -> Option<usize> {
    let mut s = right_adjust_char_head(text, 0, from);
    while s < end {
        if map[text[s] as usize] {
            return Some(s);
        }
        s += mbc_enc_len(text[s]);
    }
    None
}

fn map_search_backward(
    map: &[bool; CHAR_MAP_SIZE],
    text: &[u8],
    range: usize,
    start: usize,
) -> Option<usize> {
    if start >= text.len() {
        // A lead-byte map never matches at the very end.
        if text.is_empty() {
            return None;
        }
        return get_prev_char_head(text, 0, text.len())
            .filter(|&p| p >= range)
            .and_then(|p| map_search_backward(map, text, range, p));
    }
    let mut s = left_adjust_char_head(text, 0, start);
    loop {
        if s < range {
            return None;
        }
        if map[text[s] as usize] {
            return Some(s);
        }
        s = get_prev_char_head(text, 0, s)?;
    }
}

/// Case-folded comparison of the whole `pattern` against `text` at `s`.
fn ic_match_at(pattern: &[u8], text: &[u8], s: usize, end: usize, unicode: bool) -> bool {
    let mut p = 0;
    let mut q = s;
    while p < pattern.len() {
        if q >= end {
            return false;
        }
        let qlen = mbc_enc_len(text[q]);
        if q + qlen > end {
            return false;
        }
        let a = mbc_to_code(pattern, p);
        let b = mbc_to_code(text, q);
        if !is_fold_equal(a, b, unicode) {
            return false;
        }
        p += mbc_enc_len(pattern[p]);
        q += qlen;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_literal_uses_memmem() {
        let opt = SearchOptimizer::literal(b"ab", 0, 0);
        assert_eq!(opt.kind(), OptimizeType::Str);
        assert_eq!(opt.search(b"xxabxab", 0, 7, 7), Some(2));
        assert_eq!(opt.search(b"xxabxab", 3, 7, 7), Some(5));
        assert_eq!(opt.search(b"xxabxab", 0, 7, 1), None);
    }

    #[test]
    fn horspool_tables() {
        let opt = SearchOptimizer::literal(b"abcab", 0, 0);
        assert_eq!(opt.kind(), OptimizeType::StrFast);
        assert_eq!(opt.skip[b'a' as usize], 1);
        assert_eq!(opt.skip[b'c' as usize], 2);
        assert_eq!(opt.skip[b'z' as usize], 5);
        assert_eq!(opt.skip_back[b'b' as usize], 1);
        assert_eq!(opt.skip_back[b'a' as usize], 3);
        assert_eq!(opt.skip_back[b'z' as usize], 5);
    }

    #[test]
    fn horspool_forward_and_backward() {
        let text = b"the quick brown fox jumps over the lazy dog";
        let opt = SearchOptimizer::literal(b"the", 0, 0);
        assert_eq!(opt.search(text, 0, text.len(), text.len()), Some(0));
        assert_eq!(opt.search(text, 1, text.len(), text.len()), Some(31));
        assert_eq!(opt.search_backward(text, 0, text.len(), text.len()), Some(31));
        assert_eq!(opt.search_backward(text, 0, 30, text.len()), Some(0));
        assert_eq!(opt.search(text, 32, text.len(), text.len()), None);
    }

    #[test]
    fn distance_window() {
        // Literal 2..=4 bytes after the match start.
        let opt = SearchOptimizer::literal(b"xyz", 2, 4);
        let text = b"0123456xyz";
        assert_eq!(opt.forward_range(text, 0, text.len(), text.len()), Some((3, 5)));
        assert_eq!(opt.backward_range(text, 0, text.len(), text.len()), Some((3, 5)));
    }

    #[test]
    fn backward_window_skips_mid_character_candidates() {
        // The occurrence at 3 puts the only start at byte 2, inside the
        // first "é"; the occurrence at 1 yields start 0.
        let opt = SearchOptimizer::literal("é".as_bytes(), 1, 1);
        let text = "béé".as_bytes();
        assert_eq!(opt.backward_range(text, 0, 3, text.len()), Some((0, 0)));
        assert_eq!(opt.search_backward(text, 0, 3, text.len()), Some(0));

        let opt = SearchOptimizer::literal_ic("É".as_bytes(), 1, 1, false);
        assert_eq!(opt.backward_range(text, 0, 3, text.len()), Some((0, 0)));
        assert_eq!(opt.backward_range(text, 1, 3, text.len()), None);
    }

    #[test]
    fn unbounded_distance_keeps_from() {
        let opt = SearchOptimizer::literal(b"end", 0, INFINITE_LEN);
        let text = b"aaaaend";
        assert_eq!(opt.forward_range(text, 1, text.len(), text.len()), Some((1, 4)));
        assert_eq!(opt.forward_range(b"aaaa", 0, 4, 4), None);
    }

    #[test]
    fn case_folded_literal() {
        let opt = SearchOptimizer::literal_ic("straße".as_bytes(), 0, 0, false);
        let text = "Die STRASSE, die Straße".as_bytes();
        let pos = "Die STRASSE, die ".len();
        assert_eq!(opt.search(text, 0, text.len(), text.len()), Some(pos));
        assert_eq!(opt.search_backward(text, 0, text.len(), text.len()), Some(pos));
    }

    #[test]
    fn lead_byte_map() {
        let mut map = [false; CHAR_MAP_SIZE];
        map[b'k' as usize] = true;
        map[0xc3] = true;
        let opt = SearchOptimizer::lead_map(map);
        let text = "abékx".as_bytes();
        assert_eq!(opt.search(text, 0, text.len(), text.len()), Some(2));
        assert_eq!(opt.search(text, 3, text.len(), text.len()), Some(4));
        assert_eq!(opt.search_backward(text, 0, text.len(), text.len()), Some(4));
        assert_eq!(opt.search_backward(text, 0, 3, text.len()), Some(2));
    }

    #[test]
    fn none_accepts_everything() {
        let opt = SearchOptimizer::none().with_anchor(AnchorFlags::BEGIN_LINE);
        assert_eq!(opt.forward_range(b"abc", 1, 3, 2), Some((1, 2)));
        assert!(opt.anchor().contains(AnchorFlags::BEGIN_LINE));
    }
}
