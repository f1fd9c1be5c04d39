// regdef.rs - Public option set, match region and shared constants.
//
// Compile-time and search-time switches share one bit-set, as in the
// Oniguruma option word. Search-time bits (NOTBOL, NOTEOL, POSIX_REGION)
// may be passed again per search and are OR-ed with the compiled ones.

use bitflags::bitflags;

bitflags! {
    /// Options accepted by the compiler and the search driver.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct RegexOptions: u32 {
        /// Case-insensitive literals, classes and backreferences.
        const IGNORECASE         = 1 << 0;
        /// `^` and `$` anchors match at line terminators.
        const MULTILINE          = 1 << 1;
        /// `.` also matches line terminators.
        const DOTALL             = 1 << 2;
        /// Report the longest match instead of the first one found.
        const FIND_LONGEST       = 1 << 3;
        /// Reject empty matches.
        const FIND_NOT_EMPTY     = 1 << 4;
        /// Plain groups do not capture; only named groups do.
        const DONT_CAPTURE_GROUP = 1 << 5;
        /// Plain groups capture even when named groups exist.
        const CAPTURE_GROUP      = 1 << 6;
        /// Add the case-fold equivalences outside the BMP range table.
        const UNICODE            = 1 << 7;
        /// The start of the text is not a line start (search time).
        const NOTBOL             = 1 << 8;
        /// The end of the text is not a line end (search time).
        const NOTEOL             = 1 << 9;
        /// Do not fill the capture region (search time).
        const POSIX_REGION       = 1 << 10;
    }
}

impl RegexOptions {
    /// Options that only matter at search time.
    pub const SEARCH_TIME: RegexOptions = RegexOptions::NOTBOL
        .union(RegexOptions::NOTEOL)
        .union(RegexOptions::POSIX_REGION);

    #[inline]
    pub fn is_find_condition(self) -> bool {
        self.intersects(RegexOptions::FIND_LONGEST | RegexOptions::FIND_NOT_EMPTY)
    }
}

/// Sentinel offset for a capture group that did not participate.
pub const REGION_NOTPOS: i32 = -1;

/// Upper bound stored for `{n,}` style repeats in the repeat-range table.
pub const REPEAT_INFINITE_CAP: i32 = 0x7fff_ffff;

// === Region (match result) ===

/// Capture boundaries of a match. Slot 0 is the whole match, slot `n` the
/// `n`-th capture group; unset slots hold [`REGION_NOTPOS`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub num_regs: usize,
    pub beg: Vec<i32>,
    pub end: Vec<i32>,
}

impl Region {
    pub fn new() -> Self {
        Region {
            num_regs: 0,
            beg: Vec::new(),
            end: Vec::new(),
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        let mut region = Region::new();
        region.resize(n);
        region
    }

    pub fn clear(&mut self) {
        for i in 0..self.num_regs {
            self.beg[i] = REGION_NOTPOS;
            self.end[i] = REGION_NOTPOS;
        }
    }

    pub fn resize(&mut self, n: usize) {
        self.beg.resize(n, REGION_NOTPOS);
        self.end.resize(n, REGION_NOTPOS);
        self.num_regs = n;
    }

    /// Byte range of slot `i`, or `None` when the group is unset.
    pub fn get(&self, i: usize) -> Option<std::ops::Range<usize>> {
        if i >= self.num_regs || self.beg[i] == REGION_NOTPOS {
            return None;
        }
        Some(self.beg[i] as usize..self.end[i] as usize)
    }

    #[inline]
    pub fn is_set(&self, i: usize) -> bool {
        self.get(i).is_some()
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_resize_fills_notpos() {
        let mut r = Region::with_capacity(3);
        assert_eq!(r.num_regs, 3);
        assert!(r.beg.iter().all(|&b| b == REGION_NOTPOS));
        r.beg[1] = 2;
        r.end[1] = 5;
        assert_eq!(r.get(1), Some(2..5));
        r.clear();
        assert_eq!(r.get(1), None);
    }

    #[test]
    fn get_out_of_range() {
        let r = Region::with_capacity(1);
        assert_eq!(r.get(4), None);
    }

    #[test]
    fn search_time_bits() {
        assert!(RegexOptions::SEARCH_TIME.contains(RegexOptions::NOTBOL));
        assert!(!RegexOptions::SEARCH_TIME.contains(RegexOptions::IGNORECASE));
        assert!(RegexOptions::FIND_LONGEST.is_find_condition());
        assert!(!RegexOptions::DOTALL.is_find_condition());
    }
}
