// unicode/mod.rs - Case folding and code range lookup.
//
// Case-fold partners come from a sorted range table: each range names a
// rule (explicit set, delta, or low-bit flip) that turns a member into its
// partners. Lower/upper mappings pick the standard library's simple case
// mapping only when the table lists it as a fold partner, so a character
// never maps outside its fold class.

mod fold_data;

use smallvec::SmallVec;

use crate::regenc::CodePoint;
use crate::regint::CodeRange;
use fold_data::{FOLD_RANGES, FOLD_SETS};

// === Fold range table ===

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FoldRule {
    /// No case partners.
    Identity,
    /// `value` indexes an explicit set.
    Set,
    DeltaPositive,
    DeltaNegative,
    /// Pairs (even, odd): partner is `c ^ 1`.
    AlternatingAligned,
    /// Pairs (odd, even): partner is `((c - 1) ^ 1) + 1`.
    AlternatingUnaligned,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct FoldRange {
    start: u32,
    end: u32,
    value: u32,
    rule: FoldRule,
}

impl FoldRange {
    const fn new(start: u32, end: u32, value: u32, rule: FoldRule) -> Self {
        FoldRange {
            start,
            end,
            value,
            rule,
        }
    }
}

/// Equivalences the BMP table leaves out; enabled by the `UNICODE` option.
static UNICODE_EXTRA_SETS: [&[u32]; 4] = [
    &[0x0053, 0x0073, 0x017f],
    &[0x004b, 0x006b, 0x212a],
    &[0x03a9, 0x03c9, 0x2126],
    &[0x00df, 0x1e9e],
];

pub type FoldSet = SmallVec<[CodePoint; 4]>;

fn lookup_fold_range(code: CodePoint) -> Option<&'static FoldRange> {
    let idx = FOLD_RANGES
        .binary_search_by(|r| {
            if r.end < code {
                std::cmp::Ordering::Less
            } else if r.start > code {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .ok()?;
    Some(&FOLD_RANGES[idx])
}

fn apply_rule(range: &FoldRange, code: CodePoint, out: &mut FoldSet) {
    match range.rule {
        FoldRule::Identity => {}
        FoldRule::Set => {
            for &c in FOLD_SETS[range.value as usize] {
                if c != code {
                    out.push(c);
                }
            }
        }
        FoldRule::DeltaPositive => out.push(code + range.value),
        FoldRule::DeltaNegative => out.push(code - range.value),
        FoldRule::AlternatingAligned => out.push(code ^ 1),
        FoldRule::AlternatingUnaligned => out.push(((code - 1) ^ 1) + 1),
    }
}

/// Code points equal to `code` under case-insensitive comparison, `code`
/// itself excluded.
pub fn fold_equivalents(code: CodePoint, unicode: bool) -> FoldSet {
    let mut out = FoldSet::new();
    if let Some(range) = lookup_fold_range(code) {
        apply_rule(range, code, &mut out);
    }
    if unicode {
        for set in UNICODE_EXTRA_SETS.iter().filter(|s| s.contains(&code)) {
            for &c in set.iter() {
                if c != code && !out.contains(&c) {
                    out.push(c);
                }
            }
        }
    }
    out
}

#[inline]
pub fn is_fold_equal(a: CodePoint, b: CodePoint, unicode: bool) -> bool {
    if a == b {
        return true;
    }
    if a < 128 && b < 128 {
        return (a as u8).eq_ignore_ascii_case(&(b as u8));
    }
    fold_equivalents(a, unicode).contains(&b)
}

/// Call `f(from, partners)` for every code point that has case partners.
pub fn apply_all_case_fold<F>(unicode: bool, mut f: F)
where
    F: FnMut(CodePoint, &[CodePoint]),
{
    for range in FOLD_RANGES.iter().filter(|r| r.rule != FoldRule::Identity) {
        for code in range.start..=range.end {
            let mut to = FoldSet::new();
            apply_rule(range, code, &mut to);
            if !to.is_empty() {
                f(code, &to);
            }
        }
    }
    if unicode {
        for set in UNICODE_EXTRA_SETS.iter() {
            for &code in set.iter() {
                let to: FoldSet = set.iter().copied().filter(|&c| c != code).collect();
                f(code, &to);
            }
        }
    }
}

// === Case mapping ===

pub fn to_lower(code: CodePoint) -> CodePoint {
    if code < 128 {
        return (code as u8).to_ascii_lowercase() as u32;
    }
    single_mapping(code, char::to_lowercase)
}

pub fn to_upper(code: CodePoint) -> CodePoint {
    if code < 128 {
        return (code as u8).to_ascii_uppercase() as u32;
    }
    single_mapping(code, char::to_uppercase)
}

fn single_mapping<I, F>(code: CodePoint, map: F) -> CodePoint
where
    I: Iterator<Item = char>,
    F: Fn(char) -> I,
{
    let Some(c) = char::from_u32(code) else {
        return code;
    };
    let mut it = map(c);
    match (it.next(), it.next()) {
        (Some(m), None) if fold_equivalents(code, false).contains(&(m as u32)) => m as u32,
        _ => code,
    }
}

// === Code range lookup ===

/// Binary search over sorted, disjoint ranges.
pub fn is_in_code_range(ranges: &[CodeRange], code: CodePoint) -> bool {
    let mut low = 0;
    let mut high = ranges.len();
    while low < high {
        let x = (low + high) >> 1;
        if code > ranges[x].to {
            low = x + 1;
        } else {
            high = x;
        }
    }
    low < ranges.len() && code >= ranges[low].from
}
