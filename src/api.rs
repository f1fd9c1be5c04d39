// api.rs - Idiomatic Rust API for regvm.
//
// Wraps the compiler and the search driver with Rust-native types:
// Regex, RegexBuilder, Match, Captures, FindIter.

use std::ops::Range;

use crate::error::RegexError;
use crate::regcomp::compile;
use crate::regdef::{Region, RegexOptions};
use crate::regenc::mbc_enc_len;
use crate::regexec;
use crate::regint::Program;
use crate::regparse_types::{Ast, Node};
use crate::regstack::StackPool;

/// A compiled regular expression.
///
/// Holds the immutable program and a pool of backtracking stacks, so one
/// `Regex` can be shared across threads.
///
/// # Examples
///
/// ```
/// use regvm::prelude::*;
///
/// let re = Regex::compile(
///     Node::list(vec![Node::str("a"), Node::group(Node::plus(Node::str("b")))]),
///     RegexOptions::empty(),
/// )
/// .unwrap();
/// let m = re.find("xxabbb").unwrap();
/// assert_eq!(m.as_str(), "abbb");
/// assert_eq!(m.start(), 2);
/// ```
pub struct Regex {
    program: Program,
    pool: StackPool,
}

impl Regex {
    /// Compile an AST with the given options.
    pub fn compile(ast: impl Into<Ast>, options: RegexOptions) -> Result<Regex, RegexError> {
        let program = compile(ast.into(), options)?;
        Ok(Regex {
            program,
            pool: StackPool::new(),
        })
    }

    /// Create a [`RegexBuilder`] for configuring options.
    pub fn builder(ast: impl Into<Ast>) -> RegexBuilder {
        RegexBuilder::new(ast)
    }

    /// Find the first match in `text`.
    pub fn find<'t>(&self, text: &'t str) -> Option<Match<'t>> {
        self.find_at(text, 0)
    }

    /// Find the first match starting at or after byte offset `start`.
    pub fn find_at<'t>(&self, text: &'t str, start: usize) -> Option<Match<'t>> {
        if start > text.len() {
            return None;
        }
        let (s, e) = self.search(text, start, text.len(), None, RegexOptions::empty())?;
        Some(Match::new(text, s, e))
    }

    /// Find the last match starting at or before byte offset `start`.
    pub fn rfind<'t>(&self, text: &'t str, start: usize) -> Option<Match<'t>> {
        let start = start.min(text.len());
        let (s, e) = self.search(text, start, 0, None, RegexOptions::empty())?;
        Some(Match::new(text, s, e))
    }

    /// Returns `true` if the regex matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    /// Anchored attempt at byte offset `at`. Returns the match length.
    pub fn match_at(&self, text: &str, at: usize) -> Option<usize> {
        self.match_at_with(text, at, RegexOptions::empty())
    }

    /// Anchored attempt with search-time options such as `NOTBOL`.
    pub fn match_at_with(&self, text: &str, at: usize, options: RegexOptions) -> Option<usize> {
        if at > text.len() {
            return None;
        }
        regexec::match_at(&self.program, text.as_bytes(), at, None, options, &self.pool)
            .ok()
            .flatten()
    }

    /// Find the first match and return all capture groups.
    pub fn captures<'t>(&'t self, text: &'t str) -> Option<Captures<'t>> {
        self.captures_with(text, RegexOptions::empty())
    }

    /// Like [`captures`](Regex::captures) with search-time options.
    pub fn captures_with<'t>(&'t self, text: &'t str, options: RegexOptions) -> Option<Captures<'t>> {
        let mut region = Region::new();
        self.search(text, 0, text.len(), Some(&mut region), options)?;
        Some(Captures {
            text,
            region,
            regex: self,
        })
    }

    /// Iterate over all non-overlapping matches.
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> FindIter<'r, 't> {
        FindIter {
            regex: self,
            text,
            last_end: 0,
            last_was_empty: false,
        }
    }

    /// Number of capture groups, including group 0.
    pub fn captures_len(&self) -> usize {
        self.program.num_captures() + 1
    }

    /// Access the compiled program.
    pub fn as_program(&self) -> &Program {
        &self.program
    }

    fn search(
        &self,
        text: &str,
        start: usize,
        range: usize,
        region: Option<&mut Region>,
        options: RegexOptions,
    ) -> Option<(usize, usize)> {
        regexec::search(
            &self.program,
            text.as_bytes(),
            start,
            range,
            region,
            options,
            &self.pool,
        )
        .ok()
        .flatten()
    }
}

impl std::fmt::Debug for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Regex")
            .field("ops", &self.program.ops().len())
            .field("captures", &self.program.num_captures())
            .field("options", &self.program.options())
            .finish()
    }
}

// === RegexBuilder ===

/// Builder for compiling a [`Regex`] with custom options.
///
/// # Examples
///
/// ```
/// use regvm::prelude::*;
///
/// let re = Regex::builder(Node::str("hello world"))
///     .case_insensitive(true)
///     .build()
///     .unwrap();
/// assert!(re.is_match("Hello World"));
/// ```
pub struct RegexBuilder {
    ast: Ast,
    options: RegexOptions,
}

impl RegexBuilder {
    pub fn new(ast: impl Into<Ast>) -> Self {
        RegexBuilder {
            ast: ast.into(),
            options: RegexOptions::empty(),
        }
    }

    fn set(mut self, flag: RegexOptions, yes: bool) -> Self {
        self.options.set(flag, yes);
        self
    }

    /// Case-insensitive literals, classes and backreferences.
    pub fn case_insensitive(self, yes: bool) -> Self {
        self.set(RegexOptions::IGNORECASE, yes)
    }

    /// `.` also matches line terminators.
    pub fn dot_matches_newline(self, yes: bool) -> Self {
        self.set(RegexOptions::DOTALL, yes)
    }

    /// `^` and `$` match at line boundaries.
    pub fn multi_line(self, yes: bool) -> Self {
        self.set(RegexOptions::MULTILINE, yes)
    }

    /// Full Unicode case-folding equivalences.
    pub fn unicode(self, yes: bool) -> Self {
        self.set(RegexOptions::UNICODE, yes)
    }

    /// Report the longest match instead of the first.
    pub fn find_longest(self, yes: bool) -> Self {
        self.set(RegexOptions::FIND_LONGEST, yes)
    }

    /// Reject empty matches.
    pub fn find_not_empty(self, yes: bool) -> Self {
        self.set(RegexOptions::FIND_NOT_EMPTY, yes)
    }

    /// Set an arbitrary option flag.
    pub fn option(mut self, flag: RegexOptions) -> Self {
        self.options |= flag;
        self
    }

    /// Compile the regex.
    pub fn build(self) -> Result<Regex, RegexError> {
        Regex::compile(self.ast, self.options)
    }
}

impl From<Node> for RegexBuilder {
    fn from(node: Node) -> Self {
        RegexBuilder::new(node)
    }
}

// === Match ===

/// A single match result referencing the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'t> {
    text: &'t str,
    start: usize,
    end: usize,
}

impl<'t> Match<'t> {
    fn new(text: &'t str, start: usize, end: usize) -> Self {
        Match { text, start, end }
    }

    /// Byte offset of the start of the match.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset of the end of the match (exclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn as_str(&self) -> &'t str {
        &self.text[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// === Captures ===

/// All capture groups from a single match.
///
/// Group 0 is the entire match.
pub struct Captures<'t> {
    text: &'t str,
    region: Region,
    regex: &'t Regex,
}

impl<'t> Captures<'t> {
    /// Get capture group `i`, or `None` if the group did not participate.
    pub fn get(&self, i: usize) -> Option<Match<'t>> {
        let r = self.region.get(i)?;
        Some(Match::new(self.text, r.start, r.end))
    }

    /// Get the first participating group with the given name.
    pub fn name(&self, name: &str) -> Option<Match<'t>> {
        let nums = self.regex.program.name_to_group_numbers(name)?;
        nums.iter().find_map(|&num| self.get(num))
    }

    /// Number of capture groups (including group 0).
    pub fn len(&self) -> usize {
        self.region.num_regs
    }

    pub fn is_empty(&self) -> bool {
        self.region.num_regs == 0
    }

    pub fn iter(&self) -> CapturesIter<'_, 't> {
        CapturesIter {
            captures: self,
            index: 0,
        }
    }
}

impl std::fmt::Debug for Captures<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// === CapturesIter ===

/// Iterator over capture groups in a [`Captures`].
pub struct CapturesIter<'c, 't> {
    captures: &'c Captures<'t>,
    index: usize,
}

impl<'c, 't> Iterator for CapturesIter<'c, 't> {
    type Item = Option<Match<'t>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.captures.len() {
            return None;
        }
        let m = self.captures.get(self.index);
        self.index += 1;
        Some(m)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.captures.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CapturesIter<'_, '_> {}

// === FindIter ===

/// Iterator over all non-overlapping matches in a text.
pub struct FindIter<'r, 't> {
    regex: &'r Regex,
    text: &'t str,
    last_end: usize,
    last_was_empty: bool,
}

impl<'r, 't> Iterator for FindIter<'r, 't> {
    type Item = Match<'t>;

    fn next(&mut self) -> Option<Match<'t>> {
        loop {
            if self.last_end > self.text.len() {
                return None;
            }
            let m = self.regex.find_at(self.text, self.last_end)?;

            // An empty match right after the previous match: step one
            // character and retry.
            if m.is_empty() && self.last_was_empty && m.start() == self.last_end {
                if self.last_end >= self.text.len() {
                    return None;
                }
                self.last_end += mbc_enc_len(self.text.as_bytes()[self.last_end]);
                self.last_was_empty = false;
                continue;
            }

            self.last_was_empty = m.is_empty();
            self.last_end = m.end();
            return Some(m);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regparse_types::{AnchorType, CharClass};

    fn digits() -> Ast {
        let mut ast = Ast::new(Node::Empty);
        let d = ast.add_class(CharClass::from_ranges(&[('0', '9')]));
        ast.root = Node::plus(Node::cclass(d));
        ast
    }

    fn date() -> Ast {
        let mut ast = Ast::new(Node::Empty);
        let d = ast.add_class(CharClass::from_ranges(&[('0', '9')]));
        let n = |k| Node::quant(Node::cclass(d), k, k, true);
        ast.root = Node::list(vec![
            Node::group(n(4)),
            Node::str("-"),
            Node::group(n(2)),
            Node::str("-"),
            Node::group(n(2)),
        ]);
        ast
    }

    #[test]
    fn regex_compile_and_find() {
        let re = Regex::compile(digits(), RegexOptions::empty()).unwrap();
        let m = re.find("hello 42 world").unwrap();
        assert_eq!(m.as_str(), "42");
        assert_eq!(m.start(), 6);
        assert_eq!(m.end(), 8);
        assert_eq!(m.range(), 6..8);
        assert_eq!(m.len(), 2);
        assert!(!m.is_empty());
    }

    #[test]
    fn regex_no_match() {
        let re = Regex::compile(digits(), RegexOptions::empty()).unwrap();
        assert!(re.find("no digits here").is_none());
        assert!(!re.is_match("no digits here"));
    }

    #[test]
    fn regex_captures() {
        let re = Regex::compile(date(), RegexOptions::empty()).unwrap();
        let caps = re.captures("date: 2026-02-14").unwrap();
        assert_eq!(caps.get(0).unwrap().as_str(), "2026-02-14");
        assert_eq!(caps.get(1).unwrap().as_str(), "2026");
        assert_eq!(caps.get(2).unwrap().as_str(), "02");
        assert_eq!(caps.get(3).unwrap().as_str(), "14");
        assert!(caps.get(4).is_none());
        assert_eq!(caps.len(), 4);
        assert_eq!(re.captures_len(), 4);
        assert_eq!(caps.iter().len(), 4);
    }

    #[test]
    fn named_captures() {
        let re = Regex::compile(
            Node::list(vec![
                Node::named("first", Node::str("a")),
                Node::opt(Node::named("second", Node::str("z"))),
            ]),
            RegexOptions::empty(),
        )
        .unwrap();
        let caps = re.captures("ab").unwrap();
        assert_eq!(caps.name("first").unwrap().range(), 0..1);
        assert!(caps.name("second").is_none());
        assert!(caps.name("missing").is_none());
    }

    #[test]
    fn builder_options() {
        let re = Regex::builder(Node::str("hello"))
            .case_insensitive(true)
            .build()
            .unwrap();
        assert!(re.is_match("Say HELLO"));

        let re = Regex::builder(Node::list(vec![
            Node::anchor(AnchorType::Caret),
            Node::str("b"),
        ]))
        .multi_line(true)
        .build()
        .unwrap();
        assert_eq!(re.find("a\nb").map(|m| m.start()), Some(2));

        let err = Regex::builder(Node::str("a"))
            .option(RegexOptions::CAPTURE_GROUP | RegexOptions::DONT_CAPTURE_GROUP)
            .build()
            .unwrap_err();
        assert_eq!(err, RegexError::InvalidOptions);
    }

    #[test]
    fn find_iter_handles_empty_matches() {
        let re = Regex::compile(Node::star(Node::str("a")), RegexOptions::empty()).unwrap();
        let spans: Vec<_> = re.find_iter("baab").map(|m| m.range()).collect();
        assert_eq!(spans, vec![0..0, 1..3, 3..3, 4..4]);
    }

    #[test]
    fn find_iter_non_overlapping() {
        let re = Regex::compile(digits(), RegexOptions::empty()).unwrap();
        let found: Vec<_> = re.find_iter("1 22 333").map(|m| m.as_str()).collect();
        assert_eq!(found, vec!["1", "22", "333"]);
    }

    #[test]
    fn rfind_and_match_at() {
        let re = Regex::compile(Node::str("ab"), RegexOptions::empty()).unwrap();
        assert_eq!(re.rfind("ab ab", 5).map(|m| m.start()), Some(3));
        assert_eq!(re.rfind("ab ab", 2).map(|m| m.start()), Some(0));
        assert_eq!(re.match_at("ab ab", 3), Some(2));
        assert_eq!(re.match_at("ab ab", 1), None);
        assert_eq!(re.match_at("ab ab", 9), None);
    }

    #[test]
    fn regex_is_shareable() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<Regex>();
    }
}
