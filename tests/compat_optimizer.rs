// compat_optimizer.rs - Search optimizer choice and soundness.
//
// Soundness: every offset where an anchored match succeeds must be reported
// as a candidate, and the search driver must agree with a brute-force scan
// of anchored attempts.

use regvm::regcomp::compile;
use regvm::regdef::RegexOptions;
use regvm::regenc::mbc_enc_len;
use regvm::regexec::{match_at, search};
use regvm::regint::{OptimizeType, Program};
use regvm::regparse_types::*;
use regvm::regsearch::AnchorFlags;
use regvm::regstack::StackPool;

const TEXTS: &[&str] = &[
    "",
    "abc",
    "xxabcabc",
    "foo barfoo bazfoo",
    "a\nb\nabc\n",
    "ΣΊΣΥΦΟΣ σίσυφος",
    "aaaaaaab",
    "AbC aBc abc",
    "\u{2028}abc\u{2029}",
];

fn starts(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut s = 0;
    loop {
        out.push(s);
        if s >= bytes.len() {
            break;
        }
        s += mbc_enc_len(bytes[s]);
    }
    out
}

fn true_starts(reg: &Program, text: &str, pool: &StackPool) -> Vec<usize> {
    starts(text)
        .into_iter()
        .filter(|&t| {
            match_at(reg, text.as_bytes(), t, None, RegexOptions::empty(), pool)
                .unwrap()
                .is_some()
        })
        .collect()
}

fn check(label: &str, ast: Ast, options: RegexOptions) {
    let reg = compile(ast, options).unwrap_or_else(|e| panic!("{:?}: {}", label, e));
    let pool = StackPool::new();
    for text in TEXTS {
        let bytes = text.as_bytes();
        let truth = true_starts(&reg, text, &pool);

        for &t in truth.iter() {
            assert_eq!(
                reg.optimizer().search(bytes, t, bytes.len(), t),
                Some(t),
                "{:?}: optimizer skipped match start {} in {:?}",
                label,
                t,
                text
            );
        }

        let anchor = reg.optimizer().anchor();
        let expected = truth
            .iter()
            .copied()
            .find(|&t| !anchor.contains(AnchorFlags::BEGIN_BUF) || t == 0)
            .map(|t| {
                let len = match_at(&reg, bytes, t, None, RegexOptions::empty(), &pool)
                    .unwrap()
                    .unwrap();
                (t, t + len)
            });
        let found = search(&reg, bytes, 0, bytes.len(), None, RegexOptions::empty(), &pool)
            .unwrap();
        assert_eq!(found, expected, "{:?}: search disagrees on {:?}", label, text);
    }
}

/// Backward search from every start offset must report the highest
/// anchored match at or below it.
fn check_backward(label: &str, ast: Ast, options: RegexOptions, texts: &[&str]) {
    let reg = compile(ast, options).unwrap_or_else(|e| panic!("{:?}: {}", label, e));
    let pool = StackPool::new();
    let anchor = reg.optimizer().anchor();
    for text in texts {
        let bytes = text.as_bytes();
        let truth = true_starts(&reg, text, &pool);
        for start in starts(text) {
            let expected = truth
                .iter()
                .copied()
                .filter(|&t| t <= start)
                .filter(|&t| !anchor.contains(AnchorFlags::BEGIN_BUF) || t == 0)
                .max()
                .map(|t| {
                    let len = match_at(&reg, bytes, t, None, RegexOptions::empty(), &pool)
                        .unwrap()
                        .unwrap();
                    (t, t + len)
                });
            let found = search(&reg, bytes, start, 0, None, RegexOptions::empty(), &pool).unwrap();
            assert_eq!(
                found, expected,
                "{:?}: backward search from {} disagrees on {:?}",
                label, start, text
            );
        }
    }
}

fn class_ast(ranges: &[(char, char)], body: impl FnOnce(Node) -> Node) -> Ast {
    let mut ast = Ast::new(Node::Empty);
    let id = ast.add_class(CharClass::from_ranges(ranges));
    ast.root = body(Node::cclass(id));
    ast
}

#[test]
fn literal_patterns_are_sound() {
    check("abc", Ast::new(Node::str("abc")), RegexOptions::empty());
    check("ab", Ast::new(Node::str("ab")), RegexOptions::empty());
    check("foo", Ast::new(Node::str("foo")), RegexOptions::empty());
    check("σ", Ast::new(Node::str("σ")), RegexOptions::empty());
    check("abc (ic)", Ast::new(Node::str("abc")), RegexOptions::IGNORECASE);
    check("σίσυφος (ic)", Ast::new(Node::str("σίσυφος")), RegexOptions::IGNORECASE);
}

#[test]
fn distance_patterns_are_sound() {
    check(
        "..abc",
        Ast::new(Node::list(vec![Node::any(), Node::any(), Node::str("abc")])),
        RegexOptions::empty(),
    );
    check(
        "x?abc",
        Ast::new(Node::list(vec![Node::opt(Node::str("x")), Node::str("abc")])),
        RegexOptions::empty(),
    );
    check(
        "\\w+foo",
        Ast::new(Node::list(vec![Node::plus(Node::word()), Node::str("foo")])),
        RegexOptions::empty(),
    );
    check(
        "a.*c",
        Ast::new(Node::list(vec![Node::str("a"), Node::star(Node::any()), Node::str("c")])),
        RegexOptions::empty(),
    );
    check(
        "(?<=a)bc",
        Ast::new(Node::list(vec![
            Node::look(AnchorType::LookBehind, Node::str("a")),
            Node::str("bc"),
        ])),
        RegexOptions::empty(),
    );
    check(
        "a{2,4}b",
        Ast::new(Node::list(vec![Node::quant(Node::str("a"), 2, 4, true), Node::str("b")])),
        RegexOptions::empty(),
    );
}

#[test]
fn lead_byte_patterns_are_sound() {
    check("[a-c]", class_ast(&[('a', 'c')], |c| c), RegexOptions::empty());
    check("[α-ω]+", class_ast(&[('α', 'ω')], Node::plus), RegexOptions::empty());
    check("[α-ω]+ (ic)", class_ast(&[('α', 'ω')], Node::plus), RegexOptions::IGNORECASE);
    check(
        "foo|baz",
        Ast::new(Node::alt(vec![Node::str("foo"), Node::str("baz")])),
        RegexOptions::empty(),
    );
    check("\\w", Ast::new(Node::word()), RegexOptions::empty());
    check(
        "a|b (ic)",
        Ast::new(Node::alt(vec![Node::str("a"), Node::str("b")])),
        RegexOptions::IGNORECASE,
    );
}

#[test]
fn anchored_patterns_are_sound() {
    check(
        "^abc",
        Ast::new(Node::list(vec![Node::anchor(AnchorType::Caret), Node::str("abc")])),
        RegexOptions::empty(),
    );
    check(
        "(?m)^abc",
        Ast::new(Node::list(vec![Node::anchor(AnchorType::Caret), Node::str("abc")])),
        RegexOptions::MULTILINE,
    );
    check(
        "abc$",
        Ast::new(Node::list(vec![Node::str("abc"), Node::anchor(AnchorType::Dollar)])),
        RegexOptions::MULTILINE,
    );
    check("a*", Ast::new(Node::star(Node::str("a"))), RegexOptions::empty());
    check("", Ast::new(Node::Empty), RegexOptions::empty());
}

#[test]
fn optimizer_choice() {
    let kind = |node: Node, options| compile(Ast::new(node), options).unwrap().optimizer().kind();
    assert_eq!(kind(Node::str("abcdef"), RegexOptions::empty()), OptimizeType::StrFast);
    assert_eq!(kind(Node::str("ab"), RegexOptions::empty()), OptimizeType::Str);
    assert_eq!(kind(Node::str("abc"), RegexOptions::IGNORECASE), OptimizeType::StrIc);
    assert_eq!(
        kind(Node::alt(vec![Node::str("x"), Node::str("y")]), RegexOptions::empty()),
        OptimizeType::Map
    );
    assert_eq!(kind(Node::star(Node::str("a")), RegexOptions::empty()), OptimizeType::None);

    let reg = compile(
        Ast::new(Node::list(vec![Node::anchor(AnchorType::Caret), Node::str("a")])),
        RegexOptions::empty(),
    )
    .unwrap();
    assert!(reg.optimizer().anchor().contains(AnchorFlags::BEGIN_BUF));
}

#[test]
fn backward_search_on_multibyte_text() {
    let mut texts = TEXTS.to_vec();
    texts.extend(["béé", "aéxé", "éé bé", "bÉé"]);
    let word_e = || Ast::new(Node::list(vec![Node::word(), Node::str("é")]));

    check_backward("\\wé", word_e(), RegexOptions::empty(), &texts);
    check_backward("\\wé (ic)", word_e(), RegexOptions::IGNORECASE, &texts);
    check_backward("abc", Ast::new(Node::str("abc")), RegexOptions::empty(), &texts);
    check_backward("abc (ic)", Ast::new(Node::str("abc")), RegexOptions::IGNORECASE, &texts);
    check_backward(
        "x?abc",
        Ast::new(Node::list(vec![Node::opt(Node::str("x")), Node::str("abc")])),
        RegexOptions::empty(),
        &texts,
    );
    check_backward(
        "..abc",
        Ast::new(Node::list(vec![Node::any(), Node::any(), Node::str("abc")])),
        RegexOptions::empty(),
        &texts,
    );
    check_backward(
        "σίσυφος (ic)",
        Ast::new(Node::str("σίσυφος")),
        RegexOptions::IGNORECASE,
        &texts,
    );
    check_backward("[α-ω]+", class_ast(&[('α', 'ω')], Node::plus), RegexOptions::empty(), &texts);
}

#[test]
fn rfind_finds_earlier_occurrence() {
    use regvm::prelude::Regex;

    let re = Regex::compile(Node::list(vec![Node::word(), Node::str("é")]), RegexOptions::empty())
        .unwrap();
    assert_eq!(re.rfind("béé", 3).map(|m| m.range()), Some(0..3));
    assert_eq!(re.rfind("béé", 5).map(|m| m.range()), Some(0..3));

    let re = Regex::builder(Node::list(vec![Node::word(), Node::str("é")]))
        .case_insensitive(true)
        .build()
        .unwrap();
    assert_eq!(re.rfind("bÉé", 3).map(|m| m.range()), Some(0..3));
}
