// compat_options.rs - Compile-time and search-time option behavior.
//
//   x2o(label, ast, compile_opts, string, from, to)
//   x2s(label, ast, search_opts, string, from, to)
//   no(label, ast, compile_opts, string)
//   ns(label, ast, search_opts, string)

use regvm::regcomp::compile;
use regvm::regdef::{Region, RegexOptions};
use regvm::regerror::*;
use regvm::regexec::{match_at, search};
use regvm::regparse_types::*;
use regvm::regstack::StackPool;

fn run(
    label: &str,
    ast: Ast,
    compile_opts: RegexOptions,
    search_opts: RegexOptions,
    input: &str,
) -> (Option<(usize, usize)>, Region) {
    let reg = compile(ast, compile_opts)
        .unwrap_or_else(|e| panic!("compile failed for {:?}: {}", label, e));
    let pool = StackPool::new();
    let mut region = Region::new();
    let r = search(
        &reg,
        input.as_bytes(),
        0,
        input.len(),
        Some(&mut region),
        search_opts,
        &pool,
    )
    .unwrap_or_else(|e| panic!("search failed for {:?}: {}", label, e));
    (r, region)
}

fn x2o(label: &str, ast: impl Into<Ast>, opts: RegexOptions, input: &str, from: usize, to: usize) {
    let (r, _) = run(label, ast.into(), opts, RegexOptions::empty(), input);
    assert_eq!(r, Some((from, to)), "x2o: {:?} against {:?}", label, input);
}

fn no(label: &str, ast: impl Into<Ast>, opts: RegexOptions, input: &str) {
    let (r, _) = run(label, ast.into(), opts, RegexOptions::empty(), input);
    assert_eq!(r, None, "no: unexpected match for {:?} against {:?}", label, input);
}

fn x2s(label: &str, ast: impl Into<Ast>, opts: RegexOptions, input: &str, from: usize, to: usize) {
    let (r, _) = run(label, ast.into(), RegexOptions::empty(), opts, input);
    assert_eq!(r, Some((from, to)), "x2s: {:?} against {:?}", label, input);
}

fn ns(label: &str, ast: impl Into<Ast>, opts: RegexOptions, input: &str) {
    let (r, _) = run(label, ast.into(), RegexOptions::empty(), opts, input);
    assert_eq!(r, None, "ns: unexpected match for {:?} against {:?}", label, input);
}

const IC: RegexOptions = RegexOptions::IGNORECASE;

// === IGNORECASE ===

#[test]
fn ignorecase_literals() {
    x2o("abc", Node::str("abc"), IC, "xABC", 1, 4);
    x2o("hello world", Node::str("hello world"), IC, "Say HELLO World", 4, 15);
    x2o("a", Node::str("a"), IC, "bA", 1, 2);
    x2o("é", Node::str("é"), IC, "É", 0, 2);
    x2o("σ", Node::str("σ"), IC, "Σ", 0, 2);
    x2o("σ", Node::str("σ"), IC, "ς", 0, 2);
    x2o("straße", Node::str("straße"), IC, "STRAßE", 0, 7);
    no("abc", Node::str("abc"), IC, "abd");
    no("abc", Node::str("abc"), RegexOptions::empty(), "ABC");
}

#[test]
fn ignorecase_on_node_only() {
    let ast = Node::list(vec![Node::str_ic("ab"), Node::str("c")]);
    x2o("(?i:ab)c", ast, RegexOptions::empty(), "ABc", 0, 3);
    let ast = Node::list(vec![Node::str_ic("ab"), Node::str("c")]);
    no("(?i:ab)c", ast, RegexOptions::empty(), "ABC");
}

#[test]
fn ignorecase_classes() {
    let class = |cc: CharClass| {
        let mut ast = Ast::new(Node::Empty);
        let id = ast.add_class(cc);
        ast.root = Node::plus(Node::cclass(id));
        ast
    };
    x2o("[a-c]+", class(CharClass::from_ranges(&[('a', 'c')])), IC, "xAbC", 1, 4);
    x2o("[α-ω]+", class(CharClass::from_ranges(&[('α', 'ω')])), IC, "ΑΒγ", 0, 6);
    x2o(
        "(?i)[^a]",
        class(CharClass::from_chars("a").negated()),
        IC,
        "aAb",
        2,
        3,
    );
    x2o(
        "[a-c] with class-level ignore case",
        class(CharClass::from_ranges(&[('a', 'c')]).case_insensitive()),
        RegexOptions::empty(),
        "B",
        0,
        1,
    );
}

#[test]
fn unicode_fold_extensions() {
    let ic_uni = IC | RegexOptions::UNICODE;
    x2o("k", Node::str("k"), ic_uni, "\u{212A}", 0, 3);
    no("k", Node::str("k"), IC, "\u{212A}");
    x2o("s", Node::str("s"), ic_uni, "\u{017F}", 0, 2);
    no("s", Node::str("s"), IC, "\u{017F}");
    x2o("ß", Node::str("ß"), ic_uni, "\u{1E9E}", 0, 3);
    x2o("ω", Node::str("ω"), ic_uni, "\u{2126}", 0, 3);
}

// === MULTILINE / DOTALL ===

#[test]
fn multiline_anchors() {
    let caret = || Node::list(vec![Node::anchor(AnchorType::Caret), Node::str("b")]);
    let dollar = || Node::list(vec![Node::str("a"), Node::anchor(AnchorType::Dollar)]);
    x2o("^b", caret(), RegexOptions::MULTILINE, "a\nb", 2, 3);
    no("^b", caret(), RegexOptions::empty(), "a\nb");
    x2o("a$", dollar(), RegexOptions::MULTILINE, "a\nb", 0, 1);
    no("a$", dollar(), RegexOptions::empty(), "a\nb");
}

#[test]
fn dotall() {
    let ast = || Node::list(vec![Node::str("a"), Node::any(), Node::str("c")]);
    x2o("a.c", ast(), RegexOptions::DOTALL, "a\nc", 0, 3);
    no("a.c", ast(), RegexOptions::empty(), "a\nc");
    let star = || Node::list(vec![Node::str("a"), Node::star(Node::any()), Node::str("c")]);
    x2o("a.*c", star(), RegexOptions::DOTALL, "a\n\nc", 0, 4);
    no("a.*c", star(), RegexOptions::empty(), "a\n\nc");
}

// === FIND_LONGEST / FIND_NOT_EMPTY ===

#[test]
fn find_longest() {
    let ast = || Node::alt(vec![Node::str("a"), Node::str("aa")]);
    x2o("a|aa", ast(), RegexOptions::FIND_LONGEST, "aa", 0, 2);
    x2o("a|aa", ast(), RegexOptions::empty(), "aa", 0, 1);
    x2o(
        "a+?",
        Node::quant(Node::str("a"), 1, -1, false),
        RegexOptions::FIND_LONGEST,
        "baaa",
        1,
        4,
    );
}

#[test]
fn find_longest_captures() {
    let ast = Node::alt(vec![
        Node::group(Node::str("a")),
        Node::group(Node::str("aa")),
    ]);
    let (r, region) = run("(a)|(aa)", ast.into(), RegexOptions::FIND_LONGEST, RegexOptions::empty(), "aa");
    assert_eq!(r, Some((0, 2)));
    assert_eq!(region.get(1), None);
    assert_eq!(region.get(2), Some(0..2));
}

#[test]
fn find_longest_match_at() {
    let reg = compile(
        Ast::new(Node::alt(vec![Node::str("ab"), Node::str("abcd"), Node::str("abc")])),
        RegexOptions::FIND_LONGEST,
    )
    .unwrap();
    let pool = StackPool::new();
    let r = match_at(&reg, b"abcde", 0, None, RegexOptions::empty(), &pool).unwrap();
    assert_eq!(r, Some(4));
}

#[test]
fn find_not_empty() {
    let ast = || Node::star(Node::str("a"));
    x2o("a*", ast(), RegexOptions::FIND_NOT_EMPTY, "bab", 1, 2);
    x2o("a*", ast(), RegexOptions::empty(), "bab", 0, 0);
    no("a*", ast(), RegexOptions::FIND_NOT_EMPTY, "bbb");
    x2s("a* (search-time)", ast(), RegexOptions::FIND_NOT_EMPTY, "bab", 1, 2);
}

// === Capture options ===

#[test]
fn dont_capture_group() {
    let reg = compile(
        Ast::new(Node::list(vec![Node::group(Node::str("a")), Node::group(Node::str("b"))])),
        RegexOptions::DONT_CAPTURE_GROUP,
    )
    .unwrap();
    assert_eq!(reg.num_captures(), 0);
}

#[test]
fn named_groups_and_capture_group() {
    let ast = || Node::list(vec![Node::group(Node::str("a")), Node::named("x", Node::str("b"))]);
    let reg = compile(Ast::new(ast()), RegexOptions::empty()).unwrap();
    assert_eq!(reg.num_captures(), 1);
    assert_eq!(reg.name_to_group_numbers("x"), Some(&[1][..]));

    let reg = compile(Ast::new(ast()), RegexOptions::CAPTURE_GROUP).unwrap();
    assert_eq!(reg.num_captures(), 2);
    assert_eq!(reg.name_to_group_numbers("x"), Some(&[2][..]));
}

#[test]
fn contradictory_capture_options() {
    let err = compile(
        Ast::new(Node::str("a")),
        RegexOptions::DONT_CAPTURE_GROUP | RegexOptions::CAPTURE_GROUP,
    )
    .unwrap_err();
    assert_eq!(err.code(), REGERR_INVALID_COMBINATION_OF_OPTIONS);
}

// === Search-time options ===

#[test]
fn notbol_noteol() {
    let caret = || Node::list(vec![Node::anchor(AnchorType::Caret), Node::str("a")]);
    ns("^a", caret(), RegexOptions::NOTBOL, "a");
    x2s("^a", caret(), RegexOptions::NOTEOL, "a", 0, 1);

    let dollar = || Node::list(vec![Node::str("a"), Node::anchor(AnchorType::Dollar)]);
    ns("a$", dollar(), RegexOptions::NOTEOL, "a");
    x2s("a$", dollar(), RegexOptions::NOTBOL, "a", 0, 1);

    let bol = || Node::list(vec![Node::anchor(AnchorType::BeginLine), Node::str("a")]);
    x2s("(?m)^a", bol(), RegexOptions::NOTBOL, "a\na", 2, 3);

    let eol = || Node::list(vec![Node::str("a"), Node::anchor(AnchorType::EndLine)]);
    x2s("(?m)a$", eol(), RegexOptions::NOTEOL, "a\na", 0, 1);
}

#[test]
fn posix_region_leaves_region_unfilled() {
    let ast = Node::list(vec![Node::group(Node::str("a")), Node::str("b")]);
    let (r, region) = run("(a)b", ast.into(), RegexOptions::empty(), RegexOptions::POSIX_REGION, "xab");
    assert_eq!(r, Some((1, 3)));
    assert_eq!(region.get(0), None);
    assert_eq!(region.get(1), None);
}
