//! # regvm
//!
//! Backtracking regex engine core: a compiler from a regex syntax tree to
//! compact bytecode, and a stack-based virtual machine that matches that
//! bytecode against UTF-8 text. Literal prefilters run on
//! [`memchr`](https://crates.io/crates/memchr).
//!
//! There is no pattern-string parser; callers build the tree with the
//! [`Node`](regparse_types::Node) constructors.
//!
//! ## Quick Start
//!
//! ```rust
//! use regvm::prelude::*;
//!
//! let re = Regex::compile(
//!     Node::list(vec![Node::str("ab"), Node::star(Node::str("c"))]),
//!     RegexOptions::empty(),
//! )
//! .unwrap();
//! let m = re.find("xxabccc").unwrap();
//! assert_eq!(m.as_str(), "abccc");
//! assert_eq!(m.start(), 2);
//! ```
//!
//! Character classes live in an arena owned by the [`Ast`](regparse_types::Ast):
//!
//! ```rust
//! use regvm::prelude::*;
//!
//! let mut ast = Ast::new(Node::Empty);
//! let digit = ast.add_class(CharClass::from_ranges(&[('0', '9')]));
//! ast.root = Node::group(Node::plus(Node::cclass(digit)));
//! let re = Regex::builder(ast).build().unwrap();
//! let caps = re.captures("order 1234").unwrap();
//! assert_eq!(caps.get(1).unwrap().as_str(), "1234");
//! ```
//!
//! ## Low-Level API
//!
//! The compiler and the driver are usable without the facade:
//!
//! ```rust
//! use regvm::regcomp::compile;
//! use regvm::regdef::{Region, RegexOptions};
//! use regvm::regexec::search;
//! use regvm::regparse_types::{Ast, Node};
//! use regvm::regstack::StackPool;
//!
//! let program = compile(Ast::new(Node::str("needle")), RegexOptions::empty()).unwrap();
//! let pool = StackPool::new();
//! let mut region = Region::new();
//! let text = b"haystack with a needle";
//! let span = search(&program, text, 0, text.len(), Some(&mut region), RegexOptions::empty(), &pool)
//!     .unwrap();
//! assert_eq!(span, Some((16, 22)));
//! ```
//!
//! ## Module Structure
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`regparse_types`] | Syntax tree and character classes |
//! | [`regenv`] | Group numbering and per-compile bookkeeping |
//! | [`regcomp`] | Tree-to-bytecode compiler |
//! | [`regint`] | Opcodes, payloads and the compiled program |
//! | [`regsearch`] | Search optimizer (literal and lead-byte prefilters) |
//! | [`regstack`] | Backtracking stack and stack pool |
//! | [`regexec`] | VM executor and search driver |
//! | [`regenc`] | UTF-8 helpers |
//! | [`unicode`] | Case-fold tables |
//! | [`regdef`] | Options and capture regions |
//! | [`regerror`] | Error codes and messages |

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod error;
pub mod prelude;
pub mod regcomp;
pub mod regdef;
pub mod regenc;
pub mod regenv;
pub mod regerror;
pub mod regexec;
pub mod regint;
pub mod regparse_types;
pub mod regsearch;
pub mod regstack;
pub mod unicode;
