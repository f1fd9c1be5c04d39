// prelude.rs - Convenient re-exports for the idiomatic API.
//
//! # Prelude
//!
//! ```
//! use regvm::prelude::*;
//!
//! let re = Regex::compile(Node::plus(Node::str("ab")), RegexOptions::empty()).unwrap();
//! let m = re.find("xxababx").unwrap();
//! assert_eq!(m.as_str(), "abab");
//! ```

pub use crate::api::{Captures, CapturesIter, FindIter, Match, Regex, RegexBuilder};
pub use crate::error::RegexError;
pub use crate::regdef::RegexOptions;
pub use crate::regint::INFINITE_REPEAT;
pub use crate::regparse_types::{AnchorType, Ast, CharClass, ClassId, Node};
