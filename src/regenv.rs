// regenv.rs - Compile environment.
//
// Per-compilation bookkeeping: capture group numbering, the name table,
// which groups need undo-able markers, repeat and null-check ids, and how
// often each class handle is used.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::error::RegexError;
use crate::regdef::RegexOptions;
use crate::regerror::*;
use crate::regint::*;
use crate::regparse_types::*;

pub struct CompileEnv {
    pub options: RegexOptions,
    pub num_mem: usize,
    pub num_named: usize,
    pub mem_names: Vec<Option<String>>,
    pub name_table: HashMap<String, SmallVec<[usize; 2]>>,
    pub backrefed_mem: MemStatusType,
    pub bt_mem_start: MemStatusType,
    pub bt_mem_end: MemStatusType,
    pub num_repeat: usize,
    pub num_empty_check: usize,
    pub class_refs: Vec<usize>,
    /// Class arena after case folding; indexed by `ClassId`.
    pub classes: Vec<CharClass>,
    /// Program class-table slot of each shared class, once emitted.
    pub class_slots: Vec<Option<usize>>,
}

impl CompileEnv {
    pub fn new(options: RegexOptions, num_classes: usize) -> Result<Self, RegexError> {
        if options.contains(RegexOptions::DONT_CAPTURE_GROUP | RegexOptions::CAPTURE_GROUP) {
            return Err(RegexError::InvalidOptions);
        }
        Ok(CompileEnv {
            options,
            num_mem: 0,
            num_named: 0,
            mem_names: vec![None],
            name_table: HashMap::new(),
            backrefed_mem: 0,
            bt_mem_start: 0,
            bt_mem_end: 0,
            num_repeat: 0,
            num_empty_check: 0,
            class_refs: vec![0; num_classes],
            classes: Vec::new(),
            class_slots: vec![None; num_classes],
        })
    }

    #[inline]
    pub fn ignore_case(&self) -> bool {
        self.options.contains(RegexOptions::IGNORECASE)
    }

    /// Whether an unnamed group captures.
    fn captures_unnamed(&self) -> bool {
        if self.options.contains(RegexOptions::DONT_CAPTURE_GROUP) {
            return false;
        }
        self.num_named == 0 || self.options.contains(RegexOptions::CAPTURE_GROUP)
    }

    fn add_mem_entry(&mut self, name: Option<&str>) -> usize {
        self.num_mem += 1;
        let num = self.num_mem;
        self.mem_names.push(name.map(str::to_string));
        if let Some(name) = name {
            self.name_table
                .entry(name.to_string())
                .or_default()
                .push(num);
        }
        num
    }

    pub fn new_repeat_id(&mut self) -> usize {
        self.num_repeat += 1;
        self.num_repeat - 1
    }

    pub fn new_empty_check_id(&mut self) -> usize {
        self.num_empty_check += 1;
        self.num_empty_check - 1
    }

    #[inline]
    pub fn unicode_fold(&self) -> bool {
        self.options.contains(RegexOptions::UNICODE)
    }

    #[inline]
    pub fn class(&self, id: ClassId) -> Option<&CharClass> {
        self.classes.get(id.0)
    }

    /// A class handle used at more than one site is compiled once and
    /// referenced by handle.
    #[inline]
    pub fn is_shared_class(&self, id: ClassId) -> bool {
        self.class_refs.get(id.0).is_some_and(|&n| n > 1)
    }

    // === Numbering pass ===

    /// Number capture groups in pre-order, resolve backreferences and
    /// count class handle uses.
    pub fn assign_groups(&mut self, root: &mut Node) -> Result<(), RegexError> {
        self.num_named = count_named_groups(root);
        self.number_groups(root)?;
        self.resolve_backrefs(root)
    }

    fn number_groups(&mut self, node: &mut Node) -> Result<(), RegexError> {
        match node {
            Node::List(nodes) | Node::Alt(nodes) => {
                for n in nodes.iter_mut() {
                    self.number_groups(n)?;
                }
            }
            Node::Quant(qn) => self.number_groups(&mut qn.body)?,
            Node::Bag(bn) => {
                if let BagData::Memory { name, regnum } = &mut bn.data {
                    *regnum = match name {
                        Some(name) => self.add_mem_entry(Some(name.as_str())),
                        None if self.captures_unnamed() => self.add_mem_entry(None),
                        None => 0,
                    };
                }
                self.number_groups(&mut bn.body)?;
            }
            Node::Anchor(an) => {
                if let Some(body) = an.body.as_mut() {
                    self.number_groups(body)?;
                }
            }
            Node::CClass(id) => match self.class_refs.get_mut(id.0) {
                Some(n) => *n += 1,
                None => return Err(RegexError::bug(REGERR_TYPE_BUG)),
            },
            _ => {}
        }
        Ok(())
    }

    fn resolve_backrefs(&mut self, node: &mut Node) -> Result<(), RegexError> {
        match node {
            Node::List(nodes) | Node::Alt(nodes) => {
                for n in nodes.iter_mut() {
                    self.resolve_backrefs(n)?;
                }
            }
            Node::Quant(qn) => self.resolve_backrefs(&mut qn.body)?,
            Node::Bag(bn) => self.resolve_backrefs(&mut bn.body)?,
            Node::Anchor(an) => {
                if let Some(body) = an.body.as_mut() {
                    self.resolve_backrefs(body)?;
                }
            }
            Node::BackRef(br) => {
                br.back_refs = match &br.target {
                    BackRefTarget::Number(n) => {
                        if *n == 0 || *n > self.num_mem {
                            return Err(RegexError::pattern(REGERR_INVALID_BACKREF, None));
                        }
                        SmallVec::from_slice(&[*n])
                    }
                    BackRefTarget::Name(name) => match self.name_table.get(name) {
                        Some(nums) => nums.clone(),
                        None => {
                            return Err(RegexError::pattern(
                                REGERR_UNDEFINED_NAME_REFERENCE,
                                Some(name.as_str()),
                            ))
                        }
                    },
                };
                for &n in br.back_refs.iter() {
                    mem_status_on(&mut self.backrefed_mem, n);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

fn count_named_groups(node: &Node) -> usize {
    match node {
        Node::List(nodes) | Node::Alt(nodes) => nodes.iter().map(count_named_groups).sum(),
        Node::Quant(qn) => count_named_groups(&qn.body),
        Node::Bag(bn) => {
            let own = matches!(&bn.data, BagData::Memory { name: Some(_), .. }) as usize;
            own + count_named_groups(&bn.body)
        }
        Node::Anchor(an) => an.body.as_ref().map_or(0, count_named_groups),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regnums(node: &Node, out: &mut Vec<usize>) {
        match node {
            Node::List(nodes) | Node::Alt(nodes) => nodes.iter().for_each(|n| regnums(n, out)),
            Node::Quant(qn) => regnums(&qn.body, out),
            Node::Bag(bn) => {
                out.push(bn.regnum());
                regnums(&bn.body, out);
            }
            Node::Anchor(an) => {
                if let Some(b) = an.body.as_ref() {
                    regnums(b, out)
                }
            }
            _ => {}
        }
    }

    #[test]
    fn preorder_numbering() {
        let mut root = Node::list(vec![
            Node::group(Node::group(Node::str("a"))),
            Node::star(Node::group(Node::str("b"))),
        ]);
        let mut env = CompileEnv::new(RegexOptions::empty(), 0).unwrap();
        env.assign_groups(&mut root).unwrap();
        let mut out = Vec::new();
        regnums(&root, &mut out);
        assert_eq!(out, vec![1, 2, 3]);
        assert_eq!(env.num_mem, 3);
    }

    #[test]
    fn named_groups_disable_plain_capture() {
        let mut root = Node::list(vec![
            Node::group(Node::str("a")),
            Node::named("x", Node::str("b")),
        ]);
        let mut env = CompileEnv::new(RegexOptions::empty(), 0).unwrap();
        env.assign_groups(&mut root).unwrap();
        assert_eq!(env.num_mem, 1);
        assert_eq!(env.name_table["x"].as_slice(), &[1]);
    }

    #[test]
    fn capture_group_option_keeps_plain_groups() {
        let mut root = Node::list(vec![
            Node::group(Node::str("a")),
            Node::named("x", Node::str("b")),
        ]);
        let mut env = CompileEnv::new(RegexOptions::CAPTURE_GROUP, 0).unwrap();
        env.assign_groups(&mut root).unwrap();
        assert_eq!(env.num_mem, 2);
        assert_eq!(env.name_table["x"].as_slice(), &[2]);
    }

    #[test]
    fn contradictory_options() {
        let r = CompileEnv::new(
            RegexOptions::CAPTURE_GROUP | RegexOptions::DONT_CAPTURE_GROUP,
            0,
        );
        assert!(matches!(r, Err(RegexError::InvalidOptions)));
    }

    #[test]
    fn backref_resolution() {
        let mut root = Node::list(vec![
            Node::named("n", Node::str("a")),
            Node::named("n", Node::str("b")),
            Node::backref_name("n"),
        ]);
        let mut env = CompileEnv::new(RegexOptions::empty(), 0).unwrap();
        env.assign_groups(&mut root).unwrap();
        match &root {
            Node::List(nodes) => match &nodes[2] {
                Node::BackRef(br) => assert_eq!(br.back_refs.as_slice(), &[1, 2]),
                _ => panic!("expected backref"),
            },
            _ => panic!("expected list"),
        }
        assert!(mem_status_at0(env.backrefed_mem, 2));
    }

    #[test]
    fn bad_backrefs() {
        let mut root = Node::list(vec![Node::group(Node::str("a")), Node::backref(2)]);
        let mut env = CompileEnv::new(RegexOptions::empty(), 0).unwrap();
        let err = env.assign_groups(&mut root).unwrap_err();
        assert_eq!(err.code(), REGERR_INVALID_BACKREF);

        let mut root = Node::backref_name("nope");
        let mut env = CompileEnv::new(RegexOptions::empty(), 0).unwrap();
        let err = env.assign_groups(&mut root).unwrap_err();
        assert_eq!(err.code(), REGERR_UNDEFINED_NAME_REFERENCE);
    }

    #[test]
    fn shared_class_detection() {
        let mut ast = Ast::new(Node::Empty);
        let a = ast.add_class(CharClass::from_chars("ab"));
        let b = ast.add_class(CharClass::from_chars("cd"));
        ast.root = Node::list(vec![Node::cclass(a), Node::cclass(b), Node::cclass(a)]);
        let mut env = CompileEnv::new(RegexOptions::empty(), ast.classes.len()).unwrap();
        env.assign_groups(&mut ast.root).unwrap();
        assert!(env.is_shared_class(a));
        assert!(!env.is_shared_class(b));
    }
}
