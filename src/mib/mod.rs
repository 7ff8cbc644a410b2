//! MIB symbol table.
//!
//! A prefix tree keyed by subidentifier maps OIDs to symbol information:
//! name, defining module, DISPLAY-HINT, textual convention and integer
//! enumeration labels. The table is built once at startup from the compiled
//! base module set ([`Mib::standard()`]) and treated as read-only afterwards.

mod base;

use crate::error::{Error, Result};
use crate::oid::Oid;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Symbol information attached to a tree node.
#[derive(Debug, Clone)]
pub struct MibNode {
    /// Object descriptor, e.g. `sysDescr`.
    pub name: String,
    /// Defining module, e.g. `SNMPv2-MIB`.
    pub module: String,
    /// DISPLAY-HINT format string, when the object carries one.
    pub hint: Option<String>,
    /// Textual convention name, e.g. `DisplayString`.
    pub convention: Option<String>,
    /// Labels for enumerated INTEGER values.
    pub enums: Vec<(i64, String)>,
}

impl MibNode {
    /// Label for an enumerated integer value.
    pub fn enum_label(&self, value: i64) -> Option<&str> {
        self.enums
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, label)| label.as_str())
    }
}

/// How an OID is rendered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OidFormat {
    /// Dotted numeric form.
    Numeric,
    /// Shortest symbolic prefix with module qualifier (default).
    #[default]
    Short,
    /// Complete named path from the root.
    Full,
}

#[derive(Debug, Default)]
struct TreeNode {
    children: BTreeMap<u32, TreeNode>,
    info: Option<MibNode>,
}

/// The symbol table.
#[derive(Debug, Default)]
pub struct Mib {
    root: TreeNode,
    by_name: HashMap<String, Oid>,
}

impl Mib {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in base module set (SNMPv2-SMI, SNMPv2-MIB, IF-MIB and
    /// friends).
    pub fn standard() -> Self {
        let mut mib = Self::new();
        for node in base::BASE_NODES {
            mib.insert(
                Oid::from_slice(node.oid),
                MibNode {
                    name: node.name.to_string(),
                    module: node.module.to_string(),
                    hint: node.hint.map(str::to_string),
                    convention: node.convention.map(str::to_string),
                    enums: node
                        .enums
                        .iter()
                        .map(|(v, l)| (*v, l.to_string()))
                        .collect(),
                },
            );
        }
        mib
    }

    /// Insert a node. A later insert at the same OID replaces the earlier
    /// one; the first name registration wins for name lookup.
    pub fn insert(&mut self, oid: Oid, info: MibNode) {
        self.by_name
            .entry(info.name.clone())
            .or_insert_with(|| oid.clone());

        let mut node = &mut self.root;
        for &arc in oid.arcs() {
            node = node.children.entry(arc).or_default();
        }
        node.info = Some(info);
    }

    /// Exact lookup.
    pub fn lookup(&self, oid: &Oid) -> Option<&MibNode> {
        let mut node = &self.root;
        for &arc in oid.arcs() {
            node = node.children.get(&arc)?;
        }
        node.info.as_ref()
    }

    /// Longest named prefix of `oid`. Returns the matched arc count and the
    /// node.
    pub fn longest_prefix(&self, oid: &Oid) -> Option<(usize, &MibNode)> {
        let mut node = &self.root;
        let mut best: Option<(usize, &MibNode)> = None;
        for (i, &arc) in oid.arcs().iter().enumerate() {
            node = match node.children.get(&arc) {
                Some(n) => n,
                None => break,
            };
            if let Some(info) = &node.info {
                best = Some((i + 1, info));
            }
        }
        best
    }

    /// Resolve a symbol name to its OID.
    pub fn name_to_oid(&self, name: &str) -> Option<&Oid> {
        self.by_name.get(name)
    }

    /// DISPLAY-HINT for `oid`, from the longest named prefix carrying one.
    pub fn hint_for(&self, oid: &Oid) -> Option<&str> {
        let mut node = &self.root;
        let mut best: Option<&str> = None;
        for &arc in oid.arcs() {
            node = match node.children.get(&arc) {
                Some(n) => n,
                None => break,
            };
            if let Some(hint) = node.info.as_ref().and_then(|i| i.hint.as_deref()) {
                best = Some(hint);
            }
        }
        best
    }

    /// Parse an OID in numeric, symbolic or mixed form.
    ///
    /// Numeric segments extend the OID by one arc. A symbolic segment
    /// resolves through the name table; its OID must extend what has been
    /// accumulated so far. A leading `.` is permitted and ignored.
    pub fn parse_oid(&self, s: &str) -> Result<Oid> {
        let stripped = s.strip_prefix('.').unwrap_or(s);
        if stripped.is_empty() {
            return Err(Error::UnknownName {
                name: s.to_string(),
            });
        }

        let mut arcs: Vec<u32> = Vec::new();
        for segment in stripped.split('.') {
            if let Ok(arc) = segment.parse::<u32>() {
                arcs.push(arc);
                continue;
            }
            let resolved = self.name_to_oid(segment).ok_or_else(|| Error::UnknownName {
                name: s.to_string(),
            })?;
            if resolved.arcs().len() < arcs.len() || resolved.arcs()[..arcs.len()] != arcs[..] {
                return Err(Error::UnknownName {
                    name: s.to_string(),
                });
            }
            arcs = resolved.arcs().to_vec();
        }
        Ok(Oid::new(arcs))
    }

    /// Render an OID in the given format.
    pub fn render_oid(&self, oid: &Oid, format: OidFormat) -> String {
        match format {
            OidFormat::Numeric => oid.to_string(),
            OidFormat::Short => match self.longest_prefix(oid) {
                Some((matched, info)) => {
                    let mut out = format!("{}::{}", info.module, info.name);
                    for &arc in &oid.arcs()[matched..] {
                        let _ = write!(out, ".{}", arc);
                    }
                    out
                }
                None => oid.to_string(),
            },
            OidFormat::Full => {
                let mut out = String::new();
                let mut node = Some(&self.root);
                for &arc in oid.arcs() {
                    node = node.and_then(|n| n.children.get(&arc));
                    match node.and_then(|n| n.info.as_ref()) {
                        Some(info) => {
                            let _ = write!(out, ".{}", info.name);
                        }
                        None => {
                            let _ = write!(out, ".{}", arc);
                        }
                    }
                }
                out
            }
        }
    }

    /// Iterate every known node in tree (lexicographic OID) order.
    pub fn iter(&self) -> MibIter<'_> {
        MibIter {
            stack: vec![self.root.children.iter()],
            arcs: Vec::new(),
        }
    }
}

/// In-order traversal over the tree.
pub struct MibIter<'a> {
    stack: Vec<std::collections::btree_map::Iter<'a, u32, TreeNode>>,
    arcs: Vec<u32>,
}

impl<'a> Iterator for MibIter<'a> {
    type Item = (Oid, &'a MibNode);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some((&arc, child)) => {
                    self.arcs.push(arc);
                    self.stack.push(child.children.iter());
                    if let Some(info) = &child.info {
                        return Some((Oid::new(self.arcs.iter().copied()), info));
                    }
                }
                None => {
                    self.stack.pop();
                    self.arcs.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    #[test]
    fn resolves_standard_names() {
        let mib = Mib::standard();
        assert_eq!(
            mib.name_to_oid("sysDescr"),
            Some(&oid!(1, 3, 6, 1, 2, 1, 1, 1))
        );
        assert_eq!(mib.name_to_oid("mib-2"), Some(&oid!(1, 3, 6, 1, 2, 1)));
        assert_eq!(mib.name_to_oid("noSuchThing"), None);
    }

    #[test]
    fn parse_symbolic_forms() {
        let mib = Mib::standard();
        assert_eq!(
            mib.parse_oid("system.sysDescr.0").unwrap(),
            oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)
        );
        assert_eq!(
            mib.parse_oid("sysDescr.0").unwrap(),
            oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)
        );
        assert_eq!(
            mib.parse_oid("1.3.6.1.2.1").unwrap(),
            oid!(1, 3, 6, 1, 2, 1)
        );
        assert_eq!(
            mib.parse_oid(".1.3.6.1.2.1.1").unwrap(),
            oid!(1, 3, 6, 1, 2, 1, 1)
        );
    }

    #[test]
    fn parse_rejects_unknown_and_inconsistent() {
        let mib = Mib::standard();
        assert!(matches!(
            mib.parse_oid("bogusName.0"),
            Err(Error::UnknownName { .. })
        ));
        // ifDescr does not extend the system subtree
        assert!(mib.parse_oid("system.ifDescr").is_err());
    }

    #[test]
    fn render_short() {
        let mib = Mib::standard();
        assert_eq!(
            mib.render_oid(&oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), OidFormat::Short),
            "SNMPv2-MIB::sysDescr.0"
        );
        // Unknown subtree falls back to numeric
        assert_eq!(
            mib.render_oid(&oid!(1, 2, 999), OidFormat::Short),
            "1.2.999"
        );
    }

    #[test]
    fn render_numeric() {
        let mib = Mib::standard();
        assert_eq!(
            mib.render_oid(&oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), OidFormat::Numeric),
            "1.3.6.1.2.1.1.1.0"
        );
    }

    #[test]
    fn render_full() {
        let mib = Mib::standard();
        assert_eq!(
            mib.render_oid(&oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), OidFormat::Full),
            ".iso.org.dod.internet.mgmt.mib-2.system.sysDescr.0"
        );
    }

    #[test]
    fn hint_by_longest_prefix() {
        let mib = Mib::standard();
        // Instances inherit the column's hint
        let phys = oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 6, 1);
        assert_eq!(mib.hint_for(&phys), Some("1x:"));
        assert_eq!(mib.hint_for(&oid!(1, 3, 6, 1, 9, 9)), None);
    }

    #[test]
    fn enum_labels() {
        let mib = Mib::standard();
        let if_oper = mib.lookup(&oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 8)).unwrap();
        assert_eq!(if_oper.enum_label(1), Some("up"));
        assert_eq!(if_oper.enum_label(2), Some("down"));
        assert_eq!(if_oper.enum_label(99), None);
    }

    #[test]
    fn iteration_is_ordered() {
        let mib = Mib::standard();
        let oids: Vec<Oid> = mib.iter().map(|(oid, _)| oid).collect();
        assert!(!oids.is_empty());
        for pair in oids.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn longest_prefix_match() {
        let mib = Mib::standard();
        let (matched, info) = mib
            .longest_prefix(&oid!(1, 3, 6, 1, 2, 1, 1, 5, 0))
            .unwrap();
        assert_eq!(matched, 8);
        assert_eq!(info.name, "sysName");
    }
}
