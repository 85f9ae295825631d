use std::hash::{Hash, Hasher};

/// Either the literal string type, or a forward reference to the type at a given
/// index in the type table, resolved once the table is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Str,
    Ref(usize),
}

/// One member of a class signature. Equality and hashing consider only the
/// attribute name: signature membership and subset tests are name-based, so a
/// forward reference can be replaced by a more specific one without the
/// attribute being treated as a different member.
#[derive(Debug, Clone)]
pub struct AttrSig {
    pub name: String,
    pub tag: TypeTag,
}

impl PartialEq for AttrSig {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for AttrSig {}

impl Hash for AttrSig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// The signature of a class: its members in first-seen order (literal attributes
/// before child-derived ones), which also fixes constructor argument order.
#[derive(Debug, Clone, Default)]
pub struct Signature(pub Vec<AttrSig>);

impl Signature {
    pub fn new() -> Self {
        Signature(Vec::new())
    }

    pub fn push(&mut self, attr: AttrSig) {
        self.0.push(attr);
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.0.iter().any(|a| a.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&AttrSig> {
        self.0.iter().find(|a| a.name == name)
    }

    /// True if every member of `self` (by name) is also a member of `other`.
    pub fn is_subset_of(&self, other: &Signature) -> bool {
        self.0.iter().all(|a| other.contains_name(&a.name))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.0.iter().map(|a| a.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttrSig> {
        self.0.iter()
    }
}

/// Find the index of a signature compatible with `sig` among `types`, inserting
/// or widening as needed. Mirrors the three-way rule: reuse a superset, widen a
/// subset in place, or append a brand new entry.
pub fn find_or_insert(types: &mut Vec<Signature>, sig: Signature) -> usize {
    for (i, existing) in types.iter_mut().enumerate() {
        if sig.is_subset_of(existing) {
            return i;
        }
        if existing.is_subset_of(&sig) {
            *existing = sig;
            return i;
        }
    }
    types.push(sig);
    types.len() - 1
}

/// Reduce `types` to its minimal antichain: drop signatures that are a strict
/// subset of another, collapse duplicates, and order the survivors
/// deterministically by their sorted attribute names.
pub fn minimize(types: Vec<Signature>) -> Vec<Signature> {
    let n = types.len();
    let mut keep = vec![true; n];
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let same = types[i].is_subset_of(&types[j]) && types[j].is_subset_of(&types[i]);
            if same {
                if j < i {
                    keep[i] = false;
                }
                continue;
            }
            if types[i].is_subset_of(&types[j]) {
                keep[i] = false;
            }
        }
    }
    let mut survivors: Vec<Signature> = types
        .into_iter()
        .zip(keep)
        .filter_map(|(sig, k)| k.then_some(sig))
        .collect();
    survivors.sort_by(|a, b| a.sorted_names().cmp(&b.sorted_names()));
    survivors
}
