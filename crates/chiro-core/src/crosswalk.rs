//! Crosswalk providers
//!
//! Flat lookup tables the propagation engine expands targets and sources
//! through: family membership, gene to protein, enzyme-class closure,
//! enzyme to activity and role to bearer chemicals. Each is loaded once and
//! only read afterwards.

use crate::curie::{self, Curie};
use crate::ontology::OntologySource;
use crate::tsv;
use chiro_common::Result;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::path::Path;
use tracing::{debug, info, warn};

pub const HAS_ROLE: &str = "has_role";

// ============================================================================
// Family membership
// ============================================================================

/// A gene listed as a member of a protein family
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GeneRef {
    pub hgnc_id: String,
    pub symbol: String,
}

/// Protein family to member genes
#[derive(Debug, Default, Clone)]
pub struct FamilyMembership {
    members: HashMap<String, Vec<GeneRef>>,
}

impl FamilyMembership {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, family: &str, hgnc_id: &str, symbol: &str) -> &mut Self {
        self.members
            .entry(curie::normalize(family, "fplx"))
            .or_default()
            .push(GeneRef {
                hgnc_id: curie::normalize(hgnc_id, "hgnc"),
                symbol: symbol.to_string(),
            });
        self
    }

    /// Load `HGNC <symbol> isa FPLX <family>` rows from the family relations
    /// file, resolving symbols through the symbol map.
    pub fn from_famplex(relations: &Path, symbol_map: &Path) -> Result<Self> {
        let mut symbols = HashMap::new();
        let mut reader = tsv::delimited_reader(symbol_map, b',', true)?;
        for record in reader.records() {
            let record = record?;
            let symbol = tsv::field(&record, 0);
            let hgnc_id = tsv::field(&record, 1);
            if !symbol.is_empty() && !hgnc_id.is_empty() {
                symbols.insert(symbol.to_string(), curie::normalize(hgnc_id, "hgnc"));
            }
        }

        let mut membership = Self::new();
        let mut reader = tsv::delimited_reader(relations, b',', false)?;
        for record in reader.records() {
            let record = record?;
            let source_db = tsv::field(&record, 0);
            let symbol = tsv::field(&record, 1);
            let relation = tsv::field(&record, 2);
            let target_db = tsv::field(&record, 3);
            let family = tsv::field(&record, 4);
            if !source_db.eq_ignore_ascii_case("hgnc")
                || relation != "isa"
                || !target_db.eq_ignore_ascii_case("fplx")
            {
                continue;
            }
            match symbols.get(symbol) {
                Some(hgnc_id) => {
                    membership.insert(family, hgnc_id, symbol);
                },
                None => warn!(symbol, family, "Could not resolve gene symbol for family member"),
            }
        }

        info!(families = membership.members.len(), "Loaded family membership");
        Ok(membership)
    }

    pub fn members(&self, family_id: &str) -> &[GeneRef] {
        self.members
            .get(&curie::normalize(family_id, "fplx"))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// ============================================================================
// Gene to protein
// ============================================================================

/// A protein identifier with its display name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProteinRef {
    pub uniprot_id: String,
    pub name: String,
}

/// Gene to protein identifiers, one gene possibly mapping to several proteins
#[derive(Debug, Default, Clone)]
pub struct GeneProteinMap {
    proteins: HashMap<String, Vec<String>>,
    names: HashMap<String, String>,
}

impl GeneProteinMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, hgnc_id: &str, uniprot_id: &str) -> &mut Self {
        self.proteins
            .entry(curie::normalize(hgnc_id, "hgnc"))
            .or_default()
            .push(curie::normalize(uniprot_id, "uniprot"));
        self
    }

    pub fn insert_name(&mut self, uniprot_id: &str, name: &str) -> &mut Self {
        self.names
            .insert(curie::normalize(uniprot_id, "uniprot"), name.to_string());
        self
    }

    /// Load `hgnc_id, uniprot_ids` rows (ids separated by `", "`) and, when
    /// present, a `uniprot_id, mnemonic` name table.
    pub fn load(mapping: &Path, names: Option<&Path>) -> Result<Self> {
        let mut map = Self::new();
        let mut reader = tsv::reader(mapping)?;
        for record in reader.records() {
            let record = record?;
            let hgnc_id = tsv::field(&record, 0);
            if hgnc_id.is_empty() {
                continue;
            }
            for uniprot_id in tsv::field(&record, 1)
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
            {
                map.insert(hgnc_id, uniprot_id);
            }
        }

        if let Some(names) = names.filter(|path| path.exists()) {
            let mut reader = tsv::reader(names)?;
            for record in reader.records() {
                let record = record?;
                let uniprot_id = tsv::field(&record, 0);
                let name = tsv::field(&record, 1);
                if !uniprot_id.is_empty() && !name.is_empty() {
                    map.insert_name(uniprot_id, name);
                }
            }
        }

        info!(genes = map.proteins.len(), names = map.names.len(), "Loaded gene to protein map");
        Ok(map)
    }

    /// Every protein of a gene, named by mnemonic or falling back to the id
    pub fn proteins(&self, hgnc_id: &str) -> Vec<ProteinRef> {
        let key = curie::normalize(hgnc_id, "hgnc");
        let Some(ids) = self.proteins.get(&key) else {
            debug!(hgnc_id = %key, "No proteins for gene");
            return Vec::new();
        };
        ids.iter()
            .map(|id| ProteinRef {
                uniprot_id: id.clone(),
                name: self.names.get(id).cloned().unwrap_or_else(|| id.clone()),
            })
            .collect()
    }
}

// ============================================================================
// Enzyme classes
// ============================================================================

/// One entry of an enzyme class closure: a narrower class or a member protein
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClosureEntry {
    pub curie: Curie,
    pub name: String,
}

/// Enzyme class hierarchy edges with member proteins
#[derive(Debug, Default, Clone)]
pub struct EnzymeHierarchy {
    names: HashMap<Curie, String>,
    // parent -> children and members
    below: HashMap<Curie, Vec<Curie>>,
}

impl EnzymeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `child` below `parent`. Enzyme classes are named by their code.
    pub fn insert(&mut self, child: Curie, child_name: &str, parent: Curie) -> &mut Self {
        let name = if child_name.is_empty() {
            child.local_id().to_string()
        } else {
            child_name.to_string()
        };
        self.names.entry(child.clone()).or_insert(name);
        self.names
            .entry(parent.clone())
            .or_insert_with(|| parent.local_id().to_string());
        self.below.entry(parent).or_default().push(child);
        self
    }

    /// Load `child, child_name, relation, parent` rows. `is_a` and
    /// `has_member` rows both place the child below the parent.
    pub fn load(path: &Path) -> Result<Self> {
        let mut hierarchy = Self::new();
        let mut reader = tsv::reader(path)?;
        for record in reader.records() {
            let record = record?;
            let relation = tsv::field(&record, 2);
            if relation != "is_a" && relation != "has_member" {
                warn!(line = tsv::line_of(&record), relation, "Skipping enzyme relation");
                continue;
            }
            let child = Curie::parse(tsv::field(&record, 0));
            let parent = Curie::parse(tsv::field(&record, 3));
            match (child, parent) {
                (Ok(child), Ok(parent)) => {
                    hierarchy.insert(child, tsv::field(&record, 1), parent);
                },
                (Err(e), _) | (_, Err(e)) => {
                    warn!(line = tsv::line_of(&record), error = %e, "Skipping enzyme relation")
                },
            }
        }
        Ok(hierarchy)
    }

    /// Everything below each enzyme class, excluding the class itself
    pub fn closure(&self, enzyme_namespace: &str) -> EnzymeClosure {
        let mut closures = HashMap::new();
        for node in self.names.keys().filter(|c| c.in_namespace(enzyme_namespace)) {
            let mut seen = BTreeSet::new();
            let mut queue = VecDeque::from([node]);
            while let Some(current) = queue.pop_front() {
                for next in self.below.get(current).into_iter().flatten() {
                    if next != node && seen.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
            if seen.is_empty() {
                continue;
            }
            let entries = seen
                .into_iter()
                .map(|curie| ClosureEntry {
                    curie: curie.clone(),
                    name: self
                        .names
                        .get(curie)
                        .cloned()
                        .unwrap_or_else(|| curie.local_id().to_string()),
                })
                .collect();
            closures.insert(node.local_id().to_string(), entries);
        }
        info!(classes = closures.len(), "Computed enzyme class closure");
        EnzymeClosure { closures }
    }
}

/// Enzyme code to its closure entries, sorted
#[derive(Debug, Default, Clone)]
pub struct EnzymeClosure {
    closures: HashMap<String, Vec<ClosureEntry>>,
}

impl EnzymeClosure {
    /// `None` when the code has no known narrower classes or members
    pub fn get(&self, ec_code: &str) -> Option<&[ClosureEntry]> {
        self.closures
            .get(&curie::normalize(ec_code, "eccode"))
            .map(Vec::as_slice)
    }
}

/// Enzyme code to GO molecular function terms
#[derive(Debug, Default, Clone)]
pub struct EnzymeActivities {
    activities: HashMap<String, Vec<(Curie, String)>>,
}

impl EnzymeActivities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ec_code: &str, go_id: &str, go_name: &str) -> &mut Self {
        self.activities
            .entry(curie::normalize(ec_code, "eccode"))
            .or_default()
            .push((Curie::new("go", go_id), go_name.to_string()));
        self
    }

    /// Load `ec_code, go_id, go_name` rows
    pub fn load(path: &Path) -> Result<Self> {
        let mut activities = Self::new();
        let mut reader = tsv::reader(path)?;
        for record in reader.records() {
            let record = record?;
            let ec_code = tsv::field(&record, 0);
            let go_id = tsv::field(&record, 1);
            if ec_code.is_empty() || go_id.is_empty() {
                warn!(line = tsv::line_of(&record), "Skipping incomplete activity row");
                continue;
            }
            activities.insert(ec_code, go_id, tsv::field(&record, 2));
        }
        info!(codes = activities.activities.len(), "Loaded enzyme activities");
        Ok(activities)
    }

    pub fn get(&self, ec_code: &str) -> &[(Curie, String)] {
        self.activities
            .get(&curie::normalize(ec_code, "eccode"))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// ============================================================================
// Role bearers
// ============================================================================

/// Role to the chemicals that bear it
#[derive(Debug, Default, Clone)]
pub struct RoleBearers {
    bearers: BTreeMap<Curie, BTreeSet<Curie>>,
}

impl RoleBearers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, role: Curie, chemical: Curie) -> &mut Self {
        self.bearers.entry(role).or_default().insert(chemical);
        self
    }

    /// Invert every `chemical has_role role` relationship of the ontology
    pub fn from_ontology(ontology: &dyn OntologySource) -> Self {
        let mut bearers = Self::new();
        for (chemical, role) in ontology.pairs(HAS_ROLE) {
            bearers.insert(role, chemical);
        }
        info!(roles = bearers.bearers.len(), "Indexed role bearers");
        bearers
    }

    pub fn get(&self, role: &Curie) -> Option<&BTreeSet<Curie>> {
        self.bearers.get(role)
    }
}
