//! Ontology source providers
//!
//! The engine only needs names, the is-a closure in both directions and typed
//! relationships between terms. [`OntologySource`] is that narrow interface;
//! [`InMemoryOntology`] implements it over maps built once from flat files.

use crate::curie::Curie;
use crate::tsv;
use chiro_common::{ChiroError, Result};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::path::Path;
use tracing::{debug, info, warn};

/// Read-only view of one or more ontologies
pub trait OntologySource: Send + Sync {
    /// Display name, `None` on a lookup miss
    fn name(&self, curie: &Curie) -> Option<&str>;

    /// Every term below `curie` in the is-a hierarchy, excluding `curie` itself
    fn descendants(&self, curie: &Curie) -> BTreeSet<Curie>;

    /// Every term above `curie` in the is-a hierarchy, excluding `curie` itself
    fn ancestors(&self, curie: &Curie) -> BTreeSet<Curie>;

    /// Objects of `subject predicate ?object`
    fn related(&self, subject: &Curie, predicate: &str) -> Vec<Curie>;

    /// Every (subject, object) pair joined by `predicate`
    fn pairs(&self, predicate: &str) -> Vec<(Curie, Curie)>;

    /// Every named term of a namespace, sorted
    fn identifiers(&self, namespace: &str) -> Vec<Curie>;
}

/// Map-backed ontology
#[derive(Debug, Default, Clone)]
pub struct InMemoryOntology {
    names: HashMap<Curie, String>,
    parents: HashMap<Curie, Vec<Curie>>,
    children: HashMap<Curie, Vec<Curie>>,
    relationships: HashMap<String, Vec<(Curie, Curie)>>,
}

impl InMemoryOntology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_term(&mut self, curie: Curie, name: impl Into<String>) -> &mut Self {
        self.names.insert(curie, name.into());
        self
    }

    pub fn add_is_a(&mut self, child: Curie, parent: Curie) -> &mut Self {
        self.parents.entry(child.clone()).or_default().push(parent.clone());
        self.children.entry(parent).or_default().push(child);
        self
    }

    pub fn add_relationship(
        &mut self,
        subject: Curie,
        predicate: impl Into<String>,
        object: Curie,
    ) -> &mut Self {
        self.relationships
            .entry(predicate.into())
            .or_default()
            .push((subject, object));
        self
    }

    /// Load terms, is-a edges and relationships from three TSV files.
    ///
    /// - terms: `curie, name`
    /// - is-a: `child, parent`
    /// - relationships: `subject, predicate, object`
    ///
    /// Rows with unparseable identifiers are logged and skipped.
    pub fn load(terms: &Path, is_a: &Path, relationships: &Path) -> Result<Self> {
        let mut ontology = Self::new();

        let mut reader = tsv::reader(terms)?;
        for record in reader.records() {
            let record = record?;
            match Curie::parse(tsv::field(&record, 0)) {
                Ok(curie) => {
                    ontology.add_term(curie, tsv::field(&record, 1));
                },
                Err(e) => warn!(line = tsv::line_of(&record), error = %e, "Skipping term"),
            }
        }

        let mut reader = tsv::reader(is_a)?;
        for record in reader.records() {
            let record = record?;
            match parse_pair(tsv::field(&record, 0), tsv::field(&record, 1)) {
                Ok((child, parent)) => {
                    ontology.add_is_a(child, parent);
                },
                Err(e) => warn!(line = tsv::line_of(&record), error = %e, "Skipping is_a edge"),
            }
        }

        let mut reader = tsv::reader(relationships)?;
        for record in reader.records() {
            let record = record?;
            let predicate = tsv::field(&record, 1);
            if predicate.is_empty() {
                warn!(line = tsv::line_of(&record), "Skipping relationship without predicate");
                continue;
            }
            match parse_pair(tsv::field(&record, 0), tsv::field(&record, 2)) {
                Ok((subject, object)) => {
                    ontology.add_relationship(subject, predicate, object);
                },
                Err(e) => {
                    warn!(line = tsv::line_of(&record), error = %e, "Skipping relationship")
                },
            }
        }

        info!(
            terms = ontology.names.len(),
            edges = ontology.parents.values().map(Vec::len).sum::<usize>(),
            predicates = ontology.relationships.len(),
            "Loaded ontology"
        );
        Ok(ontology)
    }

    fn closure(edges: &HashMap<Curie, Vec<Curie>>, start: &Curie) -> BTreeSet<Curie> {
        let mut seen = BTreeSet::new();
        let mut queue: VecDeque<&Curie> = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            for next in edges.get(node).into_iter().flatten() {
                if next != start && seen.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }
}

fn parse_pair(left: &str, right: &str) -> Result<(Curie, Curie)> {
    if left.is_empty() || right.is_empty() {
        return Err(ChiroError::Parse("missing identifier".to_string()));
    }
    Ok((Curie::parse(left)?, Curie::parse(right)?))
}

impl OntologySource for InMemoryOntology {
    fn name(&self, curie: &Curie) -> Option<&str> {
        let name = self.names.get(curie).map(String::as_str);
        if name.is_none() {
            debug!(curie = %curie, "Name lookup miss");
        }
        name
    }

    fn descendants(&self, curie: &Curie) -> BTreeSet<Curie> {
        Self::closure(&self.children, curie)
    }

    fn ancestors(&self, curie: &Curie) -> BTreeSet<Curie> {
        Self::closure(&self.parents, curie)
    }

    fn related(&self, subject: &Curie, predicate: &str) -> Vec<Curie> {
        self.relationships
            .get(predicate)
            .into_iter()
            .flatten()
            .filter(|(s, _)| s == subject)
            .map(|(_, o)| o.clone())
            .collect()
    }

    fn pairs(&self, predicate: &str) -> Vec<(Curie, Curie)> {
        self.relationships.get(predicate).cloned().unwrap_or_default()
    }

    fn identifiers(&self, namespace: &str) -> Vec<Curie> {
        let mut ids: Vec<_> = self
            .names
            .keys()
            .filter(|curie| curie.in_namespace(namespace))
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}
