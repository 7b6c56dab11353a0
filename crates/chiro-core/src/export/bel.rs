//! Expression-graph export as node-link JSON
//!
//! Chemicals are abundances, targets take the BEL function matching their
//! target type, and each relation becomes one directed edge whose predicate
//! follows the modulation's direction.

use crate::curie::Curie;
use crate::model::{Direction, Relation, TargetType};
use chiro_common::{ChiroError, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

pub const GRAPH_NAME: &str = "Chemical Roles";

/// BEL term function of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BelFunction {
    Abundance,
    BiologicalProcess,
    ComplexAbundance,
    Pathology,
    Population,
    Protein,
}

impl BelFunction {
    /// Molecular functions have no BEL node and yield `None`
    pub fn for_target(target_type: TargetType) -> Option<Self> {
        match target_type {
            TargetType::BiologicalProcess | TargetType::Pathway => Some(BelFunction::BiologicalProcess),
            TargetType::Chemical => Some(BelFunction::Abundance),
            TargetType::Organism => Some(BelFunction::Population),
            TargetType::Phenotype => Some(BelFunction::Pathology),
            TargetType::Protein | TargetType::ProteinFamily | TargetType::EnzymeClass => {
                Some(BelFunction::Protein)
            },
            TargetType::ProteinComplex => Some(BelFunction::ComplexAbundance),
            TargetType::MolecularFunction => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BelRelation {
    Increases,
    Decreases,
    Regulates,
}

impl From<Direction> for BelRelation {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Activating => BelRelation::Increases,
            Direction::Inhibiting => BelRelation::Decreases,
            Direction::Neutral => BelRelation::Regulates,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BelNode {
    pub id: usize,
    pub function: BelFunction,
    pub namespace: String,
    pub identifier: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BelLink {
    pub source: usize,
    pub target: usize,
    /// Distinguishes parallel edges between the same pair
    pub key: usize,
    pub relation: BelRelation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphAttributes {
    pub name: String,
}

/// Directed multigraph in node-link layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BelGraph {
    pub directed: bool,
    pub multigraph: bool,
    pub graph: GraphAttributes,
    pub nodes: Vec<BelNode>,
    pub links: Vec<BelLink>,
}

#[derive(Default)]
struct GraphBuilder {
    nodes: Vec<BelNode>,
    index: HashMap<(BelFunction, Curie), usize>,
    parallel: HashMap<(usize, usize), usize>,
    links: Vec<BelLink>,
}

impl GraphBuilder {
    fn node(&mut self, function: BelFunction, curie: &Curie, name: &str) -> usize {
        if let Some(&id) = self.index.get(&(function, curie.clone())) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(BelNode {
            id,
            function,
            namespace: curie.namespace().to_string(),
            identifier: curie.local_id().to_string(),
            name: name.to_string(),
        });
        self.index.insert((function, curie.clone()), id);
        id
    }

    fn link(&mut self, source: usize, target: usize, relation: BelRelation) {
        let key = self.parallel.entry((source, target)).or_default();
        self.links.push(BelLink {
            source,
            target,
            key: *key,
            relation,
        });
        *key += 1;
    }
}

impl BelGraph {
    pub fn from_relations(relations: &[Relation]) -> Self {
        let unique: BTreeSet<&Relation> = relations.iter().collect();
        let mut builder = GraphBuilder::default();
        let mut skipped: BTreeMap<TargetType, usize> = BTreeMap::new();

        for relation in unique {
            let Some(function) = BelFunction::for_target(relation.target_type) else {
                *skipped.entry(relation.target_type).or_default() += 1;
                continue;
            };
            let source = builder.node(BelFunction::Abundance, &relation.source, &relation.source_name);
            let target = builder.node(function, &relation.target, &relation.target_name);
            builder.link(source, target, relation.modulation.direction().into());
        }

        for (target_type, count) in skipped {
            let error = ChiroError::unknown_vocabulary("bel function", target_type.as_str());
            warn!(%error, dropped = count, "No BEL function for target type, dropping relations");
        }

        BelGraph {
            directed: true,
            multigraph: true,
            graph: GraphAttributes {
                name: GRAPH_NAME.to_string(),
            },
            nodes: builder.nodes,
            links: builder.links,
        }
    }
}

/// Write the graph as JSON, gzip-compressed when `path` ends in `.gz`
pub fn write_bel(path: &Path, relations: &[Relation]) -> Result<BelGraph> {
    let graph = BelGraph::from_relations(relations);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = BufWriter::new(File::create(path)?);
    if path.extension().is_some_and(|ext| ext == "gz") {
        let mut encoder = GzEncoder::new(file, Compression::default());
        serde_json::to_writer(&mut encoder, &graph)?;
        encoder.finish()?.flush()?;
    } else {
        let mut file = file;
        serde_json::to_writer(&mut file, &graph)?;
        file.flush()?;
    }
    info!(
        nodes = graph.nodes.len(),
        edges = graph.links.len(),
        path = %path.display(),
        "Wrote BEL graph"
    );
    Ok(graph)
}
