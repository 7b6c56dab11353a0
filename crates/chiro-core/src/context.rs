//! Inference context
//!
//! Every lookup table the selector, engine and exporters read, built once
//! per run and passed down by reference.

use crate::config::ResourcePaths;
use crate::crosswalk::{
    EnzymeActivities, EnzymeClosure, EnzymeHierarchy, FamilyMembership, GeneProteinMap,
    RoleBearers,
};
use crate::ontology::{InMemoryOntology, OntologySource};
use crate::progress;
use crate::registry::Registry;
use chiro_common::Result;
use tracing::info;

/// Namespaces the engine branches on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    pub chemical: String,
    pub gene: String,
    pub protein: String,
    pub protein_family: String,
    pub enzyme_class: String,
    pub molecular_function: String,
}

impl Default for Namespaces {
    fn default() -> Self {
        Self {
            chemical: "chebi".to_string(),
            gene: "hgnc".to_string(),
            protein: "uniprot".to_string(),
            protein_family: "fplx".to_string(),
            enzyme_class: "eccode".to_string(),
            molecular_function: "go".to_string(),
        }
    }
}

/// Read-only lookups shared by every stage of a run
pub struct InferenceContext {
    pub namespaces: Namespaces,
    pub registry: Registry,
    pub ontology: Box<dyn OntologySource>,
    pub families: FamilyMembership,
    pub genes: GeneProteinMap,
    pub enzymes: EnzymeClosure,
    pub activities: EnzymeActivities,
    pub role_bearers: RoleBearers,
}

impl InferenceContext {
    /// Assemble a context from already built providers
    pub fn new(
        ontology: Box<dyn OntologySource>,
        families: FamilyMembership,
        genes: GeneProteinMap,
        enzymes: EnzymeClosure,
        activities: EnzymeActivities,
    ) -> Result<Self> {
        let role_bearers = RoleBearers::from_ontology(ontology.as_ref());
        Ok(Self {
            namespaces: Namespaces::default(),
            registry: Registry::builtin()?,
            ontology,
            families,
            genes,
            enzymes,
            activities,
            role_bearers,
        })
    }

    /// Load every provider from the resource directory
    pub fn load(paths: &ResourcePaths) -> Result<Self> {
        info!("Loading inference context");
        let spinner = progress::create_spinner("Loading ontology");
        let ontology = InMemoryOntology::load(
            &paths.ontology_terms,
            &paths.ontology_is_a,
            &paths.ontology_relationships,
        )?;
        spinner.set_message("Loading crosswalks");
        let families =
            FamilyMembership::from_famplex(&paths.famplex_relations, &paths.famplex_symbols)?;
        let genes = GeneProteinMap::load(&paths.hgnc_uniprot, Some(&paths.uniprot_names))?;
        let enzymes = EnzymeHierarchy::load(&paths.enzyme_hierarchy)?.closure("eccode");
        let activities = EnzymeActivities::load(&paths.ec2go)?;
        spinner.finish_and_clear();
        Self::new(Box::new(ontology), families, genes, enzymes, activities)
    }
}
