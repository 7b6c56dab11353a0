//! Relation propagation engine
//!
//! Curated relations are stated between a *role* (e.g. "EGFR inhibitor") and a
//! target. Inference runs in two stages:
//!
//! 1. Target expansion: genes fan out to their proteins, families to member
//!    genes and their proteins, enzyme classes are replaced by their closure
//!    and GO activities.
//! 2. Role expansion: every role is replaced by the chemicals that bear it
//!    (optionally also bearers of its sub-roles).
//!
//! The result is sorted by the full column tuple and deduplicated.

use crate::context::InferenceContext;
use crate::curie::Curie;
use crate::model::{deduplicate, ModulationKind, Relation, TargetType};
use crate::progress;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, info, warn};

/// Inference switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceOptions {
    /// When false the curated set is returned as is
    pub use_inferred: bool,
    /// Also propagate to bearers of every sub-role
    pub use_sub_roles: bool,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            use_inferred: true,
            use_sub_roles: false,
        }
    }
}

/// The target half of a relation, accumulated per role during stage one
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TargetEntry {
    pub modulation: ModulationKind,
    pub target_type: TargetType,
    pub target: Curie,
    pub target_name: String,
}

impl TargetEntry {
    fn of(relation: &Relation) -> Self {
        Self {
            modulation: relation.modulation,
            target_type: relation.target_type,
            target: relation.target.clone(),
            target_name: relation.target_name.clone(),
        }
    }
}

/// Output of target expansion
#[derive(Debug, Default)]
pub struct TargetExpansion {
    /// Role to every (curated or derived) target entry
    pub by_role: BTreeMap<Curie, Vec<TargetEntry>>,
    /// Curated rows outside the chemical namespace, kept unchanged
    pub passthrough: Vec<Relation>,
}

pub struct PropagationEngine<'a> {
    ctx: &'a InferenceContext,
    options: InferenceOptions,
}

impl<'a> PropagationEngine<'a> {
    pub fn new(ctx: &'a InferenceContext, options: InferenceOptions) -> Self {
        Self { ctx, options }
    }

    /// Curated plus inferred relations, sorted and deduplicated
    pub fn run(&self, curated: &[Relation]) -> Vec<Relation> {
        if !self.options.use_inferred {
            return curated.to_vec();
        }

        let expansion = self.expand_targets(curated);
        let mut relations = expansion.passthrough;
        relations.extend(self.expand_roles(&expansion.by_role));

        let relations = deduplicate(relations);
        info!(
            curated = curated.len(),
            total = relations.len(),
            "Propagated relations"
        );
        relations
    }

    // ========================================================================
    // Stage one: targets
    // ========================================================================

    pub fn expand_targets(&self, curated: &[Relation]) -> TargetExpansion {
        let ns = &self.ctx.namespaces;
        let mut expansion = TargetExpansion::default();
        let mut unmapped_namespaces = HashSet::new();

        let pb = progress::create_progress_bar(
            curated.len() as u64,
            "Inferring over target hierarchies",
        );
        for relation in curated {
            pb.inc(1);
            if !relation.source.in_namespace(&ns.chemical) {
                expansion.passthrough.push(relation.clone());
                continue;
            }

            let entries = expansion.by_role.entry(relation.source.clone()).or_default();
            let target = &relation.target;

            if target.in_namespace(&ns.gene) {
                entries.push(TargetEntry::of(relation));
                self.push_proteins(entries, relation.modulation, target.local_id());
            } else if target.in_namespace(&ns.protein_family) {
                entries.push(TargetEntry::of(relation));
                for gene in self.ctx.families.members(target.local_id()) {
                    entries.push(TargetEntry {
                        modulation: relation.modulation,
                        target_type: TargetType::Protein,
                        target: Curie::new(&ns.gene, &gene.hgnc_id),
                        target_name: gene.symbol.clone(),
                    });
                    self.push_proteins(entries, relation.modulation, &gene.hgnc_id);
                }
            } else if target.in_namespace(&ns.enzyme_class) {
                self.push_enzyme_closure(entries, relation, &mut unmapped_namespaces);
            } else {
                entries.push(TargetEntry::of(relation));
            }
        }
        pb.finish_and_clear();

        debug!(
            roles = expansion.by_role.len(),
            passthrough = expansion.passthrough.len(),
            "Expanded targets"
        );
        expansion
    }

    fn push_proteins(
        &self,
        entries: &mut Vec<TargetEntry>,
        modulation: ModulationKind,
        hgnc_id: &str,
    ) {
        for protein in self.ctx.genes.proteins(hgnc_id) {
            entries.push(TargetEntry {
                modulation,
                target_type: TargetType::Protein,
                target: Curie::new(&self.ctx.namespaces.protein, &protein.uniprot_id),
                target_name: protein.name,
            });
        }
    }

    /// Replace an enzyme class with its closure and activities. A class with
    /// no known closure is kept as curated.
    fn push_enzyme_closure(
        &self,
        entries: &mut Vec<TargetEntry>,
        relation: &Relation,
        unmapped_namespaces: &mut HashSet<String>,
    ) {
        let ec_code = relation.target.local_id();
        let Some(closure) = self.ctx.enzymes.get(ec_code) else {
            info!(
                enzyme_class = %relation.target,
                "Could not find children of enzyme class, keeping it"
            );
            entries.push(TargetEntry::of(relation));
            return;
        };

        for entry in closure {
            let namespace = entry.curie.namespace();
            let Some(target_type) = self.ctx.registry.target_type_for(namespace) else {
                if unmapped_namespaces.insert(namespace.to_string()) {
                    warn!(namespace, "No target type for enzyme closure namespace, skipping");
                }
                continue;
            };
            entries.push(TargetEntry {
                modulation: relation.modulation,
                target_type,
                target: entry.curie.clone(),
                target_name: entry.name.clone(),
            });
        }

        for (activity, name) in self.ctx.activities.get(ec_code) {
            entries.push(TargetEntry {
                modulation: relation.modulation,
                target_type: TargetType::MolecularFunction,
                target: activity.clone(),
                target_name: name.clone(),
            });
        }
    }

    // ========================================================================
    // Stage two: roles
    // ========================================================================

    /// Chemicals bearing `role`, or any of its sub-roles when enabled
    pub fn bearers(&self, role: &Curie) -> BTreeSet<Curie> {
        let mut roles = BTreeSet::from([role.clone()]);
        if self.options.use_sub_roles && role.in_namespace(&self.ctx.namespaces.chemical) {
            roles.extend(self.ctx.ontology.descendants(role));
        }
        roles
            .iter()
            .filter_map(|r| self.ctx.role_bearers.get(r))
            .flatten()
            .cloned()
            .collect()
    }

    pub fn expand_roles(&self, by_role: &BTreeMap<Curie, Vec<TargetEntry>>) -> Vec<Relation> {
        let mut relations = Vec::new();
        let mut unnamed = HashSet::new();

        let pb = progress::create_progress_bar(
            by_role.len() as u64,
            "Inferring over role hierarchies",
        );
        for (role, entries) in by_role {
            pb.inc(1);
            let bearers = self.bearers(role);
            if bearers.is_empty() {
                debug!(role = %role, "No inference for role");
                continue;
            }

            for bearer in &bearers {
                let Some(name) = self.ctx.ontology.name(bearer) else {
                    if unnamed.insert(bearer.clone()) {
                        warn!(chemical = %bearer, role = %role, "Could not look up chemical name, skipping");
                    }
                    continue;
                };
                for entry in entries {
                    relations.push(Relation::new(
                        bearer.clone(),
                        name,
                        entry.modulation,
                        entry.target_type,
                        entry.target.clone(),
                        entry.target_name.clone(),
                    ));
                }
            }
        }
        pb.finish_and_clear();
        relations
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::crosswalk::{
        EnzymeActivities, EnzymeHierarchy, FamilyMembership, GeneProteinMap, HAS_ROLE,
    };
    use crate::ontology::InMemoryOntology;

    fn chebi(id: &str) -> Curie {
        Curie::new("chebi", id)
    }

    fn curated(
        source: &str,
        modulation: ModulationKind,
        target_type: TargetType,
        target: Curie,
        name: &str,
    ) -> Relation {
        Relation::new(chebi(source), "role", modulation, target_type, target, name)
    }

    /// Role 100 is borne by 200 and 201; role 101 is a sub-role of 100 borne by 202.
    fn context() -> InferenceContext {
        let mut ontology = InMemoryOntology::new();
        ontology
            .add_term(chebi("100"), "demo inhibitor")
            .add_term(chebi("101"), "narrow demo inhibitor")
            .add_term(chebi("200"), "Demo Chemical")
            .add_term(chebi("201"), "Other Chemical")
            .add_term(chebi("202"), "Narrow Chemical")
            .add_is_a(chebi("101"), chebi("100"))
            .add_relationship(chebi("200"), HAS_ROLE, chebi("100"))
            .add_relationship(chebi("201"), HAS_ROLE, chebi("100"))
            .add_relationship(chebi("202"), HAS_ROLE, chebi("101"))
            .add_relationship(chebi("203"), HAS_ROLE, chebi("102"));

        let mut families = FamilyMembership::new();
        families.insert("AKT", "391", "AKT1");

        let mut genes = GeneProteinMap::new();
        genes.insert("5", "P1").insert("5", "P2").insert("391", "P31749");

        let mut hierarchy = EnzymeHierarchy::new();
        hierarchy
            .insert(Curie::new("eccode", "1.1.1.2"), "", Curie::new("eccode", "1.1.1.1"))
            .insert(Curie::new("uniprot", "Q1"), "Q1_HUMAN", Curie::new("eccode", "1.1.1.1"))
            .insert(Curie::new("bogus", "X"), "x", Curie::new("eccode", "1.1.1.1"));

        let mut activities = EnzymeActivities::new();
        activities.insert("1.1.1.1", "0004022", "alcohol dehydrogenase (NAD+) activity");

        InferenceContext::new(
            Box::new(ontology),
            families,
            genes,
            hierarchy.closure("eccode"),
            activities,
        )
        .unwrap()
    }

    #[test]
    fn test_gene_fans_out_to_each_protein() {
        let ctx = context();
        let engine = PropagationEngine::new(&ctx, InferenceOptions::default());
        let expansion = engine.expand_targets(&[curated(
            "100",
            ModulationKind::Inhibitor,
            TargetType::Protein,
            Curie::new("hgnc", "HGNC:5"),
            "G5",
        )]);
        let entries = &expansion.by_role[&chebi("100")];
        let targets: Vec<_> = entries.iter().map(|e| e.target.to_string()).collect();
        assert_eq!(targets, vec!["hgnc:5", "uniprot:P1", "uniprot:P2"]);
    }

    #[test]
    fn test_family_chains_through_genes() {
        let ctx = context();
        let engine = PropagationEngine::new(&ctx, InferenceOptions::default());
        let expansion = engine.expand_targets(&[curated(
            "100",
            ModulationKind::Inhibitor,
            TargetType::ProteinFamily,
            Curie::new("fplx", "AKT"),
            "AKT",
        )]);
        let entries = &expansion.by_role[&chebi("100")];
        let targets: Vec<_> = entries.iter().map(|e| e.target.to_string()).collect();
        assert_eq!(targets, vec!["fplx:AKT", "hgnc:391", "uniprot:P31749"]);
        assert_eq!(entries[0].target_type, TargetType::ProteinFamily);
        assert_eq!(entries[1].target_type, TargetType::Protein);
    }

    #[test]
    fn test_enzyme_class_is_replaced() {
        let ctx = context();
        let engine = PropagationEngine::new(&ctx, InferenceOptions::default());
        let expansion = engine.expand_targets(&[curated(
            "100",
            ModulationKind::Inhibitor,
            TargetType::EnzymeClass,
            Curie::new("eccode", "1.1.1.1"),
            "alcohol dehydrogenase",
        )]);
        let entries = &expansion.by_role[&chebi("100")];
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.target != Curie::new("eccode", "1.1.1.1")));
        assert!(entries.iter().any(|e| e.target == Curie::new("eccode", "1.1.1.2")
            && e.target_type == TargetType::EnzymeClass));
        assert!(entries.iter().any(|e| e.target == Curie::new("uniprot", "Q1")
            && e.target_type == TargetType::Protein));
        assert!(entries.iter().any(|e| e.target == Curie::new("go", "0004022")
            && e.target_type == TargetType::MolecularFunction));
    }

    #[test]
    fn test_enzyme_closure_miss_keeps_relation() {
        let ctx = context();
        let engine = PropagationEngine::new(&ctx, InferenceOptions::default());
        let expansion = engine.expand_targets(&[curated(
            "100",
            ModulationKind::Inhibitor,
            TargetType::EnzymeClass,
            Curie::new("eccode", "9.9.9.9"),
            "unknown",
        )]);
        let entries = &expansion.by_role[&chebi("100")];
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].target, Curie::new("eccode", "9.9.9.9"));
    }

    #[test]
    fn test_non_chemical_sources_pass_through() {
        let ctx = context();
        let engine = PropagationEngine::new(&ctx, InferenceOptions::default());
        let mesh = Relation::new(
            Curie::new("mesh", "D000001"),
            "Zinc agents",
            ModulationKind::Modulator,
            TargetType::Protein,
            Curie::new("hgnc", "5"),
            "G5",
        );
        let output = engine.run(&[mesh.clone()]);
        assert_eq!(output, vec![mesh]);
    }

    #[test]
    fn test_role_bearer_fan_out_drops_role_rows() {
        let ctx = context();
        let engine = PropagationEngine::new(&ctx, InferenceOptions::default());
        let output = engine.run(&[curated(
            "100",
            ModulationKind::Agonist,
            TargetType::Protein,
            Curie::new("uniprot", "P9"),
            "P9",
        )]);
        let sources: Vec<_> = output.iter().map(|r| r.source.clone()).collect();
        assert_eq!(sources, vec![chebi("200"), chebi("201")]);
        assert_eq!(output[0].source_name, "Demo Chemical");
        assert!(output.iter().all(|r| r.target == Curie::new("uniprot", "P9")));
    }

    #[test]
    fn test_sub_roles_widen_bearers() {
        let ctx = context();
        let narrow = PropagationEngine::new(&ctx, InferenceOptions::default());
        assert_eq!(narrow.bearers(&chebi("100")).len(), 2);

        let wide = PropagationEngine::new(
            &ctx,
            InferenceOptions {
                use_sub_roles: true,
                ..InferenceOptions::default()
            },
        );
        assert_eq!(
            wide.bearers(&chebi("100")),
            BTreeSet::from([chebi("200"), chebi("201"), chebi("202")])
        );
    }

    #[test]
    fn test_unnamed_bearer_is_skipped() {
        let ctx = context();
        let engine = PropagationEngine::new(&ctx, InferenceOptions::default());
        let output = engine.run(&[curated(
            "102",
            ModulationKind::Inhibitor,
            TargetType::Protein,
            Curie::new("uniprot", "P9"),
            "P9",
        )]);
        assert!(output.is_empty());
    }

    #[test]
    fn test_role_without_bearers_contributes_nothing() {
        let ctx = context();
        let engine = PropagationEngine::new(&ctx, InferenceOptions::default());
        let output = engine.run(&[curated(
            "999",
            ModulationKind::Inhibitor,
            TargetType::Protein,
            Curie::new("uniprot", "P9"),
            "P9",
        )]);
        assert!(output.is_empty());
    }

    #[test]
    fn test_use_inferred_false_returns_curated() {
        let ctx = context();
        let engine = PropagationEngine::new(
            &ctx,
            InferenceOptions {
                use_inferred: false,
                use_sub_roles: false,
            },
        );
        let rows = vec![curated(
            "100",
            ModulationKind::Inhibitor,
            TargetType::Protein,
            Curie::new("hgnc", "5"),
            "G5",
        )];
        assert_eq!(engine.run(&rows), rows);
    }

    #[test]
    fn test_output_has_no_duplicate_identities() {
        let ctx = context();
        let engine = PropagationEngine::new(&ctx, InferenceOptions::default());
        let rows = vec![
            curated("100", ModulationKind::Inhibitor, TargetType::Protein, Curie::new("hgnc", "5"), "G5"),
            curated("100", ModulationKind::Inhibitor, TargetType::Protein, Curie::new("hgnc", "5"), "G5 alias"),
            curated("101", ModulationKind::Inhibitor, TargetType::Protein, Curie::new("uniprot", "P1"), "P1"),
        ];
        let output = engine.run(&rows);
        let mut seen = HashSet::new();
        for relation in &output {
            assert!(seen.insert((relation.source.clone(), relation.modulation, relation.target.clone())));
        }
        let mut sorted = output.clone();
        sorted.sort();
        assert_eq!(output, sorted);
    }
}
