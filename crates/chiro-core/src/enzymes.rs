//! Enzyme modulator proposals
//!
//! ChEBI names enzyme inhibitor roles after the enzyme code they act on
//! ("EC 3.4.21.* (serine endopeptidase) inhibitor"). Those codes are read
//! straight from the name instead of going through the grounding service.

use crate::context::InferenceContext;
use crate::curie::Curie;
use crate::model::{ModulationKind, Relation, TargetType};
use crate::store::XREFS_COLUMNS;
use chiro_common::Result;
use std::io::Write;
use tracing::{info, warn};

const EC_PREFIX: &str = "EC ";

/// Names ChEBI spells in a way the general rule cannot parse
const NAME_OVERRIDES: &[(&str, &[&str])] = &[
    (
        "EC 1.22* (oxidoreductase acting on halogen in donors) inhibitor",
        &["1.22.-.-"],
    ),
    (
        "EC 1.1.1.34/EC 1.1.1.88 (hydroxymethylglutaryl-CoA reductase) inhibitor",
        &["1.1.1.34", "1.1.1.88"],
    ),
    ("EC 1.11.1.11 (L-ascorbate peroxidase) inhibitors", &["1.11.1.11"]),
    ("EC 3.5.5.1 (nitrilase) inhhibitor", &["3.5.5.1"]),
];

/// Modulation and enzyme codes named by a role, or `None` when the name is
/// not an enzyme role or its suffix is not understood.
pub fn parse_ec_codes(name: &str) -> Option<(ModulationKind, Vec<String>)> {
    if let Some((_, codes)) = NAME_OVERRIDES.iter().find(|(known, _)| *known == name) {
        let codes = codes.iter().map(|code| code.to_string()).collect();
        return Some((ModulationKind::Inhibitor, codes));
    }

    let rest = name.strip_prefix(EC_PREFIX)?;
    let modulation = if name.ends_with("inhibitor") {
        ModulationKind::Inhibitor
    } else if name.ends_with("activator") {
        ModulationKind::Activator
    } else {
        warn!(name, "Unhandled enzyme role suffix");
        return None;
    };

    let token = rest.split_whitespace().next()?;
    let mut code = token.replace('*', "-").trim_end_matches('.').to_string();
    for _ in code.matches('.').count()..3 {
        code.push_str(".-");
    }
    Some((modulation, vec![code]))
}

/// Propose enzyme-class and activity relations for every enzyme role
pub fn propose_enzyme_modulators(ctx: &InferenceContext) -> Vec<Relation> {
    let ns = &ctx.namespaces;
    let mut relations = Vec::new();

    for role in ctx.ontology.identifiers(&ns.chemical) {
        let Some(name) = ctx.ontology.name(&role) else {
            continue;
        };
        let Some((modulation, codes)) = parse_ec_codes(name) else {
            continue;
        };
        for code in codes {
            let enzyme = Curie::new(&ns.enzyme_class, &code);
            let enzyme_name = ctx.ontology.name(&enzyme).unwrap_or(&code).to_string();
            relations.push(Relation::new(
                role.clone(),
                name,
                modulation,
                TargetType::EnzymeClass,
                enzyme,
                enzyme_name,
            ));
            for (activity, activity_name) in ctx.activities.get(&code) {
                relations.push(Relation::new(
                    role.clone(),
                    name,
                    modulation,
                    TargetType::MolecularFunction,
                    activity.clone(),
                    activity_name.clone(),
                ));
            }
        }
    }

    relations.sort();
    info!(relations = relations.len(), "Proposed enzyme modulators");
    relations
}

/// Write proposals as a curation sheet with the relation table header
pub fn write_proposals<W: Write>(writer: W, relations: &[Relation]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);
    writer.write_record(XREFS_COLUMNS)?;
    for relation in relations {
        writer.write_record(relation.columns())?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::crosswalk::{EnzymeActivities, EnzymeClosure, FamilyMembership, GeneProteinMap};
    use crate::ontology::InMemoryOntology;

    #[test]
    fn test_parse_pads_and_replaces_wildcards() {
        let (modulation, codes) =
            parse_ec_codes("EC 3.4.21.* (serine endopeptidase) inhibitor").unwrap();
        assert_eq!(modulation, ModulationKind::Inhibitor);
        assert_eq!(codes, vec!["3.4.21.-"]);

        let (_, codes) = parse_ec_codes("EC 2.7.* (P-containing group transferase) inhibitor").unwrap();
        assert_eq!(codes, vec!["2.7.-.-"]);

        let (_, codes) = parse_ec_codes("EC 3.1.1.7 (acetylcholinesterase) inhibitor").unwrap();
        assert_eq!(codes, vec!["3.1.1.7"]);

        let (modulation, codes) = parse_ec_codes("EC 2.7.1.33 (pantothenate kinase) activator").unwrap();
        assert_eq!(modulation, ModulationKind::Activator);
        assert_eq!(codes, vec!["2.7.1.33"]);
    }

    #[test]
    fn test_parse_trailing_dot() {
        let (_, codes) = parse_ec_codes("EC 4. (lyase) inhibitor").unwrap();
        assert_eq!(codes, vec!["4.-.-.-"]);
    }

    #[test]
    fn test_parse_overrides() {
        let (_, codes) = parse_ec_codes(
            "EC 1.1.1.34/EC 1.1.1.88 (hydroxymethylglutaryl-CoA reductase) inhibitor",
        )
        .unwrap();
        assert_eq!(codes, vec!["1.1.1.34", "1.1.1.88"]);
        let (_, codes) = parse_ec_codes("EC 3.5.5.1 (nitrilase) inhhibitor").unwrap();
        assert_eq!(codes, vec!["3.5.5.1"]);
        let (_, codes) =
            parse_ec_codes("EC 1.22* (oxidoreductase acting on halogen in donors) inhibitor")
                .unwrap();
        assert_eq!(codes, vec!["1.22.-.-"]);
    }

    #[test]
    fn test_parse_rejects_other_names() {
        assert!(parse_ec_codes("kinase inhibitor").is_none());
        assert!(parse_ec_codes("EC 1.1.1.1 (alcohol dehydrogenase) modulator").is_none());
    }

    #[test]
    fn test_propose_adds_activities() {
        let mut ontology = InMemoryOntology::new();
        ontology
            .add_term(Curie::new("chebi", "1"), "EC 1.1.1.1 (alcohol dehydrogenase) inhibitor")
            .add_term(Curie::new("chebi", "2"), "antibiotic")
            .add_term(Curie::new("eccode", "1.1.1.1"), "alcohol dehydrogenase");
        let mut activities = EnzymeActivities::new();
        activities.insert("1.1.1.1", "0004022", "alcohol dehydrogenase (NAD+) activity");
        let ctx = InferenceContext::new(
            Box::new(ontology),
            FamilyMembership::new(),
            GeneProteinMap::new(),
            EnzymeClosure::default(),
            activities,
        )
        .unwrap();

        let relations = propose_enzyme_modulators(&ctx);
        assert_eq!(relations.len(), 2);
        assert_eq!(relations[0].target_type, TargetType::EnzymeClass);
        assert_eq!(relations[0].target_name, "alcohol dehydrogenase");
        assert_eq!(relations[1].target, Curie::new("go", "0004022"));
        assert!(relations.iter().all(|r| r.source == Curie::new("chebi", "1")));

        let mut sheet = Vec::new();
        write_proposals(&mut sheet, &relations).unwrap();
        let sheet = String::from_utf8(sheet).unwrap();
        assert_eq!(sheet.lines().count(), 3);
        assert!(sheet.contains("\tenzyme_class\teccode\t1.1.1.1\talcohol dehydrogenase"));
    }
}
