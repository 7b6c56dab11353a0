//! Lint checks over curated store files on disk

mod common;

use chiro_core::lint::{check_identifiers, check_mappings, check_tabs, LintReport};
use chiro_core::registry::Registry;
use chiro_core::store::CuratedStore;

#[test]
fn test_clean_store_passes() {
    let (_dir, paths) = common::resources();
    let store = CuratedStore::new(&paths.xrefs);
    let registry = Registry::builtin().unwrap();

    let report = LintReport {
        tabs: check_tabs(store.path()).unwrap(),
        mappings: Vec::new(),
        identifiers: check_identifiers(&store.read_raw().unwrap(), &registry),
    };
    assert!(report.is_clean(), "{:?}", report.render());
}

#[test]
fn test_six_tab_line_fails() {
    let (_dir, paths) = common::resources();
    common::write_curated(
        &paths,
        "chebi\t100\tdemo inhibitor\tinhibitor\tprotein\thgnc\t1\tGENE1\n\
         chebi\t100\tdemo inhibitor\tinhibitor\tprotein\thgnc\t1\n",
    );
    let findings = check_tabs(&paths.xrefs).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].line, 3);
    assert_eq!(findings[0].tabs, 6);

    let report = LintReport {
        tabs: findings,
        ..LintReport::default()
    };
    assert!(!report.is_clean());
    assert_eq!(report.render()[0], "Document not clean.");
}

#[test]
fn test_mesh_only_role_is_flagged() {
    let (_dir, paths) = common::resources();
    let registry = Registry::builtin().unwrap();
    let relations = CuratedStore::new(&paths.xrefs).load(&registry).unwrap();

    let report = LintReport {
        mappings: check_mappings(&relations),
        ..LintReport::default()
    };
    assert_eq!(report.finding_count(), 1);
    let lines = report.render();
    assert_eq!(lines[0], "Some roles only mapped to MeSH");
    assert!(lines[1].starts_with("reactome:R-HSA-1 ! Demo pathway for role mesh:D000001"));
}

#[test]
fn test_sort_rewrites_store() {
    let (_dir, paths) = common::resources();
    common::write_curated(
        &paths,
        "chebi\t2\tzeta inhibitor\tinhibitor\tprotein\thgnc\t5\tG5\n\
         chebi\t1\talpha inhibitor\tinhibitor\tprotein\thgnc\t6\tG6\n\
         chebi\t2\tzeta inhibitor\tinhibitor\tprotein\thgnc\t5\tG5\n",
    );
    let registry = Registry::builtin().unwrap();
    let store = CuratedStore::new(&paths.xrefs);
    assert_eq!(store.sort_in_place(&registry).unwrap(), 2);

    let text = std::fs::read_to_string(&paths.xrefs).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("alpha inhibitor"));
    assert!(lines[2].contains("zeta inhibitor"));
}
