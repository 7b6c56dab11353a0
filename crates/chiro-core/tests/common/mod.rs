//! Shared resource directory fixture

use chiro_core::config::ResourcePaths;
use chiro_core::store::XREFS_COLUMNS;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const TERMS: &str = "\
curie\tname
chebi:100\tdemo inhibitor
chebi:101\tdemo sub inhibitor
chebi:102\tEC 1.1.1.* (oxidoreductase) inhibitor
chebi:200\tDemo Chemical
chebi:201\tSub Chemical
chebi:202\tEnzyme Blocker
eccode:1.1.1.-\tActing on the CH-OH group
eccode:1.1.1.1\talcohol dehydrogenase
";

pub const IS_A: &str = "\
child\tparent
chebi:101\tchebi:100
";

pub const RELATIONSHIPS: &str = "\
subject\tpredicate\tobject
chebi:200\thas_role\tchebi:100
chebi:201\thas_role\tchebi:101
chebi:202\thas_role\tchebi:102
";

pub const CURATED: &str = "\
chebi\t100\tdemo inhibitor\tinhibitor\tprotein\thgnc\t1\tGENE1
chebi\t101\tdemo sub inhibitor\tinhibitor\tprotein family\tfplx\tFAM1\tFAM1
chebi\t102\tEC 1.1.1.* (oxidoreductase) inhibitor\tinhibitor\tenzyme class\teccode\t1.1.1.-\tActing on the CH-OH group
mesh\tD000001\tDemo Agent\tmodulator\tpathway\treactome\tR-HSA-1\tDemo pathway
";

/// Write a complete resource directory and return it with its paths
pub fn resources() -> (TempDir, ResourcePaths) {
    let dir = tempfile::tempdir().unwrap();
    let paths = ResourcePaths::new(dir.path());
    write_resources(&paths);
    (dir, paths)
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

pub fn write_resources(paths: &ResourcePaths) {
    write(&paths.ontology_terms, TERMS);
    write(&paths.ontology_is_a, IS_A);
    write(&paths.ontology_relationships, RELATIONSHIPS);
    write(&paths.famplex_relations, "HGNC,GENE2,isa,FPLX,FAM1\nHGNC,GENEX,isa,FPLX,FAM1\n");
    write(&paths.famplex_symbols, "symbol,hgnc_id\nGENE2,HGNC:2\n");
    write(&paths.hgnc_uniprot, "hgnc_id\tuniprot_ids\n1\tD1\n2\tD2, D3\n");
    write(&paths.uniprot_names, "uniprot_id\tname\nD1\tDEMO1_HUMAN\n");
    write(
        &paths.enzyme_hierarchy,
        "child\tchild_name\trelation\tparent\n\
         eccode:1.1.1.1\talcohol dehydrogenase\tis_a\teccode:1.1.1.-\n\
         uniprot:P07327\tADH1A_HUMAN\thas_member\teccode:1.1.1.1\n",
    );
    write(&paths.ec2go, "ec_code\tgo_id\tgo_name\n1.1.1.1\tGO:0004022\talcohol dehydrogenase (NAD+) activity\n");
    write_curated(paths, CURATED);
}

pub fn write_curated(paths: &ResourcePaths, rows: &str) {
    write(&paths.xrefs, &format!("{}\n{}", XREFS_COLUMNS.join("\t"), rows));
}
