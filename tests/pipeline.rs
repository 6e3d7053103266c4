mod support;

use std::collections::HashMap;

use arcdex::{
    assets::{self, AssetRecord},
    pool::Pool,
    results::{self, Indexer, ResultRecord},
};
use support::{sample_archive, MARIN, TEMP};

fn by_name<'a>(records: &'a [ResultRecord], pool: Pool, name: &str) -> &'a ResultRecord {
    records
        .iter()
        .find(|r| r.pool == pool && r.filename == name)
        .unwrap_or_else(|| panic!("no {pool} record for {name}"))
}

#[test]
fn results_index_end_to_end() {
    let def = sample_archive("results_index");
    let records = Indexer::new(&def).build().unwrap();

    let order: Vec<_> = records.iter().map(|r| (r.pool, r.filename.as_str())).collect();
    assert_eq!(
        order,
        [
            (Pool::Root, "96Marin.htm"),
            (Pool::Root, "Temp98.htm"),
            (Pool::Results, "13University.htm"),
            (Pool::Results, "1989Nats.xls"),
            (Pool::Results, "96Marin.htm"),
        ]
    );

    let marin = by_name(&records, Pool::Root, "96Marin.htm");
    assert!(marin.linked_from_root);
    assert_eq!(marin.meet_name, "1996 Marin Open");
    assert_eq!(marin.date_raw, "March 16, 1996");
    assert_eq!(marin.date_start, "1996-03-16");
    assert_eq!(marin.date_end, "1996-03-16");
    assert_eq!(marin.location, "San Rafael, CA");
    assert_eq!(
        marin.file_path,
        format!("{}/96Marin.htm", def.archive_root.display())
    );
    assert_eq!(
        marin.notes,
        format!("stub_file_{}b; duplicate_exists_in_Results", MARIN.len())
    );

    let temp = by_name(&records, Pool::Root, "Temp98.htm");
    assert!(!temp.linked_from_root);
    assert_eq!(temp.date_start, "1998-11");
    assert_eq!(temp.date_end, "");
    assert_eq!(
        temp.notes,
        format!("stub_file_{}b; possible_draft_or_temp", TEMP.len())
    );

    let uni = by_name(&records, Pool::Results, "13University.htm");
    assert!(uni.linked_from_root);
    assert_eq!(uni.meet_name, "University Nationals");
    assert_eq!(uni.date_start, "2013-04-05");
    assert_eq!(uni.date_end, "2013-04-06");
    assert_eq!(uni.location, "Sacramento, CA");
    assert_eq!(uni.source, "Jim Schmitz");
    assert!(uni.notes.ends_with("has_record_notations"), "{}", uni.notes);

    let xls = by_name(&records, Pool::Results, "1989Nats.xls");
    assert!(!xls.linked_from_root);
    assert_eq!(xls.date_start, "1989");
    assert_eq!(xls.notes, "xls_file");
    assert!(xls.meet_name.is_empty());

    let dup = by_name(&records, Pool::Results, "96Marin.htm");
    assert!(!dup.linked_from_root);
    assert!(dup.notes.ends_with("duplicate_exists_in_root"), "{}", dup.notes);
    assert_eq!(
        dup.file_path,
        format!("{}/Results/96Marin.htm", def.archive_root.display())
    );

    let summary = results::summary(&def, &records).to_string();
    assert!(summary.contains("ORPHANED FILES:\n  [root    ] Temp98.htm\n"), "{summary}");
    assert!(summary.ends_with("  [Results ] 96Marin.htm\n"), "{summary}");
}

#[test]
fn results_outputs_are_written() {
    let def = sample_archive("results_outputs");
    let records = Indexer::new(&def).build().unwrap();
    results::write(&def, &records).unwrap();

    let linked = report::read_column(&def.results_csv(), "linked_from_root")
        .unwrap()
        .unwrap();
    assert_eq!(linked, ["true", "false", "true", "false", "false"]);

    let json = std::fs::read_to_string(def.results_json()).unwrap();
    let rows: Vec<HashMap<String, serde_json::Value>> = serde_json::from_str(&json).unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[2]["pool"], "Results");
    assert_eq!(rows[2]["linked_from_root"], true);
    assert_eq!(rows[3]["file_size_bytes"], 10);
    assert_eq!(rows[0]["pool"], "root");
}

#[test]
fn missing_nav_page_fails() {
    let mut def = sample_archive("missing_nav");
    def.nav_page = "nowhere.htm".into();
    let e = Indexer::new(&def).build().unwrap_err();
    assert!(format!("{e:#}").contains("navigation page"), "{e:#}");
}

fn asset<'a>(records: &'a [AssetRecord], rel: &str) -> &'a AssetRecord {
    records
        .iter()
        .find(|r| r.rel_path == rel)
        .unwrap_or_else(|| panic!("no asset {rel}"))
}

#[test]
fn asset_inventory_against_results_csv() {
    let def = sample_archive("asset_inventory");
    let records = Indexer::new(&def).build().unwrap();
    results::write(&def, &records).unwrap();

    let names = assets::results_filenames(&def.results_csv()).unwrap();
    let refs = assets::nav_references(&def).unwrap();
    let inv = assets::build(&def, &refs, &names).unwrap();
    assert_eq!(inv.len(), 14);

    let marin = asset(&inv, "96Marin.htm");
    assert_eq!(marin.subdir, "(root)");
    assert_eq!(marin.category, "html");
    assert!(marin.referenced_from_nav);
    assert_eq!(marin.reference_type, "href");
    assert!(marin.in_results_index);
    assert_eq!(marin.notes, "in_results_index");

    let copy = asset(&inv, "Results/96Marin.htm");
    assert_eq!(copy.subdir, "Results");
    assert!(!copy.referenced_from_nav);
    assert_eq!(copy.notes, "in_results_index; identical_to:96Marin.htm");

    let logo = asset(&inv, "img/logo.gif");
    assert_eq!(logo.category, "image");
    assert_eq!(logo.reference_type, "href; img_src");
    assert_eq!(logo.notes, "");
    assert_eq!(asset(&inv, "img/logo_copy.gif").notes, "identical_to:img/logo.gif");

    assert_eq!(asset(&inv, "site.css").reference_type, "link_href");
    assert_eq!(asset(&inv, "empty.txt").notes, "empty_file");
    assert_eq!(asset(&inv, "w8lift.htm%5D").notes, "percent_encoded_name");
    assert!(!asset(&inv, "index.htm").in_results_index);

    assets::write(&def, &inv).unwrap();
    let rels = report::read_column(&def.assets_csv(), "rel_path").unwrap().unwrap();
    assert_eq!(rels.len(), 14);

    let summary = assets::summary(&def, &inv).to_string();
    assert!(summary.contains("  Total files            : 14\n"), "{summary}");
    assert!(summary.contains("  Referenced in nav page : 4\n"), "{summary}");
    assert!(summary.contains("    href            3\n"), "{summary}");
    assert!(summary.contains("    img_src         1\n"), "{summary}");
    assert!(summary.contains("[(root)      ] [html      ] index.htm\n"), "{summary}");
    assert!(summary.contains("[img         ] [image     ] img/logo_copy.gif\n"), "{summary}");
    assert!(!summary.contains("] Temp98.htm"), "{summary}");
    assert!(!summary.contains("readme.txt"), "{summary}");
}

#[test]
fn assets_without_results_csv() {
    let def = sample_archive("assets_no_csv");
    let names = assets::results_filenames(&def.results_csv()).unwrap();
    assert!(names.is_empty());
    let refs = assets::nav_references(&def).unwrap();
    let inv = assets::build(&def, &refs, &names).unwrap();
    assert!(inv.iter().all(|r| !r.in_results_index));
}
