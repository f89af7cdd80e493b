use folderscan::{
    Export, NoopObserver, OutputFormat, ScanBuilder, ScanError, classify, export,
    extract_markdown, extract_text, walk,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn integration_depth_suffix_and_file_root() {
    let dir = tempdir().unwrap();
    let proj = dir.path().join("proj");
    fs::create_dir_all(proj.join("src/nested")).unwrap();
    fs::write(proj.join("src/main.rs"), "fn main() {}").unwrap();
    fs::write(proj.join("src/nested/deep.rs"), "fn deep() {}").unwrap();
    fs::write(proj.join("pkg.json"), "{ \"name\": \"proj\" }").unwrap();

    let raws = [
        format!("{}/src/root+0", proj.display()),
        format!("{}/pkg.json", proj.display()),
    ];
    let classified = classify(&raws, &NoopObserver).unwrap();
    let src = classified.paths[0].clone();
    assert_eq!(classified.depth_bounds.get(&src), Some(&0));
    assert_eq!(classified.depth_bounds.len(), 1);

    let spec = ScanBuilder::new().classified(classified).build();
    let snapshot = walk(&spec, Arc::new(NoopObserver)).unwrap();
    let rel: Vec<_> = snapshot
        .records
        .iter()
        .map(|r| r.relative_path.clone())
        .collect();
    assert_eq!(rel, vec![PathBuf::from("main.rs"), PathBuf::from("pkg.json")]);
}

#[test]
fn integration_export_plain_round_trip() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("repo");
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::write(root.join("README.md"), "# Repo\n\nSome words here.\n").unwrap();
    fs::write(root.join("docs/guide.txt"), "step one\nstep two").unwrap();
    fs::write(root.join("empty.txt"), "").unwrap();
    let out = dir.path().join("scan_output.md");

    let spec = ScanBuilder::new().root(&root).build();
    let result = export(&spec, &out, Arc::new(NoopObserver)).unwrap();
    let written = dir.path().join("scan_output.txt");
    assert_eq!(
        result,
        Export::Written {
            path: written.clone(),
            files: 3,
            words: 9,
        }
    );
    assert!(!out.exists());

    let doc = fs::read_to_string(&written).unwrap();
    assert!(doc.contains("*Directory: repo*\nTotal words: 9\n"));
    let pairs = extract_text(&doc);
    assert_eq!(
        pairs,
        vec![
            (
                root.join("README.md").display().to_string(),
                "# Repo\n\nSome words here.\n".to_string()
            ),
            (root.join("empty.txt").display().to_string(), String::new()),
            (
                root.join("docs/guide.txt").display().to_string(),
                "step one\nstep two".to_string()
            ),
        ]
    );
}

#[test]
fn integration_markdown_matches_plain_records() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("repo");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("a.rs"), "fn a() {}\n").unwrap();
    fs::write(root.join("notes.md"), "```\ncode\n```").unwrap();

    let text_spec = ScanBuilder::new().root(&root).build();
    let md_spec = ScanBuilder::new()
        .root(&root)
        .output_format(OutputFormat::Markdown)
        .build();
    export(&text_spec, &dir.path().join("out"), Arc::new(NoopObserver)).unwrap();
    export(&md_spec, &dir.path().join("out"), Arc::new(NoopObserver)).unwrap();

    let text = fs::read_to_string(dir.path().join("out.txt")).unwrap();
    let md = fs::read_to_string(dir.path().join("out.md")).unwrap();
    assert!(md.starts_with("# Directory Scan Results"));
    assert_eq!(extract_text(&text), extract_markdown(&md));
    assert_eq!(extract_markdown(&md).len(), 2);
}

#[test]
fn integration_nothing_found_writes_nothing() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("repo");
    fs::create_dir_all(root.join("node_modules")).unwrap();
    fs::write(root.join("node_modules/x.js"), "x").unwrap();
    let out = dir.path().join("scan_output.txt");
    let spec = ScanBuilder::new().root(&root).build();
    assert_eq!(
        export(&spec, &out, Arc::new(NoopObserver)).unwrap(),
        Export::Empty
    );
    assert!(!out.exists());
}

#[test]
fn integration_missing_only_root_is_rejected() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.txt");
    let err = classify([missing.display().to_string()], &NoopObserver).unwrap_err();
    assert!(matches!(err, ScanError::NoValidPaths));
}

#[test]
fn integration_write_error_is_fatal() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    let spec = ScanBuilder::new().root(dir.path()).build();
    let out = dir.path().join("no/such/dir/out.txt");
    assert!(matches!(
        export(&spec, &out, Arc::new(NoopObserver)),
        Err(ScanError::Io { .. })
    ));
}
