use super::*;

#[test]
fn normalize_strips_root_and_dot_segments() {
    assert_eq!(normalize_reference("/img/./a.png").unwrap(), "img/a.png");
    assert_eq!(normalize_reference("img\\b.png").unwrap(), "img/b.png");
    assert!(normalize_reference("/img/../secret").is_err());
    assert!(normalize_reference("/").is_err());
}

#[test]
fn fs_resolver_reads_under_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("img")).unwrap();
    std::fs::write(dir.path().join("img/a.bin"), [1u8, 2, 3]).unwrap();

    let r = FsResolver::new(dir.path());
    assert_eq!(r.resolve("/img/a.bin").unwrap(), vec![1, 2, 3]);
    assert_eq!(r.resolve("img/a.bin").unwrap(), vec![1, 2, 3]);
}

#[test]
fn fs_resolver_maps_not_found_to_asset_missing() {
    let dir = tempfile::tempdir().unwrap();
    let r = FsResolver::new(dir.path());
    match r.resolve("/music/none.mp3") {
        Err(ReelError::AssetMissing { reference }) => assert_eq!(reference, "/music/none.mp3"),
        other => panic!("unexpected result: {other:?}"),
    }
}
