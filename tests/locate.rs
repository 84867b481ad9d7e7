use qips::ips_file_name;
use std::fs;
use tempfile::tempdir;

#[test]
fn prefers_an_existing_lowercase_patch() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("game.smc");
    fs::write(&base, b"rom").unwrap();
    fs::write(dir.path().join("game.ips"), b"PATCHEOF").unwrap();

    assert_eq!(ips_file_name(&base), Some(dir.path().join("game.ips")));
}

#[test]
fn falls_back_to_uppercase_without_probing() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("game.smc");

    // neither sibling exists; the uppercase name is still returned
    assert_eq!(ips_file_name(&base), Some(dir.path().join("game.IPS")));
}

#[test]
fn rejects_short_or_missing_extensions() {
    assert_eq!(ips_file_name("game"), None);
    assert_eq!(ips_file_name("game.sm"), None);
    assert_eq!(ips_file_name("archive.tar.gz"), None);
}

#[test]
fn accepts_longer_extensions() {
    assert_eq!(
        ips_file_name("roms/game.sfc2"),
        Some("roms/game.IPS".into())
    );
}
