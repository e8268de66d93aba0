//! End-to-end scenarios through the registry.
//!
//! Each test registers its own namespace, drives it through the public
//! instance API and checks the resulting tree and error kinds.

use std::io::{Read, Write};

use ramfs_core::{FileType, FsConfig, FsError, OpenOptions, Registry, RegistryConfig};

fn registry_with(id: &str) -> Registry {
    let registry = Registry::new();
    registry.register(id, FsConfig::default()).unwrap();
    registry
}

#[test]
fn create_directory_then_file_and_list() {
    let registry = registry_with("mem1");
    let fs = registry.lookup("mem1").unwrap();

    fs.create_directory("/a").unwrap();
    fs.create_file("/a/b.txt", false).unwrap();

    let names: Vec<String> = fs.list("/a").unwrap().map(|e| e.name).collect();
    assert_eq!(names, vec!["b.txt"]);
}

#[test]
fn create_file_twice_fails() {
    let registry = registry_with("mem1");
    let fs = registry.lookup("mem1").unwrap();

    fs.create_file("/x", false).unwrap();
    assert!(matches!(fs.create_file("/x", false), Err(FsError::AlreadyExists(_))));
}

#[test]
fn delete_missing_fails() {
    let registry = registry_with("mem1");
    let fs = registry.lookup("mem1").unwrap();

    assert!(matches!(fs.delete("/nonexistent"), Err(FsError::NotFound(_))));
}

#[test]
fn delete_non_empty_directory() {
    let registry = registry_with("mem1");
    let fs = registry.lookup("mem1").unwrap();
    fs.create_directory("/a").unwrap();
    fs.create_file("/a/b.txt", false).unwrap();

    assert!(matches!(fs.delete("/a"), Err(FsError::DirectoryNotEmpty(_))));
    fs.delete("/a/b.txt").unwrap();
    fs.delete("/a").unwrap();
    assert!(!fs.exists("/a"));
}

#[test]
fn write_close_reopen_read() {
    let registry = registry_with("mem1");
    let fs = registry.lookup("mem1").unwrap();
    fs.create_directory("/a").unwrap();
    fs.create_file("/a/b.txt", false).unwrap();

    let mut writer = fs.open_channel("/a/b.txt", OpenOptions::write()).unwrap();
    assert_eq!(writer.write_at(0, &[1, 2, 3]).unwrap(), 3);
    writer.close();

    let mut reader = fs.open_channel("/a/b.txt", OpenOptions::read()).unwrap();
    let mut buf = [0u8; 3];
    assert_eq!(reader.read(&mut buf).unwrap(), 3);
    assert_eq!(buf, [1, 2, 3]);
}

#[test]
fn move_directory() {
    let registry = registry_with("mem1");
    let fs = registry.lookup("mem1").unwrap();
    fs.create_directory("/a").unwrap();
    fs.create_file("/a/b.txt", false).unwrap();

    fs.rename("/a", "/z", false).unwrap();
    assert!(matches!(fs.stat("/a"), Err(FsError::NotFound(_))));
    assert_eq!(fs.stat("/z").unwrap().kind, FileType::Directory);
    assert!(fs.exists("/z/b.txt"));
}

#[test]
fn dispose_closes_handles() {
    let registry = registry_with("mem1");
    let fs = registry.lookup("mem1").unwrap();
    fs.write_all("/f", b"data").unwrap();
    let mut channel = fs.open_channel("/f", OpenOptions::read()).unwrap();

    registry.dispose("mem1").unwrap();

    assert!(matches!(fs.list("/"), Err(FsError::ClosedInstance(_))));
    assert!(matches!(fs.create_file("/g", false), Err(FsError::ClosedInstance(_))));
    let mut buf = [0u8; 4];
    assert!(matches!(channel.read(&mut buf), Err(FsError::ClosedInstance(_))));
    assert!(matches!(registry.lookup("mem1"), Err(FsError::NotFound(_))));
}

#[test]
fn namespaces_are_isolated() {
    let registry = Registry::new();
    let one = registry.register("one", FsConfig::default()).unwrap();
    let two = registry.register("two", FsConfig::default()).unwrap();

    one.write_all("/shared.txt", b"one").unwrap();
    assert!(!two.exists("/shared.txt"));
    assert_eq!(registry.names(), vec!["one", "two"]);
}

#[test]
fn case_insensitive_tree_keeps_spelling() {
    let registry = registry_with("Mem1");
    let fs = registry.lookup("MEM1").unwrap();

    fs.create_directory("/Docs").unwrap();
    fs.write_all("/DOCS/ReadMe.md", b"# hi").unwrap();

    assert_eq!(fs.read_all("/docs/readme.MD").unwrap(), b"# hi");
    let entry = fs.list("/docs").unwrap().next().unwrap();
    assert_eq!(entry.name, "ReadMe.md");
    assert!(matches!(
        fs.create_directory("/docs"),
        Err(FsError::AlreadyExists(_))
    ));
}

#[test]
fn std_io_round_trip_through_channels() {
    let registry = registry_with("io");
    let fs = registry.lookup("io").unwrap();

    let mut out = fs.open_channel("/log.txt", OpenOptions::append()).unwrap();
    writeln!(out, "first").unwrap();
    writeln!(out, "second").unwrap();
    drop(out);

    let mut text = String::new();
    fs.open_channel("/log.txt", OpenOptions::read())
        .unwrap()
        .read_to_string(&mut text)
        .unwrap();
    assert_eq!(text, "first\nsecond\n");
}

#[test]
fn read_only_namespace_from_config() {
    let config = RegistryConfig::from_ron(
        r#"(namespaces: [(name: "scratch"), (name: "fixtures", read_only: true)])"#,
    )
    .unwrap();
    let registry = Registry::from_config(&config).unwrap();

    let fixtures = registry.lookup("FIXTURES").unwrap();
    assert!(matches!(
        fixtures.create_file("/x", false),
        Err(FsError::ReadOnlyViolation(_))
    ));
    registry.lookup("scratch").unwrap().create_file("/x", false).unwrap();
}

#[test]
fn errors_convert_to_io() {
    let registry = registry_with("mem1");
    let fs = registry.lookup("mem1").unwrap();

    let err: std::io::Error = fs.read_all("/missing").unwrap_err().into();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}
