//! End-to-end resolution against files on disk

use collect::source::file::DocumentError;
use collect::{Error, Flags, Registry, Resolver};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use url::Url;

fn write(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, body).expect("write document");
    Url::from_file_path(&path).expect("file url").to_string()
}

#[test]
fn flags_override_later_sources_override_earlier() {
    let tmp = TempDir::new().expect("tmp");
    let base = write(tmp.path(), "base.yml", "image: alpine\ntag: latest\nport: 80\n");
    let prod = write(tmp.path(), "prod.yml", "tag: stable\nport: 443\n");

    let registry = Registry::with_defaults();
    let flags = Flags::new("app").value("port", "Port");
    let mut resolver = Resolver::new(&registry);
    let (data, rest) = resolver
        .parse(["-source", base.as_str(), "-source", prod.as_str(), "-port", "8080", "serve"], &[flags])
        .expect("resolve");

    assert_eq!(data.get("image"), "alpine");
    assert_eq!(data.get("tag"), "stable");
    assert_eq!(data.get("port"), "8080");
    assert_eq!(rest, ["serve"]);
    assert_eq!(resolver.sources(), [base, prod]);
}

#[test]
fn label_selects_section_with_inheritance() {
    let tmp = TempDir::new().expect("tmp");
    let url = write(
        tmp.path(),
        "config.yml",
        "C:\n  x: 1\n  y: 0\nB:\n  <<: C\n  y: 2\nA:\n  <<: B\n  y: 3\n  hosts: [a, b]\n",
    );

    let registry = Registry::with_defaults();
    let mut resolver = Resolver::new(&registry);
    let (data, _) = resolver.parse(["A", "-source", url.as_str()], &[]).expect("resolve");

    assert_eq!(resolver.label(), "A");
    assert_eq!(data.get("x"), "1");
    assert_eq!(data.get("y"), "3");
    assert_eq!(data.get_all("hosts"), ["a", "b"]);
    assert_eq!(data.len(), 3);
}

#[test]
fn missing_label_falls_back_to_default_section() {
    let tmp = TempDir::new().expect("tmp");
    let url = write(tmp.path(), "config.yml", "dev:\n  debug: true\ndefault:\n  debug: false\n");

    let registry = Registry::with_defaults();
    let mut resolver = Resolver::new(&registry);
    let (data, _) = resolver.parse(["staging", "-source", url.as_str()], &[]).expect("resolve");
    assert!(data.is_false("debug"));
}

#[test]
fn default_source_is_used_without_sources() {
    let tmp = TempDir::new().expect("tmp");
    let url = write(tmp.path(), "config.toml", "[dev]\nname = \"dev-db\"\n");

    let registry = Registry::with_defaults();
    let mut resolver = Resolver::new(&registry).with_default_source(url.clone());
    let (data, _) = resolver.parse(["dev"], &[]).expect("resolve");
    assert_eq!(data.get("name"), "dev-db");
    assert_eq!(resolver.sources(), [url]);
}

#[test]
fn nesting_depth_failure_aborts_resolution() {
    let tmp = TempDir::new().expect("tmp");
    let good = write(tmp.path(), "good.yml", "a: 1\n");
    let deep = write(tmp.path(), "deep.yml", "prod:\n  db:\n    host: x\n");

    let registry = Registry::with_defaults();
    let mut resolver = Resolver::new(&registry);
    let err = resolver
        .parse(["-source", good.as_str(), "-source", deep.as_str()], &[])
        .expect_err("nesting");

    assert!(err.to_string().starts_with("file: "));
    assert!(matches!(err.document(), Some(DocumentError::NestingDepthExceeded { .. })));
}

#[test]
fn cyclic_inheritance_aborts_resolution() {
    let tmp = TempDir::new().expect("tmp");
    let url = write(tmp.path(), "cycle.yml", "a:\n  <<: b\nb:\n  <<: a\n");

    let registry = Registry::with_defaults();
    let mut resolver = Resolver::new(&registry);
    let err = resolver.parse(["-source", url.as_str()], &[]).expect_err("cycle");
    assert!(matches!(err.document(), Some(DocumentError::CyclicInheritance(_))));
}

#[test]
fn unknown_scheme_aborts_resolution() {
    let registry = Registry::with_defaults();
    let mut resolver = Resolver::new(&registry);
    let err = resolver.parse(["-source", "foo://x"], &[]).expect_err("scheme");
    assert!(matches!(err, Error::UnknownScheme(ref scheme) if scheme == "foo"));
}

#[test]
fn missing_file_is_a_load_failure() {
    let tmp = TempDir::new().expect("tmp");
    let url = Url::from_file_path(tmp.path().join("absent.yml")).expect("file url");

    let registry = Registry::with_defaults();
    let mut resolver = Resolver::new(&registry);
    let err = resolver.parse(["-source", url.as_str()], &[]).expect_err("missing");
    assert!(matches!(err, Error::SourceLoad { ref scheme, .. } if scheme == "file"));
    assert!(matches!(err.document(), Some(DocumentError::Io { .. })));
}
