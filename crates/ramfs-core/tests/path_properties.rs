//! Algebraic properties of `FsPath` over a fixed corpus of inputs.

use std::cmp::Ordering;

use ramfs_core::FsPath;

const SAMPLES: &[&str] = &[
    "",
    "/",
    "//",
    "a",
    "/a",
    "a/b/c",
    "/a/b/c",
    "/A/b/./C",
    "a//b///c/",
    "../a",
    "../../x/./y",
    "/a/../b",
    "/a/b/../../..",
    "a/./../b",
    "./.",
    "/Foo/BAR/baz.TXT",
    "a/../../b/./..",
    "/./../a/..",
    "./../.././a/../b",
    "/a/./b/../../../c/.",
    "../..",
    "x/y/../../..",
    "/../../..",
    "./a/./../../.",
];

fn p(s: &str) -> FsPath {
    FsPath::parse(s, &[])
}

#[test]
fn display_reparses_to_same_path() {
    for s in SAMPLES {
        let path = p(s);
        assert_eq!(p(&path.to_string()), path, "input {s:?}");
    }
}

#[test]
fn normalize_is_idempotent() {
    for s in SAMPLES {
        let once = p(s).normalize();
        assert_eq!(once.normalize(), once, "input {s:?}");
    }
}

#[test]
fn normalize_leaves_no_cancellable_segments() {
    for s in SAMPLES {
        let norm = p(s).normalize();
        let tokens: Vec<&str> = norm.tokens().map(|t| t.as_str()).collect();
        assert!(!tokens.contains(&"."), "input {s:?} gave {norm}");
        // Any `..` left over sits at the front of a relative path.
        let leading = tokens.iter().take_while(|t| **t == "..").count();
        assert!(!tokens[leading..].contains(&".."), "input {s:?} gave {norm}");
        if norm.is_absolute() {
            assert_eq!(leading, 0, "input {s:?} gave {norm}");
        }
    }
    assert_eq!(p("a/../../b/./..").normalize(), p(".."));
    assert_eq!(p("/./../a/..").normalize(), FsPath::root());
    assert_eq!(p("./../.././a/../b").normalize(), p("../../b"));
    assert_eq!(p("/a/./b/../../../c/.").normalize(), p("/c"));
}

#[test]
fn relativize_undoes_resolve() {
    let bases = ["/", "/a", "/a/b", "/x/y/z"];
    let relatives = ["", "c", "c/d", "C/./d", "q/r/s"];
    for base in bases {
        let base = p(base).normalize();
        for rel in relatives {
            let rel = p(rel).normalize();
            let resolved = base.resolve(&rel);
            assert_eq!(base.relativize(&resolved).unwrap(), rel, "{base} + {rel}");
        }
    }
}

#[test]
fn comparison_ignores_case() {
    assert_eq!(p("/Foo/BAR").cmp(&p("/foo/bar")), Ordering::Equal);
    assert_eq!(p("/Foo/BAR"), p("/foo/bar"));
    assert_eq!(p("/Foo/BAR").to_string(), "/Foo/BAR");
}

#[test]
fn prefix_and_suffix_examples() {
    assert!(FsPath::root().starts_with(&FsPath::root()));
    assert!(p("/a/b").starts_with(&p("/a")));
    assert!(!p("/a/b").starts_with(&p("a")));
    assert!(p("a/b").ends_with(&p("b")));
    assert!(p("/a/b").ends_with(&p("A/B")));
    assert!(!p("a/b").ends_with(&p("/b")));
}

#[test]
fn ordering_is_total_over_samples() {
    let mut paths: Vec<FsPath> = SAMPLES.iter().map(|s| p(s)).collect();
    paths.sort();
    for pair in paths.windows(2) {
        assert_ne!(pair[0].cmp(&pair[1]), Ordering::Greater);
    }
    assert_eq!(paths[0], FsPath::empty());
}
