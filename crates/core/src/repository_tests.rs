// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn from_path_takes_third_and_fourth_segments() {
    let repo = RepositoryRef::from_path("/projects/alice/quickstart").unwrap();
    assert_eq!(repo.owner, "alice");
    assert_eq!(repo.name, "quickstart");
}

#[test]
fn from_path_ignores_trailing_segments() {
    let repo = RepositoryRef::from_path("/projects/alice/quickstart/environment").unwrap();
    assert_eq!(repo.to_string(), "alice/quickstart");
}

#[yare::parameterized(
    root       = { "/" },
    listing    = { "/projects" },
    no_name    = { "/projects/alice" },
    empty_name = { "/projects/alice/" },
)]
fn from_path_rejects_shallow_routes(pathname: &str) {
    assert!(RepositoryRef::from_path(pathname).is_none());
}

#[test]
fn from_slug_parses_owner_name() {
    let repo = RepositoryRef::from_slug("alice/quickstart").unwrap();
    assert_eq!(repo.owner, "alice");
    assert_eq!(repo.name, "quickstart");
}

#[yare::parameterized(
    bare    = { "alice" },
    empty   = { "" },
    nested  = { "a/b/c" },
    no_name = { "alice/" },
)]
fn from_slug_rejects_malformed(slug: &str) {
    assert!(RepositoryRef::from_slug(slug).is_none());
}

#[test]
fn remote_url_appends_owner_and_name() {
    let repo = RepositoryRef::new("alice", "quickstart");
    assert_eq!(repo.remote_url("https://hub.example.com/"), "https://hub.example.com/alice/quickstart");
}

#[test]
fn build_key_entry_is_owner_name_scoped() {
    let repo = RepositoryRef::new("alice", "quickstart");
    assert_eq!(repo.build_key_entry(), "alice:quickstart:buildkey");
}

#[test]
fn page_and_environment_paths() {
    let repo = RepositoryRef::new("alice", "quickstart");
    assert_eq!(repo.page_path(), "/projects/alice/quickstart");
    assert_eq!(repo.environment_path(), "/projects/alice/quickstart/environment");
}
