mod common;
use common::TestFixture;
use predicates::prelude::*;

/// `make-config` exactly once; a second call against the same project
/// fails rather than silently overwriting the existing config.
#[test]
fn make_config_twice_fails_on_second_call() {
    let fixture = TestFixture::new("myproject");
    fixture.make_config();

    fixture
        .command()
        .arg("make-config")
        .arg("--local-path")
        .arg(fixture.local_path())
        .assert()
        .failure();
}

/// `update-config` changes a field on an already-created project.
#[test]
fn update_config_sets_central_path() {
    let fixture = TestFixture::new("myproject");
    fixture.make_config();

    let central = fixture.local_path().parent().unwrap().join("central");

    fixture
        .command()
        .arg("update-config")
        .arg("--central-path")
        .arg(&central)
        .assert()
        .success()
        .stdout(predicate::str::contains("updated config"));
}

/// A project that was never created with `make-config` cannot be loaded.
#[test]
fn commands_fail_cleanly_against_an_unknown_project() {
    let fixture = TestFixture::new("neverexisted");

    fixture
        .command()
        .arg("next-sub")
        .assert()
        .failure();
}
