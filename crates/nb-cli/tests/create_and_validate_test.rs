mod common;
use common::TestFixture;
use predicates::prelude::*;

/// Creating
/// `sub-001`/`sub-002` x `ses-001` x `ephys`/`behav` yields six datatype
/// directories and `validate --mode error` reports no issues.
#[test]
fn create_folders_then_validate_reports_no_issues() {
    let fixture = TestFixture::new("myproject");
    fixture.make_config();

    fixture
        .command()
        .arg("create-folders")
        .arg("--sub")
        .arg("sub-001,sub-002")
        .arg("--ses")
        .arg("ses-001")
        .arg("--datatype")
        .arg("ephys,behav")
        .assert()
        .success();

    for sub in ["sub-001", "sub-002"] {
        for datatype in ["ephys", "behav"] {
            let dir = fixture
                .local_path()
                .join("rawdata")
                .join(sub)
                .join("ses-001")
                .join(datatype);
            assert!(dir.is_dir(), "expected {dir:?} to exist");
        }
    }

    fixture
        .command()
        .arg("validate")
        .arg("--mode")
        .arg("error")
        .assert()
        .success()
        .stdout(predicate::str::contains("no issues found"));
}

/// With `sub-001_id-123`
/// already on disk, creating `sub-001_id-125` raises `DUPLICATE_NAME`.
#[test]
fn duplicate_name_at_creation_is_rejected() {
    let fixture = TestFixture::new("myproject");
    fixture.make_config();
    fixture.make_folders("rawdata", &["sub-001_id-123"], &["ses-001"], &["ephys"]);

    fixture
        .command()
        .arg("create-folders")
        .arg("--sub")
        .arg("sub-001_id-125")
        .arg("--ses")
        .arg("ses-001")
        .arg("--datatype")
        .arg("ephys")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DUPLICATE_NAME"));
}

/// Template rejection is covered at the validator
/// unit-test level (`nb-validate::validator` tests); `get-next-sub` is
/// exercised here as a separate read-only CLI surface smoke test.
#[test]
fn next_sub_suggests_next_integer() {
    let fixture = TestFixture::new("myproject");
    fixture.make_config();
    fixture.make_folders("rawdata", &["sub-001", "sub-002"], &["ses-001"], &["ephys"]);

    fixture
        .command()
        .arg("next-sub")
        .assert()
        .success()
        .stdout(predicate::str::contains("sub-003"));
}
