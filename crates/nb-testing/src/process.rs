//! A pre-wired [`assert_cmd::Command`] for the `neuroshuttle` binary,
//! pointed at an isolated `DATASHUTTLE_HOME` so CLI integration tests
//! never touch the invoking user's real `~/.datashuttle`.

use assert_cmd::Command;
use std::path::Path;

/// Build a `neuroshuttle` command with `DATASHUTTLE_HOME` pinned to
/// `home`. Callers append subcommand args and call `.assert()`.
pub fn neuroshuttle_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("neuroshuttle").expect("neuroshuttle binary built");
    cmd.env("DATASHUTTLE_HOME", home);
    cmd
}
