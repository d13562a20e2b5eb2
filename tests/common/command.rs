use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn workspace_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// `old.txt` and `new.txt` differing in their second line
#[fixture]
pub fn replaced_line_dir(workspace_dir: TempDir) -> TempDir {
    write_file(FileSpec::new(
        workspace_dir.path().join("old.txt"),
        "a\nb\nc".to_string(),
    ));
    write_file(FileSpec::new(
        workspace_dir.path().join("new.txt"),
        "a\nx\nc".to_string(),
    ));

    workspace_dir
}

pub fn run_linediff_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("linediff").expect("Failed to find linediff binary");
    cmd.current_dir(dir).args(args).env_remove("LINEDIFF_LOG");
    cmd
}

pub fn stdout_of(cmd: &mut Command) -> Result<String, Box<dyn std::error::Error>> {
    let output = cmd.assert().success();
    Ok(String::from_utf8(output.get_output().stdout.clone())?)
}
