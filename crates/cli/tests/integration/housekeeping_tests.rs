//! `clean` and declaration task integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn clean_removes_generated_directories() {
  let env = TestEnv::from_fixture("shell_tools.toml");
  env.lathe_cmd().args(["build:all", "dist:lib"]).assert().success();
  assert!(env.path("build/release").is_dir());

  env.lathe_cmd().arg("clean").assert().success();

  for dir in ["build", "typings", "lib/ES5", "dist"] {
    assert!(!env.path(dir).exists(), "{dir} should be gone");
  }
}

#[test]
fn clean_refuses_overridden_dist() {
  let env = TestEnv::from_fixture("shell_tools.toml");
  let dist = env.outside("shared-dist");
  std::fs::write(dist.join("keep.js"), "").unwrap();

  env
    .lathe_cmd()
    .arg("--dist")
    .arg(&dist)
    .arg("clean:dist")
    .assert()
    .success()
    .stderr(predicate::str::contains("refusing to remove"));

  assert!(dist.join("keep.js").is_file());
}

#[test]
fn forced_clean_removes_overridden_dist() {
  let env = TestEnv::from_fixture("shell_tools.toml");
  let dist = env.outside("shared-dist");
  std::fs::write(dist.join("old.js"), "").unwrap();

  env
    .lathe_cmd()
    .arg("--force")
    .arg("--dist")
    .arg(&dist)
    .arg("clean:dist")
    .assert()
    .success();

  assert!(!dist.exists());
}

#[test]
fn declarations_are_installed_once() {
  let env = TestEnv::from_fixture("shell_tools.toml");

  env.lathe_cmd().arg("build:debug").assert().success();

  env
    .lathe_cmd()
    .arg("build:release")
    .assert()
    .success()
    .stderr(predicate::str::contains("declarations present"));
}
