//! Build and distribution integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn default_task_builds_debug_bundle() {
  let env = TestEnv::from_fixture("shell_tools.toml");

  env
    .lathe_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Finished default"));

  assert!(env.path("typings/main.d.ts").is_file());
  assert!(env.path("build/debug/rx.obj.js").is_file());
  assert!(!env.path("build/release").exists());
}

#[test]
fn release_bundle_is_minified_name() {
  let env = TestEnv::from_fixture("shell_tools.toml");

  env.lathe_cmd().arg("build:release").assert().success();

  let plan = std::fs::read_to_string(env.path("build/release.plan.json")).unwrap();
  assert!(plan.contains("\"NODE_ENV\": \"production\""));
  assert!(env.path("build/release/rx.obj.min.js").is_file());
}

#[test]
fn profile_writes_statistics() {
  let env = TestEnv::from_fixture("shell_tools.toml");

  env.lathe_cmd().args(["--profile", "build:debug"]).assert().success();

  assert!(env.path("build/debug/stats.json").is_file());
  let plan = std::fs::read_to_string(env.path("build/debug.plan.json")).unwrap();
  assert!(plan.contains("\"profile\": true"));
}

#[test]
fn bundler_errors_fail_the_run() {
  let env = TestEnv::from_fixture("broken_bundle.toml");

  env
    .lathe_cmd()
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Cannot resolve module ./missing"))
    .stderr(predicate::str::contains("step 'build' failed"));
}

#[test]
fn pipeline_stops_at_first_failure() {
  let env = TestEnv::from_fixture("broken_bundle.toml");

  env
    .lathe_cmd()
    .args(["build:debug", "clean:declarations"])
    .assert()
    .failure();

  // The second step never ran.
  assert!(env.path("typings/main.d.ts").is_file());
}

#[test]
fn dist_produces_library_and_bundle() {
  let env = TestEnv::from_fixture("shell_tools.toml");
  env.write_file("src/rx.obj.ts", "export {};");

  env.lathe_cmd().arg("dist").assert().success();

  assert!(env.path("lib/ES5/index.js").is_file());
  assert!(env.path("dist/rx.obj.min.js").is_file());
}

#[test]
fn lib_override_redirects_library_output() {
  let env = TestEnv::from_fixture("shell_tools.toml");
  let lib = env.outside("packages-lib");

  env
    .lathe_cmd()
    .arg("--lib")
    .arg(&lib)
    .arg("dist:lib:es6")
    .assert()
    .success();

  assert!(lib.join("ES6/index.js").is_file());
  assert!(!env.path("lib").exists());
}

#[test]
fn lint_findings_are_warnings() {
  let env = TestEnv::from_fixture("shell_tools.toml");
  env.write_file("src/rx.obj.ts", "export {}; ");

  env
    .lathe_cmd()
    .arg("lint")
    .assert()
    .success()
    .stderr(predicate::str::contains("trailing whitespace"));
}

#[test]
fn relative_lib_override_is_built_and_cleaned_in_one_place() {
  let env = TestEnv::from_fixture("shell_tools.toml");
  let outside = env.temp.path();

  env
    .lathe_cmd()
    .current_dir(outside)
    .arg("-C")
    .arg(&env.root)
    .args(["--lib", "shared-lib", "dist:lib:es6"])
    .assert()
    .success();

  assert!(outside.join("shared-lib/ES6/index.js").is_file());
  assert!(!env.path("shared-lib").exists());

  env
    .lathe_cmd()
    .current_dir(outside)
    .arg("-C")
    .arg(&env.root)
    .args(["--force", "--lib", "shared-lib", "clean:lib:es6"])
    .assert()
    .success();

  assert!(!outside.join("shared-lib/ES6").exists());
}
