//! End-to-end runs of the standard task set against recording tools.

use std::fs;

use lathe_lib::config::{Config, ConfigOverrides};
use lathe_lib::consts::STATS_FILE;
use lathe_lib::pipeline::run_pipeline;
use lathe_lib::task::{ActionError, TaskError};
use lathe_lib::variant::BuildError;

use super::common::{RecordingTools, TestEnv, standard_scheduler};

#[test]
fn dist_builds_library_then_bundle() {
  let env = TestEnv::new();
  let tools = RecordingTools::default();
  let scheduler = standard_scheduler(env.config(), tools.toolchain());

  scheduler.run("dist").unwrap();

  assert_eq!(tools.calls(), vec!["install", "compile:ES5", "bundle:release"]);
  assert!(env.path("lib/ES5/index.js").is_file());
  assert!(env.path("dist/rx.obj.min.js").is_file());
}

#[test]
fn dist_lib_es6_is_standalone() {
  let env = TestEnv::new();
  env.write_file("typings/main.d.ts", "");
  let tools = RecordingTools::default();
  let scheduler = standard_scheduler(env.config(), tools.toolchain());

  scheduler.run("dist:lib:es6").unwrap();

  assert_eq!(tools.calls(), vec!["compile:ES2015"]);
  assert!(env.path("lib/ES6/index.js").is_file());
}

#[test]
fn failing_build_stops_the_pipeline() {
  let env = TestEnv::new();
  let tools = RecordingTools {
    failing_variant: Some("debug"),
    ..Default::default()
  };
  let scheduler = standard_scheduler(env.config(), tools.toolchain());

  let err = run_pipeline(&scheduler, &["build:debug", "build:release"]).unwrap_err();

  assert_eq!(err.step, "build:debug");
  match *err.source {
    TaskError::Action {
      source: ActionError::Build(BuildError::Failed { ref diagnostics, .. }),
      ..
    } => assert_eq!(diagnostics, &vec!["ERROR in ./src/rx.obj.ts".to_string()]),
    ref other => panic!("unexpected error: {other}"),
  }
  assert_eq!(tools.calls(), vec!["install", "bundle:debug"]);
}

#[test]
fn explicit_reporter_reaches_the_test_runner() {
  let env = TestEnv::new();
  let tools = RecordingTools::default();
  let config = Config::resolve(ConfigOverrides {
    quiet: true,
    reporter: Some("progress".to_string()),
    ..env.overrides()
  });
  let scheduler = standard_scheduler(config, tools.toolchain());

  scheduler.run("test").unwrap();

  assert_eq!(tools.calls(), vec!["install", "bundle:test", "test:progress"]);
}

#[test]
fn lint_covers_sources_and_tests() {
  let env = TestEnv::new();
  env.write_file("src/rx.obj.ts", "export {};");
  env.write_file("src/operators/map.ts", "export {};");
  env.write_file("test/rx.obj.tests.ts", "");
  let tools = RecordingTools::default();
  let scheduler = standard_scheduler(env.config(), tools.toolchain());

  scheduler.run("lint").unwrap();

  assert_eq!(tools.calls(), vec!["lint:3", "lint:0"]);
}

#[test]
fn profile_writes_bundle_statistics() {
  let env = TestEnv::new();
  let tools = RecordingTools::default();
  let config = Config::resolve(ConfigOverrides {
    profile: true,
    ..env.overrides()
  });
  let scheduler = standard_scheduler(config, tools.toolchain());

  scheduler.run("build:release").unwrap();

  let stats = fs::read_to_string(env.path("build/release").join(STATS_FILE)).unwrap();
  assert!(stats.contains("rx.obj.min.js"));
}

#[test]
fn project_file_names_the_bundle() {
  let env = TestEnv::new();
  env.write_file(
    "lathe.toml",
    r#"
[project]
name = "widgets"
entry = "src/index.ts"
"#,
  );
  let tools = RecordingTools::default();
  let scheduler = standard_scheduler(env.config(), tools.toolchain());

  scheduler.run("default").unwrap();

  assert!(env.path("build/debug/widgets.js").is_file());
}

#[test]
fn clean_after_build_removes_outputs() {
  let env = TestEnv::new();
  let tools = RecordingTools::default();
  let scheduler = standard_scheduler(env.config(), tools.toolchain());

  run_pipeline(&scheduler, &["build:all", "clean"]).unwrap();

  assert!(!env.path("build").exists());
  assert!(!env.path("typings").exists());
}
