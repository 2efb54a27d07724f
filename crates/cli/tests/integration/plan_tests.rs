use predicates::prelude::*;

use super::common::TestEnv;

fn strings(value: &serde_json::Value) -> Vec<String> {
  value
    .as_array()
    .unwrap()
    .iter()
    .map(|v| v.as_str().unwrap().to_string())
    .collect()
}

#[test]
fn gcc_plan_json_has_expected_settings_and_order() {
  let env = TestEnv::standard();
  let plan = env.plan_json("gcc");

  assert_eq!(plan["toolset"]["name"], "gcc");
  assert_eq!(plan["defaults"]["source"], "builtin_defaults");
  assert_eq!(plan["config"]["runtime_mode"], "release");
  assert_eq!(plan["config"]["show_brief"], true);
  assert_eq!(plan["config"]["obj_placement"]["kind"], "runtime_subdir");
  assert_eq!(
    strings(&plan["config"]["linker_options"]),
    vec!["-pthread", "-static-libstdc++", "-Wl,-rpath='$ORIGIN'"]
  );
  assert_eq!(strings(&plan["config"]["compiler_options"]), vec!["-Wextra", "-Wall"]);

  let references: Vec<_> = plan["units"]
    .as_array()
    .unwrap()
    .iter()
    .map(|u| u["reference"].as_str().unwrap().to_string())
    .collect();
  assert_eq!(
    references,
    vec![
      "test/build_tests.lua",
      "sample/tutorial1/prj.lua",
      "sample/tutorial2/prj.lua",
      "sample/tutorial3/prj.lua",
    ]
  );
}

#[test]
fn json_output_is_identical_across_runs() {
  let env = TestEnv::standard();
  let first = env
    .cmd()
    .args(["plan", "--toolset", "clang", "--format", "json"])
    .output()
    .unwrap();
  let second = env
    .cmd()
    .args(["plan", "--toolset", "clang", "--format", "json"])
    .output()
    .unwrap();
  assert!(first.status.success());
  assert_eq!(first.stdout, second.stdout);
}

#[test]
fn override_plan_reports_local_override() {
  let env = TestEnv::standard();
  env.write("local-build.lua", r#"prj.runtime_mode("debug")"#);

  let plan = env.plan_json("gcc");
  assert_eq!(plan["defaults"]["source"], "local_override");
  assert_eq!(plan["config"]["runtime_mode"], "debug");
  assert_eq!(plan["config"]["show_brief"], false);
  assert!(plan["config"]["obj_placement"].is_null());
}

#[test]
fn brief_text_output_lists_references() {
  let env = TestEnv::standard();
  env
    .cmd()
    .args(["plan", "--toolset", "gcc"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Defaults: built-in"))
    .stdout(predicate::str::contains("Units: 4"))
    .stdout(predicate::str::contains("→ sample/tutorial2/prj.lua"))
    .stdout(predicate::str::contains("objects:").not());
}

#[test]
fn detailed_text_output_without_brief_mode() {
  let env = TestEnv::standard();
  env.write(
    "local-build.lua",
    r#"
    prj.runtime_mode("debug")
    prj.obj_placement{ kind = "runtime_subdir", root = "out" }
    "#,
  );

  env
    .cmd()
    .args(["plan", "--toolset", "gcc"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Runtime mode: debug"))
    .stdout(predicate::str::contains("sample.tutorial1 (exe)"))
    .stdout(predicate::str::contains("out/debug/_objs/sample/tutorial1"));
}

#[test]
fn missing_reference_fails_with_context() {
  let env = TestEnv::standard();
  env.write(
    "build.lua",
    r#"return { required = { "test/build_tests.lua", "sample/tutorial9/prj.lua" } }"#,
  );

  env
    .cmd()
    .args(["plan", "--toolset", "gcc"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to compose"))
    .stderr(predicate::str::contains("sample/tutorial9/prj.lua"))
    .stderr(predicate::str::contains("reference #2"));
}

#[test]
fn cycle_fails() {
  let env = TestEnv::empty();
  env.write("build.lua", r#"return { required = { "a.lua" } }"#);
  env.write("a.lua", r#"prj.required("a.lua")"#);

  env
    .cmd()
    .args(["plan", "--toolset", "gcc"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("reference cycle detected"));
}

#[test]
fn explicit_root_path_is_accepted() {
  let env = TestEnv::standard();
  let root = env.path("build.lua");
  let output = env
    .cmd()
    .current_dir(std::env::temp_dir())
    .arg("plan")
    .arg(&root)
    .args(["--toolset", "clang", "--format", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());
  let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(plan["units"].as_array().unwrap().len(), 4);
}
