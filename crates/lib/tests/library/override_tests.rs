use prjcomp_lib::config::{ObjPlacement, RuntimeMode};
use prjcomp_lib::error::ComposeError;
use prjcomp_lib::overrides::DefaultsSource;

use super::common::ProjectTree;

const DEBUG_OVERRIDE: &str = r#"
prj.runtime_mode("debug")
prj.obj_placement{ kind = "source_subdir", subdir = "o" }
"#;

#[test]
fn override_owns_governed_fields() {
  let tree = ProjectTree::standard();
  tree.write("local-build.lua", DEBUG_OVERRIDE);

  let plan = tree.compose("gcc").unwrap();
  assert!(plan.defaults.is_override());
  assert_eq!(plan.config.runtime_mode, Some(RuntimeMode::Debug));
  assert_eq!(
    plan.config.obj_placement,
    Some(ObjPlacement::SourceSubdir { subdir: "o".to_string() })
  );
  // The built-in defaults never ran, so brief mode stays off.
  assert!(!plan.config.show_brief);
}

#[test]
fn override_that_sets_nothing_leaves_fields_unset() {
  let tree = ProjectTree::standard();
  tree.write("local-build.lua", "-- nothing to override");

  let plan = tree.compose("gcc").unwrap();
  assert!(matches!(plan.defaults, DefaultsSource::LocalOverride(_)));
  assert_eq!(plan.config.runtime_mode, None);
  assert_eq!(plan.config.obj_placement, None);
  assert!(!plan.config.show_brief);
}

#[test]
fn override_is_not_a_unit() {
  let tree = ProjectTree::standard();
  tree.write("local-build.lua", DEBUG_OVERRIDE);

  let plan = tree.compose("gcc").unwrap();
  assert_eq!(plan.units.len(), 4);
  assert!(plan.units.iter().all(|u| !u.reference.ends_with("local-build.lua")));
}

#[test]
fn override_can_add_global_options_and_projects() {
  let tree = ProjectTree::standard();
  tree.write(
    "local-build.lua",
    r#"
    prj.runtime_mode("release")
    prj.global_compiler_option("-march=native")
    prj.required("bench/prj.lua")
    "#,
  );
  tree.write("bench/prj.lua", r#"prj.target{ name = "bench" }"#);

  let plan = tree.compose("gcc").unwrap();
  assert_eq!(plan.config.compiler_options, vec!["-Wextra", "-Wall", "-march=native"]);
  assert_eq!(plan.references()[0], "bench/prj.lua");
  assert_eq!(plan.units[0].parent.as_deref(), Some("local-build.lua"));
  assert_eq!(plan.units.len(), 5);
}

#[test]
fn custom_override_name_is_honoured() {
  let tree = ProjectTree::standard();
  tree.write(
    "build.lua",
    r#"return { override = "site.lua", required = { "test/build_tests.lua" } }"#,
  );
  tree.write("local-build.lua", r#"error("must not be evaluated")"#);
  tree.write("site.lua", r#"prj.runtime_mode("debug")"#);

  let plan = tree.compose("gcc").unwrap();
  assert_eq!(plan.config.runtime_mode, Some(RuntimeMode::Debug));
}

#[test]
fn failing_override_is_fatal() {
  let tree = ProjectTree::standard();
  tree.write("local-build.lua", r#"error("bad local settings")"#);

  let err = tree.compose("gcc").unwrap_err();
  match &err {
    ComposeError::MalformedOverride { path, source } => {
      assert!(path.ends_with("local-build.lua"));
      assert!(matches!(**source, ComposeError::Descriptor { .. }), "{:?}", source);
    }
    other => panic!("expected malformed override, got {:?}", other),
  }
}

#[test]
fn override_failure_in_nested_reference_is_fatal() {
  let tree = ProjectTree::standard();
  tree.write("local-build.lua", r#"prj.required("nowhere/prj.lua")"#);

  let err = tree.compose("gcc").unwrap_err();
  match err {
    ComposeError::MalformedOverride { source, .. } => {
      assert!(matches!(*source, ComposeError::ReferenceNotFound { .. }), "{:?}", source);
    }
    other => panic!("expected malformed override, got {:?}", other),
  }
}

#[test]
fn override_failure_precedes_project_failures() {
  let tree = ProjectTree::new();
  tree.write("build.lua", r#"return { required = { "missing.lua" } }"#);
  tree.write("local-build.lua", r#"error("bad")"#);

  let err = tree.compose("gcc").unwrap_err();
  assert!(matches!(err, ComposeError::MalformedOverride { .. }), "{:?}", err);
}

#[test]
fn projects_cannot_write_governed_fields() {
  let tree = ProjectTree::standard();
  tree.write("sample/tutorial2/prj.lua", r#"prj.show_brief()"#);

  let err = tree.compose("gcc").unwrap_err();
  match err {
    ComposeError::Descriptor { path, source, .. } => {
      assert_eq!(path, "sample/tutorial2/prj.lua");
      assert!(source.to_string().contains("only be called from the local override descriptor"));
    }
    other => panic!("expected descriptor failure, got {:?}", other),
  }
}
