use prjcomp_lib::compose::{ComposeOptions, CompositeTarget};
use prjcomp_lib::error::ComposeError;
use prjcomp_lib::graph::GraphError;
use prjcomp_lib::toolset::Toolset;

use super::common::{ProjectTree, target_descriptor};

fn root_requiring(refs: &[&str]) -> String {
  let list = refs.iter().map(|r| format!("{:?}", r)).collect::<Vec<_>>().join(", ");
  format!("return {{ required = {{ {} }} }}", list)
}

#[test]
fn nested_references_expand_in_place() {
  let tree = ProjectTree::new();
  tree.write("build.lua", &root_requiring(&["a.lua", "b.lua", "c.lua"]));
  tree.write("a.lua", r#"prj.required("a1.lua") prj.required("a2.lua")"#);
  tree.write("a1.lua", r#"prj.required("a1x.lua")"#);
  tree.write("a1x.lua", "");
  tree.write("a2.lua", "");
  tree.write("b.lua", "");
  tree.write("c.lua", r#"prj.required("c1.lua")"#);
  tree.write("c1.lua", "");

  let plan = tree.compose("gcc").unwrap();
  assert_eq!(
    plan.references(),
    vec!["a.lua", "a1.lua", "a1x.lua", "a2.lua", "b.lua", "c.lua", "c1.lua"]
  );

  let a1x = plan.unit("a1x.lua").unwrap();
  assert_eq!(a1x.depth, 2);
  assert_eq!(a1x.parent.as_deref(), Some("a1.lua"));
  assert_eq!(plan.unit("a.lua").unwrap().parent, None);
}

#[test]
fn parent_contributions_precede_nested_ones() {
  let tree = ProjectTree::new();
  tree.write("build.lua", &root_requiring(&["parent.lua", "sibling.lua"]));
  tree.write(
    "parent.lua",
    r#"
    prj.required("child.lua")
    prj.global_compiler_option("-parent")
    "#,
  );
  tree.write("child.lua", r#"prj.global_compiler_option("-child")"#);
  tree.write("sibling.lua", r#"prj.global_compiler_option("-sibling")"#);

  let plan = tree.compose("msvc").unwrap();
  assert_eq!(plan.config.compiler_options, vec!["-parent", "-child", "-sibling"]);
}

#[test]
fn nested_paths_resolve_against_run_directory() {
  let tree = ProjectTree::new();
  tree.write("build.lua", &root_requiring(&["test/build_tests.lua"]));
  tree.write("test/build_tests.lua", r#"prj.required("test/so_5/prj.lua")"#);
  tree.write("test/so_5/prj.lua", &target_descriptor("test.so_5"));

  let plan = tree.compose("gcc").unwrap();
  assert_eq!(plan.references(), vec!["test/build_tests.lua", "test/so_5/prj.lua"]);
}

#[test]
fn duplicate_references_yield_one_unit() {
  let tree = ProjectTree::new();
  tree.write("build.lua", &root_requiring(&["common.lua", "a.lua", "common.lua"]));
  tree.write("common.lua", r#"prj.global_define("COMMON")"#);
  tree.write("a.lua", r#"prj.required("./common.lua")"#);

  let plan = tree.compose("gcc").unwrap();
  assert_eq!(plan.references(), vec!["common.lua", "a.lua"]);
  assert_eq!(plan.config.defines, vec!["COMMON"]);
}

#[test]
fn self_reference_is_a_cycle() {
  let tree = ProjectTree::new();
  tree.write("build.lua", &root_requiring(&["loop.lua"]));
  tree.write("loop.lua", r#"prj.required("loop.lua")"#);

  let err = tree.compose("gcc").unwrap_err();
  match err {
    ComposeError::Graph(GraphError::Cycle { chain }) => {
      assert_eq!(chain, "build.lua -> loop.lua -> loop.lua");
    }
    other => panic!("expected cycle, got {:?}", other),
  }
}

#[test]
fn indirect_cycle_names_whole_chain() {
  let tree = ProjectTree::new();
  tree.write("build.lua", &root_requiring(&["a.lua"]));
  tree.write("a.lua", r#"prj.required("b.lua")"#);
  tree.write("b.lua", r#"prj.required("a.lua")"#);

  let err = tree.compose("gcc").unwrap_err();
  assert!(
    err.to_string().contains("build.lua -> a.lua -> b.lua -> a.lua"),
    "{}",
    err
  );
}

#[test]
fn requiring_the_root_is_a_cycle() {
  let tree = ProjectTree::new();
  tree.write("build.lua", &root_requiring(&["a.lua"]));
  tree.write("a.lua", r#"prj.required("build.lua")"#);

  let err = tree.compose("gcc").unwrap_err();
  assert!(matches!(err, ComposeError::Graph(GraphError::Cycle { .. })), "{:?}", err);
}

#[test]
fn depth_limit_is_enforced() {
  let tree = ProjectTree::new();
  tree.write("build.lua", &root_requiring(&["d0.lua"]));
  for i in 0..5 {
    tree.write(&format!("d{}.lua", i), &format!(r#"prj.required("d{}.lua")"#, i + 1));
  }
  tree.write("d5.lua", "");

  let options = ComposeOptions {
    max_depth: 3,
    ..ComposeOptions::default()
  };
  let err = CompositeTarget::load(&tree.root())
    .unwrap()
    .compose(&Toolset::new("gcc"), &options)
    .unwrap_err();
  assert!(matches!(err, ComposeError::Graph(GraphError::TooDeep { max: 3, .. })), "{:?}", err);

  assert_eq!(tree.compose("gcc").unwrap().units.len(), 6);
}

#[test]
fn missing_reference_reports_path_and_position() {
  let tree = ProjectTree::standard();
  tree.write(
    "build.lua",
    &root_requiring(&["test/build_tests.lua", "sample/tutorial1/prj.lua", "sample/tutorial13/prj.lua"]),
  );

  let err = tree.compose("gcc").unwrap_err();
  match &err {
    ComposeError::ReferenceNotFound { path, position, chain, .. } => {
      assert_eq!(path, "sample/tutorial13/prj.lua");
      assert_eq!(*position, 3);
      assert_eq!(chain, "build.lua");
    }
    other => panic!("expected missing reference, got {:?}", other),
  }
  assert!(err.to_string().contains("reference #3 in build.lua"), "{}", err);
}

#[test]
fn missing_nested_reference_reports_chain() {
  let tree = ProjectTree::new();
  tree.write("build.lua", &root_requiring(&["test/build_tests.lua"]));
  tree.write("test/build_tests.lua", r#"prj.required("test/a.lua") prj.required("test/gone.lua")"#);
  tree.write("test/a.lua", "");

  let err = tree.compose("gcc").unwrap_err();
  match err {
    ComposeError::ReferenceNotFound { position, chain, .. } => {
      assert_eq!(position, 2);
      assert_eq!(chain, "build.lua -> test/build_tests.lua");
    }
    other => panic!("expected missing reference, got {:?}", other),
  }
}

#[test]
fn first_failure_in_declaration_order_wins() {
  let tree = ProjectTree::new();
  tree.write("build.lua", &root_requiring(&["ok.lua", "bad.lua", "missing.lua"]));
  tree.write("ok.lua", "");
  tree.write("bad.lua", r#"error("broken descriptor")"#);

  let err = tree.compose("gcc").unwrap_err();
  match err {
    ComposeError::Descriptor { path, position, source, .. } => {
      assert_eq!(path, "bad.lua");
      assert_eq!(position, 2);
      assert!(source.to_string().contains("broken descriptor"));
    }
    other => panic!("expected descriptor failure, got {:?}", other),
  }
}

#[test]
fn directory_reference_is_not_found() {
  let tree = ProjectTree::new();
  tree.write("build.lua", &root_requiring(&["sample"]));
  tree.write("sample/prj.lua", "");

  let err = tree.compose("gcc").unwrap_err();
  assert!(matches!(err, ComposeError::ReferenceNotFound { .. }), "{:?}", err);
}
