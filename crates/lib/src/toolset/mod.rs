//! Toolset identity and toolset-conditional option rules.
//!
//! A rule pairs a predicate over the toolset name with the options it contributes.
//! Rules are independent: every rule whose predicate holds fires, in declaration
//! order, so a toolset matching several predicates receives the union of their
//! contributions. A toolset matching nothing receives nothing.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ConfigAccumulator;

/// Identity of the active compiler/linker family, e.g. "gcc" or "clang".
///
/// Detection happens upstream; this crate only consumes the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Toolset {
  pub name: String,
}

impl Toolset {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into() }
  }
}

impl fmt::Display for Toolset {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name)
  }
}

/// Predicate over a toolset: holds when the name is one of `names`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsetPredicate {
  pub names: Vec<String>,
}

impl ToolsetPredicate {
  pub fn any_of<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      names: names.into_iter().map(Into::into).collect(),
    }
  }

  pub fn matches(&self, toolset: &Toolset) -> bool {
    self.names.iter().any(|n| *n == toolset.name)
  }
}

impl fmt::Display for ToolsetPredicate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "name in {{{}}}", self.names.join(", "))
  }
}

/// One accumulator call a rule makes when it fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Contribution {
  IncludePath(String),
  CompilerOption(String),
  LinkerOption(String),
}

impl Contribution {
  fn apply(&self, config: &mut ConfigAccumulator) {
    match self {
      Self::IncludePath(p) => config.add_include_path(p.as_str()),
      Self::CompilerOption(o) => config.add_compiler_option(o.as_str()),
      Self::LinkerOption(o) => config.add_linker_option(o.as_str()),
    }
  }
}

impl fmt::Display for Contribution {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::IncludePath(p) => write!(f, "include path {}", p),
      Self::CompilerOption(o) => write!(f, "compiler option {}", o),
      Self::LinkerOption(o) => write!(f, "linker option {}", o),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsetRule {
  pub when: ToolsetPredicate,
  pub contributions: Vec<Contribution>,
}

impl ToolsetRule {
  pub fn new(when: ToolsetPredicate, contributions: Vec<Contribution>) -> Self {
    Self { when, contributions }
  }
}

/// The built-in rules for GNU-compatible toolsets.
///
/// - gcc or clang: threading support, static C++ runtime, `$ORIGIN` rpath
/// - gcc: extra warnings
pub fn builtin_rules() -> Vec<ToolsetRule> {
  vec![
    ToolsetRule::new(
      ToolsetPredicate::any_of(["gcc", "clang"]),
      vec![
        Contribution::LinkerOption("-pthread".to_string()),
        Contribution::LinkerOption("-static-libstdc++".to_string()),
        Contribution::LinkerOption("-Wl,-rpath='$ORIGIN'".to_string()),
      ],
    ),
    ToolsetRule::new(
      ToolsetPredicate::any_of(["gcc"]),
      vec![
        Contribution::CompilerOption("-Wextra".to_string()),
        Contribution::CompilerOption("-Wall".to_string()),
      ],
    ),
  ]
}

/// Rules from `rules` that fire for `toolset`, in declaration order.
pub fn matching_rules<'a>(rules: &'a [ToolsetRule], toolset: &'a Toolset) -> impl Iterator<Item = &'a ToolsetRule> {
  rules.iter().filter(move |r| r.when.matches(toolset))
}

/// Apply every rule that fires for `toolset`. Returns the number of contributions made.
pub fn apply_rules(rules: &[ToolsetRule], toolset: &Toolset, config: &mut ConfigAccumulator) -> usize {
  let mut applied = 0;
  for rule in matching_rules(rules, toolset) {
    debug!(toolset = %toolset, predicate = %rule.when, "toolset rule fired");
    for contribution in &rule.contributions {
      contribution.apply(config);
      applied += 1;
    }
  }
  applied
}
