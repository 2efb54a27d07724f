//! Implementation of the `prjcomp plan` command.
//!
//! Composes the root descriptor for the given toolset and prints the finalized
//! configuration followed by the units in build order.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use prjcomp_lib::compose::{ComposeOptions, CompositeTarget};
use prjcomp_lib::overrides::DefaultsSource;
use prjcomp_lib::plan::BuildPlan;
use prjcomp_lib::toolset::Toolset;
use prjcomp_lib::util::hash::Hashable;

use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success, symbols};

pub fn cmd_plan(file: &Path, toolset: &str, format: OutputFormat) -> Result<()> {
  let target = CompositeTarget::load(file).with_context(|| format!("Failed to load root descriptor: {}", file.display()))?;

  let plan = target
    .compose(&Toolset::new(toolset), &ComposeOptions::default())
    .with_context(|| format!("Failed to compose {}", file.display()))?;
  debug!(units = plan.units.len(), "plan composed");

  if format.is_json() {
    return print_json(&plan);
  }

  let hash = plan.compute_hash().context("Failed to compute plan fingerprint")?;
  print_info(&format!("Plan: {}", hash));
  print_settings(&plan);

  println!();
  print_success(&format!("Units: {}", plan.units.len()));
  if plan.config.show_brief {
    for unit in &plan.units {
      println!("  {} {}", symbols::ARROW, unit.reference);
    }
  } else {
    print_units(&plan);
  }

  Ok(())
}

fn print_settings(plan: &BuildPlan) {
  let config = &plan.config;
  if let Some(name) = &plan.name {
    print_stat("Name", name);
  }
  print_stat("Toolset", &plan.toolset.name);
  let defaults = match &plan.defaults {
    DefaultsSource::BuiltinDefaults => "built-in".to_string(),
    DefaultsSource::LocalOverride(path) => format!("local override ({})", path.display()),
  };
  print_stat("Defaults", &defaults);
  print_stat(
    "Runtime mode",
    config.runtime_mode.map(|m| m.as_str()).unwrap_or("(unset)"),
  );
  print_stat("Object placement", &config.effective_placement().to_string());
  if let Some(std) = &config.cpp_std {
    print_stat("C++ standard", std);
  }
  print_stat("Include paths", &join(&config.include_paths));
  print_stat("Compiler options", &join(&config.compiler_options));
  print_stat("Linker options", &join(&config.linker_options));
  if !config.defines.is_empty() {
    print_stat("Defines", &join(&config.defines));
  }
}

fn print_units(plan: &BuildPlan) {
  for (i, unit) in plan.units.iter().enumerate() {
    let indent = "  ".repeat(unit.depth);
    match &unit.target {
      Some(target) => println!(
        "  {}{}. {} {} {} ({})",
        indent,
        i + 1,
        unit.reference,
        symbols::ARROW,
        target.name,
        target.kind
      ),
      None => println!("  {}{}. {}", indent, i + 1, unit.reference),
    }
    if unit.target.is_some() {
      println!("  {}   objects: {}", indent, plan.obj_dir(unit).display());
      println!("  {}   output:  {}", indent, plan.target_dir(unit).display());
    }
    if !unit.local.is_empty() {
      let mut local = Vec::new();
      local.extend(unit.local.include_paths.iter().map(|p| format!("-I{}", p)));
      local.extend(unit.local.compiler_options.iter().cloned());
      local.extend(unit.local.linker_options.iter().cloned());
      local.extend(unit.local.libs.iter().map(|l| format!("-l{}", l)));
      println!("  {}   local:   {}", indent, local.join(" "));
    }
  }
}

fn join(values: &[String]) -> String {
  if values.is_empty() {
    "(none)".to_string()
  } else {
    values.join(" ")
  }
}
