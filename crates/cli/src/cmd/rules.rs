//! Implementation of the `prjcomp rules` command.

use anyhow::Result;

use prjcomp_lib::toolset::{Toolset, builtin_rules};

use crate::output::{print_info, print_skipped, print_stat, print_success};

pub fn cmd_rules(toolset: &str) -> Result<()> {
  let toolset = Toolset::new(toolset);
  print_info(&format!("Built-in rules for toolset '{}'", toolset));

  let mut fired = 0;
  for rule in builtin_rules() {
    if rule.when.matches(&toolset) {
      fired += 1;
      print_success(&rule.when.to_string());
      for contribution in &rule.contributions {
        print_stat("contributes", &contribution.to_string());
      }
    } else {
      print_skipped(&rule.when.to_string());
    }
  }

  if fired == 0 {
    print_info("No rules fire; no toolset options are contributed");
  }
  Ok(())
}
