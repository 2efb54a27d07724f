use tracing::trace;

use super::{BuildConfig, ObjPlacement, RuntimeMode};

/// Mutable, append-only view over a [`BuildConfig`] during one composition run.
///
/// List operations always append at the current position. Single-valued setters
/// are last-write-wins; keeping to one writer per field is the caller's job.
#[derive(Debug, Default)]
pub struct ConfigAccumulator {
  config: BuildConfig,
}

impl ConfigAccumulator {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_include_path(&mut self, path: impl Into<String>) {
    let path = path.into();
    trace!(%path, "include path");
    self.config.include_paths.push(path);
  }

  pub fn add_compiler_option(&mut self, option: impl Into<String>) {
    let option = option.into();
    trace!(%option, "compiler option");
    self.config.compiler_options.push(option);
  }

  pub fn add_linker_option(&mut self, option: impl Into<String>) {
    let option = option.into();
    trace!(%option, "linker option");
    self.config.linker_options.push(option);
  }

  pub fn add_define(&mut self, name: &str, value: Option<&str>) {
    let define = match value {
      Some(value) => format!("{}={}", name, value),
      None => name.to_string(),
    };
    trace!(%define, "define");
    self.config.defines.push(define);
  }

  pub fn set_cpp_std(&mut self, std: impl Into<String>) {
    self.config.cpp_std = Some(std.into());
  }

  pub fn set_runtime_mode(&mut self, mode: RuntimeMode) {
    self.config.runtime_mode = Some(mode);
  }

  pub fn set_obj_placement(&mut self, placement: ObjPlacement) {
    self.config.obj_placement = Some(placement);
  }

  pub fn enable_show_brief(&mut self) {
    self.config.show_brief = true;
  }

  /// Read access for code that needs to inspect what has been accumulated so far.
  pub fn current(&self) -> &BuildConfig {
    &self.config
  }

  /// Consume the accumulator; no further mutation is possible.
  pub fn finalize(self) -> BuildConfig {
    self.config
  }
}
