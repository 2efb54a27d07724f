use std::collections::HashSet;
use std::path::{Path, PathBuf};

use mlua::prelude::*;
use tracing::{debug, trace};

use super::{FrameKind, GraphError, ProjectReference, ResolvedUnit, SharedSession, UnitFrame};
use crate::error::ComposeError;
use crate::lua::loaders;

#[derive(Debug)]
struct StackEntry {
  reference: String,
  canonical: PathBuf,
}

/// Depth-first evaluator for one run's reference graph.
///
/// Holds the evaluation stack (for cycle detection and error chains) and the set
/// of descriptors already evaluated in this run.
pub struct ProjectGraph<'a> {
  lua: &'a Lua,
  session: SharedSession,
  run_dir: &'a Path,
  max_depth: usize,
  stack: Vec<StackEntry>,
  base: usize,
  visited: HashSet<PathBuf>,
}

impl<'a> ProjectGraph<'a> {
  pub fn new(lua: &'a Lua, session: SharedSession, run_dir: &'a Path, max_depth: usize) -> Self {
    Self {
      lua,
      session,
      run_dir,
      max_depth,
      stack: Vec::new(),
      base: 0,
      visited: HashSet::new(),
    }
  }

  /// Put the root descriptor at the bottom of the stack.
  ///
  /// The root produces no unit, but a descriptor requiring it is reported as a cycle
  /// and error chains start with `label`.
  pub fn with_root(mut self, label: impl Into<String>, canonical: PathBuf) -> Self {
    self.stack.push(StackEntry {
      reference: label.into(),
      canonical,
    });
    self.base = self.stack.len();
    self
  }

  /// Evaluate `references` in order and return the flattened units.
  pub fn evaluate_all(&mut self, references: &[ProjectReference]) -> Result<Vec<ResolvedUnit>, ComposeError> {
    let mut units = Vec::new();
    self.visit_all(references, &mut units)?;
    Ok(units)
  }

  /// Evaluate the local override descriptor.
  ///
  /// The override itself yields no unit; references it requires are traversed
  /// like any others and their units returned.
  pub fn evaluate_override(&mut self, reference: &ProjectReference) -> Result<Vec<ResolvedUnit>, ComposeError> {
    let mut units = Vec::new();
    self.visit(reference, 1, FrameKind::Override, &mut units)?;
    Ok(units)
  }

  fn visit_all(&mut self, references: &[ProjectReference], out: &mut Vec<ResolvedUnit>) -> Result<(), ComposeError> {
    for (i, reference) in references.iter().enumerate() {
      self.visit(reference, i + 1, FrameKind::Project, out)?;
    }
    Ok(())
  }

  fn visit(
    &mut self,
    reference: &ProjectReference,
    position: usize,
    kind: FrameKind,
    out: &mut Vec<ResolvedUnit>,
  ) -> Result<(), ComposeError> {
    let resolved = self.resolve_path(&reference.path);
    let canonical = match dunce::canonicalize(&resolved) {
      Ok(p) if p.is_file() => p,
      _ => {
        return Err(ComposeError::ReferenceNotFound {
          path: reference.path.clone(),
          resolved,
          position,
          chain: self.chain(),
        });
      }
    };

    if self.stack.iter().any(|e| e.canonical == canonical) {
      return Err(
        GraphError::Cycle {
          chain: self.chain_with(&reference.path),
        }
        .into(),
      );
    }

    let depth = self.stack.len() - self.base;
    if depth >= self.max_depth {
      return Err(
        GraphError::TooDeep {
          max: self.max_depth,
          chain: self.chain_with(&reference.path),
        }
        .into(),
      );
    }

    if !self.visited.insert(canonical.clone()) {
      debug!(reference = %reference, "descriptor already evaluated, skipping");
      return Ok(());
    }

    debug!(reference = %reference, depth, "evaluating descriptor");
    let frame = self
      .evaluate_descriptor(&canonical, kind)
      .map_err(|source| ComposeError::Descriptor {
        path: reference.path.clone(),
        position,
        chain: self.chain(),
        source,
      })?;

    if kind == FrameKind::Project {
      let parent = if depth > 0 {
        self.stack.last().map(|e| e.reference.clone())
      } else {
        None
      };
      out.push(ResolvedUnit {
        reference: reference.path.clone(),
        descriptor: canonical.clone(),
        parent,
        depth,
        target: frame.target,
        local: frame.local,
      });
    }

    if frame.required.is_empty() {
      return Ok(());
    }

    trace!(reference = %reference, count = frame.required.len(), "descending into required projects");
    self.stack.push(StackEntry {
      reference: reference.path.clone(),
      canonical,
    });
    let result = self.visit_all(&frame.required, out);
    self.stack.pop();
    result
  }

  /// Run one descriptor with a fresh frame and hand the frame back.
  fn evaluate_descriptor(&self, path: &Path, kind: FrameKind) -> LuaResult<UnitFrame> {
    self.session.borrow_mut().frame = Some(UnitFrame::new(kind));
    let result = loaders::load_file_with_dir(self.lua, path);
    let frame = self.session.borrow_mut().frame.take();
    result?;
    frame.ok_or_else(|| LuaError::external("descriptor frame was lost during evaluation"))
  }

  fn resolve_path(&self, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.run_dir.join(path)
    }
  }

  fn chain(&self) -> String {
    if self.stack.is_empty() {
      return "<root>".to_string();
    }
    self
      .stack
      .iter()
      .map(|e| e.reference.as_str())
      .collect::<Vec<_>>()
      .join(" -> ")
  }

  fn chain_with(&self, last: &str) -> String {
    if self.stack.is_empty() {
      return last.to_string();
    }
    format!("{} -> {}", self.chain(), last)
  }
}
