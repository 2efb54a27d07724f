//! Mutable state shared between the traversal and the Lua `prj` functions.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::ConfigAccumulator;

use super::{LocalConfig, ProjectReference, TargetDecl};

/// What kind of descriptor is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
  /// The local override; the only descriptor allowed to write defaults-governed fields.
  Override,
  Project,
}

/// Everything a single descriptor declares about itself while it runs.
#[derive(Debug)]
pub struct UnitFrame {
  pub kind: FrameKind,
  pub target: Option<TargetDecl>,
  pub local: LocalConfig,
  /// References queued with `prj.required`, evaluated after the descriptor returns.
  pub required: Vec<ProjectReference>,
}

impl UnitFrame {
  pub fn new(kind: FrameKind) -> Self {
    Self {
      kind,
      target: None,
      local: LocalConfig::default(),
      required: Vec::new(),
    }
  }
}

/// One composition run's accumulator plus the frame of the descriptor being evaluated.
///
/// Descriptors never nest while running (nested references are deferred), so a
/// single optional frame is enough.
#[derive(Debug, Default)]
pub struct Session {
  pub config: ConfigAccumulator,
  pub frame: Option<UnitFrame>,
}

pub type SharedSession = Rc<RefCell<Session>>;

impl Session {
  pub fn shared() -> SharedSession {
    Rc::new(RefCell::new(Self::default()))
  }
}
