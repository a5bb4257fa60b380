//! Acknowledgement bodies for writes that do not return a record.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Ack {
  pub message:  String,
  /// Rows created or changed by the request.
  pub affected: usize,
  /// Set only by the assignment update, where a team/assignment mismatch is
  /// a silent no-op.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub updated:  Option<bool>,
}

impl Ack {
  pub fn new(message: impl Into<String>, affected: usize) -> Self {
    Self { message: message.into(), affected, updated: None }
  }
}
