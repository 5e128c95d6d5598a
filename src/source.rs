//! Issue fixture ingestion.
//!
//! The dashboard consumes any JSON document matching the raw schema below; it
//! does not care whether that came from an export, a future API, or the
//! embedded sample. Raw serde types are converted into domain types at this
//! boundary: dates are parsed once, statuses validated, and assignees
//! interned into a shared roster so every issue assigned to the same person
//! holds the same `Arc`.

use crate::compute::parse_date;
use crate::model::{Assignee, Dependency, DependencyKind, Issue, Status};
use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// Self-contained demo dataset so the binary runs with zero setup
const SAMPLE: &str = include_str!("../data/issues.json");

/// The loaded collection plus the interned assignee roster that owns the
/// people records.
#[derive(Debug)]
pub struct Portfolio {
  pub issues: Vec<Issue>,
  pub roster: Vec<Arc<Assignee>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAssignee {
  id: String,
  name: String,
  #[serde(default)]
  avatar: String,
  #[serde(default)]
  email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDependency {
  #[serde(rename = "type")]
  kind: String,
  target_issue_id: String,
  target_issue_key: String,
  target_issue_status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIssue {
  id: String,
  key: String,
  summary: String,
  status: String,
  assignee: RawAssignee,
  start_date: String,
  target_date: String,
  due_date: String,
  actual_start_date: Option<String>,
  actual_due_date: Option<String>,
  #[serde(default)]
  comments: u32,
  #[serde(default)]
  dependencies: Vec<RawDependency>,
  budget: Option<f64>,
  story_points: Option<f64>,
  original_estimate: Option<f64>,
  remaining_estimate: Option<f64>,
  time_spent: Option<f64>,
  effort: Option<f64>,
  effort_remaining: Option<f64>,
}

/// Load issues from the given path, or the embedded sample when none is set
pub fn load(path: Option<&Path>) -> Result<Portfolio> {
  let contents = match path {
    Some(p) => std::fs::read_to_string(p)
      .map_err(|e| eyre!("Failed to read issue data {}: {}", p.display(), e))?,
    None => SAMPLE.to_string(),
  };
  parse(&contents)
}

/// Parse and convert a JSON issue document
pub fn parse(contents: &str) -> Result<Portfolio> {
  let raw: Vec<RawIssue> =
    serde_json::from_str(contents).map_err(|e| eyre!("Invalid issue data: {}", e))?;
  convert(raw)
}

fn convert(raw: Vec<RawIssue>) -> Result<Portfolio> {
  let mut roster: Vec<Arc<Assignee>> = Vec::new();
  let mut issues = Vec::with_capacity(raw.len());

  for item in raw {
    let assignee = intern(&mut roster, item.assignee);

    let required_date = |field: &str, value: &str| {
      parse_date(value)
        .ok_or_else(|| eyre!("Issue {}: invalid {} \"{}\"", item.key, field, value))
    };

    let dependencies = item
      .dependencies
      .into_iter()
      .map(|dep| {
        Ok(Dependency {
          kind: parse_dependency_kind(&dep.kind)
            .ok_or_else(|| eyre!("Issue {}: unknown dependency type \"{}\"", item.key, dep.kind))?,
          target_status: parse_status(&dep.target_issue_status).ok_or_else(|| {
            eyre!(
              "Issue {}: unknown dependency status \"{}\"",
              item.key,
              dep.target_issue_status
            )
          })?,
          target_issue_id: dep.target_issue_id,
          target_issue_key: dep.target_issue_key,
        })
      })
      .collect::<Result<Vec<_>>>()?;

    issues.push(Issue {
      status: parse_status(&item.status)
        .ok_or_else(|| eyre!("Issue {}: unknown status \"{}\"", item.key, item.status))?,
      assignee,
      start_date: required_date("startDate", &item.start_date)?,
      target_date: required_date("targetDate", &item.target_date)?,
      due_date: required_date("dueDate", &item.due_date)?,
      // Optional dates degrade silently: an unparsable value reads as absent
      actual_start_date: item.actual_start_date.as_deref().and_then(parse_date),
      actual_due_date: item.actual_due_date.as_deref().and_then(parse_date),
      id: item.id,
      key: item.key,
      summary: item.summary,
      comments: item.comments,
      dependencies,
      budget: item.budget,
      story_points: item.story_points,
      original_estimate: item.original_estimate,
      remaining_estimate: item.remaining_estimate,
      time_spent: item.time_spent,
      effort: item.effort,
      effort_remaining: item.effort_remaining,
    });
  }

  Ok(Portfolio { issues, roster })
}

fn intern(roster: &mut Vec<Arc<Assignee>>, raw: RawAssignee) -> Arc<Assignee> {
  if let Some(existing) = roster.iter().find(|a| a.id == raw.id) {
    return existing.clone();
  }
  let assignee = Arc::new(Assignee {
    id: raw.id,
    name: raw.name,
    avatar: raw.avatar,
    email: raw.email,
  });
  roster.push(assignee.clone());
  assignee
}

fn parse_status(s: &str) -> Option<Status> {
  match s {
    "TO DO" | "TODO" | "To Do" => Some(Status::Todo),
    "IN PROGRESS" | "IN_PROGRESS" | "In Progress" => Some(Status::InProgress),
    "DONE" | "Done" => Some(Status::Done),
    _ => None,
  }
}

fn parse_dependency_kind(s: &str) -> Option<DependencyKind> {
  match s {
    "blocks" => Some(DependencyKind::Blocks),
    "is-blocked-by" => Some(DependencyKind::IsBlockedBy),
    "relates-to" => Some(DependencyKind::RelatesTo),
    _ => None,
  }
}
