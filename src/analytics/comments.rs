//! Comment-activity analytics and the rule-based discussion digest.

use crate::model::{Issue, Status};

/// Comment volume at or above this marks an item as a discussion hotspot
const HIGH_ACTIVITY_THRESHOLD: u32 = 5;

/// Digest categories offered as tabs in the comments popover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentCategory {
  Risks,
  Updates,
  Questions,
  Other,
}

impl CommentCategory {
  pub const ALL: [CommentCategory; 4] = [
    CommentCategory::Risks,
    CommentCategory::Updates,
    CommentCategory::Questions,
    CommentCategory::Other,
  ];

  pub fn label(&self) -> &'static str {
    match self {
      CommentCategory::Risks => "Risks",
      CommentCategory::Updates => "Updates",
      CommentCategory::Questions => "Questions",
      CommentCategory::Other => "Other",
    }
  }
}

/// A heavily-discussed item surfaced in the risks digest
#[derive(Debug, Clone)]
pub struct Hotspot {
  pub issue_key: String,
  pub summary: String,
  pub comments: u32,
}

#[derive(Debug, Clone)]
pub struct CommentsSummary {
  pub total_comments: u32,
  /// Issues with at least one comment
  pub active_issues: usize,
  pub avg_per_active: f64,
  pub hotspots: Vec<Hotspot>,
  pub in_progress_discussions: usize,
  pub todo_question_count: u32,
  pub todo_discussions: usize,
  pub completed_with_discussion: usize,
}

impl CommentsSummary {
  pub fn has_data(&self) -> bool {
    self.total_comments > 0
  }
}

pub fn comments_summary(issues: &[&Issue]) -> CommentsSummary {
  let commented: Vec<&&Issue> = issues.iter().filter(|i| i.comments > 0).collect();

  let mut hotspots: Vec<Hotspot> = commented
    .iter()
    .filter(|i| i.comments >= HIGH_ACTIVITY_THRESHOLD)
    .map(|i| Hotspot {
      issue_key: i.key.clone(),
      summary: i.summary.clone(),
      comments: i.comments,
    })
    .collect();
  hotspots.sort_by(|a, b| b.comments.cmp(&a.comments));

  let active_issues = commented.len();
  let total_comments: u32 = issues.iter().map(|i| i.comments).sum();

  CommentsSummary {
    total_comments,
    active_issues,
    avg_per_active: if active_issues > 0 {
      total_comments as f64 / active_issues as f64
    } else {
      0.0
    },
    hotspots,
    in_progress_discussions: commented
      .iter()
      .filter(|i| i.status == Status::InProgress)
      .count(),
    todo_question_count: issues
      .iter()
      .filter(|i| i.status == Status::Todo)
      .map(|i| i.comments)
      .sum(),
    todo_discussions: commented.iter().filter(|i| i.status == Status::Todo).count(),
    completed_with_discussion: commented.iter().filter(|i| i.status == Status::Done).count(),
  }
}

/// Produce the digest paragraph for one category. Pure text generation from
/// the aggregates, in the voice of a standup summary.
pub fn digest(summary: &CommentsSummary, category: CommentCategory) -> String {
  match category {
    CommentCategory::Risks => match summary.hotspots.first() {
      None => "No significant risks detected in current discussions. Comment activity looks \
               like routine clarification and status updates."
        .to_string(),
      Some(hot) => format!(
        "{} \"{}\" has {} comments, which usually signals blockers or confusion. Consider a \
         focused discussion to resolve open concerns before dependent work slips.",
        hot.issue_key, hot.summary, hot.comments
      ),
    },
    CommentCategory::Updates => {
      if summary.in_progress_discussions == 0 {
        "No active work items are generating status discussion right now. That can mean smooth \
         progress, or missing check-ins."
          .to_string()
      } else {
        format!(
          "{} in-progress item{} generating regular status updates and coordination \
           discussion. Communication cadence looks healthy.",
          summary.in_progress_discussions,
          if summary.in_progress_discussions == 1 {
            " is"
          } else {
            "s are"
          }
        )
      }
    }
    CommentCategory::Questions => {
      if summary.todo_question_count == 0 {
        "Upcoming work has no outstanding clarification requests. Requirements look well \
         defined for the queue."
          .to_string()
      } else {
        format!(
          "{} upcoming item{} accumulated {} clarification request{}. Consider pre-work \
           sessions so questions are answered before implementation starts.",
          summary.todo_discussions,
          if summary.todo_discussions == 1 {
            " has"
          } else {
            "s have"
          },
          summary.todo_question_count,
          if summary.todo_question_count == 1 {
            ""
          } else {
            "s"
          }
        )
      }
    }
    CommentCategory::Other => format!(
      "Comment activity averages {:.1} discussions per active item. {} completed item{} had \
       ongoing discussion through delivery, which suggests collaboration held up to the end.",
      summary.avg_per_active,
      summary.completed_with_discussion,
      if summary.completed_with_discussion == 1 {
        ""
      } else {
        "s"
      }
    ),
  }
}
