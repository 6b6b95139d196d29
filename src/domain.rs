//! Domain models for the problem editor: difficulty/tag/language enums,
//! test cases, code scaffolds, and the edit draft itself.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Difficulty of a problem, as stored by the problem service.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}
impl Default for Difficulty {
  fn default() -> Self { Difficulty::Easy }
}
impl std::fmt::Display for Difficulty {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Difficulty::Easy => write!(f, "easy"),
      Difficulty::Medium => write!(f, "medium"),
      Difficulty::Hard => write!(f, "hard"),
    }
  }
}

/// Fixed tag catalog the admin can assign to a problem.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Tag {
  Array,
  LinkedList,
  Graph,
  Dp,
}
impl Default for Tag {
  fn default() -> Self { Tag::Array }
}
impl std::fmt::Display for Tag {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Tag::Array => write!(f, "array"),
      Tag::LinkedList => write!(f, "linkedList"),
      Tag::Graph => write!(f, "graph"),
      Tag::Dp => write!(f, "dp"),
    }
  }
}

/// Languages the editor maintains scaffolds for. Scaffold lists carry an
/// explicit language tag per entry and are normalized to `Language::ALL`
/// order before anything is written upstream.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Language {
  #[serde(rename = "C++")]
  Cpp,
  Java,
  #[serde(rename = "JavaScript")]
  JavaScript,
}
impl Language {
  /// Canonical editor order: C++, Java, JavaScript.
  pub const ALL: [Language; 3] = [Language::Cpp, Language::Java, Language::JavaScript];
}

/// Example shown to the solver. Explanation is optional.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VisibleCase {
  pub input: String,
  pub output: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub explanation: Option<String>,
}

/// Judge-only case, never shown to the solver.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HiddenCase {
  pub input: String,
  pub output: String,
}

/// Language-specific scaffold handed to the solver.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CodeStub {
  pub language: Language,
  #[serde(rename = "initialCode")]
  pub initial_code: String,
}

/// Canonical correct solution per language, used by the judge.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SolutionEntry {
  pub language: Language,
  #[serde(rename = "completeCode")]
  pub complete_code: String,
}

/// The edit form model. Created fresh per selection, mutated only by the
/// admin, serialized as-is as the upstream update body (camelCase wire
/// names mirror the problem service schema).
#[derive(Clone, Debug, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDraft {
  #[validate(length(min = 1, message = "Title is required"))]
  pub title: String,
  #[validate(length(min = 1, message = "Description is required"))]
  pub description: String,
  #[serde(default)]
  pub difficulty: Difficulty,
  #[serde(default)]
  pub tags: Tag,
  #[serde(default)]
  #[validate(length(min = 1, message = "At least one visible test case is required"))]
  pub visible_test_cases: Vec<VisibleCase>,
  #[serde(default)]
  pub hidden_test_cases: Vec<HiddenCase>,
  #[serde(default)]
  pub start_code: Vec<CodeStub>,
  #[serde(default)]
  pub reference_solution: Vec<SolutionEntry>,
}

/// One row of the problem list, as returned by the upstream list endpoint.
/// Unknown extra fields are ignored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProblemSummary {
  #[serde(rename = "_id")]
  pub id: String,
  pub title: String,
  #[serde(default)]
  pub difficulty: Option<Difficulty>,
  #[serde(default)]
  pub tags: Option<Tag>,
}

/// Full admin-scoped detail response. Every field is optional so that a
/// sparse upstream document still deserializes; seeding substitutes the
/// documented default for each absent field.
#[derive(Clone, Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetail {
  #[serde(rename = "_id", default)]
  pub id: Option<String>,
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub difficulty: Option<Difficulty>,
  #[serde(default)]
  pub tags: Option<Tag>,
  #[serde(default)]
  pub visible_test_cases: Option<Vec<VisibleCase>>,
  #[serde(default)]
  pub hidden_test_cases: Option<Vec<HiddenCase>>,
  #[serde(default)]
  pub start_code: Option<Vec<CodeStub>>,
  #[serde(default)]
  pub reference_solution: Option<Vec<SolutionEntry>>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn enums_use_upstream_wire_names() {
    assert_eq!(serde_json::to_string(&Difficulty::Medium).unwrap(), "\"medium\"");
    assert_eq!(serde_json::to_string(&Tag::LinkedList).unwrap(), "\"linkedList\"");
    assert_eq!(serde_json::to_string(&Language::Cpp).unwrap(), "\"C++\"");
    assert_eq!(serde_json::to_string(&Language::JavaScript).unwrap(), "\"JavaScript\"");
    let d: Difficulty = serde_json::from_str("\"hard\"").unwrap();
    assert_eq!(d, Difficulty::Hard);
    let t: Tag = serde_json::from_str("\"dp\"").unwrap();
    assert_eq!(t, Tag::Dp);
  }

  #[test]
  fn draft_serializes_camel_case() {
    let draft = ProblemDraft {
      title: "Two Sum".into(),
      description: "Find two numbers adding to target.".into(),
      difficulty: Difficulty::Easy,
      tags: Tag::Array,
      visible_test_cases: vec![VisibleCase {
        input: "[2,7] 9".into(),
        output: "[0,1]".into(),
        explanation: None,
      }],
      hidden_test_cases: vec![],
      start_code: vec![CodeStub { language: Language::Java, initial_code: String::new() }],
      reference_solution: vec![],
    };
    let v = serde_json::to_value(&draft).unwrap();
    assert!(v.get("visibleTestCases").is_some());
    assert!(v.get("hiddenTestCases").is_some());
    assert!(v.get("startCode").is_some());
    assert!(v.get("referenceSolution").is_some());
    assert_eq!(v["startCode"][0]["initialCode"], "");
    assert_eq!(v["startCode"][0]["language"], "Java");
    // Absent explanation is omitted, not null.
    assert!(v["visibleTestCases"][0].get("explanation").is_none());
  }

  #[test]
  fn sparse_detail_deserializes() {
    let detail: ProblemDetail =
      serde_json::from_str(r#"{"_id":"p1","title":"Two Sum"}"#).unwrap();
    assert_eq!(detail.id.as_deref(), Some("p1"));
    assert_eq!(detail.title.as_deref(), Some("Two Sum"));
    assert!(detail.hidden_test_cases.is_none());
    assert!(detail.start_code.is_none());
  }

  #[test]
  fn summary_tolerates_extra_fields() {
    let s: ProblemSummary = serde_json::from_str(
      r#"{"_id":"p2","title":"BFS","difficulty":"medium","tags":"graph","solvedBy":12}"#,
    )
    .unwrap();
    assert_eq!(s.id, "p2");
    assert_eq!(s.difficulty, Some(Difficulty::Medium));
    assert_eq!(s.tags, Some(Tag::Graph));
  }
}
