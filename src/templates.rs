//! Default content used when seeding an edit draft: the placeholder visible
//! case and the fixed three-language code scaffolds.

use crate::config::FormDefaults;
use crate::domain::{CodeStub, Language, SolutionEntry, VisibleCase};
use crate::util::non_empty;

/// The single placeholder case seeded when a detail response carries no
/// visible test cases.
pub fn placeholder_visible_case(defaults: &FormDefaults) -> VisibleCase {
  VisibleCase {
    input: defaults.placeholder_input.clone(),
    output: defaults.placeholder_output.clone(),
    explanation: non_empty(&defaults.placeholder_explanation),
  }
}

/// One starter stub per language, canonical order, boilerplate from config
/// (empty strings unless overridden).
pub fn scaffold_start_code(defaults: &FormDefaults) -> Vec<CodeStub> {
  Language::ALL
    .iter()
    .map(|&language| CodeStub { language, initial_code: defaults.boilerplate(language) })
    .collect()
}

/// Reference-solution counterpart of `scaffold_start_code`.
pub fn scaffold_reference_solution(defaults: &FormDefaults) -> Vec<SolutionEntry> {
  Language::ALL
    .iter()
    .map(|&language| SolutionEntry { language, complete_code: defaults.boilerplate(language) })
    .collect()
}

/// Normalize a starter list to exactly one entry per language in canonical
/// order. Provided code wins by language tag; the first entry wins on
/// duplicate tags; missing languages get the configured boilerplate.
pub fn normalize_start_code(given: Vec<CodeStub>, defaults: &FormDefaults) -> Vec<CodeStub> {
  Language::ALL
    .iter()
    .map(|&language| {
      given
        .iter()
        .find(|s| s.language == language)
        .cloned()
        .unwrap_or_else(|| CodeStub { language, initial_code: defaults.boilerplate(language) })
    })
    .collect()
}

/// Same normalization for reference solutions.
pub fn normalize_reference_solution(
  given: Vec<SolutionEntry>,
  defaults: &FormDefaults,
) -> Vec<SolutionEntry> {
  Language::ALL
    .iter()
    .map(|&language| {
      given
        .iter()
        .find(|s| s.language == language)
        .cloned()
        .unwrap_or_else(|| SolutionEntry { language, complete_code: defaults.boilerplate(language) })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scaffold_is_three_empty_entries_by_default() {
    let defaults = FormDefaults::default();
    let stubs = scaffold_start_code(&defaults);
    assert_eq!(stubs.len(), 3);
    assert_eq!(
      stubs.iter().map(|s| s.language).collect::<Vec<_>>(),
      vec![Language::Cpp, Language::Java, Language::JavaScript]
    );
    assert!(stubs.iter().all(|s| s.initial_code.is_empty()));
  }

  #[test]
  fn normalize_keeps_code_by_tag_and_restores_order() {
    let defaults = FormDefaults::default();
    // JavaScript first, C++ missing entirely.
    let given = vec![
      CodeStub { language: Language::JavaScript, initial_code: "function f() {}".into() },
      CodeStub { language: Language::Java, initial_code: "class S {}".into() },
    ];
    let out = normalize_start_code(given, &defaults);
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].language, Language::Cpp);
    assert_eq!(out[0].initial_code, "");
    assert_eq!(out[1].initial_code, "class S {}");
    assert_eq!(out[2].initial_code, "function f() {}");
  }

  #[test]
  fn normalize_drops_duplicate_tags() {
    let defaults = FormDefaults::default();
    let given = vec![
      SolutionEntry { language: Language::Java, complete_code: "first".into() },
      SolutionEntry { language: Language::Java, complete_code: "second".into() },
    ];
    let out = normalize_reference_solution(given, &defaults);
    assert_eq!(out.len(), 3);
    assert_eq!(out[1].complete_code, "first");
  }

  #[test]
  fn placeholder_case_uses_configured_text() {
    let defaults = FormDefaults {
      placeholder_input: "1 2".into(),
      placeholder_output: "3".into(),
      ..FormDefaults::default()
    };
    let case = placeholder_visible_case(&defaults);
    assert_eq!(case.input, "1 2");
    assert_eq!(case.output, "3");
    assert_eq!(case.explanation, None);
  }
}
