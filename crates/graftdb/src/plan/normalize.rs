use crate::plan::{PlanInput, PopulatePlan};
use thiserror::Error as ThisError;

///
/// PlanSpecError
/// Malformed population input; fatal before any document is touched.
///

#[derive(Debug, ThisError)]
pub enum PlanSpecError {
    #[error("population spec path must be non-empty")]
    EmptyPath,

    #[error("population spec path '{path}' must be a single token")]
    WhitespacePath { path: String },
}

/// Normalize any accepted input shape into a merged plan tree.
///
/// Empty input is a no-op returning an empty list, never an error. A
/// whitespace-separated path string expands into one childless sibling plan
/// per token. Duplicate paths at one level merge left-to-right: present
/// scalar options in later occurrences override, flags combine, and child
/// plans accumulate (merging recursively by path).
pub fn normalize(input: impl Into<PlanInput>) -> Result<Vec<PopulatePlan>, PlanSpecError> {
    let mut plans = Vec::new();
    normalize_into(input.into(), &mut plans)?;

    Ok(plans)
}

fn normalize_into(input: PlanInput, out: &mut Vec<PopulatePlan>) -> Result<(), PlanSpecError> {
    match input {
        PlanInput::Path(path) => {
            for token in path.split_whitespace() {
                merge_sibling(out, PopulatePlan::from_path(token));
            }
        }

        PlanInput::Spec(spec) => {
            let spec = *spec;
            if spec.path.is_empty() {
                return Err(PlanSpecError::EmptyPath);
            }
            if spec.path.split_whitespace().count() != 1 || spec.path.trim() != spec.path {
                return Err(PlanSpecError::WhitespacePath { path: spec.path });
            }

            let mut plan = PopulatePlan::from_path(spec.path);
            plan.target_override = spec.model;
            plan.select = spec.select;
            plan.filter = spec.filter;
            plan.options = spec.options;

            if let Some(populate) = spec.populate {
                normalize_into(*populate, &mut plan.children)?;
            }

            merge_sibling(out, plan);
        }

        PlanInput::Many(inputs) => {
            for input in inputs {
                normalize_into(input, out)?;
            }
        }
    }

    Ok(())
}

fn merge_sibling(siblings: &mut Vec<PopulatePlan>, plan: PopulatePlan) {
    if let Some(existing) = siblings.iter_mut().find(|s| s.path == plan.path) {
        merge_into(existing, plan);
    } else {
        siblings.push(plan);
    }
}

// Later occurrences override present scalar options and accumulate children.
fn merge_into(existing: &mut PopulatePlan, next: PopulatePlan) {
    if next.target_override.is_some() {
        existing.target_override = next.target_override;
    }
    if next.select.is_some() {
        existing.select = next.select;
    }
    if next.filter.is_some() {
        existing.filter = next.filter;
    }
    if next.options.sort.is_some() {
        existing.options.sort = next.options.sort;
    }
    if next.options.limit.is_some() {
        existing.options.limit = next.options.limit;
    }
    if next.options.skip.is_some() {
        existing.options.skip = next.options.skip;
    }
    existing.options.lean |= next.options.lean;
    existing.options.force |= next.options.force;

    for child in next.children {
        merge_sibling(&mut existing.children, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanSpec;

    #[test]
    fn empty_inputs_normalize_to_empty_plans() {
        assert!(normalize("").expect("empty string is a no-op").is_empty());
        assert!(normalize("   ").expect("blank string is a no-op").is_empty());
        assert!(
            normalize(Vec::<PlanInput>::new())
                .expect("empty list is a no-op")
                .is_empty()
        );
    }

    #[test]
    fn multi_token_string_expands_to_childless_siblings() {
        let plans = normalize("author team").expect("token list normalizes");

        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].path, "author");
        assert_eq!(plans[1].path, "team");
        assert!(plans.iter().all(|plan| plan.children.is_empty()));
    }

    #[test]
    fn nested_populate_becomes_children() {
        let plans = normalize(PlanSpec::new("team").populate("captain coach"))
            .expect("nested spec normalizes");

        assert_eq!(plans.len(), 1);
        let children: Vec<&str> = plans[0].children.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(children, vec!["captain", "coach"]);
    }

    #[test]
    fn duplicate_paths_merge_left_to_right() {
        let plans = normalize(vec![
            PlanInput::from(PlanSpec::new("author").limit(1).populate("team")),
            PlanInput::from(PlanSpec::new("author").limit(3).populate("avatar")),
        ])
        .expect("duplicates merge");

        assert_eq!(plans.len(), 1);
        let plan = &plans[0];
        assert_eq!(plan.options.limit, Some(3), "later scalar option wins");
        let children: Vec<&str> = plan.children.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(children, vec!["team", "avatar"], "children accumulate");
    }

    #[test]
    fn merge_preserves_earlier_options_the_later_spec_omits() {
        let plans = normalize(vec![
            PlanInput::from(PlanSpec::new("author").limit(2)),
            PlanInput::from(PlanSpec::new("author").lean()),
        ])
        .expect("duplicates merge");

        assert_eq!(plans[0].options.limit, Some(2));
        assert!(plans[0].options.lean);
    }

    #[test]
    fn plan_specs_survive_serde_round_trips() {
        let spec = PlanSpec::new("author")
            .filter(crate::expr::FilterExpr::eq("name", "A"))
            .limit(2)
            .lean()
            .populate("team");

        let encoded = serde_json::to_string(&spec).expect("spec serializes");
        let decoded: PlanSpec = serde_json::from_str(&encoded).expect("spec deserializes");

        let original = normalize(spec).expect("original normalizes");
        let round_tripped = normalize(decoded).expect("decoded normalizes");
        assert_eq!(original.len(), round_tripped.len());
        assert_eq!(original[0].path, round_tripped[0].path);
        assert_eq!(original[0].options.limit, round_tripped[0].options.limit);
        assert_eq!(original[0].options.lean, round_tripped[0].options.lean);
        assert_eq!(original[0].children.len(), round_tripped[0].children.len());
    }

    #[test]
    fn empty_spec_path_is_rejected() {
        let err = normalize(PlanSpec::new("")).expect_err("empty path is fatal");
        assert!(matches!(err, PlanSpecError::EmptyPath));

        let err = normalize(PlanSpec::new("a b")).expect_err("multi-token spec path is fatal");
        assert!(matches!(err, PlanSpecError::WhitespacePath { .. }));
    }
}
