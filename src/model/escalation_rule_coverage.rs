use crate::ioutil::join_list;
use serde::{Deserialize, Serialize};

/// Escalation policy as returned by `GET /escalation_policies`.
#[derive(Debug, Clone, Deserialize)]
pub struct EscalationPolicy {
    pub id: String,
    pub name: String,
    pub html_url: String,
    #[serde(default)]
    pub escalation_rules: Option<Vec<EscalationRule>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EscalationRule {
    #[serde(default)]
    pub targets: Option<Vec<RuleTarget>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleTarget {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub summary: String,
}

/// One escalation rule and whether its schedules cover the lookahead window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EscalationRuleCoverage {
    pub policy_id: String,
    pub policy_name: String,
    pub policy_html_url: String,
    pub rule_index: usize,
    #[serde(serialize_with = "join_list")]
    pub rule_target_names: Vec<String>,
    #[serde(serialize_with = "join_list")]
    pub rule_target_ids: Vec<String>,
    pub has_direct_contact: bool,
    pub is_fully_covered: Option<bool>,
}

impl EscalationRuleCoverage {
    /// One row per rule, `rule_index` counting from 1. Only schedule targets
    /// feed coverage; a user target marks the rule as having direct contact.
    pub fn build_from(policy: &EscalationPolicy) -> Vec<Self> {
        let rules = policy.escalation_rules.as_deref().unwrap_or_default();
        rules
            .iter()
            .enumerate()
            .map(|(idx, rule)| {
                let mut names = Vec::new();
                let mut ids = Vec::new();
                let mut direct_contact = false;
                for target in rule.targets.as_deref().unwrap_or_default() {
                    match target.kind.as_str() {
                        "user_reference" => direct_contact = true,
                        "schedule_reference" => {
                            names.push(target.summary.clone());
                            ids.push(target.id.clone());
                        }
                        _ => {}
                    }
                }
                Self {
                    policy_id: policy.id.clone(),
                    policy_name: policy.name.clone(),
                    policy_html_url: policy.html_url.clone(),
                    rule_index: idx + 1,
                    rule_target_names: names,
                    rule_target_ids: ids,
                    has_direct_contact: direct_contact,
                    is_fully_covered: None,
                }
            })
            .collect()
    }

    /// Key used to keep rules unique across policies.
    pub fn key(&self) -> String {
        format!("{}-{}", self.policy_id, self.rule_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EP_LIST: &str = include_str!("../../tests/fixtures/cov_gap/ep_list.json");

    fn policies() -> Vec<EscalationPolicy> {
        let pages: Vec<serde_json::Value> = serde_json::from_str(EP_LIST).expect("fixture json");
        pages
            .into_iter()
            .flat_map(|page| {
                serde_json::from_value::<Vec<EscalationPolicy>>(page["escalation_policies"].clone())
                    .expect("decode policies")
            })
            .collect()
    }

    #[test]
    fn build_from_splits_rules_and_keeps_schedule_targets() {
        let policies = policies();
        let rules = EscalationRuleCoverage::build_from(&policies[0]);

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].rule_index, 1);
        assert_eq!(rules[0].rule_target_ids, vec!["PG3MDI8", "P4TPEME"]);
        assert_eq!(
            rules[0].rule_target_names,
            vec!["Preocts Coverage Gaps", "Preocts Full Coverage"]
        );
        assert!(!rules[0].has_direct_contact);
        assert_eq!(rules[1].rule_index, 2);
        assert!(rules[1].rule_target_ids.is_empty());
        assert!(rules[1].has_direct_contact);
        assert_eq!(rules[1].key(), "P46S1RA-2");
        assert!(rules.iter().all(|rule| rule.is_fully_covered.is_none()));
    }

    #[test]
    fn build_from_tolerates_null_rules_and_targets() {
        let policy: EscalationPolicy = serde_json::from_value(serde_json::json!({
            "id": "P1",
            "name": "Empty",
            "html_url": "https://example.pagerduty.com/escalation_policies/P1",
            "escalation_rules": [{"targets": null}]
        }))
        .expect("decode policy");

        let rules = EscalationRuleCoverage::build_from(&policy);

        assert_eq!(rules.len(), 1);
        assert!(rules[0].rule_target_ids.is_empty());
        assert!(!rules[0].has_direct_contact);
    }
}
