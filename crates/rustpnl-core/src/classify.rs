//! Account classification by name keywords.
//!
//! Accounts are sorted into [`AccountType::Revenue`], [`AccountType::Expense`]
//! or [`AccountType::Other`] by case-insensitive substring matching against an
//! ordered table of [`ClassificationRule`]s. The first matching rule wins.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Category of an account in the P&L report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Revenue or income account.
    Revenue,
    /// Expense account.
    Expense,
    /// Anything else (assets, liabilities, unrecognized names).
    Other,
}

impl AccountType {
    /// The display name of this type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Revenue => "Revenue",
            Self::Expense => "Expense",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            "other" => Ok(Self::Other),
            _ => Err(format!("unknown account type: {s}")),
        }
    }
}

/// Errors from loading a classification rule set.
#[derive(Debug, Error)]
pub enum RulesError {
    /// The rule set is not valid JSON or has the wrong shape.
    #[error("invalid classification rules: {0}")]
    Json(#[from] serde_json::Error),

    /// A rule has no keywords and could never match.
    #[error("classification rule {index} ({account_type}) has no keywords")]
    EmptyRule {
        /// Zero-based position of the rule.
        index: usize,
        /// The type the rule would assign.
        account_type: AccountType,
    },
}

/// A set of keywords that map an account name to a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    /// Substrings to look for, lower-case.
    pub keywords: Vec<String>,
    /// Type assigned when any keyword matches.
    pub account_type: AccountType,
}

impl ClassificationRule {
    /// Create a rule. Keywords are lower-cased.
    pub fn new<I, S>(keywords: I, account_type: AccountType) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            account_type,
        }
    }

    /// Whether a lower-cased account name matches this rule.
    fn matches(&self, lowered_name: &str) -> bool {
        self.keywords.iter().any(|k| lowered_name.contains(k.as_str()))
    }
}

const REVENUE_KEYWORDS: &[&str] = &["revenue", "income"];

const EXPENSE_KEYWORDS: &[&str] = &[
    "expense",
    "payroll",
    "legal",
    "cogs",
    "cost of goods",
    "fees",
];

/// Classifies account names with an ordered rule table.
///
/// # Examples
///
/// ```
/// use rustpnl_core::{AccountClassifier, AccountType};
///
/// let classifier = AccountClassifier::default();
/// assert_eq!(classifier.classify("Sales Revenue"), AccountType::Revenue);
/// assert_eq!(classifier.classify("Legal Fees"), AccountType::Expense);
/// assert_eq!(classifier.classify("BTC Wallet"), AccountType::Other);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountClassifier {
    rules: Vec<ClassificationRule>,
}

impl AccountClassifier {
    /// Create a classifier from rules in priority order.
    pub const fn new(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    /// Load rules from a JSON array of `{ "keywords": [...], "account_type": "..." }`.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let rules: Vec<ClassificationRule> = serde_json::from_str(json)?;
        let rules = rules
            .into_iter()
            .enumerate()
            .map(|(index, rule)| {
                if rule.keywords.iter().all(String::is_empty) {
                    return Err(RulesError::EmptyRule {
                        index,
                        account_type: rule.account_type,
                    });
                }
                Ok(ClassificationRule::new(&rule.keywords, rule.account_type))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules))
    }

    /// Append a rule with the lowest priority.
    pub fn with_rule(mut self, rule: ClassificationRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The rules in priority order.
    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Classify an account name. Never fails; unmatched names are `Other`.
    pub fn classify(&self, account_name: &str) -> AccountType {
        let name = account_name.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&name))
            .map_or(AccountType::Other, |rule| rule.account_type)
    }
}

impl Default for AccountClassifier {
    fn default() -> Self {
        Self::new(vec![
            ClassificationRule::new(REVENUE_KEYWORDS, AccountType::Revenue),
            ClassificationRule::new(EXPENSE_KEYWORDS, AccountType::Expense),
        ])
    }
}

/// Classify an account name with the default rules.
pub fn classify(account_name: &str) -> AccountType {
    AccountClassifier::default().classify(account_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revenue_keywords() {
        assert_eq!(classify("Sales Revenue"), AccountType::Revenue);
        assert_eq!(classify("Interest Income"), AccountType::Revenue);
    }

    #[test]
    fn test_expense_keywords() {
        for name in [
            "Office Expense",
            "Payroll",
            "Legal",
            "COGS",
            "Cost of Goods Sold",
            "Bank Fees",
        ] {
            assert_eq!(classify(name), AccountType::Expense, "{name}");
        }
    }

    #[test]
    fn test_other() {
        assert_eq!(classify("BTC Wallet"), AccountType::Other);
        assert_eq!(classify(""), AccountType::Other);
    }

    #[test]
    fn test_revenue_wins_over_expense() {
        assert_eq!(classify("revenue expense account"), AccountType::Revenue);
        assert_eq!(classify("Fee Income"), AccountType::Revenue);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("REVENUE"), AccountType::Revenue);
        assert_eq!(classify("revenue"), AccountType::Revenue);
        assert_eq!(classify("LeGaL"), AccountType::Expense);
    }

    #[test]
    fn test_fee_singular_is_not_expense() {
        assert_eq!(classify("Network Fee"), AccountType::Other);
    }

    #[test]
    fn test_account_type_display_and_parse() {
        assert_eq!(AccountType::Revenue.to_string(), "Revenue");
        assert_eq!("expense".parse::<AccountType>(), Ok(AccountType::Expense));
        assert!("asset".parse::<AccountType>().is_err());
    }

    #[test]
    fn test_custom_rules_keep_priority() {
        let classifier = AccountClassifier::new(vec![ClassificationRule::new(
            ["Gas"],
            AccountType::Expense,
        )])
        .with_rule(ClassificationRule::new(["staking"], AccountType::Revenue));

        assert_eq!(classifier.classify("ETH gas"), AccountType::Expense);
        assert_eq!(classifier.classify("Staking Rewards"), AccountType::Revenue);
        assert_eq!(classifier.classify("Sales Revenue"), AccountType::Other);
        assert_eq!(classifier.rules().len(), 2);
    }

    #[test]
    fn test_empty_rule_set_classifies_everything_as_other() {
        let classifier = AccountClassifier::new(Vec::new());
        assert_eq!(classifier.classify("Sales Revenue"), AccountType::Other);
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"keywords": ["Staking"], "account_type": "Revenue"},
            {"keywords": ["gas", "fees"], "account_type": "Expense"}
        ]"#;
        let classifier = AccountClassifier::from_json(json).unwrap();
        assert_eq!(classifier.classify("ETH Staking"), AccountType::Revenue);
        assert_eq!(classifier.classify("Gas"), AccountType::Expense);
        assert_eq!(classifier.rules()[0].keywords, vec!["staking".to_string()]);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(
            AccountClassifier::from_json("not json"),
            Err(RulesError::Json(_))
        ));
        assert!(matches!(
            AccountClassifier::from_json(r#"[{"keywords": [], "account_type": "Other"}]"#),
            Err(RulesError::EmptyRule { index: 0, .. })
        ));
    }
}
