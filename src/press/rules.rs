//! Keyword classifier for press items (optionally loaded from `config/press_rules.toml`).
//!
//! Minimal TOML layout, matched case-insensitively as substrings of the item title:
//!
//! ```toml
//! default_tag = "Parking"
//!
//! [[category]]
//! pattern = "award"
//! label = "Award"
//!
//! [[tag]]
//! pattern = "urban"
//! label = "Urban"
//! ```
//!
//! Categories: the first matching rule wins, no match gives `News Release`.
//! Tags: every matching rule contributes, in file order; no match gives `default_tag`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use super::Category;

pub const ENV_RULES_PATH: &str = "PRESS_RULES_PATH";
pub const DEFAULT_RULES_PATH: &str = "config/press_rules.toml";
pub const DEFAULT_TAG: &str = "Parking";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Rule<L> {
    pub pattern: String,
    pub label: L,
}

impl<L> Rule<L> {
    pub fn new(pattern: &str, label: L) -> Self {
        Self {
            pattern: pattern.to_lowercase(),
            label,
        }
    }

    /// `haystack` must already be lower-cased.
    fn matches(&self, haystack: &str) -> bool {
        haystack.contains(self.pattern.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierRules {
    pub categories: Vec<Rule<Category>>,
    pub tags: Vec<Rule<String>>,
    pub default_tag: String,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            categories: vec![
                Rule::new("award", Category::Award),
                Rule::new("media", Category::MediaCoverage),
            ],
            tags: vec![
                Rule::new("urban", "Urban".to_string()),
                Rule::new("smart", "Smart Technology".to_string()),
                Rule::new("parking", "Parking".to_string()),
            ],
            default_tag: DEFAULT_TAG.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RulesFile {
    #[serde(default)]
    default_tag: Option<String>,
    #[serde(default, rename = "category")]
    categories: Vec<Rule<Category>>,
    #[serde(default, rename = "tag")]
    tags: Vec<Rule<String>>,
}

impl ClassifierRules {
    pub fn category_for(&self, title: &str) -> Category {
        let lower = title.to_lowercase();
        self.categories
            .iter()
            .find(|r| r.matches(&lower))
            .map(|r| r.label)
            .unwrap_or_default()
    }

    /// Never empty.
    pub fn tags_for(&self, title: &str) -> Vec<String> {
        let lower = title.to_lowercase();
        let tags: Vec<String> = self
            .tags
            .iter()
            .filter(|r| r.matches(&lower))
            .map(|r| r.label.clone())
            .collect();
        if tags.is_empty() {
            vec![self.default_tag.clone()]
        } else {
            tags
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: RulesFile = toml::from_str(s).context("parsing press rules toml")?;
        let default_tag = file
            .default_tag
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| DEFAULT_TAG.to_string());
        if default_tag.is_empty() {
            return Err(anyhow!("press rules: default_tag must not be empty"));
        }

        let categories = file
            .categories
            .into_iter()
            .filter(|r| !r.pattern.trim().is_empty())
            .map(|r| Rule::new(r.pattern.trim(), r.label))
            .collect();
        let tags = file
            .tags
            .into_iter()
            .filter(|r| !r.pattern.trim().is_empty() && !r.label.trim().is_empty())
            .map(|r| Rule::new(r.pattern.trim(), r.label.trim().to_string()))
            .collect();

        Ok(Self {
            categories,
            tags,
            default_tag,
        })
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading press rules from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Resolution order:
    /// 1) $PRESS_RULES_PATH (must exist)
    /// 2) config/press_rules.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_RULES_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("PRESS_RULES_PATH points to non-existent path"));
        }
        let fallback = PathBuf::from(DEFAULT_RULES_PATH);
        if fallback.exists() {
            return Self::load_from(&fallback);
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn default_categories_first_match_wins() {
        let r = ClassifierRules::default();
        assert_eq!(r.category_for("Best Startup AWARD 2024"), Category::Award);
        assert_eq!(r.category_for("Social media buzz"), Category::MediaCoverage);
        assert_eq!(r.category_for("Award-winning media campaign"), Category::Award);
        assert_eq!(r.category_for("New garage opens"), Category::NewsRelease);
    }

    #[test]
    fn default_tags_in_rule_order_with_fallback() {
        let r = ClassifierRules::default();
        assert_eq!(
            r.tags_for("Urban Smart Parking Launch"),
            vec!["Urban", "Smart Technology", "Parking"]
        );
        assert_eq!(r.tags_for("Quarterly results"), vec!["Parking"]);
    }

    #[test]
    fn toml_rules_are_normalized() {
        let s = r#"
default_tag = "General"

[[category]]
pattern = " Prize "
label = "Award"

[[category]]
pattern = ""
label = "Media Coverage"

[[tag]]
pattern = "EV"
label = "Electric"
"#;
        let r = ClassifierRules::from_toml_str(s).unwrap();
        assert_eq!(r.categories, vec![Rule::new("prize", Category::Award)]);
        assert_eq!(r.category_for("Innovation PRIZE"), Category::Award);
        assert_eq!(r.tags_for("New EV chargers"), vec!["Electric"]);
        assert_eq!(r.tags_for("Nothing here"), vec!["General"]);
    }

    #[test]
    fn empty_default_tag_is_rejected() {
        assert!(ClassifierRules::from_toml_str(r#"default_tag = "  ""#).is_err());
    }

    #[test]
    fn unknown_category_label_is_rejected() {
        let s = r#"
[[category]]
pattern = "x"
label = "Gossip"
"#;
        assert!(ClassifierRules::from_toml_str(s).is_err());
    }

    #[serial_test::serial]
    #[test]
    fn load_default_uses_env_then_builtin() {
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();
        env::remove_var(ENV_RULES_PATH);

        assert_eq!(ClassifierRules::load_default().unwrap(), ClassifierRules::default());

        let p = tmp.path().join("rules.toml");
        fs::write(&p, "default_tag = \"Mobility\"\n").unwrap();
        env::set_var(ENV_RULES_PATH, p.display().to_string());
        let r = ClassifierRules::load_default().unwrap();
        assert_eq!(r.default_tag, "Mobility");
        assert!(r.tags.is_empty());

        env::set_var(ENV_RULES_PATH, tmp.path().join("missing.toml").display().to_string());
        assert!(ClassifierRules::load_default().is_err());
        env::remove_var(ENV_RULES_PATH);

        env::set_current_dir(&old).unwrap();
    }
}
