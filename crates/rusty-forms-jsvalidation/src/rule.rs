// File: src/rule.rs
// Purpose: Rule declaration parsing and ordered field → rules maps

use once_cell::sync::Lazy;
use regex::Regex;

/// Rules whose single argument is a pattern and must never be split
const PATTERN_RULES: &[&str] = &["regex", "not_regex"];

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid camel case boundary regex"));

/// Normalize a rule name to snake_case (`RequiredWith` → `required_with`)
pub fn normalize_rule_name(name: &str) -> String {
    CAMEL_BOUNDARY
        .replace_all(name.trim(), "${1}_${2}")
        .to_lowercase()
}

/// A rule as declared on the server: name plus positional arguments
///
/// Arguments keep their textual form; `"10.50"` stays `"10.50"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRule {
    pub name: String,
    pub parameters: Vec<String>,
}

impl ParsedRule {
    /// Parse `name` or `name:arg1,arg2`
    ///
    /// Returns `None` for blank declarations.
    pub fn parse(declaration: &str) -> Option<Self> {
        let declaration = declaration.trim();
        if declaration.is_empty() {
            return None;
        }

        let (name, args) = match declaration.split_once(':') {
            Some((name, args)) => (name, Some(args)),
            None => (declaration, None),
        };

        let name = normalize_rule_name(name);
        if name.is_empty() {
            return None;
        }

        let parameters = match args {
            None => Vec::new(),
            Some(args) if PATTERN_RULES.contains(&name.as_str()) => vec![args.to_string()],
            Some(args) => split_arguments(args),
        };

        Some(Self { name, parameters })
    }
}

/// Split a comma separated argument list, keeping quoted sections intact
///
/// Quotes are preserved in the output; rules that care about them
/// (`in`, `not_in`) strip them in their parameter transform.
fn split_arguments(args: &str) -> Vec<String> {
    let mut parameters = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in args.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                parameters.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    parameters.push(current.trim().to_string());

    parameters
}

/// Anything that can be read as an ordered list of rule declarations
///
/// A single string is pipe delimited (`"required|email"`); lists are
/// taken entry by entry, so a `regex:` entry may safely contain `|`.
pub trait IntoRuleList {
    fn into_rule_list(self) -> Vec<String>;
}

impl IntoRuleList for &str {
    fn into_rule_list(self) -> Vec<String> {
        self.split('|').map(|s| s.to_string()).collect()
    }
}

impl IntoRuleList for String {
    fn into_rule_list(self) -> Vec<String> {
        self.as_str().into_rule_list()
    }
}

impl IntoRuleList for Vec<String> {
    fn into_rule_list(self) -> Vec<String> {
        self
    }
}

impl IntoRuleList for Vec<&str> {
    fn into_rule_list(self) -> Vec<String> {
        self.into_iter().map(|s| s.to_string()).collect()
    }
}

impl IntoRuleList for &[&str] {
    fn into_rule_list(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> IntoRuleList for [&str; N] {
    fn into_rule_list(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

/// Field → rule declarations, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleMap {
    entries: Vec<(String, Vec<String>)>,
}

impl RuleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare rules for a field
    ///
    /// Re-declaring a field replaces its rules but keeps its position.
    pub fn insert(&mut self, field: impl Into<String>, rules: impl IntoRuleList) {
        let field = field.into();
        let rules = rules.into_rule_list();

        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = rules,
            None => self.entries.push((field, rules)),
        }
    }

    /// Builder-style `insert`
    pub fn with(mut self, field: impl Into<String>, rules: impl IntoRuleList) -> Self {
        self.insert(field, rules);
        self
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, rules)| rules.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(field, rules)| (field.as_str(), rules.as_slice()))
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(field, _)| field.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, R> FromIterator<(K, R)> for RuleMap
where
    K: Into<String>,
    R: IntoRuleList,
{
    fn from_iter<I: IntoIterator<Item = (K, R)>>(iter: I) -> Self {
        let mut map = RuleMap::new();
        for (field, rules) in iter {
            map.insert(field, rules);
        }
        map
    }
}
