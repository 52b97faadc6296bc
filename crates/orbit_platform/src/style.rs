//! Scoped style rules
//!
//! A [`StyleRule`] is turned into a class name derived from a hash of its
//! declarations, so every element styled through the sheet is targeted by a
//! class of its own and nothing leaks onto unrelated elements. Identical
//! rules share one class.

use std::hash::{Hash, Hasher};

use nom::branch::alt;
use nom::bytes::complete::{is_not, take_while1};
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, opt, recognize, rest};
use nom::multi::{many0_count, separated_list1};
use nom::sequence::{delimited, separated_pair};
use nom::IResult;
use rustc_hash::{FxHashMap, FxHasher};

use crate::error::{PlatformError, Result};

/// A single `property: value` pair
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// Declarations for an element plus its `::before` pseudo-element
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct StyleRule {
    declarations: Vec<Declaration>,
    before: Vec<Declaration>,
}

impl StyleRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.declarations.push(Declaration::new(property, value));
        self
    }

    /// Add a declaration to the `::before` pseudo-element
    pub fn before(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.before.push(Declaration::new(property, value));
        self
    }

    /// Append raw declarations (`"color: red; margin: 0"`), if any.
    ///
    /// Appended declarations come last and therefore win.
    pub fn with_overrides(mut self, raw: Option<&str>) -> Result<Self> {
        if let Some(raw) = raw {
            self.declarations.extend(parse_declarations(raw)?);
        }
        Ok(self)
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn before_declarations(&self) -> &[Declaration] {
        &self.before
    }

    /// Effective value of `property` (last declaration wins)
    pub fn value(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|d| d.property == property)
            .map(|d| d.value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.before.is_empty()
    }

    /// Serialize as CSS scoped to `class`
    pub fn to_css(&self, class: &str) -> String {
        let block = |decls: &[Declaration]| {
            decls
                .iter()
                .map(|d| format!("{}: {};", d.property, d.value))
                .collect::<Vec<_>>()
                .join(" ")
        };

        let mut css = format!(".{class} {{ {} }}", block(&self.declarations));
        if !self.before.is_empty() {
            css.push_str(&format!("\n.{class}::before {{ {} }}", block(&self.before)));
        }
        css
    }

    fn class_name(&self) -> String {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        format!("css-{:x}", hasher.finish())
    }
}

/// Document-wide rule registry, in insertion order
#[derive(Default)]
pub struct StyleSheet {
    rules: Vec<(String, StyleRule)>,
    by_class: FxHashMap<String, usize>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule and return its scoped class name
    pub fn insert(&mut self, rule: StyleRule) -> String {
        let class = rule.class_name();
        if !self.by_class.contains_key(&class) {
            tracing::trace!(class = %class, "insert style rule");
            self.by_class.insert(class.clone(), self.rules.len());
            self.rules.push((class.clone(), rule));
        }
        class
    }

    pub fn get(&self, class: &str) -> Option<&StyleRule> {
        self.by_class.get(class).map(|&index| &self.rules[index].1)
    }

    /// Rules in insertion order; later rules override earlier ones
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleRule)> {
        self.rules.iter().map(|(class, rule)| (class.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn to_css(&self) -> String {
        self.rules
            .iter()
            .map(|(class, rule)| rule.to_css(class))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn property(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-')(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(delimited(char('"'), opt(is_not("\"")), char('"'))),
        recognize(delimited(char('\''), opt(is_not("'")), char('\''))),
    ))(input)
}

/// Balanced `( ... )`; quotes and nested groups inside are opaque
fn parenthesized(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('('),
        many0_count(alt((quoted, parenthesized, is_not("\"'()")))),
        char(')'),
    ))(input)
}

/// Text up to the next `;` that is outside quotes and parentheses
fn segment(input: &str) -> IResult<&str, &str> {
    recognize(many0_count(alt((quoted, parenthesized, is_not("\"'();")))))(input)
}

fn declaration(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        delimited(multispace0, property, multispace0),
        char(':'),
        rest,
    )(input)
}

/// Parse a `;`-separated declaration list. Blank segments are skipped.
///
/// Semicolons inside quoted strings or parenthesized groups belong to the
/// value, so `url("data:...;base64,...")` stays one declaration.
pub fn parse_declarations(input: &str) -> Result<Vec<Declaration>> {
    let (_, segments) = all_consuming(separated_list1(char(';'), segment))(input)
        .map_err(|_| PlatformError::InvalidStyle(input.trim().to_string()))?;

    let mut out = Vec::new();
    for segment in segments {
        if segment.trim().is_empty() {
            continue;
        }
        let (_, (property, value)) = all_consuming(declaration)(segment)
            .map_err(|_| PlatformError::InvalidStyle(segment.trim().to_string()))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(PlatformError::InvalidStyle(segment.trim().to_string()));
        }
        out.push(Declaration::new(property.to_ascii_lowercase(), value));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_declaration_lists() {
        let decls = parse_declarations(" color: red;\n  font-size : 12px;; ").unwrap();
        assert_eq!(
            decls,
            vec![
                Declaration::new("color", "red"),
                Declaration::new("font-size", "12px"),
            ]
        );
        assert!(parse_declarations("").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_declarations() {
        assert!(parse_declarations("color red").is_err());
        assert!(parse_declarations("color:").is_err());
        assert!(parse_declarations(": red").is_err());
        assert!(parse_declarations("content: 'open").is_err());
        assert!(parse_declarations("width: calc(1px + 2px").is_err());
    }

    #[test]
    fn semicolons_inside_values_do_not_split() {
        let decls = parse_declarations(
            r#"background: url("data:image/svg+xml;base64,PHN2Zz4=") no-repeat; color: red"#,
        )
        .unwrap();
        assert_eq!(
            decls,
            vec![
                Declaration::new(
                    "background",
                    r#"url("data:image/svg+xml;base64,PHN2Zz4=") no-repeat"#
                ),
                Declaration::new("color", "red"),
            ]
        );

        let decls = parse_declarations("font-family: 'a;b', sans-serif;").unwrap();
        assert_eq!(decls, vec![Declaration::new("font-family", "'a;b', sans-serif")]);

        let decls = parse_declarations("content: \"x;y\"; width: calc(100% - (2px))").unwrap();
        assert_eq!(decls[0].value, "\"x;y\"");
        assert_eq!(decls[1].value, "calc(100% - (2px))");
    }

    #[test]
    fn identical_rules_share_a_class() {
        let mut sheet = StyleSheet::new();
        let a = sheet.insert(StyleRule::new().set("opacity", "1"));
        let b = sheet.insert(StyleRule::new().set("opacity", "1"));
        let c = sheet.insert(StyleRule::new().set("opacity", "0"));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(sheet.len(), 2);
        assert!(a.starts_with("css-"));
    }

    #[test]
    fn overrides_win_over_base_declarations() {
        let rule = StyleRule::new()
            .set("font-size", "24px")
            .with_overrides(Some("font-size: 30px"))
            .unwrap();
        assert_eq!(rule.value("font-size"), Some("30px"));
    }

    #[test]
    fn serializes_before_block() {
        let rule = StyleRule::new()
            .set("position", "absolute")
            .before("content", "'1.'");
        let css = rule.to_css("css-x");
        assert!(css.contains(".css-x { position: absolute; }"));
        assert!(css.contains(".css-x::before { content: '1.'; }"));
    }
}
