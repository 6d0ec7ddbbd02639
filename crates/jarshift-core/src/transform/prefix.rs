//! Package-prefix renaming for entry names and text resources.
//!
//! `PrefixRenamer` moves entries from one package namespace to another
//! (`javax/servlet/Foo.class` to `jakarta/servlet/Foo.class`) and rewrites
//! package references inside text resources such as deployment descriptors,
//! property files and service registrations. Class file bytes are left
//! alone.

use crate::Resource;
use crate::TransformError;

use super::Transformer;

const SERVICES_DIR: &str = "META-INF/services/";

/// File suffixes treated as UTF-8 text.
const TEXT_SUFFIXES: [&str; 11] = [
    ".properties",
    ".xml",
    ".tld",
    ".jsp",
    ".jspx",
    ".tag",
    ".txt",
    ".MF",
    ".json",
    ".yaml",
    ".yml",
];

/// One `from` to `to` package mapping.
///
/// # Examples
///
/// ```
/// use jarshift_core::transform::PrefixRule;
///
/// let rule = PrefixRule::new("javax.servlet", "jakarta.servlet");
/// assert_eq!(rule.from(), "javax.servlet");
///
/// let parsed: PrefixRule = "javax.el=jakarta.el".parse().unwrap();
/// assert_eq!(parsed.to(), "jakarta.el");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixRule {
    from_dotted: String,
    to_dotted: String,
    from_slashed: String,
    to_slashed: String,
}

impl PrefixRule {
    /// Creates a rule from dotted package names.
    ///
    /// Slashed forms (`javax/servlet`) are derived automatically.
    pub fn new(from: &str, to: &str) -> Self {
        let from_dotted = from.trim_matches('.').to_string();
        let to_dotted = to.trim_matches('.').to_string();
        Self {
            from_slashed: from_dotted.replace('.', "/"),
            to_slashed: to_dotted.replace('.', "/"),
            from_dotted,
            to_dotted,
        }
    }

    /// Returns the source package.
    #[must_use]
    pub fn from(&self) -> &str {
        &self.from_dotted
    }

    /// Returns the target package.
    #[must_use]
    pub fn to(&self) -> &str {
        &self.to_dotted
    }
}

impl std::str::FromStr for PrefixRule {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .split_once('=')
            .ok_or_else(|| TransformError::new(format!("rule must be FROM=TO, got '{s}'")))?;

        let (from, to) = (from.trim(), to.trim());
        if from.is_empty() || to.is_empty() {
            return Err(TransformError::new(format!(
                "rule must name both packages, got '{s}'"
            )));
        }

        Ok(Self::new(from, to))
    }
}

/// Transformer that moves resources between package namespaces.
///
/// Rules are tried in order; the first matching rule renames an entry.
/// Text substitution applies every rule.
///
/// # Examples
///
/// ```
/// use jarshift_core::Resource;
/// use jarshift_core::transform::PrefixRenamer;
/// use jarshift_core::transform::Transformer;
///
/// let renamer = PrefixRenamer::new().with_rule("javax.servlet", "jakarta.servlet");
///
/// let class = Resource::new("javax/servlet/Filter.class", vec![0xCA, 0xFE]);
/// let moved = renamer.transform(&class)?.unwrap();
/// assert_eq!(moved.name(), "jakarta/servlet/Filter.class");
///
/// let xml = Resource::new("WEB-INF/web.xml", b"<filter>javax.servlet.Filter</filter>".to_vec());
/// let edited = renamer.transform(&xml)?.unwrap();
/// assert_eq!(edited.data(), b"<filter>jakarta.servlet.Filter</filter>");
///
/// let other = Resource::new("com/acme/App.class", vec![1]);
/// assert!(renamer.transform(&other)?.is_none());
/// # Ok::<(), jarshift_core::TransformError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PrefixRenamer {
    rules: Vec<PrefixRule>,
}

impl PrefixRenamer {
    /// Creates a renamer with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a renamer from existing rules.
    #[must_use]
    pub fn from_rules(rules: Vec<PrefixRule>) -> Self {
        Self { rules }
    }

    /// Adds a rule.
    #[must_use]
    pub fn with_rule(mut self, from: &str, to: &str) -> Self {
        self.rules.push(PrefixRule::new(from, to));
        self
    }

    /// Returns the configured rules.
    #[must_use]
    pub fn rules(&self) -> &[PrefixRule] {
        &self.rules
    }

    /// Returns the new entry name, or `None` if no rule applies.
    #[must_use]
    pub fn rename(&self, name: &str) -> Option<String> {
        if let Some(service) = name.strip_prefix(SERVICES_DIR) {
            return self.rules.iter().find_map(|rule| {
                strip_package(service, &rule.from_dotted, '.')
                    .map(|rest| format!("{SERVICES_DIR}{}{rest}", rule.to_dotted))
            });
        }

        self.rules.iter().find_map(|rule| {
            strip_package(name, &rule.from_slashed, '/')
                .map(|rest| format!("{}{rest}", rule.to_slashed))
        })
    }

    /// Rewrites package references in `text`, or returns `None` if nothing
    /// matched.
    #[must_use]
    pub fn rewrite_text(&self, text: &str) -> Option<String> {
        let mut current = std::borrow::Cow::Borrowed(text);
        for rule in &self.rules {
            if let Some(next) = replace_package(&current, &rule.from_dotted, &rule.to_dotted) {
                current = std::borrow::Cow::Owned(next);
            }
            if let Some(next) = replace_package(&current, &rule.from_slashed, &rule.to_slashed) {
                current = std::borrow::Cow::Owned(next);
            }
        }

        match current {
            std::borrow::Cow::Borrowed(_) => None,
            std::borrow::Cow::Owned(text) => Some(text),
        }
    }
}

impl Transformer for PrefixRenamer {
    fn transform(&self, resource: &Resource) -> Result<Option<Resource>, TransformError> {
        let new_name = self.rename(resource.name());

        let new_data = if is_text_resource(resource.name()) {
            std::str::from_utf8(resource.data())
                .ok()
                .and_then(|text| self.rewrite_text(text))
                .map(String::into_bytes)
        } else {
            None
        };

        if new_name.is_none() && new_data.is_none() {
            return Ok(None);
        }

        let name = new_name.unwrap_or_else(|| resource.name().to_string());
        let data = new_data.unwrap_or_else(|| resource.data().to_vec());
        Ok(Some(Resource::new(name, data)))
    }
}

/// Returns `true` if the entry is edited as text.
fn is_text_resource(name: &str) -> bool {
    name.starts_with(SERVICES_DIR) || TEXT_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Strips `package` from the start of `name` when it is followed by
/// `separator`, returning the remainder including the separator.
fn strip_package<'a>(name: &'a str, package: &str, separator: char) -> Option<&'a str> {
    let rest = name.strip_prefix(package)?;
    rest.starts_with(separator).then_some(rest)
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Replaces whole-package occurrences of `from` with `to`.
///
/// A match must not be preceded by an identifier character or separator
/// (so `org.javax.servlet` is left alone) and must not be followed by an
/// identifier character (so `javax.servletx` is left alone).
fn replace_package(text: &str, from: &str, to: &str) -> Option<String> {
    if from.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut replaced = false;

    for (start, _) in text.match_indices(from) {
        if start < last {
            continue;
        }
        let end = start + from.len();
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();

        let clean_before = before.is_none_or(|c| !is_identifier_char(c) && c != '.' && c != '/');
        let clean_after = after.is_none_or(|c| !is_identifier_char(c));

        if clean_before && clean_after {
            out.push_str(&text[last..start]);
            out.push_str(to);
            last = end;
            replaced = true;
        }
    }

    if !replaced {
        return None;
    }

    out.push_str(&text[last..]);
    Some(out)
}
