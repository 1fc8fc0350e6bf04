use std::sync::Arc;

use memchr::memmem;
use regex::Regex;

/// Decides whether a line is part of the result set.
pub trait LineFilter: Send + Sync {
    fn include(&self, line: &str) -> bool;
}

/// Matches a line containing at least one of a list of substrings.
#[derive(Debug, Clone)]
pub struct MatchAnySubstring {
    substrings: Vec<String>,
    case_sensitive: bool,
}

impl MatchAnySubstring {
    pub fn new<I, S>(substrings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            substrings: substrings.into_iter().map(Into::into).collect(),
            case_sensitive: true,
        }
    }

    pub fn with_case_sensitivity(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn substrings(&self) -> &[String] {
        &self.substrings
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

impl LineFilter for MatchAnySubstring {
    fn include(&self, line: &str) -> bool {
        if self.substrings.is_empty() {
            return true;
        }
        if self.case_sensitive {
            return self
                .substrings
                .iter()
                .any(|ss| memmem::find(line.as_bytes(), ss.as_bytes()).is_some());
        }
        let line = line.to_lowercase();
        self.substrings
            .iter()
            .any(|ss| memmem::find(line.as_bytes(), ss.to_lowercase().as_bytes()).is_some())
    }
}

/// Matches a line against a regular expression.
#[derive(Debug, Clone)]
pub struct MatchRegex {
    regex: Regex,
}

impl MatchRegex {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }
}

impl LineFilter for MatchRegex {
    fn include(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

/// Filters OR'd together: a line passes when any filter includes it.
#[derive(Clone, Default)]
pub struct FilterSet {
    filters: Vec<Arc<dyn LineFilter>>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: impl LineFilter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn push(&mut self, filter: Arc<dyn LineFilter>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn include(&self, line: &str) -> bool {
        self.filters.is_empty() || self.filters.iter().any(|f| f.include(line))
    }
}

impl std::fmt::Debug for FilterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterSet")
            .field("filters", &self.filters.len())
            .finish()
    }
}
