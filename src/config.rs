//! Analyzer configuration
//!
//! Defaults match the language as usually written: reserved words are
//! recognized regardless of case (`Programa`, `SI`), and columns are 1-based.

/// How reserved words are matched against identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeywordCase {
    /// `MIENTRAS`, `Mientras` and `mientras` are all the keyword
    #[default]
    Insensitive,
    /// Only the lowercase spelling is a keyword; other spellings are identifiers
    Sensitive,
}

/// Settings shared by every run of an [`Analyzer`](crate::analyzer::Analyzer)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub keyword_case: KeywordCase,
    /// Columns a tab expands to in the source viewer. Token columns always
    /// count a tab as one character.
    pub tab_width: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            keyword_case: KeywordCase::Insensitive,
            tab_width: 4,
        }
    }
}

impl AnalyzerConfig {
    pub fn with_keyword_case(mut self, keyword_case: KeywordCase) -> Self {
        self.keyword_case = keyword_case;
        self
    }

    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width.max(1);
        self
    }
}
