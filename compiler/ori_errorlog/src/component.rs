//! Ambient "current component" used to annotate diagnostics that carry no
//! explicit location.

use crate::SourceSpan;

/// The component a compiler pass is currently working on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentContext {
    /// Name of the current variable. Empty means none.
    current_variable: String,
    /// Location of the current variable, if it has one.
    span: Option<SourceSpan>,
}

impl ComponentContext {
    /// Replace the current component.
    ///
    /// The span is kept only if at least one coordinate is non-zero; an
    /// all-zero span clears any previously stored location.
    pub fn update(&mut self, name: impl Into<String>, span: SourceSpan) {
        self.current_variable = name.into();
        self.span = span.has_coordinates().then_some(span);
    }

    /// Forget the current component and its location.
    pub fn clear(&mut self) {
        self.current_variable.clear();
        self.span = None;
    }

    pub fn current_variable(&self) -> &str {
        &self.current_variable
    }

    pub fn span(&self) -> Option<&SourceSpan> {
        self.span.as_ref()
    }

    pub fn has_span(&self) -> bool {
        self.span.is_some()
    }

    /// Apply the `Variable <name>: ` prefix when a component is active.
    pub(crate) fn annotate(&self, text: &str) -> String {
        if self.current_variable.is_empty() {
            text.to_owned()
        } else {
            format!("Variable {}: {text}", self.current_variable)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn update_with_coordinates_keeps_span() {
        let mut ctx = ComponentContext::default();
        ctx.update("x", SourceSpan::new("M.mo", 1, 2, 1, 9));
        assert_eq!(ctx.current_variable(), "x");
        assert!(ctx.has_span());
        assert_eq!(ctx.annotate("is unused"), "Variable x: is unused");
    }

    #[test]
    fn all_zero_span_clears_location() {
        let mut ctx = ComponentContext::default();
        ctx.update("x", SourceSpan::new("M.mo", 1, 2, 1, 9));
        ctx.update("y", SourceSpan::new("M.mo", 0, 0, 0, 0));
        assert_eq!(ctx.current_variable(), "y");
        assert!(!ctx.has_span());
    }

    #[test]
    fn empty_name_means_no_prefix() {
        let mut ctx = ComponentContext::default();
        ctx.update("", SourceSpan::default());
        assert_eq!(ctx.annotate("plain"), "plain");

        ctx.update("z", SourceSpan::default());
        ctx.clear();
        assert_eq!(ctx.annotate("plain"), "plain");
        assert_eq!(ctx.span(), None);
    }
}
