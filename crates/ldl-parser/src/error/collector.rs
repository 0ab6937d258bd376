use crate::error::{Diagnostic, ParseError};

/// Gathers the lexer's diagnostics so that one pass reports every bad
/// character and literal in the level.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Returns `value` if nothing was emitted.
    pub fn finish<T>(self, value: T) -> Result<T, ParseError> {
        if self.diagnostics.is_empty() {
            Ok(value)
        } else {
            Err(ParseError::new(self.diagnostics))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, span::Span};

    #[test]
    fn test_empty_collector_passes_value_through() {
        assert_eq!(DiagnosticCollector::new().finish(3).unwrap(), 3);
    }

    #[test]
    fn test_collector_keeps_emission_order() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(
            Diagnostic::error("unexpected character `#`")
                .with_code(ErrorCode::E002)
                .with_label(Span::new(10..11), "here"),
        );
        collector.emit(Diagnostic::error("unexpected character `$`"));

        let err = collector.finish(()).unwrap_err();
        let messages: Vec<_> = err.diagnostics().iter().map(Diagnostic::message).collect();
        assert_eq!(
            messages,
            ["unexpected character `#`", "unexpected character `$`"]
        );
    }
}
