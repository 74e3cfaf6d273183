use std::fmt;

use serde::Serialize;

/// One rejected position in a textual build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildDiagnostic {
    /// Zero-based character position.
    pub position: usize,
    /// Offending character, `None` when the string is too short to reach this position.
    pub found: Option<char>,
    /// Symbols accepted at this position.
    pub expected: String,
}

impl fmt::Display for BuildDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.found {
            Some(found) => write!(
                f,
                "symbol #{} '{}' is not one of [{}]",
                self.position + 1,
                found,
                self.expected
            ),
            None => write!(
                f,
                "symbol #{} is missing, expected one of [{}]",
                self.position + 1,
                self.expected
            ),
        }
    }
}

/// Collect-all validation result for a build combination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Set when the length itself is wrong.
    pub length: Option<LengthMismatch>,
    pub diagnostics: Vec<BuildDiagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LengthMismatch {
    pub expected: usize,
    pub found: usize,
}

impl ValidationReport {
    pub fn push(&mut self, position: usize, found: Option<char>, expected: impl Into<String>) {
        self.diagnostics.push(BuildDiagnostic {
            position,
            found,
            expected: expected.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.length.is_some() || !self.diagnostics.is_empty()
    }

    pub fn positions(&self) -> Vec<usize> {
        self.diagnostics.iter().map(|diag| diag.position).collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(self.diagnostics.len() + 1);
        if let Some(length) = self.length {
            parts.push(format!(
                "expected {} characters, found {}",
                length.expected, length.found
            ));
        }
        parts.extend(self.diagnostics.iter().map(ToString::to_string));
        f.write_str(&parts.join("; "))
    }
}
