use subtle::ConstantTimeEq;
use triage_core::{AccessContext, AccessGate};

/// Grants privilege to callers presenting the configured doctor API key.
///
/// With no key configured every caller is refused, so a missing `TRIAGE_API_KEY` can never
/// open the queue to anonymous callers.
#[derive(Clone, Default)]
pub struct ApiKeyGate {
    expected: Option<String>,
}

impl ApiKeyGate {
    pub fn new(key: impl Into<String>) -> Self {
        Self::from_env_value(Some(key.into()))
    }

    /// Builds the gate from an optional configured key. Blank keys count as unset.
    pub fn from_env_value(value: Option<String>) -> Self {
        let expected = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        if expected.is_none() {
            tracing::warn!("no API key configured; privileged operations are disabled");
        }
        Self { expected }
    }

    pub fn is_configured(&self) -> bool {
        self.expected.is_some()
    }
}

impl AccessGate for ApiKeyGate {
    fn is_privileged(&self, ctx: &AccessContext) -> bool {
        match (self.expected.as_deref(), ctx.token()) {
            (Some(expected), Some(provided)) => {
                expected.as_bytes().ct_eq(provided.as_bytes()).into()
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for ApiKeyGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyGate")
            .field("configured", &self.is_configured())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_key_is_privileged() {
        let gate = ApiKeyGate::new("doctor123");
        assert!(gate.is_privileged(&AccessContext::with_token("doctor123")));
    }

    #[test]
    fn wrong_or_missing_key_is_refused() {
        let gate = ApiKeyGate::new("doctor123");
        assert!(!gate.is_privileged(&AccessContext::with_token("doctor12")));
        assert!(!gate.is_privileged(&AccessContext::with_token("doctor1234")));
        assert!(!gate.is_privileged(&AccessContext::anonymous()));
    }

    #[test]
    fn unconfigured_gate_refuses_everyone() {
        let gate = ApiKeyGate::from_env_value(Some("   ".into()));
        assert!(!gate.is_configured());
        assert!(!gate.is_privileged(&AccessContext::with_token("   ")));
        assert!(!gate.is_privileged(&AccessContext::with_token("anything")));
    }

    #[test]
    fn debug_does_not_leak_key() {
        let rendered = format!("{:?}", ApiKeyGate::new("doctor123"));
        assert!(!rendered.contains("doctor123"));
    }
}
