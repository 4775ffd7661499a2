//! Request tracing context threaded through store operations.

use uuid::Uuid;

/// Identifies one adapter request in log output.
///
/// Adapters that already carry a correlation id pass it through; everything
/// else gets a generated one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    /// Context with a generated v4 UUID request id.
    pub fn with_generated_id() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::with_generated_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = RequestContext::with_generated_id();
        let b = RequestContext::with_generated_id();
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn explicit_id_is_kept() {
        let ctx = RequestContext::new("req-42");
        assert_eq!(ctx.request_id, "req-42");
    }
}
