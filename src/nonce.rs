use uuid::Uuid;

/// Generate a unique nonce for an IPC request, in the form `{prefix}-{uuid}`
///
/// Discord echoes the nonce back in its response, which is how a reply is
/// matched to the request that caused it.
pub fn generate_nonce(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonce_keeps_prefix() {
        assert!(generate_nonce("set-activity").starts_with("set-activity-"));
    }

    #[test]
    fn nonces_are_unique() {
        assert_ne!(generate_nonce("test"), generate_nonce("test"));
    }
}
