use crate::errors::ApiError;

/// Entry names become filename segments. Restrict them to characters that
/// keep the filename/name round-trip intact and cannot leave the store
/// directory; the stores themselves stay permissive.
pub fn validate_entry_name(name: &str) -> Result<(), ApiError> {
    if is_valid_entry_name(name) {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!("invalid entry name: {:?}", name)))
    }
}

fn is_valid_entry_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'='))
}

#[cfg(test)]
mod tests {
    use super::is_valid_entry_name;

    #[test]
    fn accepts_plain_names() {
        for name in ["edge", "orders-v2", "a.b", "team=blue", "my_router", "R2"] {
            assert!(is_valid_entry_name(name), "{name}");
        }
    }

    #[test]
    fn rejects_path_breaking_names() {
        for name in ["", "a/b", "../escape", "a b", "caf\u{e9}", "a\\b"] {
            assert!(!is_valid_entry_name(name), "{name}");
        }
    }
}
