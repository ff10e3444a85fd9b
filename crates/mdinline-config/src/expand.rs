//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MDINLINE_TEST_SIMPLE", "docs");
        }
        let result = expand_env("${MDINLINE_TEST_SIMPLE}", "working_dir").unwrap();
        assert_eq!(result, "docs");
        unsafe {
            std::env::remove_var("MDINLINE_TEST_SIMPLE");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MDINLINE_TEST_UNSET");
        }
        let result = expand_env("${MDINLINE_TEST_UNSET:-mmdc}", "renderer.command").unwrap();
        assert_eq!(result, "mmdc");
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MDINLINE_TEST_MISSING");
        }
        let err = expand_env("${MDINLINE_TEST_MISSING}", "diagrams.caption").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MDINLINE_TEST_MISSING"));
        assert!(err.to_string().contains("diagrams.caption"));
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MDINLINE_TEST_HOME", "/home/docs");
        }
        let result = expand_env("${MDINLINE_TEST_HOME}/guides", "working_dir").unwrap();
        assert_eq!(result, "/home/docs/guides");
        unsafe {
            std::env::remove_var("MDINLINE_TEST_HOME");
        }
    }

    #[test]
    fn test_expand_literal_unchanged() {
        let result = expand_env("流程图", "diagrams.caption").unwrap();
        assert_eq!(result, "流程图");
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("$VAR", "renderer.command").unwrap();
        assert_eq!(result, "$VAR");
    }
}
