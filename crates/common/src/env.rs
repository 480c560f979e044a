use std::str::FromStr;

use anyhow::{anyhow, Result};

pub trait EnvVars: Sized {
    fn load() -> Result<Self>;
}

pub fn env_required(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| anyhow!("{} is not set", key))
}

pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} has an invalid value {:?}: {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_fallbacks() {
        assert_eq!(env_or("COPILOT_COMMON_TEST_UNSET", "fallback"), "fallback");
        assert_eq!(env_parse_or::<u16>("COPILOT_COMMON_TEST_UNSET", 42).unwrap(), 42);
        assert!(env_required("COPILOT_COMMON_TEST_UNSET").is_err());
    }

    #[test]
    fn test_env_parse_rejects_garbage() {
        std::env::set_var("COPILOT_COMMON_TEST_PORT", "not-a-port");
        let err = env_parse_or::<u16>("COPILOT_COMMON_TEST_PORT", 1).unwrap_err();
        assert!(err.to_string().contains("COPILOT_COMMON_TEST_PORT"));

        std::env::set_var("COPILOT_COMMON_TEST_PORT", " 8080 ");
        assert_eq!(env_parse_or::<u16>("COPILOT_COMMON_TEST_PORT", 1).unwrap(), 8080);
        std::env::remove_var("COPILOT_COMMON_TEST_PORT");
    }
}
