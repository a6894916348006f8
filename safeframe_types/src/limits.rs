//! Bounds applied while reading untrusted streams.
//!
//! Every length prefix read from a stream is checked against these limits
//! before any memory is reserved for it, and every nested record counts
//! against the depth limit.

use anyhow::{anyhow, Result};
use std::env;
use std::str::FromStr;

pub const ENV_VAR_MAX_COLLECTION_LEN: &str = "SAFEFRAME_MAX_COLLECTION_LEN";

pub const ENV_VAR_MAX_BODY_LEN: &str = "SAFEFRAME_MAX_BODY_LEN";

pub const ENV_VAR_MAX_DEPTH: &str = "SAFEFRAME_MAX_DEPTH";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ReadLimits {
    /// Max members of a list, or elements of an array.
    pub max_collection_len: u32,
    /// Max byte length of a single bytes or string body.
    pub max_body_len: u32,
    /// Max nesting of lists and extension records.
    pub max_depth: u16,
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            max_collection_len: 1 << 28,
            max_body_len: 1 << 30,
            max_depth: 64,
        }
    }
}

impl ReadLimits {
    /// Defaults, overridden by whichever `SAFEFRAME_*` env vars are set.
    pub fn from_env() -> Result<Self> {
        let dflt = Self::default();
        Ok(Self {
            max_collection_len: env_or(ENV_VAR_MAX_COLLECTION_LEN, dflt.max_collection_len)?,
            max_body_len: env_or(ENV_VAR_MAX_BODY_LEN, dflt.max_body_len)?,
            max_depth: env_or(ENV_VAR_MAX_DEPTH, dflt.max_depth)?,
        })
    }

    pub fn check_collection_len(&self, len: u32) -> Result<()> {
        if len > self.max_collection_len {
            return Err(anyhow!(
                "Collection length {} exceeds limit {}",
                len,
                self.max_collection_len
            ));
        }
        Ok(())
    }

    pub fn check_body_len(&self, len: u32) -> Result<()> {
        if len > self.max_body_len {
            return Err(anyhow!(
                "Body length {} exceeds limit {}",
                len,
                self.max_body_len
            ));
        }
        Ok(())
    }
}

fn env_or<T>(var: &str, dflt: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(var) {
        Err(_) => Ok(dflt),
        Ok(s) => s
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("Invalid {}={:?}: {}", var, s, e)),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn checks() {
        let limits = ReadLimits {
            max_collection_len: 3,
            max_body_len: 5,
            max_depth: 2,
        };
        assert!(limits.check_collection_len(3).is_ok());
        assert!(limits.check_collection_len(4).is_err());
        assert!(limits.check_body_len(5).is_ok());
        assert!(limits.check_body_len(6).is_err());
    }

    #[test]
    fn env_override() -> Result<()> {
        assert_eq!(env_or("SAFEFRAME_TEST_UNSET_VAR", 7u16)?, 7);

        env::set_var("SAFEFRAME_TEST_DEPTH_VAR", " 12 ");
        assert_eq!(env_or("SAFEFRAME_TEST_DEPTH_VAR", 7u16)?, 12);

        env::set_var("SAFEFRAME_TEST_BAD_VAR", "twelve");
        assert!(env_or("SAFEFRAME_TEST_BAD_VAR", 7u16).is_err());

        Ok(())
    }
}
