//! Runtime secret resolution.
//!
//! Config stores env var NAMES (`store.url_env`, `router.password_env`).
//! Callers resolve them once at startup and pass the result into
//! constructors. Errors name the variable, never its value, and `Debug`
//! output is redacted.

use anyhow::{bail, Result};

use crate::Settings;

/// Which credentials a command needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretScope {
    /// Store URL only (dry runs, status probes).
    Store,
    /// Store URL and router password.
    Full,
}

#[derive(Clone)]
pub struct ResolvedSecrets {
    pub database_url: String,
    /// `None` when resolved with [`SecretScope::Store`].
    pub router_password: Option<String>,
}

impl std::fmt::Debug for ResolvedSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSecrets")
            .field("database_url", &"<REDACTED>")
            .field(
                "router_password",
                &self.router_password.as_ref().map(|_| "<REDACTED>"),
            )
            .finish()
    }
}

/// Returns `None` if the variable is unset or blank.
fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

pub fn resolve_secrets(settings: &Settings, scope: SecretScope) -> Result<ResolvedSecrets> {
    let url_var = settings.store.url_env.trim();
    let Some(database_url) = resolve_env(url_var) else {
        bail!(
            "SECRETS_MISSING: required env var '{}' (store url) is not set or empty",
            url_var
        );
    };

    let router_password = match scope {
        SecretScope::Store => None,
        SecretScope::Full => {
            let pw_var = settings.router.password_env.trim();
            match resolve_env(pw_var) {
                Some(pw) => Some(pw),
                None => bail!(
                    "SECRETS_MISSING: required env var '{}' (router password) is not set or empty",
                    pw_var
                ),
            }
        }
    };

    Ok(ResolvedSecrets {
        database_url,
        router_password,
    })
}
