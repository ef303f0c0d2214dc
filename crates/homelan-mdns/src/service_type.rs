use std::fmt;

use crate::{
    AIRPLAY_SERVICE_TYPES, DEFAULT_SERVICE_TYPES, GOOGLE_CAST_SERVICE_TYPES, HOMEKIT_SERVICE_TYPES,
};

/// Domain suffix every browsed service type carries.
pub const LOCAL_DOMAIN: &str = ".local.";

/// Maximum allowed length for DNS-SD service names (RFC 6763).
const SERVICE_NAME_MAX_LEN: usize = 15;

/// Ordered set of mDNS service types to browse.
///
/// Entries keep the caller's spelling; the only normalization is trimming
/// whitespace and appending `.local.` when the domain is missing. Repeated
/// entries keep their first position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceTypeSet(Vec<String>);

impl ServiceTypeSet {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<String> = Vec::new();
        for raw in types {
            if let Some(service_type) = with_local_domain(raw.as_ref()) {
                if !entries.contains(&service_type) {
                    entries.push(service_type);
                }
            }
        }
        Self(entries)
    }

    /// Parse a comma-separated list, as passed through `SERVICE_TYPES`.
    pub fn from_csv(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// The seven well-known smart-home service types.
    pub fn defaults() -> Self {
        Self::new(DEFAULT_SERVICE_TYPES)
    }

    pub fn airplay() -> Self {
        Self::new(AIRPLAY_SERVICE_TYPES)
    }

    pub fn homekit() -> Self {
        Self::new(HOMEKIT_SERVICE_TYPES)
    }

    pub fn google_cast() -> Self {
        Self::new(GOOGLE_CAST_SERVICE_TYPES)
    }

    /// Fall back to [`ServiceTypeSet::defaults`] when empty.
    pub fn or_defaults(self) -> Self {
        if self.is_empty() {
            Self::defaults()
        } else {
            self
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

impl fmt::Display for ServiceTypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

/// Append the `.local.` domain to a service type if it is missing.
/// Returns `None` for blank input.
pub fn with_local_domain(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if s.ends_with(LOCAL_DOMAIN) {
        return Some(s.to_string());
    }
    let s = s.trim_end_matches('.');
    if s.ends_with(".local") {
        Some(format!("{s}."))
    } else {
        Some(format!("{s}{LOCAL_DOMAIN}"))
    }
}

/// Check that a service type has the DNS-SD shape `_name._tcp.local.`
/// (or `_udp`), optionally prefixed by a subtype as in
/// `_printer._sub._http._tcp.local.`. Run before a browse is registered;
/// a failure only skips that one type.
pub fn validate(service_type: &str) -> Result<(), ServiceTypeError> {
    let body = service_type
        .strip_suffix(LOCAL_DOMAIN)
        .ok_or_else(|| ServiceTypeError::Invalid(format!("missing {LOCAL_DOMAIN} domain")))?;

    let parts: Vec<&str> = body.split('.').collect();
    let (name, proto) = match parts[..] {
        [name, proto] => (name, proto),
        [subtype, "_sub", name, proto] => {
            if subtype.len() < 2 || !subtype.starts_with('_') {
                return Err(ServiceTypeError::Invalid(format!(
                    "subtype must start with '_': '{subtype}'"
                )));
            }
            (name, proto)
        }
        _ => {
            return Err(ServiceTypeError::Invalid(format!(
                "expected _name._proto or _subtype._sub._name._proto, got '{body}'"
            )))
        }
    };

    let name = name
        .strip_prefix('_')
        .ok_or_else(|| ServiceTypeError::Invalid(format!("name must start with '_': '{name}'")))?;
    let proto = proto
        .strip_prefix('_')
        .ok_or_else(|| ServiceTypeError::Invalid(format!("protocol must start with '_': '{proto}'")))?;

    if proto != "tcp" && proto != "udp" {
        return Err(ServiceTypeError::Invalid(format!(
            "protocol must be tcp or udp, got '{proto}'"
        )));
    }

    if name.is_empty() || name.len() > SERVICE_NAME_MAX_LEN {
        return Err(ServiceTypeError::Invalid(format!(
            "service name must be 1-15 characters, got '{name}'"
        )));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ServiceTypeError::Invalid(format!(
            "service name may only contain letters, digits and '-', got '{name}'"
        )));
    }

    Ok(())
}

/// Error validating a DNS-SD service type string.
#[derive(Debug, thiserror::Error)]
pub enum ServiceTypeError {
    #[error("{0}")]
    Invalid(String),
}
