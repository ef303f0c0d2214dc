//! RawRecord → DeviceDescriptor conversion.
//!
//! This never fails: a field that cannot be decoded is left out of the
//! descriptor instead of failing the whole discovery window.

use std::collections::BTreeMap;
use std::net::IpAddr;

use crate::record::{DeviceDescriptor, RawRecord};

/// TXT keys consulted for the display name, in priority order.
const FRIENDLY_NAME_KEYS: [&str; 2] = ["fn", "name"];

/// TXT keys consulted for the model, in priority order.
const MODEL_KEYS: [&str; 3] = ["md", "model", "am"];

pub fn normalize(raw: RawRecord) -> DeviceDescriptor {
    let properties = decode_properties(&raw.properties);
    let addresses = ipv4_addresses(&raw.addresses);
    let friendly_name = first_present(&properties, &FRIENDLY_NAME_KEYS)
        .unwrap_or_else(|| instance_label(&raw.name).to_string());
    let model = first_present(&properties, &MODEL_KEYS);

    DeviceDescriptor {
        name: raw.name,
        service_type: raw.service_type,
        addresses,
        port: raw.port,
        hostname: raw.hostname,
        properties,
        friendly_name,
        model,
    }
}

/// Decode TXT pairs as UTF-8. A pair whose key or value does not decode is
/// dropped on its own; the first occurrence of a key wins.
fn decode_properties(pairs: &[(Vec<u8>, Vec<u8>)]) -> BTreeMap<String, String> {
    let mut properties = BTreeMap::new();
    for (key, value) in pairs {
        let (Ok(key), Ok(value)) = (std::str::from_utf8(key), std::str::from_utf8(value)) else {
            tracing::trace!(key = %String::from_utf8_lossy(key), "Dropping undecodable TXT entry");
            continue;
        };
        properties
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
    }
    properties
}

/// IPv4 addresses as dotted quads, sorted so repeated announcements of the
/// same host always yield the same primary address.
fn ipv4_addresses(addresses: &[IpAddr]) -> Vec<String> {
    let mut v4: Vec<_> = addresses
        .iter()
        .filter_map(|addr| match addr {
            IpAddr::V4(v4) => Some(*v4),
            IpAddr::V6(_) => None,
        })
        .collect();
    v4.sort();
    v4.dedup();
    v4.into_iter().map(|a| a.to_string()).collect()
}

/// First non-empty value among `keys`.
fn first_present(properties: &BTreeMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| properties.get(*k))
        .find(|v| !v.is_empty())
        .cloned()
}

/// "Living Room._googlecast._tcp.local." -> "Living Room".
/// Falls back to the whole name when the first label is empty.
fn instance_label(name: &str) -> &str {
    match name.split('.').next() {
        Some(label) if !label.is_empty() => label,
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn prop(key: &[u8], value: &[u8]) -> (Vec<u8>, Vec<u8>) {
        (key.to_vec(), value.to_vec())
    }

    fn raw(properties: Vec<(Vec<u8>, Vec<u8>)>) -> RawRecord {
        RawRecord {
            name: "Living Room._airplay._tcp.local.".into(),
            service_type: "_airplay._tcp.local.".into(),
            addresses: vec![IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20))],
            port: 7000,
            hostname: "Living-Room.local.".into(),
            properties,
        }
    }

    #[test]
    fn friendly_name_prefers_fn() {
        let d = normalize(raw(vec![prop(b"name", b"Other"), prop(b"fn", b"Den TV")]));
        assert_eq!(d.friendly_name, "Den TV");
    }

    #[test]
    fn friendly_name_falls_back_to_name_property() {
        let d = normalize(raw(vec![prop(b"name", b"Bedroom")]));
        assert_eq!(d.friendly_name, "Bedroom");
    }

    #[test]
    fn friendly_name_falls_back_to_first_label() {
        let d = normalize(raw(vec![]));
        assert_eq!(d.friendly_name, "Living Room");
    }

    #[test]
    fn empty_fn_is_skipped() {
        let d = normalize(raw(vec![prop(b"fn", b""), prop(b"name", b"Bedroom")]));
        assert_eq!(d.friendly_name, "Bedroom");
    }

    #[test]
    fn friendly_name_never_empty_for_non_empty_name() {
        let mut r = raw(vec![]);
        r.name = "._hap._tcp.local.".into();
        let d = normalize(r);
        assert_eq!(d.friendly_name, "._hap._tcp.local.");
    }

    #[test]
    fn model_priority_is_md_then_model_then_am() {
        let d = normalize(raw(vec![prop(b"am", b"AppleTV6,2"), prop(b"model", b"M2")]));
        assert_eq!(d.model.as_deref(), Some("M2"));

        let d = normalize(raw(vec![prop(b"am", b"AppleTV6,2"), prop(b"md", b"Chromecast")]));
        assert_eq!(d.model.as_deref(), Some("Chromecast"));

        let d = normalize(raw(vec![prop(b"am", b"AppleTV6,2")]));
        assert_eq!(d.model.as_deref(), Some("AppleTV6,2"));
    }

    #[test]
    fn model_absent_without_model_keys() {
        let d = normalize(raw(vec![prop(b"fn", b"Den TV")]));
        assert!(d.model.is_none());
    }

    #[test]
    fn model_absent_when_only_undecodable() {
        let d = normalize(raw(vec![prop(b"md", &[0xff, 0xfe])]));
        assert!(d.model.is_none());
    }

    #[test]
    fn undecodable_value_drops_only_that_entry() {
        let d = normalize(raw(vec![prop(b"md", &[0xc3, 0x28]), prop(b"fn", b"Den TV")]));
        assert!(!d.properties.contains_key("md"));
        assert_eq!(d.properties.get("fn").map(String::as_str), Some("Den TV"));
    }

    #[test]
    fn undecodable_key_is_dropped() {
        let d = normalize(raw(vec![prop(&[0xff], b"x"), prop(b"id", b"abc")]));
        assert_eq!(d.properties.len(), 1);
        assert_eq!(d.properties.get("id").map(String::as_str), Some("abc"));
    }

    #[test]
    fn missing_addresses_yield_empty_list() {
        let mut r = raw(vec![]);
        r.addresses.clear();
        let d = normalize(r);
        assert!(d.addresses.is_empty());
        assert!(d.primary_address().is_none());
    }

    #[test]
    fn ipv6_addresses_are_omitted_and_ipv4_sorted() {
        let mut r = raw(vec![]);
        r.addresses = vec![
            IpAddr::V4(Ipv4Addr::new(192, 168, 1, 30)),
            IpAddr::V6(Ipv6Addr::LOCALHOST),
            IpAddr::V4(Ipv4Addr::new(192, 168, 1, 4)),
        ];
        let d = normalize(r);
        assert_eq!(d.addresses, vec!["192.168.1.4", "192.168.1.30"]);
    }

    #[test]
    fn raw_fields_are_carried_over() {
        let d = normalize(raw(vec![]));
        assert_eq!(d.name, "Living Room._airplay._tcp.local.");
        assert_eq!(d.service_type, "_airplay._tcp.local.");
        assert_eq!(d.port, 7000);
        assert_eq!(d.hostname, "Living-Room.local.");
    }
}
