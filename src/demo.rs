use std::sync::Arc;

use crate::catalog::packing::{pack_balanced, PackConfig};
use crate::catalog::{Limits, PatternCatalog};

// --------------------------
// Demo catalog (signature literals)
// --------------------------

/// Representative intrusion-detection style literals.
///
/// Families covered:
/// - path traversal / sensitive files
/// - shell and command injection
/// - SQL injection
/// - script injection
/// - scanner user agents
/// - long exploit-ish payload markers (medium/long length classes)
pub fn demo_patterns() -> Vec<Vec<u8>> {
    const LITERALS: &[&[u8]] = &[
        b"../..",
        b"/etc/passwd",
        b"/etc/shadow",
        b"cmd.exe",
        b"/bin/sh",
        b"wget http",
        b"curl -s",
        b"; rm -rf",
        b"UNION SELECT",
        b"' OR '1'='1",
        b"DROP TABLE",
        b"xp_cmdshell",
        b"<script",
        b"javascript:",
        b"onerror=",
        b"User-Agent: sqlmap",
        b"User-Agent: Nikto",
        b"masscan",
        b"() { :; }; /bin/bash -c",
        b"${jndi:ldap://",
        b"Content-Type: application/x-www-form-urlencoded; charset=evil",
        b"<?xml version=\"1.0\"?><!DOCTYPE foo [<!ENTITY xxe SYSTEM \"file:///etc/passwd\">]>",
    ];
    LITERALS.iter().map(|l| l.to_vec()).collect()
}

/// Packs [`demo_patterns`] into `partitions` balanced partitions.
///
/// # Panics
/// Panics if `partitions` is smaller than the number of length classes the
/// demo set occupies (3).
pub fn demo_catalog(partitions: usize) -> Arc<PatternCatalog> {
    let cfg = PackConfig {
        partitions,
        ..PackConfig::default()
    };
    let packed = match pack_balanced(demo_patterns(), &cfg) {
        Ok(packed) => packed,
        Err(err) => panic!("demo patterns failed to pack: {err}"),
    };
    match PatternCatalog::from_partitions(packed.partitions, &Limits::default()) {
        Ok(catalog) => Arc::new(catalog),
        Err(err) => panic!("demo catalog failed validation: {err}"),
    }
}
