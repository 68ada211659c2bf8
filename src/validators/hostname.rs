//! Host and port splitting.

/// Split `host:port` or `[host]:port` into its parts.
///
/// Returns `None` when there is no port to split off, including bare IPv6 literals
/// such as `::1` and bracketed hosts without a port.
pub fn split_host_port(hostport: &str) -> Option<(&str, &str)> {
    let colon = hostport.rfind(':')?;

    let host = if let Some(rest) = hostport.strip_prefix('[') {
        let close = rest.find(']')? + 1;
        if close + 1 != colon {
            return None;
        }
        &hostport[1..close]
    } else {
        let host = &hostport[..colon];
        if host.contains(':') || host.contains('[') || host.contains(']') {
            return None;
        }
        host
    };

    Some((host, &hostport[colon + 1..]))
}

/// Strip a `:port` suffix if one is present, and the brackets around an IPv6 literal.
///
/// ```rust
/// use preflight_config::validators::normalize_hostname;
///
/// assert_eq!(normalize_hostname("example.com:443"), "example.com");
/// assert_eq!(normalize_hostname("example.com"), "example.com");
/// assert_eq!(normalize_hostname("[::1]:8443"), "::1");
/// assert_eq!(normalize_hostname("[::1]"), "::1");
/// ```
pub fn normalize_hostname(hostname: &str) -> &str {
    match split_host_port(hostname) {
        Some((host, _)) => host,
        None => hostname
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(hostname),
    }
}
