// src/core/nmap.rs

//! Builds domain-file lines out of an nmap XML report (`nmap -oX`), so a port
//! scan can feed the prober directly.

use tracing::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

// nmap writes one tag per element with double-quoted attributes, which is all
// these patterns rely on.
static RE_HOST: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<host\b[^>]*>(.*?)</host>").unwrap());
static RE_HOSTNAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"<hostname\b([^>]*)>").unwrap());
static RE_PORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<port\b([^>]*)>(.*?)</port>").unwrap());
static RE_STATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<state\b([^>]*)>").unwrap());
static RE_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"([\w-]+)="([^"]*)""#).unwrap());

fn attribute<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    RE_ATTR
        .captures_iter(attrs)
        .find(|c| &c[1] == name)
        .and_then(|c| c.get(2))
        .map(|m| m.as_str())
}

/// Extracts `<hostname> <port>,<port>...` lines from an nmap XML report.
///
/// Only ports reported `open` over `protocol` are kept, in report order. Hosts
/// without a hostname or without a qualifying port are skipped. The result is
/// de-duplicated and sorted by hostname.
pub fn domain_lines(xml: &str, protocol: &str) -> Vec<String> {
    let mut entries = BTreeSet::new();

    for host in RE_HOST.captures_iter(xml) {
        let body = &host[1];
        let hostnames: Vec<&str> = RE_HOSTNAME
            .captures_iter(body)
            .filter_map(|c| attribute(c.get(1)?.as_str(), "name"))
            .collect();
        if hostnames.is_empty() {
            continue;
        }

        let open_ports: Vec<&str> = RE_PORT
            .captures_iter(body)
            .filter_map(|port| {
                let attrs = port.get(1)?.as_str();
                let inner = port.get(2)?.as_str();
                let state = RE_STATE
                    .captures(inner)
                    .and_then(|s| attribute(s.get(1)?.as_str(), "state"));
                if state == Some("open") && attribute(attrs, "protocol") == Some(protocol) {
                    attribute(attrs, "portid")
                } else {
                    None
                }
            })
            .collect();
        if open_ports.is_empty() {
            continue;
        }

        let ports = open_ports.join(",");
        for name in hostnames {
            entries.insert((name.to_string(), ports.clone()));
        }
    }

    debug!(entries = entries.len(), protocol, "Parsed nmap report.");
    entries
        .into_iter()
        .map(|(name, ports)| format!("{name} {ports}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<nmaprun scanner="nmap" args="nmap -oX - example.com">
<hosthint><status state="up"/><hostnames><hostname name="ignored.example" type="user"/></hostnames></hosthint>
<host starttime="1" endtime="2"><status state="up" reason="syn-ack"/>
<address addr="93.184.216.34" addrtype="ipv4"/>
<hostnames>
<hostname name="www.example.com" type="user"/>
<hostname name="example.com" type="PTR"/>
</hostnames>
<ports><extraports state="filtered" count="997"/>
<port protocol="tcp" portid="80"><state state="open" reason="syn-ack" reason_ttl="56"/><service name="http" method="table" conf="3"/></port>
<port protocol="tcp" portid="22"><state state="closed" reason="reset" reason_ttl="56"/></port>
<port protocol="udp" portid="53"><state state="open" reason="udp-response"/></port>
<port protocol="tcp" portid="443"><state state="open" reason="syn-ack" reason_ttl="56"/><script id="ssl-cert" output="x"/></port>
</ports>
</host>
<host><status state="up"/><address addr="10.0.0.1" addrtype="ipv4"/><hostnames/>
<ports><port protocol="tcp" portid="80"><state state="open"/></port></ports>
</host>
<host><status state="up"/><address addr="10.0.0.2" addrtype="ipv4"/>
<hostnames><hostname name="alpha.internal" type="user"/></hostnames>
<ports><port protocol="tcp" portid="8080"><state state="open"/></port></ports>
</host>
<host><status state="up"/>
<hostnames><hostname name="closed.internal" type="user"/></hostnames>
<ports><port protocol="tcp" portid="25"><state state="filtered"/></port></ports>
</host>
<runstats><finished time="3"/></runstats>
</nmaprun>"#;

    #[test]
    fn collects_open_tcp_ports_per_hostname() {
        assert_eq!(
            domain_lines(REPORT, "tcp"),
            vec![
                "alpha.internal 8080".to_string(),
                "example.com 80,443".to_string(),
                "www.example.com 80,443".to_string(),
            ]
        );
    }

    #[test]
    fn protocol_filter_is_honoured() {
        assert_eq!(
            domain_lines(REPORT, "udp"),
            vec!["example.com 53".to_string(), "www.example.com 53".to_string()]
        );
    }

    #[test]
    fn duplicates_collapse() {
        let twice = format!("{REPORT}{REPORT}");
        assert_eq!(domain_lines(&twice, "tcp").len(), 3);
    }

    #[test]
    fn empty_report_yields_nothing() {
        assert!(domain_lines("<nmaprun></nmaprun>", "tcp").is_empty());
    }
}
