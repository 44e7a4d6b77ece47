// src/core/scanner/request.rs

use crate::core::models::Job;

/// User agent sent with every probe.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:81.0) Gecko/20100101 Firefox/81.0";

/// Accept header sent with every probe.
pub const ACCEPT: &str = "text/html;q=0.9,*/*;q=0.8";

/// Builds the probe request. The target domain travels in the query string
/// while `Host` names the collaborator, so a server that fetches its own
/// `Host` reveals itself there.
#[derive(Debug, Clone, Copy)]
pub struct ProbeRequest<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub domain: &'a str,
    pub collaborator_host: &'a str,
}

impl<'a> ProbeRequest<'a> {
    pub fn for_job(job: &'a Job) -> Self {
        Self {
            method: job.method(),
            path: job.path(),
            domain: job.domain(),
            collaborator_host: job.collaborator_host(),
        }
    }

    /// Renders the request into the exact bytes written to the socket.
    pub fn to_bytes(&self) -> Box<[u8]> {
        format!(
            "{method} {path}?domain={domain} HTTP/1.1\r\n\
             Host: {host}\r\n\
             User-Agent: {USER_AGENT}\r\n\
             Accept: {ACCEPT}\r\n\
             Connection: Close\r\n\r\n",
            method = self.method,
            path = self.path,
            domain = self.domain,
            host = self.collaborator_host,
        )
        .into_bytes()
        .into_boxed_slice()
    }
}
