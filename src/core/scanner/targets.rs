// src/core/scanner/targets.rs

use tracing::{debug, error};

use crate::core::errors::ProbeError;
use crate::core::models::TargetDescriptor;
use std::path::Path;
use std::sync::Arc;

/// Reads a UTF-8 input file into its lines. Line endings (`\n` or `\r\n`) are
/// stripped; everything else is kept verbatim, including empty lines.
pub fn read_lines(path: &Path) -> Result<Vec<String>, ProbeError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        error!(path = %path.display(), error = %source, "Cannot read input file.");
        ProbeError::ConfigFile {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let lines: Vec<String> = content.lines().map(str::to_string).collect();
    debug!(path = %path.display(), lines = lines.len(), "Input file loaded.");
    Ok(lines)
}

/// Reads the path file. Paths are used as-is: no normalisation and no
/// leading-slash enforcement.
pub fn load_paths(path: &Path) -> Result<Vec<Arc<str>>, ProbeError> {
    Ok(read_lines(path)?.into_iter().map(Arc::from).collect())
}

/// Reads and parses the domain file.
pub fn load_targets(path: &Path) -> Result<Vec<TargetDescriptor>, ProbeError> {
    let lines = read_lines(path)?;
    parse_targets(lines.as_slice(), path)
}

/// Parses domain-file lines of the form `<domain> <port>[,<port>...]`.
///
/// Fields are separated by runs of whitespace, so `a.com  80` parses the same
/// as `a.com 80`. The first field is the domain and the second the
/// comma-separated port list; any later fields are ignored. Every port token
/// must be a non-negative integer, and the token text itself is what gets
/// stored. A single bad line fails the whole load and `source` is named in
/// the error.
pub fn parse_targets<S: AsRef<str>>(
    lines: &[S],
    source: &Path,
) -> Result<Vec<TargetDescriptor>, ProbeError> {
    let format_error = |line: usize, reason: String| ProbeError::Format {
        file: source.to_path_buf(),
        line,
        reason,
    };

    let mut targets = Vec::with_capacity(lines.len());
    for (index, raw) in lines.iter().enumerate() {
        let line_no = index + 1;
        let mut fields = raw.as_ref().split_whitespace();
        let (domain, port_list) = match (fields.next(), fields.next()) {
            (Some(domain), Some(ports)) => (domain, ports),
            _ => return Err(format_error(line_no, "expected `<domain> <port>[,<port>...]`".into())),
        };

        let mut ports = Vec::new();
        for token in port_list.split(',') {
            if token.parse::<u64>().is_err() {
                return Err(format_error(line_no, format!("port `{token}` is not a number")));
            }
            ports.push(Arc::from(token));
        }

        targets.push(TargetDescriptor {
            domain: Arc::from(domain),
            ports,
        });
    }

    Ok(targets)
}
