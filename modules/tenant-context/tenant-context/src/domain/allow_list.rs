//! Allow-list of capabilities reachable through the tenant context.
//!
//! The list is a Java-style properties file. Keys are free-form labels; the
//! **values** are the canonical capability names:
//!
//! ```text
//! # capabilities tenant code may look up
//! invoice.store = com.example.billing.InvoiceStore
//! mailer: com.example.mail.Mailer
//! ```

use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::Path;

use tenant_context_sdk::{CapabilityId, TenantContextError};

/// Canonical capability names permitted for lookup. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityAllowList {
    names: BTreeSet<String>,
}

impl CapabilityAllowList {
    /// Denies everything.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from properties-file text. A repeated key keeps only its last
    /// value; every remaining non-empty value is allowed.
    #[must_use]
    pub fn parse(contents: &str) -> Self {
        let entries: HashMap<String, String> = parse_properties(contents).into_iter().collect();
        Self::from_names(entries.into_values().filter(|value| !value.is_empty()))
    }

    /// Load from `path`. A missing file yields an empty list.
    ///
    /// # Errors
    /// Returns [`TenantContextError::Initialization`] if the file exists but cannot be read.
    pub fn load(path: &Path) -> Result<Self, TenantContextError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let list = Self::parse(&contents);
                tracing::info!(
                    path = %path.display(),
                    allowed = list.len(),
                    "capability allow-list loaded"
                );
                Ok(list)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(
                    path = %path.display(),
                    "no capability allow-list; capability lookups are disabled"
                );
                Ok(Self::empty())
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "cannot load capability allow-list");
                Err(TenantContextError::Initialization {
                    reason: format!("cannot load {}: {e}", path.display()),
                })
            }
        }
    }

    #[must_use]
    pub fn permits(&self, id: &CapabilityId) -> bool {
        self.names.contains(id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Parse properties text into `(key, value)` pairs in file order.
#[must_use]
pub fn parse_properties(contents: &str) -> Vec<(String, String)> {
    logical_lines(contents)
        .iter()
        .map(|line| split_entry(line))
        .collect()
}

/// Join continuation lines and drop blanks and comments.
fn logical_lines(contents: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut pending: Option<String> = None;

    for raw in contents.lines() {
        let line = raw.trim_start();
        if pending.is_none() && (line.is_empty() || line.starts_with('#') || line.starts_with('!'))
        {
            continue;
        }

        let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
        let continues = trailing % 2 == 1;
        let body = if continues {
            &line[..line.len() - 1]
        } else {
            line
        };

        pending.get_or_insert_with(String::new).push_str(body);
        if !continues {
            out.extend(pending.take());
        }
    }

    // A continuation on the last line just ends the entry.
    out.extend(pending);
    out
}

fn split_entry(line: &str) -> (String, String) {
    let mut key = String::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    push_escaped(&mut key, escaped, &mut chars);
                }
            }
            '=' | ':' => break,
            c if c.is_whitespace() => {
                while chars.next_if(|c| c.is_whitespace()).is_some() {}
                chars.next_if(|c| *c == '=' || *c == ':');
                break;
            }
            c => key.push(c),
        }
    }

    while chars.next_if(|c| c.is_whitespace()).is_some() {}

    let mut value = String::new();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                push_escaped(&mut value, escaped, &mut chars);
            }
        } else {
            value.push(c);
        }
    }

    (key, value.trim_end().to_owned())
}

fn push_escaped<I>(out: &mut String, escaped: char, rest: &mut std::iter::Peekable<I>)
where
    I: Iterator<Item = char>,
{
    match escaped {
        't' => out.push('\t'),
        'n' => out.push('\n'),
        'r' => out.push('\r'),
        'f' => out.push('\u{c}'),
        'u' => {
            let hex: String = (0..4).filter_map(|_| rest.next()).collect();
            match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                Some(ch) => out.push(ch),
                None => {
                    out.push('u');
                    out.push_str(&hex);
                }
            }
        }
        other => out.push(other),
    }
}
