//! Rendered outbound messages.

use serde::{Deserialize, Serialize};

/// A rendered message ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    subject: String,
    html_body: String,
    recipients: Vec<String>,
}

impl OutboundMessage {
    /// Creates a message with a de-duplicated recipient list.
    #[must_use]
    pub fn new<I, S>(subject: impl Into<String>, html_body: impl Into<String>, recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            subject: subject.into(),
            html_body: html_body.into(),
            recipients: collect_recipients(recipients),
        }
    }

    /// Returns the subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the HTML body.
    #[must_use]
    pub fn html_body(&self) -> &str {
        &self.html_body
    }

    /// Returns the recipients in delivery order.
    #[must_use]
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }
}

/// Trims addresses, drops blanks, and removes repeats while keeping the
/// first occurrence.
///
/// Comparison ignores ASCII case.
#[must_use]
pub fn collect_recipients<I, S>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut recipients: Vec<String> = Vec::new();
    for candidate in candidates {
        let address = candidate.as_ref().trim();
        if address.is_empty() {
            continue;
        }
        if recipients
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(address))
        {
            continue;
        }
        recipients.push(address.to_owned());
    }
    recipients
}
