//! Code size values.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Unmodified code size of a library.
///
/// Written in config either as an integer (bytes) or as a string that is
/// shown verbatim, e.g. an error from the measuring step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CodeSize {
    Raw(u64),
    Preformatted(String),
}

impl CodeSize {
    /// Text shown inside the `<code>` element.
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Self::Raw(bytes) => Cow::Owned(format_kib(*bytes)),
            Self::Preformatted(s) => Cow::Borrowed(s),
        }
    }
}

/// Format a byte count as KiB with one truncated decimal.
///
/// Both the whole and the tenths part are floored: 1000 bytes is `0.9 KiB`.
pub fn format_kib(bytes: u64) -> String {
    let whole = bytes / 1024;
    let tenths = 10 * (bytes % 1024) / 1024;
    format!("{whole}.{tenths} KiB")
}
