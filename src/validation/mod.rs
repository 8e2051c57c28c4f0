//! Field-level validation for vSphere provider configuration.
//!
//! Validators are pure functions that collect every violation found in an
//! object into a [`FieldErrorList`]; an empty list means the object is valid.
//! Paths are rendered in the Kubernetes style
//! (`spec.provider.controlPlaneConfig.loadBalancerSize`).

pub mod cloud_profile;
pub mod control_plane;
pub mod infrastructure;
pub mod shoot;

use std::fmt;

/// A dotted path to the field an error refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(String);

impl FieldPath {
    /// Create a path rooted at the given field name.
    pub fn new(root: impl Into<String>) -> Self {
        Self(root.into())
    }

    /// Append a child field to the path.
    pub fn child(&self, name: &str) -> Self {
        Self(format!("{}.{name}", self.0))
    }

    /// Append a list index to the path.
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The category of a field validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A mandatory field is missing or empty.
    Required,
    /// A field value fails a format or consistency check.
    Invalid,
    /// A field value is outside a closed set of supported values.
    NotSupported,
    /// A field must not be set or changed.
    Forbidden,
    /// A value occurs more than once where uniqueness is required.
    Duplicate,
}

/// A single path-qualified validation failure.
///
/// Renders the way `kubectl` users expect field errors to read, for example
/// `spec.provider.workers[0].zones: Required value: at least one zone must
/// be configured`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Path of the offending field.
    pub path: FieldPath,
    /// Failure category.
    pub kind: ErrorKind,
    /// Offending value in display form, if the category carries one.
    pub value: Option<String>,
    /// Human-readable explanation.
    pub detail: String,
}

impl FieldError {
    /// A mandatory field is missing or empty.
    pub fn required(path: FieldPath, detail: impl Into<String>) -> Self {
        Self {
            path,
            kind: ErrorKind::Required,
            value: None,
            detail: detail.into(),
        }
    }

    /// A string-valued field fails a check. The value renders quoted.
    pub fn invalid(path: FieldPath, value: &str, detail: impl Into<String>) -> Self {
        Self {
            path,
            kind: ErrorKind::Invalid,
            value: Some(format!("{value:?}")),
            detail: detail.into(),
        }
    }

    /// A non-string field fails a check. The value renders as given.
    pub fn invalid_value(path: FieldPath, value: impl fmt::Display, detail: impl Into<String>) -> Self {
        Self {
            path,
            kind: ErrorKind::Invalid,
            value: Some(value.to_string()),
            detail: detail.into(),
        }
    }

    /// A field value is outside the set of supported values.
    pub fn not_supported(path: FieldPath, value: &str, supported: &[&str]) -> Self {
        let supported = supported
            .iter()
            .map(|s| format!("{s:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            path,
            kind: ErrorKind::NotSupported,
            value: Some(format!("{value:?}")),
            detail: format!("supported values: {supported}"),
        }
    }

    /// A field must not be set or changed.
    pub fn forbidden(path: FieldPath, detail: impl Into<String>) -> Self {
        Self {
            path,
            kind: ErrorKind::Forbidden,
            value: None,
            detail: detail.into(),
        }
    }

    /// A value occurs more than once where uniqueness is required.
    pub fn duplicate(path: FieldPath, value: &str) -> Self {
        Self {
            path,
            kind: ErrorKind::Duplicate,
            value: Some(format!("{value:?}")),
            detail: String::new(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.value.as_deref().unwrap_or("");
        match self.kind {
            ErrorKind::Required => write!(f, "{}: Required value: {}", self.path, self.detail),
            ErrorKind::Invalid => {
                write!(f, "{}: Invalid value: {value}: {}", self.path, self.detail)
            }
            ErrorKind::NotSupported => {
                write!(f, "{}: Unsupported value: {value}: {}", self.path, self.detail)
            }
            ErrorKind::Forbidden => write!(f, "{}: Forbidden: {}", self.path, self.detail),
            ErrorKind::Duplicate => write!(f, "{}: Duplicate value: {value}", self.path),
        }
    }
}

/// An ordered collection of field validation failures.
///
/// Validators append to one list per object so that a single admission
/// response reports everything wrong with that object at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrorList(Vec<FieldError>);

impl FieldErrorList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single failure.
    pub fn push(&mut self, err: FieldError) {
        self.0.push(err);
    }

    /// Append all failures from another list, preserving order.
    pub fn append(&mut self, mut other: FieldErrorList) {
        self.0.append(&mut other.0);
    }

    /// `true` when no failures were recorded, meaning the object is valid.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the recorded failures in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Reduce the list to a single error, or `None` when the list is empty.
    ///
    /// Exact duplicate messages are dropped, keeping the first occurrence,
    /// so repeated violations of the same rule read once.
    pub fn to_aggregate(&self) -> Option<AggregatedError> {
        let mut messages: Vec<String> = Vec::with_capacity(self.0.len());
        for err in &self.0 {
            let msg = err.to_string();
            if !messages.contains(&msg) {
                messages.push(msg);
            }
        }
        if messages.is_empty() {
            None
        } else {
            Some(AggregatedError { messages })
        }
    }
}

impl IntoIterator for FieldErrorList {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrorList {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<FieldError> for FieldErrorList {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// All failures from one validation pass, reduced to a single error.
///
/// Messages are joined the way Kubernetes aggregates them: a single failure
/// renders bare, several render bracketed and comma-separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedError {
    messages: Vec<String>,
}

impl AggregatedError {
    /// The individual failure messages, deduplicated, in insertion order.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl fmt::Display for AggregatedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.messages.as_slice() {
            [single] => f.write_str(single),
            many => write!(f, "[{}]", many.join(", ")),
        }
    }
}

impl std::error::Error for AggregatedError {}
