//! Typed decoding of raw provider payloads.
//!
//! Gardener carries provider configuration as `RawExtension` blobs inside
//! generic resources. [`ConfigDecoder`] turns those blobs into the typed
//! forms in [`super::provider`], enforcing the registered apiVersion/kind
//! pair while tolerating unknown fields, the same contract the payloads
//! have on the Go side of Gardener.

use k8s_openapi::apimachinery::pkg::runtime::RawExtension;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::provider::provider_api_version;

/// A type decodable from a provider payload.
///
/// Implementations pair a deserializable shape with the kind name the
/// payload must declare.
pub trait ProviderConfigKind: DeserializeOwned + Default {
    /// Registered kind name of the payload.
    const KIND: &'static str;
}

/// Why a payload could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload is present but not a JSON object.
    #[error("{kind} payload is not an object")]
    NotAnObject {
        /// Expected kind name.
        kind: &'static str,
    },

    /// The payload does not declare apiVersion and kind.
    #[error("{kind} payload does not declare apiVersion and kind")]
    MissingTypeMeta {
        /// Expected kind name.
        kind: &'static str,
    },

    /// The payload declares an apiVersion this decoder has not registered.
    #[error("unregistered apiVersion {api_version:?} for {kind} payload")]
    UnknownApiVersion {
        /// Expected kind name.
        kind: &'static str,
        /// apiVersion found in the payload.
        api_version: String,
    },

    /// The payload declares a different kind than expected.
    #[error("expected kind {expected:?}, payload declares {actual:?}")]
    KindMismatch {
        /// Expected kind name.
        expected: &'static str,
        /// Kind found in the payload.
        actual: String,
    },

    /// The payload has the right type but malformed content.
    #[error("{kind} payload cannot be decoded: {source}")]
    Malformed {
        /// Expected kind name.
        kind: &'static str,
        /// Underlying deserialization failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Decoder for provider payloads carried as `RawExtension`.
///
/// Built once at startup and handed to everything that needs to decode a
/// payload. It carries no mutable state, so clones are free and concurrent
/// use needs no synchronization.
#[derive(Clone, Debug)]
pub struct ConfigDecoder {
    api_version: String,
}

impl Default for ConfigDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigDecoder {
    /// Create a decoder with the provider group/version registered.
    pub fn new() -> Self {
        Self {
            api_version: provider_api_version(),
        }
    }

    /// Decode an optional raw payload into its typed form.
    ///
    /// An absent or JSON-null payload decodes to the type's zero value,
    /// meaning "no configuration provided". A present payload must be an
    /// object declaring the registered apiVersion and the expected kind;
    /// unknown fields inside it are ignored.
    pub fn decode<T: ProviderConfigKind>(
        &self,
        raw: Option<&RawExtension>,
    ) -> Result<T, DecodeError> {
        let value = match raw {
            None => return Ok(T::default()),
            Some(raw) if raw.0.is_null() => return Ok(T::default()),
            Some(raw) => &raw.0,
        };

        let object = value
            .as_object()
            .ok_or(DecodeError::NotAnObject { kind: T::KIND })?;

        let api_version = object
            .get("apiVersion")
            .and_then(Value::as_str)
            .ok_or(DecodeError::MissingTypeMeta { kind: T::KIND })?;
        if api_version != self.api_version {
            return Err(DecodeError::UnknownApiVersion {
                kind: T::KIND,
                api_version: api_version.to_string(),
            });
        }

        let kind = object
            .get("kind")
            .and_then(Value::as_str)
            .ok_or(DecodeError::MissingTypeMeta { kind: T::KIND })?;
        if kind != T::KIND {
            return Err(DecodeError::KindMismatch {
                expected: T::KIND,
                actual: kind.to_string(),
            });
        }

        T::deserialize(value).map_err(|source| DecodeError::Malformed {
            kind: T::KIND,
            source,
        })
    }
}
