use crate::{
    config::IndexConfig,
    error::{ErrorOrigin, InternalError},
    maintainer::{
        IndexMaintainer,
        codec::validate_decoded,
    },
    obs::sink::{self, MetricsEvent},
    registry::MaintainerRegistry,
    serialize::{decode_blob, encode_blob},
};
use serde::{Deserialize, Serialize};

/// Current encoding version of registry blobs.
pub const REGISTRY_FORMAT_VERSION: u8 = 1;

#[derive(Serialize)]
struct RegistryEnvelopeRef<'a> {
    version: u8,
    table: &'a str,
    maintainers: &'a [IndexMaintainer],
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryEnvelope {
    version: u8,
    table: String,
    maintainers: Vec<IndexMaintainer>,
}

impl MaintainerRegistry {
    /// Encode the registry for the table metadata store.
    pub fn to_bytes(&self) -> Result<Vec<u8>, InternalError> {
        let bytes = encode_blob(&RegistryEnvelopeRef {
            version: REGISTRY_FORMAT_VERSION,
            table: &self.table,
            maintainers: &self.maintainers,
        })
        .map_err(|err| err.into_internal(ErrorOrigin::Registry))?;

        sink::record(MetricsEvent::RegistryEncoded {
            table: &self.table,
            bytes: bytes.len() as u64,
        });
        self.debug_log(format!(
            "registry '{}': encoded {} maintainers into {} bytes",
            self.table,
            self.maintainers.len(),
            bytes.len()
        ));

        Ok(bytes)
    }

    /// Decode a registry blob under the default configuration.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InternalError> {
        Self::from_bytes_with_config(bytes, IndexConfig::default())
    }

    /// Decode a registry blob, enforcing `config` limits.
    ///
    /// Undecodable bytes, unknown versions and structurally invalid
    /// maintainers are all corruption.
    pub fn from_bytes_with_config(bytes: &[u8], config: IndexConfig) -> Result<Self, InternalError> {
        config.validate()?;

        let result = decode_envelope(bytes, config.max_registry_bytes);
        let envelope = match result {
            Ok(envelope) => envelope,
            Err(err) => {
                if err.is_format() {
                    sink::record(MetricsEvent::FormatFailure {
                        origin: ErrorOrigin::Registry,
                    });
                }
                return Err(err);
            }
        };

        let registry = Self::try_new_with_config(envelope.table, envelope.maintainers, config)?;
        sink::record(MetricsEvent::RegistryDecoded {
            table: &registry.table,
            maintainers: registry.maintainers.len() as u64,
        });
        registry.debug_log(format!(
            "registry '{}': decoded {} maintainers",
            registry.table,
            registry.maintainers.len()
        ));

        Ok(registry)
    }
}

fn decode_envelope(bytes: &[u8], max_bytes: usize) -> Result<RegistryEnvelope, InternalError> {
    let envelope: RegistryEnvelope = decode_blob(bytes, max_bytes)
        .map_err(|err| err.into_internal(ErrorOrigin::Registry))?;

    if envelope.version != REGISTRY_FORMAT_VERSION {
        return Err(InternalError::registry_corruption(format!(
            "unsupported registry format version {} (expected {REGISTRY_FORMAT_VERSION})",
            envelope.version
        )));
    }
    if envelope.table.is_empty() {
        return Err(InternalError::registry_corruption(
            "registry blob names no table",
        ));
    }
    validate_decoded(&envelope.maintainers)?;

    Ok(envelope)
}
