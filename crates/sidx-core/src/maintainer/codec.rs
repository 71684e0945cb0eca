use crate::{
    config::DEFAULT_MAX_REGISTRY_BYTES,
    error::{ErrorOrigin, InternalError},
    maintainer::IndexMaintainer,
    serialize::{decode_blob, encode_blob},
};
use serde::{Deserialize, Serialize};

/// Current encoding version of serialized maintainer lists.
pub const MAINTAINER_FORMAT_VERSION: u8 = 1;

#[derive(Serialize)]
struct MaintainerListRef<'a> {
    version: u8,
    maintainers: &'a [IndexMaintainer],
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MaintainerList {
    version: u8,
    maintainers: Vec<IndexMaintainer>,
}

impl IndexMaintainer {
    /// Encode a list of maintainers into a self-contained byte blob.
    pub fn serialize(maintainers: &[Self]) -> Result<Vec<u8>, InternalError> {
        encode_blob(&MaintainerListRef {
            version: MAINTAINER_FORMAT_VERSION,
            maintainers,
        })
        .map_err(|err| err.into_internal(ErrorOrigin::Maintainer))
    }

    /// Decode a blob produced by [`IndexMaintainer::serialize`].
    pub fn deserialize(bytes: &[u8]) -> Result<Vec<Self>, InternalError> {
        Self::deserialize_bounded(bytes, DEFAULT_MAX_REGISTRY_BYTES)
    }

    /// Decode with an explicit input size limit.
    pub fn deserialize_bounded(bytes: &[u8], max_bytes: usize) -> Result<Vec<Self>, InternalError> {
        let list: MaintainerList = decode_blob(bytes, max_bytes)
            .map_err(|err| err.into_internal(ErrorOrigin::Maintainer))?;
        check_version(ErrorOrigin::Maintainer, list.version)?;
        validate_decoded(&list.maintainers)?;

        Ok(list.maintainers)
    }
}

fn check_version(origin: ErrorOrigin, version: u8) -> Result<(), InternalError> {
    if version == MAINTAINER_FORMAT_VERSION {
        Ok(())
    } else {
        Err(InternalError::corruption(
            origin,
            format!(
                "unsupported maintainer format version {version} (expected {MAINTAINER_FORMAT_VERSION})"
            ),
        ))
    }
}

/// Structural checks on decoded maintainers; violations are corruption.
pub(crate) fn validate_decoded(maintainers: &[IndexMaintainer]) -> Result<(), InternalError> {
    for maintainer in maintainers {
        maintainer.check_invariants().map_err(|msg| {
            InternalError::corruption(ErrorOrigin::Maintainer, format!("decoded {msg}"))
        })?;
    }

    Ok(())
}
