use crate::{
    key::{
        KeyField,
        ordered::{FieldPosition, KeyDecodeError, ValueEncodeError, decode_field, encode_field},
    },
    value::Value,
};
use serde::{Deserialize, Serialize};

///
/// KeySchema
///
/// Ordered field list of one composite row key.
/// Building and parsing walk the same list so `parse_key(build_key(v)) == v`.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct KeySchema {
    fields: Vec<KeyField>,
}

impl KeySchema {
    #[must_use]
    pub const fn new(fields: Vec<KeyField>) -> Self {
        Self { fields }
    }

    #[must_use]
    pub const fn fields(&self) -> &[KeyField] {
        self.fields.as_slice()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Concatenate the ordered encodings of `values` in declared order.
    pub fn build_key(&self, values: &[Value]) -> Result<Vec<u8>, ValueEncodeError> {
        let mut out = Vec::new();
        self.push_key(&mut out, values)?;

        Ok(out)
    }

    /// Append the composite encoding of `values` to `out`.
    pub fn push_key(&self, out: &mut Vec<u8>, values: &[Value]) -> Result<(), ValueEncodeError> {
        if values.len() != self.fields.len() {
            return Err(ValueEncodeError::ArityMismatch {
                expected: self.fields.len(),
                found: values.len(),
            });
        }

        let start = out.len();
        let len = self.fields.len();
        for (idx, (field, value)) in self.fields.iter().zip(values).enumerate() {
            if let Err(err) = encode_field(out, field, value, FieldPosition::of(idx, len)) {
                out.truncate(start);
                return Err(err);
            }
        }

        Ok(())
    }

    /// Split `bytes` back into exactly one value per declared field.
    pub fn parse_key(&self, bytes: &[u8]) -> Result<Vec<Value>, KeyDecodeError> {
        let len = self.fields.len();
        let mut values = Vec::with_capacity(len);
        let mut offset = 0;

        for (idx, field) in self.fields.iter().enumerate() {
            let (value, consumed) = decode_field(bytes, offset, field, FieldPosition::of(idx, len))?;
            values.push(value);
            offset += consumed;
        }

        if offset != bytes.len() {
            return Err(KeyDecodeError::TrailingBytes {
                remaining: bytes.len() - offset,
            });
        }

        Ok(values)
    }
}

impl FromIterator<KeyField> for KeySchema {
    fn from_iter<I: IntoIterator<Item = KeyField>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

///
/// TESTS
///
