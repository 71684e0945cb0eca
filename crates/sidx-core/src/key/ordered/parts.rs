use crate::key::ordered::KeyDecodeError;

// Variable-width segment alphabet. The escaped form never contains
// SEPARATOR, so the first SEPARATOR after a field start ends the field.
pub(crate) const SEPARATOR: u8 = 0x00;
const ESCAPE: u8 = 0x01;
const ESCAPED_EMPTY: u8 = 0x01;
const ESCAPED_SEPARATOR: u8 = 0x02;
const ESCAPED_ESCAPE: u8 = 0x03;

// Escape payload bytes so the segment is separator-free and order-preserving.
// An explicit empty payload is written as `ESCAPE ESCAPED_EMPTY`, which no
// non-empty payload can produce; the null segment stays zero-length.
pub(super) fn push_escaped(out: &mut Vec<u8>, payload: &[u8]) {
    if payload.is_empty() {
        out.extend_from_slice(&[ESCAPE, ESCAPED_EMPTY]);
        return;
    }

    for &byte in payload {
        match byte {
            SEPARATOR => out.extend_from_slice(&[ESCAPE, ESCAPED_SEPARATOR]),
            ESCAPE => out.extend_from_slice(&[ESCAPE, ESCAPED_ESCAPE]),
            other => out.push(other),
        }
    }
}

// Reverse `push_escaped` for one non-empty (non-null) segment.
pub(super) fn unescape(segment: &[u8]) -> Result<Vec<u8>, KeyDecodeError> {
    if segment == [ESCAPE, ESCAPED_EMPTY] {
        return Ok(Vec::new());
    }

    let mut out = Vec::with_capacity(segment.len());
    let mut iter = segment.iter().copied();
    while let Some(byte) = iter.next() {
        match byte {
            SEPARATOR => return Err(KeyDecodeError::InvalidEscape),
            ESCAPE => match iter.next() {
                Some(ESCAPED_SEPARATOR) => out.push(SEPARATOR),
                Some(ESCAPED_ESCAPE) => out.push(ESCAPE),
                _ => return Err(KeyDecodeError::InvalidEscape),
            },
            other => out.push(other),
        }
    }

    Ok(out)
}

pub(super) fn push_inverted(out: &mut Vec<u8>, bytes: &[u8]) {
    for &byte in bytes {
        out.push(!byte);
    }
}

pub(super) fn invert_in_place(bytes: &mut [u8]) {
    for byte in bytes {
        *byte = !*byte;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        push_escaped(&mut out, payload);
        out
    }

    #[test]
    fn escaped_segments_never_contain_separator() {
        let all: Vec<u8> = (0..=u8::MAX).collect();

        assert!(!escaped(&all).contains(&SEPARATOR));
    }

    #[test]
    fn empty_payload_has_dedicated_marker() {
        assert_eq!(escaped(&[]), vec![0x01, 0x01]);
        assert_eq!(unescape(&[0x01, 0x01]).expect("empty marker"), Vec::<u8>::new());
    }

    #[test]
    fn unescape_reverses_escape() {
        let payload = [0x00, 0x01, 0x02, 0xFF, 0x00];

        assert_eq!(unescape(&escaped(&payload)).expect("roundtrip"), payload);
    }

    #[test]
    fn unescape_rejects_dangling_and_unknown_escapes() {
        assert_eq!(unescape(&[b'a', 0x01]), Err(KeyDecodeError::InvalidEscape));
        assert_eq!(unescape(&[0x01, 0x09]), Err(KeyDecodeError::InvalidEscape));
        assert_eq!(unescape(&[b'a', 0x00]), Err(KeyDecodeError::InvalidEscape));
    }

    #[test]
    fn escaping_preserves_byte_order() {
        let mut payloads: Vec<Vec<u8>> = vec![
            vec![],
            vec![0x00],
            vec![0x00, 0x00],
            vec![0x01],
            vec![0x01, 0x00],
            vec![0x02],
            vec![b'a'],
            vec![b'a', 0x00],
            vec![b'a', b'b'],
            vec![0xFF],
        ];
        payloads.sort();

        // Compare terminated segments, as they appear inside a composite key.
        let encoded: Vec<Vec<u8>> = payloads
            .iter()
            .map(|p| {
                let mut out = escaped(p);
                out.push(SEPARATOR);
                out
            })
            .collect();
        let mut sorted = encoded.clone();
        sorted.sort();

        assert_eq!(encoded, sorted);
    }
}
