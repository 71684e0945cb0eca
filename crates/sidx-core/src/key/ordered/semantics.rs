//! Module: key::ordered::semantics
//! Responsibility: fixed-width scalar byte transforms preserving order.
//! Does not own: field framing, null flags or DESC inversion.
//! Boundary: internal helper functions for ordered encoding.

pub(super) const fn ordered_i8_bytes(value: i8) -> [u8; 1] {
    [value.cast_unsigned() ^ 0x80]
}

pub(super) const fn ordered_i16_bytes(value: i16) -> [u8; 2] {
    let biased = value.cast_unsigned() ^ (1u16 << 15);
    biased.to_be_bytes()
}

pub(super) const fn ordered_i32_bytes(value: i32) -> [u8; 4] {
    let biased = value.cast_unsigned() ^ (1u32 << 31);
    biased.to_be_bytes()
}

pub(super) const fn ordered_i64_bytes(value: i64) -> [u8; 8] {
    let biased = value.cast_unsigned() ^ (1u64 << 63);
    biased.to_be_bytes()
}

pub(super) const fn ordered_f32_bytes(value: f32) -> [u8; 4] {
    let bits = value.to_bits();
    let ordered = if bits & 0x8000_0000 == 0 {
        bits ^ 0x8000_0000
    } else {
        !bits
    };

    ordered.to_be_bytes()
}

pub(super) const fn ordered_f64_bytes(value: f64) -> [u8; 8] {
    let bits = value.to_bits();
    let ordered = if bits & 0x8000_0000_0000_0000 == 0 {
        bits ^ 0x8000_0000_0000_0000
    } else {
        !bits
    };

    ordered.to_be_bytes()
}

pub(super) const fn i8_from_ordered(bytes: [u8; 1]) -> i8 {
    (bytes[0] ^ 0x80).cast_signed()
}

pub(super) const fn i16_from_ordered(bytes: [u8; 2]) -> i16 {
    (u16::from_be_bytes(bytes) ^ (1u16 << 15)).cast_signed()
}

pub(super) const fn i32_from_ordered(bytes: [u8; 4]) -> i32 {
    (u32::from_be_bytes(bytes) ^ (1u32 << 31)).cast_signed()
}

pub(super) const fn i64_from_ordered(bytes: [u8; 8]) -> i64 {
    (u64::from_be_bytes(bytes) ^ (1u64 << 63)).cast_signed()
}

pub(super) const fn f32_from_ordered(bytes: [u8; 4]) -> f32 {
    let ordered = u32::from_be_bytes(bytes);
    let bits = if ordered & 0x8000_0000 == 0 {
        !ordered
    } else {
        ordered ^ 0x8000_0000
    };

    f32::from_bits(bits)
}

pub(super) const fn f64_from_ordered(bytes: [u8; 8]) -> f64 {
    let ordered = u64::from_be_bytes(bytes);
    let bits = if ordered & 0x8000_0000_0000_0000 == 0 {
        !ordered
    } else {
        ordered ^ 0x8000_0000_0000_0000
    };

    f64::from_bits(bits)
}
