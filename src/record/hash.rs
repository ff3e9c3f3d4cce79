//! Stable string hashing for error deduplication keys

/// 32-bit rolling hash over the UTF-16 code units of `input`.
///
/// Computes `h = h * 31 + unit` with two's-complement wrap-around, the same
/// value collectors already key errors by. The result depends only on the
/// string content, never on the process, so it is safe to compare across
/// sessions and machines.
#[must_use]
pub fn hash_code(input: &str) -> i32 {
    input
        .encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(i32::from(unit))
        })
}

/// Build the `errorUid` for a deduplication key such as
/// `"<family>-<message>-<location>"`.
///
/// # Examples
/// ```
/// # use kodegen_telemetry::record::error_uid;
/// assert_eq!(error_uid("panic-error-boom"), error_uid("panic-error-boom"));
/// assert_ne!(error_uid("a"), error_uid("b"));
/// ```
#[must_use]
pub fn error_uid(key: &str) -> String {
    hash_code(key).to_string()
}
