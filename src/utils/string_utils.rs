//! String helpers: flag names, ids and sampling decisions

use convert_case::{Case, Casing};
use rand::Rng;

const ID_CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Build the configuration flag that disables a plugin or plugin kind.
///
/// The convention is `disabled` followed by the PascalCase form of the
/// kebab-case name, so `js-error` becomes `disabledJsError` and `performance`
/// becomes `disabledPerformance`.
///
/// # Examples
/// ```
/// # use kodegen_telemetry::utils::flag_name;
/// assert_eq!(flag_name("js-error"), "disabledJsError");
/// assert_eq!(flag_name("error"), "disabledError");
/// ```
#[must_use]
pub fn flag_name(name: &str) -> String {
    format!("disabled{}", name.to_case(Case::Pascal))
}

/// Generate a compact alphanumeric id of `len` characters.
#[must_use]
pub fn unique_id(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| ID_CHARS[rng.random_range(0..ID_CHARS.len())] as char)
        .collect()
}

/// Decide whether this process is sampled in at `sample` percent.
///
/// `100` always samples in, `0` never does.
#[must_use]
pub fn sampling(sample: f64) -> bool {
    if sample >= 100.0 {
        return true;
    }
    if sample <= 0.0 {
        return false;
    }
    rand::rng().random_range(0.0..100.0) < sample
}
