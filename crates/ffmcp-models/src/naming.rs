//! Artifact naming helpers.
//!
//! Derived artifacts never overwrite each other: every generated name carries
//! a random suffix, so two invocations on the same source with the same
//! parameters still land in distinct files.

use uuid::Uuid;

/// Length of the random hex suffix appended to generated names.
pub const SUFFIX_LEN: usize = 8;

/// Generate a fresh random suffix of [`SUFFIX_LEN`] lowercase hex characters.
pub fn unique_suffix() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..SUFFIX_LEN].to_string()
}

/// Build a derived file name: `<stem>[_<infix>]_<suffix>[.<extension>]`.
///
/// `extension` is given without the leading dot. Empty infixes and
/// extensions are treated as absent.
pub fn derived_file_name(stem: &str, infix: Option<&str>, extension: Option<&str>) -> String {
    let mut name = String::from(stem);
    if let Some(infix) = infix.filter(|s| !s.is_empty()) {
        name.push('_');
        name.push_str(infix);
    }
    name.push('_');
    name.push_str(&unique_suffix());
    if let Some(ext) = extension.map(|e| e.trim_start_matches('.')).filter(|e| !e.is_empty()) {
        name.push('.');
        name.push_str(ext);
    }
    name
}
