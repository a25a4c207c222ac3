//! Cargo.toml generation for the output crate.
//!
//! Generated clients depend on a fixed runtime stack: blocking `reqwest`
//! with multipart support, `hyper` for the reason phrase of HTTP/1
//! responses, `serde`/`serde_json` for entities, `thiserror` for the error
//! types and `urlencoding` for URI parameters.

use std::path::Path;

use crate::errors::GeneratorError;
use crate::output::write_atomic;

/// Renders the manifest of a generated client crate.
///
/// ## Examples
///
/// ```
/// use restgen_gen::cargo_gen::generate_cargo_toml;
///
/// let manifest = generate_cargo_toml("foo-client");
/// assert!(manifest.contains("name = \"foo-client\""));
/// ```
pub fn generate_cargo_toml(package_name: &str) -> String {
    format!(
        r#"# This file was automatically generated by restgen. Do not edit manually.

[package]
name = "{package_name}"
version = "0.1.0"
edition = "2024"
publish = false

[lib]
path = "src/lib.rs"

[dependencies]
hyper = {{ version = "1", default-features = false, features = ["client", "http1"] }}
reqwest = {{ version = "0.12", default-features = false, features = ["blocking", "multipart", "rustls-tls"] }}
serde = {{ version = "1.0", features = ["derive"] }}
serde_json = "1.0"
thiserror = "2.0"
urlencoding = "2.1"
"#
    )
}

/// Writes `Cargo.toml` into `crate_dir`, or prints it in dry-run mode.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if the file cannot be written.
pub fn write_cargo_toml(
    crate_dir: &Path,
    package_name: &str,
    dry_run: bool,
) -> Result<(), GeneratorError> {
    let manifest = generate_cargo_toml(package_name);
    if dry_run {
        println!("=== Cargo.toml ===\n{manifest}");
        return Ok(());
    }
    write_atomic(&crate_dir.join("Cargo.toml"), &manifest)
}
