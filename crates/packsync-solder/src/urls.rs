use anyhow::{bail, Result};

pub const DEFAULT_SOLDER_URL: &str = "https://solder.technicpack.net/api/";
pub const DEFAULT_PLATFORM_API_URL: &str = "https://www.technicpack.net/api/";

pub fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

pub fn package_info_url(base_url: &str, package_id: &str) -> String {
    format!("{}modpack/{package_id}", normalize_base_url(base_url))
}

pub fn build_manifest_url(base_url: &str, package_id: &str, build_id: &str) -> String {
    format!(
        "{}modpack/{package_id}/{build_id}?side=server",
        normalize_base_url(base_url)
    )
}

pub fn platform_package_url(platform_url: &str, package_id: &str) -> String {
    format!("{}modpack/{package_id}", normalize_base_url(platform_url))
}

/// Package ids end up in URL paths, so only slug characters are allowed.
pub fn validate_package_id(package_id: &str) -> Result<()> {
    if package_id.is_empty() || package_id.len() > 128 {
        bail!("invalid package id: must be 1-128 characters");
    }

    let mut chars = package_id.chars();
    let Some(first) = chars.next() else {
        bail!("invalid package id: '{package_id}'");
    };

    let first_is_valid = first.is_ascii_alphanumeric();
    let rest_is_valid =
        chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.');
    if !first_is_valid || !rest_is_valid {
        bail!("invalid package id: '{package_id}'");
    }

    Ok(())
}
