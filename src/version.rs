/// Version string reported at startup and by `--version`. Prefers the
/// `APP_VERSION` value baked in at build time, falling back to the
/// crate version from Cargo.
const fn build_version(opt: Option<&'static str>) -> &'static str {
    match opt {
        Some(version) => version,
        None => env!("CARGO_PKG_VERSION"),
    }
}

pub const VERSION: &str = build_version(option_env!("APP_VERSION"));
