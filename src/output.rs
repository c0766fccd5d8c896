use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// Whether `NEODB_QUIET` asks for no spinners or banners
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("NEODB_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}
