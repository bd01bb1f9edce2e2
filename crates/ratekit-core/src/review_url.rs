//! Store review URL templates.
//!
//! The review page moved between OS releases, so the template is selected
//! by host OS version: one shape for [7.0, 8.0), another for 8.0 and up,
//! and a generic fallback when the version is older or unparsable. The
//! literal `APP_ID` placeholder is substituted with the configured id.

/// Fallback template for unknown or pre-7.0 OS versions.
pub const TEMPLATE_REVIEW_URL: &str = "itms-apps://ax.itunes.apple.com/WebObjects/MZStore.woa/wa\
/viewContentsUserReviews?type=Purple+Software&id=APP_ID";

/// Template for OS versions in [7.0, 8.0).
pub const TEMPLATE_REVIEW_URL_V7: &str = "itms-apps://itunes.apple.com/app/idAPP_ID";

/// Template for OS versions >= 8.0.
pub const TEMPLATE_REVIEW_URL_V8: &str = "itms-apps://itunes.apple.com/WebObjects/MZStore.woa/wa\
/viewContentsUserReviews?id=APP_ID&onlyLatestVersion=true&pageNumber=0&sortOrdering=1\
&type=Purple+Software";

/// Placeholder substituted with the configured app id.
const APP_ID_PLACEHOLDER: &str = "APP_ID";

/// Build the review URL for `app_id` on the given host OS version.
pub fn review_url(os_version: &str, app_id: &str) -> String {
    template_for(os_version).replace(APP_ID_PLACEHOLDER, app_id)
}

/// Whether the host OS can open listings in the in-app store (7.0+).
/// Unparsable versions report false.
pub fn opens_in_app_store(os_version: &str) -> bool {
    parse_version(os_version).map_or(false, |v| v >= 7.0)
}

fn template_for(os_version: &str) -> &'static str {
    match parse_version(os_version) {
        Some(v) if (7.0..8.0).contains(&v) => TEMPLATE_REVIEW_URL_V7,
        Some(v) if v >= 8.0 => TEMPLATE_REVIEW_URL_V8,
        _ => TEMPLATE_REVIEW_URL,
    }
}

fn parse_version(os_version: &str) -> Option<f32> {
    os_version.trim().parse::<f32>().ok()
}
