//! User-Agent classification.
//!
//! Derives operating system, browser family and device class from a raw
//! `User-Agent` header. OS and browser use ordered rule tables evaluated
//! first-match-wins: patterns overlap (every Chrome UA also mentions Safari,
//! a 64-bit Windows 10 UA also matches the generic Windows NT 10.0 rule), so
//! the order of each table is part of its meaning.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Operating system label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr, EnumIter)]
#[serde(into = "&'static str")]
pub enum OsFamily {
    #[strum(serialize = "Windows 11")]
    Windows11,
    #[strum(serialize = "Windows 10")]
    Windows10,
    #[strum(serialize = "Linux")]
    Linux,
    #[strum(serialize = "Android")]
    Android,
    #[strum(serialize = "iOS")]
    Ios,
    #[strum(serialize = "Mac OS X")]
    MacOsX,
    #[strum(serialize = "unknown")]
    Unknown,
}

/// Browser family label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr, EnumIter)]
#[serde(into = "&'static str")]
pub enum BrowserFamily {
    #[strum(serialize = "Chrome")]
    Chrome,
    #[strum(serialize = "Firefox")]
    Firefox,
    #[strum(serialize = "Safari")]
    Safari,
    #[strum(serialize = "Edge")]
    Edge,
    #[strum(serialize = "Opera")]
    Opera,
    #[strum(serialize = "IE")]
    InternetExplorer,
    #[strum(serialize = "unknown")]
    Unknown,
}

/// Device class label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr, EnumIter)]
#[serde(into = "&'static str")]
pub enum DeviceClass {
    #[strum(serialize = "mobile/tablet")]
    MobileTablet,
    #[strum(serialize = "desktop")]
    Desktop,
    #[strum(serialize = "unknown")]
    Unknown,
}

/// OS rules, highest precedence first.
///
/// The Windows 11 signature is the 64-bit Windows NT 10.0 token sequence and
/// must stay ahead of the generic Windows 10 rule. Linux precedes Android, so
/// Android UAs (which contain "Linux") classify as Linux.
pub const OS_RULES: &[(OsFamily, &str)] = &[
    (OsFamily::Windows11, r"Windows NT 10.0; Win64; x64"),
    (OsFamily::Windows10, r"Windows NT 10.0"),
    (OsFamily::Linux, r"Linux"),
    (OsFamily::Android, r"Android"),
    (OsFamily::Ios, r"iPhone|iPad|iPod"),
    (OsFamily::MacOsX, r"Macintosh"),
];

/// Browser rules, highest precedence first.
///
/// Chrome must precede Safari because Chrome UAs carry a `Safari/` token.
/// Edge and Opera UAs also carry `Chrome/`, so they only classify as such
/// when no earlier rule matches.
pub const BROWSER_RULES: &[(BrowserFamily, &str)] = &[
    (BrowserFamily::Chrome, r"Chrome|CriOS"),
    (BrowserFamily::Firefox, r"Firefox|FxiOS"),
    (BrowserFamily::Safari, r"Safari"),
    (BrowserFamily::Edge, r"Edg"),
    (BrowserFamily::Opera, r"Opera|OPR"),
    (BrowserFamily::InternetExplorer, r"MSIE|Trident"),
];

/// Any of these substrings marks a phone or tablet.
pub const MOBILE_TOKENS: &[&str] = &["Mobile", "Android", "iPhone"];

static OS_MATCHERS: LazyLock<Vec<(OsFamily, Regex)>> = LazyLock::new(|| compile_rules(OS_RULES));
static BROWSER_MATCHERS: LazyLock<Vec<(BrowserFamily, Regex)>> =
    LazyLock::new(|| compile_rules(BROWSER_RULES));

/// Classification result for one header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserAgentInfo {
    pub os: OsFamily,
    pub browser: BrowserFamily,
    pub device: DeviceClass,
}

impl UserAgentInfo {
    /// All three labels unknown.
    pub const UNKNOWN: Self = Self {
        os: OsFamily::Unknown,
        browser: BrowserFamily::Unknown,
        device: DeviceClass::Unknown,
    };
}

/// Classifies a `User-Agent` header.
///
/// An absent or empty header yields `UserAgentInfo::UNKNOWN`; the device
/// heuristic is not applied in that case, so the device is `unknown` rather
/// than `desktop`.
pub fn classify_user_agent(user_agent: Option<&str>) -> UserAgentInfo {
    let Some(ua) = user_agent.filter(|ua| !ua.is_empty()) else {
        return UserAgentInfo::UNKNOWN;
    };

    UserAgentInfo {
        os: first_match(&OS_MATCHERS, ua).unwrap_or(OsFamily::Unknown),
        browser: first_match(&BROWSER_MATCHERS, ua).unwrap_or(BrowserFamily::Unknown),
        device: classify_device(ua),
    }
}

/// Plain substring check, independent of the OS/browser tables.
pub fn classify_device(user_agent: &str) -> DeviceClass {
    if MOBILE_TOKENS.iter().any(|token| user_agent.contains(token)) {
        DeviceClass::MobileTablet
    } else {
        DeviceClass::Desktop
    }
}

fn compile_rules<L: Copy>(rules: &[(L, &str)]) -> Vec<(L, Regex)> {
    rules
        .iter()
        .filter_map(|(label, pattern)| match Regex::new(pattern) {
            Ok(re) => Some((*label, re)),
            Err(e) => {
                log::error!("Invalid user-agent pattern {:?}: {}", pattern, e);
                None
            }
        })
        .collect()
}

fn first_match<L: Copy>(matchers: &[(L, Regex)], user_agent: &str) -> Option<L> {
    matchers
        .iter()
        .find(|(_, re)| re.is_match(user_agent))
        .map(|(label, _)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    const CHROME_WIN64: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const CHROME_WOW64: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const EDGE_WIN64: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.2210.91";
    const ANDROID_CHROME: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";
    const IPHONE_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const IPHONE_CHROME: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/120.0.6099.119 Mobile/15E148 Safari/604.1";
    const IPAD_FIREFOX: &str = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) FxiOS/121.0 Mobile/15E148 Safari/605.1.15";
    const MAC_FIREFOX: &str =
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:121.0) Gecko/20100101 Firefox/121.0";
    const MAC_SAFARI: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15";
    const IE11: &str = "Mozilla/5.0 (Windows NT 6.1; Trident/7.0; rv:11.0) like Gecko";
    const OPERA_PRESTO: &str = "Opera/9.80 (X11; Linux x86_64) Presto/2.12.388 Version/12.16";

    fn classify(ua: &str) -> (String, String, String) {
        let info = classify_user_agent(Some(ua));
        (
            info.os.to_string(),
            info.browser.to_string(),
            info.device.to_string(),
        )
    }

    #[test]
    fn test_absent_user_agent_is_all_unknown() {
        assert_eq!(classify_user_agent(None), UserAgentInfo::UNKNOWN);
    }

    #[test]
    fn test_win64_signature_outranks_generic_windows_10() {
        let info = classify_user_agent(Some(CHROME_WIN64));
        assert_eq!(info.os, OsFamily::Windows11);
    }

    #[test]
    fn test_generic_windows_10() {
        assert_eq!(
            classify(CHROME_WOW64),
            ("Windows 10".into(), "Chrome".into(), "desktop".into())
        );
    }

    #[test]
    fn test_chrome_outranks_safari_and_edge() {
        assert_eq!(classify_user_agent(Some(CHROME_WIN64)).browser, BrowserFamily::Chrome);
        assert_eq!(classify_user_agent(Some(EDGE_WIN64)).browser, BrowserFamily::Chrome);
    }

    #[test]
    fn test_edge_and_opera_tokens_alone() {
        assert_eq!(classify_user_agent(Some("Edg/120.0")).browser, BrowserFamily::Edge);
        assert_eq!(classify_user_agent(Some("OPR/105.0")).browser, BrowserFamily::Opera);
    }

    #[test]
    fn test_android_reports_linux_because_linux_rule_comes_first() {
        assert_eq!(
            classify(ANDROID_CHROME),
            ("Linux".into(), "Chrome".into(), "mobile/tablet".into())
        );
    }

    #[test]
    fn test_ios_devices() {
        assert_eq!(
            classify(IPHONE_SAFARI),
            ("iOS".into(), "Safari".into(), "mobile/tablet".into())
        );
        assert_eq!(
            classify(IPHONE_CHROME),
            ("iOS".into(), "Chrome".into(), "mobile/tablet".into())
        );
        assert_eq!(
            classify(IPAD_FIREFOX),
            ("iOS".into(), "Firefox".into(), "mobile/tablet".into())
        );
    }

    #[test]
    fn test_mac_desktop() {
        assert_eq!(
            classify(MAC_FIREFOX),
            ("Mac OS X".into(), "Firefox".into(), "desktop".into())
        );
        assert_eq!(
            classify(MAC_SAFARI),
            ("Mac OS X".into(), "Safari".into(), "desktop".into())
        );
    }

    #[test]
    fn test_legacy_browsers() {
        assert_eq!(
            classify(IE11),
            ("unknown".into(), "IE".into(), "desktop".into())
        );
        assert_eq!(
            classify(OPERA_PRESTO),
            ("Linux".into(), "Opera".into(), "desktop".into())
        );
    }

    #[test]
    fn test_present_but_unrecognized_header() {
        assert_eq!(
            classify("curl/8.4.0"),
            ("unknown".into(), "unknown".into(), "desktop".into())
        );
    }

    #[test]
    fn test_empty_header_is_treated_as_absent() {
        assert_eq!(classify_user_agent(Some("")), UserAgentInfo::UNKNOWN);
        assert_eq!(
            classify(""),
            ("unknown".into(), "unknown".into(), "unknown".into())
        );
    }

    #[test]
    fn test_device_tokens_are_case_sensitive() {
        assert_eq!(classify_device("mobile android iphone"), DeviceClass::Desktop);
        assert_eq!(classify_device("x Mobile x"), DeviceClass::MobileTablet);
    }

    #[test]
    fn test_every_rule_compiles() {
        assert_eq!(OS_MATCHERS.len(), OS_RULES.len());
        assert_eq!(BROWSER_MATCHERS.len(), BROWSER_RULES.len());
    }

    #[test]
    fn test_every_os_label_has_a_rule_except_unknown() {
        for os in OsFamily::iter().filter(|os| *os != OsFamily::Unknown) {
            assert!(OS_RULES.iter().any(|(label, _)| *label == os), "{os}");
        }
        for browser in BrowserFamily::iter().filter(|b| *b != BrowserFamily::Unknown) {
            assert!(
                BROWSER_RULES.iter().any(|(label, _)| *label == browser),
                "{browser}"
            );
        }
    }

    #[test]
    fn test_labels_serialize_as_display_strings() {
        let value = serde_json::to_value(classify_user_agent(Some(IPHONE_SAFARI))).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"os": "iOS", "browser": "Safari", "device": "mobile/tablet"})
        );
    }
}
