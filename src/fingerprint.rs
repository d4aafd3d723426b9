//! Browser-like request headers.
//!
//! Video hosts tend to serve stripped-down (or no) player metadata to
//! clients that do not look like a desktop browser, so every page request
//! carries a realistic header set.

use rand::seq::SliceRandom;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT,
};

/// Chrome release used for the default profile.
const CHROME_VERSION: (&str, &str) = ("120", "120.0.0.0");

/// Desktop platforms and their `(User-Agent OS token, Sec-CH-UA-Platform)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOS,
    Linux,
}

impl Platform {
    const ALL: [Platform; 3] = [Platform::Windows, Platform::MacOS, Platform::Linux];

    fn os_string(self) -> &'static str {
        match self {
            Platform::Windows => "Windows NT 10.0; Win64; x64",
            Platform::MacOS => "Macintosh; Intel Mac OS X 10_15_7",
            Platform::Linux => "X11; Linux x86_64",
        }
    }

    fn sec_ch_platform(self) -> &'static str {
        match self {
            Platform::Windows => "\"Windows\"",
            Platform::MacOS => "\"macOS\"",
            Platform::Linux => "\"Linux\"",
        }
    }
}

/// Header values sent with every page request.
#[derive(Debug, Clone)]
pub struct BrowserProfile {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub sec_ch_ua: String,
    pub sec_ch_ua_platform: String,
}

impl BrowserProfile {
    /// Desktop Chrome on the given platform.
    #[must_use]
    pub fn chrome(platform: Platform, accept_language: &str) -> Self {
        let (major, full) = CHROME_VERSION;
        Self {
            user_agent: format!(
                "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{full} Safari/537.36",
                platform.os_string()
            ),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8".to_string(),
            accept_language: accept_language.to_string(),
            sec_ch_ua: format!(
                "\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"{major}\", \"Google Chrome\";v=\"{major}\""
            ),
            sec_ch_ua_platform: platform.sec_ch_platform().to_string(),
        }
    }

    /// Chrome on a random desktop platform with a random English Accept-Language.
    #[must_use]
    pub fn desktop() -> Self {
        let mut rng = rand::thread_rng();
        let platform = Platform::ALL
            .choose(&mut rng)
            .copied()
            .unwrap_or(Platform::Windows);
        let languages = ["en-US,en;q=0.9", "en-GB,en;q=0.9", "en-US,en;q=0.9,de;q=0.8"];
        let language = languages.choose(&mut rng).copied().unwrap_or("en-US,en;q=0.9");
        Self::chrome(platform, language)
    }

    /// Convert profile to reqwest `HeaderMap`.
    ///
    /// Values that are not valid header text are skipped.
    pub fn to_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        let pairs: [(HeaderName, &str); 5] = [
            (USER_AGENT, self.user_agent.as_str()),
            (ACCEPT, self.accept.as_str()),
            (ACCEPT_LANGUAGE, self.accept_language.as_str()),
            (HeaderName::from_static("sec-ch-ua"), self.sec_ch_ua.as_str()),
            (HeaderName::from_static("sec-ch-ua-platform"), self.sec_ch_ua_platform.as_str()),
        ];
        for (name, value) in pairs {
            if let Ok(value) = HeaderValue::from_str(value) {
                headers.insert(name, value);
            }
        }

        headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
        headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
        headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
        headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
        headers.insert("upgrade-insecure-requests", HeaderValue::from_static("1"));

        headers
    }
}

impl Default for BrowserProfile {
    fn default() -> Self {
        Self::desktop()
    }
}
