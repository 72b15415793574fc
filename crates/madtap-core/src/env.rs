//! Console environment detection.

/// Production console origin prefix.
pub const PROD_PAGE_PREFIX: &str = "https://mad.ingrid.com";
/// Staging console origin prefix.
pub const STAGE_PAGE_PREFIX: &str = "https://mad-stage.ingrid.com";

const PROD_API_BASE: &str = "https://api.ingrid.com";
const STAGE_API_BASE: &str = "https://api-stage.ingrid.com";

/// Path of the private-key endpoint, relative to the API base.
pub const PRIVATE_KEY_PATH: &str = "/v1/config/privatekey.get";

/// Deployment the observed console page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Staging,
}

impl Environment {
    /// Detect the environment from the observed page URL.
    ///
    /// Returns `None` for unrecognized origins. Callers treat that as
    /// "no key acquisition", not as an error.
    pub fn from_page_url(page_url: &str) -> Option<Self> {
        if page_url.starts_with(PROD_PAGE_PREFIX) {
            Some(Environment::Production)
        } else if page_url.starts_with(STAGE_PAGE_PREFIX) {
            Some(Environment::Staging)
        } else {
            None
        }
    }

    /// API base URL for this environment.
    pub fn api_base(&self) -> &'static str {
        match self {
            Environment::Production => PROD_API_BASE,
            Environment::Staging => STAGE_API_BASE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_production() {
        let env = Environment::from_page_url("https://mad.ingrid.com/orders/123");
        assert_eq!(env, Some(Environment::Production));
    }

    #[test]
    fn test_detect_staging() {
        let env = Environment::from_page_url("https://mad-stage.ingrid.com/");
        assert_eq!(env, Some(Environment::Staging));
    }

    #[test]
    fn test_unknown_origin() {
        assert_eq!(Environment::from_page_url("https://example.com/"), None);
        assert_eq!(Environment::from_page_url("http://mad.ingrid.com/"), None);
        assert_eq!(Environment::from_page_url(""), None);
    }

    #[test]
    fn test_api_base() {
        assert_eq!(
            Environment::Production.api_base(),
            "https://api.ingrid.com"
        );
        assert_eq!(
            Environment::Staging.api_base(),
            "https://api-stage.ingrid.com"
        );
    }
}
