//! WebDriver endpoint resolution.

/// Endpoint used when neither configuration nor environment names one.
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

/// Environment variables checked in order after configuration.
const FALLBACK_ENV_VARS: &[&str] = &["WEBDRIVER_URL", "CHROMEDRIVER_URL"];

/// Resolves the WebDriver endpoint.
///
/// Order: the configured value, then `WEBDRIVER_URL`, then
/// `CHROMEDRIVER_URL`, then [`DEFAULT_WEBDRIVER_URL`]. Empty values are
/// skipped at every level.
///
/// # Example
///
/// ```ignore
/// use mockable::DefaultEnv;
/// use gitserver_harness::browser::WebDriverResolver;
///
/// let env = DefaultEnv::new();
/// let url = WebDriverResolver::new(&env).resolve(None);
/// ```
pub struct WebDriverResolver<'a, E: mockable::Env> {
    env: &'a E,
}

impl<'a, E: mockable::Env> WebDriverResolver<'a, E> {
    /// Creates a resolver over the given environment provider.
    #[must_use]
    pub const fn new(env: &'a E) -> Self {
        Self { env }
    }

    /// First non-empty fallback environment variable.
    #[must_use]
    pub fn resolve_from_env(&self) -> Option<String> {
        FALLBACK_ENV_VARS
            .iter()
            .filter_map(|var_name| self.env.string(var_name))
            .find(|value| !value.is_empty())
    }

    /// Resolve the endpoint, preferring `configured`.
    #[must_use]
    pub fn resolve(&self, configured: Option<&str>) -> String {
        configured
            .filter(|url| !url.is_empty())
            .map(String::from)
            .or_else(|| self.resolve_from_env())
            .unwrap_or_else(|| DEFAULT_WEBDRIVER_URL.to_owned())
    }
}
