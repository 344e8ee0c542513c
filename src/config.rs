use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_SESSION_COOKIE: &str = "session_id";
pub const DEFAULT_LOG_FILTER: &str = "libra_client=debug,reqwest=info";

/// クライアント設定
///
/// 既定値 < 設定ファイル（config/libra.*）< 環境変数（LIBRA_*）の順に上書きされる。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    api_base_url: String,
    login_path: String,
    session_cookie_name: String,
    #[serde(default)]
    session_id: Option<String>,
    /// 未設定ならタイムアウトなし
    #[serde(default)]
    request_timeout_secs: Option<u64>,
    log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            session_cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
            session_id: None,
            request_timeout_secs: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// 末尾のスラッシュを除いたベースURL
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// セッション切れ時の遷移先
    pub fn login_url(&self) -> String {
        if self.login_path.starts_with("http://") || self.login_path.starts_with("https://") {
            return self.login_path.clone();
        }
        let path = self.login_path.trim_start_matches('/');
        format!("{}/{}", self.api_base_url(), path)
    }

    pub fn session_cookie_name(&self) -> &str {
        &self.session_cookie_name
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }
}

/// 設定を読み込む
///
/// `path` を指定した場合はそのファイルが必須、省略時は `config/libra.*` があれば読む。
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, config::ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name("config/libra").required(false),
    };

    let config = config::Config::builder()
        .set_default("api_base_url", DEFAULT_API_BASE_URL)?
        .set_default("login_path", DEFAULT_LOGIN_PATH)?
        .set_default("session_cookie_name", DEFAULT_SESSION_COOKIE)?
        .set_default("log_filter", DEFAULT_LOG_FILTER)?
        .add_source(file)
        .add_source(config::Environment::with_prefix("LIBRA").try_parsing(true))
        .build()?;

    config.try_deserialize()
}
