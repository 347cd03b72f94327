use std::path::PathBuf;

/// Short-link server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Link log location (None = in-memory store)
    pub data_path: Option<PathBuf>,

    /// Origin used to build returned short URLs (None = derive from request)
    pub public_base_url: Option<String>,

    /// Allowed `POST /api/shorten` requests per second (0 = unlimited)
    pub shorten_rps: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            data_path: None,
            public_base_url: None,
            shorten_rps: 10,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into());
        self
    }

    pub fn with_shorten_rps(mut self, rps: u32) -> Self {
        self.shorten_rps = rps;
        self
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Origin used when neither a public URL nor a Host header is available.
    pub fn fallback_origin(&self) -> String {
        format!("http://{}", self.bind_addr())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("host must not be empty".to_string());
        }

        if let Some(base) = &self.public_base_url {
            let parsed = url::Url::parse(base)
                .map_err(|e| format!("public_base_url is not a valid URL: {}", e))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err("public_base_url must use http or https".to_string());
            }
        }

        Ok(())
    }
}
