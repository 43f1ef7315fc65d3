pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";

/// Ordered list of browser origins allowed to read proxy responses.
/// Never empty, so the first entry can always serve as the fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct AllowList {
    origins: Vec<String>,
}

impl AllowList {
    pub fn new<I, S>(origins: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let origins: Vec<String> = origins.into_iter().map(Into::into).collect();
        if origins.is_empty() {
            None
        } else {
            Some(Self { origins })
        }
    }

    #[cfg(test)]
    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    /// Picks the origin to echo back for a request.
    ///
    /// An entry matches when it *contains* the request origin, so a missing
    /// header (treated as "") matches the first entry and a partial origin such
    /// as `http://localhost` matches `http://localhost:3000`. This is looser than
    /// an exact comparison and is kept that way for compatibility with deployed
    /// front-ends.
    pub fn select_origin(&self, origin: Option<&str>) -> &str {
        let origin = origin.unwrap_or("");
        self.origins
            .iter()
            .find(|allowed| allowed.contains(origin))
            .unwrap_or(&self.origins[0])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CorsPolicy {
    AllowList(AllowList),
    Wildcard,
}

impl CorsPolicy {
    pub fn headers_for(&self, origin: Option<&str>) -> CorsHeaders {
        let allow_origin = match self {
            CorsPolicy::AllowList(list) => list.select_origin(origin).to_string(),
            CorsPolicy::Wildcard => "*".to_string(),
        };
        CorsHeaders { allow_origin }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorsHeaders {
    allow_origin: String,
}

impl CorsHeaders {
    #[cfg(test)]
    pub fn allow_origin(&self) -> &str {
        &self.allow_origin
    }

    pub fn pairs(&self) -> [(&'static str, String); 3] {
        [
            (ALLOW_HEADERS, "*".to_string()),
            (ALLOW_METHODS, "POST".to_string()),
            (ALLOW_ORIGIN, self.allow_origin.clone()),
        ]
    }
}
