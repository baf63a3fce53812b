//! Pagination options and their resolved, immutable form.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::Error;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 100;
pub const DEFAULT_META_KEY: &str = "meta";
pub const DEFAULT_RESULTS_KEY: &str = "results";

/// The route list entry that means "every route".
pub const ALL_ROUTES: &str = "*";

/// What to do with a `page` or `limit` value that is not an integer.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OnInvalid {
    /// Answer `400 Bad Request` without running the handler.
    #[default]
    Reject,
    /// Log a warning and use the default value.
    Fallback,
}

/// User-facing options, as supplied at registration.
///
/// Deserialises from camelCase keys (`limit`, `name`, `results`, `routes`,
/// `excludeFormats`, `onInvalid`); missing keys take their defaults.
///
/// ```rust
/// use pagemeta::middleware::paginate::Options;
///
/// let opts = Options::default()
///     .limit(25)
///     .routes(["/users", "/orders"])
///     .exclude_formats(["csv"]);
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    limit: i64,
    name: String,
    results: String,
    routes: Vec<String>,
    exclude_formats: Vec<String>,
    on_invalid: OnInvalid,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            name: DEFAULT_META_KEY.to_owned(),
            results: DEFAULT_RESULTS_KEY.to_owned(),
            routes: vec![ALL_ROUTES.to_owned()],
            exclude_formats: Vec::new(),
            on_invalid: OnInvalid::default(),
        }
    }
}

impl Options {
    /// Page size used when the query has no `limit`.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Key the metadata object is attached under.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Key the original body is nested under when wrapping.
    pub fn results(mut self, results: impl Into<String>) -> Self {
        self.results = results.into();
        self
    }

    /// Route patterns eligible for enrichment. `["*"]` means all routes; an
    /// empty list means none.
    pub fn routes<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.routes = routes.into_iter().map(Into::into).collect();
        self
    }

    /// `format` query values that suppress enrichment.
    pub fn exclude_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_formats = formats.into_iter().map(Into::into).collect();
        self
    }

    /// How a non-integer `page` or `limit` is handled.
    pub fn on_invalid(mut self, policy: OnInvalid) -> Self {
        self.on_invalid = policy;
        self
    }
}

/// Which routes get an envelope.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Routes {
    All,
    /// Exact route patterns. Empty approves nothing.
    Only(Vec<String>),
}

impl Routes {
    fn from_list(list: Vec<String>) -> Self {
        match list.first() {
            Some(first) if first == ALL_ROUTES => Self::All,
            _ => Self::Only(list),
        }
    }

    pub fn contains(&self, route: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(list) => list.iter().any(|r| r == route),
        }
    }
}

/// Validated configuration, fixed for the lifetime of the middleware.
#[derive(Clone, Debug)]
pub struct Config {
    pub default_limit: i64,
    pub meta_key: String,
    pub results_key: String,
    pub routes: Routes,
    pub excluded_formats: HashSet<String>,
    pub on_invalid: OnInvalid,
}

impl Config {
    pub fn from_options(opts: Options) -> Result<Self, Error> {
        if opts.name.is_empty() {
            return Err(Error::InvalidConfig("`name` must not be empty"));
        }
        if opts.results.is_empty() {
            return Err(Error::InvalidConfig("`results` must not be empty"));
        }
        if opts.name == opts.results {
            return Err(Error::InvalidConfig("`name` and `results` must differ"));
        }

        Ok(Self {
            default_limit: opts.limit,
            meta_key: opts.name,
            results_key: opts.results,
            routes: Routes::from_list(opts.routes),
            excluded_formats: opts.exclude_formats.into_iter().collect(),
            on_invalid: opts.on_invalid,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            meta_key: DEFAULT_META_KEY.to_owned(),
            results_key: DEFAULT_RESULTS_KEY.to_owned(),
            routes: Routes::All,
            excluded_formats: HashSet::new(),
            on_invalid: OnInvalid::Reject,
        }
    }
}
