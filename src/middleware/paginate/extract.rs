//! Request phase: pull `page` and `limit` out of the query.

use tracing::warn;

use super::Pagination;
use super::config::{Config, DEFAULT_PAGE, OnInvalid};
use crate::error::Error;
use crate::request::Query;

/// Resolves `page` and `limit`, removing both from `query`.
///
/// Both keys are stripped even when their value fails to parse, so the
/// handler never sees them as filter criteria.
pub(crate) fn extract(query: &mut Query, config: &Config) -> Result<Pagination, Error> {
    let page = resolve(query, "page", DEFAULT_PAGE, config.on_invalid)?;
    let limit = resolve(query, "limit", config.default_limit, config.on_invalid)?;
    Ok(Pagination { page, limit })
}

fn resolve(
    query: &mut Query,
    name: &'static str,
    default: i64,
    on_invalid: OnInvalid,
) -> Result<i64, Error> {
    let Some(raw) = query.take(name) else {
        return Ok(default);
    };

    match raw.trim().parse::<i64>() {
        Ok(n) => Ok(n),
        Err(_) => match on_invalid {
            OnInvalid::Reject => Err(Error::InvalidParameter { name, value: raw }),
            OnInvalid::Fallback => {
                warn!(parameter = name, value = %raw, default, "non-integer pagination parameter, using default");
                Ok(default)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(raw: &str, config: &Config) -> (Result<Pagination, Error>, Query) {
        let mut q = Query::parse(Some(raw));
        let res = extract(&mut q, config);
        (res, q)
    }

    #[test]
    fn defaults_when_absent() {
        let (res, q) = run("q=rust", &Config::default());
        assert_eq!(res.unwrap(), Pagination { page: 1, limit: 100 });
        assert_eq!(q.get("q"), Some("rust"));
    }

    #[test]
    fn configured_default_limit() {
        let cfg = Config { default_limit: 1000, ..Config::default() };
        assert_eq!(run("", &cfg).0.unwrap(), Pagination { page: 1, limit: 1000 });
    }

    #[test]
    fn parses_and_strips() {
        let (res, q) = run("page=3&format=csv&limit=10", &Config::default());
        assert_eq!(res.unwrap(), Pagination { page: 3, limit: 10 });
        assert!(!q.contains("page"));
        assert!(!q.contains("limit"));
        assert_eq!(q.get("format"), Some("csv"));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let (res, _) = run("page=%204%20&limit=+7", &Config::default());
        assert_eq!(res.unwrap(), Pagination { page: 4, limit: 7 });
    }

    #[test]
    fn no_business_validation_of_values() {
        let (res, _) = run("page=0&limit=-5", &Config::default());
        assert_eq!(res.unwrap(), Pagination { page: 0, limit: -5 });
    }

    #[test]
    fn first_of_repeated_keys_wins() {
        let (res, q) = run("page=2&page=9", &Config::default());
        assert_eq!(res.unwrap().page, 2);
        assert!(!q.contains("page"));
    }

    #[test]
    fn reject_policy_reports_the_parameter() {
        for raw in ["page=abc", "page=", "page=10abc", "page=1.5"] {
            match run(raw, &Config::default()).0 {
                Err(Error::InvalidParameter { name, .. }) => assert_eq!(name, "page"),
                other => panic!("{raw}: expected InvalidParameter, got {other:?}"),
            }
        }

        match run("page=2&limit=lots", &Config::default()).0 {
            Err(Error::InvalidParameter { name, value }) => {
                assert_eq!(name, "limit");
                assert_eq!(value, "lots");
            }
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn fallback_policy_uses_defaults_and_still_strips() {
        let cfg = Config { on_invalid: OnInvalid::Fallback, ..Config::default() };
        let (res, q) = run("page=abc&limit=xyz&q=1", &cfg);
        assert_eq!(res.unwrap(), Pagination { page: 1, limit: 100 });
        assert!(q.iter().eq([("q", "1")]));
    }
}
