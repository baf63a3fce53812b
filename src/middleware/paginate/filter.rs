//! Route/format filter: does this exchange get an envelope?

use super::config::Config;

/// Approves when the route is eligible and the `format` query value, if
/// any, is not excluded.
pub(crate) fn approves(config: &Config, route: &str, format: Option<&str>) -> bool {
    let excluded = format.is_some_and(|f| config.excluded_formats.contains(f));
    config.routes.contains(route) && !excluded
}
