//! Askama templates for the web frontend.

use askama::Template;

/// Map page with the route form. Planning happens client-side against
/// `/api/plan_route`.
#[derive(Template)]
#[template(path = "map.html")]
pub struct MapTemplate;
