//! Per-browser vote marker.
//!
//! After a successful vote the client receives `voted_for_{id}=true`
//! (HttpOnly, one year, path `/`). A later vote for the same id carrying a
//! non-empty value of that cookie is refused. Clearing cookies resets it.
//!
//! The name is built from the canonical id, so `01` and `+1` share the
//! cookie of `1`.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use service::coffee::domain::CoffeeId;
use time::Duration;

pub const MAX_AGE_SECS: i64 = 31_536_000;

pub fn cookie_name(id: &str) -> String {
    format!("voted_for_{}", CoffeeId::from_path(id))
}

pub fn has_voted(jar: &CookieJar, id: &str) -> bool {
    jar.get(&cookie_name(id)).is_some_and(|c| !c.value().is_empty())
}

pub fn marker(id: &str) -> Cookie<'static> {
    Cookie::build((cookie_name(id), "true"))
        .http_only(true)
        .max_age(Duration::seconds(MAX_AGE_SECS))
        .path("/")
        .build()
}
