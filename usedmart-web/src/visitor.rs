//! Anonymous per-browser identity carried in a long-lived cookie.

use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    HttpRequest,
};
use usedmart_models::settings::VisitorCookie;
use uuid::Uuid;

pub(crate) struct Visitor {
    pub id: String,
    /// Set when the browser arrived without a cookie and one must be issued.
    pub new_cookie: Option<Cookie<'static>>,
}

pub(crate) fn resolve(req: &HttpRequest, config: &VisitorCookie) -> Visitor {
    if let Some(cookie) = req.cookie(&config.name) {
        let id = cookie.value().trim();
        if !id.is_empty() {
            return Visitor {
                id: id.to_string(),
                new_cookie: None,
            };
        }
    }

    let id = Uuid::new_v4().to_string();
    let cookie = Cookie::build(config.name.clone(), id.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(config.max_age_days))
        .finish();
    Visitor {
        id,
        new_cookie: Some(cookie),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn config() -> VisitorCookie {
        VisitorCookie {
            name: "um_visitor".into(),
            max_age_days: 365,
        }
    }

    #[test]
    fn test_existing_cookie_is_reused() {
        let req = TestRequest::default()
            .cookie(Cookie::new("um_visitor", "abc"))
            .to_http_request();
        let visitor = resolve(&req, &config());
        assert_eq!(visitor.id, "abc");
        assert!(visitor.new_cookie.is_none());
    }

    #[test]
    fn test_missing_cookie_is_issued() {
        let req = TestRequest::default().to_http_request();
        let visitor = resolve(&req, &config());
        let cookie = visitor.new_cookie.unwrap();
        assert_eq!(cookie.name(), "um_visitor");
        assert_eq!(cookie.value(), visitor.id);
        assert_eq!(cookie.max_age(), Some(Duration::days(365)));
    }
}
