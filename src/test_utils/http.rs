use axum::{body::Body, response::Response};
use axum_extra::extract::cookie::Cookie;

use crate::notice::NOTICE_COOKIE;

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    let content_type_header = response
        .headers()
        .get("content-type")
        .expect("content-type header missing");
    assert_eq!(content_type_header, content_type);
}

#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    let header_error_message = format!("Headers missing {header_name}");

    response
        .headers()
        .get(header_name)
        .expect(&header_error_message)
        .to_str()
        .expect("Could not convert to str")
        .to_string()
}

#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    assert_eq!(get_header(response, "hx-redirect"), endpoint);
}

/// Assert that the response stores the notice `want_value`, e.g. "status:created".
#[track_caller]
pub(crate) fn assert_notice_cookie(response: &Response<Body>, want_value: &str) {
    let header = get_header(response, "set-cookie");
    let cookie = Cookie::parse_encoded(header.as_str())
        .unwrap_or_else(|error| panic!("could not parse cookie {header:?}: {error}"));

    assert_eq!(cookie.name(), NOTICE_COOKIE, "got cookie {header:?}");
    assert_eq!(cookie.value(), want_value, "got cookie {header:?}");
    assert_eq!(cookie.path(), Some("/"), "got cookie {header:?}");
}
