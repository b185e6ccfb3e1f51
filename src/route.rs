use regex::Regex;
use std::sync::OnceLock;

fn create_pull_request_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/pull-requests/new(?:/|$)").expect("valid route regex"))
}

fn pull_request_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/pull-requests(?:/|$)").expect("valid route regex"))
}

/// `/{workspace}/{repo}/pull-requests/new`, with or without trailing slash.
pub fn is_create_pull_request(pathname: &str) -> bool {
    create_pull_request_re().is_match(pathname)
}

/// Any pull-request view: the list, a single PR and all of its tabs.
pub fn is_pull_request(pathname: &str) -> bool {
    pull_request_re().is_match(pathname)
}
