use axum_extra::extract::cookie::Cookie;
use chrono::Utc;
use std::collections::BTreeMap;

/// Minimal browser-side cookie store: keeps name/value pairs and honours
/// removal cookies (non-positive `Max-Age`, past `Expires` or an empty value)
#[derive(Debug, Default, Clone)]
pub struct ClientCookieJar {
    cookies: BTreeMap<String, String>,
}

impl ClientCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    pub fn apply_set_cookie(&mut self, set_cookie: &str) {
        let cookie = Cookie::parse(set_cookie)
            .unwrap_or_else(|e| panic!("invalid Set-Cookie header {:?}: {}", set_cookie, e));

        if is_removal(&cookie) {
            self.cookies.remove(cookie.name());
        } else {
            self.set(cookie.name(), cookie.value());
        }
    }

    /// Value for a `Cookie` request header, if the jar holds anything
    pub fn header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| Cookie::new(name.as_str(), value.as_str()).to_string())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

fn is_removal(cookie: &Cookie<'_>) -> bool {
    let expired_by_age = cookie
        .max_age()
        .is_some_and(|age| age.is_zero() || age.is_negative());
    let expired_by_date = cookie
        .expires_datetime()
        .is_some_and(|expires| expires.unix_timestamp() <= Utc::now().timestamp());

    expired_by_age || expired_by_date || cookie.value().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jar_with_token() -> ClientCookieJar {
        let mut jar = ClientCookieJar::new();
        jar.apply_set_cookie("token=abc.def.ghi; HttpOnly; SameSite=Strict; Path=/");
        jar
    }

    #[test]
    fn test_set_cookie_is_stored() {
        let jar = jar_with_token();
        assert_eq!(jar.get("token"), Some("abc.def.ghi"));
        assert_eq!(jar.header().as_deref(), Some("token=abc.def.ghi"));
    }

    #[test]
    fn test_max_age_zero_removes_cookie() {
        let mut jar = jar_with_token();
        jar.apply_set_cookie("token=abc.def.ghi; Path=/; Max-Age=0");
        assert!(jar.get("token").is_none());
        assert!(jar.header().is_none());
    }

    #[test]
    fn test_past_expiry_removes_cookie() {
        let mut jar = jar_with_token();
        jar.apply_set_cookie("token=abc.def.ghi; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
        assert!(jar.get("token").is_none());
    }

    #[test]
    fn test_future_expiry_keeps_cookie() {
        let mut jar = ClientCookieJar::new();
        jar.apply_set_cookie("token=xyz; Path=/; Expires=Fri, 01 Jan 2100 00:00:00 GMT");
        assert_eq!(jar.get("token"), Some("xyz"));
    }

    #[test]
    fn test_empty_value_removes_cookie() {
        let mut jar = jar_with_token();
        jar.apply_set_cookie("token=; Path=/");
        assert!(jar.get("token").is_none());
    }
}
