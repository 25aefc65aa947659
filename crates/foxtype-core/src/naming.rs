//! Stable, collision-free identifiers for endpoints.
//!
//! A name is derived from the HTTP method and the URL path
//! (`GET /users/{id}` -> `AGetUsers_Id`). Collisions are resolved against an
//! explicit [`NamingState`] that the caller threads through one pass over the
//! endpoint list. Two passes over the same ordered list with fresh states
//! produce the same names.

use std::collections::HashSet;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::{capitalize_first, method_ident};

static SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/([A-Za-z0-9_]+)").expect("segment pattern is valid"));
static ROUTE_PARAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z0-9_]*)\}").expect("route param pattern is valid"));

/// Segment name used when a path has no literal segment at all
const ROOT_SEGMENT: &str = "Root";

/// The pieces of an endpoint name before collision handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCandidate {
    method: String,
    segments: Vec<String>,
    route_suffix: Option<String>,
}

impl NameCandidate {
    pub fn new(path: &str, method: &str) -> Self {
        let segments = SEGMENT_RE
            .captures_iter(path)
            .map(|caps| caps[1].to_string())
            .collect();
        let route_suffix = ROUTE_PARAM_RE
            .captures_iter(path)
            .last()
            .map(|caps| capitalize_first(&caps[1]))
            .filter(|s| !s.is_empty());
        Self {
            method: method_ident(method),
            segments,
            route_suffix,
        }
    }

    fn last_segment(&self) -> &str {
        self.segments
            .last()
            .map(String::as_str)
            .unwrap_or(ROOT_SEGMENT)
    }

    /// `A<Method><Last>[_<Param>]`
    pub fn primary(&self) -> String {
        let mut name = self.last_segment().to_string();
        if let Some(suffix) = &self.route_suffix {
            name.push('_');
            name.push_str(suffix);
        }
        format!("A{}{}", self.method, capitalize_first(&name))
    }

    /// `A<Method><SecondToLast><Last>`, used when the primary name is taken
    pub fn fallback(&self) -> String {
        let previous = match self.segments.len() {
            n if n >= 2 => capitalize_first(&self.segments[n - 2]),
            _ => String::new(),
        };
        format!(
            "A{}{}{}",
            self.method,
            previous,
            capitalize_first(self.last_segment())
        )
    }
}

/// Names already handed out during one conversion pass
#[derive(Debug, Clone, Default)]
pub struct NamingState {
    taken: HashSet<String>,
}

impl NamingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive and claim the name for an endpoint
    pub fn disambiguate(&mut self, path: &str, method: &str) -> String {
        self.claim(&NameCandidate::new(path, method))
    }

    /// Claim a name for `candidate`.
    ///
    /// Tries the primary name, then the two-segment fallback, then appends
    /// `_2`, `_3`, ... to the fallback until a free name is found.
    pub fn claim(&mut self, candidate: &NameCandidate) -> String {
        let mut name = candidate.primary();
        if self.taken.contains(&name) {
            name = candidate.fallback();
        }
        if self.taken.contains(&name) {
            let base = name;
            let mut n = 2;
            name = format!("{base}_{n}");
            while self.taken.contains(&name) {
                n += 1;
                name = format!("{base}_{n}");
            }
            debug!("name '{}' taken twice, using '{}'", base, name);
        }
        self.taken.insert(name.clone());
        name
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_names() {
        let mut state = NamingState::new();
        assert_eq!(state.disambiguate("/users", "get"), "AGetUsers");
        assert_eq!(state.disambiguate("/users/{id}", "get"), "AGetUsers_Id");
        assert_eq!(state.disambiguate("/users", "POST"), "APostUsers");
        assert_eq!(
            state.disambiguate("/orders/{orderId}/items", "get"),
            "AGetItems_OrderId"
        );
        assert_eq!(state.disambiguate("/user_info", "get"), "AGetUser_info");
        assert_eq!(state.len(), 5);
    }

    #[test]
    fn test_two_segment_fallback() {
        let mut state = NamingState::new();
        let first = state.disambiguate("/api/users", "get");
        let second = state.disambiguate("/api/users", "get");
        assert_eq!(first, "AGetUsers");
        assert_eq!(second, "AGetApiUsers");
        assert_ne!(first, second);
    }

    #[test]
    fn test_fallback_drops_route_suffix() {
        let mut state = NamingState::new();
        assert_eq!(state.disambiguate("/admin/users/{id}", "get"), "AGetUsers_Id");
        assert_eq!(state.disambiguate("/shop/users/{id}", "get"), "AGetShopUsers");
    }

    #[test]
    fn test_numeric_tie_break() {
        let mut state = NamingState::new();
        let names: Vec<_> = (0..4)
            .map(|_| state.disambiguate("/api/users", "get"))
            .collect();
        assert_eq!(
            names,
            vec!["AGetUsers", "AGetApiUsers", "AGetApiUsers_2", "AGetApiUsers_3"]
        );
    }

    #[test]
    fn test_root_and_param_only_paths() {
        let mut state = NamingState::new();
        assert_eq!(state.disambiguate("/", "get"), "AGetRoot");
        assert_eq!(state.disambiguate("/{id}", "delete"), "ADeleteRoot_Id");
    }

    #[test]
    fn test_replay_is_deterministic() {
        let endpoints = [
            ("/users", "get"),
            ("/users/{id}", "get"),
            ("/v2/users", "get"),
            ("/v3/users", "get"),
        ];
        let run = || {
            let mut state = NamingState::new();
            endpoints
                .iter()
                .map(|(path, method)| state.disambiguate(path, method))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
        assert_eq!(
            run(),
            vec!["AGetUsers", "AGetUsers_Id", "AGetV2Users", "AGetV3Users"]
        );
    }
}
