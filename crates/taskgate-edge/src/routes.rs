//! Static path classification for the edge gate.
//!
//! Patterns are matched segment by segment. `*` matches exactly one segment;
//! a trailing `**` matches one or more remaining segments. Rules are tried in
//! order and the first match wins. Paths no rule matches are `Protected`.

use http::Method;

/// Access class of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// No credential required.
    Public,
    /// Any verified access token.
    Protected,
    /// Verified access token with the `Admin` role.
    AdminOnly,
}

#[derive(Debug, Clone)]
struct Pattern {
    segments: Vec<String>,
}

impl Pattern {
    fn parse(pattern: &str) -> Self {
        Self {
            segments: split(pattern).map(str::to_owned).collect(),
        }
    }

    fn matches(&self, path: &[&str]) -> bool {
        let mut i = 0;
        for (idx, seg) in self.segments.iter().enumerate() {
            if seg == "**" && idx == self.segments.len() - 1 {
                return path.len() > i;
            }
            match path.get(i) {
                Some(actual) if seg == "*" || seg.as_str() == *actual => i += 1,
                _ => return false,
            }
        }
        i == path.len()
    }
}

#[derive(Debug, Clone)]
struct Rule {
    method: Option<Method>,
    pattern: Pattern,
    class: RouteClass,
}

/// Ordered route classification rules.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    rules: Vec<Rule>,
}

impl RouteTable {
    /// An empty table; every path classifies as `Protected`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule for any method.
    pub fn route(mut self, pattern: &str, class: RouteClass) -> Self {
        self.rules.push(Rule {
            method: None,
            pattern: Pattern::parse(pattern),
            class,
        });
        self
    }

    /// Adds a rule for one method. Method rules are checked before any-method rules.
    pub fn method_route(mut self, method: Method, pattern: &str, class: RouteClass) -> Self {
        self.rules.push(Rule {
            method: Some(method),
            pattern: Pattern::parse(pattern),
            class,
        });
        self
    }

    /// Classifies a request path.
    pub fn classify(&self, method: &Method, path: &str) -> RouteClass {
        let segments: Vec<&str> = split(path).collect();
        let by_method = self
            .rules
            .iter()
            .filter(|r| r.method.as_ref() == Some(method));
        let any_method = self.rules.iter().filter(|r| r.method.is_none());
        by_method
            .chain(any_method)
            .find(|r| r.pattern.matches(&segments))
            .map_or(RouteClass::Protected, |r| r.class)
    }
}

/// The TaskGate API's route table.
pub fn default_table() -> RouteTable {
    use RouteClass::*;

    RouteTable::new()
        .method_route(Method::DELETE, "/api/tasks/*", AdminOnly)
        .route("/api/auth/login", Public)
        .route("/api/auth/register", Public)
        .route("/api/auth/refresh", Public)
        .route("/api/health", Public)
        .route("/api/users", AdminOnly)
        .route("/api/users/**", AdminOnly)
        .route("/api/admin/**", AdminOnly)
        .route("/api/tasks", Protected)
        .route("/api/tasks/**", Protected)
        .route("/api/auth/me", Protected)
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty())
}
