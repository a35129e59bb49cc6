//! Route table

use std::collections::HashMap;

/// A view and whether reaching it needs a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDef {
    pub name: String,
    /// Pattern such as `/homework/:id`
    pub path: String,
    pub requires_auth: bool,
}

impl RouteDef {
    pub fn public(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            requires_auth: false,
        }
    }

    pub fn protected(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            requires_auth: true,
        }
    }

    /// Match a concrete path, returning captured `:param` segments
    fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let pattern: Vec<&str> = segments(&self.path).collect();
        let actual: Vec<&str> = segments(path).collect();
        if pattern.len() != actual.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (expected, got) in pattern.iter().zip(actual.iter()) {
            if let Some(name) = expected.strip_prefix(':') {
                params.insert(name.to_string(), got.to_string());
            } else if expected != got {
                return None;
            }
        }
        Some(params)
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Route resolved for a navigation target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: RouteDef,
    pub path: String,
    pub params: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDef>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDef>) -> Self {
        Self { routes }
    }

    /// The platform's views; everything but the login page needs a session
    pub fn standard(login_path: &str) -> Self {
        Self::new(vec![
            RouteDef::public("login", login_path),
            RouteDef::protected("home", "/"),
            RouteDef::protected("practice", "/practice"),
            RouteDef::protected("stat", "/stat"),
            RouteDef::protected("homework", "/homework"),
            RouteDef::protected("questionAndAnswer", "/questionAndAnswer"),
            RouteDef::protected("admin", "/admin"),
            RouteDef::protected("HomeworkDetail", "/homework/:id"),
        ])
    }

    pub fn routes(&self) -> &[RouteDef] {
        &self.routes
    }

    /// First route matching `target`; query and fragment are ignored
    pub fn resolve(&self, target: &str) -> Option<RouteMatch> {
        let path = target
            .split(['?', '#'])
            .next()
            .unwrap_or_default();

        self.routes.iter().find_map(|route| {
            route.matches(path).map(|params| RouteMatch {
                route: route.clone(),
                path: target.to_string(),
                params,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_static_routes() {
        let table = RouteTable::standard("/login");
        assert_eq!(table.resolve("/").unwrap().route.name, "home");
        assert_eq!(table.resolve("/practice/").unwrap().route.name, "practice");
        assert!(!table.resolve("/login").unwrap().route.requires_auth);
        assert!(table.resolve("/admin").unwrap().route.requires_auth);
    }

    #[test]
    fn test_resolve_params() {
        let table = RouteTable::standard("/login");
        let matched = table.resolve("/homework/42?tab=answers").unwrap();
        assert_eq!(matched.route.name, "HomeworkDetail");
        assert_eq!(matched.params.get("id").map(String::as_str), Some("42"));
        assert_eq!(matched.path, "/homework/42?tab=answers");
    }

    #[test]
    fn test_unknown_path() {
        let table = RouteTable::standard("/login");
        assert!(table.resolve("/nowhere").is_none());
        assert!(table.resolve("/homework/1/extra").is_none());
    }
}
