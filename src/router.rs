//! Route table.
//!
//! Maps paths to views and page titles. Entering the movie route loads the
//! entry before the view is shown and replaces the page title with the
//! entry's title.

use crate::services::catalog::CatalogSource;
use crate::state::movie::{FetchOutcome, MovieStore};
use crate::Result;
use regex::Regex;
use std::collections::HashMap;

/// Views the presentation layer can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    MovieDetail,
    About,
}

/// A path pattern with its view and default title.
#[derive(Debug, Clone)]
pub struct Route {
    pub name: String,
    pub path: String,
    pub view: View,
    pub title: String,
    pattern: Regex,
}

impl Route {
    /// Build a route. `:name` segments capture one path segment.
    pub fn new(name: &str, path: &str, view: View, title: &str) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            path: path.to_string(),
            view,
            title: title.to_string(),
            pattern: compile_pattern(path)?,
        })
    }

    /// Match a path, returning the captured parameters.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let caps = self.pattern.captures(path)?;
        let params = self
            .pattern
            .capture_names()
            .flatten()
            .filter_map(|name| {
                let value = caps.name(name)?.as_str();
                let value = urlencoding::decode(value)
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| value.to_string());
                Some((name.to_string(), value))
            })
            .collect();
        Some(params)
    }
}

/// A resolved path.
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: HashMap<String, String>,
}

impl RouteMatch<'_> {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }
}

/// Result of a navigation.
#[derive(Debug, Clone)]
pub struct Navigation {
    pub route_name: String,
    pub view: View,
    pub title: String,
    pub params: HashMap<String, String>,
    /// Set when the route loaded an entry.
    pub fetch: Option<FetchOutcome>,
}

/// Route table plus the current page title.
#[derive(Debug)]
pub struct Router {
    routes: Vec<Route>,
    document_title: String,
}

impl Router {
    /// Create a router from routes. The first match wins.
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            routes,
            document_title: String::new(),
        }
    }

    /// The application's routes: home, movie detail and about.
    pub fn with_default_routes() -> Result<Self> {
        Ok(Self::new(vec![
            Route::new("home", "/", View::Home, "Home Page")?,
            Route::new("movie", "/movie/:id", View::MovieDetail, "Movies Details")?,
            Route::new("about", "/about", View::About, "About Page")?,
        ]))
    }

    /// Current page title.
    pub fn document_title(&self) -> &str {
        &self.document_title
    }

    /// Find the route for a path.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = normalize_path(path);
        self.routes.iter().find_map(|route| {
            route
                .matches(&path)
                .map(|params| RouteMatch { route, params })
        })
    }

    /// Navigate to a path.
    ///
    /// The movie detail route loads its entry first. The page title becomes
    /// the entry's title, or the route title when nothing was loaded.
    pub async fn navigate<S: CatalogSource>(
        &mut self,
        path: &str,
        movies: &mut MovieStore,
        source: &S,
    ) -> Result<Navigation> {
        let (route_name, view, route_title, params) = {
            let matched = self
                .resolve(path)
                .ok_or_else(|| crate::Error::InvalidRoute(path.to_string()))?;
            (
                matched.route.name.clone(),
                matched.route.view,
                matched.route.title.clone(),
                matched.params,
            )
        };

        let mut fetch = None;
        let title = match (view, params.get("id")) {
            (View::MovieDetail, Some(id)) => {
                let outcome = movies.fetch_details(source, id).await;
                fetch = Some(outcome);
                match (outcome, movies.selected_entry()) {
                    (FetchOutcome::Found, Some(entry)) => entry.title.clone(),
                    _ => route_title,
                }
            }
            _ => route_title,
        };

        tracing::debug!("Navigated to {} ({})", path, route_name);
        self.document_title = title.clone();

        Ok(Navigation {
            route_name,
            view,
            title,
            params,
            fetch,
        })
    }
}

/// Strip query/fragment and trailing slashes.
fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Turn `/movie/:id` into `^/movie/(?P<id>[^/]+)$`.
fn compile_pattern(path: &str) -> Result<Regex> {
    let mut pattern = String::from("^");
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        pattern.push('/');
        match segment.strip_prefix(':') {
            Some(name) => pattern.push_str(&format!("(?P<{}>[^/]+)", name)),
            None => pattern.push_str(&regex::escape(segment)),
        }
    }
    if pattern == "^" {
        pattern.push('/');
    }
    pattern.push('$');

    Regex::new(&pattern).map_err(|e| crate::Error::InvalidRoute(format!("{}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::{Catalog, CatalogEntry};

    #[test]
    fn test_resolve_default_routes() {
        let router = Router::with_default_routes().unwrap();

        assert_eq!(router.resolve("/").unwrap().route.view, View::Home);
        assert_eq!(router.resolve("/about/").unwrap().route.view, View::About);

        let matched = router.resolve("/movie/tom-and-jerry?autoplay=1").unwrap();
        assert_eq!(matched.route.name, "movie");
        assert_eq!(matched.param("id"), Some("tom-and-jerry"));

        assert!(router.resolve("/movie").is_none());
        assert!(router.resolve("/movie/a/b").is_none());
        assert!(router.resolve("/nowhere").is_none());
    }

    #[test]
    fn test_param_is_percent_decoded() {
        let router = Router::with_default_routes().unwrap();
        let matched = router.resolve("/movie/a%20b").unwrap();
        assert_eq!(matched.param("id"), Some("a b"));
    }

    #[tokio::test]
    async fn test_movie_route_sets_title_from_entry() {
        let catalog = Catalog::new(vec![CatalogEntry::new("a", "Adventure Time", vec![])]);
        let mut router = Router::with_default_routes().unwrap();
        let mut movies = MovieStore::new();

        let nav = router.navigate("/movie/a", &mut movies, &catalog).await.unwrap();
        assert_eq!(nav.view, View::MovieDetail);
        assert_eq!(nav.fetch, Some(FetchOutcome::Found));
        assert_eq!(router.document_title(), "Adventure Time");

        router.navigate("/movie/zzz", &mut movies, &catalog).await.unwrap();
        assert_eq!(router.document_title(), "Movies Details");

        router.navigate("/about", &mut movies, &catalog).await.unwrap();
        assert_eq!(router.document_title(), "About Page");
    }

    #[tokio::test]
    async fn test_unknown_route_is_error() {
        let mut router = Router::with_default_routes().unwrap();
        let mut movies = MovieStore::new();
        let result = router.navigate("/nope", &mut movies, &Catalog::default()).await;
        assert!(matches!(result, Err(crate::Error::InvalidRoute(_))));
    }
}
