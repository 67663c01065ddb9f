//! Route table and path matching.

use super::access::Requirement;

/// Route declaration. Child paths are relative to their parent.
#[derive(Debug, Clone)]
pub struct Route {
    pub path: String,
    /// `None` inherits the parent's requirement (public at top level)
    pub requirement: Option<Requirement>,
    pub redirect: Option<String>,
    pub children: Vec<Route>,
}

impl Route {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            requirement: None,
            redirect: None,
            children: Vec::new(),
        }
    }

    pub fn requires(mut self, requirement: Requirement) -> Self {
        self.requirement = Some(requirement);
        self
    }

    pub fn redirect(mut self, to: &str) -> Self {
        self.redirect = Some(to.to_string());
        self
    }

    pub fn child(mut self, child: Route) -> Self {
        self.children.push(child);
        self
    }
}

/// A concrete path matched against the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// Full pattern, e.g. `/curso/:id`
    pub pattern: String,
    pub params: Vec<(String, String)>,
    pub requirement: Requirement,
    pub redirect: Option<String>,
}

#[derive(Debug, Clone)]
struct FlatRoute {
    pattern: String,
    segments: Vec<String>,
    requirement: Requirement,
    redirect: Option<String>,
}

/// Ordered set of routes; the first match wins
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<FlatRoute>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        let mut flat = Vec::new();
        for route in routes {
            flatten(&route, "", &Requirement::Public, &mut flat);
        }
        Self { routes: flat }
    }

    /// Routes of the AcademIQ web application
    pub fn academiq() -> Self {
        Self::new(vec![
            Route::new("/"),
            Route::new("/login"),
            Route::new("/cursos"),
            Route::new("/subir-video").requires(Requirement::teacher_or_admin()),
            Route::new("/curso/:id").requires(Requirement::Authenticated),
            Route::new("/reproductor-video").requires(Requirement::Authenticated),
            Route::new("/historial").requires(Requirement::Authenticated),
            Route::new("/perfil").requires(Requirement::Authenticated),
            Route::new("/quizz-time!").requires(Requirement::Authenticated),
            Route::new("/usuarios").requires(Requirement::Authenticated),
            Route::new("/quizz-detail").requires(Requirement::Authenticated),
            Route::new("/quizz-detail/:id"),
            Route::new("/peticion-profesor").requires(Requirement::Authenticated),
            Route::new("/admin")
                .requires(Requirement::admin())
                .child(Route::new("").redirect("/admin/usuarios"))
                .child(Route::new("usuarios"))
                .child(Route::new("cursos"))
                .child(Route::new("reportes")),
        ])
    }

    /// Match `path`, ignoring query string, fragment and trailing slash
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute> {
        let segments = split(clean(path));
        self.routes.iter().find_map(|route| {
            let params = match_segments(&route.segments, &segments)?;
            Some(ResolvedRoute {
                pattern: route.pattern.clone(),
                params,
                requirement: route.requirement.clone(),
                redirect: route.redirect.clone(),
            })
        })
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.pattern.as_str())
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::academiq()
    }
}

fn flatten(route: &Route, prefix: &str, inherited: &Requirement, out: &mut Vec<FlatRoute>) {
    let pattern = join(prefix, &route.path);
    let requirement = route.requirement.clone().unwrap_or_else(|| inherited.clone());

    // Children go first so an empty child path shadows its parent
    for child in &route.children {
        flatten(child, &pattern, &requirement, out);
    }

    out.push(FlatRoute {
        segments: split(&pattern),
        pattern,
        requirement,
        redirect: route.redirect.clone(),
    });
}

fn join(prefix: &str, path: &str) -> String {
    if path.starts_with('/') || prefix.is_empty() {
        return path.to_string();
    }
    if path.is_empty() {
        return prefix.to_string();
    }
    format!("{}/{}", prefix.trim_end_matches('/'), path)
}

fn clean(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

fn split(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn match_segments(pattern: &[String], path: &[String]) -> Option<Vec<(String, String)>> {
    if pattern.len() != path.len() {
        return None;
    }
    let mut params = Vec::new();
    for (expected, actual) in pattern.iter().zip(path) {
        if let Some(name) = expected.strip_prefix(':') {
            params.push((name.to_string(), actual.clone()));
        } else if expected != actual {
            return None;
        }
    }
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_static_and_params() {
        let table = RouteTable::academiq();

        let root = table.resolve("/").unwrap();
        assert_eq!(root.pattern, "/");
        assert_eq!(root.requirement, Requirement::Public);

        let course = table.resolve("/curso/12?tab=videos").unwrap();
        assert_eq!(course.pattern, "/curso/:id");
        assert_eq!(course.params, vec![("id".to_string(), "12".to_string())]);
        assert_eq!(course.requirement, Requirement::Authenticated);

        assert_eq!(table.resolve("/quizz-detail/4").unwrap().requirement, Requirement::Public);
        assert_eq!(
            table.resolve("/quizz-detail").unwrap().requirement,
            Requirement::Authenticated
        );
        assert!(table.resolve("/quizz-time!").is_some());
    }

    #[test]
    fn test_children_inherit_requirement() {
        let table = RouteTable::academiq();
        for path in ["/admin/usuarios", "/admin/cursos", "/admin/reportes/"] {
            assert_eq!(table.resolve(path).unwrap().requirement, Requirement::admin());
        }
    }

    #[test]
    fn test_empty_child_redirect_shadows_parent() {
        let admin = RouteTable::academiq().resolve("/admin").unwrap();
        assert_eq!(admin.redirect.as_deref(), Some("/admin/usuarios"));
        assert_eq!(admin.requirement, Requirement::admin());
    }

    #[test]
    fn test_unknown_paths() {
        let table = RouteTable::academiq();
        assert!(table.resolve("/nope").is_none());
        assert!(table.resolve("/curso").is_none());
        assert!(table.resolve("/admin/settings").is_none());
    }
}
