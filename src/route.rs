// src/route.rs
//! Route string helpers shared by the server and client collectors.

use indexmap::IndexMap;

use crate::model::RouteParamType;

/// Normalizes a route to a single leading slash and no trailing slash.
/// The empty route and `/` both become `/`.
pub fn normalize_route(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed)
    }
}

impl RouteParamType {
    /// Classifies a parameter template by its suffix: `?` optional, `*`
    /// wildcard, anything else required.
    pub fn from_template(template: &str) -> Self {
        if template.ends_with('?') {
            RouteParamType::Optional
        } else if template.ends_with('*') {
            RouteParamType::Wildcard
        } else {
            RouteParamType::Required
        }
    }
}

/// Extracts the `:param` tokens of a route in order of appearance.
pub fn route_parameters(route: &str) -> IndexMap<String, RouteParamType> {
    route
        .split('/')
        .filter(|segment| segment.starts_with(':') && segment.len() > 1)
        .map(|segment| (segment.to_string(), RouteParamType::from_template(segment)))
        .collect()
}

/// Reduces a qualified type name to its simple name:
/// `com.example.views.Dashboard` → `Dashboard`, `app::views::Main<T>` → `Main`,
/// `Outer$Inner` → `Inner`.
pub fn simple_type_name(qualified: &str) -> &str {
    let without_generics = match qualified.find('<') {
        Some(idx) => &qualified[..idx],
        None => qualified,
    };
    without_generics
        .rsplit(['.', ':', '$'])
        .find(|part| !part.is_empty())
        .unwrap_or(without_generics)
}

/// Last static segment of a route, used as a fallback title.
pub fn last_static_segment(route: &str) -> &str {
    route
        .split('/')
        .rev()
        .find(|segment| !segment.is_empty() && !segment.starts_with(':'))
        .unwrap_or("")
}

/// Turns a component name into a display title: `UserProfileView` → `User Profile`.
pub fn title_from_component_name(name: &str) -> String {
    let base = name.strip_suffix("View").filter(|s| !s.is_empty()).unwrap_or(name);
    let mut title = String::with_capacity(base.len() + 4);
    let mut prev: Option<char> = None;
    for c in base.chars() {
        if let Some(p) = prev {
            if c.is_uppercase() && (p.is_lowercase() || p.is_ascii_digit()) {
                title.push(' ');
            }
        }
        title.push(c);
        prev = Some(c);
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalizes_leading_and_trailing_slashes() {
        assert_eq!(normalize_route(""), "/");
        assert_eq!(normalize_route("/"), "/");
        assert_eq!(normalize_route("bar"), "/bar");
        assert_eq!(normalize_route("home/"), "/home");
        assert_eq!(normalize_route("/:___userId/edit"), "/:___userId/edit");
        assert_eq!(normalize_route("//double//"), "/double");
    }

    #[test]
    fn classifies_parameter_templates_by_suffix() {
        assert_eq!(RouteParamType::from_template(":id"), RouteParamType::Required);
        assert_eq!(RouteParamType::from_template(":id?"), RouteParamType::Optional);
        assert_eq!(RouteParamType::from_template(":rest*"), RouteParamType::Wildcard);
        assert_eq!(RouteParamType::from_template(":odd+"), RouteParamType::Required);
    }

    #[test]
    fn extracts_route_parameters_in_order() {
        let params = route_parameters("/user/:userId/posts/:postId?/:rest*");
        let keys: Vec<_> = params.keys().cloned().collect();
        assert_eq!(keys, vec![":userId", ":postId?", ":rest*"]);
        assert_eq!(params[":rest*"], RouteParamType::Wildcard);
        assert!(route_parameters("/plain/route").is_empty());
    }

    #[test]
    fn simplifies_type_names() {
        assert_eq!(simple_type_name("com.example.Component"), "Component");
        assert_eq!(simple_type_name("app::views::Main<T>"), "Main");
        assert_eq!(simple_type_name("Outer$Inner"), "Inner");
        assert_eq!(simple_type_name("Plain"), "Plain");
    }

    #[test]
    fn derives_titles() {
        assert_eq!(title_from_component_name("UserProfileView"), "User Profile");
        assert_eq!(title_from_component_name("View"), "View");
        assert_eq!(title_from_component_name("About"), "About");
        assert_eq!(last_static_segment("/user/:id"), "user");
        assert_eq!(last_static_segment("/"), "");
    }
}
