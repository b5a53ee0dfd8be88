//! Name inflection for inferring target model names from association names.

use convert_case::{Case, Casing};

/// Singularize the last `_`-separated word of `name`.
///
/// Covers the regular English plurals association names use in practice
/// (`comments`, `categories`, `addresses`, `boxes`); irregular plurals need an
/// explicit target type on the declaration.
pub fn singularize(name: &str) -> String {
    let (head, last) = match name.rfind('_') {
        Some(pos) => name.split_at(pos + 1),
        None => ("", name),
    };

    let singular = if let Some(stem) = last.strip_suffix("ies") {
        format!("{stem}y")
    } else if last.ends_with("sses")
        || last.ends_with("xes")
        || last.ends_with("ches")
        || last.ends_with("shes")
    {
        last[..last.len() - 2].to_string()
    } else if last.ends_with("ss") || last.ends_with("us") {
        last.to_string()
    } else if let Some(stem) = last.strip_suffix('s') {
        stem.to_string()
    } else {
        last.to_string()
    };

    format!("{head}{singular}")
}

/// Model name for an association name: singular, PascalCase.
///
/// `comments` → `Comment`, `post` → `Post`, `blog_entries` → `BlogEntry`.
pub fn classify(name: &str) -> String {
    singularize(name).to_case(Case::Pascal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singularize_regular_plurals() {
        assert_eq!(singularize("comments"), "comment");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("status"), "status");
        assert_eq!(singularize("post"), "post");
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("comments"), "Comment");
        assert_eq!(classify("post"), "Post");
        assert_eq!(classify("blog_entries"), "BlogEntry");
    }
}
