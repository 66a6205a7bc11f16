//! Rewriting of absolute file paths into short display forms.

/// Known root prefixes, resolved once by the caller at startup and passed
/// in as plain values.
///
/// Roots are checked in a fixed priority order: the engine's shader-include
/// root, the engine install root, the package cache, the project asset
/// root. Comparison is case-insensitive; separators are normalized to `/`
/// on both sides. A path under no known root is returned unchanged.
///
/// Paths of locally-linked (non-cached) packages are not recognized and
/// stay absolute; rewriting those to a `Packages/` form would need package
/// manifest data this layer does not have.
#[derive(Clone, Default, Debug)]
pub struct PathRoots {
    shader_include_root: Option<String>,
    engine_root: Option<String>,
    package_cache_root: Option<String>,
    asset_root: Option<String>,
}

impl PathRoots {
    pub fn with_shader_include_root(mut self, root: &str) -> Self {
        self.shader_include_root = Some(normalize_root(root));
        self
    }

    pub fn with_engine_root(mut self, root: &str) -> Self {
        self.engine_root = Some(normalize_root(root));
        self
    }

    pub fn with_package_cache_root(mut self, root: &str) -> Self {
        self.package_cache_root = Some(normalize_root(root));
        self
    }

    pub fn with_asset_root(mut self, root: &str) -> Self {
        self.asset_root = Some(normalize_root(root));
        self
    }

    /// Map an absolute path to its display form.
    pub fn normalize(&self, path: &str) -> String {
        let path = path.replace('\\', "/");

        if let Some(rest) = strip_root(&path, &self.shader_include_root) {
            return rest.to_string();
        }
        if let Some(rest) = strip_root(&path, &self.engine_root) {
            return rest.to_string();
        }
        if let Some(rest) = strip_root(&path, &self.package_cache_root) {
            return rewrite_package_path(rest);
        }
        if let Some(rest) = strip_root(&path, &self.asset_root) {
            return rest.to_string();
        }

        path
    }
}

fn normalize_root(root: &str) -> String {
    let mut root = root.replace('\\', "/");
    if !root.ends_with('/') {
        root.push('/');
    }
    root
}

fn strip_root<'a>(path: &'a str, root: &Option<String>) -> Option<&'a str> {
    let root = root.as_deref()?;
    if path.len() >= root.len() && path.as_bytes()[..root.len()].eq_ignore_ascii_case(root.as_bytes())
    {
        Some(&path[root.len()..])
    } else {
        None
    }
}

/// `com.vendor.name@1.2.3/rest` under the package cache becomes
/// `Packages/com.vendor.name/rest`.
fn rewrite_package_path(sub_path: &str) -> String {
    match (sub_path.find('/'), sub_path.find('@')) {
        (Some(slash), Some(at)) if at < slash => {
            format!("Packages/{}{}", &sub_path[..at], &sub_path[slash..])
        }
        _ => sub_path.to_string(),
    }
}
