//! Engine-wide configuration handed to every constructor that resolves a path.
//!
//! There is no global asset root: a [`Context`] is created once by the host
//! application and passed by reference into model and script components.

use std::path::{Component, Path, PathBuf};

/// What to do when a script raises an error while its `update` function runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScriptErrorPolicy {
    /// Log the error and turn the component into a no-op, the same way a
    /// failed load is handled.
    #[default]
    Disable,
    /// Log the error and panic. Meant for debug builds that want script bugs
    /// to stop the frame loop immediately.
    Panic,
}

/// Knobs for the model importers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportOptions {
    /// Ask the import library to split polygons into triangles.
    pub triangulate: bool,
    /// Flip the V texture coordinate of OBJ files (wgpu samples top-down).
    pub flip_uv: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            triangulate: true,
            flip_uv: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Context {
    root: PathBuf,
    import: ImportOptions,
    script_errors: ScriptErrorPolicy,
}

impl Context {
    /// Environment variable consulted by [`Context::from_env`].
    pub const ROOT_ENV: &'static str = "SCENE_NGIN_ROOT";
    pub const DEFAULT_ROOT: &'static str = "./assets";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            import: ImportOptions::default(),
            script_errors: ScriptErrorPolicy::default(),
        }
    }

    /// Root taken from `SCENE_NGIN_ROOT`, falling back to `./assets`.
    pub fn from_env() -> Self {
        let root = std::env::var_os(Self::ROOT_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_ROOT));
        log::debug!("asset root: {}", root.display());
        Self::new(root)
    }

    pub fn with_import_options(mut self, import: ImportOptions) -> Self {
        self.import = import;
        self
    }

    pub fn with_script_error_policy(mut self, policy: ScriptErrorPolicy) -> Self {
        self.script_errors = policy;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn import_options(&self) -> &ImportOptions {
        &self.import
    }

    pub fn script_error_policy(&self) -> ScriptErrorPolicy {
        self.script_errors
    }

    /// Appends `relative` to the root. Leading separators are ignored so that
    /// `"/models/cube.obj"` still lands below the root.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        let relative = relative
            .as_ref()
            .components()
            .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)));
        let mut path = self.root.clone();
        path.extend(relative);
        path
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROOT)
    }
}
