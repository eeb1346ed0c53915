use std::time::Duration;

#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Quiet period after an edit before dirty state is recomputed.
    pub dirty_debounce: Duration,
    /// Quiet period after an edit before the preview re-renders.
    pub render_debounce: Duration,
    /// Appended to new file names that have no extension.
    pub default_extension: String,
    /// Replies applied per tick at most.
    pub max_replies_per_tick: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dirty_debounce: Duration::from_millis(250),
            render_debounce: Duration::from_millis(150),
            default_extension: "md".to_string(),
            max_replies_per_tick: 256,
        }
    }
}

impl SessionConfig {
    /// `notes` becomes `notes.md`; names that already carry an extension are kept.
    pub fn with_default_extension(&self, name: &str) -> String {
        let name = name.trim();
        if name.is_empty()
            || self.default_extension.is_empty()
            || std::path::Path::new(name).extension().is_some()
        {
            return name.to_string();
        }
        format!("{name}.{}", self.default_extension)
    }
}
