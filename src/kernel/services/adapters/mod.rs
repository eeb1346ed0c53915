//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod render;
pub mod settings;
pub mod storage;

pub use render::PlainRenderer;
pub use settings::{
    ensure_log_dir, ensure_settings_file, get_log_dir, get_settings_path, load_settings,
    load_settings_from,
};
pub use storage::{list_folder, LocalStorage, NoPicker, PathPicker};
