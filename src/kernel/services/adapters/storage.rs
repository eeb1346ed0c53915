//! Local-filesystem storage side.
//!
//! Requests are queued to one async worker on a dedicated thread, so replies
//! leave in the order requests arrived. Replies go back over the kernel bus.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::thread::JoinHandle;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::kernel::services::bus::KernelBusSender;
use crate::kernel::services::ports::{
    BridgeReply, BridgeRequest, FileProperties, Notification, Result, SessionError,
    StorageService, TreeEntry,
};
use crate::models::file_tree::file_name_of;
use crate::models::should_ignore;

const SAVED_MESSAGE: &str = "Markdown file saved";

/// Native file dialogs. `None` means the user dismissed the dialog.
pub trait PathPicker: Send + 'static {
    fn pick_file(&mut self) -> Option<PathBuf>;
    fn pick_save_path(&mut self, suggested: Option<&Path>) -> Option<PathBuf>;
    fn pick_folder(&mut self) -> Option<PathBuf>;
}

/// Headless picker: every dialog is dismissed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPicker;

impl PathPicker for NoPicker {
    fn pick_file(&mut self) -> Option<PathBuf> {
        None
    }

    fn pick_save_path(&mut self, _suggested: Option<&Path>) -> Option<PathBuf> {
        None
    }

    fn pick_folder(&mut self) -> Option<PathBuf> {
        None
    }
}

pub struct LocalStorage {
    tx: Option<UnboundedSender<BridgeRequest>>,
    worker: Option<JoinHandle<()>>,
}

impl LocalStorage {
    pub fn spawn(bus: KernelBusSender, picker: impl PathPicker) -> io::Result<Self> {
        let runtime = build_runtime()?;
        let (tx, rx) = unbounded_channel();
        let worker = std::thread::Builder::new()
            .name("quill-storage".to_string())
            .spawn(move || runtime.block_on(run_worker(rx, bus, picker)))?;
        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
        })
    }
}

fn build_runtime() -> io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .or_else(|e| {
            tracing::error!(
                error = %e,
                "Failed to create multi-thread tokio runtime, falling back to current-thread"
            );
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
        })
}

impl StorageService for LocalStorage {
    fn send(&self, request: BridgeRequest) -> Result<()> {
        let tx = self.tx.as_ref().ok_or(SessionError::StorageUnavailable)?;
        tx.send(request)
            .map_err(|_| SessionError::StorageUnavailable)
    }
}

impl Drop for LocalStorage {
    fn drop(&mut self) {
        // Closing the queue lets the worker finish what is already queued.
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("storage worker panicked");
            }
        }
    }
}

async fn run_worker<P: PathPicker>(
    mut rx: UnboundedReceiver<BridgeRequest>,
    bus: KernelBusSender,
    mut picker: P,
) {
    while let Some(request) = rx.recv().await {
        let channel = request.channel();
        if request.is_shell_message() {
            tracing::debug!(channel, ?request, "shell message");
            continue;
        }

        let replies = match handle(request, &mut picker).await {
            Ok(replies) => replies,
            Err(err) if err.is_silent() => {
                tracing::debug!(channel, "request cancelled by user");
                continue;
            }
            Err(err) => {
                tracing::warn!(channel, key = err.key(), error = %err, "storage request failed");
                vec![BridgeReply::Notification(err.to_notification())]
            }
        };

        for reply in replies {
            if bus.send_reply(reply).is_err() {
                tracing::debug!("kernel bus closed, storage worker exiting");
                return;
            }
        }
    }
}

async fn handle<P: PathPicker>(request: BridgeRequest, picker: &mut P) -> Result<Vec<BridgeReply>> {
    match request {
        BridgeRequest::New { content, file } => {
            let target = match file {
                Some(file) => Some(file),
                None if content.is_empty() => None,
                None => picker.pick_save_path(None),
            };
            let mut replies = Vec::new();
            if let Some(target) = target {
                write_file(&target, &content).await?;
                replies.push(BridgeReply::Notification(Notification::success(SAVED_MESSAGE)));
            }
            replies.push(BridgeReply::FileOpened {
                content: String::new(),
                filename: String::new(),
                file: None,
            });
            Ok(replies)
        }
        BridgeRequest::Open => {
            let path = picker.pick_file().ok_or(SessionError::UserCancelled)?;
            Ok(vec![read_file(path).await?])
        }
        BridgeRequest::OpenPath { path } => {
            let meta = tokio::fs::metadata(&path)
                .await
                .map_err(|e| SessionError::from_io(e, &path))?;
            if meta.is_dir() {
                Ok(vec![list_folder(path).await?])
            } else {
                Ok(vec![read_file(path).await?])
            }
        }
        BridgeRequest::Save {
            content,
            file,
            open_file,
        } => {
            // Save never creates files; a vanished target is an error.
            tokio::fs::metadata(&file)
                .await
                .map_err(|e| SessionError::from_io(e, &file))?;
            write_file(&file, &content).await?;
            let mut replies = vec![BridgeReply::Notification(Notification::success(
                SAVED_MESSAGE,
            ))];
            if open_file {
                replies.push(read_file(file).await?);
            }
            Ok(replies)
        }
        BridgeRequest::SaveAs { content } => {
            let path = picker
                .pick_save_path(None)
                .ok_or(SessionError::UserCancelled)?;
            write_file(&path, &content).await?;
            Ok(vec![
                BridgeReply::Notification(Notification::success(SAVED_MESSAGE)),
                read_file(path).await?,
            ])
        }
        BridgeRequest::CreateFile { parent, name } => {
            let path = child_path(&parent, &name)?;
            tokio::fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&path)
                .await
                .map_err(|e| SessionError::from_io(e, &path))?;
            Ok(vec![list_folder(parent).await?])
        }
        BridgeRequest::CreateFolder { parent, name } => {
            let path = child_path(&parent, &name)?;
            tokio::fs::create_dir(&path)
                .await
                .map_err(|e| SessionError::from_io(e, &path))?;
            Ok(vec![list_folder(parent).await?])
        }
        BridgeRequest::Rename { path, name } => {
            let parent = parent_of(&path)?;
            let new_path = child_path(&parent, &name)?;
            if tokio::fs::try_exists(&new_path).await.unwrap_or(false) {
                return Err(SessionError::Unknown(format!("{name} already exists")));
            }
            tokio::fs::rename(&path, &new_path)
                .await
                .map_err(|e| SessionError::from_io(e, &path))?;
            Ok(vec![
                BridgeReply::PathRenamed {
                    old_path: path,
                    new_path,
                    name,
                },
                list_folder(parent).await?,
            ])
        }
        BridgeRequest::Delete { path } => {
            let parent = parent_of(&path)?;
            let meta = tokio::fs::symlink_metadata(&path)
                .await
                .map_err(|e| SessionError::from_io(e, &path))?;
            let removed = if meta.is_dir() {
                tokio::fs::remove_dir_all(&path).await
            } else {
                tokio::fs::remove_file(&path).await
            };
            removed.map_err(|e| SessionError::from_io(e, &path))?;
            Ok(vec![list_folder(parent).await?])
        }
        BridgeRequest::GetProperties { path } => {
            let meta = tokio::fs::metadata(&path)
                .await
                .map_err(|e| SessionError::from_io(e, &path))?;
            Ok(vec![BridgeReply::PathProperties(FileProperties {
                is_directory: meta.is_dir(),
                size: meta.len(),
                created: meta.created().ok().and_then(epoch_millis),
                modified: meta.modified().ok().and_then(epoch_millis),
                path,
            })])
        }
        BridgeRequest::OpenFolder => {
            let path = picker.pick_folder().ok_or(SessionError::UserCancelled)?;
            Ok(vec![list_folder(path).await?])
        }
        BridgeRequest::SetTitle { .. } | BridgeRequest::ContentChanged { .. } => Ok(Vec::new()),
    }
}

async fn read_file(path: PathBuf) -> Result<BridgeReply> {
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| SessionError::from_io(e, &path))?;
    Ok(BridgeReply::FileOpened {
        content,
        filename: file_name_of(&path),
        file: Some(path),
    })
}

async fn write_file(path: &Path, content: &str) -> Result<()> {
    tokio::fs::write(path, content)
        .await
        .map_err(|e| SessionError::from_io(e, path))
}

/// One level of `path`, noise entries skipped.
pub async fn list_folder(path: PathBuf) -> Result<BridgeReply> {
    let mut entries = tokio::fs::read_dir(&path)
        .await
        .map_err(|e| SessionError::from_io(e, &path))?;
    let mut tree = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| SessionError::from_io(e, &path))?
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        if should_ignore(&name) {
            continue;
        }
        let Ok(file_type) = entry.file_type().await else {
            continue;
        };
        let entry_path = entry.path();
        if file_type.is_dir() {
            let has_children = dir_has_children(&entry_path).await;
            tree.push(TreeEntry::directory(entry_path, has_children));
        } else {
            tree.push(TreeEntry::file(entry_path));
        }
    }
    Ok(BridgeReply::FolderOpened { path, tree })
}

async fn dir_has_children(path: &Path) -> bool {
    let Ok(mut entries) = tokio::fs::read_dir(path).await else {
        return false;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        if !should_ignore(&entry.file_name().to_string_lossy()) {
            return true;
        }
    }
    false
}

fn child_path(parent: &Path, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(parent.join(name)),
        _ => Err(SessionError::Unknown(format!("invalid name: {name:?}"))),
    }
}

fn parent_of(path: &Path) -> Result<PathBuf> {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .ok_or_else(|| SessionError::Unknown(format!("{} has no parent", path.display())))
}

fn epoch_millis(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| u64::try_from(d.as_millis()).ok())
}
