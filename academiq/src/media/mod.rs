//! Videos and everything attached to them.
//!
//! [`VideoStore`] lists and moderates videos, [`VideoUploader`] publishes new
//! ones, and the remaining stores manage comments, bookmarks, favorites and
//! reports of a video.

pub mod bookmarks;
pub mod comments;
pub mod favorites;
pub mod file;
pub mod models;
pub mod progress;
pub mod reports;
pub mod upload;
pub mod videos;

pub use bookmarks::BookmarkStore;
pub use comments::CommentStore;
pub use favorites::FavoriteStore;
pub use file::UploadFile;
pub use models::{
    Bookmark, BookmarkDraft, BookmarkId, Comment, CommentId, CommentView, NamedRef, Report,
    ReportId, Video, VideoId, VideoView,
};
pub use progress::{ByteCounter, PhaseProgress, ProgressReporter};
pub use reports::ReportStore;
pub use upload::{UploadRequest, VideoDetails, VideoUploader};
pub use videos::VideoStore;
