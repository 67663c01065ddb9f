//! Executes parsed commands against the backend.

use crate::commands::{Command, HELP};
use academiq::{
    ApiClient, AuthManager, ClientConfig, Navigation, RouteGuard, Session, UploadStrategy,
    admin::StatsStore,
    auth::{Credentials, FileStorage},
    catalog::CourseStore,
    media::{
        CommentStore, FavoriteStore, ProgressReporter, UploadFile, UploadRequest, VideoDetails,
        VideoStore, VideoUploader,
    },
    quiz::{QuestionStore, QuizStore},
    resource::StoreStatus,
};
use anyhow::{Context, Result};
use log::debug;
use std::io::{self, Write};

/// Whether the prompt loop keeps running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Stores and session of one terminal client
pub struct App {
    session: Session,
    guard: RouteGuard,
    auth: AuthManager,
    courses: CourseStore,
    videos: VideoStore,
    comments: CommentStore,
    favorites: FavoriteStore,
    quizzes: QuizStore,
    questions: QuestionStore,
    stats: StatsStore,
    uploader: VideoUploader,
}

impl App {
    /// Build the client, restoring any persisted session
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let session = match &config.session_file {
            Some(path) => Session::new(FileStorage::new(path)),
            None => Session::in_memory(),
        };
        if session.restore() {
            debug!("Restored session for user {:?}", session.user_id());
        }

        let client = ApiClient::new(config, session.clone()).context("Invalid configuration")?;
        Ok(Self::with_client(client, config.upload_strategy))
    }

    pub fn with_client(client: ApiClient, strategy: UploadStrategy) -> Self {
        let session = client.session().clone();
        Self {
            guard: RouteGuard::new(session.clone()),
            auth: AuthManager::new(client.clone()),
            courses: CourseStore::new(client.clone()),
            videos: VideoStore::new(client.clone()),
            comments: CommentStore::new(client.clone()),
            favorites: FavoriteStore::new(client.clone()),
            quizzes: QuizStore::new(client.clone()),
            questions: QuestionStore::new(client.clone()),
            stats: StatsStore::new(client.clone()),
            uploader: VideoUploader::new(client, strategy),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let user = self
            .auth
            .login(&Credentials::new(email, password))
            .await
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
        println!("Logged in as {} ({})", user.full_name(), user.role);
        Ok(())
    }

    /// Run one command, printing its outcome
    pub async fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Login { email, password } => self.login(&email, &password).await?,
            Command::Logout => {
                self.auth.logout();
                println!("Logged out");
            }
            Command::WhoAmI => match self.session.user() {
                Some(user) => println!(
                    "{} <{}> [{}] #{}",
                    user.full_name(),
                    user.email,
                    user.role,
                    user.id
                ),
                None => println!("Not logged in"),
            },
            Command::Open(path) => match self.guard.navigate(&path) {
                Navigation::Allow { path, params } if params.is_empty() => println!("Open {path}"),
                Navigation::Allow { path, params } => {
                    let params: Vec<String> =
                        params.iter().map(|(k, v)| format!("{k}={v}")).collect();
                    println!("Open {path} ({})", params.join(", "));
                }
                Navigation::Redirect(to) => println!("Redirected to {to}"),
                Navigation::NotFound => println!("No page at {path}"),
            },
            Command::Courses => {
                let courses = self.courses.fetch_all().await;
                report(self.courses.status());
                for course in courses {
                    println!("{:>4}  {}", course.id, course.name);
                }
            }
            Command::Course(id) => {
                if let Some(course) = self.courses.fetch_by_id(id).await {
                    println!("{} #{}", course.name, course.id);
                    if let Some(description) = course.description {
                        println!("{description}");
                    }
                }
                report(self.courses.status());
            }
            Command::Videos(course) => {
                let videos = match course {
                    Some(course) => self.videos.fetch_by_course(course).await,
                    None => self.videos.fetch_all().await,
                };
                report(self.videos.status());
                for video in videos {
                    println!(
                        "{:>4}  {}  [{}] by {}, {}",
                        video.id, video.title, video.subject, video.author, video.uploaded
                    );
                }
            }
            Command::Video(id) => {
                if let Some(video) = self.videos.fetch_by_id(id).await {
                    println!("{} #{}", video.title, video.id);
                    println!("{}", video.url);
                    if !video.description.is_empty() {
                        println!("{}", video.description);
                    }
                }
                report(self.videos.status());
            }
            Command::Comments(video) => {
                let comments = self.comments.fetch_by_video(video).await;
                report(self.comments.status());
                if comments.is_empty() {
                    println!("No comments yet");
                }
                for comment in comments {
                    println!("{} ({}): {}", comment.author, comment.time, comment.content);
                }
            }
            Command::Comment { video, text } => {
                if self.comments.create(video, &text).await.is_ok() {
                    println!("Comment posted");
                }
                report(self.comments.status());
            }
            Command::Favorites => {
                let favorites = self.favorites.fetch().await;
                report(self.favorites.status());
                for video in favorites {
                    println!("{:>4}  {}", video.id, video.title);
                }
            }
            Command::ToggleFavorite(video) => {
                match self.favorites.toggle(video).await {
                    Ok(true) => println!("Added video {video} to favorites"),
                    Ok(false) => println!("Removed video {video} from favorites"),
                    Err(_) => {}
                }
                report(self.favorites.status());
            }
            Command::Quizzes => {
                let quizzes = self.quizzes.fetch_all().await;
                report(self.quizzes.status());
                for quiz in quizzes {
                    println!("{:>4}  {}", quiz.id, quiz.name);
                }
            }
            Command::Questions(quiz) => {
                let questions = self.questions.fetch_by_quiz(quiz).await;
                report(self.questions.status());
                for question in questions {
                    println!("{:>2}. {}", question.order, question.description);
                }
            }
            Command::Stats(user) => {
                let Some(user) = user.or_else(|| self.session.user_id()) else {
                    println!("Log in or give a user ID");
                    return Ok(Flow::Continue);
                };
                if let Some(stats) = self.stats.fetch(user).await {
                    println!(
                        "User {}: {} courses, {} videos, {} quizzes",
                        stats.user_id, stats.courses, stats.videos, stats.quizzes
                    );
                }
                report(self.stats.status());
            }
            Command::Upload { file, title, thumbnail } => {
                let video = UploadFile::from_path(&file)
                    .await
                    .with_context(|| format!("Could not read {}", file.display()))?;
                let mut request = UploadRequest::new(video, VideoDetails::new(title));
                if let Some(path) = thumbnail {
                    let thumbnail = UploadFile::from_path(&path)
                        .await
                        .with_context(|| format!("Could not read {}", path.display()))?;
                    request = request.thumbnail(thumbnail);
                }

                let progress = ProgressReporter::new(|percent| {
                    print!("\rUploading... {percent:>3}%");
                    let _ = io::stdout().flush();
                });
                let result = self.uploader.upload(request, progress).await;
                println!();
                if let Ok(video) = result {
                    println!("Uploaded video {} ({})", video.id, video.title);
                }
                report(self.uploader.status());
            }
            Command::Help => print!("{HELP}"),
            Command::Quit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }
}

/// Print a store's error or success message, if any
fn report(status: &StoreStatus) {
    if let Some(error) = status.error_message() {
        println!("Error: {error}");
    } else if let Some(success) = status.success_message() {
        println!("{success}");
    }
}
