use academiq::{auth::UserId, catalog::CourseId, media::VideoId, quiz::QuizId};
use std::{fmt, path::PathBuf};

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing was typed.
    Empty,
    /// A required argument is missing; carries the usage line.
    MissingArgument(&'static str),
    /// An ID argument is not a positive number.
    InvalidId(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Type a command, or 'help' to list them"),
            Self::MissingArgument(usage) => write!(f, "Missing argument. Usage: {usage}"),
            Self::InvalidId(value) => {
                write!(f, "Invalid ID '{value}'. IDs are positive numbers")
            }
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{cmd}'. Type 'help' to see available commands"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// A command typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { email: String, password: String },
    Logout,
    WhoAmI,
    /// Ask the route guard about a path
    Open(String),
    Courses,
    Course(CourseId),
    Videos(Option<CourseId>),
    Video(VideoId),
    Comments(VideoId),
    Comment { video: VideoId, text: String },
    Favorites,
    ToggleFavorite(VideoId),
    Quizzes,
    Questions(QuizId),
    Stats(Option<UserId>),
    Upload {
        file: PathBuf,
        title: String,
        thumbnail: Option<PathBuf>,
    },
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  login <email> <password>          Log in
  logout                            Log out
  whoami                            Show the logged-in user
  open <path>                       Check whether a page may be opened
  courses                           List courses
  course <id>                       Show one course
  videos [course]                   List videos, optionally of one course
  video <id>                        Show one video
  comments <video>                  List the comments of a video
  comment <video> <text>            Comment on a video
  favorites                         List your favorite videos
  fav <video>                       Like or unlike a video
  quizzes                           List quizzes
  questions <quiz>                  List the questions of a quiz
  stats [user]                      Activity statistics (default: you)
  upload <file> <title> [thumbnail] Upload a video
  help                              Show this help
  quit                              Exit
";

/// Parse a line typed at the prompt.
///
/// # Arguments
///
/// * `input` - The raw command string from user input
///
/// # Returns
///
/// * `Ok(Command)` - Successfully parsed command
/// * `Err(ParseError)` - Parse error with descriptive message
///
/// # Examples
///
/// ```
/// use aq_client::commands::{Command, parse_command};
///
/// assert_eq!(parse_command("courses"), Ok(Command::Courses));
/// assert_eq!(parse_command("videos 3"), Ok(Command::Videos(Some(3))));
/// assert!(parse_command("video abc").is_err());
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();
    let (name, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (trimmed, ""),
    };
    let args: Vec<&str> = rest.split_ascii_whitespace().collect();

    match name.to_ascii_lowercase().as_str() {
        "" => Err(ParseError::Empty),
        "login" => match args.as_slice() {
            [email, password, ..] => Ok(Command::Login {
                email: email.to_string(),
                password: password.to_string(),
            }),
            _ => Err(ParseError::MissingArgument("login <email> <password>")),
        },
        "logout" => Ok(Command::Logout),
        "whoami" => Ok(Command::WhoAmI),
        "open" => args
            .first()
            .map(|path| Command::Open(path.to_string()))
            .ok_or(ParseError::MissingArgument("open <path>")),
        "courses" => Ok(Command::Courses),
        "course" => required_id(&args, "course <id>").map(Command::Course),
        "videos" => optional_id(&args).map(Command::Videos),
        "video" => required_id(&args, "video <id>").map(Command::Video),
        "comments" => required_id(&args, "comments <video>").map(Command::Comments),
        "comment" => parse_comment(rest),
        "favorites" | "favs" => Ok(Command::Favorites),
        "fav" => required_id(&args, "fav <video>").map(Command::ToggleFavorite),
        "quizzes" => Ok(Command::Quizzes),
        "questions" => required_id(&args, "questions <quiz>").map(Command::Questions),
        "stats" => optional_id(&args).map(Command::Stats),
        "upload" => match args.as_slice() {
            [file, title, rest @ ..] => Ok(Command::Upload {
                file: PathBuf::from(file),
                title: title.to_string(),
                thumbnail: rest.first().map(PathBuf::from),
            }),
            _ => Err(ParseError::MissingArgument("upload <file> <title> [thumbnail]")),
        },
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(ParseError::UnrecognizedCommand(name.to_string())),
    }
}

/// Parse `comment <video> <text>`, keeping the text's inner spacing
fn parse_comment(rest: &str) -> Result<Command, ParseError> {
    const USAGE: &str = "comment <video> <text>";
    let (id, text) = rest
        .split_once(char::is_whitespace)
        .ok_or(ParseError::MissingArgument(USAGE))?;
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::MissingArgument(USAGE));
    }
    Ok(Command::Comment {
        video: parse_id(id)?,
        text: text.to_string(),
    })
}

fn required_id(args: &[&str], usage: &'static str) -> Result<i64, ParseError> {
    args.first()
        .ok_or(ParseError::MissingArgument(usage))
        .and_then(|value| parse_id(value))
}

fn optional_id(args: &[&str]) -> Result<Option<i64>, ParseError> {
    args.first().map(|value| parse_id(value)).transpose()
}

fn parse_id(value: &str) -> Result<i64, ParseError> {
    value
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ParseError::InvalidId(value.to_string()))
}
