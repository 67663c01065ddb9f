//! Quizzes, their questions and answers, and saved attempts.

pub mod answers;
pub mod models;
pub mod questions;
pub mod quizzes;
pub mod results;

pub use answers::AnswerStore;
pub use models::{
    Answer, AnswerId, NewAnswer, NewQuestion, NewQuiz, Question, QuestionId, Quiz, QuizId,
    QuizResult, UserAnswer, score,
};
pub use questions::QuestionStore;
pub use quizzes::QuizStore;
pub use results::ResultStore;
