use crate::{auth::UserId, media::VideoId, resource::Resource};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Quiz ID type
pub type QuizId = i64;

/// Question ID type
pub type QuestionId = i64;

/// Answer ID type
pub type AnswerId = i64;

/// Quiz as returned by `/Quiz`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(rename = "idQuiz", default)]
    pub id: QuizId,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "idUsuario", default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    #[serde(rename = "idVideo", default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<VideoId>,
    #[serde(rename = "fechaCreacion", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Resource for Quiz {
    type Key = QuizId;

    fn key(&self) -> QuizId {
        self.id
    }
}

/// Quiz fields sent on create and update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewQuiz {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "idUsuario", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    #[serde(rename = "idVideo", skip_serializing_if = "Option::is_none")]
    pub video_id: Option<VideoId>,
}

/// One question of a quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "idPregunta", default)]
    pub id: QuestionId,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    /// 1-based position within the quiz
    #[serde(rename = "orden", default)]
    pub order: i32,
    #[serde(rename = "idQuiz")]
    pub quiz_id: QuizId,
}

impl Resource for Question {
    type Key = QuestionId;

    fn key(&self) -> QuestionId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewQuestion {
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "orden")]
    pub order: i32,
    #[serde(rename = "idQuiz")]
    pub quiz_id: QuizId,
}

impl NewQuestion {
    pub fn new(quiz_id: QuizId, order: i32, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            order,
            quiz_id,
        }
    }

    /// Check the fields the backend rejects, trimming the description
    ///
    /// # Errors
    ///
    /// Returns a user-facing message for the first invalid field
    pub fn validated(&self) -> Result<Self, &'static str> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err("Question description is required");
        }
        if self.quiz_id <= 0 {
            return Err("Invalid quiz ID");
        }
        if self.order <= 0 {
            return Err("Question order must be greater than 0");
        }
        Ok(Self {
            description: description.to_string(),
            ..self.clone()
        })
    }
}

/// Possible answer to a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "idRespuesta", default)]
    pub id: AnswerId,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "esCorrecta", default)]
    pub is_correct: bool,
    #[serde(rename = "orden", default)]
    pub order: i32,
    #[serde(rename = "idPregunta")]
    pub question_id: QuestionId,
}

impl Resource for Answer {
    type Key = AnswerId;

    fn key(&self) -> AnswerId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAnswer {
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "esCorrecta")]
    pub is_correct: bool,
    #[serde(rename = "orden")]
    pub order: i32,
    #[serde(rename = "idPregunta")]
    pub question_id: QuestionId,
}

/// Answer the user picked for one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAnswer {
    #[serde(rename = "idPregunta")]
    pub question_id: QuestionId,
    #[serde(rename = "idRespuestaSeleccionada")]
    pub answer_id: AnswerId,
    #[serde(rename = "esCorrecta")]
    pub is_correct: bool,
}

/// Outcome of one attempt at a quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    #[serde(rename = "idResultado", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "idQuiz")]
    pub quiz_id: QuizId,
    #[serde(rename = "idUsuario")]
    pub user_id: UserId,
    /// Percentage of correct answers, 0-100
    #[serde(rename = "puntuacion")]
    pub score: u8,
    #[serde(rename = "fechaRealizacion")]
    pub taken_at: String,
    #[serde(rename = "respuestasUsuario", default)]
    pub answers: Vec<UserAnswer>,
}

impl QuizResult {
    /// New result scored from `answers`, stamped with the current time
    pub fn new(quiz_id: QuizId, user_id: UserId, answers: Vec<UserAnswer>) -> Self {
        Self {
            id: None,
            quiz_id,
            user_id,
            score: score(&answers),
            taken_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            answers,
        }
    }
}

/// Rounded percentage of correct answers; 0 when nothing was answered
pub fn score(answers: &[UserAnswer]) -> u8 {
    let correct = answers.iter().filter(|a| a.is_correct).count();
    percentage(correct, answers.len())
}

pub(crate) fn percentage(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total);
    ((correct as f64 / total as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(is_correct: bool) -> UserAnswer {
        UserAnswer {
            question_id: 1,
            answer_id: 1,
            is_correct,
        }
    }

    #[test]
    fn test_score_rounds() {
        assert_eq!(score(&[answer(true), answer(false), answer(false)]), 33);
        assert_eq!(score(&[answer(true), answer(true), answer(false)]), 67);
        assert_eq!(score(&[answer(true)]), 100);
    }

    #[test]
    fn test_score_empty_is_zero() {
        assert_eq!(score(&[]), 0);
    }

    #[test]
    fn test_question_validation() {
        assert_eq!(
            NewQuestion::new(1, 1, "   ").validated(),
            Err("Question description is required")
        );
        assert_eq!(NewQuestion::new(0, 1, "Q").validated(), Err("Invalid quiz ID"));
        assert_eq!(
            NewQuestion::new(1, 0, "Q").validated(),
            Err("Question order must be greater than 0")
        );
        let ok = NewQuestion::new(3, 2, "  What is Rust?  ").validated().unwrap();
        assert_eq!(ok.description, "What is Rust?");
    }

    #[test]
    fn test_result_wire_names() {
        let result = QuizResult::new(4, 9, vec![answer(true)]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["idQuiz"], 4);
        assert_eq!(json["puntuacion"], 100);
        assert_eq!(json["respuestasUsuario"][0]["idRespuestaSeleccionada"], 1);
        assert!(json.get("idResultado").is_none());
    }
}
