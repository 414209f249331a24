use async_trait::async_trait;
use chrono::SecondsFormat;
use practice_core::model::{AttemptRecord, REPORT_TYPE, Report, SessionId, SkillId, UserId};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storage::repository::{AttemptLog, ReportStore, SessionRegistry, StorageError};
use url::Url;

const SESSIONS_PATH: &str = "api/v1/practice-sessions";
const ATTEMPTS_PATH: &str = "api/v1/attempts";
const REPORTS_PATH: &str = "api/v1/reports";

/// Client for the remote practice service.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpBackend {
    #[must_use]
    pub fn new(mut base_url: Url, token: Option<String>) -> Self {
        // relative joins replace the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            client: Client::new(),
            base_url,
            token,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, StorageError> {
        self.base_url
            .join(path)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Value, StorageError> {
        let mut request = self.client.post(self.endpoint(path)?).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        decode_envelope(status, &text)
    }
}

//
// ─── ENVELOPE ──────────────────────────────────────────────────────────────────
//

/// Unwrap a response body.
///
/// The service either wraps payloads as `{ "success", "data", "error" }` or
/// returns the bare body. Error statuses carry a message in `detail` (a string
/// or a list of validation entries) or in `error.message`.
///
/// # Errors
///
/// Returns `StorageError::Rejected` for non-2xx statuses and for envelopes with
/// `success: false`, and `StorageError::Serialization` for malformed JSON.
pub fn decode_envelope(status: StatusCode, body: &str) -> Result<Value, StorageError> {
    let parsed = if body.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str::<Value>(body)
    };

    if status == StatusCode::UNAUTHORIZED {
        return Err(StorageError::Rejected {
            status: status.as_u16(),
            message: "unauthorized".into(),
        });
    }

    if !status.is_success() {
        let message = parsed
            .ok()
            .and_then(|json| error_message(&json))
            .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
        return Err(StorageError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    let json = parsed.map_err(|e| StorageError::Serialization(e.to_string()))?;
    match json.get("success").and_then(Value::as_bool) {
        Some(false) => Err(StorageError::Rejected {
            status: status.as_u16(),
            message: error_message(&json).unwrap_or_else(|| "request failed".into()),
        }),
        Some(true) => Ok(json.get("data").cloned().unwrap_or(Value::Null)),
        None => Ok(json),
    }
}

fn error_message(json: &Value) -> Option<String> {
    match json.get("detail") {
        Some(Value::String(detail)) => return Some(detail.clone()),
        Some(Value::Array(entries)) => {
            let joined = entries
                .iter()
                .map(validation_entry)
                .collect::<Vec<_>>()
                .join("; ");
            if !joined.is_empty() {
                return Some(joined);
            }
        }
        _ => {}
    }
    json.pointer("/error/message")
        .and_then(Value::as_str)
        .map(str::to_owned)
}

fn validation_entry(entry: &Value) -> String {
    let msg = entry.get("msg").and_then(Value::as_str).unwrap_or("invalid");
    let field = entry
        .get("loc")
        .and_then(Value::as_array)
        .and_then(|loc| loc.last())
        .map(|last| match last {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
    match field {
        Some(field) => format!("{field}: {msg}"),
        None => msg.to_owned(),
    }
}

//
// ─── PAYLOADS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct NewSessionPayload {
    user_id: u64,
    skill_id: u64,
}

#[derive(Debug, Deserialize)]
struct CreatedSession {
    #[serde(alias = "id")]
    session_id: u64,
}

#[derive(Debug, Serialize)]
struct AttemptPayload<'a> {
    user_id: u64,
    session_id: Option<u64>,
    skill_id: u64,
    template_id: Option<&'static str>,
    difficulty_level: &'static str,
    question_text: &'a str,
    correct_answer: &'a str,
    student_answer: &'a str,
    is_correct: bool,
    solution_text: &'a str,
    time_spent_seconds: u32,
}

impl<'a> AttemptPayload<'a> {
    fn new(session_id: Option<SessionId>, record: &'a AttemptRecord) -> Self {
        Self {
            user_id: record.user_id().value(),
            session_id: session_id.map(|id| id.value()),
            skill_id: record.skill_id().value(),
            template_id: record.template_id().map(|t| t.as_str()),
            difficulty_level: record.difficulty().as_str(),
            question_text: record.question_text(),
            correct_answer: record.correct_answer(),
            student_answer: record.student_answer(),
            is_correct: record.is_correct(),
            solution_text: record.solution_text(),
            time_spent_seconds: record.time_spent_seconds(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ReportPayload<'a> {
    title: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    score: f64,
    parameters: ReportParameters<'a>,
    user_id: Option<u64>,
}

#[derive(Debug, Serialize)]
struct ReportParameters<'a> {
    skill_id: u64,
    skill_name: &'a str,
    total_questions: u32,
    correct_answers: u32,
    timestamp: String,
    time_taken_seconds: u64,
}

impl<'a> ReportPayload<'a> {
    fn new(report: &'a Report) -> Self {
        Self {
            title: report.title(),
            kind: REPORT_TYPE,
            score: report.score(),
            parameters: ReportParameters {
                skill_id: report.skill_id().value(),
                skill_name: report.skill_name(),
                total_questions: report.total_questions(),
                correct_answers: report.correct_answers(),
                timestamp: report
                    .timestamp()
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
                time_taken_seconds: report.time_taken_seconds(),
            },
            user_id: report.user_id().map(|id| id.value()),
        }
    }
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

#[async_trait]
impl SessionRegistry for HttpBackend {
    async fn create_session(
        &self,
        user_id: UserId,
        skill_id: SkillId,
    ) -> Result<SessionId, StorageError> {
        let payload = NewSessionPayload {
            user_id: user_id.value(),
            skill_id: skill_id.value(),
        };
        let data = self.post(SESSIONS_PATH, &payload).await?;
        let created: CreatedSession =
            serde_json::from_value(data).map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(SessionId::new(created.session_id))
    }

    async fn finish_session(&self, session_id: SessionId) -> Result<(), StorageError> {
        let path = format!("{SESSIONS_PATH}/{session_id}/finish");
        self.post(&path, &serde_json::json!({})).await?;
        Ok(())
    }
}

#[async_trait]
impl AttemptLog for HttpBackend {
    async fn record_attempt(
        &self,
        session_id: Option<SessionId>,
        attempt: &AttemptRecord,
    ) -> Result<(), StorageError> {
        self.post(ATTEMPTS_PATH, &AttemptPayload::new(session_id, attempt))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ReportStore for HttpBackend {
    async fn create_report(&self, report: &Report) -> Result<(), StorageError> {
        self.post(REPORTS_PATH, &ReportPayload::new(report)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use practice_core::time::fixed_now;
    use serde_json::json;

    use super::*;

    fn rejected(result: Result<Value, StorageError>) -> (u16, String) {
        match result {
            Err(StorageError::Rejected { status, message }) => (status, message),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn success_envelope_yields_data() {
        let body = r#"{"success":true,"data":{"session_id":12}}"#;
        assert_eq!(
            decode_envelope(StatusCode::OK, body).unwrap(),
            json!({"session_id": 12})
        );
    }

    #[test]
    fn raw_body_passes_through() {
        let body = r#"{"session_id":3}"#;
        assert_eq!(
            decode_envelope(StatusCode::CREATED, body).unwrap(),
            json!({"session_id": 3})
        );
        assert_eq!(decode_envelope(StatusCode::NO_CONTENT, "").unwrap(), Value::Null);
    }

    #[test]
    fn failed_envelope_is_rejected() {
        let body = r#"{"success":false,"error":{"message":"skill not found"}}"#;
        assert_eq!(
            rejected(decode_envelope(StatusCode::OK, body)),
            (200, "skill not found".into())
        );
    }

    #[test]
    fn unauthorized_has_fixed_message() {
        let body = r#"{"detail":"token expired"}"#;
        assert_eq!(
            rejected(decode_envelope(StatusCode::UNAUTHORIZED, body)),
            (401, "unauthorized".into())
        );
    }

    #[test]
    fn error_detail_string_and_list() {
        assert_eq!(
            rejected(decode_envelope(
                StatusCode::NOT_FOUND,
                r#"{"detail":"session 9 not found"}"#
            )),
            (404, "session 9 not found".into())
        );

        let body = r#"{"detail":[
            {"loc":["body","skill_id"],"msg":"field required"},
            {"loc":["body",0],"msg":"bad item"}
        ]}"#;
        assert_eq!(
            rejected(decode_envelope(StatusCode::UNPROCESSABLE_ENTITY, body)).1,
            "skill_id: field required; 0: bad item"
        );
    }

    #[test]
    fn error_status_without_json_uses_status() {
        assert_eq!(
            rejected(decode_envelope(StatusCode::BAD_GATEWAY, "<html>oops</html>")),
            (502, "request failed with status 502".into())
        );
    }

    #[test]
    fn malformed_success_body_is_a_serialization_error() {
        assert!(matches!(
            decode_envelope(StatusCode::OK, "{not json"),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let backend = HttpBackend::new(Url::parse("https://example.com/school").unwrap(), None);
        assert_eq!(
            backend.endpoint(ATTEMPTS_PATH).unwrap().as_str(),
            "https://example.com/school/api/v1/attempts"
        );
    }

    #[test]
    fn report_payload_shape() {
        let report = Report::from_counts(
            Some(UserId::new(4)),
            SkillId::new(1054),
            "Place Values of Decimals",
            10,
            7,
            fixed_now(),
            180,
        )
        .unwrap();
        let value = serde_json::to_value(ReportPayload::new(&report)).unwrap();
        assert_eq!(value["type"], "practice");
        assert_eq!(value["title"], "Place Values of Decimals");
        assert_eq!(value["user_id"], 4);
        assert_eq!(value["parameters"]["total_questions"], 10);
        assert_eq!(value["parameters"]["timestamp"], "2023-11-14T22:13:20.000Z");
        assert_eq!(value["parameters"]["time_taken_seconds"], 180);
    }
}
