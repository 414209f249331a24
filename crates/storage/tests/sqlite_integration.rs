use practice_core::model::{
    AttemptRecord, Difficulty, QuestionInstance, Report, SessionId, SkillId, TemplateId, UserId,
};
use practice_core::templates::Params;
use practice_core::time::fixed_now;
use storage::repository::{AttemptLog, ReportStore, SessionRegistry, StorageError};
use storage::sqlite::SqliteRepository;

fn question() -> QuestionInstance {
    QuestionInstance::new(
        TemplateId::new("decimals.place_value"),
        Difficulty::Easy,
        Params::new([3, 7, 2, 0]),
        "Which digit is in the tenths place of $3.72$?",
        "7",
        vec!["2".into(), "7".into(), "3".into(), "8".into()],
        "The tenths digit is $7$.",
    )
    .unwrap()
}

async fn repo(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_session_lifecycle() {
    let repo = repo("memdb_sessions").await;
    let user = UserId::new(7);
    let skill = SkillId::new(1054);

    let id = repo.create_session(user, skill).await.unwrap();
    let row = repo.session(id).await.unwrap();
    assert_eq!(row.user_id, user);
    assert_eq!(row.skill_id, skill);
    assert!(!row.is_finished());

    repo.finish_session(id).await.unwrap();
    assert!(repo.session(id).await.unwrap().is_finished());
    assert!(matches!(
        repo.finish_session(id).await,
        Err(StorageError::Conflict)
    ));
    assert!(matches!(
        repo.finish_session(SessionId::new(9_999)).await,
        Err(StorageError::NotFound)
    ));
}

#[tokio::test]
async fn sqlite_attempts_round_trip() {
    let repo = repo("memdb_attempts").await;
    let user = UserId::new(7);
    let skill = SkillId::new(1054);
    let session = repo.create_session(user, skill).await.unwrap();

    let q = question();
    repo.record_attempt(Some(session), &AttemptRecord::answered(user, skill, &q, "7", 12))
        .await
        .unwrap();
    repo.record_attempt(Some(session), &AttemptRecord::skipped(user, skill, &q, 3))
        .await
        .unwrap();
    // delivered after a failed session open
    repo.record_attempt(None, &AttemptRecord::answered(user, skill, &q, "2", 5))
        .await
        .unwrap();

    let rows = repo.attempts_in_session(session).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].is_correct);
    assert_eq!(rows[0].time_spent_seconds, 12);
    assert_eq!(rows[0].difficulty_level, "Easy");
    assert_eq!(rows[0].template_id.as_deref(), Some("decimals.place_value"));
    assert_eq!(rows[1].student_answer, "Skipped");
    assert!(!rows[1].is_correct);
}

#[tokio::test]
async fn sqlite_rejects_attempt_for_unknown_session() {
    let repo = repo("memdb_unknown_session").await;
    let q = question();
    let record = AttemptRecord::answered(UserId::new(1), SkillId::new(1054), &q, "7", 1);
    assert!(matches!(
        repo.record_attempt(Some(SessionId::new(42)), &record).await,
        Err(StorageError::NotFound)
    ));
}

#[tokio::test]
async fn sqlite_reports_listed_newest_first() {
    let repo = repo("memdb_reports").await;
    let skill = SkillId::new(1054);
    for (offset, correct) in [(0, 5), (1, 7)] {
        let report = Report::from_counts(
            Some(UserId::new(7)),
            skill,
            "Place Values of Decimals",
            10,
            correct,
            fixed_now() + chrono::Duration::minutes(offset),
            300,
        )
        .unwrap();
        repo.create_report(&report).await.unwrap();
    }

    let rows = repo.recent_reports(skill, 5).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].correct_answers, 7);
    assert!((rows[0].score - 70.0).abs() < f64::EPSILON);
    assert_eq!(rows[0].title, "Place Values of Decimals");
    assert_eq!(rows[1].time_taken_seconds, 300);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = repo("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");
}
