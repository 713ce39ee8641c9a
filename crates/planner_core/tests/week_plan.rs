use planner_core::db::migrations::latest_version;
use planner_core::db::{open_db, open_db_in_memory, DbError};
use planner_core::{
    Lesson, LessonMap, LessonPlanRepository, SqliteLessonPlanRepository, TenantId, WeekPlan,
    WeekPlanError, WeekPlanService,
};
use rusqlite::{params, Connection};

fn tenant(name: &str) -> TenantId {
    TenantId::new(name).unwrap()
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(schema_version(&conn), latest_version());

    let exists: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'lesson_slots';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}

#[test]
fn reopening_a_database_file_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("lesson_plan.sqlite3");

    drop(open_db(&path).unwrap());
    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn newer_schema_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 99;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(
        err.to_string().starts_with("lesson plan schema v99"),
        "unexpected message: {err}"
    );
    match err {
        DbError::PlanSchemaTooNew { found, supported } => {
            assert_eq!(found, 99);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn blocked_plan_directory_is_reported_as_plan_directory_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("data");
    std::fs::write(&blocker, "not a directory").unwrap();

    let err = open_db(blocker.join("lesson_plan.sqlite3")).unwrap_err();
    assert!(matches!(err, DbError::PlanDirectory { ref path, .. } if path == &blocker));
    assert!(err.to_string().contains("lesson plan directory"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn save_replaces_one_tenant_and_keeps_others() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteLessonPlanRepository::new(&conn);

    let mut alex = LessonMap::new();
    alex.insert(1, Lesson::Math);
    alex.insert(2, Lesson::German);
    let mut alexander = LessonMap::new();
    alexander.insert(1, Lesson::Art);

    repo.save_lessons(&tenant("alex"), &alex).unwrap();
    repo.save_lessons(&tenant("alexander"), &alexander).unwrap();

    let mut replacement = LessonMap::new();
    replacement.insert(5, Lesson::Physics);
    replacement.insert(6, Lesson::None);
    repo.save_lessons(&tenant("ALEX"), &replacement).unwrap();

    let loaded = repo.load_lessons(&tenant("alex")).unwrap();
    assert_eq!(loaded.into_iter().collect::<Vec<_>>(), vec![(5, Lesson::Physics)]);
    assert_eq!(repo.load_lessons(&tenant("alexander")).unwrap(), alexander);
}

#[test]
fn unknown_stored_lesson_is_reported() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO lesson_slots (username, slot, lesson) VALUES (?1, ?2, ?3);",
        params!["alex", 1, "alchemy"],
    )
    .unwrap();

    let repo = SqliteLessonPlanRepository::new(&conn);
    let err = repo.load_lessons(&tenant("alex")).unwrap_err();
    assert!(err.to_string().contains("alchemy"));
}

#[test]
fn service_round_trips_a_week_plan() {
    let conn = open_db_in_memory().unwrap();
    let service = WeekPlanService::new(SqliteLessonPlanRepository::new(&conn));
    let mia = tenant("mia");

    let mut plan = service.load(&mia).unwrap();
    assert_eq!(plan, WeekPlan::default());
    assert_eq!(plan.lesson_at(1), Lesson::None);

    service.assign(&mut plan, 1, Lesson::Math).unwrap();
    service.assign(&mut plan, 18, Lesson::Sports).unwrap();
    service.assign(&mut plan, 7, Lesson::Music).unwrap();
    service.assign(&mut plan, 7, Lesson::None).unwrap();
    service.save(&mia, &plan).unwrap();

    let reloaded = service.load(&mia).unwrap();
    assert_eq!(
        reloaded.assigned().collect::<Vec<_>>(),
        vec![(1, Lesson::Math), (18, Lesson::Sports)]
    );
    assert_eq!(reloaded.lesson_at(7), Lesson::None);
}

#[test]
fn service_rejects_slots_outside_the_grid() {
    let conn = open_db_in_memory().unwrap();
    let service = WeekPlanService::new(SqliteLessonPlanRepository::new(&conn));
    let mut plan = WeekPlan::default();

    for slot in [0, 19] {
        let err = service.assign(&mut plan, slot, Lesson::Math).unwrap_err();
        assert!(matches!(
            err,
            WeekPlanError::SlotOutOfRange { slot: s, slot_count: 18 } if s == slot
        ));
    }
}

#[test]
fn service_load_ignores_slots_beyond_the_grid() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteLessonPlanRepository::new(&conn);
    let mut stored = LessonMap::new();
    stored.insert(2, Lesson::Latin);
    stored.insert(40, Lesson::Ethics);
    repo.save_lessons(&tenant("alex"), &stored).unwrap();

    let service = WeekPlanService::new(repo);
    let plan = service.load(&tenant("alex")).unwrap();
    assert_eq!(plan.assigned().collect::<Vec<_>>(), vec![(2, Lesson::Latin)]);
}
