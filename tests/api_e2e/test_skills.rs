//! Job record skill sets.

use actix_web::test;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{Value, json};

use job_catalog_lib::db::{catalog, job_records};
use job_catalog_lib::entity::job_record_skill;

use super::test_helpers::*;

fn skill_ids(body: &Value) -> Vec<i64> {
    body["skills"]
        .as_array()
        .expect("skills is not an array")
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect()
}

async fn seed_skills(pool: &job_catalog_lib::db::DbPool) -> (i32, i32) {
    let conn = pool.connection();
    let python = catalog::insert_skill(conn, "Python").await.unwrap().id;
    let sql = catalog::insert_skill(conn, "SQL").await.unwrap().id;
    (python, sql)
}

async fn link_count(pool: &job_catalog_lib::db::DbPool, job_id: i32) -> u64 {
    job_record_skill::Entity::find()
        .filter(job_record_skill::Column::JobRecordId.eq(job_id))
        .count(pool.connection())
        .await
        .unwrap()
}

#[actix_rt::test]
async fn test_skills_are_stored_and_returned_by_id() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let (python, sql) = seed_skills(&pool).await;
    let app = create_test_app(&pool).await;

    let mut payload = job_json(cat.titles[0], 2024, cat.us, "120000.00");
    payload["skills"] = json!([sql, python]);
    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(&payload)
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 201, "create failed: {}", body);
    assert_eq!(skill_ids(&body), vec![i64::from(python), i64::from(sql)]);
    assert_eq!(body["skills"][0]["name"], "Python");

    let id = body["id"].as_i64().unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/api/jobs/{}", id))
        .to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(skill_ids(&body), vec![i64::from(python), i64::from(sql)]);

    let detail = job_records::find_detail(pool.connection(), id as i32)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        detail.skills.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
        vec!["Python", "SQL"]
    );
}

#[actix_rt::test]
async fn test_repeated_skill_ids_collapse() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let (python, _) = seed_skills(&pool).await;
    let app = create_test_app(&pool).await;

    let mut payload = job_json(cat.titles[0], 2024, cat.us, "120000.00");
    payload["skills"] = json!([python, python]);
    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(&payload)
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 201, "create failed: {}", body);
    assert_eq!(skill_ids(&body), vec![i64::from(python)]);
    assert_eq!(link_count(&pool, body["id"].as_i64().unwrap() as i32).await, 1);
}

#[actix_rt::test]
async fn test_unknown_skill_is_field_error_and_nothing_is_written() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let (python, _) = seed_skills(&pool).await;
    let app = create_test_app(&pool).await;

    let mut payload = job_json(cat.titles[0], 2024, cat.us, "120000.00");
    payload["skills"] = json!([python, 9999]);
    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(&payload)
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["fields"]["skills"].is_array());

    let req = test::TestRequest::get().uri("/api/jobs").to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["total_count"], 0);
    let links = job_record_skill::Entity::find()
        .count(pool.connection())
        .await
        .unwrap();
    assert_eq!(links, 0);
}

#[actix_rt::test]
async fn test_failed_update_keeps_previous_skill_set() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let (python, sql) = seed_skills(&pool).await;
    let mut input = job_input(cat.titles[1], 2024, cat.us, 90_000);
    input.skills = vec![python, sql];
    let job = seed_job(&pool, input).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::patch()
        .uri(&format!("/api/jobs/{}", job.id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(json!({ "skills": [sql, 9999], "remote_ratio": 100 }))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 400);

    let req = test::TestRequest::get()
        .uri(&format!("/api/jobs/{}", job.id))
        .to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(skill_ids(&body), vec![i64::from(python), i64::from(sql)]);
    assert_eq!(body["remote_ratio"], 0);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/jobs/{}", job.id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(json!({ "skills": [sql] }))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200, "patch failed: {}", body);
    assert_eq!(skill_ids(&body), vec![i64::from(sql)]);
}

#[actix_rt::test]
async fn test_deleted_skill_is_removed_from_skill_sets() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let (python, sql) = seed_skills(&pool).await;
    let mut input = job_input(cat.titles[0], 2024, cat.us, 100_000);
    input.skills = vec![python, sql];
    let job = seed_job(&pool, input).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/skill/{}", python))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 204);

    let req = test::TestRequest::get()
        .uri(&format!("/api/jobs/{}", job.id))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(skill_ids(&body), vec![i64::from(sql)]);
    assert_eq!(link_count(&pool, job.id).await, 1);

    assert!(pool.delete_skill(sql).await.unwrap());
    assert!(!pool.delete_skill(sql).await.unwrap());
    assert_eq!(link_count(&pool, job.id).await, 0);
}

#[actix_rt::test]
async fn test_deleted_job_drops_its_skill_links() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let (python, sql) = seed_skills(&pool).await;
    let mut input = job_input(cat.titles[0], 2024, cat.us, 100_000);
    input.skills = vec![python, sql];
    let doomed = seed_job(&pool, input).await;
    let mut input = job_input(cat.titles[0], 2023, cat.us, 95_000);
    input.skills = vec![sql];
    let kept = seed_job(&pool, input).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/jobs/{}", doomed.id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 204);

    assert_eq!(link_count(&pool, doomed.id).await, 0);
    assert_eq!(link_count(&pool, kept.id).await, 1);
    // Skills themselves survive
    assert!(catalog::find_skill(pool.connection(), python).await.unwrap().is_some());
}
