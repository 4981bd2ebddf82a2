#[cfg(test)]
mod advisor_api_tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::api::{app_state::AppState, create_router};
    use crate::models::course::Program;
    use crate::models::plan::ProgramInfo;
    use crate::services::advisor::create_advisor_service;
    use crate::services::catalog::CourseCatalog;
    use crate::services::parser::CurriculumParser;
    use crate::services::registry::KnowledgeAreaRegistry;

    const AI_SOURCE: &str = "\
ОП Искусственный интеллект
1 семестр
Обязательные дисциплины
1Машинное обучение 6 216
Пул выборных дисциплин
2Алгебра 3108
3Python 3108
";

    fn app() -> Router {
        let registry = Arc::new(
            KnowledgeAreaRegistry::load(&json!({
                "math": ["алгебра"],
                "programming": ["python"],
            }))
            .unwrap(),
        );
        let catalog = Arc::new(CourseCatalog::new(
            Arc::clone(&registry),
            CurriculumParser::default(),
        ));
        let info = ProgramInfo {
            program: Program::Ai,
            title: "AI".to_string(),
            duration_semesters: 2,
            elective_budgets: BTreeMap::from([(1, 3), (2, 0)]),
        };
        catalog.load(&info, AI_SOURCE).unwrap();

        let advisor = create_advisor_service(registry, catalog, BTreeMap::from([(Program::Ai, info)]));
        create_router(AppState::new(advisor))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_programs() {
        let (status, body) = send(app(), get("/api/v1/programs")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["programs"][0]["program"], "ai");
        assert_eq!(body["programs"][0]["course_count"], 3);
    }

    #[tokio::test]
    async fn test_list_courses_with_filter() {
        let (status, body) = send(
            app(),
            get("/api/v1/programs/ai/courses?semester=1&kind=elective"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["courses"][0]["name"], "Алгебра");
        assert_eq!(body["courses"][0]["workload_hours"], 108);
    }

    #[tokio::test]
    async fn test_unknown_program_returns_404() {
        let (status, body) = send(app(), get("/api/v1/programs/design/courses")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, _) = send(app(), get("/api/v1/programs/ai_product/courses")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bad_kind_returns_400() {
        let (status, body) = send(app(), get("/api/v1/programs/ai/courses?kind=optional")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_knowledge_areas_rating_order() {
        let (status, body) = send(app(), get("/api/v1/knowledge-areas")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rating_order"], json!(["math", "programming"]));
    }

    #[tokio::test]
    async fn test_create_plan_with_scores() {
        let (status, body) = send(
            app(),
            post_json(
                "/api/v1/plans",
                json!({"program": "ai", "scores": {"math": 1, "programming": 4}}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        let electives = &body["plan"]["sections"][0]["electives"];
        assert_eq!(electives.as_array().unwrap().len(), 1);
        assert_eq!(electives[0]["name"], "Алгебра");
        assert!(body["text"].as_str().unwrap().contains("Semester 1: 3/3"));
    }

    #[tokio::test]
    async fn test_create_plan_with_ratings() {
        let (status, body) = send(
            app(),
            post_json(
                "/api/v1/plans",
                json!({"program": "ai", "ratings": [4, 1], "strategy": "broaden"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["plan"]["sections"][0]["electives"][0]["name"], "Python");
    }

    #[tokio::test]
    async fn test_incomplete_profile_returns_422() {
        let (status, body) = send(
            app(),
            post_json("/api/v1/plans", json!({"program": "ai", "scores": {"math": 1}})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "PROFILE_INCOMPLETE");
        assert_eq!(body["details"], "programming");
    }

    #[tokio::test]
    async fn test_invalid_ratings_return_400() {
        let (status, _) = send(
            app(),
            post_json("/api/v1/plans", json!({"program": "ai", "ratings": [1]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            app(),
            post_json(
                "/api/v1/plans",
                json!({"program": "ai", "scores": {"math": 9, "programming": 1}}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(app(), post_json("/api/v1/plans", json!({"program": "ai"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reload_curriculum() {
        let app = app();
        let request = Request::builder()
            .method("PUT")
            .uri("/api/v1/programs/ai/curriculum")
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(Body::from("1 семестр\nВыборные\n1Статистика\n2Python 3\n"))
            .unwrap();
        let (status, body) = send(app.clone(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["warnings"][0]["kind"], "missing_credits");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);

        let (_, body) = send(app, get("/api/v1/programs")).await;
        assert_eq!(body["programs"][0]["course_count"], 2);
        assert_eq!(body["programs"][0]["catalog_version"], 2);
    }

    #[tokio::test]
    async fn test_reload_unstructured_text_returns_422() {
        let request = Request::builder()
            .method("PUT")
            .uri("/api/v1/programs/ai/curriculum")
            .body(Body::from("нет структуры"))
            .unwrap();
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "PARSE_ERROR");
    }
}
