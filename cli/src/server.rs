#[cfg(feature = "server")]
pub mod http {
    use axum::{
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Json},
        routing::{get, post},
        Router,
    };
    use bayan::{BayanError, Engine, PredicateSummary, ResourceLimits, Response, Solution};
    use serde::{Deserialize, Serialize};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use tower_http::cors::CorsLayer;
    use tracing::{error, info};

    /// Source id and text of every program the server holds, in load order
    ///
    /// The engine is single-threaded, so requests rebuild one from these.
    pub type SharedPrograms = Arc<RwLock<Vec<(String, String)>>>;

    const DEFAULT_LIMIT: usize = 100;

    #[derive(Debug, Deserialize)]
    struct QueryRequest {
        /// Extra statements loaded for this request only
        #[serde(default)]
        code: Option<String>,
        query: String,
        #[serde(default)]
        limit: Option<usize>,
    }

    #[derive(Debug, Serialize)]
    struct QueryResponse {
        variables: Vec<String>,
        solutions: Vec<Solution>,
        /// More solutions exist beyond `limit`
        truncated: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    struct CodeRequest {
        code: String,
    }

    #[derive(Debug, Serialize)]
    struct FactsResponse {
        source_id: String,
        clauses: usize,
        warnings: Vec<String>,
    }

    #[derive(Debug, Serialize)]
    struct ErrorResponse {
        error: String,
    }

    type ApiError = (StatusCode, Json<ErrorResponse>);

    fn bad_request(context: &str, e: impl std::fmt::Display) -> ApiError {
        error!("{}: {}", context, e);
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("{}: {}", context, e),
            }),
        )
    }

    pub fn app(programs: SharedPrograms) -> Router {
        Router::new()
            .route("/health", get(health_check))
            .route("/predicates", get(list_predicates))
            .route("/query", post(query_post))
            .route("/run", post(run_post))
            .route("/facts", post(facts_post))
            .layer(CorsLayer::permissive())
            .with_state(programs)
    }

    pub async fn start_server(
        programs: Vec<(String, String)>,
        host: &str,
        port: u16,
    ) -> anyhow::Result<()> {
        let app = app(Arc::new(RwLock::new(programs)));

        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
        info!("Bayan server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    async fn health_check() -> impl IntoResponse {
        Json(serde_json::json!({
            "status": "ok",
            "service": "bayan",
            "version": env!("CARGO_PKG_VERSION")
        }))
    }

    async fn list_predicates(
        State(programs): State<SharedPrograms>,
    ) -> Result<Json<Vec<PredicateSummary>>, ApiError> {
        let programs = programs.read().await.clone();
        let summary = summarize(&programs).map_err(|e| bad_request("Failed to load programs", e))?;
        Ok(Json(summary))
    }

    async fn query_post(
        State(programs): State<SharedPrograms>,
        Json(payload): Json<QueryRequest>,
    ) -> Result<Json<QueryResponse>, ApiError> {
        if payload.query.trim().is_empty() {
            return Err(bad_request("Invalid request", "Query cannot be empty"));
        }
        let programs = programs.read().await.clone();
        let response = answer_query(&programs, &payload)?;
        info!(
            "Answered '{}' with {} solution(s)",
            payload.query,
            response.solutions.len()
        );
        Ok(Json(response))
    }

    async fn run_post(
        State(programs): State<SharedPrograms>,
        Json(payload): Json<CodeRequest>,
    ) -> Result<Json<Response>, ApiError> {
        if payload.code.trim().is_empty() {
            return Err(bad_request("Invalid request", "Code cannot be empty"));
        }
        let programs = programs.read().await.clone();
        let response = run_program(&programs, &payload.code)
            .map_err(|e| bad_request("Failed to run code", e))?;
        Ok(Json(response))
    }

    async fn facts_post(
        State(programs): State<SharedPrograms>,
        Json(payload): Json<CodeRequest>,
    ) -> Result<Json<FactsResponse>, ApiError> {
        if payload.code.trim().is_empty() {
            return Err(bad_request("Invalid request", "Code cannot be empty"));
        }
        let source_id = format!("inline_{}", chrono::Utc::now().timestamp_millis());

        let mut programs = programs.write().await;
        let (clauses, warnings) = check_program(&programs, &source_id, &payload.code)
            .map_err(|e| bad_request("Failed to add code", e))?;
        programs.push((source_id.clone(), payload.code));
        info!("Stored {} ({} clauses in total)", source_id, clauses);

        Ok(Json(FactsResponse {
            source_id,
            clauses,
            warnings,
        }))
    }

    fn build_engine(
        programs: &[(String, String)],
        extra: Option<(&str, &str)>,
    ) -> Result<(Engine, Option<Response>), BayanError> {
        let mut engine = Engine::with_limits(ResourceLimits::sandboxed());
        for (source_id, code) in programs {
            engine.load(code, source_id)?;
        }
        let response = match extra {
            Some((source_id, code)) => Some(engine.load(code, source_id)?),
            None => None,
        };
        Ok((engine, response))
    }

    fn summarize(programs: &[(String, String)]) -> Result<Vec<PredicateSummary>, BayanError> {
        let (engine, _) = build_engine(programs, None)?;
        Ok(engine.summary())
    }

    fn answer_query(
        programs: &[(String, String)],
        request: &QueryRequest,
    ) -> Result<QueryResponse, ApiError> {
        let extra = request.code.as_deref().map(|code| ("request", code));
        let (engine, _) =
            build_engine(programs, extra).map_err(|e| bad_request("Failed to load code", e))?;

        let mut solutions = engine
            .run_query(&request.query)
            .map_err(|e| bad_request("Failed to parse query", e))?;
        let variables = solutions.variables().to_vec();
        let limit = request.limit.unwrap_or(DEFAULT_LIMIT);

        // One extra solution tells whether the answer was cut off
        let mut found: Vec<Solution> = solutions
            .by_ref()
            .take(limit.saturating_add(1))
            .collect();
        let truncated = found.len() > limit;
        found.truncate(limit);

        Ok(QueryResponse {
            variables,
            solutions: found,
            truncated,
            error: solutions.error().map(|e| e.to_string()),
        })
    }

    fn run_program(programs: &[(String, String)], code: &str) -> Result<Response, BayanError> {
        let (_, response) = build_engine(programs, Some(("request", code)))?;
        response.ok_or_else(|| BayanError::Engine("No response for request code".to_string()))
    }

    fn check_program(
        programs: &[(String, String)],
        source_id: &str,
        code: &str,
    ) -> Result<(usize, Vec<String>), BayanError> {
        let (engine, response) = build_engine(programs, Some((source_id, code)))?;
        let warnings = response.map(|r| r.warnings).unwrap_or_default();
        let clauses = engine.knowledge_base().len();
        Ok((clauses, warnings))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        fn family() -> SharedPrograms {
            Arc::new(RwLock::new(vec![(
                "family.bayan".to_string(),
                r#"
                fact parent("Ahmed", "Ali");
                fact parent("Ahmed", "Sara");
                fact parent("Ali", "Zain");
                rule grandparent(?X, ?Z) :- parent(?X, ?Y), parent(?Y, ?Z);
                "#
                .to_string(),
            )]))
        }

        async fn post(
            app: Router,
            uri: &str,
            body: serde_json::Value,
        ) -> (StatusCode, serde_json::Value) {
            let response = app
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri(uri)
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.to_string()))
                        .unwrap(),
                )
                .await
                .unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
                .await
                .unwrap();
            (status, serde_json::from_slice(&bytes).unwrap())
        }

        #[tokio::test]
        async fn test_health_check() {
            let response = app(family())
                .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
        }

        #[tokio::test]
        async fn test_predicates_summary() {
            let response = app(family())
                .oneshot(Request::builder().uri("/predicates").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
                .await
                .unwrap();
            let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            let names: Vec<&str> = json
                .as_array()
                .unwrap()
                .iter()
                .filter_map(|p| p["name"].as_str())
                .collect();
            assert!(names.contains(&"parent"));
            assert!(names.contains(&"grandparent"));
        }

        #[tokio::test]
        async fn test_query_against_stored_programs() {
            let (status, json) = post(
                app(family()),
                "/query",
                serde_json::json!({ "query": "grandparent(\"Ahmed\", ?Who)" }),
            )
            .await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["variables"], serde_json::json!(["Who"]));
            assert_eq!(json["solutions"], serde_json::json!([{ "Who": "Zain" }]));
            assert_eq!(json["truncated"], false);
        }

        #[tokio::test]
        async fn test_query_limit_reports_truncation() {
            let (status, json) = post(
                app(family()),
                "/query",
                serde_json::json!({ "query": "parent(?X, ?Y)", "limit": 2 }),
            )
            .await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["solutions"].as_array().unwrap().len(), 2);
            assert_eq!(json["truncated"], true);
        }

        #[tokio::test]
        async fn test_query_limit_at_maximum() {
            let (status, json) = post(
                app(family()),
                "/query",
                serde_json::json!({ "query": "parent(?X, ?Y)", "limit": usize::MAX }),
            )
            .await;

            assert_eq!(status, StatusCode::OK);
            assert!(!json["solutions"].as_array().unwrap().is_empty());
            assert_eq!(json["truncated"], false);
        }

        #[tokio::test]
        async fn test_query_with_request_code() {
            let (status, json) = post(
                app(family()),
                "/query",
                serde_json::json!({
                    "code": "fact parent(\"Zain\", \"Huda\");",
                    "query": "grandparent(\"Ali\", ?Who)"
                }),
            )
            .await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["solutions"], serde_json::json!([{ "Who": "Huda" }]));
        }

        #[tokio::test]
        async fn test_invalid_query_is_bad_request() {
            let (status, json) = post(
                app(family()),
                "/query",
                serde_json::json!({ "query": "parent(?X" }),
            )
            .await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(json["error"].as_str().unwrap().contains("Failed to parse query"));
        }

        #[tokio::test]
        async fn test_run_returns_query_results() {
            let (status, json) = post(
                app(family()),
                "/run",
                serde_json::json!({ "code": "query parent(\"Ahmed\", ?C);" }),
            )
            .await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["results"][0]["solutions"].as_array().unwrap().len(), 2);
        }

        #[tokio::test]
        async fn test_facts_are_stored_for_later_requests() {
            let programs = family();

            let (status, json) = post(
                app(programs.clone()),
                "/facts",
                serde_json::json!({ "code": "حقيقة parent(\"Sara\", \"Omar\");" }),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["clauses"], 5);
            assert_eq!(programs.read().await.len(), 2);

            let (_, json) = post(
                app(programs),
                "/query",
                serde_json::json!({ "query": "grandparent(\"Ahmed\", ?Who)" }),
            )
            .await;
            assert_eq!(json["solutions"].as_array().unwrap().len(), 2);
        }

        #[tokio::test]
        async fn test_rejected_facts_are_not_stored() {
            let programs = family();

            let (status, _) = post(
                app(programs.clone()),
                "/facts",
                serde_json::json!({ "code": "fact member(1, 2);" }),
            )
            .await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(programs.read().await.len(), 1);
        }
    }
}

#[cfg(not(feature = "server"))]
pub mod http {
    pub async fn start_server(
        _programs: Vec<(String, String)>,
        _host: &str,
        _port: u16,
    ) -> anyhow::Result<()> {
        anyhow::bail!("Server feature not enabled. Recompile with --features server")
    }
}
