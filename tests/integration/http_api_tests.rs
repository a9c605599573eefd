//! HTTP API tests
//!
//! Drives the full actix application: routing, guards, throttling, cookies
//! and the JSON error mapping.

#[cfg(test)]
mod tests {
    use crate::common::database::database_storage;
    use crate::common::fixtures::{
        AccountFactory, PASSWORD, REFRESH_SECRET, RecordingNotifier, RegistrationFactory, SentMail,
        test_config, throttled_config,
    };
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::{test, web};
    use serde_json::{Value, json};
    use sociapp::Config;
    use sociapp::auth::jwt::{Claims, TokenType};
    use sociapp::models::Account;
    use sociapp::server::{AppState, HttpServer};
    use sociapp::storage::StorageLayer;
    use std::sync::Arc;
    use uuid::Uuid;

    /// Status, JSON body and cookies of one call
    struct TestResponse {
        status: StatusCode,
        body: Value,
        cookies: Vec<Cookie<'static>>,
    }

    impl TestResponse {
        fn new(status: StatusCode, bytes: &[u8], cookies: Vec<Cookie<'static>>) -> Self {
            Self {
                status,
                body: serde_json::from_slice(bytes).unwrap_or(Value::Null),
                cookies,
            }
        }

        fn cookie(&self, name: &str) -> Option<&Cookie<'static>> {
            self.cookies.iter().find(|c| c.name() == name)
        }

        fn error_message(&self) -> &str {
            self.body["error"]["message"].as_str().unwrap_or_default()
        }
    }

    // Middleware rejections surface as `Err`; render them the way the server does.
    macro_rules! send {
        ($app:expr, $req:expr) => {{
            match test::try_call_service(&$app, $req.to_request()).await {
                Ok(resp) => {
                    let status = resp.status();
                    let cookies: Vec<Cookie<'static>> =
                        resp.response().cookies().map(|c| c.into_owned()).collect();
                    let bytes = test::read_body(resp).await;
                    TestResponse::new(status, &bytes, cookies)
                }
                Err(err) => {
                    let resp = err.error_response();
                    let status = resp.status();
                    let bytes = actix_web::body::to_bytes(resp.into_body())
                        .await
                        .unwrap_or_default();
                    TestResponse::new(status, &bytes, Vec::new())
                }
            }
        }};
    }

    struct TestApp {
        state: AppState,
        notifier: Arc<RecordingNotifier>,
    }

    fn build(config: Config, storage: StorageLayer) -> TestApp {
        let notifier = Arc::new(RecordingNotifier::new());
        let state = AppState::new(config, storage, notifier.clone()).expect("valid state");
        TestApp { state, notifier }
    }

    fn memory_app() -> TestApp {
        build(test_config(), StorageLayer::in_memory())
    }

    impl TestApp {
        async fn seed(&self, account: &Account) -> String {
            self.state.store.create_account(account).await.unwrap();
            self.state
                .session
                .generate_tokens(account)
                .unwrap()
                .access_token
        }

        async fn pending_code(&self, email: &str) -> String {
            self.state
                .store
                .find_account_by_email(email)
                .await
                .unwrap()
                .and_then(|a| a.verification_code)
                .expect("pending code")
        }
    }

    fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
        (AUTHORIZATION, format!("Bearer {}", token))
    }

    fn with_category(email: &str, category: &str) -> Account {
        let mut account = AccountFactory::verified(email);
        account.category = category.to_string();
        account
    }

    #[actix_web::test]
    async fn test_full_session_flow() {
        let t = build(test_config(), database_storage().await);
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;
        let email = "flow@example.org";

        let resp = send!(
            app,
            test::TestRequest::post()
                .uri("/auth/register")
                .set_json(RegistrationFactory::json(email, "socio"))
        );
        assert_eq!(resp.status, StatusCode::CREATED);
        assert!(resp.body["message"].is_string());
        assert!(resp.cookie("refresh_token").is_none());

        let resp = send!(
            app,
            test::TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({"email": email, "password": PASSWORD}))
        );
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

        let code = t.pending_code(email).await;
        let resp = send!(
            app,
            test::TestRequest::post()
                .uri("/auth/verify-email")
                .set_json(json!({"email": email, "code": code}))
        );
        assert_eq!(resp.status, StatusCode::OK);
        let access = resp.body["access_token"].as_str().unwrap().to_string();
        let cookie = resp.cookie("refresh_token").expect("refresh cookie").clone();
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/auth/refresh"));

        let resp = send!(
            app,
            test::TestRequest::get()
                .uri("/auth/me")
                .insert_header(bearer(&access))
        );
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["email"], email);
        assert_eq!(resp.body["is_verified"], true);
        assert!(resp.body.get("password_hash").is_none());
        assert!(resp.body.get("verification_code").is_none());

        let resp = send!(
            app,
            test::TestRequest::post().uri("/auth/refresh").cookie(cookie)
        );
        assert_eq!(resp.status, StatusCode::OK);
        assert!(resp.body["access_token"].is_string());
        assert!(resp.cookie("refresh_token").is_some());

        let resp = send!(
            app,
            test::TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({"email": email, "password": PASSWORD}))
        );
        assert_eq!(resp.status, StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_verify_twice_returns_message() {
        let t = memory_app();
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;
        t.seed(&AccountFactory::verified("done@example.org")).await;

        let resp = send!(
            app,
            test::TestRequest::post()
                .uri("/auth/verify-email")
                .set_json(json!({"email": "done@example.org", "code": "000000"}))
        );

        assert_eq!(resp.status, StatusCode::OK);
        assert!(resp.body["message"].is_string());
        assert!(resp.body.get("access_token").is_none());
    }

    #[actix_web::test]
    async fn test_duplicate_registration_is_conflict() {
        let t = memory_app();
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;
        let body = RegistrationFactory::json("twice@example.org", "socio");

        let first = send!(
            app,
            test::TestRequest::post()
                .uri("/auth/register")
                .set_json(body.clone())
        );
        assert_eq!(first.status, StatusCode::CREATED);

        let second = send!(
            app,
            test::TestRequest::post().uri("/auth/register").set_json(body)
        );
        assert_eq!(second.status, StatusCode::CONFLICT);
        assert_eq!(second.body["error"]["code"], "CONFLICT");
        assert_eq!(second.error_message(), "Email already exists");
    }

    #[actix_web::test]
    async fn test_register_rejects_bad_input() {
        let t = memory_app();
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;

        let resp = send!(
            app,
            test::TestRequest::post()
                .uri("/auth/register")
                .set_json(RegistrationFactory::json("not-an-email", "socio"))
        );
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);

        let resp = send!(
            app,
            test::TestRequest::post()
                .uri("/auth/register")
                .set_json(json!({"email": "x@example.org"}))
        );
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.body["error"]["code"], "BAD_REQUEST");
    }

    #[actix_web::test]
    async fn test_login_failures_share_message() {
        let t = memory_app();
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;
        let registered = send!(
            app,
            test::TestRequest::post()
                .uri("/auth/register")
                .set_json(RegistrationFactory::json("real@example.org", "socio"))
        );
        assert_eq!(registered.status, StatusCode::CREATED);
        let code = t.pending_code("real@example.org").await;
        let verified = send!(
            app,
            test::TestRequest::post()
                .uri("/auth/verify-email")
                .set_json(json!({"email": "real@example.org", "code": code}))
        );
        assert_eq!(verified.status, StatusCode::OK);

        let unknown = send!(
            app,
            test::TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({"email": "nobody@example.org", "password": PASSWORD}))
        );
        let wrong = send!(
            app,
            test::TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({"email": "real@example.org", "password": "wrong"}))
        );

        assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.error_message(), wrong.error_message());
    }

    #[actix_web::test]
    async fn test_refresh_requires_cookie() {
        let t = memory_app();
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;

        let resp = send!(app, test::TestRequest::post().uri("/auth/refresh"));
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
        assert_eq!(resp.error_message(), "No refresh token provided");

        let resp = send!(
            app,
            test::TestRequest::post()
                .uri("/auth/refresh")
                .cookie(Cookie::new("refresh_token", "garbage"))
        );
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
        assert_eq!(resp.error_message(), "Invalid refresh token");
    }

    #[actix_web::test]
    async fn test_access_token_cannot_refresh() {
        let t = memory_app();
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;
        let access = t.seed(&AccountFactory::verified("mix@example.org")).await;

        let resp = send!(
            app,
            test::TestRequest::post()
                .uri("/auth/refresh")
                .cookie(Cookie::new("refresh_token", access))
        );
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_expired_refresh_cookie_is_rejected() {
        let t = memory_app();
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;
        let account = AccountFactory::verified("stale@example.org");
        t.seed(&account).await;

        let now = chrono::Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: account.id,
            email: account.email.clone(),
            iat: now - 7200,
            exp: now - 3600,
            iss: "sociapp".to_string(),
            aud: TokenType::Refresh.audience().to_string(),
            token_type: TokenType::Refresh,
        };
        let expired = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(REFRESH_SECRET.as_bytes()),
        )
        .unwrap();

        let resp = send!(
            app,
            test::TestRequest::post()
                .uri("/auth/refresh")
                .cookie(Cookie::new("refresh_token", expired))
        );
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
        assert_eq!(resp.error_message(), "Invalid refresh token");
        assert!(resp.cookie("refresh_token").is_none());
    }

    #[actix_web::test]
    async fn test_logout_clears_cookie() {
        let t = memory_app();
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;

        let resp = send!(app, test::TestRequest::post().uri("/auth/logout"));

        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["message"], "Logged out successfully");
        let cookie = resp.cookie("refresh_token").expect("removal cookie");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.path(), Some("/auth/refresh"));
    }

    #[actix_web::test]
    async fn test_me_requires_valid_bearer() {
        let t = memory_app();
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;

        let missing = send!(app, test::TestRequest::get().uri("/auth/me"));
        assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
        assert_eq!(missing.error_message(), "Invalid or expired token");

        let garbage = send!(
            app,
            test::TestRequest::get()
                .uri("/auth/me")
                .insert_header(bearer("not.a.jwt"))
        );
        assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);

        // Valid token whose subject no longer exists
        let account = AccountFactory::verified("deleted@example.org");
        let access = t.seed(&account).await;
        t.state.store.delete_account(account.id).await.unwrap();
        let orphan = send!(
            app,
            test::TestRequest::get()
                .uri("/auth/me")
                .insert_header(bearer(&access))
        );
        assert_eq!(orphan.status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_users_require_admin() {
        let t = memory_app();
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;
        let member = t.seed(&AccountFactory::verified("m@example.org")).await;
        let admin = t.seed(&with_category("boss@example.org", "Administrador")).await;

        let anonymous = send!(app, test::TestRequest::get().uri("/users"));
        assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

        let forbidden = send!(
            app,
            test::TestRequest::get()
                .uri("/users")
                .insert_header(bearer(&member))
        );
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
        assert_eq!(forbidden.error_message(), "Insufficient permissions");

        let listed = send!(
            app,
            test::TestRequest::get()
                .uri("/users")
                .insert_header(bearer(&admin))
        );
        assert_eq!(listed.status, StatusCode::OK);
        assert_eq!(listed.body["success"], true);
        let users = listed.body["data"]["users"].as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| u.get("password_hash").is_none()));
    }

    #[actix_web::test]
    async fn test_delete_user() {
        let t = memory_app();
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;
        let admin = t.seed(&with_category("root@example.org", "admin")).await;
        let target = AccountFactory::verified("target@example.org");
        t.seed(&target).await;

        let missing = send!(
            app,
            test::TestRequest::delete()
                .uri(&format!("/users/{}", Uuid::new_v4()))
                .insert_header(bearer(&admin))
        );
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let deleted = send!(
            app,
            test::TestRequest::delete()
                .uri(&format!("/users/{}", target.id))
                .insert_header(bearer(&admin))
        );
        assert_eq!(deleted.status, StatusCode::OK);
        assert!(
            t.state
                .store
                .find_account_by_id(target.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[actix_web::test]
    async fn test_mail_send_allows_monitor() {
        let t = memory_app();
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;
        let monitor = t.seed(&with_category("mon@example.org", "monitor")).await;
        let member = t.seed(&AccountFactory::verified("plain@example.org")).await;
        let body = json!({"to": "someone@example.org", "subject": "Asamblea", "message": "Hola\nadiós"});

        let forbidden = send!(
            app,
            test::TestRequest::post()
                .uri("/mail/send")
                .insert_header(bearer(&member))
                .set_json(body.clone())
        );
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

        let sent = send!(
            app,
            test::TestRequest::post()
                .uri("/mail/send")
                .insert_header(bearer(&monitor))
                .set_json(body)
        );
        assert_eq!(sent.status, StatusCode::OK);
        assert_eq!(sent.body["success"], true);
        assert_eq!(
            t.notifier.sent(),
            vec![SentMail::Message {
                recipients: vec!["someone@example.org".to_string()],
                subject: "Asamblea".to_string(),
            }]
        );

        // Broadcast is admin only
        let broadcast = send!(
            app,
            test::TestRequest::post()
                .uri("/mail/send-all")
                .insert_header(bearer(&monitor))
                .set_json(json!({"subject": "s", "message": "m"}))
        );
        assert_eq!(broadcast.status, StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_mail_send_all() {
        let t = memory_app();
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;
        let mut admin_account = with_category("admin@example.org", "admin");
        admin_account.profile.membership = sociapp::models::Membership::NoSocio;
        let admin = t.seed(&admin_account).await;
        let body = json!({"subject": "Cuotas", "message": "Recordatorio"});

        let empty = send!(
            app,
            test::TestRequest::post()
                .uri("/mail/send-all")
                .insert_header(bearer(&admin))
                .set_json(body.clone())
        );
        assert_eq!(empty.status, StatusCode::OK);
        assert_eq!(empty.body["success"], false);

        t.seed(&AccountFactory::verified("socia@example.org")).await;
        let sent = send!(
            app,
            test::TestRequest::post()
                .uri("/mail/send-all")
                .insert_header(bearer(&admin))
                .set_json(body)
        );
        assert_eq!(sent.status, StatusCode::OK);
        assert_eq!(sent.body["success"], true);
        assert_eq!(
            t.notifier.sent(),
            vec![SentMail::Message {
                recipients: vec!["socia@example.org".to_string()],
                subject: "Cuotas".to_string(),
            }]
        );
    }

    #[actix_web::test]
    async fn test_auth_routes_are_throttled() {
        let t = build(throttled_config(2), StorageLayer::in_memory());
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;
        let login = || {
            test::TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({"email": "x@example.org", "password": "nope"}))
        };

        assert_eq!(send!(app, login()).status, StatusCode::UNAUTHORIZED);
        assert_eq!(send!(app, login()).status, StatusCode::UNAUTHORIZED);
        let limited = send!(app, login());
        assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(limited.body["error"]["code"], "RATE_LIMIT_EXCEEDED");

        // Logout is not throttled
        let logout = send!(app, test::TestRequest::post().uri("/auth/logout"));
        assert_eq!(logout.status, StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_percent_encoded_paths_keep_role_checks() {
        let t = memory_app();
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;
        let volunteer = t.seed(&with_category("vol@example.org", "voluntario")).await;
        let admin = t.seed(&with_category("boss@example.org", "admin")).await;
        let victim = AccountFactory::verified("victim@example.org");
        t.seed(&victim).await;

        let listed = send!(
            app,
            test::TestRequest::get()
                .uri("/%75sers")
                .insert_header(bearer(&volunteer))
        );
        assert_eq!(listed.status, StatusCode::FORBIDDEN);
        assert!(listed.body["data"].is_null());

        let deleted = send!(
            app,
            test::TestRequest::delete()
                .uri(&format!("/%75sers/{}", victim.id))
                .insert_header(bearer(&volunteer))
        );
        assert_eq!(deleted.status, StatusCode::FORBIDDEN);
        assert!(
            t.state
                .store
                .find_account_by_id(victim.id)
                .await
                .unwrap()
                .is_some()
        );

        let broadcast = send!(
            app,
            test::TestRequest::post()
                .uri("/mail/%73end-all")
                .insert_header(bearer(&volunteer))
                .set_json(json!({"subject": "s", "message": "m"}))
        );
        assert_eq!(broadcast.status, StatusCode::FORBIDDEN);
        assert!(t.notifier.sent().is_empty());

        // Same routes, same rules for an admin
        let admin_listed = send!(
            app,
            test::TestRequest::get()
                .uri("/%75sers")
                .insert_header(bearer(&admin))
        );
        assert_eq!(admin_listed.status, StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_protected_scope_rejects_routes_without_rule() {
        let t = memory_app();
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;
        let admin = t.seed(&with_category("root@example.org", "admin")).await;

        let resp = send!(
            app,
            test::TestRequest::get()
                .uri("/users/unknown/extra")
                .insert_header(bearer(&admin))
        );
        assert_eq!(resp.status, StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_throttle_ignores_forwarded_for() {
        let t = build(throttled_config(2), StorageLayer::in_memory());
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;

        let mut statuses = Vec::new();
        for i in 0..4 {
            let resp = send!(
                app,
                test::TestRequest::post()
                    .uri("/auth/login")
                    .peer_addr("192.0.2.10:5000".parse().unwrap())
                    .insert_header(("X-Forwarded-For", format!("10.0.0.{}", i)))
                    .insert_header(("Forwarded", format!("for=10.0.1.{}", i)))
                    .set_json(json!({"email": "x@example.org", "password": "nope"}))
            );
            statuses.push(resp.status);
        }

        assert_eq!(
            statuses,
            vec![
                StatusCode::UNAUTHORIZED,
                StatusCode::UNAUTHORIZED,
                StatusCode::TOO_MANY_REQUESTS,
                StatusCode::TOO_MANY_REQUESTS,
            ]
        );
    }

    #[actix_web::test]
    async fn test_throttle_applies_to_percent_encoded_path() {
        let t = build(throttled_config(2), StorageLayer::in_memory());
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;
        let login = |uri: &str| {
            test::TestRequest::post()
                .uri(uri)
                .set_json(json!({"email": "x@example.org", "password": "nope"}))
        };

        assert_eq!(send!(app, login("/auth/%6Cogin")).status, StatusCode::UNAUTHORIZED);
        assert_eq!(send!(app, login("/auth/login")).status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            send!(app, login("/auth/%6Cogin")).status,
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[actix_web::test]
    async fn test_health_reports_storage() {
        let t = memory_app();
        let app = test::init_service(HttpServer::create_app(web::Data::new(t.state.clone()))).await;

        let resp = send!(app, test::TestRequest::get().uri("/health"));

        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["data"]["status"], "healthy");
        assert_eq!(resp.body["data"]["storage"]["backend"], "memory");
        assert_eq!(resp.body["data"]["storage"]["healthy"], true);
    }
}
