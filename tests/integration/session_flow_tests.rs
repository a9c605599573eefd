//! Session lifecycle over the SeaORM store
//!
//! Same flows the HTTP layer drives, without HTTP.

#[cfg(test)]
mod tests {
    use crate::common::database::TestDatabase;
    use crate::common::fixtures::{
        AccountFactory, PASSWORD, RecordingNotifier, RegistrationFactory, test_config,
    };
    use crate::{assert_err, assert_ok};
    use sociapp::AppError;
    use sociapp::auth::session::messages;
    use sociapp::auth::{AccessGuard, Argon2Hasher, JwtHandler, SessionService, VerificationOutcome};
    use sociapp::storage::CredentialStore;
    use std::sync::Arc;

    struct Setup {
        store: Arc<dyn CredentialStore>,
        jwt: Arc<JwtHandler>,
        notifier: Arc<RecordingNotifier>,
        service: SessionService,
    }

    async fn setup_with(notifier: RecordingNotifier) -> Setup {
        let config = test_config();
        let db = TestDatabase::new().await;
        let store = db.store();
        let jwt = Arc::new(JwtHandler::new(config.auth()).unwrap());
        let notifier = Arc::new(notifier);
        let service = SessionService::new(
            Arc::clone(&store),
            Arc::new(Argon2Hasher::new()),
            Arc::clone(&jwt),
            notifier.clone(),
            config.auth().verification_code_ttl,
        );
        Setup {
            store,
            jwt,
            notifier,
            service,
        }
    }

    async fn setup() -> Setup {
        setup_with(RecordingNotifier::new()).await
    }

    async fn pending_code(store: &Arc<dyn CredentialStore>, email: &str) -> String {
        store
            .find_account_by_email(email)
            .await
            .unwrap()
            .and_then(|a| a.verification_code)
            .expect("pending code")
    }

    #[tokio::test]
    async fn test_register_verify_login_refresh() {
        let s = setup().await;
        let email = "ana@example.org";

        let message = assert_ok!(s.service.register(RegistrationFactory::member(email)).await);
        assert_eq!(message, messages::REGISTERED);

        let stored = s.store.find_account_by_email(email).await.unwrap().unwrap();
        assert!(!stored.is_verified);
        assert_ne!(stored.password_hash, PASSWORD);

        // Unverified accounts cannot log in
        let err = assert_err!(s.service.login(email, PASSWORD).await);
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == messages::VERIFY_FIRST));

        let code = pending_code(&s.store, email).await;
        let outcome = assert_ok!(s.service.verify_email(email, &code).await);
        let pair = match outcome {
            VerificationOutcome::Verified(pair) => pair,
            VerificationOutcome::AlreadyVerified => panic!("expected a fresh session"),
        };
        let claims = assert_ok!(s.jwt.verify_access_token(&pair.access_token));
        assert_eq!(claims.email, email);

        let login = assert_ok!(s.service.login(email, PASSWORD).await);
        let rotated = assert_ok!(s.service.refresh_token(Some(&login.refresh_token)).await);
        let claims = assert_ok!(s.jwt.verify_access_token(&rotated.access_token));
        assert_eq!(claims.sub, stored.id);
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let s = setup().await;

        assert_ok!(s.service.register(RegistrationFactory::member("dup@example.org")).await);
        let err = assert_err!(
            s.service
                .register(RegistrationFactory::member("dup@example.org"))
                .await
        );

        assert!(matches!(err, AppError::Conflict(ref m) if m == messages::EMAIL_EXISTS));
    }

    #[tokio::test]
    async fn test_code_is_single_use() {
        let s = setup().await;
        let email = "once@example.org";
        assert_ok!(s.service.register(RegistrationFactory::member(email)).await);
        let code = pending_code(&s.store, email).await;

        assert!(matches!(
            assert_ok!(s.service.verify_email(email, &code).await),
            VerificationOutcome::Verified(_)
        ));
        assert!(matches!(
            assert_ok!(s.service.verify_email(email, &code).await),
            VerificationOutcome::AlreadyVerified
        ));
    }

    #[tokio::test]
    async fn test_expired_registration_is_purged_on_verify() {
        let s = setup().await;
        let account = AccountFactory::expired("late@example.org");
        s.store.create_account(&account).await.unwrap();

        let err = assert_err!(s.service.verify_email("late@example.org", "123456").await);
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == messages::REGISTRATION_EXPIRED));

        assert!(s.store.find_account_by_id(account.id).await.unwrap().is_none());

        // The email is free again
        assert_ok!(
            s.service
                .register(RegistrationFactory::member("late@example.org"))
                .await
        );
    }

    #[tokio::test]
    async fn test_resend_replaces_code_and_mails_it() {
        let s = setup().await;
        let account = AccountFactory::pending("resend@example.org", "111111");
        s.store.create_account(&account).await.unwrap();

        let message = assert_ok!(s.service.resend_verification_code("resend@example.org").await);
        assert_eq!(message, messages::CODE_RESENT);

        let mailed = s.notifier.last_code_for("resend@example.org").expect("code mailed");
        assert_eq!(pending_code(&s.store, "resend@example.org").await, mailed);

        // The replaced code no longer works unless it happens to be drawn again
        if mailed != "111111" {
            let err = assert_err!(s.service.verify_email("resend@example.org", "111111").await);
            assert!(matches!(err, AppError::Unauthorized(_)));
        }
    }

    #[tokio::test]
    async fn test_resend_delivery_failure_propagates() {
        let s = setup_with(RecordingNotifier::failing()).await;
        let account = AccountFactory::pending("down@example.org", "111111");
        s.store.create_account(&account).await.unwrap();

        let err = assert_err!(s.service.resend_verification_code("down@example.org").await);
        assert!(matches!(err, AppError::Email(_)));
    }

    #[tokio::test]
    async fn test_register_survives_delivery_failure() {
        let s = setup_with(RecordingNotifier::failing()).await;

        assert_ok!(
            s.service
                .register(RegistrationFactory::member("quiet@example.org"))
                .await
        );
        assert!(
            s.store
                .find_account_by_email("quiet@example.org")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_refresh_after_account_deleted_fails() {
        let s = setup().await;
        let account = AccountFactory::verified("gone@example.org");
        s.store.create_account(&account).await.unwrap();
        let pair = s.service.generate_tokens(&account).unwrap();

        s.store.delete_account(account.id).await.unwrap();

        let err = assert_err!(s.service.refresh_token(Some(&pair.refresh_token)).await);
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == messages::INVALID_REFRESH_TOKEN));
    }

    #[tokio::test]
    async fn test_access_guard_resolves_subject() {
        let s = setup().await;
        let account = AccountFactory::verified("guard@example.org");
        s.store.create_account(&account).await.unwrap();
        let pair = s.service.generate_tokens(&account).unwrap();
        let guard = AccessGuard::new(Arc::clone(&s.jwt), Arc::clone(&s.store));

        let header = format!("Bearer {}", pair.access_token);
        let context = assert_ok!(guard.authenticate(Some(&header)).await);
        assert_eq!(context.account.id, account.id);

        // A refresh token is not an access token
        let header = format!("Bearer {}", pair.refresh_token);
        assert!(guard.authenticate(Some(&header)).await.is_err());
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired_registrations() {
        let s = setup().await;
        let expired = AccountFactory::expired("old@example.org");
        let pending = AccountFactory::pending("new@example.org", "222222");
        let verified = AccountFactory::verified("ok@example.org");
        for account in [&expired, &pending, &verified] {
            s.store.create_account(account).await.unwrap();
        }

        assert_eq!(assert_ok!(s.service.purge_expired_registrations().await), 1);

        assert!(s.store.find_account_by_id(expired.id).await.unwrap().is_none());
        assert!(s.store.find_account_by_id(pending.id).await.unwrap().is_some());
        assert!(s.store.find_account_by_id(verified.id).await.unwrap().is_some());
    }
}
