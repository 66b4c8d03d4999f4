use catalog_api::domain::password::verify_password;
use catalog_api::domain::types::ProfilePatch;
use catalog_api::error::ApiError;
use catalog_api::usecase::auth::{
    GetUserUseCase, LoginInput, LoginUseCase, RegisterInput, RegisterUseCase,
    UpdateProfileUseCase,
};
use catalog_auth_types::token::validate_session_token;
use catalog_domain::id::UserId;

use crate::helpers::{MockUserRepo, test_secret, test_user};

fn register_input(email: &str, password: &str) -> RegisterInput {
    RegisterInput {
        email: email.to_owned(),
        password: password.to_owned(),
        first_name: "Grace".to_owned(),
        last_name: "Hopper".to_owned(),
        phone: Some("555-0100".to_owned()),
    }
}

// ── RegisterUseCase ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_user_and_issue_valid_token() {
    let repo = MockUserRepo::empty();
    let users = repo.users_handle();
    let usecase = RegisterUseCase {
        users: repo,
        jwt_secret: test_secret(),
    };

    let output = usecase
        .execute(register_input("a@x.com", "s3cret!"))
        .await
        .unwrap();

    assert_eq!(output.user.email, "a@x.com");
    assert_eq!(output.user.phone.as_deref(), Some("555-0100"));
    assert_eq!(
        validate_session_token(&output.token, &test_secret()).unwrap().user_id,
        output.user.id
    );

    let stored = users.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_ne!(stored[0].password_hash, "s3cret!");
    assert!(verify_password("s3cret!", &stored[0].password_hash).unwrap());
}

#[tokio::test]
async fn should_reject_duplicate_email_and_keep_first_record() {
    let first = test_user("a@x.com", "original");
    let first_id = first.id;
    let repo = MockUserRepo::new(vec![first]);
    let users = repo.users_handle();
    let usecase = RegisterUseCase {
        users: repo,
        jwt_secret: test_secret(),
    };

    let result = usecase.execute(register_input("a@x.com", "other")).await;
    assert!(
        matches!(result, Err(ApiError::DuplicateEmail)),
        "expected DuplicateEmail, got {result:?}"
    );

    let stored = users.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, first_id);
    assert!(verify_password("original", &stored[0].password_hash).unwrap());
}

#[tokio::test]
async fn should_treat_email_case_as_significant() {
    let usecase = RegisterUseCase {
        users: MockUserRepo::new(vec![test_user("a@x.com", "pw")]),
        jwt_secret: test_secret(),
    };

    let output = usecase.execute(register_input("A@x.com", "pw")).await.unwrap();
    assert_eq!(output.user.email, "A@x.com");
}

// ── LoginUseCase ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_login_with_correct_password() {
    let user = test_user("a@x.com", "correct horse");
    let user_id = user.id;
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt_secret: test_secret(),
    };

    let output = usecase
        .execute(LoginInput {
            email: "a@x.com".to_owned(),
            password: "correct horse".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(output.user.id, user_id);
    assert_eq!(
        validate_session_token(&output.token, &test_secret()).unwrap().user_id,
        user_id
    );
}

#[tokio::test]
async fn should_fail_identically_for_wrong_password_and_unknown_email() {
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![test_user("a@x.com", "right")]),
        jwt_secret: test_secret(),
    };

    let wrong_password = usecase
        .execute(LoginInput {
            email: "a@x.com".to_owned(),
            password: "wrong".to_owned(),
        })
        .await
        .unwrap_err();
    let unknown_email = usecase
        .execute(LoginInput {
            email: "nobody@x.com".to_owned(),
            password: "right".to_owned(),
        })
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, ApiError::InvalidCredentials));
    assert!(matches!(unknown_email, ApiError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    assert_eq!(wrong_password.kind(), unknown_email.kind());
}

// ── GetUserUseCase / UpdateProfileUseCase ────────────────────────────────────

#[tokio::test]
async fn should_return_not_found_for_unknown_user() {
    let usecase = GetUserUseCase {
        users: MockUserRepo::empty(),
    };
    let result = usecase.execute(UserId::generate()).await;
    assert!(matches!(result, Err(ApiError::NotFound("User"))));
}

#[tokio::test]
async fn should_require_at_least_one_profile_field() {
    let user = test_user("a@x.com", "pw");
    let usecase = UpdateProfileUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
    };
    let result = usecase.execute(user.id, ProfilePatch::default()).await;
    assert!(matches!(result, Err(ApiError::MissingData)));
}

#[tokio::test]
async fn should_update_only_given_profile_fields() {
    let user = test_user("a@x.com", "pw");
    let usecase = UpdateProfileUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
    };

    let updated = usecase
        .execute(
            user.id,
            ProfilePatch {
                last_name: Some("Byron".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.first_name, user.first_name);
    assert_eq!(updated.last_name, "Byron");
    assert_eq!(updated.email, user.email);
    assert!(updated.updated_at >= user.updated_at);
}
