use campus_accounts::domain::types::{ImportRow, NewAccount, UserProfile, user_detail_key};
use campus_accounts::error::AccountsServiceError;
use campus_accounts::usecase::admin::{
    CreateUserUseCase, ImportUsersUseCase, ListUsersUseCase, UpdateUserInput, UpdateUserUseCase,
};
use campus_accounts::domain::repository::LookupCache;
use campus_domain::user::UserRole;

use crate::helpers::{DOMAIN, MockCache, MockUserRepo, STRONG_PASSWORD, test_user};

fn account(email: &str, role: &str) -> NewAccount {
    NewAccount {
        email: email.into(),
        username: email.split('@').next().unwrap_or_default().into(),
        password: STRONG_PASSWORD.into(),
        role: role.into(),
        ..Default::default()
    }
}

fn import_row(row: usize, email: &str, role: &str) -> ImportRow {
    ImportRow {
        row,
        email: email.into(),
        username: email.split('@').next().unwrap_or_default().into(),
        role: role.into(),
        password: STRONG_PASSWORD.into(),
        picture: None,
        department: None,
        roll_number: None,
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_users_ordered_by_username() {
    let users = MockUserRepo::new(vec![
        test_user("zara@lnmiit.ac.in", UserRole::Staff),
        test_user("arun@lnmiit.ac.in", UserRole::Admin),
    ]);
    let usecase = ListUsersUseCase { users };

    let listed = usecase.execute().await.unwrap();

    let names: Vec<_> = listed.iter().filter_map(|u| u.username.as_deref()).collect();
    assert_eq!(names, ["arun", "zara"]);
}

// ── CreateUser ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_student_with_profile() {
    let users = MockUserRepo::default();
    let usecase = CreateUserUseCase {
        users: users.clone(),
    };
    let input = NewAccount {
        roll_number: Some("22UCS001".into()),
        department: Some("UCS".into()),
        ..account("student@lnmiit.ac.in", "student")
    };

    let user = usecase.execute(input).await.unwrap();

    let profile = users.profile(user.id).unwrap();
    assert_eq!(profile.roll_number.as_deref(), Some("22UCS001"));
    assert_eq!(profile.department, "UCS");
}

#[tokio::test]
async fn should_allow_admin_created_users_outside_domain() {
    let usecase = CreateUserUseCase {
        users: MockUserRepo::default(),
    };
    let user = usecase
        .execute(account("vendor@example.com", "admin"))
        .await
        .unwrap();
    assert_eq!(user.role, UserRole::Admin);
}

#[tokio::test]
async fn should_require_roll_number_and_department_for_student() {
    let usecase = CreateUserUseCase {
        users: MockUserRepo::default(),
    };
    let input = NewAccount {
        department: Some("UCS".into()),
        ..account("student@lnmiit.ac.in", "student")
    };

    let err = usecase.execute(input).await.unwrap_err();

    assert!(matches!(err, AccountsServiceError::MissingProfileData(_)));
    assert_eq!(err.to_string(), "Student must have roll_number and department");
}

#[tokio::test]
async fn should_require_department_for_faculty() {
    let usecase = CreateUserUseCase {
        users: MockUserRepo::default(),
    };

    let err = usecase
        .execute(account("prof@lnmiit.ac.in", "faculty"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Faculty must have a department");
}

#[tokio::test]
async fn should_reject_duplicate_roll_number() {
    let holder = test_user("first@lnmiit.ac.in", UserRole::Student);
    let users = MockUserRepo::new(vec![holder.clone()]).with_profile(UserProfile {
        user_id: holder.id,
        department: "UCS".into(),
        roll_number: Some("22UCS001".into()),
    });
    let usecase = CreateUserUseCase { users };
    let input = NewAccount {
        roll_number: Some("22UCS001".into()),
        department: Some("UCS".into()),
        ..account("second@lnmiit.ac.in", "student")
    };

    let result = usecase.execute(input).await;

    assert!(matches!(result, Err(AccountsServiceError::RollNumberAlreadyExists)));
}

#[tokio::test]
async fn should_reject_unknown_role() {
    let usecase = CreateUserUseCase {
        users: MockUserRepo::default(),
    };
    let result = usecase.execute(account("x@lnmiit.ac.in", "janitor")).await;
    assert!(matches!(result, Err(AccountsServiceError::InvalidRole(_))));
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_derive_username_and_department_from_roll_number() {
    let student = test_user("asha@lnmiit.ac.in", UserRole::Student);
    let users = MockUserRepo::new(vec![student.clone()]);
    let usecase = UpdateUserUseCase {
        users: users.clone(),
        cache: MockCache::default(),
    };
    let input = UpdateUserInput {
        roll_number: Some("22ucs045".into()),
        ..Default::default()
    };

    let updated = usecase.execute(student.id, input).await.unwrap();

    assert_eq!(updated.username.as_deref(), Some("22ucs045"));
    let profile = users.profile(student.id).unwrap();
    assert_eq!(profile.department, "UCS");
    assert_eq!(profile.roll_number.as_deref(), Some("22ucs045"));
}

#[tokio::test]
async fn should_let_explicit_department_override_derived_one() {
    let student = test_user("asha@lnmiit.ac.in", UserRole::Student);
    let users = MockUserRepo::new(vec![student.clone()]);
    let usecase = UpdateUserUseCase {
        users: users.clone(),
        cache: MockCache::default(),
    };
    let input = UpdateUserInput {
        roll_number: Some("22ucs045".into()),
        department: Some("ECE".into()),
        ..Default::default()
    };

    usecase.execute(student.id, input).await.unwrap();

    assert_eq!(users.profile(student.id).unwrap().department, "ECE");
}

#[tokio::test]
async fn should_create_missing_faculty_profile_on_department_update() {
    let faculty = test_user("prof@lnmiit.ac.in", UserRole::Faculty);
    let users = MockUserRepo::new(vec![faculty.clone()]);
    let usecase = UpdateUserUseCase {
        users: users.clone(),
        cache: MockCache::default(),
    };
    let input = UpdateUserInput {
        department: Some("Physics".into()),
        ..Default::default()
    };

    usecase.execute(faculty.id, input).await.unwrap();

    let profile = users.profile(faculty.id).unwrap();
    assert_eq!(profile.department, "Physics");
    assert_eq!(profile.roll_number, None);
}

#[tokio::test]
async fn should_reject_email_used_by_another_user() {
    let a = test_user("a@lnmiit.ac.in", UserRole::Staff);
    let b = test_user("b@lnmiit.ac.in", UserRole::Staff);
    let usecase = UpdateUserUseCase {
        users: MockUserRepo::new(vec![a.clone(), b]),
        cache: MockCache::default(),
    };
    let input = UpdateUserInput {
        email: Some("B@lnmiit.ac.in".into()),
        ..Default::default()
    };

    let result = usecase.execute(a.id, input).await;

    assert!(matches!(result, Err(AccountsServiceError::EmailAlreadyExists)));
}

#[tokio::test]
async fn should_return_not_found_for_unknown_user_update() {
    let usecase = UpdateUserUseCase {
        users: MockUserRepo::default(),
        cache: MockCache::default(),
    };
    let result = usecase
        .execute(uuid::Uuid::now_v7(), UpdateUserInput::default())
        .await;
    assert!(matches!(result, Err(AccountsServiceError::UserNotFound)));
}

#[tokio::test]
async fn should_invalidate_cached_detail_on_update() {
    let staff = test_user("s@lnmiit.ac.in", UserRole::Staff);
    let cache = MockCache::default();
    cache.set(&user_detail_key(staff.id), "{}", 60).await;
    let usecase = UpdateUserUseCase {
        users: MockUserRepo::new(vec![staff.clone()]),
        cache: cache.clone(),
    };
    let input = UpdateUserInput {
        username: Some("stores-desk".into()),
        ..Default::default()
    };

    let updated = usecase.execute(staff.id, input).await.unwrap();

    assert_eq!(updated.username.as_deref(), Some("stores-desk"));
    assert!(!cache.contains(&user_detail_key(staff.id)));
}

// ── ImportUsers ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_failed_rows_and_continue_import() {
    let users = MockUserRepo::new(vec![test_user("taken@lnmiit.ac.in", UserRole::Staff)]);
    let usecase = ImportUsersUseCase {
        users: users.clone(),
        allowed_domain: DOMAIN.into(),
    };
    let rows = vec![
        ImportRow {
            department: Some("Stores".into()),
            ..import_row(2, "clerk@lnmiit.ac.in", "staff")
        },
        import_row(3, "taken@lnmiit.ac.in", "admin"),
        import_row(4, "outsider@gmail.com", "admin"),
        import_row(5, "student@lnmiit.ac.in", "student"),
        import_row(6, "boss@lnmiit.ac.in", "overlord"),
        import_row(7, "head@lnmiit.ac.in", "admin"),
    ];

    let summary = usecase.execute(rows).await;

    assert_eq!(summary.success_count, 2);
    let failed_rows: Vec<_> = summary.failed.iter().map(|f| f.row).collect();
    assert_eq!(failed_rows, [3, 4, 5, 6]);
    assert_eq!(summary.failed[0].error, "Email already exists");
    assert_eq!(summary.failed[1].error, "Only @lnmiit.ac.in emails are allowed");
    assert!(users.user_by_email("head@lnmiit.ac.in").is_some());
    assert_eq!(users.count(), 3);
}
