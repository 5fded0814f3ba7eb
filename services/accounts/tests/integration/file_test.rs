use bytes::Bytes;
use futures::TryStreamExt;

use campus_accounts::error::AccountsServiceError;
use campus_accounts::usecase::file::{
    DeleteFileUseCase, ListFilesUseCase, SaveFileMetaInput, SaveFileMetaUseCase, SignUrlUseCase,
    StreamObjectUseCase, UploadFileUseCase, UploadInput,
};
use campus_domain::user::UserRole;
use campus_testing::session::sample_session;

use crate::helpers::{MockCache, MockFileRepo, MockStorage, signed, signer, test_file};

// ── Signed URLs ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_serve_signed_url_from_cache_when_present() {
    let storage = MockStorage::default();
    let cache = MockCache::default();
    let owner = sample_session(UserRole::Student);
    let usecase = SignUrlUseCase {
        files: MockFileRepo::new(vec![test_file(owner.user_id, "abc_notes.pdf", 0)]),
        signer: signer(storage.clone(), cache.clone()),
    };

    let first = usecase.execute(&owner, "abc_notes.pdf").await.unwrap();
    let second = usecase.execute(&owner, "abc_notes.pdf").await.unwrap();

    assert_eq!(first, signed("abc_notes.pdf"));
    assert_eq!(first, second);
    assert_eq!(storage.sign_count(), 1);
    assert_eq!(cache.ttl("signed_url:abc_notes.pdf"), Some(3540));
}

#[tokio::test]
async fn should_hide_objects_from_non_owners() {
    let owner = sample_session(UserRole::Student);
    let other = sample_session(UserRole::Student);
    let storage = MockStorage::default();
    let usecase = SignUrlUseCase {
        files: MockFileRepo::new(vec![test_file(owner.user_id, "abc_notes.pdf", 0)]),
        signer: signer(storage.clone(), MockCache::default()),
    };

    let result = usecase.execute(&other, "abc_notes.pdf").await;

    assert!(matches!(result, Err(AccountsServiceError::FileNotFound)));
    assert_eq!(storage.sign_count(), 0);
}

#[tokio::test]
async fn should_let_faculty_sign_any_object() {
    let faculty = sample_session(UserRole::Faculty);
    let usecase = SignUrlUseCase {
        files: MockFileRepo::default(),
        signer: signer(MockStorage::default(), MockCache::default()),
    };

    let url = usecase.execute(&faculty, "someone_else.pdf").await.unwrap();

    assert_eq!(url, signed("someone_else.pdf"));
}

#[tokio::test]
async fn should_reduce_legacy_public_url_before_signing() {
    let owner = sample_session(UserRole::Staff);
    let legacy = "https://x.supabase.co/storage/v1/object/public/uploads/abc_old.pdf";
    let usecase = SignUrlUseCase {
        files: MockFileRepo::new(vec![test_file(owner.user_id, legacy, 0)]),
        signer: signer(MockStorage::default(), MockCache::default()),
    };

    let url = usecase.execute(&owner, "abc_old.pdf").await.unwrap();

    assert_eq!(url, signed("abc_old.pdf"));
}

// ── Upload / metadata ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_upload_under_prefixed_key_and_record_metadata() {
    let owner = sample_session(UserRole::Student);
    let files = MockFileRepo::default();
    let storage = MockStorage::default();
    let usecase = UploadFileUseCase {
        files: files.clone(),
        storage: storage.clone(),
    };

    let file = usecase
        .execute(
            owner.user_id,
            UploadInput {
                filename: "notes.pdf".into(),
                content_type: "application/pdf".into(),
                data: Bytes::from_static(b"%PDF-1.7"),
                year: Some("2024".into()),
            },
        )
        .await
        .unwrap();

    let key = file.storage_path.clone().unwrap();
    assert!(key.ends_with("_notes.pdf"));
    assert_eq!(file.size, 8);
    assert_eq!(file.filename, "notes.pdf");
    assert!(storage.objects.lock().unwrap().contains_key(&key));
    assert_eq!(files.all(), vec![file]);
}

#[tokio::test]
async fn should_reject_negative_size_metadata() {
    let usecase = SaveFileMetaUseCase {
        files: MockFileRepo::default(),
    };
    let result = usecase
        .execute(
            uuid::Uuid::now_v7(),
            SaveFileMetaInput {
                filename: "notes.pdf".into(),
                size: -1,
                storage_path: None,
                year: None,
            },
        )
        .await;
    assert!(matches!(result, Err(AccountsServiceError::InvalidUpload(_))));
}

// ── List ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_own_files_newest_first() {
    let owner = sample_session(UserRole::Student);
    let other = sample_session(UserRole::Student);
    let usecase = ListFilesUseCase {
        files: MockFileRepo::new(vec![
            test_file(owner.user_id, "a_old.pdf", 30),
            test_file(other.user_id, "b_theirs.pdf", 10),
            test_file(owner.user_id, "c_new.pdf", 1),
        ]),
        signer: signer(MockStorage::default(), MockCache::default()),
    };

    let listed = usecase.execute(&owner).await.unwrap();

    let urls: Vec<_> = listed.iter().filter_map(|l| l.url.clone()).collect();
    assert_eq!(urls, [signed("c_new.pdf"), signed("a_old.pdf")]);
}

#[tokio::test]
async fn should_list_all_files_for_admin() {
    let admin = sample_session(UserRole::Admin);
    let usecase = ListFilesUseCase {
        files: MockFileRepo::new(vec![
            test_file(uuid::Uuid::now_v7(), "a_one.pdf", 2),
            test_file(uuid::Uuid::now_v7(), "b_two.pdf", 1),
        ]),
        signer: signer(MockStorage::default(), MockCache::default()),
    };

    assert_eq!(usecase.execute(&admin).await.unwrap().len(), 2);
}

#[tokio::test]
async fn should_fall_back_to_stored_path_when_signing_fails() {
    let owner = sample_session(UserRole::Student);
    let usecase = ListFilesUseCase {
        files: MockFileRepo::new(vec![test_file(owner.user_id, "abc_notes.pdf", 0)]),
        signer: signer(MockStorage::failing_sign(), MockCache::default()),
    };

    let listed = usecase.execute(&owner).await.unwrap();

    assert_eq!(listed[0].url.as_deref(), Some("abc_notes.pdf"));
}

// ── Delete ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_forbid_students_from_deleting_files() {
    let student = sample_session(UserRole::Student);
    let file = test_file(student.user_id, "abc_notes.pdf", 0);
    let files = MockFileRepo::new(vec![file.clone()]);
    let usecase = DeleteFileUseCase {
        files: files.clone(),
        signer: signer(MockStorage::default(), MockCache::default()),
    };

    let result = usecase.execute(&student, file.id).await;

    assert!(matches!(result, Err(AccountsServiceError::Forbidden)));
    assert_eq!(files.all().len(), 1);
}

#[tokio::test]
async fn should_delete_row_even_when_storage_removal_fails() {
    let faculty = sample_session(UserRole::Faculty);
    let file = test_file(uuid::Uuid::now_v7(), "abc_notes.pdf", 0);
    let files = MockFileRepo::new(vec![file.clone()]);
    let cache = MockCache::default();
    let signer = signer(MockStorage::failing_remove(), cache.clone());
    signer.signed_url("abc_notes.pdf").await.unwrap();
    let usecase = DeleteFileUseCase {
        files: files.clone(),
        signer,
    };

    usecase.execute(&faculty, file.id).await.unwrap();

    assert!(files.all().is_empty());
    assert!(!cache.contains("signed_url:abc_notes.pdf"));
}

#[tokio::test]
async fn should_remove_stored_object_on_delete() {
    let admin = sample_session(UserRole::Admin);
    let file = test_file(uuid::Uuid::now_v7(), "abc_notes.pdf", 0);
    let storage = MockStorage::default().with_object("abc_notes.pdf", b"data");
    let usecase = DeleteFileUseCase {
        files: MockFileRepo::new(vec![file.clone()]),
        signer: signer(storage.clone(), MockCache::default()),
    };

    usecase.execute(&admin, file.id).await.unwrap();

    assert_eq!(*storage.removed.lock().unwrap(), ["abc_notes.pdf"]);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_file_delete() {
    let admin = sample_session(UserRole::Admin);
    let usecase = DeleteFileUseCase {
        files: MockFileRepo::default(),
        signer: signer(MockStorage::default(), MockCache::default()),
    };
    let result = usecase.execute(&admin, uuid::Uuid::now_v7()).await;
    assert!(matches!(result, Err(AccountsServiceError::FileNotFound)));
}

// ── Stream ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_stream_owned_object_with_display_name() {
    let owner = sample_session(UserRole::Student);
    let storage = MockStorage::default().with_object("abc_notes.pdf", b"%PDF-1.7");
    let usecase = StreamObjectUseCase {
        files: MockFileRepo::new(vec![test_file(owner.user_id, "abc_notes.pdf", 0)]),
        signer: signer(storage, MockCache::default()),
    };

    let streamed = usecase.execute(&owner, "abc_notes.pdf").await.unwrap();

    assert_eq!(streamed.filename, "abc_notes.pdf");
    assert_eq!(streamed.object.content_length, Some(8));
    let chunks: Vec<Bytes> = streamed.object.body.try_collect().await.unwrap();
    assert_eq!(chunks.concat(), b"%PDF-1.7");
}

#[tokio::test]
async fn should_report_missing_upstream_object_as_not_found() {
    let faculty = sample_session(UserRole::Faculty);
    let usecase = StreamObjectUseCase {
        files: MockFileRepo::default(),
        signer: signer(MockStorage::default(), MockCache::default()),
    };

    let result = usecase.execute(&faculty, "gone.pdf").await;

    assert!(matches!(result, Err(AccountsServiceError::FileNotFound)));
}
