// ==========================================
// 导入会话集成测试
// ==========================================
// 测试目标: 阶段流转 + 映射调整 + 预览分类 + 分批提交
// 覆盖范围: ImportSession + InMemory/故障仓储
// ==========================================

mod test_helpers;

use camp_participant_import::config::ImportConfig;
use camp_participant_import::domain::{ImportContext, ImportStage, TargetField};
use camp_participant_import::importer::{ImportError, ImportSession};
use camp_participant_import::logging;
use camp_participant_import::repository::InMemoryParticipantRepository;
use test_helpers::{generate_csv, write_csv, FailingRepository};

fn new_session(batch_size: usize) -> ImportSession {
    let config = ImportConfig {
        batch_size,
        ..ImportConfig::default()
    }
    .without_delay();
    ImportSession::new(ImportContext::new("summer-2026"), config)
        .expect("Failed to create session")
}

#[tokio::test]
async fn test_full_flow_with_manual_mapping() {
    logging::init_test();

    let mut session = new_session(10);
    session
        .upload_text("Camper,Family Name,Contact,Allergies\nAnn,Lee,ann@camp.org,Peanuts\nBo,,bo@camp.org,")
        .unwrap();

    // 自动映射: 必填均不命中，Allergies → dietaryRestrictions
    assert_eq!(
        session.missing_required_fields(),
        vec![TargetField::FirstName, TargetField::LastName, TargetField::Email]
    );
    assert!(!session.can_preview());

    session.update_mapping(TargetField::FirstName, "Camper").unwrap();
    session.update_mapping(TargetField::LastName, "Family Name").unwrap();
    session.update_mapping(TargetField::Email, "Contact").unwrap();
    assert!(session.can_preview());

    let preview = session.validate().unwrap();
    assert_eq!(preview.valid.len(), 1);
    assert_eq!(preview.invalid.len(), 1);
    assert_eq!(preview.invalid[0].row_number, 3);
    assert_eq!(preview.invalid[0].errors[0].to_string(), "lastName is required");
    assert_eq!(
        preview.valid[0].dietary_restrictions.as_deref(),
        Some("Peanuts")
    );

    let repo = InMemoryParticipantRepository::new();
    let result = session.execute_import(&repo, |_| {}).await.unwrap();
    assert_eq!(result.succeeded, 1);
    assert_eq!(session.stage(), ImportStage::Complete);

    let stored = repo.list_by_registration("summer-2026").unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].full_name(), "Ann Lee");
}

#[tokio::test]
async fn test_partial_batch_failure_is_counted_not_raised() {
    logging::init_test();

    let file = write_csv(&generate_csv(25)).unwrap();
    let mut session = new_session(10);
    session.upload_file(file.path()).unwrap();
    assert_eq!(session.validate().unwrap().valid.len(), 25);

    let repo = FailingRepository::new(vec![1]);
    let mut progress = Vec::new();
    let result = session
        .execute_import(&repo, |p| progress.push(p.percent))
        .await
        .unwrap();

    assert_eq!(result.succeeded, 15);
    assert_eq!(result.failed, 10);
    assert_eq!(result.succeeded + result.failed, 25);
    assert_eq!(progress, vec![40.0, 80.0, 100.0]);
    assert_eq!(repo.call_count(), 3);
    assert_eq!(repo.inner.len(), 15);
    assert_eq!(session.stage(), ImportStage::Complete);
    assert_eq!(session.progress(), 100.0);
}

#[tokio::test]
async fn test_progress_is_monotonic() {
    let file = write_csv(&generate_csv(23)).unwrap();
    let mut session = new_session(4);
    session.upload_file(file.path()).unwrap();
    session.validate().unwrap();

    let repo = InMemoryParticipantRepository::new();
    let mut progress = Vec::new();
    session
        .execute_import(&repo, |p| progress.push(p.percent))
        .await
        .unwrap();

    assert_eq!(progress.len(), 6);
    assert!(progress.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(progress.last().copied(), Some(100.0));
}

#[test]
fn test_unsupported_file_stays_in_upload() {
    let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    let mut session = new_session(10);

    let err = session.upload_file(file.path()).unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat(_)));
    assert_eq!(session.stage(), ImportStage::Upload);
}

#[tokio::test]
async fn test_close_from_any_stage_resets() {
    let mut session = new_session(10);
    session.upload_text(&generate_csv(2)).unwrap();
    session.validate().unwrap();
    session.close();

    assert_eq!(session.stage(), ImportStage::Upload);
    assert!(session.preview().is_none());
    assert!(session.mappings().is_empty());

    // 关闭后可重新开始
    session.upload_text(&generate_csv(1)).unwrap();
    assert_eq!(session.row_count(), 1);
}

#[tokio::test]
async fn test_execute_import_twice_is_rejected() {
    let mut session = new_session(10);
    session.upload_text(&generate_csv(3)).unwrap();
    session.validate().unwrap();

    let repo = InMemoryParticipantRepository::new();
    session.execute_import(&repo, |_| {}).await.unwrap();

    let second = session.execute_import(&repo, |_| {}).await;
    assert!(matches!(
        second,
        Err(ImportError::InvalidStageTransition {
            from: ImportStage::Complete,
            to: ImportStage::Importing
        })
    ));
    assert_eq!(repo.len(), 3);
}
