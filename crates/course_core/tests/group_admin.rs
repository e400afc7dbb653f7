use chrono::NaiveDate;
use course_core::db::open_db_in_memory;
use course_core::{
    EnrollmentService, GroupService, GroupServiceError, SqliteGroupRepository,
    SqliteStudentRepository, StudentCreateRequest,
};

#[test]
fn create_and_get_group() {
    let conn = open_db_in_memory().unwrap();
    let service = GroupService::new(SqliteGroupRepository::try_new(&conn).unwrap());

    let group = service.create_group("P-101", 25).unwrap();
    assert_eq!(group.no, "P-101");
    assert_eq!(group.limit, 25);
    assert!(group.is_active());

    assert_eq!(service.get_group(group.id).unwrap(), group);
}

#[test]
fn zero_limit_is_invalid() {
    let conn = open_db_in_memory().unwrap();
    let service = GroupService::new(SqliteGroupRepository::try_new(&conn).unwrap());

    let err = service.create_group("P-000", 0).unwrap_err();
    assert!(matches!(err, GroupServiceError::InvalidLimit));
}

#[test]
fn list_reports_active_occupancy() {
    let conn = open_db_in_memory().unwrap();
    let groups = GroupService::new(SqliteGroupRepository::try_new(&conn).unwrap());
    let enrollment = EnrollmentService::new(
        SqliteStudentRepository::try_new(&conn).unwrap(),
        SqliteGroupRepository::try_new(&conn).unwrap(),
    );

    let busy = groups.create_group("P-101", 3).unwrap();
    let empty = groups.create_group("P-102", 3).unwrap();
    for email in ["a@example.com", "b@example.com"] {
        enrollment
            .create(&StudentCreateRequest {
                full_name: "Dorothy Vaughan".to_string(),
                email: email.to_string(),
                birth_date: NaiveDate::from_ymd_opt(1910, 9, 20).unwrap(),
                group_id: busy.id,
            })
            .unwrap();
    }

    let summaries = groups.list_groups().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].group.id, busy.id);
    assert_eq!(summaries[0].active_members, 2);
    assert_eq!(summaries[1].group.id, empty.id);
    assert_eq!(summaries[1].active_members, 0);
}

#[test]
fn deleted_group_disappears_and_cannot_be_deleted_again() {
    let conn = open_db_in_memory().unwrap();
    let service = GroupService::new(SqliteGroupRepository::try_new(&conn).unwrap());
    let group = service.create_group("P-101", 5).unwrap();

    service.delete_group(group.id).unwrap();

    assert!(service.list_groups().unwrap().is_empty());
    assert!(matches!(
        service.get_group(group.id),
        Err(GroupServiceError::GroupNotFound(id)) if id == group.id
    ));
    assert!(matches!(
        service.delete_group(group.id),
        Err(GroupServiceError::GroupNotFound(_))
    ));
}

#[test]
fn summary_serializes_flat() {
    let conn = open_db_in_memory().unwrap();
    let service = GroupService::new(SqliteGroupRepository::try_new(&conn).unwrap());
    service.create_group("P-101", 5).unwrap();

    let summaries = service.list_groups().unwrap();
    let json = serde_json::to_value(&summaries[0]).unwrap();
    assert_eq!(json["no"], "P-101");
    assert_eq!(json["limit"], 5);
    assert_eq!(json["active_members"], 0);
}
