//! Role, route and identity mapping tests

use tutorlink::auth::{allowed_routes, map_identity, Role, Route, RouteSet, UserRecord};
use tutorlink::config::UnknownRolePolicy;

fn set(routes: &[Route]) -> RouteSet {
    routes.iter().copied().collect()
}

fn record(json: serde_json::Value) -> UserRecord {
    serde_json::from_value(json).expect("valid user record")
}

#[test]
fn test_student_route_table() {
    assert_eq!(
        allowed_routes(Role::Student, UnknownRolePolicy::Student),
        set(&[
            Route::Overview,
            Route::Tutors,
            Route::Documents,
            Route::Chat,
            Route::Profile
        ])
    );
}

#[test]
fn test_tutor_route_table() {
    assert_eq!(
        allowed_routes(Role::Tutor, UnknownRolePolicy::Student),
        set(&[Route::CreateExam, Route::Planner, Route::Documents, Route::Profile])
    );
}

#[test]
fn test_both_route_table_has_no_duplicates() {
    let both = allowed_routes(Role::Both, UnknownRolePolicy::Student);
    let student = allowed_routes(Role::Student, UnknownRolePolicy::Student);
    let tutor = allowed_routes(Role::Tutor, UnknownRolePolicy::Student);

    assert_eq!(both, student.union(&tutor).copied().collect::<RouteSet>());
    assert_eq!(both.iter().count(), 7);
}

#[test]
fn test_admin_route_table() {
    assert_eq!(
        allowed_routes(Role::Admin, UnknownRolePolicy::Student),
        set(&Route::ALL)
    );
}

#[test]
fn test_route_table_ignores_policy_for_known_roles() {
    for role in [Role::Student, Role::Tutor, Role::Both, Role::Admin] {
        assert_eq!(
            allowed_routes(role, UnknownRolePolicy::Student),
            allowed_routes(role, UnknownRolePolicy::Deny)
        );
    }
}

#[test]
fn test_role_display() {
    assert_eq!(Role::Student.to_string(), "student");
    assert_eq!(Role::Tutor.to_string(), "tutor");
    assert_eq!(Role::Both.to_string(), "both");
    assert_eq!(Role::Admin.to_string(), "admin");
}

#[test]
fn test_route_keys() {
    let keys: Vec<_> = Route::ALL.iter().map(|route| route.to_string()).collect();
    assert_eq!(
        keys,
        ["overview", "tutors", "documents", "chat", "profile", "create-exam", "planner"]
    );
}

#[test]
fn test_map_identity_from_backend_record() {
    let identity = map_identity(
        Some(record(serde_json::json!({ "id": "1", "fullName": "Ana", "role": "tutor" }))),
        UnknownRolePolicy::Student,
    )
    .unwrap();

    assert_eq!(identity.id(), "1");
    assert_eq!(identity.name, "Ana");
    assert_eq!(identity.role(), Role::Tutor);
    assert!(identity.subjects.is_empty());
    assert_eq!(identity.bio, "");
    assert!(identity.can_open(Route::Planner));
    assert!(!identity.can_open(Route::Tutors));
}

#[test]
fn test_map_identity_none() {
    assert!(map_identity(None, UnknownRolePolicy::Student).is_none());
}

#[test]
fn test_unknown_role_falls_back_to_student() {
    let identity = map_identity(
        Some(record(serde_json::json!({ "id": 3, "name": "Moe", "role": "moderator" }))),
        UnknownRolePolicy::Student,
    )
    .unwrap();

    assert_eq!(identity.id(), "3");
    assert_eq!(identity.role(), Role::Unknown);
    assert_eq!(
        identity.allowed_routes(),
        &allowed_routes(Role::Student, UnknownRolePolicy::Student)
    );
}

#[test]
fn test_unknown_role_denied_when_configured() {
    let identity = map_identity(
        Some(record(serde_json::json!({ "id": "3", "role": "moderator" }))),
        UnknownRolePolicy::Deny,
    )
    .unwrap();

    assert!(identity.allowed_routes().is_empty());
}

#[test]
fn test_identity_serializes_allowed_routes() {
    let identity = map_identity(
        Some(record(serde_json::json!({ "id": "1", "role": "tutor" }))),
        UnknownRolePolicy::Student,
    )
    .unwrap();

    let value = serde_json::to_value(&identity).unwrap();
    assert_eq!(value["role"], "tutor");
    assert_eq!(
        value["allowedRoutes"],
        serde_json::json!(["documents", "profile", "create-exam", "planner"])
    );
}
