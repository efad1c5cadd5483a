use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use workzen_core::{
    open_store, AttendanceService, EmployeePatch, EmployeeService, ErrorKind, NewEmployee,
    StoreError,
};

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn new_employee(email: &str) -> NewEmployee {
    NewEmployee {
        name: "Emma Johnson".to_string(),
        email: email.to_string(),
        department: "Engineering".to_string(),
        ..NewEmployee::default()
    }
}

#[test]
fn open_creates_empty_document_on_first_use() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("users.json");

    let store = open_store(&path).unwrap();
    assert!(path.exists());
    assert_eq!(store.snapshot().unwrap().version, 0);

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.ends_with('\n'));
    let value: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["employees"], json!([]));
    assert_eq!(value["users"], json!([]));
}

#[test]
fn committed_changes_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");

    let id = {
        let store = open_store(&path).unwrap();
        let employee = EmployeeService::new(&store)
            .create_employee(new_employee("emma@workzen.com"), Some("pw"))
            .unwrap();
        AttendanceService::new(&store)
            .check_in(&employee.id, "2024-05-01T09:00:00Z")
            .unwrap();
        employee.id
    };

    let reopened = open_store(&path).unwrap();
    let doc = reopened.snapshot().unwrap();
    assert_eq!(doc.version, 2);
    assert_eq!(doc.users.len(), 1);
    let employee = EmployeeService::new(&reopened).get_employee(&id).unwrap();
    assert_eq!(employee.check_in_time.as_deref(), Some("2024-05-01T09:00:00Z"));

    let value = read_json(&path);
    assert_eq!(value["version"], json!(2));
    assert_eq!(value["employees"][0]["status"], json!("present"));
    assert_eq!(value["employees"][0]["checkOutTime"], Value::Null);
    assert_eq!(value["users"][0]["loginId"], json!(id));
}

#[test]
fn unparseable_file_is_fatal_and_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");
    fs::write(&path, "not json at all").unwrap();

    let err = open_store(&path).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), "not json at all");
}

#[test]
fn corruption_after_open_fails_commands_without_overwriting() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");
    let store = open_store(&path).unwrap();
    fs::write(&path, "{\"employees\": [").unwrap();

    let err = EmployeeService::new(&store)
        .create_employee(new_employee("emma@workzen.com"), None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CorruptStore);
    assert!(err.is_fatal());
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"employees\": [");
}

#[test]
fn legacy_document_without_version_or_users_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");
    fs::write(
        &path,
        r#"{"employees": [{"id": "1", "name": "David Smith", "email": "david@workzen.com", "role": "Employee", "status": "checked-out", "checkInTime": "09:00 AM", "checkOutTime": "05:00 PM"}]}"#,
    )
    .unwrap();

    let store = open_store(&path).unwrap();
    let doc = store.snapshot().unwrap();
    assert_eq!(doc.version, 0);
    assert!(doc.users.is_empty());
    assert_eq!(doc.employees[0].check_in_time.as_deref(), Some("09:00 AM"));

    AttendanceService::new(&store)
        .check_in("1", "2024-05-01T09:00:00Z")
        .unwrap();
    let value = read_json(&path);
    assert_eq!(value["version"], json!(1));
    assert_eq!(value["users"], json!([]));
}

#[test]
fn unknown_record_keys_survive_updates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");
    fs::write(
        &path,
        r#"{
  "version": 4,
  "employees": [
    {"id": "1", "name": "David Smith", "email": "david@workzen.com", "role": "Employee",
     "status": "absent", "leaveBalance": {"annual": 12}}
  ],
  "users": [],
  "settings": {"theme": "dark"}
}"#,
    )
    .unwrap();

    let store = open_store(&path).unwrap();
    let patch = EmployeePatch {
        position: Some("Lead".to_string()),
        ..EmployeePatch::default()
    };
    EmployeeService::new(&store).update_employee("1", &patch).unwrap();

    let value = read_json(&path);
    assert_eq!(value["version"], json!(5));
    assert_eq!(value["employees"][0]["position"], json!("Lead"));
    assert_eq!(value["employees"][0]["leaveBalance"], json!({"annual": 12}));
    assert_eq!(value["settings"], json!({"theme": "dark"}));
}

#[test]
fn failed_command_leaves_file_bytes_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");
    let store = open_store(&path).unwrap();
    let service = EmployeeService::new(&store);
    service
        .create_employee(new_employee("emma@workzen.com"), None)
        .unwrap();
    let before = fs::read(&path).unwrap();

    let err = service
        .create_employee(new_employee("emma@workzen.com"), None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateEmail);
    let err = service
        .update_employee("missing", &EmployeePatch::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn empty_update_accepts_record_predating_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");
    fs::write(
        &path,
        r#"{"employees":[{"id":"e1","name":"Root","email":"root@localhost","status":"absent"}],"users":[]}"#,
    )
    .unwrap();
    let store = open_store(&path).unwrap();
    let before = fs::read(&path).unwrap();

    let employee = EmployeeService::new(&store)
        .update_employee("e1", &EmployeePatch::default())
        .unwrap();
    assert_eq!(employee.email, "root@localhost");
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn whole_salaries_keep_integer_form_on_rewrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");
    fs::write(
        &path,
        r#"{"employees":[
  {"id":"1","name":"David Smith","email":"david@workzen.com","status":"absent","salary":50000},
  {"id":"2","name":"Sarah Lee","email":"sarah@workzen.com","status":"absent","salary":4250.5}
],"users":[]}"#,
    )
    .unwrap();

    let store = open_store(&path).unwrap();
    EmployeeService::new(&store)
        .create_employee(new_employee("emma@workzen.com"), None)
        .unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"salary\": 50000,"));
    assert!(!raw.contains("50000.0"));
    let value = read_json(&path);
    assert_eq!(value["employees"][0]["salary"], json!(50000));
    assert_eq!(value["employees"][1]["salary"], json!(4250.5));
}
