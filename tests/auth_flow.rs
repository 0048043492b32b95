use anyhow::Result;
use internhub::access::{paths, Navigation, RouteTable};
use internhub::auth::{
    camera::StaticCamera, AuthFlow, BackendError, CapturedImage, Completion, Credentials,
    HttpBackend, LoginCredentials, Notification, RegistrationDetails, Status, Step,
};
use internhub::session::{FileStore, Role, SessionStore};
use secrecy::ExposeSecret;
use serde_json::json;
use std::{net::TcpListener, time::Duration};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EMAIL: &str = "a@b.com";
const PASSWORD: &str = "Aa1!aaaa";

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn still() -> CapturedImage {
    CapturedImage::from_bytes("image/jpeg", &[0xFF, 0xD8, 0xFF, 0xE0])
}

fn backend(server: &MockServer) -> Result<HttpBackend> {
    Ok(HttpBackend::new(&server.uri(), Duration::from_secs(5))?)
}

fn confirmed_login() -> Result<AuthFlow<StaticCamera>> {
    let mut flow = AuthFlow::login(
        StaticCamera::new(still()),
        LoginCredentials::new(EMAIL, PASSWORD),
    );
    flow.submit_credentials()?;
    flow.capture()?;
    Ok(flow)
}

fn confirmed_registration() -> Result<AuthFlow<StaticCamera>> {
    let details = RegistrationDetails {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        password: PASSWORD.to_string(),
        role: Role::Hr,
    };
    let mut flow = AuthFlow::register(StaticCamera::new(still()), details);
    flow.submit_credentials()?;
    flow.capture()?;
    Ok(flow)
}

#[tokio::test]
async fn login_success_persists_session_and_routes_by_role() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_partial_json(json!({
            "email": EMAIL,
            "password": PASSWORD,
            "image": still().as_str(),
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "xyz",
            "role": "hr"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let sessions = SessionStore::new(FileStore::new(dir.path().join("session.json")));
    let mut flow = confirmed_login()?;

    let completion = flow.submit(&backend(&server)?, &sessions).await?;
    assert_eq!(completion, Completion::Navigate(paths::HR_DASHBOARD));
    assert_eq!(flow.status(), Status::Succeeded);

    // A fresh store over the same file sees the session, as after a reload.
    let reloaded = SessionStore::new(FileStore::new(dir.path().join("session.json")));
    let session = reloaded.get()?;
    assert_eq!(
        session.token.as_ref().map(|token| token.expose_secret().to_string()),
        Some("xyz".to_string())
    );
    assert_eq!(session.known_role(), Some(Role::Hr));

    let routes = RouteTable::standard()?;
    assert_eq!(
        routes.navigate(paths::HR_DASHBOARD, &session),
        Navigation::Render(paths::HR_DASHBOARD.to_string())
    );
    Ok(())
}

#[tokio::test]
async fn login_without_role_lands_on_student_dashboard() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "xyz" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let sessions = SessionStore::new(FileStore::new(dir.path().join("session.json")));
    let mut flow = confirmed_login()?;

    let completion = flow.submit(&backend(&server)?, &sessions).await?;
    assert_eq!(completion, Completion::Navigate(paths::STUDENT_DASHBOARD));
    assert_eq!(flow.status(), Status::Succeeded);

    let session = sessions.get()?;
    assert_eq!(
        session.token.as_ref().map(|token| token.expose_secret().to_string()),
        Some("xyz".to_string())
    );
    assert!(session.role.is_none());
    Ok(())
}

#[tokio::test]
async fn login_rejection_keeps_confirm_step() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let sessions = SessionStore::new(FileStore::new(dir.path().join("session.json")));
    let mut flow = confirmed_login()?;

    let completion = flow.submit(&backend(&server)?, &sessions).await?;

    assert_eq!(completion, Completion::Failed);
    assert_eq!(flow.status(), Status::Failed);
    assert_eq!(flow.step(), &Step::Confirm { image: still() });
    assert_eq!(
        flow.credentials(),
        &Credentials::Login(LoginCredentials::new(EMAIL, PASSWORD))
    );
    assert_eq!(flow.take_notifications(), vec![Notification::login_failed()]);

    let session = sessions.get()?;
    assert!(session.token.is_none());
    assert!(session.role.is_none());
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_fails_without_session() -> Result<()> {
    // Nothing listens on the port once the listener is dropped.
    let port = match TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => listener.local_addr()?.port(),
        Err(_) => {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
    };
    let backend = HttpBackend::new(&format!("http://127.0.0.1:{port}"), Duration::from_secs(2))?;
    let dir = tempfile::tempdir()?;
    let sessions = SessionStore::new(FileStore::new(dir.path().join("session.json")));
    let mut flow = confirmed_login()?;

    assert_eq!(flow.submit(&backend, &sessions).await?, Completion::Failed);
    assert!(!sessions.get()?.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn registration_success_redirects_to_login() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/register"))
        .and(body_partial_json(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "role": "hr",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "User registered successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let sessions = SessionStore::new(FileStore::new(dir.path().join("session.json")));
    let mut flow = confirmed_registration()?;

    let completion = flow.submit(&backend(&server)?, &sessions).await?;

    assert_eq!(completion, Completion::Navigate(paths::LOGIN));
    assert_eq!(
        flow.take_notifications(),
        vec![Notification::registration_succeeded()]
    );
    assert!(!sessions.get()?.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn registration_errors_map_to_specific_messages() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }

    let cases = [
        (400, json!({ "error": "Email already exists" }), BackendError::EmailExists),
        (
            409,
            json!({ "error": "Face already registered" }),
            BackendError::FaceAlreadyRegistered,
        ),
        (
            500,
            json!({ "error": "database unavailable" }),
            BackendError::Rejected {
                status: 500,
                message: "database unavailable".to_string(),
            },
        ),
    ];

    for (status, body, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/register"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir()?;
        let sessions = SessionStore::new(FileStore::new(dir.path().join("session.json")));
        let mut flow = confirmed_registration()?;

        let completion = flow.submit(&backend(&server)?, &sessions).await?;

        assert_eq!(completion, Completion::Failed);
        assert!(matches!(flow.step(), Step::Confirm { .. }));
        assert_eq!(
            flow.take_notifications(),
            vec![Notification::registration_failed(&expected)]
        );
    }
    Ok(())
}
