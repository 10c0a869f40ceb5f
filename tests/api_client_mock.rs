//! API Client Mock Tests
//!
//! Tests for the CloudClient HTTP methods using wiremock. Every test starts a
//! mock server, points the client at it through `ClientConfig::with_base_url`
//! and checks the request it sends plus the value or error it returns.

use bambu_cloud::{
    ClientConfig, CloudClient, CloudError, LoginError, Region, RequestError, Token,
    ValidationError,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn mint_jwt(claims: Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"server-side-secret"),
    )
    .unwrap()
}

fn client_for(mock_server: &MockServer, jwt: &str) -> CloudClient {
    let token = Token::try_from(jwt).unwrap();
    CloudClient::from_token(
        token,
        Region::NorthAmerica,
        ClientConfig::new().with_base_url(mock_server.uri()),
    )
    .unwrap()
}

fn task_json(id: i64, device_id: &str) -> Value {
    json!({
        "id": id,
        "designId": 0,
        "designTitle": "Benchy",
        "instanceId": 11,
        "modelId": "US1234",
        "title": "benchy.3mf",
        "cover": "https://public-cdn.bblmw.com/cover.png",
        "status": 2,
        "feedbackStatus": 0,
        "startTime": "2024-01-21T13:01:23Z",
        "endTime": "2024-01-21T14:11:03Z",
        "weight": 12.51,
        "length": 420,
        "costTime": 4180,
        "profileId": 0,
        "plateIndex": 1,
        "plateName": "",
        "deviceId": device_id,
        "amsDetailMapping": [{
            "position": 1,
            "sourceColor": "FFFFFFFF",
            "targetColor": "FFFFFFFF",
            "filamentId": "GFA00",
            "filamentType": "PLA",
            "targetFilamentType": "PLA",
            "weight": 12.51
        }],
        "mode": "cloud_file",
        "isPublicProfile": false,
        "isPrintable": true,
        "deviceModel": "X1C",
        "deviceName": "Workshop X1C",
        "bedType": "textured_plate"
    })
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let mock_server = MockServer::start().await;
    let jwt = mint_jwt(json!({"username": "u_12345"}));

    Mock::given(method("POST"))
        .and(path("/user-service/user/login"))
        .and(body_json(json!({"account": "me@example.com", "password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": jwt,
            "refreshToken": "ignored",
            "loginType": ""
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = CloudClient::login_with_config(
        "me@example.com",
        "hunter2",
        Region::Europe,
        ClientConfig::new().with_base_url(mock_server.uri()),
    )
    .await
    .unwrap();

    assert_eq!(client.username(), "u_12345");
    assert_eq!(client.token().jwt(), jwt);
    assert_eq!(client.region(), Region::Europe);
    client.close();
}

#[tokio::test]
async fn test_login_missing_access_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user-service/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = CloudClient::login_with_config(
        "me@example.com",
        "wrong",
        Region::NorthAmerica,
        ClientConfig::new().with_base_url(mock_server.uri()),
    )
    .await;

    match result {
        Err(LoginError::InvalidResponse(err)) => {
            assert_eq!(err.field_paths(), vec!["accessToken"]);
        }
        other => panic!("expected invalid response, got {:?}", other.map(|c| c.username().to_string())),
    }
}

#[tokio::test]
async fn test_login_token_without_username() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user-service/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": mint_jwt(json!({"sub": "42"}))
        })))
        .mount(&mock_server)
        .await;

    let result = CloudClient::login_with_config(
        "me@example.com",
        "hunter2",
        Region::NorthAmerica,
        ClientConfig::new().with_base_url(mock_server.uri()),
    )
    .await;

    assert!(matches!(result, Err(LoginError::Token(_))));
}

#[tokio::test]
async fn test_login_http_failure_is_login_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user-service/user/login"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad credentials"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = CloudClient::login_with_config(
        "me@example.com",
        "hunter2",
        Region::NorthAmerica,
        ClientConfig::new().with_base_url(mock_server.uri()),
    )
    .await;

    match result {
        Err(LoginError::Request(err)) => {
            assert_eq!(err.status(), Some(400));
            assert!(err.to_string().contains("bad credentials"));
        }
        _ => panic!("expected login request error"),
    }
}

#[tokio::test]
async fn test_login_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user-service/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let result = CloudClient::login_with_config(
        "me@example.com",
        "hunter2",
        Region::NorthAmerica,
        ClientConfig::new().with_base_url(mock_server.uri()),
    )
    .await;

    assert!(matches!(result, Err(LoginError::Request(RequestError::Parse(_)))));
}

// ============================================================================
// Profile Tests
// ============================================================================

#[tokio::test]
async fn test_get_profile_success() {
    let mock_server = MockServer::start().await;
    let jwt = mint_jwt(json!({"username": "u_1"}));

    Mock::given(method("GET"))
        .and(path("/user-service/my/profile"))
        .and(header("Authorization", format!("Bearer {}", jwt).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uid": 1,
            "uidStr": "1",
            "account": "me@example.com",
            "name": "Maker",
            "avatar": "https://public-cdn.bblmw.com/avatar.png",
            "fanCount": 3,
            "followCount": 4,
            "identifier": 77,
            "likeCount": 5,
            "collectionCount": 6,
            "downloadCount": 7,
            "productModels": ["X1C", "P1S"],
            "personal": {
                "bio": "prints things",
                "links": ["https://example.com/me"],
                "taskWeightSum": 1234.5,
                "taskLengthSum": 400000,
                "taskTimeSum": 360000,
                "backgroundUrl": "https://public-cdn.bblmw.com/bg.png"
            },
            "isNSFWShown": 0,
            "myLikeCount": 8,
            "favoritesCount": 9,
            "defaultLicense": "BY-NC-SA",
            "point": 250
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, &jwt);
    let account = client.get_profile().await.unwrap();

    assert_eq!(account.uid, 1);
    assert_eq!(account.name, "Maker");
    assert_eq!(account.product_models, vec!["X1C", "P1S"]);
    assert_eq!(account.personal.task_weight_sum, 1234.5);
    assert!(!account.nsfw_shown());
    assert_eq!(account.point, 250);
}

#[tokio::test]
async fn test_get_profile_reports_every_bad_field() {
    let mock_server = MockServer::start().await;
    let jwt = mint_jwt(json!({"username": "u_1"}));

    Mock::given(method("GET"))
        .and(path("/user-service/my/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uid": "one"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, &jwt);
    let error = client.get_profile().await.unwrap_err();

    match error {
        CloudError::Validation(ValidationError::Multiple(errors)) => {
            assert!(errors.len() > 10);
        }
        other => panic!("expected validation error, got {}", other),
    }
}

// ============================================================================
// Device Tests
// ============================================================================

#[tokio::test]
async fn test_get_devices_success() {
    let mock_server = MockServer::start().await;
    let jwt = mint_jwt(json!({"username": "u_1"}));

    Mock::given(method("GET"))
        .and(path("/iot-service/api/user/bind"))
        .and(header("Authorization", format!("Bearer {}", jwt).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "success",
            "code": null,
            "error": null,
            "devices": [{
                "dev_id": "01S00C123456789",
                "name": "Workshop X1C",
                "online": true,
                "print_status": "ACTIVE",
                "dev_model_name": "BL-P001",
                "dev_product_name": "X1 Carbon",
                "dev_access_code": "12345678",
                "nozzle_diameter": 0.4
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, &jwt);
    let devices = client.get_devices().await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].dev_id, "01S00C123456789");
    assert!(devices[0].online);
    assert_eq!(devices[0].nozzle_diameter, 0.4);
}

#[tokio::test]
async fn test_get_devices_empty_list() {
    let mock_server = MockServer::start().await;
    let jwt = mint_jwt(json!({"username": "u_1"}));

    Mock::given(method("GET"))
        .and(path("/iot-service/api/user/bind"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"devices": []})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, &jwt);
    let devices = client.get_devices().await.unwrap();
    assert!(devices.is_empty());
}

#[tokio::test]
async fn test_unauthorized_is_request_error_without_retry() {
    let mock_server = MockServer::start().await;
    let jwt = mint_jwt(json!({"username": "u_1"}));

    Mock::given(method("GET"))
        .and(path("/iot-service/api/user/bind"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, &jwt);
    let error = client.get_devices().await.unwrap_err();

    match error {
        CloudError::Request(err) => {
            assert_eq!(err.status(), Some(401));
            assert!(err.to_string().contains("401"));
        }
        other => panic!("expected request error, got {}", other),
    }
}

#[tokio::test]
async fn test_unauthorized_profile_and_tasks_without_retry() {
    let mock_server = MockServer::start().await;
    let jwt = mint_jwt(json!({"username": "u_1"}));

    Mock::given(method("GET"))
        .and(path("/user-service/my/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user-service/my/tasks"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, &jwt);

    match client.get_profile().await.unwrap_err() {
        CloudError::Request(RequestError::Http { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "token expired");
        }
        other => panic!("expected HTTP 401, got {}", other),
    }

    match client.get_tasks(Some("dev123")).await.unwrap_err() {
        CloudError::Request(err) => assert_eq!(err.status(), Some(401)),
        other => panic!("expected request error, got {}", other),
    }
}

// ============================================================================
// Task Tests
// ============================================================================

#[tokio::test]
async fn test_get_tasks_without_device_filter() {
    let mock_server = MockServer::start().await;
    let jwt = mint_jwt(json!({"username": "u_1"}));

    Mock::given(method("GET"))
        .and(path("/user-service/my/tasks"))
        .and(query_param("limit", "500"))
        .and(query_param("deviceId", ""))
        .and(header("Authorization", format!("Bearer {}", jwt).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "hits": [task_json(1, "dev-a"), task_json(2, "dev-b")]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, &jwt);
    let tasks = client.get_tasks(None).await.unwrap();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, 1);
    assert_eq!(tasks[1].device_id, "dev-b");
    assert_eq!(tasks[0].ams_detail_mapping[0].position, 1);
    assert_eq!(tasks[0].cost_time, 4180);
}

#[tokio::test]
async fn test_get_tasks_with_device_filter() {
    let mock_server = MockServer::start().await;
    let jwt = mint_jwt(json!({"username": "u_1"}));

    Mock::given(method("GET"))
        .and(path("/user-service/my/tasks"))
        .and(query_param("limit", "500"))
        .and(query_param("deviceId", "dev123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 734,
            "hits": [task_json(9, "dev123")]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, &jwt);
    let page = client.get_task_page(Some("dev123")).await.unwrap();

    assert_eq!(page.total, 734);
    assert_eq!(page.hits.len(), 1);
    assert_eq!(page.hits[0].device_id, "dev123");
}

#[tokio::test]
async fn test_get_tasks_missing_ams_mapping() {
    let mock_server = MockServer::start().await;
    let jwt = mint_jwt(json!({"username": "u_1"}));

    let mut broken = task_json(3, "dev-a");
    broken.as_object_mut().unwrap().remove("amsDetailMapping");

    Mock::given(method("GET"))
        .and(path("/user-service/my/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "hits": [task_json(1, "dev-a"), broken]
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, &jwt);
    let error = client.get_tasks(None).await.unwrap_err();

    match error {
        CloudError::Validation(err) => {
            assert_eq!(err.field_paths(), vec!["hits[1].amsDetailMapping"]);
        }
        other => panic!("expected validation error, got {}", other),
    }
}

// ============================================================================
// Camera URL Tests
// ============================================================================

fn device_json() -> Value {
    json!({
        "dev_id": "01P00A000000001",
        "name": "Garage P1P",
        "online": false,
        "print_status": "IDLE",
        "dev_model_name": "C11",
        "dev_product_name": "P1P",
        "dev_access_code": "87654321",
        "nozzle_diameter": 0.4
    })
}

#[tokio::test]
async fn test_camera_url_success() {
    let mock_server = MockServer::start().await;
    let jwt = mint_jwt(json!({"username": "u_777"}));

    Mock::given(method("POST"))
        .and(path("/iot-service/api/user/ttcode"))
        .and(header("Authorization", format!("Bearer {}", jwt).as_str()))
        .and(header("user-id", "u_777"))
        .and(body_json(json!({"dev_id": "01P00A000000001"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ttcode": "T1",
            "authkey": "A1",
            "passwd": "P1",
            "region": "NA"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, &jwt);
    let device: bambu_cloud::Device =
        bambu_cloud::validation::decode(&device_json()).unwrap();

    let url = client.camera_url(&device).await.unwrap();
    assert_eq!(url.as_str(), "bambu://T1?authkey=A1&passwd=P1&region=NA");
}

#[tokio::test]
async fn test_camera_url_missing_authkey() {
    let mock_server = MockServer::start().await;
    let jwt = mint_jwt(json!({"username": "u_777"}));

    Mock::given(method("POST"))
        .and(path("/iot-service/api/user/ttcode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ttcode": "T1",
            "passwd": "P1",
            "region": "NA"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, &jwt);
    let device: bambu_cloud::Device =
        bambu_cloud::validation::decode(&device_json()).unwrap();

    let error = device.camera_url(&client).await.unwrap_err();
    match error {
        CloudError::Validation(err) => assert_eq!(err.field_paths(), vec!["authkey"]),
        other => panic!("expected validation error, got {}", other),
    }
}

#[tokio::test]
async fn test_camera_url_http_failure() {
    let mock_server = MockServer::start().await;
    let jwt = mint_jwt(json!({"username": "u_777"}));

    Mock::given(method("POST"))
        .and(path("/iot-service/api/user/ttcode"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, &jwt);
    let device: bambu_cloud::Device =
        bambu_cloud::validation::decode(&device_json()).unwrap();

    let error = device.camera_url(&client).await.unwrap_err();
    assert!(matches!(
        error,
        CloudError::Request(RequestError::Http { status: 403, .. })
    ));
}
