use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Value};
use wander_rs::{
    core::ItineraryRequest, AppState, GatewayConfig, GeminiGateway, GenerationError,
    GenerationGateway, StateController, UserPreferences,
};

const TEXT_PATH: &str = "/models/text-model:generateContent";
const IMAGE_PATH: &str = "/models/image-model:generateContent";

fn gateway(server: &ServerGuard) -> GeminiGateway {
    gateway_with_retries(server, 0)
}

fn gateway_with_retries(server: &ServerGuard, max_retries: usize) -> GeminiGateway {
    let config = GatewayConfig::new("test-key")
        .with_base_url(server.url())
        .with_text_model("text-model")
        .with_image_model("image-model")
        .with_max_retries(max_retries);
    GeminiGateway::new(config).unwrap()
}

fn itinerary_json() -> Value {
    json!({
        "destination_name": "东京",
        "trip_title": "东京三日游",
        "summary": "寺庙与美食",
        "packing_list": ["护照", "转换插头"],
        "budget_breakdown": [
            { "category": "住宿", "amount": 2000 },
            { "category": "餐饮", "amount": 800 },
            { "category": "交通", "amount": 300 }
        ],
        "days": [{
            "day_number": 1,
            "theme": "浅草与上野",
            "activities": [
                {
                    "time": "09:00",
                    "activity": "浅草寺",
                    "description": "参观",
                    "location": "浅草"
                },
                {
                    "time": "14:00",
                    "activity": "上野公园",
                    "description": "散步",
                    "location": "上野"
                }
            ]
        }]
    })
}

fn text_reply(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

fn image_reply() -> String {
    json!({
        "candidates": [{
            "content": { "parts": [
                { "text": "Here is your picture" },
                { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } }
            ]}
        }]
    })
    .to_string()
}

fn request() -> ItineraryRequest {
    ItineraryRequest::from(&UserPreferences::new("东京", 3).with_interests(["美食探店"]))
}

#[tokio::test]
async fn test_itinerary_request_and_parse() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", TEXT_PATH)
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::PartialJson(json!({
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": { "type": "OBJECT" }
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(text_reply(&itinerary_json().to_string()))
        .create_async()
        .await;

    let itinerary = gateway(&server).generate_itinerary(&request()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(itinerary.trip_title, "东京三日游");
    assert_eq!(itinerary.budget_total(), 3100.0);
    assert_eq!(itinerary.days[0].activities[1].activity, "上野公园");
}

#[tokio::test]
async fn test_fenced_json_is_accepted() {
    let mut server = Server::new_async().await;
    let fenced = format!("```json\n{}\n```", itinerary_json());
    server
        .mock("POST", TEXT_PATH)
        .with_status(200)
        .with_body(text_reply(&fenced))
        .create_async()
        .await;

    let itinerary = gateway(&server).generate_itinerary(&request()).await.unwrap();
    assert_eq!(itinerary.destination_name, "东京");
}

#[tokio::test]
async fn test_empty_text_is_generation_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", TEXT_PATH)
        .with_status(200)
        .with_body(text_reply("  "))
        .create_async()
        .await;

    let err = gateway(&server)
        .generate_itinerary(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::EmptyResponse));
}

#[tokio::test]
async fn test_wrong_typed_element_is_rejected() {
    let mut payload = itinerary_json();
    payload["days"][0]["activities"][1]["location"] = json!(null);

    let mut server = Server::new_async().await;
    server
        .mock("POST", TEXT_PATH)
        .with_status(200)
        .with_body(text_reply(&payload.to_string()))
        .create_async()
        .await;

    let err = gateway(&server)
        .generate_itinerary(&request())
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_blocked_prompt() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", TEXT_PATH)
        .with_status(200)
        .with_body(json!({ "promptFeedback": { "blockReason": "SAFETY" } }).to_string())
        .create_async()
        .await;

    let err = gateway(&server)
        .generate_itinerary(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Blocked(_)));
}

#[tokio::test]
async fn test_api_error_carries_service_message() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", TEXT_PATH)
        .with_status(400)
        .with_body(json!({ "error": { "code": 400, "message": "API key not valid" } }).to_string())
        .create_async()
        .await;

    let err = gateway(&server)
        .generate_itinerary(&request())
        .await
        .unwrap_err();
    match err {
        GenerationError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_no_retry_by_default() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", TEXT_PATH)
        .with_status(429)
        .with_header("retry-after", "0")
        .expect(1)
        .create_async()
        .await;

    let err = gateway(&server)
        .generate_itinerary(&request())
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, GenerationError::RateLimit { .. }));
}

#[tokio::test]
async fn test_configured_retries_on_server_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", TEXT_PATH)
        .with_status(503)
        .with_body("overloaded")
        .expect(2)
        .create_async()
        .await;

    let err = gateway_with_retries(&server, 1)
        .generate_itinerary(&request())
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, GenerationError::Api { status: 503, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_hero_image_inline_data() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", IMAGE_PATH)
        .match_body(Matcher::Regex("东京三日游 travel vibes".to_string()))
        .with_status(200)
        .with_body(image_reply())
        .create_async()
        .await;

    let image = gateway(&server)
        .generate_hero_image("东京", "东京三日游 travel vibes")
        .await
        .unwrap();
    assert_eq!(image.mime_type, "image/png");
    assert_eq!(image.data_uri(), "data:image/png;base64,iVBORw0KGgo=");
}

#[tokio::test]
async fn test_hero_image_without_inline_part_is_unavailable() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", IMAGE_PATH)
        .with_status(200)
        .with_body(text_reply("sorry, no image"))
        .create_async()
        .await;

    assert!(gateway(&server)
        .generate_hero_image("东京", "vibes")
        .await
        .is_err());
}

#[tokio::test]
async fn test_cycle_reaches_display_when_hero_image_fails() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", TEXT_PATH)
        .with_status(200)
        .with_body(text_reply(&itinerary_json().to_string()))
        .create_async()
        .await;
    let image_mock = server
        .mock("POST", IMAGE_PATH)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let gateway = gateway(&server);
    let mut controller = StateController::new();
    let state = controller
        .run(&gateway, &UserPreferences::new("东京", 3))
        .await
        .unwrap();

    image_mock.assert_async().await;
    let trip = state.trip().expect("display state");
    assert_eq!(trip.itinerary.trip_title, "东京三日游");
    assert!(trip.hero_image.is_none());
}

#[tokio::test]
async fn test_cycle_reaches_error_when_itinerary_fails() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", TEXT_PATH)
        .with_status(500)
        .with_body("internal")
        .create_async()
        .await;
    let image_mock = server
        .mock("POST", IMAGE_PATH)
        .expect(0)
        .create_async()
        .await;

    let gateway = gateway(&server);
    let mut controller = StateController::new();
    let state = controller
        .run(&gateway, &UserPreferences::new("东京", 3))
        .await
        .unwrap();

    image_mock.assert_async().await;
    assert!(matches!(state, AppState::Error { message } if !message.is_empty()));
}
