use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use parley_voice::{LiveKitConfig, VoiceError, VoiceService, DEFAULT_LIVEKIT_URL};
use serde::Deserialize;

const DEFAULT_KEY: &str = "devkey";
const DEFAULT_SECRET: &str = "secret";

#[derive(Deserialize)]
struct Claims {
    sub: String,
    name: String,
    exp: u64,
    nbf: u64,
    video: VideoClaims,
}

#[derive(Deserialize)]
struct VideoClaims {
    room: String,
    #[serde(rename = "roomJoin")]
    room_join: bool,
    #[serde(rename = "canPublish")]
    can_publish: bool,
    #[serde(rename = "canSubscribe")]
    can_subscribe: bool,
}

fn decode_claims(token: &str) -> Claims {
    let validation = Validation::new(Algorithm::HS256);
    let key = DecodingKey::from_secret(DEFAULT_SECRET.as_bytes());
    decode::<Claims>(token, &key, &validation)
        .expect("Failed to decode token")
        .claims
}

#[test]
fn test_issue_token_grants() {
    let config = LiveKitConfig::new("wss://voice.example.com", DEFAULT_KEY, DEFAULT_SECRET);
    let service = VoiceService::new(config);

    let credential = service
        .issue_token("room1", "alice")
        .expect("Failed to issue token");

    assert_eq!(credential.url, "wss://voice.example.com");

    let claims = decode_claims(&credential.token);
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.name, "alice");
    assert_eq!(claims.video.room, "room1");
    assert!(claims.video.room_join, "roomJoin should be true");
    assert!(claims.video.can_publish, "canPublish should be true");
    assert!(claims.video.can_subscribe, "canSubscribe should be true");
}

#[test]
fn test_token_ttl_defaults_to_one_hour() {
    let service = VoiceService::new(LiveKitConfig::new(
        DEFAULT_LIVEKIT_URL,
        DEFAULT_KEY,
        DEFAULT_SECRET,
    ));

    let credential = service.issue_token("room1", "alice").unwrap();
    let claims = decode_claims(&credential.token);
    assert_eq!(claims.exp - claims.nbf, 3600);
}

#[test]
fn test_token_ttl_is_configurable() {
    let mut config = LiveKitConfig::new(DEFAULT_LIVEKIT_URL, DEFAULT_KEY, DEFAULT_SECRET);
    config.token_ttl_seconds = 120;
    let service = VoiceService::new(config);

    let credential = service.issue_token("room1", "alice").unwrap();
    let claims = decode_claims(&credential.token);
    assert_eq!(claims.exp - claims.nbf, 120);
}

#[test]
fn test_issue_token_without_credentials() {
    let service = VoiceService::new(LiveKitConfig::default());
    assert!(!service.is_configured());

    match service.issue_token("room1", "alice") {
        Err(VoiceError::NotConfigured(what)) => assert!(what.contains("LiveKit")),
        other => panic!("Expected NotConfigured error, got {:?}", other),
    }

    // A key without a secret cannot sign either.
    let service = VoiceService::new(LiveKitConfig::new(DEFAULT_LIVEKIT_URL, DEFAULT_KEY, ""));
    assert!(matches!(
        service.issue_token("room1", "alice"),
        Err(VoiceError::NotConfigured(_))
    ));
}

#[test]
fn test_token_signed_with_other_secret_is_rejected() {
    let service = VoiceService::new(LiveKitConfig::new(
        DEFAULT_LIVEKIT_URL,
        DEFAULT_KEY,
        "another-secret",
    ));
    let credential = service.issue_token("room1", "alice").unwrap();

    let validation = Validation::new(Algorithm::HS256);
    let key = DecodingKey::from_secret(DEFAULT_SECRET.as_bytes());
    assert!(decode::<Claims>(&credential.token, &key, &validation).is_err());
}

#[test]
fn test_livekit_config_from_toml() {
    let toml_str = r#"
        url = "wss://lk.example.com"
        api_key = "key"
        api_secret = "secret"
        token_ttl_seconds = 600
    "#;

    let config: LiveKitConfig = toml::from_str(toml_str).expect("parse TOML");
    assert_eq!(config.url, "wss://lk.example.com");
    assert_eq!(config.token_ttl_seconds, 600);
    assert!(config.has_credentials());
}

#[test]
fn test_livekit_config_without_fields_uses_defaults() {
    let config: LiveKitConfig = toml::from_str("").expect("parse TOML");
    assert_eq!(config.url, DEFAULT_LIVEKIT_URL);
    assert_eq!(config.token_ttl_seconds, 3600);
    assert!(!config.has_credentials());
}
