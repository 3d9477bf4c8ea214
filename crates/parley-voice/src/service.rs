use crate::config::LiveKitConfig;
use crate::error::VoiceError;
use livekit_api::access_token::{AccessToken, VideoGrants};
use parley_types::Credential;
use std::time::Duration;

/// Mints LiveKit room-access tokens. Signing is local; no LiveKit server
/// is contacted.
#[derive(Debug, Clone)]
pub struct VoiceService {
    config: LiveKitConfig,
}

impl VoiceService {
    pub fn new(config: LiveKitConfig) -> Self {
        Self { config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.has_credentials()
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.config.token_ttl_seconds)
    }

    /// Issues a credential for `participant_name` to join `room_name`.
    ///
    /// The participant name doubles as the LiveKit identity.
    pub fn issue_token(
        &self,
        room_name: &str,
        participant_name: &str,
    ) -> Result<Credential, VoiceError> {
        if !self.is_configured() {
            return Err(VoiceError::NotConfigured("LiveKit credentials".to_string()));
        }

        let token = self.generate_join_token(room_name, participant_name, participant_name)?;

        Ok(Credential {
            token,
            url: self.config.url.clone(),
        })
    }

    pub fn generate_join_token(
        &self,
        room_name: &str,
        participant_identity: &str,
        participant_name: &str,
    ) -> Result<String, VoiceError> {
        let token = AccessToken::with_api_key(&self.config.api_key, &self.config.api_secret)
            .with_identity(participant_identity)
            .with_name(participant_name)
            .with_grants(VideoGrants {
                room_join: true,
                room: room_name.to_string(),
                can_publish: true,
                can_subscribe: true,
                ..Default::default()
            })
            .with_ttl(self.token_ttl());

        token.to_jwt().map_err(VoiceError::LiveKit)
    }
}
