//! Session and selection store.
//!
//! Holds the bearer token, the cached profile and the user's season, shift and report
//! selections. Every setter mirrors its key to a [`KeyValueStore`] so the state survives a
//! restart. The backend stays authoritative: storage failures are logged and never turn
//! into command errors, and unreadable values load as absent.

use crate::{
    api::ClubApi,
    core::{selection::ShiftSelection, storage::KeyValueStore},
    errors::{Result, ValidationError},
    models::{Credentials, Season, User},
};
use serde::{Serialize, de::DeserializeOwned};
use std::{fmt, sync::Arc};
use tracing::{info, warn};

const TOKEN_KEY: &str = "token";
const CURRENT_USER_KEY: &str = "currentUser";
const SELECTED_SEASON_KEY: &str = "selectedSeason";
const SELECTED_SHIFT_KEY: &str = "selectedShift";
const REPORT_SHIFTS_KEY: &str = "reports_selected_shifts";

/// Process-wide UI state.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    token: Option<String>,
    current_user: Option<User>,
    selected_season: Option<Season>,
    selected_shift: ShiftSelection,
    report_shifts: Vec<i64>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.token.is_some())
            .field("current_user", &self.current_user)
            .field("selected_season", &self.selected_season)
            .field("selected_shift", &self.selected_shift)
            .field("report_shifts", &self.report_shifts)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Restores the store from `storage`.
    ///
    /// Never fails: a key that cannot be read or parsed is treated as absent. A user
    /// stored without a token is dropped.
    pub async fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let token = read_raw(storage.as_ref(), TOKEN_KEY).await;
        let mut current_user: Option<User> = read_json(storage.as_ref(), CURRENT_USER_KEY).await;
        if token.is_none() && current_user.take().is_some() {
            warn!("Dropping stored user without a token");
            remove_key(storage.as_ref(), CURRENT_USER_KEY).await;
        }

        let selected_season = read_json(storage.as_ref(), SELECTED_SEASON_KEY).await;
        let selected_shift = read_json(storage.as_ref(), SELECTED_SHIFT_KEY)
            .await
            .unwrap_or_default();
        let report_shifts = read_json(storage.as_ref(), REPORT_SHIFTS_KEY)
            .await
            .unwrap_or_default();

        Self {
            storage,
            token,
            current_user,
            selected_season,
            selected_shift,
            report_shifts,
        }
    }

    /// Bearer token, if logged in.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Cached profile of the logged-in user.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// Selected season.
    #[must_use]
    pub const fn selected_season(&self) -> Option<&Season> {
        self.selected_season.as_ref()
    }

    /// Selected shift(s).
    #[must_use]
    pub const fn selected_shift(&self) -> &ShiftSelection {
        &self.selected_shift
    }

    /// Shift ids ticked in the reports view.
    #[must_use]
    pub fn report_shifts(&self) -> &[i64] {
        &self.report_shifts
    }

    /// Sets or clears the token. Clearing it also clears the cached user.
    pub async fn set_token(&mut self, token: Option<String>) {
        match &token {
            Some(t) => write_raw(self.storage.as_ref(), TOKEN_KEY, t).await,
            None => {
                remove_key(self.storage.as_ref(), TOKEN_KEY).await;
                self.current_user = None;
                remove_key(self.storage.as_ref(), CURRENT_USER_KEY).await;
            }
        }
        self.token = token;
    }

    /// Sets or clears the cached profile.
    pub async fn set_current_user(&mut self, user: Option<User>) {
        write_optional(self.storage.as_ref(), CURRENT_USER_KEY, user.as_ref()).await;
        self.current_user = user;
    }

    /// Sets or clears the selected season.
    pub async fn set_selected_season(&mut self, season: Option<Season>) {
        write_optional(self.storage.as_ref(), SELECTED_SEASON_KEY, season.as_ref()).await;
        self.selected_season = season;
    }

    /// Sets the shift selection. [`ShiftSelection::None`] removes the key.
    pub async fn set_selected_shift(&mut self, selection: ShiftSelection) {
        let stored = (!selection.is_none()).then_some(&selection);
        write_optional(self.storage.as_ref(), SELECTED_SHIFT_KEY, stored).await;
        self.selected_shift = selection;
    }

    /// Sets the reports shift multi-selection. An empty list removes the key.
    pub async fn set_report_shifts(&mut self, shift_ids: Vec<i64>) {
        let stored = (!shift_ids.is_empty()).then_some(&shift_ids);
        write_optional(self.storage.as_ref(), REPORT_SHIFTS_KEY, stored).await;
        self.report_shifts = shift_ids;
    }

    /// Logs in and caches the profile.
    ///
    /// The token is attached to `api` before the profile is requested. If the profile
    /// cannot be loaded the token is dropped again.
    pub async fn login(&mut self, api: &dyn ClubApi, credentials: &Credentials) -> Result<User> {
        if credentials.username.trim().is_empty() || credentials.password.is_empty() {
            return Err(ValidationError::CredentialsRequired.into());
        }

        let issued = api.login(credentials).await?;
        api.set_bearer(Some(issued.access_token.clone()));
        self.set_token(Some(issued.access_token)).await;

        match api.profile().await {
            Ok(user) => {
                info!("User {} logged in", user.username);
                self.set_current_user(Some(user.clone())).await;
                Ok(user)
            }
            Err(e) => {
                self.logout(api).await;
                Err(e)
            }
        }
    }

    /// Forgets the token and the cached user.
    pub async fn logout(&mut self, api: &dyn ClubApi) {
        api.set_bearer(None);
        self.set_token(None).await;
    }

    /// Reloads the cached profile from the backend.
    pub async fn refresh_profile(&mut self, api: &dyn ClubApi) -> Result<User> {
        let user = api.profile().await?;
        self.set_current_user(Some(user.clone())).await;
        Ok(user)
    }
}

async fn read_raw(storage: &dyn KeyValueStore, key: &str) -> Option<String> {
    match storage.get(key).await {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to read stored {key}: {e}");
            None
        }
    }
}

async fn read_json<T: DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = read_raw(storage, key).await?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring malformed stored {key}: {e}");
            None
        }
    }
}

async fn write_raw(storage: &dyn KeyValueStore, key: &str, value: &str) {
    if let Err(e) = storage.set(key, value).await {
        warn!("Failed to persist {key}: {e}");
    }
}

async fn remove_key(storage: &dyn KeyValueStore, key: &str) {
    if let Err(e) = storage.remove(key).await {
        warn!("Failed to remove stored {key}: {e}");
    }
}

async fn write_optional<T: Serialize + Sync>(
    storage: &dyn KeyValueStore,
    key: &str,
    value: Option<&T>,
) {
    match value.map(serde_json::to_string) {
        Some(Ok(json)) => write_raw(storage, key, &json).await,
        Some(Err(e)) => warn!("Failed to encode {key}: {e}"),
        None => remove_key(storage, key).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::storage::MemoryStore,
        errors::Error,
        test_utils::{FakeClubApi, init_test_tracing, season, shift, user},
    };

    #[tokio::test]
    async fn test_malformed_season_loads_as_absent() {
        init_test_tracing();
        let storage = Arc::new(MemoryStore::with_entries([(SELECTED_SEASON_KEY, "{not json")]));
        let session = SessionStore::load(storage).await;
        assert!(session.selected_season().is_none());
        assert!(session.selected_shift().is_none());
    }

    #[tokio::test]
    async fn test_user_without_token_is_dropped_on_load() -> Result<()> {
        let json = serde_json::to_string(&user(1, "mario"))?;
        let storage = Arc::new(MemoryStore::with_entries([(CURRENT_USER_KEY, json)]));
        let session = SessionStore::load(Arc::clone(&storage) as Arc<dyn KeyValueStore>).await;
        assert!(session.current_user().is_none());
        assert_eq!(storage.get(CURRENT_USER_KEY).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_clearing_token_clears_user() -> Result<()> {
        let storage = Arc::new(MemoryStore::new());
        let mut session = SessionStore::load(Arc::clone(&storage) as Arc<dyn KeyValueStore>).await;
        session.set_token(Some("tok".to_string())).await;
        session.set_current_user(Some(user(1, "mario"))).await;
        assert!(storage.get(CURRENT_USER_KEY).await?.is_some());

        session.set_token(None).await;
        assert!(session.token().is_none());
        assert!(session.current_user().is_none());
        assert_eq!(storage.get(TOKEN_KEY).await?, None);
        assert_eq!(storage.get(CURRENT_USER_KEY).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_selection_survives_reload() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut session = SessionStore::load(Arc::clone(&storage)).await;
        session.set_selected_season(Some(season(3, 2025))).await;
        session
            .set_selected_shift(ShiftSelection::All { season_id: 3 })
            .await;
        session.set_report_shifts(vec![7, 9]).await;

        let reloaded = SessionStore::load(storage).await;
        assert_eq!(reloaded.selected_season().map(|s| s.id), Some(3));
        assert_eq!(
            reloaded.selected_shift(),
            &ShiftSelection::All { season_id: 3 }
        );
        assert_eq!(reloaded.report_shifts(), &[7, 9]);
    }

    #[tokio::test]
    async fn test_clearing_selection_removes_keys() -> Result<()> {
        let storage = Arc::new(MemoryStore::new());
        let mut session = SessionStore::load(Arc::clone(&storage) as Arc<dyn KeyValueStore>).await;
        session
            .set_selected_shift(ShiftSelection::Specific(shift(5, 1, 2)))
            .await;
        session.set_report_shifts(vec![5]).await;

        session.set_selected_shift(ShiftSelection::None).await;
        session.set_report_shifts(Vec::new()).await;
        assert_eq!(storage.get(SELECTED_SHIFT_KEY).await?, None);
        assert_eq!(storage.get(REPORT_SHIFTS_KEY).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_login_sets_token_user_and_bearer() -> Result<()> {
        let api = FakeClubApi::new().with_profile(user(4, "luisa"));
        let mut session = SessionStore::load(Arc::new(MemoryStore::new())).await;

        let credentials = Credentials {
            username: "luisa".to_string(),
            password: "vela".to_string(),
        };
        let logged = session.login(&api, &credentials).await?;
        assert_eq!(logged.username, "luisa");
        assert!(session.token().is_some());
        assert_eq!(api.bearer(), session.token().map(str::to_string));

        session.logout(&api).await;
        assert!(session.current_user().is_none());
        assert_eq!(api.bearer(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_login_requires_credentials() {
        let api = FakeClubApi::new();
        let mut session = SessionStore::load(Arc::new(MemoryStore::new())).await;
        let credentials = Credentials {
            username: "  ".to_string(),
            password: String::new(),
        };
        let result = session.login(&api, &credentials).await;
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::CredentialsRequired))
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_password_keeps_the_active_session() -> Result<()> {
        let api = FakeClubApi::new()
            .with_profile(user(4, "luisa"))
            .with_password("vela");
        let mut session = SessionStore::load(Arc::new(MemoryStore::new())).await;
        session
            .login(
                &api,
                &Credentials {
                    username: "luisa".to_string(),
                    password: "vela".to_string(),
                },
            )
            .await?;

        let result = session
            .login(
                &api,
                &Credentials {
                    username: "luisa".to_string(),
                    password: "sbagliata".to_string(),
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::InvalidCredentials))
        ));
        assert_eq!(session.token(), Some("token-luisa"));
        assert_eq!(session.current_user().map(|u| u.id), Some(4));
        assert_eq!(api.bearer().as_deref(), Some("token-luisa"));
        Ok(())
    }
}
