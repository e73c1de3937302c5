//! Unified error types for `LniworksBuddy`.
//!
//! Every fallible operation returns [`Result`]. Command handlers never format errors
//! themselves: [`Error::user_message`] is the single place where a failure becomes the
//! Italian text shown to club staff.

use thiserror::Error;

/// Checks that stop an action, mostly before it reaches the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A specific shift must be selected (the all-shifts view is read only)
    #[error("a specific shift must be selected")]
    ShiftRequired,
    /// Title is empty
    #[error("title is required")]
    TitleRequired,
    /// Category is empty
    #[error("category is required")]
    CategoryRequired,
    /// Amount is missing, zero, negative or not finite
    #[error("amount must be a positive number")]
    AmountInvalid,
    /// No boat was chosen for a damage report
    #[error("a boat is required")]
    BoatRequired,
    /// Damage report description is empty
    #[error("description is required")]
    DescriptionRequired,
    /// Username or password is empty
    #[error("username and password are required")]
    CredentialsRequired,
    /// The backend refused the username/password pair
    #[error("invalid username or password")]
    InvalidCredentials,
}

impl ValidationError {
    /// The prompt shown to the user, matching the wording staff already know.
    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::ShiftRequired => "Seleziona un turno",
            Self::TitleRequired => "Inserisci un titolo",
            Self::CategoryRequired => "Seleziona una categoria",
            Self::AmountInvalid => "Inserisci un importo valido",
            Self::BoatRequired => "Seleziona un'imbarcazione",
            Self::DescriptionRequired => "Inserisci una descrizione",
            Self::CredentialsRequired => "Inserisci username e password",
            Self::InvalidCredentials => "Username o password non corretti",
        }
    }
}

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Local UI-state database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Transport-level failure talking to the backend
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Backend `detail` message, or the status reason
        message: String,
    },

    /// Missing or rejected bearer token
    #[error("Not authenticated")]
    Unauthenticated,

    /// The Discord user is not on the access list
    #[error("Not allowed to use the club session")]
    Forbidden,

    /// A client-side check failed before the request was sent
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A record referenced by id does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record
        entity: &'static str,
        /// Requested id
        id: i64,
    },

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Formatting error while building a reply
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Discord framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Maps any failure to the message shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(v) => v.prompt().to_string(),
            Self::Unauthenticated => {
                "Sessione non valida: effettua il login con `/login`".to_string()
            }
            Self::Forbidden => "Non sei autorizzato a usare questo bot".to_string(),
            Self::NotFound { entity, id } => format!("{entity} #{id} non trovato"),
            Self::Api { status: 404, .. } => "Elemento non trovato".to_string(),
            Self::Api { status, message } => {
                format!("Errore del server ({status}): {message}")
            }
            Self::Http(_) => "Impossibile contattare il server, riprova più tardi".to_string(),
            Self::Config { .. } | Self::EnvVar(_) => "Errore di configurazione".to_string(),
            Self::Database(_) | Self::Io(_) | Self::Json(_) | Self::Fmt(_) | Self::Framework(_) => {
                "Si è verificato un errore interno".to_string()
            }
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_prompts_are_italian() {
        let err = Error::from(ValidationError::ShiftRequired);
        assert_eq!(err.user_message(), "Seleziona un turno");

        let err = Error::from(ValidationError::AmountInvalid);
        assert_eq!(err.user_message(), "Inserisci un importo valido");
    }

    #[test]
    fn test_api_errors_carry_status() {
        let err = Error::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.user_message(), "Errore del server (500): boom");

        let not_found = Error::Api {
            status: 404,
            message: "Work not found".to_string(),
        };
        assert_eq!(not_found.user_message(), "Elemento non trovato");
    }

    #[test]
    fn test_not_found_message() {
        let err = Error::NotFound {
            entity: "Lavoro",
            id: 7,
        };
        assert_eq!(err.user_message(), "Lavoro #7 non trovato");
    }
}
