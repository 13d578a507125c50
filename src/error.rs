//! Error taxonomy for the directory client
//!
//! Validation failures are raised before any request is made. Network
//! failures cover everything between building a request and decoding its
//! body. An empty result set is not an error.

/// Local precondition failures for the send action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Selecciona al menos un contacto antes de enviar.")]
    EmptySelection,
    #[error("Escribe un mensaje antes de enviar.")]
    EmptyMessage,
}

/// Transport, status, or decode failure talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("no se pudo comunicar con el servidor: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("error del servidor ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("respuesta inválida del servidor: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            NetworkError::Decode(err.to_string())
        } else {
            NetworkError::Transport(err)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

pub type Result<T, E = DirectoryError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_includes_reason() {
        let err = NetworkError::Status {
            status: 500,
            body: "Ocurrió un error en el servidor.".to_string(),
        };
        let text = DirectoryError::from(err).to_string();
        assert!(text.contains("500"));
        assert!(text.contains("Ocurrió un error"));
    }

    #[test]
    fn test_validation_is_transparent() {
        let err: DirectoryError = ValidationError::EmptyMessage.into();
        assert_eq!(err.to_string(), ValidationError::EmptyMessage.to_string());
    }
}
