/// Short-link service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenerConfig {
    /// Number of fresh ids tried before `create` gives up on collisions
    pub max_id_attempts: usize,

    /// Length of generated ids
    pub id_length: usize,
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self {
            max_id_attempts: 5,
            id_length: crate::link::ID_LENGTH,
        }
    }
}

impl ShortenerConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of id generation attempts
    pub fn with_max_id_attempts(mut self, attempts: usize) -> Self {
        self.max_id_attempts = attempts;
        self
    }

    /// Set the generated id length
    pub fn with_id_length(mut self, length: usize) -> Self {
        self.id_length = length;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_id_attempts == 0 {
            return Err("max_id_attempts must be greater than 0".to_string());
        }

        if self.id_length == 0 || self.id_length > crate::link::MAX_ID_LENGTH {
            return Err(format!(
                "id_length must be between 1 and {}",
                crate::link::MAX_ID_LENGTH
            ));
        }

        Ok(())
    }
}
