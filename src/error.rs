use derive_more::{Display, Error, From};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, From)]
pub enum Error {
    #[display("{_0}")]
    #[from(skip)]
    Custom(#[error(not(source))] String),

    #[display("IO error: {_0}")]
    Io(std::io::Error),

    #[display("OpenAI error: {_0}")]
    OpenAi(async_openai::error::OpenAIError),
}

impl Error {
    pub fn custom(message: impl Into<String>) -> Self {
        Error::Custom(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn custom_message_displays_verbatim() {
        let err = Error::custom("something went wrong");
        assert_eq!(err.to_string(), "something went wrong");
    }
}
