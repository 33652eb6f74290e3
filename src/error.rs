pub type RenderResult<T> = Result<T, RenderError>;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("mesh error: {0}")]
    Mesh(String),

    #[error("stack error: {0}")]
    Stack(String),

    #[error("symbol error: {0}")]
    Symbol(String),

    #[error("output error: {0}")]
    Output(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl RenderError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn mesh(msg: impl Into<String>) -> Self {
        Self::Mesh(msg.into())
    }

    pub fn stack(msg: impl Into<String>) -> Self {
        Self::Stack(msg.into())
    }

    pub fn symbol(msg: impl Into<String>) -> Self {
        Self::Symbol(msg.into())
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(RenderError::config("x").to_string().contains("configuration error:"));
        assert!(RenderError::mesh("x").to_string().contains("mesh error:"));
        assert!(RenderError::stack("x").to_string().contains("stack error:"));
        assert!(RenderError::symbol("x").to_string().contains("symbol error:"));
        assert!(RenderError::output("x").to_string().contains("output error:"));
    }

    #[test]
    fn io_errors_convert_transparently() {
        let base = std::io::Error::other("boom");
        let err: RenderError = base.into();
        assert!(err.to_string().contains("boom"));
    }
}
