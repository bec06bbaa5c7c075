use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Domain validation errors
    #[error("Invalid plate number: {0}")]
    InvalidPlate(String),

    #[error("Invalid confidence score: {value}")]
    InvalidConfidence { value: f32 },
}

pub type Result<T> = std::result::Result<T, Error>;
